//! Error types returned by the codec, the registry and media-type parsing.

use thiserror::Error;

use crate::media_type::MediaType;

/// Error returned when an object stream cannot be turned back into a value.
#[derive(Error, Debug)]
pub enum DecodeError {
  /// The stream ended before a complete frame was read.
  #[error("truncated object stream: needed {needed} bytes, {remaining} remaining")]
  Truncated { needed: usize, remaining: usize },
  /// The stream is structurally invalid.
  #[error("malformed object stream: {0}")]
  Malformed(String),
  /// The stream names a type identifier that is not registered.
  #[error("unknown type identifier: {0}")]
  UnknownType(String),
  /// The stream decoded to a different type than the one requested.
  #[error("type mismatch: expected {expected}, decoded {actual}")]
  TypeMismatch { expected: String, actual: String },
  /// Reading the underlying stream failed.
  #[error("failed to read object stream: {0}")]
  Io(#[from] std::io::Error),
}

impl DecodeError {
  pub fn malformed(message: impl Into<String>) -> Self {
    DecodeError::Malformed(message.into())
  }
}

/// Error returned when a value cannot be written as an object stream.
#[derive(Error, Debug)]
pub enum EncodeError {
  /// The value's type is not registered with the codec.
  #[error("unsupported type: {0}")]
  UnsupportedType(String),
  /// The value, or a part of it, has no byte representation.
  #[error("serialization error: {0}")]
  Serialization(String),
  /// Writing the output stream failed.
  #[error("failed to write object stream: {0}")]
  Io(#[from] std::io::Error),
}

/// Errors that can occur while modifying a [`TypeRegistry`](crate::registry::TypeRegistry).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
  #[error("type identifier {0} already registered")]
  DuplicateIdentifier(String),
  #[error("type {type_name} already registered as {identifier}")]
  DuplicateType { type_name: String, identifier: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaTypeError {
  #[error("invalid media type {value:?}: {reason}")]
  Invalid { value: String, reason: &'static str },
}

impl MediaTypeError {
  pub(crate) fn invalid(value: &str, reason: &'static str) -> Self {
    MediaTypeError::Invalid {
      value: value.to_string(),
      reason,
    }
  }
}

/// Error returned when a [`CodecConfig`](crate::config::CodecConfig) option is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
  /// The codec's own media type must not contain wildcards.
  #[error("codec media type must be concrete, got {0}")]
  NonConcreteMediaType(MediaType),
}

/// Error surfaced through [`HttpMessageConverter`](crate::converter::HttpMessageConverter).
#[derive(Error, Debug)]
pub enum ConverterError {
  #[error("message body not readable: {0}")]
  Decode(#[from] DecodeError),
  #[error("message body not writable: {0}")]
  Encode(#[from] EncodeError),
  #[error("unsupported media type: {0}")]
  UnsupportedMediaType(MediaType),
}
