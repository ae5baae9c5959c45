//! HTTP message body codec for self-describing serialized Rust objects.
//!
//! [`ObjectBodyCodec`] writes a registered value as an object frame tagged
//! `application/x-rust-serialized-object` and reads it back. Which types may be reconstructed is
//! decided by an explicit [`TypeRegistry`] handed to the codec at construction.

pub mod config;
pub mod config_option;
pub mod converter;
pub mod error;
pub mod frame;
pub mod http_message;
pub mod media_type;
pub mod object_body_codec;
pub mod registry;
pub mod serializer;
pub mod type_descriptor;

pub use config::CodecConfig;
pub use config_option::ConfigOption;
pub use converter::HttpMessageConverter;
pub use error::{ConfigError, ConverterError, DecodeError, EncodeError, MediaTypeError, RegistryError};
pub use frame::ObjectFrame;
pub use http_message::{HttpHeaders, HttpInputMessage, HttpOutputMessage, MemoryInputMessage, MemoryOutputMessage};
pub use media_type::MediaType;
pub use object_body_codec::{DecodedObject, ObjectBodyCodec};
pub use registry::TypeRegistry;
pub use serializer::{BincodeSerializer, ObjectSerializer, ObjectSerializerAny};
pub use type_descriptor::TypeDescriptor;
