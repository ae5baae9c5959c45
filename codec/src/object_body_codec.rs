use std::any::{Any, TypeId};
use std::io::{Read, Write};

use crate::config::CodecConfig;
use crate::config_option::ConfigOption;
use crate::converter::HttpMessageConverter;
use crate::error::{ConfigError, ConverterError, DecodeError, EncodeError};
use crate::frame::ObjectFrame;
use crate::http_message::{HttpInputMessage, HttpOutputMessage};
use crate::media_type::MediaType;
use crate::registry::TypeRegistry;
use crate::type_descriptor::TypeDescriptor;


/// A value reconstructed from an object stream, together with the identifier it was sent under.
#[derive(Debug)]
pub struct DecodedObject {
  type_identifier: String,
  type_id: TypeId,
  type_name: &'static str,
  value: Box<dyn Any + Send + Sync>,
}

impl DecodedObject {
  pub fn type_identifier(&self) -> &str {
    &self.type_identifier
  }

  pub fn type_name(&self) -> &'static str {
    self.type_name
  }

  pub fn is<T: Any>(&self) -> bool {
    self.type_id == TypeId::of::<T>()
  }

  pub fn into_value(self) -> Box<dyn Any + Send + Sync> {
    self.value
  }

  pub fn downcast<T: Any>(self) -> Result<T, DecodeError> {
    let type_name = self.type_name;
    self
      .value
      .downcast::<T>()
      .map(|boxed| *boxed)
      .map_err(|_| DecodeError::TypeMismatch {
        expected: std::any::type_name::<T>().to_string(),
        actual: type_name.to_string(),
      })
  }
}

/// Converts registered values to and from self-describing object streams carried as HTTP bodies.
///
/// The media type is fixed when the codec is built. Only types present in the injected
/// [`TypeRegistry`] are encoded or reconstructed.
#[derive(Debug, Clone)]
pub struct ObjectBodyCodec {
  registry: TypeRegistry,
  config: CodecConfig,
}

impl ObjectBodyCodec {
  pub fn new(registry: TypeRegistry) -> Self {
    Self::with_config(registry, CodecConfig::default())
  }

  pub fn with_config(registry: TypeRegistry, config: CodecConfig) -> Self {
    Self { registry, config }
  }

  pub fn from_options(
    registry: TypeRegistry,
    options: impl IntoIterator<Item = ConfigOption>,
  ) -> Result<Self, ConfigError> {
    Ok(Self::with_config(registry, CodecConfig::from(options)?))
  }

  pub fn media_type(&self) -> &MediaType {
    self.config.get_media_type()
  }

  pub fn registry(&self) -> &TypeRegistry {
    &self.registry
  }

  pub fn supports(&self, candidate: &TypeDescriptor) -> bool {
    self.registry.contains_type(candidate)
  }

  pub fn supports_type<T: Any>(&self) -> bool {
    self.supports(&TypeDescriptor::of::<T>())
  }

  /// Serializes `value` into a complete object frame.
  pub fn encode_to_vec(&self, value: &dyn Any) -> Result<Vec<u8>, EncodeError> {
    let (identifier, serializer) = self
      .registry
      .find_by_type(value.type_id())
      .ok_or_else(|| {
        EncodeError::UnsupportedType(format!("value type is not registered ({:?})", value.type_id()))
      })?;
    let payload = serializer.serialize_any(value)?;
    let bytes = ObjectFrame::new(identifier, payload).to_vec()?;
    tracing::debug!(
      "encode: type_name = {}, frame_len = {}",
      serializer.type_name(),
      bytes.len()
    );
    Ok(bytes)
  }

  /// Writes the object frame for `value` to `output` and flushes it.
  pub fn encode(&self, value: &dyn Any, output: &mut dyn Write) -> Result<(), EncodeError> {
    let bytes = self.encode_to_vec(value)?;
    output.write_all(&bytes)?;
    output.flush()?;
    Ok(())
  }

  /// Reads `input` to the end and reconstructs whichever registered type it names.
  pub fn decode_any(&self, input: &mut dyn Read) -> Result<DecodedObject, DecodeError> {
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;
    let (type_identifier, payload) = ObjectFrame::decode(&bytes)?.into_parts();
    let serializer = match self.registry.find_by_identifier(&type_identifier) {
      Some(serializer) => serializer,
      None => {
        tracing::warn!("decode: type identifier {} is not registered", type_identifier);
        return Err(DecodeError::UnknownType(type_identifier));
      }
    };
    let value = serializer.deserialize_any(&payload)?;
    tracing::debug!(
      "decode: type_identifier = {}, frame_len = {}",
      type_identifier,
      bytes.len()
    );
    Ok(DecodedObject {
      type_identifier,
      type_id: serializer.target_type_id(),
      type_name: serializer.type_name(),
      value,
    })
  }

  /// Like [`ObjectBodyCodec::decode_any`], but fails unless the stream holds a `target`.
  pub fn decode(
    &self,
    target: &TypeDescriptor,
    input: &mut dyn Read,
  ) -> Result<Box<dyn Any + Send + Sync>, DecodeError> {
    let decoded = self.decode_any(input)?;
    if decoded.type_id != target.type_id() {
      return Err(DecodeError::TypeMismatch {
        expected: target.type_name().to_string(),
        actual: decoded.type_name.to_string(),
      });
    }
    Ok(decoded.into_value())
  }

  pub fn decode_as<T: Any>(&self, input: &mut dyn Read) -> Result<T, DecodeError> {
    self.decode_any(input)?.downcast::<T>()
  }
}

impl HttpMessageConverter for ObjectBodyCodec {
  fn supported_media_types(&self) -> Vec<MediaType> {
    vec![self.media_type().clone()]
  }

  fn can_read(&self, target: &TypeDescriptor, media_type: Option<&MediaType>) -> bool {
    self.supports(target) && media_type.map_or(true, |m| self.media_type().includes(m))
  }

  fn can_write(&self, source: &TypeDescriptor, media_type: Option<&MediaType>) -> bool {
    self.supports(source)
      && media_type.map_or(true, |m| m.is_wildcard_type() || self.media_type().is_compatible_with(m))
  }

  fn read(
    &self,
    target: &TypeDescriptor,
    input: &mut dyn HttpInputMessage,
  ) -> Result<Box<dyn Any + Send + Sync>, ConverterError> {
    if let Some(content_type) = input.headers().content_type() {
      if !self.media_type().includes(content_type) {
        return Err(ConverterError::UnsupportedMediaType(content_type.clone()));
      }
    }
    Ok(self.decode(target, input.body())?)
  }

  fn write(
    &self,
    value: &dyn Any,
    content_type: Option<&MediaType>,
    output: &mut dyn HttpOutputMessage,
  ) -> Result<(), ConverterError> {
    let content_type_to_use = match content_type {
      Some(m) if m.is_concrete() => {
        if !self.media_type().is_compatible_with(m) {
          return Err(ConverterError::UnsupportedMediaType(m.clone()));
        }
        m.clone()
      }
      _ => self.media_type().clone(),
    };
    let bytes = self.encode_to_vec(value)?;

    let headers = output.headers_mut();
    if headers.content_type().is_none() {
      headers.set_content_type(content_type_to_use);
    }
    if self.config.is_write_content_length() && headers.content_length().is_none() {
      headers.set_content_length(bytes.len() as u64);
    }

    let body = output.body();
    body.write_all(&bytes).map_err(EncodeError::from)?;
    body.flush().map_err(EncodeError::from)?;
    Ok(())
  }
}

static_assertions::assert_impl_all!(ObjectBodyCodec: Send, Sync, Clone);
