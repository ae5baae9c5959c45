use std::any::Any;

use crate::error::ConverterError;
use crate::http_message::{HttpInputMessage, HttpOutputMessage};
use crate::media_type::MediaType;
use crate::type_descriptor::TypeDescriptor;

/// Plug-in interface a hosting framework dispatches message bodies through.
///
/// The framework asks `can_read` / `can_write` during content negotiation and only then calls
/// `read` / `write` on the converter it selected.
pub trait HttpMessageConverter: Send + Sync {
  fn supported_media_types(&self) -> Vec<MediaType>;

  /// `media_type` is the request's `Content-Type`, if any.
  fn can_read(&self, target: &TypeDescriptor, media_type: Option<&MediaType>) -> bool;

  /// `media_type` is the negotiated response type, if any.
  fn can_write(&self, source: &TypeDescriptor, media_type: Option<&MediaType>) -> bool;

  fn read(
    &self,
    target: &TypeDescriptor,
    input: &mut dyn HttpInputMessage,
  ) -> Result<Box<dyn Any + Send + Sync>, ConverterError>;

  fn write(
    &self,
    value: &dyn Any,
    content_type: Option<&MediaType>,
    output: &mut dyn HttpOutputMessage,
  ) -> Result<(), ConverterError>;
}
