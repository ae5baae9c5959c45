//! Collaborator traits through which a hosting framework exposes HTTP message bodies.

use std::io::{Cursor, Read, Write};

use crate::media_type::MediaType;

/// The subset of HTTP headers a body converter reads or fills in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpHeaders {
  content_type: Option<MediaType>,
  content_length: Option<u64>,
}

impl HttpHeaders {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn content_type(&self) -> Option<&MediaType> {
    self.content_type.as_ref()
  }

  pub fn set_content_type(&mut self, content_type: MediaType) {
    self.content_type = Some(content_type);
  }

  pub fn content_length(&self) -> Option<u64> {
    self.content_length
  }

  pub fn set_content_length(&mut self, content_length: u64) {
    self.content_length = Some(content_length);
  }
}

/// An incoming message whose body can be read.
pub trait HttpInputMessage {
  fn headers(&self) -> &HttpHeaders;
  fn body(&mut self) -> &mut dyn Read;
}

/// An outgoing message whose headers can be set and whose body can be written.
pub trait HttpOutputMessage {
  fn headers_mut(&mut self) -> &mut HttpHeaders;
  fn body(&mut self) -> &mut dyn Write;
}

/// Input message backed by an in-memory body.
#[derive(Debug, Clone, Default)]
pub struct MemoryInputMessage {
  headers: HttpHeaders,
  body: Cursor<Vec<u8>>,
}

impl MemoryInputMessage {
  pub fn new(body: impl Into<Vec<u8>>) -> Self {
    Self {
      headers: HttpHeaders::new(),
      body: Cursor::new(body.into()),
    }
  }

  pub fn with_content_type(mut self, content_type: MediaType) -> Self {
    self.headers.set_content_type(content_type);
    self
  }
}

impl HttpInputMessage for MemoryInputMessage {
  fn headers(&self) -> &HttpHeaders {
    &self.headers
  }

  fn body(&mut self) -> &mut dyn Read {
    &mut self.body
  }
}

/// Output message collecting its body in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryOutputMessage {
  headers: HttpHeaders,
  body: Vec<u8>,
}

impl MemoryOutputMessage {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn headers(&self) -> &HttpHeaders {
    &self.headers
  }

  pub fn body_bytes(&self) -> &[u8] {
    &self.body
  }

  pub fn into_body(self) -> Vec<u8> {
    self.body
  }
}

impl HttpOutputMessage for MemoryOutputMessage {
  fn headers_mut(&mut self) -> &mut HttpHeaders {
    &mut self.headers
  }

  fn body(&mut self) -> &mut dyn Write {
    &mut self.body
  }
}
