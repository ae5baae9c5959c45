//! Self-describing envelope around an object payload.
//!
//! ```text
//! magic    2 bytes   0x52 0x4F
//! version  1 byte    0x01
//! id_len   u16 BE
//! id       id_len bytes, UTF-8 type identifier
//! body_len u32 BE
//! body     body_len bytes
//! ```

use bytes::{Buf, BufMut};

use crate::error::{DecodeError, EncodeError};

pub const FRAME_MAGIC: [u8; 2] = [0x52, 0x4F];
pub const FRAME_VERSION: u8 = 1;

const HEADER_LEN: usize = FRAME_MAGIC.len() + 1;

/// One encoded object: the type identifier it was registered under and its payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectFrame {
  type_identifier: String,
  payload: Vec<u8>,
}

impl ObjectFrame {
  pub fn new(type_identifier: impl Into<String>, payload: Vec<u8>) -> Self {
    Self {
      type_identifier: type_identifier.into(),
      payload,
    }
  }

  pub fn type_identifier(&self) -> &str {
    &self.type_identifier
  }

  pub fn payload(&self) -> &[u8] {
    &self.payload
  }

  pub fn into_parts(self) -> (String, Vec<u8>) {
    (self.type_identifier, self.payload)
  }

  pub fn encoded_len(&self) -> usize {
    HEADER_LEN + 2 + self.type_identifier.len() + 4 + self.payload.len()
  }

  pub fn encode<B: BufMut>(&self, buf: &mut B) -> Result<(), EncodeError> {
    let identifier_len = u16::try_from(self.type_identifier.len()).map_err(|_| {
      EncodeError::Serialization(format!(
        "type identifier is {} bytes, the limit is {}",
        self.type_identifier.len(),
        u16::MAX
      ))
    })?;
    let payload_len = u32::try_from(self.payload.len()).map_err(|_| {
      EncodeError::Serialization(format!(
        "payload is {} bytes, the limit is {}",
        self.payload.len(),
        u32::MAX
      ))
    })?;
    buf.put_slice(&FRAME_MAGIC);
    buf.put_u8(FRAME_VERSION);
    buf.put_u16(identifier_len);
    buf.put_slice(self.type_identifier.as_bytes());
    buf.put_u32(payload_len);
    buf.put_slice(&self.payload);
    Ok(())
  }

  pub fn to_vec(&self) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::with_capacity(self.encoded_len());
    self.encode(&mut buf)?;
    Ok(buf)
  }

  /// Parses a frame that must span the whole of `bytes`.
  pub fn decode(mut bytes: &[u8]) -> Result<Self, DecodeError> {
    ensure_remaining(bytes, HEADER_LEN)?;
    let mut magic = [0u8; 2];
    bytes.copy_to_slice(&mut magic);
    if magic != FRAME_MAGIC {
      return Err(DecodeError::malformed(format!("invalid stream header {:02x?}", magic)));
    }
    let version = bytes.get_u8();
    if version != FRAME_VERSION {
      return Err(DecodeError::malformed(format!("unsupported stream version {}", version)));
    }

    ensure_remaining(bytes, 2)?;
    let identifier_len = bytes.get_u16() as usize;
    ensure_remaining(bytes, identifier_len)?;
    let type_identifier = std::str::from_utf8(&bytes[..identifier_len])
      .map_err(|e| DecodeError::malformed(format!("type identifier is not UTF-8: {}", e)))?
      .to_string();
    bytes.advance(identifier_len);

    ensure_remaining(bytes, 4)?;
    let payload_len = bytes.get_u32() as usize;
    ensure_remaining(bytes, payload_len)?;
    let payload = bytes[..payload_len].to_vec();
    bytes.advance(payload_len);

    if bytes.has_remaining() {
      return Err(DecodeError::malformed(format!(
        "{} trailing bytes after object frame",
        bytes.remaining()
      )));
    }
    Ok(Self {
      type_identifier,
      payload,
    })
  }
}

fn ensure_remaining(bytes: &[u8], needed: usize) -> Result<(), DecodeError> {
  let remaining = bytes.len();
  if remaining < needed {
    return Err(DecodeError::Truncated { needed, remaining });
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample() -> ObjectFrame {
    ObjectFrame::new("shop.Order", vec![1, 2, 3, 4])
  }

  #[test]
  fn test_layout() {
    let bytes = sample().to_vec().unwrap();
    assert_eq!(bytes.len(), sample().encoded_len());
    assert_eq!(&bytes[..3], &[0x52, 0x4F, 0x01]);
    assert_eq!(&bytes[3..5], &[0, 10]);
    assert_eq!(&bytes[5..15], b"shop.Order");
    assert_eq!(&bytes[15..19], &[0, 0, 0, 4]);
    assert_eq!(&bytes[19..], &[1, 2, 3, 4]);
  }

  #[test]
  fn test_decode_reads_back_parts() {
    let bytes = sample().to_vec().unwrap();
    let (identifier, payload) = ObjectFrame::decode(&bytes).unwrap().into_parts();
    assert_eq!(identifier, "shop.Order");
    assert_eq!(payload, vec![1, 2, 3, 4]);
  }

  #[test]
  fn test_every_strict_prefix_is_truncated() {
    let bytes = sample().to_vec().unwrap();
    for len in 0..bytes.len() {
      let err = ObjectFrame::decode(&bytes[..len]).unwrap_err();
      assert!(matches!(err, DecodeError::Truncated { .. }), "prefix {len}: {err}");
    }
  }

  #[test]
  fn test_rejects_bad_magic_and_version() {
    let mut bytes = sample().to_vec().unwrap();
    bytes[2] = 9;
    assert!(matches!(ObjectFrame::decode(&bytes), Err(DecodeError::Malformed(_))));
    bytes[0] = 0;
    assert!(matches!(ObjectFrame::decode(&bytes), Err(DecodeError::Malformed(_))));
  }

  #[test]
  fn test_rejects_trailing_bytes() {
    let mut bytes = sample().to_vec().unwrap();
    bytes.push(0);
    assert!(matches!(ObjectFrame::decode(&bytes), Err(DecodeError::Malformed(_))));
  }

  #[test]
  fn test_rejects_non_utf8_identifier() {
    let bytes = [0x52, 0x4F, 0x01, 0, 1, 0xFF, 0, 0, 0, 0];
    assert!(matches!(ObjectFrame::decode(&bytes), Err(DecodeError::Malformed(_))));
  }
}
