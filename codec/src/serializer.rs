//! Serializer traits and the bincode backend used for object payloads.

use std::any::{Any, TypeId};
use std::marker::PhantomData;

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{DecodeError, EncodeError};

/// Typed serializer for values of `T`.
pub trait ObjectSerializer<T>: Send + Sync {
  fn serialize(&self, value: &T) -> Result<Vec<u8>, EncodeError>;
  fn deserialize(&self, bytes: &[u8]) -> Result<T, DecodeError>;
}

/// Type-erased serializer stored in the [`TypeRegistry`](crate::registry::TypeRegistry).
pub trait ObjectSerializerAny: Send + Sync {
  /// Rust type name of the values handled by this serializer.
  fn type_name(&self) -> &'static str;
  fn target_type_id(&self) -> TypeId;
  fn serialize_any(&self, value: &dyn Any) -> Result<Vec<u8>, EncodeError>;
  fn deserialize_any(&self, bytes: &[u8]) -> Result<Box<dyn Any + Send + Sync>, DecodeError>;
}

fn bincode_options() -> impl Options {
  bincode::DefaultOptions::new()
}

/// Serializer backed by `bincode`. Payloads must be consumed entirely on decode.
pub struct BincodeSerializer<T> {
  _phantom: PhantomData<fn() -> T>,
}

impl<T> BincodeSerializer<T> {
  pub fn new() -> Self {
    Self { _phantom: PhantomData }
  }
}

impl<T> Default for BincodeSerializer<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: Serialize + DeserializeOwned> ObjectSerializer<T> for BincodeSerializer<T> {
  fn serialize(&self, value: &T) -> Result<Vec<u8>, EncodeError> {
    bincode_options()
      .serialize(value)
      .map_err(|e| EncodeError::Serialization(e.to_string()))
  }

  fn deserialize(&self, bytes: &[u8]) -> Result<T, DecodeError> {
    bincode_options()
      .deserialize(bytes)
      .map_err(|e| DecodeError::malformed(e.to_string()))
  }
}

impl<T> ObjectSerializerAny for BincodeSerializer<T>
where
  T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
  fn type_name(&self) -> &'static str {
    std::any::type_name::<T>()
  }

  fn target_type_id(&self) -> TypeId {
    TypeId::of::<T>()
  }

  fn serialize_any(&self, value: &dyn Any) -> Result<Vec<u8>, EncodeError> {
    value
      .downcast_ref::<T>()
      .ok_or_else(|| EncodeError::UnsupportedType(self.type_name().to_string()))
      .and_then(|v| self.serialize(v))
  }

  fn deserialize_any(&self, bytes: &[u8]) -> Result<Box<dyn Any + Send + Sync>, DecodeError> {
    self
      .deserialize(bytes)
      .map(|v| Box::new(v) as Box<dyn Any + Send + Sync>)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde::Deserialize;

  #[derive(Debug, PartialEq, Serialize, Deserialize)]
  struct Ping {
    seq: u32,
  }

  #[test]
  fn test_serialize_any_rejects_foreign_value() {
    let serializer = BincodeSerializer::<Ping>::new();
    let err = serializer.serialize_any(&"not a ping").unwrap_err();
    assert!(matches!(err, EncodeError::UnsupportedType(name) if name.ends_with("Ping")));
  }

  #[test]
  fn test_deserialize_rejects_trailing_bytes() {
    let serializer = BincodeSerializer::<Ping>::new();
    let mut bytes = serializer.serialize(&Ping { seq: 7 }).unwrap();
    bytes.push(0);
    assert!(matches!(serializer.deserialize(&bytes), Err(DecodeError::Malformed(_))));
  }

  #[test]
  fn test_deserialize_any_boxes_target_type() {
    let serializer = BincodeSerializer::<Ping>::new();
    let bytes = serializer.serialize(&Ping { seq: 1 }).unwrap();
    let value = serializer.deserialize_any(&bytes).unwrap();
    assert_eq!(value.downcast::<Ping>().unwrap().as_ref(), &Ping { seq: 1 });
  }
}
