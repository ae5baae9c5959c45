//! Allow-list of the types a codec may encode and reconstruct.

use std::any::TypeId;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::RegistryError;
use crate::serializer::{BincodeSerializer, ObjectSerializerAny};
use crate::type_descriptor::TypeDescriptor;

/// Mapping from embedded type identifier to the serializer able to rebuild it.
///
/// A stream naming an identifier that is not in the registry is never decoded. Clones share the
/// same underlying maps, so a registry can be handed to several codecs and still be extended.
#[derive(Clone, Default)]
pub struct TypeRegistry {
  by_identifier: Arc<DashMap<String, Arc<dyn ObjectSerializerAny>>>,
  by_type: Arc<DashMap<TypeId, String>>,
}

impl TypeRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers `T` under its Rust type name.
  pub fn register<T>(&self) -> Result<(), RegistryError>
  where
    T: Serialize + DeserializeOwned + Send + Sync + 'static, {
    self.register_as::<T>(std::any::type_name::<T>())
  }

  /// Registers `T` under an explicit identifier, which is what ends up in the byte stream.
  pub fn register_as<T>(&self, identifier: impl Into<String>) -> Result<(), RegistryError>
  where
    T: Serialize + DeserializeOwned + Send + Sync + 'static, {
    self.register_serializer(identifier, Arc::new(BincodeSerializer::<T>::new()))
  }

  /// Registers a custom serializer backend.
  pub fn register_serializer(
    &self,
    identifier: impl Into<String>,
    serializer: Arc<dyn ObjectSerializerAny>,
  ) -> Result<(), RegistryError> {
    let identifier = identifier.into();
    // lock order: by_type, then by_identifier
    let type_entry = match self.by_type.entry(serializer.target_type_id()) {
      Entry::Occupied(occupied) => {
        return Err(RegistryError::DuplicateType {
          type_name: serializer.type_name().to_string(),
          identifier: occupied.get().clone(),
        });
      }
      Entry::Vacant(vacant) => vacant,
    };
    match self.by_identifier.entry(identifier.clone()) {
      Entry::Occupied(_) => Err(RegistryError::DuplicateIdentifier(identifier)),
      Entry::Vacant(vacant) => {
        tracing::debug!(
          "Registering object type: identifier = {}, type_name = {}",
          identifier,
          serializer.type_name()
        );
        vacant.insert(serializer);
        type_entry.insert(identifier);
        Ok(())
      }
    }
  }

  pub fn find_by_identifier(&self, identifier: &str) -> Option<Arc<dyn ObjectSerializerAny>> {
    self.by_identifier.get(identifier).map(|e| e.value().clone())
  }

  /// Returns the identifier and serializer registered for `type_id`.
  pub fn find_by_type(&self, type_id: TypeId) -> Option<(String, Arc<dyn ObjectSerializerAny>)> {
    let identifier = self.by_type.get(&type_id).map(|e| e.value().clone())?;
    let serializer = self.find_by_identifier(&identifier)?;
    Some((identifier, serializer))
  }

  pub fn identifier_of(&self, descriptor: &TypeDescriptor) -> Option<String> {
    self.by_type.get(&descriptor.type_id()).map(|e| e.value().clone())
  }

  pub fn contains_type(&self, descriptor: &TypeDescriptor) -> bool {
    self.by_type.contains_key(&descriptor.type_id())
  }

  pub fn contains_identifier(&self, identifier: &str) -> bool {
    self.by_identifier.contains_key(identifier)
  }

  pub fn identifiers(&self) -> Vec<String> {
    let mut identifiers = self.by_identifier.iter().map(|e| e.key().clone()).collect::<Vec<_>>();
    identifiers.sort();
    identifiers
  }

  pub fn len(&self) -> usize {
    self.by_identifier.len()
  }

  pub fn is_empty(&self) -> bool {
    self.by_identifier.is_empty()
  }
}

impl Debug for TypeRegistry {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("TypeRegistry")
      .field("identifiers", &self.identifiers())
      .finish()
  }
}

static_assertions::assert_impl_all!(TypeRegistry: Send, Sync);

#[cfg(test)]
mod tests {
  use super::*;
  use serde::Deserialize;

  #[derive(Debug, Serialize, Deserialize)]
  struct Order {
    id: u64,
  }

  #[derive(Debug, Serialize, Deserialize)]
  struct Invoice {
    id: u64,
  }

  #[test]
  fn test_register_and_resolve() {
    let registry = TypeRegistry::new();
    registry.register::<Order>().expect("register");

    let descriptor = TypeDescriptor::of::<Order>();
    assert!(registry.contains_type(&descriptor));
    assert_eq!(registry.identifier_of(&descriptor).as_deref(), Some(descriptor.type_name()));

    let serializer = registry.find_by_identifier(descriptor.type_name()).expect("resolve");
    assert_eq!(serializer.target_type_id(), TypeId::of::<Order>());
  }

  #[test]
  fn test_register_as_uses_explicit_identifier() {
    let registry = TypeRegistry::new();
    registry.register_as::<Order>("shop.Order").expect("register");

    let (identifier, serializer) = registry.find_by_type(TypeId::of::<Order>()).expect("resolve");
    assert_eq!(identifier, "shop.Order");
    assert_eq!(serializer.target_type_id(), TypeId::of::<Order>());
    assert!(!registry.contains_identifier(std::any::type_name::<Order>()));
  }

  #[test]
  fn test_rejects_duplicate_identifier() {
    let registry = TypeRegistry::new();
    registry.register_as::<Order>("shop.Document").expect("register first");

    let err = registry.register_as::<Invoice>("shop.Document").expect_err("duplicate");
    assert_eq!(err, RegistryError::DuplicateIdentifier("shop.Document".to_string()));
    assert!(!registry.contains_type(&TypeDescriptor::of::<Invoice>()));
  }

  #[test]
  fn test_rejects_duplicate_type() {
    let registry = TypeRegistry::new();
    registry.register_as::<Order>("shop.Order").expect("register first");

    let err = registry.register_as::<Order>("shop.OrderV2").expect_err("duplicate");
    assert!(matches!(err, RegistryError::DuplicateType { identifier, .. } if identifier == "shop.Order"));
    assert_eq!(registry.len(), 1);
  }

  #[test]
  fn test_concurrent_registration_of_one_type_admits_one_identifier() {
    use std::sync::Barrier;

    for _ in 0..200 {
      let registry = TypeRegistry::new();
      let barrier = Barrier::new(2);
      let results = std::thread::scope(|scope| {
        let handles = ["shop.OrderA", "shop.OrderB"].map(|identifier| {
          let registry = &registry;
          let barrier = &barrier;
          scope.spawn(move || {
            barrier.wait();
            registry.register_as::<Order>(identifier)
          })
        });
        handles.map(|h| h.join().expect("join"))
      });

      let succeeded = results.iter().filter(|r| r.is_ok()).count();
      assert_eq!(succeeded, 1, "{results:?}");
      assert!(results
        .iter()
        .any(|r| matches!(r, Err(RegistryError::DuplicateType { .. }))));
      assert_eq!(registry.len(), 1);
      let (identifier, _) = registry.find_by_type(TypeId::of::<Order>()).expect("resolve");
      assert!(registry.contains_identifier(&identifier));
    }
  }

  #[test]
  fn test_clones_share_entries() {
    let registry = TypeRegistry::new();
    let shared = registry.clone();
    shared.register::<Invoice>().expect("register");
    assert!(registry.contains_type(&TypeDescriptor::of::<Invoice>()));
    assert!(!registry.is_empty());
  }
}
