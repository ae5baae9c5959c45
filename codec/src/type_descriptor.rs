use std::any::{Any, TypeId};
use std::fmt::{Display, Formatter};

/// Runtime description of a Rust type, used where a framework asks "can you handle this type?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
  type_id: TypeId,
  type_name: &'static str,
}

impl TypeDescriptor {
  pub fn of<T: Any>() -> Self {
    Self {
      type_id: TypeId::of::<T>(),
      type_name: std::any::type_name::<T>(),
    }
  }

  pub fn type_id(&self) -> TypeId {
    self.type_id
  }

  pub fn type_name(&self) -> &'static str {
    self.type_name
  }
}

impl Display for TypeDescriptor {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.type_name)
  }
}
