use std::any::Any;
use std::fmt;

use crate::descriptor::TypeDescriptor;
use crate::error::MorphError;
use crate::value::Value;

/// Calling convention a morpher was written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorpherKind {
    /// Produces a non-nullable scalar; `Null` input yields a default or zero.
    Primitive,
    /// Produces a nullable value.
    Object,
}

/// Conversion rule: turns a value into one specific target type.
///
/// Principle: a morpher is registered under `morphs_to()` and is picked for a
/// value when `supports()` accepts the value's runtime type. Primitive and
/// object morphers are invoked through the same `morph` entry point.
pub trait Morpher: fmt::Debug + Send + Sync + Any {
    fn morphs_to(&self) -> TypeDescriptor;

    fn supports(&self, source: &TypeDescriptor) -> bool;

    fn morph(&self, value: &Value) -> Result<Value, MorphError>;

    fn kind(&self) -> MorpherKind {
        MorpherKind::Object
    }

    /// The substitute for absent or unparseable input, when one is in use.
    fn default_value(&self) -> Option<&Value> {
        None
    }

    /// Structural equality, used by the registry to filter duplicates.
    fn same_as(&self, other: &dyn Morpher) -> bool;

    fn as_any(&self) -> &dyn Any;
}

/// `same_as` for morphers that implement `PartialEq`.
pub fn same_morpher<M: Morpher + PartialEq>(this: &M, other: &dyn Morpher) -> bool {
    other.as_any().downcast_ref::<M>().is_some_and(|o| this == o)
}

impl PartialEq for dyn Morpher {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

/// The fallback rule: returns its input unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IdentityMorpher;

impl IdentityMorpher {
    pub fn is_identity(morpher: &dyn Morpher) -> bool {
        morpher.as_any().is::<IdentityMorpher>()
    }
}

impl Morpher for IdentityMorpher {
    fn morphs_to(&self) -> TypeDescriptor {
        TypeDescriptor::Object
    }

    fn supports(&self, _source: &TypeDescriptor) -> bool {
        true
    }

    fn morph(&self, value: &Value) -> Result<Value, MorphError> {
        Ok(value.clone())
    }

    fn same_as(&self, other: &dyn Morpher) -> bool {
        same_morpher(self, other)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_returns_input() {
        let value = Value::from("24");
        assert_eq!(IdentityMorpher.morph(&value).unwrap(), value);
        assert_eq!(IdentityMorpher.morph(&Value::Null).unwrap(), Value::Null);
        assert!(IdentityMorpher.supports(&TypeDescriptor::String.array_of()));
    }

    #[test]
    fn test_identity_detection() {
        let m: &dyn Morpher = &IdentityMorpher;
        assert!(IdentityMorpher::is_identity(m));
        assert!(m.same_as(&IdentityMorpher));
    }
}
