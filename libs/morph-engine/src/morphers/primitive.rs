use std::any::Any;

use morph_api::descriptor::{PrimitiveKind, TypeDescriptor};
use morph_api::error::MorphError;
use morph_api::morpher::{same_morpher, Morpher, MorpherKind};
use morph_api::value::Value;

use super::parse::to_kind;

/// Morphs into a non-nullable scalar slot (`int`, `boolean`, ...).
///
/// `Null` yields the configured default, or the kind's zero without one.
/// Input that can not be read as the kind yields the default, or fails.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveMorpher {
    kind: PrimitiveKind,
    default: Option<Value>,
}

impl PrimitiveMorpher {
    pub fn new(kind: PrimitiveKind) -> Self {
        Self {
            kind,
            default: None,
        }
    }

    /// Morpher with a default value; the default is coerced to the kind.
    pub fn with_default(kind: PrimitiveKind, default: Value) -> Result<Self, MorphError> {
        let default = to_kind(kind, &default).ok_or_else(|| {
            MorphError::construction(format!(
                "default value {default:?} is not a valid {}",
                kind.primitive_name()
            ))
        })?;
        Ok(Self {
            kind,
            default: Some(default),
        })
    }

    pub fn primitive_kind(&self) -> PrimitiveKind {
        self.kind
    }
}

impl Morpher for PrimitiveMorpher {
    fn morphs_to(&self) -> TypeDescriptor {
        TypeDescriptor::Primitive(self.kind)
    }

    fn supports(&self, source: &TypeDescriptor) -> bool {
        !source.is_array()
    }

    fn morph(&self, value: &Value) -> Result<Value, MorphError> {
        if value.is_null() {
            return Ok(self.default.clone().unwrap_or_else(|| self.kind.zero()));
        }
        to_kind(self.kind, value)
            .or_else(|| self.default.clone())
            .ok_or_else(|| MorphError::unparseable(self.morphs_to(), value))
    }

    fn kind(&self) -> MorpherKind {
        MorpherKind::Primitive
    }

    fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    fn same_as(&self, other: &dyn Morpher) -> bool {
        same_morpher(self, other)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
