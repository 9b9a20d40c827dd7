use std::any::Any;

use morph_api::descriptor::{PrimitiveKind, TypeDescriptor};
use morph_api::error::MorphError;
use morph_api::morpher::{same_morpher, Morpher};
use morph_api::value::Value;

use super::parse::to_kind;

/// Morphs into a nullable boxed scalar (`Integer`, `Boolean`, ...).
///
/// `Null` and blank text yield the default when one is set, `Null` otherwise.
/// A `Null` default is allowed.
#[derive(Debug, Clone, PartialEq)]
pub struct WrapperMorpher {
    kind: PrimitiveKind,
    default: Option<Value>,
}

impl WrapperMorpher {
    pub fn new(kind: PrimitiveKind) -> Self {
        Self {
            kind,
            default: None,
        }
    }

    pub fn with_default(kind: PrimitiveKind, default: Value) -> Result<Self, MorphError> {
        let default = if default.is_null() {
            Value::Null
        } else {
            to_kind(kind, &default).ok_or_else(|| {
                MorphError::construction(format!(
                    "default value {default:?} is not a valid {}",
                    kind.wrapper_name()
                ))
            })?
        };
        Ok(Self {
            kind,
            default: Some(default),
        })
    }

    fn absent(&self) -> Value {
        self.default.clone().unwrap_or(Value::Null)
    }
}

impl Morpher for WrapperMorpher {
    fn morphs_to(&self) -> TypeDescriptor {
        TypeDescriptor::Wrapper(self.kind)
    }

    fn supports(&self, source: &TypeDescriptor) -> bool {
        !source.is_array()
    }

    fn morph(&self, value: &Value) -> Result<Value, MorphError> {
        match value {
            Value::Null => return Ok(self.absent()),
            // A blank string is a valid (single space) char.
            Value::String(s) if s.trim().is_empty() && self.kind != PrimitiveKind::Char => {
                return Ok(self.absent());
            }
            Value::String(s) if s.is_empty() => return Ok(self.absent()),
            _ => {}
        }
        to_kind(self.kind, value)
            .or_else(|| self.default.clone())
            .ok_or_else(|| MorphError::unparseable(self.morphs_to(), value))
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
