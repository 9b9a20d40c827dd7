use std::any::Any;

use morph_api::descriptor::TypeDescriptor;
use morph_api::error::MorphError;
use morph_api::morpher::{same_morpher, Morpher};
use morph_api::value::Value;

/// Morphs a type name into a `Class` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassMorpher;

impl Morpher for ClassMorpher {
    fn morphs_to(&self) -> TypeDescriptor {
        TypeDescriptor::Class
    }

    fn supports(&self, source: &TypeDescriptor) -> bool {
        !source.is_array()
    }

    fn morph(&self, value: &Value) -> Result<Value, MorphError> {
        match value {
            Value::Null | Value::Class(_) => Ok(value.clone()),
            Value::String(name) => Ok(Value::Class(name.parse()?)),
            other => Err(MorphError::unparseable(TypeDescriptor::Class, other)),
        }
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
    use morph_api::descriptor::PrimitiveKind;

    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(
            ClassMorpher.morph(&Value::from("int[]")).unwrap(),
            Value::Class(TypeDescriptor::Primitive(PrimitiveKind::Int).array_of())
        );
        assert!(matches!(
            ClassMorpher.morph(&Value::from("Widget")),
            Err(MorphError::UnknownType(_))
        ));
        assert!(ClassMorpher.morph(&Value::Int(1)).is_err());
    }
}
