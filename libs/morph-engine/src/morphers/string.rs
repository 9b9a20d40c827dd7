use std::any::Any;

use morph_api::descriptor::TypeDescriptor;
use morph_api::error::MorphError;
use morph_api::json::decimal_to_string;
use morph_api::morpher::{same_morpher, Morpher};
use morph_api::value::Value;

/// Renders any non-array value as text. `Null` stays `Null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StringMorpher;

impl Morpher for StringMorpher {
    fn morphs_to(&self) -> TypeDescriptor {
        TypeDescriptor::String
    }

    fn supports(&self, source: &TypeDescriptor) -> bool {
        !source.is_array()
    }

    fn morph(&self, value: &Value) -> Result<Value, MorphError> {
        let text = match value {
            Value::Null => return Ok(Value::Null),
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Char(c) => c.to_string(),
            Value::Byte(v) => v.to_string(),
            Value::Short(v) => v.to_string(),
            Value::Int(v) => v.to_string(),
            Value::Long(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Double(v) => v.to_string(),
            Value::BigInteger(v) => v.to_string(),
            Value::BigDecimal(unscaled, scale) => decimal_to_string(*unscaled, *scale),
            Value::Class(ty) => ty.to_string(),
            Value::Array(_) => {
                return Err(MorphError::unsupported(
                    TypeDescriptor::String,
                    "argument is an array",
                ))
            }
            Value::Map(_) | Value::Bean(_) | Value::DynaBean(_) => value.to_json().to_string(),
        };
        Ok(Value::String(text))
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
    fn test_scalars_to_text() {
        assert_eq!(StringMorpher.morph(&Value::Int(24)).unwrap(), Value::from("24"));
        assert_eq!(StringMorpher.morph(&Value::BigDecimal(150, 2)).unwrap(), Value::from("1.50"));
        assert_eq!(StringMorpher.morph(&Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_map_to_json_text() {
        let map = Value::Map(vec![("a".into(), Value::Int(1))]);
        assert_eq!(StringMorpher.morph(&map).unwrap(), Value::from(r#"{"a":1}"#));
    }
}
