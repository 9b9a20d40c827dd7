use std::any::Any;

use morph_api::descriptor::TypeDescriptor;
use morph_api::error::MorphError;
use morph_api::morpher::{same_morpher, Morpher};
use morph_api::value::Value;

use super::parse::{integral, parse_decimal, parse_integer};

fn is_blank(value: &Value) -> bool {
    value.is_null() || value.as_str().is_some_and(|s| s.trim().is_empty())
}

fn to_big_integer(value: &Value) -> Option<i128> {
    match value {
        Value::String(s) => parse_integer(s),
        other => integral(other),
    }
}

fn to_big_decimal(value: &Value) -> Option<(i128, u8)> {
    match value {
        Value::BigDecimal(unscaled, scale) => Some((*unscaled, *scale)),
        Value::String(s) => parse_decimal(s),
        Value::Float(f) => parse_decimal(&f.to_string()),
        Value::Double(f) => parse_decimal(&f.to_string()),
        other => integral(other).map(|i| (i, 0)),
    }
}

/// Morphs into an arbitrary-size integer (`i128`). Decimals truncate.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BigIntegerMorpher {
    default: Option<Value>,
}

impl BigIntegerMorpher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(default: Value) -> Result<Self, MorphError> {
        let default = if default.is_null() {
            Value::Null
        } else {
            to_big_integer(&default)
                .map(Value::BigInteger)
                .ok_or_else(|| {
                    MorphError::construction(format!(
                        "default value {default:?} is not a valid BigInteger"
                    ))
                })?
        };
        Ok(Self {
            default: Some(default),
        })
    }
}

impl Morpher for BigIntegerMorpher {
    fn morphs_to(&self) -> TypeDescriptor {
        TypeDescriptor::BigInteger
    }

    fn supports(&self, source: &TypeDescriptor) -> bool {
        !source.is_array()
    }

    fn morph(&self, value: &Value) -> Result<Value, MorphError> {
        if is_blank(value) {
            return Ok(self.default.clone().unwrap_or(Value::Null));
        }
        to_big_integer(value)
            .map(Value::BigInteger)
            .or_else(|| self.default.clone())
            .ok_or_else(|| MorphError::unparseable(TypeDescriptor::BigInteger, value))
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

/// Morphs into a decimal `(unscaled, scale)`; the scale of the input text
/// is preserved (`"1.50"` keeps scale 2).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BigDecimalMorpher {
    default: Option<Value>,
}

impl BigDecimalMorpher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(default: Value) -> Result<Self, MorphError> {
        let default = if default.is_null() {
            Value::Null
        } else {
            to_big_decimal(&default)
                .map(|(u, s)| Value::BigDecimal(u, s))
                .ok_or_else(|| {
                    MorphError::construction(format!(
                        "default value {default:?} is not a valid BigDecimal"
                    ))
                })?
        };
        Ok(Self {
            default: Some(default),
        })
    }
}

impl Morpher for BigDecimalMorpher {
    fn morphs_to(&self) -> TypeDescriptor {
        TypeDescriptor::BigDecimal
    }

    fn supports(&self, source: &TypeDescriptor) -> bool {
        !source.is_array()
    }

    fn morph(&self, value: &Value) -> Result<Value, MorphError> {
        if is_blank(value) {
            return Ok(self.default.clone().unwrap_or(Value::Null));
        }
        to_big_decimal(value)
            .map(|(u, s)| Value::BigDecimal(u, s))
            .or_else(|| self.default.clone())
            .ok_or_else(|| MorphError::unparseable(TypeDescriptor::BigDecimal, value))
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
