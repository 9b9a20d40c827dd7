use crate::descriptor::TypeDescriptor;
use crate::error::MorphError;
use crate::value::{ArrayValue, Value};

// ═══════════════════════════════════════════════════════════════
//  JSON → Value
// ═══════════════════════════════════════════════════════════════

impl Value {
    /// Build a value from loosely typed JSON.
    ///
    /// Integers become `Long`, other numbers `Double`, objects `Map`.
    /// Arrays take the common runtime type of their items as component,
    /// falling back to `Object` when items differ.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Long(i)
                } else if let Some(u) = n.as_u64() {
                    Value::BigInteger(u as i128)
                } else {
                    Value::Double(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => {
                let items: Vec<Value> = items.iter().map(Value::from_json).collect();
                let component = common_component(&items);
                Value::Array(ArrayValue::new(component, items))
            }
            serde_json::Value::Object(map) => Value::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Parse JSON text into a value.
    pub fn from_json_str(s: &str) -> Result<Value, MorphError> {
        let json: serde_json::Value = serde_json::from_str(s)?;
        Ok(Value::from_json(&json))
    }
}

fn common_component(items: &[Value]) -> TypeDescriptor {
    let mut types = items.iter().filter(|v| !v.is_null()).map(Value::type_of);
    let Some(first) = types.next() else {
        return TypeDescriptor::Object;
    };
    if types.all(|t| t == first) {
        first
    } else {
        TypeDescriptor::Object
    }
}

// ═══════════════════════════════════════════════════════════════
//  Value → JSON
// ═══════════════════════════════════════════════════════════════

impl Value {
    /// Render a value as JSON. Beans and bags become objects, types become
    /// their names, big numbers outside the `i64` range become strings.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Char(c) => serde_json::Value::String(c.to_string()),
            Value::Byte(v) => serde_json::json!(v),
            Value::Short(v) => serde_json::json!(v),
            Value::Int(v) => serde_json::json!(v),
            Value::Long(v) => serde_json::json!(v),
            Value::Float(v) => float_json(f64::from(*v)),
            Value::Double(v) => float_json(*v),
            Value::BigInteger(v) => match i64::try_from(*v) {
                Ok(small) => serde_json::json!(small),
                Err(_) => serde_json::Value::String(v.to_string()),
            },
            Value::BigDecimal(unscaled, scale) => {
                serde_json::Value::String(decimal_to_string(*unscaled, *scale))
            }
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Class(ty) => serde_json::Value::String(ty.to_string()),
            Value::Array(array) => {
                serde_json::Value::Array(array.items().iter().map(Value::to_json).collect())
            }
            Value::Map(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Bean(bean) => {
                let map = bean
                    .bean_class()
                    .properties()
                    .iter()
                    .filter(|p| p.readable)
                    .filter_map(|p| bean.get(&p.name).ok().map(|v| (p.name.clone(), v.to_json())))
                    .collect();
                serde_json::Value::Object(map)
            }
            Value::DynaBean(bag) => {
                let map = bag
                    .schema()
                    .iter()
                    .map(|(name, _)| {
                        let v = bag.get(name).map_or(serde_json::Value::Null, Value::to_json);
                        (name.clone(), v)
                    })
                    .collect();
                serde_json::Value::Object(map)
            }
        }
    }
}

fn float_json(v: f64) -> serde_json::Value {
    serde_json::Number::from_f64(v).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

/// Plain decimal notation of `unscaled * 10^-scale`.
pub fn decimal_to_string(unscaled: i128, scale: u8) -> String {
    if scale == 0 {
        return unscaled.to_string();
    }
    let digits = unscaled.unsigned_abs().to_string();
    let scale = scale as usize;
    let padded = if digits.len() <= scale {
        format!("{}{digits}", "0".repeat(scale + 1 - digits.len()))
    } else {
        digits
    };
    let (int_part, frac_part) = padded.split_at(padded.len() - scale);
    let sign = if unscaled < 0 { "-" } else { "" };
    format!("{sign}{int_part}.{frac_part}")
}
