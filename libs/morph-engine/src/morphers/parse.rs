//! Scalar coercions shared by the leaf morphers.
//!
//! Every function takes a non-null value and returns `None` when the value
//! can not be read as the requested kind.

use morph_api::descriptor::PrimitiveKind;
use morph_api::json::decimal_to_string;
use morph_api::value::Value;

/// Coerce a value into the scalar variant for `kind`.
pub(crate) fn to_kind(kind: PrimitiveKind, value: &Value) -> Option<Value> {
    match kind {
        PrimitiveKind::Boolean => to_bool(value).map(Value::Bool),
        PrimitiveKind::Char => to_char(value).map(Value::Char),
        PrimitiveKind::Byte => {
            to_integer(value, |i| i8::try_from(i).ok(), |i| i as i8).map(Value::Byte)
        }
        PrimitiveKind::Short => {
            to_integer(value, |i| i16::try_from(i).ok(), |i| i as i16).map(Value::Short)
        }
        PrimitiveKind::Int => {
            to_integer(value, |i| i32::try_from(i).ok(), |i| i as i32).map(Value::Int)
        }
        PrimitiveKind::Long => {
            to_integer(value, |i| i64::try_from(i).ok(), |i| i as i64).map(Value::Long)
        }
        PrimitiveKind::Float => to_float(value).map(|f| Value::Float(f as f32)),
        PrimitiveKind::Double => to_float(value).map(Value::Double),
    }
}

fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" => Some(true),
            "false" | "no" | "off" => Some(false),
            _ => None,
        },
        other => numeric(other).map(|n| n != 0.0),
    }
}

fn to_char(value: &Value) -> Option<char> {
    match value {
        Value::Char(c) => Some(*c),
        Value::String(s) => s.chars().next(),
        _ => None,
    }
}

/// Integer coercion. Text must fit the target (`checked`); numeric values
/// narrow like a cast (`wrapping`).
fn to_integer<T>(
    value: &Value,
    checked: impl Fn(i128) -> Option<T>,
    wrapping: impl Fn(i128) -> T,
) -> Option<T> {
    match value {
        Value::String(s) => parse_integer(s).and_then(checked),
        Value::Char(c) => c.to_digit(10).and_then(|d| checked(i128::from(d))),
        Value::Float(f) => float_to_integer(f64::from(*f)).map(wrapping),
        Value::Double(f) => float_to_integer(*f).map(wrapping),
        other => integral(other).map(wrapping),
    }
}

fn to_float(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Char(c) => c.to_digit(10).map(f64::from),
        other => numeric(other),
    }
}

/// Integral view of a numeric value (truncating decimals).
pub(crate) fn integral(value: &Value) -> Option<i128> {
    match value {
        Value::Byte(v) => Some(i128::from(*v)),
        Value::Short(v) => Some(i128::from(*v)),
        Value::Int(v) => Some(i128::from(*v)),
        Value::Long(v) => Some(i128::from(*v)),
        Value::BigInteger(v) => Some(*v),
        Value::BigDecimal(unscaled, scale) => {
            Some(unscaled / 10i128.checked_pow(u32::from(*scale))?)
        }
        Value::Float(f) => float_to_integer(f64::from(*f)),
        Value::Double(f) => float_to_integer(*f),
        _ => None,
    }
}

/// Floating view of a numeric value.
pub(crate) fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Byte(v) => Some(f64::from(*v)),
        Value::Short(v) => Some(f64::from(*v)),
        Value::Int(v) => Some(f64::from(*v)),
        Value::Long(v) => Some(*v as f64),
        Value::Float(v) => Some(f64::from(*v)),
        Value::Double(v) => Some(*v),
        Value::BigInteger(v) => Some(*v as f64),
        Value::BigDecimal(unscaled, scale) => decimal_to_string(*unscaled, *scale).parse().ok(),
        _ => None,
    }
}

fn float_to_integer(f: f64) -> Option<i128> {
    f.is_finite().then(|| f.trunc() as i128)
}

/// Parse integer text; a fractional part is dropped (`"1.9"` is `1`).
pub(crate) fn parse_integer(s: &str) -> Option<i128> {
    let s = s.trim();
    if let Ok(i) = s.parse::<i128>() {
        return Some(i);
    }
    parse_decimal(s).and_then(|(unscaled, scale)| {
        Some(unscaled / 10i128.checked_pow(u32::from(scale))?)
    })
}

/// Parse plain decimal text into `(unscaled, scale)`. Exponent notation is
/// accepted through a float round-trip.
pub(crate) fn parse_decimal(s: &str) -> Option<(i128, u8)> {
    let s = s.trim();
    if let Some(plain) = parse_plain_decimal(s) {
        return Some(plain);
    }
    let f = s.parse::<f64>().ok().filter(|f| f.is_finite())?;
    parse_plain_decimal(&f.to_string())
}

fn parse_plain_decimal(s: &str) -> Option<(i128, u8)> {
    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }
    let unscaled: i128 = format!("{int_part}{frac_part}").parse().ok()?;
    let scale = u8::try_from(frac_part.len()).ok()?;
    Some((if negative { -unscaled } else { unscaled }, scale))
}
