use crate::bean::BeanRef;
use crate::descriptor::{PrimitiveKind, TypeDescriptor};
use crate::dyna::DynaBean;

/// Nullable runtime value: the input and output of every morpher.
///
/// Strategy by type:
/// - Scalars: one variant per primitive kind, reported as the wrapper type
///   (a `Value` is always a nullable handle).
/// - BigDecimal: `(unscaled, scale)`, e.g. `1.50` is `(150, 2)`.
/// - Array: declared component type + items, recursively nested.
/// - Bean / DynaBean / Map: record-like sources and targets of bean mapping.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Char(char),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    BigInteger(i128),
    BigDecimal(i128, u8),
    String(String),
    Class(TypeDescriptor),

    Array(ArrayValue),
    /// String-keyed entries in insertion order.
    Map(Vec<(String, Value)>),
    Bean(BeanRef),
    DynaBean(DynaBean),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Convenience constructor for an array value.
    pub fn array(component: TypeDescriptor, items: Vec<Value>) -> Self {
        Value::Array(ArrayValue::new(component, items))
    }

    /// Runtime type of this value. `Null` has no type of its own and
    /// reports `Object`.
    pub fn type_of(&self) -> TypeDescriptor {
        match self {
            Value::Null => TypeDescriptor::Object,
            Value::Bool(_) => TypeDescriptor::Wrapper(PrimitiveKind::Boolean),
            Value::Char(_) => TypeDescriptor::Wrapper(PrimitiveKind::Char),
            Value::Byte(_) => TypeDescriptor::Wrapper(PrimitiveKind::Byte),
            Value::Short(_) => TypeDescriptor::Wrapper(PrimitiveKind::Short),
            Value::Int(_) => TypeDescriptor::Wrapper(PrimitiveKind::Int),
            Value::Long(_) => TypeDescriptor::Wrapper(PrimitiveKind::Long),
            Value::Float(_) => TypeDescriptor::Wrapper(PrimitiveKind::Float),
            Value::Double(_) => TypeDescriptor::Wrapper(PrimitiveKind::Double),
            Value::BigInteger(_) => TypeDescriptor::BigInteger,
            Value::BigDecimal(_, _) => TypeDescriptor::BigDecimal,
            Value::String(_) => TypeDescriptor::String,
            Value::Class(_) => TypeDescriptor::Class,
            Value::Array(array) => array.type_descriptor(),
            Value::Map(_) => TypeDescriptor::Map,
            Value::Bean(bean) => TypeDescriptor::bean(bean.bean_class()),
            Value::DynaBean(_) => TypeDescriptor::DynaBean,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayValue> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Homogeneous array: every item is either `Null` or a value of `component`.
///
/// Nested arrays are items whose component is itself an array type; each
/// sub-array carries its own length, so jagged shapes are representable.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    component: TypeDescriptor,
    items: Vec<Value>,
}

impl ArrayValue {
    pub fn new(component: TypeDescriptor, items: Vec<Value>) -> Self {
        Self { component, items }
    }

    pub fn component(&self) -> &TypeDescriptor {
        &self.component
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Value> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn type_descriptor(&self) -> TypeDescriptor {
        self.component.clone().array_of()
    }

    /// Number of array levels, derived from the declared component type.
    pub fn dimensions(&self) -> usize {
        1 + self.component.dimensions()
    }
}

// ---------------------------------------------------------------------------
// From impls: Rust scalars → Value
// ---------------------------------------------------------------------------

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    char => Char,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    i128 => BigInteger,
    String => String,
    TypeDescriptor => Class,
    ArrayValue => Array,
    DynaBean => DynaBean,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_runtime_type_is_wrapper() {
        assert_eq!(Value::Int(3).type_of(), TypeDescriptor::Wrapper(PrimitiveKind::Int));
        assert_eq!(Value::from("x").type_of(), TypeDescriptor::String);
        assert_eq!(Value::Null.type_of(), TypeDescriptor::Object);
    }

    #[test]
    fn test_nested_array_dimensions() {
        let inner = Value::array(TypeDescriptor::String, vec!["1".into()]);
        let outer = Value::array(TypeDescriptor::String.array_of(), vec![inner]);

        let array = outer.as_array().unwrap();
        assert_eq!(array.dimensions(), 2);
        assert_eq!(outer.type_of(), TypeDescriptor::String.array_of_dims(2));
    }

    #[test]
    fn test_option_into_value() {
        assert_eq!(Value::from(Some(5i32)), Value::Int(5));
        assert_eq!(Value::from(None::<i32>), Value::Null);
    }
}
