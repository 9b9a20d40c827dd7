use std::any::Any;
use std::fmt;

use crate::descriptor::{PrimitiveKind, TypeDescriptor};
use crate::error::MorphError;
use crate::value::{ArrayValue, Value};

/// A named, typed attribute of a bean class.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub property_type: TypeDescriptor,
    pub readable: bool,
    pub writable: bool,
}

impl PropertyDescriptor {
    /// Readable and writable property.
    pub fn new(name: impl Into<String>, property_type: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            property_type,
            readable: true,
            writable: true,
        }
    }

    pub fn readable(mut self, readable: bool) -> Self {
        self.readable = readable;
        self
    }

    pub fn writable(mut self, writable: bool) -> Self {
        self.writable = writable;
        self
    }
}

/// Default constructor of a bean class.
pub type Constructor = fn() -> Box<dyn BeanObject>;

/// Explicit schema of a record type: its name, its properties in
/// declaration order and how to create an empty instance.
///
/// Usually produced by `#[derive(Bean)]` and kept in a `static`.
#[derive(Debug)]
pub struct BeanClass {
    name: String,
    properties: Vec<PropertyDescriptor>,
    constructor: Option<Constructor>,
}

impl BeanClass {
    pub fn new(name: impl Into<String>, properties: Vec<PropertyDescriptor>) -> Self {
        Self {
            name: name.into(),
            properties,
            constructor: None,
        }
    }

    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = Some(constructor);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Create an empty instance through the default constructor.
    pub fn instantiate(&self) -> Result<BeanRef, MorphError> {
        let constructor = self.constructor.ok_or_else(|| {
            MorphError::Instantiation(format!("{}: no default constructor", self.name))
        })?;
        Ok(BeanRef(constructor()))
    }
}

/// Statically typed bean. Implemented by `#[derive(Bean)]`.
pub trait Bean: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    fn bean_class() -> &'static BeanClass;

    fn get_property(&self, name: &str) -> Result<Value, MorphError>;

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), MorphError>;
}

/// Object-safe view of a bean, used behind `Value::Bean`.
pub trait BeanObject: Any + Send + Sync + fmt::Debug {
    fn class(&self) -> &'static BeanClass;
    fn read_property(&self, name: &str) -> Result<Value, MorphError>;
    fn write_property(&mut self, name: &str, value: Value) -> Result<(), MorphError>;
    fn clone_box(&self) -> Box<dyn BeanObject>;
    fn eq_dyn(&self, other: &dyn BeanObject) -> bool;
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Bean> BeanObject for T {
    fn class(&self) -> &'static BeanClass {
        <T as Bean>::bean_class()
    }

    fn read_property(&self, name: &str) -> Result<Value, MorphError> {
        Bean::get_property(self, name)
    }

    fn write_property(&mut self, name: &str, value: Value) -> Result<(), MorphError> {
        Bean::set_property(self, name, value)
    }

    fn clone_box(&self) -> Box<dyn BeanObject> {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn BeanObject) -> bool {
        other.as_any().downcast_ref::<T>().is_some_and(|o| self == o)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Owned, clonable handle to any bean instance.
pub struct BeanRef(Box<dyn BeanObject>);

impl BeanRef {
    pub fn new<T: Bean>(bean: T) -> Self {
        Self(Box::new(bean))
    }

    pub fn bean_class(&self) -> &'static BeanClass {
        self.0.class()
    }

    pub fn get(&self, name: &str) -> Result<Value, MorphError> {
        self.0.read_property(name)
    }

    pub fn set(&mut self, name: &str, value: Value) -> Result<(), MorphError> {
        self.0.write_property(name, value)
    }

    pub fn downcast_ref<T: Bean>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Take the concrete bean out, `None` when it is of another class.
    pub fn downcast<T: Bean>(self) -> Option<T> {
        self.0.into_any().downcast::<T>().ok().map(|b| *b)
    }
}

impl Clone for BeanRef {
    fn clone(&self) -> Self {
        Self(self.0.clone_box())
    }
}

impl PartialEq for BeanRef {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_dyn(other.0.as_ref())
    }
}

impl fmt::Debug for BeanRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

// ---------------------------------------------------------------------------
// PropertyValue: Rust field types ↔ descriptors and values
// ---------------------------------------------------------------------------

/// A Rust type that can back a bean property.
pub trait PropertyValue: Sized {
    fn type_descriptor() -> TypeDescriptor;
    fn into_value(self) -> Value;
    fn from_value(value: Value) -> Result<Self, MorphError>;
}

fn mismatch(expected: TypeDescriptor, found: &Value) -> MorphError {
    MorphError::Unsupported {
        message: format!("can not assign {} value {found:?}", found.type_of()),
        target: expected,
    }
}

macro_rules! scalar_property {
    ($($ty:ty => $kind:ident, $variant:ident);* $(;)?) => {
        $(
            impl PropertyValue for $ty {
                fn type_descriptor() -> TypeDescriptor {
                    TypeDescriptor::Primitive(PrimitiveKind::$kind)
                }

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                fn from_value(value: Value) -> Result<Self, MorphError> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(mismatch(Self::type_descriptor(), &other)),
                    }
                }
            }

            impl PropertyValue for Option<$ty> {
                fn type_descriptor() -> TypeDescriptor {
                    TypeDescriptor::Wrapper(PrimitiveKind::$kind)
                }

                fn into_value(self) -> Value {
                    self.map_or(Value::Null, Value::$variant)
                }

                fn from_value(value: Value) -> Result<Self, MorphError> {
                    match value {
                        Value::Null => Ok(None),
                        Value::$variant(v) => Ok(Some(v)),
                        other => Err(mismatch(Self::type_descriptor(), &other)),
                    }
                }
            }
        )*
    };
}

scalar_property! {
    bool => Boolean, Bool;
    char => Char, Char;
    i8 => Byte, Byte;
    i16 => Short, Short;
    i32 => Int, Int;
    i64 => Long, Long;
    f32 => Float, Float;
    f64 => Double, Double;
}

impl PropertyValue for String {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::String
    }

    fn into_value(self) -> Value {
        Value::String(self)
    }

    fn from_value(value: Value) -> Result<Self, MorphError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(mismatch(TypeDescriptor::String, &other)),
        }
    }
}

impl PropertyValue for Option<String> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::String
    }

    fn into_value(self) -> Value {
        self.map_or(Value::Null, Value::String)
    }

    fn from_value(value: Value) -> Result<Self, MorphError> {
        match value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            other => Err(mismatch(TypeDescriptor::String, &other)),
        }
    }
}

impl PropertyValue for i128 {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::BigInteger
    }

    fn into_value(self) -> Value {
        Value::BigInteger(self)
    }

    fn from_value(value: Value) -> Result<Self, MorphError> {
        match value {
            Value::BigInteger(v) => Ok(v),
            other => Err(mismatch(TypeDescriptor::BigInteger, &other)),
        }
    }
}

impl PropertyValue for Option<i128> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::BigInteger
    }

    fn into_value(self) -> Value {
        self.map_or(Value::Null, Value::BigInteger)
    }

    fn from_value(value: Value) -> Result<Self, MorphError> {
        match value {
            Value::Null => Ok(None),
            Value::BigInteger(v) => Ok(Some(v)),
            other => Err(mismatch(TypeDescriptor::BigInteger, &other)),
        }
    }
}

/// `Value` backs an `Object` property and takes anything.
impl PropertyValue for Value {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::Object
    }

    fn into_value(self) -> Value {
        self
    }

    fn from_value(value: Value) -> Result<Self, MorphError> {
        Ok(value)
    }
}

impl<T: PropertyValue> PropertyValue for Vec<T> {
    fn type_descriptor() -> TypeDescriptor {
        T::type_descriptor().array_of()
    }

    fn into_value(self) -> Value {
        let items = self.into_iter().map(PropertyValue::into_value).collect();
        Value::Array(ArrayValue::new(T::type_descriptor(), items))
    }

    fn from_value(value: Value) -> Result<Self, MorphError> {
        match value {
            Value::Array(array) => array.into_items().into_iter().map(T::from_value).collect(),
            other => Err(mismatch(Self::type_descriptor(), &other)),
        }
    }
}
