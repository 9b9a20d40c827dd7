use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

use crate::bean::BeanClass;
use crate::error::MorphError;
use crate::value::Value;

/// Scalar kinds that exist both as a primitive slot and as a nullable wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Boolean,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 8] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Char,
        PrimitiveKind::Byte,
        PrimitiveKind::Short,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
    ];

    /// Name of the primitive slot (`int`, `double`, ...).
    pub fn primitive_name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }

    /// Name of the nullable wrapper (`Integer`, `Double`, ...).
    pub fn wrapper_name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "Boolean",
            PrimitiveKind::Char => "Character",
            PrimitiveKind::Byte => "Byte",
            PrimitiveKind::Short => "Short",
            PrimitiveKind::Int => "Integer",
            PrimitiveKind::Long => "Long",
            PrimitiveKind::Float => "Float",
            PrimitiveKind::Double => "Double",
        }
    }

    /// The value a primitive slot holds when nothing was assigned.
    pub fn zero(self) -> Value {
        match self {
            PrimitiveKind::Boolean => Value::Bool(false),
            PrimitiveKind::Char => Value::Char('\0'),
            PrimitiveKind::Byte => Value::Byte(0),
            PrimitiveKind::Short => Value::Short(0),
            PrimitiveKind::Int => Value::Int(0),
            PrimitiveKind::Long => Value::Long(0),
            PrimitiveKind::Float => Value::Float(0.0),
            PrimitiveKind::Double => Value::Double(0.0),
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, PrimitiveKind::Boolean | PrimitiveKind::Char)
    }
}

/// Handle to a registered bean class.
///
/// Two handles are equal when they name the same class.
#[derive(Clone, Copy)]
pub struct BeanType(&'static BeanClass);

impl BeanType {
    pub fn of(class: &'static BeanClass) -> Self {
        Self(class)
    }

    pub fn class(&self) -> &'static BeanClass {
        self.0
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }
}

// Identity is the `'static` class itself; two classes sharing a display
// name are still different types.
impl PartialEq for BeanType {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl Eq for BeanType {}

impl Hash for BeanType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.0, state);
    }
}

impl fmt::Debug for BeanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BeanType").field(&self.0.name()).finish()
    }
}

/// Identifier of a data type. Used as the registry key and as the declared
/// type of bean properties.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    /// Non-nullable scalar slot (`int`).
    Primitive(PrimitiveKind),
    /// Nullable boxed scalar (`Integer`).
    Wrapper(PrimitiveKind),
    String,
    BigInteger,
    BigDecimal,
    /// A type descriptor carried as a value.
    Class,
    /// Universal object type; accepts any non-primitive value.
    Object,
    Collection,
    Map,
    /// Abstract type that can not be instantiated.
    Interface(Arc<str>),
    /// Dynamic property bag.
    DynaBean,
    Bean(BeanType),
    Array(Box<TypeDescriptor>),
}

impl TypeDescriptor {
    pub fn bean(class: &'static BeanClass) -> Self {
        TypeDescriptor::Bean(BeanType::of(class))
    }

    pub fn interface(name: impl Into<Arc<str>>) -> Self {
        TypeDescriptor::Interface(name.into())
    }

    /// Wrap this type into a one-level array of it.
    pub fn array_of(self) -> Self {
        TypeDescriptor::Array(Box::new(self))
    }

    /// Wrap this type into `dims` levels of arrays.
    pub fn array_of_dims(self, dims: usize) -> Self {
        (0..dims).fold(self, |ty, _| ty.array_of())
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeDescriptor::Primitive(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeDescriptor::Array(_))
    }

    /// Element type of an array, `None` for anything else.
    pub fn component(&self) -> Option<&TypeDescriptor> {
        match self {
            TypeDescriptor::Array(component) => Some(component),
            _ => None,
        }
    }

    /// Number of array levels (`0` for non-arrays).
    pub fn dimensions(&self) -> usize {
        let mut dims = 0;
        let mut ty = self;
        while let TypeDescriptor::Array(component) = ty {
            dims += 1;
            ty = component;
        }
        dims
    }

    /// Type with every array level stripped.
    pub fn innermost(&self) -> &TypeDescriptor {
        let mut ty = self;
        while let TypeDescriptor::Array(component) = ty {
            ty = component;
        }
        ty
    }

    /// Whether a value declared as `source` can be stored into a slot of
    /// this type without conversion.
    pub fn is_assignable_from(&self, source: &TypeDescriptor) -> bool {
        if self == source {
            return true;
        }
        match (self, source) {
            (TypeDescriptor::Object, source) => !source.is_primitive(),
            (TypeDescriptor::Array(target), TypeDescriptor::Array(source)) => {
                !target.is_primitive()
                    && !source.is_primitive()
                    && target.is_assignable_from(source)
            }
            _ => false,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive(kind) => f.write_str(kind.primitive_name()),
            TypeDescriptor::Wrapper(kind) => f.write_str(kind.wrapper_name()),
            TypeDescriptor::String => f.write_str("String"),
            TypeDescriptor::BigInteger => f.write_str("BigInteger"),
            TypeDescriptor::BigDecimal => f.write_str("BigDecimal"),
            TypeDescriptor::Class => f.write_str("Class"),
            TypeDescriptor::Object => f.write_str("Object"),
            TypeDescriptor::Collection => f.write_str("Collection"),
            TypeDescriptor::Map => f.write_str("Map"),
            TypeDescriptor::Interface(name) => f.write_str(name),
            TypeDescriptor::DynaBean => f.write_str("DynaBean"),
            TypeDescriptor::Bean(bean) => f.write_str(bean.name()),
            TypeDescriptor::Array(component) => write!(f, "{component}[]"),
        }
    }
}

impl FromStr for TypeDescriptor {
    type Err = MorphError;

    /// Parse a built-in type name, e.g. `int`, `Integer`, `String[][]`.
    ///
    /// Bean and interface types have no textual form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(component) = s.strip_suffix("[]") {
            return Ok(component.parse::<TypeDescriptor>()?.array_of());
        }

        if let Some(kind) = PrimitiveKind::ALL.iter().find(|k| k.primitive_name() == s) {
            return Ok(TypeDescriptor::Primitive(*kind));
        }
        if let Some(kind) = PrimitiveKind::ALL
            .iter()
            .find(|k| k.wrapper_name() == s || (**k == PrimitiveKind::Char && s == "Char"))
        {
            return Ok(TypeDescriptor::Wrapper(*kind));
        }

        match s {
            "String" => Ok(TypeDescriptor::String),
            "BigInteger" => Ok(TypeDescriptor::BigInteger),
            "BigDecimal" => Ok(TypeDescriptor::BigDecimal),
            "Class" => Ok(TypeDescriptor::Class),
            "Object" => Ok(TypeDescriptor::Object),
            "Collection" => Ok(TypeDescriptor::Collection),
            "Map" => Ok(TypeDescriptor::Map),
            "DynaBean" => Ok(TypeDescriptor::DynaBean),
            other => Err(MorphError::UnknownType(other.to_string())),
        }
    }
}

impl TryFrom<String> for TypeDescriptor {
    type Error = MorphError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl<'de> serde::Deserialize<'de> for TypeDescriptor {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

impl serde::Serialize for TypeDescriptor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
