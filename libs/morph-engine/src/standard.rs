//! The standard morpher set: one leaf morpher per scalar type, optionally
//! wrapped into array morphers.

use std::collections::HashMap;
use std::sync::Arc;

use morph_api::descriptor::{PrimitiveKind, TypeDescriptor};
use morph_api::error::MorphError;
use morph_api::morpher::Morpher;
use morph_api::value::Value;

use crate::array::ArrayMorpher;
use crate::morphers::{
    BigDecimalMorpher, BigIntegerMorpher, ClassMorpher, PrimitiveMorpher, StringMorpher,
    WrapperMorpher,
};
use crate::registry::MorpherRegistry;

/// Every type the standard set has a leaf morpher for, in registration order.
pub fn standard_types() -> Vec<TypeDescriptor> {
    let mut types: Vec<TypeDescriptor> = PrimitiveKind::ALL
        .iter()
        .map(|kind| TypeDescriptor::Primitive(*kind))
        .collect();
    types.extend(PrimitiveKind::ALL.iter().map(|kind| TypeDescriptor::Wrapper(*kind)));
    types.extend([
        TypeDescriptor::String,
        TypeDescriptor::BigInteger,
        TypeDescriptor::BigDecimal,
        TypeDescriptor::Class,
    ]);
    types
}

/// Documented default for a standard type: zero for numbers and chars,
/// `false` for booleans. `String` and `Class` have none (absent stays
/// absent).
pub fn standard_default(ty: &TypeDescriptor) -> Option<Value> {
    match ty {
        TypeDescriptor::Primitive(kind) | TypeDescriptor::Wrapper(kind) => Some(kind.zero()),
        TypeDescriptor::BigInteger => Some(Value::BigInteger(0)),
        TypeDescriptor::BigDecimal => Some(Value::BigDecimal(0, 0)),
        _ => None,
    }
}

/// Leaf morpher for `ty`, with an optional default.
pub fn leaf_morpher(
    ty: &TypeDescriptor,
    default: Option<Value>,
) -> Result<Arc<dyn Morpher>, MorphError> {
    let morpher: Arc<dyn Morpher> = match (ty, default) {
        (TypeDescriptor::Primitive(kind), None) => Arc::new(PrimitiveMorpher::new(*kind)),
        (TypeDescriptor::Primitive(kind), Some(d)) => {
            Arc::new(PrimitiveMorpher::with_default(*kind, d)?)
        }
        (TypeDescriptor::Wrapper(kind), None) => Arc::new(WrapperMorpher::new(*kind)),
        (TypeDescriptor::Wrapper(kind), Some(d)) => {
            Arc::new(WrapperMorpher::with_default(*kind, d)?)
        }
        (TypeDescriptor::BigInteger, None) => Arc::new(BigIntegerMorpher::new()),
        (TypeDescriptor::BigInteger, Some(d)) => Arc::new(BigIntegerMorpher::with_default(d)?),
        (TypeDescriptor::BigDecimal, None) => Arc::new(BigDecimalMorpher::new()),
        (TypeDescriptor::BigDecimal, Some(d)) => Arc::new(BigDecimalMorpher::with_default(d)?),
        (TypeDescriptor::String, None) => Arc::new(StringMorpher),
        (TypeDescriptor::Class, None) => Arc::new(ClassMorpher),
        (ty @ (TypeDescriptor::String | TypeDescriptor::Class), Some(_)) => {
            return Err(MorphError::construction(format!(
                "{ty} morpher takes no default value"
            )));
        }
        (ty, _) => {
            return Err(MorphError::construction(format!("no standard morpher for {ty}")));
        }
    };
    Ok(morpher)
}

/// Builder for the standard morpher set.
///
/// ```ignore
/// let count = StandardMorphers::new()
///     .default_for(TypeDescriptor::Primitive(PrimitiveKind::Int), -1)
///     .register(&registry)?;
/// ```
#[derive(Debug, Clone)]
pub struct StandardMorphers {
    arrays: bool,
    use_defaults: bool,
    defaults: HashMap<TypeDescriptor, Value>,
}

impl Default for StandardMorphers {
    fn default() -> Self {
        Self {
            arrays: true,
            use_defaults: true,
            defaults: HashMap::new(),
        }
    }
}

impl StandardMorphers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also register an array morpher around every leaf morpher.
    pub fn arrays(mut self, arrays: bool) -> Self {
        self.arrays = arrays;
        self
    }

    /// Give leaf morphers their documented defaults.
    pub fn use_defaults(mut self, use_defaults: bool) -> Self {
        self.use_defaults = use_defaults;
        self
    }

    /// Explicit default for one type; applies even without `use_defaults`.
    pub fn default_for(mut self, ty: TypeDescriptor, value: impl Into<Value>) -> Self {
        self.defaults.insert(ty, value.into());
        self
    }

    pub fn morphers(&self) -> Result<Vec<Arc<dyn Morpher>>, MorphError> {
        if let Some(unknown) = self.defaults.keys().find(|ty| {
            standard_default(ty).is_none()
                && !matches!(ty, TypeDescriptor::String | TypeDescriptor::Class)
        }) {
            return Err(MorphError::construction(format!(
                "no standard morpher for {unknown}"
            )));
        }

        let mut morphers = Vec::new();
        for ty in standard_types() {
            let default = match self.defaults.get(&ty) {
                Some(value) => Some(value.clone()),
                None if self.use_defaults => standard_default(&ty),
                None => None,
            };
            let leaf = leaf_morpher(&ty, default)?;
            if self.arrays {
                morphers.push(
                    Arc::new(ArrayMorpher::new(Arc::clone(&leaf))?) as Arc<dyn Morpher>,
                );
            }
            morphers.push(leaf);
        }
        Ok(morphers)
    }

    /// Register the set; returns how many morphers were offered.
    pub fn register(&self, registry: &MorpherRegistry) -> Result<usize, MorphError> {
        let morphers = self.morphers()?;
        let count = morphers.len();
        for morpher in morphers {
            registry.register(morpher, false);
        }
        tracing::debug!(
            count,
            arrays = self.arrays,
            use_defaults = self.use_defaults,
            "registered standard morphers"
        );
        Ok(count)
    }
}

/// Register the standard set with documented defaults and array morphers.
pub fn register_standard_morphers(registry: &MorpherRegistry) -> Result<usize, MorphError> {
    StandardMorphers::new().register(registry)
}

#[cfg(test)]
mod tests {
    use morph_api::morpher::IdentityMorpher;

    use super::*;

    const INT: TypeDescriptor = TypeDescriptor::Primitive(PrimitiveKind::Int);
    const INTEGER: TypeDescriptor = TypeDescriptor::Wrapper(PrimitiveKind::Int);

    #[test]
    fn test_registers_every_leaf_and_array() {
        let registry = MorpherRegistry::new();
        let count = register_standard_morphers(&registry).unwrap();
        assert_eq!(count, standard_types().len() * 2);

        for ty in standard_types() {
            assert!(!IdentityMorpher::is_identity(registry.lookup_one(&ty).as_ref()), "{ty}");
            assert!(!IdentityMorpher::is_identity(registry.lookup_one(&ty.array_of()).as_ref()));
        }
    }

    #[test]
    fn test_registering_twice_is_deduplicated() {
        let registry = MorpherRegistry::new();
        register_standard_morphers(&registry).unwrap();
        register_standard_morphers(&registry).unwrap();
        assert_eq!(registry.lookup_all(&INT).len(), 1);
    }

    #[test]
    fn test_documented_defaults() {
        let registry = MorpherRegistry::new();
        register_standard_morphers(&registry).unwrap();

        assert_eq!(registry.convert(&INTEGER, &Value::Null).unwrap(), Value::Int(0));
        assert_eq!(registry.convert(&INT, &Value::from("x")).unwrap(), Value::Int(0));
        assert_eq!(
            registry
                .convert(&TypeDescriptor::Primitive(PrimitiveKind::Char), &Value::Null)
                .unwrap(),
            Value::Char('\0')
        );
        assert_eq!(registry.convert(&TypeDescriptor::String, &Value::Null).unwrap(), Value::Null);
        assert_eq!(
            registry.convert(&TypeDescriptor::BigDecimal, &Value::from("")).unwrap(),
            Value::BigDecimal(0, 0)
        );
    }

    #[test]
    fn test_without_defaults() {
        let registry = MorpherRegistry::new();
        StandardMorphers::new().use_defaults(false).arrays(false).register(&registry).unwrap();

        assert_eq!(registry.convert(&INTEGER, &Value::Null).unwrap(), Value::Null);
        assert!(registry.convert(&INT, &Value::from("x")).is_err());
        assert!(IdentityMorpher::is_identity(registry.lookup_one(&INT.array_of()).as_ref()));
    }

    #[test]
    fn test_default_override() {
        let registry = MorpherRegistry::new();
        StandardMorphers::new().default_for(INT, -1).register(&registry).unwrap();
        assert_eq!(registry.convert(&INT, &Value::from("x")).unwrap(), Value::Int(-1));

        let arrays = INT.array_of();
        let source = Value::from_json_str(r#"["7", "x"]"#).unwrap();
        assert_eq!(
            registry.convert(&arrays, &source).unwrap(),
            Value::array(INT, vec![Value::Int(7), Value::Int(-1)])
        );
    }

    #[test]
    fn test_invalid_defaults() {
        assert!(StandardMorphers::new().default_for(INT, "ten").morphers().is_err());
        assert!(
            StandardMorphers::new()
                .default_for(TypeDescriptor::String, "")
                .morphers()
                .is_err()
        );
        assert!(StandardMorphers::new().default_for(TypeDescriptor::Map, 1).morphers().is_err());
    }
}
