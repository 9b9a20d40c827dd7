use std::sync::Arc;

use morph_api::descriptor::TypeDescriptor;
use morph_api::error::MorphError;
use morph_api::morpher::{IdentityMorpher, Morpher};
use morph_api::value::Value;

use crate::registry::MorpherRegistry;

impl MorpherRegistry {
    /// Convert `value` to `target`.
    ///
    /// - `Null`: the first morpher for `target` decides (default, zero or
    ///   `Null`). With nothing registered a primitive target yields its zero.
    /// - Otherwise: the first morpher, in registration order, that supports
    ///   the value's runtime type converts it. When none does, the value is
    ///   passed through unchanged.
    ///
    /// Errors raised by the chosen morpher propagate as they are.
    pub fn convert(&self, target: &TypeDescriptor, value: &Value) -> Result<Value, MorphError> {
        if value.is_null() {
            let morpher = self.resolve(target);
            if IdentityMorpher::is_identity(morpher.as_ref()) {
                if let TypeDescriptor::Primitive(kind) = target {
                    return Ok(kind.zero());
                }
            }
            tracing::trace!(morphs_to = %target, kind = ?morpher.kind(), "morphing null");
            return morpher.morph(value);
        }

        let source = value.type_of();
        for morpher in self.candidates(target) {
            if morpher.supports(&source) {
                tracing::trace!(
                    morphs_to = %target,
                    source = %source,
                    morpher = ?morpher,
                    "dispatching"
                );
                return morpher.morph(value);
            }
        }

        tracing::debug!(
            morphs_to = %target,
            source = %source,
            "no morpher supports source, passing through"
        );
        Ok(value.clone())
    }

    /// The morpher `convert` would start from for `target`: the first one
    /// registered, or the identity morpher.
    ///
    /// A multi-dimensional array type with nothing registered of its own
    /// resolves through the one-dimensional array of its innermost type;
    /// array morphers recurse through the remaining levels themselves.
    pub fn resolve(&self, target: &TypeDescriptor) -> Arc<dyn Morpher> {
        self.candidates(target)
            .into_iter()
            .next()
            .unwrap_or_else(crate::registry::identity)
    }

    fn candidates(&self, target: &TypeDescriptor) -> Vec<Arc<dyn Morpher>> {
        let found = self.lookup_all(target);
        let only_identity = found.iter().all(|m| IdentityMorpher::is_identity(m.as_ref()));
        if only_identity && target.dimensions() > 1 {
            return self.lookup_all(&target.innermost().clone().array_of());
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;
    use std::sync::Arc;

    use morph_api::descriptor::PrimitiveKind;
    use morph_api::morpher::same_morpher;

    use super::*;
    use crate::array::ArrayMorpher;
    use crate::morphers::{PrimitiveMorpher, WrapperMorpher};

    /// Only accepts strings; used to check that dispatch skips morphers
    /// that do not support the runtime type.
    #[derive(Debug, PartialEq)]
    struct StringsOnly;

    impl Morpher for StringsOnly {
        fn morphs_to(&self) -> TypeDescriptor {
            TypeDescriptor::Wrapper(PrimitiveKind::Int)
        }

        fn supports(&self, source: &TypeDescriptor) -> bool {
            *source == TypeDescriptor::String
        }

        fn morph(&self, _value: &Value) -> Result<Value, MorphError> {
            Ok(Value::Int(-1))
        }

        fn same_as(&self, other: &dyn Morpher) -> bool {
            same_morpher(self, other)
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    const INT: TypeDescriptor = TypeDescriptor::Primitive(PrimitiveKind::Int);
    const INTEGER: TypeDescriptor = TypeDescriptor::Wrapper(PrimitiveKind::Int);

    #[test]
    fn test_identity_fallback_passes_value_through() {
        let registry = MorpherRegistry::new();
        let value = Value::from("24");
        assert_eq!(registry.convert(&INTEGER, &value).unwrap(), value);
    }

    #[test]
    fn test_null_primitive_vs_wrapper() {
        let registry = MorpherRegistry::new();
        assert_eq!(registry.convert(&INT, &Value::Null).unwrap(), Value::Int(0));
        assert_eq!(registry.convert(&INTEGER, &Value::Null).unwrap(), Value::Null);

        registry.register(Arc::new(PrimitiveMorpher::new(PrimitiveKind::Int)), false);
        registry.register(Arc::new(WrapperMorpher::new(PrimitiveKind::Int)), false);
        assert_eq!(registry.convert(&INT, &Value::Null).unwrap(), Value::Int(0));
        assert_eq!(registry.convert(&INTEGER, &Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_null_uses_configured_default() {
        let registry = MorpherRegistry::new();
        let morpher = WrapperMorpher::with_default(PrimitiveKind::Int, Value::Int(7)).unwrap();
        registry.register(Arc::new(morpher), false);
        assert_eq!(registry.convert(&INTEGER, &Value::Null).unwrap(), Value::Int(7));
    }

    #[test]
    fn test_first_supporting_morpher_wins() {
        let registry = MorpherRegistry::new();
        registry.register(Arc::new(StringsOnly), false);
        registry.register(Arc::new(WrapperMorpher::new(PrimitiveKind::Int)), false);

        assert_eq!(registry.convert(&INTEGER, &Value::from("5")).unwrap(), Value::Int(-1));
        assert_eq!(registry.convert(&INTEGER, &Value::Long(5)).unwrap(), Value::Int(5));
    }

    #[test]
    fn test_unsupported_source_passes_through() {
        let registry = MorpherRegistry::new();
        registry.register(Arc::new(StringsOnly), false);
        assert_eq!(registry.convert(&INTEGER, &Value::Long(5)).unwrap(), Value::Long(5));
    }

    #[test]
    fn test_morpher_errors_propagate() {
        let registry = MorpherRegistry::new();
        registry.register(Arc::new(PrimitiveMorpher::new(PrimitiveKind::Int)), false);
        let err = registry.convert(&INT, &Value::from("x")).unwrap_err();
        assert!(matches!(err, MorphError::Unparseable { .. }));
    }

    #[test]
    fn test_multi_dimensional_target_uses_array_morpher() {
        let registry = MorpherRegistry::new();
        let inner = Arc::new(PrimitiveMorpher::new(PrimitiveKind::Int));
        registry.register(Arc::new(ArrayMorpher::new(inner).unwrap()), false);

        let source = Value::from_json_str(r#"[["1", "2"], ["3"]]"#).unwrap();
        let target = INT.array_of_dims(2);
        let converted = registry.convert(&target, &source).unwrap();

        assert_eq!(converted.type_of(), target);
        assert!(!IdentityMorpher::is_identity(registry.resolve(&target).as_ref()));
    }
}
