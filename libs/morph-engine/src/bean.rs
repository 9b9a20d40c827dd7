use std::any::Any;
use std::sync::{Arc, Weak};

use morph_api::bean::{BeanClass, BeanRef, PropertyDescriptor};
use morph_api::descriptor::TypeDescriptor;
use morph_api::dyna::DynaBean;
use morph_api::error::{InvalidTarget, MorphError};
use morph_api::morpher::{IdentityMorpher, Morpher};
use morph_api::value::Value;

use crate::registry::MorpherRegistry;

/// Maps any bean-like value (bean, `DynaBean` or `Map`) onto a new instance
/// of a target bean class, property by property and by name.
///
/// Each property whose type differs between source and target is converted
/// through the registry. When no morpher exists for a property type the
/// mapping fails, or in lenient mode skips the property and leaves its
/// default in place.
///
/// Any other non-array value has no properties to read and maps to a
/// default-initialized instance.
///
/// Holds the registry weakly so it can itself be registered there.
/// Cyclic bean graphs are not detected.
#[derive(Debug, Clone)]
pub struct BeanMorpher {
    target: TypeDescriptor,
    class: &'static BeanClass,
    registry: Weak<MorpherRegistry>,
    lenient: bool,
}

impl BeanMorpher {
    /// Strict bean morpher for `target`.
    pub fn new(
        target: &TypeDescriptor,
        registry: &Arc<MorpherRegistry>,
    ) -> Result<Self, MorphError> {
        Self::with_leniency(target, registry, false)
    }

    pub fn with_leniency(
        target: &TypeDescriptor,
        registry: &Arc<MorpherRegistry>,
        lenient: bool,
    ) -> Result<Self, MorphError> {
        let class = bean_class_of(target)?;
        Ok(Self {
            target: target.clone(),
            class,
            registry: Arc::downgrade(registry),
            lenient,
        })
    }

    pub fn is_lenient(&self) -> bool {
        self.lenient
    }

    fn registry(&self) -> Result<Arc<MorpherRegistry>, MorphError> {
        self.registry.upgrade().ok_or_else(|| {
            MorphError::construction(format!(
                "bean morpher for {} outlived its registry",
                self.target
            ))
        })
    }

    /// Value to store into `property`, `None` to leave it untouched.
    fn property_value(
        &self,
        registry: &MorpherRegistry,
        property: &PropertyDescriptor,
        source_type: &TypeDescriptor,
        value: Value,
    ) -> Result<Option<Value>, MorphError> {
        let target = &property.property_type;

        if target.is_assignable_from(source_type) {
            if value.is_null() && target.is_primitive() {
                return registry.convert(target, &value).map(Some);
            }
            return Ok(Some(value));
        }

        if *target == TypeDescriptor::Object {
            return Ok(Some(value));
        }

        if value.is_null() {
            if target.is_primitive() {
                return registry.convert(target, &value).map(Some);
            }
            return Ok(Some(value));
        }

        if IdentityMorpher::is_identity(registry.resolve(target).as_ref()) {
            if !self.lenient {
                return Err(MorphError::NoMorpher {
                    target: target.clone(),
                    property: property.name.clone(),
                });
            }
            tracing::warn!(
                bean = %self.target,
                property = %property.name,
                "can't find a morpher for target class {target}, property skipped"
            );
            return Ok(None);
        }

        registry.convert(target, &value).map(Some)
    }
}

/// Class of a valid bean-mapping target; every other kind of type is
/// rejected with its own reason.
fn bean_class_of(target: &TypeDescriptor) -> Result<&'static BeanClass, MorphError> {
    let reason = match target {
        TypeDescriptor::Bean(bean) => return Ok(bean.class()),
        TypeDescriptor::Primitive(_) => InvalidTarget::Primitive,
        TypeDescriptor::Array(_) => InvalidTarget::Array,
        TypeDescriptor::Interface(_) => InvalidTarget::Interface,
        TypeDescriptor::DynaBean => InvalidTarget::DynaBean,
        TypeDescriptor::Wrapper(_) => InvalidTarget::Wrapper,
        TypeDescriptor::String => InvalidTarget::String,
        TypeDescriptor::Collection => InvalidTarget::Collection,
        TypeDescriptor::Map => InvalidTarget::Map,
        TypeDescriptor::BigInteger
        | TypeDescriptor::BigDecimal
        | TypeDescriptor::Class
        | TypeDescriptor::Object => InvalidTarget::NotABean,
    };
    Err(MorphError::InvalidBeanTarget {
        target: target.clone(),
        reason,
    })
}

/// Where property values are read from.
enum Source<'a> {
    Bean(&'a BeanRef),
    Dyna(&'a DynaBean),
    Map(&'a [(String, Value)]),
    /// A scalar, string or class value: it has no properties.
    Opaque,
}

impl Source<'_> {
    /// Declared type and value of `name`, `None` when the source has no
    /// readable property of that name.
    fn read(&self, name: &str) -> Result<Option<(TypeDescriptor, Value)>, MorphError> {
        match self {
            Source::Bean(bean) => match bean.bean_class().property(name) {
                Some(p) if p.readable => Ok(Some((p.property_type.clone(), bean.get(name)?))),
                _ => Ok(None),
            },
            Source::Dyna(dyna) => Ok(dyna
                .property_type(name)
                .map(|ty| (ty.clone(), dyna.get(name).cloned().unwrap_or_default()))),
            Source::Map(entries) => Ok(entries
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| (value.type_of(), value.clone()))),
            Source::Opaque => Ok(None),
        }
    }
}

impl PartialEq for BeanMorpher {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target
            && self.lenient == other.lenient
            && Weak::ptr_eq(&self.registry, &other.registry)
    }
}

impl Morpher for BeanMorpher {
    fn morphs_to(&self) -> TypeDescriptor {
        self.target.clone()
    }

    fn supports(&self, source: &TypeDescriptor) -> bool {
        !source.is_array()
    }

    fn morph(&self, value: &Value) -> Result<Value, MorphError> {
        let source = match value {
            Value::Null => return Ok(Value::Null),
            Value::Array(_) => {
                return Err(MorphError::unsupported(self.target.clone(), "argument is an array"))
            }
            Value::Bean(bean) => Source::Bean(bean),
            Value::DynaBean(dyna) => Source::Dyna(dyna),
            Value::Map(entries) => Source::Map(entries),
            other => {
                tracing::debug!(
                    bean = %self.target,
                    source = %other.type_of(),
                    "source has no properties, every property skipped"
                );
                Source::Opaque
            }
        };

        let registry = self.registry()?;
        let mut bean = self.class.instantiate()?;

        for property in self.class.properties() {
            if !property.writable {
                tracing::debug!(
                    bean = %self.target,
                    property = %property.name,
                    "property is not writable, skipped"
                );
                continue;
            }
            let Some((source_type, value)) = source.read(&property.name)? else {
                tracing::debug!(
                    bean = %self.target,
                    property = %property.name,
                    "source has no such property, skipped"
                );
                continue;
            };
            let Some(value) = self.property_value(&registry, property, &source_type, value)? else {
                continue;
            };
            let is_null = value.is_null();
            match bean.set(&property.name, value) {
                Ok(()) => {}
                // A null for a slot that can not hold one keeps its default.
                Err(MorphError::Property { .. }) if is_null => {
                    tracing::debug!(
                        bean = %self.target,
                        property = %property.name,
                        "null not assignable, skipped"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Ok(Value::Bean(bean))
    }

    fn same_as(&self, other: &dyn Morpher) -> bool {
        other
            .as_any()
            .downcast_ref::<BeanMorpher>()
            .is_some_and(|other| self == other)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use morph_api::bean::{Bean, PropertyValue};
    use morph_api::descriptor::PrimitiveKind;

    use super::*;
    use crate::morphers::PrimitiveMorpher;

    #[derive(Debug, Clone, PartialEq, Default, morph_api::Bean)]
    struct Reading {
        integer: String,
        label: Option<String>,
    }

    #[derive(Debug, Clone, PartialEq, Default, morph_api::Bean)]
    struct Target {
        integer: i32,
        label: Option<String>,
    }

    fn target_type() -> TypeDescriptor {
        <Target as PropertyValue>::type_descriptor()
    }

    fn source_value() -> Value {
        Reading {
            integer: "24".into(),
            label: Some("x".into()),
        }
        .into_value()
    }

    #[test]
    fn test_rejects_non_bean_targets() {
        let registry = Arc::new(MorpherRegistry::new());
        let cases = [
            (TypeDescriptor::Primitive(PrimitiveKind::Int), InvalidTarget::Primitive),
            (TypeDescriptor::Wrapper(PrimitiveKind::Int), InvalidTarget::Wrapper),
            (target_type().array_of(), InvalidTarget::Array),
            (TypeDescriptor::interface("Runnable"), InvalidTarget::Interface),
            (TypeDescriptor::DynaBean, InvalidTarget::DynaBean),
            (TypeDescriptor::String, InvalidTarget::String),
            (TypeDescriptor::Collection, InvalidTarget::Collection),
            (TypeDescriptor::Map, InvalidTarget::Map),
            (TypeDescriptor::Object, InvalidTarget::NotABean),
        ];
        for (target, expected) in cases {
            match BeanMorpher::new(&target, &registry) {
                Err(MorphError::InvalidBeanTarget { reason, .. }) => assert_eq!(reason, expected),
                other => panic!("{target}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_maps_with_type_narrowing() {
        let registry = Arc::new(MorpherRegistry::new());
        registry.register(Arc::new(PrimitiveMorpher::new(PrimitiveKind::Int)), false);
        let morpher = BeanMorpher::new(&target_type(), &registry).unwrap();

        let Value::Bean(bean) = morpher.morph(&source_value()).unwrap() else {
            panic!("expected a bean");
        };
        let target = bean.downcast::<Target>().unwrap();
        assert_eq!(target.integer, 24);
        assert_eq!(target.label.as_deref(), Some("x"));
    }

    #[test]
    fn test_strict_and_lenient() {
        let registry = Arc::new(MorpherRegistry::new());

        let strict = BeanMorpher::new(&target_type(), &registry).unwrap();
        let err = strict.morph(&source_value()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Can't find a morpher for target class int (integer)"
        );

        let lenient = BeanMorpher::with_leniency(&target_type(), &registry, true).unwrap();
        let Value::Bean(bean) = lenient.morph(&source_value()).unwrap() else {
            panic!("expected a bean");
        };
        assert_eq!(bean.downcast_ref::<Target>().unwrap().integer, 0);
    }

    #[test]
    fn test_null_and_arrays() {
        let registry = Arc::new(MorpherRegistry::new());
        let morpher = BeanMorpher::new(&target_type(), &registry).unwrap();
        assert_eq!(morpher.morph(&Value::Null).unwrap(), Value::Null);
        assert!(!morpher.supports(&TypeDescriptor::Object.array_of()));
        let array = Value::array(TypeDescriptor::Object, vec![]);
        assert!(matches!(morpher.morph(&array), Err(MorphError::Unsupported { .. })));
    }

    #[test]
    fn test_scalar_source_yields_default_bean() {
        let registry = Arc::new(MorpherRegistry::new());
        let morpher = BeanMorpher::new(&target_type(), &registry).unwrap();

        for source in [Value::from("hello"), Value::Int(3), Value::Class(TypeDescriptor::String)] {
            assert!(morpher.supports(&source.type_of()));
            let Value::Bean(bean) = morpher.morph(&source).unwrap() else {
                panic!("expected a bean for {source:?}");
            };
            assert_eq!(bean.downcast::<Target>().unwrap(), Target::default());
        }
    }

    #[test]
    fn test_dropped_registry() {
        let registry = Arc::new(MorpherRegistry::new());
        let morpher = BeanMorpher::new(&target_type(), &registry).unwrap();
        drop(registry);
        assert!(matches!(
            morpher.morph(&source_value()),
            Err(MorphError::Construction(_))
        ));
    }

    #[test]
    fn test_equality() {
        let registry = Arc::new(MorpherRegistry::new());
        let a = BeanMorpher::new(&target_type(), &registry).unwrap();
        let b = BeanMorpher::new(&target_type(), &registry).unwrap();
        let lenient = BeanMorpher::with_leniency(&target_type(), &registry, true).unwrap();
        assert!(a.same_as(&b));
        assert!(!a.same_as(&lenient));
        assert_eq!(Target::bean_class().properties().len(), 2);
    }
}
