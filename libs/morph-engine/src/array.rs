use std::any::Any;
use std::sync::Arc;

use morph_api::descriptor::TypeDescriptor;
use morph_api::error::MorphError;
use morph_api::morpher::{Morpher, MorpherKind};
use morph_api::value::{ArrayValue, Value};

/// Converts arrays of any depth by running a scalar morpher over the
/// innermost elements.
///
/// Registered under `inner.morphs_to()[]`. Deeper arrays are handled by
/// recursion: shape and per-level lengths are preserved exactly, so jagged
/// input stays jagged.
#[derive(Debug, Clone)]
pub struct ArrayMorpher {
    inner: Arc<dyn Morpher>,
    target: TypeDescriptor,
}

impl ArrayMorpher {
    pub fn new(inner: Arc<dyn Morpher>) -> Result<Self, MorphError> {
        let element = inner.morphs_to();
        if element.is_array() {
            return Err(MorphError::construction(format!(
                "array morpher can not wrap a morpher for array type {element}"
            )));
        }
        if inner.as_any().is::<ArrayMorpher>() {
            return Err(MorphError::construction(
                "array morpher can not wrap another array morpher",
            ));
        }
        Ok(Self {
            target: element.array_of(),
            inner,
        })
    }

    pub fn inner(&self) -> &Arc<dyn Morpher> {
        &self.inner
    }

    fn element(&self) -> &TypeDescriptor {
        // `target` is always `element[]`
        self.target.component().unwrap_or(&TypeDescriptor::Object)
    }

    fn morph_array(&self, array: &ArrayValue, dims: usize) -> Result<Value, MorphError> {
        if dims == 1 {
            return self.morph_leaves(array);
        }
        let component = self.element().clone().array_of_dims(dims - 1);
        let items = array
            .items()
            .iter()
            .map(|item| match item {
                Value::Null => Ok(Value::Null),
                Value::Array(sub) => self.morph_array(sub, dims - 1),
                other => Err(MorphError::unsupported(
                    component.clone(),
                    format!("expected a nested array, got {}", other.type_of()),
                )),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::array(component, items))
    }

    fn morph_leaves(&self, array: &ArrayValue) -> Result<Value, MorphError> {
        let element = self.element().clone();
        if self.inner.kind() == MorpherKind::Object
            && self.inner.default_value() == Some(&Value::Null)
        {
            return Ok(Value::array(element, vec![Value::Null; array.len()]));
        }
        let items = array
            .items()
            .iter()
            .map(|item| self.inner.morph(item))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::array(element, items))
    }
}

/// Array levels of a value. Sub-arrays may declare a looser component
/// (`Object` for an empty JSON array) than their siblings, so the items are
/// inspected as well as the declared type.
fn depth(array: &ArrayValue) -> usize {
    let nested = array
        .items()
        .iter()
        .filter_map(Value::as_array)
        .map(depth)
        .max()
        .unwrap_or(0);
    array.dimensions().max(1 + nested)
}

impl PartialEq for ArrayMorpher {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target && self.inner.same_as(other.inner.as_ref())
    }
}

impl Morpher for ArrayMorpher {
    fn morphs_to(&self) -> TypeDescriptor {
        self.target.clone()
    }

    fn supports(&self, source: &TypeDescriptor) -> bool {
        source.is_array()
    }

    fn morph(&self, value: &Value) -> Result<Value, MorphError> {
        let array = match value {
            Value::Null => return Ok(Value::Null),
            Value::Array(array) => array,
            _ => return Err(MorphError::unsupported(self.morphs_to(), "argument is not an array")),
        };
        let source = array.type_descriptor();
        if source.innermost() == self.element() {
            return Ok(value.clone());
        }
        self.morph_array(array, depth(array))
    }

    fn same_as(&self, other: &dyn Morpher) -> bool {
        other
            .as_any()
            .downcast_ref::<ArrayMorpher>()
            .is_some_and(|other| self == other)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
