use crate::descriptor::TypeDescriptor;
use crate::error::MorphError;
use crate::value::Value;

/// Dynamic property bag: a record whose property set and types are defined
/// by a runtime schema instead of a declared bean class.
///
/// Declared properties that were never set read as `Null`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DynaBean {
    schema: Vec<(String, TypeDescriptor)>,
    values: Vec<(String, Value)>,
}

impl DynaBean {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`DynaBean::define`] + [`DynaBean::set`].
    pub fn with(
        mut self,
        name: impl Into<String>,
        property_type: TypeDescriptor,
        value: impl Into<Value>,
    ) -> Self {
        let name = name.into();
        self.define(name.clone(), property_type);
        self.put(name, value.into());
        self
    }

    /// Declare (or re-declare) a property.
    pub fn define(&mut self, name: impl Into<String>, property_type: TypeDescriptor) {
        let name = name.into();
        if let Some(entry) = self.schema.iter_mut().find(|(k, _)| k == &name) {
            entry.1 = property_type;
        } else {
            self.schema.push((name, property_type));
        }
    }

    /// Set a declared property. Undeclared names are rejected.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), MorphError> {
        if self.property_type(name).is_none() {
            return Err(MorphError::property(
                "DynaBean",
                name,
                "property is not declared",
            ));
        }
        self.put(name.to_string(), value.into());
        Ok(())
    }

    /// Value of a declared property, `None` for undeclared names.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.property_type(name)?;
        Some(
            self.values
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v)
                .unwrap_or(&Value::Null),
        )
    }

    pub fn property_type(&self, name: &str) -> Option<&TypeDescriptor> {
        self.schema.iter().find(|(k, _)| k == name).map(|(_, t)| t)
    }

    /// Declared properties in declaration order.
    pub fn schema(&self) -> &[(String, TypeDescriptor)] {
        &self.schema
    }

    fn put(&mut self, name: String, value: Value) {
        if let Some(entry) = self.values.iter_mut().find(|(k, _)| k == &name) {
            entry.1 = value;
        } else {
            self.values.push((name, value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::PrimitiveKind;

    #[test]
    fn test_declared_property_reads_null_until_set() {
        let mut bag = DynaBean::new();
        bag.define("count", TypeDescriptor::Primitive(PrimitiveKind::Int));

        assert_eq!(bag.get("count"), Some(&Value::Null));
        bag.set("count", 3).unwrap();
        assert_eq!(bag.get("count"), Some(&Value::Int(3)));
        assert_eq!(bag.get("missing"), None);
    }

    #[test]
    fn test_set_undeclared_fails() {
        let mut bag = DynaBean::new();
        assert!(matches!(
            bag.set("name", "x"),
            Err(MorphError::Property { .. })
        ));
    }

    #[test]
    fn test_schema_keeps_declaration_order() {
        let bag = DynaBean::new()
            .with("b", TypeDescriptor::String, "1")
            .with("a", TypeDescriptor::String, "2");
        let names: Vec<&str> = bag.schema().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
    }
}
