use std::fmt;

use crate::descriptor::TypeDescriptor;

/// Why a type was rejected as a bean-mapping target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidTarget {
    Primitive,
    Array,
    Interface,
    DynaBean,
    Wrapper,
    String,
    Collection,
    Map,
    /// Any other built-in type that is not a record (`Object`, `Class`, ...).
    NotABean,
}

impl fmt::Display for InvalidTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            InvalidTarget::Primitive => "target is a primitive",
            InvalidTarget::Array => "target is an array",
            InvalidTarget::Interface => "target is an interface",
            InvalidTarget::DynaBean => "target is a DynaBean",
            InvalidTarget::Wrapper => "target is a primitive wrapper",
            InvalidTarget::String => "target is a String",
            InvalidTarget::Collection => "target is a Collection",
            InvalidTarget::Map => "target is a Map",
            InvalidTarget::NotABean => "target is not a bean",
        };
        f.write_str(reason)
    }
}

/// The single domain error raised by morphers, the registry and bean mapping.
#[derive(Debug, thiserror::Error)]
pub enum MorphError {
    /// Invalid morpher configuration, raised at construction time.
    #[error("invalid morpher: {0}")]
    Construction(String),

    #[error("{target} can not be morphed into a bean: {reason}")]
    InvalidBeanTarget {
        target: TypeDescriptor,
        reason: InvalidTarget,
    },

    /// The value's shape does not match what the morpher operates on.
    #[error("unsupported input for {target}: {message}")]
    Unsupported {
        target: TypeDescriptor,
        message: String,
    },

    #[error("can not morph '{value}' to {target}")]
    Unparseable {
        target: TypeDescriptor,
        value: String,
    },

    #[error("Can't find a morpher for target class {target} ({property})")]
    NoMorpher {
        target: TypeDescriptor,
        property: String,
    },

    #[error("can not instantiate {0}")]
    Instantiation(String),

    #[error("property '{property}' of {bean}: {message}")]
    Property {
        bean: String,
        property: String,
        message: String,
    },

    #[error("unknown type '{0}'")]
    UnknownType(String),

    /// Any foreign failure surfaced through a morpher.
    #[error("{0}")]
    Cause(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl MorphError {
    pub fn construction(msg: impl Into<String>) -> Self {
        Self::Construction(msg.into())
    }

    pub fn unsupported(target: TypeDescriptor, msg: impl Into<String>) -> Self {
        Self::Unsupported {
            target,
            message: msg.into(),
        }
    }

    pub fn unparseable(target: TypeDescriptor, value: impl fmt::Debug) -> Self {
        Self::Unparseable {
            target,
            value: format!("{value:?}"),
        }
    }

    pub fn property(
        bean: impl Into<String>,
        property: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::Property {
            bean: bean.into(),
            property: property.into(),
            message: msg.into(),
        }
    }

    /// Wrap a foreign error. Domain errors are returned unchanged.
    pub fn cause(e: impl std::error::Error + Send + Sync + 'static) -> Self {
        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(e);
        match boxed.downcast::<MorphError>() {
            Ok(domain) => *domain,
            Err(other) => Self::Cause(other),
        }
    }
}

impl From<serde_json::Error> for MorphError {
    fn from(e: serde_json::Error) -> Self {
        Self::cause(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::PrimitiveKind;

    #[test]
    fn test_no_morpher_message_names_property() {
        let err = MorphError::NoMorpher {
            target: TypeDescriptor::Primitive(PrimitiveKind::Int),
            property: "integer".into(),
        };
        assert_eq!(
            err.to_string(),
            "Can't find a morpher for target class int (integer)"
        );
    }

    #[test]
    fn test_cause_keeps_domain_errors() {
        let err = MorphError::cause(MorphError::UnknownType("Widget".into()));
        assert!(matches!(err, MorphError::UnknownType(_)));

        let io = std::io::Error::other("disk");
        assert!(matches!(MorphError::cause(io), MorphError::Cause(_)));
    }
}
