use morph_engine::config::{ConfigParser, MorphConfig};
use morph_engine::error::EngineError;

/// Reads `MorphConfig` from HCL.
///
/// ```hcl
/// registry {
///   arrays   = false
///   defaults = [{ type = "int", value = -1 }]
/// }
///
/// bean {
///   lenient = true
/// }
/// ```
pub struct HclParser;

impl ConfigParser for HclParser {
    fn extensions(&self) -> &[&str] {
        &["hcl"]
    }

    fn parse(&self, content: &str) -> Result<MorphConfig, EngineError> {
        hcl::from_str(content).map_err(|e| EngineError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use morph_api::descriptor::{PrimitiveKind, TypeDescriptor};
    use morph_engine::config::TomlParser;

    use super::*;

    #[test]
    fn test_block_syntax() {
        let config = HclParser
            .parse(
                r#"
                registry {
                  arrays   = false
                  defaults = [{ type = "int", value = -1 }]
                }

                bean {
                  lenient = true
                }
                "#,
            )
            .unwrap();

        assert!(config.registry.standard);
        assert!(!config.registry.arrays);
        assert!(config.bean.lenient);
        assert_eq!(
            config.registry.defaults[0].target,
            TypeDescriptor::Primitive(PrimitiveKind::Int)
        );
        assert_eq!(config.registry.defaults[0].value, serde_json::json!(-1));
    }

    #[test]
    fn test_invalid_hcl() {
        assert!(matches!(
            HclParser.parse("registry {"),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn test_load_with_hcl_file() {
        let path = std::env::temp_dir().join(format!("morph-{}.hcl", std::process::id()));
        std::fs::write(&path, "bean {\n  lenient = true\n}\n").unwrap();

        let config = MorphConfig::load_with(&path, &[&TomlParser, &HclParser]).unwrap();
        assert!(config.bean.lenient);

        std::fs::remove_file(&path).unwrap();
    }
}
