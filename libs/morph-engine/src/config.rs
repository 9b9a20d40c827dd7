use std::path::Path;

use morph_api::descriptor::TypeDescriptor;
use morph_api::value::Value;
use serde::Deserialize;

use crate::error::EngineError;
use crate::standard::StandardMorphers;

/// Root configuration, parsed from TOML or any [`ConfigParser`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MorphConfig {
    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub bean: BeanConfig,
}

/// Which morphers the registry starts with.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// Register the standard leaf morphers.
    #[serde(default = "default_true")]
    pub standard: bool,

    /// Wrap every standard leaf morpher into an array morpher too.
    #[serde(default = "default_true")]
    pub arrays: bool,

    /// Give the standard morphers their documented default values.
    #[serde(default = "default_true")]
    pub use_defaults: bool,

    /// Per-type default overrides.
    #[serde(default)]
    pub defaults: Vec<DefaultValueConfig>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            standard: true,
            arrays: true,
            use_defaults: true,
            defaults: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DefaultValueConfig {
    #[serde(rename = "type")]
    pub target: TypeDescriptor,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BeanConfig {
    /// Skip bean properties without a morpher instead of failing.
    #[serde(default)]
    pub lenient: bool,
}

impl RegistryConfig {
    /// Standard morpher set described by this section.
    pub fn standard_morphers(&self) -> StandardMorphers {
        self.defaults.iter().fold(
            StandardMorphers::new()
                .arrays(self.arrays)
                .use_defaults(self.use_defaults),
            |set, d| set.default_for(d.target.clone(), Value::from_json(&d.value)),
        )
    }
}

/// Turns configuration text into a [`MorphConfig`].
pub trait ConfigParser {
    /// File extensions (without the dot) this parser handles.
    fn extensions(&self) -> &[&str];

    fn parse(&self, content: &str) -> Result<MorphConfig, EngineError>;
}

pub struct TomlParser;

impl ConfigParser for TomlParser {
    fn extensions(&self) -> &[&str] {
        &["toml"]
    }

    fn parse(&self, content: &str) -> Result<MorphConfig, EngineError> {
        MorphConfig::parse(content)
    }
}

impl MorphConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        Self::load_with(path, &[&TomlParser])
    }

    /// Load configuration, picking the parser by file extension.
    pub fn load_with(
        path: impl AsRef<Path>,
        parsers: &[&dyn ConfigParser],
    ) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        let parser = parsers
            .iter()
            .find(|p| p.extensions().contains(&extension))
            .ok_or_else(|| {
                EngineError::Config(format!("no config parser for extension '{extension}'"))
            })?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("{}: {e}", path.display())))?;
        parser
            .parse(&content)
            .map_err(|e| e.with_context(path.display()))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, EngineError> {
        toml::from_str(toml_str).map_err(|e| EngineError::Config(e.to_string()))
    }
}
