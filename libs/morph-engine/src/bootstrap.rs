use std::path::Path;
use std::sync::Arc;

use morph_api::bean::{Bean, PropertyValue};
use morph_api::descriptor::TypeDescriptor;
use morph_api::error::MorphError;
use morph_api::morpher::Morpher;
use morph_api::value::Value;

use crate::bean::BeanMorpher;
use crate::config::MorphConfig;
use crate::error::EngineError;
use crate::registry::MorpherRegistry;

/// A configured morpher registry plus the bean types registered on it.
pub struct Engine {
    registry: Arc<MorpherRegistry>,
    beans: Vec<TypeDescriptor>,
    config: MorphConfig,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("registry", &self.registry)
            .field("beans", &self.beans)
            .field("config", &self.config)
            .finish()
    }
}

impl Engine {
    /// Bootstrap the engine from a parsed configuration.
    ///
    /// Builds the registry and registers the standard morphers it asks for.
    pub fn bootstrap(config: MorphConfig) -> Result<Self, EngineError> {
        let registry = Arc::new(MorpherRegistry::new());
        registry.replace_all(configured_morphers(&config)?);
        Ok(Engine {
            registry,
            beans: Vec::new(),
            config,
        })
    }

    /// Shared registry (e.g., to register custom morphers).
    pub fn registry(&self) -> &Arc<MorpherRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &MorphConfig {
        &self.config
    }

    /// Bean morpher for `target`, bound to this registry with the
    /// configured leniency. Not registered.
    pub fn bean_morpher(&self, target: &TypeDescriptor) -> Result<BeanMorpher, MorphError> {
        BeanMorpher::with_leniency(target, &self.registry, self.config.bean.lenient)
    }

    /// Register a bean morpher for the derived bean `T`.
    pub fn register_bean<T: Bean + PropertyValue>(&mut self) -> Result<(), EngineError> {
        let target = T::type_descriptor();
        let morpher = self.bean_morpher(&target)?;
        self.registry.register(Arc::new(morpher), false);
        tracing::info!(
            bean = %target,
            lenient = self.config.bean.lenient,
            "registered bean morpher"
        );
        if !self.beans.contains(&target) {
            self.beans.push(target);
        }
        Ok(())
    }

    pub fn convert(&self, target: &TypeDescriptor, value: &Value) -> Result<Value, MorphError> {
        self.registry.convert(target, value)
    }

    /// Convert into a typed Rust value.
    pub fn convert_into<T: PropertyValue>(&self, value: &Value) -> Result<T, MorphError> {
        T::from_value(self.convert(&T::type_descriptor(), value)?)
    }

    /// Apply a new configuration.
    ///
    /// The registry is rebuilt in place, so handles obtained from
    /// [`Engine::registry`] stay valid. Registered bean types are
    /// re-registered with the new leniency; custom morphers are dropped.
    /// The new set is built in full first and swapped in at once: a failed
    /// reload leaves the registry untouched and concurrent conversions never
    /// see it empty.
    pub fn reload(&mut self, new_config: MorphConfig) -> Result<(), EngineError> {
        let mut morphers = configured_morphers(&new_config)?;
        for target in &self.beans {
            let morpher =
                BeanMorpher::with_leniency(target, &self.registry, new_config.bean.lenient)?;
            morphers.push(Arc::new(morpher));
        }

        self.registry.replace_all(morphers);
        self.config = new_config;
        tracing::info!(beans = self.beans.len(), "config reload complete");
        Ok(())
    }

    /// Reload from a TOML config file.
    pub fn reload_from_file(&mut self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        let config = MorphConfig::load(path)?;
        self.reload(config)
    }
}

fn configured_morphers(config: &MorphConfig) -> Result<Vec<Arc<dyn Morpher>>, EngineError> {
    if !config.registry.standard {
        tracing::info!("standard morphers disabled");
        return Ok(Vec::new());
    }
    let morphers = config
        .registry
        .standard_morphers()
        .morphers()
        .map_err(|e| EngineError::from(e).with_context("registry"))?;
    tracing::info!(
        count = morphers.len(),
        arrays = config.registry.arrays,
        use_defaults = config.registry.use_defaults,
        overrides = config.registry.defaults.len(),
        "built standard morphers"
    );
    Ok(morphers)
}
