use morph_api::error::MorphError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("config error: {0}")]
    Config(String),

    #[error("morph error: {0}")]
    Morph(#[from] MorphError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Add context to the error.
    ///
    /// `Config` gets the context prepended; a `Morph` error becomes a
    /// `Config` error carrying the context and the original message.
    pub fn with_context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            EngineError::Config(msg) => EngineError::Config(format!("{ctx}: {msg}")),
            EngineError::Morph(e) => EngineError::Config(format!("{ctx}: {e}")),
            other => other,
        }
    }
}
