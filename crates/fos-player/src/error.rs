//! Player errors

use fos_media::{FullscreenError, MediaError};

/// Player error
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    /// Missing or malformed configuration: bad sources, unknown states,
    /// double initialization.
    #[error("Configuration error: {0}")]
    Config(String),
    
    /// Source index out of range or property not found
    #[error("Lookup error: {0}")]
    Lookup(String),
    
    /// The platform failed to load the current source
    #[error("Load error: {0}")]
    Load(String),
    
    #[error("Fullscreen error: {0}")]
    Fullscreen(#[from] FullscreenError),
    
    #[error("Media error: {0}")]
    Media(#[from] MediaError),
    
    /// A plugin failed to initialize; the widget is unusable
    #[error("Plugin '{plugin}' failed: {message}")]
    Plugin { plugin: String, message: String },
}

impl PlayerError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
    
    pub(crate) fn lookup(message: impl Into<String>) -> Self {
        Self::Lookup(message.into())
    }
}

/// Player result
pub type Result<T> = std::result::Result<T, PlayerError>;
