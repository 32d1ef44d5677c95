//! Debug sink handed to the widget and its plugins.

use std::fmt::Display;

/// Labelled debug output routed through `tracing`.
#[derive(Debug, Clone)]
pub struct DebugSink {
    label: String,
    enabled: bool,
}

impl DebugSink {
    pub fn new(label: &str, enabled: bool) -> Self {
        Self {
            label: label.to_string(),
            enabled,
        }
    }
    
    /// A sink that drops everything
    pub fn disabled() -> Self {
        Self::new("player", false)
    }
    
    /// Child sink labelled `parent/name`, sharing the enabled flag
    pub fn scoped(&self, name: &str) -> Self {
        Self {
            label: format!("{}/{}", self.label, name),
            enabled: self.enabled,
        }
    }
    
    pub fn label(&self) -> &str {
        &self.label
    }
    
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
    
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
    
    pub fn log(&self, message: impl Display) {
        if self.enabled {
            tracing::debug!(widget = %self.label, "{}", message);
        }
    }
}

impl Default for DebugSink {
    fn default() -> Self {
        Self::disabled()
    }
}
