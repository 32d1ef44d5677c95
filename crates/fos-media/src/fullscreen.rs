//! Fullscreen API
//!
//! Grants or rejects element fullscreen. At most one element is fullscreen
//! at a time; a platform without fullscreen support rejects every request.

/// Fullscreen manager
#[derive(Debug)]
pub struct FullscreenManager {
    element: Option<u64>,
    enabled: bool,
}

impl FullscreenManager {
    pub fn new() -> Self {
        Self {
            element: None,
            enabled: true,
        }
    }
    
    /// Manager for a platform that refuses every request
    pub fn disabled() -> Self {
        Self {
            element: None,
            enabled: false,
        }
    }
    
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
    
    /// Make `element_id` the fullscreen element. Repeating the request for
    /// the current element succeeds.
    pub fn request(&mut self, element_id: u64) -> Result<(), FullscreenError> {
        if !self.enabled {
            return Err(FullscreenError::NotAllowed);
        }
        match self.element {
            Some(current) if current != element_id => Err(FullscreenError::AlreadyActive(current)),
            _ => {
                self.element = Some(element_id);
                Ok(())
            }
        }
    }
    
    /// Leave fullscreen
    pub fn exit(&mut self) -> Result<u64, FullscreenError> {
        self.element.take().ok_or(FullscreenError::NotActive)
    }
    
    /// Current fullscreen element
    pub fn element(&self) -> Option<u64> {
        self.element
    }
    
    pub fn is_active(&self) -> bool {
        self.element.is_some()
    }
    
    pub fn is_active_for(&self, element_id: u64) -> bool {
        self.element == Some(element_id)
    }
}

impl Default for FullscreenManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Fullscreen error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FullscreenError {
    #[error("fullscreen request not allowed")]
    NotAllowed,
    
    #[error("element {0} is already fullscreen")]
    AlreadyActive(u64),
    
    #[error("no element is fullscreen")]
    NotActive,
}
