//! fOS Media
//!
//! Platform media surface driven by fOS widgets.
//!
//! Features:
//! - `MediaElement` playback surface with a headless HTMLVideoElement
//! - Audio track reporting
//! - Fullscreen requests

pub mod element;
pub mod tracks;
pub mod fullscreen;

pub use element::{
    HTMLVideoElement, MediaElement, MediaSource,
    NetworkState, ReadyState,
};
pub use tracks::{AudioTrack, AudioTrackList};
pub use fullscreen::{FullscreenManager, FullscreenError};

/// Media error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MediaError {
    #[error("Not supported: {0}")]
    NotSupported(String),
    
    #[error("Invalid state: {0}")]
    InvalidState(String),
    
    #[error("Aborted: {0}")]
    Aborted(String),
}
