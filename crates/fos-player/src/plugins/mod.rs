//! Bundled plugins

pub mod fullscreen;
pub mod progress;
pub mod responsive;
pub mod sound;
pub mod tracking;

pub use fullscreen::FullscreenPlugin;
pub use progress::ProgressPlugin;
pub use responsive::{BreakpointMatcher, ResponsivePlugin, ViewportMatcher, RESPONSIVE_SETTER};
pub use sound::SoundPlugin;
pub use tracking::{Tracker, TrackingEvent, TrackingPlugin};
