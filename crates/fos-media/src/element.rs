//! Media Elements
//!
//! The playback surface a widget drives, and a headless video element.

use crate::tracks::AudioTrackList;
use crate::MediaError;

/// Network state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NetworkState {
    #[default]
    Empty = 0,
    Idle = 1,
    Loading = 2,
    NoSource = 3,
}

/// Ready state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    #[default]
    HaveNothing = 0,
    HaveMetadata = 1,
    HaveCurrentData = 2,
    HaveFutureData = 3,
    HaveEnoughData = 4,
}

/// A `<source>` child of a media element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSource {
    pub src: String,
    pub mime_type: String,
}

impl MediaSource {
    pub fn new(src: &str, mime_type: &str) -> Self {
        Self {
            src: src.to_string(),
            mime_type: mime_type.to_string(),
        }
    }
}

/// Platform media element.
///
/// Decoding, buffering and rendering stay on the platform side; callers only
/// swap sources, issue commands and read back playback properties. Volume is
/// linear in `0.0..=1.0`.
pub trait MediaElement: std::fmt::Debug {
    /// Replace the attached source element, `None` detaches it
    fn set_source(&mut self, source: Option<MediaSource>);
    fn source(&self) -> Option<&MediaSource>;
    
    /// Start loading the attached source
    fn load(&mut self);
    fn play(&mut self) -> Result<(), MediaError>;
    fn pause(&mut self);
    fn paused(&self) -> bool;
    
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, time: f64);
    fn duration(&self) -> f64;
    
    fn volume(&self) -> f64;
    fn set_volume(&mut self, volume: f64);
    fn muted(&self) -> bool;
    fn set_muted(&mut self, muted: bool);
    
    fn poster(&self) -> Option<&str>;
    fn set_poster(&mut self, poster: Option<&str>);
    
    /// Whether the loaded resource has audio, `None` if unknown
    fn has_audio(&self) -> Option<bool>;
}

/// Headless HTML video element.
///
/// Tracks the same properties a browser element would, without decoding.
/// Hosts feed readiness through [`HTMLVideoElement::set_ready_state`].
#[derive(Debug)]
pub struct HTMLVideoElement {
    source: Option<MediaSource>,
    poster: Option<String>,
    
    pub network_state: NetworkState,
    pub ready_state: ReadyState,
    
    current_time: f64,
    duration: f64,
    paused: bool,
    pub ended: bool,
    
    volume: f64,
    muted: bool,
    
    pub audio_tracks: AudioTrackList,
    
    /// Number of `load()` calls, useful for asserting source swaps
    pub load_count: u32,
}

impl HTMLVideoElement {
    pub fn new() -> Self {
        Self {
            source: None,
            poster: None,
            network_state: NetworkState::Empty,
            ready_state: ReadyState::HaveNothing,
            current_time: 0.0,
            duration: f64::NAN,
            paused: true,
            ended: false,
            volume: 1.0,
            muted: false,
            audio_tracks: AudioTrackList::Unreported,
            load_count: 0,
        }
    }
    
    /// Update readiness as reported by the decoder
    pub fn set_ready_state(&mut self, state: ReadyState) {
        self.ready_state = state;
        if state >= ReadyState::HaveMetadata {
            self.network_state = NetworkState::Idle;
        }
    }
    
    /// Set the resource duration once metadata is known
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration;
    }
}

impl MediaElement for HTMLVideoElement {
    fn set_source(&mut self, source: Option<MediaSource>) {
        self.network_state = if source.is_some() {
            NetworkState::Idle
        } else {
            NetworkState::NoSource
        };
        self.source = source;
    }
    
    fn source(&self) -> Option<&MediaSource> {
        self.source.as_ref()
    }
    
    fn load(&mut self) {
        self.load_count += 1;
        self.network_state = if self.source.is_some() {
            NetworkState::Loading
        } else {
            NetworkState::NoSource
        };
        self.ready_state = ReadyState::HaveNothing;
        self.audio_tracks = AudioTrackList::Unreported;
        self.current_time = 0.0;
        self.duration = f64::NAN;
        self.paused = true;
        self.ended = false;
    }
    
    fn play(&mut self) -> Result<(), MediaError> {
        if self.source.is_none() {
            return Err(MediaError::InvalidState("no source attached".into()));
        }
        if self.ready_state < ReadyState::HaveFutureData {
            return Err(MediaError::Aborted("not enough data".into()));
        }
        self.paused = false;
        self.ended = false;
        Ok(())
    }
    
    fn pause(&mut self) {
        self.paused = true;
    }
    
    fn paused(&self) -> bool {
        self.paused
    }
    
    fn current_time(&self) -> f64 {
        self.current_time
    }
    
    fn set_current_time(&mut self, time: f64) {
        self.current_time = if self.duration.is_finite() {
            time.clamp(0.0, self.duration)
        } else {
            time.max(0.0)
        };
    }
    
    fn duration(&self) -> f64 {
        self.duration
    }
    
    fn volume(&self) -> f64 {
        self.volume
    }
    
    fn set_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0.0, 1.0);
    }
    
    fn muted(&self) -> bool {
        self.muted
    }
    
    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
    
    fn poster(&self) -> Option<&str> {
        self.poster.as_deref()
    }
    
    fn set_poster(&mut self, poster: Option<&str>) {
        self.poster = poster.map(str::to_string);
    }
    
    fn has_audio(&self) -> Option<bool> {
        self.audio_tracks.has_audio()
    }
}

impl Default for HTMLVideoElement {
    fn default() -> Self {
        Self::new()
    }
}
