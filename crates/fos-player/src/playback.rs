//! Playback signals and commands
//!
//! Platform media signals drive the lifecycle states and are re-dispatched
//! on the widget bus as `media.*` events.

use serde_json::json;

use crate::error::{PlayerError, Result};
use crate::event::{names as events, Event};
use crate::player::Player;
use crate::state::names as states;

/// A signal raised by the platform media element
#[derive(Debug, Clone, PartialEq)]
pub enum MediaSignal {
    CanPlay,
    Play,
    Playing,
    Pause,
    Ended,
    TimeUpdate,
    VolumeChange,
    LoadedMetadata,
    /// The current source failed to load
    Error(String),
}

impl MediaSignal {
    /// Bus event the signal is forwarded as
    pub fn event_name(&self) -> &'static str {
        match self {
            MediaSignal::CanPlay => events::MEDIA_CANPLAY,
            MediaSignal::Play => events::MEDIA_PLAY,
            MediaSignal::Playing => events::MEDIA_PLAYING,
            MediaSignal::Pause => events::MEDIA_PAUSE,
            MediaSignal::Ended => events::MEDIA_ENDED,
            MediaSignal::TimeUpdate => events::MEDIA_TIMEUPDATE,
            MediaSignal::VolumeChange => events::MEDIA_VOLUMECHANGE,
            MediaSignal::LoadedMetadata => events::MEDIA_LOADEDMETADATA,
            MediaSignal::Error(_) => events::SOURCE_ERROR,
        }
    }
}

/// Outcome of audio detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundDetection {
    Available,
    None,
    Unknown,
}

impl Player {
    /// Feed a platform media signal.
    ///
    /// A load error moves the widget to `error`, dispatches `source.error`
    /// and is then returned as [`PlayerError::Load`].
    pub fn handle_media_signal(&mut self, signal: MediaSignal) -> Result<()> {
        self.ensure_live()?;
        let result = self.apply_signal(signal);
        self.finish(result)
    }
    
    fn apply_signal(&mut self, signal: MediaSignal) -> Result<()> {
        let registry = &mut self.scope.component.states;
        match &signal {
            MediaSignal::CanPlay => {
                if registry.is(states::LOADING)? {
                    registry.set(states::PLAYABLE)?;
                    registry.set(states::PAUSED)?;
                }
            }
            MediaSignal::Play | MediaSignal::Playing => registry.set(states::PLAYING)?,
            MediaSignal::Pause => registry.set(states::PAUSED)?,
            MediaSignal::Ended => registry.set(states::ENDED)?,
            MediaSignal::LoadedMetadata => {
                self.detect_sound_with()?;
            }
            MediaSignal::TimeUpdate | MediaSignal::VolumeChange => {}
            MediaSignal::Error(message) => {
                registry.set(states::ERROR)?;
                tracing::warn!(src = ?self.scope.component.current_src(), %message, "media failed to load");
                self.dispatch_event(Event::new(
                    events::SOURCE_ERROR,
                    json!({ "event": { "type": "error", "message": message } }),
                    false,
                ))?;
                return Err(PlayerError::Load(message.clone()));
            }
        }
        self.dispatch_event(Event::notify(signal.event_name()))?;
        Ok(())
    }
    
    /// Ask the media element to play
    pub fn play(&mut self) -> Result<()> {
        self.ensure_live()?;
        let result = self.scope.component.media.play().map_err(PlayerError::from);
        self.finish(result)
    }
    
    /// Ask the media element to pause
    pub fn pause(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.scope.component.media.pause();
        self.finish(Ok(()))
    }
    
    /// Play when paused, pause otherwise
    pub fn toggle_play(&mut self) -> Result<()> {
        self.ensure_live()?;
        let result = self.toggle_play_with();
        self.finish(result)
    }
    
    pub(crate) fn toggle_play_with(&mut self) -> Result<()> {
        let media = &mut self.scope.component.media;
        if media.paused() {
            media.play()?;
        } else {
            media.pause();
        }
        Ok(())
    }
    
    /// Detect whether the loaded resource has audio and reflect it in the
    /// `soundAvailable` / `soundNone` / `soundUnknown` states
    pub fn detect_sound(&mut self) -> Result<SoundDetection> {
        self.ensure_live()?;
        let result = self.detect_sound_with();
        self.finish(result)
    }
    
    fn detect_sound_with(&mut self) -> Result<SoundDetection> {
        let component = &mut self.scope.component;
        let (detection, state, event) = match component.media.has_audio() {
            Some(true) => (SoundDetection::Available, states::SOUND_AVAILABLE, events::SOUND_AVAILABLE),
            Some(false) => (SoundDetection::None, states::SOUND_NONE, events::SOUND_NONE),
            None => (SoundDetection::Unknown, states::SOUND_UNKNOWN, events::SOUND_UNKNOWN),
        };
        component.states.set(state)?;
        self.dispatch_event(Event::notify(event))?;
        Ok(detection)
    }
}
