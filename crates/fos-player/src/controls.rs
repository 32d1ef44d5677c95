//! Control surface gestures
//!
//! Raw presses on the control surface are debounced into single and double
//! clicks. The host supplies timestamps; a pending single click is released
//! by [`Player::poll`] once the double-click window has passed.

use std::time::Duration;

use serde_json::json;

use crate::config::Config;
use crate::error::Result;
use crate::event::{names as events, Event};
use crate::player::Player;

/// Default double-click window
pub const DEFAULT_DBLCLICK_DELAY: Duration = Duration::from_millis(250);

/// Debounced gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Click,
    DoubleClick,
}

impl Gesture {
    fn event_name(self) -> &'static str {
        match self {
            Gesture::Click => events::CONTROLS_CLICK,
            Gesture::DoubleClick => events::CONTROLS_DBLCLICK,
        }
    }
    
    fn kind(self) -> &'static str {
        match self {
            Gesture::Click => "click",
            Gesture::DoubleClick => "dblclick",
        }
    }
}

/// Single/double click debouncer
#[derive(Debug, Clone)]
pub struct ClickDebouncer {
    delay: Duration,
    pending: Option<Duration>,
}

impl ClickDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }
    
    /// Window from `controls.dblclickDelay` (milliseconds)
    pub fn from_config(config: &Config) -> Self {
        let delay = config
            .get_f64("controls.dblclickDelay")
            .filter(|ms| *ms >= 0.0)
            .map_or(DEFAULT_DBLCLICK_DELAY, |ms| Duration::from_millis(ms as u64));
        Self::new(delay)
    }
    
    pub fn delay(&self) -> Duration {
        self.delay
    }
    
    /// Register a press at `now`.
    ///
    /// Returns a double click when it pairs with a pending press, or the
    /// stale pending click when the window had already expired.
    pub fn press(&mut self, now: Duration) -> Option<Gesture> {
        match self.pending.take() {
            Some(first) if now.saturating_sub(first) <= self.delay => Some(Gesture::DoubleClick),
            Some(_) => {
                self.pending = Some(now);
                Some(Gesture::Click)
            }
            None => {
                self.pending = Some(now);
                None
            }
        }
    }
    
    /// Release a pending single click whose window expired by `now`
    pub fn poll(&mut self, now: Duration) -> Option<Gesture> {
        match self.pending {
            Some(first) if now.saturating_sub(first) > self.delay => {
                self.pending = None;
                Some(Gesture::Click)
            }
            _ => None,
        }
    }
    
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Player {
    /// Feed a raw press on the control surface
    pub fn controls_press(&mut self, now: Duration) -> Result<Option<Gesture>> {
        self.ensure_live()?;
        let gesture = self.clicks.press(now);
        let result = match gesture {
            Some(gesture) => self.gesture(gesture, now).map(|_| Some(gesture)),
            None => Ok(None),
        };
        self.finish(result)
    }
    
    /// Release a pending single click if its window expired
    pub fn poll(&mut self, now: Duration) -> Result<Option<Gesture>> {
        self.ensure_live()?;
        let gesture = self.clicks.poll(now);
        let result = match gesture {
            Some(gesture) => self.gesture(gesture, now).map(|_| Some(gesture)),
            None => Ok(None),
        };
        self.finish(result)
    }
    
    /// Dispatch a gesture; a single click toggles playback
    fn gesture(&mut self, gesture: Gesture, now: Duration) -> Result<()> {
        let detail = json!({
            "event": { "type": gesture.kind(), "timeStamp": now.as_millis() as u64 }
        });
        self.dispatch_event(Event::new(gesture.event_name(), detail, false))?;
        if gesture == Gesture::Click && self.current_source().is_some() {
            self.toggle_play_with()?;
        }
        Ok(())
    }
}
