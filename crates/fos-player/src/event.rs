//! Event Bus
//!
//! Named, detail-carrying events delivered to listeners in registration
//! order. Listeners of a cancelable event may veto its default action.
//!
//! Dispatch is synchronous. A listener error aborts the remaining listeners
//! and is returned to the dispatcher unchanged.

use std::collections::HashMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::error::Result;

/// Event names dispatched by the player
pub mod names {
    pub const SOURCE_NONE: &str = "source.none";
    pub const SOURCE_UPDATE: &str = "source.update";
    pub const SOURCE_BEFORE: &str = "source.before";
    pub const SOURCE_SET: &str = "source.set";
    pub const SOURCE_UNSET: &str = "source.unset";
    pub const SOURCE_ERROR: &str = "source.error";
    pub const POSTER_SET: &str = "poster.set";
    pub const POSTER_UNSET: &str = "poster.unset";
    pub const SOUND_AVAILABLE: &str = "sound.available";
    pub const SOUND_NONE: &str = "sound.none";
    pub const SOUND_UNKNOWN: &str = "sound.unknown";
    pub const SOUND_MUTE: &str = "sound.mute";
    pub const SOUND_UNMUTE: &str = "sound.unmute";
    pub const CONTROLS_CLICK: &str = "controls.click";
    pub const CONTROLS_DBLCLICK: &str = "controls.dblclick";
    pub const FULLSCREEN_ENTER: &str = "fullscreen.enter";
    pub const FULLSCREEN_EXIT: &str = "fullscreen.exit";
    pub const FULLSCREEN_ERROR: &str = "fullscreen.error";
    pub const PROGRESS_UPDATE: &str = "progress.update";
    
    pub const MEDIA_CANPLAY: &str = "media.canplay";
    pub const MEDIA_PLAY: &str = "media.play";
    pub const MEDIA_PLAYING: &str = "media.playing";
    pub const MEDIA_PAUSE: &str = "media.pause";
    pub const MEDIA_ENDED: &str = "media.ended";
    pub const MEDIA_TIMEUPDATE: &str = "media.timeupdate";
    pub const MEDIA_VOLUMECHANGE: &str = "media.volumechange";
    pub const MEDIA_LOADEDMETADATA: &str = "media.loadedmetadata";
}

/// A dispatched event
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: String,
    pub detail: Value,
    pub cancelable: bool,
    default_prevented: bool,
}

impl Event {
    pub fn new(kind: &str, detail: Value, cancelable: bool) -> Self {
        Self {
            kind: kind.to_string(),
            detail,
            cancelable,
            default_prevented: false,
        }
    }
    
    /// Non-cancelable event with an empty detail
    pub fn notify(kind: &str) -> Self {
        Self::new(kind, Value::Object(Map::new()), false)
    }
    
    /// Prevent default action. Ignored unless the event is cancelable.
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }
    
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
    
    /// Detail field by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.detail.get(key)
    }
    
    /// Mutable detail field by key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.detail.get_mut(key)
    }
}

/// Listener handle returned by [`EventBus::add_listener`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Listener callback. `C` is the context every listener may mutate.
pub type Handler<C> = Box<dyn FnMut(&mut Event, &mut C) -> Result<()>>;

/// Ordered event bus
pub struct EventBus<C> {
    listeners: HashMap<String, Vec<(ListenerId, Handler<C>)>>,
    next_id: u64,
}

impl<C> EventBus<C> {
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
            next_id: 0,
        }
    }
    
    /// Append a listener for `kind`
    pub fn add_listener<F>(&mut self, kind: &str, handler: F) -> ListenerId
    where
        F: FnMut(&mut Event, &mut C) -> Result<()> + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners
            .entry(kind.to_string())
            .or_default()
            .push((id, Box::new(handler)));
        id
    }
    
    /// Remove a listener, returns false if it was not registered
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        for list in self.listeners.values_mut() {
            if let Some(pos) = list.iter().position(|(lid, _)| *lid == id) {
                drop(list.remove(pos));
                return true;
            }
        }
        false
    }
    
    pub fn listener_count(&self, kind: &str) -> usize {
        self.listeners.get(kind).map_or(0, Vec::len)
    }
    
    /// Dispatch an event, returning whether its default action may proceed
    pub fn dispatch(
        &mut self,
        cx: &mut C,
        kind: &str,
        detail: Value,
        cancelable: bool,
        default_prevented: bool,
    ) -> Result<bool> {
        let mut event = Event::new(kind, detail, cancelable);
        if default_prevented {
            event.prevent_default();
        }
        let event = self.dispatch_event(cx, event)?;
        Ok(!event.is_default_prevented())
    }
    
    /// Dispatch a prepared event and hand it back after every listener ran,
    /// so the caller can read a detail the listeners rewrote.
    pub fn dispatch_event(&mut self, cx: &mut C, mut event: Event) -> Result<Event> {
        if let Some(list) = self.listeners.get_mut(&event.kind) {
            for (_, handler) in list.iter_mut() {
                handler(&mut event, cx)?;
            }
        }
        Ok(event)
    }
}

impl<C> Default for EventBus<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for EventBus<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&str, usize> = self
            .listeners
            .iter()
            .map(|(k, v)| (k.as_str(), v.len()))
            .collect();
        f.debug_struct("EventBus")
            .field("listeners", &counts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlayerError;
    use serde_json::json;
    
    #[test]
    fn test_registration_order() {
        let mut bus: EventBus<Vec<&'static str>> = EventBus::new();
        bus.add_listener("a", |_, log| { log.push("first"); Ok(()) });
        bus.add_listener("a", |_, log| { log.push("second"); Ok(()) });
        bus.add_listener("b", |_, log| { log.push("other"); Ok(()) });
        
        let mut log = Vec::new();
        assert!(bus.dispatch(&mut log, "a", json!({}), false, false).unwrap());
        assert_eq!(log, vec!["first", "second"]);
    }
    
    #[test]
    fn test_cancelable_veto() {
        let mut bus: EventBus<()> = EventBus::new();
        bus.add_listener("x", |ev, _| { ev.prevent_default(); Ok(()) });
        
        assert!(!bus.dispatch(&mut (), "x", json!({}), true, false).unwrap());
        // Non-cancelable events cannot be vetoed
        assert!(bus.dispatch(&mut (), "x", json!({}), false, false).unwrap());
    }
    
    #[test]
    fn test_prevented_up_front() {
        let mut bus: EventBus<()> = EventBus::new();
        assert!(!bus.dispatch(&mut (), "none", json!({}), true, true).unwrap());
    }
    
    #[test]
    fn test_handler_error_aborts() {
        let mut bus: EventBus<u32> = EventBus::new();
        bus.add_listener("x", |_, n| { *n += 1; Ok(()) });
        bus.add_listener("x", |_, _| Err(PlayerError::Load("boom".into())));
        bus.add_listener("x", |_, n| { *n += 100; Ok(()) });
        
        let mut count = 0;
        let result = bus.dispatch(&mut count, "x", json!({}), false, false);
        assert!(matches!(result, Err(PlayerError::Load(_))));
        assert_eq!(count, 1);
    }
    
    #[test]
    fn test_detail_is_mutable() {
        let mut bus: EventBus<()> = EventBus::new();
        bus.add_listener("x", |ev, _| {
            if let Some(src) = ev.get_mut("src") {
                *src = json!("rewritten");
            }
            Ok(())
        });
        
        let event = bus
            .dispatch_event(&mut (), Event::new("x", json!({"src": "a"}), true))
            .unwrap();
        assert_eq!(event.get("src"), Some(&json!("rewritten")));
    }
    
    #[test]
    fn test_remove_listener() {
        let mut bus: EventBus<u32> = EventBus::new();
        let id = bus.add_listener("x", |_, n| { *n += 1; Ok(()) });
        assert_eq!(bus.listener_count("x"), 1);
        assert!(bus.remove_listener(id));
        assert!(!bus.remove_listener(id));
        
        let mut count = 0;
        bus.dispatch(&mut count, "x", json!({}), false, false).unwrap();
        assert_eq!(count, 0);
    }
}
