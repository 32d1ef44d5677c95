//! Tracking plugin
//!
//! Forwards playback milestones to an analytics backend. The first play and
//! the end of each source are reported once per source; pauses every time.

use std::any::Any;

use serde_json::{json, Value};

use crate::component::Component;
use crate::error::Result;
use crate::event::{names as events, Event};
use crate::plugin::{Plugin, PluginDescriptor, PluginInfo};

/// One tracked milestone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingEvent {
    pub category: String,
    pub action: String,
    pub label: String,
}

/// Analytics backend
pub trait Tracker {
    fn track(&mut self, event: &TrackingEvent);
}

/// Tracking plugin
pub struct TrackingPlugin {
    tracker: Box<dyn Tracker>,
    played: bool,
    ended: bool,
}

impl TrackingPlugin {
    pub const NAME: &'static str = "tracking";
    
    pub fn new(tracker: Box<dyn Tracker>) -> Self {
        Self {
            tracker,
            played: false,
            ended: false,
        }
    }
    
    pub fn descriptor<T: Tracker + 'static>(tracker: T) -> PluginDescriptor {
        PluginDescriptor::new(Self::NAME, json!({}), move |_, _, _| {
            Ok(Box::new(TrackingPlugin::new(Box::new(tracker))) as Box<dyn Plugin>)
        })
    }
    
    fn send(&mut self, component: &Component, action: &str) {
        let category = component
            .config
            .get_str("tracking.category")
            .unwrap_or("video")
            .to_string();
        let label = component.current_src().unwrap_or_default().to_string();
        self.tracker.track(&TrackingEvent {
            category,
            action: action.to_string(),
            label,
        });
    }
}

impl std::fmt::Debug for TrackingPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackingPlugin")
            .field("played", &self.played)
            .field("ended", &self.ended)
            .finish()
    }
}

impl Plugin for TrackingPlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo {
            name: Self::NAME,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
    
    fn extend_config(&self) -> Option<Value> {
        Some(json!({ "tracking": { "category": "video" } }))
    }
    
    fn register_events(&self) -> Vec<&'static str> {
        vec![events::SOURCE_SET, events::MEDIA_PLAY, events::MEDIA_PAUSE, events::MEDIA_ENDED]
    }
    
    fn handle_event(&mut self, event: &mut Event, component: &mut Component) -> Result<()> {
        match event.kind.as_str() {
            events::SOURCE_SET => {
                self.played = false;
                self.ended = false;
                self.send(component, "source");
            }
            events::MEDIA_PLAY if !self.played => {
                self.played = true;
                self.send(component, "play");
            }
            events::MEDIA_PAUSE => self.send(component, "pause"),
            events::MEDIA_ENDED if !self.ended => {
                self.ended = true;
                self.send(component, "ended");
            }
            _ => {}
        }
        Ok(())
    }
    
    fn as_any(&self) -> &dyn Any {
        self
    }
    
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
