//! Progress plugin
//!
//! Reports played percentage on time updates.

use std::any::Any;

use serde_json::{json, Value};

use crate::component::Component;
use crate::error::Result;
use crate::event::{names as events, Event};
use crate::plugin::{Plugin, PluginDescriptor, PluginInfo};

/// Progress plugin
#[derive(Debug, Default)]
pub struct ProgressPlugin {
    last: Option<f64>,
}

impl ProgressPlugin {
    pub const NAME: &'static str = "progress";
    
    pub fn new() -> Self {
        Self::default()
    }
    
    pub fn descriptor() -> PluginDescriptor {
        PluginDescriptor::new(Self::NAME, json!({}), |_, _, _| {
            Ok(Box::new(ProgressPlugin::new()) as Box<dyn Plugin>)
        })
    }
    
    /// Last reported percentage
    pub fn percent(&self) -> Option<f64> {
        self.last
    }
    
    fn update(&mut self, component: &mut Component) {
        let duration = component.media.duration();
        if !duration.is_finite() || duration <= 0.0 {
            return;
        }
        let precision = component.config.get_f64("progress.precision").unwrap_or(1.0).max(0.0);
        let percent = round_to(component.media.current_time() / duration * 100.0, precision as i32);
        if self.last == Some(percent) {
            return;
        }
        self.last = Some(percent);
        component.config.set("progress.value", json!(percent));
        component.emit(events::PROGRESS_UPDATE, json!({ "percent": percent }));
    }
    
    fn reset(&mut self, component: &mut Component) {
        self.last = None;
        component.config.set("progress.value", json!(0));
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value.clamp(0.0, 100.0) * factor).round() / factor
}

impl Plugin for ProgressPlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo {
            name: Self::NAME,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
    
    fn extend_config(&self) -> Option<Value> {
        Some(json!({ "progress": { "precision": 1, "value": 0 } }))
    }
    
    fn register_events(&self) -> Vec<&'static str> {
        vec![events::MEDIA_TIMEUPDATE, events::SOURCE_SET, events::SOURCE_UNSET]
    }
    
    fn handle_event(&mut self, event: &mut Event, component: &mut Component) -> Result<()> {
        if event.kind == events::MEDIA_TIMEUPDATE {
            self.update(component);
        } else {
            self.reset(component);
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
