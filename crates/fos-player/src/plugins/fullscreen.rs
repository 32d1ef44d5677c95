//! Fullscreen plugin
//!
//! Toggles fullscreen for the widget element on double click or on demand.

use std::any::Any;

use serde_json::json;

use crate::component::Component;
use crate::debug::DebugSink;
use crate::error::{PlayerError, Result};
use crate::event::{names as events, Event};
use crate::plugin::{LifecycleObserver, Plugin, PluginDescriptor, PluginInfo};
use crate::state::{StateDef, StateMap};

pub const FULLSCREEN: &str = "fullscreen";

/// Fullscreen plugin
#[derive(Debug)]
pub struct FullscreenPlugin {
    debug: DebugSink,
}

impl FullscreenPlugin {
    pub const NAME: &'static str = "fullscreen";
    
    pub fn new(debug: DebugSink) -> Self {
        Self { debug }
    }
    
    pub fn descriptor() -> PluginDescriptor {
        PluginDescriptor::new(Self::NAME, json!({}), |_, _, debug| {
            Ok(Box::new(FullscreenPlugin::new(debug)) as Box<dyn Plugin>)
        })
    }
    
    pub fn is_active(&self, component: &Component) -> bool {
        let id = u64::from(component.element().id());
        component.fullscreen.is_active_for(id)
    }
    
    pub fn toggle(&mut self, component: &mut Component) -> Result<()> {
        if self.is_active(component) {
            self.exit(component)
        } else {
            self.enter(component)
        }
    }
    
    /// Request fullscreen for the widget element.
    ///
    /// A rejected request dispatches `fullscreen.error` and is returned.
    pub fn enter(&mut self, component: &mut Component) -> Result<()> {
        let id = u64::from(component.element().id());
        if let Err(e) = component.fullscreen.request(id) {
            tracing::warn!(error = %e, "fullscreen request rejected");
            component.emit(events::FULLSCREEN_ERROR, json!({ "message": e.to_string() }));
            return Err(PlayerError::from(e));
        }
        component.states.set(FULLSCREEN)?;
        self.debug.log("entered fullscreen");
        component.emit(events::FULLSCREEN_ENTER, json!({}));
        Ok(())
    }
    
    pub fn exit(&mut self, component: &mut Component) -> Result<()> {
        if !self.is_active(component) {
            return Ok(());
        }
        component.fullscreen.exit()?;
        component.states.unset(FULLSCREEN)?;
        self.debug.log("left fullscreen");
        component.emit(events::FULLSCREEN_EXIT, json!({}));
        Ok(())
    }
}

impl Plugin for FullscreenPlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo {
            name: Self::NAME,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
    
    fn extend_states(&self) -> StateMap {
        StateMap::new().with(FULLSCREEN, StateDef::global())
    }
    
    fn register_events(&self) -> Vec<&'static str> {
        vec![events::CONTROLS_DBLCLICK]
    }
    
    fn handle_event(&mut self, _event: &mut Event, component: &mut Component) -> Result<()> {
        self.toggle(component)
    }
    
    fn lifecycle_observer(&mut self) -> Option<&mut dyn LifecycleObserver> {
        Some(self)
    }
    
    fn as_any(&self) -> &dyn Any {
        self
    }
    
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl LifecycleObserver for FullscreenPlugin {
    fn destroy(&mut self, component: &mut Component) -> Result<()> {
        self.exit(component)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::component_with;
    use fos_media::FullscreenManager;
    
    fn setup() -> (FullscreenPlugin, Component) {
        let plugin = FullscreenPlugin::new(DebugSink::disabled());
        let component = component_with(&json!({}), &plugin.extend_states());
        (plugin, component)
    }
    
    #[test]
    fn test_toggle() {
        let (mut plugin, mut component) = setup();
        plugin.toggle(&mut component).unwrap();
        assert!(plugin.is_active(&component));
        assert!(component.states.is(FULLSCREEN).unwrap());
        assert!(component.states.document().class_list.contains("player-is-fullscreen"));
        
        plugin.toggle(&mut component).unwrap();
        assert!(!plugin.is_active(&component));
        assert!(!component.states.is(FULLSCREEN).unwrap());
    }
    
    #[test]
    fn test_rejected_request() {
        let (mut plugin, mut component) = setup();
        component.fullscreen = FullscreenManager::disabled();
        
        let err = plugin.enter(&mut component).unwrap_err();
        assert!(matches!(err, PlayerError::Fullscreen(_)));
        assert!(!component.states.is(FULLSCREEN).unwrap());
        
        let queued = component.next_queued().unwrap();
        assert_eq!(queued.kind, events::FULLSCREEN_ERROR);
    }
    
    #[test]
    fn test_exit_when_inactive_is_noop() {
        let (mut plugin, mut component) = setup();
        plugin.exit(&mut component).unwrap();
        assert!(component.next_queued().is_none());
    }
}
