//! Sound plugin
//!
//! Mute/volume state machine. Volumes are on a 0-100 scale; anything at or
//! below `sound.mutedmax` counts as muted, and the media element's muted
//! flag is reconciled with that rule on every volume change.

use std::any::Any;

use serde_json::{json, Value};

use crate::component::Component;
use crate::debug::DebugSink;
use crate::error::Result;
use crate::event::{names as events, Event};
use crate::plugin::{Plugin, PluginDescriptor, PluginInfo};
use crate::state::{StateDef, StateMap};

pub const MUTED: &str = "muted";
pub const UNMUTED: &str = "unmuted";

/// Volume thresholds read from the `sound` config section
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundLevels {
    /// Volumes at or below this are treated as muted
    pub mutedmax: f64,
    /// Floor applied when unmuting from a muted volume
    pub volumemin: f64,
    /// Level used for the first unmute of a muted widget
    pub firstunmute: f64,
    /// Step for `volume_up` / `volume_down`
    pub volumestep: f64,
}

impl SoundLevels {
    fn from_component(component: &Component) -> Self {
        let config = &component.config;
        Self {
            mutedmax: config.get_f64("sound.mutedmax").unwrap_or(0.0),
            volumemin: config.get_f64("sound.volumemin").unwrap_or(10.0),
            firstunmute: config.get_f64("sound.firstunmute").unwrap_or(65.0),
            volumestep: config.get_f64("sound.volumestep").unwrap_or(10.0),
        }
    }
}

/// Sound plugin
#[derive(Debug)]
pub struct SoundPlugin {
    last_volume: f64,
    first_unmute: bool,
    debug: DebugSink,
}

impl SoundPlugin {
    pub const NAME: &'static str = "sound";
    
    pub fn new(debug: DebugSink) -> Self {
        Self {
            last_volume: 0.0,
            first_unmute: true,
            debug,
        }
    }
    
    pub fn descriptor() -> PluginDescriptor {
        PluginDescriptor::new(Self::NAME, json!({}), |_, _, debug| {
            Ok(Box::new(SoundPlugin::new(debug)) as Box<dyn Plugin>)
        })
    }
    
    /// Volume remembered for the next unmute
    pub fn last_volume(&self) -> f64 {
        self.last_volume
    }
    
    pub fn is_first_unmute(&self) -> bool {
        self.first_unmute
    }
    
    /// Current volume, 0-100
    pub fn volume(&self, component: &Component) -> f64 {
        component.media.volume() * 100.0
    }
    
    /// Whether the widget counts as muted
    pub fn is_muted(&self, component: &Component) -> bool {
        let levels = SoundLevels::from_component(component);
        component.media.muted() || self.volume(component) <= levels.mutedmax
    }
    
    /// Mute, optionally remembering the current volume for `unmute`
    pub fn mute(&mut self, component: &mut Component, remember: bool) -> Result<()> {
        if remember {
            self.last_volume = self.volume(component);
        }
        component.media.set_volume(0.0);
        component.media.set_muted(true);
        component.states.set(MUTED)?;
        self.debug.log(format_args!("muted (remembered {})", self.last_volume));
        component.emit(events::SOUND_MUTE, json!({ "volume": 0.0 }));
        Ok(())
    }
    
    /// Unmute, restoring the remembered volume.
    ///
    /// A remembered volume at or below `mutedmax` is raised to `volumemin`,
    /// except on the widget's first unmute, which uses `firstunmute` instead.
    pub fn unmute(&mut self, component: &mut Component) -> Result<()> {
        let levels = SoundLevels::from_component(component);
        
        let mut volume = self.last_volume;
        if volume <= levels.mutedmax {
            volume = if self.first_unmute {
                levels.firstunmute
            } else {
                levels.volumemin
            };
        }
        self.first_unmute = false;
        
        component.media.set_muted(false);
        component.media.set_volume(volume / 100.0);
        component.states.set(UNMUTED)?;
        self.debug.log(format_args!("unmuted at {}", volume));
        component.emit(events::SOUND_UNMUTE, json!({ "volume": volume }));
        Ok(())
    }
    
    pub fn toggle_mute(&mut self, component: &mut Component) -> Result<()> {
        if self.is_muted(component) {
            self.unmute(component)
        } else {
            self.mute(component, true)
        }
    }
    
    /// Set the volume (0-100) and reconcile the muted flag
    pub fn set_volume(&mut self, component: &mut Component, volume: f64) -> Result<()> {
        let volume = volume.clamp(0.0, 100.0);
        let levels = SoundLevels::from_component(component);
        component.media.set_volume(volume / 100.0);
        if volume > levels.mutedmax {
            component.media.set_muted(false);
        }
        self.reconcile(component)
    }
    
    pub fn volume_up(&mut self, component: &mut Component) -> Result<()> {
        let step = SoundLevels::from_component(component).volumestep;
        let volume = self.volume(component) + step;
        self.set_volume(component, volume)
    }
    
    pub fn volume_down(&mut self, component: &mut Component) -> Result<()> {
        let step = SoundLevels::from_component(component).volumestep;
        let volume = self.volume(component) - step;
        self.set_volume(component, volume)
    }
    
    /// Align the muted flag and states with the volume
    fn reconcile(&mut self, component: &mut Component) -> Result<()> {
        let muted = self.is_muted(component);
        if muted != component.media.muted() {
            component.media.set_muted(muted);
        }
        component.states.set(if muted { MUTED } else { UNMUTED })
    }
}

impl Plugin for SoundPlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo {
            name: Self::NAME,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
    
    fn extend_config(&self) -> Option<Value> {
        Some(json!({
            "sound": {
                "mutedmax": 0,
                "volumemin": 10,
                "firstunmute": 65,
                "volumestep": 10
            }
        }))
    }
    
    fn extend_states(&self) -> StateMap {
        StateMap::new()
            .with(MUTED, StateDef::local().unsets(&[UNMUTED]))
            .with(UNMUTED, StateDef::local().unsets(&[MUTED]))
    }
    
    fn register_events(&self) -> Vec<&'static str> {
        vec![events::MEDIA_VOLUMECHANGE]
    }
    
    fn handle_event(&mut self, _event: &mut Event, component: &mut Component) -> Result<()> {
        self.reconcile(component)
    }
    
    fn init_component(&mut self, component: &mut Component) -> Result<()> {
        let volume = self.volume(component);
        if volume > SoundLevels::from_component(component).mutedmax {
            self.last_volume = volume;
        }
        self.reconcile(component)
    }
    
    fn as_any(&self) -> &dyn Any {
        self
    }
    
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::component_with;
    
    fn setup(volume: f64, muted: bool) -> (SoundPlugin, Component) {
        let mut plugin = SoundPlugin::new(DebugSink::disabled());
        let mut component = component_with(
            &json!({"sound": {"mutedmax": 5, "volumemin": 10, "firstunmute": 65, "volumestep": 10}}),
            &plugin.extend_states(),
        );
        component.media.set_volume(volume / 100.0);
        component.media.set_muted(muted);
        plugin.init_component(&mut component).unwrap();
        (plugin, component)
    }
    
    fn rounded(plugin: &SoundPlugin, component: &Component) -> f64 {
        (plugin.volume(component) * 1000.0).round() / 1000.0
    }
    
    #[test]
    fn test_first_unmute_then_volumemin() {
        let (mut sound, mut component) = setup(0.0, true);
        assert!(component.states.is(MUTED).unwrap());
        
        sound.unmute(&mut component).unwrap();
        assert_eq!(rounded(&sound, &component), 65.0);
        assert!(!component.media.muted());
        assert!(component.states.is(UNMUTED).unwrap());
        assert!(!sound.is_first_unmute());
        
        sound.mute(&mut component, false).unwrap();
        assert_eq!(rounded(&sound, &component), 0.0);
        sound.unmute(&mut component).unwrap();
        assert_eq!(rounded(&sound, &component), 10.0);
    }
    
    #[test]
    fn test_mute_remembers_volume() {
        let (mut sound, mut component) = setup(40.0, false);
        sound.mute(&mut component, true).unwrap();
        assert_eq!((sound.last_volume() * 1000.0).round() / 1000.0, 40.0);
        assert!(component.states.is(MUTED).unwrap());
        
        sound.unmute(&mut component).unwrap();
        assert_eq!(rounded(&sound, &component), 40.0);
    }
    
    #[test]
    fn test_first_unmute_skipped_when_audible() {
        let (mut sound, mut component) = setup(50.0, true);
        sound.unmute(&mut component).unwrap();
        // 50 was remembered at init, so the first-unmute level does not apply
        assert_eq!(rounded(&sound, &component), 50.0);
        assert!(!sound.is_first_unmute());
    }
    
    #[test]
    fn test_low_volume_counts_as_muted() {
        let (mut sound, mut component) = setup(50.0, false);
        sound.set_volume(&mut component, 4.0).unwrap();
        assert!(component.media.muted());
        assert!(component.states.is(MUTED).unwrap());
        
        sound.set_volume(&mut component, 30.0).unwrap();
        assert!(!component.media.muted());
        assert!(component.states.is(UNMUTED).unwrap());
    }
    
    #[test]
    fn test_volume_steps_clamp() {
        let (mut sound, mut component) = setup(95.0, false);
        sound.volume_up(&mut component).unwrap();
        assert_eq!(rounded(&sound, &component), 100.0);
        
        sound.set_volume(&mut component, 8.0).unwrap();
        sound.volume_down(&mut component).unwrap();
        assert_eq!(rounded(&sound, &component), 0.0);
        assert!(sound.is_muted(&component));
    }
    
    #[test]
    fn test_toggle_mute() {
        let (mut sound, mut component) = setup(30.0, false);
        sound.toggle_mute(&mut component).unwrap();
        assert!(sound.is_muted(&component));
        sound.toggle_mute(&mut component).unwrap();
        assert_eq!(rounded(&sound, &component), 30.0);
    }
}
