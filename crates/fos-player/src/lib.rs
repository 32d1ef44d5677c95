//! fOS Player
//!
//! Embeddable media player widget. A [`Player`] binds one element to a
//! platform [`MediaElement`](fos_media::MediaElement) and orchestrates it:
//!
//! - States with class hooks and mutual-exclusion cascades
//! - Layered JSON configuration
//! - A synchronous, cancelable event bus
//! - Plugins contributing config, states, listeners and hooks
//! - The source lifecycle: select, set, unset, poster

mod component;
mod config;
mod controls;
mod debug;
mod error;
mod event;
mod playback;
mod player;
mod plugin;
mod source;
mod state;

pub mod plugins;

pub use component::Component;
pub use config::{deep_merge, player_defaults, Config, ConfigLayers};
pub use controls::{ClickDebouncer, Gesture, DEFAULT_DBLCLICK_DELAY};
pub use debug::DebugSink;
pub use error::{PlayerError, Result};
pub use event::{names as events, Event, EventBus, Handler, ListenerId};
pub use playback::{MediaSignal, SoundDetection};
pub use player::{Player, PlayerOptions, Scope};
pub use plugin::{
    Hook, HookName, LifecycleObserver, Plugin, PluginDescriptor, PluginFactory, PluginHost,
    PluginInfo, SelectSourceInterceptor,
};
pub use source::{core_states, Source, SourceSelection, DEFAULT_TYPE, SELECT_SOURCE_SETTER};
pub use state::{
    names as states, HookChange, HookPrefixes, HookScope, StateDef, StateMap, StateRegistry,
};

#[cfg(test)]
pub(crate) mod test_support {
    use std::cell::RefCell;
    use std::rc::Rc;

    use fos_dom::{Element, NodeId};
    use fos_media::{HTMLVideoElement, MediaElement, MediaError, MediaSource};
    use serde_json::{json, Value};

    use crate::component::Component;
    use crate::config::{player_defaults, ConfigLayers};
    use crate::debug::DebugSink;
    use crate::player::{Player, PlayerOptions};
    use crate::source::core_states;
    use crate::state::{HookPrefixes, StateMap, StateRegistry};

    /// A headless element the test keeps a handle to after boxing.
    /// Source and poster are mirrored so they can be borrowed.
    #[derive(Debug, Default)]
    pub struct SharedMedia {
        pub inner: Rc<RefCell<HTMLVideoElement>>,
        source: Option<MediaSource>,
        poster: Option<String>,
    }

    impl MediaElement for SharedMedia {
        fn set_source(&mut self, source: Option<MediaSource>) {
            self.source = source.clone();
            self.inner.borrow_mut().set_source(source)
        }
        fn source(&self) -> Option<&MediaSource> {
            self.source.as_ref()
        }
        fn load(&mut self) {
            self.inner.borrow_mut().load()
        }
        fn play(&mut self) -> std::result::Result<(), MediaError> {
            self.inner.borrow_mut().play()
        }
        fn pause(&mut self) {
            self.inner.borrow_mut().pause()
        }
        fn paused(&self) -> bool {
            self.inner.borrow().paused()
        }
        fn current_time(&self) -> f64 {
            self.inner.borrow().current_time()
        }
        fn set_current_time(&mut self, time: f64) {
            self.inner.borrow_mut().set_current_time(time)
        }
        fn duration(&self) -> f64 {
            self.inner.borrow().duration()
        }
        fn volume(&self) -> f64 {
            self.inner.borrow().volume()
        }
        fn set_volume(&mut self, volume: f64) {
            self.inner.borrow_mut().set_volume(volume)
        }
        fn muted(&self) -> bool {
            self.inner.borrow().muted()
        }
        fn set_muted(&mut self, muted: bool) {
            self.inner.borrow_mut().set_muted(muted)
        }
        fn poster(&self) -> Option<&str> {
            self.poster.as_deref()
        }
        fn set_poster(&mut self, poster: Option<&str>) {
            self.poster = poster.map(str::to_string);
            self.inner.borrow_mut().set_poster(poster)
        }
        fn has_audio(&self) -> Option<bool> {
            self.inner.borrow().has_audio()
        }
    }

    /// An initialized player over a shared headless element
    pub fn player(settings: Value) -> (Player, Rc<RefCell<HTMLVideoElement>>) {
        let media = SharedMedia::default();
        let handle = media.inner.clone();
        let options = PlayerOptions::new().settings(settings).debug(DebugSink::disabled());
        let player = Player::new(Element::new(NodeId(3), "div"), Box::new(media), options).unwrap();
        (player, handle)
    }

    /// A sealed component with only the core states
    pub fn component() -> Component {
        component_with(&json!({}), &StateMap::new())
    }

    /// A sealed component with `settings` merged over the defaults and
    /// `extra` states registered after the core ones
    pub fn component_with(settings: &Value, extra: &StateMap) -> Component {
        let mut layers = ConfigLayers::new(player_defaults());
        layers.settings = settings.clone();
        let config = layers.resolve(&[]);

        let element = Element::new(NodeId(7), "div");
        let mut states = StateRegistry::new(element, Element::document_root(), HookPrefixes::default());
        states.extend(&core_states()).unwrap();
        states.extend(extra).unwrap();
        states.seal().unwrap();

        Component::new(
            config,
            states,
            Box::new(HTMLVideoElement::new()),
            None,
            DebugSink::disabled(),
        )
    }
}
