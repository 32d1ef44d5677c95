//! Player
//!
//! Construction, initialization and teardown of a widget instance.

use fos_dom::{Element, NodeId};
use fos_media::MediaElement;
use serde_json::{json, Value};

use crate::component::Component;
use crate::config::{player_defaults, Config, ConfigLayers};
use crate::controls::ClickDebouncer;
use crate::debug::DebugSink;
use crate::error::{PlayerError, Result};
use crate::event::{names as events, Event, EventBus, ListenerId};
use crate::plugin::{Hook, Plugin, PluginDescriptor, PluginHost};
use crate::source::core_states;
use crate::state::{names as states, HookChange, HookPrefixes, StateMap, StateRegistry};

/// What an event listener may touch: the widget and its loaded plugins.
#[derive(Debug)]
pub struct Scope {
    pub component: Component,
    pub plugins: PluginHost,
}

/// Construction parameters
#[derive(Debug)]
pub struct PlayerOptions {
    /// Markup and runtime overrides, merged last
    pub settings: Value,
    /// Built-in defaults, merged first
    pub defaults: Value,
    /// Extra config layers merged after the defaults
    pub config_extensions: Vec<Value>,
    /// States registered after the core lifecycle states
    pub states: StateMap,
    /// Plugins, in load order
    pub plugins: Vec<PluginDescriptor>,
    pub parent: Option<NodeId>,
    pub debug: Option<DebugSink>,
    /// Element carrying global state hooks
    pub document: Element,
    /// Load plugins and select the initial source inside `Player::new`
    pub init: bool,
}

impl PlayerOptions {
    pub fn new() -> Self {
        Self {
            settings: json!({}),
            defaults: player_defaults(),
            config_extensions: Vec::new(),
            states: StateMap::new(),
            plugins: Vec::new(),
            parent: None,
            debug: None,
            document: Element::document_root(),
            init: true,
        }
    }
    
    pub fn settings(mut self, settings: Value) -> Self {
        self.settings = settings;
        self
    }
    
    pub fn extend_config(mut self, layer: Value) -> Self {
        self.config_extensions.push(layer);
        self
    }
    
    pub fn states(mut self, states: StateMap) -> Self {
        self.states = states;
        self
    }
    
    pub fn plugin(mut self, descriptor: PluginDescriptor) -> Self {
        self.plugins.push(descriptor);
        self
    }
    
    pub fn parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }
    
    pub fn debug(mut self, debug: DebugSink) -> Self {
        self.debug = Some(debug);
        self
    }
    
    pub fn deferred(mut self) -> Self {
        self.init = false;
        self
    }
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct Pending {
    layers: ConfigLayers,
    plugins: Vec<PluginDescriptor>,
}

/// A media player widget bound to one element
#[derive(Debug)]
pub struct Player {
    pub(crate) scope: Scope,
    bus: EventBus<Scope>,
    pending: Option<Pending>,
    pub(crate) clicks: ClickDebouncer,
    destroyed: bool,
    failed: bool,
}

impl Player {
    /// Bind a widget to `element`, driving `media`
    pub fn new(element: Element, media: Box<dyn MediaElement>, options: PlayerOptions) -> Result<Self> {
        let mut layers = ConfigLayers::new(options.defaults);
        layers.extensions = options.config_extensions;
        layers.settings = options.settings;
        let config = layers.resolve(&[]);
        
        let prefixes = hook_prefixes(&config);
        let debug = options.debug.unwrap_or_else(|| {
            let label = format!("player#{}", element.id().0);
            DebugSink::new(&label, config.get_bool("debug").unwrap_or(false))
        });
        
        let mut registry = StateRegistry::new(element, options.document, prefixes);
        registry.extend(&core_states())?;
        registry.extend(&options.states)?;
        
        let clicks = ClickDebouncer::from_config(&config);
        let component = Component::new(config, registry, media, options.parent, debug);
        let mut player = Self {
            scope: Scope {
                component,
                plugins: PluginHost::new(),
            },
            bus: EventBus::new(),
            pending: Some(Pending {
                layers,
                plugins: options.plugins,
            }),
            clicks,
            destroyed: false,
            failed: false,
        };
        
        if options.init {
            player.init()?;
        }
        Ok(player)
    }
    
    /// Load plugins and select the initial source.
    ///
    /// Any failure leaves the widget unusable: the plugins loaded so far are
    /// dropped and every later operation returns [`PlayerError::Config`].
    pub fn init(&mut self) -> Result<()> {
        self.ensure_live()?;
        let Some(pending) = self.pending.take() else {
            return Err(PlayerError::config("player is already initialized"));
        };
        let result = PluginHost::load(&mut self.scope, &mut self.bus, pending.plugins, &pending.layers);
        if let Err(err) = result {
            return Err(self.fail(err));
        }
        self.clicks = ClickDebouncer::from_config(&self.scope.component.config);
        tracing::info!(
            widget = self.scope.component.debug().label(),
            plugins = ?self.scope.plugins.names(),
            "player initialized"
        );
        
        let result = self.select_initial();
        self.finish(result).map_err(|err| self.fail(err))
    }
    
    /// Drop the partial plugin set and detach the media after a failed init
    fn fail(&mut self, err: PlayerError) -> PlayerError {
        tracing::warn!(widget = self.scope.component.debug().label(), error = %err, "player failed to initialize");
        self.failed = true;
        self.bus = EventBus::new();
        self.scope.plugins = PluginHost::new();
        
        let component = &mut self.scope.component;
        component.media.pause();
        component.media.set_source(None);
        component.selection.clear();
        component.states.clear_all();
        component.discard_queued();
        err
    }
    
    /// Reject operations on a destroyed or failed widget
    pub(crate) fn ensure_live(&self) -> Result<()> {
        if self.destroyed {
            Err(PlayerError::config("player is destroyed"))
        } else if self.failed {
            Err(PlayerError::config("player failed to initialize"))
        } else {
            Ok(())
        }
    }
    
    fn select_initial(&mut self) -> Result<()> {
        let count = self.component().sources()?.len();
        let index = match self.config().get("index") {
            None | Some(Value::Null) => None,
            Some(value) => Some(value.as_u64().ok_or_else(|| {
                PlayerError::config(format!("'index' must be a non-negative integer, got {}", value))
            })? as usize),
        };
        
        match index {
            Some(index) => {
                self.select_source_with(Some(index), crate::source::SELECT_SOURCE_SETTER)?;
            }
            None if count == 1 => {
                self.select_source_with(Some(0), crate::source::SELECT_SOURCE_SETTER)?;
            }
            None => {
                self.scope.component.states.set(states::SOURCE_NONE)?;
                self.dispatch_event(Event::notify(events::SOURCE_NONE))?;
            }
        }
        Ok(())
    }
    
    /// Tear the widget down: run `destroy` hooks, detach the source and
    /// clear every state hook. No further events are dispatched and later
    /// operations return [`PlayerError::Config`].
    pub fn destroy(&mut self) -> Result<()> {
        if self.destroyed {
            return Ok(());
        }
        self.destroyed = true;
        self.pending = None;
        
        let Scope { component, plugins } = &mut self.scope;
        plugins.run(Hook::Destroy, component)?;
        component.media.pause();
        component.media.set_source(None);
        component.selection.clear();
        component.states.clear_all();
        component.discard_queued();
        Ok(())
    }
    
    pub fn is_initialized(&self) -> bool {
        self.pending.is_none() && !self.destroyed && !self.failed
    }
    
    /// Whether `init` failed and the widget was disabled
    pub fn is_failed(&self) -> bool {
        self.failed
    }
    
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
    
    pub fn component(&self) -> &Component {
        &self.scope.component
    }
    
    pub fn component_mut(&mut self) -> &mut Component {
        &mut self.scope.component
    }
    
    pub fn config(&self) -> &Config {
        &self.scope.component.config
    }
    
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.scope.component.config
    }
    
    pub fn states(&self) -> &StateRegistry {
        &self.scope.component.states
    }
    
    /// Shorthand for `states().is(name)`
    pub fn is(&self, state: &str) -> Result<bool> {
        self.scope.component.states.is(state)
    }
    
    pub fn media(&self) -> &dyn MediaElement {
        self.scope.component.media.as_ref()
    }
    
    pub fn media_mut(&mut self) -> &mut dyn MediaElement {
        self.scope.component.media.as_mut()
    }
    
    pub fn current_index(&self) -> Option<usize> {
        self.scope.component.current_index()
    }
    
    pub fn current_source(&self) -> Option<&Value> {
        self.scope.component.current_source()
    }
    
    pub fn plugins(&self) -> &PluginHost {
        &self.scope.plugins
    }
    
    /// Run `f` against a loaded plugin, then deliver anything it queued
    pub fn with_plugin<T, R, F>(&mut self, f: F) -> Result<R>
    where
        T: Plugin,
        F: FnOnce(&mut T, &mut Component) -> Result<R>,
    {
        self.ensure_live()?;
        let Scope { component, plugins } = &mut self.scope;
        let result = match plugins.get_mut::<T>() {
            Some(plugin) => f(plugin, component),
            None => Err(PlayerError::lookup(format!(
                "plugin {} is not loaded",
                std::any::type_name::<T>()
            ))),
        };
        self.finish(result)
    }
    
    /// Drain the state hook journal
    pub fn take_hook_changes(&mut self) -> Vec<HookChange> {
        self.scope.component.states.take_hook_changes()
    }
    
    pub fn add_listener<F>(&mut self, kind: &str, handler: F) -> ListenerId
    where
        F: FnMut(&mut Event, &mut Scope) -> Result<()> + 'static,
    {
        self.bus.add_listener(kind, handler)
    }
    
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.bus.remove_listener(id)
    }
    
    /// Dispatch an event on the widget bus
    pub fn dispatch(&mut self, kind: &str, detail: Value, cancelable: bool) -> Result<bool> {
        self.ensure_live()?;
        let result = self
            .dispatch_event(Event::new(kind, detail, cancelable))
            .map(|event| !event.is_default_prevented());
        self.finish(result)
    }
    
    pub(crate) fn dispatch_event(&mut self, event: Event) -> Result<Event> {
        if self.destroyed {
            return Ok(event);
        }
        self.bus.dispatch_event(&mut self.scope, event)
    }
    
    /// Deliver notifications queued by plugins during the last operation
    fn flush(&mut self) -> Result<()> {
        while let Some(event) = self.scope.component.next_queued() {
            self.dispatch_event(event)?;
        }
        Ok(())
    }
    
    /// Flush queued notifications, then surface the operation's own result
    pub(crate) fn finish<T>(&mut self, result: Result<T>) -> Result<T> {
        let flushed = self.flush();
        let value = result?;
        flushed?;
        Ok(value)
    }
}

fn hook_prefixes(config: &Config) -> HookPrefixes {
    let defaults = HookPrefixes::default();
    HookPrefixes {
        local: config
            .get_str("classes.prefix")
            .map_or(defaults.local, str::to_string),
        global: config
            .get_str("classes.globalPrefix")
            .map_or(defaults.global, str::to_string),
    }
}
