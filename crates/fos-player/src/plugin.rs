//! Plugin Host
//!
//! Plugins extend a widget without the core knowing which ones exist. Each
//! plugin may contribute config defaults and states, subscribe to bus
//! events, and implement typed hook interfaces the core invokes before it
//! completes an operation.
//!
//! Loading is all-or-nothing: every extension is merged before any plugin
//! initializes, and the first failing `init_component` aborts the widget.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::component::Component;
use crate::config::ConfigLayers;
use crate::debug::DebugSink;
use crate::error::{PlayerError, Result};
use crate::event::{Event, EventBus};
use crate::player::Scope;
use crate::source::SourceSelection;
use crate::state::StateMap;

/// Plugin metadata returned by `Plugin::info()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginInfo {
    /// Plugin name, also the key of its config section
    pub name: &'static str,
    /// Plugin version (semver)
    pub version: &'static str,
}

/// Plugin trait for widget extensions.
pub trait Plugin: Any {
    /// Return plugin metadata.
    fn info(&self) -> PluginInfo;
    
    /// Config layer merged after the core defaults.
    fn extend_config(&self) -> Option<Value> {
        None
    }
    
    /// States registered alongside the core states.
    fn extend_states(&self) -> StateMap {
        StateMap::new()
    }
    
    /// Event names this plugin listens to on the widget bus.
    fn register_events(&self) -> Vec<&'static str> {
        Vec::new()
    }
    
    /// Called for every event named in [`register_events`](Self::register_events).
    fn handle_event(&mut self, _event: &mut Event, _component: &mut Component) -> Result<()> {
        Ok(())
    }
    
    /// Called once, in load order, after all plugins were merged.
    fn init_component(&mut self, _component: &mut Component) -> Result<()> {
        Ok(())
    }
    
    /// `selectSource` hook implementation, if any.
    fn select_source_interceptor(&mut self) -> Option<&mut dyn SelectSourceInterceptor> {
        None
    }
    
    /// `destroy` hook implementation, if any.
    fn lifecycle_observer(&mut self) -> Option<&mut dyn LifecycleObserver> {
        None
    }
    
    fn as_any(&self) -> &dyn Any;
    
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Observes and may rewrite an in-flight source selection.
pub trait SelectSourceInterceptor {
    fn select_source(&mut self, selection: &mut SourceSelection, component: &Component) -> Result<()>;
}

/// Widget teardown observer.
pub trait LifecycleObserver {
    fn destroy(&mut self, component: &mut Component) -> Result<()>;
}

/// Hook names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookName {
    SelectSource,
    Destroy,
}

/// A hook invocation with its shared arguments
#[derive(Debug)]
pub enum Hook<'a> {
    SelectSource(&'a mut SourceSelection),
    Destroy,
}

impl Hook<'_> {
    pub fn name(&self) -> HookName {
        match self {
            Hook::SelectSource(_) => HookName::SelectSource,
            Hook::Destroy => HookName::Destroy,
        }
    }
}

/// Plugin constructor: `(options, component, debug) -> plugin`
pub type PluginFactory = Box<dyn FnOnce(&Value, &Component, DebugSink) -> Result<Box<dyn Plugin>>>;

/// A plugin waiting to be instantiated
pub struct PluginDescriptor {
    name: String,
    options: Value,
    factory: PluginFactory,
}

impl PluginDescriptor {
    pub fn new<F>(name: &str, options: Value, factory: F) -> Self
    where
        F: FnOnce(&Value, &Component, DebugSink) -> Result<Box<dyn Plugin>> + 'static,
    {
        Self {
            name: name.to_string(),
            options,
            factory: Box::new(factory),
        }
    }
    
    pub fn name(&self) -> &str {
        &self.name
    }
    
    fn instantiate(self, component: &Component) -> Result<Box<dyn Plugin>> {
        let debug = component.debug().scoped(&self.name);
        (self.factory)(&self.options, component, debug).map_err(|e| PlayerError::Plugin {
            plugin: self.name.clone(),
            message: e.to_string(),
        })
    }
}

impl fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("name", &self.name)
            .field("options", &self.options)
            .finish()
    }
}

/// Loaded plugins and their hook table
#[derive(Default)]
pub struct PluginHost {
    plugins: Vec<Box<dyn Plugin>>,
    hooks: HashMap<HookName, Vec<usize>>,
}

impl PluginHost {
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Instantiate, merge, bind and initialize `descriptors` in order.
    pub(crate) fn load(
        scope: &mut Scope,
        bus: &mut EventBus<Scope>,
        descriptors: Vec<PluginDescriptor>,
        layers: &ConfigLayers,
    ) -> Result<()> {
        let mut loaded = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            loaded.push(descriptor.instantiate(&scope.component)?);
        }
        
        let extensions: Vec<Value> = loaded.iter().filter_map(|p| p.extend_config()).collect();
        scope.component.config = layers.resolve(&extensions);
        for plugin in &loaded {
            scope.component.states.extend(&plugin.extend_states())?;
        }
        scope.component.states.seal()?;
        
        for plugin in loaded {
            let events = plugin.register_events();
            let index = scope.plugins.push(plugin);
            for kind in events {
                bus.add_listener(kind, move |event, scope: &mut Scope| {
                    scope.plugins.deliver(index, event, &mut scope.component)
                });
            }
        }
        
        for plugin in scope.plugins.plugins.iter_mut() {
            let name = plugin.info().name;
            plugin
                .init_component(&mut scope.component)
                .map_err(|e| PlayerError::Plugin {
                    plugin: name.to_string(),
                    message: e.to_string(),
                })?;
            tracing::debug!(plugin = name, "plugin initialized");
        }
        Ok(())
    }
    
    fn push(&mut self, mut plugin: Box<dyn Plugin>) -> usize {
        let index = self.plugins.len();
        if plugin.select_source_interceptor().is_some() {
            self.hooks.entry(HookName::SelectSource).or_default().push(index);
        }
        if plugin.lifecycle_observer().is_some() {
            self.hooks.entry(HookName::Destroy).or_default().push(index);
        }
        self.plugins.push(plugin);
        index
    }
    
    fn deliver(&mut self, index: usize, event: &mut Event, component: &mut Component) -> Result<()> {
        match self.plugins.get_mut(index) {
            Some(plugin) => plugin.handle_event(event, component),
            None => Ok(()),
        }
    }
    
    /// Call every plugin implementing `hook`, in load order
    pub fn run(&mut self, mut hook: Hook<'_>, component: &mut Component) -> Result<()> {
        let Some(indices) = self.hooks.get(&hook.name()) else {
            return Ok(());
        };
        for &index in indices {
            let plugin = &mut self.plugins[index];
            match &mut hook {
                Hook::SelectSource(selection) => {
                    if let Some(interceptor) = plugin.select_source_interceptor() {
                        interceptor.select_source(selection, component)?;
                    }
                }
                Hook::Destroy => {
                    if let Some(observer) = plugin.lifecycle_observer() {
                        observer.destroy(component)?;
                    }
                }
            }
        }
        Ok(())
    }
    
    pub fn len(&self) -> usize {
        self.plugins.len()
    }
    
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
    
    /// Names of loaded plugins, in load order
    pub fn names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.info().name).collect()
    }
    
    /// First loaded plugin of type `T`
    pub fn get<T: Plugin>(&self) -> Option<&T> {
        self.plugins.iter().find_map(|p| p.as_any().downcast_ref::<T>())
    }
    
    /// First loaded plugin of type `T`, mutably
    pub fn get_mut<T: Plugin>(&mut self) -> Option<&mut T> {
        self.plugins.iter_mut().find_map(|p| p.as_any_mut().downcast_mut::<T>())
    }
}

impl fmt::Debug for PluginHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginHost")
            .field("plugins", &self.names())
            .field("hooks", &self.hooks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::component;
    use serde_json::json;
    
    struct Rewriter {
        to: usize,
    }
    
    impl Plugin for Rewriter {
        fn info(&self) -> PluginInfo {
            PluginInfo { name: "rewriter", version: "1.0.0" }
        }
        
        fn select_source_interceptor(&mut self) -> Option<&mut dyn SelectSourceInterceptor> {
            Some(self)
        }
        
        fn as_any(&self) -> &dyn Any {
            self
        }
        
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }
    
    impl SelectSourceInterceptor for Rewriter {
        fn select_source(&mut self, selection: &mut SourceSelection, _component: &Component) -> Result<()> {
            selection.index = self.to;
            Ok(())
        }
    }
    
    struct Silent;
    
    impl Plugin for Silent {
        fn info(&self) -> PluginInfo {
            PluginInfo { name: "silent", version: "1.0.0" }
        }
        
        fn as_any(&self) -> &dyn Any {
            self
        }
        
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }
    
    #[test]
    fn test_run_without_plugins() {
        let mut host = PluginHost::new();
        let mut component = component();
        let mut selection = SourceSelection::new(1, json!({"src": "b.mp4"}));
        let before = selection.clone();
        
        host.run(Hook::SelectSource(&mut selection), &mut component).unwrap();
        assert_eq!(selection, before);
    }
    
    #[test]
    fn test_run_in_load_order() {
        let mut host = PluginHost::new();
        host.push(Box::new(Rewriter { to: 4 }));
        host.push(Box::new(Silent));
        host.push(Box::new(Rewriter { to: 7 }));
        
        let mut component = component();
        let mut selection = SourceSelection::new(0, json!({"src": "a.mp4"}));
        host.run(Hook::SelectSource(&mut selection), &mut component).unwrap();
        assert_eq!(selection.index, 7);
        assert_eq!(host.hooks[&HookName::SelectSource], vec![0, 2]);
        assert!(!host.hooks.contains_key(&HookName::Destroy));
    }
    
    #[test]
    fn test_downcast() {
        let mut host = PluginHost::new();
        host.push(Box::new(Silent));
        host.push(Box::new(Rewriter { to: 2 }));
        
        assert_eq!(host.names(), vec!["silent", "rewriter"]);
        assert!(host.get::<Silent>().is_some());
        host.get_mut::<Rewriter>().unwrap().to = 9;
        assert_eq!(host.get::<Rewriter>().unwrap().to, 9);
    }
}
