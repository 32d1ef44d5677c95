//! Config Resolver
//!
//! Key-path configuration tree assembled from ordered layers.
//!
//! Objects merge key by key; every other value, arrays included, is replaced
//! wholesale by the later layer. Paths are `.`-separated and only descend
//! through objects, so `sources.0.src` never indexes into an array.

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

/// Resolved configuration tree
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    tree: Value,
}

impl Config {
    /// Create an empty config
    pub fn new() -> Self {
        Self {
            tree: Value::Object(Map::new()),
        }
    }
    
    /// Merge layers in order, later layers winning on conflicting leaves
    pub fn from_layers<'a>(layers: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut config = Self::new();
        for layer in layers {
            config.merge(layer);
        }
        config
    }
    
    /// Deep-merge a layer on top of the current tree
    pub fn merge(&mut self, layer: &Value) {
        deep_merge(&mut self.tree, layer);
    }
    
    /// Resolve a dot-path
    pub fn get(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.tree, |node, segment| node.as_object()?.get(segment))
    }
    
    /// Resolve and deserialize a dot-path, `None` if absent or mistyped
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        let value = self.get(path)?;
        serde_json::from_value(value.clone()).ok()
    }
    
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path)?.as_str()
    }
    
    pub fn get_f64(&self, path: &str) -> Option<f64> {
        self.get(path)?.as_f64()
    }
    
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path)?.as_bool()
    }
    
    /// Write a leaf, creating intermediate objects as needed.
    ///
    /// A non-object intermediate is replaced by an empty object.
    pub fn set(&mut self, path: &str, value: Value) {
        let mut segments: Vec<&str> = path.split('.').collect();
        let Some(leaf) = segments.pop() else {
            return;
        };
        
        let mut node = &mut self.tree;
        for segment in segments {
            node = object_mut(node)
                .entry(segment)
                .or_insert_with(|| Value::Object(Map::new()));
        }
        object_mut(node).insert(leaf.to_string(), value);
    }
    
    /// Whole tree
    pub fn tree(&self) -> &Value {
        &self.tree
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// View `node` as an object, replacing it with an empty one if it is not
fn object_mut(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("node was just replaced by an object"),
    }
}

/// Recursively merge `layer` into `target`
pub fn deep_merge(target: &mut Value, layer: &Value) {
    match (target, layer) {
        (Value::Object(into), Value::Object(from)) => {
            for (key, value) in from {
                match into.get_mut(key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        deep_merge(existing, value);
                    }
                    _ => {
                        into.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, layer) => *target = layer.clone(),
    }
}

/// The configuration inputs of a widget, kept apart until plugins load.
#[derive(Debug, Clone, Default)]
pub struct ConfigLayers {
    /// Built-in defaults
    pub defaults: Value,
    /// Constructor-supplied extensions, applied in order after defaults
    pub extensions: Vec<Value>,
    /// Markup and runtime overrides, applied last
    pub settings: Value,
}

impl ConfigLayers {
    pub fn new(defaults: Value) -> Self {
        Self {
            defaults,
            extensions: Vec::new(),
            settings: Value::Object(Map::new()),
        }
    }
    
    /// Resolve with plugin extensions slotted between the constructor
    /// extensions and the settings.
    pub fn resolve(&self, plugin_extensions: &[Value]) -> Config {
        Config::from_layers(
            std::iter::once(&self.defaults)
                .chain(self.extensions.iter())
                .chain(plugin_extensions.iter())
                .chain(std::iter::once(&self.settings)),
        )
    }
}

/// Built-in player defaults
pub fn player_defaults() -> Value {
    json!({
        "sources": [],
        "index": null,
        "poster": null,
        "debug": false,
        "classes": {
            "prefix": "is-",
            "globalPrefix": "player-is-"
        },
        "controls": {
            "dblclickDelay": 250
        }
    })
}
