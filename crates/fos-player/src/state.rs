//! State Registry
//!
//! Named boolean states toggled on a widget, each mirrored as a class hook
//! on the widget element (local) or the document root (global).
//!
//! Setting a state clears the states in its `unsets` list, one level deep:
//! the cleared states' own `unsets` are not followed.

use std::collections::HashMap;

use fos_dom::Element;

use crate::error::{PlayerError, Result};

/// State names registered by the player core
pub mod names {
    pub const SOURCE_NONE: &str = "sourceNone";
    pub const LOADING: &str = "loading";
    pub const PLAYABLE: &str = "playable";
    pub const PLAYING: &str = "playing";
    pub const PAUSED: &str = "paused";
    pub const ENDED: &str = "ended";
    pub const ERROR: &str = "error";
    pub const SOUND_AVAILABLE: &str = "soundAvailable";
    pub const SOUND_NONE: &str = "soundNone";
    pub const SOUND_UNKNOWN: &str = "soundUnknown";
}

/// Declarative state definition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateDef {
    /// Hook applies to the document root instead of the widget element
    pub global: bool,
    /// States cleared whenever this one is set
    pub unsets: Vec<String>,
}

impl StateDef {
    pub fn local() -> Self {
        Self::default()
    }
    
    pub fn global() -> Self {
        Self {
            global: true,
            unsets: Vec::new(),
        }
    }
    
    pub fn unsets(mut self, names: &[&str]) -> Self {
        self.unsets = names.iter().map(|n| n.to_string()).collect();
        self
    }
}

/// Ordered state declarations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateMap {
    entries: Vec<(String, StateDef)>,
}

impl StateMap {
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Add or redefine a state
    pub fn with(mut self, name: &str, def: StateDef) -> Self {
        self.insert(name, def);
        self
    }
    
    pub fn insert(&mut self, name: &str, def: StateDef) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = def,
            None => self.entries.push((name.to_string(), def)),
        }
    }
    
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StateDef)> {
        self.entries.iter().map(|(n, d)| (n.as_str(), d))
    }
    
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where a hook class is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookScope {
    Local,
    Global,
}

/// One visual hook application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookChange {
    pub state: String,
    pub class: String,
    pub scope: HookScope,
    pub on: bool,
}

/// Class name prefixes for hooks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookPrefixes {
    pub local: String,
    pub global: String,
}

impl Default for HookPrefixes {
    fn default() -> Self {
        Self {
            local: "is-".to_string(),
            global: "player-is-".to_string(),
        }
    }
}

#[derive(Debug)]
struct State {
    def: StateDef,
    class: String,
    value: bool,
}

/// Registry of widget states
#[derive(Debug)]
pub struct StateRegistry {
    states: HashMap<String, State>,
    order: Vec<String>,
    prefixes: HookPrefixes,
    element: Element,
    document: Element,
    changes: Vec<HookChange>,
    sealed: bool,
}

impl StateRegistry {
    pub fn new(element: Element, document: Element, prefixes: HookPrefixes) -> Self {
        Self {
            states: HashMap::new(),
            order: Vec::new(),
            prefixes,
            element,
            document,
            changes: Vec::new(),
            sealed: false,
        }
    }
    
    /// Register or redefine states. Only allowed before [`seal`](Self::seal).
    pub fn extend(&mut self, map: &StateMap) -> Result<()> {
        if self.sealed {
            return Err(PlayerError::config("states cannot be declared after initialization"));
        }
        for (name, def) in map.iter() {
            let prefix = if def.global {
                &self.prefixes.global
            } else {
                &self.prefixes.local
            };
            let class = format!("{}{}", prefix, kebab_case(name));
            match self.states.get_mut(name) {
                Some(state) => {
                    state.def = def.clone();
                    state.class = class;
                }
                None => {
                    self.order.push(name.to_string());
                    self.states.insert(name.to_string(), State {
                        def: def.clone(),
                        class,
                        value: false,
                    });
                }
            }
        }
        Ok(())
    }
    
    /// Freeze the state set, verifying every `unsets` reference
    pub fn seal(&mut self) -> Result<()> {
        for name in &self.order {
            for target in &self.states[name].def.unsets {
                if !self.states.contains_key(target) {
                    return Err(PlayerError::config(format!(
                        "state '{}' unsets unknown state '{}'", name, target
                    )));
                }
            }
        }
        self.sealed = true;
        Ok(())
    }
    
    /// Set a state, then clear each state in its `unsets` list
    pub fn set(&mut self, name: &str) -> Result<()> {
        let unsets = self.lookup(name)?.def.unsets.clone();
        for target in &unsets {
            self.lookup(target)?;
        }
        
        self.apply(name, true);
        for target in &unsets {
            self.apply(target, false);
        }
        Ok(())
    }
    
    /// Clear a state
    pub fn unset(&mut self, name: &str) -> Result<()> {
        self.lookup(name)?;
        self.apply(name, false);
        Ok(())
    }
    
    /// Current value of a state
    pub fn is(&self, name: &str) -> Result<bool> {
        Ok(self.lookup(name)?.value)
    }
    
    /// Whether a state is registered
    pub fn contains(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }
    
    /// Names of all states currently set, in declaration order
    pub fn active(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter(|n| self.states[n.as_str()].value)
            .map(|n| n.as_str())
            .collect()
    }
    
    /// Clear every set state
    pub fn clear_all(&mut self) {
        let active: Vec<String> = self.active().into_iter().map(str::to_string).collect();
        for name in active {
            self.apply(&name, false);
        }
    }
    
    /// Drain the hook journal
    pub fn take_hook_changes(&mut self) -> Vec<HookChange> {
        std::mem::take(&mut self.changes)
    }
    
    /// Hook class of a state
    pub fn class_of(&self, name: &str) -> Result<&str> {
        Ok(&self.lookup(name)?.class)
    }
    
    /// Widget element carrying local hooks
    pub fn element(&self) -> &Element {
        &self.element
    }
    
    /// Document root carrying global hooks
    pub fn document(&self) -> &Element {
        &self.document
    }
    
    fn lookup(&self, name: &str) -> Result<&State> {
        self.states
            .get(name)
            .ok_or_else(|| PlayerError::config(format!("unknown state '{}'", name)))
    }
    
    fn apply(&mut self, name: &str, on: bool) {
        let Some(state) = self.states.get_mut(name) else {
            return;
        };
        state.value = on;
        let scope = if state.def.global {
            self.document.class_list.set(&state.class, on);
            HookScope::Global
        } else {
            self.element.class_list.set(&state.class, on);
            HookScope::Local
        };
        tracing::trace!(state = name, on, "state hook");
        self.changes.push(HookChange {
            state: name.to_string(),
            class: state.class.clone(),
            scope,
            on,
        });
    }
}

/// `sourceNone` -> `source-none`
fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use fos_dom::NodeId;
    
    fn registry(map: &StateMap) -> StateRegistry {
        let mut states = StateRegistry::new(
            Element::new(NodeId(1), "div"),
            Element::document_root(),
            HookPrefixes::default(),
        );
        states.extend(map).unwrap();
        states.seal().unwrap();
        states
    }
    
    fn lifecycle() -> StateMap {
        StateMap::new()
            .with("loading", StateDef::local().unsets(&["paused", "playing", "playable"]))
            .with("playable", StateDef::local().unsets(&["loading"]))
            .with("playing", StateDef::local().unsets(&["paused"]))
            .with("paused", StateDef::local().unsets(&["playing"]))
            .with("fullscreen", StateDef::global())
    }
    
    #[test]
    fn test_set_clears_unsets() {
        let mut states = registry(&lifecycle());
        states.set("playing").unwrap();
        states.set("paused").unwrap();
        
        assert!(states.is("paused").unwrap());
        assert!(!states.is("playing").unwrap());
        
        states.set("loading").unwrap();
        assert!(states.is("loading").unwrap());
        assert!(!states.is("paused").unwrap());
        assert!(!states.is("playable").unwrap());
    }
    
    #[test]
    fn test_cascade_order() {
        let mut states = registry(&lifecycle());
        states.take_hook_changes();
        states.set("loading").unwrap();
        
        let order: Vec<(String, bool)> = states
            .take_hook_changes()
            .into_iter()
            .map(|c| (c.state, c.on))
            .collect();
        assert_eq!(order, vec![
            ("loading".to_string(), true),
            ("paused".to_string(), false),
            ("playing".to_string(), false),
            ("playable".to_string(), false),
        ]);
    }
    
    #[test]
    fn test_unsets_are_one_level() {
        let map = StateMap::new()
            .with("a", StateDef::local().unsets(&["b"]))
            .with("b", StateDef::local().unsets(&["c"]))
            .with("c", StateDef::local());
        let mut states = registry(&map);
        states.set("c").unwrap();
        states.set("b").unwrap();
        states.set("a").unwrap();
        
        // b was cleared by a, but b's own unsets were not followed
        assert!(!states.is("b").unwrap());
        assert!(!states.is("c").unwrap());
        
        states.set("c").unwrap();
        states.set("a").unwrap();
        assert!(states.is("c").unwrap());
    }
    
    #[test]
    fn test_hook_classes() {
        let mut states = registry(&lifecycle().with("sourceNone", StateDef::local()));
        states.set("sourceNone").unwrap();
        states.set("fullscreen").unwrap();
        
        assert!(states.element().class_list.contains("is-source-none"));
        assert!(states.document().class_list.contains("player-is-fullscreen"));
        assert!(!states.element().class_list.contains("player-is-fullscreen"));
        
        states.unset("sourceNone").unwrap();
        assert!(!states.element().class_list.contains("is-source-none"));
    }
    
    #[test]
    fn test_unknown_state() {
        let mut states = registry(&lifecycle());
        assert!(matches!(states.set("nope"), Err(PlayerError::Config(_))));
        assert!(matches!(states.unset("nope"), Err(PlayerError::Config(_))));
        assert!(matches!(states.is("nope"), Err(PlayerError::Config(_))));
    }
    
    #[test]
    fn test_sealed_registry() {
        let mut states = registry(&lifecycle());
        let err = states.extend(&StateMap::new().with("late", StateDef::local()));
        assert!(err.is_err());
        assert!(!states.contains("late"));
    }
    
    #[test]
    fn test_seal_rejects_dangling_unsets() {
        let mut states = StateRegistry::new(
            Element::new(NodeId(1), "div"),
            Element::document_root(),
            HookPrefixes::default(),
        );
        states.extend(&StateMap::new().with("a", StateDef::local().unsets(&["ghost"]))).unwrap();
        assert!(states.seal().is_err());
    }
    
    #[test]
    fn test_clear_all() {
        let mut states = registry(&lifecycle());
        states.set("playing").unwrap();
        states.set("fullscreen").unwrap();
        states.clear_all();
        assert!(states.active().is_empty());
        assert!(states.document().class_list.is_empty());
    }
    
    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("sourceNone"), "source-none");
        assert_eq!(kebab_case("soundAvailable"), "sound-available");
        assert_eq!(kebab_case("paused"), "paused");
    }
}
