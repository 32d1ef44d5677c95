//! The shared widget aggregate handed to plugins.

use std::collections::VecDeque;

use fos_dom::{Element, NodeId};
use fos_media::{FullscreenManager, MediaElement};
use serde_json::Value;

use crate::config::Config;
use crate::debug::DebugSink;
use crate::error::{PlayerError, Result};
use crate::event::Event;
use crate::source::Selection;
use crate::state::StateRegistry;

/// Everything one widget instance owns: its resolved config, its states, the
/// platform media element, and the current source selection.
///
/// Plugins receive it by reference. They cannot reach the event bus while a
/// dispatch is in flight; notifications they raise with [`emit`](Self::emit)
/// are queued and delivered once the current operation finishes.
#[derive(Debug)]
pub struct Component {
    pub config: Config,
    pub states: StateRegistry,
    pub media: Box<dyn MediaElement>,
    pub fullscreen: FullscreenManager,
    pub parent: Option<NodeId>,
    pub(crate) selection: Selection,
    debug: DebugSink,
    outbox: VecDeque<Event>,
}

impl Component {
    pub(crate) fn new(
        config: Config,
        states: StateRegistry,
        media: Box<dyn MediaElement>,
        parent: Option<NodeId>,
        debug: DebugSink,
    ) -> Self {
        Self {
            config,
            states,
            media,
            fullscreen: FullscreenManager::new(),
            parent,
            selection: Selection::default(),
            debug,
            outbox: VecDeque::new(),
        }
    }
    
    /// Widget root element
    pub fn element(&self) -> &Element {
        self.states.element()
    }
    
    pub fn debug(&self) -> &DebugSink {
        &self.debug
    }
    
    /// Index of the active source in the source list
    pub fn current_index(&self) -> Option<usize> {
        self.selection.index()
    }
    
    /// The active source as committed, after plugin rewrites
    pub fn current_source(&self) -> Option<&Value> {
        self.selection.source()
    }
    
    /// `src` of the active source
    pub fn current_src(&self) -> Option<&str> {
        self.current_source()?.get("src")?.as_str()
    }
    
    /// The configured source list
    pub fn sources(&self) -> Result<&Vec<Value>> {
        match self.config.get("sources") {
            Some(Value::Array(list)) => Ok(list),
            Some(_) => Err(PlayerError::config("'sources' must be a list")),
            None => Err(PlayerError::config("'sources' is not configured")),
        }
    }
    
    /// Queue a non-cancelable notification
    pub fn emit(&mut self, kind: &str, detail: Value) {
        self.outbox.push_back(Event::new(kind, detail, false));
    }
    
    pub(crate) fn next_queued(&mut self) -> Option<Event> {
        self.outbox.pop_front()
    }
    
    pub(crate) fn discard_queued(&mut self) {
        self.outbox.clear();
    }
}
