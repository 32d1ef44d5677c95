//! Source Lifecycle Controller
//!
//! Decides which configured source is active and walks the media element
//! through loading. Every change is announced with a cancelable
//! `source.update` first; a vetoed update leaves selection and states as
//! they were.
//!
//! There is no in-flight guard: a second `set_source` while `loading` is
//! only short-circuited when it names the same `src`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use fos_media::MediaSource;

use crate::error::{PlayerError, Result};
use crate::event::{names as events, Event};
use crate::player::{Player, Scope};
use crate::plugin::Hook;
use crate::state::{names as states, StateDef, StateMap};

/// MIME type assumed when a source declares none
pub const DEFAULT_TYPE: &str = "video/mp4";

/// Setter tag used by [`Player::select_source`]
pub const SELECT_SOURCE_SETTER: &str = "selectSource";

/// A configured media source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub src: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    /// Breakpoint query -> partial source override
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub responsive: Map<String, Value>,
}

impl Source {
    pub fn new(src: &str) -> Self {
        Self {
            src: src.to_string(),
            mime_type: None,
            poster: None,
            responsive: Map::new(),
        }
    }
    
    /// Parse and validate a source object
    pub fn from_value(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(PlayerError::config("source must be a key-value object"));
        }
        let source: Source = serde_json::from_value(value.clone())
            .map_err(|e| PlayerError::config(format!("invalid source: {}", e)))?;
        if source.src.is_empty() {
            return Err(PlayerError::config("source.src must not be empty"));
        }
        Ok(source)
    }
    
    pub fn mime_type(&self) -> &str {
        self.mime_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TYPE)
    }
    
    pub fn to_media_source(&self) -> MediaSource {
        MediaSource::new(&self.src, self.mime_type())
    }
}

/// An in-flight selection passed through the `selectSource` hook
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSelection {
    pub index: usize,
    pub source: Value,
}

impl SourceSelection {
    pub fn new(index: usize, source: Value) -> Self {
        Self { index, source }
    }
}

/// The committed `(index, source)` pair
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Selection {
    index: Option<usize>,
    source: Option<Value>,
}

impl Selection {
    pub(crate) fn index(&self) -> Option<usize> {
        self.index
    }
    
    pub(crate) fn source(&self) -> Option<&Value> {
        self.source.as_ref()
    }
    
    fn commit(&mut self, index: Option<usize>, source: Value) {
        self.index = index;
        self.source = Some(source);
    }
    
    pub(crate) fn clear(&mut self) {
        self.index = None;
        self.source = None;
    }
}

/// Lifecycle and sound-detection states
pub fn core_states() -> StateMap {
    StateMap::new()
        .with(states::SOURCE_NONE, StateDef::local())
        .with(states::LOADING, StateDef::local().unsets(&[
            states::PAUSED, states::PLAYING, states::PLAYABLE, states::ERROR,
        ]))
        .with(states::PLAYABLE, StateDef::local().unsets(&[states::LOADING]))
        .with(states::PLAYING, StateDef::local().unsets(&[states::PAUSED]))
        .with(states::PAUSED, StateDef::local().unsets(&[states::PLAYING]))
        .with(states::ENDED, StateDef::local().unsets(&[states::PLAYING]))
        .with(states::ERROR, StateDef::local().unsets(&[
            states::PAUSED, states::PLAYING, states::PLAYABLE, states::LOADING,
        ]))
        .with(states::SOUND_AVAILABLE, StateDef::local().unsets(&[
            states::SOUND_NONE, states::SOUND_UNKNOWN,
        ]))
        .with(states::SOUND_NONE, StateDef::local().unsets(&[
            states::SOUND_AVAILABLE, states::SOUND_UNKNOWN,
        ]))
        .with(states::SOUND_UNKNOWN, StateDef::local().unsets(&[
            states::SOUND_AVAILABLE, states::SOUND_NONE,
        ]))
}

impl Player {
    /// Select a configured source by index, `None` unsets the source.
    ///
    /// Returns `Ok(false)` when a listener vetoed the change or the source
    /// was already active.
    pub fn select_source(&mut self, index: Option<usize>) -> Result<bool> {
        self.ensure_live()?;
        let result = self.select_source_with(index, SELECT_SOURCE_SETTER);
        self.finish(result)
    }
    
    /// Run the current index through selection again, e.g. after a
    /// breakpoint change. Does nothing without a current index.
    pub fn reselect_source(&mut self, setter: &str) -> Result<bool> {
        self.ensure_live()?;
        let result = match self.current_index() {
            Some(index) => self.select_source_with(Some(index), setter),
            None => Ok(false),
        };
        self.finish(result)
    }
    
    /// Activate an arbitrary source object.
    ///
    /// The current index is taken from the first configured source with the
    /// same `src`. When none matches, the source becomes active with
    /// `current_index() == None`; this is the one case where a source is set
    /// without an index.
    pub fn set_source(&mut self, source: &Value, setter: &str) -> Result<bool> {
        self.ensure_live()?;
        let result = self.set_source_with(source.clone(), setter, None);
        self.finish(result)
    }
    
    /// Clear the active source
    pub fn unset_source(&mut self, remove_poster: bool, setter: &str) -> Result<bool> {
        self.ensure_live()?;
        let result = self.unset_source_with(remove_poster, setter);
        self.finish(result)
    }
    
    /// Apply or remove the poster image; an empty string removes it
    pub fn set_poster(&mut self, poster: Option<&str>) -> Result<()> {
        self.ensure_live()?;
        let result = self.set_poster_with(poster);
        self.finish(result)
    }
    
    /// Index of the first source whose `prop` equals `value`
    pub fn find_source_index_prop(&self, prop: &str, value: &Value) -> Result<Option<usize>> {
        Ok(self
            .component()
            .sources()?
            .iter()
            .position(|source| source.get(prop) == Some(value)))
    }
    
    /// First source whose `prop` equals `value`
    pub fn find_source_prop(&self, prop: &str, value: &Value) -> Result<Option<&Value>> {
        Ok(self
            .component()
            .sources()?
            .iter()
            .find(|source| source.get(prop) == Some(value)))
    }
    
    pub(crate) fn select_source_with(&mut self, index: Option<usize>, setter: &str) -> Result<bool> {
        let Some(index) = index else {
            return self.unset_source_with(true, setter);
        };
        
        let sources = self.component().sources()?;
        let source = sources.get(index).cloned().ok_or_else(|| {
            PlayerError::lookup(format!("source index {} out of range ({} sources)", index, sources.len()))
        })?;
        
        let mut selection = SourceSelection::new(index, source);
        let Scope { component, plugins } = &mut self.scope;
        plugins.run(Hook::SelectSource(&mut selection), component)?;
        
        let count = self.component().sources()?.len();
        if selection.index >= count || !selection.source.is_object() {
            return Err(PlayerError::lookup(format!(
                "selection no longer resolves: index {} of {} sources",
                selection.index, count
            )));
        }
        self.set_source_with(selection.source, setter, Some(selection.index))
    }
    
    pub(crate) fn set_source_with(&mut self, source: Value, setter: &str, index: Option<usize>) -> Result<bool> {
        if !source.is_object() {
            return Err(PlayerError::config("source must be a key-value object"));
        }
        let requested = source.get("src").cloned();
        
        let update = Event::new(events::SOURCE_UPDATE, json!({ "source": source, "setter": setter }), true);
        let update = self.dispatch_event(update)?;
        if update.is_default_prevented() {
            self.component().debug().log(format_args!("source update vetoed ({})", setter));
            return Ok(false);
        }
        
        let source = update.get("source").cloned().unwrap_or(Value::Null);
        let parsed = Source::from_value(&source)?;
        let index = match (index, requested) {
            (Some(index), _) => Some(index),
            (None, Some(src)) => self.find_source_index_prop("src", &src)?,
            (None, None) => None,
        };
        
        let component = &mut self.scope.component;
        if component.current_src() == Some(parsed.src.as_str()) {
            if index.is_some() {
                component.selection.index = index;
            }
            return Ok(false);
        }
        
        component.states.set(states::LOADING)?;
        component.media.pause();
        component.media.set_source(None);
        let poster = parsed
            .poster
            .clone()
            .or_else(|| component.config.get_str("poster").map(str::to_string));
        self.set_poster_with(poster.as_deref())?;
        
        let detail = json!({ "source": source, "setter": setter });
        self.dispatch_event(Event::new(events::SOURCE_BEFORE, detail.clone(), false))?;
        
        let component = &mut self.scope.component;
        component.media.set_source(Some(parsed.to_media_source()));
        component.media.load();
        component.selection.commit(index, source);
        component.states.unset(states::SOURCE_NONE)?;
        tracing::debug!(src = %parsed.src, setter, "source set");
        
        self.dispatch_event(Event::new(events::SOURCE_SET, detail, false))?;
        Ok(true)
    }
    
    pub(crate) fn unset_source_with(&mut self, remove_poster: bool, setter: &str) -> Result<bool> {
        let update = Event::new(events::SOURCE_UPDATE, json!({ "source": null, "setter": setter }), true);
        if self.dispatch_event(update)?.is_default_prevented() {
            return Ok(false);
        }
        
        let component = &mut self.scope.component;
        component.states.set(states::LOADING)?;
        component.media.pause();
        component.media.set_source(None);
        if remove_poster {
            self.set_poster_with(None)?;
        }
        
        let component = &mut self.scope.component;
        component.selection.clear();
        component.states.set(states::SOURCE_NONE)?;
        tracing::debug!(setter, "source unset");
        
        self.dispatch_event(Event::new(
            events::SOURCE_UNSET,
            json!({ "source": null, "setter": setter }),
            false,
        ))?;
        Ok(true)
    }
    
    pub(crate) fn set_poster_with(&mut self, poster: Option<&str>) -> Result<()> {
        let poster = poster.filter(|p| !p.is_empty());
        self.scope.component.media.set_poster(poster);
        let event = match poster {
            Some(url) => Event::new(events::POSTER_SET, json!({ "poster": url }), false),
            None => Event::new(events::POSTER_UNSET, json!({ "poster": null }), false),
        };
        self.dispatch_event(event)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_source_defaults() {
        let source = Source::from_value(&json!({"src": "a.mp4"})).unwrap();
        assert_eq!(source.mime_type(), DEFAULT_TYPE);
        assert_eq!(source.poster, None);
        assert_eq!(source.to_media_source(), MediaSource::new("a.mp4", "video/mp4"));
    }
    
    #[test]
    fn test_source_validation() {
        assert!(matches!(Source::from_value(&json!("a.mp4")), Err(PlayerError::Config(_))));
        assert!(matches!(Source::from_value(&json!({"src": ""})), Err(PlayerError::Config(_))));
        assert!(matches!(Source::from_value(&json!({"type": "video/webm"})), Err(PlayerError::Config(_))));
    }
    
    #[test]
    fn test_source_keeps_breakpoint_order() {
        let source = Source::from_value(&json!({
            "src": "a.mp4",
            "type": "video/webm",
            "responsive": {"(min-width:900px)": {"src": "c"}, "(min-width:0px)": {"src": "b"}}
        }))
        .unwrap();
        assert_eq!(source.mime_type(), "video/webm");
        let keys: Vec<&str> = source.responsive.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["(min-width:900px)", "(min-width:0px)"]);
    }
    
    #[test]
    fn test_core_states_unsets() {
        let map = core_states();
        let loading = map.iter().find(|(n, _)| *n == states::LOADING).unwrap().1;
        assert_eq!(loading.unsets, vec!["paused", "playing", "playable", "error"]);
        let ended = map.iter().find(|(n, _)| *n == states::ENDED).unwrap().1;
        assert_eq!(ended.unsets, vec!["playing"]);
    }
}
