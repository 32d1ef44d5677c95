//! Responsive plugin
//!
//! Swaps source fields according to breakpoint queries. A source may carry a
//! `responsive` map of query -> partial override; every matching entry is
//! shallow-merged onto the candidate in declaration order, so the last
//! matching entry wins.

use std::any::Any;

use serde_json::{json, Value};

use crate::component::Component;
use crate::debug::DebugSink;
use crate::error::Result;
use crate::event::{names as events, Event};
use crate::plugin::{Plugin, PluginDescriptor, PluginInfo, SelectSourceInterceptor};
use crate::source::SourceSelection;

/// Setter tag for swaps triggered by a breakpoint change
pub const RESPONSIVE_SETTER: &str = "responsive";

/// Evaluates breakpoint queries against the current environment
pub trait BreakpointMatcher {
    fn matches(&self, query: &str) -> bool;
}

/// Matches `(min-width: Npx)` / `(max-width: Npx)` conjunctions against a
/// fixed viewport width. Unknown features never match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportMatcher {
    pub width: u32,
}

impl ViewportMatcher {
    pub fn new(width: u32) -> Self {
        Self { width }
    }
    
    fn feature_matches(&self, feature: &str) -> bool {
        let feature = feature.trim().trim_start_matches('(').trim_end_matches(')');
        let Some((name, value)) = feature.split_once(':') else {
            return false;
        };
        let Some(px) = value.trim().strip_suffix("px").and_then(|v| v.trim().parse::<f64>().ok()) else {
            return false;
        };
        let width = f64::from(self.width);
        match name.trim() {
            "min-width" => width >= px,
            "max-width" => width <= px,
            _ => false,
        }
    }
}

impl BreakpointMatcher for ViewportMatcher {
    fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        let query = query.trim().trim_start_matches("screen and").trim();
        !query.is_empty() && query.split(" and ").all(|feature| self.feature_matches(feature))
    }
}

/// Merge every matching breakpoint override onto `source`
pub fn resolve_breakpoints(source: &mut Value, matcher: &dyn BreakpointMatcher) -> usize {
    let Some(Value::Object(breakpoints)) = source.get("responsive").cloned() else {
        return 0;
    };
    let Some(fields) = source.as_object_mut() else {
        return 0;
    };
    
    let mut applied = 0;
    for (query, overrides) in &breakpoints {
        if !matcher.matches(query) {
            continue;
        }
        if let Value::Object(overrides) = overrides {
            for (key, value) in overrides {
                fields.insert(key.clone(), value.clone());
            }
            applied += 1;
        }
    }
    applied
}

/// Responsive plugin
pub struct ResponsivePlugin {
    matcher: Box<dyn BreakpointMatcher>,
    keep_time: bool,
    resume: Option<(f64, bool)>,
    debug: DebugSink,
}

impl ResponsivePlugin {
    pub const NAME: &'static str = "responsive";
    
    pub fn new(matcher: Box<dyn BreakpointMatcher>, debug: DebugSink) -> Self {
        Self {
            matcher,
            keep_time: true,
            resume: None,
            debug,
        }
    }
    
    pub fn descriptor<M: BreakpointMatcher + 'static>(matcher: M) -> PluginDescriptor {
        PluginDescriptor::new(Self::NAME, json!({}), move |_, _, debug| {
            Ok(Box::new(ResponsivePlugin::new(Box::new(matcher), debug)) as Box<dyn Plugin>)
        })
    }
    
    /// Replace the matcher, e.g. after a viewport resize. Callers follow up
    /// with `Player::reselect_source(RESPONSIVE_SETTER)`.
    pub fn set_matcher(&mut self, matcher: Box<dyn BreakpointMatcher>) {
        self.matcher = matcher;
    }
    
    fn on_update(&mut self, event: &mut Event, component: &Component) {
        self.resume = None;
        let Some(source) = event.get_mut("source") else {
            return;
        };
        let applied = resolve_breakpoints(source, self.matcher.as_ref());
        if applied > 0 {
            self.debug.log(format_args!("{} breakpoint override(s) applied", applied));
        }
        
        let swapping = event.get("setter").and_then(Value::as_str) == Some(RESPONSIVE_SETTER);
        if self.keep_time && swapping && component.media.source().is_some() {
            self.resume = Some((component.media.current_time(), component.media.paused()));
        }
    }
    
    fn on_set(&mut self, component: &mut Component) {
        let Some((time, paused)) = self.resume.take() else {
            return;
        };
        component.media.set_current_time(time);
        if !paused {
            if let Err(e) = component.media.play() {
                tracing::warn!(error = %e, "could not resume playback after source swap");
            }
        }
    }
}

impl std::fmt::Debug for ResponsivePlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponsivePlugin")
            .field("keep_time", &self.keep_time)
            .field("resume", &self.resume)
            .finish()
    }
}

impl Plugin for ResponsivePlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo {
            name: Self::NAME,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
    
    fn extend_config(&self) -> Option<Value> {
        Some(json!({ "responsive": { "keepTime": true } }))
    }
    
    fn register_events(&self) -> Vec<&'static str> {
        vec![events::SOURCE_UPDATE, events::SOURCE_SET]
    }
    
    fn handle_event(&mut self, event: &mut Event, component: &mut Component) -> Result<()> {
        match event.kind.as_str() {
            events::SOURCE_UPDATE => self.on_update(event, component),
            events::SOURCE_SET => self.on_set(component),
            _ => {}
        }
        Ok(())
    }
    
    fn init_component(&mut self, component: &mut Component) -> Result<()> {
        self.keep_time = component.config.get_bool("responsive.keepTime").unwrap_or(true);
        Ok(())
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

impl SelectSourceInterceptor for ResponsivePlugin {
    fn select_source(&mut self, selection: &mut SourceSelection, _component: &Component) -> Result<()> {
        resolve_breakpoints(&mut selection.source, self.matcher.as_ref());
        Ok(())
    }
}
