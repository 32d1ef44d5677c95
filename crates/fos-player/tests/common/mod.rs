//! Shared fixtures for the player integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use fos_dom::{Element, NodeId};
use fos_media::{HTMLVideoElement, MediaElement, MediaError, MediaSource};
use fos_player::{DebugSink, Event, Player, PlayerOptions, Scope};
use serde_json::Value;

/// Headless element the test keeps a handle to after handing it over
#[derive(Debug, Default)]
pub struct TestMedia {
    pub inner: Rc<RefCell<HTMLVideoElement>>,
    source: Option<MediaSource>,
    poster: Option<String>,
}

impl MediaElement for TestMedia {
    fn set_source(&mut self, source: Option<MediaSource>) {
        self.source = source.clone();
        self.inner.borrow_mut().set_source(source);
    }
    
    fn source(&self) -> Option<&MediaSource> {
        self.source.as_ref()
    }
    
    fn load(&mut self) {
        self.inner.borrow_mut().load();
    }
    
    fn play(&mut self) -> Result<(), MediaError> {
        self.inner.borrow_mut().play()
    }
    
    fn pause(&mut self) {
        self.inner.borrow_mut().pause();
    }
    
    fn paused(&self) -> bool {
        self.inner.borrow().paused()
    }
    
    fn current_time(&self) -> f64 {
        self.inner.borrow().current_time()
    }
    
    fn set_current_time(&mut self, time: f64) {
        self.inner.borrow_mut().set_current_time(time);
    }
    
    fn duration(&self) -> f64 {
        self.inner.borrow().duration()
    }
    
    fn volume(&self) -> f64 {
        self.inner.borrow().volume()
    }
    
    fn set_volume(&mut self, volume: f64) {
        self.inner.borrow_mut().set_volume(volume);
    }
    
    fn muted(&self) -> bool {
        self.inner.borrow().muted()
    }
    
    fn set_muted(&mut self, muted: bool) {
        self.inner.borrow_mut().set_muted(muted);
    }
    
    fn poster(&self) -> Option<&str> {
        self.poster.as_deref()
    }
    
    fn set_poster(&mut self, poster: Option<&str>) {
        self.poster = poster.map(str::to_string);
        self.inner.borrow_mut().set_poster(poster);
    }
    
    fn has_audio(&self) -> Option<bool> {
        self.inner.borrow().has_audio()
    }
}

pub type Handle = Rc<RefCell<HTMLVideoElement>>;

/// Build a player over a fresh element; `options` decides whether it is
/// initialized right away
pub fn build(settings: Value, options: PlayerOptions) -> (Player, Handle) {
    let media = TestMedia::default();
    let handle = media.inner.clone();
    let options = options.settings(settings).debug(DebugSink::disabled());
    let player = Player::new(Element::new(NodeId(1), "div"), Box::new(media), options)
        .expect("player should build");
    (player, handle)
}

pub fn player(settings: Value) -> (Player, Handle) {
    build(settings, PlayerOptions::new())
}

/// Record every event of `kinds` as `(kind, detail)`
pub fn record(player: &mut Player, kinds: &[&str]) -> Rc<RefCell<Vec<(String, Value)>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    for kind in kinds {
        let log = log.clone();
        player.add_listener(kind, move |event: &mut Event, _: &mut Scope| {
            log.borrow_mut().push((event.kind.clone(), event.detail.clone()));
            Ok(())
        });
    }
    log
}

/// Names of recorded events, in order
pub fn kinds(log: &Rc<RefCell<Vec<(String, Value)>>>) -> Vec<String> {
    log.borrow().iter().map(|(kind, _)| kind.clone()).collect()
}
