//! Example: Basic usage of fOS Player

use std::time::Duration;

use fos_dom::{Element, NodeId};
use fos_media::HTMLVideoElement;
use fos_player::plugins::{FullscreenPlugin, ResponsivePlugin, SoundPlugin, ViewportMatcher};
use fos_player::{events, Event, MediaSignal, Player, PlayerOptions, Scope};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();
    
    let settings = json!({
        "debug": true,
        "poster": "poster.jpg",
        "sources": [{
            "src": "intro-480.mp4",
            "responsive": {
                "(min-width: 1280px)": { "src": "intro-1080.mp4" }
            }
        }]
    });
    
    let options = PlayerOptions::new()
        .settings(settings)
        .plugin(SoundPlugin::descriptor())
        .plugin(FullscreenPlugin::descriptor())
        .plugin(ResponsivePlugin::descriptor(ViewportMatcher::new(1920)))
        .deferred();
    
    let element = Element::new(NodeId(1), "div");
    let mut player = Player::new(element, Box::new(HTMLVideoElement::new()), options)?;
    
    player.add_listener(events::SOURCE_SET, |event: &mut Event, _: &mut Scope| {
        println!("source set: {}", event.detail["source"]["src"]);
        Ok(())
    });
    player.init()?;
    
    player.handle_media_signal(MediaSignal::CanPlay)?;
    println!("states: {:?}", player.states().active());
    
    // Double click enters fullscreen
    player.controls_press(Duration::from_millis(0))?;
    player.controls_press(Duration::from_millis(120))?;
    println!("fullscreen: {}", player.is("fullscreen")?);
    
    player.with_plugin::<SoundPlugin, _, _>(|sound, component| sound.toggle_mute(component))?;
    println!("muted: {}", player.media().muted());
    
    player.destroy()?;
    Ok(())
}
