//! Simple monitor — box bezel on a cylinder stand, bouncing on a dark
//! background with the panel hidden (F12 shows it).

use bezel::prelude::*;

fn main() {
    env_logger::init();

    let result = Viewer::new("bezel — simple monitor")
        .model(ModelVariant::Simple)
        .background("#1a1a24")
        .animation(AnimationPreset::Bounce)
        .autostart(true)
        .panel_visible(false)
        .run();

    if let Err(e) = result {
        eprintln!("simple_monitor: {e}");
        std::process::exit(1);
    }
}
