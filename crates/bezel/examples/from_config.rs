//! Load the viewer setup from a JSON file.
//!
//! ```text
//! cargo run -p bezel --example from_config -- viewer.json
//! ```
//!
//! Without an argument the built-in defaults are used.

use bezel::prelude::*;

fn main() {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => match ViewerConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("from_config: {e}");
                std::process::exit(1);
            }
        },
        None => ViewerConfig::default(),
    };

    if let Err(e) = Viewer::from_config(config).run() {
        eprintln!("from_config: {e}");
        std::process::exit(1);
    }
}
