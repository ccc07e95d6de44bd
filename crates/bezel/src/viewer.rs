//! Viewer builder.
//!
//! [`Viewer`] is the entry point: pick a model and a starting view, then
//! call [`run`](Viewer::run) to open the window.
//!
//! # Example
//!
//! ```ignore
//! use bezel::prelude::*;
//!
//! fn main() -> Result<(), ViewerError> {
//!     env_logger::init();
//!     Viewer::new("Monitor")
//!         .model(ModelVariant::Detailed)
//!         .background("#202028")
//!         .animation(AnimationPreset::Spin)
//!         .autostart(true)
//!         .run()
//! }
//! ```

use std::path::PathBuf;

use crate::animation::{AnimationPreset, TimeStep};
use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::input::KeyBindings;
use crate::math::TransformParameters;
use crate::mesh::ModelVariant;

/// Builder for a viewer window.
pub struct Viewer {
    config: ViewerConfig,
    bindings: KeyBindings,
}

impl Viewer {
    /// Create a viewer with default settings and the given window title.
    pub fn new(title: &str) -> Self {
        Self::from_config(ViewerConfig {
            title: title.to_string(),
            ..ViewerConfig::default()
        })
    }

    /// Start from a loaded config.
    pub fn from_config(config: ViewerConfig) -> Self {
        Self {
            config,
            bindings: KeyBindings::default(),
        }
    }

    pub fn model(mut self, model: ModelVariant) -> Self {
        self.config.model = model;
        self
    }

    /// Background as `#rrggbb`. A malformed value falls back to white.
    pub fn background(mut self, hex: &str) -> Self {
        self.config.background = hex.to_string();
        self
    }

    /// Starting transform; also what "reset" returns to.
    pub fn parameters(mut self, mut parameters: TransformParameters) -> Self {
        let replaced = parameters.sanitize();
        if !replaced.is_empty() {
            log::warn!("non-finite {replaced:?} replaced by defaults");
        }
        self.config.parameters = parameters;
        self
    }

    pub fn wireframe(mut self, wireframe: bool) -> Self {
        self.config.wireframe = wireframe;
        self
    }

    /// The animation preset selected at startup.
    pub fn animation(mut self, preset: AnimationPreset) -> Self {
        self.config.animation.preset = preset;
        self
    }

    /// Start animating on the first frame.
    pub fn autostart(mut self, autostart: bool) -> Self {
        self.config.animation.autostart = autostart;
        self
    }

    pub fn time_step(mut self, time_step: TimeStep) -> Self {
        self.config.animation.time_step = time_step;
        self
    }

    /// Where "save view" and "load view" read and write.
    pub fn preset_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.preset_path = path.into();
        self
    }

    /// Initial window size in logical pixels.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    /// Show the control panel at startup. F12 toggles it either way.
    pub fn panel_visible(mut self, visible: bool) -> Self {
        self.config.panel_visible = visible;
        self
    }

    /// Replace the default key map.
    pub fn key_bindings(mut self, bindings: KeyBindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Open the window and run until it closes.
    ///
    /// Returns the error that stopped the viewer, if startup failed.
    pub fn run(self) -> Result<(), ViewerError> {
        log::info!(
            "starting viewer '{}' ({} model)",
            self.config.title,
            self.config.model.name()
        );

        let event_loop = winit::event_loop::EventLoop::new()?;
        let mut app = crate::window::WinitApp::new(self.config, self.bindings);
        event_loop.run_app(&mut app)?;

        match app.take_error() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    #[test]
    fn builder_fills_config() {
        let viewer = Viewer::new("Test")
            .model(ModelVariant::Simple)
            .background("#000000")
            .wireframe(true)
            .animation(AnimationPreset::Pulse)
            .autostart(true)
            .size(800, 600)
            .preset_path("view.json");
        let config = viewer.config();
        assert_eq!(config.title, "Test");
        assert_eq!(config.model, ModelVariant::Simple);
        assert_eq!(config.background, "#000000");
        assert!(config.wireframe);
        assert_eq!(config.animation.preset, AnimationPreset::Pulse);
        assert!(config.animation.autostart);
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.preset_path, PathBuf::from("view.json"));
    }

    #[test]
    fn parameters_are_sanitized() {
        let params = TransformParameters {
            position: Vec3::new(f32::NAN, 0.5, 0.0),
            ..TransformParameters::default()
        };
        let viewer = Viewer::new("Test").parameters(params);
        assert_eq!(viewer.config().parameters.position, Vec3::new(0.0, 0.5, 0.0));
    }
}
