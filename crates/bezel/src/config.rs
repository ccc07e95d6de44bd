//! Viewer configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes:
//!
//! ```json
//! {
//!   "title": "Monitor",
//!   "model": "simple",
//!   "background": "#202028",
//!   "parameters": { "rotation": [0.0, 30.0, 0.0] },
//!   "animation": { "preset": "bounce", "autostart": true }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::animation::{AnimationPreset, TimeStep};
use crate::error::ViewerError;
use crate::math::TransformParameters;
use crate::mesh::ModelVariant;
use crate::preset::{DEFAULT_PRESET_PATH, ViewPreset};
use crate::render::DEFAULT_BACKGROUND;

/// Animation settings at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub preset: AnimationPreset,
    /// Start animating on the first frame.
    pub autostart: bool,
    pub time_step: TimeStep,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            preset: AnimationPreset::default(),
            autostart: false,
            time_step: TimeStep::default(),
        }
    }
}

/// Everything the viewer needs before the window opens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub model: ModelVariant,
    pub background: String,
    pub parameters: TransformParameters,
    pub wireframe: bool,
    pub animation: AnimationConfig,
    pub preset_path: PathBuf,
    /// Show the control panel at startup.
    pub panel_visible: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "bezel".to_string(),
            width: 1280,
            height: 720,
            model: ModelVariant::default(),
            background: DEFAULT_BACKGROUND.to_string(),
            parameters: TransformParameters::default(),
            wireframe: false,
            animation: AnimationConfig::default(),
            preset_path: PathBuf::from(DEFAULT_PRESET_PATH),
            panel_visible: true,
        }
    }
}

impl ViewerConfig {
    pub fn from_json(json: &str) -> Result<Self, ViewerError> {
        let mut config: ViewerConfig =
            serde_json::from_str(json).map_err(|source| ViewerError::Json { path: None, source })?;
        let replaced = config.parameters.sanitize();
        if !replaced.is_empty() {
            log::warn!("config: non-finite {replaced:?} replaced by defaults");
        }
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ViewerError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ViewerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json).map_err(|e| match e {
            ViewerError::Json { source, .. } => ViewerError::Json {
                path: Some(path.to_path_buf()),
                source,
            },
            other => other,
        })?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// The view that "reset" returns to.
    pub fn default_view(&self) -> ViewPreset {
        ViewPreset {
            parameters: self.parameters,
            background: self.background.clone(),
            wireframe: self.wireframe,
            animation_preset: self.animation.preset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(ViewerConfig::from_json("{}").unwrap(), ViewerConfig::default());
    }

    #[test]
    fn partial_config_overrides_only_given_keys() {
        let config = ViewerConfig::from_json(
            r##"{
                "model": "simple",
                "background": "#202028",
                "parameters": { "rotation": [0.0, 30.0, 0.0] },
                "animation": { "preset": "bounce", "autostart": true, "time_step": "real-time" }
            }"##,
        )
        .unwrap();
        assert_eq!(config.model, ModelVariant::Simple);
        assert_eq!(config.parameters.rotation, Vec3::new(0.0, 30.0, 0.0));
        assert_eq!(config.parameters.scale, 1.0);
        assert_eq!(config.animation.preset, AnimationPreset::Bounce);
        assert!(config.animation.autostart);
        assert_eq!(config.animation.time_step, TimeStep::RealTime);
        assert_eq!(config.width, 1280);
    }

    #[test]
    fn unknown_model_is_an_error() {
        let err = ViewerConfig::from_json(r#"{ "model": "crt" }"#).unwrap_err();
        assert!(matches!(err, ViewerError::Json { path: None, .. }));
    }

    #[test]
    fn default_view_mirrors_config() {
        let config = ViewerConfig {
            wireframe: true,
            background: "#000000".to_string(),
            ..ViewerConfig::default()
        };
        let view = config.default_view();
        assert!(view.wireframe);
        assert_eq!(view.background, "#000000");
        assert_eq!(view.animation_preset, AnimationPreset::Spin);
    }
}
