//! Saved views.
//!
//! A [`ViewPreset`] is everything the user can set on the control panel:
//! transform, background, wireframe flag and the selected animation preset.
//! It is stored as pretty-printed JSON. Model geometry is never saved.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::animation::AnimationPreset;
use crate::error::ViewerError;
use crate::math::TransformParameters;
use crate::render::DEFAULT_BACKGROUND;

/// Default file name for [`ViewPreset::save`] / [`ViewPreset::load`].
pub const DEFAULT_PRESET_PATH: &str = "bezel-view.json";

/// One saved view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewPreset {
    pub parameters: TransformParameters,
    pub background: String,
    pub wireframe: bool,
    pub animation_preset: AnimationPreset,
}

impl Default for ViewPreset {
    fn default() -> Self {
        Self {
            parameters: TransformParameters::default(),
            background: DEFAULT_BACKGROUND.to_string(),
            wireframe: false,
            animation_preset: AnimationPreset::default(),
        }
    }
}

impl ViewPreset {
    pub fn to_json(&self) -> Result<String, ViewerError> {
        serde_json::to_string_pretty(self)
            .map_err(|source| ViewerError::Json { path: None, source })
    }

    /// Parse a preset. Non-finite parameters are replaced by their defaults.
    pub fn from_json(json: &str) -> Result<Self, ViewerError> {
        let mut preset: ViewPreset =
            serde_json::from_str(json).map_err(|source| ViewerError::Json { path: None, source })?;
        preset.parameters.sanitize();
        Ok(preset)
    }

    pub fn save(&self, path: &Path) -> Result<(), ViewerError> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| ViewerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("saved view to {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ViewerError> {
        let json = std::fs::read_to_string(path).map_err(|source| ViewerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let preset = Self::from_json(&json).map_err(|e| match e {
            ViewerError::Json { source, .. } => ViewerError::Json {
                path: Some(path.to_path_buf()),
                source,
            },
            other => other,
        })?;
        log::info!("loaded view from {}", path.display());
        Ok(preset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::math::Parameter;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("bezel-{}-{name}", std::process::id()))
    }

    #[test]
    fn save_then_load_restores_view() {
        let path = temp_path("view.json");
        let preset = ViewPreset {
            parameters: TransformParameters::IDENTITY.with(Parameter::RotationX, 45.0),
            background: "#102030".to_string(),
            wireframe: true,
            animation_preset: AnimationPreset::Bounce,
        };
        preset.save(&path).unwrap();
        let loaded = ViewPreset::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, preset);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let preset = ViewPreset::from_json(r#"{ "wireframe": true }"#).unwrap();
        assert!(preset.wireframe);
        assert_eq!(preset.background, DEFAULT_BACKGROUND);
        assert_eq!(preset.parameters, TransformParameters::default());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ViewPreset::load(&temp_path("does-not-exist.json")).unwrap_err();
        assert!(matches!(err, ViewerError::Io { .. }));
    }

    #[test]
    fn bad_json_names_the_file() {
        let path = temp_path("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = ViewPreset::load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        match err {
            ViewerError::Json { path: Some(p), .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}
