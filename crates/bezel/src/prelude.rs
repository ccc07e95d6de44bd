//! Convenience re-exports: `use bezel::prelude::*` for the common items.

pub use crate::animation::{AnimationController, AnimationPreset, AnimationState, TimeStep};
pub use crate::config::{AnimationConfig, ViewerConfig};
pub use crate::error::ViewerError;
pub use crate::frame::{DrawCall, FrameDriver, FrameStats, Scene};
pub use crate::input::{ControlEvent, ControlPanel, InputSource, KeyBindings, KeyCode};
pub use crate::math::{Mat4, Parameter, Projection, TransformParameters, Vec3};
pub use crate::mesh::{GeometryBuffer, ModelVariant};
pub use crate::preset::ViewPreset;
pub use crate::render::{ClearColor, GraphicsBackend, MatrixSlot};
pub use crate::viewer::Viewer;
