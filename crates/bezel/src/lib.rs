//! # Bezel — Interactive Monitor Viewer
//!
//! Renders a procedurally built computer monitor with wgpu and lets you move
//! it around: seven sliders for position, rotation, and scale, a wireframe
//! toggle, a background color, three animation presets, and view presets
//! saved as JSON.
//!
//! Start with `use bezel::prelude::*` and build a [`Viewer`](viewer::Viewer).

pub mod animation;
pub mod config;
pub mod error;
pub mod frame;
pub mod input;
pub mod math;
pub mod mesh;
pub mod prelude;
pub mod preset;
pub mod render;
pub mod time;
pub mod viewer;
pub(crate) mod window;

#[cfg(feature = "panel")]
pub mod panel;

#[cfg(feature = "diagnostics")]
pub mod diag;

#[cfg(test)]
mod testing;
