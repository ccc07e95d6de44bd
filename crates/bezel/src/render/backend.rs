//! The drawing surface the frame driver talks to.
//!
//! [`GraphicsBackend`] is the whole contract between the frame logic and a
//! GPU: upload the model once, set two matrices, clear, and issue indexed
//! draws. [`WgpuBackend`](super::WgpuBackend) is the real implementation;
//! tests use a recording double.

use glam::Mat4;

use crate::frame::DrawCall;
use crate::mesh::GeometryBuffer;
use crate::render::pass::ClearColor;

/// Which matrix uniform to write.
///
/// Uniforms live at fixed bindings in the shader, so a slot replaces
/// looking a location up by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixSlot {
    /// Written at startup and on resize.
    Projection,
    /// Written every frame.
    ModelView,
}

impl MatrixSlot {
    /// Byte offset of the slot inside the matrix uniform block.
    pub fn offset(self) -> u64 {
        match self {
            MatrixSlot::Projection => 0,
            MatrixSlot::ModelView => std::mem::size_of::<[[f32; 4]; 4]>() as u64,
        }
    }
}

/// A GPU-style renderer for one static indexed mesh.
pub trait GraphicsBackend {
    /// Upload positions, colors and indices. Called once before the first frame.
    fn upload_geometry(&mut self, geometry: &GeometryBuffer);

    /// Write one matrix uniform.
    fn set_matrix(&mut self, slot: MatrixSlot, matrix: Mat4);

    /// Set the color the next frame clears to. Depth is always cleared to 1.
    fn clear(&mut self, color: ClearColor);

    /// Queue one indexed draw for the current frame.
    fn draw(&mut self, call: DrawCall);

    /// Current drawable size in pixels.
    fn viewport_size(&self) -> (u32, u32);
}
