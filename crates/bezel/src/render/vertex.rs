//! # Vertex — Attribute Streams and the Matrix Block
//!
//! The model is uploaded as two separate vertex streams rather than one
//! interleaved struct, mirroring the separate position and color arrays of
//! [`GeometryBuffer`](crate::mesh::GeometryBuffer):
//!
//! ```text
//! slot 0  position  [f32; 3]   12-byte stride   location(0)
//! slot 1  color     [f32; 4]   16-byte stride   location(1)
//! ```
//!
//! ## Uniforms
//!
//! ```text
//! Group 0, binding 0 — MatrixUniform (128 bytes)
//! ┌────────────────────┬────────────────────┐
//! │ projection mat4x4  │ model_view mat4x4  │
//! │ offset 0           │ offset 64          │
//! └────────────────────┴────────────────────┘
//! ```
//!
//! The two halves are written independently (see
//! [`MatrixSlot::offset`](super::MatrixSlot::offset)): projection at startup
//! and on resize, model-view every frame.

use bytemuck::{Pod, Zeroable};

pub(crate) const POSITION_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[wgpu::VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x3,
    }],
};

pub(crate) const COLOR_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[wgpu::VertexAttribute {
        offset: 0,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32x4,
    }],
};

/// Both matrices, column-major, as the shader sees them.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub(crate) struct MatrixUniform {
    pub projection: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
}

impl MatrixUniform {
    pub fn identity() -> Self {
        Self {
            projection: glam::Mat4::IDENTITY.to_cols_array_2d(),
            model_view: glam::Mat4::IDENTITY.to_cols_array_2d(),
        }
    }
}

/// Expand each triangle `a b c` into the closed strip `a b c a`.
///
/// wgpu has no line-loop topology; drawing four strip indices per triangle
/// traces the same three edges.
pub(crate) fn line_loop_indices(indices: &[u16]) -> Vec<u16> {
    indices
        .chunks_exact(3)
        .flat_map(|tri| [tri[0], tri[1], tri[2], tri[0]])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::MatrixSlot;

    #[test]
    fn uniform_block_matches_slot_offsets() {
        assert_eq!(std::mem::size_of::<MatrixUniform>(), 128);
        assert_eq!(
            std::mem::offset_of!(MatrixUniform, model_view) as u64,
            MatrixSlot::ModelView.offset()
        );
        assert_eq!(MatrixSlot::Projection.offset(), 0);
    }

    #[test]
    fn loops_close_each_triangle() {
        let loops = line_loop_indices(&[0, 1, 2, 2, 3, 0]);
        assert_eq!(loops, vec![0, 1, 2, 0, 2, 3, 0, 2]);
    }

    #[test]
    fn layouts_use_fixed_locations() {
        assert_eq!(POSITION_LAYOUT.attributes[0].shader_location, 0);
        assert_eq!(COLOR_LAYOUT.attributes[0].shader_location, 1);
        assert_eq!(COLOR_LAYOUT.array_stride, 16);
    }
}
