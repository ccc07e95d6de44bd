//! # Geometry — Shared Vertex, Color, and Index Buffers
//!
//! Every primitive of a model lands in one [`GeometryBuffer`]: three linked
//! containers that are uploaded to the GPU once and never touched again.
//!
//! ```text
//!  positions  [p0 p1 p2 p3 | p4 p5 ... ]     one [f32; 3] per vertex
//!  colors     [c0 c1 c2 c3 | c4 c5 ... ]     one [f32; 4] per vertex
//!  indices    [0 1 2 0 2 3 | 4 5 6 ... ]     u16, consecutive triples
//!              └ primitive A ┘└ primitive B ...
//! ```
//!
//! ## Index Base
//!
//! A primitive numbers its own vertices from zero. Before it appends anything,
//! the buffer records how many vertices already exist (the *index base*) and
//! adds that to every index the primitive emits. [`GeometryBuffer::append`]
//! captures the base itself and hands the primitive a [`PrimitiveWriter`], so
//! no caller ever has to read the buffer length at the right moment.
//!
//! ## Invariants
//!
//! - `positions.len() == colors.len()`: the writer pushes both together.
//! - every index is `< positions.len()`: checked on each triangle.
//! - `indices.len() % 3 == 0`: triangles are the only unit of emission.
//!
//! [`GeometryBuffer::validate`] re-checks all three before upload.

use std::fmt;
use std::ops::Range;

use glam::Vec3;

/// RGBA color, each channel in `[0, 1]`.
pub type Rgba = [f32; 4];

/// Largest vertex count addressable with u16 indices.
pub const MAX_VERTICES: usize = u16::MAX as usize + 1;

// ── Errors ──────────────────────────────────────────────────────────────

/// A broken buffer invariant, reported by [`GeometryBuffer::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// Position and color counts differ.
    LengthMismatch { positions: usize, colors: usize },
    /// The index list does not split into whole triangles.
    PartialTriangle { indices: usize },
    /// An index points past the end of the vertex list.
    IndexOutOfRange { at: usize, index: u16, vertices: usize },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::LengthMismatch { positions, colors } => {
                write!(f, "{positions} positions but {colors} colors")
            }
            GeometryError::PartialTriangle { indices } => {
                write!(f, "{indices} indices is not a whole number of triangles")
            }
            GeometryError::IndexOutOfRange { at, index, vertices } => {
                write!(f, "index {index} at position {at} exceeds vertex count {vertices}")
            }
        }
    }
}

impl std::error::Error for GeometryError {}

// ── PrimitiveRange ──────────────────────────────────────────────────────

/// The run of vertices and indices one primitive occupies in the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveRange {
    pub vertices: Range<u32>,
    pub indices: Range<usize>,
}

impl PrimitiveRange {
    /// The index base this primitive's indices were offset by.
    pub fn base(&self) -> u32 {
        self.vertices.start
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

// ── GeometryBuffer ──────────────────────────────────────────────────────

/// Positions, per-vertex colors, and triangle indices for one model.
#[derive(Debug, Clone, Default)]
pub struct GeometryBuffer {
    positions: Vec<[f32; 3]>,
    colors: Vec<Rgba>,
    indices: Vec<u16>,
}

impl GeometryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one primitive in a single flat `color`.
    ///
    /// The index base is captured before `build` runs; every local vertex
    /// number the closure passes to [`PrimitiveWriter::triangle`] is offset by
    /// it. Existing contents are never reordered.
    pub fn append(
        &mut self,
        color: Rgba,
        build: impl FnOnce(&mut PrimitiveWriter<'_>),
    ) -> PrimitiveRange {
        let base = self.positions.len();
        let first_index = self.indices.len();

        let mut writer = PrimitiveWriter {
            buffer: self,
            base,
            color,
        };
        build(&mut writer);

        PrimitiveRange {
            vertices: base as u32..self.positions.len() as u32,
            indices: first_index..self.indices.len(),
        }
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Check the buffer invariants.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.positions.len() != self.colors.len() {
            return Err(GeometryError::LengthMismatch {
                positions: self.positions.len(),
                colors: self.colors.len(),
            });
        }
        if self.indices.len() % 3 != 0 {
            return Err(GeometryError::PartialTriangle {
                indices: self.indices.len(),
            });
        }
        let vertices = self.positions.len();
        if let Some((at, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|&(_, &i)| i as usize >= vertices)
        {
            return Err(GeometryError::IndexOutOfRange { at, index, vertices });
        }
        Ok(())
    }
}

// ── PrimitiveWriter ─────────────────────────────────────────────────────

/// Appends the vertices and triangles of one primitive.
///
/// Vertex numbers passed to [`triangle`](Self::triangle) are local to the
/// primitive: `0` is the first vertex this writer pushed.
pub struct PrimitiveWriter<'a> {
    buffer: &'a mut GeometryBuffer,
    base: usize,
    color: Rgba,
}

impl PrimitiveWriter<'_> {
    /// Push a vertex in the primitive's color. Returns its local number.
    pub fn vertex(&mut self, position: Vec3) -> u16 {
        let global = self.buffer.positions.len();
        assert!(
            global < MAX_VERTICES,
            "geometry buffer exceeds the u16 index space ({MAX_VERTICES} vertices)"
        );
        self.buffer.positions.push(position.to_array());
        self.buffer.colors.push(self.color);
        (global - self.base) as u16
    }

    /// Emit one triangle from three local vertex numbers.
    pub fn triangle(&mut self, a: u16, b: u16, c: u16) {
        let local_count = self.local_vertex_count();
        for local in [a, b, c] {
            assert!(
                (local as usize) < local_count,
                "triangle references local vertex {local} but only {local_count} exist"
            );
            self.buffer.indices.push((self.base + local as usize) as u16);
        }
    }

    /// Emit a quad `a b c d` (counter-clockwise order) as triangles `a b c`, `a c d`.
    pub fn quad(&mut self, a: u16, b: u16, c: u16, d: u16) {
        self.triangle(a, b, c);
        self.triangle(a, c, d);
    }

    /// The index base of this primitive.
    pub fn base(&self) -> usize {
        self.base
    }

    /// Vertices pushed by this writer so far.
    pub fn local_vertex_count(&self) -> usize {
        self.buffer.positions.len() - self.base
    }
}
