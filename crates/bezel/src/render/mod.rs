//! Rendering: the [`GraphicsBackend`] contract, its wgpu implementation, and
//! the clear color.

pub mod backend;
pub mod gpu;
pub mod pass;
pub mod pipeline;
pub(crate) mod vertex;

pub use backend::{GraphicsBackend, MatrixSlot};
pub use gpu::GpuContext;
pub use pass::{ClearColor, ColorParseError, DEFAULT_BACKGROUND, hex_to_rgb};
pub use pipeline::{FrameContext, WgpuBackend};
