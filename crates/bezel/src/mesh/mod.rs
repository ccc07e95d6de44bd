//! Procedural mesh construction: the shared [`GeometryBuffer`], the
//! primitive builders in [`shapes`], and the monitor assembly in [`model`].

pub mod geometry;
pub mod model;
pub mod shapes;

pub use geometry::{GeometryBuffer, GeometryError, PrimitiveRange, PrimitiveWriter, Rgba};
pub use model::ModelVariant;
