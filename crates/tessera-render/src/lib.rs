//! Software rendering backend for the Tessera geometry engine.
//!
//! [`SoftwareRenderer`] implements [`tessera_geometry::RenderInterface`] on
//! top of an in-memory RGBA image, so generated meshes can be inspected
//! pixel by pixel or written out as PNG without a GPU.

/// Errors reported by the software renderer.
pub mod error;
/// Triangle rasterization into a pixel buffer.
pub mod software;

pub use error::RenderError;
pub use software::{RenderStats, SoftwareRenderer};
