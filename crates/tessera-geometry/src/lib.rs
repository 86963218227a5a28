//! Box model, border metrics and background/border tessellation for the
//! Tessera engine.
//!
//! # Scope
//!
//! This crate turns a formatted box into triangle geometry:
//! - **Box model** ([CSS Box Model Level 3](https://www.w3.org/TR/css-box-3/))
//!   - Content size plus padding, border and margin edges
//!   - Area positions, sizes and cumulative edge queries
//!
//! - **Border metrics** ([§ 5 Rounded Corners](https://www.w3.org/TR/css-backgrounds-3/#corners))
//!   - Inner/outer corner positions
//!   - Radius scaling so adjacent corner curves never overlap
//!
//! - **Tessellation** ([CSS Backgrounds and Borders Level 3](https://www.w3.org/TR/css-backgrounds-3/))
//!   - Backgrounds as a convex fan
//!   - Borders as a ring of corner strips and edge quads
//!   - Quads, lines and clip masks
//!
//! - **Gradients** ([CSS Images Level 3](https://www.w3.org/TR/css-images-3/#linear-gradients))
//!   - Color stop resolution
//!   - Straight horizontal and vertical vertex-color gradients
//!
//! - **Render seam**
//!   - A [`render::RenderInterface`] trait for backends and a mesh cache
//!
//! # Coordinates
//!
//! Pixels, origin at the top-left, y pointing down. Every emitted triangle is
//! wound so that [`mesh::signed_area`] is negative.
//!
//! # Tracing
//!
//! Building with the `geometry-trace` feature prints metrics and mesh sizes
//! to stderr.

/// Print a trace line to stderr when the `geometry-trace` feature is on.
macro_rules! geometry_trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "geometry-trace")]
        eprintln!("[GEOMETRY] {}", format_args!($($arg)*));
    }};
}

/// Background and border tessellation per [CSS Backgrounds and Borders Level 3](https://www.w3.org/TR/css-backgrounds-3/).
pub mod background_border;
/// Box model per [CSS Box Model Level 3](https://www.w3.org/TR/css-box-3/).
pub mod box_model;
/// Generated-geometry cache keyed by box and style.
pub mod cache;
/// Straight and premultiplied colors per [CSS Color Level 4](https://www.w3.org/TR/css-color-4/).
pub mod color;
/// Linear gradients per [CSS Images Level 3](https://www.w3.org/TR/css-images-3/#linear-gradients).
pub mod gradient;
/// Vector type and scalar helpers.
pub mod math;
/// Vertex and mesh types.
pub mod mesh;
/// High-level mesh generators.
pub mod mesh_utils;
/// Border metrics per [§ 5 Rounded Corners](https://www.w3.org/TR/css-backgrounds-3/#corners).
pub mod metrics;
/// The seam between generated geometry and a rendering backend.
pub mod render;

pub use background_border::{BackgroundBorderGeometry, arc_point_count};
pub use box_model::{BoxArea, BoxDirection, BoxEdge, BoxModel, EdgeSizes};
pub use cache::{GeometryKey, MeshCache};
pub use color::{ColorValue, PremultipliedColor};
pub use gradient::{ColorStop, GradientDirection, ResolvedColorStop};
pub use math::Vector2f;
pub use mesh::{Mesh, Vertex};
pub use metrics::{BorderMetrics, Corner, CornerSizes};
pub use render::{CompiledGeometryHandle, Geometry, RenderInterface, ScissorRegion};
