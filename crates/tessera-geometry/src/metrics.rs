//! Border metrics: corner positions and scaled corner radii.
//!
//! [§ 5 Rounded Corners](https://www.w3.org/TR/css-backgrounds-3/#corners)

use std::f32::consts::FRAC_PI_2;

use serde::Serialize;

use crate::box_model::{BoxEdge, EdgeSizes};
use crate::math::Vector2f;

/// Per-corner scalar sizes ordered top-left, top-right, bottom-right,
/// bottom-left (see [`Corner`]).
pub type CornerSizes = [f32; 4];

/// Per-corner two-axis sizes, same order as [`CornerSizes`].
pub type CornerSizes2 = [Vector2f; 4];

/// Per-corner positions, same order as [`CornerSizes`].
pub type CornerPositions = [Vector2f; 4];

/// A corner of a box, in clockwise order starting at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    /// Top-left corner.
    TopLeft = 0,
    /// Top-right corner.
    TopRight = 1,
    /// Bottom-right corner.
    BottomRight = 2,
    /// Bottom-left corner.
    BottomLeft = 3,
}

impl Corner {
    /// All corners in clockwise order.
    pub const ALL: [Self; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomRight,
        Self::BottomLeft,
    ];

    /// Position of this corner in a [`CornerSizes`] array.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The next corner in clockwise order.
    #[must_use]
    pub const fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % 4]
    }

    /// The edge that arrives at this corner when walking clockwise.
    #[must_use]
    pub const fn incoming_edge(self) -> BoxEdge {
        BoxEdge::ALL[(self.index() + 3) % 4]
    }

    /// The edge that leaves this corner when walking clockwise. Edge `e`
    /// runs from corner `e` to corner `e + 1`.
    #[must_use]
    pub const fn outgoing_edge(self) -> BoxEdge {
        BoxEdge::ALL[self.index()]
    }

    /// Start and end angle (radians) of the quarter arc drawn at this corner.
    /// Angles grow clockwise on screen, so the arc runs from the incoming edge
    /// to the outgoing edge.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn arc_angles(self) -> (f32, f32) {
        let i = self.index() as f32;
        ((i + 2.0) * FRAC_PI_2, (i + 3.0) * FRAC_PI_2)
    }
}

/// The background-border metrics describe an inner and an outer rectangle
/// whose corners can be rounded.
///
/// Recomputed on every geometry generation; it is a plain value and is never
/// cached by the engine itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BorderMetrics {
    /// Outer corner positions (at the border edge).
    pub positions_outer: CornerPositions,
    /// Inner corner positions (at the padding edge).
    pub positions_inner: CornerPositions,
    /// Curved corners are drawn as circles (outer edge) and ellipses (inner
    /// edge) around these centers. Only meaningful for corners with a
    /// non-zero radius.
    pub positions_circle_center: CornerPositions,
    /// Scaled radii of the outer edge, always circular.
    pub outer_radii: CornerSizes,
    /// Signed distance from each circle center to the inner edge, per axis.
    /// Zero or negative components mean the inner corner is sharp.
    pub inner_radii: CornerSizes2,
}

impl BorderMetrics {
    /// Compute the metrics used by the background and border drawing
    /// operations.
    ///
    /// * `outer_position` - top-left position of the outer edge
    /// * `edge_sizes` - border widths (top, right, bottom, left)
    /// * `inner_size` - size of the inner area
    /// * `outer_radii_def` - requested radius of the outer edge at each corner
    ///
    /// When the requested radii sum to at most one pixel the corners are
    /// treated as sharp and only the corner positions are filled in.
    #[must_use]
    pub fn compute(
        outer_position: Vector2f,
        edge_sizes: EdgeSizes,
        inner_size: Vector2f,
        outer_radii_def: CornerSizes,
    ) -> Self {
        let [top, right, bottom, left] = edge_sizes;

        let inner_position = outer_position + Vector2f::new(left, top);
        let outer_size = inner_size + Vector2f::new(left + right, top + bottom);

        let mut metrics = Self {
            positions_outer: corner_positions(outer_position, outer_size),
            positions_inner: corner_positions(inner_position, inner_size),
            ..Self::default()
        };

        let sum_radius: f32 = outer_radii_def.iter().sum();
        if sum_radius <= 1.0 {
            return metrics;
        }

        // [§ 5.5 Overlapping Curves](https://www.w3.org/TR/css-backgrounds-3/#corner-overlap)
        //
        // "Corner curves must not overlap: When the sum of any two adjacent
        // border radii exceeds the size of the border box, UAs must
        // proportionally reduce the used values of all border radii until
        // none of them overlap."
        let [tl, tr, br, bl] = outer_radii_def;
        let scale_factor = [
            inner_size.x / (tl + tr), // Top
            inner_size.y / (tr + br), // Right
            inner_size.x / (br + bl), // Bottom
            inner_size.y / (bl + tl), // Left
        ]
        .into_iter()
        .fold(1.0_f32, f32::min);

        let outer_radii = outer_radii_def.map(|radius| (radius * scale_factor).round());
        metrics.outer_radii = outer_radii;

        let [o_tl, o_tr, o_br, o_bl] = metrics.positions_outer;
        metrics.positions_circle_center = [
            o_tl + Vector2f::new(1.0, 1.0) * outer_radii[0],
            o_tr + Vector2f::new(-1.0, 1.0) * outer_radii[1],
            o_br + Vector2f::new(-1.0, -1.0) * outer_radii[2],
            o_bl + Vector2f::new(1.0, -1.0) * outer_radii[3],
        ];

        metrics.inner_radii = [
            Vector2f::splat(outer_radii[0]) - Vector2f::new(left, top),
            Vector2f::splat(outer_radii[1]) - Vector2f::new(right, top),
            Vector2f::splat(outer_radii[2]) - Vector2f::new(right, bottom),
            Vector2f::splat(outer_radii[3]) - Vector2f::new(left, bottom),
        ];

        geometry_trace!(
            "metrics outer={outer_position:?} inner_size={inner_size:?} scale={scale_factor} radii={outer_radii:?}"
        );

        metrics
    }

    /// Whether any corner is rounded.
    #[must_use]
    pub fn has_rounding(&self) -> bool {
        self.outer_radii.iter().any(|&radius| radius > 0.0)
    }
}

/// The four corners of an axis-aligned rectangle, clockwise from top-left.
fn corner_positions(position: Vector2f, size: Vector2f) -> CornerPositions {
    [
        position,
        position + Vector2f::new(size.x, 0.0),
        position + size,
        position + Vector2f::new(0.0, size.y),
    ]
}
