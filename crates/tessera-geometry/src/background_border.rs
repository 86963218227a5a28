//! Background and border tessellation.
//!
//! [§ 3 Backgrounds](https://www.w3.org/TR/css-backgrounds-3/#backgrounds)
//! and [§ 4 Borders](https://www.w3.org/TR/css-backgrounds-3/#borders)
//!
//! The background is a convex polygon traced clockwise through the four
//! inner corners (each either a single point or an elliptic arc) and then
//! fan-triangulated. The border is a ring: each corner emits a small strip
//! of inner/outer vertex pairs, and each edge is filled with two triangles
//! joining the trailing pair of one corner to the leading pair of the next.

use crate::box_model::{BoxEdge, EdgeSizes};
use crate::color::PremultipliedColor;
use crate::math::{Vector2f, lerp, round_to_integer, rounded_lerp};
use crate::mesh::{Mesh, Vertex};
use crate::metrics::{BorderMetrics, Corner};

/// Number of vertices used to tessellate a quarter arc of outer radius `radius`.
///
/// Grows by one vertex per six pixels of radius, clamped to `[2, 100]`.
#[must_use]
pub fn arc_point_count(radius: f32) -> usize {
    let count = round_to_integer(radius / 6.0).saturating_add(3).clamp(2, 100);
    usize::try_from(count).unwrap_or(2)
}

/// Appends background and border geometry to a mesh.
///
/// All draw operations place vertices in clockwise order.
pub struct BackgroundBorderGeometry<'a> {
    mesh: &'a mut Mesh,
}

impl<'a> BackgroundBorderGeometry<'a> {
    /// Wrap the mesh that later draw operations append to.
    pub const fn new(mesh: &'a mut Mesh) -> Self {
        Self { mesh }
    }

    /// Fill the inner area of the metrics with a flat color.
    pub fn draw_background(&mut self, metrics: &BorderMetrics, color: PremultipliedColor) {
        let offset_vertices = self.mesh.next_index();

        for corner in Corner::ALL {
            let i = corner.index();
            self.draw_background_corner(
                corner,
                metrics.positions_inner[i],
                metrics.positions_circle_center[i],
                metrics.outer_radii[i],
                metrics.inner_radii[i],
                color,
            );
        }

        self.fill_background(offset_vertices);
    }

    /// Fill the ring between the outer and inner areas of the metrics.
    ///
    /// An edge is drawn when it has a positive width and a visible color. A
    /// corner is drawn when either of its adjacent edges is, so a lone edge
    /// still gets closed off at both ends.
    pub fn draw_border(
        &mut self,
        metrics: &BorderMetrics,
        edge_sizes: EdgeSizes,
        border_colors: &[PremultipliedColor; 4],
    ) {
        let offset_vertices = self.mesh.next_index();

        let draw_edge = BoxEdge::ALL.map(|edge| {
            edge_sizes[edge.index()] > 0.0 && !border_colors[edge.index()].is_transparent()
        });
        let draw_corner = Corner::ALL.map(|corner| {
            draw_edge[corner.incoming_edge().index()] || draw_edge[corner.outgoing_edge().index()]
        });

        for corner in Corner::ALL {
            let i = corner.index();
            let edge0 = corner.incoming_edge();
            let edge1 = corner.outgoing_edge();

            if draw_corner[i] {
                self.draw_border_corner(
                    corner,
                    metrics.positions_outer[i],
                    metrics.positions_inner[i],
                    metrics.positions_circle_center[i],
                    metrics.outer_radii[i],
                    metrics.inner_radii[i],
                    border_colors[edge0.index()],
                    border_colors[edge1.index()],
                );
            }

            if draw_edge[edge1.index()] {
                debug_assert!(
                    draw_corner[i] && draw_corner[corner.next().index()],
                    "border edges can only be drawn if both of their corners are drawn"
                );

                // The left edge closes the ring back onto the first corner.
                let next_corner = if edge1 == BoxEdge::Left {
                    offset_vertices
                } else {
                    self.mesh.next_index()
                };
                self.fill_edge(next_corner);
            }
        }
    }

    // -- Background --

    fn draw_background_corner(
        &mut self,
        corner: Corner,
        pos_inner: Vector2f,
        pos_circle_center: Vector2f,
        outer_radius: f32,
        inner_radius: Vector2f,
        color: PremultipliedColor,
    ) {
        if outer_radius <= 0.0 || inner_radius.x <= 0.0 || inner_radius.y <= 0.0 {
            self.draw_point(pos_inner, color);
        } else {
            let (a0, a1) = corner.arc_angles();
            let num_points = arc_point_count(outer_radius);
            self.draw_arc(pos_circle_center, inner_radius, a0, a1, color, color, num_points);
        }
    }

    fn draw_point(&mut self, position: Vector2f, color: PremultipliedColor) {
        self.mesh.vertices.push(Vertex::new(position, color));
    }

    /// Place `num_points` vertices along the ellipse of two-axis radius `r`,
    /// evenly spaced between angles `a0` and `a1` (inclusive), interpolating
    /// the color.
    #[allow(clippy::too_many_arguments, clippy::cast_precision_loss)]
    fn draw_arc(
        &mut self,
        center: Vector2f,
        r: Vector2f,
        a0: f32,
        a1: f32,
        color0: PremultipliedColor,
        color1: PremultipliedColor,
        num_points: usize,
    ) {
        debug_assert!(num_points >= 2 && r.x > 0.0 && r.y > 0.0);

        self.mesh.vertices.reserve(num_points);
        for i in 0..num_points {
            let t = i as f32 / (num_points - 1) as f32;
            let unit = Vector2f::from_angle(lerp(t, a0, a1));
            self.mesh.vertices.push(Vertex::new(
                unit * r + center,
                rounded_lerp(t, color0, color1),
            ));
        }
    }

    /// Fan-triangulate the convex polygon formed by every vertex added since
    /// `index_start`.
    fn fill_background(&mut self, index_start: u32) {
        let num_added = self.mesh.next_index() - index_start;
        let num_triangles = num_added.saturating_sub(2);

        self.mesh.indices.reserve(3 * num_triangles as usize);
        for i in 0..num_triangles {
            self.mesh
                .push_triangle(index_start, index_start + i + 2, index_start + i + 1);
        }
    }

    // -- Border --
    //
    // Every corner drawing function places its first and last vertices as
    // follows, with N the number of vertices placed by the corner:
    //   0:   inner edge, aligned with the previous corner
    //   1:   outer edge, aligned with the previous corner
    //   N-2: inner edge, aligned with the next corner
    //   N-1: outer edge, aligned with the next corner
    // `fill_edge` relies on this to stitch consecutive corners together.

    #[allow(clippy::too_many_arguments)]
    fn draw_border_corner(
        &mut self,
        corner: Corner,
        pos_outer: Vector2f,
        pos_inner: Vector2f,
        pos_circle_center: Vector2f,
        outer_radius: f32,
        inner_radius: Vector2f,
        color0: PremultipliedColor,
        color1: PremultipliedColor,
    ) {
        let (a0, a1) = corner.arc_angles();

        if outer_radius <= 0.0 {
            self.draw_point_point(pos_outer, pos_inner, color0, color1);
        } else if inner_radius.x > 0.0 && inner_radius.y > 0.0 {
            let num_points = arc_point_count(outer_radius);
            self.draw_arc_arc(
                pos_circle_center,
                outer_radius,
                inner_radius,
                (a0, a1),
                color0,
                color1,
                num_points,
            );
        } else {
            let num_points = arc_point_count(outer_radius);
            self.draw_arc_point(
                pos_circle_center,
                pos_inner,
                outer_radius,
                (a0, a1),
                color0,
                color1,
                num_points,
            );
        }
    }

    /// A sharp corner. Produces no triangles; when the two edge colors differ
    /// the inner/outer pair is duplicated so the edges meet at a hard seam.
    fn draw_point_point(
        &mut self,
        pos_outer: Vector2f,
        pos_inner: Vector2f,
        color0: PremultipliedColor,
        color1: PremultipliedColor,
    ) {
        let different_color = color0 != color1;
        self.mesh.vertices.reserve(if different_color { 4 } else { 2 });

        self.draw_point(pos_inner, color0);
        self.draw_point(pos_outer, color0);

        if different_color {
            self.draw_point(pos_inner, color1);
            self.draw_point(pos_outer, color1);
        }
    }

    /// Parallel arcs along the outer edge (radius `outer_radius`) and the
    /// inner edge (two-axis radius `inner_radius`), stitched into a strip.
    #[allow(clippy::too_many_arguments, clippy::cast_precision_loss)]
    fn draw_arc_arc(
        &mut self,
        center: Vector2f,
        outer_radius: f32,
        inner_radius: Vector2f,
        (a0, a1): (f32, f32),
        color0: PremultipliedColor,
        color1: PremultipliedColor,
        num_points: usize,
    ) {
        debug_assert!(
            num_points >= 2 && outer_radius > 0.0 && inner_radius.x > 0.0 && inner_radius.y > 0.0
        );

        let offset_vertices = self.mesh.next_index();
        self.mesh.vertices.reserve(2 * num_points);

        for i in 0..num_points {
            let t = i as f32 / (num_points - 1) as f32;
            let color = rounded_lerp(t, color0, color1);
            let unit = Vector2f::from_angle(lerp(t, a0, a1));

            self.draw_point(unit * inner_radius + center, color);
            self.draw_point(unit * outer_radius + center, color);
        }

        // Two triangles per pair of consecutive arc points.
        let num_triangles = self.mesh.next_index() - offset_vertices - 2;
        self.mesh.indices.reserve(3 * num_triangles as usize);

        for i in (0..num_triangles).step_by(2) {
            let v = offset_vertices + i;
            self.mesh.push_triangle(v, v + 2, v + 1);
            self.mesh.push_triangle(v + 1, v + 2, v + 3);
        }
    }

    /// An arc along the outer edge fanned to a single point on the inner
    /// edge, used when the border is thicker than the radius.
    #[allow(clippy::too_many_arguments)]
    fn draw_arc_point(
        &mut self,
        center: Vector2f,
        pos_inner: Vector2f,
        outer_radius: f32,
        (a0, a1): (f32, f32),
        color0: PremultipliedColor,
        color1: PremultipliedColor,
        num_points: usize,
    ) {
        debug_assert!(outer_radius > 0.0 && num_points >= 2);

        let offset_vertices = self.mesh.next_index();
        self.mesh.vertices.reserve(num_points + 2);

        // A sharp color transition could be made by splitting the arc midway.
        self.draw_point(pos_inner, color0);
        self.draw_arc(
            center,
            Vector2f::splat(outer_radius),
            a0,
            a1,
            color0,
            color1,
            num_points,
        );
        self.draw_point(pos_inner, color1);

        // Swap the last two positions so the outer edge vertex comes last, as
        // `fill_edge` expects. Both already carry `color1`.
        let last_vertex = self.mesh.next_index() - 1;
        let last = last_vertex as usize;
        let position = self.mesh.vertices[last].position;
        self.mesh.vertices[last].position = self.mesh.vertices[last - 1].position;
        self.mesh.vertices[last - 1].position = position;

        let num_triangles = last_vertex - offset_vertices - 2;
        let inner0 = offset_vertices;
        let inner1 = last_vertex - 1;

        let offset_indices = self.mesh.indices.len();
        self.mesh.indices.reserve(3 * num_triangles as usize);
        for i in 0..num_triangles {
            let fan_center = if i > num_triangles / 2 { inner1 } else { inner0 };
            self.mesh.push_triangle(
                fan_center,
                offset_vertices + i + 2,
                offset_vertices + i + 1,
            );
        }

        // The swap moved the final arc vertex, so the last triangle has to
        // point at its new slot.
        self.mesh.indices[offset_indices + 3 * (num_triangles as usize - 1) + 1] = last_vertex;
    }

    /// Two triangles joining the trailing inner/outer pair of the corner just
    /// drawn to the leading pair of the corner starting at `index_next_corner`
    /// (which may not have been drawn yet).
    fn fill_edge(&mut self, index_next_corner: u32) {
        let num_vertices = self.mesh.next_index();
        debug_assert!(num_vertices >= 2);

        self.mesh
            .push_triangle(num_vertices - 2, index_next_corner, num_vertices - 1);
        self.mesh
            .push_triangle(num_vertices - 1, index_next_corner, index_next_corner + 1);
    }
}
