//! Vertex-color gradients over generated backgrounds.
//!
//! [CSS Images Level 3 § 3.1 Linear Gradients](https://www.w3.org/TR/css-images-3/#linear-gradients)
//!
//! Only axis-aligned gradients are supported. The background is generated
//! as usual and then each vertex is recolored by projecting it onto the
//! gradient axis. Colors between vertices come from the rasterizer's
//! interpolation, so stops that do not fall on a vertex are approximated.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::color::PremultipliedColor;
use crate::math::{Vector2f, rounded_lerp};
use crate::mesh::Mesh;

/// Axis along which a straight gradient runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientDirection {
    /// Left to right.
    Horizontal,
    /// Top to bottom.
    Vertical,
}

/// [§ 3.4 Color Stop Lists](https://www.w3.org/TR/css-images-3/#color-stop-syntax)
///
/// A color stop as authored. `position` is a fraction of the gradient line,
/// or `None` for an automatically placed stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorStop {
    /// Stop color.
    pub color: PremultipliedColor,
    /// Position along the gradient line, `0.0` at the start.
    pub position: Option<f32>,
}

impl ColorStop {
    /// A stop at a fixed position.
    #[must_use]
    pub const fn at(color: PremultipliedColor, position: f32) -> Self {
        Self {
            color,
            position: Some(position),
        }
    }

    /// A stop whose position is resolved from its neighbours.
    #[must_use]
    pub const fn auto(color: PremultipliedColor) -> Self {
        Self {
            color,
            position: None,
        }
    }
}

/// A color stop with a definite position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedColorStop {
    /// Stop color.
    pub color: PremultipliedColor,
    /// Position along the gradient line.
    pub position: f32,
}

/// [§ 3.4.3 Color Stop "Fixup"](https://www.w3.org/TR/css-images-3/#color-stop-fixup)
///
/// Give every stop a definite position:
/// 1. An automatic first stop goes to `0.0`, an automatic last stop to `1.0`.
/// 2. "If a color stop or transition hint has a position that is less than
///    the specified position of any color stop or transition hint before it
///    in the list, set its position to be equal to the largest specified
///    position of any color stop or transition hint before it."
/// 3. "If any color stop still does not have a position, then, for each run
///    of adjacent color stops without positions, set their positions so that
///    they are evenly spaced between the preceding and following color stops
///    with positions."
///
/// Afterwards each interior stop that sits closer than `soft_spacing` to its
/// predecessor is pushed forward, or centered between its neighbours when
/// there is no room for the full spacing. This keeps hard transitions from
/// aliasing.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn resolve_color_stops(stops: &[ColorStop], soft_spacing: f32) -> Vec<ResolvedColorStop> {
    let Some(last_index) = stops.len().checked_sub(1) else {
        return Vec::new();
    };

    let mut positions: Vec<Option<f32>> = stops.iter().map(|stop| stop.position).collect();
    let first = positions[0].unwrap_or(0.0);
    if last_index > 0 {
        positions[last_index] = Some(positions[last_index].unwrap_or(1.0));
    }

    let mut resolved = vec![first; stops.len()];
    let mut previous = first;
    let mut auto_begin: Option<usize> = None;

    for (i, position) in positions.iter().copied().enumerate().skip(1) {
        match (position, auto_begin) {
            (None, None) => auto_begin = Some(i),
            (None, Some(_)) => {}
            (Some(position), None) => {
                previous = position.max(previous);
                resolved[i] = previous;
            }
            (Some(position), Some(begin)) => {
                let t0 = resolved[begin - 1];
                let t1 = position.max(previous);
                let num_auto = i - begin;
                for j in 0..num_auto {
                    let fraction = (j + 1) as f32 / (num_auto + 1) as f32;
                    previous = (t0 + (t1 - t0) * fraction).max(previous);
                    resolved[begin + j] = previous;
                }
                previous = t1.max(previous);
                resolved[i] = previous;
                auto_begin = None;
            }
        }
    }

    for i in 1..last_index {
        let p0 = resolved[i - 1];
        let p1 = resolved[i];
        let p2 = resolved[i + 1];
        if p1 - p0 < soft_spacing {
            resolved[i] = if p2 - p0 < 2.0 * soft_spacing {
                0.5 * (p2 + p0)
            } else {
                p0 + soft_spacing
            };
        }
    }

    stops
        .iter()
        .zip(resolved)
        .map(|(stop, position)| ResolvedColorStop {
            color: stop.color,
            position,
        })
        .collect()
}

/// Color of the gradient at position `t` along its line.
///
/// Positions before the first stop take the first color and positions after
/// the last stop take the last color. Two stops at the same position form a
/// hard transition. An empty stop list samples as transparent.
#[must_use]
pub fn sample(stops: &[ResolvedColorStop], t: f32) -> PremultipliedColor {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return PremultipliedColor::default();
    };
    if t <= first.position {
        return first.color;
    }
    if t >= last.position {
        return last.color;
    }

    for pair in stops.windows(2) {
        let (s0, s1) = (pair[0], pair[1]);
        if t < s1.position {
            let span = s1.position - s0.position;
            if span <= 0.0 {
                return s1.color;
            }
            return rounded_lerp((t - s0.position) / span, s0.color, s1.color);
        }
    }
    last.color
}

/// Recolor the vertices in `range` of `mesh` with a straight gradient
/// spanning the rectangle at `fill_offset` of `fill_size`.
///
/// Each vertex is projected onto the gradient axis, clamped to `[0, 1]` and
/// sampled from `stops`. Stops are expected to be resolved and to already
/// carry any opacity.
pub fn apply_straight_gradient(
    mesh: &mut Mesh,
    range: Range<usize>,
    direction: GradientDirection,
    stops: &[ResolvedColorStop],
    fill_offset: Vector2f,
    fill_size: Vector2f,
) {
    let Some(vertices) = mesh.vertices.get_mut(range) else {
        return;
    };

    for vertex in vertices {
        let relative = vertex.position - fill_offset;
        let t = match direction {
            GradientDirection::Horizontal => relative.x / fill_size.x,
            GradientDirection::Vertical => relative.y / fill_size.y,
        };
        // NaN from a zero-sized fill clamps to the start.
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        vertex.color = sample(stops, t);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: PremultipliedColor = PremultipliedColor::new(0, 0, 0, 255);
    const WHITE: PremultipliedColor = PremultipliedColor::OPAQUE_WHITE;
    const RED: PremultipliedColor = PremultipliedColor::new(255, 0, 0, 255);

    fn positions(stops: &[ResolvedColorStop]) -> Vec<f32> {
        stops.iter().map(|stop| stop.position).collect()
    }

    #[test]
    fn test_edge_stops_default_to_ends() {
        let stops = resolve_color_stops(&[ColorStop::auto(BLACK), ColorStop::auto(WHITE)], 0.0);
        assert_eq!(positions(&stops), vec![0.0, 1.0]);
    }

    #[test]
    fn test_auto_run_is_evenly_spaced() {
        let stops = resolve_color_stops(
            &[
                ColorStop::at(BLACK, 0.2),
                ColorStop::auto(RED),
                ColorStop::auto(RED),
                ColorStop::auto(RED),
                ColorStop::at(WHITE, 0.6),
            ],
            0.0,
        );
        let p = positions(&stops);
        assert!((p[1] - 0.3).abs() < 1e-6);
        assert!((p[2] - 0.4).abs() < 1e-6);
        assert!((p[3] - 0.5).abs() < 1e-6);
        assert!((p[4] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_positions_never_decrease() {
        let stops = resolve_color_stops(
            &[
                ColorStop::at(BLACK, 0.5),
                ColorStop::at(RED, 0.2),
                ColorStop::at(WHITE, 1.0),
            ],
            0.0,
        );
        assert_eq!(positions(&stops), vec![0.5, 0.5, 1.0]);
    }

    #[test]
    fn test_soft_spacing_nudges_interior_stops() {
        let stops = resolve_color_stops(
            &[
                ColorStop::at(BLACK, 0.0),
                ColorStop::at(RED, 0.0),
                ColorStop::at(WHITE, 1.0),
            ],
            0.1,
        );
        assert!((stops[1].position - 0.1).abs() < 1e-6);

        // No room for the full spacing: centered between neighbours.
        let stops = resolve_color_stops(
            &[
                ColorStop::at(BLACK, 0.5),
                ColorStop::at(RED, 0.5),
                ColorStop::at(WHITE, 0.55),
            ],
            0.1,
        );
        assert!((stops[1].position - 0.525).abs() < 1e-6);
    }

    #[test]
    fn test_sample_clamps_and_interpolates() {
        let stops = resolve_color_stops(&[ColorStop::auto(BLACK), ColorStop::auto(WHITE)], 0.0);
        assert_eq!(sample(&stops, -1.0), BLACK);
        assert_eq!(sample(&stops, 2.0), WHITE);
        assert_eq!(sample(&stops, 0.5), PremultipliedColor::new(128, 128, 128, 255));
        assert_eq!(sample(&[], 0.5), PremultipliedColor::default());
    }

    #[test]
    fn test_sample_hard_transition() {
        let stops = [
            ResolvedColorStop { color: BLACK, position: 0.0 },
            ResolvedColorStop { color: BLACK, position: 0.5 },
            ResolvedColorStop { color: RED, position: 0.5 },
            ResolvedColorStop { color: RED, position: 1.0 },
        ];
        assert_eq!(sample(&stops, 0.49), BLACK);
        assert_eq!(sample(&stops, 0.51), RED);
    }

    #[test]
    fn test_vertical_gradient_recolors_by_y() {
        let mut mesh = Mesh::new();
        crate::mesh_utils::generate_quad(
            &mut mesh,
            Vector2f::new(10.0, 10.0),
            Vector2f::new(100.0, 50.0),
            PremultipliedColor::default(),
        );
        let stops = resolve_color_stops(&[ColorStop::auto(WHITE), ColorStop::auto(BLACK)], 0.0);
        let count = mesh.vertices.len();
        apply_straight_gradient(
            &mut mesh,
            0..count,
            GradientDirection::Vertical,
            &stops,
            Vector2f::new(10.0, 10.0),
            Vector2f::new(100.0, 50.0),
        );
        assert_eq!(mesh.vertices[0].color, WHITE);
        assert_eq!(mesh.vertices[1].color, WHITE);
        assert_eq!(mesh.vertices[2].color, BLACK);
        assert_eq!(mesh.vertices[3].color, BLACK);
    }
}
