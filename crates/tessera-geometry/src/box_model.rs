//! CSS Box Model types.
//!
//! [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::math::Vector2f;

/// Per-edge sizes ordered top, right, bottom, left (see [`BoxEdge`]).
pub type EdgeSizes = [f32; 4];

/// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
///
/// The four nested areas of a box, ordered from the outermost inwards so that
/// `area_outer <= area_inner` holds for an outer/inner pair.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BoxArea {
    /// Content + padding + border + margin.
    Margin = 0,
    /// Content + padding + border.
    Border = 1,
    /// Content + padding.
    Padding = 2,
    /// The content area itself; has no edges of its own.
    Content = 3,
}

impl BoxArea {
    /// The three areas that carry edges, outermost first.
    pub const EDGED: [Self; 3] = [Self::Margin, Self::Border, Self::Padding];

    /// Row of this area in the edge table.
    ///
    /// Only meaningful for areas that have edges.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One side of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxEdge {
    /// Top side.
    Top = 0,
    /// Right side.
    Right = 1,
    /// Bottom side.
    Bottom = 2,
    /// Left side.
    Left = 3,
}

impl BoxEdge {
    /// All edges in clockwise order starting at the top.
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// Position of this edge in an [`EdgeSizes`] array.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// An axis of the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum BoxDirection {
    /// Top to bottom: sums the top and bottom edges.
    Vertical = 0,
    /// Left to right: sums the left and right edges.
    Horizontal = 1,
}

/// The formatted box of one element: a content size and the edge
/// thicknesses of the padding, border and margin areas around it.
///
/// ```text
/// ┌──────────────────────── margin ────────────────────────┐
/// │   ┌──────────────────── border ─────────────────────┐  │
/// │   │   ┌──────────────── padding ───────────────┐    │  │
/// │   │   │               CONTENT                  │    │  │
/// │   │   └────────────────────────────────────────┘    │  │
/// │   └─────────────────────────────────────────────────┘  │
/// └────────────────────────────────────────────────────────┘
/// ```
///
/// Positions reported by [`BoxModel::position`] are relative to the top-left
/// corner of the border area, so the margin area usually sits at a negative
/// offset.
///
/// Equality and hashing compare the raw bits of every float, which makes a
/// box usable as a cache key.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct BoxModel {
    content: Vector2f,
    /// Indexed by `[BoxArea::index()][BoxEdge::index()]`.
    area_edges: [EdgeSizes; 3],
}

impl BoxModel {
    /// Create a box with the given content size and no padding, border or
    /// margin.
    #[must_use]
    pub const fn new(content: Vector2f) -> Self {
        Self {
            content,
            area_edges: [[0.0; 4]; 3],
        }
    }

    /// Top-left position of `area` relative to the top-left of the border
    /// area. The margin area position is the negated margin edges.
    #[must_use]
    pub fn position(&self, area: BoxArea) -> Vector2f {
        let margin = &self.area_edges[BoxArea::Margin.index()];
        let mut position = Vector2f::new(
            -margin[BoxEdge::Left.index()],
            -margin[BoxEdge::Top.index()],
        );
        for edges in &self.area_edges[..area.index()] {
            position.x += edges[BoxEdge::Left.index()];
            position.y += edges[BoxEdge::Top.index()];
        }
        position
    }

    /// Size of `area`, including all the areas inside it.
    ///
    /// `size(BoxArea::Content)` is the raw content size.
    #[must_use]
    pub fn size(&self, area: BoxArea) -> Vector2f {
        let mut size = self.content;
        for edges in self.area_edges.iter().skip(area.index()) {
            size.x += edges[BoxEdge::Left.index()] + edges[BoxEdge::Right.index()];
            size.y += edges[BoxEdge::Top.index()] + edges[BoxEdge::Bottom.index()];
        }
        size
    }

    /// Set the size of the content area.
    ///
    /// The layout engine is trusted to pass finite, non-negative values.
    pub const fn set_content(&mut self, content: Vector2f) {
        self.content = content;
    }

    /// Set the thickness of one edge of one of the outer areas.
    ///
    /// The content area has no edges; passing it is a contract violation.
    pub fn set_edge(&mut self, area: BoxArea, edge: BoxEdge, size: f32) {
        debug_assert!(area != BoxArea::Content, "the content area has no edges");
        if let Some(edges) = self.area_edges.get_mut(area.index()) {
            edges[edge.index()] = size;
        }
    }

    /// Set all four edges of an area at once (top, right, bottom, left).
    pub fn set_edges(&mut self, area: BoxArea, sizes: EdgeSizes) {
        for edge in BoxEdge::ALL {
            self.set_edge(area, edge, sizes[edge.index()]);
        }
    }

    /// Builder-style variant of [`BoxModel::set_edges`].
    #[must_use]
    pub fn with_edges(mut self, area: BoxArea, sizes: EdgeSizes) -> Self {
        self.set_edges(area, sizes);
        self
    }

    /// Thickness of one edge of one area. The content area reports zero.
    #[must_use]
    pub fn edge(&self, area: BoxArea, edge: BoxEdge) -> f32 {
        self.area_edges
            .get(area.index())
            .map_or(0.0, |edges| edges[edge.index()])
    }

    /// All four edges of one area (top, right, bottom, left).
    #[must_use]
    pub fn edges(&self, area: BoxArea) -> EdgeSizes {
        self.area_edges
            .get(area.index())
            .copied()
            .unwrap_or_default()
    }

    /// Cumulative thickness of `edge` from the margin area inwards, up to
    /// and including `area`.
    ///
    /// `cumulative_edge(Margin, e)` is the margin alone; `cumulative_edge(Padding, e)`
    /// is margin + border + padding. The content area counts like padding.
    #[must_use]
    pub fn cumulative_edge(&self, area: BoxArea, edge: BoxEdge) -> f32 {
        let last = area.min(BoxArea::Padding).index();
        self.area_edges[..=last]
            .iter()
            .map(|edges| edges[edge.index()])
            .sum()
    }

    /// Size along `direction` of the areas from `area_outer` inwards up to
    /// and including `area_inner`. The content size is only included when
    /// `area_inner` is the content area.
    ///
    /// `size_across(Horizontal, Border, Padding)` is the total width of the
    /// left and right borders and paddings.
    #[must_use]
    pub fn size_across(&self, direction: BoxDirection, area_outer: BoxArea, area_inner: BoxArea) -> f32 {
        debug_assert!(
            area_outer <= area_inner,
            "size_across: {area_outer} lies inside {area_inner}"
        );

        let (near, far) = match direction {
            BoxDirection::Vertical => (BoxEdge::Top, BoxEdge::Bottom),
            BoxDirection::Horizontal => (BoxEdge::Left, BoxEdge::Right),
        };

        let mut size = 0.0;
        if area_inner == BoxArea::Content {
            size = match direction {
                BoxDirection::Vertical => self.content.y,
                BoxDirection::Horizontal => self.content.x,
            };
        }

        let last = area_inner.min(BoxArea::Padding).index();
        for edges in self.area_edges.iter().take(last + 1).skip(area_outer.index()) {
            size += edges[near.index()] + edges[far.index()];
        }
        size
    }

    fn bits(&self) -> impl Iterator<Item = u32> + '_ {
        [self.content.x, self.content.y]
            .into_iter()
            .chain(self.area_edges.iter().flatten().copied())
            .map(f32::to_bits)
    }
}

impl PartialEq for BoxModel {
    fn eq(&self, other: &Self) -> bool {
        self.bits().eq(other.bits())
    }
}

impl Eq for BoxModel {}

impl Hash for BoxModel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for bits in self.bits() {
            bits.hash(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_box() -> BoxModel {
        BoxModel::new(Vector2f::new(100.0, 50.0))
            .with_edges(BoxArea::Padding, [1.0, 2.0, 3.0, 4.0])
            .with_edges(BoxArea::Border, [5.0, 6.0, 7.0, 8.0])
            .with_edges(BoxArea::Margin, [10.0, 20.0, 30.0, 40.0])
    }

    #[test]
    fn test_position_relative_to_border_area() {
        let b = sample_box();
        assert_eq!(b.position(BoxArea::Margin), Vector2f::new(-40.0, -10.0));
        assert_eq!(b.position(BoxArea::Border), Vector2f::new(0.0, 0.0));
        assert_eq!(b.position(BoxArea::Padding), Vector2f::new(8.0, 5.0));
        assert_eq!(b.position(BoxArea::Content), Vector2f::new(12.0, 6.0));
    }

    #[test]
    fn test_size_accumulates_inner_areas() {
        let b = sample_box();
        assert_eq!(b.size(BoxArea::Content), Vector2f::new(100.0, 50.0));
        assert_eq!(b.size(BoxArea::Padding), Vector2f::new(106.0, 54.0));
        assert_eq!(b.size(BoxArea::Border), Vector2f::new(120.0, 66.0));
        assert_eq!(b.size(BoxArea::Margin), Vector2f::new(180.0, 106.0));
    }

    #[test]
    fn test_cumulative_edge_starts_at_margin() {
        let b = sample_box();
        assert_eq!(b.cumulative_edge(BoxArea::Margin, BoxEdge::Top), 10.0);
        assert_eq!(b.cumulative_edge(BoxArea::Border, BoxEdge::Top), 15.0);
        assert_eq!(b.cumulative_edge(BoxArea::Padding, BoxEdge::Top), 16.0);
        assert_eq!(b.cumulative_edge(BoxArea::Content, BoxEdge::Left), 52.0);
    }

    #[test]
    fn test_size_across() {
        let b = sample_box();
        assert_eq!(b.size_across(BoxDirection::Horizontal, BoxArea::Border, BoxArea::Padding), 20.0);
        assert_eq!(b.size_across(BoxDirection::Vertical, BoxArea::Margin, BoxArea::Content), 106.0);
        assert_eq!(b.size_across(BoxDirection::Vertical, BoxArea::Padding, BoxArea::Padding), 4.0);
        assert_eq!(b.size_across(BoxDirection::Horizontal, BoxArea::Content, BoxArea::Content), 100.0);
    }

    #[test]
    fn test_content_area_has_no_edges() {
        let b = sample_box();
        assert_eq!(b.edge(BoxArea::Content, BoxEdge::Top), 0.0);
        assert_eq!(b.edges(BoxArea::Content), [0.0; 4]);
        assert_eq!(b.edges(BoxArea::Border), [5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_equality_is_structural() {
        let a = sample_box();
        let mut b = sample_box();
        assert_eq!(a, b);
        b.set_edge(BoxArea::Margin, BoxEdge::Left, 41.0);
        assert_ne!(a, b);
        b.set_edge(BoxArea::Margin, BoxEdge::Left, 40.0);
        assert_eq!(a, b);
        b.set_content(Vector2f::new(100.0, 51.0));
        assert_ne!(a, b);
    }
}
