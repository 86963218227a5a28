//! Entry points that turn a box into mesh geometry.
//!
//! Every generator appends to the mesh it is given and never touches what is
//! already there, so one mesh can collect the geometry of many boxes.

use tessera_common::warning::warn_once;

use crate::background_border::BackgroundBorderGeometry;
use crate::box_model::{BoxArea, BoxEdge, BoxModel, EdgeSizes};
use crate::color::PremultipliedColor;
use crate::math::{Vector2f, snap_to_pixel_grid};
use crate::mesh::{Mesh, Vertex};
use crate::metrics::{BorderMetrics, CornerSizes};

/// Append an axis-aligned quad with texture coordinates spanning `(0, 0)` to
/// `(1, 1)`.
pub fn generate_quad(mesh: &mut Mesh, origin: Vector2f, dimensions: Vector2f, color: PremultipliedColor) {
    generate_quad_textured(
        mesh,
        origin,
        dimensions,
        color,
        Vector2f::ZERO,
        Vector2f::splat(1.0),
    );
}

/// Append an axis-aligned quad with explicit texture coordinates.
///
/// Vertices are placed top-left, top-right, bottom-right, bottom-left and
/// joined by the triangles `(0, 3, 1)` and `(1, 3, 2)`.
pub fn generate_quad_textured(
    mesh: &mut Mesh,
    origin: Vector2f,
    dimensions: Vector2f,
    color: PremultipliedColor,
    top_left_tex_coord: Vector2f,
    bottom_right_tex_coord: Vector2f,
) {
    let v0 = mesh.next_index();

    let corners = [
        (origin, top_left_tex_coord),
        (
            Vector2f::new(origin.x + dimensions.x, origin.y),
            Vector2f::new(bottom_right_tex_coord.x, top_left_tex_coord.y),
        ),
        (origin + dimensions, bottom_right_tex_coord),
        (
            Vector2f::new(origin.x, origin.y + dimensions.y),
            Vector2f::new(top_left_tex_coord.x, bottom_right_tex_coord.y),
        ),
    ];
    mesh.vertices.extend(corners.into_iter().map(|(position, tex_coord)| Vertex {
        position,
        color,
        tex_coord,
    }));

    mesh.push_triangle(v0, v0 + 3, v0 + 1);
    mesh.push_triangle(v0 + 1, v0 + 3, v0 + 2);
}

/// Append a pixel-aligned quad, typically a horizontal or vertical line.
pub fn generate_line(mesh: &mut Mesh, position: Vector2f, size: Vector2f, color: PremultipliedColor) {
    let (position, size) = snap_to_pixel_grid(position, size);
    generate_quad(mesh, position, size, color);
}

/// Append the background and border of a box.
///
/// * `offset` - position of the top-left corner of the border area
/// * `border_radius` - requested outer radius per corner (top-left first)
/// * `border_colors` - one color per edge (top, right, bottom, left)
///
/// The background fills the padding area. Border widths and the padding size
/// are rounded to whole pixels first. When neither the background nor any
/// border edge is visible nothing is appended.
pub fn generate_background_border(
    mesh: &mut Mesh,
    box_model: &BoxModel,
    offset: Vector2f,
    border_radius: CornerSizes,
    background_color: PremultipliedColor,
    border_colors: &[PremultipliedColor; 4],
) {
    let border_widths = box_model.edges(BoxArea::Border).map(f32::round);

    let num_borders = BoxEdge::ALL
        .iter()
        .filter(|edge| {
            !border_colors[edge.index()].is_transparent() && border_widths[edge.index()] > 0.0
        })
        .count();

    let padding_size = box_model.size(BoxArea::Padding).round();

    let has_background =
        !background_color.is_transparent() && padding_size.x > 0.0 && padding_size.y > 0.0;
    let has_border = num_borders > 0;

    if !has_background && !has_border {
        return;
    }

    // Conservative estimate. Ignores border radii and assumes same-colored
    // borders, the vectors grow as needed.
    let background = usize::from(has_background);
    mesh.vertices.reserve(4 * background + 2 * num_borders);
    mesh.indices.reserve(3 * (2 * background + 2 * num_borders));

    let metrics = BorderMetrics::compute(offset.round(), border_widths, padding_size, border_radius);

    let mut geometry = BackgroundBorderGeometry::new(mesh);

    if has_background {
        geometry.draw_background(&metrics, background_color);
    }

    if has_border {
        geometry.draw_border(&metrics, border_widths, border_colors);
    }

    debug_assert!(mesh.indices_valid(), "generated an out-of-range index");

    geometry_trace!(
        "background-border offset={offset:?} borders={num_borders} background={has_background} mesh_vertices={}",
        mesh.vertices.len()
    );
}

/// Append a flat background filling `fill_area` of a box.
///
/// * `offset` - position of the top-left corner of the border area
/// * `fill_area` - one of the border, padding or content areas
///
/// The radii describe the border area's outer edge and are carried inwards
/// the same way a border would carry them. Filling the margin area is not
/// supported and appends nothing.
pub fn generate_background(
    mesh: &mut Mesh,
    box_model: &BoxModel,
    offset: Vector2f,
    border_radius: CornerSizes,
    color: PremultipliedColor,
    fill_area: BoxArea,
) {
    debug_assert_ne!(
        fill_area,
        BoxArea::Margin,
        "background fill area must lie inside the border area"
    );
    if fill_area == BoxArea::Margin {
        warn_once("Geometry", "background fill area must be border, padding or content");
        return;
    }

    let mut edge_sizes: EdgeSizes = [0.0; 4];
    for area in [BoxArea::Border, BoxArea::Padding] {
        if area >= fill_area {
            break;
        }
        for edge in BoxEdge::ALL {
            edge_sizes[edge.index()] += box_model.edge(area, edge).round();
        }
    }

    let inner_size = box_model.size(fill_area).round();

    if color.is_transparent() || inner_size.x <= 0.0 || inner_size.y <= 0.0 {
        return;
    }

    let metrics = BorderMetrics::compute(offset.round(), edge_sizes, inner_size, border_radius);

    mesh.vertices.reserve(4);
    mesh.indices.reserve(6);

    BackgroundBorderGeometry::new(mesh).draw_background(&metrics, color);

    geometry_trace!("background area={fill_area} inner_size={inner_size:?}");
}

/// Append an opaque white mask covering `area` of a box, with the same
/// rounded corners as its background.
///
/// Meant for rendering into a clip mask, where only coverage matters.
pub fn generate_clip_mesh(
    mesh: &mut Mesh,
    box_model: &BoxModel,
    offset: Vector2f,
    border_radius: CornerSizes,
    area: BoxArea,
) {
    generate_background(
        mesh,
        box_model,
        offset,
        border_radius,
        PremultipliedColor::OPAQUE_WHITE,
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: PremultipliedColor = PremultipliedColor::OPAQUE_WHITE;

    #[test]
    fn test_quad_layout() {
        let mut mesh = Mesh::new();
        generate_quad(&mut mesh, Vector2f::new(1.0, 2.0), Vector2f::new(10.0, 20.0), WHITE);

        assert_eq!(mesh.indices, vec![0, 3, 1, 1, 3, 2]);
        assert_eq!(mesh.vertices[1].position, Vector2f::new(11.0, 2.0));
        assert_eq!(mesh.vertices[3].position, Vector2f::new(1.0, 22.0));
        assert_eq!(mesh.vertices[1].tex_coord, Vector2f::new(1.0, 0.0));
        assert_eq!(mesh.vertices[2].tex_coord, Vector2f::new(1.0, 1.0));
    }

    #[test]
    fn test_second_quad_offsets_indices() {
        let mut mesh = Mesh::new();
        generate_quad(&mut mesh, Vector2f::ZERO, Vector2f::splat(1.0), WHITE);
        generate_quad(&mut mesh, Vector2f::ZERO, Vector2f::splat(1.0), WHITE);
        assert_eq!(&mesh.indices[6..], &[4, 7, 5, 5, 7, 6]);
    }

    #[test]
    fn test_line_is_snapped() {
        let mut mesh = Mesh::new();
        generate_line(&mut mesh, Vector2f::new(0.4, 9.6), Vector2f::new(20.0, 0.8), WHITE);
        assert_eq!(mesh.vertices[0].position, Vector2f::new(0.0, 10.0));
        assert_eq!(mesh.vertices[2].position, Vector2f::new(20.0, 10.0));
    }

    #[test]
    fn test_background_in_content_area() {
        let box_model = BoxModel::new(Vector2f::new(100.0, 50.0))
            .with_edges(BoxArea::Padding, [10.0; 4])
            .with_edges(BoxArea::Border, [2.0; 4]);
        let mut mesh = Mesh::new();
        generate_background(
            &mut mesh,
            &box_model,
            Vector2f::new(5.0, 5.0),
            [0.0; 4],
            WHITE,
            BoxArea::Content,
        );
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.vertices[0].position, Vector2f::new(17.0, 17.0));
        assert_eq!(mesh.vertices[2].position, Vector2f::new(117.0, 67.0));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "background fill area must lie inside the border area")]
    fn test_background_with_margin_area_asserts() {
        let box_model = BoxModel::new(Vector2f::new(10.0, 10.0));
        generate_background(&mut Mesh::new(), &box_model, Vector2f::ZERO, [0.0; 4], WHITE, BoxArea::Margin);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_background_with_margin_area_warns_in_release() {
        let box_model = BoxModel::new(Vector2f::new(10.0, 10.0));
        let mut mesh = Mesh::new();
        generate_background(&mut mesh, &box_model, Vector2f::ZERO, [0.0; 4], WHITE, BoxArea::Margin);
        assert!(mesh.vertices.is_empty());
        assert!(tessera_common::warning::has_warned(
            "Geometry",
            "background fill area must be border, padding or content"
        ));
    }

    #[test]
    fn test_clip_mesh_is_opaque_white() {
        let box_model = BoxModel::new(Vector2f::new(40.0, 40.0)).with_edges(BoxArea::Border, [4.0; 4]);
        let mut mesh = Mesh::new();
        generate_clip_mesh(&mut mesh, &box_model, Vector2f::ZERO, [8.0; 4], BoxArea::Padding);
        assert!(mesh.vertices.len() > 4);
        assert!(mesh.vertices.iter().all(|v| v.color == WHITE));
        assert!(mesh.indices_valid());
    }
}
