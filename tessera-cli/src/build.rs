//! Turns a resolved scene into one mesh.

use tessera_geometry::gradient::apply_straight_gradient;
use tessera_geometry::mesh_utils::{generate_background, generate_background_border};
use tessera_geometry::{BoxArea, GeometryKey, Mesh, MeshCache, PremultipliedColor};

use crate::scene::{Scene, SceneBox};

/// Geometry for a whole scene.
#[derive(Debug, Default)]
pub struct SceneMesh {
    /// All boxes, appended in paint order.
    pub mesh: Mesh,
    /// Vertex count contributed by each box.
    pub box_vertices: Vec<usize>,
}

/// Generate every box of `scene` into a single mesh.
///
/// Plain boxes go through `cache`, so repeated identical boxes are
/// tessellated once. Boxes with a gradient or a non-padding fill area are
/// generated directly.
pub fn build_scene(scene: &Scene, cache: &mut MeshCache) -> SceneMesh {
    let mut out = SceneMesh::default();
    for scene_box in &scene.boxes {
        let before = out.mesh.vertices.len();
        if scene_box.gradient.is_none() && scene_box.fill_area == BoxArea::Padding {
            let cached = cache.get_or_generate(GeometryKey {
                box_model: scene_box.box_model,
                offset: scene_box.offset,
                border_radius: scene_box.border_radius,
                background_color: scene_box.background,
                border_colors: scene_box.border_colors,
            });
            out.mesh.append(cached);
        } else {
            build_layered(&mut out.mesh, scene_box);
        }
        out.box_vertices.push(out.mesh.vertices.len() - before);
    }
    out
}

/// Background over an arbitrary fill area, optionally recolored by a
/// gradient, then the border on top.
fn build_layered(mesh: &mut Mesh, scene_box: &SceneBox) {
    let background_start = mesh.vertices.len();

    // A gradient needs geometry even when the flat color is transparent.
    let fill_color = if scene_box.gradient.is_some() {
        PremultipliedColor::OPAQUE_WHITE
    } else {
        scene_box.background
    };
    generate_background(
        mesh,
        &scene_box.box_model,
        scene_box.offset,
        scene_box.border_radius,
        fill_color,
        scene_box.fill_area,
    );

    if let Some(gradient) = &scene_box.gradient {
        let fill_offset = scene_box.offset + scene_box.box_model.position(scene_box.fill_area);
        let fill_size = scene_box.box_model.size(scene_box.fill_area);
        let end = mesh.vertices.len();
        apply_straight_gradient(
            mesh,
            background_start..end,
            gradient.direction,
            &gradient.stops,
            fill_offset.round(),
            fill_size.round(),
        );
    }

    generate_background_border(
        mesh,
        &scene_box.box_model,
        scene_box.offset,
        scene_box.border_radius,
        PremultipliedColor::default(),
        &scene_box.border_colors,
    );
}
