//! Vertex and mesh types handed to a render interface.

use serde::Serialize;

use crate::color::PremultipliedColor;
use crate::math::Vector2f;

/// A single mesh vertex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Vertex {
    /// Position in pixels, relative to the geometry's render translation.
    pub position: Vector2f,
    /// Premultiplied vertex color.
    pub color: PremultipliedColor,
    /// Texture coordinate. Background and border geometry leaves this at
    /// zero.
    pub tex_coord: Vector2f,
}

impl Vertex {
    /// An untextured vertex.
    #[must_use]
    pub fn new(position: Vector2f, color: PremultipliedColor) -> Self {
        Self {
            position,
            color,
            tex_coord: Vector2f::ZERO,
        }
    }
}

/// A triangle list: every three consecutive indices form one triangle,
/// wound consistently so that the front face is visible with x pointing
/// right and y pointing down.
///
/// Generators only ever append to a mesh, so several boxes can share one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Mesh {
    /// Vertex storage.
    pub vertices: Vec<Vertex>,
    /// Triangle-list indices into `vertices`.
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create an empty mesh.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Whether the mesh contains no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of complete triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Index the next pushed vertex will get.
    ///
    /// # Panics
    ///
    /// Panics if the mesh holds more than `u32::MAX` vertices.
    #[must_use]
    pub fn next_index(&self) -> u32 {
        u32::try_from(self.vertices.len()).expect("mesh vertex count exceeds u32 index range")
    }

    /// Append one triangle.
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Whether every index references an existing vertex and the index
    /// count is a multiple of three.
    #[must_use]
    pub fn indices_valid(&self) -> bool {
        self.indices.len() % 3 == 0
            && self
                .indices
                .iter()
                .all(|&index| (index as usize) < self.vertices.len())
    }

    /// Iterate over the triangles as vertex triples.
    ///
    /// Triangles with out-of-range indices are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [Vertex; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            let vertex = |i: u32| self.vertices.get(i as usize).copied();
            Some([vertex(tri[0])?, vertex(tri[1])?, vertex(tri[2])?])
        })
    }

    /// Append another mesh, offsetting its indices.
    pub fn append(&mut self, other: &Self) {
        let base = self.next_index();
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|&index| index + base));
    }
}

/// Signed area of a triangle, times two. Negative for the winding the
/// engine emits, zero for degenerate triangles.
#[must_use]
pub fn signed_area(triangle: &[Vertex; 3]) -> f32 {
    let [a, b, c] = triangle;
    (b.position - a.position).cross(c.position - a.position)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f32, y: f32) -> Vertex {
        Vertex::new(Vector2f::new(x, y), PremultipliedColor::OPAQUE_WHITE)
    }

    #[test]
    fn test_append_offsets_indices() {
        let mut a = Mesh::new();
        a.vertices.extend([vertex(0.0, 0.0), vertex(1.0, 0.0), vertex(0.0, 1.0)]);
        a.push_triangle(0, 1, 2);

        let mut b = Mesh::new();
        b.append(&a);
        b.append(&a);
        assert_eq!(b.vertices.len(), 6);
        assert_eq!(b.indices, vec![0, 1, 2, 3, 4, 5]);
        assert!(b.indices_valid());
    }

    #[test]
    fn test_indices_valid_detects_out_of_range() {
        let mut mesh = Mesh::new();
        mesh.vertices.push(vertex(0.0, 0.0));
        mesh.push_triangle(0, 0, 1);
        assert!(!mesh.indices_valid());
        assert_eq!(mesh.triangles().count(), 0);
    }

    #[test]
    fn test_signed_area_orientation() {
        // Top-left, bottom-left, top-right: the orientation used by quads.
        let tri = [vertex(0.0, 0.0), vertex(0.0, 10.0), vertex(10.0, 0.0)];
        assert!(signed_area(&tri) < 0.0);
        let reversed = [tri[0], tri[2], tri[1]];
        assert!(signed_area(&reversed) > 0.0);
    }
}
