//! The boundary between generated meshes and a rendering backend.
//!
//! The engine never draws anything itself. A backend implements
//! [`RenderInterface`] to take ownership of compiled meshes and draw them at
//! a translation, and [`Geometry`] ties a mesh to its compiled handle so the
//! upload happens once.

use crate::math::Vector2f;
use crate::mesh::{Mesh, Vertex};

/// Opaque identifier of a mesh compiled by a [`RenderInterface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompiledGeometryHandle(pub u64);

/// A pixel rectangle outside of which nothing is drawn while scissoring is
/// enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ScissorRegion {
    /// Left edge, inclusive.
    pub x: i32,
    /// Top edge, inclusive.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ScissorRegion {
    /// Whether the pixel at `(x, y)` lies inside the region.
    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let dx = i64::from(x) - i64::from(self.x);
        let dy = i64::from(y) - i64::from(self.y);
        (0..i64::from(self.width)).contains(&dx) && (0..i64::from(self.height)).contains(&dy)
    }
}

/// Capabilities a backend provides to draw generated geometry.
///
/// Vertices use premultiplied colors and the triangle winding described on
/// [`Mesh`]. Backends should blend with premultiplied source-over.
pub trait RenderInterface {
    /// Take a copy of a mesh and return a handle for drawing it later, or
    /// `None` if the backend cannot accept it.
    fn compile_geometry(&mut self, vertices: &[Vertex], indices: &[u32]) -> Option<CompiledGeometryHandle>;

    /// Draw compiled geometry offset by `translation`.
    fn render_geometry(&mut self, handle: CompiledGeometryHandle, translation: Vector2f);

    /// Free compiled geometry. The handle is invalid afterwards.
    fn release_geometry(&mut self, handle: CompiledGeometryHandle);

    /// Turn scissoring on or off.
    fn enable_scissor_region(&mut self, enable: bool);

    /// Set the region used while scissoring is on.
    fn set_scissor_region(&mut self, region: ScissorRegion);
}

/// A mesh together with its compiled form, compiled on first render.
#[derive(Debug, Default)]
pub struct Geometry {
    mesh: Mesh,
    handle: Option<CompiledGeometryHandle>,
}

impl Geometry {
    /// Wrap a mesh. Nothing is compiled until the first render.
    #[must_use]
    pub const fn new(mesh: Mesh) -> Self {
        Self { mesh, handle: None }
    }

    /// Whether the mesh currently has a compiled handle.
    #[must_use]
    pub const fn is_compiled(&self) -> bool {
        self.handle.is_some()
    }

    /// Draw the mesh at `translation`, compiling it first if needed.
    ///
    /// Returns `false` if the mesh is empty or the backend refused it.
    pub fn render(&mut self, render_interface: &mut dyn RenderInterface, translation: Vector2f) -> bool {
        if self.mesh.is_empty() {
            return false;
        }
        if self.handle.is_none() {
            self.handle = render_interface.compile_geometry(&self.mesh.vertices, &self.mesh.indices);
        }
        match self.handle {
            Some(handle) => {
                render_interface.render_geometry(handle, translation);
                true
            }
            None => false,
        }
    }

    /// Release the compiled form, if any. The mesh is kept and will be
    /// compiled again on the next render.
    pub fn release(&mut self, render_interface: &mut dyn RenderInterface) {
        if let Some(handle) = self.handle.take() {
            render_interface.release_geometry(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PremultipliedColor;
    use crate::mesh_utils::generate_quad;

    #[derive(Default)]
    struct Recorder {
        compiled: u64,
        rendered: Vec<(CompiledGeometryHandle, Vector2f)>,
        released: Vec<CompiledGeometryHandle>,
    }

    impl RenderInterface for Recorder {
        fn compile_geometry(&mut self, _: &[Vertex], _: &[u32]) -> Option<CompiledGeometryHandle> {
            self.compiled += 1;
            Some(CompiledGeometryHandle(self.compiled))
        }

        fn render_geometry(&mut self, handle: CompiledGeometryHandle, translation: Vector2f) {
            self.rendered.push((handle, translation));
        }

        fn release_geometry(&mut self, handle: CompiledGeometryHandle) {
            self.released.push(handle);
        }

        fn enable_scissor_region(&mut self, _: bool) {}

        fn set_scissor_region(&mut self, _: ScissorRegion) {}
    }

    #[test]
    fn test_geometry_compiles_once() {
        let mut mesh = Mesh::new();
        generate_quad(&mut mesh, Vector2f::ZERO, Vector2f::splat(4.0), PremultipliedColor::OPAQUE_WHITE);
        let mut geometry = Geometry::new(mesh);
        let mut recorder = Recorder::default();

        assert!(geometry.render(&mut recorder, Vector2f::ZERO));
        assert!(geometry.render(&mut recorder, Vector2f::new(1.0, 1.0)));
        assert_eq!(recorder.compiled, 1);
        assert_eq!(recorder.rendered.len(), 2);

        geometry.release(&mut recorder);
        assert!(!geometry.is_compiled());
        assert_eq!(recorder.released, vec![CompiledGeometryHandle(1)]);
    }

    #[test]
    fn test_empty_geometry_is_not_compiled() {
        let mut geometry = Geometry::default();
        let mut recorder = Recorder::default();
        assert!(!geometry.render(&mut recorder, Vector2f::ZERO));
        assert_eq!(recorder.compiled, 0);
    }

    #[test]
    fn test_scissor_contains() {
        let region = ScissorRegion { x: 2, y: 3, width: 4, height: 1 };
        assert!(region.contains(2, 3));
        assert!(region.contains(5, 3));
        assert!(!region.contains(6, 3));
        assert!(!region.contains(2, 4));
        assert!(!region.contains(1, 3));
    }
}
