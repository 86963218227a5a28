//! Software renderer for headless output.
//!
//! Rasterizes triangle-list meshes into a pixel buffer:
//!
//! ```text
//! Box → Mesh → compile_geometry → render_geometry → Pixels → PNG
//! ```
//!
//! The buffer holds premultiplied colors. Every triangle is sampled at pixel
//! centers; vertex colors are interpolated with barycentric weights and
//! composited with premultiplied source-over. Pixels on an edge shared by
//! two triangles are drawn exactly once, so translucent meshes show no
//! seams.

use std::collections::HashMap;
use std::path::Path;

use image::{ImageBuffer, Rgba, RgbaImage};
use tessera_common::warning::warn_once;
use tessera_geometry::render::ScissorRegion;
use tessera_geometry::{
    ColorValue, CompiledGeometryHandle, PremultipliedColor, RenderInterface, Vector2f, Vertex,
};

use crate::error::RenderError;

/// A mesh copied into the renderer by `compile_geometry`.
#[derive(Debug)]
struct CompiledMesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

/// Counters describing the work done since the renderer was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Meshes compiled.
    pub compiled: usize,
    /// Draw calls executed.
    pub draw_calls: usize,
    /// Triangles rasterized.
    pub triangles: usize,
    /// Pixels written.
    pub pixels: usize,
}

/// Software renderer that rasterizes compiled meshes into an RGBA buffer.
pub struct SoftwareRenderer {
    /// Premultiplied RGBA pixel buffer
    buffer: RgbaImage,
    /// Compiled meshes keyed by handle
    meshes: HashMap<u64, CompiledMesh>,
    /// Next handle to hand out, never zero
    next_handle: u64,
    scissor_enabled: bool,
    scissor: ScissorRegion,
    stats: RenderStats,
}

impl SoftwareRenderer {
    /// Create a renderer with every pixel set to `clear` (straight alpha).
    #[must_use]
    pub fn new(width: u32, height: u32, clear: ColorValue) -> Self {
        let clear = clear.to_premultiplied();
        let buffer = ImageBuffer::from_pixel(width, height, Rgba([clear.r, clear.g, clear.b, clear.a]));
        Self {
            buffer,
            meshes: HashMap::new(),
            next_handle: 1,
            scissor_enabled: false,
            scissor: ScissorRegion::default(),
            stats: RenderStats::default(),
        }
    }

    /// Buffer width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Buffer height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Work counters so far.
    #[must_use]
    pub const fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Number of meshes currently compiled.
    #[must_use]
    pub fn compiled_count(&self) -> usize {
        self.meshes.len()
    }

    /// Premultiplied color of one pixel, or `None` outside the buffer.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<PremultipliedColor> {
        self.buffer
            .get_pixel_checked(x, y)
            .map(|&Rgba([r, g, b, a])| PremultipliedColor::new(r, g, b, a))
    }

    /// The frame with straight alpha, as image files expect.
    #[must_use]
    pub fn to_image(&self) -> RgbaImage {
        let mut image = self.buffer.clone();
        for pixel in image.pixels_mut() {
            let Rgba([r, g, b, a]) = *pixel;
            let color = PremultipliedColor::new(r, g, b, a).to_non_premultiplied();
            *pixel = Rgba([color.r, color.g, color.b, color.a]);
        }
        image
    }

    /// Save the frame to a file. The format follows the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be encoded or written.
    pub fn save(&self, path: &Path) -> Result<(), RenderError> {
        self.to_image().save(path).map_err(|source| RenderError::Save {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Draw compiled geometry, reporting unknown handles.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownGeometry`] if the handle was never
    /// compiled or has been released.
    pub fn try_render_geometry(
        &mut self,
        handle: CompiledGeometryHandle,
        translation: Vector2f,
    ) -> Result<(), RenderError> {
        let mesh = self
            .meshes
            .remove(&handle.0)
            .ok_or(RenderError::UnknownGeometry(handle.0))?;

        for triangle in mesh.indices.chunks_exact(3) {
            let vertex = |i: u32| mesh.vertices.get(i as usize);
            if let (Some(a), Some(b), Some(c)) =
                (vertex(triangle[0]), vertex(triangle[1]), vertex(triangle[2]))
            {
                self.fill_triangle([a, b, c], translation);
            }
        }
        self.stats.draw_calls += 1;

        let _ = self.meshes.insert(handle.0, mesh);
        Ok(())
    }

    /// The region pixels are clipped to: the buffer, intersected with the
    /// scissor region while scissoring is on. Returned as half-open
    /// `(x0, y0, x1, y1)`.
    fn clip_bounds(&self) -> (i64, i64, i64, i64) {
        let (mut x0, mut y0) = (0_i64, 0_i64);
        let (mut x1, mut y1) = (i64::from(self.width()), i64::from(self.height()));
        if self.scissor_enabled {
            x0 = x0.max(i64::from(self.scissor.x));
            y0 = y0.max(i64::from(self.scissor.y));
            x1 = x1.min(i64::from(self.scissor.x) + i64::from(self.scissor.width));
            y1 = y1.min(i64::from(self.scissor.y) + i64::from(self.scissor.height));
        }
        (x0, y0, x1, y1)
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        clippy::similar_names
    )]
    fn fill_triangle(&mut self, vertices: [&Vertex; 3], translation: Vector2f) {
        let [a, mut b, mut c] = vertices.map(|v| (v.position + translation, v.color));

        let mut area = edge_function(a.0, b.0, c.0);
        if area == 0.0 || !area.is_finite() {
            return;
        }
        if area < 0.0 {
            std::mem::swap(&mut b, &mut c);
            area = -area;
        }
        self.stats.triangles += 1;

        let (clip_x0, clip_y0, clip_x1, clip_y1) = self.clip_bounds();
        let min_x = (a.0.x.min(b.0.x).min(c.0.x).floor() as i64).max(clip_x0);
        let min_y = (a.0.y.min(b.0.y).min(c.0.y).floor() as i64).max(clip_y0);
        let max_x = (a.0.x.max(b.0.x).max(c.0.x).ceil() as i64).min(clip_x1);
        let max_y = (a.0.y.max(b.0.y).max(c.0.y).ceil() as i64).min(clip_y1);

        for py in min_y..max_y {
            for px in min_x..max_x {
                let p = Vector2f::new(px as f32 + 0.5, py as f32 + 0.5);
                let w0 = edge_function(b.0, c.0, p);
                let w1 = edge_function(c.0, a.0, p);
                let w2 = edge_function(a.0, b.0, p);
                if !(covers(w0, b.0, c.0) && covers(w1, c.0, a.0) && covers(w2, a.0, b.0)) {
                    continue;
                }

                let weights = [w0 / area, w1 / area, w2 / area];
                let channel = |get: fn(PremultipliedColor) -> u8| -> f32 {
                    weights[0].mul_add(
                        f32::from(get(a.1)),
                        weights[1].mul_add(f32::from(get(b.1)), weights[2] * f32::from(get(c.1))),
                    )
                };
                let source = [
                    channel(|color| color.r),
                    channel(|color| color.g),
                    channel(|color| color.b),
                    channel(|color| color.a),
                ];

                let target = self.buffer.get_pixel_mut(px as u32, py as u32);
                *target = blend_source_over(source, *target);
                self.stats.pixels += 1;
            }
        }
    }
}

impl RenderInterface for SoftwareRenderer {
    fn compile_geometry(&mut self, vertices: &[Vertex], indices: &[u32]) -> Option<CompiledGeometryHandle> {
        let handle = self.next_handle;
        self.next_handle += 1;
        let _ = self.meshes.insert(
            handle,
            CompiledMesh {
                vertices: vertices.to_vec(),
                indices: indices.to_vec(),
            },
        );
        self.stats.compiled += 1;
        Some(CompiledGeometryHandle(handle))
    }

    fn render_geometry(&mut self, handle: CompiledGeometryHandle, translation: Vector2f) {
        if let Err(e) = self.try_render_geometry(handle, translation) {
            warn_once("Render", &e.to_string());
        }
    }

    fn release_geometry(&mut self, handle: CompiledGeometryHandle) {
        if self.meshes.remove(&handle.0).is_none() {
            warn_once("Render", &RenderError::UnknownGeometry(handle.0).to_string());
        }
    }

    fn enable_scissor_region(&mut self, enable: bool) {
        self.scissor_enabled = enable;
    }

    fn set_scissor_region(&mut self, region: ScissorRegion) {
        self.scissor = region;
    }
}

/// Twice the signed area of `(a, b, p)`.
fn edge_function(a: Vector2f, b: Vector2f, p: Vector2f) -> f32 {
    (b - a).cross(p - a)
}

/// Whether a sample with edge weight `w` against edge `from -> to` is inside.
///
/// Samples exactly on an edge belong to only one of the two triangles that
/// share it: the one for which the edge points down, or left when horizontal.
fn covers(w: f32, from: Vector2f, to: Vector2f) -> bool {
    if w > 0.0 {
        return true;
    }
    if w < 0.0 {
        return false;
    }
    let d = to - from;
    d.y > 0.0 || (d.y == 0.0 && d.x < 0.0)
}

/// Composite a premultiplied source over a premultiplied destination.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn blend_source_over(source: [f32; 4], destination: Rgba<u8>) -> Rgba<u8> {
    let inv_alpha = 1.0 - source[3].clamp(0.0, 255.0) / 255.0;
    let mut out = [0_u8; 4];
    for (i, channel) in out.iter_mut().enumerate() {
        let value = f32::from(destination[i]).mul_add(inv_alpha, source[i]);
        *channel = value.round().clamp(0.0, 255.0) as u8;
    }
    Rgba(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_opaque_replaces() {
        let out = blend_source_over([10.0, 20.0, 30.0, 255.0], Rgba([200, 200, 200, 255]));
        assert_eq!(out, Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_blend_half_transparent() {
        // 50% black over white.
        let out = blend_source_over([0.0, 0.0, 0.0, 127.5], Rgba([255, 255, 255, 255]));
        assert_eq!(out, Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn test_shared_edge_owned_once() {
        let (a, b) = (Vector2f::new(0.0, 0.0), Vector2f::new(0.0, 10.0));
        assert_ne!(covers(0.0, a, b), covers(0.0, b, a));
        let (c, d) = (Vector2f::new(0.0, 0.0), Vector2f::new(10.0, 0.0));
        assert_ne!(covers(0.0, c, d), covers(0.0, d, c));
    }

    #[test]
    fn test_unknown_handle_is_error() {
        let mut renderer = SoftwareRenderer::new(4, 4, ColorValue::WHITE);
        let result = renderer.try_render_geometry(CompiledGeometryHandle(99), Vector2f::ZERO);
        assert!(matches!(result, Err(RenderError::UnknownGeometry(99))));
    }
}
