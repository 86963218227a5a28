//! Memoized background/border meshes.
//!
//! Border metrics are recomputed on every generation. When the same box is
//! drawn repeatedly with the same style the whole mesh can be reused instead,
//! keyed by everything that feeds into it.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::box_model::BoxModel;
use crate::color::PremultipliedColor;
use crate::math::Vector2f;
use crate::mesh::Mesh;
use crate::mesh_utils::generate_background_border;
use crate::metrics::CornerSizes;

/// The inputs of [`generate_background_border`], compared bitwise.
#[derive(Debug, Clone, Copy)]
pub struct GeometryKey {
    /// Box being drawn.
    pub box_model: BoxModel,
    /// Top-left of the border area.
    pub offset: Vector2f,
    /// Requested outer radius per corner.
    pub border_radius: CornerSizes,
    /// Background color.
    pub background_color: PremultipliedColor,
    /// Border color per edge.
    pub border_colors: [PremultipliedColor; 4],
}

impl GeometryKey {
    fn float_bits(&self) -> [u32; 6] {
        let [r0, r1, r2, r3] = self.border_radius.map(f32::to_bits);
        [self.offset.x.to_bits(), self.offset.y.to_bits(), r0, r1, r2, r3]
    }
}

impl PartialEq for GeometryKey {
    fn eq(&self, other: &Self) -> bool {
        self.box_model == other.box_model
            && self.float_bits() == other.float_bits()
            && self.background_color == other.background_color
            && self.border_colors == other.border_colors
    }
}

impl Eq for GeometryKey {}

impl Hash for GeometryKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.box_model.hash(state);
        self.float_bits().hash(state);
        self.background_color.hash(state);
        self.border_colors.hash(state);
    }
}

/// A cache of generated background/border meshes.
///
/// Entries are never evicted; the cache grows with every distinct key until
/// [`MeshCache::clear`] is called. Suited to a single scene pass, not to a
/// long-lived session with changing styles.
#[derive(Debug, Default)]
pub struct MeshCache {
    entries: HashMap<GeometryKey, Mesh>,
    hits: usize,
    misses: usize,
}

impl MeshCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The mesh for `key`, generating it on first use.
    pub fn get_or_generate(&mut self, key: GeometryKey) -> &Mesh {
        if self.entries.contains_key(&key) {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        self.entries.entry(key).or_insert_with(|| {
            let mut mesh = Mesh::new();
            generate_background_border(
                &mut mesh,
                &key.box_model,
                key.offset,
                key.border_radius,
                key.background_color,
                &key.border_colors,
            );
            mesh
        })
    }

    /// Number of cached meshes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no meshes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from the cache and lookups that generated a mesh.
    #[must_use]
    pub const fn stats(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }

    /// Drop every cached mesh, for instance after a layout change.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::box_model::BoxArea;

    fn key(width: f32) -> GeometryKey {
        GeometryKey {
            box_model: BoxModel::new(Vector2f::new(width, 20.0))
                .with_edges(BoxArea::Border, [2.0; 4]),
            offset: Vector2f::new(4.0, 4.0),
            border_radius: [6.0; 4],
            background_color: PremultipliedColor::OPAQUE_WHITE,
            border_colors: [PremultipliedColor::new(0, 0, 0, 255); 4],
        }
    }

    #[test]
    fn test_cache_reuses_equal_keys() {
        let mut cache = MeshCache::new();
        let first = cache.get_or_generate(key(40.0)).clone();
        let second = cache.get_or_generate(key(40.0)).clone();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats(), (1, 1));

        let _ = cache.get_or_generate(key(41.0));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats(), (1, 2));

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_entries_accumulate_until_clear() {
        let mut cache = MeshCache::new();
        for width in 0..64_u8 {
            let _ = cache.get_or_generate(key(f32::from(width)));
        }
        assert_eq!(cache.len(), 64);

        cache.clear();
        assert!(cache.is_empty());
        // Counters survive a clear; a cleared key is generated again.
        let _ = cache.get_or_generate(key(0.0));
        assert_eq!(cache.stats(), (0, 65));
    }

    #[test]
    fn test_key_distinguishes_radius() {
        let a = key(40.0);
        let mut b = a;
        b.border_radius[2] = 7.0;
        assert_ne!(a, b);
    }
}
