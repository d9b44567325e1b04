//! Glyph → drawable handle cache
//!
//! Rasterising a glyph is the host's job ([`GlyphRasterizer`]). The cache only
//! memoises the resulting handle per `(glyph, point size)` so every effect, and
//! every restart of an effect, reuses the same texture.

use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

/// Opaque handle to a texture owned by the host renderer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct DrawableHandle(pub u32);

/// Source of drawables for glyph strings
pub trait TextureProvider: Send + Sync {
    /// Stable handle for `glyph` rendered at `point_size`. Repeated calls with the
    /// same arguments return the same handle.
    fn drawable(&self, glyph: &str, point_size: f32) -> DrawableHandle;
}

/// Turns a glyph into a host texture
pub trait GlyphRasterizer: Send + Sync {
    fn rasterize(&self, glyph: &str, point_size: f32) -> DrawableHandle;
}

/// Hands out sequential handles without drawing anything (headless hosts)
#[derive(Debug, Default)]
pub struct SequentialRasterizer {
    next: AtomicU32,
}

impl GlyphRasterizer for SequentialRasterizer {
    fn rasterize(&self, _glyph: &str, _point_size: f32) -> DrawableHandle {
        DrawableHandle(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// Read-mostly memo of rasterised glyphs.
///
/// Lookups take a shared lock; a miss takes the write lock and rasterises at
/// most once per key. Owned by the host for the lifetime of the process and
/// shared with effects through `Arc`.
pub struct TextureCache<R = SequentialRasterizer> {
    rasterizer: R,
    entries: RwLock<HashMap<(String, u32), DrawableHandle>>,
}

impl TextureCache<SequentialRasterizer> {
    pub fn headless() -> Self {
        Self::new(SequentialRasterizer::default())
    }
}

impl<R: GlyphRasterizer> TextureCache<R> {
    pub fn new(rasterizer: R) -> Self {
        Self {
            rasterizer,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of cached textures
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<R: GlyphRasterizer> TextureProvider for TextureCache<R> {
    fn drawable(&self, glyph: &str, point_size: f32) -> DrawableHandle {
        let key = (glyph.to_string(), point_size.to_bits());
        if let Some(handle) = self.entries.read().get(&key) {
            return *handle;
        }
        let mut entries = self.entries.write();
        *entries
            .entry(key)
            .or_insert_with(|| self.rasterizer.rasterize(glyph, point_size))
    }
}

/// Glyph drawn when a configuration arrives without glyphs
const FALLBACK_GLYPH: &str = "✨";

/// Drawables for every configured glyph at one size, in configuration order
pub fn glyph_drawables(
    textures: &dyn TextureProvider,
    glyphs: &[String],
    point_size: f32,
) -> Vec<DrawableHandle> {
    if glyphs.is_empty() {
        return vec![textures.drawable(FALLBACK_GLYPH, point_size)];
    }
    glyphs
        .iter()
        .map(|g| textures.drawable(g, point_size))
        .collect()
}
