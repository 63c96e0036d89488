use crate::assets::catalog::AtlasRegion;

/// Identifies which texture atlas a sprite belongs to.
/// Index into the AssetManifest's atlas list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AtlasId(pub u32);

/// How an entity is drawn: atlas region, size, flip and alpha.
///
/// `region` is the pixel rectangle of frame (0, 0). Animation frames are
/// addressed in whole cells of that size, to the right (`col`) and down
/// (`row`) of it.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteComponent {
    pub region: AtlasRegion,
    pub col: f32,
    pub row: f32,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub alpha: f32,
    /// Mirror horizontally (robot facing left).
    pub flip_x: bool,
}

impl SpriteComponent {
    pub fn new(region: AtlasRegion) -> Self {
        Self {
            region,
            col: 0.0,
            row: 0.0,
            alpha: 1.0,
            flip_x: false,
        }
    }

    pub fn with_frame(mut self, col: f32, row: f32) -> Self {
        self.col = col;
        self.row = row;
        self
    }

    /// Pixel rectangle `(x, y, w, h)` of the current frame.
    pub fn source_rect(&self) -> (f32, f32, f32, f32) {
        let r = &self.region;
        (r.x + self.col * r.w, r.y + self.row * r.h, r.w, r.h)
    }
}
