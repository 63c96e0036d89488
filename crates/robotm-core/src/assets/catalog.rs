use std::collections::HashMap;
use crate::assets::manifest::AssetManifest;
use crate::components::sprite::AtlasId;

/// A pixel rectangle inside one atlas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasRegion {
    pub atlas: AtlasId,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Registry of named atlas regions, built from an AssetManifest.
pub struct AssetCatalog {
    regions: HashMap<String, AtlasRegion>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self {
            regions: HashMap::new(),
        }
    }

    /// Build a catalog from a parsed AssetManifest. Later atlases win on
    /// duplicate region names.
    pub fn from_manifest(manifest: &AssetManifest) -> Self {
        let mut regions = HashMap::new();
        for (index, atlas) in manifest.atlases.iter().enumerate() {
            for (name, desc) in &atlas.regions {
                regions.insert(name.clone(), AtlasRegion {
                    atlas: AtlasId(index as u32),
                    x: desc.x as f32,
                    y: desc.y as f32,
                    w: desc.w as f32,
                    h: desc.h as f32,
                });
            }
        }
        Self { regions }
    }

    /// Catalog of the bundled manifest.
    pub fn bundled() -> Self {
        match AssetManifest::bundled() {
            Ok(manifest) => Self::from_manifest(&manifest),
            Err(err) => {
                log::error!("bundled asset manifest is invalid: {err}");
                Self::new()
            }
        }
    }

    /// Look up a region by name. Returns None if not found.
    pub fn region(&self, name: &str) -> Option<AtlasRegion> {
        self.regions.get(name).copied()
    }

    /// A rectangle at pixel offset (`x`, `y`) inside the named region.
    pub fn sub_region(&self, name: &str, x: f32, y: f32, w: f32, h: f32) -> Option<AtlasRegion> {
        self.region(name).map(|r| AtlasRegion {
            atlas: r.atlas,
            x: r.x + x,
            y: r.y + y,
            w,
            h,
        })
    }

    /// Like [`sub_region`](Self::sub_region), for builders that cannot run
    /// without the art.
    ///
    /// # Panics
    /// If `name` is not in the catalog; a missing region is a packaging error.
    pub fn require_sub_region(&self, name: &str, x: f32, y: f32, w: f32, h: f32) -> AtlasRegion {
        match self.sub_region(name, x, y, w, h) {
            Some(region) => region,
            None => panic!("atlas region `{name}` is missing from the asset manifest"),
        }
    }

    /// Names from `names` that the catalog does not contain.
    pub fn missing<'n>(&self, names: &[&'n str]) -> Vec<&'n str> {
        names
            .iter()
            .copied()
            .filter(|name| !self.regions.contains_key(*name))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl Default for AssetCatalog {
    fn default() -> Self {
        Self::new()
    }
}
