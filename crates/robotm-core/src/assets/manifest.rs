use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// Manifest shipped with the game, used until the host loads another one.
pub const DEFAULT_MANIFEST: &str = include_str!("../../assets/manifest.json");

/// Asset manifest describing all atlases, their named regions and sounds.
/// Loaded from a JSON file at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetManifest {
    pub atlases: Vec<AtlasDescriptor>,
    #[serde(default)]
    pub sounds: HashMap<String, SoundDescriptor>,
}

/// Describes a single texture atlas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlasDescriptor {
    /// Human-readable name (e.g., "actors").
    pub name: String,
    /// Relative path to the image, resolved by the host.
    pub path: String,
    /// Named pixel rectangles inside the atlas.
    #[serde(default)]
    pub regions: HashMap<String, RegionDescriptor>,
}

/// Pixel rectangle of a named region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionDescriptor {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Describes an audio asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundDescriptor {
    /// Relative path to the audio file.
    pub path: String,
    /// Numeric id that triggers this sound from Rust.
    #[serde(default)]
    pub event_id: Option<u32>,
}

impl AssetManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The manifest bundled with the crate.
    pub fn bundled() -> Result<Self, serde_json::Error> {
        Self::from_json(DEFAULT_MANIFEST)
    }
}
