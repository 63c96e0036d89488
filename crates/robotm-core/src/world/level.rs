use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Surface type of a floor strip or wall column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorKind {
    #[default]
    Grass,
    /// Solid, but the robot cannot jump off it.
    Stone,
    Spikes,
    Spring,
}

impl FloorKind {
    /// Atlas region holding this surface's tiles.
    pub fn region(self) -> &'static str {
        match self {
            FloorKind::Grass => "Grass",
            FloorKind::Stone => "Stone",
            FloorKind::Spikes => "Spikes",
            FloorKind::Spring => "Spring",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorDesc {
    pub x: f32,
    pub y: f32,
    pub width: u32,
    #[serde(default)]
    pub kind: FloorKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallDesc {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub height: u32,
    #[serde(default)]
    pub kind: FloorKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CeilingDesc {
    pub x: f32,
    pub y: f32,
    pub width: u32,
}

/// Static layout of a level plus the player's spawn point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDesc {
    pub player_spawn: Vec2,
    #[serde(default)]
    pub floors: Vec<FloorDesc>,
    #[serde(default)]
    pub walls: Vec<WallDesc>,
    #[serde(default)]
    pub ceiling: Option<CeilingDesc>,
}

impl LevelDesc {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for LevelDesc {
    /// A single screen (10 × 15 units around the origin) with a spike
    /// ceiling, two walls and a handful of platforms.
    fn default() -> Self {
        let floor = |x: f32, y: f32, width: u32, kind: FloorKind| FloorDesc { x, y, width, kind };
        Self {
            player_spawn: Vec2::new(-2.5, 4.5),
            floors: vec![
                floor(-3.0, 3.5, 3, FloorKind::Grass),
                floor(1.0, 1.5, 3, FloorKind::Stone),
                floor(-2.0, -1.0, 3, FloorKind::Spikes),
                floor(2.0, -3.0, 1, FloorKind::Spring),
                floor(-4.0, -6.0, 9, FloorKind::Grass),
            ],
            walls: vec![WallDesc {
                left: -5.0,
                right: 5.0,
                top: -7.0,
                height: 15,
                kind: FloorKind::Grass,
            }],
            ceiling: Some(CeilingDesc { x: -4.0, y: 7.0, width: 9 }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level_with_defaults() {
        let json = r#"{
            "player_spawn": [0.0, 2.0],
            "floors": [ { "x": -1.0, "y": 0.0, "width": 3 }, { "x": 2.0, "y": -2.0, "width": 1, "kind": "spring" } ]
        }"#;
        let level = LevelDesc::from_json(json).unwrap();
        assert_eq!(level.player_spawn, Vec2::new(0.0, 2.0));
        assert_eq!(level.floors[0].kind, FloorKind::Grass);
        assert_eq!(level.floors[1].kind, FloorKind::Spring);
        assert!(level.walls.is_empty());
        assert!(level.ceiling.is_none());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let json = r#"{ "player_spawn": [0.0, 0.0], "floors": [ { "x": 0.0, "y": 0.0, "width": 1, "kind": "lava" } ] }"#;
        assert!(LevelDesc::from_json(json).is_err());
    }
}
