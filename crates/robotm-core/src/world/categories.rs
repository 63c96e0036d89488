//! Collision category and mask bits.

pub const CATEGORY_NOTHING: u32 = 0;
pub const CATEGORY_PLAYER: u32 = 1 << 0;
pub const CATEGORY_FLOOR: u32 = 1 << 1;
/// Floors the robot can stand on but not jump from.
pub const CATEGORY_FLOOR_UNJUMPABLE: u32 = 1 << 2;
pub const CATEGORY_STATIC_OBSTACLE: u32 = 1 << 3;
pub const CATEGORY_HAZARD: u32 = 1 << 4;
pub const CATEGORY_SPRING: u32 = 1 << 5;
pub const CATEGORY_CEILING: u32 = 1 << 6;

pub const MASK_PLAYER: u32 = CATEGORY_FLOOR
    | CATEGORY_FLOOR_UNJUMPABLE
    | CATEGORY_STATIC_OBSTACLE
    | CATEGORY_HAZARD
    | CATEGORY_SPRING
    | CATEGORY_CEILING;
/// While recovering from a ceiling hit the robot drops through everything
/// except the side walls.
pub const MASK_PLAYER_AFTER_HITTING_CEILING: u32 = CATEGORY_STATIC_OBSTACLE;
pub const MASK_STATIC_OBSTACLE: u32 = CATEGORY_PLAYER;
