pub mod builder;
pub mod categories;
pub mod level;

/// Entity tags used by the contact listener and cleanup systems.
pub mod tags {
    pub const PLAYER: &str = "player";
    pub const FLOOR: &str = "floor";
    pub const WALL: &str = "wall";
    pub const SPIKES: &str = "spikes";
    pub const SPRING: &str = "spring";
    pub const CEILING: &str = "ceiling";
    pub const EXPLOSION: &str = "explosion";
}
