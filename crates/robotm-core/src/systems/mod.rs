pub mod animation;
pub mod contacts;
pub mod effects;
pub mod ground_probe;
pub mod player;
pub mod render;
