pub mod animation;
pub mod entity;
pub mod player;
pub mod sprite;
