pub mod physics;
pub mod scene;
pub mod session;
pub mod time;
