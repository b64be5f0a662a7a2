//! Galaxy Defender - a meteor-dodging arcade shooter
//!
//! Core modules:
//! - `sim`: Simulation (spawning, motion, collisions, timed effects, scoring)
//! - `economy`: Currency, upgrades and skins persisted across sessions
//! - `persistence`: Key-value store with JSON records
//! - `game`: Run controller wiring the simulation to its collaborators
//! - `platform`: Frame pacing and input sources
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod economy;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use economy::{Account, Economy, ShopError, SkinId, Upgrade};
pub use game::Game;
pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Viewport dimensions (logical units)
    pub const VIEWPORT_WIDTH: f32 = 1280.0;
    pub const VIEWPORT_HEIGHT: f32 = 720.0;

    /// Frame pacing cap
    pub const TARGET_FPS: u32 = 60;
    /// One frame at the target rate (seconds)
    pub const FRAME_DT: f32 = 1.0 / TARGET_FPS as f32;
    /// Largest frame delta fed to a tick, prevents tunnelling after a stall
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Sprite footprints used to build collision masks
    pub const SHIP_SIZE: (u32, u32) = (98, 76);
    pub const PROJECTILE_SIZE: (u32, u32) = (9, 54);
    pub const HAZARD_SIZE: (u32, u32) = (101, 84);
    pub const PICKUP_SIZE: (u32, u32) = (40, 40);
    pub const STAR_SIZE: (u32, u32) = (16, 16);
}

/// Rotate a vector by `degrees`, counter-clockwise on screen (y axis pointing down)
#[inline]
pub fn rotate_screen(v: Vec2, degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(v.x * cos + v.y * sin, -v.x * sin + v.y * cos)
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    angle.rem_euclid(360.0)
}
