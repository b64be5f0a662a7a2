//! Data-driven game balance
//!
//! Every gameplay number lives here so a `tuning.json` in the data directory
//! can override it without a rebuild. Missing fields keep their defaults.

use serde::{Deserialize, Serialize};

use crate::consts::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};

/// Gameplay constants consumed by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Viewport width in logical units
    pub width: f32,
    /// Viewport height in logical units
    pub height: f32,

    // === Ship ===
    /// Ship speed without the modifier (units/s)
    pub ship_speed: f32,
    /// Ship speed while the speed modifier is held
    pub ship_boosted_speed: f32,
    /// Delay between shots (ms)
    pub shot_cooldown_ms: u64,
    /// Delay between shots with the rapid-cooldown upgrade (ms)
    pub upgraded_shot_cooldown_ms: u64,

    // === Projectiles ===
    /// Upward projectile speed (units/s)
    pub projectile_speed: f32,

    // === Hazards ===
    /// Time between hazard spawns (ms)
    pub spawn_interval_ms: u64,
    /// Hazard lifetime (ms)
    pub hazard_lifetime_ms: u64,
    /// Inclusive integer range for hazard speed
    pub hazard_speed_range: (u32, u32),
    /// Inclusive integer range for hazard rotation rate (degrees/s)
    pub hazard_rotation_range: (u32, u32),
    /// Maximum absolute horizontal drift of the hazard direction
    pub hazard_drift: f32,
    /// Inclusive vertical spawn band above the viewport
    pub hazard_spawn_y: (i32, i32),
    /// One-in-N chance for a hazard to be a carrier
    pub carrier_odds: u32,

    // === Pickups & boost ===
    /// One-in-N chance for a plain hazard to drop a pickup
    pub pickup_drop_odds: u32,
    /// Downward pickup speed (units/s)
    pub pickup_speed: f32,
    /// Boost window length (ms)
    pub boost_duration_ms: u64,
    /// Minimum time between autofire shots while boosted (ms)
    pub autofire_interval_ms: u64,

    // === Economy ===
    /// Currency for destroying a plain hazard
    pub plain_reward: u64,
    /// Currency for destroying a carrier hazard
    pub carrier_reward: u64,

    // === Presentation ===
    /// Explosion animation rate (frames/s)
    pub explosion_fps: f32,
    /// Number of explosion frames
    pub explosion_frames: u32,
    /// Decorative stars per session
    pub star_count: usize,
    /// Score points per this many ms survived
    pub score_interval_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,

            ship_speed: 300.0,
            ship_boosted_speed: 600.0,
            shot_cooldown_ms: 400,
            upgraded_shot_cooldown_ms: 200,

            projectile_speed: 400.0,

            spawn_interval_ms: 500,
            hazard_lifetime_ms: 3000,
            hazard_speed_range: (400, 500),
            hazard_rotation_range: (50, 150),
            hazard_drift: 0.5,
            hazard_spawn_y: (-200, -100),
            carrier_odds: 30,

            pickup_drop_odds: 30,
            pickup_speed: 150.0,
            boost_duration_ms: 5000,
            autofire_interval_ms: 100,

            plain_reward: 1,
            carrier_reward: 20,

            explosion_fps: 20.0,
            explosion_frames: 21,
            star_count: 20,
            score_interval_ms: 100,
        }
    }
}

impl Tuning {
    /// File name looked up in the data directory
    pub const FILE_NAME: &'static str = "tuning.json";

    /// Parse tuning overrides, keeping defaults for anything unspecified.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Self = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Clamp values that would break the simulation's invariants
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.width) {
            self.width = defaults.width;
        }
        if !positive(self.height) {
            self.height = defaults.height;
        }
        if !positive(self.explosion_fps) {
            self.explosion_fps = defaults.explosion_fps;
        }
        if !(self.hazard_drift.is_finite() && self.hazard_drift >= 0.0) {
            self.hazard_drift = defaults.hazard_drift;
        }
        self.spawn_interval_ms = self.spawn_interval_ms.max(1);
        self.carrier_odds = self.carrier_odds.max(1);
        self.pickup_drop_odds = self.pickup_drop_odds.max(1);
        self.score_interval_ms = self.score_interval_ms.max(1);
        self.explosion_frames = self.explosion_frames.max(1);
        if self.hazard_speed_range.0 > self.hazard_speed_range.1 {
            self.hazard_speed_range = (self.hazard_speed_range.1, self.hazard_speed_range.0);
        }
        if self.hazard_rotation_range.0 > self.hazard_rotation_range.1 {
            self.hazard_rotation_range =
                (self.hazard_rotation_range.1, self.hazard_rotation_range.0);
        }
        if self.hazard_spawn_y.0 > self.hazard_spawn_y.1 {
            self.hazard_spawn_y = (self.hazard_spawn_y.1, self.hazard_spawn_y.0);
        }
        self
    }

    /// Shot cooldown for a ship with or without the upgrade
    pub fn cooldown_ms(&self, upgraded: bool) -> u64 {
        if upgraded {
            self.upgraded_shot_cooldown_ms
        } else {
            self.shot_cooldown_ms
        }
    }
}
