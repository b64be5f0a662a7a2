//! Input sources
//!
//! Anything that can produce a `TickInput` per frame: a keyboard backend, a
//! recorded script, or the autopilot used for headless demo runs.

use std::collections::VecDeque;

use crate::sim::state::{Hazard, Tracked, ship_spawn_point};
use crate::sim::{GameState, TickInput};

/// Vertical distance above the ship in which a meteor counts as a threat
const THREAT_LOOKAHEAD: f32 = 260.0;
/// Extra horizontal clearance the autopilot keeps from meteors
const THREAT_MARGIN: f32 = 24.0;
/// Dead zone when steering toward a point
const STEER_DEADZONE: f32 = 8.0;

/// Produces one input sample per tick
pub trait InputSource {
    fn poll(&mut self, state: &GameState) -> TickInput;
}

/// Replays a fixed list of inputs, then repeats `fallback`
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<TickInput>,
    fallback: TickInput,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = TickInput>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            fallback: TickInput::default(),
        }
    }

    /// Ask to quit once the script runs out
    pub fn then_quit(mut self) -> Self {
        self.fallback = TickInput {
            quit: true,
            ..Default::default()
        };
        self
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, _state: &GameState) -> TickInput {
        self.frames.pop_front().unwrap_or(self.fallback)
    }
}

/// Demo player: fires continuously and sidesteps the most dangerous meteor
///
/// When nothing threatens the ship it goes for the nearest pickup, otherwise
/// it drifts back to the spawn point.
#[derive(Debug, Clone, Copy, Default)]
pub struct Autopilot;

impl Autopilot {
    pub fn new() -> Self {
        Self
    }

    /// Closest live meteor that is above the ship and in its lane
    fn threat<'a>(state: &'a GameState) -> Option<&'a Hazard> {
        let ship = state.ship.rect();
        state
            .registry
            .hazards
            .iter()
            .filter(|h| h.is_alive())
            .filter(|h| {
                let r = h.rect();
                let lane = (r.size.x + ship.size.x) / 2.0 + THREAT_MARGIN;
                r.bottom() > ship.top() - THREAT_LOOKAHEAD
                    && r.top() < ship.bottom()
                    && (r.center.x - ship.center.x).abs() < lane
            })
            .min_by(|a, b| {
                let da = a.pos.distance_squared(state.ship.pos);
                let db = b.pos.distance_squared(state.ship.pos);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}

fn steer(from: f32, to: f32) -> i8 {
    let delta = to - from;
    if delta.abs() <= STEER_DEADZONE {
        0
    } else if delta > 0.0 {
        1
    } else {
        -1
    }
}

impl InputSource for Autopilot {
    fn poll(&mut self, state: &GameState) -> TickInput {
        let mut input = TickInput {
            fire_pressed: true,
            fire_held: true,
            ..Default::default()
        };
        let ship = state.ship.rect();

        if let Some(hazard) = Self::threat(state) {
            // Dodge away from the meteor, unless pinned against a wall
            let mut away: i8 = if hazard.pos.x >= ship.center.x { -1 } else { 1 };
            if (away < 0 && ship.left() <= 0.0) || (away > 0 && ship.right() >= state.tuning.width) {
                away = -away;
            }
            input.move_x = away;
            input.move_y = 1;
            input.speed_modifier = true;
            return input;
        }

        let target = state
            .registry
            .pickups
            .iter()
            .filter(|p| p.is_alive())
            .min_by(|a, b| {
                let da = a.pos.distance_squared(state.ship.pos);
                let db = b.pos.distance_squared(state.ship.pos);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|p| p.pos)
            .unwrap_or_else(|| ship_spawn_point(&state.tuning));

        input.move_x = steer(ship.center.x, target.x);
        input.move_y = steer(ship.center.y, target.y);
        input
    }
}
