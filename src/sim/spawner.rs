//! Hazard spawning and pickup drop rolls
//!
//! The spawn timer accumulates elapsed milliseconds and fires once per full
//! interval, so spawn rate depends on session time rather than frame rate.

use glam::Vec2;
use rand::Rng;

use super::shapes::ShapeLibrary;
use super::state::{Entity, GameEvent, GameState, Hazard, Pickup};
use crate::tuning::Tuning;

/// Accumulating fixed-period timer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnTimer {
    accumulated_ms: u64,
}

impl SpawnTimer {
    /// Add `elapsed_ms` and return how many full periods have passed
    pub fn advance(&mut self, elapsed_ms: u64, period_ms: u64) -> u32 {
        let period_ms = period_ms.max(1);
        self.accumulated_ms += elapsed_ms;
        let fired = self.accumulated_ms / period_ms;
        self.accumulated_ms %= period_ms;
        fired as u32
    }

    pub fn reset(&mut self) {
        self.accumulated_ms = 0;
    }
}

/// Roll a one-in-`odds` chance as a uniform draw in `[1, odds]`
#[inline]
pub fn one_in<R: Rng + ?Sized>(rng: &mut R, odds: u32) -> bool {
    rng.random_range(1..=odds.max(1)) == 1
}

/// Randomized hazard parameters
pub fn roll_hazard<R: Rng + ?Sized>(
    rng: &mut R,
    tuning: &Tuning,
    now_ms: u64,
    shapes: &ShapeLibrary,
) -> Hazard {
    let x = rng.random_range(0..=tuning.width as i32) as f32;
    let y = rng.random_range(tuning.hazard_spawn_y.0..=tuning.hazard_spawn_y.1) as f32;
    let drift = if tuning.hazard_drift > 0.0 {
        rng.random_range(-tuning.hazard_drift..=tuning.hazard_drift)
    } else {
        0.0
    };
    let speed = rng.random_range(tuning.hazard_speed_range.0..=tuning.hazard_speed_range.1) as f32;
    let rotation_rate =
        rng.random_range(tuning.hazard_rotation_range.0..=tuning.hazard_rotation_range.1) as f32;
    let carrier = one_in(rng, tuning.carrier_odds);

    Hazard::new(
        Vec2::new(x, y),
        Vec2::new(drift, 1.0),
        speed,
        rotation_rate,
        now_ms,
        tuning.hazard_lifetime_ms,
        carrier,
        shapes.hazard.clone(),
    )
}

/// Advance the spawn timer by `elapsed_ms` and create one hazard per period
pub fn spawn_hazards(state: &mut GameState, elapsed_ms: u64) -> u32 {
    let fired = state.spawner.advance(elapsed_ms, state.tuning.spawn_interval_ms);
    let now = state.now_ms();
    for _ in 0..fired {
        let hazard = roll_hazard(&mut state.rng, &state.tuning, now, &state.shapes);
        log::debug!(
            "Spawned meteor at ({:.0}, {:.0}) speed {} carrier {}",
            hazard.pos.x,
            hazard.pos.y,
            hazard.speed,
            hazard.is_carrier()
        );
        state.registry.add(Entity::Hazard(hazard));
    }
    fired
}

/// Whether a destroyed hazard leaves a pickup behind
pub fn rolls_pickup<R: Rng + ?Sized>(rng: &mut R, carrier: bool, odds: u32) -> bool {
    carrier || one_in(rng, odds)
}

/// Drop a pickup at `pos`
pub fn drop_pickup(state: &mut GameState, pos: Vec2) {
    let pickup = Pickup::new(pos, state.tuning.pickup_speed, state.shapes.pickup.clone());
    state.registry.add(Entity::Pickup(pickup));
    state.emit(GameEvent::PickupDropped { pos });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::registry::Role;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_timer_fires_once_per_period() {
        let mut timer = SpawnTimer::default();
        assert_eq!(timer.advance(499, 500), 0);
        assert_eq!(timer.advance(1, 500), 1);
        assert_eq!(timer.advance(250, 500), 0);
        // A long stall still yields one spawn per elapsed period
        assert_eq!(timer.advance(1_250, 500), 3);
    }

    #[test]
    fn test_timer_independent_of_frame_rate() {
        let mut fast = SpawnTimer::default();
        let mut slow = SpawnTimer::default();
        let fast_total: u32 = (0..300).map(|_| fast.advance(10, 500)).sum();
        let slow_total: u32 = (0..60).map(|_| slow.advance(50, 500)).sum();
        assert_eq!(fast_total, 6);
        assert_eq!(slow_total, 6);
    }

    #[test]
    fn test_rolled_hazards_within_ranges() {
        let tuning = Tuning::default();
        let shapes = ShapeLibrary::default();
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..500 {
            let hazard = roll_hazard(&mut rng, &tuning, 42, &shapes);
            assert!((0.0..=1280.0).contains(&hazard.pos.x));
            assert!((-200.0..=-100.0).contains(&hazard.pos.y));
            assert!((-0.5..=0.5).contains(&hazard.direction.x));
            assert_eq!(hazard.direction.y, 1.0);
            assert!((400.0..=500.0).contains(&hazard.speed));
            assert_eq!(hazard.speed.fract(), 0.0);
            assert!((50.0..=150.0).contains(&hazard.rotation_rate));
            assert_eq!(hazard.spawned_at_ms, 42);
            assert_eq!(hazard.lifetime_ms, 3000);
        }
    }

    #[test]
    fn test_carrier_rate_near_one_in_thirty() {
        let tuning = Tuning::default();
        let shapes = ShapeLibrary::default();
        let mut rng = Pcg32::seed_from_u64(11);
        let n = 6000;
        let carriers = (0..n)
            .filter(|_| roll_hazard(&mut rng, &tuning, 0, &shapes).is_carrier())
            .count();
        // Expected 200, sd ~ 13.9
        assert!((140..=260).contains(&carriers), "carriers = {carriers}");
    }

    #[test]
    fn test_carrier_always_drops() {
        let mut rng = Pcg32::seed_from_u64(3);
        assert!((0..100).all(|_| rolls_pickup(&mut rng, true, 30)));
    }

    #[test]
    fn test_plain_drop_rate_near_one_in_thirty() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let drops = (0..3000).filter(|_| rolls_pickup(&mut rng, false, 30)).count();
        // Expected 100, sd ~ 9.8; four sigma band
        assert!((61..=139).contains(&drops), "drops = {drops}");
    }

    #[test]
    fn test_spawn_hazards_adds_to_registry() {
        let mut state = GameState::new(9, Tuning::default());
        state.clock.advance_ms(1_000);
        assert_eq!(spawn_hazards(&mut state, 1_000), 2);
        assert_eq!(state.registry.count(Role::Hazard), 2);
    }
}
