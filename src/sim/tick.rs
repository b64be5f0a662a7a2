//! Session reset and the per-frame tick
//!
//! Tick order: input, spawn, motion and lifetime, collisions, boost and
//! cooldown, score. The clock is sampled once at the start of the tick.

use glam::Vec2;
use rand::Rng;

use super::collision;
use super::motion::{self, intent_direction};
use super::spawner;
use super::state::{
    EndReason, Entity, GameEvent, GamePhase, GameState, RunState, Ship, Star, ship_spawn_point,
};
use super::weapons;
use crate::economy::{Account, Economy, Upgrade};

/// Input sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Horizontal intent: -1 left, 0 none, 1 right
    pub move_x: i8,
    /// Vertical intent: -1 up, 0 none, 1 down
    pub move_y: i8,
    /// Speed modifier held
    pub speed_modifier: bool,
    /// Fire key went down this tick
    pub fire_pressed: bool,
    /// Fire key is down
    pub fire_held: bool,
    /// Leave the session
    pub quit: bool,
}

/// Start a new session: `Idle`/`Ended` → `Running`
pub fn reset(state: &mut GameState, economy: &Economy) {
    state.registry.clear();
    state.events.clear();
    state.spawner.reset();

    state.ship = Ship::new(
        ship_spawn_point(&state.tuning),
        &state.tuning,
        economy.has_upgrade(Upgrade::RapidCooldown),
        economy.selected_skin.clone(),
        state.shapes.ship.clone(),
    );

    let (w, h) = (state.tuning.width as i32, state.tuning.height as i32);
    for _ in 0..state.tuning.star_count {
        let pos = Vec2::new(
            state.rng.random_range(0..=w) as f32,
            state.rng.random_range(0..=h) as f32,
        );
        state.registry.add(Entity::Star(Star::new(pos)));
    }

    let now = state.now_ms();
    state.run = RunState::new(now);
    state.phase = GamePhase::Running;
    log::info!(
        "Session started at {}ms (skin {}, cooldown {}ms)",
        now,
        state.ship.skin,
        state.ship.cooldown_ms
    );
}

/// Advance a running session by `dt` seconds
///
/// Returns the final score on the tick the session ends. Ticking an idle or
/// ended session does nothing.
pub fn tick(state: &mut GameState, account: &mut Account, input: &TickInput, dt: f32) -> Option<u64> {
    if state.phase != GamePhase::Running {
        return None;
    }

    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let elapsed_ms = state.clock.advance(dt);

    // Input
    if input.quit {
        return Some(end_session(state, EndReason::Quit));
    }
    state.ship.direction = intent_direction(input.move_x, input.move_y);
    state.ship.speed_boosted = input.speed_modifier;
    if input.fire_pressed {
        weapons::try_fire(state);
    }

    // Spawn
    spawner::spawn_hazards(state, elapsed_ms);

    // Motion and lifetime
    motion::update(state, dt);
    state.registry.sweep();

    // Collisions
    let report = collision::resolve(state, account);
    state.registry.sweep();
    if report.ship_hit {
        return Some(end_session(state, EndReason::ShipDestroyed));
    }

    // Boost and cooldown
    weapons::update_boost(state);
    weapons::update_cooldown(state);
    weapons::autofire(state, input.fire_held);

    update_score(state);
    None
}

fn update_score(state: &mut GameState) {
    let score = state
        .run
        .score_at(state.now_ms(), state.tuning.score_interval_ms);
    state.run.score = state.run.score.max(score);
}

/// `Running` → `Ended`
fn end_session(state: &mut GameState, reason: EndReason) -> u64 {
    update_score(state);
    state.phase = GamePhase::Ended;
    state.run.end_reason = Some(reason);
    state.run.boost_active = false;
    let score = state.run.score;
    state.emit(GameEvent::SessionEnded { score, reason });
    log::info!("Session ended ({reason:?}) with score {score}");
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_DT;
    use crate::persistence::MemoryStore;
    use crate::sim::registry::Role;
    use crate::tuning::Tuning;

    fn setup(seed: u64) -> (GameState, Account) {
        let mut state = GameState::new(seed, Tuning::default());
        let account = Account::new(Economy::default(), Box::new(MemoryStore::default()));
        reset(&mut state, account.economy());
        (state, account)
    }

    #[test]
    fn test_idle_state_does_not_tick() {
        let mut state = GameState::new(1, Tuning::default());
        let mut account = Account::new(Economy::default(), Box::new(MemoryStore::default()));
        assert_eq!(tick(&mut state, &mut account, &TickInput::default(), 1.0), None);
        assert_eq!(state.now_ms(), 0);
        assert_eq!(state.phase, GamePhase::Idle);
    }

    #[test]
    fn test_reset_seeds_stars_and_ship() {
        let (state, _) = setup(3);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.registry.count(Role::Star), 20);
        assert_eq!(state.registry.count(Role::Hazard), 0);
        assert_eq!(state.ship.pos, Vec2::new(640.0, 540.0));
        assert_eq!(state.ship.cooldown_ms, 400);
    }

    #[test]
    fn test_reset_applies_upgrade_and_skin() {
        let mut state = GameState::new(3, Tuning::default());
        let mut economy = Economy {
            currency: 1_000,
            ..Default::default()
        };
        economy.buy_upgrade(Upgrade::RapidCooldown).unwrap();
        let crimson = crate::economy::SkinId::new("crimson");
        economy.buy_skin(&crimson).unwrap();
        economy.select_skin(&crimson).unwrap();
        reset(&mut state, &economy);
        assert_eq!(state.ship.cooldown_ms, 200);
        assert_eq!(state.ship.skin, crimson);
    }

    #[test]
    fn test_score_after_2350ms() {
        let (mut state, mut account) = setup(4);
        // 47 ticks of 50ms, meteors cleared so nothing can end the run
        for _ in 0..47 {
            tick(&mut state, &mut account, &TickInput::default(), 0.05);
            state.registry.remove_all(Role::Hazard);
        }
        assert!(state.is_running());
        assert_eq!(state.now_ms() - state.run.session_start_ms, 2_350);
        assert_eq!(state.run.score, 23);
    }

    #[test]
    fn test_score_never_decreases() {
        let (mut state, mut account) = setup(5);
        let mut last = 0;
        for _ in 0..120 {
            tick(&mut state, &mut account, &TickInput::default(), FRAME_DT);
            assert!(state.run.score >= last);
            last = state.run.score;
        }
    }

    #[test]
    fn test_quick_double_press_fires_once() {
        let (mut state, mut account) = setup(6);
        let press = TickInput {
            fire_pressed: true,
            fire_held: true,
            ..Default::default()
        };
        tick(&mut state, &mut account, &press, FRAME_DT);
        tick(&mut state, &mut account, &TickInput::default(), FRAME_DT);
        // Second press ~33ms later, well inside the 400ms cooldown
        tick(&mut state, &mut account, &press, FRAME_DT);
        assert_eq!(state.registry.count(Role::Projectile), 1);
    }

    #[test]
    fn test_boosted_autofire_over_350ms() {
        let (mut state, mut account) = setup(7);
        weapons::activate_boost(&mut state);
        let start = state.now_ms();
        let hold = TickInput {
            fire_held: true,
            ..Default::default()
        };
        while state.now_ms() + 17 <= start + 350 {
            tick(&mut state, &mut account, &hold, FRAME_DT);
        }
        let fired = state.registry.count(Role::Projectile);
        assert!((3..=4).contains(&fired), "fired = {fired}");
    }

    #[test]
    fn test_one_spawn_per_interval() {
        let (mut state, mut account) = setup(8);
        for _ in 0..36 {
            tick(&mut state, &mut account, &TickInput::default(), FRAME_DT);
        }
        assert!(state.now_ms() >= 600);
        assert_eq!(state.registry.count(Role::Hazard), 1);
    }

    #[test]
    fn test_quit_ends_session() {
        let (mut state, mut account) = setup(9);
        tick(&mut state, &mut account, &TickInput::default(), 1.0);
        let quit = TickInput {
            quit: true,
            ..Default::default()
        };
        let score = tick(&mut state, &mut account, &quit, FRAME_DT);
        assert_eq!(state.phase, GamePhase::Ended);
        assert_eq!(score, Some(state.run.score));
        assert_eq!(state.run.end_reason, Some(EndReason::Quit));
        // Ended sessions stay ended until reset
        assert_eq!(tick(&mut state, &mut account, &TickInput::default(), 1.0), None);
    }

    #[test]
    fn test_ship_hit_ends_session() {
        let (mut state, mut account) = setup(10);
        for _ in 0..36 {
            tick(&mut state, &mut account, &TickInput::default(), FRAME_DT);
        }
        assert_eq!(state.registry.count(Role::Hazard), 1);
        state.registry.hazards[0].pos = state.ship.pos;
        let score = tick(&mut state, &mut account, &TickInput::default(), FRAME_DT);

        assert_eq!(score, Some(6));
        assert!(!state.is_running());
        assert_eq!(state.run.end_reason, Some(EndReason::ShipDestroyed));
        assert_eq!(state.registry.count(Role::Hazard), 0);
        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::ShipHit { .. })));
    }

    #[test]
    fn test_reset_after_end_starts_fresh() {
        let (mut state, mut account) = setup(11);
        let quit = TickInput {
            quit: true,
            ..Default::default()
        };
        tick(&mut state, &mut account, &TickInput::default(), 0.8);
        tick(&mut state, &mut account, &quit, FRAME_DT);
        reset(&mut state, account.economy());
        assert!(state.is_running());
        assert_eq!(state.run.score, 0);
        assert_eq!(state.registry.count(Role::Hazard), 0);
        assert_eq!(state.run.session_start_ms, state.now_ms());
    }
}
