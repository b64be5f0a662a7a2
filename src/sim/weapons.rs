//! Fire gate, rapid-fire boost and autofire
//!
//! Normal shots go through the ship's cooldown gate and only fire on a key
//! press. While boosted, the press is ignored and a held trigger autofires on
//! its own interval, bypassing the gate entirely.

use super::state::{Entity, GameEvent, GameState, Projectile};

/// Spawn a projectile at the ship's nose
fn launch_projectile(state: &mut GameState) {
    let nose = state.ship.rect().mid_top();
    let projectile = Projectile::new(
        nose,
        state.tuning.projectile_speed,
        state.shapes.projectile.clone(),
    );
    state.registry.add(Entity::Projectile(projectile));
    state.emit(GameEvent::ShotFired { pos: nose });
}

/// Gated shot on a fire press. Returns whether a projectile was created.
pub fn try_fire(state: &mut GameState) -> bool {
    if state.run.boost_active || !state.ship.can_fire {
        return false;
    }
    let now = state.now_ms();
    state.ship.can_fire = false;
    state.ship.last_shot_ms = now;
    launch_projectile(state);
    true
}

/// Reopen the fire gate once the cooldown has elapsed
pub fn update_cooldown(state: &mut GameState) {
    let ship = &mut state.ship;
    if !ship.can_fire && state.clock.now_ms() - ship.last_shot_ms >= ship.cooldown_ms {
        ship.can_fire = true;
    }
}

/// Start or refresh the boost window
pub fn activate_boost(state: &mut GameState) {
    let expires_at_ms = state.now_ms() + state.tuning.boost_duration_ms;
    if state.run.boost_active {
        log::debug!("Boost refreshed until {expires_at_ms}ms");
    } else {
        log::info!("Rapid fire active until {expires_at_ms}ms");
    }
    state.run.boost_active = true;
    state.run.boost_expiry_ms = expires_at_ms;
    state.emit(GameEvent::BoostActivated { expires_at_ms });
}

/// Close the boost window once it has run out
pub fn update_boost(state: &mut GameState) {
    if state.run.boost_active && state.now_ms() >= state.run.boost_expiry_ms {
        state.run.boost_active = false;
        log::info!("Rapid fire expired");
        state.emit(GameEvent::BoostExpired);
    }
}

/// Autofire while boosted and the trigger is held. Returns whether a
/// projectile was created.
pub fn autofire(state: &mut GameState, fire_held: bool) -> bool {
    if !state.run.boost_active || !fire_held {
        return false;
    }
    let now = state.now_ms();
    let ready = match state.run.last_boost_shot_ms {
        None => true,
        Some(last) => now - last >= state.tuning.autofire_interval_ms,
    };
    if !ready {
        return false;
    }
    state.run.last_boost_shot_ms = Some(now);
    launch_projectile(state);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::registry::Role;
    use crate::tuning::Tuning;

    fn state() -> GameState {
        GameState::new(1, Tuning::default())
    }

    #[test]
    fn test_second_shot_inside_cooldown_is_rejected() {
        let mut state = state();
        assert!(try_fire(&mut state));
        state.clock.advance_ms(399);
        update_cooldown(&mut state);
        assert!(!try_fire(&mut state));
        assert_eq!(state.registry.count(Role::Projectile), 1);
    }

    #[test]
    fn test_gate_reopens_at_cooldown_boundary() {
        let mut state = state();
        assert!(try_fire(&mut state));
        state.clock.advance_ms(400);
        update_cooldown(&mut state);
        assert!(state.ship.can_fire);
        assert!(try_fire(&mut state));
        assert_eq!(state.registry.count(Role::Projectile), 2);
    }

    #[test]
    fn test_upgraded_cooldown_is_shorter() {
        let mut state = state();
        state.ship.cooldown_ms = state.tuning.cooldown_ms(true);
        assert!(try_fire(&mut state));
        state.clock.advance_ms(200);
        update_cooldown(&mut state);
        assert!(try_fire(&mut state));
    }

    #[test]
    fn test_projectile_leaves_from_ship_nose() {
        let mut state = state();
        try_fire(&mut state);
        let projectile = &state.registry.projectiles[0];
        assert_eq!(projectile.pos.x, state.ship.pos.x);
        assert_eq!(projectile.rect().bottom(), state.ship.rect().top());
    }

    #[test]
    fn test_boost_expires_after_window() {
        let mut state = state();
        activate_boost(&mut state);
        state.clock.advance_ms(4_999);
        update_boost(&mut state);
        assert!(state.run.boost_active);
        state.clock.advance_ms(1);
        update_boost(&mut state);
        assert!(!state.run.boost_active);
    }

    #[test]
    fn test_recollecting_refreshes_expiry() {
        let mut state = state();
        activate_boost(&mut state);
        state.clock.advance_ms(3_000);
        activate_boost(&mut state);
        assert_eq!(state.run.boost_expiry_ms, 8_000);
        state.clock.advance_ms(3_000);
        update_boost(&mut state);
        assert!(state.run.boost_active);
    }

    #[test]
    fn test_boost_disables_pressed_fire() {
        let mut state = state();
        activate_boost(&mut state);
        assert!(!try_fire(&mut state));
        assert_eq!(state.registry.count(Role::Projectile), 0);
    }

    #[test]
    fn test_autofire_bypasses_cooldown_and_respects_interval() {
        let mut state = state();
        state.ship.can_fire = false;
        activate_boost(&mut state);
        let mut fired = 0;
        // Trigger held for 350ms, sampled every millisecond
        for _ in 0..=350 {
            if autofire(&mut state, true) {
                fired += 1;
            }
            state.clock.advance_ms(1);
        }
        assert_eq!(fired, 4);
    }

    #[test]
    fn test_autofire_needs_held_trigger() {
        let mut state = state();
        activate_boost(&mut state);
        assert!(!autofire(&mut state, false));
        assert!(autofire(&mut state, true));
    }
}
