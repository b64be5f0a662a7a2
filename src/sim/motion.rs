//! Per-tick integration and retirement
//!
//! Moves every entity, spins meteors (their collision mask follows the
//! rotation), clamps the ship, and marks entities whose lifetime or bounds
//! condition is met. Marked entities are removed by the registry sweep.

use glam::Vec2;

use super::state::{GameState, Tracked};
use crate::wrap_degrees;

/// Advance positions and rotations by `dt` seconds, then retire
pub fn update(state: &mut GameState, dt: f32) {
    move_ship(state, dt);
    move_projectiles(state, dt);
    move_hazards(state, dt);
    move_pickups(state, dt);
    animate_explosions(state, dt);
}

fn move_ship(state: &mut GameState, dt: f32) {
    let ship = &mut state.ship;
    ship.pos += ship.direction * ship.speed() * dt;
    ship.pos = ship.rect().clamp_center(state.tuning.width, state.tuning.height);
}

fn move_projectiles(state: &mut GameState, dt: f32) {
    for projectile in state.registry.projectiles.iter_mut().filter(|p| p.is_alive()) {
        projectile.pos.y -= projectile.speed * dt;
        // Exited through the top
        if projectile.rect().bottom() < 0.0 {
            projectile.life_mut().alive = false;
        }
    }
}

fn move_hazards(state: &mut GameState, dt: f32) {
    let (w, h) = (state.tuning.width, state.tuning.height);
    let now = state.now_ms();

    for hazard in state.registry.hazards.iter_mut().filter(|h| h.is_alive()) {
        hazard.pos += hazard.direction * hazard.speed * dt;

        if hazard.age_ms(now) >= hazard.lifetime_ms {
            hazard.life_mut().alive = false;
            continue;
        }

        let rotation = wrap_degrees(hazard.rotation + hazard.rotation_rate * dt);
        if rotation != hazard.rotation {
            hazard.rotation = rotation;
            hazard.mask = hazard.base_mask.rotated(rotation);
        }

        let rect = hazard.rect();
        if rect.top() > h || rect.left() > w || rect.right() < 0.0 {
            hazard.life_mut().alive = false;
        }
    }
}

fn move_pickups(state: &mut GameState, dt: f32) {
    let h = state.tuning.height;
    for pickup in state.registry.pickups.iter_mut().filter(|p| p.is_alive()) {
        pickup.pos.y += pickup.speed * dt;
        if pickup.rect().top() > h {
            pickup.life_mut().alive = false;
        }
    }
}

fn animate_explosions(state: &mut GameState, dt: f32) {
    let fps = state.tuning.explosion_fps;
    for explosion in state.registry.explosions.iter_mut().filter(|e| e.is_alive()) {
        explosion.progress += fps * dt;
        if explosion.frame_index().is_none() {
            explosion.life_mut().alive = false;
        }
    }
}

/// Unit direction from discrete axis intent, zero when idle
pub fn intent_direction(x: i8, y: i8) -> Vec2 {
    Vec2::new(f32::from(x.signum()), f32::from(y.signum())).normalize_or_zero()
}
