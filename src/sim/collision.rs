//! Collision pass
//!
//! Three pair checks run in a fixed order after motion: ship against meteors
//! (ends the run), projectiles against meteors (destruction, rewards, drops),
//! ship against pickups (boost). Every hit is a mark; the registry sweep
//! afterwards removes what was hit.

use glam::Vec2;

use super::mask::sprites_overlap;
use super::registry::{EntityRef, Role};
use super::spawner::{drop_pickup, rolls_pickup};
use super::state::{Entity, Explosion, GameEvent, GameState, Tracked};
use super::weapons::activate_boost;
use crate::economy::Account;

/// What the collision pass did this tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// Ship touched at least one meteor
    pub ship_hit: bool,
    /// Meteors destroyed by projectiles, in resolution order
    pub destroyed: Vec<DestroyedHazard>,
    /// Pickups collected
    pub collected: u32,
}

/// A meteor shot down this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DestroyedHazard {
    pub pos: Vec2,
    pub carrier: bool,
}

/// Meteors overlapping the ship
pub fn ship_hazard_hits(state: &GameState) -> Vec<EntityRef> {
    let ship_rect = state.ship.rect();
    state
        .registry
        .hazards
        .iter()
        .filter(|h| h.is_alive())
        .filter(|h| sprites_overlap(&ship_rect, &state.ship.mask, &h.rect(), &h.mask))
        .map(|h| EntityRef {
            role: Role::Hazard,
            id: h.id(),
        })
        .collect()
}

/// Projectile/meteor pairs: each live projectile with every live meteor it
/// overlaps, in registry order. Meteors claimed by an earlier projectile are
/// skipped.
fn projectile_hazard_hits(state: &GameState) -> Vec<(EntityRef, Vec<EntityRef>)> {
    let mut claimed = Vec::new();
    let mut hits = Vec::new();
    for projectile in state.registry.projectiles.iter().filter(|p| p.is_alive()) {
        let p_rect = projectile.rect();
        let overlapping: Vec<EntityRef> = state
            .registry
            .hazards
            .iter()
            .filter(|h| h.is_alive() && !claimed.contains(&h.id()))
            .filter(|h| sprites_overlap(&p_rect, &projectile.mask, &h.rect(), &h.mask))
            .map(|h| EntityRef {
                role: Role::Hazard,
                id: h.id(),
            })
            .collect();
        if overlapping.is_empty() {
            continue;
        }
        claimed.extend(overlapping.iter().map(|r| r.id));
        hits.push((
            EntityRef {
                role: Role::Projectile,
                id: projectile.id(),
            },
            overlapping,
        ));
    }
    hits
}

/// Pickups overlapping the ship
fn ship_pickup_hits(state: &GameState) -> Vec<EntityRef> {
    let ship_rect = state.ship.rect();
    state
        .registry
        .pickups
        .iter()
        .filter(|p| p.is_alive())
        .filter(|p| sprites_overlap(&ship_rect, &state.ship.mask, &p.rect(), &p.mask))
        .map(|p| EntityRef {
            role: Role::Pickup,
            id: p.id(),
        })
        .collect()
}

fn hazard_snapshot(state: &GameState, hazard: EntityRef) -> Option<DestroyedHazard> {
    state
        .registry
        .hazards
        .iter()
        .find(|h| h.id() == hazard.id)
        .map(|h| DestroyedHazard {
            pos: h.pos,
            carrier: h.is_carrier(),
        })
}

/// Run the three pair checks in order
///
/// A ship hit marks the meteors and stops the pass; the caller ends the run.
pub fn resolve(state: &mut GameState, account: &mut Account) -> CollisionReport {
    let mut report = CollisionReport::default();

    // 1. Ship x meteors
    let ship_hits = ship_hazard_hits(state);
    if !ship_hits.is_empty() {
        for hazard in ship_hits {
            state.registry.retire(hazard);
        }
        report.ship_hit = true;
        let pos = state.ship.pos;
        state.emit(GameEvent::ShipHit { pos });
        return report;
    }

    // 2. Projectiles x meteors
    for (projectile, hazards) in projectile_hazard_hits(state) {
        state.registry.retire(projectile);
        for hazard in hazards {
            let Some(destroyed) = hazard_snapshot(state, hazard) else {
                continue;
            };
            if !state.registry.retire(hazard) {
                continue;
            }
            destroy_hazard(state, account, destroyed);
            report.destroyed.push(destroyed);
        }
    }

    // 3. Ship x pickups
    for pickup in ship_pickup_hits(state) {
        if state.registry.retire(pickup) {
            report.collected += 1;
            activate_boost(state);
        }
    }

    report
}

/// Side effects of shooting down one meteor
fn destroy_hazard(state: &mut GameState, account: &mut Account, hazard: DestroyedHazard) {
    let frames = state.tuning.explosion_frames;
    state
        .registry
        .add(Entity::Explosion(Explosion::new(hazard.pos, frames)));
    state.emit(GameEvent::HazardDestroyed {
        pos: hazard.pos,
        carrier: hazard.carrier,
    });

    let amount = if hazard.carrier {
        state.tuning.carrier_reward
    } else {
        state.tuning.plain_reward
    };
    let balance = account.credit(amount);
    state.emit(GameEvent::CurrencyEarned { amount, balance });

    let odds = state.tuning.pickup_drop_odds;
    if rolls_pickup(&mut state.rng, hazard.carrier, odds) {
        drop_pickup(state, hazard.pos);
    }
}
