//! Read-only view of a session for the presentation layer

use glam::Vec2;

use super::registry::{EntityView, Role};
use super::state::{GamePhase, GameState};
use crate::consts::STAR_SIZE;

/// Sprite kinds the presenter knows how to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Ship,
    Projectile,
    Meteor { carrier: bool },
    Pickup,
    Explosion { frame: u32 },
    Star,
}

/// One drawable sprite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub center: Vec2,
    pub size: Vec2,
    /// Degrees, counter-clockwise
    pub rotation: f32,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub boost_remaining_ms: u64,
    /// Back to front: stars, meteors, pickups, projectiles, explosions, ship
    pub sprites: Vec<Sprite>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let mut sprites = Vec::new();
        for role in Role::ALL {
            state.registry.for_each(role, |view| sprites.push(sprite_for(view)));
        }
        if state.phase == GamePhase::Running {
            let ship = state.ship.rect();
            sprites.push(Sprite {
                kind: SpriteKind::Ship,
                center: ship.center,
                size: ship.size,
                rotation: 0.0,
            });
        }
        Self {
            phase: state.phase,
            score: state.run.score,
            boost_remaining_ms: state.run.boost_remaining_ms(state.now_ms()),
            sprites,
        }
    }

    /// Sprites of one kind family
    pub fn count(&self, matches: impl Fn(&SpriteKind) -> bool) -> usize {
        self.sprites.iter().filter(|s| matches(&s.kind)).count()
    }
}

fn sprite_for(view: EntityView<'_>) -> Sprite {
    match view {
        EntityView::Projectile(p) => Sprite {
            kind: SpriteKind::Projectile,
            center: p.pos,
            size: p.mask.size(),
            rotation: 0.0,
        },
        EntityView::Hazard(h) => Sprite {
            kind: SpriteKind::Meteor {
                carrier: h.is_carrier(),
            },
            center: h.pos,
            size: h.mask.size(),
            rotation: h.rotation,
        },
        EntityView::Pickup(p) => Sprite {
            kind: SpriteKind::Pickup,
            center: p.pos,
            size: p.mask.size(),
            rotation: 0.0,
        },
        EntityView::Explosion(e) => Sprite {
            kind: SpriteKind::Explosion {
                frame: e.frame_index().unwrap_or(e.frame_count.saturating_sub(1)),
            },
            center: e.pos,
            // Frames are drawn at their own size
            size: Vec2::ZERO,
            rotation: 0.0,
        },
        EntityView::Star(s) => Sprite {
            kind: SpriteKind::Star,
            center: s.pos,
            size: Vec2::new(STAR_SIZE.0 as f32, STAR_SIZE.1 as f32),
            rotation: 0.0,
        },
    }
}

/// Receives a snapshot per frame; read-only with respect to the simulation
pub trait Presenter {
    fn present(&mut self, snapshot: &Snapshot);
}
