//! Game state and core simulation types
//!
//! Everything a session mutates lives in `GameState`, which is threaded
//! explicitly through each system. Only the economy outlives a session.

use std::sync::Arc;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::clock::SimClock;
use super::mask::{CollisionMask, Rect};
use super::registry::Registry;
use super::shapes::ShapeLibrary;
use super::spawner::SpawnTimer;
use crate::economy::SkinId;
use crate::tuning::Tuning;

/// Run controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// No session started yet
    #[default]
    Idle,
    /// Session in progress
    Running,
    /// Session over, waiting for an external reset
    Ended,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Ship touched a meteor
    ShipDestroyed,
    /// Quit signal from the input source
    Quit,
}

/// Something that happened during a tick, drained by the caller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A projectile left the ship
    ShotFired { pos: Vec2 },
    /// A meteor was shot down
    HazardDestroyed { pos: Vec2, carrier: bool },
    /// A pickup appeared
    PickupDropped { pos: Vec2 },
    /// Ship collected a pickup, boost runs until `expires_at_ms`
    BoostActivated { expires_at_ms: u64 },
    /// Boost window closed
    BoostExpired,
    /// Currency credited for a destruction
    CurrencyEarned { amount: u64, balance: u64 },
    /// Ship was hit
    ShipHit { pos: Vec2 },
    /// Session finished with the final score
    SessionEnded { score: u64, reason: EndReason },
}

/// Stable entity identifier, allocated by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct EntityId(pub u32);

/// Registry bookkeeping shared by every entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifecycle {
    pub id: EntityId,
    pub alive: bool,
}

impl Lifecycle {
    /// Not yet registered; the registry assigns the id on insertion
    pub fn pending() -> Self {
        Self {
            id: EntityId(0),
            alive: true,
        }
    }
}

/// Access to the lifecycle embedded in each entity record
pub trait Tracked {
    fn life(&self) -> &Lifecycle;
    fn life_mut(&mut self) -> &mut Lifecycle;

    #[inline]
    fn id(&self) -> EntityId {
        self.life().id
    }

    #[inline]
    fn is_alive(&self) -> bool {
        self.life().alive
    }
}

macro_rules! impl_tracked {
    ($($ty:ty),* $(,)?) => {
        $(impl Tracked for $ty {
            #[inline]
            fn life(&self) -> &Lifecycle {
                &self.life
            }

            #[inline]
            fn life_mut(&mut self) -> &mut Lifecycle {
                &mut self.life
            }
        })*
    };
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Ship {
    /// Center of the sprite
    pub pos: Vec2,
    /// Unit vector or zero
    pub direction: Vec2,
    /// Speed without the modifier
    pub base_speed: f32,
    /// Speed while the modifier is held
    pub boosted_speed: f32,
    /// Speed modifier held this tick
    pub speed_boosted: bool,
    /// Fire gate open
    pub can_fire: bool,
    /// When the last gated shot was issued
    pub last_shot_ms: u64,
    /// Gate length
    pub cooldown_ms: u64,
    pub skin: SkinId,
    pub mask: Arc<CollisionMask>,
}

impl Ship {
    pub fn new(pos: Vec2, tuning: &Tuning, upgraded: bool, skin: SkinId, mask: Arc<CollisionMask>) -> Self {
        Self {
            pos,
            direction: Vec2::ZERO,
            base_speed: tuning.ship_speed,
            boosted_speed: tuning.ship_boosted_speed,
            speed_boosted: false,
            can_fire: true,
            last_shot_ms: 0,
            cooldown_ms: tuning.cooldown_ms(upgraded),
            skin,
            mask,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.mask.size())
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        if self.speed_boosted {
            self.boosted_speed
        } else {
            self.base_speed
        }
    }
}

/// A laser shot travelling up
#[derive(Debug, Clone)]
pub struct Projectile {
    pub life: Lifecycle,
    pub pos: Vec2,
    pub speed: f32,
    pub mask: Arc<CollisionMask>,
}

impl Projectile {
    /// Spawn with the sprite's bottom edge at `mid_bottom`
    pub fn new(mid_bottom: Vec2, speed: f32, mask: Arc<CollisionMask>) -> Self {
        let pos = Vec2::new(mid_bottom.x, mid_bottom.y - mask.size().y / 2.0);
        Self {
            life: Lifecycle::pending(),
            pos,
            speed,
            mask,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.mask.size())
    }
}

/// A falling, spinning meteor
#[derive(Debug, Clone)]
pub struct Hazard {
    pub life: Lifecycle,
    pub pos: Vec2,
    /// Direction before scaling by speed (not normalized)
    pub direction: Vec2,
    pub speed: f32,
    /// Degrees, counter-clockwise
    pub rotation: f32,
    /// Degrees per second
    pub rotation_rate: f32,
    pub spawned_at_ms: u64,
    pub lifetime_ms: u64,
    /// Bonus payload: guaranteed pickup and a bigger reward
    carrier: bool,
    pub base_mask: Arc<CollisionMask>,
    /// Mask of the sprite at the current rotation
    pub mask: CollisionMask,
}

impl Hazard {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pos: Vec2,
        direction: Vec2,
        speed: f32,
        rotation_rate: f32,
        spawned_at_ms: u64,
        lifetime_ms: u64,
        carrier: bool,
        base_mask: Arc<CollisionMask>,
    ) -> Self {
        let mask = (*base_mask).clone();
        Self {
            life: Lifecycle::pending(),
            pos,
            direction,
            speed,
            rotation: 0.0,
            rotation_rate,
            spawned_at_ms,
            lifetime_ms,
            carrier,
            base_mask,
            mask,
        }
    }

    /// Carrier flag is fixed at spawn
    #[inline]
    pub fn is_carrier(&self) -> bool {
        self.carrier
    }

    #[inline]
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.spawned_at_ms)
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.mask.size())
    }
}

/// Rapid-fire power-up drifting down
#[derive(Debug, Clone)]
pub struct Pickup {
    pub life: Lifecycle,
    pub pos: Vec2,
    pub speed: f32,
    pub mask: Arc<CollisionMask>,
}

impl Pickup {
    pub fn new(pos: Vec2, speed: f32, mask: Arc<CollisionMask>) -> Self {
        Self {
            life: Lifecycle::pending(),
            pos,
            speed,
            mask,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.mask.size())
    }
}

/// Self-retiring explosion animation
#[derive(Debug, Clone)]
pub struct Explosion {
    pub life: Lifecycle,
    pub pos: Vec2,
    /// Fractional frame counter
    pub progress: f32,
    pub frame_count: u32,
}

impl Explosion {
    pub fn new(pos: Vec2, frame_count: u32) -> Self {
        Self {
            life: Lifecycle::pending(),
            pos,
            progress: 0.0,
            frame_count,
        }
    }

    /// Frame to draw, or `None` once the animation has played out
    pub fn frame_index(&self) -> Option<u32> {
        let frame = self.progress.floor() as u32;
        (frame < self.frame_count).then_some(frame)
    }
}

/// Background star, fixed for the whole session
#[derive(Debug, Clone)]
pub struct Star {
    pub life: Lifecycle,
    pub pos: Vec2,
}

impl Star {
    pub fn new(pos: Vec2) -> Self {
        Self {
            life: Lifecycle::pending(),
            pos,
        }
    }
}

impl_tracked!(Projectile, Hazard, Pickup, Explosion, Star);

/// Tagged entity record handed to the registry
#[derive(Debug, Clone)]
pub enum Entity {
    Projectile(Projectile),
    Hazard(Hazard),
    Pickup(Pickup),
    Explosion(Explosion),
    Star(Star),
}

/// Per-session timers and score
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunState {
    pub session_start_ms: u64,
    pub score: u64,
    pub boost_active: bool,
    pub boost_expiry_ms: u64,
    /// Last autofire shot, `None` until the first one
    pub last_boost_shot_ms: Option<u64>,
    pub end_reason: Option<EndReason>,
}

impl RunState {
    pub fn new(session_start_ms: u64) -> Self {
        Self {
            session_start_ms,
            ..Default::default()
        }
    }

    /// Time-based score: one point per `interval_ms` survived
    pub fn score_at(&self, now_ms: u64, interval_ms: u64) -> u64 {
        now_ms.saturating_sub(self.session_start_ms) / interval_ms.max(1)
    }

    /// Boost time left at `now_ms`
    pub fn boost_remaining_ms(&self, now_ms: u64) -> u64 {
        if self.boost_active {
            self.boost_expiry_ms.saturating_sub(now_ms)
        } else {
            0
        }
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub shapes: ShapeLibrary,
    pub clock: SimClock,
    pub phase: GamePhase,
    pub ship: Ship,
    pub registry: Registry,
    pub run: RunState,
    pub spawner: SpawnTimer,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle state; call `tick::reset` to start a session
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let shapes = ShapeLibrary::default();
        let ship = Ship::new(
            ship_spawn_point(&tuning),
            &tuning,
            false,
            SkinId::default(),
            shapes.ship.clone(),
        );
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            shapes,
            clock: SimClock::new(),
            phase: GamePhase::Idle,
            ship,
            registry: Registry::default(),
            run: RunState::default(),
            spawner: SpawnTimer::default(),
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    #[inline]
    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

/// Ship start: horizontally centred, three quarters down the viewport
pub fn ship_spawn_point(tuning: &Tuning) -> Vec2 {
    Vec2::new(tuning.width / 2.0, tuning.height * 0.75)
}
