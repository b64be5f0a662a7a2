//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Time comes only from the `dt` handed to `tick`
//! - Seeded RNG only
//! - Stable iteration order (insertion order per role)
//! - No rendering, audio or storage backends; those sit behind traits

pub mod clock;
pub mod collision;
pub mod mask;
pub mod motion;
pub mod registry;
pub mod shapes;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod weapons;

pub use clock::SimClock;
pub use collision::{CollisionReport, DestroyedHazard};
pub use mask::{CollisionMask, Rect, sprites_overlap};
pub use registry::{EntityRef, Registry, Role};
pub use snapshot::{Presenter, Snapshot, Sprite, SpriteKind};
pub use state::{EndReason, Entity, GameEvent, GamePhase, GameState, RunState, Ship};
pub use tick::{TickInput, reset, tick};
