//! Audio cues
//!
//! The simulation never plays sound itself. Game events are mapped to cues
//! and handed to an `AudioSink`, fire-and-forget.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Laser fired
    Laser,
    /// Meteor destroyed
    Explosion,
    /// Ship hit
    Damage,
    /// Pickup collected
    PickupCollect,
}

impl SoundEffect {
    /// Cue for a game event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::ShotFired { .. } => Some(SoundEffect::Laser),
            GameEvent::HazardDestroyed { .. } => Some(SoundEffect::Explosion),
            GameEvent::ShipHit { .. } => Some(SoundEffect::Damage),
            GameEvent::BoostActivated { .. } => Some(SoundEffect::PickupCollect),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Laser => "laser",
            SoundEffect::Explosion => "explosion",
            SoundEffect::Damage => "damage",
            SoundEffect::PickupCollect => "pickup",
        }
    }
}

/// Receives cues; must not block
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Forward every cue-bearing event to a sink
pub fn dispatch<A: AudioSink + ?Sized>(sink: &mut A, events: &[GameEvent]) {
    for effect in events.iter().filter_map(SoundEffect::for_event) {
        sink.play(effect);
    }
}

/// Headless audio manager: logs cues at their effective volume
#[derive(Debug, Clone, Default)]
pub struct AudioManager {
    settings: Settings,
    played: u64,
}

impl AudioManager {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            settings: settings.clone(),
            played: 0,
        }
    }

    /// Cues actually played (audible)
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, effect: SoundEffect) {
        let vol = self.settings.effective_sfx_volume();
        if vol <= 0.0 {
            return;
        }
        self.played += 1;
        log::trace!("cue {} @ {:.2}", effect.as_str(), vol);
    }
}
