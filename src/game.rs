//! Run controller
//!
//! Owns the process-wide state (economy, high scores, settings) and drives
//! one session at a time: reset, tick until the session ends, record the
//! result. Collaborators (input, audio, presentation) are passed per session.

use crate::audio::{self, AudioSink};
use crate::economy::Account;
use crate::highscores::HighScores;
use crate::persistence::Store;
use crate::platform::{FramePacer, InputSource};
use crate::settings::Settings;
use crate::sim::{self, EndReason, GameState, Presenter, Snapshot, TickInput};
use crate::tuning::Tuning;

/// Result of one finished session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOutcome {
    pub score: u64,
    pub reason: EndReason,
    /// Leaderboard rank (1-indexed) if the score made the list
    pub rank: Option<usize>,
    /// Currency balance after the session
    pub balance: u64,
    /// Session length in simulation time
    pub duration_ms: u64,
}

/// Game instance holding all state
pub struct Game {
    state: GameState,
    account: Account,
    scores: HighScores,
    settings: Settings,
    store: Box<dyn Store>,
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("phase", &self.state.phase)
            .field("account", &self.account)
            .field("scores", &self.scores)
            .finish_non_exhaustive()
    }
}

impl Game {
    /// Load every persisted record from `store` and prepare an idle session
    ///
    /// The store is cloned for the economy so currency can be written through
    /// on every change while the controller keeps its own handle for scores.
    pub fn open<S>(store: S, tuning: Tuning, seed: u64) -> Self
    where
        S: Store + Clone + 'static,
    {
        let account = Account::load(Box::new(store.clone()));
        let scores = HighScores::load(&store);
        let settings = Settings::load(&store);
        log::info!("Galaxy Defender ready (seed {seed})");
        Self {
            state: GameState::new(seed, tuning),
            account,
            scores,
            settings,
            store: Box::new(store),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable session access for tools and tests
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    /// Shop access between sessions
    pub fn account_mut(&mut self) -> &mut Account {
        &mut self.account
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.scores
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Start a new session from the current economy
    pub fn start(&mut self) {
        sim::reset(&mut self.state, self.account.economy());
    }

    /// Advance the running session by one frame
    ///
    /// Returns the outcome on the frame the session ends.
    pub fn step(&mut self, input: &TickInput, dt: f32) -> Option<SessionOutcome> {
        let score = sim::tick(&mut self.state, &mut self.account, input, dt)?;
        Some(self.finish(score))
    }

    fn finish(&mut self, score: u64) -> SessionOutcome {
        let rank = self.record_score(score);
        let outcome = SessionOutcome {
            score,
            reason: self.state.run.end_reason.unwrap_or(EndReason::Quit),
            rank,
            balance: self.account.economy().currency,
            duration_ms: self.state.now_ms().saturating_sub(self.state.run.session_start_ms),
        };
        log::info!(
            "Session over: score {} ({:?}), rank {:?}, balance {}",
            outcome.score,
            outcome.reason,
            outcome.rank,
            outcome.balance
        );
        outcome
    }

    /// Add a score to the leaderboard and save it; save failures are logged
    pub fn record_score(&mut self, score: u64) -> Option<usize> {
        let rank = self.scores.add_score(score)?;
        if let Err(e) = self.scores.save(self.store.as_mut()) {
            log::error!("Failed to save high scores: {e}");
        }
        Some(rank)
    }

    /// Run one complete session
    ///
    /// Polls `input` once per frame, forwards cues to `audio` and a snapshot
    /// to `presenter` after every tick. With `max_seconds` set, a quit is
    /// injected once that much session time has passed.
    pub fn play_session(
        &mut self,
        input: &mut dyn InputSource,
        pacer: &mut FramePacer,
        audio: &mut dyn AudioSink,
        presenter: &mut dyn Presenter,
        max_seconds: Option<f32>,
    ) -> SessionOutcome {
        self.start();
        let limit_ms = max_seconds.map(|s| (s.max(0.0) * 1000.0) as u64);

        loop {
            let dt = pacer.next_dt();
            let mut frame = input.poll(&self.state);
            let elapsed = self.state.now_ms().saturating_sub(self.state.run.session_start_ms);
            if limit_ms.is_some_and(|limit| elapsed >= limit) {
                frame.quit = true;
            }

            let outcome = self.step(&frame, dt);

            let events = self.state.drain_events();
            audio::dispatch(audio, &events);
            presenter.present(&Snapshot::capture(&self.state));

            if let Some(outcome) = outcome {
                return outcome;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SoundEffect;
    use crate::persistence::{ECONOMY_KEY, MemoryStore, SCORES_KEY};
    use crate::platform::ScriptedInput;
    use crate::sim::registry::Role;

    #[derive(Default)]
    struct Frames(Vec<Snapshot>);

    impl Presenter for Frames {
        fn present(&mut self, snapshot: &Snapshot) {
            self.0.push(snapshot.clone());
        }
    }

    #[derive(Default)]
    struct Cues(Vec<SoundEffect>);

    impl AudioSink for Cues {
        fn play(&mut self, effect: SoundEffect) {
            self.0.push(effect);
        }
    }

    #[test]
    fn test_time_limit_quits_and_records_score() {
        let store = MemoryStore::default();
        let mut game = Game::open(store.clone(), Tuning::default(), 42);
        let mut input = ScriptedInput::default();
        let mut frames = Frames::default();
        let mut cues = Cues::default();

        // Park the ship where no meteor can reach it in a quarter second
        let outcome = game.play_session(
            &mut input,
            &mut FramePacer::fixed(60),
            &mut cues,
            &mut frames,
            Some(0.25),
        );

        assert_eq!(outcome.reason, EndReason::Quit);
        assert!((2..=3).contains(&outcome.score), "score = {}", outcome.score);
        assert_eq!(outcome.rank, Some(1));
        assert_eq!(game.high_scores().entries(), &[outcome.score]);
        assert!(store.load(SCORES_KEY).unwrap().is_some());
        assert_eq!(frames.0.last().map(|s| s.phase), Some(sim::GamePhase::Ended));
    }

    #[test]
    fn test_step_does_nothing_before_start() {
        let mut game = Game::open(MemoryStore::default(), Tuning::default(), 1);
        assert_eq!(game.step(&TickInput::default(), 1.0), None);
        assert_eq!(game.state().now_ms(), 0);
    }

    #[test]
    fn test_ship_hit_outcome() {
        let mut game = Game::open(MemoryStore::default(), Tuning::default(), 7);
        game.start();
        for _ in 0..36 {
            assert_eq!(game.step(&TickInput::default(), crate::consts::FRAME_DT), None);
        }
        let ship_pos = game.state().ship.pos;
        game.state_mut().registry.hazards[0].pos = ship_pos;

        let outcome = game
            .step(&TickInput::default(), crate::consts::FRAME_DT)
            .unwrap();
        assert_eq!(outcome.reason, EndReason::ShipDestroyed);
        assert_eq!(outcome.score, 6);
        assert_eq!(game.state().registry.count(Role::Hazard), 0);
    }

    #[test]
    fn test_sessions_share_the_economy() {
        let store = MemoryStore::default();
        let mut game = Game::open(store.clone(), Tuning::default(), 3);
        game.account_mut().credit(200);
        game.account_mut()
            .purchase_upgrade(crate::economy::Upgrade::RapidCooldown)
            .unwrap();
        game.start();
        assert_eq!(game.state().ship.cooldown_ms, 200);

        // A fresh controller over the same store sees the purchase
        let reopened = Game::open(store.clone(), Tuning::default(), 3);
        assert_eq!(reopened.account().economy().currency, 50);
        assert!(store.load(ECONOMY_KEY).unwrap().is_some());
    }

    #[test]
    fn test_fire_cue_reaches_audio() {
        let mut game = Game::open(MemoryStore::default(), Tuning::default(), 5);
        let fire = TickInput {
            fire_pressed: true,
            ..Default::default()
        };
        let mut input = ScriptedInput::new([fire]).then_quit();
        let mut cues = Cues::default();
        game.play_session(
            &mut input,
            &mut FramePacer::fixed(60),
            &mut cues,
            &mut Frames::default(),
            None,
        );
        assert_eq!(cues.0, vec![SoundEffect::Laser]);
    }
}
