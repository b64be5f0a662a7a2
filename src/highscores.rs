//! High score leaderboard system
//!
//! Persisted under the `scores` key as a plain JSON array, tracks top 10
//! scores in descending order.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, PersistError, SCORES_KEY, Store};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HighScores {
    entries: Vec<u64>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from arbitrary scores, sorting and trimming
    pub fn from_scores(mut scores: Vec<u64>) -> Self {
        scores.sort_unstable_by(|a, b| b.cmp(a));
        scores.truncate(MAX_HIGH_SCORES);
        Self { entries: scores }
    }

    /// Scores, best first
    pub fn entries(&self) -> &[u64] {
        &self.entries
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|&e| score > e).unwrap_or(true)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        // Find insertion point (sorted descending, ties keep the older entry first)
        let pos = self
            .entries
            .iter()
            .position(|&e| score > e)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, score);

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(pos + 1)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().copied()
    }

    /// Load from the store; a malformed list is re-sorted and trimmed
    pub fn load<S: Store + ?Sized>(store: &S) -> Self {
        let raw: Vec<u64> = persistence::load_or_default(store, SCORES_KEY);
        let scores = Self::from_scores(raw);
        log::info!("Loaded {} high scores", scores.entries.len());
        scores
    }

    pub fn save<S: Store + ?Sized>(&self, store: &mut S) -> Result<(), PersistError> {
        persistence::save_record(store, SCORES_KEY, self)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}
