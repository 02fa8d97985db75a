//! High score leaderboard
//!
//! Persisted in the save record, tracks the top 10 runs.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighscoreEntry {
    /// Name entered at the end of the run
    pub name: String,
    /// Final score
    pub score: i32,
}

/// High score leaderboard, sorted by score descending
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighscoreLedger {
    entries: Vec<HighscoreEntry>,
}

impl HighscoreLedger {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// 0-based slot a new score would land in.
    ///
    /// Lands before every entry scoring the same or lower, so among ties the
    /// most recent run ranks first.
    pub fn rank_of(&self, score: i32) -> usize {
        self.entries.partition_point(|e| e.score > score)
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, score: i32) -> bool {
        self.rank_of(score) < MAX_HIGH_SCORES
    }

    /// Add a run to the leaderboard.
    /// Returns the 0-based rank achieved, or None if it fell off the board.
    pub fn insert(&mut self, score: i32, name: impl Into<String>) -> Option<usize> {
        let rank = self.rank_of(score);
        if rank >= MAX_HIGH_SCORES {
            return None;
        }

        self.entries.insert(
            rank,
            HighscoreEntry {
                name: name.into(),
                score,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Rebuild from decoded entries, restoring order and the size cap
    pub(crate) fn from_entries(mut entries: Vec<HighscoreEntry>) -> (Self, bool) {
        let sorted = entries.windows(2).all(|w| w[0].score >= w[1].score);
        let oversized = entries.len() > MAX_HIGH_SCORES;
        if !sorted {
            // Stable, so equal scores keep their stored order
            entries.sort_by(|a, b| b.score.cmp(&a.score));
        }
        entries.truncate(MAX_HIGH_SCORES);
        (Self { entries }, !sorted || oversized)
    }

    pub fn entries(&self) -> &[HighscoreEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &HighscoreEntry> {
        self.entries.iter()
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<i32> {
        self.entries.first().map(|e| e.score)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
