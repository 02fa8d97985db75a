//! Dash Progress - player progression store for an endless runner
//!
//! Core modules:
//! - `player`: the persisted state and its invariants
//! - `inventory`: consumable counts
//! - `highscores`: top-10 leaderboard
//! - `mission`: rolling mission set and mission behavior
//! - `persistence`: versioned binary record and atomic file storage
//! - `store`: load/persist lifecycle and the mutation API

pub mod config;
pub mod error;
pub mod highscores;
pub mod inventory;
pub mod mission;
pub mod persistence;
pub mod player;
pub mod settings;
pub mod store;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use highscores::{HighscoreEntry, HighscoreLedger, MAX_HIGH_SCORES};
pub use inventory::{ConsumableInventory, ConsumableKind};
pub use mission::{MISSION_FLOOR, Mission, MissionKind, MissionRegistry, RunContext, RunSnapshot};
pub use persistence::FORMAT_VERSION;
pub use player::{DEFAULT_CHARACTER, DEFAULT_THEME, PlayerData};
pub use settings::{AudioLevels, Settings, VOLUME_UNSET};
pub use store::{LoadOutcome, ProgressStore};
