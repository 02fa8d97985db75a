//! Error types for the progression store

use thiserror::Error;

/// Everything the store can fail with.
///
/// Invariant repairs (bad equipped index, empty default lists, mission
/// shortfall) are never errors: they are applied and logged.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Record is truncated or internally inconsistent
    #[error("malformed save record: {0}")]
    MalformedRecord(String),

    /// Underlying file store failed
    #[error("save file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Claimed a mission slot that isn't held
    #[error("no mission at slot {0}")]
    MissionNotHeld(usize),

    /// Equip request pointing outside the owned list
    #[error("cannot equip {what} #{index}: only {owned} owned")]
    InvalidSelection {
        what: &'static str,
        index: usize,
        owned: usize,
    },

    /// Spend larger than the balance
    #[error("insufficient {currency}: need {needed}, have {available}")]
    InsufficientFunds {
        currency: &'static str,
        needed: u32,
        available: u32,
    },

    /// Store configuration could not be parsed
    #[error("invalid store config: {0}")]
    Config(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedRecord(msg.into())
    }

    /// True when the failure came from the record contents rather than I/O
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedRecord(_))
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
