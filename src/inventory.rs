//! Stackable consumable inventory
//!
//! Counts are always positive: a kind at zero is simply absent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Consumable power-up kinds, tagged as stored in the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConsumableKind {
    CoinMagnet,
    ScoreMultiplier,
    Invincibility,
    ExtraLife,
}

impl ConsumableKind {
    pub const ALL: [ConsumableKind; 4] = [
        ConsumableKind::CoinMagnet,
        ConsumableKind::ScoreMultiplier,
        ConsumableKind::Invincibility,
        ConsumableKind::ExtraLife,
    ];

    /// Wire tag (0 is the legacy "none" value and never stored)
    pub fn tag(self) -> i32 {
        match self {
            ConsumableKind::CoinMagnet => 1,
            ConsumableKind::ScoreMultiplier => 2,
            ConsumableKind::Invincibility => 3,
            ConsumableKind::ExtraLife => 4,
        }
    }

    pub fn from_tag(tag: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsumableKind::CoinMagnet => "Coin Magnet",
            ConsumableKind::ScoreMultiplier => "Score x2",
            ConsumableKind::Invincibility => "Invincible",
            ConsumableKind::ExtraLife => "Extra Life",
        }
    }
}

/// Owned consumables and their quantities
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumableInventory {
    counts: BTreeMap<ConsumableKind, u32>,
}

impl ConsumableInventory {
    pub fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }

    /// Add one of `kind`
    pub fn add(&mut self, kind: ConsumableKind) {
        let count = self.counts.entry(kind).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Use one of `kind`. Returns false (and changes nothing) if none are owned.
    pub fn consume(&mut self, kind: ConsumableKind) -> bool {
        let Some(count) = self.counts.get_mut(&kind) else {
            return false;
        };
        *count -= 1;
        if *count == 0 {
            self.counts.remove(&kind);
        }
        true
    }

    pub fn count(&self, kind: ConsumableKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Overwrite a count; zero removes the entry
    pub fn set_count(&mut self, kind: ConsumableKind, count: u32) {
        if count == 0 {
            self.counts.remove(&kind);
        } else {
            self.counts.insert(kind, count);
        }
    }

    /// Owned kinds in tag order
    pub fn iter(&self) -> impl Iterator<Item = (ConsumableKind, u32)> + '_ {
        self.counts.iter().map(|(k, c)| (*k, *c))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}
