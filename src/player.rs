//! Player progression state
//!
//! Everything that survives between sessions lives here. The store owns the
//! only live instance; other code only ever sees `&PlayerData`.

use serde::{Deserialize, Serialize};

use crate::highscores::HighscoreLedger;
use crate::inventory::ConsumableInventory;
use crate::mission::MissionRegistry;
use crate::settings::Settings;

/// Character every new profile starts with
pub const DEFAULT_CHARACTER: &str = "Mr. Drac";
/// Theme every new profile starts with
pub const DEFAULT_THEME: &str = "Day";
/// Largest balance either currency can hold (the record stores int32)
pub const CURRENCY_CAP: u32 = i32::MAX as u32;

/// Complete persisted player state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerData {
    /// Soft currency (fishbones)
    pub coins: u32,
    /// Premium currency
    pub premium: u32,
    pub consumables: ConsumableInventory,
    /// Owned characters in unlock order
    pub characters: Vec<String>,
    pub equipped_character: usize,
    /// Owned accessories as "character:accessory"
    pub accessories: Vec<String>,
    pub themes: Vec<String>,
    pub equipped_theme: usize,
    pub highscores: HighscoreLedger,
    pub missions: MissionRegistry,
    pub settings: Settings,
    /// First-time-experience step reached
    pub ftue_level: u32,
    pub rank: u32,
}

impl Default for PlayerData {
    fn default() -> Self {
        Self {
            coins: 0,
            premium: 0,
            consumables: ConsumableInventory::new(),
            characters: vec![DEFAULT_CHARACTER.to_string()],
            equipped_character: 0,
            accessories: Vec::new(),
            themes: vec![DEFAULT_THEME.to_string()],
            equipped_theme: 0,
            highscores: HighscoreLedger::new(),
            missions: MissionRegistry::new(),
            settings: Settings::default(),
            ftue_level: 0,
            rank: 0,
        }
    }
}

impl PlayerData {
    /// Name of the equipped character
    pub fn current_character(&self) -> &str {
        self.characters
            .get(self.equipped_character)
            .map_or(DEFAULT_CHARACTER, String::as_str)
    }

    /// Name of the equipped theme
    pub fn current_theme(&self) -> &str {
        self.themes
            .get(self.equipped_theme)
            .map_or(DEFAULT_THEME, String::as_str)
    }

    pub fn owns_character(&self, name: &str) -> bool {
        self.characters.iter().any(|c| c == name)
    }

    pub fn owns_theme(&self, name: &str) -> bool {
        self.themes.iter().any(|t| t == name)
    }

    pub fn owns_accessory(&self, character: &str, accessory: &str) -> bool {
        let id = accessory_id(character, accessory);
        self.accessories.iter().any(|a| *a == id)
    }

    /// Restore the structural invariants after a decode.
    ///
    /// Returns the number of corrections made; each one is logged.
    pub fn repair(&mut self) -> usize {
        let mut fixes = 0;

        if self.characters.is_empty() {
            log::warn!("Save had no characters, restoring {DEFAULT_CHARACTER}");
            self.characters.push(DEFAULT_CHARACTER.to_string());
            fixes += 1;
        }
        if self.equipped_character >= self.characters.len() {
            log::warn!(
                "Equipped character {} out of range ({} owned), resetting",
                self.equipped_character,
                self.characters.len()
            );
            self.equipped_character = 0;
            fixes += 1;
        }

        if self.themes.is_empty() {
            log::warn!("Save had no themes, restoring {DEFAULT_THEME}");
            self.themes.push(DEFAULT_THEME.to_string());
            fixes += 1;
        }
        if self.equipped_theme >= self.themes.len() {
            log::warn!(
                "Equipped theme {} out of range ({} owned), resetting",
                self.equipped_theme,
                self.themes.len()
            );
            self.equipped_theme = 0;
            fixes += 1;
        }

        fixes
    }
}

/// Composite accessory identifier
pub fn accessory_id(character: &str, accessory: &str) -> String {
    format!("{character}:{accessory}")
}
