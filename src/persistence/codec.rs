//! Versioned save record codec
//!
//! The record is a version number followed by field groups in a fixed,
//! append-only order. Each group belongs to the format version that
//! introduced it; a decoder reads only the groups its stored version has and
//! leaves later ones at their defaults.
//!
//! To add a field: bump `FORMAT_VERSION`, add a `FieldGroup` variant, and
//! append one row to `DECODE_PLAN`. Never reorder or remove rows.

use crate::error::{Result, StoreError};
use crate::highscores::{HighscoreEntry, HighscoreLedger};
use crate::inventory::{ConsumableInventory, ConsumableKind};
use crate::mission::MissionRegistry;
use crate::player::PlayerData;
use crate::settings::AudioLevels;

use super::wire::{RecordReader, RecordWriter};

/// Version written by this build
pub const FORMAT_VERSION: i32 = 12;

/// A run of fields introduced together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    /// Coins, consumables, characters, accessories, themes
    Base,
    Premium,
    Highscores,
    Missions,
    DisplayName,
    Consent,
    Audio,
    Ftue,
    Tutorial,
}

/// Minimum version → field group, in wire order.
/// Versions 5, 6 and 11 added nothing to the record.
pub const DECODE_PLAN: &[(i32, FieldGroup)] = &[
    (1, FieldGroup::Base),
    (2, FieldGroup::Premium),
    (3, FieldGroup::Highscores),
    (4, FieldGroup::Missions),
    (7, FieldGroup::DisplayName),
    (8, FieldGroup::Consent),
    (9, FieldGroup::Audio),
    (10, FieldGroup::Ftue),
    (12, FieldGroup::Tutorial),
];

/// Result of a successful decode
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    pub data: PlayerData,
    /// Version stored in the record
    pub version: i32,
    /// Invariant corrections applied while loading
    pub repairs: usize,
}

/// Encode at the current format version
pub fn encode(data: &PlayerData) -> Vec<u8> {
    encode_version(data, FORMAT_VERSION)
}

/// Encode only the groups a given older version had
pub fn encode_version(data: &PlayerData, version: i32) -> Vec<u8> {
    let mut w = RecordWriter::new();
    w.write_i32(version);
    for (_, group) in DECODE_PLAN.iter().filter(|(min, _)| *min <= version) {
        group.write(data, &mut w);
    }
    w.into_bytes()
}

/// Decode a record written by this or any earlier version
pub fn decode(bytes: &[u8]) -> Result<DecodedRecord> {
    let mut r = RecordReader::new(bytes);
    let version = r.read_i32("version")?;
    if version < 1 {
        return Err(StoreError::malformed(format!("invalid version {version}")));
    }
    if version > FORMAT_VERSION {
        log::warn!(
            "Save record is version {version}, newer than {FORMAT_VERSION}; reading known fields only"
        );
    }

    let mut data = PlayerData::default();
    let mut repairs = 0;
    for (_, group) in DECODE_PLAN.iter().filter(|(min, _)| *min <= version) {
        repairs += group.read(&mut data, &mut r)?;
    }

    if r.remaining() > 0 {
        log::debug!(
            "{} trailing bytes after version {version} record",
            r.remaining()
        );
    }

    repairs += data.repair();
    Ok(DecodedRecord {
        data,
        version,
        repairs,
    })
}

impl FieldGroup {
    fn write(self, data: &PlayerData, w: &mut RecordWriter) {
        match self {
            FieldGroup::Base => {
                w.write_u32(data.coins);

                w.write_len(data.consumables.len());
                for (kind, count) in data.consumables.iter() {
                    w.write_i32(kind.tag());
                    w.write_u32(count);
                }

                write_strings(w, &data.characters);
                w.write_len(data.equipped_character);
                write_strings(w, &data.accessories);
                write_strings(w, &data.themes);
                w.write_len(data.equipped_theme);
            }
            FieldGroup::Premium => w.write_u32(data.premium),
            FieldGroup::Highscores => {
                w.write_len(data.highscores.len());
                for entry in data.highscores.iter() {
                    w.write_str(&entry.name);
                    w.write_i32(entry.score);
                }
            }
            FieldGroup::Missions => data.missions.encode(w),
            FieldGroup::DisplayName => w.write_str(&data.settings.display_name),
            FieldGroup::Consent => w.write_bool(data.settings.consent_accepted),
            FieldGroup::Audio => {
                let audio = &data.settings.audio;
                w.write_f32(audio.master);
                w.write_f32(audio.music);
                w.write_f32(audio.sfx);
            }
            FieldGroup::Ftue => {
                w.write_u32(data.ftue_level);
                w.write_u32(data.rank);
            }
            FieldGroup::Tutorial => w.write_bool(data.settings.tutorial_done),
        }
    }

    /// Read this group into `data`, returning the number of repairs made
    fn read(self, data: &mut PlayerData, r: &mut RecordReader<'_>) -> Result<usize> {
        let mut repairs = 0;
        match self {
            FieldGroup::Base => {
                data.coins = read_unsigned(r, "coins", &mut repairs)?;
                data.consumables = read_consumables(r, &mut repairs)?;
                data.characters = read_strings(r, "character")?;
                data.equipped_character = read_unsigned(r, "equipped character", &mut repairs)?
                    as usize;
                data.accessories = read_strings(r, "accessory")?;
                data.themes = read_strings(r, "theme")?;
                data.equipped_theme =
                    read_unsigned(r, "equipped theme", &mut repairs)? as usize;
            }
            FieldGroup::Premium => {
                data.premium = read_unsigned(r, "premium", &mut repairs)?;
            }
            FieldGroup::Highscores => {
                let count = r.read_len("highscore count")?;
                let mut entries = Vec::new();
                for _ in 0..count {
                    let name = r.read_string("highscore name")?;
                    let score = r.read_i32("highscore score")?;
                    entries.push(HighscoreEntry { name, score });
                }
                let (ledger, reordered) = HighscoreLedger::from_entries(entries);
                if reordered {
                    log::warn!("Leaderboard was unsorted or oversized, rebuilt");
                    repairs += 1;
                }
                data.highscores = ledger;
            }
            FieldGroup::Missions => data.missions = MissionRegistry::decode(r)?,
            FieldGroup::DisplayName => data.settings.display_name = r.read_string("display name")?,
            FieldGroup::Consent => data.settings.consent_accepted = r.read_bool("consent")?,
            FieldGroup::Audio => {
                data.settings.audio = AudioLevels {
                    master: r.read_f32("master volume")?,
                    music: r.read_f32("music volume")?,
                    sfx: r.read_f32("sfx volume")?,
                };
            }
            FieldGroup::Ftue => {
                data.ftue_level = read_unsigned(r, "ftue level", &mut repairs)?;
                data.rank = read_unsigned(r, "rank", &mut repairs)?;
            }
            FieldGroup::Tutorial => data.settings.tutorial_done = r.read_bool("tutorial")?,
        }
        Ok(repairs)
    }
}

fn write_strings(w: &mut RecordWriter, items: &[String]) {
    w.write_len(items.len());
    for item in items {
        w.write_str(item);
    }
}

fn read_strings(r: &mut RecordReader<'_>, what: &str) -> Result<Vec<String>> {
    let count = r.read_len(&format!("{what} count"))?;
    let mut items = Vec::new();
    for _ in 0..count {
        items.push(r.read_string(what)?);
    }
    Ok(items)
}

/// Non-negative int32; negative values are clamped to 0
fn read_unsigned(r: &mut RecordReader<'_>, what: &str, repairs: &mut usize) -> Result<u32> {
    let raw = r.read_i32(what)?;
    Ok(u32::try_from(raw).unwrap_or_else(|_| {
        log::warn!("Negative {what} ({raw}) in save, clamping to 0");
        *repairs += 1;
        0
    }))
}

fn read_consumables(r: &mut RecordReader<'_>, repairs: &mut usize) -> Result<ConsumableInventory> {
    let count = r.read_len("consumable count")?;
    let mut inventory = ConsumableInventory::new();
    let mut seen = Vec::new();
    for _ in 0..count {
        let tag = r.read_i32("consumable kind")?;
        let amount = r.read_i32("consumable amount")?;
        let Some(kind) = ConsumableKind::from_tag(tag) else {
            log::warn!("Dropping unknown consumable kind {tag} (count {amount})");
            *repairs += 1;
            continue;
        };
        if seen.contains(&kind) {
            return Err(StoreError::malformed(format!(
                "consumable {} listed twice",
                kind.as_str()
            )));
        }
        seen.push(kind);

        match u32::try_from(amount) {
            Ok(n) if n > 0 => inventory.set_count(kind, n),
            _ => {
                log::warn!("Dropping {} with count {amount}", kind.as_str());
                *repairs += 1;
            }
        }
    }
    Ok(inventory)
}
