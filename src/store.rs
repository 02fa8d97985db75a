//! Progression store
//!
//! Owns the live `PlayerData` and its on-disk record. All mutation goes
//! through here. Inventory changes, mission claims and debug grants are
//! written immediately; everything else is staged until `persist()`.

use std::cell::Cell;
use std::path::PathBuf;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::inventory::ConsumableKind;
use crate::mission::RunContext;
use crate::persistence::{self, FORMAT_VERSION, FileStorage, RecordStorage};
use crate::player::{CURRENCY_CAP, PlayerData, accessory_id};
use crate::settings::AudioLevels;

/// How `load()` obtained the live state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No record existed; defaults were created and saved
    Fresh,
    /// Record decoded
    Loaded { version: i32 },
    /// Record was unreadable; it was moved aside and defaults saved
    Recovered { quarantined: Option<PathBuf> },
}

/// The player's progression store
pub struct ProgressStore<S: RecordStorage = FileStorage> {
    storage: S,
    data: PlayerData,
    /// Not part of the record; cleared on every load
    equipped_accessory: Option<usize>,
    /// Version of a newer record loaded but not yet overwritten
    downgrade_from: Cell<Option<i32>>,
    rng: Pcg32,
}

impl ProgressStore<FileStorage> {
    /// Open (or create) the record described by `config`
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let mut store = Self::with_storage(FileStorage::new(&config.save_path), config.rng_seed);
        store.load()?;
        Ok(store)
    }
}

impl<S: RecordStorage> ProgressStore<S> {
    /// Build an unloaded store holding default state
    pub fn with_storage(storage: S, rng_seed: Option<u64>) -> Self {
        let rng = match rng_seed {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::from_rng(&mut rand::rng()),
        };
        Self {
            storage,
            data: PlayerData::default(),
            equipped_accessory: None,
            downgrade_from: Cell::new(None),
            rng,
        }
    }

    pub fn data(&self) -> &PlayerData {
        &self.data
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Index into `data().accessories` of the equipped accessory
    pub fn equipped_accessory(&self) -> Option<usize> {
        self.equipped_accessory
    }

    /// Equipped accessory id, if any
    pub fn current_accessory(&self) -> Option<&str> {
        self.equipped_accessory
            .and_then(|i| self.data.accessories.get(i))
            .map(String::as_str)
    }

    /// Version of a newer record that the next `persist()` will rewrite
    /// at `FORMAT_VERSION`, dropping the fields this build does not know
    pub fn pending_downgrade(&self) -> Option<i32> {
        self.downgrade_from.get()
    }

    // === Lifecycle ===

    /// Reset to a first-run profile and save it
    pub fn initialize_defaults(&mut self) -> Result<()> {
        self.data = PlayerData::default();
        self.equipped_accessory = None;
        self.downgrade_from.set(None);
        self.data.missions.top_up(&mut self.rng);
        log::info!("Created new save");
        self.persist()
    }

    /// Load the record, creating or recovering it as needed.
    ///
    /// A malformed record is moved aside and replaced by defaults; I/O
    /// failures are returned untouched.
    pub fn load(&mut self) -> Result<LoadOutcome> {
        if !self.storage.exists() {
            self.initialize_defaults()?;
            return Ok(LoadOutcome::Fresh);
        }

        let bytes = self.storage.read()?;
        let outcome = match persistence::decode(&bytes) {
            Ok(decoded) => {
                if decoded.repairs > 0 {
                    log::warn!("Applied {} repairs to loaded save", decoded.repairs);
                }
                self.data = decoded.data;
                self.equipped_accessory = None;
                self.downgrade_from
                    .set((decoded.version > FORMAT_VERSION).then_some(decoded.version));
                LoadOutcome::Loaded {
                    version: decoded.version,
                }
            }
            Err(e) if e.is_malformed() => {
                log::warn!("Save unreadable ({e}), starting fresh");
                let quarantined = match self.storage.quarantine() {
                    Ok(path) => path,
                    Err(qe) => {
                        log::warn!("Could not move bad save aside: {qe}");
                        None
                    }
                };
                self.initialize_defaults()?;
                return Ok(LoadOutcome::Recovered { quarantined });
            }
            Err(e) => return Err(e),
        };

        // Not re-saved: the shortfall is refilled on every load anyway
        self.data.missions.top_up(&mut self.rng);
        log::info!(
            "Loaded save: {} coins, {} premium, {} missions",
            self.data.coins,
            self.data.premium,
            self.data.missions.len()
        );
        Ok(outcome)
    }

    /// Write the live state as the new record
    pub fn persist(&self) -> Result<()> {
        let bytes = persistence::encode(&self.data);
        self.storage.write(&bytes)?;
        if let Some(version) = self.downgrade_from.take() {
            log::warn!(
                "Rewrote version {version} save as version {FORMAT_VERSION}; fields added after {FORMAT_VERSION} were dropped"
            );
        }
        Ok(())
    }

    /// Delete the record and start over
    pub fn reset(&mut self) -> Result<()> {
        self.storage.remove()?;
        self.initialize_defaults()
    }

    // === Consumables ===

    pub fn add_consumable(&mut self, kind: ConsumableKind) -> Result<()> {
        self.data.consumables.add(kind);
        self.persist()
    }

    /// Use one consumable. Returns false (nothing saved) if none are owned.
    pub fn consume_consumable(&mut self, kind: ConsumableKind) -> Result<bool> {
        if !self.data.consumables.consume(kind) {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    // === Missions ===

    pub fn start_run<C: RunContext + ?Sized>(&mut self, ctx: &C) {
        self.data.missions.on_run_start(ctx);
    }

    pub fn tick_run<C: RunContext + ?Sized>(&mut self, ctx: &C) {
        self.data.missions.on_tick(ctx);
    }

    pub fn any_mission_complete(&self) -> bool {
        self.data.missions.any_complete()
    }

    /// Grant a mission's reward, replace it and save. Returns the reward.
    pub fn claim_mission(&mut self, index: usize) -> Result<u32> {
        let mission = self
            .data
            .missions
            .remove(index)
            .ok_or(StoreError::MissionNotHeld(index))?;
        let reward = mission.reward();
        self.credit_premium(reward);
        self.data.missions.top_up(&mut self.rng);
        log::info!("Claimed mission \"{}\" for {reward}", mission.description());
        self.persist()?;
        Ok(reward)
    }

    // === Leaderboard ===

    /// Record a finished run. Returns the 0-based rank, or None if it missed the board.
    pub fn insert_score(&mut self, score: i32, name: impl Into<String>) -> Option<usize> {
        self.data.highscores.insert(score, name)
    }

    // === Unlocks ===

    /// Returns false if already owned
    pub fn add_character(&mut self, name: impl Into<String>) -> bool {
        push_unique(&mut self.data.characters, name.into())
    }

    pub fn add_theme(&mut self, name: impl Into<String>) -> bool {
        push_unique(&mut self.data.themes, name.into())
    }

    pub fn add_accessory(&mut self, character: &str, accessory: &str) -> bool {
        push_unique(&mut self.data.accessories, accessory_id(character, accessory))
    }

    pub fn equip_character(&mut self, index: usize) -> Result<()> {
        check_index("character", index, self.data.characters.len())?;
        self.data.equipped_character = index;
        Ok(())
    }

    pub fn equip_theme(&mut self, index: usize) -> Result<()> {
        check_index("theme", index, self.data.themes.len())?;
        self.data.equipped_theme = index;
        Ok(())
    }

    pub fn equip_accessory(&mut self, index: Option<usize>) -> Result<()> {
        if let Some(i) = index {
            check_index("accessory", i, self.data.accessories.len())?;
        }
        self.equipped_accessory = index;
        Ok(())
    }

    // === Currency ===

    pub fn credit_coins(&mut self, amount: u32) {
        self.data.coins = self.data.coins.saturating_add(amount).min(CURRENCY_CAP);
    }

    pub fn credit_premium(&mut self, amount: u32) {
        self.data.premium = self.data.premium.saturating_add(amount).min(CURRENCY_CAP);
    }

    pub fn spend_coins(&mut self, amount: u32) -> Result<()> {
        self.data.coins = debit("coins", self.data.coins, amount)?;
        Ok(())
    }

    pub fn spend_premium(&mut self, amount: u32) -> Result<()> {
        self.data.premium = debit("premium", self.data.premium, amount)?;
        Ok(())
    }

    // === Preferences ===

    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.data.settings.display_name = name.into();
    }

    pub fn accept_consent(&mut self) {
        self.data.settings.consent_accepted = true;
    }

    pub fn set_tutorial_done(&mut self, done: bool) {
        self.data.settings.tutorial_done = done;
    }

    pub fn set_audio(&mut self, audio: AudioLevels) {
        self.data.settings.audio = audio;
    }

    pub fn set_ftue_level(&mut self, level: u32) {
        self.data.ftue_level = level;
    }

    pub fn set_rank(&mut self, rank: u32) {
        self.data.rank = rank;
    }

    // === Debug grants ===

    /// Add currency and save
    pub fn grant_debug_currency(&mut self, coins: u32, premium: u32) -> Result<()> {
        self.credit_coins(coins);
        self.credit_premium(premium);
        log::info!("Debug grant: {coins} coins, {premium} premium");
        self.persist()
    }

    /// Set every consumable kind to `count` and save
    pub fn fill_consumables(&mut self, count: u32) -> Result<()> {
        for kind in ConsumableKind::ALL {
            self.data.consumables.set_count(kind, count);
        }
        self.persist()
    }
}

fn push_unique(list: &mut Vec<String>, item: String) -> bool {
    if list.contains(&item) {
        return false;
    }
    list.push(item);
    true
}

fn check_index(what: &'static str, index: usize, owned: usize) -> Result<()> {
    if index < owned {
        Ok(())
    } else {
        Err(StoreError::InvalidSelection { what, index, owned })
    }
}

fn debit(currency: &'static str, available: u32, needed: u32) -> Result<u32> {
    available
        .checked_sub(needed)
        .ok_or(StoreError::InsufficientFunds {
            currency,
            needed,
            available,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mission::{MISSION_FLOOR, Mission, MissionKind, RunSnapshot};
    use crate::persistence::codec;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::io;

    /// In-memory record, optionally failing reads
    #[derive(Default)]
    struct MemoryStorage {
        record: RefCell<Option<Vec<u8>>>,
        quarantined: RefCell<Option<Vec<u8>>>,
        fail_reads: bool,
    }

    impl MemoryStorage {
        fn with_record(bytes: Vec<u8>) -> Self {
            Self {
                record: RefCell::new(Some(bytes)),
                ..Default::default()
            }
        }

        fn bytes(&self) -> Option<Vec<u8>> {
            self.record.borrow().clone()
        }
    }

    impl RecordStorage for MemoryStorage {
        fn exists(&self) -> bool {
            self.record.borrow().is_some()
        }

        fn read(&self) -> io::Result<Vec<u8>> {
            if self.fail_reads {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked"));
            }
            self.record
                .borrow()
                .clone()
                .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
        }

        fn write(&self, bytes: &[u8]) -> io::Result<()> {
            *self.record.borrow_mut() = Some(bytes.to_vec());
            Ok(())
        }

        fn quarantine(&self) -> io::Result<Option<PathBuf>> {
            *self.quarantined.borrow_mut() = self.record.borrow_mut().take();
            Ok(Some(PathBuf::from("memory.corrupt")))
        }

        fn remove(&self) -> io::Result<()> {
            self.record.borrow_mut().take();
            Ok(())
        }
    }

    fn fresh() -> ProgressStore<MemoryStorage> {
        let mut store = ProgressStore::with_storage(MemoryStorage::default(), Some(42));
        assert_eq!(store.load().unwrap(), LoadOutcome::Fresh);
        store
    }

    fn reopen(store: &ProgressStore<MemoryStorage>) -> ProgressStore<MemoryStorage> {
        let bytes = store.storage().bytes().expect("record saved");
        let mut again = ProgressStore::with_storage(MemoryStorage::with_record(bytes), Some(7));
        again.load().unwrap();
        again
    }

    #[test]
    fn test_fresh_store_is_saved_with_defaults() {
        let store = fresh();
        let data = store.data();
        assert_eq!(data.characters, vec!["Mr. Drac"]);
        assert_eq!(data.themes, vec!["Day"]);
        assert_eq!(data.missions.len(), MISSION_FLOOR);
        assert!(store.storage().exists());

        let saved = codec::decode(&store.storage().bytes().unwrap()).unwrap();
        assert_eq!(&saved.data, data);
    }

    #[test]
    fn test_initialize_defaults_is_idempotent() {
        let mut store = fresh();
        store.initialize_defaults().unwrap();
        let first = store.data().clone();
        store.initialize_defaults().unwrap();
        let second = store.data().clone();

        assert_eq!(first.missions.len(), second.missions.len());
        let mut a = first;
        let mut b = second;
        a.missions.clear();
        b.missions.clear();
        assert_eq!(a, b);
    }

    #[test]
    fn test_load_tops_up_missions_without_saving() {
        let mut data = PlayerData::default();
        data.missions.push(Mission::with_tier(MissionKind::Sliding, 0));
        let bytes = codec::encode(&data);

        let mut store = ProgressStore::with_storage(MemoryStorage::with_record(bytes.clone()), Some(1));
        assert_eq!(
            store.load().unwrap(),
            LoadOutcome::Loaded {
                version: codec::FORMAT_VERSION
            }
        );
        assert_eq!(store.data().missions.len(), MISSION_FLOOR);
        assert_eq!(store.storage().bytes(), Some(bytes));
    }

    #[test]
    fn test_load_old_record_without_missions() {
        let bytes = codec::encode_version(&PlayerData::default(), 3);
        let mut store = ProgressStore::with_storage(MemoryStorage::with_record(bytes), Some(1));
        assert_eq!(store.load().unwrap(), LoadOutcome::Loaded { version: 3 });
        assert_eq!(store.data().missions.len(), MISSION_FLOOR);
    }

    #[test]
    fn test_load_coerces_equipped_character() {
        let data = PlayerData {
            characters: vec!["A".into(), "B".into()],
            equipped_character: 99,
            ..Default::default()
        };
        let mut store =
            ProgressStore::with_storage(MemoryStorage::with_record(codec::encode(&data)), Some(1));
        store.load().unwrap();
        assert_eq!(store.data().equipped_character, 0);
        assert_eq!(store.data().current_character(), "A");
    }

    #[test]
    fn test_malformed_record_recovers_to_defaults() {
        let mut bytes = codec::encode(&PlayerData::default());
        bytes.truncate(9);
        let mut store = ProgressStore::with_storage(MemoryStorage::with_record(bytes.clone()), Some(3));

        let outcome = store.load().unwrap();
        assert!(matches!(outcome, LoadOutcome::Recovered { quarantined: Some(_) }));
        assert_eq!(store.data().characters, vec!["Mr. Drac"]);
        assert_eq!(store.storage().quarantined.borrow().clone(), Some(bytes));
        assert!(codec::decode(&store.storage().bytes().unwrap()).is_ok());
    }

    #[test]
    fn test_io_failure_is_surfaced() {
        let storage = MemoryStorage {
            fail_reads: true,
            ..MemoryStorage::with_record(vec![1, 2, 3])
        };
        let mut store = ProgressStore::with_storage(storage, Some(3));
        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
        // Record untouched
        assert_eq!(store.storage().bytes(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_consumables_persist_immediately() {
        let mut store = fresh();
        store.add_consumable(ConsumableKind::ExtraLife).unwrap();
        store.add_consumable(ConsumableKind::ExtraLife).unwrap();
        assert!(store.consume_consumable(ConsumableKind::ExtraLife).unwrap());
        assert_eq!(reopen(&store).data().consumables.count(ConsumableKind::ExtraLife), 1);

        assert!(store.consume_consumable(ConsumableKind::ExtraLife).unwrap());
        assert!(!store.consume_consumable(ConsumableKind::ExtraLife).unwrap());
        assert!(reopen(&store).data().consumables.is_empty());
    }

    #[test]
    fn test_claim_mission_grants_and_refills() {
        let mut store = fresh();
        let reward = store.data().missions.get(0).map(Mission::reward).unwrap();
        let survivor = store.data().missions.get(1).cloned();

        assert_eq!(store.claim_mission(0).unwrap(), reward);
        assert_eq!(store.data().premium, reward);
        assert_eq!(store.data().missions.len(), MISSION_FLOOR);
        assert_eq!(store.data().missions.get(0).cloned(), survivor);

        let again = reopen(&store);
        assert_eq!(again.data().premium, reward);
        assert_eq!(again.data().missions, store.data().missions);
    }

    #[test]
    fn test_claim_unheld_mission_is_local_error() {
        let mut store = fresh();
        let before = store.data().clone();
        let err = store.claim_mission(MISSION_FLOOR).unwrap_err();
        assert!(matches!(err, StoreError::MissionNotHeld(2)));
        assert_eq!(store.data(), &before);
    }

    #[test]
    fn test_run_events_reach_missions() {
        let mut store = fresh();
        store.start_run(&RunSnapshot::default());
        let far = RunSnapshot {
            distance: 5000.0,
            coins: 5000,
            obstacles_jumped: 500,
            multiplier: 20,
            sliding: true,
        };
        store.tick_run(&far);
        assert!(store.any_mission_complete());
    }

    #[test]
    fn test_equip_validation() {
        let mut store = fresh();
        assert!(store.add_character("Trash Cat"));
        assert!(!store.add_character("Trash Cat"));
        store.equip_character(1).unwrap();
        assert_eq!(store.data().current_character(), "Trash Cat");

        let err = store.equip_theme(4).unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidSelection {
                what: "theme",
                index: 4,
                owned: 1
            }
        ));

        assert!(store.equip_accessory(Some(0)).is_err());
        assert!(store.add_accessory("Trash Cat", "Party Hat"));
        store.equip_accessory(Some(0)).unwrap();
        assert_eq!(store.current_accessory(), Some("Trash Cat:Party Hat"));
        store.equip_accessory(None).unwrap();
        assert_eq!(store.current_accessory(), None);

        store.equip_accessory(Some(0)).unwrap();
        store.persist().unwrap();
        let again = reopen(&store);
        assert_eq!(again.equipped_accessory(), None);
        assert_eq!(again.data().accessories, vec!["Trash Cat:Party Hat"]);
    }

    #[test]
    fn test_newer_record_downgrade_is_reported() {
        let mut bytes = codec::encode(&PlayerData {
            coins: 99,
            ..Default::default()
        });
        bytes[..4].copy_from_slice(&13i32.to_le_bytes());
        bytes.extend_from_slice(&[7, 7, 7, 7]);

        let mut store = ProgressStore::with_storage(MemoryStorage::with_record(bytes), Some(2));
        assert_eq!(store.load().unwrap(), LoadOutcome::Loaded { version: 13 });
        assert_eq!(store.pending_downgrade(), Some(13));
        assert_eq!(store.data().coins, 99);

        store.persist().unwrap();
        assert_eq!(store.pending_downgrade(), None);
        let rewritten = codec::decode(&store.storage().bytes().unwrap()).unwrap();
        assert_eq!(rewritten.version, codec::FORMAT_VERSION);
        assert_eq!(rewritten.data.coins, 99);
    }

    #[test]
    fn test_current_record_has_no_pending_downgrade() {
        let mut store = fresh();
        assert_eq!(store.pending_downgrade(), None);
        store.load().unwrap();
        assert_eq!(store.pending_downgrade(), None);
    }

    #[test]
    fn test_unknown_consumable_keeps_profile() {
        let data = PlayerData {
            coins: 50_000,
            premium: 300,
            characters: vec!["Mr. Drac".into(), "Trash Cat".into()],
            ..Default::default()
        };
        let mut bytes = codec::encode(&data);
        // Consumable count sits after version and coins; add one entry with tag 5
        assert_eq!(&bytes[8..12], &0i32.to_le_bytes());
        bytes[8..12].copy_from_slice(&1i32.to_le_bytes());
        let entry: Vec<u8> = [5i32, 3].iter().flat_map(|v| v.to_le_bytes()).collect();
        bytes.splice(12..12, entry);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.bin");
        std::fs::write(&path, &bytes).unwrap();

        let store = ProgressStore::open(&StoreConfig::new(&path)).unwrap();
        assert_eq!(store.data().coins, 50_000);
        assert_eq!(store.data().premium, 300);
        assert_eq!(store.data().characters, vec!["Mr. Drac", "Trash Cat"]);
        assert!(store.data().consumables.is_empty());
        assert!(!store.storage().corrupt_path().exists());
    }

    #[test]
    fn test_spending_never_goes_negative() {
        let mut store = fresh();
        store.credit_coins(100);
        store.spend_coins(60).unwrap();
        let err = store.spend_coins(50).unwrap_err();
        assert!(matches!(
            err,
            StoreError::InsufficientFunds {
                needed: 50,
                available: 40,
                ..
            }
        ));
        assert_eq!(store.data().coins, 40);
        assert!(store.spend_premium(1).is_err());

        store.credit_premium(u32::MAX);
        assert_eq!(store.data().premium, CURRENCY_CAP);
    }

    #[test]
    fn test_staged_changes_need_persist() {
        let mut store = fresh();
        store.set_display_name("Ada");
        store.insert_score(777, "Ada");
        assert_eq!(reopen(&store).data().settings.display_name, "Mr. Drac");

        store.persist().unwrap();
        let again = reopen(&store);
        assert_eq!(again.data().settings.display_name, "Ada");
        assert_eq!(again.data().highscores.top_score(), Some(777));
    }

    #[test]
    fn test_debug_grants_and_reset() {
        let mut store = fresh();
        store.grant_debug_currency(1_000_000, 1000).unwrap();
        store.fill_consumables(10).unwrap();
        let again = reopen(&store);
        assert_eq!(again.data().coins, 1_000_000);
        assert_eq!(again.data().premium, 1000);
        for kind in ConsumableKind::ALL {
            assert_eq!(again.data().consumables.count(kind), 10);
        }

        store.reset().unwrap();
        assert_eq!(store.data().coins, 0);
        assert!(reopen(&store).data().consumables.is_empty());
    }

    #[test]
    fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::new(dir.path().join("save.bin")).with_seed(5);

        let mut store = ProgressStore::open(&config).unwrap();
        store.credit_coins(321);
        store.set_tutorial_done(true);
        store.set_audio(AudioLevels::new(1.0, 0.25, 0.5));
        store.persist().unwrap();
        let expected = store.data().clone();
        drop(store);

        let store = ProgressStore::open(&config).unwrap();
        assert_eq!(store.data(), &expected);
    }

    #[test]
    fn test_open_recovers_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.bin");
        std::fs::write(&path, [12, 0, 0, 0, 1]).unwrap();

        let store = ProgressStore::open(&StoreConfig::new(&path)).unwrap();
        assert_eq!(store.data().coins, 0);
        assert!(store.storage().corrupt_path().is_file());
        assert!(codec::decode(&std::fs::read(&path).unwrap()).is_ok());

        // A second bad save is kept alongside the first
        std::fs::write(&path, [0, 0, 0, 0]).unwrap();
        let store = ProgressStore::open(&StoreConfig::new(&path)).unwrap();
        assert_eq!(std::fs::read(store.storage().corrupt_path()).unwrap(), [12, 0, 0, 0, 1]);
        let second = dir.path().join("save.bin.corrupt.1");
        assert_eq!(std::fs::read(second).unwrap(), [0, 0, 0, 0]);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(usize),
        Consume(usize),
        Score(i32),
        Credit(u32),
        Claim(usize),
        Unlock(u8),
        Tick(f32, u32),
        Wear(Option<usize>),
        EquipCharacter(u8),
        Audio(f32, f32, f32),
        Rename(String),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..4usize).prop_map(Op::Add),
            (0..4usize).prop_map(Op::Consume),
            (-100i32..5000).prop_map(Op::Score),
            (0..10_000u32).prop_map(Op::Credit),
            (0..3usize).prop_map(Op::Claim),
            any::<u8>().prop_map(Op::Unlock),
            (0.0f32..3000.0, 0..3000u32).prop_map(|(d, c)| Op::Tick(d, c)),
            proptest::option::of(0..3usize).prop_map(Op::Wear),
            any::<u8>().prop_map(Op::EquipCharacter),
            (0.0f32..=1.0, 0.0f32..=1.0, 0.0f32..=1.0).prop_map(|(m, u, s)| Op::Audio(m, u, s)),
            "[A-Za-z ]{0,12}".prop_map(Op::Rename),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_persisted_state_round_trips(ops in prop::collection::vec(op_strategy(), 0..40)) {
            let mut store = fresh();
            for op in ops {
                match op {
                    Op::Add(k) => store.add_consumable(ConsumableKind::ALL[k]).unwrap(),
                    Op::Consume(k) => {
                        store.consume_consumable(ConsumableKind::ALL[k]).unwrap();
                    }
                    Op::Score(s) => {
                        store.insert_score(s, format!("p{s}"));
                    }
                    Op::Credit(c) => store.credit_coins(c),
                    Op::Claim(i) => {
                        let _ = store.claim_mission(i);
                    }
                    Op::Unlock(n) => {
                        store.add_theme(format!("theme{n}"));
                        let last = store.data().themes.len() - 1;
                        store.equip_theme(last).unwrap();
                    }
                    Op::Tick(distance, coins) => store.tick_run(&RunSnapshot {
                        distance,
                        coins,
                        ..Default::default()
                    }),
                    Op::Wear(slot) => {
                        if slot.is_some() {
                            let hat = format!("hat{}", store.data().accessories.len());
                            store.add_accessory("Mr. Drac", &hat);
                        }
                        let _ = store.equip_accessory(slot);
                    }
                    Op::EquipCharacter(n) => {
                        store.add_character(format!("char{n}"));
                        let index = usize::from(n) % store.data().characters.len();
                        store.equip_character(index).unwrap();
                    }
                    Op::Audio(master, music, sfx) => store.set_audio(AudioLevels::new(master, music, sfx)),
                    Op::Rename(name) => store.set_display_name(name),
                }
                prop_assert!(store.data().missions.len() >= MISSION_FLOOR);
                prop_assert!(store.data().consumables.iter().all(|(_, c)| c > 0));
            }

            let bytes = codec::encode(store.data());
            let decoded = codec::decode(&bytes).unwrap();
            prop_assert_eq!(decoded.repairs, 0);
            prop_assert_eq!(&decoded.data, store.data());
        }
    }
}
