//! Rolling mission set
//!
//! The registry stores missions and forwards run events to them; all
//! progress rules live in the records themselves. The set is kept at
//! `MISSION_FLOOR` entries: call `top_up` after every removal and after load.

pub mod record;

pub use record::{MISSION_TIERS, Mission, MissionKind, RunContext, RunSnapshot};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::persistence::wire::{RecordReader, RecordWriter};

/// Minimum number of concurrently active missions
pub const MISSION_FLOOR: usize = 2;

/// Active missions in creation order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionRegistry {
    missions: Vec<Mission>,
}

impl MissionRegistry {
    pub fn new() -> Self {
        Self {
            missions: Vec::new(),
        }
    }

    /// Create random missions until the floor is reached.
    /// Returns how many were added.
    pub fn top_up<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let mut added = 0;
        while self.missions.len() < MISSION_FLOOR {
            let kind = MissionKind::random(rng);
            let mission = Mission::created(kind, rng);
            log::debug!("New mission: {}", mission.description());
            self.missions.push(mission);
            added += 1;
        }
        added
    }

    pub fn push(&mut self, mission: Mission) {
        self.missions.push(mission);
    }

    pub fn on_run_start<C: RunContext + ?Sized>(&mut self, ctx: &C) {
        for mission in &mut self.missions {
            mission.on_run_start(ctx);
        }
    }

    pub fn on_tick<C: RunContext + ?Sized>(&mut self, ctx: &C) {
        for mission in &mut self.missions {
            mission.on_tick(ctx);
        }
    }

    pub fn any_complete(&self) -> bool {
        self.missions.iter().any(Mission::is_complete)
    }

    /// Take the mission at `index` out of the set, if held
    pub fn remove(&mut self, index: usize) -> Option<Mission> {
        (index < self.missions.len()).then(|| self.missions.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&Mission> {
        self.missions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mission> {
        self.missions.iter()
    }

    pub fn len(&self) -> usize {
        self.missions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }

    pub fn clear(&mut self) {
        self.missions.clear();
    }

    /// Count, then each mission's tag and payload
    pub fn encode(&self, w: &mut RecordWriter) {
        w.write_len(self.missions.len());
        for mission in &self.missions {
            mission.encode(w);
        }
    }

    pub fn decode(r: &mut RecordReader<'_>) -> Result<Self> {
        let count = r.read_len("mission count")?;
        let mut missions = Vec::new();
        for _ in 0..count {
            missions.push(Mission::decode(r)?);
        }
        Ok(Self { missions })
    }
}
