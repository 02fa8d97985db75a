//! Mission records
//!
//! Each mission is a kind tag plus progress payload. Behavior is dispatched
//! on the kind; the run-local sampling cursor is never persisted.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::persistence::wire::{RecordReader, RecordWriter};

/// What a mission can observe about the run in progress.
///
/// Implemented by the gameplay loop. All values are cumulative for the
/// current run.
pub trait RunContext {
    /// Meters travelled this run
    fn distance(&self) -> f32;
    /// Coins picked up this run
    fn coins(&self) -> u32;
    /// Obstacles cleared by jumping this run
    fn obstacles_jumped(&self) -> u32;
    /// Current score multiplier
    fn multiplier(&self) -> u32;
    /// Whether the character is sliding right now
    fn is_sliding(&self) -> bool;
}

/// Plain-value run context
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSnapshot {
    pub distance: f32,
    pub coins: u32,
    pub obstacles_jumped: u32,
    pub multiplier: u32,
    pub sliding: bool,
}

impl RunContext for RunSnapshot {
    fn distance(&self) -> f32 {
        self.distance
    }

    fn coins(&self) -> u32 {
        self.coins
    }

    fn obstacles_jumped(&self) -> u32 {
        self.obstacles_jumped
    }

    fn multiplier(&self) -> u32 {
        self.multiplier
    }

    fn is_sliding(&self) -> bool {
        self.sliding
    }
}

/// Known mission kinds, tagged as stored in the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissionKind {
    /// Cover a distance in one run
    SingleRun,
    /// Collect coins across runs
    Pickup,
    /// Jump obstacles across runs
    ObstacleJump,
    /// Slide a distance across runs
    Sliding,
    /// Reach a score multiplier in one run
    Multiplier,
}

/// Number of difficulty tiers per kind
pub const MISSION_TIERS: usize = 4;

impl MissionKind {
    pub const ALL: [MissionKind; 5] = [
        MissionKind::SingleRun,
        MissionKind::Pickup,
        MissionKind::ObstacleJump,
        MissionKind::Sliding,
        MissionKind::Multiplier,
    ];

    pub fn tag(self) -> i32 {
        match self {
            MissionKind::SingleRun => 0,
            MissionKind::Pickup => 1,
            MissionKind::ObstacleJump => 2,
            MissionKind::Sliding => 3,
            MissionKind::Multiplier => 4,
        }
    }

    pub fn from_tag(tag: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }

    /// Uniform pick over all kinds
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Target per difficulty tier
    pub fn targets(self) -> [f32; MISSION_TIERS] {
        match self {
            MissionKind::SingleRun => [500.0, 1000.0, 1500.0, 2000.0],
            MissionKind::Pickup => [1000.0, 2000.0, 3000.0, 4000.0],
            MissionKind::ObstacleJump => [20.0, 50.0, 75.0, 100.0],
            MissionKind::Sliding => [20.0, 30.0, 75.0, 150.0],
            MissionKind::Multiplier => [3.0, 5.0, 8.0, 10.0],
        }
    }
}

/// An active mission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    kind: MissionKind,
    progress: f32,
    target: f32,
    reward: i32,
    /// Last sampled run value (coins, jumps or distance, depending on kind)
    #[serde(skip)]
    cursor: f32,
}

impl PartialEq for Mission {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.progress == other.progress
            && self.target == other.target
            && self.reward == other.reward
    }
}

impl Mission {
    /// Fresh mission at a random difficulty tier
    pub fn created<R: Rng + ?Sized>(kind: MissionKind, rng: &mut R) -> Self {
        Self::with_tier(kind, rng.random_range(0..MISSION_TIERS))
    }

    /// Fresh mission at a fixed tier (clamped to the last tier)
    pub fn with_tier(kind: MissionKind, tier: usize) -> Self {
        let tier = tier.min(MISSION_TIERS - 1);
        Self {
            kind,
            progress: 0.0,
            target: kind.targets()[tier],
            reward: tier as i32 + 1,
            cursor: 0.0,
        }
    }

    pub fn kind(&self) -> MissionKind {
        self.kind
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Premium currency granted on claim
    pub fn reward(&self) -> u32 {
        u32::try_from(self.reward).unwrap_or(0)
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= self.target
    }

    /// Progress fraction in [0, 1]
    pub fn fraction(&self) -> f32 {
        if self.target <= 0.0 {
            1.0
        } else {
            (self.progress / self.target).clamp(0.0, 1.0)
        }
    }

    pub fn description(&self) -> String {
        let target = self.target as i64;
        match self.kind {
            MissionKind::SingleRun => format!("Run {target}m in a single run"),
            MissionKind::Pickup => format!("Pick up {target} fishbones"),
            MissionKind::ObstacleJump => format!("Jump over {target} barriers"),
            MissionKind::Sliding => format!("Slide for {target}m"),
            MissionKind::Multiplier => format!("Reach a x{target} multiplier"),
        }
    }

    /// Called once when a run begins
    pub fn on_run_start<C: RunContext + ?Sized>(&mut self, ctx: &C) {
        match self.kind {
            MissionKind::SingleRun | MissionKind::Multiplier => self.progress = 0.0,
            MissionKind::Pickup | MissionKind::ObstacleJump => self.cursor = 0.0,
            MissionKind::Sliding => self.cursor = ctx.distance(),
        }
    }

    /// Called every gameplay tick
    pub fn on_tick<C: RunContext + ?Sized>(&mut self, ctx: &C) {
        match self.kind {
            MissionKind::SingleRun => self.progress = ctx.distance(),
            MissionKind::Pickup => {
                let coins = ctx.coins() as f32;
                self.progress += coins - self.cursor;
                self.cursor = coins;
            }
            MissionKind::ObstacleJump => {
                let jumped = ctx.obstacles_jumped() as f32;
                self.progress += jumped - self.cursor;
                self.cursor = jumped;
            }
            MissionKind::Sliding => {
                let distance = ctx.distance();
                if ctx.is_sliding() {
                    self.progress += distance - self.cursor;
                }
                self.cursor = distance;
            }
            MissionKind::Multiplier => {
                self.progress = self.progress.max(ctx.multiplier() as f32);
            }
        }
    }

    /// Kind-specific payload (the kind tag is written by the registry)
    pub fn encode_payload(&self, w: &mut RecordWriter) {
        w.write_f32(self.progress);
        w.write_f32(self.target);
        w.write_i32(self.reward);
    }

    pub fn decode_payload(kind: MissionKind, r: &mut RecordReader<'_>) -> Result<Self> {
        Ok(Self {
            kind,
            progress: r.read_f32("mission progress")?,
            target: r.read_f32("mission target")?,
            reward: r.read_i32("mission reward")?,
            cursor: 0.0,
        })
    }

    /// Tag then payload
    pub fn encode(&self, w: &mut RecordWriter) {
        w.write_i32(self.kind.tag());
        self.encode_payload(w);
    }

    pub fn decode(r: &mut RecordReader<'_>) -> Result<Self> {
        let tag = r.read_i32("mission kind")?;
        let kind = MissionKind::from_tag(tag)
            .ok_or_else(|| StoreError::malformed(format!("unknown mission kind {tag}")))?;
        Self::decode_payload(kind, r)
    }
}
