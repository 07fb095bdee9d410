//! Append-only action history for replay and visualization.

use serde::{Deserialize, Serialize};

use crate::action::{Action, PhaseBoundaries};
use crate::actor::ActorId;
use crate::skill::{SkillId, SkillKind};

/// Skill kind recorded in history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Attack.
    Attack,
    /// Defense.
    Defense,
    /// Special.
    Special,
}

impl From<&SkillKind> for ActionKind {
    fn from(kind: &SkillKind) -> Self {
        match kind {
            SkillKind::Attack(_) => Self::Attack,
            SkillKind::Defense(_) => Self::Defense,
            SkillKind::Special(_) => Self::Special,
        }
    }
}

/// Whether a timeline entry has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// Ran through recovery.
    Completed,
    /// Still running; `end_tick` is the current tick.
    InProgress,
}

/// Immutable record of one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Owning actor.
    pub actor: ActorId,
    /// Skill used.
    pub skill: SkillId,
    /// Skill kind.
    pub kind: ActionKind,
    /// Absolute start tick.
    pub start_tick: u64,
    /// Absolute completion tick, or the current tick while in progress.
    pub end_tick: u64,
    /// Absolute phase boundaries.
    pub boundaries: PhaseBoundaries,
    /// Effective wind-up modifier.
    pub wind_up_modifier_ms: i64,
    /// Completion status.
    pub status: EntryStatus,
}

impl HistoryEntry {
    /// Records an action that just completed at `end_tick`.
    #[must_use]
    pub fn completed(actor: ActorId, action: &Action, end_tick: u64) -> Self {
        Self::record(actor, action, end_tick, EntryStatus::Completed)
    }

    /// Records an action still running at `current_tick`.
    #[must_use]
    pub fn in_progress(actor: ActorId, action: &Action, current_tick: u64) -> Self {
        Self::record(actor, action, current_tick, EntryStatus::InProgress)
    }

    fn record(actor: ActorId, action: &Action, end_tick: u64, status: EntryStatus) -> Self {
        let skill = action.skill();
        Self {
            actor,
            skill: skill.id.clone(),
            kind: ActionKind::from(&skill.kind),
            start_tick: action.start_tick(),
            end_tick,
            boundaries: action.boundaries(),
            wind_up_modifier_ms: action.wind_up_modifier_ms(),
            status,
        }
    }
}

/// Completed actions in completion order.
#[derive(Debug, Clone, Default)]
pub struct ActionHistory {
    entries: Vec<HistoryEntry>,
}

impl ActionHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// All entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Entries for one actor.
    pub fn for_actor(&self, actor: ActorId) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().filter(move |e| e.actor == actor)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Discards every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
