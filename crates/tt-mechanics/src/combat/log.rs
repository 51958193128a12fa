use serde::{Deserialize, Serialize};

/// What kind of thing happened in a combat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatLogKind {
    /// Initiative was rolled and the fight began.
    Started,
    /// A new round began.
    RoundStarted,
    /// A combatant's turn began.
    TurnStarted,
    /// Hit points were lost.
    Damage,
    /// Hit points were regained.
    Healing,
    /// A combatant dropped to 0 hit points.
    Defeated,
    /// A defeated combatant was healed back into the fight.
    Revived,
    /// A condition was applied or replaced.
    ConditionApplied,
    /// A condition was removed or expired.
    ConditionRemoved,
    /// The fight is over.
    Ended,
}

/// One line of combat history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatLogEntry {
    /// Round in which it happened.
    pub round: u32,
    /// What happened.
    pub kind: CombatLogKind,
    /// Human-readable text.
    pub description: String,
}

/// Combat history, keeping at most `max_entries` lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatLog {
    entries: Vec<CombatLogEntry>,
    max_entries: usize,
}

impl CombatLog {
    /// Create a log holding at most `max_entries` lines (0 = unlimited).
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries,
        }
    }

    /// Append a line, dropping the oldest lines past capacity.
    pub fn push(&mut self, round: u32, kind: CombatLogKind, description: impl Into<String>) {
        self.entries.push(CombatLogEntry {
            round,
            kind,
            description: description.into(),
        });
        if self.max_entries > 0 && self.entries.len() > self.max_entries {
            let excess = self.entries.len() - self.max_entries;
            self.entries.drain(..excess);
        }
    }

    /// All retained lines, oldest first.
    pub fn entries(&self) -> &[CombatLogEntry] {
        &self.entries
    }

    /// Lines of one kind.
    pub fn of_kind(&self, kind: CombatLogKind) -> impl Iterator<Item = &CombatLogEntry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    /// Number of retained lines.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
