use serde::{Deserialize, Serialize};

use super::result::DeathSaveResult;

/// Where a dying creature stands after its death saves so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathSaveState {
    /// Still rolling.
    Dying,
    /// Three successes or a natural 20.
    Stable,
    /// Three failures.
    Dead,
}

/// Running count of death saving throws for one creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeathSaveTally {
    /// Successes so far (0..=3).
    pub successes: u8,
    /// Failures so far (0..=3).
    pub failures: u8,
    /// Set once a natural 20 was rolled.
    #[serde(default)]
    pub stabilized: bool,
}

impl DeathSaveTally {
    /// Record one save and return the resulting state.
    ///
    /// A natural 1 adds two failures. Saves recorded after the outcome is
    /// settled are ignored.
    pub fn record(&mut self, save: &DeathSaveResult) -> DeathSaveState {
        if self.state() != DeathSaveState::Dying {
            return self.state();
        }
        if save.stabilized {
            self.stabilized = true;
        } else if save.success {
            self.successes = (self.successes + 1).min(3);
        } else {
            let added = if save.counts_double { 2 } else { 1 };
            self.failures = (self.failures + added).min(3);
        }
        self.state()
    }

    /// Current state.
    pub fn state(&self) -> DeathSaveState {
        if self.failures >= 3 {
            DeathSaveState::Dead
        } else if self.stabilized || self.successes >= 3 {
            DeathSaveState::Stable
        } else {
            DeathSaveState::Dying
        }
    }

    /// Whether the creature has stabilized.
    pub fn is_stable(&self) -> bool {
        self.state() == DeathSaveState::Stable
    }

    /// Whether the creature has died.
    pub fn is_dead(&self) -> bool {
        self.state() == DeathSaveState::Dead
    }

    /// Clear the tally, e.g. after the creature regains hit points.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
