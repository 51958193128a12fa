//! Spendable resources (spell slots, Ki, Action Surge, etc.).
//!
//! A resource is a clamped numeric value between 0 and its maximum.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named resource clamped between 0 and `max`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Display name.
    pub name: String,
    /// Uses left.
    pub current: i32,
    /// Maximum uses.
    pub max: i32,
}

impl Resource {
    /// Create a resource starting full.
    pub fn new(name: impl Into<String>, max: i32) -> Self {
        Self {
            name: name.into(),
            current: max,
            max,
        }
    }

    /// Create a resource with a custom starting value.
    pub fn with_current(name: impl Into<String>, current: i32, max: i32) -> Self {
        Self {
            name: name.into(),
            current: current.clamp(0, max),
            max,
        }
    }

    /// Adjust by a delta, clamping to bounds. Returns the new value.
    pub fn adjust(&mut self, delta: i32) -> i32 {
        self.current = (self.current + delta).clamp(0, self.max);
        self.current
    }

    /// Spend `amount` uses if enough remain. Returns `false` and leaves
    /// the resource untouched otherwise.
    pub fn spend(&mut self, amount: i32) -> bool {
        if amount > self.current {
            return false;
        }
        self.current -= amount;
        true
    }

    /// Refill to maximum.
    pub fn restore(&mut self) {
        self.current = self.max;
    }

    /// Returns true if no uses remain.
    pub fn is_empty(&self) -> bool {
        self.current <= 0
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}/{}", self.name, self.current, self.max)
    }
}
