use crate::dice::DiceEngine;

/// Settings for building dice and combat engines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// RNG seed. `None` draws entropy from the OS.
    pub seed: Option<u64>,
    /// Maximum combat log size (oldest entries dropped when exceeded). 0 = unlimited.
    pub max_log_entries: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_log_entries: 500,
        }
    }
}

impl EngineConfig {
    /// Set the RNG seed for reproducible rolls.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the maximum combat log size (0 = unlimited).
    pub fn with_max_log_entries(mut self, max: usize) -> Self {
        self.max_log_entries = max;
        self
    }

    /// A dice engine seeded from this configuration.
    pub fn build_dice(&self) -> DiceEngine {
        match self.seed {
            Some(seed) => DiceEngine::seeded(seed),
            None => DiceEngine::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = EngineConfig::default();
        assert_eq!(config.seed, None);
        assert_eq!(config.max_log_entries, 500);
    }

    #[test]
    fn config_builder_chain() {
        let config = EngineConfig::default()
            .with_seed(7)
            .with_max_log_entries(0);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_log_entries, 0);
    }

    #[test]
    fn seeded_configs_roll_alike() {
        let config = EngineConfig::default().with_seed(99);
        let mut a = config.build_dice();
        let mut b = config.build_dice();
        assert_eq!(a.roll_dice(5, 20), b.roll_dice(5, 20));
    }
}
