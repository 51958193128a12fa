use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ability::Ability;

/// A named condition. Unknown names are kept as `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Cannot see.
    Blinded,
    /// Cannot attack the charmer.
    Charmed,
    /// Cannot hear.
    Deafened,
    /// Disadvantage while the source is in sight.
    Frightened,
    /// Speed becomes 0.
    Grappled,
    /// Cannot take actions or reactions.
    Incapacitated,
    /// Cannot be seen without magic.
    Invisible,
    /// Incapacitated and cannot move or speak.
    Paralyzed,
    /// Turned to stone.
    Petrified,
    /// Disadvantage on attacks and ability checks.
    Poisoned,
    /// Lying on the ground.
    Prone,
    /// Speed 0, disadvantage on attacks.
    Restrained,
    /// Incapacitated, cannot move.
    Stunned,
    /// Unaware of surroundings.
    Unconscious,
    /// Cumulative fatigue.
    Exhaustion,
    /// A condition outside the standard list.
    Custom(String),
}

impl Condition {
    /// Whether this condition prevents actions and reactions.
    pub fn incapacitates(&self) -> bool {
        matches!(
            self,
            Self::Incapacitated
                | Self::Paralyzed
                | Self::Petrified
                | Self::Stunned
                | Self::Unconscious
        )
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Blinded => "blinded",
            Self::Charmed => "charmed",
            Self::Deafened => "deafened",
            Self::Frightened => "frightened",
            Self::Grappled => "grappled",
            Self::Incapacitated => "incapacitated",
            Self::Invisible => "invisible",
            Self::Paralyzed => "paralyzed",
            Self::Petrified => "petrified",
            Self::Poisoned => "poisoned",
            Self::Prone => "prone",
            Self::Restrained => "restrained",
            Self::Stunned => "stunned",
            Self::Unconscious => "unconscious",
            Self::Exhaustion => "exhaustion",
            Self::Custom(name) => name.as_str(),
        };
        write!(f, "{s}")
    }
}

impl FromStr for Condition {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let condition = match lower.as_str() {
            "blinded" => Self::Blinded,
            "charmed" => Self::Charmed,
            "deafened" => Self::Deafened,
            "frightened" => Self::Frightened,
            "grappled" => Self::Grappled,
            "incapacitated" => Self::Incapacitated,
            "invisible" => Self::Invisible,
            "paralyzed" => Self::Paralyzed,
            "petrified" => Self::Petrified,
            "poisoned" => Self::Poisoned,
            "prone" => Self::Prone,
            "restrained" => Self::Restrained,
            "stunned" => Self::Stunned,
            "unconscious" => Self::Unconscious,
            "exhaustion" => Self::Exhaustion,
            _ => Self::Custom(lower),
        };
        Ok(condition)
    }
}

/// How long an applied condition lasts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ConditionDuration {
    /// Counts down once per combat round; removed when it reaches 0.
    Rounds(u32),
    /// Lasts until the bearer succeeds on a saving throw.
    UntilSave {
        /// Difficulty class of the save.
        dc: i32,
        /// Ability the save is rolled with.
        ability: Ability,
    },
    /// Lasts until magically ended.
    UntilDispelled,
    /// Lasts until the bearer finishes a long rest.
    UntilLongRest,
}

/// A condition currently affecting a creature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveCondition {
    /// Which condition.
    pub condition: Condition,
    /// What imposed it (spell, creature, trap).
    pub source: String,
    /// How long it lasts.
    pub duration: ConditionDuration,
}

impl ActiveCondition {
    /// Create an active condition.
    pub fn new(
        condition: Condition,
        source: impl Into<String>,
        duration: ConditionDuration,
    ) -> Self {
        Self {
            condition,
            source: source.into(),
            duration,
        }
    }

    /// A condition lasting a fixed number of rounds.
    pub fn for_rounds(condition: Condition, source: impl Into<String>, rounds: u32) -> Self {
        Self::new(condition, source, ConditionDuration::Rounds(rounds))
    }

    /// Rounds left, if this condition is round-limited.
    pub fn rounds_remaining(&self) -> Option<u32> {
        match self.duration {
            ConditionDuration::Rounds(n) => Some(n),
            _ => None,
        }
    }

    /// Count one round down. Returns `true` once the condition has expired.
    pub fn tick_round(&mut self) -> bool {
        match &mut self.duration {
            ConditionDuration::Rounds(n) => {
                *n = n.saturating_sub(1);
                *n == 0
            }
            _ => false,
        }
    }
}

/// Insert a condition, replacing any existing entry with the same name.
pub fn replace_condition(conditions: &mut Vec<ActiveCondition>, incoming: ActiveCondition) {
    conditions.retain(|c| c.condition != incoming.condition);
    conditions.push(incoming);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_and_custom() {
        assert_eq!("Prone".parse::<Condition>().unwrap(), Condition::Prone);
        assert_eq!(
            "Hexed".parse::<Condition>().unwrap(),
            Condition::Custom("hexed".to_string())
        );
        assert_eq!(Condition::Custom("hexed".into()).to_string(), "hexed");
    }

    #[test]
    fn tick_round_expires_at_zero() {
        let mut c = ActiveCondition::for_rounds(Condition::Stunned, "Monk", 2);
        assert!(!c.tick_round());
        assert_eq!(c.rounds_remaining(), Some(1));
        assert!(c.tick_round());
    }

    #[test]
    fn untimed_never_ticks_out() {
        let mut c = ActiveCondition::new(
            Condition::Charmed,
            "Vampire",
            ConditionDuration::UntilSave {
                dc: 15,
                ability: Ability::Wisdom,
            },
        );
        assert!(!c.tick_round());
        assert_eq!(c.rounds_remaining(), None);
    }

    #[test]
    fn replace_does_not_stack() {
        let mut list = vec![ActiveCondition::for_rounds(Condition::Poisoned, "Spider", 3)];
        replace_condition(
            &mut list,
            ActiveCondition::for_rounds(Condition::Poisoned, "Trap", 1),
        );
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].source, "Trap");
    }

    #[test]
    fn duration_serde_shape() {
        let json = serde_json::to_string(&ConditionDuration::Rounds(3)).unwrap();
        assert_eq!(json, r#"{"type":"rounds","value":3}"#);
        let back: ConditionDuration =
            serde_json::from_str(r#"{"type":"until_long_rest"}"#).unwrap();
        assert_eq!(back, ConditionDuration::UntilLongRest);
    }

    #[test]
    fn incapacitating_conditions() {
        assert!(Condition::Stunned.incapacitates());
        assert!(!Condition::Prone.incapacitates());
    }
}
