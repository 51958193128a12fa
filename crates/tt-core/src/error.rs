/// Alias for `Result<T, TtError>`.
pub type TtResult<T> = Result<T, TtError>;

/// Errors raised while interpreting data-model values.
#[derive(Debug, thiserror::Error)]
pub enum TtError {
    /// A name did not match any of the six abilities.
    #[error("unknown ability: \"{0}\"")]
    UnknownAbility(String),

    /// A name did not match any known skill.
    #[error("unknown skill: \"{0}\"")]
    UnknownSkill(String),

    /// A name did not match any known damage type.
    #[error("unknown damage type: \"{0}\"")]
    UnknownDamageType(String),

    /// A grid position string could not be parsed.
    #[error("invalid grid position: \"{0}\" (expected X,Y)")]
    InvalidPosition(String),

    /// An ability score outside the playable range.
    #[error("ability score {0} is out of range (1-30)")]
    InvalidScore(i32),
}
