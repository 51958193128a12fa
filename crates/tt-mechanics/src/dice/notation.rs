//! Parsing and describing `NdS+M` dice notation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MechError, MechResult};

/// Most dice a notation may roll.
pub const MAX_DICE: u32 = 1_000;
/// Most sides a die may have.
pub const MAX_SIDES: u32 = 10_000;
/// Largest flat modifier, either sign.
pub const MAX_MODIFIER: i32 = 1_000_000;

/// A parsed dice expression: roll `count` dice with `sides` sides and add
/// `modifier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceNotation {
    /// Number of dice.
    pub count: u32,
    /// Sides per die.
    pub sides: u32,
    /// Flat modifier added to the sum.
    pub modifier: i32,
}

impl DiceNotation {
    /// Create a notation.
    pub fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self {
            count,
            sides,
            modifier,
        }
    }

    /// Parse `<count>d<sides>[+|-<modifier>]`.
    ///
    /// Case-insensitive. Whitespace is allowed around the expression and
    /// around the modifier sign, but not inside `NdS`. Dice with zero sides
    /// are rejected, as are more than [`MAX_DICE`] dice, more than
    /// [`MAX_SIDES`] sides, or a modifier beyond [`MAX_MODIFIER`].
    pub fn parse(input: &str) -> MechResult<Self> {
        let invalid = || MechError::InvalidNotation(input.to_string());
        let lowered = input.trim().to_lowercase();

        let (count, rest) = lowered.split_once('d').ok_or_else(invalid)?;
        let count = parse_digits(count)
            .filter(|n| *n <= MAX_DICE)
            .ok_or_else(invalid)?;

        let sides_len = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (sides, tail) = rest.split_at(sides_len);
        let sides = parse_digits(sides).ok_or_else(invalid)?;
        if sides == 0 || sides > MAX_SIDES {
            return Err(invalid());
        }

        let tail = tail.trim();
        let magnitude = |digits: &str| {
            parse_digits(digits.trim_start())
                .and_then(|n| i32::try_from(n).ok())
                .filter(|n| *n <= MAX_MODIFIER)
                .ok_or_else(invalid)
        };
        let modifier = if tail.is_empty() {
            0
        } else if let Some(digits) = tail.strip_prefix('+') {
            magnitude(digits)?
        } else if let Some(digits) = tail.strip_prefix('-') {
            -magnitude(digits)?
        } else {
            return Err(invalid());
        };

        Ok(Self::new(count, sides, modifier))
    }

    /// The same dice rolled twice as many times, modifier unchanged.
    pub fn doubled_dice(self) -> Self {
        Self::new(self.count.saturating_mul(2), self.sides, self.modifier)
    }

    /// Lowest possible total.
    pub fn min(&self) -> i32 {
        saturate(i64::from(self.count) + i64::from(self.modifier))
    }

    /// Highest possible total.
    pub fn max(&self) -> i32 {
        saturate(i64::from(self.count) * i64::from(self.sides) + i64::from(self.modifier))
    }

    /// Expected total, rounded down.
    pub fn average(&self) -> i32 {
        let per_die = (1.0 + f64::from(self.sides)) / 2.0;
        (f64::from(self.count) * per_die + f64::from(self.modifier)).floor() as i32
    }
}

/// Clamp a wide total into `i32`.
pub(crate) fn saturate(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl FromStr for DiceNotation {
    type Err = MechError;

    fn from_str(s: &str) -> MechResult<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DiceNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.modifier {
            0 => write!(f, "{}d{}", self.count, self.sides),
            m if m > 0 => write!(f, "{}d{}+{m}", self.count, self.sides),
            m => write!(f, "{}d{}{m}", self.count, self.sides),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_modified() {
        assert_eq!(DiceNotation::parse("2d6").unwrap(), DiceNotation::new(2, 6, 0));
        assert_eq!(DiceNotation::parse("1d20+5").unwrap(), DiceNotation::new(1, 20, 5));
        assert_eq!(DiceNotation::parse("4d8-2").unwrap(), DiceNotation::new(4, 8, -2));
    }

    #[test]
    fn tolerates_case_and_whitespace() {
        assert_eq!(
            DiceNotation::parse("  3D10 + 4 ").unwrap(),
            DiceNotation::new(3, 10, 4)
        );
        assert_eq!(
            DiceNotation::parse("1d6 -1").unwrap(),
            DiceNotation::new(1, 6, -1)
        );
    }

    #[test]
    fn rejects_malformed() {
        for bad in [
            "", "d20", "2d", "2x6", "2d6+", "2d6+x", "2 d6", "2d 6", "2d6*2", "1d0", "-1d6",
            "1d6+1+1", "2d6 3",
        ] {
            assert!(
                matches!(DiceNotation::parse(bad), Err(MechError::InvalidNotation(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_out_of_range_parts() {
        for bad in ["1001d6", "1d10001", "1d6+1000001", "1d6-1000001", "100000d100000", "1d6+2147483647"] {
            assert!(
                matches!(DiceNotation::parse(bad), Err(MechError::InvalidNotation(_))),
                "{bad:?} should be rejected"
            );
        }
        let widest = DiceNotation::parse("1000d10000-1000000").unwrap();
        assert_eq!(widest, DiceNotation::new(MAX_DICE, MAX_SIDES, -MAX_MODIFIER));
        assert_eq!(widest.max(), 9_000_000);
        assert_eq!(widest.min(), -999_000);
    }

    #[test]
    fn extremes_saturate_instead_of_overflowing() {
        let huge = DiceNotation::new(u32::MAX, u32::MAX, i32::MAX);
        assert_eq!(huge.max(), i32::MAX);
        assert_eq!(huge.min(), i32::MAX);
        assert_eq!(huge.doubled_dice().count, u32::MAX);
        assert_eq!(DiceNotation::new(0, 6, i32::MIN).min(), i32::MIN);
    }

    #[test]
    fn display_round_trips() {
        for s in ["2d6", "1d20+5", "4d8-2"] {
            assert_eq!(s.parse::<DiceNotation>().unwrap().to_string(), s);
        }
    }

    #[test]
    fn min_max_average() {
        let n = DiceNotation::new(2, 6, 3);
        assert_eq!(n.min(), 5);
        assert_eq!(n.max(), 15);
        assert_eq!(n.average(), 10);
        assert_eq!(DiceNotation::new(1, 8, -2).average(), 2);
    }

    #[test]
    fn doubling_keeps_modifier() {
        assert_eq!(
            DiceNotation::new(2, 6, 3).doubled_dice(),
            DiceNotation::new(4, 6, 3)
        );
    }
}
