//! Cell strategies

use serde::{Deserialize, Serialize};

/// Strategy held by a single cell
///
/// The labels follow the Prisoner's Dilemma. In Hawk-Dove `Cooperate` is the
/// dove and `Defect` the hawk; in Stag Hunt they are stag and hare.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Strategy {
    /// Bit 0. Every cell starts here.
    #[default]
    Cooperate = 0,
    /// Bit 1.
    Defect = 1,
}

impl Strategy {
    /// Numeric value used by the grid contract (0 or 1)
    pub fn bit(self) -> u8 {
        self as u8
    }

    /// Index into a 2x2 payoff matrix
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_bit(bit: bool) -> Self {
        if bit {
            Strategy::Defect
        } else {
            Strategy::Cooperate
        }
    }
}

impl From<Strategy> for u8 {
    fn from(strategy: Strategy) -> u8 {
        strategy.bit()
    }
}

/// Human-readable label of a strategy under a given game
pub fn describe_strategy(strategy: Strategy, game_kind: &str) -> &'static str {
    match (game_kind, strategy) {
        ("hawk_dove", Strategy::Cooperate) => "Dove",
        ("hawk_dove", Strategy::Defect) => "Hawk",
        ("stag_hunt", Strategy::Cooperate) => "Stag",
        ("stag_hunt", Strategy::Defect) => "Hare",
        (_, Strategy::Cooperate) => "Cooperate",
        (_, Strategy::Defect) => "Defect",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits() {
        assert_eq!(Strategy::Cooperate.bit(), 0);
        assert_eq!(Strategy::Defect.bit(), 1);
        assert_eq!(u8::from(Strategy::Defect), 1);
        assert_eq!(Strategy::from_bit(true), Strategy::Defect);
        assert_eq!(Strategy::from_bit(false), Strategy::Cooperate);
        assert_eq!(Strategy::default(), Strategy::Cooperate);
    }

    #[test]
    fn test_labels() {
        assert_eq!(describe_strategy(Strategy::Defect, "hawk_dove"), "Hawk");
        assert_eq!(describe_strategy(Strategy::Cooperate, "stag_hunt"), "Stag");
        assert_eq!(describe_strategy(Strategy::Defect, "prisoners_dilemma"), "Defect");
    }
}
