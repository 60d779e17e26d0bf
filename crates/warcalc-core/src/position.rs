// Fielding positions and their defensive groupings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A defensive position on the field (plus DH, which never fields).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldingPosition {
    Pitcher,
    Catcher,
    FirstBase,
    SecondBase,
    ThirdBase,
    ShortStop,
    LeftField,
    CenterField,
    RightField,
    DesignatedHitter,
}

impl FieldingPosition {
    /// Every position, in scorebook order (1 = P through 9 = RF, then DH).
    pub const ALL: [FieldingPosition; 10] = [
        FieldingPosition::Pitcher,
        FieldingPosition::Catcher,
        FieldingPosition::FirstBase,
        FieldingPosition::SecondBase,
        FieldingPosition::ThirdBase,
        FieldingPosition::ShortStop,
        FieldingPosition::LeftField,
        FieldingPosition::CenterField,
        FieldingPosition::RightField,
        FieldingPosition::DesignatedHitter,
    ];

    /// Parse a position abbreviation ("C", "1B", "SS", ...).
    ///
    /// Accepts the common aliases "SP"/"RP" for pitcher. Generic "OF" maps to
    /// center field. Returns `None` for anything unrecognized; callers decide
    /// whether that degrades to a neutral value.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "P" | "SP" | "RP" => Some(FieldingPosition::Pitcher),
            "C" => Some(FieldingPosition::Catcher),
            "1B" => Some(FieldingPosition::FirstBase),
            "2B" => Some(FieldingPosition::SecondBase),
            "3B" => Some(FieldingPosition::ThirdBase),
            "SS" => Some(FieldingPosition::ShortStop),
            "LF" => Some(FieldingPosition::LeftField),
            "CF" | "OF" => Some(FieldingPosition::CenterField),
            "RF" => Some(FieldingPosition::RightField),
            "DH" => Some(FieldingPosition::DesignatedHitter),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            FieldingPosition::Pitcher => "P",
            FieldingPosition::Catcher => "C",
            FieldingPosition::FirstBase => "1B",
            FieldingPosition::SecondBase => "2B",
            FieldingPosition::ThirdBase => "3B",
            FieldingPosition::ShortStop => "SS",
            FieldingPosition::LeftField => "LF",
            FieldingPosition::CenterField => "CF",
            FieldingPosition::RightField => "RF",
            FieldingPosition::DesignatedHitter => "DH",
        }
    }

    /// Whether this position plays on the infield dirt (pitcher and catcher
    /// included).
    pub fn is_infield(&self) -> bool {
        matches!(
            self,
            FieldingPosition::Pitcher
                | FieldingPosition::Catcher
                | FieldingPosition::FirstBase
                | FieldingPosition::SecondBase
                | FieldingPosition::ThirdBase
                | FieldingPosition::ShortStop
        )
    }

    pub fn is_outfield(&self) -> bool {
        matches!(
            self,
            FieldingPosition::LeftField | FieldingPosition::CenterField | FieldingPosition::RightField
        )
    }
}

impl fmt::Display for FieldingPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_standard_abbreviations() {
        assert_eq!(FieldingPosition::from_str_pos("C"), Some(FieldingPosition::Catcher));
        assert_eq!(FieldingPosition::from_str_pos("1b"), Some(FieldingPosition::FirstBase));
        assert_eq!(FieldingPosition::from_str_pos(" SS "), Some(FieldingPosition::ShortStop));
        assert_eq!(FieldingPosition::from_str_pos("OF"), Some(FieldingPosition::CenterField));
        assert_eq!(FieldingPosition::from_str_pos("RP"), Some(FieldingPosition::Pitcher));
    }

    #[test]
    fn unknown_abbreviation_is_none() {
        assert_eq!(FieldingPosition::from_str_pos("UTIL"), None);
        assert_eq!(FieldingPosition::from_str_pos(""), None);
    }

    #[test]
    fn display_round_trips_through_parse() {
        for pos in FieldingPosition::ALL {
            assert_eq!(FieldingPosition::from_str_pos(pos.display_str()), Some(pos));
        }
    }

    #[test]
    fn infield_and_outfield_are_disjoint() {
        for pos in FieldingPosition::ALL {
            assert!(!(pos.is_infield() && pos.is_outfield()), "{pos} in both groups");
        }
        assert!(!FieldingPosition::DesignatedHitter.is_infield());
        assert!(!FieldingPosition::DesignatedHitter.is_outfield());
    }
}
