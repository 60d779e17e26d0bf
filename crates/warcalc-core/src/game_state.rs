// Per-play game-state snapshot used by win expectancy, WPA, and leverage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Regulation length of a game in innings.
pub const DEFAULT_SCHEDULED_INNINGS: u8 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Half {
    Top,
    Bottom,
}

impl Half {
    pub fn index(&self) -> usize {
        match self {
            Half::Top => 0,
            Half::Bottom => 1,
        }
    }

    pub fn from_str_half(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "top" | "t" => Some(Half::Top),
            "bottom" | "bot" | "b" => Some(Half::Bottom),
            _ => None,
        }
    }
}

/// Base occupancy as a 3-bit mask: first = 1, second = 2, third = 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BaseState(u8);

impl BaseState {
    pub const EMPTY: BaseState = BaseState(0);
    pub const FIRST: BaseState = BaseState(0b001);
    pub const SECOND: BaseState = BaseState(0b010);
    pub const THIRD: BaseState = BaseState(0b100);
    pub const FIRST_SECOND: BaseState = BaseState(0b011);
    pub const FIRST_THIRD: BaseState = BaseState(0b101);
    pub const SECOND_THIRD: BaseState = BaseState(0b110);
    pub const LOADED: BaseState = BaseState(0b111);

    /// All eight occupancy patterns, in mask order.
    pub const ALL: [BaseState; 8] = [
        BaseState::EMPTY,
        BaseState::FIRST,
        BaseState::SECOND,
        BaseState::FIRST_SECOND,
        BaseState::THIRD,
        BaseState::FIRST_THIRD,
        BaseState::SECOND_THIRD,
        BaseState::LOADED,
    ];

    pub fn from_runners(first: bool, second: bool, third: bool) -> Self {
        BaseState((first as u8) | ((second as u8) << 1) | ((third as u8) << 2))
    }

    /// Build from a raw mask; bits above the third are ignored.
    pub fn from_mask(mask: u8) -> Self {
        BaseState(mask & 0b111)
    }

    pub fn mask(&self) -> u8 {
        self.0
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub fn on_first(&self) -> bool {
        self.0 & 0b001 != 0
    }

    pub fn on_second(&self) -> bool {
        self.0 & 0b010 != 0
    }

    pub fn on_third(&self) -> bool {
        self.0 & 0b100 != 0
    }

    pub fn runner_count(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn runners_in_scoring_position(&self) -> bool {
        self.on_second() || self.on_third()
    }
}

impl fmt::Display for BaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.0 {
            0 => "empty",
            1 => "1st",
            2 => "2nd",
            3 => "1st & 2nd",
            4 => "3rd",
            5 => "1st & 3rd",
            6 => "2nd & 3rd",
            _ => "loaded",
        };
        write!(f, "{label}")
    }
}

/// A snapshot of the game before a play.
///
/// `run_diff` is always from the home team's perspective (home − away).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub inning: u8,
    pub half: Half,
    pub outs: u8,
    pub bases: BaseState,
    pub run_diff: i32,
    pub scheduled_innings: u8,
}

impl GameState {
    /// A state in a regulation nine-inning game.
    pub fn new(inning: u8, half: Half, outs: u8, bases: BaseState, run_diff: i32) -> Self {
        GameState {
            inning,
            half,
            outs,
            bases,
            run_diff,
            scheduled_innings: DEFAULT_SCHEDULED_INNINGS,
        }
    }

    pub fn with_scheduled_innings(mut self, innings: u8) -> Self {
        self.scheduled_innings = innings;
        self
    }

    pub fn is_home_batting(&self) -> bool {
        self.half == Half::Bottom
    }

    /// Run differential from the batting team's perspective.
    pub fn batting_team_diff(&self) -> i32 {
        if self.is_home_batting() {
            self.run_diff
        } else {
            -self.run_diff
        }
    }

    /// Whether the game is in its final scheduled inning or beyond.
    pub fn is_final_inning_or_later(&self) -> bool {
        self.inning >= self.scheduled_innings
    }

    /// Home team has taken the lead in the bottom of the final (or an extra)
    /// inning, which ends the game.
    pub fn is_walk_off(&self) -> bool {
        self.half == Half::Bottom && self.is_final_inning_or_later() && self.run_diff > 0
    }

    /// Outs clamped to the 0–2 range used by the lookup tables.
    pub(crate) fn outs_index(&self) -> usize {
        usize::from(self.outs.min(2))
    }
}
