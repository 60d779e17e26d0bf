// Leverage index: how much a game state can swing the outcome, relative to
// an average plate appearance (LI = 1.0).
//
// LI = base/out index × inning multiplier × walk-off boost × score dampener,
// clamped to [MIN_LEVERAGE_INDEX, MAX_LEVERAGE_INDEX].

use crate::game_state::{GameState, Half};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MIN_LEVERAGE_INDEX: f64 = 0.1;
pub const MAX_LEVERAGE_INDEX: f64 = 10.0;

/// Extra multiplier when the home team bats in the bottom of the final (or
/// an extra) inning while tied or trailing.
pub const WALK_OFF_BOOST: f64 = 1.40;

/// LI at or above which a plate appearance counts as a clutch situation.
pub const CLUTCH_SITUATION_LI: f64 = 1.5;

/// Appearance counts toward the high-leverage tally at or above this LI.
pub const HIGH_LEVERAGE_LI: f64 = 2.0;

/// Bounds applied to every gmLI estimate.
const ESTIMATED_GM_LI_FLOOR: f64 = 0.5;
const ESTIMATED_GM_LI_CEILING: f64 = 2.0;

/// Base/out leverage indexed by `[base mask][outs]`.
const BASE_OUT_LI: [[f64; 3]; 8] = [
    [0.86, 0.90, 0.93], // empty
    [1.07, 1.10, 1.24], // 1st
    [1.15, 1.40, 1.56], // 2nd
    [1.35, 1.55, 1.93], // 1st & 2nd
    [1.08, 1.65, 1.88], // 3rd
    [1.32, 1.85, 2.25], // 1st & 3rd
    [1.45, 2.10, 2.50], // 2nd & 3rd
    [1.60, 2.25, 2.67], // loaded
];

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// Leverage of the base/out situation alone.
pub fn base_out_index(state: &GameState) -> f64 {
    BASE_OUT_LI[state.bases.index()][state.outs_index()]
}

/// Multiplier by game progress (`inning / scheduled innings`).
///
/// Early (< 33%) 0.75, middle (< 66%) 1.0, late (< 85%) 1.3, final stretch
/// 1.8. Extra innings add 0.15 per inning up to 2.5.
pub fn inning_multiplier(inning: u8, scheduled_innings: u8) -> f64 {
    let scheduled = scheduled_innings.max(1);
    let progress = f64::from(inning) / f64::from(scheduled);
    if progress < 0.33 {
        0.75
    } else if progress < 0.66 {
        1.0
    } else if progress < 0.85 {
        1.3
    } else if inning > scheduled {
        (1.8 + f64::from(inning - scheduled) * 0.15).min(2.5)
    } else {
        1.8
    }
}

/// [`WALK_OFF_BOOST`] when a single run could end or extend the game for the
/// home team batting last, otherwise 1.0.
pub fn walk_off_boost(state: &GameState) -> f64 {
    if state.half == Half::Bottom && state.is_final_inning_or_later() && state.run_diff <= 0 {
        WALK_OFF_BOOST
    } else {
        1.0
    }
}

/// Shrinks leverage as the margin grows. `run_diff` may be from either
/// team's perspective; only its magnitude matters. A three-run margin is
/// worth slightly more late, when fewer outs remain to give it back.
pub fn score_dampener(run_diff: i32, inning: u8) -> f64 {
    match run_diff.unsigned_abs() {
        0 => 1.00,
        1 => 0.95,
        2 => 0.85,
        3 => 0.60 + 0.12 * f64::from(inning.min(9)) / 9.0,
        4 => 0.40,
        5 | 6 => 0.25,
        _ => 0.10,
    }
}

// ---------------------------------------------------------------------------
// Leverage index
// ---------------------------------------------------------------------------

/// Component breakdown of one leverage calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LeverageBreakdown {
    pub base_out: f64,
    pub inning_multiplier: f64,
    pub walk_off_boost: f64,
    pub score_dampener: f64,
    pub leverage_index: f64,
    pub category: LeverageCategory,
}

pub fn leverage_breakdown(state: &GameState) -> LeverageBreakdown {
    let base_out = base_out_index(state);
    let inning_multiplier = inning_multiplier(state.inning, state.scheduled_innings);
    let walk_off_boost = walk_off_boost(state);
    let score_dampener = score_dampener(state.batting_team_diff(), state.inning);
    let leverage_index = (base_out * inning_multiplier * walk_off_boost * score_dampener)
        .clamp(MIN_LEVERAGE_INDEX, MAX_LEVERAGE_INDEX);
    LeverageBreakdown {
        base_out,
        inning_multiplier,
        walk_off_boost,
        score_dampener,
        leverage_index,
        category: LeverageCategory::from_li(leverage_index),
    }
}

/// Leverage index for a game state, in `[0.1, 10.0]`.
pub fn leverage_index(state: &GameState) -> f64 {
    leverage_breakdown(state).leverage_index
}

pub fn is_clutch_situation(li: f64) -> bool {
    li >= CLUTCH_SITUATION_LI
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LeverageCategory {
    Low,
    Medium,
    High,
    Extreme,
}

impl LeverageCategory {
    /// Low below 0.85, Medium below 2.0, High below 5.0, Extreme otherwise.
    pub fn from_li(li: f64) -> Self {
        if li >= 5.0 {
            LeverageCategory::Extreme
        } else if li >= 2.0 {
            LeverageCategory::High
        } else if li >= 0.85 {
            LeverageCategory::Medium
        } else {
            LeverageCategory::Low
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            LeverageCategory::Low => "low",
            LeverageCategory::Medium => "medium",
            LeverageCategory::High => "high",
            LeverageCategory::Extreme => "extreme",
        }
    }
}

impl fmt::Display for LeverageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

// ---------------------------------------------------------------------------
// gmLI accumulation
// ---------------------------------------------------------------------------

/// Running leverage totals for one pitcher's relief appearances.
///
/// Owned by the caller; [`with_appearance`](Self::with_appearance) returns a
/// new accumulator and never mutates in place.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LeverageAccumulator {
    pub total_li: f64,
    pub appearances: u32,
    pub max_li: Option<f64>,
    pub min_li: Option<f64>,
    pub high_leverage_appearances: u32,
    pub extreme_leverage_appearances: u32,
}

impl LeverageAccumulator {
    /// Fold the entry leverage of one appearance into the totals.
    pub fn with_appearance(self, li: f64) -> Self {
        LeverageAccumulator {
            total_li: self.total_li + li,
            appearances: self.appearances + 1,
            max_li: Some(self.max_li.map_or(li, |m| m.max(li))),
            min_li: Some(self.min_li.map_or(li, |m| m.min(li))),
            high_leverage_appearances: self.high_leverage_appearances
                + u32::from(li >= HIGH_LEVERAGE_LI),
            extreme_leverage_appearances: self.extreme_leverage_appearances
                + u32::from(li >= 5.0),
        }
    }

    /// Mean leverage across appearances; 1.0 (average) when there are none.
    pub fn gm_li(&self) -> f64 {
        if self.appearances == 0 {
            return 1.0;
        }
        self.total_li / f64::from(self.appearances)
    }
}

// ---------------------------------------------------------------------------
// gmLI estimation by role
// ---------------------------------------------------------------------------

/// Bullpen role, used to estimate gmLI when per-appearance data is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelieverRole {
    Starter,
    Closer,
    Setup,
    Middle,
    Long,
    MopUp,
}

impl RelieverRole {
    /// Infer a bullpen role from save and hold rates per relief appearance.
    pub fn infer(relief_appearances: u32, saves: u32, holds: u32) -> Self {
        if relief_appearances == 0 {
            return RelieverRole::Starter;
        }
        let apps = f64::from(relief_appearances);
        let save_rate = f64::from(saves) / apps;
        let hold_rate = f64::from(holds) / apps;
        if save_rate > 0.3 {
            RelieverRole::Closer
        } else if hold_rate > 0.3 || save_rate > 0.1 {
            RelieverRole::Setup
        } else if hold_rate > 0.1 {
            RelieverRole::Middle
        } else {
            RelieverRole::Long
        }
    }
}

/// Fallback gmLI for a role, bounded to `[0.5, 2.0]`.
///
/// Closers scale with saves (1.75 to 1.95); setup men rise with hold
/// opportunities (1.40 to 1.60, 1.45 when untracked).
pub fn estimate_gm_li(role: RelieverRole, saves: u32, hold_opportunities: u32) -> f64 {
    let estimate = match role {
        RelieverRole::Starter => 1.0,
        RelieverRole::Closer => match saves {
            s if s >= 15 => 1.95,
            s if s >= 10 => 1.90,
            s if s >= 5 => 1.85,
            _ => 1.75,
        },
        RelieverRole::Setup if hold_opportunities > 0 => {
            (1.40 + f64::from(hold_opportunities) * 0.02).min(1.60)
        }
        RelieverRole::Setup => 1.45,
        RelieverRole::Middle => 1.1,
        RelieverRole::Long => 0.9,
        RelieverRole::MopUp => 0.5,
    };
    estimate.clamp(ESTIMATED_GM_LI_FLOOR, ESTIMATED_GM_LI_CEILING)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
