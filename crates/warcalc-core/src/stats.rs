// Season counting-stat records consumed by the WAR calculators.
//
// Records are plain, fully-specified totals. Calculators read them as-is and
// never validate; `validate()` is the opt-in boundary check for callers that
// want to reject inconsistent upstream data before calculating.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatError {
    #[error("field `{field}` is not a finite number")]
    NonFinite { field: String },

    #[error("inconsistent stat line at `{field}`: {message}")]
    Inconsistent { field: String, message: String },
}

fn inconsistent(field: &str, message: String) -> StatError {
    StatError::Inconsistent {
        field: field.into(),
        message,
    }
}

// ---------------------------------------------------------------------------
// Batting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BattingStats {
    pub plate_appearances: u32,
    pub at_bats: u32,
    pub singles: u32,
    pub doubles: u32,
    pub triples: u32,
    pub home_runs: u32,
    /// All walks, intentional included.
    pub walks: u32,
    pub intentional_walks: u32,
    pub hit_by_pitch: u32,
    pub sacrifice_flies: u32,
    pub sacrifice_hits: u32,
    pub strikeouts: u32,
}

impl BattingStats {
    /// Summed in `u64` so implausibly large imported counts cannot overflow.
    pub fn hits(&self) -> u64 {
        u64::from(self.singles)
            + u64::from(self.doubles)
            + u64::from(self.triples)
            + u64::from(self.home_runs)
    }

    /// Times reaching first without a hit for extra bases:
    /// `1B + BB + HBP − IBB`. Saturates at zero for an inconsistent line.
    pub fn times_on_first(&self) -> u64 {
        (u64::from(self.singles) + u64::from(self.walks) + u64::from(self.hit_by_pitch))
            .saturating_sub(u64::from(self.intentional_walks))
    }

    /// Walks minus intentional walks. Computed in floating point so an
    /// inconsistent line surfaces as a negative count instead of wrapping.
    pub fn unintentional_walks(&self) -> f64 {
        self.walks as f64 - self.intentional_walks as f64
    }

    pub fn validate(&self) -> Result<(), StatError> {
        if self.hits() > u64::from(self.at_bats) {
            return Err(inconsistent(
                "hits",
                format!("{} hits exceed {} at-bats", self.hits(), self.at_bats),
            ));
        }
        if self.strikeouts > self.at_bats {
            return Err(inconsistent(
                "strikeouts",
                format!(
                    "{} strikeouts exceed {} at-bats",
                    self.strikeouts, self.at_bats
                ),
            ));
        }
        if self.intentional_walks > self.walks {
            return Err(inconsistent(
                "intentional_walks",
                format!(
                    "{} intentional walks exceed {} walks",
                    self.intentional_walks, self.walks
                ),
            ));
        }
        let accounted = u64::from(self.at_bats)
            + u64::from(self.walks)
            + u64::from(self.hit_by_pitch)
            + u64::from(self.sacrifice_flies)
            + u64::from(self.sacrifice_hits);
        if accounted > u64::from(self.plate_appearances) {
            return Err(inconsistent(
                "plate_appearances",
                format!(
                    "AB + BB + HBP + SF + SH = {accounted} exceeds {} PA",
                    self.plate_appearances
                ),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Pitching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PitchingStats {
    /// Innings pitched, stored as outs recorded (3 per inning).
    pub outs_recorded: u32,
    pub games: u32,
    pub games_started: u32,
    pub strikeouts: u32,
    pub walks: u32,
    pub hit_by_pitch: u32,
    pub home_runs_allowed: u32,
    pub earned_runs: u32,
    pub saves: u32,
    pub holds: u32,
    pub blown_saves: u32,
    /// Mean leverage index at entry across relief appearances, when tracked.
    pub average_leverage_index: Option<f64>,
}

impl PitchingStats {
    pub fn innings_pitched(&self) -> f64 {
        self.outs_recorded as f64 / 3.0
    }

    pub fn relief_appearances(&self) -> u32 {
        self.games.saturating_sub(self.games_started)
    }

    pub fn validate(&self) -> Result<(), StatError> {
        if self.games_started > self.games {
            return Err(inconsistent(
                "games_started",
                format!(
                    "{} starts exceed {} games",
                    self.games_started, self.games
                ),
            ));
        }
        if self.outs_recorded > 0 && self.games == 0 {
            return Err(inconsistent(
                "games",
                "outs recorded without any games pitched".into(),
            ));
        }
        if let Some(li) = self.average_leverage_index {
            if !li.is_finite() {
                return Err(StatError::NonFinite {
                    field: "average_leverage_index".into(),
                });
            }
            if li < 0.0 {
                return Err(inconsistent(
                    "average_leverage_index",
                    format!("leverage index cannot be negative, got {li}"),
                ));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Baserunning
// ---------------------------------------------------------------------------

/// Tracked extra-base advancement events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AdvancementStats {
    pub first_to_third_on_single: u32,
    pub first_to_home_on_double: u32,
    pub second_to_home_on_single: u32,
    pub tag_ups_advanced: u32,
    pub thrown_out_advancing: u32,
    pub picked_off: u32,
    /// Times on base with a chance to take an extra base.
    pub advancement_opportunities: u32,
}

impl AdvancementStats {
    /// Successful extra-base advances.
    pub fn extra_bases_taken(&self) -> u64 {
        u64::from(self.first_to_third_on_single)
            + u64::from(self.first_to_home_on_double)
            + u64::from(self.second_to_home_on_single)
            + u64::from(self.tag_ups_advanced)
    }

    /// Every tracked event, outs on the bases included.
    pub fn total_events(&self) -> u64 {
        self.extra_bases_taken()
            + u64::from(self.thrown_out_advancing)
            + u64::from(self.picked_off)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BaserunningStats {
    pub plate_appearances: u32,
    pub stolen_bases: u32,
    pub caught_stealing: u32,
    pub grounded_into_double_play: u32,
    /// PA with a runner on first and fewer than two outs, when tracked.
    pub double_play_opportunities: u32,
    /// Times on first with second open (`1B + BB + HBP − IBB`), when tracked.
    pub steal_opportunities: u32,
    /// Tracked advancement events; `None` when the league does not log them.
    pub advancement: Option<AdvancementStats>,
    /// 0–100 speed rating used to estimate baserunning when untracked.
    pub speed_rating: Option<u8>,
}

impl BaserunningStats {
    pub fn validate(&self) -> Result<(), StatError> {
        if self.double_play_opportunities > 0
            && self.grounded_into_double_play > self.double_play_opportunities
        {
            return Err(inconsistent(
                "grounded_into_double_play",
                format!(
                    "{} double plays exceed {} opportunities",
                    self.grounded_into_double_play, self.double_play_opportunities
                ),
            ));
        }
        if let Some(advancement) = &self.advancement {
            let taken = advancement.extra_bases_taken();
            let opportunities = u64::from(advancement.advancement_opportunities);
            if opportunities > 0 && taken > opportunities {
                return Err(inconsistent(
                    "advancement_opportunities",
                    format!("{taken} extra bases taken exceed {opportunities} opportunities"),
                ));
            }
        }
        if let Some(speed) = self.speed_rating {
            if speed > 100 {
                return Err(inconsistent(
                    "speed_rating",
                    format!("must be between 0 and 100, got {speed}"),
                ));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
