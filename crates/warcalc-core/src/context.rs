// League context: calibrated baselines, park factors, positional adjustments,
// and season-length scaling shared by every WAR calculator.

use crate::position::FieldingPosition;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

// ---------------------------------------------------------------------------
// Reference constants (162-game season)
// ---------------------------------------------------------------------------

/// Length of the reference season every scaled constant is expressed against.
pub const REFERENCE_SEASON_GAMES: f64 = 162.0;

/// Runs of value equal to one win over a 162-game season.
pub const REFERENCE_RUNS_PER_WIN: f64 = 10.0;

/// Plate appearances of a full-time regular over a 162-game season.
pub const REFERENCE_FULL_SEASON_PA: f64 = 600.0;

/// Replacement-level runs per 600 PA over a 162-game season.
pub const REFERENCE_REPLACEMENT_RUNS_PER_600_PA: f64 = 12.0;

/// Runs per team per game of the reference run environment.
pub const REFERENCE_RUNS_PER_GAME: f64 = 4.8;

/// Share of the overall park factor when blending with a handedness split.
const PARK_OVERALL_BLEND: f64 = 0.6;

// ---------------------------------------------------------------------------
// Season-length scaling
// ---------------------------------------------------------------------------

/// Runs-per-win for a season of `season_games` games.
///
/// `10 × (L / 162)`, exactly 10.0 at 162 games.
pub fn runs_per_win(season_games: u32) -> f64 {
    REFERENCE_RUNS_PER_WIN * season_fraction(season_games)
}

/// Fraction of the 162-game reference season.
pub fn season_fraction(season_games: u32) -> f64 {
    season_games as f64 / REFERENCE_SEASON_GAMES
}

/// Replacement-level runs credited for `plate_appearances` in a season of
/// `season_games` games, using the reference rate of 12 runs per 600 PA.
///
/// Both the full-season run total and the full-season PA total scale with
/// season length, so the per-PA rate is constant. A zero-game season yields 0.
pub fn replacement_level_runs(season_games: u32, plate_appearances: f64) -> f64 {
    SeasonScaling::for_games(
        season_games,
        &BattingBaselines::default(),
        &PitchingBaselines::default(),
    )
    .replacement_runs(plate_appearances)
}

/// Season-length-dependent constants derived from the league context.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeasonScaling {
    pub season_games: u32,
    pub runs_per_win: f64,
    /// PA of a full-time regular over this season length.
    pub full_season_pa: f64,
    /// Replacement-level runs a full-time regular is credited over this season.
    pub replacement_runs_full_season: f64,
    /// Replacement-level FIP of a pure starter at the league runs-per-win.
    pub starter_replacement_fip: f64,
    /// Replacement-level FIP of a pure reliever at the league runs-per-win.
    pub reliever_replacement_fip: f64,
}

impl SeasonScaling {
    /// Scale the reference constants to `season_games` games.
    pub fn for_games(
        season_games: u32,
        batting: &BattingBaselines,
        pitching: &PitchingBaselines,
    ) -> Self {
        let fraction = season_fraction(season_games);
        let rpw = runs_per_win(season_games);
        SeasonScaling {
            season_games,
            runs_per_win: rpw,
            full_season_pa: REFERENCE_FULL_SEASON_PA * fraction,
            replacement_runs_full_season: batting.replacement_runs_per_600_pa * fraction,
            starter_replacement_fip: pitching.starter_replacement_fip(rpw),
            reliever_replacement_fip: pitching.reliever_replacement_fip(rpw),
        }
    }

    /// Replacement runs for the player's share of a full season.
    pub fn replacement_runs(&self, plate_appearances: f64) -> f64 {
        if self.full_season_pa <= 0.0 {
            return 0.0;
        }
        self.replacement_runs_full_season * plate_appearances / self.full_season_pa
    }
}

// ---------------------------------------------------------------------------
// Baseline sections
// ---------------------------------------------------------------------------

/// Linear weights for each way of reaching base, in runs above an out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WobaWeights {
    pub unintentional_walk: f64,
    pub hit_by_pitch: f64,
    pub single: f64,
    pub double: f64,
    pub triple: f64,
    pub home_run: f64,
}

impl Default for WobaWeights {
    fn default() -> Self {
        WobaWeights {
            unintentional_walk: 0.521,
            hit_by_pitch: 0.566,
            single: 0.797,
            double: 1.332,
            triple: 1.813,
            home_run: 2.495,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BattingBaselines {
    pub league_woba: f64,
    /// Divisor converting wOBA points into runs per PA.
    pub woba_scale: f64,
    pub runs_per_pa: f64,
    pub replacement_runs_per_600_pa: f64,
    pub woba_weights: WobaWeights,
}

impl Default for BattingBaselines {
    fn default() -> Self {
        BattingBaselines {
            league_woba: 0.329,
            woba_scale: 1.7821,
            runs_per_pa: 3.19 / 27.5,
            replacement_runs_per_600_pa: REFERENCE_REPLACEMENT_RUNS_PER_600_PA,
            woba_weights: WobaWeights::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchingBaselines {
    pub league_era: f64,
    pub league_fip: f64,
    /// Constant added to raw FIP so league FIP equals league ERA.
    pub fip_constant: f64,
    /// Replacement level for a pure starter, in wins per 9 innings.
    pub starter_replacement_wins_per_9: f64,
    /// Replacement level for a pure reliever, in wins per 9 innings.
    pub reliever_replacement_wins_per_9: f64,
}

impl Default for PitchingBaselines {
    fn default() -> Self {
        PitchingBaselines {
            league_era: 4.04,
            league_fip: 4.04,
            fip_constant: 3.28,
            starter_replacement_wins_per_9: 0.12,
            reliever_replacement_wins_per_9: 0.03,
        }
    }
}

impl PitchingBaselines {
    /// League FIP plus the starter replacement gap, in runs per 9 IP.
    pub fn starter_replacement_fip(&self, runs_per_win: f64) -> f64 {
        self.league_fip + self.starter_replacement_wins_per_9 * runs_per_win
    }

    /// League FIP plus the reliever replacement gap, in runs per 9 IP.
    pub fn reliever_replacement_fip(&self, runs_per_win: f64) -> f64 {
        self.league_fip + self.reliever_replacement_wins_per_9 * runs_per_win
    }
}

/// Baserunning run values and the league totals runners are compared against.
///
/// League totals default to zero when omitted from a league file, which
/// turns off the league comparison for that component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaserunningBaselines {
    pub stolen_base_runs: f64,
    /// Reference run value of a caught stealing (negative). Sets the
    /// break-even success rate.
    pub caught_stealing_runs: f64,
    /// Runs scored per team per game. Sets the caught-stealing value in wSB.
    #[serde(default = "default_runs_per_game")]
    pub runs_per_game: f64,
    #[serde(default)]
    pub league_stolen_bases: u32,
    #[serde(default)]
    pub league_caught_stealing: u32,
    /// League `1B + BB + HBP − IBB`.
    #[serde(default)]
    pub league_steal_opportunities: u32,
    #[serde(default)]
    pub league_extra_bases_taken: u32,
    #[serde(default)]
    pub league_advancement_opportunities: u32,
    /// Runs lost per double play grounded into.
    pub gidp_run_cost: f64,
    /// League rate of double plays per double-play opportunity.
    pub league_gidp_rate: f64,
}

fn default_runs_per_game() -> f64 {
    REFERENCE_RUNS_PER_GAME
}

impl Default for BaserunningBaselines {
    fn default() -> Self {
        BaserunningBaselines {
            stolen_base_runs: 0.20,
            caught_stealing_runs: -0.45,
            runs_per_game: REFERENCE_RUNS_PER_GAME,
            league_stolen_bases: 200,
            league_caught_stealing: 60,
            league_steal_opportunities: 2150,
            league_extra_bases_taken: 300,
            league_advancement_opportunities: 1000,
            gidp_run_cost: 0.44,
            league_gidp_rate: 0.12,
        }
    }
}

impl BaserunningBaselines {
    /// League extra bases taken per advancement opportunity; `None` without
    /// tracked league opportunities.
    pub fn league_advancement_rate(&self) -> Option<f64> {
        if self.league_advancement_opportunities == 0 {
            return None;
        }
        Some(
            f64::from(self.league_extra_bases_taken)
                / f64::from(self.league_advancement_opportunities),
        )
    }
}

// ---------------------------------------------------------------------------
// Park factors
// ---------------------------------------------------------------------------

/// Batter handedness, used to pick a park's handed split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
    Switch,
}

/// Run-scoring factors for one park. 1.00 is neutral; above favors hitters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParkFactors {
    pub runs: f64,
    pub left_handed: f64,
    pub right_handed: f64,
}

impl ParkFactors {
    pub const NEUTRAL: ParkFactors = ParkFactors {
        runs: 1.0,
        left_handed: 1.0,
        right_handed: 1.0,
    };
}

// ---------------------------------------------------------------------------
// Positional adjustments
// ---------------------------------------------------------------------------

/// Positional adjustments in runs per 162 games played.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionalAdjustments {
    per_162: HashMap<FieldingPosition, f64>,
}

impl PositionalAdjustments {
    pub fn new(per_162: HashMap<FieldingPosition, f64>) -> Self {
        PositionalAdjustments { per_162 }
    }

    /// Full-season (162 game) adjustment for a position; 0.0 when absent.
    pub fn per_162(&self, position: FieldingPosition) -> f64 {
        self.per_162.get(&position).copied().unwrap_or(0.0)
    }

    /// Adjustment prorated to the games actually played at the position.
    ///
    /// `per162 × games / 162`, which equals the season-length-scaled
    /// adjustment times the playing-time share for any season length.
    pub fn for_games(&self, position: FieldingPosition, games_played: u32) -> f64 {
        self.per_162(position) * games_played as f64 / REFERENCE_SEASON_GAMES
    }

    /// Like [`for_games`](Self::for_games) but keyed by a position code.
    /// Unrecognized codes resolve to a neutral 0.0.
    pub fn for_code(&self, code: &str, games_played: u32) -> f64 {
        match FieldingPosition::from_str_pos(code) {
            Some(pos) => self.for_games(pos, games_played),
            None => {
                debug!("unknown position code '{}', using neutral adjustment", code);
                0.0
            }
        }
    }
}

impl Default for PositionalAdjustments {
    fn default() -> Self {
        let per_162 = HashMap::from([
            (FieldingPosition::Catcher, 12.5),
            (FieldingPosition::ShortStop, 7.5),
            (FieldingPosition::CenterField, 2.5),
            (FieldingPosition::SecondBase, 2.5),
            (FieldingPosition::ThirdBase, 2.5),
            (FieldingPosition::LeftField, -7.5),
            (FieldingPosition::RightField, -7.5),
            (FieldingPosition::FirstBase, -12.5),
            (FieldingPosition::DesignatedHitter, -17.5),
            (FieldingPosition::Pitcher, 0.0),
        ]);
        PositionalAdjustments { per_162 }
    }
}

// ---------------------------------------------------------------------------
// League context
// ---------------------------------------------------------------------------

/// Immutable, versioned baselines for one league season.
///
/// Built once (from config or [`LeagueContext::baseline`]) and passed by
/// reference into every calculator. Recalibration returns a new value with
/// a bumped `revision`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueContext {
    pub name: String,
    pub season_id: String,
    pub revision: u32,
    pub season_games: u32,
    pub batting: BattingBaselines,
    pub pitching: PitchingBaselines,
    pub baserunning: BaserunningBaselines,
    pub positional_adjustments: PositionalAdjustments,
    pub parks: HashMap<String, ParkFactors>,
}

impl LeagueContext {
    /// The calibrated default context for a season of `season_games` games.
    pub fn baseline(season_games: u32) -> Self {
        LeagueContext {
            name: "Baseline".into(),
            season_id: "baseline".into(),
            revision: 1,
            season_games,
            batting: BattingBaselines::default(),
            pitching: PitchingBaselines::default(),
            baserunning: BaserunningBaselines::default(),
            positional_adjustments: PositionalAdjustments::default(),
            parks: HashMap::new(),
        }
    }

    pub fn runs_per_win(&self) -> f64 {
        runs_per_win(self.season_games)
    }

    pub fn scaling(&self) -> SeasonScaling {
        SeasonScaling::for_games(self.season_games, &self.batting, &self.pitching)
    }

    /// Overall run factor for a park; unknown park ids are neutral (1.00).
    pub fn effective_park_factor(&self, park_id: &str) -> f64 {
        self.park_factors(park_id).runs
    }

    /// Park factor as seen by a batter of the given handedness.
    ///
    /// Blends the overall factor with the handed split (60/40). Switch
    /// hitters use the mean of both splits. Unknown parks are neutral.
    pub fn park_factor_for_batter(&self, park_id: &str, hand: Option<Handedness>) -> f64 {
        let park = self.park_factors(park_id);
        let split = match hand {
            None => return park.runs,
            Some(Handedness::Left) => park.left_handed,
            Some(Handedness::Right) => park.right_handed,
            Some(Handedness::Switch) => (park.left_handed + park.right_handed) / 2.0,
        };
        PARK_OVERALL_BLEND * park.runs + (1.0 - PARK_OVERALL_BLEND) * split
    }

    fn park_factors(&self, park_id: &str) -> ParkFactors {
        match self.parks.get(park_id) {
            Some(park) => *park,
            None => {
                debug!("unknown park '{}', using neutral park factor", park_id);
                ParkFactors::NEUTRAL
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
