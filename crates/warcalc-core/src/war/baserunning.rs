// Baserunning WAR: weighted stolen-base runs + extra-base advancement runs +
// double-play avoidance runs, divided by runs-per-win.

use crate::context::{BaserunningBaselines, LeagueContext};
use crate::stats::{AdvancementStats, BaserunningStats};
use crate::war::WarComponent;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Advancement run values
// ---------------------------------------------------------------------------

pub const FIRST_TO_THIRD_ON_SINGLE_RUNS: f64 = 0.40;
pub const FIRST_TO_HOME_ON_DOUBLE_RUNS: f64 = 0.45;
pub const SECOND_TO_HOME_ON_SINGLE_RUNS: f64 = 0.55;
pub const TAG_UP_ADVANCE_RUNS: f64 = 0.45;
pub const THROWN_OUT_ADVANCING_RUNS: f64 = -0.65;
pub const PICKED_OFF_RUNS: f64 = -0.45;

/// Mean run value of an extra base taken, charged against the league-expected
/// number of extra bases.
pub const AVERAGE_EXTRA_BASE_RUNS: f64 = 0.40;

/// Speed rating of an average runner.
const AVERAGE_SPEED_RATING: f64 = 50.0;

/// Plate appearances over which a speed-based estimate accrues its full value.
const SPEED_ESTIMATE_FULL_PA: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BaserunningResult {
    /// Weighted stolen-base runs.
    pub wsb: f64,
    /// Extra-base advancement runs.
    pub ubr: f64,
    /// True when `ubr` came from a speed rating (or was assumed average)
    /// rather than tracked advancement events.
    pub ubr_estimated: bool,
    /// Double-play avoidance runs.
    pub wgdp: f64,
    pub total_runs: f64,
    pub war: f64,
}

impl WarComponent for BaserunningResult {
    fn runs(&self) -> f64 {
        self.total_runs
    }

    fn war(&self) -> f64 {
        self.war
    }
}

// ---------------------------------------------------------------------------
// Stolen bases
// ---------------------------------------------------------------------------

/// Caught-stealing run value for a run environment of `runs_per_game`:
/// `−2 × (R/G / 27) − 0.075`.
pub fn caught_stealing_value(runs_per_game: f64) -> f64 {
    -2.0 * (runs_per_game / 27.0) - 0.075
}

/// Success rate at which attempting steals neither gains nor loses runs:
/// `−CS / (SB − CS)`.
pub fn stolen_base_break_even(stolen_base_runs: f64, caught_stealing_runs: f64) -> f64 {
    -caught_stealing_runs / (stolen_base_runs - caught_stealing_runs)
}

/// Whether stealing at `success_rate` gains runs under the given baselines.
pub fn is_sb_profitable(success_rate: f64, baselines: &BaserunningBaselines) -> bool {
    success_rate >= stolen_base_break_even(baselines.stolen_base_runs, baselines.caught_stealing_runs)
}

/// Stolen-base runs compared with the league rate:
/// `SB·runSB + CS·runCS − lgwSB × (1B + BB + HBP − IBB)`.
///
/// `runCS` comes from the league run environment. Without league steal
/// opportunities the raw `SB·runSB + CS·runCS` is returned.
pub fn calculate_wsb(stats: &BaserunningStats, baselines: &BaserunningBaselines) -> f64 {
    let run_cs = caught_stealing_value(baselines.runs_per_game);
    let player_runs = f64::from(stats.stolen_bases) * baselines.stolen_base_runs
        + f64::from(stats.caught_stealing) * run_cs;
    if baselines.league_steal_opportunities == 0 {
        return player_runs;
    }
    let league_runs = f64::from(baselines.league_stolen_bases) * baselines.stolen_base_runs
        + f64::from(baselines.league_caught_stealing) * run_cs;
    let league_rate = league_runs / f64::from(baselines.league_steal_opportunities);
    player_runs - league_rate * f64::from(stats.steal_opportunities)
}

// ---------------------------------------------------------------------------
// Advancement
// ---------------------------------------------------------------------------

/// Runs from tracked extra-base advancement events, less the runs an average
/// runner would have taken from the same opportunities.
///
/// The league expectation is skipped when either side has no tracked
/// opportunities.
pub fn calculate_ubr(advancement: &AdvancementStats, baselines: &BaserunningBaselines) -> f64 {
    let earned = f64::from(advancement.first_to_third_on_single) * FIRST_TO_THIRD_ON_SINGLE_RUNS
        + f64::from(advancement.first_to_home_on_double) * FIRST_TO_HOME_ON_DOUBLE_RUNS
        + f64::from(advancement.second_to_home_on_single) * SECOND_TO_HOME_ON_SINGLE_RUNS
        + f64::from(advancement.tag_ups_advanced) * TAG_UP_ADVANCE_RUNS
        + f64::from(advancement.thrown_out_advancing) * THROWN_OUT_ADVANCING_RUNS
        + f64::from(advancement.picked_off) * PICKED_OFF_RUNS;
    match baselines.league_advancement_rate() {
        Some(rate) if advancement.advancement_opportunities > 0 => {
            let expected = f64::from(advancement.advancement_opportunities) * rate;
            earned - expected * AVERAGE_EXTRA_BASE_RUNS
        }
        _ => earned,
    }
}

/// Advancement runs estimated from a 0–100 speed rating:
/// `(speed − 50) / 20 × PA / 200`.
pub fn estimate_ubr(speed_rating: u8, plate_appearances: u32) -> f64 {
    (f64::from(speed_rating) - AVERAGE_SPEED_RATING) / 20.0 * f64::from(plate_appearances)
        / SPEED_ESTIMATE_FULL_PA
}

// ---------------------------------------------------------------------------
// Double plays
// ---------------------------------------------------------------------------

/// Double-play avoidance runs: `(opportunities × league rate − GIDP) × cost`.
///
/// Without tracked opportunities every GIDP is charged in full.
pub fn calculate_wgdp(stats: &BaserunningStats, baselines: &BaserunningBaselines) -> f64 {
    let expected = f64::from(stats.double_play_opportunities) * baselines.league_gidp_rate;
    (expected - f64::from(stats.grounded_into_double_play)) * baselines.gidp_run_cost.abs()
}

// ---------------------------------------------------------------------------
// rWAR
// ---------------------------------------------------------------------------

/// Baserunning WAR. Tracked advancement wins over a speed estimate; with
/// neither, advancement is assumed average (0).
pub fn calculate_rwar(stats: &BaserunningStats, ctx: &LeagueContext) -> BaserunningResult {
    let wsb = calculate_wsb(stats, &ctx.baserunning);
    let (ubr, ubr_estimated) = match (stats.advancement.as_ref(), stats.speed_rating) {
        (Some(advancement), _) => (calculate_ubr(advancement, &ctx.baserunning), false),
        (None, Some(speed)) => (estimate_ubr(speed, stats.plate_appearances), true),
        (None, None) => (0.0, true),
    };
    let wgdp = calculate_wgdp(stats, &ctx.baserunning);
    let total_runs = wsb + ubr + wgdp;

    BaserunningResult {
        wsb,
        ubr,
        ubr_estimated,
        wgdp,
        total_runs,
        war: total_runs / ctx.runs_per_win(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn break_even_near_sixty_nine_percent() {
        let baselines = BaserunningBaselines::default();
        let rate = stolen_base_break_even(baselines.stolen_base_runs, baselines.caught_stealing_runs);
        assert!(approx_eq(rate, 0.45 / 0.65, 1e-12));
        assert!(is_sb_profitable(0.70, &baselines));
        assert!(!is_sb_profitable(0.68, &baselines));
    }

    #[test]
    fn caught_stealing_value_tracks_run_environment() {
        assert!(approx_eq(caught_stealing_value(4.5), -2.0 * 4.5 / 27.0 - 0.075, 1e-12));
        assert!(caught_stealing_value(6.0) < caught_stealing_value(3.0));
    }

    fn untracked_league() -> BaserunningBaselines {
        BaserunningBaselines {
            league_steal_opportunities: 0,
            league_advancement_opportunities: 0,
            ..BaserunningBaselines::default()
        }
    }

    #[test]
    fn wsb_raw_runs_without_league_opportunities() {
        let stats = BaserunningStats {
            stolen_bases: 10,
            caught_stealing: 3,
            steal_opportunities: 80,
            ..BaserunningStats::default()
        };
        let baselines = BaserunningBaselines {
            runs_per_game: 9.0,
            ..untracked_league()
        };
        // The caught-stealing value follows the run environment, not the
        // fixed break-even reference.
        let expected = 10.0 * 0.20 + 3.0 * caught_stealing_value(9.0);
        assert!(approx_eq(calculate_wsb(&stats, &baselines), expected, 1e-12));
        assert!(approx_eq(caught_stealing_value(9.0), -0.741_666_666, 1e-6));
    }

    #[test]
    fn wsb_subtracts_league_rate_per_opportunity() {
        let baselines = BaserunningBaselines::default();
        let run_cs = caught_stealing_value(4.8);
        let league_rate = (200.0 * 0.20 + 60.0 * run_cs) / 2150.0;

        let stats = BaserunningStats {
            stolen_bases: 10,
            caught_stealing: 3,
            steal_opportunities: 80,
            ..BaserunningStats::default()
        };
        let expected = 10.0 * 0.20 + 3.0 * run_cs - league_rate * 80.0;
        assert!(approx_eq(calculate_wsb(&stats, &baselines), expected, 1e-12));

        // A runner who never runs gives back the league's stolen-base value.
        let station_to_station = BaserunningStats {
            steal_opportunities: 80,
            ..BaserunningStats::default()
        };
        assert!(calculate_wsb(&station_to_station, &baselines) < 0.0);
    }

    #[test]
    fn ubr_at_league_rate_is_zero() {
        // League rate is 300 / 1000 = 0.3 extra bases per opportunity.
        let advancement = AdvancementStats {
            first_to_third_on_single: 3,
            advancement_opportunities: 10,
            ..AdvancementStats::default()
        };
        let ubr = calculate_ubr(&advancement, &BaserunningBaselines::default());
        assert!(approx_eq(ubr, 0.0, 1e-9), "ubr = {ubr}");
    }

    #[test]
    fn ubr_below_league_rate_is_negative() {
        let advancement = AdvancementStats {
            first_to_third_on_single: 5,
            advancement_opportunities: 40,
            ..AdvancementStats::default()
        };
        let ubr = calculate_ubr(&advancement, &BaserunningBaselines::default());
        assert!(approx_eq(ubr, 5.0 * 0.40 - 40.0 * 0.3 * 0.40, 1e-9));
        assert!(ubr < 0.0);
    }

    #[test]
    fn ubr_skips_expectation_without_opportunities() {
        let advancement = AdvancementStats {
            first_to_third_on_single: 5,
            ..AdvancementStats::default()
        };
        assert!(approx_eq(
            calculate_ubr(&advancement, &BaserunningBaselines::default()),
            2.0,
            1e-12
        ));
        let tracked = AdvancementStats {
            advancement_opportunities: 40,
            ..advancement
        };
        assert!(approx_eq(calculate_ubr(&tracked, &untracked_league()), 2.0, 1e-12));
    }

    #[test]
    fn components_zero_without_their_counts() {
        let ctx = LeagueContext::baseline(50);
        let result = calculate_rwar(&BaserunningStats::default(), &ctx);
        assert_eq!(result.wsb, 0.0);
        assert_eq!(result.ubr, 0.0);
        assert_eq!(result.wgdp, 0.0);
        assert_eq!(result.war, 0.0);
    }

    #[test]
    fn tracked_advancement_preferred_over_speed() {
        let stats = BaserunningStats {
            plate_appearances: 200,
            advancement: Some(AdvancementStats {
                first_to_third_on_single: 3,
                thrown_out_advancing: 1,
                ..AdvancementStats::default()
            }),
            speed_rating: Some(90),
            ..BaserunningStats::default()
        };
        let result = calculate_rwar(&stats, &LeagueContext::baseline(50));
        assert!(!result.ubr_estimated);
        assert!(approx_eq(result.ubr, 3.0 * 0.40 - 0.65, 1e-12));
    }

    #[test]
    fn speed_estimate_scales_with_playing_time() {
        assert!(approx_eq(estimate_ubr(90, 200), 2.0, 1e-12));
        assert!(approx_eq(estimate_ubr(90, 100), 1.0, 1e-12));
        assert!(approx_eq(estimate_ubr(30, 200), -1.0, 1e-12));
        assert_eq!(estimate_ubr(50, 200), 0.0);
    }

    #[test]
    fn untracked_runner_flagged_estimated() {
        let stats = BaserunningStats {
            plate_appearances: 150,
            ..BaserunningStats::default()
        };
        let result = calculate_rwar(&stats, &LeagueContext::baseline(50));
        assert!(result.ubr_estimated);
        assert_eq!(result.ubr, 0.0);
    }

    #[test]
    fn wgdp_rewards_avoidance() {
        let baselines = BaserunningBaselines::default();
        let avoider = BaserunningStats {
            double_play_opportunities: 50,
            grounded_into_double_play: 2,
            ..BaserunningStats::default()
        };
        let hitter = BaserunningStats {
            double_play_opportunities: 50,
            grounded_into_double_play: 10,
            ..BaserunningStats::default()
        };
        assert!(approx_eq(calculate_wgdp(&avoider, &baselines), (6.0 - 2.0) * 0.44, 1e-12));
        assert!(calculate_wgdp(&hitter, &baselines) < 0.0);
    }

    #[test]
    fn wgdp_without_opportunities_charges_every_gidp() {
        let stats = BaserunningStats {
            grounded_into_double_play: 3,
            ..BaserunningStats::default()
        };
        assert!(approx_eq(
            calculate_wgdp(&stats, &BaserunningBaselines::default()),
            -3.0 * 0.44,
            1e-12
        ));
    }

    #[test]
    fn war_is_total_over_runs_per_win() {
        let ctx = LeagueContext::baseline(81);
        let stats = BaserunningStats {
            plate_appearances: 300,
            stolen_bases: 20,
            caught_stealing: 4,
            grounded_into_double_play: 5,
            double_play_opportunities: 60,
            steal_opportunities: 70,
            advancement: None,
            speed_rating: Some(70),
        };
        let result = calculate_rwar(&stats, &ctx);
        assert!(approx_eq(result.total_runs, result.wsb + result.ubr + result.wgdp, 1e-12));
        assert!(approx_eq(result.war, result.total_runs / 5.0, 1e-12));
    }
}
