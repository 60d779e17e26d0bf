// Batting WAR: wOBA → wRAA → park and replacement adjustments → wins.

use crate::context::{BattingBaselines, LeagueContext, WobaWeights};
use crate::stats::BattingStats;
use crate::war::{PlayerContext, WarComponent};
use serde::Serialize;

/// Intermediate and final values of one batting WAR calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BattingResult {
    pub woba: f64,
    /// Weighted runs above average.
    pub wraa: f64,
    pub park_adjustment: f64,
    /// wRAA plus park adjustment.
    pub batting_runs: f64,
    pub replacement_runs: f64,
    pub runs_above_replacement: f64,
    pub war: f64,
}

impl BattingResult {
    const ZERO: BattingResult = BattingResult {
        woba: 0.0,
        wraa: 0.0,
        park_adjustment: 0.0,
        batting_runs: 0.0,
        replacement_runs: 0.0,
        runs_above_replacement: 0.0,
        war: 0.0,
    };
}

impl WarComponent for BattingResult {
    fn runs(&self) -> f64 {
        self.runs_above_replacement
    }

    fn war(&self) -> f64 {
        self.war
    }
}

// ---------------------------------------------------------------------------
// wOBA
// ---------------------------------------------------------------------------

/// Weighted on-base average.
///
/// `(wBB·uBB + wHBP·HBP + w1B·1B + w2B·2B + w3B·3B + wHR·HR) / (AB + uBB + SF + HBP)`.
/// An empty denominator (no PA, or only intentional walks and sacrifice
/// bunts) is defined as 0. Not clamped: an all-home-run line exceeds 1.0.
pub fn calculate_woba(stats: &BattingStats, weights: &WobaWeights) -> f64 {
    let ubb = stats.unintentional_walks();
    let numerator = weights.unintentional_walk * ubb
        + weights.hit_by_pitch * f64::from(stats.hit_by_pitch)
        + weights.single * f64::from(stats.singles)
        + weights.double * f64::from(stats.doubles)
        + weights.triple * f64::from(stats.triples)
        + weights.home_run * f64::from(stats.home_runs);
    let denominator = f64::from(stats.at_bats)
        + ubb
        + f64::from(stats.sacrifice_flies)
        + f64::from(stats.hit_by_pitch);
    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}

/// Weighted runs above average: `(wOBA − lgwOBA) / wOBA scale × PA`.
pub fn calculate_wraa(woba: f64, plate_appearances: u32, baselines: &BattingBaselines) -> f64 {
    (woba - baselines.league_woba) / baselines.woba_scale * f64::from(plate_appearances)
}

/// Runs credited for playing home games in a park with factor `park_factor`.
///
/// `(runs/PA − PF × runs/PA) × home PA`: positive in pitcher's parks,
/// negative in hitter's parks.
pub fn park_adjustment(park_factor: f64, runs_per_pa: f64, home_plate_appearances: f64) -> f64 {
    (runs_per_pa - park_factor * runs_per_pa) * home_plate_appearances
}

/// League wOBA implied by league-wide batting totals.
pub fn league_woba_from_totals(totals: &BattingStats, weights: &WobaWeights) -> f64 {
    calculate_woba(totals, weights)
}

impl LeagueContext {
    /// A new context whose league wOBA is recomputed from league totals.
    /// Totals with no plate appearances leave the context unchanged.
    pub fn with_league_woba_from(&self, totals: &BattingStats) -> LeagueContext {
        let mut next = self.clone();
        if totals.plate_appearances == 0 {
            return next;
        }
        next.batting.league_woba = league_woba_from_totals(totals, &self.batting.woba_weights);
        next.revision += 1;
        next
    }
}

// ---------------------------------------------------------------------------
// bWAR
// ---------------------------------------------------------------------------

/// Batting WAR for one player-season. Zero PA yields exactly 0.
pub fn calculate_bwar(
    stats: &BattingStats,
    ctx: &LeagueContext,
    player: &PlayerContext,
) -> BattingResult {
    if stats.plate_appearances == 0 {
        return BattingResult::ZERO;
    }

    let woba = calculate_woba(stats, &ctx.batting.woba_weights);
    let wraa = calculate_wraa(woba, stats.plate_appearances, &ctx.batting);

    let park_adjustment = match player.park_id.as_deref() {
        Some(park_id) => {
            let factor = ctx.park_factor_for_batter(park_id, player.handedness);
            let home_pa = player
                .home_plate_appearances
                .map(f64::from)
                .unwrap_or_else(|| f64::from(stats.plate_appearances) / 2.0);
            park_adjustment(factor, ctx.batting.runs_per_pa, home_pa)
        }
        None => 0.0,
    };

    let batting_runs = wraa + park_adjustment;
    let replacement_runs = ctx
        .scaling()
        .replacement_runs(f64::from(stats.plate_appearances));
    let runs_above_replacement = batting_runs + replacement_runs;

    BattingResult {
        woba,
        wraa,
        park_adjustment,
        batting_runs,
        replacement_runs,
        runs_above_replacement,
        war: runs_above_replacement / ctx.runs_per_win(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ParkFactors;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn average_line() -> BattingStats {
        BattingStats {
            plate_appearances: 200,
            at_bats: 183,
            singles: 38,
            doubles: 9,
            triples: 1,
            home_runs: 5,
            walks: 11,
            intentional_walks: 0,
            hit_by_pitch: 2,
            sacrifice_flies: 4,
            sacrifice_hits: 0,
            strikeouts: 40,
        }
    }

    #[test]
    fn woba_hand_computed() {
        let woba = calculate_woba(&average_line(), &WobaWeights::default());
        // (0.521·11 + 0.566·2 + 0.797·38 + 1.332·9 + 1.813 + 2.495·5) / 200
        assert!(approx_eq(woba, 63.425 / 200.0, 1e-9));
    }

    #[test]
    fn woba_excludes_intentional_walks() {
        let mut stats = average_line();
        stats.walks = 15;
        stats.intentional_walks = 4;
        let woba = calculate_woba(&stats, &WobaWeights::default());
        assert!(approx_eq(woba, 63.425 / 200.0, 1e-9));
    }

    #[test]
    fn zero_pa_is_exactly_zero() {
        let result = calculate_bwar(
            &BattingStats::default(),
            &LeagueContext::baseline(50),
            &PlayerContext::default(),
        );
        assert_eq!(result.woba, 0.0);
        assert_eq!(result.war, 0.0);
    }

    #[test]
    fn all_walk_line_does_not_divide_by_zero() {
        let stats = BattingStats {
            plate_appearances: 10,
            walks: 10,
            ..BattingStats::default()
        };
        let result = calculate_bwar(&stats, &LeagueContext::baseline(50), &PlayerContext::default());
        assert!(approx_eq(result.woba, 0.521, 1e-12));
        assert!(result.war.is_finite());
    }

    #[test]
    fn only_intentional_walks_define_woba_as_zero() {
        let stats = BattingStats {
            plate_appearances: 3,
            walks: 3,
            intentional_walks: 3,
            ..BattingStats::default()
        };
        assert_eq!(calculate_woba(&stats, &WobaWeights::default()), 0.0);
    }

    #[test]
    fn all_strikeouts_strongly_negative() {
        let stats = BattingStats {
            plate_appearances: 100,
            at_bats: 100,
            strikeouts: 100,
            ..BattingStats::default()
        };
        let result = calculate_bwar(&stats, &LeagueContext::baseline(50), &PlayerContext::default());
        assert_eq!(result.woba, 0.0);
        assert!(result.war < -3.0, "war = {}", result.war);
        assert!(result.war.is_finite());
    }

    #[test]
    fn all_home_runs_not_clamped() {
        let stats = BattingStats {
            plate_appearances: 50,
            at_bats: 50,
            home_runs: 50,
            ..BattingStats::default()
        };
        let result = calculate_bwar(&stats, &LeagueContext::baseline(50), &PlayerContext::default());
        assert!(approx_eq(result.woba, 2.495, 1e-12));
        assert!(result.war > 10.0);
        assert!(result.war.is_finite());
    }

    #[test]
    fn replacement_runs_scaled_to_pa_share() {
        let result = calculate_bwar(&average_line(), &LeagueContext::baseline(50), &PlayerContext::default());
        assert!(approx_eq(result.replacement_runs, 4.0, 1e-9));
    }

    #[test]
    fn average_hitter_in_fifty_game_season() {
        let result = calculate_bwar(&average_line(), &LeagueContext::baseline(50), &PlayerContext::default());
        assert!((-2.0..=2.0).contains(&result.war), "war = {}", result.war);
    }

    #[test]
    fn hitters_park_reduces_value() {
        let mut ctx = LeagueContext::baseline(50);
        ctx.parks.insert(
            "coors-like".into(),
            ParkFactors {
                runs: 1.20,
                left_handed: 1.20,
                right_handed: 1.20,
            },
        );
        let neutral = calculate_bwar(&average_line(), &ctx, &PlayerContext::default());
        let player = PlayerContext {
            park_id: Some("coors-like".into()),
            ..PlayerContext::default()
        };
        let hitters_park = calculate_bwar(&average_line(), &ctx, &player);
        assert!(hitters_park.park_adjustment < 0.0);
        assert!(hitters_park.war < neutral.war);
    }

    #[test]
    fn unknown_park_has_no_adjustment() {
        let player = PlayerContext {
            park_id: Some("unlisted".into()),
            ..PlayerContext::default()
        };
        let result = calculate_bwar(&average_line(), &LeagueContext::baseline(50), &player);
        assert_eq!(result.park_adjustment, 0.0);
    }

    #[test]
    fn explicit_home_pa_overrides_half_split() {
        assert!(approx_eq(park_adjustment(0.9, 0.1, 100.0), 1.0, 1e-12));
    }

    #[test]
    fn league_woba_recalibration_bumps_revision() {
        let ctx = LeagueContext::baseline(50);
        let next = ctx.with_league_woba_from(&average_line());
        assert_eq!(next.revision, ctx.revision + 1);
        assert!(approx_eq(next.batting.league_woba, 63.425 / 200.0, 1e-9));
        assert_eq!(ctx.batting.league_woba, 0.329);

        let unchanged = ctx.with_league_woba_from(&BattingStats::default());
        assert_eq!(unchanged, ctx);
    }

    #[test]
    fn nan_park_factor_propagates() {
        let mut ctx = LeagueContext::baseline(50);
        ctx.parks.insert(
            "broken".into(),
            ParkFactors {
                runs: f64::NAN,
                left_handed: 1.0,
                right_handed: 1.0,
            },
        );
        let player = PlayerContext {
            park_id: Some("broken".into()),
            ..PlayerContext::default()
        };
        assert!(calculate_bwar(&average_line(), &ctx, &player).war.is_nan());
    }

    #[test]
    fn repeated_calls_are_identical() {
        let ctx = LeagueContext::baseline(50);
        let a = calculate_bwar(&average_line(), &ctx, &PlayerContext::default());
        let b = calculate_bwar(&average_line(), &ctx, &PlayerContext::default());
        assert_eq!(a.war.to_bits(), b.war.to_bits());
    }
}
