// Wins Above Replacement: the four component calculators, their batch entry
// points, and the combined per-player season total.

pub mod baserunning;
pub mod batting;
pub mod fielding;
pub mod pitching;

use crate::context::{season_fraction, Handedness, LeagueContext};
use crate::stats::{BaserunningStats, BattingStats, PitchingStats};
use baserunning::{calculate_rwar, BaserunningResult};
use batting::{calculate_bwar, BattingResult};
use fielding::{calculate_fwar, calculate_fwar_from_counts, FieldingResult, FieldingSeason, FieldingStats};
use pitching::{calculate_pwar, PitchingResult};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Common shape of every component result.
pub trait WarComponent {
    /// Runs above replacement (or above average, for fielding and
    /// baserunning) before conversion to wins.
    fn runs(&self) -> f64;
    fn war(&self) -> f64;
}

/// Per-player inputs that are not counting stats.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerContext {
    /// Home park, looked up in the league's park table.
    pub park_id: Option<String>,
    pub handedness: Option<Handedness>,
    /// Home-park plate appearances; defaults to half of all PA.
    pub home_plate_appearances: Option<u32>,
}

/// One player's input to a batch calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord<S> {
    pub player_id: String,
    #[serde(default)]
    pub player: PlayerContext,
    pub stats: S,
}

impl<S> PlayerRecord<S> {
    pub fn new(player_id: impl Into<String>, stats: S) -> Self {
        PlayerRecord {
            player_id: player_id.into(),
            player: PlayerContext::default(),
            stats,
        }
    }
}

/// One player's output from a batch calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerWar<R> {
    pub player_id: String,
    pub result: R,
}

// ---------------------------------------------------------------------------
// Batch entry points
// ---------------------------------------------------------------------------

/// Map `calculate` over every record in parallel, preserving input order.
/// Non-finite WAR is logged as a data-quality warning and returned as-is.
fn calculate_batch<S, R, F>(records: &[PlayerRecord<S>], calculate: F) -> Vec<PlayerWar<R>>
where
    S: Sync,
    R: WarComponent + Send,
    F: Fn(&PlayerRecord<S>) -> R + Sync,
{
    debug!("calculating WAR for {} players", records.len());
    records
        .par_iter()
        .map(|record| {
            let result = calculate(record);
            if !result.war().is_finite() {
                warn!(
                    "non-finite WAR for player {}: {}",
                    record.player_id,
                    result.war()
                );
            }
            PlayerWar {
                player_id: record.player_id.clone(),
                result,
            }
        })
        .collect()
}

pub fn calculate_bwar_batch(
    records: &[PlayerRecord<BattingStats>],
    ctx: &LeagueContext,
) -> Vec<PlayerWar<BattingResult>> {
    calculate_batch(records, |r| calculate_bwar(&r.stats, ctx, &r.player))
}

pub fn calculate_pwar_batch(
    records: &[PlayerRecord<PitchingStats>],
    ctx: &LeagueContext,
) -> Vec<PlayerWar<PitchingResult>> {
    calculate_batch(records, |r| calculate_pwar(&r.stats, ctx, &r.player))
}

pub fn calculate_fwar_batch(
    records: &[PlayerRecord<FieldingSeason>],
    ctx: &LeagueContext,
) -> Vec<PlayerWar<FieldingResult>> {
    calculate_batch(records, |r| calculate_fwar(&r.stats, ctx))
}

/// Fielding batch for leagues that only keep season totals.
pub fn calculate_fwar_from_counts_batch(
    records: &[PlayerRecord<FieldingStats>],
    ctx: &LeagueContext,
) -> Vec<PlayerWar<FieldingResult>> {
    calculate_batch(records, |r| calculate_fwar_from_counts(&r.stats, ctx))
}

pub fn calculate_rwar_batch(
    records: &[PlayerRecord<BaserunningStats>],
    ctx: &LeagueContext,
) -> Vec<PlayerWar<BaserunningResult>> {
    calculate_batch(records, |r| calculate_rwar(&r.stats, ctx))
}

// ---------------------------------------------------------------------------
// Combined season WAR
// ---------------------------------------------------------------------------

/// Fielding input: a per-play log when the league tracks one, otherwise
/// counting totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldingInput {
    Events(FieldingSeason),
    Counts(FieldingStats),
}

/// Every stat line a player compiled in one season. Absent components
/// contribute nothing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerSeason {
    pub batting: Option<BattingStats>,
    pub pitching: Option<PitchingStats>,
    pub fielding: Option<FieldingInput>,
    pub baserunning: Option<BaserunningStats>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeasonWar {
    pub batting: Option<BattingResult>,
    pub pitching: Option<PitchingResult>,
    pub fielding: Option<FieldingResult>,
    pub baserunning: Option<BaserunningResult>,
    pub total: f64,
}

impl WarComponent for SeasonWar {
    fn runs(&self) -> f64 {
        self.batting.map_or(0.0, |r| r.runs())
            + self.pitching.map_or(0.0, |r| r.runs())
            + self.fielding.map_or(0.0, |r| r.runs())
            + self.baserunning.map_or(0.0, |r| r.runs())
    }

    fn war(&self) -> f64 {
        self.total
    }
}

pub fn calculate_season_war(
    season: &PlayerSeason,
    ctx: &LeagueContext,
    player: &PlayerContext,
) -> SeasonWar {
    let batting = season
        .batting
        .as_ref()
        .map(|stats| calculate_bwar(stats, ctx, player));
    let pitching = season
        .pitching
        .as_ref()
        .map(|stats| calculate_pwar(stats, ctx, player));
    let fielding = season.fielding.as_ref().map(|input| match input {
        FieldingInput::Events(events) => calculate_fwar(events, ctx),
        FieldingInput::Counts(counts) => calculate_fwar_from_counts(counts, ctx),
    });
    let baserunning = season.baserunning.as_ref().map(|stats| {
        // Untracked steal opportunities come from the batting line.
        match (stats.steal_opportunities, season.batting.as_ref()) {
            (0, Some(batting)) => {
                let filled = BaserunningStats {
                    steal_opportunities: u32::try_from(batting.times_on_first())
                        .unwrap_or(u32::MAX),
                    ..*stats
                };
                calculate_rwar(&filled, ctx)
            }
            _ => calculate_rwar(stats, ctx),
        }
    });

    let total = batting.map_or(0.0, |r| r.war)
        + pitching.map_or(0.0, |r| r.war)
        + fielding.map_or(0.0, |r| r.war)
        + baserunning.map_or(0.0, |r| r.war);

    SeasonWar {
        batting,
        pitching,
        fielding,
        baserunning,
        total,
    }
}

pub fn calculate_season_war_batch(
    records: &[PlayerRecord<PlayerSeason>],
    ctx: &LeagueContext,
) -> Vec<PlayerWar<SeasonWar>> {
    calculate_batch(records, |r| calculate_season_war(&r.stats, ctx, &r.player))
}

// ---------------------------------------------------------------------------
// Grades
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WarGrade {
    ReplacementLevel,
    RolePlayer,
    Starter,
    AllStar,
    Superstar,
}

impl WarGrade {
    pub fn display_str(&self) -> &'static str {
        match self {
            WarGrade::ReplacementLevel => "Replacement Level",
            WarGrade::RolePlayer => "Role Player",
            WarGrade::Starter => "Starter",
            WarGrade::AllStar => "All-Star",
            WarGrade::Superstar => "Superstar",
        }
    }
}

impl fmt::Display for WarGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_str())
    }
}

/// Grade a season total. Thresholds of 8 / 5 / 2 / 0 WAR over 162 games
/// scale with season length.
pub fn war_grade(war: f64, season_games: u32) -> WarGrade {
    let fraction = season_fraction(season_games);
    if war >= 8.0 * fraction {
        WarGrade::Superstar
    } else if war >= 5.0 * fraction {
        WarGrade::AllStar
    } else if war >= 2.0 * fraction {
        WarGrade::Starter
    } else if war >= 0.0 {
        WarGrade::RolePlayer
    } else {
        WarGrade::ReplacementLevel
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::FieldingPosition;

    fn hitter() -> BattingStats {
        BattingStats {
            plate_appearances: 220,
            at_bats: 195,
            singles: 40,
            doubles: 12,
            triples: 2,
            home_runs: 9,
            walks: 20,
            intentional_walks: 1,
            hit_by_pitch: 2,
            sacrifice_flies: 3,
            sacrifice_hits: 0,
            strikeouts: 45,
        }
    }

    #[test]
    fn batch_preserves_order_and_matches_single() {
        let ctx = LeagueContext::baseline(50);
        let records: Vec<_> = (0..64)
            .map(|i| {
                let mut stats = hitter();
                stats.home_runs = i % 12;
                PlayerRecord::new(format!("p{i}"), stats)
            })
            .collect();
        let batch = calculate_bwar_batch(&records, &ctx);
        assert_eq!(batch.len(), records.len());
        for (record, out) in records.iter().zip(&batch) {
            assert_eq!(record.player_id, out.player_id);
            let single = calculate_bwar(&record.stats, &ctx, &record.player);
            assert_eq!(single, out.result);
        }
    }

    #[test]
    fn empty_batch() {
        let ctx = LeagueContext::baseline(50);
        assert!(calculate_rwar_batch(&[], &ctx).is_empty());
    }

    #[test]
    fn season_total_sums_present_components() {
        let ctx = LeagueContext::baseline(50);
        let season = PlayerSeason {
            batting: Some(hitter()),
            fielding: Some(FieldingInput::Counts(FieldingStats {
                position: Some(FieldingPosition::ShortStop),
                games_played: 48,
                putouts: 70,
                assists: 130,
                errors: 6,
                double_plays: 25,
            })),
            baserunning: Some(BaserunningStats {
                plate_appearances: 220,
                stolen_bases: 8,
                caught_stealing: 2,
                ..BaserunningStats::default()
            }),
            ..PlayerSeason::default()
        };
        let result = calculate_season_war(&season, &ctx, &PlayerContext::default());
        assert!(result.pitching.is_none());
        let expected = result.batting.map_or(0.0, |r| r.war)
            + result.fielding.map_or(0.0, |r| r.war)
            + result.baserunning.map_or(0.0, |r| r.war);
        assert_eq!(result.total, expected);
    }

    #[test]
    fn season_baserunning_takes_steal_opportunities_from_batting() {
        let ctx = LeagueContext::baseline(50);
        let running = BaserunningStats {
            stolen_bases: 8,
            caught_stealing: 2,
            ..BaserunningStats::default()
        };
        let season = PlayerSeason {
            batting: Some(hitter()),
            baserunning: Some(running),
            ..PlayerSeason::default()
        };
        let result = calculate_season_war(&season, &ctx, &PlayerContext::default());
        let filled = BaserunningStats {
            steal_opportunities: hitter().times_on_first() as u32,
            ..running
        };
        let wsb = result.baserunning.map(|r| r.wsb);
        assert_eq!(wsb, Some(calculate_rwar(&filled, &ctx).wsb));
        assert!(wsb < Some(calculate_rwar(&running, &ctx).wsb));
    }

    #[test]
    fn empty_season_is_zero() {
        let result = calculate_season_war(
            &PlayerSeason::default(),
            &LeagueContext::baseline(50),
            &PlayerContext::default(),
        );
        assert_eq!(result.total, 0.0);
        assert_eq!(result.runs(), 0.0);
    }

    #[test]
    fn grades_scale_with_season_length() {
        assert_eq!(war_grade(8.0, 162), WarGrade::Superstar);
        assert_eq!(war_grade(5.5, 162), WarGrade::AllStar);
        assert_eq!(war_grade(3.0, 162), WarGrade::Starter);
        assert_eq!(war_grade(0.5, 162), WarGrade::RolePlayer);
        assert_eq!(war_grade(-0.1, 162), WarGrade::ReplacementLevel);
        // 3 WAR in 81 games is a 6-WAR pace.
        assert_eq!(war_grade(3.0, 81), WarGrade::AllStar);
    }

    #[test]
    fn season_record_from_json() {
        let json = r#"{
            "player_id": "ss-01",
            "stats": {
                "fielding": {
                    "Counts": {
                        "position": "ShortStop",
                        "games_played": 50,
                        "putouts": 70,
                        "assists": 140,
                        "errors": 6,
                        "double_plays": 28
                    }
                }
            }
        }"#;
        let record: PlayerRecord<PlayerSeason> = serde_json::from_str(json).unwrap();
        assert_eq!(record.player, PlayerContext::default());
        assert!(record.stats.batting.is_none());

        let ctx = LeagueContext::baseline(50);
        let result = calculate_season_war(&record.stats, &ctx, &record.player);
        let fielding = result.fielding.unwrap();
        assert!(fielding.positional_adjustment > 0.0);
        assert_eq!(result.total, fielding.war);

        let out = serde_json::to_value(result).unwrap();
        assert!(out["batting"].is_null());
        assert!(out["fielding"]["war"].is_number());
    }
}
