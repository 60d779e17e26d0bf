// Pitching WAR from FIP, with role-aware replacement level and leverage
// credit for relievers.

use crate::context::{LeagueContext, PitchingBaselines};
use crate::leverage::{estimate_gm_li, RelieverRole};
use crate::stats::PitchingStats;
use crate::war::{PlayerContext, WarComponent};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Starter share (GS / G) at or above which a pitcher is a starter.
pub const STARTER_SHARE_THRESHOLD: f64 = 0.8;

/// Starter share at or below which a pitcher is a reliever.
pub const RELIEVER_SHARE_THRESHOLD: f64 = 0.2;

/// Pitcher-specific runs-per-win stays within this band of the league value.
const PITCHER_RPW_MIN_RATIO: f64 = 0.9;
const PITCHER_RPW_MAX_RATIO: f64 = 1.1;

/// League totals below this many innings are too small to recalibrate from.
const MIN_RECALIBRATION_OUTS: u32 = 300;

/// Weight given to new league data when recalibrating.
pub const DEFAULT_RECALIBRATION_BLEND: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitcherRole {
    Starter,
    Reliever,
    Swingman,
}

impl PitcherRole {
    pub fn display_str(&self) -> &'static str {
        match self {
            PitcherRole::Starter => "SP",
            PitcherRole::Reliever => "RP",
            PitcherRole::Swingman => "SW",
        }
    }
}

impl fmt::Display for PitcherRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PitchingResult {
    pub innings_pitched: f64,
    pub fip: f64,
    pub park_adjusted_fip: f64,
    pub role: PitcherRole,
    pub starter_share: f64,
    pub replacement_fip: f64,
    pub pitcher_runs_per_win: f64,
    /// gmLI used for the leverage multiplier (relievers only).
    pub gm_li: Option<f64>,
    pub leverage_multiplier: f64,
    pub runs_above_replacement: f64,
    pub war: f64,
}

impl WarComponent for PitchingResult {
    fn runs(&self) -> f64 {
        self.runs_above_replacement
    }

    fn war(&self) -> f64 {
        self.war
    }
}

// ---------------------------------------------------------------------------
// FIP
// ---------------------------------------------------------------------------

/// The FIP numerator before dividing by IP: `13·HR + 3·(BB + HBP) − 2·K`.
fn fip_core(stats: &PitchingStats) -> f64 {
    13.0 * f64::from(stats.home_runs_allowed)
        + 3.0 * (f64::from(stats.walks) + f64::from(stats.hit_by_pitch))
        - 2.0 * f64::from(stats.strikeouts)
}

/// Fielding independent pitching; 0 when no outs were recorded.
pub fn calculate_fip(stats: &PitchingStats, fip_constant: f64) -> f64 {
    let ip = stats.innings_pitched();
    if ip == 0.0 {
        return 0.0;
    }
    fip_core(stats) / ip + fip_constant
}

/// FIP constant that makes league FIP equal league ERA for these totals.
/// Returns `league_era` unchanged when the totals have no innings.
pub fn fip_constant_from_totals(totals: &PitchingStats, league_era: f64) -> f64 {
    let ip = totals.innings_pitched();
    if ip == 0.0 {
        return league_era;
    }
    league_era - fip_core(totals) / ip
}

/// Divide out the home park's run environment (half of games at home).
pub fn park_adjusted_fip(fip: f64, park_factor: f64) -> f64 {
    fip / ((1.0 + park_factor) / 2.0)
}

impl LeagueContext {
    /// A new context with ERA, FIP and the FIP constant blended toward the
    /// values implied by league pitching totals.
    ///
    /// `blend` is the weight of the new data (0 keeps the current values).
    /// Totals under 100 innings leave the context unchanged.
    pub fn with_recalibrated_pitching(&self, totals: &PitchingStats, blend: f64) -> LeagueContext {
        let mut next = self.clone();
        if totals.outs_recorded < MIN_RECALIBRATION_OUTS {
            return next;
        }
        let ip = totals.innings_pitched();
        let observed_era = f64::from(totals.earned_runs) / ip * 9.0;
        let observed_constant = fip_constant_from_totals(totals, observed_era);
        let observed_fip = fip_core(totals) / ip + observed_constant;

        let mix = |old: f64, new: f64| old * (1.0 - blend) + new * blend;
        next.pitching = PitchingBaselines {
            league_era: mix(self.pitching.league_era, observed_era),
            league_fip: mix(self.pitching.league_fip, observed_fip),
            fip_constant: mix(self.pitching.fip_constant, observed_constant),
            ..self.pitching
        };
        next.revision += 1;
        next
    }
}

// ---------------------------------------------------------------------------
// Role and replacement level
// ---------------------------------------------------------------------------

/// Share of appearances that were starts. A pitcher with no games counts
/// as a starter.
pub fn starter_share(stats: &PitchingStats) -> f64 {
    if stats.games == 0 {
        return 1.0;
    }
    f64::from(stats.games_started) / f64::from(stats.games)
}

pub fn classify_role(starter_share: f64) -> PitcherRole {
    if starter_share >= STARTER_SHARE_THRESHOLD {
        PitcherRole::Starter
    } else if starter_share <= RELIEVER_SHARE_THRESHOLD {
        PitcherRole::Reliever
    } else {
        PitcherRole::Swingman
    }
}

/// Replacement-level FIP, interpolated by starter share between the pure
/// starter and pure reliever levels at the given runs-per-win. Starters get
/// the higher (more permissive) replacement FIP.
pub fn replacement_fip(starter_share: f64, baselines: &PitchingBaselines, runs_per_win: f64) -> f64 {
    starter_share * baselines.starter_replacement_fip(runs_per_win)
        + (1.0 - starter_share) * baselines.reliever_replacement_fip(runs_per_win)
}

/// Runs-per-win in this pitcher's run environment: league RPW scaled by
/// `FIP / lgFIP`, held within 0.9–1.1 of the league value.
pub fn pitcher_runs_per_win(fip: f64, league_fip: f64, runs_per_win: f64) -> f64 {
    runs_per_win * (fip / league_fip).clamp(PITCHER_RPW_MIN_RATIO, PITCHER_RPW_MAX_RATIO)
}

/// `(gmLI + 1) / 2`: relievers earn half of their leverage above average.
pub fn leverage_multiplier(gm_li: f64) -> f64 {
    (gm_li + 1.0) / 2.0
}

/// gmLI for a reliever: the tracked mean when available, else an estimate
/// from save and hold rates.
pub fn reliever_gm_li(stats: &PitchingStats) -> f64 {
    match stats.average_leverage_index {
        Some(li) => li,
        None => {
            let role = RelieverRole::infer(stats.relief_appearances(), stats.saves, stats.holds);
            estimate_gm_li(role, stats.saves, stats.holds + stats.blown_saves)
        }
    }
}

// ---------------------------------------------------------------------------
// pWAR
// ---------------------------------------------------------------------------

/// Pitching WAR for one player-season.
///
/// `(replacement FIP − park-adjusted FIP) × IP/9 × leverage multiplier`
/// runs, divided by the pitcher-specific runs-per-win. Zero IP yields 0.
pub fn calculate_pwar(
    stats: &PitchingStats,
    ctx: &LeagueContext,
    player: &PlayerContext,
) -> PitchingResult {
    let share = starter_share(stats);
    let role = classify_role(share);
    let base_rpw = ctx.runs_per_win();

    if stats.outs_recorded == 0 {
        return PitchingResult {
            innings_pitched: 0.0,
            fip: 0.0,
            park_adjusted_fip: 0.0,
            role,
            starter_share: share,
            replacement_fip: replacement_fip(share, &ctx.pitching, base_rpw),
            pitcher_runs_per_win: base_rpw,
            gm_li: None,
            leverage_multiplier: 1.0,
            runs_above_replacement: 0.0,
            war: 0.0,
        };
    }

    let ip = stats.innings_pitched();
    let fip = calculate_fip(stats, ctx.pitching.fip_constant);
    let adjusted = match player.park_id.as_deref() {
        Some(park_id) => park_adjusted_fip(fip, ctx.effective_park_factor(park_id)),
        None => fip,
    };

    let pitcher_rpw = pitcher_runs_per_win(adjusted, ctx.pitching.league_fip, base_rpw);
    let replacement = replacement_fip(share, &ctx.pitching, pitcher_rpw);

    let (gm_li, multiplier) = if role == PitcherRole::Reliever {
        let li = reliever_gm_li(stats);
        (Some(li), leverage_multiplier(li))
    } else {
        (None, 1.0)
    };

    let runs_above_replacement = (replacement - adjusted) * (ip / 9.0) * multiplier;

    PitchingResult {
        innings_pitched: ip,
        fip,
        park_adjusted_fip: adjusted,
        role,
        starter_share: share,
        replacement_fip: replacement,
        pitcher_runs_per_win: pitcher_rpw,
        gm_li,
        leverage_multiplier: multiplier,
        runs_above_replacement,
        war: runs_above_replacement / pitcher_rpw,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
