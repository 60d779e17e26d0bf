// Plain-text leaderboards for calculated WAR.

use std::cmp::Ordering;
use std::fmt::Write;
use warcalc_core::format::{format_ip, format_li, format_runs, format_war, format_win_probability, format_woba};
use warcalc_core::leverage::LeverageBreakdown;
use warcalc_core::war::baserunning::BaserunningResult;
use warcalc_core::war::batting::BattingResult;
use warcalc_core::war::fielding::FieldingResult;
use warcalc_core::war::pitching::PitchingResult;
use warcalc_core::war::{war_grade, PlayerWar, WarComponent};

/// Order results by WAR, best first. NaN sorts last.
pub fn sort_by_war<R: WarComponent>(results: &mut [PlayerWar<R>]) {
    results.sort_by(|a, b| match (a.result.war().is_nan(), b.result.war().is_nan()) {
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        _ => b.result.war().total_cmp(&a.result.war()),
    });
}

/// WAR cell; non-finite values are flagged rather than printed raw.
fn war_cell(war: f64) -> String {
    if war.is_finite() {
        format_war(war)
    } else {
        "n/a".to_string()
    }
}

pub fn render_batting(results: &[PlayerWar<BattingResult>], season_games: u32) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<16} {:>6} {:>7} {:>7} {:>7} {:>6}  {}",
        "Player", "wOBA", "wRAA", "Park", "RAR", "bWAR", "Grade"
    );
    for row in results {
        let r = &row.result;
        let _ = writeln!(
            out,
            "{:<16} {:>6} {:>7} {:>7} {:>7} {:>6}  {}",
            row.player_id,
            format_woba(r.woba),
            format_runs(r.wraa),
            format_runs(r.park_adjustment),
            format_runs(r.runs_above_replacement),
            war_cell(r.war),
            war_grade(r.war, season_games)
        );
    }
    out
}

pub fn render_pitching(results: &[PlayerWar<PitchingResult>], season_games: u32) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<16} {:>3} {:>6} {:>5} {:>5} {:>5} {:>7} {:>6}  {}",
        "Player", "Rol", "IP", "FIP", "rFIP", "gmLI", "RAR", "pWAR", "Grade"
    );
    for row in results {
        let r = &row.result;
        let outs = (r.innings_pitched * 3.0).round() as u32;
        let _ = writeln!(
            out,
            "{:<16} {:>3} {:>6} {:>5.2} {:>5.2} {:>5} {:>7} {:>6}  {}",
            row.player_id,
            r.role,
            format_ip(outs),
            r.park_adjusted_fip,
            r.replacement_fip,
            r.gm_li.map_or_else(|| "-".to_string(), format_li),
            format_runs(r.runs_above_replacement),
            war_cell(r.war),
            war_grade(r.war, season_games)
        );
    }
    out
}

pub fn render_fielding(results: &[PlayerWar<FieldingResult>]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<16} {:>7} {:>7} {:>7} {:>6}",
        "Player", "Field", "Pos", "Total", "fWAR"
    );
    for row in results {
        let r = &row.result;
        let _ = writeln!(
            out,
            "{:<16} {:>7} {:>7} {:>7} {:>6}",
            row.player_id,
            format_runs(r.fielding_runs),
            format_runs(r.positional_adjustment),
            format_runs(r.total_runs),
            war_cell(r.war)
        );
    }
    out
}

pub fn render_baserunning(results: &[PlayerWar<BaserunningResult>]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<16} {:>6} {:>7} {:>6} {:>6} {:>6}",
        "Player", "wSB", "UBR", "wGDP", "BsR", "rWAR"
    );
    for row in results {
        let r = &row.result;
        let ubr = if r.ubr_estimated {
            format!("{}*", format_runs(r.ubr))
        } else {
            format_runs(r.ubr)
        };
        let _ = writeln!(
            out,
            "{:<16} {:>6} {:>7} {:>6} {:>6} {:>6}",
            row.player_id,
            format_runs(r.wsb),
            ubr,
            format_runs(r.wgdp),
            format_runs(r.total_runs),
            war_cell(r.war)
        );
    }
    out
}

pub fn render_leverage(breakdown: &LeverageBreakdown, win_expectancy: f64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "home win expectancy  {}", format_win_probability(win_expectancy));
    let _ = writeln!(
        out,
        "leverage index       {} ({})",
        format_li(breakdown.leverage_index),
        breakdown.category
    );
    let _ = writeln!(out, "  base/out           {}", format_li(breakdown.base_out));
    let _ = writeln!(out, "  inning             x{}", format_li(breakdown.inning_multiplier));
    let _ = writeln!(out, "  walk-off           x{}", format_li(breakdown.walk_off_boost));
    let _ = writeln!(out, "  score              x{}", format_li(breakdown.score_dampener));
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
