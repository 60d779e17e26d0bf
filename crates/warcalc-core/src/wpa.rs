// Win probability added: the win-expectancy swing of a single play, from the
// batting team's perspective.

use crate::game_state::{BaseState, GameState, Half};
use crate::win_expectancy::{half_inning_start, win_expectancy};
use serde::{Deserialize, Serialize};

/// What a play did to the state it started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayOutcome {
    /// Outs after the play; 3 or more ends the half inning.
    pub outs_after: u8,
    pub bases_after: BaseState,
    /// Runs the batting team scored on the play.
    pub runs_scored: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WpaResult {
    /// Home win expectancy before the play.
    pub win_expectancy_before: f64,
    /// Home win expectancy after the play.
    pub win_expectancy_after: f64,
    /// Swing credited to the batting team (positive = good for the offense).
    pub wpa: f64,
}

/// Convert a home-perspective win-expectancy change into the batting
/// team's perspective.
pub fn wpa_between(we_before: f64, we_after: f64, batting_half: Half) -> f64 {
    match batting_half {
        Half::Bottom => we_after - we_before,
        Half::Top => we_before - we_after,
    }
}

/// Home win expectancy once `outcome` is applied to `before`.
///
/// Handles walk-offs, the end of a half inning (rolling over to the next
/// half with the bases cleared), and the end of the game after the top or
/// bottom of the final inning.
pub fn win_expectancy_after(before: &GameState, outcome: &PlayOutcome) -> f64 {
    let runs = i32::from(outcome.runs_scored);
    let run_diff = match before.half {
        Half::Bottom => before.run_diff + runs,
        Half::Top => before.run_diff - runs,
    };
    let final_inning = before.is_final_inning_or_later();

    if before.half == Half::Bottom && final_inning && run_diff > 0 {
        return 1.0;
    }

    if outcome.outs_after >= 3 {
        return match before.half {
            // Home already ahead after the top of the final inning: game over.
            Half::Top if final_inning && run_diff > 0 => 1.0,
            Half::Top => {
                half_inning_start(before.inning, Half::Bottom, run_diff, before.scheduled_innings)
            }
            Half::Bottom if final_inning && run_diff < 0 => 0.0,
            Half::Bottom => half_inning_start(
                before.inning.saturating_add(1),
                Half::Top,
                run_diff,
                before.scheduled_innings,
            ),
        };
    }

    win_expectancy(&GameState {
        outs: outcome.outs_after,
        bases: outcome.bases_after,
        run_diff,
        ..*before
    })
}

/// Win probability added by one play.
pub fn calculate_wpa(before: &GameState, outcome: &PlayOutcome) -> WpaResult {
    let win_expectancy_before = win_expectancy(before);
    let win_expectancy_after = win_expectancy_after(before, outcome);
    WpaResult {
        win_expectancy_before,
        win_expectancy_after,
        wpa: wpa_between(win_expectancy_before, win_expectancy_after, before.half),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
