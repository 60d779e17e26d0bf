// Win expectancy: home-team win probability for a discretized game state.
//
// The table is generated once from a small set of per-inning parameters:
// a tied-game baseline for each half, a per-run swing that steepens late in
// the game, and run-expectancy-based adjustments for runners and outs.

use crate::game_state::{BaseState, GameState, Half};
use once_cell::sync::Lazy;

// ---------------------------------------------------------------------------
// Table dimensions
// ---------------------------------------------------------------------------

/// Run differentials beyond this magnitude share the edge bucket.
pub const MAX_RUN_DIFF: i32 = 5;

const TABLE_INNINGS: usize = 9;
const DIFF_BUCKETS: usize = (2 * MAX_RUN_DIFF + 1) as usize;

/// No in-progress state is treated as certain.
const MIN_WIN_EXPECTANCY: f64 = 0.01;
const MAX_WIN_EXPECTANCY: f64 = 0.99;

type Row = [f64; DIFF_BUCKETS];
type Table = [[[[Row; 8]; 3]; 2]; TABLE_INNINGS];

// ---------------------------------------------------------------------------
// Generation parameters
// ---------------------------------------------------------------------------

struct InningParams {
    tied_top: f64,
    tied_bottom: f64,
    per_run_swing: f64,
}

const INNING_PARAMS: [InningParams; TABLE_INNINGS] = [
    InningParams { tied_top: 0.540, tied_bottom: 0.548, per_run_swing: 0.32 },
    InningParams { tied_top: 0.538, tied_bottom: 0.546, per_run_swing: 0.34 },
    InningParams { tied_top: 0.535, tied_bottom: 0.543, per_run_swing: 0.36 },
    InningParams { tied_top: 0.530, tied_bottom: 0.540, per_run_swing: 0.39 },
    InningParams { tied_top: 0.525, tied_bottom: 0.538, per_run_swing: 0.42 },
    InningParams { tied_top: 0.520, tied_bottom: 0.535, per_run_swing: 0.47 },
    InningParams { tied_top: 0.515, tied_bottom: 0.530, per_run_swing: 0.53 },
    InningParams { tied_top: 0.510, tied_bottom: 0.525, per_run_swing: 0.62 },
    InningParams { tied_top: 0.505, tied_bottom: 0.520, per_run_swing: 0.75 },
];

/// Scoring potential of each base state, indexed by occupancy mask.
const RUNNER_BOOST: [f64; 8] = [0.000, 0.015, 0.030, 0.040, 0.035, 0.045, 0.055, 0.065];

/// Shift of the tied baseline toward the fielding team as outs accumulate.
const OUT_PENALTY: [f64; 3] = [0.000, -0.004, -0.010];

/// Runners are worth less with more outs.
const OUT_RUNNER_SCALE: [f64; 3] = [1.0, 0.75, 0.40];

static TABLE: Lazy<Table> = Lazy::new(build_table);

fn build_row(tied: f64, per_run_swing: f64, runner_boost: f64, home_batting: bool) -> Row {
    let k = per_run_swing * 2.0;
    let mut row = [0.0; DIFF_BUCKETS];
    for (i, slot) in row.iter_mut().enumerate() {
        let diff = i as i32 - MAX_RUN_DIFF;
        let mut we = if diff == 0 {
            tied
        } else {
            let logistic_shift = 1.0 / (1.0 + (-k * diff as f64).exp()) - 0.5;
            tied + logistic_shift * (1.0 - (tied - 0.5).abs() * 0.5)
        };
        if home_batting {
            we += runner_boost * 0.5;
        } else {
            we -= runner_boost * 0.5;
        }
        *slot = we.clamp(MIN_WIN_EXPECTANCY, MAX_WIN_EXPECTANCY);
    }
    row
}

fn build_table() -> Table {
    let mut table = [[[[[0.0; DIFF_BUCKETS]; 8]; 3]; 2]; TABLE_INNINGS];
    for (inning, params) in INNING_PARAMS.iter().enumerate() {
        for half in [Half::Top, Half::Bottom] {
            let home_batting = half == Half::Bottom;
            let tied_base = if home_batting {
                params.tied_bottom
            } else {
                params.tied_top
            };
            for outs in 0..3 {
                let out_adj = if home_batting {
                    OUT_PENALTY[outs]
                } else {
                    -OUT_PENALTY[outs]
                };
                for bases in 0..8 {
                    let runner_adj = RUNNER_BOOST[bases] * OUT_RUNNER_SCALE[outs];
                    table[inning][half.index()][outs][bases] = build_row(
                        tied_base + out_adj,
                        params.per_run_swing,
                        runner_adj,
                        home_batting,
                    );
                }
            }
        }
    }
    table
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Map an inning of a game scheduled for `scheduled` innings onto the
/// 9-inning table (0-based index). Extra innings collapse to the last row.
fn inning_index(inning: u8, scheduled: u8) -> usize {
    let scheduled = f64::from(scheduled.max(1));
    let normalized = (f64::from(inning) / scheduled * TABLE_INNINGS as f64).round() as i64;
    (normalized - 1).clamp(0, TABLE_INNINGS as i64 - 1) as usize
}

fn diff_index(run_diff: i32) -> usize {
    (run_diff.clamp(-MAX_RUN_DIFF, MAX_RUN_DIFF) + MAX_RUN_DIFF) as usize
}

/// Home-team win probability for a game state, in [0, 1].
///
/// A walk-off state (home ahead in the bottom of the final or an extra
/// inning) is a completed game and returns 1.0. Otherwise the value comes
/// from the table and lies in [0.01, 0.99].
pub fn win_expectancy(state: &GameState) -> f64 {
    if state.is_walk_off() {
        return 1.0;
    }
    let inning = inning_index(state.inning, state.scheduled_innings);
    TABLE[inning][state.half.index()][state.outs_index()][state.bases.index()]
        [diff_index(state.run_diff)]
}

/// Convenience lookup for a regulation nine-inning game.
pub fn win_expectancy_at(inning: u8, half: Half, outs: u8, bases: BaseState, run_diff: i32) -> f64 {
    win_expectancy(&GameState::new(inning, half, outs, bases, run_diff))
}

/// Win expectancy at the start of a half inning (no outs, bases empty).
pub fn half_inning_start(inning: u8, half: Half, run_diff: i32, scheduled_innings: u8) -> f64 {
    win_expectancy(
        &GameState::new(inning, half, 0, BaseState::EMPTY, run_diff)
            .with_scheduled_innings(scheduled_innings),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
