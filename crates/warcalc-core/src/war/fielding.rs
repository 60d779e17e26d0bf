// Fielding WAR from per-play run values.
//
// Each fielding event is valued as base run value × position modifier ×
// difficulty (putouts) or × context (errors). Game totals sum into a season
// total, a prorated positional adjustment is added, and the sum is divided
// by runs-per-win.

use crate::context::LeagueContext;
use crate::position::FieldingPosition;
use crate::war::WarComponent;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Event model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PutoutKind {
    Infield,
    Outfield,
    Lineout,
    Foulout,
}

/// Base the outfielder threw the runner out at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThrowTarget {
    Second,
    Third,
    Home,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssistKind {
    Infield,
    Outfield(Option<ThrowTarget>),
    Relay,
    Cutoff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoublePlayRole {
    Started,
    Turned,
    Completed,
    Unassisted,
}

/// Error kinds, ordered from least to most costly for the common three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Fielding,
    Throwing,
    Mental,
    Collision,
    PassedBall,
    MissedCatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayDifficulty {
    Routine,
    Charging,
    Running,
    Diving,
    Leaping,
    Wall,
    OverShoulder,
    Sliding,
    RobbedHomeRun,
}

impl PlayDifficulty {
    pub fn multiplier(&self) -> f64 {
        match self {
            PlayDifficulty::Routine => 1.0,
            PlayDifficulty::Charging => 1.3,
            PlayDifficulty::Running => 1.5,
            PlayDifficulty::Leaping | PlayDifficulty::OverShoulder => 2.0,
            PlayDifficulty::Diving | PlayDifficulty::Wall | PlayDifficulty::Sliding => 2.5,
            PlayDifficulty::RobbedHomeRun => 5.0,
        }
    }

    /// Highlight-reel difficulty.
    pub fn is_web_gem(&self) -> bool {
        matches!(
            self,
            PlayDifficulty::Diving
                | PlayDifficulty::Wall
                | PlayDifficulty::Sliding
                | PlayDifficulty::RobbedHomeRun
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldingPlay {
    Putout(PutoutKind),
    Assist(AssistKind),
    DoublePlay(DoublePlayRole),
    Error(ErrorKind),
}

/// Situational flags attached to a fielding event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayContext {
    pub allowed_run: bool,
    pub is_clutch: bool,
    pub was_routine: bool,
    pub was_difficult: bool,
    /// A dive at a ball that got away. Always worth exactly zero.
    pub missed_dive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldingEvent {
    pub position: FieldingPosition,
    pub play: FieldingPlay,
    pub difficulty: PlayDifficulty,
    pub context: PlayContext,
}

impl FieldingEvent {
    pub fn new(position: FieldingPosition, play: FieldingPlay) -> Self {
        FieldingEvent {
            position,
            play,
            difficulty: PlayDifficulty::Routine,
            context: PlayContext::default(),
        }
    }

    pub fn with_difficulty(mut self, difficulty: PlayDifficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_context(mut self, context: PlayContext) -> Self {
        self.context = context;
        self
    }

    /// A non-routine putout.
    pub fn is_star_play(&self) -> bool {
        matches!(self.play, FieldingPlay::Putout(_)) && self.difficulty != PlayDifficulty::Routine
    }
}

// ---------------------------------------------------------------------------
// Run value tables
// ---------------------------------------------------------------------------

fn putout_base(kind: PutoutKind) -> f64 {
    match kind {
        PutoutKind::Infield => 0.03,
        PutoutKind::Outfield => 0.04,
        PutoutKind::Lineout => 0.05,
        PutoutKind::Foulout => 0.02,
    }
}

fn assist_base(kind: AssistKind) -> f64 {
    match kind {
        AssistKind::Infield => 0.04,
        AssistKind::Outfield(None) | AssistKind::Outfield(Some(ThrowTarget::Second)) => 0.08,
        AssistKind::Outfield(Some(ThrowTarget::Third)) => 0.10,
        AssistKind::Outfield(Some(ThrowTarget::Home)) => 0.12,
        AssistKind::Relay => 0.03,
        AssistKind::Cutoff => 0.02,
    }
}

fn double_play_base(role: DoublePlayRole) -> f64 {
    match role {
        DoublePlayRole::Started => 0.08,
        DoublePlayRole::Turned => 0.12,
        DoublePlayRole::Completed => 0.06,
        DoublePlayRole::Unassisted => 0.25,
    }
}

/// Base penalty by error kind: fielding < throwing < mental in magnitude.
pub fn error_base(kind: ErrorKind) -> f64 {
    match kind {
        ErrorKind::Fielding => -0.15,
        ErrorKind::Throwing => -0.20,
        ErrorKind::Mental => -0.25,
        ErrorKind::Collision => -0.10,
        ErrorKind::PassedBall => -0.10,
        ErrorKind::MissedCatch => -0.18,
    }
}

pub fn putout_modifier(position: FieldingPosition) -> f64 {
    match position {
        FieldingPosition::Catcher => 1.3,
        FieldingPosition::ShortStop => 1.2,
        FieldingPosition::CenterField => 1.15,
        FieldingPosition::SecondBase | FieldingPosition::ThirdBase => 1.1,
        FieldingPosition::RightField => 1.0,
        FieldingPosition::LeftField => 0.9,
        FieldingPosition::FirstBase => 0.7,
        FieldingPosition::Pitcher => 0.5,
        FieldingPosition::DesignatedHitter => 0.0,
    }
}

pub fn assist_modifier(position: FieldingPosition) -> f64 {
    match position {
        FieldingPosition::Catcher => 1.4,
        FieldingPosition::ShortStop | FieldingPosition::CenterField => 1.2,
        FieldingPosition::ThirdBase => 1.15,
        FieldingPosition::RightField => 1.1,
        FieldingPosition::SecondBase => 1.0,
        FieldingPosition::LeftField => 0.9,
        FieldingPosition::FirstBase => 0.7,
        FieldingPosition::Pitcher => 0.6,
        FieldingPosition::DesignatedHitter => 0.0,
    }
}

pub fn error_modifier(position: FieldingPosition) -> f64 {
    match position {
        FieldingPosition::Catcher => 0.8,
        FieldingPosition::ShortStop | FieldingPosition::ThirdBase | FieldingPosition::SecondBase => {
            1.0
        }
        FieldingPosition::LeftField | FieldingPosition::CenterField | FieldingPosition::RightField => {
            1.1
        }
        FieldingPosition::FirstBase => 1.2,
        FieldingPosition::Pitcher => 1.3,
        FieldingPosition::DesignatedHitter => 0.0,
    }
}

/// Multiplier applied to an error penalty by its circumstances.
pub fn error_context_multiplier(context: &PlayContext) -> f64 {
    let mut multiplier = 1.0;
    if context.allowed_run {
        multiplier *= 1.5;
    }
    if context.is_clutch {
        multiplier *= 1.3;
    }
    if context.was_routine {
        multiplier *= 1.2;
    }
    if context.was_difficult {
        multiplier *= 0.7;
    }
    multiplier
}

// ---------------------------------------------------------------------------
// Per-event and per-game values
// ---------------------------------------------------------------------------

/// Run value of one fielding event.
///
/// A missed dive is exactly 0 whatever else is flagged. Putouts scale with
/// difficulty; double-play credit carries no position modifier.
pub fn fielding_event_runs(event: &FieldingEvent) -> f64 {
    if event.context.missed_dive {
        return 0.0;
    }
    match event.play {
        FieldingPlay::Putout(kind) => {
            putout_base(kind) * putout_modifier(event.position) * event.difficulty.multiplier()
        }
        FieldingPlay::Assist(kind) => assist_base(kind) * assist_modifier(event.position),
        FieldingPlay::DoublePlay(role) => double_play_base(role),
        FieldingPlay::Error(kind) => {
            error_base(kind) * error_modifier(event.position) * error_context_multiplier(&event.context)
        }
    }
}

/// Totals for one game's fielding events.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FieldingGameSummary {
    pub runs: f64,
    pub putouts: u32,
    pub assists: u32,
    pub double_plays: u32,
    pub errors: u32,
    pub error_runs: f64,
    pub star_plays: u32,
    pub star_play_runs: f64,
    pub web_gems: u32,
}

impl FieldingGameSummary {
    fn with_event(mut self, event: &FieldingEvent) -> Self {
        let runs = fielding_event_runs(event);
        self.runs += runs;
        match event.play {
            FieldingPlay::Putout(_) => self.putouts += 1,
            FieldingPlay::Assist(_) => self.assists += 1,
            FieldingPlay::DoublePlay(_) => self.double_plays += 1,
            FieldingPlay::Error(_) => {
                self.errors += 1;
                self.error_runs += runs;
            }
        }
        if event.is_star_play() {
            self.star_plays += 1;
            self.star_play_runs += runs;
            if event.difficulty.is_web_gem() {
                self.web_gems += 1;
            }
        }
        self
    }

    fn combine(mut self, other: &FieldingGameSummary) -> Self {
        self.runs += other.runs;
        self.putouts += other.putouts;
        self.assists += other.assists;
        self.double_plays += other.double_plays;
        self.errors += other.errors;
        self.error_runs += other.error_runs;
        self.star_plays += other.star_plays;
        self.star_play_runs += other.star_play_runs;
        self.web_gems += other.web_gems;
        self
    }
}

pub fn calculate_game_fielding(events: &[FieldingEvent]) -> FieldingGameSummary {
    events
        .iter()
        .fold(FieldingGameSummary::default(), FieldingGameSummary::with_event)
}

// ---------------------------------------------------------------------------
// Season fWAR
// ---------------------------------------------------------------------------

/// One player's fielding season: primary position, games there, and the
/// event log of each game.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldingSeason {
    pub position: Option<FieldingPosition>,
    pub games_played: u32,
    pub games: Vec<Vec<FieldingEvent>>,
}

/// Fielding counting totals, for leagues that do not log individual plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldingStats {
    pub position: Option<FieldingPosition>,
    pub games_played: u32,
    pub putouts: u32,
    pub assists: u32,
    pub errors: u32,
    pub double_plays: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldingResult {
    pub fielding_runs: f64,
    pub positional_adjustment: f64,
    pub total_runs: f64,
    pub war: f64,
    pub summary: FieldingGameSummary,
}

impl WarComponent for FieldingResult {
    fn runs(&self) -> f64 {
        self.total_runs
    }

    fn war(&self) -> f64 {
        self.war
    }
}

fn positional_adjustment(
    position: Option<FieldingPosition>,
    games_played: u32,
    ctx: &LeagueContext,
) -> f64 {
    position.map_or(0.0, |pos| {
        ctx.positional_adjustments.for_games(pos, games_played)
    })
}

fn fielding_result(
    fielding_runs: f64,
    positional_adjustment: f64,
    summary: FieldingGameSummary,
    ctx: &LeagueContext,
) -> FieldingResult {
    let total_runs = fielding_runs + positional_adjustment;
    FieldingResult {
        fielding_runs,
        positional_adjustment,
        total_runs,
        war: total_runs / ctx.runs_per_win(),
        summary,
    }
}

/// Fielding WAR from per-game event logs. An unknown (absent) position
/// carries no positional adjustment.
pub fn calculate_fwar(season: &FieldingSeason, ctx: &LeagueContext) -> FieldingResult {
    let summary = season
        .games
        .iter()
        .map(|events| calculate_game_fielding(events))
        .fold(FieldingGameSummary::default(), |acc, game| acc.combine(&game));
    let adjustment = positional_adjustment(season.position, season.games_played, ctx);
    fielding_result(summary.runs, adjustment, summary, ctx)
}

/// Fielding WAR estimated from counting totals.
///
/// Putouts are worth 0.01 at catcher and first base (mostly automatic) and
/// 0.02 elsewhere; assists 0.03; double plays 0.10; errors −0.15.
pub fn calculate_fwar_from_counts(stats: &FieldingStats, ctx: &LeagueContext) -> FieldingResult {
    let (putout_value, putout_mod, error_mod) = match stats.position {
        Some(pos) => {
            let base = match pos {
                FieldingPosition::Catcher | FieldingPosition::FirstBase => 0.01,
                _ => 0.02,
            };
            (base, putout_modifier(pos), error_modifier(pos))
        }
        None => (0.02, 1.0, 1.0),
    };
    let error_runs = f64::from(stats.errors) * -0.15 * error_mod;
    let fielding_runs = f64::from(stats.putouts) * putout_value * putout_mod
        + f64::from(stats.assists) * 0.03 * putout_mod
        + f64::from(stats.double_plays) * 0.10
        + error_runs;
    let summary = FieldingGameSummary {
        runs: fielding_runs,
        putouts: stats.putouts,
        assists: stats.assists,
        double_plays: stats.double_plays,
        errors: stats.errors,
        error_runs,
        ..FieldingGameSummary::default()
    };
    let adjustment = positional_adjustment(stats.position, stats.games_played, ctx);
    fielding_result(fielding_runs, adjustment, summary, ctx)
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

    fn error_at_short(kind: ErrorKind) -> FieldingEvent {
        FieldingEvent::new(FieldingPosition::ShortStop, FieldingPlay::Error(kind))
    }

    #[test]
    fn error_penalty_ordering() {
        let fielding = fielding_event_runs(&error_at_short(ErrorKind::Fielding));
        let throwing = fielding_event_runs(&error_at_short(ErrorKind::Throwing));
        let mental = fielding_event_runs(&error_at_short(ErrorKind::Mental));
        assert!(fielding < 0.0);
        assert!(fielding.abs() < throwing.abs());
        assert!(throwing.abs() < mental.abs());
    }

    #[test]
    fn missed_dive_is_exactly_zero_regardless_of_flags() {
        let everything = PlayContext {
            allowed_run: true,
            is_clutch: true,
            was_routine: true,
            was_difficult: true,
            missed_dive: true,
        };
        for kind in [ErrorKind::Fielding, ErrorKind::Throwing, ErrorKind::Mental] {
            let event = error_at_short(kind).with_context(everything);
            assert_eq!(fielding_event_runs(&event), 0.0);
        }
        let putout = FieldingEvent::new(
            FieldingPosition::CenterField,
            FieldingPlay::Putout(PutoutKind::Outfield),
        )
        .with_difficulty(PlayDifficulty::Diving)
        .with_context(PlayContext {
            missed_dive: true,
            ..PlayContext::default()
        });
        assert_eq!(fielding_event_runs(&putout), 0.0);
    }

    #[test]
    fn error_context_multipliers_stack() {
        let event = error_at_short(ErrorKind::Fielding).with_context(PlayContext {
            allowed_run: true,
            is_clutch: true,
            ..PlayContext::default()
        });
        assert!(approx_eq(fielding_event_runs(&event), -0.15 * 1.5 * 1.3, 1e-12));
    }

    #[test]
    fn difficult_error_is_softened() {
        let plain = fielding_event_runs(&error_at_short(ErrorKind::Throwing));
        let hard = fielding_event_runs(&error_at_short(ErrorKind::Throwing).with_context(PlayContext {
            was_difficult: true,
            ..PlayContext::default()
        }));
        assert!(hard.abs() < plain.abs());
    }

    #[test]
    fn difficulty_scales_putouts() {
        let base = FieldingEvent::new(
            FieldingPosition::CenterField,
            FieldingPlay::Putout(PutoutKind::Outfield),
        );
        let routine = fielding_event_runs(&base);
        let diving = fielding_event_runs(&base.with_difficulty(PlayDifficulty::Diving));
        let robbed = fielding_event_runs(&base.with_difficulty(PlayDifficulty::RobbedHomeRun));
        assert!(approx_eq(routine, 0.04 * 1.15, 1e-12));
        assert!(diving > routine);
        assert!(robbed > diving);
    }

    #[test]
    fn outfield_assist_by_target() {
        let to_home = FieldingEvent::new(
            FieldingPosition::RightField,
            FieldingPlay::Assist(AssistKind::Outfield(Some(ThrowTarget::Home))),
        );
        let to_second = FieldingEvent::new(
            FieldingPosition::RightField,
            FieldingPlay::Assist(AssistKind::Outfield(Some(ThrowTarget::Second))),
        );
        assert!(approx_eq(fielding_event_runs(&to_home), 0.12 * 1.1, 1e-12));
        assert!(fielding_event_runs(&to_home) > fielding_event_runs(&to_second));
    }

    #[test]
    fn double_play_has_no_position_modifier() {
        let pivot = FieldingEvent::new(
            FieldingPosition::SecondBase,
            FieldingPlay::DoublePlay(DoublePlayRole::Turned),
        );
        let first = FieldingEvent::new(
            FieldingPosition::FirstBase,
            FieldingPlay::DoublePlay(DoublePlayRole::Turned),
        );
        assert_eq!(fielding_event_runs(&pivot), fielding_event_runs(&first));
    }

    #[test]
    fn dh_fielding_is_worthless() {
        let event = FieldingEvent::new(
            FieldingPosition::DesignatedHitter,
            FieldingPlay::Putout(PutoutKind::Infield),
        );
        assert_eq!(fielding_event_runs(&event), 0.0);
    }

    #[test]
    fn game_summary_counts_star_plays() {
        let events = vec![
            FieldingEvent::new(FieldingPosition::ShortStop, FieldingPlay::Putout(PutoutKind::Infield)),
            FieldingEvent::new(FieldingPosition::ShortStop, FieldingPlay::Putout(PutoutKind::Lineout))
                .with_difficulty(PlayDifficulty::Diving),
            FieldingEvent::new(FieldingPosition::ShortStop, FieldingPlay::Assist(AssistKind::Infield)),
            error_at_short(ErrorKind::Throwing),
        ];
        let summary = calculate_game_fielding(&events);
        assert_eq!(summary.putouts, 2);
        assert_eq!(summary.assists, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.star_plays, 1);
        assert_eq!(summary.web_gems, 1);
        assert!(approx_eq(summary.error_runs, -0.20, 1e-12));
        let expected = 0.03 * 1.2 + 0.05 * 1.2 * 2.5 + 0.04 * 1.2 - 0.20;
        assert!(approx_eq(summary.runs, expected, 1e-12));
    }

    #[test]
    fn season_is_sum_of_games_plus_positional_adjustment() {
        let ctx = LeagueContext::baseline(50);
        let game = vec![FieldingEvent::new(
            FieldingPosition::Catcher,
            FieldingPlay::Putout(PutoutKind::Foulout),
        )];
        let season = FieldingSeason {
            position: Some(FieldingPosition::Catcher),
            games_played: 50,
            games: vec![game.clone(), game.clone(), game],
        };
        let result = calculate_fwar(&season, &ctx);
        assert!(approx_eq(result.fielding_runs, 3.0 * 0.02 * 1.3, 1e-12));
        assert!(approx_eq(result.positional_adjustment, 12.5 * 50.0 / 162.0, 1e-12));
        assert!(approx_eq(result.war, result.total_runs / ctx.runs_per_win(), 1e-12));
    }

    #[test]
    fn dh_season_is_negative() {
        let season = FieldingSeason {
            position: Some(FieldingPosition::DesignatedHitter),
            games_played: 50,
            games: vec![],
        };
        assert!(calculate_fwar(&season, &LeagueContext::baseline(50)).war < 0.0);
    }

    #[test]
    fn empty_season_without_position_is_zero() {
        let result = calculate_fwar(&FieldingSeason::default(), &LeagueContext::baseline(50));
        assert_eq!(result.war, 0.0);
    }

    #[test]
    fn counting_fallback_values() {
        let stats = FieldingStats {
            position: Some(FieldingPosition::ShortStop),
            games_played: 0,
            putouts: 100,
            assists: 150,
            errors: 10,
            double_plays: 20,
        };
        let result = calculate_fwar_from_counts(&stats, &LeagueContext::baseline(50));
        let expected = 100.0 * 0.02 * 1.2 + 150.0 * 0.03 * 1.2 + 20.0 * 0.10 - 10.0 * 0.15;
        assert!(approx_eq(result.fielding_runs, expected, 1e-9));
        assert_eq!(result.positional_adjustment, 0.0);
    }
}
