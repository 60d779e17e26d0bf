// WAR calculator entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr, RUST_LOG-filtered)
// 2. Load the league context (or the built-in baseline)
// 3. Import the stat CSV for the chosen component
// 4. Calculate in parallel, sort, and print a leaderboard (or JSON)

mod import;
mod report;

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use warcalc_core::config;
use warcalc_core::context::LeagueContext;
use warcalc_core::game_state::{GameState, Half};
use warcalc_core::leverage::leverage_breakdown;
use warcalc_core::war::{
    calculate_bwar_batch, calculate_fwar_from_counts_batch, calculate_pwar_batch,
    calculate_rwar_batch,
};
use warcalc_core::win_expectancy::win_expectancy;

/// Season length used when no league file is given.
const DEFAULT_SEASON_GAMES: u32 = 162;

#[derive(Debug, Parser)]
#[command(name = "warcalc", version)]
#[command(about = "Wins Above Replacement, win expectancy, and leverage for season stat files")]
struct Args {
    /// League context TOML (baselines, park factors, positional adjustments)
    #[arg(long, global = true)]
    league: Option<PathBuf>,

    /// Season length when no league file is given
    #[arg(long, global = true)]
    games: Option<u32>,

    /// Print results as JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Batting WAR from a batting stats CSV
    Batting {
        #[arg(long)]
        stats: PathBuf,
    },
    /// Pitching WAR from a pitching stats CSV
    Pitching {
        #[arg(long)]
        stats: PathBuf,
    },
    /// Fielding WAR from a fielding totals CSV
    Fielding {
        #[arg(long)]
        stats: PathBuf,
    },
    /// Baserunning WAR from a baserunning stats CSV
    Baserunning {
        #[arg(long)]
        stats: PathBuf,
    },
    /// Win expectancy and leverage for one game state
    Leverage {
        #[arg(long)]
        inning: u8,
        /// top or bottom
        #[arg(long)]
        half: String,
        #[arg(long, default_value_t = 0)]
        outs: u8,
        /// Occupied bases as digits, e.g. 13 for first and third
        #[arg(long, default_value = "")]
        bases: String,
        /// Home score minus away score
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        diff: i32,
        #[arg(long, default_value_t = 9)]
        scheduled: u8,
    },
}

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let args = Args::parse();

    let ctx = load_context(&args)?;
    info!(
        "league context: {} ({} games, {:.2} runs per win)",
        ctx.name,
        ctx.season_games,
        ctx.runs_per_win()
    );

    match &args.command {
        Command::Batting { stats } => {
            let records = import::load_batting(stats).context("failed to load batting stats")?;
            info!("loaded {} batters", records.len());
            let mut results = calculate_bwar_batch(&records, &ctx);
            report::sort_by_war(&mut results);
            emit(args.json, &results, || report::render_batting(&results, ctx.season_games))?;
        }
        Command::Pitching { stats } => {
            let records = import::load_pitching(stats).context("failed to load pitching stats")?;
            info!("loaded {} pitchers", records.len());
            let mut results = calculate_pwar_batch(&records, &ctx);
            report::sort_by_war(&mut results);
            emit(args.json, &results, || report::render_pitching(&results, ctx.season_games))?;
        }
        Command::Fielding { stats } => {
            let records = import::load_fielding(stats).context("failed to load fielding stats")?;
            info!("loaded {} fielders", records.len());
            let mut results = calculate_fwar_from_counts_batch(&records, &ctx);
            report::sort_by_war(&mut results);
            emit(args.json, &results, || report::render_fielding(&results))?;
        }
        Command::Baserunning { stats } => {
            let records =
                import::load_baserunning(stats).context("failed to load baserunning stats")?;
            info!("loaded {} runners", records.len());
            let mut results = calculate_rwar_batch(&records, &ctx);
            report::sort_by_war(&mut results);
            emit(args.json, &results, || report::render_baserunning(&results))?;
        }
        Command::Leverage {
            inning,
            half,
            outs,
            bases,
            diff,
            scheduled,
        } => {
            let Some(half) = Half::from_str_half(half) else {
                bail!("unknown half '{half}', expected top or bottom");
            };
            let Some(bases) = import::parse_bases(bases) else {
                bail!("invalid bases '{bases}', expected digits 1-3");
            };
            if *outs > 2 {
                bail!("outs must be 0, 1, or 2, got {outs}");
            }
            if *inning == 0 {
                bail!("inning must be at least 1");
            }
            let state = GameState::new(*inning, half, *outs, bases, *diff)
                .with_scheduled_innings(*scheduled);
            let breakdown = leverage_breakdown(&state);
            let we = win_expectancy(&state);
            if args.json {
                #[derive(Serialize)]
                struct LeverageOutput {
                    state: GameState,
                    win_expectancy: f64,
                    #[serde(flatten)]
                    breakdown: warcalc_core::leverage::LeverageBreakdown,
                }
                let output = LeverageOutput {
                    state,
                    win_expectancy: we,
                    breakdown,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print!("{}", report::render_leverage(&breakdown, we));
            }
        }
    }

    Ok(())
}

/// Load the league file when given, else the baseline for `--games`.
fn load_context(args: &Args) -> anyhow::Result<LeagueContext> {
    match &args.league {
        Some(path) => {
            let mut ctx = config::load_league_config(path)
                .with_context(|| format!("failed to load league config {}", path.display()))?;
            if let Some(games) = args.games {
                if games == 0 {
                    bail!("--games must be greater than 0");
                }
                ctx.season_games = games;
            }
            Ok(ctx)
        }
        None => {
            let games = args.games.unwrap_or(DEFAULT_SEASON_GAMES);
            if games == 0 {
                bail!("--games must be greater than 0");
            }
            warn!("no --league file given, using baseline context for {games} games");
            Ok(LeagueContext::baseline(games))
        }
    }
}

fn emit<T: Serialize>(json: bool, value: &T, table: impl FnOnce() -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", table());
    }
    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warcalc=info,warcalc_core=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
