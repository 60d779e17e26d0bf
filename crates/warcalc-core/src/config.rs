// League context loading and validation (league.toml).

use crate::context::{
    BaserunningBaselines, BattingBaselines, LeagueContext, ParkFactors, PitchingBaselines,
    PositionalAdjustments,
};
use crate::position::FieldingPosition;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire league.toml file.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueSection,
    batting: BattingBaselines,
    pitching: PitchingBaselines,
    baserunning: BaserunningBaselines,
    /// Position code → runs per 162 games.
    positional_adjustments: HashMap<String, f64>,
    #[serde(default)]
    parks: HashMap<String, ParkFactors>,
}

#[derive(Debug, Clone, Deserialize)]
struct LeagueSection {
    name: String,
    season_id: String,
    #[serde(default = "default_revision")]
    revision: u32,
    season_games: u32,
}

fn default_revision() -> u32 {
    1
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load and validate a league context from a TOML file.
pub fn load_league_config(path: &Path) -> Result<LeagueContext, ConfigError> {
    let text = read_file(path)?;
    let ctx = parse_with_path(&text, path)?;
    info!(
        "loaded league '{}' ({}, {} games, revision {}) from {}",
        ctx.name,
        ctx.season_id,
        ctx.season_games,
        ctx.revision,
        path.display()
    );
    Ok(ctx)
}

/// Parse and validate a league context from TOML text.
pub fn parse_league_config(text: &str) -> Result<LeagueContext, ConfigError> {
    parse_with_path(text, Path::new("<inline>"))
}

fn parse_with_path(text: &str, path: &Path) -> Result<LeagueContext, ConfigError> {
    let file: LeagueFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut codes: Vec<&String> = file.positional_adjustments.keys().collect();
    codes.sort();
    let mut adjustments = HashMap::new();
    let mut seen: HashMap<FieldingPosition, &str> = HashMap::new();
    for code in codes {
        let position =
            FieldingPosition::from_str_pos(code).ok_or_else(|| ConfigError::ValidationError {
                field: format!("positional_adjustments.{code}"),
                message: "unknown position".into(),
            })?;
        if let Some(first) = seen.insert(position, code.as_str()) {
            return Err(invalid(
                format!("positional_adjustments.{code}"),
                format!("duplicates `{first}`; both name {}", position.display_str()),
            ));
        }
        adjustments.insert(position, file.positional_adjustments[code]);
    }

    let ctx = LeagueContext {
        name: file.league.name,
        season_id: file.league.season_id,
        revision: file.league.revision,
        season_games: file.league.season_games,
        batting: file.batting,
        pitching: file.pitching,
        baserunning: file.baserunning,
        positional_adjustments: PositionalAdjustments::new(adjustments),
        parks: file.parks,
    };

    validate(&ctx)?;

    Ok(ctx)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check a league context for values no calculator can use meaningfully.
/// Returns the first offending field.
pub fn validate(ctx: &LeagueContext) -> Result<(), ConfigError> {
    if ctx.season_games == 0 {
        return Err(invalid("league.season_games", "must be greater than 0"));
    }

    let batting = &ctx.batting;
    let positive_fields: &[(&str, f64)] = &[
        ("batting.league_woba", batting.league_woba),
        ("batting.woba_scale", batting.woba_scale),
        ("batting.runs_per_pa", batting.runs_per_pa),
        ("pitching.league_era", ctx.pitching.league_era),
        ("pitching.league_fip", ctx.pitching.league_fip),
        ("baserunning.stolen_base_runs", ctx.baserunning.stolen_base_runs),
        ("baserunning.runs_per_game", ctx.baserunning.runs_per_game),
    ];
    for (name, val) in positive_fields {
        // `!(x > 0)` also rejects NaN.
        if !(*val > 0.0) {
            return Err(invalid(*name, format!("must be > 0, got {val}")));
        }
    }

    let w = &batting.woba_weights;
    let weight_fields: &[(&str, f64)] = &[
        ("batting.woba_weights.unintentional_walk", w.unintentional_walk),
        ("batting.woba_weights.hit_by_pitch", w.hit_by_pitch),
        ("batting.woba_weights.single", w.single),
        ("batting.woba_weights.double", w.double),
        ("batting.woba_weights.triple", w.triple),
        ("batting.woba_weights.home_run", w.home_run),
    ];
    for (name, val) in weight_fields {
        if !val.is_finite() || *val < 0.0 {
            return Err(invalid(*name, format!("must be finite and >= 0, got {val}")));
        }
    }

    let finite_fields: &[(&str, f64)] = &[
        ("batting.replacement_runs_per_600_pa", batting.replacement_runs_per_600_pa),
        ("pitching.fip_constant", ctx.pitching.fip_constant),
        (
            "pitching.starter_replacement_wins_per_9",
            ctx.pitching.starter_replacement_wins_per_9,
        ),
        (
            "pitching.reliever_replacement_wins_per_9",
            ctx.pitching.reliever_replacement_wins_per_9,
        ),
        ("baserunning.gidp_run_cost", ctx.baserunning.gidp_run_cost),
    ];
    for (name, val) in finite_fields {
        if !val.is_finite() {
            return Err(invalid(*name, format!("must be finite, got {val}")));
        }
    }

    let cs = ctx.baserunning.caught_stealing_runs;
    if !(cs < 0.0) {
        return Err(invalid(
            "baserunning.caught_stealing_runs",
            format!("must be < 0, got {cs}"),
        ));
    }

    let running = &ctx.baserunning;
    if running.league_advancement_opportunities > 0
        && running.league_extra_bases_taken > running.league_advancement_opportunities
    {
        return Err(invalid(
            "baserunning.league_extra_bases_taken",
            format!(
                "{} exceeds {} advancement opportunities",
                running.league_extra_bases_taken, running.league_advancement_opportunities
            ),
        ));
    }

    let rate = ctx.baserunning.league_gidp_rate;
    if !(0.0..=1.0).contains(&rate) {
        return Err(invalid(
            "baserunning.league_gidp_rate",
            format!("must be between 0.0 and 1.0 inclusive, got {rate}"),
        ));
    }

    for position in FieldingPosition::ALL {
        let runs = ctx.positional_adjustments.per_162(position);
        if !runs.is_finite() {
            return Err(invalid(
                format!("positional_adjustments.{}", position.display_str()),
                format!("must be finite, got {runs}"),
            ));
        }
    }

    let mut park_ids: Vec<&String> = ctx.parks.keys().collect();
    park_ids.sort();
    for park_id in park_ids {
        let park = &ctx.parks[park_id];
        let factors: &[(&str, f64)] = &[
            ("runs", park.runs),
            ("left_handed", park.left_handed),
            ("right_handed", park.right_handed),
        ];
        for (name, val) in factors {
            if !(*val > 0.0) || !val.is_finite() {
                return Err(invalid(
                    format!("parks.{park_id}.{name}"),
                    format!("must be a finite value > 0, got {val}"),
                ));
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const VALID_LEAGUE: &str = r#"
[league]
name = "Test League"
season_id = "2024"
season_games = 50

[batting]
league_woba = 0.329
woba_scale = 1.7821
runs_per_pa = 0.116
replacement_runs_per_600_pa = 12.0

[batting.woba_weights]
unintentional_walk = 0.521
hit_by_pitch = 0.566
single = 0.797
double = 1.332
triple = 1.813
home_run = 2.495

[pitching]
league_era = 4.04
league_fip = 4.04
fip_constant = 3.28
starter_replacement_wins_per_9 = 0.12
reliever_replacement_wins_per_9 = 0.03

[baserunning]
stolen_base_runs = 0.20
caught_stealing_runs = -0.45
runs_per_game = 4.8
league_stolen_bases = 200
league_caught_stealing = 60
league_steal_opportunities = 2150
league_extra_bases_taken = 300
league_advancement_opportunities = 1000
gidp_run_cost = 0.44
league_gidp_rate = 0.12

[positional_adjustments]
C = 12.5
SS = 7.5
DH = -17.5

[parks.harbor]
runs = 1.08
left_handed = 1.12
right_handed = 1.04
"#;

    fn expect_validation_field(text: &str, expected: &str) {
        match parse_league_config(text).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn parses_valid_league() {
        let ctx = parse_league_config(VALID_LEAGUE).expect("should parse valid league");
        assert_eq!(ctx.name, "Test League");
        assert_eq!(ctx.season_id, "2024");
        assert_eq!(ctx.season_games, 50);
        assert_eq!(ctx.revision, 1);
        assert_eq!(ctx.batting.woba_weights.home_run, 2.495);
        assert_eq!(ctx.positional_adjustments.per_162(FieldingPosition::Catcher), 12.5);
        assert_eq!(ctx.positional_adjustments.per_162(FieldingPosition::LeftField), 0.0);
        assert_eq!(ctx.effective_park_factor("harbor"), 1.08);
    }

    #[test]
    fn parks_section_is_optional() {
        let text = VALID_LEAGUE.split("[parks.harbor]").next().unwrap_or_default();
        let ctx = parse_league_config(text).expect("parks are optional");
        assert!(ctx.parks.is_empty());
    }

    #[test]
    fn rejects_zero_season_games() {
        let text = VALID_LEAGUE.replace("season_games = 50", "season_games = 0");
        expect_validation_field(&text, "league.season_games");
    }

    #[test]
    fn rejects_non_positive_woba_scale() {
        let text = VALID_LEAGUE.replace("woba_scale = 1.7821", "woba_scale = 0.0");
        expect_validation_field(&text, "batting.woba_scale");
    }

    #[test]
    fn rejects_non_negative_caught_stealing_value() {
        let text = VALID_LEAGUE.replace("caught_stealing_runs = -0.45", "caught_stealing_runs = 0.1");
        expect_validation_field(&text, "baserunning.caught_stealing_runs");
    }

    #[test]
    fn rejects_gidp_rate_above_one() {
        let text = VALID_LEAGUE.replace("league_gidp_rate = 0.12", "league_gidp_rate = 1.5");
        expect_validation_field(&text, "baserunning.league_gidp_rate");
    }

    #[test]
    fn baserunning_totals_default_to_untracked() {
        let text = VALID_LEAGUE
            .replace("runs_per_game = 4.8\n", "")
            .replace("league_steal_opportunities = 2150\n", "")
            .replace("league_advancement_opportunities = 1000\n", "");
        let ctx = parse_league_config(&text).expect("totals are optional");
        assert_eq!(ctx.baserunning.runs_per_game, 4.8);
        assert_eq!(ctx.baserunning.league_steal_opportunities, 0);
        assert_eq!(ctx.baserunning.league_advancement_rate(), None);
    }

    #[test]
    fn rejects_non_positive_runs_per_game() {
        let text = VALID_LEAGUE.replace("runs_per_game = 4.8", "runs_per_game = 0.0");
        expect_validation_field(&text, "baserunning.runs_per_game");
    }

    #[test]
    fn rejects_extra_bases_above_opportunities() {
        let text = VALID_LEAGUE.replace("league_extra_bases_taken = 300", "league_extra_bases_taken = 1200");
        expect_validation_field(&text, "baserunning.league_extra_bases_taken");
    }

    #[test]
    fn rejects_duplicate_position_alias() {
        // OF and CF both name center field.
        let text = VALID_LEAGUE.replace("DH = -17.5", "DH = -17.5\nCF = 2.5\nOF = 0.0");
        expect_validation_field(&text, "positional_adjustments.OF");
    }

    #[test]
    fn rejects_unknown_position_key() {
        let text = VALID_LEAGUE.replace("DH = -17.5", "XX = -17.5");
        expect_validation_field(&text, "positional_adjustments.XX");
    }

    #[test]
    fn rejects_non_positive_park_factor() {
        let text = VALID_LEAGUE.replace("runs = 1.08", "runs = 0.0");
        expect_validation_field(&text, "parks.harbor.runs");
    }

    #[test]
    fn missing_section_is_parse_error() {
        let text = VALID_LEAGUE.replace("[pitching]", "[pitching_typo]");
        match parse_league_config(&text).unwrap_err() {
            ConfigError::ParseError { .. } => {}
            other => panic!("expected ParseError, got: {other}"),
        }
    }

    #[test]
    fn file_not_found_for_missing_file() {
        let path = std::env::temp_dir().join("warcalc_config_test_missing/league.toml");
        match load_league_config(&path).unwrap_err() {
            ConfigError::FileNotFound { path: p } => assert_eq!(p, path),
            other => panic!("expected FileNotFound, got: {other}"),
        }
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = std::env::temp_dir().join("warcalc_config_test_invalid_toml");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        let path = tmp.join("league.toml");
        fs::write(&path, "this is not valid [[[ toml").unwrap();

        match load_league_config(&path).unwrap_err() {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with("league.toml")),
            other => panic!("expected ParseError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn loads_from_file() {
        let tmp = std::env::temp_dir().join("warcalc_config_test_load");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        let path = tmp.join("league.toml");
        fs::write(&path, VALID_LEAGUE).unwrap();

        let ctx = load_league_config(&path).expect("should load");
        assert_eq!(ctx.runs_per_win(), 10.0 * 50.0 / 162.0);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn baseline_context_is_valid() {
        validate(&LeagueContext::baseline(162)).expect("baseline should validate");
    }
}
