// Season stat CSV loading.
//
// One row per player. Column names follow common box-score abbreviations
// (PA, AB, 1B, SO, ...); extra columns are ignored. Rows that fail to parse
// or fail stat-line validation are skipped with a warning.

use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::warn;
use warcalc_core::context::Handedness;
use warcalc_core::format::parse_ip;
use warcalc_core::game_state::BaseState;
use warcalc_core::position::FieldingPosition;
use warcalc_core::stats::{BaserunningStats, BattingStats, PitchingStats};
use warcalc_core::war::fielding::FieldingStats;
use warcalc_core::war::{PlayerContext, PlayerRecord};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawBatting {
    #[serde(alias = "Name", alias = "player")]
    player_id: String,
    #[serde(default)]
    park: Option<String>,
    #[serde(default, alias = "bats")]
    hand: Option<String>,
    PA: u32,
    AB: u32,
    #[serde(rename = "1B")]
    singles: u32,
    #[serde(rename = "2B")]
    doubles: u32,
    #[serde(rename = "3B")]
    triples: u32,
    HR: u32,
    BB: u32,
    #[serde(default)]
    IBB: u32,
    #[serde(default)]
    HBP: u32,
    #[serde(default)]
    SF: u32,
    #[serde(default)]
    SH: u32,
    #[serde(alias = "K")]
    SO: u32,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawPitching {
    #[serde(alias = "Name", alias = "player")]
    player_id: String,
    #[serde(default)]
    park: Option<String>,
    /// Innings in "X.Y" notation.
    IP: String,
    G: u32,
    #[serde(default)]
    GS: u32,
    #[serde(alias = "K")]
    SO: u32,
    BB: u32,
    #[serde(default)]
    HBP: u32,
    HR: u32,
    #[serde(default)]
    ER: u32,
    #[serde(default)]
    SV: u32,
    #[serde(default, alias = "HD")]
    HLD: u32,
    #[serde(default)]
    BS: u32,
    #[serde(default)]
    gmLI: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawBaserunning {
    #[serde(alias = "Name", alias = "player")]
    player_id: String,
    PA: u32,
    SB: u32,
    CS: u32,
    /// Times on first: 1B + BB + HBP - IBB.
    #[serde(default)]
    SB_OPP: u32,
    #[serde(default)]
    GIDP: u32,
    #[serde(default)]
    GIDP_OPP: u32,
    #[serde(default, alias = "speed")]
    SPD: Option<u8>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawFielding {
    #[serde(alias = "Name", alias = "player")]
    player_id: String,
    POS: String,
    G: u32,
    PO: u32,
    A: u32,
    E: u32,
    #[serde(default)]
    DP: u32,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_hand(raw: Option<&str>) -> Option<Handedness> {
    match raw.map(|s| s.trim().to_uppercase()).as_deref() {
        Some("L") => Some(Handedness::Left),
        Some("R") => Some(Handedness::Right),
        Some("S") | Some("B") => Some(Handedness::Switch),
        _ => None,
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Parse occupied bases written as digits, e.g. `"13"` for first and third.
/// `""`, `"0"`, and `"-"` mean empty.
pub fn parse_bases(text: &str) -> Option<BaseState> {
    let text = text.trim();
    if text.is_empty() || text == "0" || text == "-" {
        return Some(BaseState::EMPTY);
    }
    let mut mask = 0u8;
    for c in text.chars() {
        mask |= match c {
            '1' => 0b001,
            '2' => 0b010,
            '3' => 0b100,
            _ => return None,
        };
    }
    Some(BaseState::from_mask(mask))
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn load_batting_from_reader<R: Read>(rdr: R) -> Result<Vec<PlayerRecord<BattingStats>>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut records = Vec::new();
    for result in reader.deserialize::<RawBatting>() {
        match result {
            Ok(raw) => {
                let player_id = raw.player_id.trim().to_string();
                let stats = BattingStats {
                    plate_appearances: raw.PA,
                    at_bats: raw.AB,
                    singles: raw.singles,
                    doubles: raw.doubles,
                    triples: raw.triples,
                    home_runs: raw.HR,
                    walks: raw.BB,
                    intentional_walks: raw.IBB,
                    hit_by_pitch: raw.HBP,
                    sacrifice_flies: raw.SF,
                    sacrifice_hits: raw.SH,
                    strikeouts: raw.SO,
                };
                if let Err(e) = stats.validate() {
                    warn!("skipping batter '{}': {}", player_id, e);
                    continue;
                }
                records.push(PlayerRecord {
                    player_id,
                    player: PlayerContext {
                        park_id: non_empty(raw.park),
                        handedness: parse_hand(raw.hand.as_deref()),
                        home_plate_appearances: None,
                    },
                    stats,
                });
            }
            Err(e) => {
                warn!("skipping malformed batting row: {}", e);
            }
        }
    }
    Ok(records)
}

fn load_pitching_from_reader<R: Read>(rdr: R) -> Result<Vec<PlayerRecord<PitchingStats>>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut records = Vec::new();
    for result in reader.deserialize::<RawPitching>() {
        match result {
            Ok(raw) => {
                let player_id = raw.player_id.trim().to_string();
                let Some(outs_recorded) = parse_ip(&raw.IP) else {
                    warn!("skipping pitcher '{}': invalid IP '{}'", player_id, raw.IP);
                    continue;
                };
                let stats = PitchingStats {
                    outs_recorded,
                    games: raw.G,
                    games_started: raw.GS,
                    strikeouts: raw.SO,
                    walks: raw.BB,
                    hit_by_pitch: raw.HBP,
                    home_runs_allowed: raw.HR,
                    earned_runs: raw.ER,
                    saves: raw.SV,
                    holds: raw.HLD,
                    blown_saves: raw.BS,
                    average_leverage_index: raw.gmLI,
                };
                if let Err(e) = stats.validate() {
                    warn!("skipping pitcher '{}': {}", player_id, e);
                    continue;
                }
                records.push(PlayerRecord {
                    player_id,
                    player: PlayerContext {
                        park_id: non_empty(raw.park),
                        ..PlayerContext::default()
                    },
                    stats,
                });
            }
            Err(e) => {
                warn!("skipping malformed pitching row: {}", e);
            }
        }
    }
    Ok(records)
}

fn load_baserunning_from_reader<R: Read>(
    rdr: R,
) -> Result<Vec<PlayerRecord<BaserunningStats>>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut records = Vec::new();
    for result in reader.deserialize::<RawBaserunning>() {
        match result {
            Ok(raw) => {
                let player_id = raw.player_id.trim().to_string();
                let stats = BaserunningStats {
                    plate_appearances: raw.PA,
                    stolen_bases: raw.SB,
                    caught_stealing: raw.CS,
                    grounded_into_double_play: raw.GIDP,
                    double_play_opportunities: raw.GIDP_OPP,
                    steal_opportunities: raw.SB_OPP,
                    advancement: None,
                    speed_rating: raw.SPD,
                };
                if let Err(e) = stats.validate() {
                    warn!("skipping runner '{}': {}", player_id, e);
                    continue;
                }
                records.push(PlayerRecord::new(player_id, stats));
            }
            Err(e) => {
                warn!("skipping malformed baserunning row: {}", e);
            }
        }
    }
    Ok(records)
}

fn load_fielding_from_reader<R: Read>(rdr: R) -> Result<Vec<PlayerRecord<FieldingStats>>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut records = Vec::new();
    for result in reader.deserialize::<RawFielding>() {
        match result {
            Ok(raw) => {
                let player_id = raw.player_id.trim().to_string();
                let position = FieldingPosition::from_str_pos(&raw.POS);
                if position.is_none() {
                    warn!(
                        "fielder '{}': unknown POS '{}', no positional adjustment",
                        player_id, raw.POS
                    );
                }
                records.push(PlayerRecord::new(
                    player_id,
                    FieldingStats {
                        position,
                        games_played: raw.G,
                        putouts: raw.PO,
                        assists: raw.A,
                        errors: raw.E,
                        double_plays: raw.DP,
                    },
                ));
            }
            Err(e) => {
                warn!("skipping malformed fielding row: {}", e);
            }
        }
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

fn open_and_load<T>(
    path: &Path,
    kind: &str,
    load: fn(std::fs::File) -> Result<Vec<T>, csv::Error>,
) -> Result<Vec<T>, ImportError> {
    let file = std::fs::File::open(path).map_err(|e| ImportError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let records = load(file).map_err(|e| ImportError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;
    if records.is_empty() {
        return Err(ImportError::Validation(format!(
            "{kind} CSV {} produced zero valid rows",
            path.display()
        )));
    }
    Ok(records)
}

pub fn load_batting(path: &Path) -> Result<Vec<PlayerRecord<BattingStats>>, ImportError> {
    open_and_load(path, "batting", load_batting_from_reader)
}

pub fn load_pitching(path: &Path) -> Result<Vec<PlayerRecord<PitchingStats>>, ImportError> {
    open_and_load(path, "pitching", load_pitching_from_reader)
}

pub fn load_baserunning(path: &Path) -> Result<Vec<PlayerRecord<BaserunningStats>>, ImportError> {
    open_and_load(path, "baserunning", load_baserunning_from_reader)
}

pub fn load_fielding(path: &Path) -> Result<Vec<PlayerRecord<FieldingStats>>, ImportError> {
    open_and_load(path, "fielding", load_fielding_from_reader)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
