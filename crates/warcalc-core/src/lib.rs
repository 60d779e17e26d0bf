// Library root: re-exports all modules so the CLI, integration tests, and
// other consumers can access the calculators.

pub mod clutch;
pub mod config;
pub mod context;
pub mod format;
pub mod game_state;
pub mod leverage;
pub mod position;
pub mod stats;
pub mod war;
pub mod win_expectancy;
pub mod wpa;
