//! Descriptive analytics over historical price series loaded from CSV:
//! greedy max-profit trades, simple moving average, daily returns and
//! up/down streaks.

pub mod analysis;
pub mod cli;
pub mod csv_processor;
pub mod error;
pub mod file_processing;
pub mod indicators;
pub mod interactive;
pub mod profit;
pub mod progress;
pub mod provider;
pub mod report;
pub mod series;
pub mod streaks;
pub mod utils;
