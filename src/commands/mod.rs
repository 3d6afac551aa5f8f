pub mod analyze;
pub mod dashboard;
pub mod predict;
pub mod suggest;

pub use dashboard::{present_prediction, validate_ticker, BusyGuard, Dashboard};

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
