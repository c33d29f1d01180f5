//! Type definitions for cfstats

pub mod error;
pub mod stats;

pub use error::{CfStatsError, Result};
pub use stats::{AccountStats, AggregateReport, DailyBucket, TimeWindow};
