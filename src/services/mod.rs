//! Services for fetching, aggregating and delivering stats

pub mod aggregator;
pub mod dispatch;
pub mod metrics;
pub mod report;
pub mod telegram;

pub use aggregator::Aggregator;
pub use dispatch::{Dispatcher, Notifier};
pub use metrics::MetricsClient;
pub use telegram::TelegramNotifier;
