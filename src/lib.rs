//! fragwatch - a memory fragmentation indicator
//!
//! fragwatch periodically samples the buddy allocator's per-order
//! free-block histogram (on Linux, `/proc/buddyinfo`), derives
//! fragmentation metrics from it, and records the resulting time series
//! for later export:
//!
//! - **Histogram sampling**: per-node, per-zone free-block counts for
//!   orders `0..MAX_ORDER`, read through a pluggable [`HistogramSource`].
//! - **Metric derivation**: free pages, usable-pages-at-order-k, and the
//!   unusable-free-space indicator, computed in [`metrics`].
//! - **Recording**: a background [`PeriodicSampler`] appends one
//!   [`Sample`] per interval to a shared [`SampleStore`] while recording
//!   is enabled.
//! - **Reporting**: a live before/after-compaction comparison and a CSV
//!   dump of the recorded series, via [`Reporter`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use fragwatch::{FragMonitor, FragwatchConfig};
//!
//! let config = FragwatchConfig::load_from_env()?;
//! let monitor = FragMonitor::from_config(&config)?;
//!
//! monitor.toggle_record();        // "Recording started."
//! // ... let it sample for a while ...
//! monitor.toggle_record();        // "Recording stopped."
//! println!("{}", monitor.export_csv());
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod histogram;
pub mod metrics;
pub mod monitor;
pub mod report;
pub mod sampler;
pub mod source;
pub mod store;

// Re-exports for convenience
pub use config::{ConfigError, FragwatchConfig};
pub use histogram::{ZoneHistogram, MAX_ORDER};
pub use metrics::{compute_sample, Sample};
pub use monitor::FragMonitor;
pub use report::{LiveReport, Reporter};
pub use sampler::{PeriodicSampler, SamplerConfig, SamplerState};
pub use source::{CompactionTrigger, HistogramSource, SourceError};
pub use store::SampleStore;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::FragwatchConfig;
    pub use crate::histogram::{ZoneHistogram, MAX_ORDER};
    pub use crate::metrics::Sample;
    pub use crate::monitor::FragMonitor;
    pub use crate::source::{CompactionTrigger, HistogramSource};
    pub use crate::store::SampleStore;
}
