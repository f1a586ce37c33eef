//! External data sources
//!
//! The monitor itself never touches the allocator directly. It reads
//! free-block histograms through a [`HistogramSource`] and requests
//! memory compaction through a [`CompactionTrigger`]; both are traits so
//! tests and alternative platforms can supply their own implementations.
//! The default implementations read `/proc/buddyinfo` and write
//! `/proc/sys/vm/compact_memory`.

mod buddyinfo;
mod compact;

pub use buddyinfo::{parse_buddyinfo, BuddyinfoSource};
pub use compact::SysctlCompactionTrigger;

use crate::histogram::ZoneHistogram;

/// Errors returned by histogram sources and compaction triggers.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error while reading or writing the underlying interface.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// A line of source output could not be parsed.
    #[error("malformed histogram line: {line:?}")]
    Parse {
        /// The offending line.
        line: String,
    },
    /// The compaction request was rejected by the system.
    #[error("compaction failed: {0}")]
    CompactionFailed(String),
}

/// Supplier of the current per-zone free-block histograms.
///
/// A read returns one [`ZoneHistogram`] per populated zone per node.
/// Reads may fail transiently; the periodic sampler treats a failure as
/// a skipped tick, not a fatal condition.
pub trait HistogramSource: Send + Sync + 'static {
    /// Read the current free-block counts for every populated zone.
    fn read_zones(&self) -> Result<Vec<ZoneHistogram>, SourceError>;
}

/// On-demand memory compaction.
///
/// Compaction has no return value of its own; its effect is only
/// observable as a before/after difference in [`HistogramSource`]
/// output. Implementations are not assumed to be reentrant - callers
/// serialize their invocations.
pub trait CompactionTrigger: Send + Sync + 'static {
    /// Request a system-wide compaction pass.
    fn compact(&self) -> Result<(), SourceError>;
}
