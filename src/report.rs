//! Read-only reporting surface
//!
//! Two outputs: a live before/after-compaction histogram comparison and
//! a CSV dump of the recorded series. The live report is disruptive (it
//! triggers a real compaction pass) and is serialized internally so the
//! trigger is never invoked reentrantly. CSV serialization works on a
//! store snapshot, never while holding the store lock.

use std::fmt::{self, Write as _};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use crate::histogram::{ZoneHistogram, MAX_ORDER};
use crate::source::{CompactionTrigger, HistogramSource, SourceError};
use crate::store::SampleStore;

/// Before/after-compaction histogram comparison.
///
/// When the compaction trigger fails, `after` is absent and
/// `compaction_error` carries the failure text; the request itself still
/// succeeds with the "before" view.
#[derive(Debug, Clone)]
pub struct LiveReport {
    /// Zone histograms read before compaction.
    pub before: Vec<ZoneHistogram>,
    /// Zone histograms read after compaction, if it ran.
    pub after: Option<Vec<ZoneHistogram>>,
    /// Failure text when the compaction trigger failed.
    pub compaction_error: Option<String>,
}

impl fmt::Display for LiveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Before compaction:")?;
        for zone in &self.before {
            writeln!(f, "{zone}")?;
        }
        match &self.after {
            Some(after) => {
                writeln!(f, "After compaction:")?;
                for zone in after {
                    writeln!(f, "{zone}")?;
                }
            }
            None => {
                let reason = self.compaction_error.as_deref().unwrap_or("unknown");
                writeln!(f, "Compaction failed: {reason}")?;
            }
        }
        Ok(())
    }
}

/// Read-only query surface over the store and the external sources.
pub struct Reporter {
    source: Arc<dyn HistogramSource>,
    trigger: Arc<dyn CompactionTrigger>,
    store: Arc<SampleStore>,
    // Serializes live reports; the trigger is not assumed reentrant.
    live_lock: Mutex<()>,
}

impl Reporter {
    /// Create a reporter over the given source, trigger, and store.
    pub fn new(
        source: Arc<dyn HistogramSource>,
        trigger: Arc<dyn CompactionTrigger>,
        store: Arc<SampleStore>,
    ) -> Self {
        Self {
            source,
            trigger,
            store,
            live_lock: Mutex::new(()),
        }
    }

    /// Produce a live before/after-compaction comparison.
    ///
    /// Reads the histogram, fires the compaction trigger once, and reads
    /// again. A failed trigger degrades the report (before-only plus an
    /// error note) rather than failing it; a failed initial read fails
    /// the request. Concurrent calls are serialized.
    pub fn live_report(&self) -> Result<LiveReport, SourceError> {
        let _guard = self.live_lock.lock();

        let before = self.source.read_zones()?;
        match self.trigger.compact() {
            Ok(()) => {
                let after = self.source.read_zones()?;
                Ok(LiveReport {
                    before,
                    after: Some(after),
                    compaction_error: None,
                })
            }
            Err(e) => {
                warn!(error = %e, "compaction trigger failed, reporting pre-compaction state only");
                Ok(LiveReport {
                    before,
                    after: None,
                    compaction_error: Some(e.to_string()),
                })
            }
        }
    }

    /// CSV header line for the exported series.
    pub fn csv_header() -> String {
        let mut header = String::from("time");
        for order in 0..MAX_ORDER {
            write!(
                header,
                ",unusable_free_space_index_{order},free_blocks_{order}"
            )
            .expect("write to string");
        }
        header
    }

    /// Export the recorded series as CSV text.
    ///
    /// One row per sample; order-k cells are the raw
    /// `shortfall/free_pages` pair followed by `nr_free[k]`. An empty
    /// series yields a header-only document.
    pub fn export_csv(&self) -> String {
        let snapshot = self.store.snapshot();

        let mut output = Self::csv_header();
        output.push('\n');
        for sample in &snapshot {
            write!(output, "{}", sample.epoch_secs()).expect("write to string");
            for order in 0..MAX_ORDER {
                let (shortfall, total) = sample.unusable_free_space(order);
                write!(output, ",{shortfall}/{total},{}", sample.nr_free[order])
                    .expect("write to string");
            }
            output.push('\n');
        }
        output
    }
}
