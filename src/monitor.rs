//! Monitor façade
//!
//! [`FragMonitor`] wires the configured histogram source, compaction
//! trigger, sample store, periodic sampler, and reporter together and
//! exposes the transport-agnostic operations surface: `info` (live
//! report), `record` (toggle), and `data` (CSV export). A transport
//! layer - HTTP handler, CLI subcommand, pseudo-file - only needs to
//! call these and return the strings.

use std::sync::Arc;

use crate::config::{ConfigError, FragwatchConfig};
use crate::report::{LiveReport, Reporter};
use crate::sampler::{PeriodicSampler, SamplerConfig, SamplerState};
use crate::source::{CompactionTrigger, HistogramSource, SourceError};
use crate::store::SampleStore;

/// Status string returned when recording turns on.
pub const RECORDING_STARTED: &str = "Recording started.";
/// Status string returned when recording turns off.
pub const RECORDING_STOPPED: &str = "Recording stopped.";

/// The assembled fragmentation monitor.
///
/// The sampler worker starts with the monitor and idles (disarmed)
/// until recording is toggled on. Dropping the monitor stops the worker
/// and discards the series.
pub struct FragMonitor {
    store: Arc<SampleStore>,
    reporter: Reporter,
    sampler: PeriodicSampler,
}

impl FragMonitor {
    /// Assemble a monitor from explicit parts.
    pub fn new(
        config: SamplerConfig,
        source: Arc<dyn HistogramSource>,
        trigger: Arc<dyn CompactionTrigger>,
    ) -> Self {
        let store = Arc::new(SampleStore::new());
        let reporter = Reporter::new(Arc::clone(&source), trigger, Arc::clone(&store));
        let mut sampler = PeriodicSampler::new(config, source, Arc::clone(&store));
        sampler.start();

        Self {
            store,
            reporter,
            sampler,
        }
    }

    /// Assemble a monitor from loaded configuration.
    ///
    /// Fails fast on invalid configuration (e.g. a zero sampling rate);
    /// nothing is spawned in that case.
    pub fn from_config(config: &FragwatchConfig) -> Result<Self, ConfigError> {
        let sampler_config = config.to_sampler_config()?;
        let source: Arc<dyn HistogramSource> = Arc::new(config.histogram_source());
        let trigger: Arc<dyn CompactionTrigger> = Arc::new(config.compaction_trigger());
        Ok(Self::new(sampler_config, source, trigger))
    }

    /// Toggle recording, returning the human-readable status line.
    pub fn toggle_record(&self) -> &'static str {
        if self.store.toggle_recording() {
            RECORDING_STARTED
        } else {
            RECORDING_STOPPED
        }
    }

    /// Whether recording is currently enabled.
    pub fn is_recording(&self) -> bool {
        self.store.is_recording()
    }

    /// Produce the live before/after-compaction report.
    pub fn live_report(&self) -> Result<LiveReport, SourceError> {
        self.reporter.live_report()
    }

    /// Live report rendered as text (the `info` operation).
    pub fn info(&self) -> Result<String, SourceError> {
        Ok(self.live_report()?.to_string())
    }

    /// CSV export of the current/last recorded series.
    pub fn export_csv(&self) -> String {
        self.reporter.export_csv()
    }

    /// Current sampler worker state.
    pub fn sampler_state(&self) -> SamplerState {
        self.sampler.state()
    }

    /// Shared handle to the sample store.
    pub fn store(&self) -> &Arc<SampleStore> {
        &self.store
    }

    /// Stop the sampler and discard the recorded series.
    pub fn shutdown(&mut self) {
        self.store.set_recording(false);
        self.sampler.stop();
        self.store.clear();
    }
}
