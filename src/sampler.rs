//! Periodic background sampler
//!
//! A background worker thread that, while recording is enabled, reads
//! the histogram source once per interval, derives a sample, and appends
//! it to the store. The timer is self-rescheduling: the next wait starts
//! after the current tick's work completes, so ticks never overlap and
//! drift accumulates by the per-tick latency. A failed histogram read
//! skips that tick and keeps the worker alive.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime};

use tracing::{debug, warn};

use crate::metrics::compute_sample;
use crate::source::HistogramSource;
use crate::store::SampleStore;

/// Configuration for the periodic sampler.
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Interval between samples.
    pub interval: Duration,
    /// When set, only zones with this name contribute to a sample.
    pub zone: Option<String>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            zone: None,
        }
    }
}

impl SamplerConfig {
    /// Create a new sampler configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sampling interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Restrict sampling to the named zone.
    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }
}

/// State of the sampler worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    /// Worker thread is not running.
    Stopped,
    /// Worker is running but recording is off; no samples are taken.
    Disarmed,
    /// Worker is waiting for the next tick.
    Armed,
    /// Worker is reading the source and appending a sample.
    Sampling,
}

/// Background worker producing one sample per interval while recording.
///
/// Stopping is cooperative: a tick already in progress completes its
/// append before the worker observes the stop. Dropping the sampler
/// stops it.
pub struct PeriodicSampler {
    config: SamplerConfig,
    source: Arc<dyn HistogramSource>,
    store: Arc<SampleStore>,
    running: Arc<AtomicBool>,
    state: Arc<AtomicU8>,
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl PeriodicSampler {
    /// Create a sampler reading from `source` and appending to `store`.
    pub fn new(
        config: SamplerConfig,
        source: Arc<dyn HistogramSource>,
        store: Arc<SampleStore>,
    ) -> Self {
        Self {
            config,
            source,
            store,
            running: Arc::new(AtomicBool::new(false)),
            state: Arc::new(AtomicU8::new(SamplerState::Stopped as u8)),
            stop_tx: None,
            handle: None,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Get the current worker state.
    pub fn state(&self) -> SamplerState {
        match self.state.load(Ordering::Acquire) {
            1 => SamplerState::Disarmed,
            2 => SamplerState::Armed,
            3 => SamplerState::Sampling,
            _ => SamplerState::Stopped,
        }
    }

    /// Check if the worker thread is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Start the worker thread.
    ///
    /// Returns true if the worker was started, false if already running.
    /// Starting does not by itself record anything; samples are taken
    /// only while the store's recording flag is set.
    pub fn start(&mut self) -> bool {
        if self.running.swap(true, Ordering::AcqRel) {
            return false;
        }

        let (stop_tx, stop_rx) = mpsc::channel();
        let running = Arc::clone(&self.running);
        let state = Arc::clone(&self.state);
        let source = Arc::clone(&self.source);
        let store = Arc::clone(&self.store);
        let config = self.config.clone();

        debug!(interval = ?config.interval, "sampler started");
        let handle = thread::spawn(move || {
            Self::worker_loop(running, state, stop_rx, source, store, config);
        });

        self.stop_tx = Some(stop_tx);
        self.handle = Some(handle);
        true
    }

    /// Stop the worker thread and wait for it to finish.
    ///
    /// Wakes the worker out of its interval wait, so stopping does not
    /// take a full interval even at large sampling rates.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        // Dropping the sender disconnects the channel and wakes the wait.
        drop(self.stop_tx.take());

        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
            debug!("sampler stopped");
        }

        self.state
            .store(SamplerState::Stopped as u8, Ordering::Release);
    }

    fn worker_loop(
        running: Arc<AtomicBool>,
        state: Arc<AtomicU8>,
        stop_rx: Receiver<()>,
        source: Arc<dyn HistogramSource>,
        store: Arc<SampleStore>,
        config: SamplerConfig,
    ) {
        while running.load(Ordering::Acquire) {
            let armed = store.is_recording();
            state.store(
                if armed {
                    SamplerState::Armed as u8
                } else {
                    SamplerState::Disarmed as u8
                },
                Ordering::Release,
            );

            // One interval's wait, interruptible by stop().
            match stop_rx.recv_timeout(config.interval) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }

            // The tick fires only if recording was on for the whole wait.
            if !armed || !store.is_recording() {
                continue;
            }

            state.store(SamplerState::Sampling as u8, Ordering::Release);
            match source.read_zones() {
                Ok(zones) => {
                    let sample =
                        compute_sample(&zones, config.zone.as_deref(), SystemTime::now());
                    store.append(sample);
                }
                Err(e) => {
                    // Fail-soft: skip this tick, keep the timer armed.
                    warn!(error = %e, "histogram read failed, skipping tick");
                }
            }
        }

        state.store(SamplerState::Stopped as u8, Ordering::Release);
    }
}

impl Drop for PeriodicSampler {
    fn drop(&mut self) {
        self.stop();
    }
}
