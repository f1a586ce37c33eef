//! Concurrent sample store
//!
//! Append-only, clearable log of [`Sample`]s plus the recording flag.
//! One mutex guards both, so restarting a recording session (clear the
//! series, flip the flag) is atomic with respect to concurrent appends
//! and snapshots. Critical sections are pure in-memory list and flag
//! operations; no I/O happens under the lock.

use parking_lot::Mutex;

use crate::metrics::Sample;

#[derive(Debug, Default)]
struct StoreInner {
    samples: Vec<Sample>,
    recording: bool,
}

/// Thread-safe store for the recorded sample series.
#[derive(Debug, Default)]
pub struct SampleStore {
    inner: Mutex<StoreInner>,
}

impl SampleStore {
    /// Create an empty store with recording disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample to the tail of the series. Always succeeds.
    pub fn append(&self, sample: Sample) {
        self.inner.lock().samples.push(sample);
    }

    /// Discard every stored sample.
    pub fn clear(&self) {
        self.inner.lock().samples.clear();
    }

    /// Number of stored samples.
    pub fn len(&self) -> usize {
        self.inner.lock().samples.len()
    }

    /// Whether the series is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().samples.is_empty()
    }

    /// Point-in-time copy of the series, in append order.
    ///
    /// A snapshot never observes a partial append, and holding on to it
    /// does not block writers.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.inner.lock().samples.clone()
    }

    /// Whether recording is currently enabled.
    pub fn is_recording(&self) -> bool {
        self.inner.lock().recording
    }

    /// Enable or disable recording.
    ///
    /// Enabling clears the series first, so every recording session
    /// starts empty; prior data is lost unless exported beforehand.
    /// Redundant calls are idempotent.
    pub fn set_recording(&self, enabled: bool) {
        let mut inner = self.inner.lock();
        if enabled {
            inner.samples.clear();
        }
        inner.recording = enabled;
    }

    /// Flip the recording flag, returning the new state.
    pub fn toggle_recording(&self) -> bool {
        let mut inner = self.inner.lock();
        let enabled = !inner.recording;
        if enabled {
            inner.samples.clear();
        }
        inner.recording = enabled;
        enabled
    }
}
