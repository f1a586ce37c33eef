//! Shared test fixtures.
#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use fragwatch::{CompactionTrigger, HistogramSource, SourceError, ZoneHistogram, MAX_ORDER};

/// In-memory stand-in for the buddy allocator.
///
/// Serves a settable histogram; `compact()` swaps in a post-compaction
/// histogram so live reports see a before/after difference.
pub struct FakeAllocator {
    current: Mutex<Vec<ZoneHistogram>>,
    after_compaction: Mutex<Option<Vec<ZoneHistogram>>>,
    reads: AtomicU64,
    compactions: AtomicU64,
}

impl FakeAllocator {
    pub fn new(zones: Vec<ZoneHistogram>) -> Arc<Self> {
        Arc::new(Self {
            current: Mutex::new(zones),
            after_compaction: Mutex::new(None),
            reads: AtomicU64::new(0),
            compactions: AtomicU64::new(0),
        })
    }

    /// Single "Normal" zone with the given low-order counts.
    pub fn single_zone(counts: &[u64]) -> Arc<Self> {
        Self::new(vec![zone("Normal", counts)])
    }

    pub fn set_zones(&self, zones: Vec<ZoneHistogram>) {
        *self.current.lock() = zones;
    }

    pub fn set_after_compaction(&self, zones: Vec<ZoneHistogram>) {
        *self.after_compaction.lock() = Some(zones);
    }

    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::Acquire)
    }

    pub fn compaction_count(&self) -> u64 {
        self.compactions.load(Ordering::Acquire)
    }
}

impl HistogramSource for FakeAllocator {
    fn read_zones(&self) -> Result<Vec<ZoneHistogram>, SourceError> {
        self.reads.fetch_add(1, Ordering::AcqRel);
        Ok(self.current.lock().clone())
    }
}

impl CompactionTrigger for FakeAllocator {
    fn compact(&self) -> Result<(), SourceError> {
        self.compactions.fetch_add(1, Ordering::AcqRel);
        if let Some(zones) = self.after_compaction.lock().take() {
            *self.current.lock() = zones;
        }
        Ok(())
    }
}

/// Build a zone histogram from a short count slice (rest zero).
pub fn zone(name: &str, counts: &[u64]) -> ZoneHistogram {
    let mut nr_free = [0u64; MAX_ORDER];
    nr_free[..counts.len()].copy_from_slice(counts);
    ZoneHistogram::new(0, name, nr_free)
}
