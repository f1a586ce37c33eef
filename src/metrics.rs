//! Fragmentation metric derivation
//!
//! Turns a raw free-block histogram into a [`Sample`]: total free pages,
//! usable-pages-at-order-k, and the unusable-free-space indicator. The
//! derivation is pure and infallible; an all-zero histogram yields an
//! all-zero sample.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::histogram::{ZoneHistogram, MAX_ORDER};

/// One recorded observation of the system's fragmentation state.
///
/// Immutable once created. `usable_pages[k]` is the number of pages that
/// would be available as blocks of order >= k if all free memory were
/// maximally compacted; it is non-increasing in `k`, and
/// `usable_pages[0] == free_pages`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// Wall-clock time the histogram was observed.
    pub timestamp: SystemTime,
    /// Free-block count per order, summed over the contributing zones.
    pub nr_free: [u64; MAX_ORDER],
    /// Total free pages: sum of `nr_free[k] * 2^k`.
    pub free_pages: u64,
    /// Pages obtainable as blocks of order >= k under full compaction.
    pub usable_pages: [u64; MAX_ORDER],
}

impl Sample {
    /// Unusable free space at order `k`, as a `(shortfall, total)` pair.
    ///
    /// The shortfall is the number of free pages that sit in blocks too
    /// small to satisfy an order-`k` allocation; the total is
    /// `free_pages`. The raw pair is the exported representation; see
    /// [`unusable_ratio`](Self::unusable_ratio) for the computed form.
    pub fn unusable_free_space(&self, order: usize) -> (u64, u64) {
        (self.free_pages - self.usable_pages[order], self.free_pages)
    }

    /// Unusable free space at order `k` as a ratio in `[0, 1]`.
    ///
    /// Convenience over [`unusable_free_space`](Self::unusable_free_space);
    /// returns 0 when there is no free memory at all.
    pub fn unusable_ratio(&self, order: usize) -> f64 {
        let (shortfall, total) = self.unusable_free_space(order);
        if total == 0 {
            0.0
        } else {
            shortfall as f64 / total as f64
        }
    }

    /// Timestamp as whole seconds since the Unix epoch.
    pub fn epoch_secs(&self) -> u64 {
        self.timestamp
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// Derive a [`Sample`] from the given zone histograms.
///
/// Counts are summed across every zone on every node, or restricted to
/// zones whose name equals `zone_filter` when one is given. Zones that
/// do not match contribute nothing.
pub fn compute_sample(
    zones: &[ZoneHistogram],
    zone_filter: Option<&str>,
    timestamp: SystemTime,
) -> Sample {
    let mut nr_free = [0u64; MAX_ORDER];
    for zone in zones {
        if let Some(name) = zone_filter {
            if zone.zone != name {
                continue;
            }
        }
        for (order, count) in zone.nr_free.iter().enumerate() {
            nr_free[order] += count;
        }
    }

    let free_pages = nr_free
        .iter()
        .enumerate()
        .map(|(order, &count)| count << order)
        .sum();

    // Top-down cumulative sum: usable_pages[k] = usable_pages[k+1] + nr_free[k]*2^k.
    let mut usable_pages = [0u64; MAX_ORDER];
    let mut acc = 0u64;
    for order in (0..MAX_ORDER).rev() {
        acc += nr_free[order] << order;
        usable_pages[order] = acc;
    }

    Sample {
        timestamp,
        nr_free,
        free_pages,
        usable_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(name: &str, counts: &[u64]) -> ZoneHistogram {
        let mut nr_free = [0u64; MAX_ORDER];
        nr_free[..counts.len()].copy_from_slice(counts);
        ZoneHistogram::new(0, name, nr_free)
    }

    #[test]
    fn test_all_zero_histogram() {
        let sample = compute_sample(&[zone("Normal", &[])], None, SystemTime::now());

        assert_eq!(sample.free_pages, 0);
        assert_eq!(sample.usable_pages, [0; MAX_ORDER]);
        assert_eq!(sample.unusable_free_space(0), (0, 0));
        assert_eq!(sample.unusable_ratio(0), 0.0);
    }

    #[test]
    fn test_single_order_zero_blocks() {
        // nr_free = [4, 0, 0, ...]: four single pages.
        let sample = compute_sample(&[zone("Normal", &[4])], None, SystemTime::now());

        assert_eq!(sample.free_pages, 4);
        assert_eq!(sample.usable_pages[0], 4);
        assert_eq!(sample.usable_pages[1], 0);
        assert_eq!(sample.usable_pages[2], 0);
        // Every free page is unusable for order-1 allocations.
        assert_eq!(sample.unusable_free_space(1), (4, 4));
    }

    #[test]
    fn test_mid_order_blocks() {
        // nr_free = [0, 2, 0, ...]: two order-1 blocks = 4 pages.
        let sample = compute_sample(&[zone("Normal", &[0, 2, 0])], None, SystemTime::now());

        assert_eq!(sample.free_pages, 4);
        assert_eq!(sample.usable_pages[0], 4);
        assert_eq!(sample.usable_pages[1], 4);
        assert_eq!(sample.usable_pages[2], 0);
        assert_eq!(sample.unusable_free_space(2), (4, 4));
        assert_eq!(sample.unusable_free_space(1), (0, 4));
    }

    #[test]
    fn test_usable_pages_monotone_non_increasing() {
        let counts = [7, 5, 3, 2, 1, 1, 0, 2, 0, 1, 4];
        let sample = compute_sample(&[zone("Normal", &counts)], None, SystemTime::now());

        assert_eq!(sample.usable_pages[0], sample.free_pages);
        for order in 1..MAX_ORDER {
            assert!(sample.usable_pages[order] <= sample.usable_pages[order - 1]);
        }
        assert_eq!(
            sample.usable_pages[MAX_ORDER - 1],
            counts[MAX_ORDER - 1] << (MAX_ORDER - 1)
        );
    }

    #[test]
    fn test_sums_across_zones_and_nodes() {
        let mut z0 = zone("Normal", &[1, 1]);
        let mut z1 = zone("Normal", &[2, 0]);
        z1.node = 1;
        let dma = zone("DMA", &[10]);
        z0.node = 0;

        let sample = compute_sample(&[z0, z1, dma], None, SystemTime::now());
        assert_eq!(sample.nr_free[0], 13);
        assert_eq!(sample.nr_free[1], 1);
    }

    #[test]
    fn test_zone_filter_restricts_counts() {
        let zones = vec![zone("Normal", &[1, 1]), zone("DMA", &[10])];
        let sample = compute_sample(&zones, Some("Normal"), SystemTime::now());

        assert_eq!(sample.nr_free[0], 1);
        assert_eq!(sample.free_pages, 3);
    }

    #[test]
    fn test_zone_filter_no_match_is_empty_sample() {
        let zones = vec![zone("DMA", &[10])];
        let sample = compute_sample(&zones, Some("Movable"), SystemTime::now());
        assert_eq!(sample.free_pages, 0);
    }

    #[test]
    fn test_unusable_ratio() {
        let sample = compute_sample(&[zone("Normal", &[4, 0, 1])], None, SystemTime::now());

        // 8 free pages, 4 of them usable at order 2.
        assert_eq!(sample.free_pages, 8);
        assert_eq!(sample.unusable_free_space(2), (4, 8));
        assert!((sample.unusable_ratio(2) - 0.5).abs() < f64::EPSILON);
        assert_eq!(sample.unusable_ratio(0), 0.0);
    }
}
