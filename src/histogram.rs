//! Per-zone free-block histograms
//!
//! The buddy allocator tracks free memory as blocks of `2^order` pages.
//! A [`ZoneHistogram`] is one zone's view of that state: the number of
//! free blocks at each order, tagged with the owning NUMA node and the
//! zone name (e.g. "Normal").

use std::fmt;

/// Number of allocation orders tracked per zone.
///
/// Matches the kernel's `MAX_ORDER`: blocks range from `2^0` to
/// `2^(MAX_ORDER-1)` pages.
pub const MAX_ORDER: usize = 11;

/// Free-block counts for a single zone on a single node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneHistogram {
    /// NUMA node id.
    pub node: u32,
    /// Zone name as reported by the source, e.g. "DMA", "Normal".
    pub zone: String,
    /// Free-block count per order; `nr_free[k]` counts blocks of
    /// exactly `2^k` pages.
    pub nr_free: [u64; MAX_ORDER],
}

impl ZoneHistogram {
    /// Create a histogram for the given node and zone.
    pub fn new(node: u32, zone: impl Into<String>, nr_free: [u64; MAX_ORDER]) -> Self {
        Self {
            node,
            zone: zone.into(),
            nr_free,
        }
    }

    /// Total free pages in this zone.
    pub fn free_pages(&self) -> u64 {
        self.nr_free
            .iter()
            .enumerate()
            .map(|(order, &count)| count << order)
            .sum()
    }
}

impl fmt::Display for ZoneHistogram {
    /// Renders one zone line in the `/proc/buddyinfo` style:
    /// `Node 0, zone   Normal      1      2 ...`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node {}, zone {:>8} ", self.node, self.zone)?;
        for count in &self.nr_free {
            write!(f, "{:>6} ", count)?;
        }
        Ok(())
    }
}
