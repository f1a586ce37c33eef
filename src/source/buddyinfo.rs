//! `/proc/buddyinfo`-backed histogram source
//!
//! Each buddyinfo line reports one zone:
//!
//! ```text
//! Node 0, zone   Normal   1046    529    248    126     58     28     14      6      3      2    203
//! ```
//!
//! Every line is parsed, so multi-node machines contribute all of their
//! zones. Lines with fewer than `MAX_ORDER` counts (older kernels with a
//! smaller `MAX_ORDER`) are zero-padded; extra columns are rejected.

use std::fs;
use std::path::{Path, PathBuf};

use crate::histogram::{ZoneHistogram, MAX_ORDER};
use crate::source::{HistogramSource, SourceError};

/// Default location of the kernel's buddy allocator statistics.
pub const DEFAULT_BUDDYINFO_PATH: &str = "/proc/buddyinfo";

/// Histogram source reading a buddyinfo-format file.
#[derive(Debug, Clone)]
pub struct BuddyinfoSource {
    path: PathBuf,
}

impl BuddyinfoSource {
    /// Create a source reading from the given buddyinfo-format file.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path this source reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for BuddyinfoSource {
    fn default() -> Self {
        Self::new(DEFAULT_BUDDYINFO_PATH)
    }
}

impl HistogramSource for BuddyinfoSource {
    fn read_zones(&self) -> Result<Vec<ZoneHistogram>, SourceError> {
        let contents = fs::read_to_string(&self.path)?;
        parse_buddyinfo(&contents)
    }
}

/// Parse the full contents of a buddyinfo-format file.
pub fn parse_buddyinfo(contents: &str) -> Result<Vec<ZoneHistogram>, SourceError> {
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_zone_line)
        .collect()
}

fn parse_zone_line(line: &str) -> Result<ZoneHistogram, SourceError> {
    let malformed = || SourceError::Parse {
        line: line.to_string(),
    };

    // "Node <id>," then "zone <name>" then the per-order counts.
    let rest = line.trim_start().strip_prefix("Node").ok_or_else(malformed)?;
    let (node_str, rest) = rest.split_once(',').ok_or_else(malformed)?;
    let node: u32 = node_str.trim().parse().map_err(|_| malformed())?;

    let rest = rest.trim_start().strip_prefix("zone").ok_or_else(malformed)?;
    let mut fields = rest.split_whitespace();
    let zone = fields.next().ok_or_else(malformed)?.to_string();

    let mut nr_free = [0u64; MAX_ORDER];
    let mut order = 0usize;
    for field in fields {
        if order >= MAX_ORDER {
            return Err(malformed());
        }
        nr_free[order] = field.parse().map_err(|_| malformed())?;
        order += 1;
    }
    if order == 0 {
        return Err(malformed());
    }

    Ok(ZoneHistogram { node, zone, nr_free })
}
