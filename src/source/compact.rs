//! Sysctl-backed compaction trigger
//!
//! Writing `1` to `/proc/sys/vm/compact_memory` asks the kernel to run a
//! full compaction pass over all zones. The write returns before the
//! compaction effect is necessarily complete; callers observe the result
//! through a fresh histogram read.

use std::fs;
use std::path::{Path, PathBuf};

use crate::source::{CompactionTrigger, SourceError};

/// Default location of the compaction sysctl.
pub const DEFAULT_COMPACT_PATH: &str = "/proc/sys/vm/compact_memory";

/// Compaction trigger writing to a sysctl-style file.
#[derive(Debug, Clone)]
pub struct SysctlCompactionTrigger {
    path: PathBuf,
}

impl SysctlCompactionTrigger {
    /// Create a trigger writing to the given sysctl file.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path this trigger writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for SysctlCompactionTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_COMPACT_PATH)
    }
}

impl CompactionTrigger for SysctlCompactionTrigger {
    fn compact(&self) -> Result<(), SourceError> {
        fs::write(&self.path, "1\n")
            .map_err(|e| SourceError::CompactionFailed(format!("{}: {e}", self.path.display())))
    }
}
