//! Per-object processing outcomes
//!
//! Outcomes are not persisted; they exist for the duration of a run and are
//! observable through emitted events and the run summary.

use std::fmt;

/// Why an object was not split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Under an archive sub-prefix
    Archived,
    /// Inside a per-object output folder or the archive folder
    OutputFolder,
    /// Name already has the fragment shape
    AlreadySplit,
    /// Document has no usable key value
    MissingKey,
    /// Listed path lies outside the source prefix
    OutsidePrefix,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::Archived => "archived",
            SkipReason::OutputFolder => "in_output_folder",
            SkipReason::AlreadySplit => "already_split",
            SkipReason::MissingKey => "missing_key",
            SkipReason::OutsidePrefix => "outside_prefix",
        };
        f.write_str(s)
    }
}

/// Result of processing one listed object
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingOutcome {
    /// Not split
    Skipped(SkipReason),

    /// None of the configured objects were present; the original stays at its source path
    LeftInPlace,

    /// Fragments produced but the original was not moved (dry run)
    Split {
        /// Fragment paths
        fragments: Vec<String>,
    },

    /// Fragments produced and the original moved to the archive folder
    Archived {
        /// Fragment paths
        fragments: Vec<String>,
        /// Where the original now lives
        archive_path: String,
    },
}

impl ProcessingOutcome {
    /// Number of fragments produced
    pub fn fragment_count(&self) -> usize {
        match self {
            ProcessingOutcome::Split { fragments }
            | ProcessingOutcome::Archived { fragments, .. } => fragments.len(),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_count() {
        assert_eq!(ProcessingOutcome::Skipped(SkipReason::AlreadySplit).fragment_count(), 0);
        assert_eq!(ProcessingOutcome::LeftInPlace.fragment_count(), 0);
        let outcome = ProcessingOutcome::Archived {
            fragments: vec!["a".to_string(), "b".to_string()],
            archive_path: "c".to_string(),
        };
        assert_eq!(outcome.fragment_count(), 2);
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::MissingKey.to_string(), "missing_key");
    }
}
