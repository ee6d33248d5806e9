//! Run summary and reporting
//!
//! Outcomes are tallied per run; nothing here is persisted.

use crate::domain::{ProcessingOutcome, SkipReason, Step, StepFailure};
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

/// Summary of one pass over the source namespace
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Identifier shared by every event of the run
    pub run_id: Uuid,

    /// Whether writes and deletes were suppressed
    pub dry_run: bool,

    /// Objects returned by the listing
    pub listed: usize,

    /// Objects classified as unprocessed originals
    pub eligible: usize,

    /// Under an archive sub-prefix
    pub skipped_archived: usize,

    /// Inside an output folder
    pub skipped_output_folder: usize,

    /// Name already has the fragment shape
    pub skipped_already_split: usize,

    /// Not under the source prefix
    pub skipped_outside_prefix: usize,

    /// Documents without a usable key value
    pub skipped_missing_key: usize,

    /// Originals for which at least one fragment was produced
    pub split: usize,

    /// Fragments written (or planned, in a dry run)
    pub fragments_written: usize,

    /// Originals moved into the archive folder
    pub archived: usize,

    /// Originals without any configured object, left at their source path
    pub left_in_place: usize,

    /// Per-object failures
    pub failures: Vec<ObjectFailure>,

    /// Duration of the run
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

impl RunSummary {
    /// Create a new empty summary
    pub fn new(run_id: Uuid, dry_run: bool) -> Self {
        Self {
            run_id,
            dry_run,
            listed: 0,
            eligible: 0,
            skipped_archived: 0,
            skipped_output_folder: 0,
            skipped_already_split: 0,
            skipped_outside_prefix: 0,
            skipped_missing_key: 0,
            split: 0,
            fragments_written: 0,
            archived: 0,
            left_in_place: 0,
            failures: Vec::new(),
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Counts a skipped path
    pub fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Archived => self.skipped_archived += 1,
            SkipReason::OutputFolder => self.skipped_output_folder += 1,
            SkipReason::AlreadySplit => self.skipped_already_split += 1,
            SkipReason::OutsidePrefix => self.skipped_outside_prefix += 1,
            SkipReason::MissingKey => self.skipped_missing_key += 1,
        }
    }

    /// Counts the outcome of an eligible object
    pub fn record(&mut self, outcome: &ProcessingOutcome) {
        match outcome {
            ProcessingOutcome::Skipped(reason) => self.record_skip(*reason),
            ProcessingOutcome::LeftInPlace => self.left_in_place += 1,
            ProcessingOutcome::Split { fragments } => {
                self.split += 1;
                self.fragments_written += fragments.len();
            }
            ProcessingOutcome::Archived { fragments, .. } => {
                self.split += 1;
                self.fragments_written += fragments.len();
                self.archived += 1;
            }
        }
    }

    /// Records a failed object
    pub fn add_failure(&mut self, failure: ObjectFailure) {
        self.failures.push(failure);
    }

    /// Total skipped paths, for any reason
    pub fn skipped(&self) -> usize {
        self.skipped_archived
            + self.skipped_output_folder
            + self.skipped_already_split
            + self.skipped_outside_prefix
            + self.skipped_missing_key
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Check if every eligible object was processed without failure
    pub fn is_successful(&self) -> bool {
        self.failures.is_empty()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            dry_run = self.dry_run,
            listed = self.listed,
            eligible = self.eligible,
            skipped = self.skipped(),
            missing_key = self.skipped_missing_key,
            split = self.split,
            fragments = self.fragments_written,
            archived = self.archived,
            left_in_place = self.left_in_place,
            failed = self.failed(),
            duration_ms = self.duration.as_millis() as u64,
            "Run completed"
        );

        for failure in &self.failures {
            tracing::warn!(
                path = %failure.path,
                step = %failure.step,
                message = %failure.message,
                "Object failed"
            );
        }
    }
}

/// An object that could not be processed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectFailure {
    /// Original being processed
    pub path: String,

    /// Step that failed
    #[serde(serialize_with = "serialize_step")]
    pub step: Step,

    /// Error message
    pub message: String,
}

impl ObjectFailure {
    pub fn new(path: impl Into<String>, failure: &StepFailure) -> Self {
        Self {
            path: path.into(),
            step: failure.step,
            message: failure.source.to_string(),
        }
    }
}

fn serialize_step<S: serde::Serializer>(step: &Step, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(step.as_str())
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}
