//! Run driver - one full pass over the source namespace
//!
//! Objects are listed once and processed strictly one at a time:
//! classify, read, split, then archive when at least one fragment was
//! produced. Every meaningful step is reported through the event sink.
//!
//! A failure on one object is recorded and the run moves on to the next
//! object. With `application.fail_fast` the first failure aborts the run
//! instead. A listing failure always aborts.

use crate::adapters::storage::BlobStore;
use crate::config::SplitterConfig;
use crate::core::archive::ArchivalTransition;
use crate::core::classify::PathClassifier;
use crate::core::run::summary::{ObjectFailure, RunSummary};
use crate::core::split::{DocumentSplitter, SplitDecision};
use crate::domain::layout::base_name;
use crate::domain::{ProcessingOutcome, SkipReason, SourceLayout, Step, StepContext, StepFailure};
use crate::logging::events::{names, Event, EventSink, Severity};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Drives a single split run
pub struct RunDriver {
    store: Arc<dyn BlobStore>,
    config: SplitterConfig,
    layout: SourceLayout,
    sink: Arc<dyn EventSink>,
    run_id: Uuid,
}

impl RunDriver {
    /// Create a new run driver
    ///
    /// `config` is expected to be validated; it is not modified during the run.
    pub fn new(store: Arc<dyn BlobStore>, config: SplitterConfig, sink: Arc<dyn EventSink>) -> Self {
        let layout = config.layout();
        Self {
            store,
            config,
            layout,
            sink,
            run_id: Uuid::new_v4(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn layout(&self) -> &SourceLayout {
        &self.layout
    }

    fn dry_run(&self) -> bool {
        self.config.application.dry_run
    }

    /// Performs one full pass
    ///
    /// # Errors
    ///
    /// Returns the failure that aborted the run: a listing failure, or with
    /// `fail_fast` the first per-object failure. It has already been
    /// reported as a `General Error` event.
    pub async fn run(&self) -> Result<RunSummary, StepFailure> {
        let start_time = Instant::now();
        let mut summary = RunSummary::new(self.run_id, self.dry_run());

        self.emit(
            Event::info(names::START, "Starting quote split run")
                .with_property("source_prefix", self.layout.prefix())
                .with_property("dry_run", self.dry_run()),
        );

        let paths = match self
            .store
            .list(self.layout.prefix())
            .await
            .at_step(Step::ListObjects, self.layout.prefix())
        {
            Ok(paths) => paths,
            Err(failure) => {
                self.report_fatal(&failure);
                return Err(failure);
            }
        };
        summary.listed = paths.len();

        let classifier = PathClassifier::new(self.layout.clone(), &self.config.split);

        for path in &paths {
            let classification = classifier.classify(path);
            if let Some(reason) = classification.skip_reason() {
                tracing::debug!(path = %path, reason = %reason, "Skipping object");
                summary.record_skip(reason);
                continue;
            }

            summary.eligible += 1;
            match self.process_object(path).await {
                Ok(outcome) => summary.record(&outcome),
                Err(failure) if self.config.application.fail_fast => {
                    self.report_fatal(&failure);
                    return Err(failure);
                }
                Err(failure) => {
                    self.emit(
                        Event::error(names::PROCESSING_FAILED, "Failed to process quote")
                            .with_unit(failure.step.as_str())
                            .with_property("blob_name", path.as_str())
                            .with_property("error_msg", failure.source.to_string()),
                    );
                    summary.add_failure(ObjectFailure::new(path.as_str(), &failure));
                }
            }
        }

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();

        let severity = if summary.is_successful() {
            Severity::Info
        } else {
            Severity::Warning
        };
        self.emit(
            Event::new(names::RUN_COMPLETED, "Quote split run completed", severity)
                .with_property("listed", summary.listed)
                .with_property("eligible", summary.eligible)
                .with_property("split", summary.split)
                .with_property("fragments", summary.fragments_written)
                .with_property("archived", summary.archived)
                .with_property("left_in_place", summary.left_in_place)
                .with_property("skipped", summary.skipped())
                .with_property("failed", summary.failed())
                .with_property("duration_ms", summary.duration.as_millis() as u64),
        );

        Ok(summary)
    }

    /// Reads, splits and archives one eligible original
    ///
    /// # Errors
    ///
    /// Returns the first failing step. Fragments or archive copies written
    /// before it are kept.
    pub async fn process_object(&self, path: &str) -> Result<ProcessingOutcome, StepFailure> {
        let content = self
            .store
            .read(path)
            .await
            .at_step(Step::ReadObject, path)?;

        let splitter = DocumentSplitter::new(&self.layout, &self.config.split);
        let plan = match splitter.plan(path, base_name(path), &content, Utc::now())? {
            SplitDecision::MissingKey => {
                self.emit(
                    Event::warning(
                        names::SPLIT_SKIPPED,
                        format!(
                            "Key field '{}' not found in quote data",
                            self.config.split.key_field
                        ),
                    )
                    .with_property("blob_name", path),
                );
                return Ok(ProcessingOutcome::Skipped(SkipReason::MissingKey));
            }
            SplitDecision::Split(plan) => plan,
        };

        if !plan.split_successful() {
            self.emit(
                Event::info(
                    names::LEFT_IN_PLACE,
                    "No configured objects found, original left in place",
                )
                .with_property("blob_name", path)
                .with_property("quote_id", plan.key.as_str()),
            );
            return Ok(ProcessingOutcome::LeftInPlace);
        }

        if self.dry_run() {
            for fragment in &plan.fragments {
                self.emit(
                    Event::info(names::SPLIT_SUCCESS, "Split quote object planned (dry run)")
                        .with_property("blob_name", fragment.path.as_str())
                        .with_property("object_name", fragment.document.object_name())
                        .with_property("quote_id", plan.key.as_str())
                        .with_property("dry_run", true),
                );
            }
            tracing::info!(
                path = %path,
                archive_path = %self.layout.archive_path(base_name(path)),
                "Dry run: original would be archived"
            );
            return Ok(ProcessingOutcome::Split {
                fragments: plan.fragment_paths(),
            });
        }

        let report = splitter.write(self.store.as_ref(), &plan).await?;
        for fragment in &report.fragments {
            self.emit(
                Event::info(names::SPLIT_SUCCESS, "Split quote object uploaded")
                    .with_property("blob_name", fragment.path.as_str())
                    .with_property("object_name", fragment.object_name.as_str())
                    .with_property("quote_id", plan.key.as_str()),
            );
        }

        let receipt = ArchivalTransition::new(self.store.as_ref(), &self.layout)
            .with_verification(self.config.archive.verify_copy)
            .archive(path, &content)
            .await?;

        self.emit(
            Event::info(
                names::MOVED_TO_ORIGINAL,
                "Original quote moved to original folder",
            )
            .with_property("original_path", receipt.source_path.as_str())
            .with_property("new_path", receipt.archive_path.as_str())
            .with_property("quote_id", plan.key.as_str())
            .with_property("verified", receipt.verified),
        );

        Ok(ProcessingOutcome::Archived {
            fragments: report.fragments.into_iter().map(|f| f.path).collect(),
            archive_path: receipt.archive_path,
        })
    }

    /// Reports a run-ending failure once
    fn report_fatal(&self, failure: &StepFailure) {
        let mut event = Event::error(names::GENERAL_ERROR, "Failed to execute function")
            .with_unit(failure.step.as_str())
            .with_property("error_msg", failure.source.to_string());
        if let Some(path) = &failure.path {
            event = event.with_property("blob_name", path.as_str());
        }
        self.emit(event);
    }

    fn emit(&self, event: Event) {
        self.sink.emit(&event.with_run_id(self.run_id));
    }
}
