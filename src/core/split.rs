//! Document splitting
//!
//! Splitting happens in two phases. [`DocumentSplitter::plan`] is pure: it
//! parses the original and decides which fragments to produce and where.
//! [`DocumentSplitter::write`] uploads a plan, overwriting existing objects,
//! so re-running on the same input yields byte-identical fragments.

use crate::adapters::storage::BlobStore;
use crate::config::SplitConfig;
use crate::domain::document::key_display;
use crate::domain::layout::fragment_file_name;
use crate::domain::{
    FileNameParts, FragmentDocument, QuoteDocument, SourceLayout, Step, StepContext, StepFailure,
};
use chrono::{DateTime, Utc};

/// A fragment ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedFragment {
    pub path: String,
    pub document: FragmentDocument,
}

/// Fragments derived from one original
#[derive(Debug, Clone, PartialEq)]
pub struct SplitPlan {
    /// Display form of the key value
    pub key: String,
    /// Quote id used in fragment names
    pub quote_id: String,
    /// Timestamp used in fragment names
    pub timestamp: String,
    /// One entry per configured object present in the document, in configured order
    pub fragments: Vec<PlannedFragment>,
}

impl SplitPlan {
    /// At least one fragment will be produced
    pub fn split_successful(&self) -> bool {
        !self.fragments.is_empty()
    }

    pub fn fragment_paths(&self) -> Vec<String> {
        self.fragments.iter().map(|f| f.path.clone()).collect()
    }
}

/// What to do with an original
#[derive(Debug, Clone, PartialEq)]
pub enum SplitDecision {
    /// No usable key value; the original is skipped
    MissingKey,
    Split(SplitPlan),
}

/// Fragment written to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFragment {
    pub object_name: String,
    pub path: String,
}

/// Result of writing a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitReport {
    pub split_successful: bool,
    pub fragments: Vec<WrittenFragment>,
}

/// Splits quote documents according to the split configuration
#[derive(Debug, Clone, Copy)]
pub struct DocumentSplitter<'a> {
    layout: &'a SourceLayout,
    config: &'a SplitConfig,
}

impl<'a> DocumentSplitter<'a> {
    pub fn new(layout: &'a SourceLayout, config: &'a SplitConfig) -> Self {
        Self { layout, config }
    }

    /// Parses an original and plans its fragments
    ///
    /// `now` supplies the timestamp for names without a `{timestamp}_{quoteId}` pair.
    ///
    /// # Errors
    ///
    /// Fails at [`Step::ParseDocument`] if the content is not a JSON object.
    pub fn plan(
        &self,
        path: &str,
        file_name: &str,
        content: &[u8],
        now: DateTime<Utc>,
    ) -> Result<SplitDecision, StepFailure> {
        let document = QuoteDocument::parse(path, content).at_step(Step::ParseDocument, path)?;
        Ok(self.plan_document(&document, file_name, now))
    }

    /// Plans the fragments of an already parsed document
    pub fn plan_document(
        &self,
        document: &QuoteDocument,
        file_name: &str,
        now: DateTime<Utc>,
    ) -> SplitDecision {
        let Some(key_value) = document.key_value(&self.config.key_field) else {
            return SplitDecision::MissingKey;
        };
        let key = key_display(key_value);

        let parts = FileNameParts::parse(file_name);
        let quote_id = parts.quote_id.unwrap_or_else(|| key.clone());
        let timestamp = parts
            .timestamp
            .unwrap_or_else(|| now.timestamp().to_string());

        let tracking = document
            .get(&self.config.tracking_field)
            .map(|value| (self.config.tracking_field.as_str(), value));

        let fragments = self
            .config
            .extract_objects
            .iter()
            .filter_map(|object_name| {
                let subtree = document.get(object_name)?;
                let fragment = FragmentDocument::build(
                    &self.config.key_field,
                    key_value,
                    object_name,
                    subtree,
                    tracking,
                );
                let path = self.layout.fragment_path(
                    object_name,
                    &fragment_file_name(&timestamp, &quote_id, object_name),
                );
                Some(PlannedFragment {
                    path,
                    document: fragment,
                })
            })
            .collect();

        SplitDecision::Split(SplitPlan {
            key,
            quote_id,
            timestamp,
            fragments,
        })
    }

    /// Writes every planned fragment, in order
    ///
    /// # Errors
    ///
    /// Fails at [`Step::WriteFragment`] on the first fragment that cannot be
    /// serialized or uploaded. Fragments written before it are kept.
    pub async fn write(
        &self,
        store: &dyn BlobStore,
        plan: &SplitPlan,
    ) -> Result<SplitReport, StepFailure> {
        let mut fragments = Vec::with_capacity(plan.fragments.len());

        for fragment in &plan.fragments {
            let content = fragment
                .document
                .to_bytes()
                .at_step(Step::WriteFragment, &fragment.path)?;
            store
                .write(&fragment.path, content)
                .await
                .at_step(Step::WriteFragment, &fragment.path)?;

            tracing::debug!(
                path = %fragment.path,
                object_name = %fragment.document.object_name(),
                "Fragment written"
            );
            fragments.push(WrittenFragment {
                object_name: fragment.document.object_name().to_string(),
                path: fragment.path.clone(),
            });
        }

        Ok(SplitReport {
            split_successful: !fragments.is_empty(),
            fragments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::{json, Value};
    use test_case::test_case;

    fn layout() -> SourceLayout {
        SourceLayout::new("files/sbt/quotes/", "Original", vec![])
    }

    fn config(objects: &[&str]) -> SplitConfig {
        SplitConfig::new("QuoteId", objects.iter().map(|o| o.to_string()).collect())
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn plan_for(objects: &[&str], file_name: &str, content: Value) -> SplitDecision {
        let layout = layout();
        let config = config(objects);
        let bytes = serde_json::to_vec(&content).unwrap();
        DocumentSplitter::new(&layout, &config)
            .plan("files/sbt/quotes/x.json", file_name, &bytes, now())
            .unwrap()
    }

    fn expect_plan(decision: SplitDecision) -> SplitPlan {
        match decision {
            SplitDecision::Split(plan) => plan,
            SplitDecision::MissingKey => panic!("expected a split plan"),
        }
    }

    #[test]
    fn test_plan_with_tracking() {
        let plan = expect_plan(plan_for(
            &["Pricing"],
            "20240101_Q1.json",
            json!({"QuoteId": "Q1", "Pricing": {"amount": 10}, "Tracking": {"agent": "x"}}),
        ));

        assert_eq!(plan.quote_id, "Q1");
        assert_eq!(plan.timestamp, "20240101");
        assert_eq!(plan.fragments.len(), 1);
        assert_eq!(
            plan.fragments[0].path,
            "files/sbt/quotes/Pricing/20240101_Q1_Pricing.json"
        );
        assert_eq!(
            Value::Object(plan.fragments[0].document.body().clone()),
            json!({"QuoteId": "Q1", "Pricing": {"amount": 10}, "Tracking": {"agent": "x"}})
        );
    }

    #[test]
    fn test_plan_skips_absent_objects_in_order() {
        let plan = expect_plan(plan_for(
            &["Pricing", "Coverage", "Vehicle"],
            "20240101_Q1.json",
            json!({"QuoteId": "Q1", "Vehicle": [1], "Coverage": {"level": "full"}}),
        ));

        let names: Vec<_> = plan
            .fragments
            .iter()
            .map(|f| f.document.object_name())
            .collect();
        assert_eq!(names, ["Coverage", "Vehicle"]);
        assert!(!plan.fragments[0].document.body().contains_key("Tracking"));
    }

    #[test]
    fn test_plan_without_matching_objects() {
        let plan = expect_plan(plan_for(
            &["Pricing"],
            "20240101_Q1.json",
            json!({"QuoteId": "Q1", "Other": {}}),
        ));
        assert!(!plan.split_successful());
    }

    #[test]
    fn test_plan_missing_or_falsy_key() {
        for content in [
            json!({"Pricing": {}}),
            json!({"QuoteId": "", "Pricing": {}}),
            json!({"QuoteId": null, "Pricing": {}}),
            json!({"QuoteId": 0, "Pricing": {}}),
        ] {
            assert_eq!(
                plan_for(&["Pricing"], "20240101_Q1.json", content),
                SplitDecision::MissingKey
            );
        }
    }

    #[test]
    fn test_plan_fallback_names() {
        let plan = expect_plan(plan_for(
            &["Pricing"],
            "quote.json",
            json!({"QuoteId": 42, "Pricing": {"amount": 1}}),
        ));

        assert_eq!(plan.quote_id, "42");
        assert_eq!(plan.timestamp, "1700000000");
        assert_eq!(
            plan.fragments[0].path,
            "files/sbt/quotes/Pricing/1700000000_42_Pricing.json"
        );
        assert_eq!(plan.fragments[0].document.body()["QuoteId"], 42);
    }

    #[test_case("_Q1.json", "1700000000_Q1_Pricing.json"; "empty timestamp uses clock")]
    #[test_case("20240101_.json", "20240101_K9_Pricing.json"; "empty quote id uses key")]
    #[test_case("_.json", "1700000000_K9_Pricing.json"; "both parts empty")]
    fn test_plan_empty_name_parts(file_name: &str, fragment_name: &str) {
        let plan = expect_plan(plan_for(
            &["Pricing"],
            file_name,
            json!({"QuoteId": "K9", "Pricing": {"amount": 1}}),
        ));

        assert_eq!(
            plan.fragments[0].path,
            format!("files/sbt/quotes/Pricing/{fragment_name}")
        );
    }

    #[test]
    fn test_plan_keeps_large_integers_verbatim() {
        let layout = layout();
        let config = config(&["Pricing"]);
        let bytes = br#"{"QuoteId":"Q1","Pricing":{"id":123456789012345678901234567890,"rate":0.10}}"#;

        let plan = expect_plan(
            DocumentSplitter::new(&layout, &config)
                .plan("p", "1_Q1.json", bytes, now())
                .unwrap(),
        );
        let text = String::from_utf8(plan.fragments[0].document.to_bytes().unwrap()).unwrap();

        assert!(text.contains(r#""id": 123456789012345678901234567890"#), "{text}");
        assert!(text.contains(r#""rate": 0.10"#), "{text}");
    }

    #[test]
    fn test_plan_custom_tracking_field() {
        let layout = layout();
        let mut config = config(&["Pricing"]);
        config.tracking_field = "Audit".to_string();
        let bytes = br#"{"QuoteId":"Q1","Pricing":1,"Tracking":2,"Audit":3}"#;

        let plan = expect_plan(
            DocumentSplitter::new(&layout, &config)
                .plan("p", "1_Q1.json", bytes, now())
                .unwrap(),
        );
        let body = plan.fragments[0].document.body();
        assert_eq!(body.keys().collect::<Vec<_>>(), ["QuoteId", "Pricing", "Audit"]);
    }

    #[test]
    fn test_plan_malformed_content() {
        let layout = layout();
        let config = config(&["Pricing"]);
        let splitter = DocumentSplitter::new(&layout, &config);

        for content in [&b"not json"[..], b"[1, 2]"] {
            let failure = splitter
                .plan("files/sbt/quotes/1_Q1.json", "1_Q1.json", content, now())
                .unwrap_err();
            assert_eq!(failure.step, Step::ParseDocument);
            assert_eq!(failure.path.as_deref(), Some("files/sbt/quotes/1_Q1.json"));
        }
    }
}
