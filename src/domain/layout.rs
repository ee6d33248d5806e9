//! Source namespace layout and object naming
//!
//! Object paths are flat strings with `/` as a conventional separator. All
//! originals, fragments and archive copies live under one source prefix:
//!
//! ```text
//! {prefix}{timestamp}_{quoteId}.json                       original
//! {prefix}{object}/{timestamp}_{quoteId}_{object}.json     fragment
//! {prefix}{archive_folder}/{timestamp}_{quoteId}.json      archive copy
//! ```

use serde::{Deserialize, Serialize};

/// Separator between the name parts of a quote file
pub const NAME_PART_SEPARATOR: char = '_';

const JSON_EXTENSION: &str = ".json";

/// Describes where originals, fragments and archive copies live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLayout {
    prefix: String,
    archive_folder: String,
    skip_prefixes: Vec<String>,
}

impl SourceLayout {
    /// Creates a layout rooted at `prefix`
    ///
    /// The prefix is normalised to end with a single `/`.
    pub fn new(
        prefix: impl Into<String>,
        archive_folder: impl Into<String>,
        skip_prefixes: Vec<String>,
    ) -> Self {
        let prefix = prefix.into();
        let trimmed = prefix.trim_end_matches('/');
        Self {
            prefix: format!("{trimmed}/"),
            archive_folder: archive_folder.into(),
            skip_prefixes,
        }
    }

    /// The source prefix, always ending with `/`
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Name of the folder holding archived originals
    pub fn archive_folder(&self) -> &str {
        &self.archive_folder
    }

    /// Sub-prefixes (relative to the source prefix) that are never reprocessed
    pub fn skip_prefixes(&self) -> &[String] {
        &self.skip_prefixes
    }

    /// Path relative to the source prefix, or `None` if outside it
    pub fn relative<'a>(&self, path: &'a str) -> Option<&'a str> {
        path.strip_prefix(self.prefix.as_str())
    }

    /// Destination of the fragment for `object_name`
    pub fn fragment_path(&self, object_name: &str, file_name: &str) -> String {
        format!("{}{}/{}", self.prefix, object_name, file_name)
    }

    /// Destination of the archive copy of an original named `file_name`
    pub fn archive_path(&self, file_name: &str) -> String {
        format!("{}{}/{}", self.prefix, self.archive_folder, file_name)
    }
}

/// Final `/`-separated segment of an object path
pub fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// File name with every `.json` removed
///
/// Other extensions are kept, so `20240101_Q1.txt` parses with quote id `Q1.txt`.
pub fn file_stem(file_name: &str) -> String {
    file_name.replace(JSON_EXTENSION, "")
}

/// Number of `_`-separated parts in a file's stem
pub fn name_part_count(file_name: &str) -> usize {
    file_stem(file_name).split(NAME_PART_SEPARATOR).count()
}

/// Timestamp and quote id parsed from an original's file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNameParts {
    /// Leading name part, if the name has at least two parts and it is not empty
    pub timestamp: Option<String>,
    /// Second name part, if the name has at least two parts and it is not empty
    pub quote_id: Option<String>,
}

impl FileNameParts {
    /// Parses `{timestamp}_{quoteId}.json`
    ///
    /// Names with fewer than two parts yield `None` for both values. An
    /// empty part yields `None` on its own, so `_Q1.json` keeps only its
    /// quote id.
    pub fn parse(file_name: &str) -> Self {
        let stem = file_stem(file_name);
        let mut parts = stem.split(NAME_PART_SEPARATOR);
        match (parts.next(), parts.next()) {
            (Some(timestamp), Some(quote_id)) => Self {
                timestamp: non_empty(timestamp),
                quote_id: non_empty(quote_id),
            },
            _ => Self {
                timestamp: None,
                quote_id: None,
            },
        }
    }
}

fn non_empty(part: &str) -> Option<String> {
    Some(part).filter(|p| !p.is_empty()).map(str::to_string)
}

/// `{timestamp}_{quoteId}_{object}.json`
pub fn fragment_file_name(timestamp: &str, quote_id: &str, object_name: &str) -> String {
    format!("{timestamp}_{quote_id}_{object_name}.json")
}
