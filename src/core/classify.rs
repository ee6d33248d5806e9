//! Path classification
//!
//! Decides from an object's path alone whether it is an unprocessed original.
//! Rules are applied in order, first match wins:
//!
//! 1. relative path starts with a skip prefix (`Archive`, `Original`): archived
//! 2. first relative segment is an extract object or the archive folder: output folder
//! 3. file stem has more than two `_`-separated parts: already split
//! 4. otherwise: eligible

use crate::config::SplitConfig;
use crate::domain::layout::{base_name, name_part_count};
use crate::domain::{SkipReason, SourceLayout};

/// Stem part count above which a name is considered a fragment
const MAX_ORIGINAL_NAME_PARTS: usize = 2;

/// Classification of a listed object path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Unprocessed original
    Eligible,
    /// Under an archive sub-prefix
    SkipArchived,
    /// Name has the fragment shape
    SkipAlreadySplit,
    /// Inside a per-object output folder or the archive folder
    SkipInOutputFolder,
    /// Not under the source prefix at all
    SkipOutsidePrefix,
}

impl Classification {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Classification::Eligible)
    }

    /// Reason reported for a skipped path
    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Classification::Eligible => None,
            Classification::SkipArchived => Some(SkipReason::Archived),
            Classification::SkipAlreadySplit => Some(SkipReason::AlreadySplit),
            Classification::SkipInOutputFolder => Some(SkipReason::OutputFolder),
            Classification::SkipOutsidePrefix => Some(SkipReason::OutsidePrefix),
        }
    }
}

/// Classifies object paths against a layout and the configured extract objects
#[derive(Debug, Clone)]
pub struct PathClassifier {
    layout: SourceLayout,
    extract_objects: Vec<String>,
}

impl PathClassifier {
    pub fn new(layout: SourceLayout, split: &SplitConfig) -> Self {
        Self {
            layout,
            extract_objects: split.extract_objects.clone(),
        }
    }

    pub fn layout(&self) -> &SourceLayout {
        &self.layout
    }

    pub fn classify(&self, path: &str) -> Classification {
        let Some(relative) = self.layout.relative(path) else {
            return Classification::SkipOutsidePrefix;
        };

        if self
            .layout
            .skip_prefixes()
            .iter()
            .any(|skip| relative.starts_with(skip.as_str()))
        {
            return Classification::SkipArchived;
        }

        if let Some((segment, _)) = relative.split_once('/') {
            if self.extract_objects.iter().any(|o| o == segment)
                || segment.eq_ignore_ascii_case(self.layout.archive_folder())
            {
                return Classification::SkipInOutputFolder;
            }
        }

        if name_part_count(base_name(relative)) > MAX_ORIGINAL_NAME_PARTS {
            return Classification::SkipAlreadySplit;
        }

        Classification::Eligible
    }
}
