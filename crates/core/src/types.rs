//! Domain types for tracked work items and the collections they are printed from.

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// A tracked work item that becomes one slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideItem {
    /// Numeric tracker id.
    pub id: u64,

    /// Human-facing key, e.g. `SHOP-142`.
    pub key: String,

    /// One-line summary, always printed.
    pub summary: String,

    /// Raw, markup-laden description as stored in the tracker.
    #[serde(default)]
    pub description: Option<String>,

    /// Release tags in tracker order.
    #[serde(default)]
    pub release_tags: Vec<String>,

    /// Key of the parent grouping (epic), if any.
    #[serde(default)]
    pub grouping: Option<String>,

    /// Item kind as reported by the tracker (Story, Bug, Sub-task, ...).
    #[serde(default = "default_kind")]
    pub kind: String,
}

fn default_kind() -> String {
    "Story".to_string()
}

impl SlideItem {
    /// Create an item with only the required fields set.
    pub fn new(id: u64, key: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            id,
            key: key.into(),
            summary: summary.into(),
            description: None,
            release_tags: Vec::new(),
            grouping: None,
            kind: default_kind(),
        }
    }

    /// Set the raw description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the parent grouping key.
    pub fn with_grouping(mut self, grouping: impl Into<String>) -> Self {
        self.grouping = Some(grouping.into());
        self
    }

    /// Set the release tags.
    pub fn with_release_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.release_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Synthetic item carrying the collection goal.
    pub fn goal(label: impl Into<String>, goal: impl Into<String>) -> Self {
        Self::new(0, label, goal)
    }
}

/// The higher-level item (epic) a slide belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grouping {
    /// Tracker key used by items to reference this grouping.
    pub key: String,

    /// Name matched against category membership lists.
    pub name: String,

    /// Display label, may be empty.
    #[serde(default)]
    pub summary: String,
}

impl Grouping {
    pub fn new(key: impl Into<String>, name: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            summary: summary.into(),
        }
    }

    /// Placeholder for items without a grouping; its name is the key itself.
    pub fn placeholder(key: &str) -> Self {
        Self::new(key, key, "")
    }
}

/// The collection (sprint) a deck is printed for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: u64,
    pub name: String,
}

impl Collection {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// File-system friendly name: diacritics folded, lowercase, alphanumeric runs joined by `-`.
    pub fn train_cased_name(&self) -> String {
        let folded: String = self
            .name
            .nfd()
            .filter(|c| !is_combining_mark(*c))
            .collect::<String>()
            .to_lowercase();

        folded
            .split(|c: char| !c.is_alphanumeric())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }

    /// File name of the produced document.
    pub fn document_file_name(&self) -> String {
        let stem = self.train_cased_name();
        if stem.is_empty() {
            "slides.pdf".to_string()
        } else {
            format!("{}.pdf", stem)
        }
    }
}
