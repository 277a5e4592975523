//! Item source backed by a YAML or JSON export of a tracker collection.

use std::fs;
use std::path::Path;

use demoslides_core::{Collection, Error, Grouping, ItemSource, Result, SlideItem};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedCollection {
    pub id: u64,
    pub name: String,

    #[serde(default)]
    pub goal: Option<String>,
}

/// Contents of an export file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemExport {
    pub collection: ExportedCollection,

    #[serde(default)]
    pub items: Vec<SlideItem>,

    #[serde(default)]
    pub groupings: Vec<Grouping>,
}

pub struct FileItemSource {
    export: ItemExport,
}

impl FileItemSource {
    /// Read an export. Files ending in `.json` are JSON, everything else is YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let export: ItemExport = if is_json {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        } else {
            serde_yml::from_str(&content).map_err(|e| e.to_string())
        }
        .map_err(|e| {
            Error::NoItemsLoaded(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        Ok(Self::from_export(export))
    }

    pub fn from_export(export: ItemExport) -> Self {
        Self { export }
    }

    pub fn collection(&self) -> Collection {
        Collection::new(self.export.collection.id, self.export.collection.name.clone())
    }

    /// Names of the groupings referenced by at least one item, in first-use order.
    pub fn referenced_grouping_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for key in self.export.items.iter().filter_map(|i| i.grouping.as_deref()) {
            if let Some(grouping) = self.export.groupings.iter().find(|g| g.key == key) {
                if !names.contains(&grouping.name) {
                    names.push(grouping.name.clone());
                }
            }
        }
        names
    }
}

impl ItemSource for FileItemSource {
    fn fetch_grouping(&mut self, key: &str) -> Result<Option<Grouping>> {
        Ok(self.export.groupings.iter().find(|g| g.key == key).cloned())
    }

    fn fetch_slides(
        &mut self,
        collection: &str,
        excluded_kinds: &[String],
        limit: usize,
    ) -> Result<Vec<SlideItem>> {
        let exported = &self.export.collection;
        if collection != exported.name && collection != exported.id.to_string() {
            return Err(Error::NoItemsLoaded(format!(
                "collection {} not found in export",
                collection
            )));
        }

        let mut items: Vec<SlideItem> = self
            .export
            .items
            .iter()
            .filter(|item| !excluded_kinds.contains(&item.kind))
            .cloned()
            .collect();
        items.sort_by_key(|item| item.id);
        items.truncate(limit);

        if items.is_empty() {
            return Err(Error::NoItemsLoaded(format!(
                "collection {} has no items",
                collection
            )));
        }

        Ok(items)
    }

    fn fetch_goal_text(&mut self, collection_id: u64) -> Result<Option<String>> {
        let exported = &self.export.collection;
        if collection_id != exported.id {
            return Ok(None);
        }
        Ok(exported.goal.clone())
    }
}
