//! Category table and resolution of item groupings to display categories.
//!
//! Categories map grouping names to a background color. A grouping seen for the
//! first time is assigned interactively and the table is persisted right away, so
//! later slides of the same run resolve without asking again.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::collab::{ConfigStore, ItemSource, Prompter};
use crate::config::{Color, Configuration, SPRINT_GOAL_RESOURCE};
use crate::types::Grouping;
use crate::Result;

/// Name of the built-in category, also used as the grouping key of items without one.
pub const FEATURE_CATEGORY: &str = "Feature";

/// A named color bucket listing the grouping names it contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub groupings: Vec<String>,
    pub color: Color,
}

impl Category {
    pub fn new(groupings: Vec<String>, color: Color) -> Self {
        Self { groupings, color }
    }

    /// The built-in category for items without a grouping.
    pub fn feature() -> Self {
        Self::new(
            vec![FEATURE_CATEGORY.to_string()],
            Color::from_components(43, 54, 113, 255),
        )
    }

    pub fn contains(&self, grouping_name: &str) -> bool {
        self.groupings.iter().any(|g| g == grouping_name)
    }
}

/// Find the first category (in name order) listing `grouping_name`.
pub fn find_category<'c>(
    categories: &'c BTreeMap<String, Category>,
    grouping_name: &str,
) -> Option<(&'c String, &'c Category)> {
    categories
        .iter()
        .find(|(_, category)| category.contains(grouping_name))
}

/// A successfully resolved slide category.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub display_name: String,
    pub category: Category,
    pub grouping: Grouping,
}

/// Resolves grouping keys to categories, prompting for unknown groupings.
pub struct CategoryResolver<'a> {
    source: &'a mut dyn ItemSource,
    prompter: &'a mut dyn Prompter,
    store: &'a mut dyn ConfigStore,
    groupings: HashMap<String, Option<Grouping>>,
    declined: HashSet<String>,
}

impl<'a> CategoryResolver<'a> {
    pub fn new(
        source: &'a mut dyn ItemSource,
        prompter: &'a mut dyn Prompter,
        store: &'a mut dyn ConfigStore,
    ) -> Self {
        Self {
            source,
            prompter,
            store,
            groupings: HashMap::new(),
            declined: HashSet::new(),
        }
    }

    /// Resolve the category of an item with the given grouping key.
    ///
    /// Returns `Ok(None)` when the slide should be dropped: the grouping is unknown
    /// to the tracker, or the user did not assign it to any category.
    pub fn resolve(
        &mut self,
        grouping_key: Option<&str>,
        config: &mut Configuration,
    ) -> Result<Option<Resolution>> {
        let key = grouping_key.unwrap_or(FEATURE_CATEGORY);

        let Some(grouping) = self.grouping(key) else {
            log::debug!("Dropping slide with unresolvable grouping {}", key);
            return Ok(None);
        };

        if let Some(resolution) = lookup(config, &grouping) {
            return Ok(Some(resolution));
        }

        if self.declined.contains(key) {
            return Ok(None);
        }

        if !self.assign_interactively(&grouping, config)? {
            self.declined.insert(key.to_string());
            return Ok(None);
        }

        Ok(lookup(config, &grouping))
    }

    /// Category and grouping for the synthetic goal slide, created on first use.
    pub fn goal_category(
        &mut self,
        config: &mut Configuration,
    ) -> Result<Option<(Category, Grouping)>> {
        let Some(label) = config.text_resource(SPRINT_GOAL_RESOURCE).map(str::to_string) else {
            log::warn!("No '{}' text resource configured", SPRINT_GOAL_RESOURCE);
            return Ok(None);
        };

        let grouping = Grouping::placeholder(&label);

        if let Some(category) = config.categories.get(&label) {
            return Ok(Some((category.clone(), grouping)));
        }

        log::info!("No color defined for category \"{}\"", label);
        let category = Category::new(vec![label.clone()], prompt_color(&mut *self.prompter));
        config.categories.insert(label, category.clone());
        self.store.save_config(config)?;

        Ok(Some((category, grouping)))
    }

    /// Goal text of a collection. Source failures are logged and read as no goal.
    pub fn goal_text(&mut self, collection_id: u64) -> Option<String> {
        match self.source.fetch_goal_text(collection_id) {
            Ok(goal) => goal.filter(|g| !g.trim().is_empty()),
            Err(e) => {
                log::warn!("Failed to fetch goal of collection {}: {}", collection_id, e);
                None
            }
        }
    }

    /// Ask a yes/no question through the resolver's prompter.
    pub fn confirm(&mut self, question: &str) -> bool {
        self.prompter.prompt_yes_no(question)
    }

    /// Memoized grouping lookup.
    fn grouping(&mut self, key: &str) -> Option<Grouping> {
        if let Some(cached) = self.groupings.get(key) {
            return cached.clone();
        }

        let fetched = match self.source.fetch_grouping(key) {
            Ok(grouping) => grouping,
            Err(e) => {
                log::warn!("Failed to fetch grouping {}: {}", key, e);
                None
            }
        };

        let grouping = match fetched {
            None if key == FEATURE_CATEGORY => Some(Grouping::placeholder(key)),
            other => other,
        };

        self.groupings.insert(key.to_string(), grouping.clone());
        grouping
    }

    /// Ask where a new grouping belongs and persist the answer.
    ///
    /// Returns whether the table was changed.
    fn assign_interactively(
        &mut self,
        grouping: &Grouping,
        config: &mut Configuration,
    ) -> Result<bool> {
        let question = format!(
            "New grouping \"{}\" found. Do you want to assign it to an existing category? (Otherwise create a new one.)",
            grouping.name
        );

        let target = if self.prompter.prompt_yes_no(&question) {
            let names: Vec<String> = config.categories.keys().cloned().collect();
            self.prompter.choose_one("Category", &names)
        } else {
            self.prompter.prompt_line("New category")
        };

        let Some(target) = target.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) else {
            return Ok(false);
        };

        match config.categories.get_mut(&target) {
            Some(category) => {
                log::info!("Adding \"{}\" to category \"{}\"", grouping.name, target);
                category.groupings.push(grouping.name.clone());
            }
            None => {
                log::info!("Creating category \"{}\" for \"{}\"", target, grouping.name);
                let color = prompt_color(&mut *self.prompter);
                config
                    .categories
                    .insert(target, Category::new(vec![grouping.name.clone()], color));
            }
        }

        self.store.save_config(config)?;
        Ok(true)
    }
}

fn lookup(config: &Configuration, grouping: &Grouping) -> Option<Resolution> {
    find_category(&config.categories, &grouping.name).map(|(name, category)| Resolution {
        display_name: name.clone(),
        category: category.clone(),
        grouping: grouping.clone(),
    })
}

/// Ask for a category color, falling back to black on unusable input.
pub fn prompt_color(prompter: &mut dyn Prompter) -> Color {
    prompter
        .prompt_line(
            "Which color should the new category have? Components, each between 0 and 255: <r,g,b,a>",
        )
        .and_then(|input| Color::parse(&input))
        .unwrap_or(Color::BLACK)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted collaborators shared by the tests of this crate.

    use std::collections::{HashMap, VecDeque};

    use super::*;
    use crate::types::SlideItem;
    use crate::Error;

    #[derive(Default)]
    pub struct FakeSource {
        pub groupings: HashMap<String, Grouping>,
        pub goal: Option<String>,
        pub fetches: Vec<String>,
        pub fail: bool,
    }

    impl FakeSource {
        pub fn with_grouping(mut self, key: &str, name: &str) -> Self {
            self.groupings
                .insert(key.to_string(), Grouping::new(key, name, ""));
            self
        }
    }

    impl ItemSource for FakeSource {
        fn fetch_grouping(&mut self, key: &str) -> Result<Option<Grouping>> {
            self.fetches.push(key.to_string());
            if self.fail {
                return Err(Error::ItemSourceError("offline".to_string()));
            }
            Ok(self.groupings.get(key).cloned())
        }

        fn fetch_slides(&mut self, _: &str, _: &[String], _: usize) -> Result<Vec<SlideItem>> {
            Ok(Vec::new())
        }

        fn fetch_goal_text(&mut self, _: u64) -> Result<Option<String>> {
            Ok(self.goal.clone())
        }
    }

    #[derive(Default)]
    pub struct ScriptedPrompter {
        pub yes_no: VecDeque<bool>,
        pub lines: VecDeque<String>,
        pub choices: VecDeque<String>,
        pub questions: Vec<String>,
    }

    impl Prompter for ScriptedPrompter {
        fn choose_one(&mut self, label: &str, _options: &[String]) -> Option<String> {
            self.questions.push(label.to_string());
            self.choices.pop_front()
        }

        fn prompt_line(&mut self, label: &str) -> Option<String> {
            self.questions.push(label.to_string());
            self.lines.pop_front()
        }

        fn prompt_yes_no(&mut self, question: &str) -> bool {
            self.questions.push(question.to_string());
            self.yes_no.pop_front().unwrap_or(false)
        }
    }

    #[derive(Default)]
    pub struct MemoryStore {
        pub saved: Vec<Configuration>,
    }

    impl ConfigStore for MemoryStore {
        fn load_config(&mut self) -> Result<Option<Configuration>> {
            Ok(self.saved.last().cloned())
        }

        fn save_config(&mut self, config: &Configuration) -> Result<()> {
            self.saved.push(config.clone());
            Ok(())
        }
    }
}
