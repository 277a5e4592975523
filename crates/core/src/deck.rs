//! Ordered, category-resolved slides ready for emission.

use crate::category::{Category, CategoryResolver};
use crate::config::{Configuration, SPRINT_GOAL_RESOURCE};
use crate::types::{Grouping, SlideItem};
use crate::Result;

/// A slide with exactly one category and one grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSlide {
    pub item: SlideItem,
    pub display_name: String,
    pub category: Category,
    pub grouping: Grouping,
}

impl ResolvedSlide {
    /// Badge text: the grouping name, prefixed with the category unless it already starts with it.
    pub fn category_label(&self) -> String {
        if self.grouping.name.starts_with(&self.display_name) {
            self.grouping.name.clone()
        } else {
            format!("{} / {}", self.display_name, self.grouping.name)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Deck {
    pub slides: Vec<ResolvedSlide>,
}

impl Deck {
    /// Resolve every item, drop the ones without a category and sort by category name.
    pub fn prepare(
        items: Vec<SlideItem>,
        resolver: &mut CategoryResolver<'_>,
        config: &mut Configuration,
    ) -> Result<Self> {
        let mut slides = Vec::with_capacity(items.len());

        for item in items {
            match resolver.resolve(item.grouping.as_deref(), config)? {
                Some(resolution) => slides.push(ResolvedSlide {
                    item,
                    display_name: resolution.display_name,
                    category: resolution.category,
                    grouping: resolution.grouping,
                }),
                None => log::debug!("Skipping {}: no category", item.key),
            }
        }

        // stable, so items keep their source order within a category
        slides.sort_by(|a, b| a.display_name.cmp(&b.display_name));

        Ok(Self { slides })
    }

    /// Append the synthetic goal slide after all sorted slides.
    ///
    /// Returns whether a slide was added. Nothing is added for an empty goal or
    /// when no goal label is configured.
    pub fn append_goal(
        &mut self,
        goal: &str,
        resolver: &mut CategoryResolver<'_>,
        config: &mut Configuration,
    ) -> Result<bool> {
        let goal = goal.trim();
        if goal.is_empty() {
            return Ok(false);
        }

        let Some((category, grouping)) = resolver.goal_category(config)? else {
            return Ok(false);
        };
        let label = config
            .text_resource(SPRINT_GOAL_RESOURCE)
            .unwrap_or(grouping.name.as_str())
            .to_string();

        self.slides.push(ResolvedSlide {
            item: SlideItem::goal(label.clone(), goal),
            display_name: label,
            category,
            grouping,
        });
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::testing::*;
    use crate::config::Color;
    use std::collections::BTreeMap;

    fn categorized_config() -> Configuration {
        let mut categories = BTreeMap::new();
        categories.insert(
            "Payments".to_string(),
            Category::new(vec!["Checkout".to_string()], Color::from_components(200, 0, 0, 255)),
        );
        categories.insert(
            "Accounts".to_string(),
            Category::new(vec!["Login".to_string()], Color::from_components(0, 0, 200, 255)),
        );
        Configuration::with_categories(categories)
    }

    #[test]
    fn test_prepare_sorts_by_category_and_keeps_source_order() {
        let mut source = FakeSource::default()
            .with_grouping("EP-1", "Checkout")
            .with_grouping("EP-2", "Login");
        let mut prompter = ScriptedPrompter::default();
        let mut store = MemoryStore::default();
        let mut config = categorized_config();

        let items = vec![
            SlideItem::new(1, "S-1", "pay").with_grouping("EP-1"),
            SlideItem::new(2, "S-2", "login").with_grouping("EP-2"),
            SlideItem::new(3, "S-3", "plain"),
            SlideItem::new(4, "S-4", "refund").with_grouping("EP-1"),
        ];

        let deck = {
            let mut resolver = CategoryResolver::new(&mut source, &mut prompter, &mut store);
            Deck::prepare(items, &mut resolver, &mut config).unwrap()
        };

        let keys: Vec<_> = deck.slides.iter().map(|s| s.item.key.as_str()).collect();
        assert_eq!(keys, vec!["S-2", "S-3", "S-1", "S-4"]);
        assert!(prompter.questions.is_empty());
    }

    #[test]
    fn test_prepare_drops_unresolved_items() {
        let mut source = FakeSource::default().with_grouping("EP-1", "Checkout");
        let mut prompter = ScriptedPrompter::default();
        let mut store = MemoryStore::default();
        let mut config = categorized_config();

        let items = vec![
            SlideItem::new(1, "S-1", "pay").with_grouping("EP-1"),
            SlideItem::new(2, "S-2", "ghost").with_grouping("EP-404"),
        ];

        let deck = {
            let mut resolver = CategoryResolver::new(&mut source, &mut prompter, &mut store);
            Deck::prepare(items, &mut resolver, &mut config).unwrap()
        };

        assert_eq!(deck.len(), 1);
        assert_eq!(deck.slides[0].item.key, "S-1");
    }

    #[test]
    fn test_goal_appended_after_sorting() {
        let mut source = FakeSource::default().with_grouping("EP-1", "Checkout");
        let mut prompter = ScriptedPrompter {
            lines: ["0,0,0,255".to_string()].into(),
            ..ScriptedPrompter::default()
        };
        let mut store = MemoryStore::default();
        let mut config = categorized_config();

        let deck = {
            let mut resolver = CategoryResolver::new(&mut source, &mut prompter, &mut store);
            let mut deck = Deck::prepare(
                vec![SlideItem::new(1, "S-1", "pay").with_grouping("EP-1")],
                &mut resolver,
                &mut config,
            )
            .unwrap();
            assert!(deck.append_goal("Ship checkout", &mut resolver, &mut config).unwrap());
            deck
        };

        let goal = deck.slides.last().unwrap();
        assert_eq!(deck.len(), 2);
        assert_eq!(goal.display_name, "Sprintziel");
        assert_eq!(goal.item.summary, "Ship checkout");
        assert_eq!(goal.category_label(), "Sprintziel");
    }

    #[test]
    fn test_empty_goal_is_not_appended() {
        let mut source = FakeSource::default();
        let mut prompter = ScriptedPrompter::default();
        let mut store = MemoryStore::default();
        let mut config = categorized_config();

        let mut resolver = CategoryResolver::new(&mut source, &mut prompter, &mut store);
        let mut deck = Deck::default();
        assert!(!deck.append_goal("  ", &mut resolver, &mut config).unwrap());
        assert!(deck.is_empty());
    }

    #[test]
    fn test_category_label() {
        let slide = |display_name: &str, grouping: &str| ResolvedSlide {
            item: SlideItem::new(1, "S-1", "x"),
            display_name: display_name.to_string(),
            category: Category::feature(),
            grouping: Grouping::new("EP-1", grouping, ""),
        };

        assert_eq!(slide("Payments", "Payments v2").category_label(), "Payments v2");
        assert_eq!(slide("Payments", "Checkout").category_label(), "Payments / Checkout");
    }
}
