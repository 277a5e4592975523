//! Interfaces of the collaborators the deck engine talks to.
//!
//! The tracker client, the terminal UI and the configuration file all live outside
//! this crate. The engine only sees these narrow capabilities, which keeps grid,
//! font-fit and extraction code free of any interactive dependency.

use crate::config::Configuration;
use crate::types::{Grouping, SlideItem};
use crate::Result;

/// Source of tracked items and their groupings.
pub trait ItemSource {
    /// Fetch one grouping by key. `Ok(None)` when the tracker does not know it.
    fn fetch_grouping(&mut self, key: &str) -> Result<Option<Grouping>>;

    /// Fetch the items of a collection, without the excluded kinds, at most `limit`.
    fn fetch_slides(
        &mut self,
        collection: &str,
        excluded_kinds: &[String],
        limit: usize,
    ) -> Result<Vec<SlideItem>>;

    /// The goal text of a collection, if it has one.
    fn fetch_goal_text(&mut self, collection_id: u64) -> Result<Option<String>>;
}

/// Blocking interactive prompts.
pub trait Prompter {
    /// Let the user pick one of `options`. `None` when nothing was picked.
    fn choose_one(&mut self, label: &str, options: &[String]) -> Option<String>;

    /// Ask for a line of free text. `None` on empty input or end of input.
    fn prompt_line(&mut self, label: &str) -> Option<String>;

    /// Ask a yes/no question.
    fn prompt_yes_no(&mut self, question: &str) -> bool;
}

/// Persistent configuration storage.
pub trait ConfigStore {
    fn load_config(&mut self) -> Result<Option<Configuration>>;

    fn save_config(&mut self, config: &Configuration) -> Result<()>;
}
