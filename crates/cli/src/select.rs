//! Narrowing the loaded items down to the ones to print.

use demoslides_core::{Error, Result, SlideItem};

/// Keep the items named by `only` (all when empty), minus the ones in `exclude`.
///
/// Keys are matched case-insensitively; the source order is kept.
pub fn select_items(items: Vec<SlideItem>, only: &[String], exclude: &[String]) -> Result<Vec<SlideItem>> {
    let listed = |keys: &[String], item: &SlideItem| keys.iter().any(|k| k.eq_ignore_ascii_case(&item.key));

    for key in only.iter().chain(exclude) {
        if !items.iter().any(|item| item.key.eq_ignore_ascii_case(key)) {
            log::warn!("{} is not among the loaded items", key);
        }
    }

    let selected: Vec<SlideItem> = items
        .into_iter()
        .filter(|item| only.is_empty() || listed(only, item))
        .filter(|item| !listed(exclude, item))
        .collect();

    if selected.is_empty() {
        return Err(Error::NoItemsSelected);
    }

    log::debug!("Selected {} items", selected.len());
    Ok(selected)
}
