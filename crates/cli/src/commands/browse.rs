use closet_core::config::LoadOptions;
use closet_core::Category;
use serde::Serialize;

use crate::commands::{open_session, parse_category, CommandResult, ItemView};

#[derive(Debug, Serialize)]
struct CategoryGroup<'a> {
    category: Category,
    items: Vec<ItemView<'a>>,
}

#[derive(Debug, Serialize)]
struct BrowseData<'a> {
    categories: Vec<CategoryGroup<'a>>,
}

pub fn run(options: &LoadOptions, category: Option<&str>) -> CommandResult {
    let session = match open_session("browse", options) {
        Ok(session) => session,
        Err(result) => return result,
    };

    let categories = match category {
        Some(raw) => match parse_category("browse", raw) {
            Ok(category) => vec![category],
            Err(result) => return result,
        },
        None => session.catalog.categories(),
    };

    let groups: Vec<CategoryGroup<'_>> = categories
        .into_iter()
        .map(|category| CategoryGroup {
            category,
            items: session
                .catalog
                .items_by_category(category)
                .into_iter()
                .map(ItemView::from)
                .collect(),
        })
        .collect();

    let item_count: usize = groups.iter().map(|group| group.items.len()).sum();
    let message = format!("{item_count} items in {} categories", groups.len());
    CommandResult::success_with_data("browse", message, &BrowseData { categories: groups })
}
