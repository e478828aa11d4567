use closet_core::config::LoadOptions;

use crate::commands::{find_item, open_session, CommandResult, ItemView};

pub fn run(options: &LoadOptions, id: &str) -> CommandResult {
    let session = match open_session("show", options) {
        Ok(session) => session,
        Err(result) => return result,
    };

    match find_item("show", &session.catalog, id) {
        Ok(item) => CommandResult::success_with_data(
            "show",
            format!("{} ({})", item.name, item.category),
            &ItemView::from(item),
        ),
        Err(result) => result,
    }
}
