use closet_core::config::LoadOptions;
use closet_core::{Compatibility, CompatibilityRules, RuleBasedScorer};
use serde::Serialize;

use crate::commands::{find_item, open_session, CommandResult, ItemView, EXIT_INVALID_INPUT};

#[derive(Debug, Serialize)]
struct ScoreData<'a> {
    left: ItemView<'a>,
    right: ItemView<'a>,
    compatibility: Compatibility,
}

pub fn run(options: &LoadOptions, left_id: &str, right_id: &str) -> CommandResult {
    let session = match open_session("score", options) {
        Ok(session) => session,
        Err(result) => return result,
    };

    let left = match find_item("score", &session.catalog, left_id) {
        Ok(item) => item,
        Err(result) => return result,
    };
    let right = match find_item("score", &session.catalog, right_id) {
        Ok(item) => item,
        Err(result) => return result,
    };

    let scorer = RuleBasedScorer::from_config(&session.config.scoring);
    match scorer.score(left, right) {
        Ok(compatibility) => {
            let message = format!(
                "`{}` with `{}`: {}",
                left.id,
                right.id,
                compatibility.strength.display_percentage(compatibility.score)
            );
            CommandResult::success_with_data(
                "score",
                message,
                &ScoreData {
                    left: ItemView::from(left),
                    right: ItemView::from(right),
                    compatibility,
                },
            )
        }
        Err(error) => {
            CommandResult::failure("score", "invalid_input", error.to_string(), EXIT_INVALID_INPUT)
        }
    }
}
