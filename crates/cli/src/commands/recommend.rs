use closet_core::config::LoadOptions;
use closet_core::{
    default_target, ApplicationError, InterfaceError, RecommendError, Recommendation, Recommender,
};
use serde::Serialize;
use tracing::info;

use crate::commands::{
    correlation_id, find_item, interface_failure, open_session, parse_category, CommandResult,
    ItemView, EXIT_INVALID_INPUT,
};

#[derive(Debug, Serialize)]
struct RecommendData<'a> {
    query: ItemView<'a>,
    recommendation: &'a Recommendation,
}

pub fn run(
    options: &LoadOptions,
    id: &str,
    limit: Option<usize>,
    target: Option<&str>,
) -> CommandResult {
    let session = match open_session("recommend", options) {
        Ok(session) => session,
        Err(result) => return result,
    };

    let item = match find_item("recommend", &session.catalog, id) {
        Ok(item) => item,
        Err(result) => return result,
    };

    let target = match target {
        Some(raw) => match parse_category("recommend", raw) {
            Ok(category) => category,
            Err(result) => return result,
        },
        None => default_target(item.category),
    };

    let recommender = Recommender::from_config(&session.config);
    let recommendation = match recommender.recommend_for(item, target, &session.catalog, limit) {
        Ok(recommendation) => recommendation,
        Err(RecommendError::InvalidPair(error)) => {
            return CommandResult::failure(
                "recommend",
                "invalid_input",
                error.to_string(),
                EXIT_INVALID_INPUT,
            );
        }
        Err(error) => {
            let interface =
                ApplicationError::from(error).into_interface(correlation_id("recommend"));
            return interface_failure("recommend", interface);
        }
    };

    if recommendation.is_empty() {
        let interface = InterfaceError::NoMatches {
            message: format!(
                "{} {target} candidates all scored below {}",
                recommendation.candidates_considered, session.config.recommender.min_score
            ),
            correlation_id: correlation_id("recommend"),
        };
        return interface_failure("recommend", interface);
    }

    if let Some(best) = recommendation.best() {
        info!(
            event_name = "cli.recommend.best_match",
            query_id = %item.id,
            best_id = %best.item.id,
            score = best.score().value(),
            "best match selected"
        );
    }

    let message = format!("{} {target} matches for `{}`", recommendation.len(), item.id);
    CommandResult::success_with_data(
        "recommend",
        message,
        &RecommendData { query: ItemView::from(item), recommendation: &recommendation },
    )
}
