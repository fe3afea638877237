//! Two-path orchestration: try the model first, degrade to the rule-based
//! classifier on any failure. Exactly one path produces the final result.

use chrono::{DateTime, FixedOffset};

use crate::models::{IntentResult, RestaurantProfile};
use crate::services::ai::{classifier, LlmProvider};
use crate::services::fallback;

pub async fn handle(
    llm: Option<&dyn LlmProvider>,
    profile: &RestaurantProfile,
    utterance: &str,
    now: DateTime<FixedOffset>,
) -> IntentResult {
    let Some(llm) = llm else {
        tracing::debug!("no model configured, using rule-based classifier");
        return fallback::classify(profile, utterance, now);
    };

    match classifier::classify_with_model(llm, profile, utterance, now).await {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(error = %e, "model path failed, using rule-based classifier");
            fallback::classify(profile, utterance, now)
        }
    }
}
