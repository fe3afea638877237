//! Model-backed intent classification: prompt composition, JSON recovery
//! from noisy model output, and mapping into the shared result shape.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use regex::Regex;
use serde::Deserialize;

use crate::errors::ClassifyError;
use crate::models::{Intent, IntentResult, ReservationDetail, RestaurantProfile};
use crate::services::ai::LlmProvider;

static RE_FENCED_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json\s*(.*?)\s*```").unwrap());

/// Raw shape we ask the model to return. `intent` and `response_text` are
/// required; a reply missing either is treated as malformed.
#[derive(Debug, Deserialize)]
struct ModelReply {
    intent: String,
    #[serde(default)]
    reservation_details: Option<ModelReservation>,
    response_text: String,
}

#[derive(Debug, Deserialize)]
struct ModelReservation {
    datetime: String,
    #[serde(default = "default_party_size")]
    party_size: u32,
}

fn default_party_size() -> u32 {
    2
}

fn build_prompt(
    profile: &RestaurantProfile,
    utterance: &str,
    now: DateTime<FixedOffset>,
) -> String {
    format!(
        r#"You are an AI assistant for a restaurant. The user has said: "{utterance}"

Context information:
Restaurant hours: {hours}
Menu highlights: {menu}
Current local time: {now}

Analyze the input and provide:
1. Intent (hours, menu, reservation, or unknown)
2. If reservation intent, extract the date, time, and party size
3. A natural response based on the detected intent

Format your response as a JSON object with these exact keys:
- intent: string (hours, menu, reservation, or unknown)
- reservation_details: object (only if intent is reservation) with keys:
  - datetime: string (ISO format date-time in the restaurant's local timezone)
  - party_size: number (default to 2 if not specified)
- response_text: string (your natural language response)

Ensure your response is valid JSON."#,
        hours = profile.hours_json(),
        menu = serde_json::json!(profile.menu_highlights),
        now = now.format("%Y-%m-%d %H:%M:%S"),
    )
}

/// Pull a JSON object out of a raw model reply. Attempted in order: the
/// reply already is JSON, a ```json fenced block, the widest `{...}` span.
fn extract_json(response: &str) -> Option<&str> {
    let trimmed = response.trim();
    if trimmed.starts_with('{') {
        return Some(trimmed);
    }
    if let Some(caps) = RE_FENCED_JSON.captures(trimmed) {
        return Some(caps.get(1)?.as_str());
    }
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end > start {
        return Some(&trimmed[start..=end]);
    }
    None
}

/// Accepts RFC 3339 or a naive local `YYYY-MM-DDTHH:MM[:SS]`, normalizing
/// both to the restaurant's offset.
fn parse_model_datetime(raw: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&offset));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .ok()?;
    offset.from_local_datetime(&naive).single()
}

fn map_reply(reply: ModelReply, offset: FixedOffset) -> Result<IntentResult, ClassifyError> {
    let intent = Intent::parse(&reply.intent);

    if intent != Intent::Reservation {
        return Ok(IntentResult::simple(intent, reply.response_text));
    }

    // A reservation reply without details is a clarification turn; a
    // reservation reply with an unreadable datetime is a failed one.
    let detail = match reply.reservation_details {
        Some(details) => {
            let date_time = parse_model_datetime(&details.datetime, offset).ok_or_else(|| {
                ClassifyError::MalformedOutput(format!(
                    "unparsable reservation datetime: {}",
                    details.datetime
                ))
            })?;
            Some(ReservationDetail {
                date_time,
                party_size: details.party_size,
            })
        }
        None => None,
    };

    Ok(IntentResult::reservation(detail, reply.response_text))
}

/// Primary classification path. Any failure here — unreachable model,
/// non-JSON output, missing keys, bad datetime — is returned as an error so
/// the orchestrator can substitute the rule-based result wholesale.
pub async fn classify_with_model(
    llm: &dyn LlmProvider,
    profile: &RestaurantProfile,
    utterance: &str,
    now: DateTime<FixedOffset>,
) -> Result<IntentResult, ClassifyError> {
    let prompt = build_prompt(profile, utterance, now);

    let response = llm
        .generate(&prompt)
        .await
        .map_err(ClassifyError::ModelUnavailable)?;

    let json = extract_json(&response).ok_or_else(|| {
        ClassifyError::MalformedOutput(format!("no JSON object in model reply: {response}"))
    })?;

    let reply: ModelReply = serde_json::from_str(json)
        .map_err(|e| ClassifyError::MalformedOutput(format!("invalid reply JSON: {e}")))?;

    tracing::info!(intent = %reply.intent, "model classified utterance");

    map_reply(reply, *now.offset())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600 + 1800).unwrap()
    }

    #[test]
    fn test_extract_json_direct() {
        let raw = r#"{"intent":"menu","response_text":"We serve biryani."}"#;
        assert_eq!(extract_json(raw), Some(raw));
    }

    #[test]
    fn test_extract_json_fenced_block() {
        let raw = "Here you go:\n```json\n{\"intent\":\"hours\",\"response_text\":\"Open at 11.\"}\n```\nAnything else?";
        let json = extract_json(raw).unwrap();
        let reply: ModelReply = serde_json::from_str(json).unwrap();
        assert_eq!(reply.intent, "hours");
    }

    #[test]
    fn test_extract_json_embedded_braces() {
        let raw = "Sure! {\"intent\":\"unknown\",\"response_text\":\"Hi\"} hope that helps";
        let json = extract_json(raw).unwrap();
        assert!(serde_json::from_str::<ModelReply>(json).is_ok());
    }

    #[test]
    fn test_extract_json_none_for_plain_text() {
        assert!(extract_json("not json at all").is_none());
    }

    #[test]
    fn test_map_reservation_reply() {
        let reply = ModelReply {
            intent: "reservation".to_string(),
            reservation_details: Some(ModelReservation {
                datetime: "2024-06-11T19:00:00".to_string(),
                party_size: 4,
            }),
            response_text: "Booked for tomorrow at 7pm.".to_string(),
        };
        let result = map_reply(reply, offset()).unwrap();
        assert_eq!(result.intent, Intent::Reservation);
        let detail = result.reservation.unwrap();
        assert_eq!(detail.party_size, 4);
        assert_eq!(
            detail.date_time,
            DateTime::parse_from_rfc3339("2024-06-11T19:00:00+05:30").unwrap()
        );
    }

    #[test]
    fn test_map_reservation_bad_datetime_is_malformed() {
        let reply = ModelReply {
            intent: "reservation".to_string(),
            reservation_details: Some(ModelReservation {
                datetime: "sometime tomorrow".to_string(),
                party_size: 2,
            }),
            response_text: "Sure.".to_string(),
        };
        assert!(matches!(
            map_reply(reply, offset()),
            Err(ClassifyError::MalformedOutput(_))
        ));
    }

    #[test]
    fn test_non_reservation_intent_drops_details() {
        let reply = ModelReply {
            intent: "hours".to_string(),
            reservation_details: Some(ModelReservation {
                datetime: "2024-06-11T19:00:00".to_string(),
                party_size: 2,
            }),
            response_text: "We open at 11.".to_string(),
        };
        let result = map_reply(reply, offset()).unwrap();
        assert_eq!(result.intent, Intent::Hours);
        assert!(result.reservation.is_none());
    }

    #[test]
    fn test_rfc3339_datetime_normalized_to_restaurant_offset() {
        let parsed = parse_model_datetime("2024-06-11T13:30:00Z", offset()).unwrap();
        assert_eq!(
            parsed,
            DateTime::parse_from_rfc3339("2024-06-11T19:00:00+05:30").unwrap()
        );
        assert_eq!(*parsed.offset(), offset());
    }

    #[test]
    fn test_missing_required_keys_fails_parse() {
        let json = r#"{"response_text":"hello"}"#;
        assert!(serde_json::from_str::<ModelReply>(json).is_err());
        let json = r#"{"intent":"menu"}"#;
        assert!(serde_json::from_str::<ModelReply>(json).is_err());
    }

    #[test]
    fn test_party_size_defaults_in_wire_shape() {
        let json = r#"{"intent":"reservation","reservation_details":{"datetime":"2024-06-11T19:00:00"},"response_text":"ok"}"#;
        let reply: ModelReply = serde_json::from_str(json).unwrap();
        assert_eq!(reply.reservation_details.unwrap().party_size, 2);
    }
}
