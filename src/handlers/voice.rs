use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Form;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha1::Sha1;

use crate::services::{calendar, orchestrator};
use crate::state::AppState;

const WELCOME: &str = "Welcome to our restaurant. How can I assist you today? \
                       You can ask about our hours, menu, or make a reservation.";
const REPEAT_PROMPT: &str = "I'm sorry, I didn't hear your request. Could you please repeat?";
const ANYTHING_ELSE: &str = "Is there anything else I can help you with?";
const BOOKING_TROUBLE: &str =
    "There was an issue with your reservation. Please call the restaurant directly.";

#[derive(Deserialize)]
#[allow(dead_code)]
pub struct VoiceWebhookForm {
    #[serde(rename = "From")]
    pub from: Option<String>,
    #[serde(rename = "To")]
    pub to: Option<String>,
    #[serde(rename = "CallSid")]
    pub call_sid: Option<String>,
    #[serde(rename = "SpeechResult")]
    pub speech_result: Option<String>,
}

/// Call answered: greet and open a speech gather.
pub async fn voice(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<VoiceWebhookForm>,
) -> Response {
    if let Some(denied) = check_signature(&state, &headers, "/voice", &form) {
        return denied;
    }
    gather_response(&[WELCOME.to_string()])
}

/// One transcribed utterance from the caller. Classify, speak the reply,
/// book the calendar when a reservation was resolved, and re-gather.
pub async fn process_voice(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<VoiceWebhookForm>,
) -> Response {
    if let Some(denied) = check_signature(&state, &headers, "/process-voice", &form) {
        return denied;
    }

    let utterance = form
        .speech_result
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_string();

    if utterance.is_empty() {
        return gather_response(&[REPEAT_PROMPT.to_string()]);
    }

    tracing::info!(utterance = %utterance, "incoming voice utterance");

    let now = Utc::now().with_timezone(&state.config.utc_offset);
    let result = orchestrator::handle(state.llm.as_deref(), &state.profile, &utterance, now).await;

    let mut lines = vec![result.response_text.clone()];

    if let Some(detail) = &result.reservation {
        match &state.calendar {
            Some(client) => {
                let event =
                    calendar::reservation_event(detail, &utterance, &state.config.timezone_name);
                match client.create_event(&event).await {
                    Ok(()) => {
                        tracing::info!(start = %detail.date_time, party_size = detail.party_size, "calendar event created");
                        lines.push(format!(
                            "Your reservation has been confirmed for {}.",
                            detail.date_time.format("%A, %B %-d at %-I:%M %p")
                        ));
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "calendar booking failed");
                        lines.push(BOOKING_TROUBLE.to_string());
                    }
                }
            }
            None => {
                tracing::warn!("calendar client not configured, skipping booking");
            }
        }
    }

    lines.push(ANYTHING_ELSE.to_string());

    state
        .transcript
        .record(&utterance, result.intent, &result.response_text);

    gather_response(&lines)
}

/// Twilio request signature check, skipped when no auth token is set (dev
/// mode). Returns the rejection response when validation fails.
fn check_signature(
    state: &Arc<AppState>,
    headers: &HeaderMap,
    path: &str,
    form: &VoiceWebhookForm,
) -> Option<Response> {
    if state.config.twilio_auth_token.is_empty() {
        return None;
    }

    let signature = headers
        .get("x-twilio-signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if signature.is_empty() {
        tracing::warn!("missing X-Twilio-Signature header");
        return Some((StatusCode::FORBIDDEN, "Missing signature").into_response());
    }

    // Reconstruct the webhook URL, honoring proxy headers.
    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("https");
    let host = headers
        .get("x-forwarded-host")
        .or_else(|| headers.get("host"))
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let url = format!("{proto}://{host}{path}");

    let params = [
        ("From", form.from.as_deref().unwrap_or("")),
        ("To", form.to.as_deref().unwrap_or("")),
        ("CallSid", form.call_sid.as_deref().unwrap_or("")),
        ("SpeechResult", form.speech_result.as_deref().unwrap_or("")),
    ];

    if !validate_twilio_signature(&state.config.twilio_auth_token, signature, &url, &params) {
        tracing::warn!("invalid Twilio signature");
        return Some((StatusCode::FORBIDDEN, "Invalid signature").into_response());
    }

    None
}

fn validate_twilio_signature(
    auth_token: &str,
    signature: &str,
    url: &str,
    params: &[(&str, &str)],
) -> bool {
    // Data to sign: URL followed by the params sorted by key, concatenated.
    let mut data = url.to_string();
    let mut sorted_params = params.to_vec();
    sorted_params.sort_by(|a, b| a.0.cmp(b.0));
    for (key, value) in &sorted_params {
        data.push_str(key);
        data.push_str(value);
    }

    let mut mac = match Hmac::<Sha1>::new_from_slice(auth_token.as_bytes()) {
        Ok(m) => m,
        Err(_) => return false,
    };
    mac.update(data.as_bytes());
    let expected = base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes());

    expected == signature
}

/// TwiML: speak each line, then gather the next utterance.
fn gather_response(lines: &[String]) -> Response {
    let mut body = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response>");
    for line in lines {
        body.push_str("<Say>");
        body.push_str(&xml_escape(line));
        body.push_str("</Say>");
    }
    body.push_str(
        "<Gather input=\"speech\" action=\"/process-voice\" method=\"POST\" timeout=\"5\"/>",
    );
    body.push_str("</Response>");

    ([(header::CONTENT_TYPE, "application/xml")], body).into_response()
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
