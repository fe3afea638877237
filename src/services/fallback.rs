//! Deterministic keyword classifier used when the model path is unavailable
//! or returns something unusable.

use chrono::{DateTime, Datelike, FixedOffset};

use crate::models::{Intent, IntentResult, RestaurantProfile};
use crate::services::{knowledge, temporal};

const HOURS_KEYWORDS: &[&str] = &["hour", "open", "close", "timing"];
const MENU_KEYWORDS: &[&str] = &["menu", "food", "dish", "specialty", "serve", "eat"];
const RESERVATION_KEYWORDS: &[&str] = &["book", "reserve", "reservation", "table", "seat"];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Classify an utterance by keyword priority: hours, then menu, then
/// reservation, else unknown. The reservation branch delegates to the
/// temporal resolver and degrades to a clarification request when it finds
/// nothing.
pub fn classify(
    profile: &RestaurantProfile,
    utterance: &str,
    now: DateTime<FixedOffset>,
) -> IntentResult {
    let lower = utterance.to_lowercase();

    if contains_any(&lower, HOURS_KEYWORDS) {
        let reply = knowledge::hours_for(profile, utterance, now.weekday());
        return IntentResult::simple(Intent::Hours, reply);
    }

    if contains_any(&lower, MENU_KEYWORDS) {
        return IntentResult::simple(Intent::Menu, knowledge::menu_highlights(profile));
    }

    if contains_any(&lower, RESERVATION_KEYWORDS) {
        return match temporal::resolve(utterance, now) {
            Some(resolved) => {
                let spoken_time = resolved.date_time.format("%A, %B %-d at %-I:%M %p");
                let reply = format!(
                    "I'll book your reservation for {} for {} people.",
                    spoken_time, resolved.party_size
                );
                IntentResult::reservation(
                    Some(crate::models::ReservationDetail {
                        date_time: resolved.date_time,
                        party_size: resolved.party_size,
                    }),
                    reply,
                )
            }
            None => IntentResult::reservation(
                None,
                "I couldn't understand when you want to make a reservation. \
                 Please specify a day and time.",
            ),
        };
    }

    IntentResult::simple(
        Intent::Unknown,
        "I'm not sure I understood. You can ask about our hours, our menu, or make a reservation.",
    )
}
