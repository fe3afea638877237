use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Hours,
    Menu,
    Reservation,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Hours => "hours",
            Intent::Menu => "menu",
            Intent::Reservation => "reservation",
            Intent::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "hours" => Intent::Hours,
            "menu" => Intent::Menu,
            "reservation" => Intent::Reservation,
            _ => Intent::Unknown,
        }
    }
}

/// Normalized reservation request. `date_time` carries the restaurant's
/// fixed UTC offset and is strictly in the future at resolution time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReservationDetail {
    pub date_time: DateTime<FixedOffset>,
    pub party_size: u32,
}

/// Unified output of both classifier paths.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntentResult {
    pub intent: Intent,
    pub reservation: Option<ReservationDetail>,
    pub response_text: String,
}

impl IntentResult {
    /// A result with no reservation payload. Used for every non-reservation
    /// intent, keeping the detail-only-with-Reservation invariant in one place.
    pub fn simple(intent: Intent, response_text: impl Into<String>) -> Self {
        Self {
            intent,
            reservation: None,
            response_text: response_text.into(),
        }
    }

    /// A reservation result. `detail` is `None` when the utterance was
    /// recognized as a reservation but the time could not be resolved
    /// (clarification case).
    pub fn reservation(detail: Option<ReservationDetail>, response_text: impl Into<String>) -> Self {
        Self {
            intent: Intent::Reservation,
            reservation: detail,
            response_text: response_text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_round_trips_through_strings() {
        for intent in [Intent::Hours, Intent::Menu, Intent::Reservation, Intent::Unknown] {
            assert_eq!(Intent::parse(intent.as_str()), intent);
        }
        assert_eq!(Intent::parse("something else"), Intent::Unknown);
    }

    #[test]
    fn test_simple_result_has_no_detail() {
        let result = IntentResult::simple(Intent::Hours, "We open at 11.");
        assert!(result.reservation.is_none());
    }
}
