use std::time::Duration as StdDuration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset};
use serde::Serialize;

use crate::models::ReservationDetail;

const RESERVATION_LENGTH_HOURS: i64 = 2;
const REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(15);

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EventTime {
    #[serde(rename = "dateTime")]
    pub date_time: DateTime<FixedOffset>,
    #[serde(rename = "timeZone")]
    pub time_zone: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CalendarEvent {
    pub summary: String,
    pub description: String,
    pub start: EventTime,
    pub end: EventTime,
}

/// Downstream booking sink. Only invoked when a reservation detail exists;
/// failures are reported back so the caller can tell the customer to phone
/// the restaurant directly.
#[async_trait]
pub trait CalendarClient: Send + Sync {
    async fn create_event(&self, event: &CalendarEvent) -> anyhow::Result<()>;
}

/// Build the calendar event for a resolved reservation: fixed two-hour
/// duration, original utterance preserved in the description.
pub fn reservation_event(
    detail: &ReservationDetail,
    utterance: &str,
    time_zone: &str,
) -> CalendarEvent {
    let end = detail.date_time + Duration::hours(RESERVATION_LENGTH_HOURS);
    CalendarEvent {
        summary: format!("Restaurant Reservation ({} people)", detail.party_size),
        description: format!("Reservation made via voice system. Original request: '{utterance}'"),
        start: EventTime {
            date_time: detail.date_time,
            time_zone: time_zone.to_string(),
        },
        end: EventTime {
            date_time: end,
            time_zone: time_zone.to_string(),
        },
    }
}

pub struct GoogleCalendarClient {
    token: String,
    calendar_id: String,
    client: reqwest::Client,
}

impl GoogleCalendarClient {
    pub fn new(token: String, calendar_id: String) -> Self {
        Self {
            token,
            calendar_id,
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }
}

#[async_trait]
impl CalendarClient for GoogleCalendarClient {
    async fn create_event(&self, event: &CalendarEvent) -> anyhow::Result<()> {
        let url = format!(
            "https://www.googleapis.com/calendar/v3/calendars/{}/events",
            self.calendar_id
        );

        self.client
            .post(&url)
            .bearer_auth(&self.token)
            .json(event)
            .send()
            .await
            .context("failed to call Calendar API")?
            .error_for_status()
            .context("Calendar API returned error")?;

        Ok(())
    }
}
