use std::env;

use chrono::FixedOffset;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub calendar_token: String,
    pub calendar_id: String,
    /// IANA zone name carried on calendar event payloads.
    pub timezone_name: String,
    /// Fixed offset used for all reservation time math.
    pub utc_offset: FixedOffset,
    pub transcript_path: String,
    pub twilio_auth_token: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let offset_raw =
            env::var("RESTAURANT_UTC_OFFSET").unwrap_or_else(|_| "+05:30".to_string());
        let utc_offset = parse_utc_offset(&offset_raw)
            .ok_or_else(|| anyhow::anyhow!("invalid RESTAURANT_UTC_OFFSET: {offset_raw}"))?;

        Ok(Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash-001".to_string()),
            calendar_token: env::var("CALENDAR_TOKEN").unwrap_or_default(),
            calendar_id: env::var("CALENDAR_ID").unwrap_or_default(),
            timezone_name: env::var("RESTAURANT_TZ").unwrap_or_else(|_| "Asia/Kolkata".to_string()),
            utc_offset,
            transcript_path: env::var("TRANSCRIPT_PATH")
                .unwrap_or_else(|_| "restaurant_conversations.log".to_string()),
            twilio_auth_token: env::var("TWILIO_AUTH_TOKEN").unwrap_or_default(),
        })
    }
}

/// Parse "+05:30" / "-08:00" style offsets.
fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let (sign, rest) = match *raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => (1, raw),
    };
    let (hours, minutes) = rest.split_once(':')?;
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_offset() {
        assert_eq!(
            parse_utc_offset("+05:30"),
            FixedOffset::east_opt(5 * 3600 + 1800)
        );
    }

    #[test]
    fn test_parse_negative_offset() {
        assert_eq!(parse_utc_offset("-08:00"), FixedOffset::east_opt(-8 * 3600));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_utc_offset("utc").is_none());
        assert!(parse_utc_offset("+5").is_none());
        assert!(parse_utc_offset("+25:00").is_none());
    }
}
