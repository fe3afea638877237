use chrono::Weekday;
use serde::{Deserialize, Serialize};

pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Static per-deployment restaurant data: operating hours keyed by weekday
/// and an ordered list of menu highlights. Loaded once at startup, read-only
/// afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantProfile {
    hours: [String; 7],
    pub menu_highlights: Vec<String>,
}

impl RestaurantProfile {
    pub fn hours_on(&self, day: Weekday) -> &str {
        &self.hours[day.num_days_from_monday() as usize]
    }

    pub fn week(&self) -> impl Iterator<Item = (Weekday, &str)> {
        WEEK.iter().map(|&day| (day, self.hours_on(day)))
    }

    /// Hours table as a JSON object keyed by lowercase day name, for
    /// embedding into the model prompt.
    pub fn hours_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (day, hours) in self.week() {
            map.insert(day_name(day).to_lowercase(), hours.into());
        }
        serde_json::Value::Object(map)
    }
}

impl Default for RestaurantProfile {
    fn default() -> Self {
        Self {
            hours: [
                "11:00 AM to 10:00 PM".to_string(),
                "11:00 AM to 10:00 PM".to_string(),
                "11:00 AM to 10:00 PM".to_string(),
                "11:00 AM to 10:00 PM".to_string(),
                "11:00 AM to 11:00 PM".to_string(),
                "10:00 AM to 11:00 PM".to_string(),
                "10:00 AM to 9:00 PM".to_string(),
            ],
            menu_highlights: vec![
                "Our chef's special butter chicken".to_string(),
                "Paneer tikka masala".to_string(),
                "Lamb biryani".to_string(),
                "Vegetable samosas".to_string(),
                "Garlic naan".to_string(),
                "Mango lassi".to_string(),
            ],
        }
    }
}
