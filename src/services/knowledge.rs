//! Pure answers for hours and menu questions from the static profile.

use chrono::Weekday;

use crate::models::profile::{day_name, RestaurantProfile, WEEK};

/// Hours answer for an utterance: a named weekday wins, then
/// "today"/"tomorrow" relative to `today`, otherwise the whole week.
pub fn hours_for(profile: &RestaurantProfile, utterance: &str, today: Weekday) -> String {
    let lower = utterance.to_lowercase();

    for &day in &WEEK {
        if lower.contains(&day_name(day).to_lowercase()) {
            return format!(
                "Our hours on {} are {}.",
                day_name(day),
                profile.hours_on(day)
            );
        }
    }

    if lower.contains("today") {
        return format!(
            "Our hours today ({}) are {}.",
            day_name(today),
            profile.hours_on(today)
        );
    }
    if lower.contains("tomorrow") {
        let tomorrow = today.succ();
        return format!(
            "Our hours tomorrow ({}) are {}.",
            day_name(tomorrow),
            profile.hours_on(tomorrow)
        );
    }

    let all: Vec<String> = profile
        .week()
        .map(|(day, hours)| format!("{}: {}", day_name(day), hours))
        .collect();
    format!("Our restaurant hours are: {}", all.join(", "))
}

pub fn menu_highlights(profile: &RestaurantProfile) -> String {
    format!(
        "Some of our popular menu items include: {}. We offer a variety of vegetarian and non-vegetarian dishes.",
        profile.menu_highlights.join(", ")
    )
}
