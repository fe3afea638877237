pub mod intent;
pub mod profile;

pub use intent::{Intent, IntentResult, ReservationDetail};
pub use profile::RestaurantProfile;
