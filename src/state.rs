use crate::config::AppConfig;
use crate::models::RestaurantProfile;
use crate::services::ai::LlmProvider;
use crate::services::calendar::CalendarClient;
use crate::services::transcript::TranscriptSink;

/// Shared, read-only request context. The model and calendar handles are
/// optional: when either credential is missing that path is disabled and
/// the rest keeps working.
pub struct AppState {
    pub config: AppConfig,
    pub profile: RestaurantProfile,
    pub llm: Option<Box<dyn LlmProvider>>,
    pub calendar: Option<Box<dyn CalendarClient>>,
    pub transcript: Box<dyn TranscriptSink>,
}
