use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use hostline::config::AppConfig;
use hostline::handlers;
use hostline::models::RestaurantProfile;
use hostline::services::ai::gemini::GeminiProvider;
use hostline::services::ai::LlmProvider;
use hostline::services::calendar::{CalendarClient, GoogleCalendarClient};
use hostline::services::transcript::FileTranscriptSink;
use hostline::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env()?;

    let llm: Option<Box<dyn LlmProvider>> = if config.gemini_api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY not set, model path disabled; rule-based classifier only");
        None
    } else {
        tracing::info!("using Gemini provider (model: {})", config.gemini_model);
        Some(Box::new(GeminiProvider::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
        )))
    };

    let calendar: Option<Box<dyn CalendarClient>> =
        if config.calendar_token.is_empty() || config.calendar_id.is_empty() {
            tracing::warn!("calendar credentials not set, bookings will not be persisted");
            None
        } else {
            tracing::info!("using calendar {}", config.calendar_id);
            Some(Box::new(GoogleCalendarClient::new(
                config.calendar_token.clone(),
                config.calendar_id.clone(),
            )))
        };

    let transcript = Box::new(FileTranscriptSink::new(config.transcript_path.clone()));

    let state = Arc::new(AppState {
        config: config.clone(),
        profile: RestaurantProfile::default(),
        llm,
        calendar,
        transcript,
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/voice", post(handlers::voice::voice))
        .route("/process-voice", post(handlers::voice::process_voice))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
