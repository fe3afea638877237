pub mod ai;
pub mod calendar;
pub mod fallback;
pub mod knowledge;
pub mod orchestrator;
pub mod temporal;
pub mod transcript;
