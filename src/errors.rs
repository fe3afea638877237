/// Failure modes of the model-backed classifier path. Every variant is
/// recovered by switching to the rule-based fallback; none is surfaced to
/// the caller as error text.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("model call failed: {0}")]
    ModelUnavailable(#[source] anyhow::Error),

    #[error("model output was not usable: {0}")]
    MalformedOutput(String),
}
