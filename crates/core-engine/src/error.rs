use thiserror::Error;

/// Fatal engine-level failures (§7). Everything else — discontinuities,
/// bounces, exhausted seed pipelines — is locally recovered and surfaced as
/// the `(-1, -1)` sentinel rather than an error.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid filling configuration: {0}")]
    InvalidConfig(String),
}
