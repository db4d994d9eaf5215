use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuantifyError {
    #[error(transparent)]
    InvalidConfig(#[from] core_config::ConfigError),
    #[error(transparent)]
    Engine(#[from] core_engine::EngineError),
}
