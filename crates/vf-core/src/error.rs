use thiserror::Error;

pub type CoreResult<T> = Result<T, ConfigError>;

/// Configuration-time failures. Everything here is rejected before the
/// first solver step runs.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Non-physical value for {field}: {value} ({reason})")]
    NonPhysical {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Inconsistent configuration: {what}")]
    Inconsistent { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
