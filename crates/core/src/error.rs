#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unknown metric: '{0}'")]
    UnknownMetric(String),

    #[error("Invalid value for {field}: '{value}'")]
    InvalidValue { field: &'static str, value: String },

    #[error("Validation failed: {0}")]
    Validation(String),
}
