#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Malformed threshold definition: {status} range [{min}, {max}]")]
    MalformedThreshold {
        status: &'static str,
        min: f64,
        max: f64,
    },

    #[error("Invalid cached record: {0}")]
    InvalidRecord(String),
}
