#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Invalid geometry: {0}")]
    Geometry(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}
