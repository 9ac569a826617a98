use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Login failed: {0}")]
    Login(String),

    #[error("Admin role required for this command")]
    AdminRequired,

    #[error("Tag '{tag}' is protected by the retention policy (three most recent tags are kept)")]
    ProtectedTag { tag: String },

    #[error("Image '{0}' not found in the registry")]
    UnknownImage(String),

    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
