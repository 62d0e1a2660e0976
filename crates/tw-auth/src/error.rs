use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token generation failed: {0}")]
    TokenGeneration(String),

    #[error("token length {0} is outside the allowed range 16..=64 bytes")]
    InvalidLength(usize),

    #[error("malformed token: {0}")]
    MalformedToken(String),
}
