use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::error::AuthError;

/// Default number of random bytes per token (256 bits).
pub const DEFAULT_TOKEN_BYTES: usize = 32;

const MIN_TOKEN_BYTES: usize = 16;
const MAX_TOKEN_BYTES: usize = 64;

/// Generate a fresh opaque token from `len` random bytes.
///
/// # Errors
///
/// Returns `AuthError::InvalidLength` if `len` is outside `16..=64`, or
/// `AuthError::TokenGeneration` if the OS random source fails.
pub fn generate_token(len: usize) -> Result<String, AuthError> {
    if !(MIN_TOKEN_BYTES..=MAX_TOKEN_BYTES).contains(&len) {
        return Err(AuthError::InvalidLength(len));
    }

    let mut bytes = vec![0u8; len];
    getrandom::fill(&mut bytes).map_err(|e| AuthError::TokenGeneration(e.to_string()))?;
    let token = URL_SAFE_NO_PAD.encode(&bytes);
    tracing::trace!(bytes = len, "generated access token");
    Ok(token)
}

/// Check that `token` looks like something [`generate_token`] produced.
///
/// # Errors
///
/// Returns `AuthError::MalformedToken` if the token is not URL-safe base64 or
/// decodes to a length outside `16..=64` bytes.
pub fn validate_token(token: &str) -> Result<(), AuthError> {
    let decoded = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|e| AuthError::MalformedToken(e.to_string()))?;
    if !(MIN_TOKEN_BYTES..=MAX_TOKEN_BYTES).contains(&decoded.len()) {
        return Err(AuthError::MalformedToken(format!(
            "decodes to {} bytes",
            decoded.len()
        )));
    }
    Ok(())
}
