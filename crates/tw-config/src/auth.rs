//! Access token settings.

use serde::{Deserialize, Serialize};

/// Random bytes per issued token.
const fn default_token_bytes() -> usize {
    32
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default = "default_token_bytes")]
    pub token_bytes: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_bytes: default_token_bytes(),
        }
    }
}
