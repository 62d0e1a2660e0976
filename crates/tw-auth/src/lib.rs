//! # tw-auth
//!
//! Access token issuance for Trackway.
//!
//! Tokens are opaque: random bytes from the OS (`getrandom`) encoded as
//! unpadded URL-safe base64. Uniqueness across users is enforced by the
//! database's unique index; the entropy here makes collisions practically
//! impossible.

pub mod error;
pub mod token;

pub use error::AuthError;
pub use token::{DEFAULT_TOKEN_BYTES, generate_token, validate_token};
