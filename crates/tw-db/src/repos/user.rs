//! User and auth token repository.
//!
//! Token issuance is the `AuthTokenIssuer`: every call mints a fresh opaque
//! token. The token value itself is never written to logs or the audit trail.

use chrono::Utc;
use tw_core::entities::{AuthToken, User};
use tw_core::enums::{AuditAction, EntityType};
use tw_core::ids::{PREFIX_AUTH_TOKEN, PREFIX_USER};

use crate::error::DatabaseError;
use crate::helpers::parse_datetime;
use crate::service::ProgressService;

const USER_COLS: &str = "id, handle, created_at";
const TOKEN_COLS: &str = "id, user_id, token, created_at";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get(0)?,
        handle: row.get(1)?,
        created_at: parse_datetime(&row.get::<String>(2)?)?,
    })
}

fn row_to_token(row: &libsql::Row) -> Result<AuthToken, DatabaseError> {
    Ok(AuthToken {
        id: row.get(0)?,
        user_id: row.get(1)?,
        token: row.get(2)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

impl ProgressService {
    /// Create a user with a unique handle.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank or taken handles.
    pub async fn create_user(&self, handle: &str) -> Result<User, DatabaseError> {
        let handle = handle.trim();
        if handle.is_empty() {
            return Err(DatabaseError::validation("handle must not be empty"));
        }
        if self.find_user_by_handle(handle).await?.is_some() {
            return Err(DatabaseError::validation(format!(
                "handle '{handle}' is already taken"
            )));
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_USER).await?;
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO users ({USER_COLS}) VALUES (?1, ?2, ?3)"),
                libsql::params![id.as_str(), handle, now.to_rfc3339()],
            )
            .await?;

        self.record(EntityType::User, &id, AuditAction::Created, None)
            .await?;

        Ok(User {
            id,
            handle: handle.to_string(),
            created_at: now,
        })
    }

    pub async fn get_user(&self, id: &str) -> Result<User, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {USER_COLS} FROM users WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::User, id))?;
        row_to_user(&row)
    }

    pub async fn find_user_by_handle(&self, handle: &str) -> Result<Option<User>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {USER_COLS} FROM users WHERE handle = ?1"),
                [handle],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    /// Issue a fresh unique access token for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown user, `DatabaseError::Auth` if the
    /// random source fails, or the underlying libSQL error.
    pub async fn issue_auth_token(&self, user_id: &str) -> Result<AuthToken, DatabaseError> {
        self.require(EntityType::User, user_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_AUTH_TOKEN).await?;
        let token = tw_auth::generate_token(self.token_bytes())?;

        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO auth_tokens ({TOKEN_COLS}) VALUES (?1, ?2, ?3, ?4)"),
                libsql::params![id.as_str(), user_id, token.as_str(), now.to_rfc3339()],
            )
            .await?;

        self.record(
            EntityType::AuthToken,
            &id,
            AuditAction::TokenIssued,
            Some(serde_json::json!({ "user_id": user_id })),
        )
        .await?;
        tracing::debug!(user_id, token_id = %id, "issued auth token");

        Ok(AuthToken {
            id,
            user_id: user_id.to_string(),
            token,
            created_at: now,
        })
    }

    /// Resolve the user an access token was issued to.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the token is not shaped like an
    /// issued token and `NotFound` when no such token was issued.
    pub async fn authenticate(&self, token: &str) -> Result<User, DatabaseError> {
        tw_auth::validate_token(token)
            .map_err(|e| DatabaseError::validation(format!("rejected access token: {e}")))?;

        let mut rows = self
            .db()
            .conn()
            .query("SELECT user_id FROM auth_tokens WHERE token = ?1", [token])
            .await?;
        let Some(row) = rows.next().await? else {
            tracing::debug!("unknown access token presented");
            return Err(DatabaseError::not_found(EntityType::AuthToken, "<redacted>"));
        };
        let user_id = row.get::<String>(0)?;
        self.get_user(&user_id).await
    }

    pub async fn list_auth_tokens(&self, user_id: &str) -> Result<Vec<AuthToken>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {TOKEN_COLS} FROM auth_tokens WHERE user_id = ?1 ORDER BY created_at"
                ),
                [user_id],
            )
            .await?;

        let mut tokens = Vec::new();
        while let Some(row) = rows.next().await? {
            tokens.push(row_to_token(&row)?);
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::helpers::test_service;

    #[tokio::test]
    async fn create_user_roundtrip() {
        let svc = test_service().await;
        let user = svc.create_user("alice").await.unwrap();
        assert!(user.id.starts_with("usr-"));

        let fetched = svc.get_user(&user.id).await.unwrap();
        assert_eq!(fetched, user);
    }

    #[tokio::test]
    async fn duplicate_handle_rejected() {
        let svc = test_service().await;
        svc.create_user("alice").await.unwrap();
        let err = svc.create_user("alice").await.unwrap_err();
        assert!(err.is_validation(), "{err}");
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let svc = test_service().await;
        let err = svc.get_user("usr-deadbeef").await.unwrap_err();
        assert!(err.is_not_found(), "{err}");
    }

    #[tokio::test]
    async fn each_issue_mints_a_distinct_token() {
        let svc = test_service().await;
        let user = svc.create_user("alice").await.unwrap();

        let first = svc.issue_auth_token(&user.id).await.unwrap();
        let second = svc.issue_auth_token(&user.id).await.unwrap();
        assert_ne!(first.token, second.token);
        tw_auth::validate_token(&first.token).unwrap();

        let tokens = svc.list_auth_tokens(&user.id).await.unwrap();
        assert_eq!(tokens.len(), 2);
    }

    #[tokio::test]
    async fn token_for_unknown_user_fails() {
        let svc = test_service().await;
        let err = svc.issue_auth_token("usr-deadbeef").await.unwrap_err();
        assert!(err.is_not_found(), "{err}");
    }

    #[tokio::test]
    async fn token_authenticates_its_user() {
        let svc = test_service().await;
        let alice = svc.create_user("alice").await.unwrap();
        let bob = svc.create_user("bob").await.unwrap();
        let first = svc.issue_auth_token(&alice.id).await.unwrap();
        let second = svc.issue_auth_token(&alice.id).await.unwrap();
        svc.issue_auth_token(&bob.id).await.unwrap();

        assert_eq!(svc.authenticate(&first.token).await.unwrap(), alice);
        assert_eq!(svc.authenticate(&second.token).await.unwrap(), alice);
    }

    #[tokio::test]
    async fn malformed_and_unknown_tokens_are_rejected() {
        let svc = test_service().await;
        let err = svc.authenticate("not a token!").await.unwrap_err();
        assert!(err.is_validation(), "{err}");

        let unissued = tw_auth::generate_token(32).unwrap();
        let err = svc.authenticate(&unissued).await.unwrap_err();
        assert!(err.is_not_found(), "{err}");
    }
}
