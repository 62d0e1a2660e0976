//! Registration and first-time setup of a user.

use tw_core::entities::User;
use tw_core::responses::BootstrapOutcome;

use crate::error::DatabaseError;
use crate::service::ProgressService;

impl ProgressService {
    /// Give a freshly registered user an auth token and, optionally, their
    /// first track.
    ///
    /// An `initial_track_id` that does not name a track is skipped; the user
    /// is still bootstrapped.
    ///
    /// # Errors
    ///
    /// Token issuance failures and storage errors other than a missing track
    /// propagate.
    pub async fn bootstrap_user(
        &self,
        user_id: &str,
        initial_track_id: Option<&str>,
    ) -> Result<BootstrapOutcome, DatabaseError> {
        let token = self.issue_auth_token(user_id).await?;

        let user_track = match initial_track_id {
            None => None,
            Some(track_id) => match self.find_track(track_id).await? {
                Some(track) => Some(self.join_track(user_id, &track.id).await?),
                None => {
                    tracing::debug!(user_id, track_id, "initial track not found, skipping");
                    None
                }
            },
        };

        Ok(BootstrapOutcome { token, user_track })
    }

    /// Create a user and bootstrap them.
    pub async fn register_user(
        &self,
        handle: &str,
        initial_track_id: Option<&str>,
    ) -> Result<(User, BootstrapOutcome), DatabaseError> {
        let user = self.create_user(handle).await?;
        let outcome = self.bootstrap_user(&user.id, initial_track_id).await?;
        tracing::info!(user_id = %user.id, handle, "registered user");
        Ok((user, outcome))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::helpers::{test_service, test_track, test_user};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn nonexistent_track_yields_token_only() {
        let svc = test_service().await;
        let user = test_user(&svc, "alice").await;

        let outcome = svc
            .bootstrap_user(&user.id, Some("trk-deadbeef"))
            .await
            .unwrap();

        assert_eq!(outcome.user_track, None);
        assert_eq!(svc.list_auth_tokens(&user.id).await.unwrap().len(), 1);
        assert!(svc.list_user_tracks(&user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn existing_track_is_joined() {
        let svc = test_service().await;
        let (track, _) = test_track(&svc, "rust", 1).await;

        let (user, outcome) = svc.register_user("alice", Some(&track.id)).await.unwrap();
        let user_track = outcome.user_track.unwrap();
        assert_eq!(user_track.track_id, track.id);
        assert_eq!(outcome.token.user_id, user.id);
        assert!(svc.unlocked_track(&user.id, &track.id).await.unwrap());
    }

    #[tokio::test]
    async fn no_track_still_issues_token() {
        let svc = test_service().await;
        let (user, outcome) = svc.register_user("alice", None).await.unwrap();
        assert_eq!(outcome.user_track, None);
        assert_eq!(svc.list_auth_tokens(&user.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_user_fails_before_anything_is_written() {
        let svc = test_service().await;
        let (track, _) = test_track(&svc, "rust", 1).await;
        let err = svc
            .bootstrap_user("usr-deadbeef", Some(&track.id))
            .await
            .unwrap_err();
        assert!(err.is_not_found(), "{err}");
    }
}
