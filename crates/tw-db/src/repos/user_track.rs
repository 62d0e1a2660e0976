//! Track membership repository: joining tracks and the unlock predicates.
//!
//! `join_track` is a find-or-create against the `(user_id, track_id)` unique
//! index. The insert uses `ON CONFLICT DO NOTHING`, so a concurrent second
//! join observes the first one's row instead of failing.

use chrono::Utc;
use tw_core::entities::{Solution, UserTrack};
use tw_core::enums::{AuditAction, EntityType};
use tw_core::ids::PREFIX_USER_TRACK;

use crate::error::DatabaseError;
use crate::helpers::parse_datetime;
use crate::service::ProgressService;

const SELECT_COLS: &str = "id, user_id, track_id, created_at";

fn row_to_user_track(row: &libsql::Row) -> Result<UserTrack, DatabaseError> {
    Ok(UserTrack {
        id: row.get(0)?,
        user_id: row.get(1)?,
        track_id: row.get(2)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

impl ProgressService {
    /// Grant `user_id` access to `track_id`. Idempotent.
    ///
    /// Returns the existing membership unchanged when the user already joined.
    /// Never creates solutions.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the user or track does not exist.
    pub async fn join_track(&self, user_id: &str, track_id: &str) -> Result<UserTrack, DatabaseError> {
        self.require(EntityType::User, user_id).await?;
        self.require(EntityType::Track, track_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_USER_TRACK).await?;
        let inserted = self
            .db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO user_tracks ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT (user_id, track_id) DO NOTHING"
                ),
                libsql::params![id.as_str(), user_id, track_id, now.to_rfc3339()],
            )
            .await?;

        let user_track = self
            .get_user_track(user_id, track_id)
            .await?
            .ok_or(DatabaseError::NoResult)?;

        if inserted > 0 {
            self.record(
                EntityType::UserTrack,
                &user_track.id,
                AuditAction::Joined,
                Some(serde_json::json!({ "user_id": user_id, "track_id": track_id })),
            )
            .await?;
            tracing::info!(user_id, track_id, "user joined track");
        } else {
            tracing::debug!(user_id, track_id, "track already joined");
        }

        Ok(user_track)
    }

    pub async fn get_user_track(
        &self,
        user_id: &str,
        track_id: &str,
    ) -> Result<Option<UserTrack>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM user_tracks WHERE user_id = ?1 AND track_id = ?2"
                ),
                [user_id, track_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user_track(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_user_tracks(&self, user_id: &str) -> Result<Vec<UserTrack>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM user_tracks WHERE user_id = ?1 ORDER BY created_at"
                ),
                [user_id],
            )
            .await?;

        let mut memberships = Vec::new();
        while let Some(row) = rows.next().await? {
            memberships.push(row_to_user_track(&row)?);
        }
        Ok(memberships)
    }

    /// Whether `user_id` has been granted access to `track_id`.
    pub async fn unlocked_track(&self, user_id: &str, track_id: &str) -> Result<bool, DatabaseError> {
        Ok(self.get_user_track(user_id, track_id).await?.is_some())
    }

    /// Whether `user_id` may work on `exercise_id`.
    ///
    /// Requires the exercise's track to be unlocked. Within it, side exercises
    /// are always open, the first core exercise is always open, and any other
    /// core exercise opens once a solution exists for it (created by the
    /// reflection on the preceding core exercise).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown exercise.
    pub async fn unlocked_exercise(
        &self,
        user_id: &str,
        exercise_id: &str,
    ) -> Result<bool, DatabaseError> {
        let exercise = self.get_exercise(exercise_id).await?;
        if !self.unlocked_track(user_id, &exercise.track_id).await? {
            return Ok(false);
        }
        if !exercise.core {
            return Ok(true);
        }
        if self.find_solution(user_id, exercise_id).await?.is_some() {
            return Ok(true);
        }
        let first = self.first_core_exercise(&exercise.track_id).await?;
        Ok(first.is_some_and(|first| first.id == exercise.id))
    }

    /// Join a track and make sure its first core exercise has a solution shell.
    ///
    /// Returns the shell, or `None` when the track has no core exercises.
    pub async fn start_track_exercise(
        &self,
        user_id: &str,
        track_id: &str,
    ) -> Result<Option<Solution>, DatabaseError> {
        self.join_track(user_id, track_id).await?;
        match self.first_core_exercise(track_id).await? {
            Some(exercise) => Ok(Some(self.ensure_solution(user_id, &exercise.id).await?)),
            None => Ok(None),
        }
    }
}
