//! Track and exercise catalog repository.
//!
//! The catalog is read-only to the progression rules; the write methods here
//! exist for seeding.

use chrono::Utc;
use tw_core::entities::{Exercise, Track};
use tw_core::enums::{AuditAction, EntityType};
use tw_core::ids::{PREFIX_EXERCISE, PREFIX_TRACK};

use crate::error::DatabaseError;
use crate::helpers::{get_bool, parse_datetime};
use crate::service::ProgressService;

const TRACK_COLS: &str = "id, slug, title, created_at";
const EXERCISE_COLS: &str = "id, track_id, slug, title, position, core";

fn row_to_track(row: &libsql::Row) -> Result<Track, DatabaseError> {
    Ok(Track {
        id: row.get(0)?,
        slug: row.get(1)?,
        title: row.get(2)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

pub(crate) fn row_to_exercise(row: &libsql::Row) -> Result<Exercise, DatabaseError> {
    Ok(Exercise {
        id: row.get(0)?,
        track_id: row.get(1)?,
        slug: row.get(2)?,
        title: row.get(3)?,
        position: row.get(4)?,
        core: get_bool(row, 5)?,
    })
}

impl ProgressService {
    pub async fn create_track(&self, slug: &str, title: &str) -> Result<Track, DatabaseError> {
        if self.find_track_by_slug(slug).await?.is_some() {
            return Err(DatabaseError::validation(format!(
                "track '{slug}' already exists"
            )));
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_TRACK).await?;
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO tracks ({TRACK_COLS}) VALUES (?1, ?2, ?3, ?4)"),
                libsql::params![id.as_str(), slug, title, now.to_rfc3339()],
            )
            .await?;
        self.record(EntityType::Track, &id, AuditAction::Created, None)
            .await?;

        Ok(Track {
            id,
            slug: slug.to_string(),
            title: title.to_string(),
            created_at: now,
        })
    }

    pub async fn get_track(&self, id: &str) -> Result<Track, DatabaseError> {
        self.find_track(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Track, id))
    }

    /// Look up a track by id without treating absence as an error.
    pub async fn find_track(&self, id: &str) -> Result<Option<Track>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {TRACK_COLS} FROM tracks WHERE id = ?1"), [id])
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_track(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn find_track_by_slug(&self, slug: &str) -> Result<Option<Track>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {TRACK_COLS} FROM tracks WHERE slug = ?1"),
                [slug],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_track(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_tracks(&self, limit: u32) -> Result<Vec<Track>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {TRACK_COLS} FROM tracks ORDER BY slug LIMIT {limit}"),
                (),
            )
            .await?;

        let mut tracks = Vec::new();
        while let Some(row) = rows.next().await? {
            tracks.push(row_to_track(&row)?);
        }
        Ok(tracks)
    }

    /// Add an exercise to a track's curriculum.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown track and a validation error when the
    /// position or slug is already used in the track.
    pub async fn create_exercise(
        &self,
        track_id: &str,
        slug: &str,
        title: &str,
        position: i64,
        core: bool,
    ) -> Result<Exercise, DatabaseError> {
        self.require(EntityType::Track, track_id).await?;

        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT 1 FROM exercises WHERE track_id = ?1 AND (position = ?2 OR slug = ?3)",
                libsql::params![track_id, position, slug],
            )
            .await?;
        if rows.next().await?.is_some() {
            return Err(DatabaseError::validation(format!(
                "track {track_id} already has an exercise at position {position} or slug '{slug}'"
            )));
        }

        let id = self.db().generate_id(PREFIX_EXERCISE).await?;
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO exercises ({EXERCISE_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
                libsql::params![id.as_str(), track_id, slug, title, position, i64::from(core)],
            )
            .await?;
        self.record(EntityType::Exercise, &id, AuditAction::Created, None)
            .await?;

        Ok(Exercise {
            id,
            track_id: track_id.to_string(),
            slug: slug.to_string(),
            title: title.to_string(),
            position,
            core,
        })
    }

    pub async fn get_exercise(&self, id: &str) -> Result<Exercise, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {EXERCISE_COLS} FROM exercises WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Exercise, id))?;
        row_to_exercise(&row)
    }

    /// All exercises of a track in curriculum order.
    pub async fn list_exercises(&self, track_id: &str) -> Result<Vec<Exercise>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {EXERCISE_COLS} FROM exercises WHERE track_id = ?1 ORDER BY position"
                ),
                [track_id],
            )
            .await?;

        let mut exercises = Vec::new();
        while let Some(row) = rows.next().await? {
            exercises.push(row_to_exercise(&row)?);
        }
        Ok(exercises)
    }

    /// The lowest-position core exercise of a track.
    pub async fn first_core_exercise(
        &self,
        track_id: &str,
    ) -> Result<Option<Exercise>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {EXERCISE_COLS} FROM exercises
                     WHERE track_id = ?1 AND core = 1
                     ORDER BY position LIMIT 1"
                ),
                [track_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_exercise(&row)?)),
            None => Ok(None),
        }
    }

    /// The next core exercise `user_id` should be given after `current`.
    ///
    /// Lowest position strictly greater than `current.position` on the same
    /// track, among core exercises the user has no solution for yet.
    pub async fn next_core_exercise(
        &self,
        user_id: &str,
        current: &Exercise,
    ) -> Result<Option<Exercise>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT e.id, e.track_id, e.slug, e.title, e.position, e.core
                 FROM exercises e
                 WHERE e.track_id = ?1 AND e.core = 1 AND e.position > ?2
                   AND NOT EXISTS (
                       SELECT 1 FROM solutions s
                       WHERE s.exercise_id = e.id AND s.user_id = ?3
                   )
                 ORDER BY e.position LIMIT 1",
                libsql::params![current.track_id.as_str(), current.position, user_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_exercise(&row)?)),
            None => Ok(None),
        }
    }
}
