//! Solution repository: find-or-create, lifecycle writes, and v2 migration.
//!
//! Status is never stored. Every read that needs it goes through
//! [`ProgressService::solution_status`], which counts iterations and hands the
//! facts to [`tw_core::status::resolve`].

use chrono::Utc;
use tw_core::entities::Solution;
use tw_core::enums::{AuditAction, EntityType, SolutionStatus};
use tw_core::ids::PREFIX_SOLUTION;
use tw_core::responses::MigrationResponse;
use tw_core::status;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_datetime, get_opt_string, parse_datetime};
use crate::service::ProgressService;
use crate::updates::solution::{SolutionUpdate, SolutionUpdateBuilder};

const SELECT_COLS: &str = "id, uuid, user_id, exercise_id, completed_at, published_at, \
    approved_by, reflection, last_updated_by_user_at, created_at, updated_at";

pub(crate) fn row_to_solution(row: &libsql::Row) -> Result<Solution, DatabaseError> {
    Ok(Solution {
        id: row.get(0)?,
        uuid: row.get(1)?,
        user_id: row.get(2)?,
        exercise_id: row.get(3)?,
        completed_at: get_opt_datetime(row, 4)?,
        published_at: get_opt_datetime(row, 5)?,
        approved_by: get_opt_string(row, 6)?,
        reflection: get_opt_string(row, 7)?,
        last_updated_by_user_at: get_opt_datetime(row, 8)?,
        created_at: parse_datetime(&row.get::<String>(9)?)?,
        updated_at: parse_datetime(&row.get::<String>(10)?)?,
    })
}

impl ProgressService {
    /// Find the user's solution for an exercise, creating an empty shell if
    /// there is none.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the user or exercise does not exist.
    pub async fn ensure_solution(
        &self,
        user_id: &str,
        exercise_id: &str,
    ) -> Result<Solution, DatabaseError> {
        self.require(EntityType::User, user_id).await?;
        self.require(EntityType::Exercise, exercise_id).await?;

        let now = Utc::now().to_rfc3339();
        let id = self.db().generate_id(PREFIX_SOLUTION).await?;
        let uuid = self.db().generate_uuid().await?;
        let inserted = self
            .db()
            .conn()
            .execute(
                "INSERT INTO solutions (id, uuid, user_id, exercise_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                 ON CONFLICT (user_id, exercise_id) DO NOTHING",
                libsql::params![id.as_str(), uuid.as_str(), user_id, exercise_id, now],
            )
            .await?;

        let solution = self
            .find_solution(user_id, exercise_id)
            .await?
            .ok_or(DatabaseError::NoResult)?;
        if inserted > 0 {
            self.record(
                EntityType::Solution,
                &solution.id,
                AuditAction::Created,
                Some(serde_json::json!({ "uuid": solution.uuid, "exercise_id": exercise_id })),
            )
            .await?;
            tracing::debug!(user_id, exercise_id, uuid = %solution.uuid, "created solution shell");
        }
        Ok(solution)
    }

    /// Insert a solution record exactly as given, including legacy review
    /// fields. Used to load v1 data ahead of migration.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the uuid or `(user, exercise)` pair is
    /// already taken.
    pub async fn import_solution(&self, solution: &Solution) -> Result<(), DatabaseError> {
        self.require(EntityType::User, &solution.user_id).await?;
        self.require(EntityType::Exercise, &solution.exercise_id).await?;
        if self.find_solution_by_uuid(&solution.uuid).await?.is_some()
            || self
                .find_solution(&solution.user_id, &solution.exercise_id)
                .await?
                .is_some()
        {
            return Err(DatabaseError::validation(format!(
                "solution {} already exists",
                solution.uuid
            )));
        }

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO solutions ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
                ),
                libsql::params![
                    solution.id.as_str(),
                    solution.uuid.as_str(),
                    solution.user_id.as_str(),
                    solution.exercise_id.as_str(),
                    solution.completed_at.map(|t| t.to_rfc3339()),
                    solution.published_at.map(|t| t.to_rfc3339()),
                    solution.approved_by.as_deref(),
                    solution.reflection.as_deref(),
                    solution.last_updated_by_user_at.map(|t| t.to_rfc3339()),
                    solution.created_at.to_rfc3339(),
                    solution.updated_at.to_rfc3339()
                ],
            )
            .await?;
        self.record(
            EntityType::Solution,
            &solution.id,
            AuditAction::Created,
            Some(serde_json::json!({ "uuid": solution.uuid, "imported": true })),
        )
        .await
    }

    pub async fn get_solution(&self, id: &str) -> Result<Solution, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM solutions WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Solution, id))?;
        row_to_solution(&row)
    }

    /// Look up a solution by its external identifier.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no solution carries `uuid`.
    pub async fn get_solution_by_uuid(&self, uuid: &str) -> Result<Solution, DatabaseError> {
        self.find_solution_by_uuid(uuid)
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Solution, uuid))
    }

    async fn find_solution_by_uuid(&self, uuid: &str) -> Result<Option<Solution>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM solutions WHERE uuid = ?1"),
                [uuid],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_solution(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn find_solution(
        &self,
        user_id: &str,
        exercise_id: &str,
    ) -> Result<Option<Solution>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM solutions WHERE user_id = ?1 AND exercise_id = ?2"
                ),
                [user_id, exercise_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_solution(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_solutions_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Solution>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM solutions WHERE user_id = ?1 ORDER BY created_at"
                ),
                [user_id],
            )
            .await?;

        let mut solutions = Vec::new();
        while let Some(row) = rows.next().await? {
            solutions.push(row_to_solution(&row)?);
        }
        Ok(solutions)
    }

    /// Resolve the current status of `solution`.
    ///
    /// # Errors
    ///
    /// Returns an integrity violation when the stored facts do not map to a
    /// status. The violation is logged before it is returned.
    pub async fn solution_status(&self, solution: &Solution) -> Result<SolutionStatus, DatabaseError> {
        let has_iterations = self.has_iterations(&solution.id).await?;
        status::resolve(solution, has_iterations).map_err(|e| {
            tracing::error!(uuid = %solution.uuid, error = %e, "solution facts are inconsistent");
            DatabaseError::from(e)
        })
    }

    /// Apply a partial update to a solution.
    ///
    /// The projected facts must resolve to a status reachable from the
    /// current one. Clearing fields is how transitions are reversed.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the update would leave the solution in
    /// an unresolvable state or skip a lifecycle step.
    pub async fn update_solution(
        &self,
        uuid: &str,
        update: SolutionUpdate,
    ) -> Result<Solution, DatabaseError> {
        let current = self.get_solution_by_uuid(uuid).await?;
        if update.is_empty() {
            return Ok(current);
        }

        if let Some(Some(ref approver)) = update.approved_by {
            self.require(EntityType::User, approver).await?;
        }

        let has_iterations = self.has_iterations(&current.id).await?;
        let from = status::resolve(&current, has_iterations).ok();
        let to = status::resolve(&update.apply_to(&current), has_iterations)
            .map_err(|e| DatabaseError::validation(format!("rejected update: {e}")))?;
        if let Some(from) = from {
            if !from.can_transition_to(to) {
                return Err(DatabaseError::validation(format!(
                    "solution {uuid} cannot move from {from} to {to}"
                )));
            }
        }

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(completed_at) = update.completed_at {
            sets.push(format!("completed_at = ?{idx}"));
            params.push(completed_at.map_or(libsql::Value::Null, |t| t.to_rfc3339().into()));
            idx += 1;
        }
        if let Some(published_at) = update.published_at {
            sets.push(format!("published_at = ?{idx}"));
            params.push(published_at.map_or(libsql::Value::Null, |t| t.to_rfc3339().into()));
            idx += 1;
        }
        if let Some(ref approved_by) = update.approved_by {
            sets.push(format!("approved_by = ?{idx}"));
            params.push(approved_by.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(ref reflection) = update.reflection {
            sets.push(format!("reflection = ?{idx}"));
            params.push(reflection.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(at) = update.last_updated_by_user_at {
            sets.push(format!("last_updated_by_user_at = ?{idx}"));
            params.push(at.map_or(libsql::Value::Null, |t| t.to_rfc3339().into()));
            idx += 1;
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(Utc::now().to_rfc3339().into());
        idx += 1;

        params.push(current.id.clone().into());
        let sql = format!("UPDATE solutions SET {} WHERE id = ?{idx}", sets.join(", "));
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;

        let action = if from == Some(to) {
            AuditAction::Updated
        } else {
            AuditAction::StatusChanged
        };
        self.record(
            EntityType::Solution,
            &current.id,
            action,
            Some(serde_json::json!({
                "from": from,
                "to": to,
                "update": serde_json::to_value(&update).map_err(|e| DatabaseError::Other(e.into()))?,
            })),
        )
        .await?;
        tracing::debug!(uuid, ?from, %to, "updated solution");

        self.get_solution_by_uuid(uuid).await
    }

    /// Mark a solution as solved by its owner.
    ///
    /// Already-completed solutions are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the solution has no iterations.
    pub async fn complete_solution(&self, uuid: &str) -> Result<Solution, DatabaseError> {
        let solution = self.get_solution_by_uuid(uuid).await?;
        if solution.completed_at.is_some() {
            return Ok(solution);
        }
        if !self.has_iterations(&solution.id).await? {
            return Err(DatabaseError::validation(format!(
                "solution {uuid} has no iterations to complete"
            )));
        }

        let now = Utc::now();
        let update = SolutionUpdateBuilder::new()
            .completed_at(Some(now))
            .last_updated_by_user_at(Some(now))
            .build();
        self.update_solution(uuid, update).await
    }

    /// Share a completed solution for mentoring.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the solution is not completed.
    pub async fn publish_solution(&self, uuid: &str) -> Result<Solution, DatabaseError> {
        let solution = self.get_solution_by_uuid(uuid).await?;
        if !self.solution_status(&solution).await?.is_completed() {
            return Err(DatabaseError::validation(format!(
                "solution {uuid} must be completed before publishing"
            )));
        }
        if solution.published_at.is_some() {
            return Ok(solution);
        }

        let now = Utc::now();
        let update = SolutionUpdateBuilder::new()
            .published_at(Some(now))
            .last_updated_by_user_at(Some(now))
            .build();
        self.update_solution(uuid, update).await
    }

    /// Record that `approver_id` passed the review of a completed solution.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown approver and a validation error when
    /// the solution is not completed.
    pub async fn approve_solution(
        &self,
        uuid: &str,
        approver_id: &str,
    ) -> Result<Solution, DatabaseError> {
        self.require(EntityType::User, approver_id).await?;
        let solution = self.get_solution_by_uuid(uuid).await?;
        if !self.solution_status(&solution).await?.is_completed() {
            return Err(DatabaseError::validation(format!(
                "solution {uuid} must be completed before approval"
            )));
        }

        let update = SolutionUpdateBuilder::new()
            .approved_by(Some(approver_id.to_string()))
            .build();
        self.update_solution(uuid, update).await
    }

    /// Reshape a legacy solution for the v2 review model.
    ///
    /// Clears `completed_at`, `published_at` and `approved_by`, and stamps
    /// both `last_updated_by_user_at` and `updated_at` with the current time.
    /// The reflection, iterations and mentorships are untouched. Running it
    /// again only advances the timestamps.
    ///
    /// This deliberately bypasses the transition check in
    /// [`Self::update_solution`]: a v1 record may hold facts that do not
    /// resolve at all.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no solution carries `uuid`.
    pub async fn migrate_solution_to_v2(
        &self,
        uuid: &str,
    ) -> Result<MigrationResponse, DatabaseError> {
        let before = self.get_solution_by_uuid(uuid).await?;
        let now = Utc::now().to_rfc3339();
        self.db()
            .conn()
            .execute(
                "UPDATE solutions
                 SET completed_at = NULL, published_at = NULL, approved_by = NULL,
                     last_updated_by_user_at = ?1, updated_at = ?1
                 WHERE id = ?2",
                libsql::params![now, before.id.as_str()],
            )
            .await?;

        self.record(
            EntityType::Solution,
            &before.id,
            AuditAction::MigratedV2,
            Some(serde_json::json!({
                "completed_at": before.completed_at,
                "published_at": before.published_at,
                "approved_by": before.approved_by,
            })),
        )
        .await?;
        tracing::info!(uuid, "migrated solution to v2");

        let after = self.get_solution_by_uuid(uuid).await?;
        Ok(MigrationResponse::for_solution(after))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{iterating_solution, test_service, test_track, test_user};
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn ensure_solution_is_find_or_create() {
        let svc = test_service().await;
        let user = test_user(&svc, "alice").await;
        let (_, exercises) = test_track(&svc, "rust", 1).await;

        let first = svc.ensure_solution(&user.id, &exercises[0].id).await.unwrap();
        let second = svc.ensure_solution(&user.id, &exercises[0].id).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(svc.solution_status(&first).await.unwrap(), SolutionStatus::Unlocked);
    }

    #[tokio::test]
    async fn unknown_uuid_is_not_found() {
        let svc = test_service().await;
        let err = svc.get_solution_by_uuid("nope").await.unwrap_err();
        assert!(err.is_not_found(), "{err}");
    }

    #[tokio::test]
    async fn forward_lifecycle_through_service() {
        let svc = test_service().await;
        let alice = test_user(&svc, "alice").await;
        let mentor = test_user(&svc, "mentor").await;
        let (_, exercises) = test_track(&svc, "rust", 1).await;
        let sol = iterating_solution(&svc, &alice, &exercises[0]).await;
        assert_eq!(svc.solution_status(&sol).await.unwrap(), SolutionStatus::Iterating);

        let sol = svc.complete_solution(&sol.uuid).await.unwrap();
        assert!(sol.last_updated_by_user_at.is_some());
        assert_eq!(
            svc.solution_status(&sol).await.unwrap(),
            SolutionStatus::CompletedUnapproved
        );

        let sol = svc.publish_solution(&sol.uuid).await.unwrap();
        assert!(sol.published_at.is_some());

        let sol = svc.approve_solution(&sol.uuid, &mentor.id).await.unwrap();
        assert_eq!(sol.approved_by.as_deref(), Some(mentor.id.as_str()));
        assert_eq!(
            svc.solution_status(&sol).await.unwrap(),
            SolutionStatus::CompletedApproved
        );
    }

    #[tokio::test]
    async fn reverse_lifecycle_by_clearing_fields() {
        let svc = test_service().await;
        let alice = test_user(&svc, "alice").await;
        let mentor = test_user(&svc, "mentor").await;
        let (_, exercises) = test_track(&svc, "rust", 1).await;
        let sol = iterating_solution(&svc, &alice, &exercises[0]).await;
        svc.complete_solution(&sol.uuid).await.unwrap();
        svc.approve_solution(&sol.uuid, &mentor.id).await.unwrap();

        let sol = svc
            .update_solution(&sol.uuid, SolutionUpdateBuilder::new().approved_by(None).build())
            .await
            .unwrap();
        assert_eq!(
            svc.solution_status(&sol).await.unwrap(),
            SolutionStatus::CompletedUnapproved
        );

        let sol = svc
            .update_solution(&sol.uuid, SolutionUpdateBuilder::new().completed_at(None).build())
            .await
            .unwrap();
        assert_eq!(svc.solution_status(&sol).await.unwrap(), SolutionStatus::Iterating);
    }

    #[tokio::test]
    async fn clearing_completion_under_approval_is_rejected() {
        let svc = test_service().await;
        let alice = test_user(&svc, "alice").await;
        let mentor = test_user(&svc, "mentor").await;
        let (_, exercises) = test_track(&svc, "rust", 1).await;
        let sol = iterating_solution(&svc, &alice, &exercises[0]).await;
        svc.complete_solution(&sol.uuid).await.unwrap();
        svc.approve_solution(&sol.uuid, &mentor.id).await.unwrap();

        let err = svc
            .update_solution(&sol.uuid, SolutionUpdateBuilder::new().completed_at(None).build())
            .await
            .unwrap_err();
        assert!(err.is_validation(), "{err}");

        let stored = svc.get_solution_by_uuid(&sol.uuid).await.unwrap();
        assert!(stored.completed_at.is_some());
    }

    #[tokio::test]
    async fn cannot_complete_without_iterations() {
        let svc = test_service().await;
        let user = test_user(&svc, "alice").await;
        let (_, exercises) = test_track(&svc, "rust", 1).await;
        let sol = svc.ensure_solution(&user.id, &exercises[0].id).await.unwrap();

        let err = svc.complete_solution(&sol.uuid).await.unwrap_err();
        assert!(err.is_validation(), "{err}");
    }

    #[tokio::test]
    async fn approve_requires_completion() {
        let svc = test_service().await;
        let alice = test_user(&svc, "alice").await;
        let mentor = test_user(&svc, "mentor").await;
        let (_, exercises) = test_track(&svc, "rust", 1).await;
        let sol = iterating_solution(&svc, &alice, &exercises[0]).await;

        let err = svc.approve_solution(&sol.uuid, &mentor.id).await.unwrap_err();
        assert!(err.is_validation(), "{err}");
        let err = svc.approve_solution(&sol.uuid, "usr-deadbeef").await.unwrap_err();
        assert!(err.is_not_found(), "{err}");
    }

    #[tokio::test]
    async fn legacy_violation_surfaces_on_read() {
        let svc = test_service().await;
        let alice = test_user(&svc, "alice").await;
        let mentor = test_user(&svc, "mentor").await;
        let (_, exercises) = test_track(&svc, "rust", 1).await;
        let now = Utc::now();
        let legacy = Solution {
            id: "sol-0000beef".into(),
            uuid: "legacy-uuid".into(),
            user_id: alice.id.clone(),
            exercise_id: exercises[0].id.clone(),
            completed_at: None,
            published_at: None,
            approved_by: Some(mentor.id.clone()),
            reflection: None,
            last_updated_by_user_at: None,
            created_at: now,
            updated_at: now,
        };
        svc.import_solution(&legacy).await.unwrap();

        let stored = svc.get_solution_by_uuid("legacy-uuid").await.unwrap();
        let err = svc.solution_status(&stored).await.unwrap_err();
        assert!(err.is_integrity_violation(), "{err}");
    }

    #[tokio::test]
    async fn migrate_to_v2_clears_review_cycle() {
        let svc = test_service().await;
        let alice = test_user(&svc, "alice").await;
        let mentor = test_user(&svc, "mentor").await;
        let (_, exercises) = test_track(&svc, "rust", 1).await;
        let sol = iterating_solution(&svc, &alice, &exercises[0]).await;
        let iteration = &svc.list_iterations(&sol.id).await.unwrap()[0];
        svc.create_discussion_post(&iteration.id, &mentor.id, "nice")
            .await
            .unwrap();
        svc.db()
            .conn()
            .execute(
                "UPDATE solution_mentorships SET rating = 4, review = 'clear'
                 WHERE solution_id = ?1 AND user_id = ?2",
                [sol.id.as_str(), mentor.id.as_str()],
            )
            .await
            .unwrap();
        let before = svc.get_mentorship(&sol.id, &mentor.id).await.unwrap().unwrap();
        let old = Utc::now() - Duration::days(400);
        svc.db()
            .conn()
            .execute(
                "UPDATE solutions SET completed_at = ?1, published_at = ?1, approved_by = ?2,
                 reflection = 'kept', last_updated_by_user_at = ?1, updated_at = ?1
                 WHERE id = ?3",
                libsql::params![old.to_rfc3339(), mentor.id.as_str(), sol.id.as_str()],
            )
            .await
            .unwrap();

        let response = svc.migrate_solution_to_v2(&sol.uuid).await.unwrap();
        let migrated = response.solution;
        let now = Utc::now();

        assert_eq!(migrated.uuid, sol.uuid);
        assert_eq!(response.redirect_to, format!("solutions/{}", sol.uuid));
        assert_eq!(migrated.completed_at, None);
        assert_eq!(migrated.published_at, None);
        assert_eq!(migrated.approved_by, None);
        assert_eq!(migrated.reflection.as_deref(), Some("kept"));
        let touched = migrated.last_updated_by_user_at.unwrap();
        assert!((now - touched).num_seconds().abs() <= 1);
        assert!((now - migrated.updated_at).num_seconds().abs() <= 1);
        assert_eq!(svc.count_iterations(&sol.id).await.unwrap(), 1);
        assert_eq!(
            svc.solution_status(&migrated).await.unwrap(),
            SolutionStatus::Iterating
        );
        let after = svc.get_mentorship(&sol.id, &mentor.id).await.unwrap().unwrap();
        assert_eq!(after, before);
        assert_eq!(after.rating, Some(4));
        assert_eq!(after.review.as_deref(), Some("clear"));

        let again = svc.migrate_solution_to_v2(&sol.uuid).await.unwrap().solution;
        assert_eq!(again.completed_at, None);
        assert_eq!(again.approved_by, None);
    }

    #[tokio::test]
    async fn migrate_unknown_uuid_is_not_found() {
        let svc = test_service().await;
        let err = svc.migrate_solution_to_v2("missing").await.unwrap_err();
        assert!(err.is_not_found(), "{err}");
    }
}
