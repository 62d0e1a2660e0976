//! Iteration repository.

use chrono::Utc;
use tw_core::entities::Iteration;
use tw_core::enums::{AuditAction, EntityType};
use tw_core::ids::PREFIX_ITERATION;

use crate::error::DatabaseError;
use crate::helpers::parse_datetime;
use crate::service::ProgressService;

const SELECT_COLS: &str = "id, solution_id, code, created_at";

fn row_to_iteration(row: &libsql::Row) -> Result<Iteration, DatabaseError> {
    Ok(Iteration {
        id: row.get(0)?,
        solution_id: row.get(1)?,
        code: row.get(2)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

impl ProgressService {
    /// Submit a new iteration of code for a solution.
    ///
    /// Counts as a user update of the solution.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown uuid and a validation error for
    /// blank code.
    pub async fn create_iteration(
        &self,
        solution_uuid: &str,
        code: &str,
    ) -> Result<Iteration, DatabaseError> {
        if code.trim().is_empty() {
            return Err(DatabaseError::validation("iteration code must not be empty"));
        }
        let solution = self.get_solution_by_uuid(solution_uuid).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ITERATION).await?;
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO iterations ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4)"),
                libsql::params![id.as_str(), solution.id.as_str(), code, now.to_rfc3339()],
            )
            .await?;
        self.db()
            .conn()
            .execute(
                "UPDATE solutions SET last_updated_by_user_at = ?1, updated_at = ?1 WHERE id = ?2",
                libsql::params![now.to_rfc3339(), solution.id.as_str()],
            )
            .await?;
        self.record(
            EntityType::Iteration,
            &id,
            AuditAction::Created,
            Some(serde_json::json!({ "solution_id": solution.id })),
        )
        .await?;

        Ok(Iteration {
            id,
            solution_id: solution.id,
            code: code.to_string(),
            created_at: now,
        })
    }

    pub async fn get_iteration(&self, id: &str) -> Result<Iteration, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM iterations WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Iteration, id))?;
        row_to_iteration(&row)
    }

    /// Iterations of a solution, oldest first.
    pub async fn list_iterations(&self, solution_id: &str) -> Result<Vec<Iteration>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM iterations WHERE solution_id = ?1
                     ORDER BY created_at, rowid"
                ),
                [solution_id],
            )
            .await?;

        let mut iterations = Vec::new();
        while let Some(row) = rows.next().await? {
            iterations.push(row_to_iteration(&row)?);
        }
        Ok(iterations)
    }

    pub async fn count_iterations(&self, solution_id: &str) -> Result<i64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT COUNT(*) FROM iterations WHERE solution_id = ?1",
                [solution_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }

    pub async fn has_iterations(&self, solution_id: &str) -> Result<bool, DatabaseError> {
        Ok(self.count_iterations(solution_id).await? > 0)
    }

    /// Remove an iteration together with its discussion posts.
    ///
    /// # Errors
    ///
    /// Returns a validation error when removing it would leave a completed
    /// solution without iterations.
    pub async fn delete_iteration(&self, id: &str) -> Result<(), DatabaseError> {
        let iteration = self.get_iteration(id).await?;
        let solution = self.get_solution(&iteration.solution_id).await?;
        if solution.completed_at.is_some() && self.count_iterations(&solution.id).await? <= 1 {
            return Err(DatabaseError::validation(format!(
                "cannot delete the last iteration of completed solution {}",
                solution.uuid
            )));
        }

        self.db()
            .conn()
            .execute("DELETE FROM iterations WHERE id = ?1", [id])
            .await?;
        self.record(
            EntityType::Iteration,
            id,
            AuditAction::Deleted,
            Some(serde_json::json!({ "solution_id": solution.id })),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::helpers::{iterating_solution, test_service, test_track, test_user};
    use pretty_assertions::assert_eq;
    use tw_core::enums::SolutionStatus;

    #[tokio::test]
    async fn iteration_moves_shell_to_iterating() {
        let svc = test_service().await;
        let user = test_user(&svc, "alice").await;
        let (_, exercises) = test_track(&svc, "rust", 1).await;
        let shell = svc.ensure_solution(&user.id, &exercises[0].id).await.unwrap();
        assert!(shell.last_updated_by_user_at.is_none());

        svc.create_iteration(&shell.uuid, "fn main() {}").await.unwrap();
        let sol = svc.get_solution_by_uuid(&shell.uuid).await.unwrap();
        assert!(sol.last_updated_by_user_at.is_some());
        assert_eq!(svc.solution_status(&sol).await.unwrap(), SolutionStatus::Iterating);
    }

    #[tokio::test]
    async fn blank_code_rejected() {
        let svc = test_service().await;
        let user = test_user(&svc, "alice").await;
        let (_, exercises) = test_track(&svc, "rust", 1).await;
        let shell = svc.ensure_solution(&user.id, &exercises[0].id).await.unwrap();

        let err = svc.create_iteration(&shell.uuid, "   ").await.unwrap_err();
        assert!(err.is_validation(), "{err}");
    }

    #[tokio::test]
    async fn deleting_only_iteration_returns_to_unlocked() {
        let svc = test_service().await;
        let user = test_user(&svc, "alice").await;
        let (_, exercises) = test_track(&svc, "rust", 1).await;
        let sol = iterating_solution(&svc, &user, &exercises[0]).await;
        let iterations = svc.list_iterations(&sol.id).await.unwrap();
        assert_eq!(iterations.len(), 1);

        svc.delete_iteration(&iterations[0].id).await.unwrap();
        assert_eq!(svc.solution_status(&sol).await.unwrap(), SolutionStatus::Unlocked);
    }

    #[tokio::test]
    async fn last_iteration_of_completed_solution_is_kept() {
        let svc = test_service().await;
        let user = test_user(&svc, "alice").await;
        let (_, exercises) = test_track(&svc, "rust", 1).await;
        let sol = iterating_solution(&svc, &user, &exercises[0]).await;
        svc.complete_solution(&sol.uuid).await.unwrap();
        let iterations = svc.list_iterations(&sol.id).await.unwrap();

        let err = svc.delete_iteration(&iterations[0].id).await.unwrap_err();
        assert!(err.is_validation(), "{err}");
        assert_eq!(svc.count_iterations(&sol.id).await.unwrap(), 1);
    }
}
