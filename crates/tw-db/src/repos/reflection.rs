//! Reflection submission: the owner's closing note on a solution plus their
//! ratings of each mentor, applied atomically.

use std::collections::BTreeMap;

use chrono::Utc;
use tw_core::entities::Solution;
use tw_core::enums::{AuditAction, EntityType};
use tw_core::ids::{MAX_RATING, MIN_RATING};
use tw_core::responses::{MentorReview, ReflectionOutcome, RejectedReview};

use crate::error::DatabaseError;
use crate::service::ProgressService;

impl ProgressService {
    /// Store a reflection and the owner's mentor reviews for a solution.
    ///
    /// Keys of `reviews` are reviewer user ids. Entries naming a user with no
    /// mentorship on this solution, or carrying a rating outside 1..=5, are
    /// returned in [`ReflectionOutcome::rejected`] while the rest still apply.
    /// When a later core exercise on the track has no solution yet for the
    /// owner, a shell is created for the lowest-positioned one.
    ///
    /// Runs in a single transaction on the service connection. Any error
    /// rolls back the reflection, the ratings and the new shell together.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown uuid and propagates storage errors.
    pub async fn submit_reflection(
        &self,
        solution_uuid: &str,
        reflection: &str,
        reviews: &BTreeMap<String, MentorReview>,
    ) -> Result<ReflectionOutcome, DatabaseError> {
        let solution = self.get_solution_by_uuid(solution_uuid).await?;

        let tx = self.db().conn().transaction().await?;
        match self.apply_reflection(&solution, reflection, reviews).await {
            Ok(outcome) => {
                tx.commit().await?;
                tracing::info!(
                    uuid = solution_uuid,
                    rated = outcome.rated_mentorships,
                    rejected = outcome.rejected.len(),
                    unlocked = outcome.unlocked_solution.is_some(),
                    "reflection submitted"
                );
                Ok(outcome)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::error!(uuid = solution_uuid, error = %rollback, "rollback failed");
                }
                Err(e)
            }
        }
    }

    async fn apply_reflection(
        &self,
        solution: &Solution,
        reflection: &str,
        reviews: &BTreeMap<String, MentorReview>,
    ) -> Result<ReflectionOutcome, DatabaseError> {
        let now = Utc::now().to_rfc3339();
        self.db()
            .conn()
            .execute(
                "UPDATE solutions
                 SET reflection = ?1, last_updated_by_user_at = ?2, updated_at = ?2
                 WHERE id = ?3",
                libsql::params![reflection, now.as_str(), solution.id.as_str()],
            )
            .await?;

        let mut rejected = Vec::new();
        for (reviewer_id, review) in reviews {
            if let Some(reason) = self.apply_review(solution, reviewer_id, review, &now).await? {
                tracing::warn!(uuid = %solution.uuid, reviewer_id, %reason, "review rejected");
                rejected.push(RejectedReview {
                    reviewer_id: reviewer_id.clone(),
                    reason,
                });
            }
        }

        let rated_mentorships = self.count_rated_mentorships(&solution.id).await?;

        let exercise = self.get_exercise(&solution.exercise_id).await?;
        let unlocked_solution = match self.next_core_exercise(&solution.user_id, &exercise).await? {
            Some(next) => Some(self.ensure_solution(&solution.user_id, &next.id).await?),
            None => None,
        };

        self.record(
            EntityType::Solution,
            &solution.id,
            AuditAction::Reflected,
            Some(serde_json::json!({
                "rated_mentorships": rated_mentorships,
                "rejected": rejected.len(),
                "unlocked": unlocked_solution.as_ref().map(|s| s.uuid.as_str()),
            })),
        )
        .await?;

        Ok(ReflectionOutcome {
            solution: self.get_solution(&solution.id).await?,
            rated_mentorships,
            rejected,
            unlocked_solution,
        })
    }

    /// Apply one review. Returns the rejection reason when the entry is
    /// skipped.
    async fn apply_review(
        &self,
        solution: &Solution,
        reviewer_id: &str,
        review: &MentorReview,
        now: &str,
    ) -> Result<Option<String>, DatabaseError> {
        if !(MIN_RATING..=MAX_RATING).contains(&review.rating) {
            return Ok(Some(format!(
                "rating {} is outside {MIN_RATING}..={MAX_RATING}",
                review.rating
            )));
        }
        let Some(mentorship) = self.get_mentorship(&solution.id, reviewer_id).await? else {
            return Ok(Some("no mentorship on this solution".to_string()));
        };

        self.db()
            .conn()
            .execute(
                "UPDATE solution_mentorships SET rating = ?1, review = ?2, updated_at = ?3
                 WHERE id = ?4",
                libsql::params![
                    i64::from(review.rating),
                    review.review.as_str(),
                    now,
                    mentorship.id.as_str()
                ],
            )
            .await?;
        self.record(
            EntityType::Mentorship,
            &mentorship.id,
            AuditAction::Reviewed,
            Some(serde_json::json!({ "rating": review.rating })),
        )
        .await?;
        Ok(None)
    }
}
