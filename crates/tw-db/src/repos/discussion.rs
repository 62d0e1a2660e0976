//! Discussion posts and the mentorships they create.
//!
//! A mentorship is the link between a solution and a user other than its
//! owner who has posted on one of its iterations. It is created the first
//! time such a user posts and later carries the owner's rating and review.

use chrono::Utc;
use tw_core::entities::{DiscussionPost, SolutionMentorship};
use tw_core::enums::{AuditAction, EntityType};
use tw_core::ids::{PREFIX_DISCUSSION_POST, PREFIX_MENTORSHIP};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_rating, get_opt_string, parse_datetime};
use crate::service::ProgressService;

const POST_COLS: &str = "id, iteration_id, user_id, content, created_at";
const MENTORSHIP_COLS: &str = "id, solution_id, user_id, rating, review, created_at, updated_at";

fn row_to_post(row: &libsql::Row) -> Result<DiscussionPost, DatabaseError> {
    Ok(DiscussionPost {
        id: row.get(0)?,
        iteration_id: row.get(1)?,
        user_id: row.get(2)?,
        content: row.get(3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

fn row_to_mentorship(row: &libsql::Row) -> Result<SolutionMentorship, DatabaseError> {
    Ok(SolutionMentorship {
        id: row.get(0)?,
        solution_id: row.get(1)?,
        user_id: row.get(2)?,
        rating: get_opt_rating(row, 3)?,
        review: get_opt_string(row, 4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
        updated_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl ProgressService {
    /// Post on an iteration.
    ///
    /// When the author is not the solution's owner, the author becomes a
    /// mentor of the solution if they were not one already.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown iteration or author.
    pub async fn create_discussion_post(
        &self,
        iteration_id: &str,
        author_id: &str,
        content: &str,
    ) -> Result<DiscussionPost, DatabaseError> {
        if content.trim().is_empty() {
            return Err(DatabaseError::validation("post content must not be empty"));
        }
        self.require(EntityType::User, author_id).await?;
        let iteration = self.get_iteration(iteration_id).await?;
        let solution = self.get_solution(&iteration.solution_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_DISCUSSION_POST).await?;
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO discussion_posts ({POST_COLS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
                libsql::params![id.as_str(), iteration_id, author_id, content, now.to_rfc3339()],
            )
            .await?;
        self.record(EntityType::DiscussionPost, &id, AuditAction::Created, None)
            .await?;

        if author_id != solution.user_id {
            self.ensure_mentorship(&solution.id, author_id).await?;
        }

        Ok(DiscussionPost {
            id,
            iteration_id: iteration_id.to_string(),
            user_id: author_id.to_string(),
            content: content.to_string(),
            created_at: now,
        })
    }

    async fn ensure_mentorship(
        &self,
        solution_id: &str,
        user_id: &str,
    ) -> Result<SolutionMentorship, DatabaseError> {
        let now = Utc::now().to_rfc3339();
        let id = self.db().generate_id(PREFIX_MENTORSHIP).await?;
        let inserted = self
            .db()
            .conn()
            .execute(
                "INSERT INTO solution_mentorships (id, solution_id, user_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)
                 ON CONFLICT (solution_id, user_id) DO NOTHING",
                libsql::params![id.as_str(), solution_id, user_id, now],
            )
            .await?;

        let mentorship = self
            .get_mentorship(solution_id, user_id)
            .await?
            .ok_or(DatabaseError::NoResult)?;
        if inserted > 0 {
            self.record(EntityType::Mentorship, &mentorship.id, AuditAction::Created, None)
                .await?;
            tracing::debug!(solution_id, user_id, "mentorship started");
        }
        Ok(mentorship)
    }

    pub async fn list_posts(&self, iteration_id: &str) -> Result<Vec<DiscussionPost>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {POST_COLS} FROM discussion_posts WHERE iteration_id = ?1
                     ORDER BY created_at, rowid"
                ),
                [iteration_id],
            )
            .await?;

        let mut posts = Vec::new();
        while let Some(row) = rows.next().await? {
            posts.push(row_to_post(&row)?);
        }
        Ok(posts)
    }

    /// Distinct users other than the owner who posted on any iteration of
    /// the solution, in order of first post.
    pub async fn list_reviewers(&self, solution_id: &str) -> Result<Vec<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT p.user_id, MIN(p.created_at) AS first_post
                 FROM discussion_posts p
                 JOIN iterations i ON i.id = p.iteration_id
                 JOIN solutions s ON s.id = i.solution_id
                 WHERE s.id = ?1 AND p.user_id != s.user_id
                 GROUP BY p.user_id
                 ORDER BY first_post, p.user_id",
                [solution_id],
            )
            .await?;

        let mut reviewers = Vec::new();
        while let Some(row) = rows.next().await? {
            reviewers.push(row.get::<String>(0)?);
        }
        Ok(reviewers)
    }

    pub async fn get_mentorship(
        &self,
        solution_id: &str,
        user_id: &str,
    ) -> Result<Option<SolutionMentorship>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {MENTORSHIP_COLS} FROM solution_mentorships
                     WHERE solution_id = ?1 AND user_id = ?2"
                ),
                [solution_id, user_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_mentorship(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_mentorships(
        &self,
        solution_id: &str,
    ) -> Result<Vec<SolutionMentorship>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {MENTORSHIP_COLS} FROM solution_mentorships WHERE solution_id = ?1
                     ORDER BY created_at, rowid"
                ),
                [solution_id],
            )
            .await?;

        let mut mentorships = Vec::new();
        while let Some(row) = rows.next().await? {
            mentorships.push(row_to_mentorship(&row)?);
        }
        Ok(mentorships)
    }

    /// Mentorships on the solution that carry a rating.
    pub async fn count_rated_mentorships(&self, solution_id: &str) -> Result<u32, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT COUNT(*) FROM solution_mentorships
                 WHERE solution_id = ?1 AND rating IS NOT NULL",
                [solution_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let count = row.get::<i64>(0)?;
        u32::try_from(count)
            .map_err(|_| DatabaseError::InvalidState(format!("mentorship count {count} overflows")))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::helpers::{iterating_solution, test_service, test_track, test_user};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn mentor_post_creates_one_mentorship() {
        let svc = test_service().await;
        let owner = test_user(&svc, "owner").await;
        let mentor = test_user(&svc, "mentor").await;
        let (_, exercises) = test_track(&svc, "rust", 1).await;
        let sol = iterating_solution(&svc, &owner, &exercises[0]).await;
        let iteration = &svc.list_iterations(&sol.id).await.unwrap()[0];

        svc.create_discussion_post(&iteration.id, &mentor.id, "nice")
            .await
            .unwrap();
        svc.create_discussion_post(&iteration.id, &mentor.id, "one more thing")
            .await
            .unwrap();

        let mentorships = svc.list_mentorships(&sol.id).await.unwrap();
        assert_eq!(mentorships.len(), 1);
        assert_eq!(mentorships[0].user_id, mentor.id);
        assert_eq!(mentorships[0].rating, None);
        assert_eq!(svc.list_posts(&iteration.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn owner_posts_are_not_mentorships() {
        let svc = test_service().await;
        let owner = test_user(&svc, "owner").await;
        let (_, exercises) = test_track(&svc, "rust", 1).await;
        let sol = iterating_solution(&svc, &owner, &exercises[0]).await;
        let iteration = &svc.list_iterations(&sol.id).await.unwrap()[0];

        svc.create_discussion_post(&iteration.id, &owner.id, "thanks")
            .await
            .unwrap();
        assert!(svc.list_mentorships(&sol.id).await.unwrap().is_empty());
        assert!(svc.list_reviewers(&sol.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reviewers_are_distinct_non_owner_posters() {
        let svc = test_service().await;
        let owner = test_user(&svc, "owner").await;
        let a = test_user(&svc, "a").await;
        let b = test_user(&svc, "b").await;
        let (_, exercises) = test_track(&svc, "rust", 1).await;
        let sol = iterating_solution(&svc, &owner, &exercises[0]).await;
        let second = svc.create_iteration(&sol.uuid, "fn main() { }").await.unwrap();
        let first = &svc.list_iterations(&sol.id).await.unwrap()[0];

        svc.create_discussion_post(&first.id, &a.id, "hi").await.unwrap();
        svc.create_discussion_post(&second.id, &a.id, "again").await.unwrap();
        svc.create_discussion_post(&second.id, &b.id, "hello").await.unwrap();
        svc.create_discussion_post(&second.id, &owner.id, "thanks").await.unwrap();

        let mut reviewers = svc.list_reviewers(&sol.id).await.unwrap();
        reviewers.sort();
        let mut expected = vec![a.id.clone(), b.id.clone()];
        expected.sort();
        assert_eq!(reviewers, expected);
    }

    #[tokio::test]
    async fn post_on_unknown_iteration_is_not_found() {
        let svc = test_service().await;
        let mentor = test_user(&svc, "mentor").await;
        let err = svc
            .create_discussion_post("itr-deadbeef", &mentor.id, "hi")
            .await
            .unwrap_err();
        assert!(err.is_not_found(), "{err}");
    }
}
