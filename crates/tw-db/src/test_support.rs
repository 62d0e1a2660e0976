//! Shared test utilities for tw-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use tw_core::entities::{Exercise, Solution, Track, User};

    use crate::service::ProgressService;

    /// Create an in-memory ProgressService.
    pub async fn test_service() -> ProgressService {
        ProgressService::new_local(":memory:").await.unwrap()
    }

    /// Register a bare user (no token, no track).
    pub async fn test_user(svc: &ProgressService, handle: &str) -> User {
        svc.create_user(handle).await.unwrap()
    }

    /// Create a track with core exercises at positions 1..=`core_count`.
    pub async fn test_track(
        svc: &ProgressService,
        slug: &str,
        core_count: i64,
    ) -> (Track, Vec<Exercise>) {
        let track = svc.create_track(slug, &slug.to_uppercase()).await.unwrap();
        let mut exercises = Vec::new();
        for position in 1..=core_count {
            let exercise = svc
                .create_exercise(
                    &track.id,
                    &format!("{slug}-ex-{position}"),
                    &format!("Exercise {position}"),
                    position,
                    true,
                )
                .await
                .unwrap();
            exercises.push(exercise);
        }
        (track, exercises)
    }

    /// A joined user with a solution on `exercise` that has one iteration.
    pub async fn iterating_solution(
        svc: &ProgressService,
        user: &User,
        exercise: &Exercise,
    ) -> Solution {
        svc.join_track(&user.id, &exercise.track_id).await.unwrap();
        let solution = svc.ensure_solution(&user.id, &exercise.id).await.unwrap();
        svc.create_iteration(&solution.uuid, "fn main() {}")
            .await
            .unwrap();
        svc.get_solution_by_uuid(&solution.uuid).await.unwrap()
    }
}
