//! Caller-dependent read projections of solutions and tracks.

use tw_core::enums::EntityType;
use tw_core::views::{ExerciseProgress, SolutionDetail, SolutionView, TrackView};

use crate::error::DatabaseError;
use crate::service::ProgressService;

impl ProgressService {
    /// Project a solution for `viewer`.
    ///
    /// Without a viewer only the exercise is shown. A viewer other than the
    /// owner gets `NotFound`, so solution existence is not leaked. An owner
    /// who has not unlocked the track sees only the track.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` as described and an integrity violation when the
    /// stored facts cannot be resolved.
    pub async fn view_solution(
        &self,
        viewer: Option<&str>,
        uuid: &str,
    ) -> Result<SolutionView, DatabaseError> {
        let solution = self.get_solution_by_uuid(uuid).await?;
        let exercise = self.get_exercise(&solution.exercise_id).await?;

        let Some(viewer) = viewer else {
            return Ok(SolutionView::SignedOut {
                uuid: solution.uuid,
                exercise,
            });
        };
        if viewer != solution.user_id {
            return Err(DatabaseError::not_found(EntityType::Solution, uuid));
        }
        if !self.unlocked_track(viewer, &exercise.track_id).await? {
            let track = self.get_track(&exercise.track_id).await?;
            return Ok(SolutionView::Locked {
                uuid: solution.uuid,
                track,
            });
        }

        let status = self.solution_status(&solution).await?;
        let iterations = self.list_iterations(&solution.id).await?;
        let mentorships = self.list_mentorships(&solution.id).await?;
        Ok(SolutionView::Full(Box::new(SolutionDetail {
            status,
            solution,
            exercise,
            iterations,
            mentorships,
        })))
    }

    /// Project a track for `viewer`, with per-exercise progress when the
    /// viewer has joined it.
    pub async fn view_track(
        &self,
        viewer: Option<&str>,
        track_id: &str,
    ) -> Result<TrackView, DatabaseError> {
        let track = self.get_track(track_id).await?;
        let Some(viewer) = viewer else {
            return Ok(TrackView::SignedOut { track });
        };
        if !self.unlocked_track(viewer, track_id).await? {
            return Ok(TrackView::Locked { track });
        }

        let mut exercises = Vec::new();
        for exercise in self.list_exercises(track_id).await? {
            let unlocked = self.unlocked_exercise(viewer, &exercise.id).await?;
            let (solution_uuid, status) = match self.find_solution(viewer, &exercise.id).await? {
                Some(solution) => {
                    let status = self.solution_status(&solution).await?;
                    (Some(solution.uuid), Some(status))
                }
                None => (None, None),
            };
            exercises.push(ExerciseProgress {
                exercise,
                unlocked,
                solution_uuid,
                status,
            });
        }
        Ok(TrackView::Full { track, exercises })
    }
}
