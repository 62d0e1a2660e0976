//! Solution update builder.
//!
//! Nullable columns use `Option<Option<T>>`: outer `None` leaves the column
//! alone, `Some(None)` clears it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tw_core::entities::Solution;

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct SolutionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reflection: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_by_user_at: Option<Option<DateTime<Utc>>>,
}

impl SolutionUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.completed_at.is_none()
            && self.published_at.is_none()
            && self.approved_by.is_none()
            && self.reflection.is_none()
            && self.last_updated_by_user_at.is_none()
    }

    /// The solution as it would look after this update, `updated_at` aside.
    #[must_use]
    pub fn apply_to(&self, solution: &Solution) -> Solution {
        let mut next = solution.clone();
        if let Some(completed_at) = self.completed_at {
            next.completed_at = completed_at;
        }
        if let Some(published_at) = self.published_at {
            next.published_at = published_at;
        }
        if let Some(ref approved_by) = self.approved_by {
            next.approved_by.clone_from(approved_by);
        }
        if let Some(ref reflection) = self.reflection {
            next.reflection.clone_from(reflection);
        }
        if let Some(last_updated_by_user_at) = self.last_updated_by_user_at {
            next.last_updated_by_user_at = last_updated_by_user_at;
        }
        next
    }
}

pub struct SolutionUpdateBuilder(SolutionUpdate);

impl SolutionUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(SolutionUpdate::default())
    }

    #[must_use]
    pub fn completed_at(mut self, completed_at: Option<DateTime<Utc>>) -> Self {
        self.0.completed_at = Some(completed_at);
        self
    }

    #[must_use]
    pub fn published_at(mut self, published_at: Option<DateTime<Utc>>) -> Self {
        self.0.published_at = Some(published_at);
        self
    }

    #[must_use]
    pub fn approved_by(mut self, approved_by: Option<String>) -> Self {
        self.0.approved_by = Some(approved_by);
        self
    }

    #[must_use]
    pub fn reflection(mut self, reflection: Option<String>) -> Self {
        self.0.reflection = Some(reflection);
        self
    }

    #[must_use]
    pub fn last_updated_by_user_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.0.last_updated_by_user_at = Some(at);
        self
    }

    #[must_use]
    pub fn build(self) -> SolutionUpdate {
        self.0
    }
}

impl Default for SolutionUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn solution() -> Solution {
        let now = Utc::now();
        Solution {
            id: "sol-00000001".into(),
            uuid: "uuid-1".into(),
            user_id: "usr-00000001".into(),
            exercise_id: "exr-00000001".into(),
            completed_at: Some(now),
            published_at: Some(now),
            approved_by: Some("usr-00000002".into()),
            reflection: Some("kept".into()),
            last_updated_by_user_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn serializes_only_changed_fields() {
        let update = SolutionUpdateBuilder::new().approved_by(None).build();
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({ "approved_by": null }));
    }

    #[test]
    fn apply_clears_and_keeps() {
        let before = solution();
        let update = SolutionUpdateBuilder::new()
            .completed_at(None)
            .approved_by(None)
            .build();
        let after = update.apply_to(&before);
        assert_eq!(after.completed_at, None);
        assert_eq!(after.approved_by, None);
        assert_eq!(after.published_at, before.published_at);
        assert_eq!(after.reflection.as_deref(), Some("kept"));
    }

    #[test]
    fn empty_builder_is_empty() {
        assert!(SolutionUpdateBuilder::new().build().is_empty());
        assert!(!SolutionUpdateBuilder::new().reflection(None).build().is_empty());
    }
}
