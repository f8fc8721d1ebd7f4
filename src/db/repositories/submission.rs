use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::submissions;

pub struct SubmissionRepository {
    conn: DatabaseConnection,
}

impl SubmissionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Record an anonymous submission against a form
    pub async fn create(
        &self,
        form_id: i32,
        responses: &serde_json::Value,
        image_urls: &serde_json::Value,
    ) -> Result<submissions::Model> {
        let active = submissions::ActiveModel {
            form_id: Set(form_id),
            responses: Set(responses.to_string()),
            image_urls: Set(image_urls.to_string()),
            submitted_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert submission")?;

        Ok(model)
    }

    /// All submissions for a form, newest first
    pub async fn list_for_form(&self, form_id: i32) -> Result<Vec<submissions::Model>> {
        submissions::Entity::find()
            .filter(submissions::Column::FormId.eq(form_id))
            .order_by_desc(submissions::Column::SubmittedAt)
            .order_by_desc(submissions::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list submissions")
    }

    /// Delete one submission, scoped to its form. Returns true when a row was removed.
    pub async fn delete_scoped(&self, submission_id: i32, form_id: i32) -> Result<bool> {
        let result = submissions::Entity::delete_many()
            .filter(submissions::Column::Id.eq(submission_id))
            .filter(submissions::Column::FormId.eq(form_id))
            .exec(&self.conn)
            .await
            .context("Failed to delete submission")?;

        Ok(result.rows_affected > 0)
    }

    /// Delete every submission belonging to a form. Returns the number removed.
    pub async fn delete_for_form(&self, form_id: i32) -> Result<u64> {
        let result = submissions::Entity::delete_many()
            .filter(submissions::Column::FormId.eq(form_id))
            .exec(&self.conn)
            .await
            .context("Failed to delete submissions for form")?;

        Ok(result.rows_affected)
    }

    pub async fn count_for_form(&self, form_id: i32) -> Result<u64> {
        submissions::Entity::find()
            .filter(submissions::Column::FormId.eq(form_id))
            .count(&self.conn)
            .await
            .context("Failed to count submissions for form")
    }

    pub async fn count(&self) -> Result<u64> {
        submissions::Entity::find()
            .count(&self.conn)
            .await
            .context("Failed to count submissions")
    }
}
