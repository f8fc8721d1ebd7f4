use anyhow::{Context, Result};
use rand::{Rng, distr::Alphanumeric};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::forms;
use crate::models::GeneratedForm;

const SHARE_TOKEN_LEN: usize = 10;

pub struct FormRepository {
    conn: DatabaseConnection,
}

impl FormRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Persist a generated schema for a user, minting a fresh share token
    pub async fn create(
        &self,
        user_id: i32,
        form: &GeneratedForm,
        embedding: Option<&[f32]>,
    ) -> Result<forms::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let keywords =
            serde_json::to_string(&form.keywords).context("Failed to serialize keywords")?;
        let fields =
            serde_json::to_string(&form.fields).context("Failed to serialize form fields")?;
        let embedding = embedding
            .map(serde_json::to_string)
            .transpose()
            .context("Failed to serialize embedding")?;

        let active = forms::ActiveModel {
            user_id: Set(user_id),
            title: Set(form.title.clone()),
            purpose: Set(form.purpose.clone()),
            keywords: Set(keywords),
            fields: Set(fields),
            share_token: Set(generate_share_token()),
            embedding: Set(embedding),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert form")?;

        Ok(model)
    }

    /// Get a form by id, scoped to its owner
    pub async fn get_for_user(&self, form_id: i32, user_id: i32) -> Result<Option<forms::Model>> {
        forms::Entity::find_by_id(form_id)
            .filter(forms::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .context("Failed to query form by id")
    }

    /// Get a form by its public share token
    pub async fn get_by_share_token(&self, share_token: &str) -> Result<Option<forms::Model>> {
        forms::Entity::find()
            .filter(forms::Column::ShareToken.eq(share_token))
            .one(&self.conn)
            .await
            .context("Failed to query form by share token")
    }

    /// All forms for a user, newest first
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<forms::Model>> {
        forms::Entity::find()
            .filter(forms::Column::UserId.eq(user_id))
            .order_by_desc(forms::Column::CreatedAt)
            .order_by_desc(forms::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list forms")
    }

    /// Resolve a batch of form ids. Missing ids are simply absent from the result.
    pub async fn get_by_ids(&self, ids: &[i32]) -> Result<Vec<forms::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        forms::Entity::find()
            .filter(forms::Column::Id.is_in(ids.iter().copied()))
            .all(&self.conn)
            .await
            .context("Failed to query forms by ids")
    }

    /// Forms of a user sharing at least one keyword with the query, in insertion
    /// order, capped at `limit`.
    pub async fn find_by_keywords(
        &self,
        user_id: i32,
        keywords: &[String],
        limit: u64,
    ) -> Result<Vec<forms::Model>> {
        if keywords.is_empty() {
            return Ok(vec![]);
        }

        let candidates = forms::Entity::find()
            .filter(forms::Column::UserId.eq(user_id))
            .order_by_asc(forms::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query forms for keyword match")?;

        let mut matched = Vec::new();
        for form in candidates {
            let stored: Vec<String> = serde_json::from_str(&form.keywords)
                .with_context(|| format!("Corrupt keywords column on form {}", form.id))?;

            if stored.iter().any(|k| keywords.contains(k)) {
                matched.push(form);
                if matched.len() as u64 >= limit {
                    break;
                }
            }
        }

        Ok(matched)
    }

    /// Forms of a user that carry a stored embedding vector
    pub async fn list_with_embeddings(&self, user_id: i32) -> Result<Vec<forms::Model>> {
        forms::Entity::find()
            .filter(forms::Column::UserId.eq(user_id))
            .filter(forms::Column::Embedding.is_not_null())
            .order_by_asc(forms::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query forms with embeddings")
    }

    /// Delete a form row. Returns true when a row was removed.
    pub async fn delete_by_id(&self, form_id: i32) -> Result<bool> {
        let result = forms::Entity::delete_by_id(form_id)
            .exec(&self.conn)
            .await
            .context("Failed to delete form")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        forms::Entity::find()
            .count(&self.conn)
            .await
            .context("Failed to count forms")
    }

    pub async fn count_for_user(&self, user_id: i32) -> Result<u64> {
        forms::Entity::find()
            .filter(forms::Column::UserId.eq(user_id))
            .count(&self.conn)
            .await
            .context("Failed to count forms for user")
    }
}

/// Generate a random URL-safe share token (10 alphanumeric characters)
#[must_use]
pub fn generate_share_token() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(SHARE_TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_token_shape() {
        let token = generate_share_token();
        assert_eq!(token.len(), 10);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_share_tokens_differ() {
        assert_ne!(generate_share_token(), generate_share_token());
    }
}
