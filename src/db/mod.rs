use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::AuthConfig;
use crate::entities::{forms, submissions};
use crate::models::GeneratedForm;

pub mod migrator;
pub mod repositories;

pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn form_repo(&self) -> repositories::form::FormRepository {
        repositories::form::FormRepository::new(self.conn.clone())
    }

    fn submission_repo(&self) -> repositories::submission::SubmissionRepository {
        repositories::submission::SubmissionRepository::new(self.conn.clone())
    }

    fn cache_repo(&self) -> repositories::cache::CacheRepository {
        repositories::cache::CacheRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn create_user(&self, email: &str, password: &str, config: &AuthConfig) -> Result<User> {
        self.user_repo().create(email, password, config).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn verify_user_password(&self, email: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_password(email, password).await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        self.user_repo().verify_api_key(api_key).await
    }

    pub async fn regenerate_user_api_key(&self, user_id: i32) -> Result<String> {
        self.user_repo().regenerate_api_key(user_id).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list().await
    }

    pub async fn count_users(&self) -> Result<u64> {
        self.user_repo().count().await
    }

    // ========== Forms ==========

    pub async fn create_form(
        &self,
        user_id: i32,
        form: &GeneratedForm,
        embedding: Option<&[f32]>,
    ) -> Result<forms::Model> {
        self.form_repo().create(user_id, form, embedding).await
    }

    pub async fn get_form_for_user(
        &self,
        form_id: i32,
        user_id: i32,
    ) -> Result<Option<forms::Model>> {
        self.form_repo().get_for_user(form_id, user_id).await
    }

    pub async fn get_form_by_share_token(&self, share_token: &str) -> Result<Option<forms::Model>> {
        self.form_repo().get_by_share_token(share_token).await
    }

    pub async fn list_forms_for_user(&self, user_id: i32) -> Result<Vec<forms::Model>> {
        self.form_repo().list_for_user(user_id).await
    }

    pub async fn get_forms_by_ids(&self, ids: &[i32]) -> Result<Vec<forms::Model>> {
        self.form_repo().get_by_ids(ids).await
    }

    pub async fn find_forms_by_keywords(
        &self,
        user_id: i32,
        keywords: &[String],
        limit: u64,
    ) -> Result<Vec<forms::Model>> {
        self.form_repo()
            .find_by_keywords(user_id, keywords, limit)
            .await
    }

    pub async fn list_forms_with_embeddings(&self, user_id: i32) -> Result<Vec<forms::Model>> {
        self.form_repo().list_with_embeddings(user_id).await
    }

    /// Delete a form together with its submissions.
    /// Returns the number of submissions removed.
    pub async fn delete_form_cascade(&self, form_id: i32) -> Result<u64> {
        let removed = self.submission_repo().delete_for_form(form_id).await?;
        self.form_repo().delete_by_id(form_id).await?;
        Ok(removed)
    }

    pub async fn count_forms(&self) -> Result<u64> {
        self.form_repo().count().await
    }

    pub async fn count_forms_for_user(&self, user_id: i32) -> Result<u64> {
        self.form_repo().count_for_user(user_id).await
    }

    // ========== Submissions ==========

    pub async fn add_submission(
        &self,
        form_id: i32,
        responses: &serde_json::Value,
        image_urls: &serde_json::Value,
    ) -> Result<submissions::Model> {
        self.submission_repo()
            .create(form_id, responses, image_urls)
            .await
    }

    pub async fn list_submissions(&self, form_id: i32) -> Result<Vec<submissions::Model>> {
        self.submission_repo().list_for_form(form_id).await
    }

    pub async fn delete_submission_scoped(
        &self,
        submission_id: i32,
        form_id: i32,
    ) -> Result<bool> {
        self.submission_repo()
            .delete_scoped(submission_id, form_id)
            .await
    }

    pub async fn count_submissions_for_form(&self, form_id: i32) -> Result<u64> {
        self.submission_repo().count_for_form(form_id).await
    }

    pub async fn count_submissions(&self) -> Result<u64> {
        self.submission_repo().count().await
    }

    // ========== Caches ==========

    pub async fn get_cached_retrieval(&self, query_hash: &str) -> Result<Option<Vec<i32>>> {
        self.cache_repo().get_retrieval(query_hash).await
    }

    pub async fn put_cached_retrieval(
        &self,
        query_hash: &str,
        user_id: i32,
        form_ids: &[i32],
        ttl_seconds: i64,
    ) -> Result<()> {
        self.cache_repo()
            .put_retrieval(query_hash, user_id, form_ids, ttl_seconds)
            .await
    }

    pub async fn get_cached_value(&self, key: &str) -> Result<Option<serde_json::Value>> {
        self.cache_repo().get_value(key).await
    }

    pub async fn put_cached_value(
        &self,
        key: &str,
        value: &serde_json::Value,
        ttl_seconds: i64,
    ) -> Result<()> {
        self.cache_repo().put_value(key, value, ttl_seconds).await
    }

    pub async fn clear_expired_cache(&self) -> Result<(u64, u64)> {
        self.cache_repo().clear_expired().await
    }
}
