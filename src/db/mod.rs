use crate::config::SecurityConfig;
use crate::models::car::{Car, CarModelOption, NewCar};
use crate::models::review::{NewReview, Review, ReviewSort, VoteKind, VoteOutcome};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

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

        let path_str = db_url.trim_start_matches("sqlite:");
        if !path_str.starts_with(":memory:") {
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

    fn car_repo(&self) -> repositories::car::CarRepository {
        repositories::car::CarRepository::new(self.conn.clone())
    }

    fn review_repo(&self) -> repositories::review::ReviewRepository {
        repositories::review::ReviewRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn create_user(
        &self,
        email: &str,
        username: &str,
        password: &str,
        config: &SecurityConfig,
    ) -> Result<i32> {
        self.user_repo()
            .create(email, username, password, config)
            .await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn count_users(&self) -> Result<u64> {
        self.user_repo().count().await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn set_user_admin(&self, username: &str, is_admin: bool) -> Result<bool> {
        self.user_repo().set_admin(username, is_admin).await
    }

    // ========================================================================
    // Cars
    // ========================================================================

    pub async fn get_car(&self, id: i32) -> Result<Option<Car>> {
        self.car_repo().get(id).await
    }

    pub async fn list_makes(&self) -> Result<Vec<String>> {
        self.car_repo().distinct_makes().await
    }

    pub async fn list_models(&self, make: &str) -> Result<Vec<CarModelOption>> {
        self.car_repo().models_for_make(make).await
    }

    pub async fn list_years(&self, make: &str, model: &str) -> Result<Vec<String>> {
        self.car_repo().distinct_years(make, model).await
    }

    pub async fn add_cars(&self, cars: &[NewCar]) -> Result<usize> {
        self.car_repo().insert_many(cars).await
    }

    // ========================================================================
    // Reviews
    // ========================================================================

    pub async fn add_review(&self, review: NewReview) -> Result<i32> {
        self.review_repo().add(review).await
    }

    pub async fn get_review(&self, id: i32) -> Result<Option<Review>> {
        self.review_repo().get(id).await
    }

    pub async fn list_reviews(&self, car_id: i32, sort: ReviewSort) -> Result<Vec<Review>> {
        self.review_repo().list_for_car(car_id, sort).await
    }

    pub async fn record_vote(
        &self,
        review_id: i32,
        user_id: i32,
        kind: VoteKind,
    ) -> Result<VoteOutcome> {
        self.review_repo().record_vote(review_id, user_id, kind).await
    }

    pub async fn remove_review(&self, id: i32) -> Result<bool> {
        self.review_repo().remove(id).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Store;

    /// Fresh store backed by a throwaway SQLite file.
    pub async fn temp_store() -> Store {
        let path = std::env::temp_dir().join(format!("carview-test-{}.db", uuid::Uuid::new_v4()));
        Store::new(&format!("sqlite:{}", path.display()))
            .await
            .expect("failed to open temp store")
    }
}
