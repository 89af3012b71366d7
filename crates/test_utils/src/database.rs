//! Database Test Utilities
//!
//! Starts a throwaway PostgreSQL container, applies the schema and hands back
//! a pool. Tests using it need a running Docker daemon.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};

use domain_policy::Plan;

const POSTGRES_IMAGE: &str = "postgres";
const POSTGRES_TAG: &str = "16-alpine";
const POSTGRES_USER: &str = "test_user";
const POSTGRES_PASSWORD: &str = "test_password";
const POSTGRES_DB: &str = "lifecycle_test";

pub type TestDbError = Box<dyn std::error::Error + Send + Sync>;

/// Connection details for a started container
#[derive(Debug, Clone)]
struct ConnectionConfig {
    user: String,
    password: String,
    database: String,
    host: String,
    port: u16,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            user: POSTGRES_USER.to_string(),
            password: POSTGRES_PASSWORD.to_string(),
            database: POSTGRES_DB.to_string(),
            host: "localhost".to_string(),
            port: 5432,
        }
    }
}

impl ConnectionConfig {
    fn connection_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

/// A PostgreSQL container with the lifecycle schema applied
pub struct TestDatabase {
    _container: ContainerAsync<GenericImage>,
    pool: PgPool,
}

impl TestDatabase {
    /// Starts a new container and initialises the schema
    ///
    /// # Errors
    ///
    /// Returns an error if the container fails to start or the schema fails
    /// to apply.
    pub async fn new() -> Result<Self, TestDbError> {
        let container = GenericImage::new(POSTGRES_IMAGE, POSTGRES_TAG)
            .with_exposed_port(5432.tcp())
            .with_wait_for(WaitFor::message_on_stderr("database system is ready to accept connections"))
            .with_env_var("POSTGRES_USER", POSTGRES_USER)
            .with_env_var("POSTGRES_PASSWORD", POSTGRES_PASSWORD)
            .with_env_var("POSTGRES_DB", POSTGRES_DB)
            .start()
            .await?;

        let config = ConnectionConfig {
            host: container.get_host().await?.to_string(),
            port: container.get_host_port_ipv4(5432).await?,
            ..ConnectionConfig::default()
        };

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&config.connection_url())
            .await?;

        let test_db = Self {
            _container: container,
            pool,
        };
        test_db.init_schema().await?;
        Ok(test_db)
    }

    async fn init_schema(&self) -> Result<(), TestDbError> {
        let schema = include_str!("../../../migrations/20250101_000001_initial_schema.sql");
        sqlx::raw_sql(schema).execute(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Inserts a plan; the catalog is otherwise maintained out of band
    pub async fn seed_plan(&self, plan: &Plan) -> Result<(), TestDbError> {
        sqlx::query(
            r#"
            INSERT INTO plans (
                id, name, description, coverage_amount, monthly_premium_base,
                deductible, copay, features, active
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(*plan.id.as_uuid())
        .bind(&plan.name)
        .bind(&plan.description)
        .bind(plan.coverage_amount)
        .bind(plan.monthly_premium_base)
        .bind(plan.deductible)
        .bind(plan.copay)
        .bind(&plan.features)
        .bind(plan.active)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// A container of its own, so tests never see each other's rows
pub async fn create_isolated_test_database() -> Result<TestDatabase, TestDbError> {
    TestDatabase::new().await
}
