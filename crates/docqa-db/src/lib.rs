//! # docqa-db
//!
//! PostgreSQL database layer for docqa.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for documents and questions
//! - sqlx migrations (behind the `migrations` feature)
//!
//! ## Example
//!
//! ```rust,ignore
//! use docqa_db::Database;
//! use docqa_core::{CreateDocumentRequest, DocumentRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/docqa").await?;
//!
//!     let doc = db.documents.insert(CreateDocumentRequest {
//!         title: "Release notes".to_string(),
//!         content: "Hello, world!".to_string(),
//!     }).await?;
//!
//!     println!("Created document: {}", doc.id);
//!     Ok(())
//! }
//! ```

pub mod documents;
pub mod pool;
pub mod questions;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use docqa_core::*;

// Re-export repository implementations
pub use documents::PgDocumentRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use questions::PgQuestionRepository;

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Document repository for CRUD operations.
    pub documents: PgDocumentRepository,
    /// Question repository for lifecycle state.
    pub questions: PgQuestionRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            documents: PgDocumentRepository::new(pool.clone()),
            questions: PgQuestionRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }

    /// Cheap datastore connectivity probe for health checks.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }
}
