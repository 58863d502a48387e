//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.

// Location
pub mod area;
pub mod dining_table;

// Reservations
pub mod event_block;
pub mod reservation;
pub mod table_combination;

// Back office
pub mod marketing_content;
pub mod payment;
pub mod reconciliation;
pub mod staff;

// Re-exports
pub use area::AreaRepository;
pub use dining_table::DiningTableRepository;
pub use event_block::EventBlockRepository;
pub use marketing_content::MarketingContentRepository;
pub use payment::PaymentRepository;
pub use reconciliation::ReconciliationRepository;
pub use reservation::ReservationRepository;
pub use staff::StaffRepository;
pub use table_combination::TableCombinationRepository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Common repository trait for basic CRUD
#[allow(async_fn_in_trait)]
pub trait Repository<T, CreateDto, UpdateDto> {
    async fn find_all(&self) -> RepoResult<Vec<T>>;
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<T>>;
    async fn create(&self, data: CreateDto) -> RepoResult<T>;
    async fn update(&self, id: &str, data: UpdateDto) -> RepoResult<T>;
    async fn delete(&self, id: &str) -> RepoResult<bool>;
}

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
// 使用 surrealdb::RecordId 处理所有 ID：
//   - 解析: let id: RecordId = "dining_table:abc".parse()?;
//   - 创建: let id = RecordId::from_table_key("dining_table", "abc");
//   - CRUD: db.select(id) / db.delete(id) 直接使用 RecordId

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    /// 解析 "table:id" 字符串为 RecordId
    pub fn parse_id(&self, id: &str) -> RepoResult<surrealdb::RecordId> {
        id.parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))
    }
}
