//! Database Module
//!
//! Handles the embedded SurrealDB instance (RocksDB backend)

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const NAMESPACE: &str = "tafel";
const DATABASE: &str = "backoffice";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the embedded database at `db_path` and prepare the schema
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;

        tracing::info!("Database ready (SurrealDB/RocksDB at {})", db_path);

        Ok(Self { db })
    }
}

/// 声明索引 — 幂等，每次启动执行
///
/// SCHEMALESS 表 + 少量唯一索引，文档结构由模型层约束。
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        r#"
        DEFINE INDEX IF NOT EXISTS idx_payment_tid ON TABLE payment COLUMNS transaction_id UNIQUE;
        DEFINE INDEX IF NOT EXISTS idx_reconciliation_month ON TABLE pos_reconciliation COLUMNS month UNIQUE;
        DEFINE INDEX IF NOT EXISTS idx_reservation_date ON TABLE reservation COLUMNS date;
        DEFINE INDEX IF NOT EXISTS idx_combination_date ON TABLE table_combination COLUMNS date;
        DEFINE INDEX IF NOT EXISTS idx_event_block_date ON TABLE event_block COLUMNS date;
        "#,
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
    Ok(())
}
