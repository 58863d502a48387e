//! Reconciliation Repository
//!
//! 每月一行，month 作唯一键；重算时整行替换。

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{MonthlyReconciliation, ReconciliationStatus};
use crate::utils::time;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "pos_reconciliation";

#[derive(Clone)]
pub struct ReconciliationRepository {
    base: BaseRepository,
}

impl ReconciliationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List reconciliations, optionally restricted to a year ("YYYY")
    pub async fn find_all(&self, year: Option<&str>) -> RepoResult<Vec<MonthlyReconciliation>> {
        let rows: Vec<MonthlyReconciliation> = match year {
            Some(y) => {
                self.base
                    .db()
                    .query("SELECT * FROM pos_reconciliation WHERE string::starts_with(month, $year) ORDER BY month DESC")
                    .bind(("year", format!("{}-", y)))
                    .await?
                    .take(0)?
            }
            None => {
                self.base
                    .db()
                    .query("SELECT * FROM pos_reconciliation ORDER BY month DESC")
                    .await?
                    .take(0)?
            }
        };
        Ok(rows)
    }

    /// Find reconciliation by month (YYYY-MM)
    pub async fn find_by_month(&self, month: &str) -> RepoResult<Option<MonthlyReconciliation>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM pos_reconciliation WHERE month = $month LIMIT 1")
            .bind(("month", month.to_string()))
            .await?;
        let rows: Vec<MonthlyReconciliation> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Insert or replace the reconciliation row for a month
    ///
    /// 已关账的月份由调用方拒绝，这里不重复校验。
    pub async fn upsert(
        &self,
        mut row: MonthlyReconciliation,
    ) -> RepoResult<MonthlyReconciliation> {
        if let Some(existing) = self.find_by_month(&row.month).await?
            && let Some(id) = existing.id
        {
            self.base.db().query("DELETE $thing").bind(("thing", id)).await?;
        }

        row.id = None;
        let created: Option<MonthlyReconciliation> =
            self.base.db().create(TABLE).content(row).await?;
        created.ok_or_else(|| RepoError::Database("Failed to store reconciliation".to_string()))
    }

    /// Close the month (终态，不可再重算)
    pub async fn close(&self, month: &str) -> RepoResult<MonthlyReconciliation> {
        let existing = self
            .find_by_month(month)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Reconciliation {} not found", month)))?;
        let thing = existing
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Reconciliation row without id".into()))?;

        self.base
            .db()
            .query("UPDATE $thing SET status = $status, closed_at = $closed_at")
            .bind(("thing", thing))
            .bind(("status", ReconciliationStatus::Closed))
            .bind(("closed_at", time::now_rfc3339()))
            .await?;

        self.find_by_month(month)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Reconciliation {} not found", month)))
    }
}
