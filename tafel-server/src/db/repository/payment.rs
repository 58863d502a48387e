//! Payment Repository
//!
//! 独立 payment 表，transaction_id 作幂等键。
//! 退款不产生新行，累计在 refund_amount 上。

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{PaymentCreate, PaymentFilter, PaymentStatus, PaymentTransaction};
use crate::utils::time;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "payment";

#[derive(Clone)]
pub struct PaymentRepository {
    base: BaseRepository,
}

impl PaymentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List payments with optional filters, newest first
    pub async fn find_filtered(&self, filter: &PaymentFilter) -> RepoResult<Vec<PaymentTransaction>> {
        let mut conditions: Vec<&str> = Vec::new();
        if filter.from.is_some() {
            conditions.push("date >= $from");
        }
        if filter.to.is_some() {
            conditions.push("date <= $to");
        }
        if filter.method.is_some() {
            conditions.push("method = $method");
        }
        if filter.status.is_some() {
            conditions.push("status = $status");
        }

        let mut sql = String::from("SELECT * FROM payment");
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY timestamp DESC");

        let mut query = self.base.db().query(sql.as_str());
        if let Some(from) = &filter.from {
            query = query.bind(("from", from.clone()));
        }
        if let Some(to) = &filter.to {
            query = query.bind(("to", to.clone()));
        }
        if let Some(method) = filter.method {
            query = query.bind(("method", method));
        }
        if let Some(status) = filter.status {
            query = query.bind(("status", status));
        }

        let payments: Vec<PaymentTransaction> = query.await?.take(0)?;
        Ok(payments)
    }

    /// Find payments within a date range [from, to) — 对账汇总用
    pub async fn find_in_dates(&self, from: &str, to: &str) -> RepoResult<Vec<PaymentTransaction>> {
        let payments: Vec<PaymentTransaction> = self
            .base
            .db()
            .query("SELECT * FROM payment WHERE date >= $from AND date < $to")
            .bind(("from", from.to_string()))
            .bind(("to", to.to_string()))
            .await?
            .take(0)?;
        Ok(payments)
    }

    /// Find payment by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<PaymentTransaction>> {
        let thing = self.base.parse_id(id)?;
        let payment: Option<PaymentTransaction> = self.base.db().select(thing).await?;
        Ok(payment)
    }

    /// Find payment by transaction_id (幂等检查)
    pub async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> RepoResult<Option<PaymentTransaction>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM payment WHERE transaction_id = $tid LIMIT 1")
            .bind(("tid", transaction_id.to_string()))
            .await?;
        let payments: Vec<PaymentTransaction> = result.take(0)?;
        Ok(payments.into_iter().next())
    }

    /// Record a new payment transaction
    pub async fn create(&self, data: PaymentCreate) -> RepoResult<PaymentTransaction> {
        if data.amount <= 0.0 {
            return Err(RepoError::Validation("Amount must be positive".into()));
        }

        let transaction_id = data
            .transaction_id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        if self
            .find_by_transaction_id(&transaction_id)
            .await?
            .is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Transaction '{}' already recorded",
                transaction_id
            )));
        }

        let now = time::now_millis();
        let payment = PaymentTransaction {
            id: None,
            transaction_id,
            method: data.method,
            amount: data.amount,
            currency: data.currency.unwrap_or_else(|| "EUR".to_string()),
            status: data.status.unwrap_or(PaymentStatus::Captured),
            refund_amount: 0.0,
            refund_reason: None,
            reservation_ref: data.reservation_ref,
            date: data.date,
            timestamp: data.timestamp.unwrap_or(now),
            created_at: now,
        };

        let created: Option<PaymentTransaction> =
            self.base.db().create(TABLE).content(payment).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create payment".to_string()))
    }

    /// Apply a refund (状态与金额校验在调用方)
    pub async fn apply_refund(
        &self,
        id: &str,
        status: PaymentStatus,
        refund_amount: f64,
        reason: Option<String>,
    ) -> RepoResult<PaymentTransaction> {
        let thing = self.base.parse_id(id)?;
        self.base
            .db()
            .query("UPDATE $thing SET status = $status, refund_amount = $refund_amount, refund_reason = $reason")
            .bind(("thing", thing))
            .bind(("status", status))
            .bind(("refund_amount", refund_amount))
            .bind(("reason", reason))
            .await?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Payment {} not found", id)))
    }
}
