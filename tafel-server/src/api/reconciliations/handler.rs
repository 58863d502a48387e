//! POS Reconciliation API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{MonthlyReconciliation, ReconciliationGenerate, ReconciliationStatus};
use crate::db::repository::{PaymentRepository, ReconciliationRepository};
use crate::reconcile::build_reconciliation;
use crate::utils::{AppError, AppResult, time};

/// List query (可按年过滤)
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// 年份 "YYYY"
    pub year: Option<String>,
}

/// GET /api/reconciliations - 列出对账单
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<MonthlyReconciliation>>> {
    let repo = ReconciliationRepository::new(state.db.clone());
    let rows = repo.find_all(query.year.as_deref()).await?;
    Ok(Json(rows))
}

/// GET /api/reconciliations/:month - 获取某月对账单
pub async fn get_by_month(
    State(state): State<ServerState>,
    Path(month): Path<String>,
) -> AppResult<Json<MonthlyReconciliation>> {
    let repo = ReconciliationRepository::new(state.db.clone());
    let row = repo
        .find_by_month(&month)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Reconciliation {} not found", month)))?;
    Ok(Json(row))
}

/// POST /api/reconciliations/generate - 生成/重算某月对账单
///
/// 已关账的月份拒绝重算。
pub async fn generate(
    State(state): State<ServerState>,
    Json(payload): Json<ReconciliationGenerate>,
) -> AppResult<Json<MonthlyReconciliation>> {
    let (start, end) = time::month_bounds(&payload.month)?;

    let repo = ReconciliationRepository::new(state.db.clone());
    if let Some(existing) = repo.find_by_month(&payload.month).await?
        && existing.status == ReconciliationStatus::Closed
    {
        return Err(AppError::business_rule(format!(
            "Reconciliation {} is closed and cannot be regenerated",
            payload.month
        )));
    }

    let payments = PaymentRepository::new(state.db.clone())
        .find_in_dates(
            &start.format("%Y-%m-%d").to_string(),
            &end.format("%Y-%m-%d").to_string(),
        )
        .await?;

    let row = build_reconciliation(&payload.month, &payments, &payload.pos_totals, payload.note);
    let stored = repo.upsert(row).await?;
    tracing::info!(month = %payload.month, status = ?stored.status, "Reconciliation generated");
    Ok(Json(stored))
}

/// POST /api/reconciliations/:month/close - 关账
pub async fn close(
    State(state): State<ServerState>,
    Path(month): Path<String>,
) -> AppResult<Json<MonthlyReconciliation>> {
    let repo = ReconciliationRepository::new(state.db.clone());
    let existing = repo
        .find_by_month(&month)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Reconciliation {} not found", month)))?;
    if existing.status == ReconciliationStatus::Closed {
        return Err(AppError::business_rule(format!(
            "Reconciliation {} is already closed",
            month
        )));
    }

    let closed = repo.close(&month).await?;
    tracing::info!(month = %month, "Reconciliation closed");
    Ok(Json(closed))
}
