//! Payment API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::core::ServerState;
use crate::db::models::{
    PaymentCreate, PaymentFilter, PaymentStatus, PaymentTransaction, RefundRequest,
};
use crate::db::repository::PaymentRepository;
use crate::reconcile::{MONEY_TOLERANCE, to_decimal, to_f64};
use crate::utils::{AppError, AppResult, time};

/// GET /api/payments - 按条件列出支付流水
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<PaymentFilter>,
) -> AppResult<Json<Vec<PaymentTransaction>>> {
    if let Some(from) = &filter.from {
        time::parse_date(from)?;
    }
    if let Some(to) = &filter.to {
        time::parse_date(to)?;
    }
    let repo = PaymentRepository::new(state.db.clone());
    let payments = repo.find_filtered(&filter).await?;
    Ok(Json(payments))
}

/// GET /api/payments/:id - 获取单笔流水
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<PaymentTransaction>> {
    let repo = PaymentRepository::new(state.db.clone());
    let payment = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Payment {} not found", id)))?;
    Ok(Json(payment))
}

/// POST /api/payments - 登记流水 (POS 导入/网关回传)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<PaymentCreate>,
) -> AppResult<Json<PaymentTransaction>> {
    time::parse_date(&payload.date)?;
    let repo = PaymentRepository::new(state.db.clone());
    let payment = repo.create(payload).await?;
    Ok(Json(payment))
}

/// POST /api/payments/:id/refund - 退款登记
///
/// 只有 captured 流水可退；累计退款不可超过原金额。
/// 全额退完状态翻转为 refunded，部分退款保持 captured。
pub async fn refund(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<RefundRequest>,
) -> AppResult<Json<PaymentTransaction>> {
    let repo = PaymentRepository::new(state.db.clone());
    let payment = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Payment {} not found", id)))?;

    if payment.status != PaymentStatus::Captured {
        return Err(AppError::business_rule(format!(
            "Only captured payments can be refunded (status: {:?})",
            payment.status
        )));
    }

    let amount = to_decimal(payment.amount);
    let already = to_decimal(payment.refund_amount);
    let remaining = amount - already;

    let requested = match payload.amount {
        Some(a) => {
            let a = to_decimal(a);
            if a <= rust_decimal::Decimal::ZERO {
                return Err(AppError::validation("Refund amount must be positive"));
            }
            a
        }
        None => remaining,
    };

    if requested > remaining {
        return Err(AppError::business_rule(format!(
            "Refund of {} exceeds remaining amount {}",
            to_f64(requested),
            to_f64(remaining)
        )));
    }

    let new_refund_total = already + requested;
    let fully_refunded = (amount - new_refund_total).abs() < MONEY_TOLERANCE;
    let status = if fully_refunded {
        PaymentStatus::Refunded
    } else {
        PaymentStatus::Captured
    };

    let updated = repo
        .apply_refund(&id, status, to_f64(new_refund_total), payload.reason)
        .await?;
    tracing::info!(payment = %id, amount = %to_f64(requested), "Refund recorded");
    Ok(Json(updated))
}
