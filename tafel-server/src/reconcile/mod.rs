//! POS Monthly Reconciliation
//!
//! 月度对账：按支付方式汇总系统流水 (captured - refunded)，与 POS
//! 报告的总额比对。所有汇总用 `Decimal` 计算，落库前转回 `f64`。

use rust_decimal::prelude::*;
use std::collections::{BTreeMap, HashMap};

use crate::db::models::{
    MethodBreakdown, MonthlyReconciliation, PaymentStatus, PaymentTransaction,
    ReconciliationStatus,
};
use crate::utils::time;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Convert f64 to Decimal, treating non-finite values as zero
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .expect("Decimal rounded to 2dp is always representable as f64")
}

/// 流水是否计入对账 (已结算口径)
///
/// Authorized 未请款、Failed 未入账，都不进对账。
fn settles(payment: &PaymentTransaction) -> bool {
    matches!(
        payment.status,
        PaymentStatus::Captured | PaymentStatus::Refunded
    )
}

/// 汇总一个月的流水并与 POS 报告比对
pub fn build_reconciliation(
    month: &str,
    payments: &[PaymentTransaction],
    pos_totals: &HashMap<String, f64>,
    note: Option<String>,
) -> MonthlyReconciliation {
    // 按方式聚合，BTreeMap 保证输出顺序稳定
    let mut recorded: BTreeMap<String, (Decimal, i32)> = BTreeMap::new();
    for payment in payments.iter().filter(|p| settles(p)) {
        let net = to_decimal(payment.amount) - to_decimal(payment.refund_amount);
        let entry = recorded
            .entry(payment.method.as_str().to_string())
            .or_insert((Decimal::ZERO, 0));
        entry.0 += net;
        entry.1 += 1;
    }

    // POS 报告里出现但系统无流水的方式也要出一行
    for method in pos_totals.keys() {
        recorded.entry(method.clone()).or_insert((Decimal::ZERO, 0));
    }

    let mut breakdowns = Vec::with_capacity(recorded.len());
    let mut recorded_sum = Decimal::ZERO;
    let mut pos_sum = Decimal::ZERO;
    let mut all_balanced = true;

    for (method, (recorded_total, count)) in recorded {
        let pos_total = to_decimal(pos_totals.get(&method).copied().unwrap_or(0.0));
        let difference = recorded_total - pos_total;
        if difference.abs() >= MONEY_TOLERANCE {
            all_balanced = false;
        }
        recorded_sum += recorded_total;
        pos_sum += pos_total;
        breakdowns.push(MethodBreakdown {
            method,
            recorded_total: to_f64(recorded_total),
            pos_total: to_f64(pos_total),
            difference: to_f64(difference),
            count,
        });
    }

    let status = if pos_totals.is_empty() {
        ReconciliationStatus::Open
    } else if all_balanced {
        ReconciliationStatus::Balanced
    } else {
        ReconciliationStatus::Discrepant
    };

    MonthlyReconciliation {
        id: None,
        month: month.to_string(),
        breakdowns,
        recorded_total: to_f64(recorded_sum),
        pos_total: to_f64(pos_sum),
        difference: to_f64(recorded_sum - pos_sum),
        status,
        generated_at: Some(time::now_rfc3339()),
        closed_at: None,
        note,
    }
}

#[cfg(test)]
mod tests;
