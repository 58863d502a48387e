//! POS Monthly Reconciliation Model (月度对账)

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use std::collections::HashMap;

pub type ReconciliationId = RecordId;

/// Reconciliation status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReconciliationStatus {
    Open,
    Balanced,
    Discrepant,
    Closed,
}

/// Per payment-method reconciliation row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodBreakdown {
    /// 支付方式
    pub method: String,

    /// 系统流水金额 (captured - refunded)
    #[serde(default)]
    pub recorded_total: f64,

    /// POS 报告金额
    #[serde(default)]
    pub pos_total: f64,

    /// 差额 (recorded - pos)
    #[serde(default)]
    pub difference: f64,

    /// 流水笔数
    #[serde(default)]
    pub count: i32,
}

/// Monthly reconciliation entity (月度对账单)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyReconciliation {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ReconciliationId>,

    /// 对账月份 (YYYY-MM)
    pub month: String,

    /// 支付方式分类明细
    #[serde(default)]
    pub breakdowns: Vec<MethodBreakdown>,

    // === 汇总 ===
    /// 系统流水总额
    #[serde(default)]
    pub recorded_total: f64,

    /// POS 报告总额
    #[serde(default)]
    pub pos_total: f64,

    /// 总差额
    #[serde(default)]
    pub difference: f64,

    pub status: ReconciliationStatus,

    /// 生成时间 (RFC3339)
    pub generated_at: Option<String>,

    /// 关账时间 (RFC3339)
    pub closed_at: Option<String>,

    /// 备注
    pub note: Option<String>,
}

/// Generate reconciliation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationGenerate {
    /// 对账月份 (YYYY-MM)
    pub month: String,
    /// POS 报告的各支付方式总额, 如 {"CASH": 1200.50, "CARD": 8100.00}
    #[serde(default)]
    pub pos_totals: HashMap<String, f64>,
    pub note: Option<String>,
}
