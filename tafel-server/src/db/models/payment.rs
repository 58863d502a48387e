//! Payment Transaction Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Payment method enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    Online,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Card => "CARD",
            PaymentMethod::Online => "ONLINE",
        }
    }
}

/// Payment status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Authorized,
    Captured,
    Refunded,
    Failed,
}

/// Payment transaction entity (支付流水)
///
/// `transaction_id` 唯一，网关回传或 POS 导入时作幂等键。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentTransaction {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub transaction_id: String,
    pub method: PaymentMethod,
    /// 金额 (货币单位，汇总计算用 Decimal)
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub status: PaymentStatus,
    /// 已退款金额 (累计)
    #[serde(default)]
    pub refund_amount: f64,
    pub refund_reason: Option<String>,
    /// 关联预订 (可选)
    pub reservation_ref: Option<String>,
    /// 交易日期 (YYYY-MM-DD, 对账按此归档)
    pub date: String,
    /// 交易时间戳 (Unix millis)
    pub timestamp: i64,
    /// 创建时间 (Unix millis)
    #[serde(default)]
    pub created_at: i64,
}

fn default_currency() -> String {
    "EUR".to_string()
}

/// Create payment payload (POS 导入/网关回传)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCreate {
    /// 不传则生成 uuid
    pub transaction_id: Option<String>,
    pub method: PaymentMethod,
    pub amount: f64,
    pub currency: Option<String>,
    pub status: Option<PaymentStatus>,
    pub reservation_ref: Option<String>,
    pub date: String,
    pub timestamp: Option<i64>,
}

/// Refund request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundRequest {
    /// 退款金额，不传 = 全额
    pub amount: Option<f64>,
    pub reason: Option<String>,
}

/// Payment list filter (query string)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentFilter {
    /// 起始日期 (含)
    pub from: Option<String>,
    /// 结束日期 (含)
    pub to: Option<String>,
    pub method: Option<PaymentMethod>,
    pub status: Option<PaymentStatus>,
}
