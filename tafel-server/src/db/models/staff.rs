//! Staff Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Staff ID type
pub type StaffId = RecordId;

/// 加密存储的 HR 字段 (密文为 base64(nonce || sealed))
///
/// 列表/详情接口不返回本结构，见 [`StaffResponse`]；
/// 解密只发生在 `/api/staff/{id}/hr`。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncryptedHr {
    pub address: Option<String>,
    pub iban: Option<String>,
    pub salary_note: Option<String>,
}

/// 解密后的 HR 字段视图
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaffHr {
    pub address: Option<String>,
    pub iban: Option<String>,
    pub salary_note: Option<String>,
}

/// Staff member entity (员工档案)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<StaffId>,
    pub name: String,
    /// 岗位 (Service, Küche, ...)
    pub position: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// 入职日期 (YYYY-MM-DD)
    pub hire_date: Option<String>,
    /// 加密 HR 字段
    #[serde(default)]
    pub hr: EncryptedHr,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    /// 创建时间 (Unix millis)
    #[serde(default)]
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

/// API 响应视图 — 不含 HR 密文
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffResponse {
    pub id: Option<String>,
    pub name: String,
    pub position: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub hire_date: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
}

impl From<StaffMember> for StaffResponse {
    fn from(s: StaffMember) -> Self {
        Self {
            id: s.id.as_ref().map(|id| id.to_string()),
            name: s.name,
            position: s.position,
            email: s.email,
            phone: s.phone,
            hire_date: s.hire_date,
            is_active: s.is_active,
            created_at: s.created_at,
        }
    }
}

/// Create staff payload (HR 字段以明文提交，入库前加密)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StaffCreate {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(min = 1, max = 60))]
    pub position: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub hire_date: Option<String>,
    pub address: Option<String>,
    pub iban: Option<String>,
    pub salary_note: Option<String>,
}

/// Update staff payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StaffUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 60))]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
