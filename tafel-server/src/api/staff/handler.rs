//! Staff API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{EncryptedHr, StaffCreate, StaffHr, StaffMember, StaffResponse, StaffUpdate};
use crate::db::repository::StaffRepository;
use crate::utils::{AppError, AppResult, time};

/// GET /api/staff - 获取所有员工 (不含 HR 字段)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<StaffResponse>>> {
    let repo = StaffRepository::new(state.db.clone());
    let staff = repo.find_all().await?;
    Ok(Json(staff.into_iter().map(StaffResponse::from).collect()))
}

/// GET /api/staff/:id - 获取单个员工 (不含 HR 字段)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<StaffResponse>> {
    let repo = StaffRepository::new(state.db.clone());
    let member = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Staff member {} not found", id)))?;
    Ok(Json(StaffResponse::from(member)))
}

/// GET /api/staff/:id/hr - 解密返回 HR 字段
pub async fn hr_details(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<StaffHr>> {
    let repo = StaffRepository::new(state.db.clone());
    let member = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Staff member {} not found", id)))?;

    let hr = state
        .field_cipher
        .decrypt_hr(&member.hr)
        .map_err(|e| AppError::internal(format!("HR decryption failed: {e}")))?;
    tracing::info!(staff = %id, "HR fields accessed");
    Ok(Json(hr))
}

/// POST /api/staff - 创建员工档案 (HR 字段入库前加密)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<StaffCreate>,
) -> AppResult<Json<StaffResponse>> {
    payload.validate()?;
    if let Some(hire_date) = &payload.hire_date {
        time::parse_date(hire_date)?;
    }

    let cipher = &state.field_cipher;
    let hr = EncryptedHr {
        address: cipher
            .encrypt_opt(payload.address.as_deref())
            .map_err(|e| AppError::internal(format!("HR encryption failed: {e}")))?,
        iban: cipher
            .encrypt_opt(payload.iban.as_deref())
            .map_err(|e| AppError::internal(format!("HR encryption failed: {e}")))?,
        salary_note: cipher
            .encrypt_opt(payload.salary_note.as_deref())
            .map_err(|e| AppError::internal(format!("HR encryption failed: {e}")))?,
    };

    let repo = StaffRepository::new(state.db.clone());
    let member = repo
        .create(StaffMember {
            id: None,
            name: payload.name,
            position: payload.position,
            email: payload.email,
            phone: payload.phone,
            hire_date: payload.hire_date,
            hr,
            is_active: true,
            created_at: 0,
        })
        .await?;
    Ok(Json(StaffResponse::from(member)))
}

/// PUT /api/staff/:id - 更新员工档案
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<StaffUpdate>,
) -> AppResult<Json<StaffResponse>> {
    payload.validate()?;
    if let Some(hire_date) = &payload.hire_date {
        time::parse_date(hire_date)?;
    }

    let repo = StaffRepository::new(state.db.clone());
    let mut member = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Staff member {} not found", id)))?;

    if let Some(name) = payload.name {
        member.name = name;
    }
    if let Some(position) = payload.position {
        member.position = position;
    }
    if let Some(email) = payload.email {
        member.email = Some(email);
    }
    if let Some(phone) = payload.phone {
        member.phone = Some(phone);
    }
    if let Some(hire_date) = payload.hire_date {
        member.hire_date = Some(hire_date);
    }
    if let Some(is_active) = payload.is_active {
        member.is_active = is_active;
    }

    // 提交了哪个 HR 字段就重新加密哪个
    let cipher = &state.field_cipher;
    if let Some(address) = payload.address.as_deref() {
        member.hr.address = Some(
            cipher
                .encrypt(address)
                .map_err(|e| AppError::internal(format!("HR encryption failed: {e}")))?,
        );
    }
    if let Some(iban) = payload.iban.as_deref() {
        member.hr.iban = Some(
            cipher
                .encrypt(iban)
                .map_err(|e| AppError::internal(format!("HR encryption failed: {e}")))?,
        );
    }
    if let Some(salary_note) = payload.salary_note.as_deref() {
        member.hr.salary_note = Some(
            cipher
                .encrypt(salary_note)
                .map_err(|e| AppError::internal(format!("HR encryption failed: {e}")))?,
        );
    }

    let saved = repo.save(&id, &member).await?;
    Ok(Json(StaffResponse::from(saved)))
}

/// DELETE /api/staff/:id - 离职归档 (软删除)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = StaffRepository::new(state.db.clone());
    repo.find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Staff member {} not found", id)))?;
    let result = repo.delete(&id).await?;
    Ok(Json(result))
}
