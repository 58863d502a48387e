//! Table Combination API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{TableCombination, TableCombinationCreate};
use crate::db::repository::{DiningTableRepository, TableCombinationRepository};
use crate::table_plan::validate_members;
use crate::utils::{AppError, AppResult, time};

/// List query (按日期查询)
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub date: String,
}

/// Dry-run 校验结果
#[derive(Debug, Serialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_capacity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// GET /api/combinations?date=YYYY-MM-DD - 获取某日并桌
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<TableCombination>>> {
    time::parse_date(&query.date)?;
    let repo = TableCombinationRepository::new(state.db.clone());
    let combos = repo.find_by_date(&query.date).await?;
    Ok(Json(combos))
}

/// GET /api/combinations/:id - 获取单个并桌
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<TableCombination>> {
    let repo = TableCombinationRepository::new(state.db.clone());
    let combo = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Combination {} not found", id)))?;
    Ok(Json(combo))
}

/// POST /api/combinations - 创建并桌 (完整校验)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TableCombinationCreate>,
) -> AppResult<Json<TableCombination>> {
    let date = time::parse_date(&payload.date)?;
    let slot = time::parse_time(&payload.time)?;
    if state.slot_grid.is_closed(date) {
        return Err(AppError::business_rule(format!(
            "Restaurant is closed on {}",
            payload.date
        )));
    }
    if !state.slot_grid.is_slot(slot) {
        return Err(AppError::validation(format!(
            "Time {} is not on the reservation grid",
            payload.time
        )));
    }

    let table_repo = DiningTableRepository::new(state.db.clone());
    let members = table_repo.find_by_ids(&payload.tables).await?;

    let combo_repo = TableCombinationRepository::new(state.db.clone());
    let existing = combo_repo.find_by_slot(&payload.date, &payload.time).await?;

    let total_capacity = validate_members(&members, &existing)?;

    let combo = combo_repo
        .create(TableCombination {
            id: None,
            date: payload.date,
            time: payload.time,
            tables: members.into_iter().filter_map(|t| t.id).collect(),
            total_capacity,
            note: payload.note,
            created_at: 0,
        })
        .await?;
    Ok(Json(combo))
}

/// POST /api/combinations/validate - Dry-run 校验，不落库
pub async fn validate(
    State(state): State<ServerState>,
    Json(payload): Json<TableCombinationCreate>,
) -> AppResult<Json<ValidationOutcome>> {
    time::parse_date(&payload.date)?;
    time::parse_time(&payload.time)?;

    let table_repo = DiningTableRepository::new(state.db.clone());
    let members = match table_repo.find_by_ids(&payload.tables).await {
        Ok(members) => members,
        Err(e) => {
            return Ok(Json(ValidationOutcome {
                valid: false,
                total_capacity: None,
                reason: Some(e.to_string()),
            }));
        }
    };

    let combo_repo = TableCombinationRepository::new(state.db.clone());
    let existing = combo_repo.find_by_slot(&payload.date, &payload.time).await?;

    let outcome = match validate_members(&members, &existing) {
        Ok(total_capacity) => ValidationOutcome {
            valid: true,
            total_capacity: Some(total_capacity),
            reason: None,
        },
        Err(e) => ValidationOutcome {
            valid: false,
            total_capacity: None,
            reason: Some(e.to_string()),
        },
    };
    Ok(Json(outcome))
}

/// DELETE /api/combinations/:id - 解除并桌
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = TableCombinationRepository::new(state.db.clone());
    repo.find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Combination {} not found", id)))?;
    let result = repo.delete(&id).await?;
    Ok(Json(result))
}
