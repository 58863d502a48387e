//! Event Block API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{EventBlock, EventBlockCreate, EventBlockUpdate};
use crate::db::repository::EventBlockRepository;
use crate::utils::{AppError, AppResult, time};

/// List query (按日期查询)
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub date: String,
}

/// GET /api/event-blocks?date=YYYY-MM-DD - 获取某日封场
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<EventBlock>>> {
    time::parse_date(&query.date)?;
    let repo = EventBlockRepository::new(state.db.clone());
    let blocks = repo.find_by_date(&query.date).await?;
    Ok(Json(blocks))
}

/// GET /api/event-blocks/:id - 获取单个封场
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<EventBlock>> {
    let repo = EventBlockRepository::new(state.db.clone());
    let block = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Event block {} not found", id)))?;
    Ok(Json(block))
}

/// POST /api/event-blocks - 创建封场
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<EventBlockCreate>,
) -> AppResult<Json<EventBlock>> {
    time::parse_date(&payload.date)?;
    if let Some(start) = &payload.start_time {
        time::parse_time(start)?;
    }
    if let Some(end) = &payload.end_time {
        time::parse_time(end)?;
    }

    let repo = EventBlockRepository::new(state.db.clone());
    let block = repo.create(payload).await?;
    Ok(Json(block))
}

/// PUT /api/event-blocks/:id - 更新封场
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<EventBlockUpdate>,
) -> AppResult<Json<EventBlock>> {
    if let Some(date) = &payload.date {
        time::parse_date(date)?;
    }
    if let Some(start) = &payload.start_time {
        time::parse_time(start)?;
    }
    if let Some(end) = &payload.end_time {
        time::parse_time(end)?;
    }

    let repo = EventBlockRepository::new(state.db.clone());
    let block = repo.update(&id, payload).await?;
    Ok(Json(block))
}

/// DELETE /api/event-blocks/:id - 删除封场
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = EventBlockRepository::new(state.db.clone());
    repo.find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Event block {} not found", id)))?;
    let result = repo.delete(&id).await?;
    Ok(Json(result))
}
