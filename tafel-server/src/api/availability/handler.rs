//! Availability API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use surrealdb::RecordId;

use crate::availability::{AvailabilityResult, resolve};
use crate::core::ServerState;
use crate::db::repository::{
    DiningTableRepository, EventBlockRepository, ReservationRepository,
    TableCombinationRepository,
};
use crate::utils::{AppError, AppResult, time};

/// Availability query parameters
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
    pub party_size: i32,
    /// 具体时间 (可选): 响应额外回答该时段是否开放
    pub time: Option<String>,
    /// 区域过滤 (可选): "area:xxx"
    pub area: Option<String>,
}

/// GET /api/availability - 查询某日可预订时段
pub async fn query(
    State(state): State<ServerState>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<AvailabilityResult>> {
    if query.party_size < 1 {
        return Err(AppError::validation("party_size must be at least 1"));
    }
    let date = time::parse_date(&query.date)?;
    let requested_time = query.time.as_deref().map(time::parse_time).transpose()?;
    let area_filter: Option<RecordId> = query
        .area
        .as_deref()
        .map(|a| {
            a.parse()
                .map_err(|_| AppError::validation(format!("Invalid area ID: {}", a)))
        })
        .transpose()?;

    let tables = DiningTableRepository::new(state.db.clone()).find_all().await?;
    let reservations = ReservationRepository::new(state.db.clone())
        .find_active_by_date(&query.date)
        .await?;
    let combinations = TableCombinationRepository::new(state.db.clone())
        .find_by_date(&query.date)
        .await?;
    let blocks = EventBlockRepository::new(state.db.clone())
        .find_by_date(&query.date)
        .await?;

    let result = resolve(
        &state.slot_grid,
        date,
        query.party_size,
        area_filter.as_ref(),
        requested_time,
        &tables,
        &reservations,
        &combinations,
        &blocks,
    );
    Ok(Json(result))
}
