//! Table Plan API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use surrealdb::RecordId;

use crate::core::ServerState;
use crate::db::repository::{
    DiningTableRepository, EventBlockRepository, ReservationRepository,
    TableCombinationRepository,
};
use crate::table_plan::{OccupancyBoard, aggregate};
use crate::utils::{AppError, AppResult, time};

/// Occupancy query parameters
#[derive(Debug, Deserialize)]
pub struct OccupancyQuery {
    pub date: String,
    pub time: String,
    /// 区域过滤 (可选): "area:xxx"
    pub area: Option<String>,
}

/// GET /api/table-plan - 某时段的桌台占用看板
pub async fn occupancy(
    State(state): State<ServerState>,
    Query(query): Query<OccupancyQuery>,
) -> AppResult<Json<OccupancyBoard>> {
    let date = time::parse_date(&query.date)?;
    let slot = time::parse_time(&query.time)?;
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
        .find_by_date(&query.date)
        .await?;
    let combinations = TableCombinationRepository::new(state.db.clone())
        .find_by_date(&query.date)
        .await?;
    let blocks = EventBlockRepository::new(state.db.clone())
        .find_by_date(&query.date)
        .await?;

    let board = aggregate(
        &state.slot_grid,
        date,
        slot,
        area_filter.as_ref(),
        &tables,
        &reservations,
        &combinations,
        &blocks,
    );
    Ok(Json(board))
}
