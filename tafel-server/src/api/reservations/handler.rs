//! Reservation API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveTime;
use serde::Deserialize;
use surrealdb::RecordId;
use validator::Validate;

use crate::availability::resolver::{block_applies_to_area, block_covers_window};
use crate::core::ServerState;
use crate::db::models::{Reservation, ReservationCreate, ReservationStatus, ReservationUpdate};
use crate::db::repository::{
    DiningTableRepository, EventBlockRepository, ReservationRepository,
};
use crate::utils::{AppError, AppResult, time};

/// List query (按日期查询)
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub date: String,
}

/// GET /api/reservations?date=YYYY-MM-DD - 获取某日全部预订
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Reservation>>> {
    time::parse_date(&query.date)?;
    let repo = ReservationRepository::new(state.db.clone());
    let reservations = repo.find_by_date(&query.date).await?;
    Ok(Json(reservations))
}

/// GET /api/reservations/:id - 获取单个预订
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    let repo = ReservationRepository::new(state.db.clone());
    let reservation = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Reservation {} not found", id)))?;
    Ok(Json(reservation))
}

/// POST /api/reservations - 预订登记
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<Json<Reservation>> {
    payload.validate()?;
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

    let table = match &payload.table {
        Some(table_id) => Some(
            ensure_table_assignable(
                &state,
                &payload.date,
                slot,
                payload.party_size,
                table_id,
                None,
            )
            .await?,
        ),
        None => None,
    };

    let event = match &payload.event {
        Some(e) => Some(parse_record_id(e)?),
        None => None,
    };

    let repo = ReservationRepository::new(state.db.clone());
    let reservation = repo
        .create(Reservation {
            id: None,
            date: payload.date,
            time: payload.time,
            party_size: payload.party_size,
            guest: payload.guest,
            status: ReservationStatus::New,
            table,
            event,
            note: payload.note,
            created_at: 0,
        })
        .await?;
    Ok(Json(reservation))
}

/// PUT /api/reservations/:id - 更新预订 (仅未终态)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ReservationUpdate>,
) -> AppResult<Json<Reservation>> {
    payload.validate()?;

    let repo = ReservationRepository::new(state.db.clone());
    let mut reservation = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Reservation {} not found", id)))?;

    if reservation.status.is_terminal() {
        return Err(AppError::business_rule(
            "Reservation is already closed and cannot be changed",
        ));
    }

    if let Some(date) = payload.date {
        time::parse_date(&date)?;
        reservation.date = date;
    }
    if let Some(t) = payload.time {
        time::parse_time(&t)?;
        reservation.time = t;
    }
    if let Some(party_size) = payload.party_size {
        reservation.party_size = party_size;
    }
    if let Some(guest) = payload.guest {
        reservation.guest = guest;
    }
    if let Some(note) = payload.note {
        reservation.note = Some(note);
    }
    if let Some(event) = payload.event {
        reservation.event = Some(parse_record_id(&event)?);
    }

    let date = time::parse_date(&reservation.date)?;
    let slot = time::parse_time(&reservation.time)?;
    if state.slot_grid.is_closed(date) {
        return Err(AppError::business_rule(format!(
            "Restaurant is closed on {}",
            reservation.date
        )));
    }
    if !state.slot_grid.is_slot(slot) {
        return Err(AppError::validation(format!(
            "Time {} is not on the reservation grid",
            reservation.time
        )));
    }

    // 桌台重新校验：显式改桌，或日期/时间/人数变化后原桌需复核
    if let Some(table_id) = payload.table {
        reservation.table = Some(
            ensure_table_assignable(
                &state,
                &reservation.date,
                slot,
                reservation.party_size,
                &table_id,
                Some(&id),
            )
            .await?,
        );
    } else if let Some(existing_table) = reservation.table.clone() {
        reservation.table = Some(
            ensure_table_assignable(
                &state,
                &reservation.date,
                slot,
                reservation.party_size,
                &existing_table.to_string(),
                Some(&id),
            )
            .await?,
        );
    }

    let saved = repo.save(&id, &reservation).await?;
    Ok(Json(saved))
}

/// DELETE /api/reservations/:id - 删除预订
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = ReservationRepository::new(state.db.clone());
    repo.find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Reservation {} not found", id)))?;
    let result = repo.delete(&id).await?;
    Ok(Json(result))
}

/// POST /api/reservations/:id/confirm - 确认预订
pub async fn confirm(
    state: State<ServerState>,
    path: Path<String>,
) -> AppResult<Json<Reservation>> {
    transition(state, path, ReservationStatus::Confirmed).await
}

/// POST /api/reservations/:id/arrive - 客人到店
pub async fn arrive(
    state: State<ServerState>,
    path: Path<String>,
) -> AppResult<Json<Reservation>> {
    transition(state, path, ReservationStatus::Arrived).await
}

/// POST /api/reservations/:id/complete - 用餐结束
pub async fn complete(
    state: State<ServerState>,
    path: Path<String>,
) -> AppResult<Json<Reservation>> {
    transition(state, path, ReservationStatus::Completed).await
}

/// POST /api/reservations/:id/no-show - 标记未到店
pub async fn no_show(
    state: State<ServerState>,
    path: Path<String>,
) -> AppResult<Json<Reservation>> {
    transition(state, path, ReservationStatus::NoShow).await
}

/// POST /api/reservations/:id/cancel - 取消预订
pub async fn cancel(
    state: State<ServerState>,
    path: Path<String>,
) -> AppResult<Json<Reservation>> {
    transition(state, path, ReservationStatus::Cancelled).await
}

/// 状态机迁移
async fn transition(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    to: ReservationStatus,
) -> AppResult<Json<Reservation>> {
    let repo = ReservationRepository::new(state.db.clone());
    let reservation = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Reservation {} not found", id)))?;

    if !reservation.status.can_transition(to) {
        return Err(AppError::business_rule(format!(
            "Cannot move reservation from {:?} to {:?}",
            reservation.status, to
        )));
    }

    let updated = repo.set_status(&id, to).await?;
    tracing::info!(reservation = %id, from = ?reservation.status, to = ?to, "Reservation status changed");
    Ok(Json(updated))
}

fn parse_record_id(id: &str) -> AppResult<RecordId> {
    id.parse()
        .map_err(|_| AppError::validation(format!("Invalid ID: {}", id)))
}

/// 校验桌台可分配：存在、启用、容量匹配、无冲突、未被封场
///
/// `exclude` 用于更新场景，跳过预订自身的占用。
async fn ensure_table_assignable(
    state: &ServerState,
    date: &str,
    slot: NaiveTime,
    party_size: i32,
    table_id: &str,
    exclude: Option<&str>,
) -> AppResult<RecordId> {
    let table_repo = DiningTableRepository::new(state.db.clone());
    let table = table_repo
        .find_by_id(table_id)
        .await?
        .ok_or_else(|| AppError::validation(format!("Dining table {} not found", table_id)))?;

    if !table.is_active {
        return Err(AppError::business_rule(format!(
            "Table '{}' is not active",
            table.number
        )));
    }
    if !table.fits_party(party_size) {
        return Err(AppError::business_rule(format!(
            "Table '{}' seats {}..{}, party of {} does not fit",
            table.number, table.min_seats, table.max_seats, party_size
        )));
    }

    // 封场检查：整店或桌台所在区域
    let block_repo = EventBlockRepository::new(state.db.clone());
    let win = state.slot_grid.occupied_window(slot);
    let blocked = block_repo
        .find_by_date(date)
        .await?
        .iter()
        .any(|b| block_applies_to_area(b, &table.area) && block_covers_window(b, win));
    if blocked {
        return Err(AppError::business_rule(format!(
            "Table '{}' is blocked by an event in this time window",
            table.number
        )));
    }

    // 冲突检查：同桌未终态预订窗口重叠
    let reservation_repo = ReservationRepository::new(state.db.clone());
    let table_key = table
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_else(|| table_id.to_string());
    for other in reservation_repo.find_active_by_date(date).await? {
        if let Some(other_id) = other.id.as_ref()
            && exclude == Some(other_id.to_string().as_str())
        {
            continue;
        }
        if other.table.as_ref().map(|t| t.to_string()) != Some(table_key.clone()) {
            continue;
        }
        let Ok(other_time) = NaiveTime::parse_from_str(&other.time, "%H:%M") else {
            continue;
        };
        if state.slot_grid.windows_overlap(other_time, slot) {
            return Err(AppError::Conflict(format!(
                "Table '{}' is already reserved around {}",
                table.number, other.time
            )));
        }
    }

    table
        .id
        .ok_or_else(|| AppError::internal("Table record without id"))
}
