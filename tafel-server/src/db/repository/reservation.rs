//! Reservation Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Reservation, ReservationStatus};
use crate::utils::time;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "reservation";

#[derive(Clone)]
pub struct ReservationRepository {
    base: BaseRepository,
}

impl ReservationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all reservations for a date (any status), ordered by time
    pub async fn find_by_date(&self, date: &str) -> RepoResult<Vec<Reservation>> {
        let reservations: Vec<Reservation> = self
            .base
            .db()
            .query("SELECT * FROM reservation WHERE date = $date ORDER BY time")
            .bind(("date", date.to_string()))
            .await?
            .take(0)?;
        Ok(reservations)
    }

    /// Find non-terminal reservations for a date (占用桌台/时段的预订)
    ///
    /// 终态 (completed/no_show/cancelled) 不再占用资源。
    pub async fn find_active_by_date(&self, date: &str) -> RepoResult<Vec<Reservation>> {
        let reservations: Vec<Reservation> = self
            .base
            .db()
            .query(
                "SELECT * FROM reservation WHERE date = $date AND status IN ['NEW', 'CONFIRMED', 'ARRIVED'] ORDER BY time",
            )
            .bind(("date", date.to_string()))
            .await?
            .take(0)?;
        Ok(reservations)
    }

    /// Find reservation by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Reservation>> {
        let thing = self.base.parse_id(id)?;
        let reservation: Option<Reservation> = self.base.db().select(thing).await?;
        Ok(reservation)
    }

    /// Persist a new reservation (业务校验在 handler/availability 层完成)
    pub async fn create(&self, mut reservation: Reservation) -> RepoResult<Reservation> {
        reservation.id = None;
        reservation.created_at = time::now_millis();
        let created: Option<Reservation> =
            self.base.db().create(TABLE).content(reservation).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create reservation".to_string()))
    }

    /// Replace mutable fields of a reservation
    pub async fn save(&self, id: &str, reservation: &Reservation) -> RepoResult<Reservation> {
        let thing = self.base.parse_id(id)?;
        self.base
            .db()
            .query("UPDATE $thing SET date = $date, time = $time, party_size = $party_size, guest = $guest, `table` = $table, `event` = $event, note = $note")
            .bind(("thing", thing))
            .bind(("date", reservation.date.clone()))
            .bind(("time", reservation.time.clone()))
            .bind(("party_size", reservation.party_size))
            .bind(("guest", reservation.guest.clone()))
            .bind(("table", reservation.table.clone()))
            .bind(("event", reservation.event.clone()))
            .bind(("note", reservation.note.clone()))
            .await?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Reservation {} not found", id)))
    }

    /// Set reservation status (状态机校验在调用方)
    pub async fn set_status(&self, id: &str, status: ReservationStatus) -> RepoResult<Reservation> {
        let thing = self.base.parse_id(id)?;
        self.base
            .db()
            .query("UPDATE $thing SET status = $status")
            .bind(("thing", thing))
            .bind(("status", status))
            .await?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Reservation {} not found", id)))
    }

    /// Hard delete a reservation
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = self.base.parse_id(id)?;
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
