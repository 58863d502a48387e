//! Staff Repository
//!
//! HR 字段入库前已由 handler 层加密，repository 只存取密文。

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::StaffMember;
use crate::utils::time;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "staff";

#[derive(Clone)]
pub struct StaffRepository {
    base: BaseRepository,
}

impl StaffRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active staff members
    pub async fn find_all(&self) -> RepoResult<Vec<StaffMember>> {
        let staff: Vec<StaffMember> = self
            .base
            .db()
            .query("SELECT * FROM staff WHERE is_active = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(staff)
    }

    /// Find staff member by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<StaffMember>> {
        let thing = self.base.parse_id(id)?;
        let member: Option<StaffMember> = self.base.db().select(thing).await?;
        Ok(member)
    }

    /// Persist a new staff member
    pub async fn create(&self, mut member: StaffMember) -> RepoResult<StaffMember> {
        member.id = None;
        member.created_at = time::now_millis();
        let created: Option<StaffMember> = self.base.db().create(TABLE).content(member).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create staff member".to_string()))
    }

    /// Replace mutable fields of a staff member
    pub async fn save(&self, id: &str, member: &StaffMember) -> RepoResult<StaffMember> {
        let thing = self.base.parse_id(id)?;
        self.base
            .db()
            .query("UPDATE $thing SET name = $name, position = $position, email = $email, phone = $phone, hire_date = $hire_date, hr = $hr, is_active = $is_active")
            .bind(("thing", thing))
            .bind(("name", member.name.clone()))
            .bind(("position", member.position.clone()))
            .bind(("email", member.email.clone()))
            .bind(("phone", member.phone.clone()))
            .bind(("hire_date", member.hire_date.clone()))
            .bind(("hr", member.hr.clone()))
            .bind(("is_active", member.is_active))
            .await?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Staff member {} not found", id)))
    }

    /// Soft delete a staff member (档案保留)
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = self.base.parse_id(id)?;
        self.base
            .db()
            .query("UPDATE $thing SET is_active = false")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
