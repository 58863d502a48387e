//! Marketing Content API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{
    ContentStatus, MarketingContent, MarketingContentCreate, MarketingContentUpdate,
};
use crate::db::repository::MarketingContentRepository;
use crate::utils::{AppError, AppResult};

/// GET /api/marketing - 获取所有营销素材
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<MarketingContent>>> {
    let repo = MarketingContentRepository::new(state.db.clone());
    let content = repo.find_all().await?;
    Ok(Json(content))
}

/// GET /api/marketing/:id - 获取单条素材
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MarketingContent>> {
    let repo = MarketingContentRepository::new(state.db.clone());
    let content = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Content {} not found", id)))?;
    Ok(Json(content))
}

/// POST /api/marketing - 创建素材 (初始为 draft)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MarketingContentCreate>,
) -> AppResult<Json<MarketingContent>> {
    payload.validate()?;
    let repo = MarketingContentRepository::new(state.db.clone());
    let content = repo.create(payload).await?;
    Ok(Json(content))
}

/// PUT /api/marketing/:id - 编辑素材 (仅 draft/review)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<MarketingContentUpdate>,
) -> AppResult<Json<MarketingContent>> {
    payload.validate()?;

    let repo = MarketingContentRepository::new(state.db.clone());
    let mut content = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Content {} not found", id)))?;

    if !content.status.is_editable() {
        return Err(AppError::business_rule(format!(
            "Content in status {:?} cannot be edited",
            content.status
        )));
    }

    if let Some(title) = payload.title {
        content.title = title;
    }
    if let Some(body) = payload.body {
        content.body = body;
    }
    if let Some(channel) = payload.channel {
        content.channel = channel;
    }

    let saved = repo.save_body(&id, &content).await?;
    Ok(Json(saved))
}

/// DELETE /api/marketing/:id - 删除素材 (仅 draft)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = MarketingContentRepository::new(state.db.clone());
    let content = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Content {} not found", id)))?;
    if content.status != ContentStatus::Draft {
        return Err(AppError::business_rule(
            "Only drafts can be deleted; archive published content instead",
        ));
    }
    let result = repo.delete(&id).await?;
    Ok(Json(result))
}

/// POST /api/marketing/:id/submit - 提交审核
pub async fn submit(
    state: State<ServerState>,
    path: Path<String>,
) -> AppResult<Json<MarketingContent>> {
    transition(state, path, ContentStatus::Review).await
}

/// POST /api/marketing/:id/approve - 审核通过
pub async fn approve(
    state: State<ServerState>,
    path: Path<String>,
) -> AppResult<Json<MarketingContent>> {
    transition(state, path, ContentStatus::Approved).await
}

/// POST /api/marketing/:id/reject - 退回草稿
pub async fn reject(
    state: State<ServerState>,
    path: Path<String>,
) -> AppResult<Json<MarketingContent>> {
    transition(state, path, ContentStatus::Draft).await
}

/// POST /api/marketing/:id/publish - 发布
pub async fn publish(
    state: State<ServerState>,
    path: Path<String>,
) -> AppResult<Json<MarketingContent>> {
    transition(state, path, ContentStatus::Published).await
}

/// POST /api/marketing/:id/archive - 归档
pub async fn archive(
    state: State<ServerState>,
    path: Path<String>,
) -> AppResult<Json<MarketingContent>> {
    transition(state, path, ContentStatus::Archived).await
}

/// 审批流迁移
async fn transition(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    to: ContentStatus,
) -> AppResult<Json<MarketingContent>> {
    let repo = MarketingContentRepository::new(state.db.clone());
    let content = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Content {} not found", id)))?;

    if !content.status.can_transition(to) {
        return Err(AppError::business_rule(format!(
            "Cannot move content from {:?} to {:?}",
            content.status, to
        )));
    }

    let updated = repo.set_status(&id, to).await?;
    tracing::info!(content = %id, from = ?content.status, to = ?to, "Content status changed");
    Ok(Json(updated))
}
