//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`areas`] - 区域管理接口
//! - [`tables`] - 桌台管理接口
//! - [`reservations`] - 预订管理接口
//! - [`availability`] - 可预订时段查询
//! - [`table_plan`] - 桌台占用看板
//! - [`combinations`] - 并桌管理接口
//! - [`event_blocks`] - 活动封场接口
//! - [`staff`] - 员工档案接口
//! - [`payments`] - 支付流水接口
//! - [`marketing`] - 营销素材接口
//! - [`reconciliations`] - POS 月度对账接口

pub mod health;

// Table plan domain
pub mod areas;
pub mod availability;
pub mod combinations;
pub mod event_blocks;
pub mod reservations;
pub mod table_plan;
pub mod tables;

// Back office domain
pub mod marketing;
pub mod payments;
pub mod reconciliations;
pub mod staff;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
