//! Table Plan
//!
//! 桌台平面图相关的规则逻辑：
//! - [`combination`] - 并桌校验
//! - [`occupancy`] - 占用状态聚合

pub mod combination;
pub mod occupancy;

pub use combination::{CombinationError, validate_members};
pub use occupancy::{CombinationOccupancy, OccupancyBoard, TableOccupancy, TableStatus, aggregate};
