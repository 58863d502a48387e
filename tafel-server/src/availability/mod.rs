//! Availability
//!
//! 时段网格与可用性解析：
//! - [`grid`] - 营业时间 → 固定时段网格
//! - [`resolver`] - 线性过滤出仍可预订的时段

pub mod grid;
pub mod resolver;

pub use grid::{OpeningWindow, SlotGrid};
pub use resolver::{AvailabilityResult, SlotAvailability, resolve};
