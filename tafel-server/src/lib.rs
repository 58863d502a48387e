//! Tafel Back-Office Server - 餐厅后台管理服务
//!
//! # 架构概述
//!
//! 本模块是后台服务的主入口，提供以下核心功能：
//!
//! - **预订** (`api/reservations`): 预订登记与状态流转
//! - **可用性** (`availability`): 时段网格 + 线性过滤解析
//! - **桌台平面图** (`table_plan`): 并桌校验与占用聚合
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **对账** (`reconcile`): POS 月度对账
//! - **HR 加密** (`hr_crypto`): 员工敏感字段 AEAD 加密
//!
//! # 模块结构
//!
//! ```text
//! tafel-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层
//! ├── availability/  # 时段网格与可用性
//! ├── table_plan/    # 并桌与占用
//! ├── reconcile/     # POS 对账
//! ├── hr_crypto/     # HR 字段加密
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod availability;
pub mod core;
pub mod db;
pub mod hr_crypto;
pub mod reconcile;
pub mod table_plan;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState, build_app};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
///
/// 在加载配置之前调用，保证 .env 里的变量生效。
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();

    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(None, log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
  ______      ____     __
 /_  __/___ _/ __/__  / /
  / / / __ `/ /_/ _ \/ /
 / / / /_/ / __/  __/ /
/_/  \__,_/_/  \___/_/
   Back-Office Server
    "#
    );
}
