use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::availability::SlotGrid;
use crate::core::Config;
use crate::db::DbService;
use crate::hr_crypto::FieldCipher;
use crate::utils::time;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是后台节点的核心数据结构，使用 Arc 实现浅拷贝，
/// 克隆成本极低，可直接作为 axum 的应用状态。
///
/// # 组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | slot_grid | Arc<SlotGrid> | 营业时段网格 |
/// | field_cipher | Arc<FieldCipher> | HR 字段加密 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// 营业时段网格 (由配置解析)
    pub slot_grid: Arc<SlotGrid>,
    /// HR 字段加密服务
    pub field_cipher: Arc<FieldCipher>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (确保目录存在)
    /// 2. 数据库 (work_dir/database)
    /// 3. 时段网格与 HR 加密
    ///
    /// # Panics
    ///
    /// 数据库初始化或配置解析失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        // 0. Ensure work_dir structure exists
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        // 1. Initialize DB
        let db_dir = config.database_dir();
        let db_path_str = db_dir.to_string_lossy();
        let db_service = DbService::new(&db_path_str)
            .await
            .expect("Failed to initialize database");

        // 2. Slot grid from opening hours config
        let slot_grid = SlotGrid::parse(
            &config.opening_hours,
            config.slot_minutes,
            config.reservation_slots,
            time::parse_weekday(&config.closed_weekday),
        )
        .expect("Invalid opening hours configuration");

        // 3. HR field cipher
        let field_cipher = match &config.hr_key {
            Some(key) => FieldCipher::from_hex(key).expect("Invalid HR_KEY"),
            None if config.is_production() => {
                panic!("HR_KEY must be configured in production")
            }
            None => {
                tracing::warn!("HR_KEY not set, using development key");
                FieldCipher::development()
            }
        };

        Self {
            config: config.clone(),
            db: db_service.db,
            slot_grid: Arc::new(slot_grid),
            field_cipher: Arc::new(field_cipher),
        }
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 工作目录
    pub fn work_dir(&self) -> std::path::PathBuf {
        std::path::PathBuf::from(&self.config.work_dir)
    }
}
