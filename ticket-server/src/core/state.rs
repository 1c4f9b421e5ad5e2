use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::admin::AdminCoordinator;
use crate::auth::JwtService;
use crate::bookings::BookingLedger;
use crate::core::Config;
use crate::db::DbService;
use crate::inventory::InventoryStore;
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是核心数据结构，持有所有服务的共享引用。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | inventory | InventoryStore | 库存容量原语 |
/// | ledger | Arc<BookingLedger> | 预订台账 |
/// | coordinator | Arc<AdminCoordinator> | 管理级联操作 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// 库存容量存储
    pub inventory: InventoryStore,
    /// 预订台账
    pub ledger: Arc<BookingLedger>,
    /// 管理协调器
    pub coordinator: Arc<AdminCoordinator>,
    jwt_service: Arc<JwtService>,
    /// 进程实例 ID，每次启动重新生成，用于日志关联
    pub instance: String,
}

impl ServerState {
    /// 初始化所有服务
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db_service = DbService::new(&config.data_dir).await?;
        Ok(Self::from_db(config.clone(), db_service))
    }

    /// 基于已打开的数据库组装状态 (测试用内存库也走这里)
    pub fn from_db(config: Config, db_service: DbService) -> Self {
        let db = db_service.db;
        let inventory = InventoryStore::new(db.clone());
        let ledger = Arc::new(BookingLedger::new(
            db.clone(),
            inventory.clone(),
            config.max_tickets_per_booking,
        ));
        let coordinator = Arc::new(AdminCoordinator::new(
            db.clone(),
            inventory.clone(),
            ledger.clone(),
        ));
        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));
        let instance = uuid::Uuid::new_v4().to_string();

        tracing::info!(instance = %instance, "Server state initialized");

        Self {
            config,
            db,
            inventory,
            ledger,
            coordinator,
            jwt_service,
            instance,
        }
    }

    /// 获取 JWT 服务
    pub fn jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
