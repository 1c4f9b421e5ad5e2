//! Ticket Server - 活动票务预订服务
//!
//! # 架构概述
//!
//! 本模块是 Ticket Server 的主入口，提供以下核心功能：
//!
//! - **库存存储** (`inventory`): 每个活动的权威容量计数，三个原子原语
//! - **预订台账** (`bookings`): 预订状态机 + 数量核算，与库存永不偏离
//! - **管理协调器** (`admin`): 容量编辑、删除级联、账号停用
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): JWT + Argon2 认证体系，能力门控
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! ticket-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、能力
//! ├── db/            # 数据库层
//! ├── inventory/     # 库存容量原语
//! ├── bookings/      # 预订台账
//! ├── admin/         # 管理协调器
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 工具函数
//! ```

pub mod admin;
pub mod api;
pub mod auth;
pub mod bookings;
pub mod core;
pub mod db;
pub mod inventory;
pub mod utils;

// Re-export 公共类型
pub use admin::AdminCoordinator;
pub use auth::{Capability, CurrentUser, JwtService};
pub use bookings::{BookingLedger, LedgerError, ReconcileReport};
pub use core::{Config, Server, ServerState};
pub use inventory::{InventoryError, InventoryStore};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

// Consistency alerting macro - 库存一致性告警走独立 target，
// 便于运维侧单独订阅
#[macro_export]
macro_rules! consistency_alert {
    ($($key:ident = $value:expr),* $(,)?) => {
        tracing::error!(
            target: "consistency",
            $($key = $value,)*
            "Inventory consistency violation - event paused until reconciled"
        );
    };
}

/// 设置运行环境 (dotenv, 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    utils::logger::init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
  ______   _         __             __
 /_  __/  (_)  _____/ /__ ___  ____/ /
  / /    / /  / ___/ //_// _ \/ __  /
 / /    / /  / /__/ ,<  /  __/ /_/ /
/_/    /_/   \___/_/|_| \___/\__,_/
    ____
   / __/ ___   ____ _  __ ___   ____
  _\ \  / -_) / __/| |/ // -_) / __/
 /___/  \__/ /_/   |___/ \__/ /_/
    "#
    );
}
