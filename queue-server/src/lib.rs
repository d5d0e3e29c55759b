//! QueueLine Server - 餐厅虚拟排队服务
//!
//! # 架构概述
//!
//! 本模块是排队服务的主入口，提供以下核心功能：
//!
//! - **队列引擎** (`queue`): 位置排序、入队/叫号/入座/跳过状态机
//! - **宽限期** (`queue::grace`): 持久化绝对到期时间 + 后台扫描
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **消息总线** (`message`): 队列/餐厅快照的实时扇出
//! - **认证** (`auth`): JWT 校验与店主权限门控
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! queue-server/src/
//! ├── core/          # 配置、状态、后台任务
//! ├── auth/          # JWT 校验、店主门控
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 错误、日志、地理、时间工具
//! ├── db/            # 数据库层 (模型 + 仓储)
//! ├── message/       # 消息总线
//! └── queue/         # 队列排序引擎 + 宽限期状态机
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod message;
pub mod queue;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use message::MessageBus;
pub use queue::{QueueEngine, QueueError, WaitEstimate};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 环境初始化 (dotenv + 日志)
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let log_level = std::env::var("LOG_LEVEL").ok();
    init_logger_with_file(log_level.as_deref(), std::env::var("LOG_DIR").ok().as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ____                          __    _
  / __ \__  _____  __  _____   / /   (_)___  ___
 / / / / / / / _ \/ / / / _ \ / /   / / __ \/ _ \
/ /_/ / /_/ /  __/ /_/ /  __// /___/ / / / /  __/
\___\_\__,_/\___/\__,_/\___//_____/_/_/ /_/\___/
    "#
    );
}
