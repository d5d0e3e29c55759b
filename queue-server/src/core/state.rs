use std::sync::Arc;
use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::error::{Result, ServerError};
use crate::core::{BackgroundTasks, Config, TaskKind};
use crate::db;
use crate::message::MessageBus;
use crate::queue::{GraceSweeper, QueueEngine};
use crate::utils::time;

/// 服务器状态 - 持有所有服务的单例引用
///
/// 使用 Arc 实现浅拷贝，clone 成本极低；axum 每个请求都会 clone 一次。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | 嵌入式数据库 (SurrealDB) |
/// | bus | 消息总线 (快照扇出) |
/// | engine | 队列排序引擎 |
/// | jwt_service | JWT 认证服务 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub bus: MessageBus,
    pub engine: Arc<QueueEngine>,
    pub jwt_service: Arc<JwtService>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .finish()
    }
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (确保目录存在)
    /// 2. 数据库 (work_dir/database/queueline.db)
    /// 3. 消息总线、队列引擎、JWT 服务
    pub async fn initialize(config: &Config) -> Result<Self> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| ServerError::Config(format!("Failed to create work dir: {e}")))?;

        let db_path = config.database_dir().join("queueline.db");
        let db = db::open(&db_path)
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;

        let bus = MessageBus::new();
        let tz = time::parse_timezone(&config.business_timezone);
        let engine = Arc::new(QueueEngine::new(db.clone(), bus.clone(), tz));
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Ok(Self {
            config: config.clone(),
            db,
            bus,
            engine,
            jwt_service,
        })
    }

    /// 测试用：内存数据库上的状态
    pub async fn initialize_in_memory(config: &Config) -> Result<Self> {
        let db = db::open_in_memory()
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;

        let bus = MessageBus::new();
        let tz = time::parse_timezone(&config.business_timezone);
        let engine = Arc::new(QueueEngine::new(db.clone(), bus.clone(), tz));
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Ok(Self {
            config: config.clone(),
            db,
            bus,
            engine,
            jwt_service,
        })
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 内、HTTP 服务启动前调用。
    ///
    /// 启动的任务：
    /// - 宽限期扫描器 (GraceSweeper, Periodic)
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let sweeper = GraceSweeper::new(
            self.engine.clone(),
            Duration::from_secs(self.config.sweep_interval_secs),
            tasks.shutdown_token(),
        );
        tasks.spawn("grace_sweeper", TaskKind::Periodic, sweeper.run());

        tasks
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
