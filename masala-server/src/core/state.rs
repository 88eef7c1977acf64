use std::path::PathBuf;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::relay::ChangeAction;

use crate::core::Config;
use crate::db::{DbService, seed};
use crate::realtime::ChangeFeed;
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是整个服务端的显式上下文对象：一次构造，按引用（Clone
/// 为浅拷贝）传给所有处理器，不依赖任何全局注册表。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | change_feed | ChangeFeed | 行级变更总线 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// 行级变更总线 (订单/行项 → SSE 中继)
    pub change_feed: ChangeFeed,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/masala.db)
    /// 3. 初次启动种子数据 (角色 / admin / 设置)
    /// 4. 变更总线
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        // 0. Ensure work_dir structure exists
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {}", e)))?;

        // 1. Initialize DB
        let db_path = config.database_dir().join("masala.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;
        let db = db_service.db;

        // 2. Seed defaults on first start
        seed::seed(&db).await?;

        // 3. Change feed
        let change_feed = ChangeFeed::with_capacity(config.change_feed_capacity);

        Ok(Self {
            config: config.clone(),
            db,
            change_feed,
        })
    }

    /// 测试用：围绕已打开的数据库构造状态
    pub fn with_db(config: Config, db: Surreal<Db>) -> Self {
        Self {
            change_feed: ChangeFeed::with_capacity(config.change_feed_capacity),
            config,
            db,
        }
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取工作目录
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }

    /// 广播订单行变更
    pub fn broadcast_order_change(&self, action: ChangeAction, order_id: &str) {
        self.change_feed.publish_order(action, order_id);
    }

    /// 广播行项变更 (携带所属订单 id)
    pub fn broadcast_item_change(&self, action: ChangeAction, order_id: &str, item_id: &str) {
        self.change_feed.publish_order_item(action, order_id, item_id);
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 之前调用
    ///
    /// 启动的任务：
    /// - 会话过期清理 (每小时)
    pub fn start_background_tasks(&self) {
        let db = self.db.clone();
        tokio::spawn(async move {
            let repo = crate::db::repository::SessionRepository::new(db);
            let mut tick = tokio::time::interval(std::time::Duration::from_secs(3600));
            loop {
                tick.tick().await;
                if let Err(e) = repo.purge_expired().await {
                    tracing::warn!(error = %e, "Session purge failed");
                }
            }
        });
    }
}
