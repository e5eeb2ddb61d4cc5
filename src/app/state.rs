// ==========================================
// 线索分配系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享连接和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::UploadApi;
use crate::db::{init_schema, open_sqlite_connection, read_schema_version, CURRENT_SCHEMA_VERSION};

/// 应用状态
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 名单上传API
    pub upload_api: Arc<UploadApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开共享连接并建表（幂等）
    /// 2. 创建API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;

        match read_schema_version(&conn) {
            Ok(Some(v)) if v != CURRENT_SCHEMA_VERSION => {
                tracing::warn!(
                    found = v,
                    expected = CURRENT_SCHEMA_VERSION,
                    "数据库 schema_version 与当前代码不一致"
                );
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("读取 schema_version 失败(将继续启动): {}", e),
        }

        let conn = Arc::new(Mutex::new(conn));
        let upload_api = Arc::new(UploadApi::new(conn));

        tracing::info!("AppState初始化完成");
        Ok(Self {
            db_path,
            upload_api,
        })
    }
}

// ==========================================
// 数据库路径
// ==========================================

/// 获取默认数据库路径
///
/// # 返回
/// - 环境变量 LEAD_DISPATCH_DB_PATH（非空时）
/// - 用户数据目录/lead-dispatch/lead_dispatch.db
/// - 回退: ./lead_dispatch.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("LEAD_DISPATCH_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./lead_dispatch.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("lead-dispatch");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("lead_dispatch.db");
        }
    }

    path.to_string_lossy().to_string()
}
