// ==========================================
// 线索分配系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::distribution_config_trait::DistributionConfigReader;
use crate::db::open_sqlite_connection;
use crate::engine::distribution::DEFAULT_TARGET_COUNT;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// 上传文件默认大小上限: 10 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// 配置键
pub mod config_keys {
    pub const TARGET_COUNT: &str = "distribution/target_count";
    pub const MAX_UPLOAD_BYTES: &str = "upload/max_file_bytes";
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        Ok(self.conn.lock()?)
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 配置（INSERT OR REPLACE）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// 所有 global 配置的快照
    pub fn get_config_snapshot(&self) -> RepositoryResult<HashMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

        let mut snapshot = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            snapshot.insert(key, value);
        }
        Ok(snapshot)
    }

    /// 读取正整数配置，缺省时使用默认值
    fn get_positive_usize(&self, key: &str, default: usize) -> RepositoryResult<usize> {
        match self.get_global_config_value(key)? {
            None => Ok(default),
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(v) if v > 0 => Ok(v),
                _ => Err(RepositoryError::FieldValueError {
                    field: key.to_string(),
                    message: format!("期望正整数，实际为 '{}'", raw),
                }),
            },
        }
    }
}

#[async_trait]
impl DistributionConfigReader for ConfigManager {
    async fn get_target_count(&self) -> RepositoryResult<usize> {
        self.get_positive_usize(config_keys::TARGET_COUNT, DEFAULT_TARGET_COUNT)
    }

    async fn get_max_upload_bytes(&self) -> RepositoryResult<usize> {
        self.get_positive_usize(config_keys::MAX_UPLOAD_BYTES, DEFAULT_MAX_UPLOAD_BYTES)
    }
}
