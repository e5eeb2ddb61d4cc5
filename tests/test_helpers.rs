// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库初始化、坐席名册种子数据、名单 CSV 生成、Mock 实现
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use lead_dispatch::config::DistributionConfigReader;
use lead_dispatch::domain::{Assignment, TargetIdentity, WorkItem};
use lead_dispatch::repository::{
    AssignmentRepository, AssignmentStore, RepositoryError, RepositoryResult,
};
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = lead_dispatch::db::open_sqlite_connection(&db_path)?;
    lead_dispatch::db::init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开共享连接（与 AppState 的组装方式一致）
pub fn open_shared_conn(db_path: &str) -> Arc<Mutex<Connection>> {
    let conn = lead_dispatch::db::open_sqlite_connection(db_path).unwrap();
    Arc::new(Mutex::new(conn))
}

/// 写入 n 个坐席，按创建顺序返回 agent_id
///
/// created_at 显式递增，保证名册顺序稳定
pub fn seed_agents(db_path: &str, n: usize) -> Vec<String> {
    let conn = lead_dispatch::db::open_sqlite_connection(db_path).unwrap();
    let mut ids = Vec::with_capacity(n);
    for i in 0..n {
        let id = format!("AGENT_{:02}", i + 1);
        conn.execute(
            "INSERT INTO agent (agent_id, name, email, phone, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                id,
                format!("Agent {}", i + 1),
                format!("agent{}@example.com", i + 1),
                format!("+1415555{:04}", 9000 + i),
                format!("2026-01-01T00:00:{:02}.000Z", i),
            ],
        )
        .unwrap();
        ids.push(id);
    }
    ids
}

/// 设置全局配置项
pub fn set_config(db_path: &str, key: &str, value: &str) {
    let conn = lead_dispatch::db::open_sqlite_connection(db_path).unwrap();
    conn.execute(
        "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
         ON CONFLICT(scope_id, key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )
    .unwrap();
}

/// lead_assignment 总行数
pub fn count_assignments(db_path: &str) -> usize {
    let conn = lead_dispatch::db::open_sqlite_connection(db_path).unwrap();
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM lead_assignment", [], |row| row.get(0))
        .unwrap();
    n as usize
}

/// 生成 n 行合法名单，电话从 +1415555{start:04} 起递增
pub fn leads_csv(n: usize, start: usize) -> Vec<u8> {
    let mut out = String::from("firstName,phone,notes\n");
    for i in 0..n {
        out.push_str(&format!(
            "Lead{},+1415555{:04},note {}\n",
            start + i,
            start + i,
            start + i
        ));
    }
    out.into_bytes()
}

// ==========================================
// Mock 实现
// ==========================================

/// 第 fail_on 次 append_batch 返回错误，其余委托给真实仓储
pub struct FlakyAssignmentStore {
    pub inner: AssignmentRepository,
    fail_on: usize,
    calls: AtomicUsize,
}

impl FlakyAssignmentStore {
    pub fn new(inner: AssignmentRepository, fail_on: usize) -> Self {
        Self {
            inner,
            fail_on,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssignmentStore for FlakyAssignmentStore {
    async fn append_batch(
        &self,
        batch_id: &str,
        target: &TargetIdentity,
        items: &[WorkItem],
        uploaded_by: &str,
    ) -> RepositoryResult<usize> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on {
            return Err(RepositoryError::DatabaseTransactionError(
                "simulated write failure".to_string(),
            ));
        }
        self.inner
            .append_batch(batch_id, target, items, uploaded_by)
            .await
    }

    async fn list_all(&self) -> RepositoryResult<Vec<Assignment>> {
        self.inner.list_all().await
    }
}

/// 固定值配置
#[derive(Debug, Clone)]
pub struct MockDistributionConfig {
    pub target_count: usize,
    pub max_upload_bytes: usize,
}

impl Default for MockDistributionConfig {
    fn default() -> Self {
        Self {
            target_count: 5,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

#[async_trait]
impl DistributionConfigReader for MockDistributionConfig {
    async fn get_target_count(&self) -> RepositoryResult<usize> {
        Ok(self.target_count)
    }

    async fn get_max_upload_bytes(&self) -> RepositoryResult<usize> {
        Ok(self.max_upload_bytes)
    }
}
