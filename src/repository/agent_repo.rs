// ==========================================
// 线索分配系统 - 坐席名册仓储（只读）
// ==========================================
// 职责: 读取 agent 表，按创建顺序提供分配目标
// 红线: 名册的增删改由外部系统负责，此处只读
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::agent::TargetIdentity;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// AgentRoster Trait
// ==========================================
// 用途: 分配前读取坐席名册
// 实现者: AgentRepository（rusqlite）
#[async_trait]
pub trait AgentRoster: Send + Sync {
    /// 按创建顺序返回至多 limit 个坐席
    async fn list_agents(&self, limit: usize) -> RepositoryResult<Vec<TargetIdentity>>;
}

pub struct AgentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AgentRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        Ok(self.conn.lock()?)
    }

    fn map_row(row: &Row) -> rusqlite::Result<TargetIdentity> {
        Ok(TargetIdentity::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?)
            .with_contact(row.get(2)?, row.get(3)?))
    }

    /// 坐席总数
    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM agent", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

#[async_trait]
impl AgentRoster for AgentRepository {
    async fn list_agents(&self, limit: usize) -> RepositoryResult<Vec<TargetIdentity>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT agent_id, name, email, phone
            FROM agent
            ORDER BY created_at ASC, rowid ASC
            LIMIT ?1
            "#,
        )?;

        let agents = stmt
            .query_map(params![limit as i64], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(agents)
    }
}
