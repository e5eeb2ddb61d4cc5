// ==========================================
// 线索分配系统 - 分配记录仓储
// ==========================================
// 职责: lead_assignment 表的批量追加与全量查询
// 约束: 单次 append_batch 在一个事务内完成（全成功或全回滚）
//       跨多次调用不提供事务
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::agent::TargetIdentity;
use crate::domain::assignment::Assignment;
use crate::domain::lead::WorkItem;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// ==========================================
// AssignmentStore Trait
// ==========================================
// 实现者: AssignmentRepository（rusqlite）
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// 为一个坐席批量追加分配记录
    ///
    /// # 返回
    /// - Ok(usize): 写入条数
    /// - Err: 数据库错误（本次调用整体回滚）
    async fn append_batch(
        &self,
        batch_id: &str,
        target: &TargetIdentity,
        items: &[WorkItem],
        uploaded_by: &str,
    ) -> RepositoryResult<usize>;

    /// 全部分配记录（按写入顺序，坐席属性已解析）
    async fn list_all(&self) -> RepositoryResult<Vec<Assignment>>;
}

pub struct AssignmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AssignmentRepository {
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

    fn map_row(row: &Row) -> rusqlite::Result<Assignment> {
        Ok(Assignment {
            assignment_id: row.get(0)?,
            batch_id: row.get(1)?,
            item: WorkItem::new_validated(row.get(2)?, row.get(3)?, row.get(4)?),
            uploaded_by: row.get(5)?,
            assigned_at: row.get::<_, DateTime<Utc>>(6)?,
            target: TargetIdentity::new(row.get::<_, String>(7)?, row.get::<_, String>(8)?)
                .with_contact(row.get(9)?, row.get(10)?),
        })
    }

    /// 指定批次的记录数
    pub fn count_by_batch(&self, batch_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row(
            "SELECT COUNT(*) FROM lead_assignment WHERE batch_id = ?1",
            params![batch_id],
            |row| row.get(0),
        )?;
        Ok(n as usize)
    }
}

#[async_trait]
impl AssignmentStore for AssignmentRepository {
    async fn append_batch(
        &self,
        batch_id: &str,
        target: &TargetIdentity,
        items: &[WorkItem],
        uploaded_by: &str,
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let assigned_at = Utc::now();

        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO lead_assignment (
                    assignment_id, batch_id, first_name, phone, notes,
                    agent_id, uploaded_by, assigned_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )?;

            for item in items {
                stmt.execute(params![
                    Uuid::new_v4().to_string(),
                    batch_id,
                    item.first_name(),
                    item.phone(),
                    item.notes(),
                    target.id,
                    uploaded_by,
                    assigned_at,
                ])?;
                count += 1;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(count)
    }

    async fn list_all(&self) -> RepositoryResult<Vec<Assignment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                a.assignment_id, a.batch_id, a.first_name, a.phone, a.notes,
                a.uploaded_by, a.assigned_at,
                g.agent_id, g.name, g.email, g.phone
            FROM lead_assignment a
            JOIN agent g ON g.agent_id = a.agent_id
            ORDER BY a.seq ASC
            "#,
        )?;

        let assignments = stmt
            .query_map([], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(assignments)
    }
}
