// ==========================================
// 线索分配系统 - 应用层
// ==========================================
// 职责: 组装共享连接与API实例，供 CLI 等入口使用
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};
