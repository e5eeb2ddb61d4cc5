// ==========================================
// 线索分配系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与值对象
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod agent;
pub mod assignment;
pub mod lead;

// 重导出核心类型
pub use agent::TargetIdentity;
pub use assignment::{
    Assignment, AssignmentGroup, DistributedDetail, DistributionBatch, DistributionGroup,
    UploadSummary,
};
pub use lead::{CellValue, HeaderIndex, RawRow, WorkItem};
