// ==========================================
// 线索分配系统 - 引擎层
// ==========================================
// 职责: 分配算法与查询分组（纯函数，不访问数据库）
// ==========================================

pub mod distribution;
pub mod grouping;

pub use distribution::{
    distribute, plan_slots, DistributionEngine, DistributionError, DEFAULT_TARGET_COUNT,
};
pub use grouping::group_assignments;
