// ==========================================
// 线索分配系统 - 核心库
// ==========================================
// 职责: 名单文件解析 → 校验 → 按坐席分配 → 落库 → 分组查询
// 技术栈: Rust + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 分配与分组规则
pub mod engine;

// 导入层 - 文件解析、校验、上传分配管道
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 共享状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    Assignment, AssignmentGroup, CellValue, DistributedDetail, DistributionBatch,
    DistributionGroup, HeaderIndex, RawRow, TargetIdentity, UploadSummary, WorkItem,
};

pub use engine::{group_assignments, DistributionEngine, DistributionError};

pub use importer::{
    FileFormat, LeadImporter, LeadImporterImpl, LeadValidator, ParseError, PipelineError,
    UploadedFile, ValidationError,
};

pub use api::{ApiError, UploadApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "线索分配系统";
