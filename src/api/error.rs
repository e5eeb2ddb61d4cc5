// ==========================================
// 线索分配系统 - API层错误类型
// ==========================================
// 职责: 将管道/仓储错误转换为调用方可读的错误消息
// 约束: 行级校验错误必须保留行号与取值；部分落库必须显式报告
// ==========================================

use crate::importer::error::PipelineError;
use crate::engine::distribution::DistributionError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 调用方输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("文件类型不支持: {0}（仅支持 CSV/XLS/XLSX）")]
    UnsupportedFileType(String),

    #[error("文件过大: {size} 字节（上限 {limit} 字节）")]
    FileTooLarge { size: usize, limit: usize },

    #[error("文件解析失败: {0}")]
    ParseFailed(String),

    #[error("数据验证失败: {0}")]
    ValidationFailed(String),

    // ==========================================
    // 业务前置条件
    // ==========================================
    #[error("坐席数量不足（{available}），无法分配给 {required} 个坐席，请确认至少存在 {required} 个坐席")]
    InsufficientAgents { available: usize, required: usize },

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // 落库错误
    // ==========================================
    /// 部分分组已落库，分配结果不一致，需要人工核对；
    /// 重新上传会产生一次新的独立分配
    #[error("部分分配: {saved_groups}/{total_groups} 个坐席分组已保存 (batch_id={batch_id})，需人工核对: {reason}")]
    PartialDistribution {
        saved_groups: usize,
        total_groups: usize,
        batch_id: String,
        reason: String,
    },

    #[error("数据库错误: {0}")]
    DatabaseError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 是否为调用方可修正的错误（文件/输入问题）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ApiError::InvalidInput(_)
                | ApiError::UnsupportedFileType(_)
                | ApiError::FileTooLarge { .. }
                | ApiError::ParseFailed(_)
                | ApiError::ValidationFailed(_)
                | ApiError::InsufficientAgents { .. }
                | ApiError::BusinessRuleViolation(_)
        )
    }
}

// ==========================================
// 从 PipelineError 转换
// ==========================================
impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::UnsupportedFileType(mime) => ApiError::UnsupportedFileType(mime),
            PipelineError::FileTooLarge { size, limit } => ApiError::FileTooLarge { size, limit },
            PipelineError::Parse(e) => ApiError::ParseFailed(e.to_string()),
            PipelineError::Validation(e) => ApiError::ValidationFailed(e.to_string()),
            PipelineError::Distribution(DistributionError::InsufficientTargets {
                available,
                required,
            }) => ApiError::InsufficientAgents {
                available,
                required,
            },
            PipelineError::Distribution(e) => ApiError::BusinessRuleViolation(e.to_string()),
            PipelineError::PartialDistribution {
                saved_groups,
                total_groups,
                batch_id,
                source,
            } => ApiError::PartialDistribution {
                saved_groups,
                total_groups,
                batch_id,
                reason: source.to_string(),
            },
            PipelineError::Roster(e) | PipelineError::Config(e) | PipelineError::Store(e) => e.into(),
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::InvalidInput(format!("{} 不存在: {}", entity, id))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InternalError(format!("配置项 {} 无效: {}", field, message))
            }
            RepositoryError::Other(e) => ApiError::Other(e),
            other => ApiError::DatabaseError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
