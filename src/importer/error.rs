// ==========================================
// 线索分配系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分层: 解析错误 → 校验错误 → 管道错误（携带阶段上下文）
// ==========================================

use crate::engine::distribution::DistributionError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

// ==========================================
// ParseError - 文件解析错误
// ==========================================
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("文件为空或表头之后没有数据行")]
    Empty,

    #[error("CSV 解析失败: {0}")]
    Csv(String),

    #[error("Excel 解析失败: {0}")]
    Workbook(String),

    #[error("Excel 文件无工作表")]
    NoWorksheet,
}

impl From<csv::Error> for ParseError {
    fn from(err: csv::Error) -> Self {
        ParseError::Csv(err.to_string())
    }
}

impl From<calamine::Error> for ParseError {
    fn from(err: calamine::Error) -> Self {
        ParseError::Workbook(err.to_string())
    }
}

// ==========================================
// ValidationError - 结构/字段校验错误
// ==========================================
// row_index: 有效数据行下标（表头后第一个非空行为 0）
// line: 源文件行号，消息中展示该值
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("缺少必需表头: {} (要求: firstname, phone, notes)", .missing.join(", "))]
    MissingHeaders { missing: Vec<String> },

    #[error("第 {line} 行: notes 不能为空")]
    EmptyNotes { row_index: usize, line: usize },

    #[error("第 {line} 行: phone 不能为空")]
    EmptyPhone { row_index: usize, line: usize },

    #[error("第 {line} 行: 电话号码格式无效: {value}（须为 E.164 格式，例如 +1234567890）")]
    InvalidPhoneFormat {
        row_index: usize,
        line: usize,
        value: String,
    },
}

impl ValidationError {
    /// 行级错误对应的数据行下标
    pub fn row_index(&self) -> Option<usize> {
        match self {
            ValidationError::MissingHeaders { .. } => None,
            ValidationError::EmptyNotes { row_index, .. }
            | ValidationError::EmptyPhone { row_index, .. }
            | ValidationError::InvalidPhoneFormat { row_index, .. } => Some(*row_index),
        }
    }

    /// 行级错误对应的源文件行号
    pub fn line(&self) -> Option<usize> {
        match self {
            ValidationError::MissingHeaders { .. } => None,
            ValidationError::EmptyNotes { line, .. }
            | ValidationError::EmptyPhone { line, .. }
            | ValidationError::InvalidPhoneFormat { line, .. } => Some(*line),
        }
    }
}

// ==========================================
// PipelineError - 上传分配管道错误
// ==========================================
// 各阶段错误原样包裹，仅附加阶段上下文
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("文件类型不支持: {0}（仅支持 CSV/XLS/XLSX）")]
    UnsupportedFileType(String),

    #[error("文件过大: {size} 字节（上限 {limit} 字节）")]
    FileTooLarge { size: usize, limit: usize },

    #[error("解析阶段失败: {0}")]
    Parse(#[from] ParseError),

    #[error("校验阶段失败: {0}")]
    Validation(#[from] ValidationError),

    #[error("分配阶段失败: {0}")]
    Distribution(#[from] DistributionError),

    #[error("读取坐席名册失败: {0}")]
    Roster(#[source] RepositoryError),

    #[error("读取配置失败: {0}")]
    Config(#[source] RepositoryError),

    /// 部分坐席分组已落库，其余未落库；不回滚，需人工核对
    #[error("部分分配: {saved_groups}/{total_groups} 个坐席分组已保存 (batch_id={batch_id}): {source}")]
    PartialDistribution {
        saved_groups: usize,
        total_groups: usize,
        batch_id: String,
        #[source]
        source: RepositoryError,
    },

    #[error("查询分配记录失败: {0}")]
    Store(#[source] RepositoryError),
}

impl PipelineError {
    /// 是否可能已有部分数据落库
    pub fn is_partial(&self) -> bool {
        matches!(
            self,
            PipelineError::PartialDistribution { saved_groups, .. } if *saved_groups > 0
        )
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_level_messages_carry_file_line() {
        let err = ValidationError::InvalidPhoneFormat {
            row_index: 3,
            line: 6,
            value: "4155552671".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("第 6 行"));
        assert!(msg.contains("4155552671"));
        assert_eq!(err.row_index(), Some(3));
        assert_eq!(err.line(), Some(6));
    }

    #[test]
    fn test_missing_headers_message_lists_names() {
        let err = ValidationError::MissingHeaders {
            missing: vec!["phone".to_string(), "notes".to_string()],
        };
        assert!(err.to_string().contains("phone, notes"));
        assert_eq!(err.row_index(), None);
        assert_eq!(err.line(), None);
    }

    #[test]
    fn test_partial_distribution_reports_counts() {
        let err = PipelineError::PartialDistribution {
            saved_groups: 2,
            total_groups: 5,
            batch_id: "b-1".to_string(),
            source: RepositoryError::DatabaseQueryError("disk full".to_string()),
        };
        assert!(err.is_partial());
        let msg = err.to_string();
        assert!(msg.contains("2/5"));
        assert!(msg.contains("disk full"));
    }
}
