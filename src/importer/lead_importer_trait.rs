// ==========================================
// 线索分配系统 - 导入管道 Trait
// ==========================================
// 职责: 定义解析/校验/上传分配接口（不包含实现）
// ==========================================

use crate::domain::assignment::{AssignmentGroup, UploadSummary};
use crate::domain::lead::{RawRow, WorkItem};
use crate::importer::error::{ImportResult, ParseError, ValidationError};
use crate::importer::file_parser::FileFormat;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ==========================================
// UploadedFile - 上传文件
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    pub file_name: String,
    pub mime_type: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// 声明格式（由 MIME 类型决定，不做内容嗅探）
    pub fn declared_format(&self) -> Option<FileFormat> {
        FileFormat::from_mime_type(&self.mime_type)
    }
}

// ==========================================
// LeadImporter Trait
// ==========================================
// 用途: 上传分配主接口
// 实现者: LeadImporterImpl
#[async_trait]
pub trait LeadImporter: Send + Sync {
    /// 上传名单并分配给坐席
    ///
    /// # 流程
    /// 1. 文件类型/大小检查
    /// 2. 解析为 RawRow
    /// 3. 表头与字段校验（任一行失败即整体失败）
    /// 4. 读取坐席名册并分配
    /// 5. 按坐席顺序逐组落库
    ///
    /// # 返回
    /// - Ok(UploadSummary): 处理总数与各坐席分配数
    /// - Err(PipelineError::PartialDistribution): 落库中途失败，已落库的分组不回滚
    async fn upload_and_distribute(
        &self,
        file: UploadedFile,
        uploaded_by: &str,
    ) -> ImportResult<UploadSummary>;

    /// 查询全部分配记录并按坐席分组
    async fn distributed_lists(&self) -> ImportResult<Vec<AssignmentGroup>>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 将文件字节解析为原始行
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件
    ///
    /// # 返回
    /// - Ok(Vec<RawRow>): 表头之后的非空行（按文件顺序）
    /// - Err(ParseError): 无法按声明格式解码，或没有数据行
    fn parse_to_raw_rows(&self, bytes: &[u8]) -> Result<Vec<RawRow>, ParseError>;
}

// ==========================================
// RowValidator Trait
// ==========================================
// 用途: 表头与字段校验
// 实现者: LeadValidator
pub trait RowValidator: Send + Sync {
    /// 校验全部行，全部通过才返回 WorkItem（顺序与输入一致）
    fn validate(&self, rows: &[RawRow]) -> Result<Vec<WorkItem>, ValidationError>;
}
