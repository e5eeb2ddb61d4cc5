// ==========================================
// 线索名单上传API
// ==========================================
// 职责: 封装上传分配与分配结果查询（传输层之外的薄封装）
// 说明: 失败后重新上传会重新解析并产生一次新的独立分配，不保证幂等
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::assignment::{AssignmentGroup, DistributedDetail};
use crate::importer::file_parser::{FileFormat, MIME_CSV, MIME_XLS, MIME_XLSX};
use crate::importer::{LeadImporter, LeadImporterImpl, LeadValidator, UploadedFile};
use crate::repository::{AgentRepository, AssignmentRepository};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

/// 上传API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadListResponse {
    pub message: String,
    pub batch_id: String,
    pub total_items_processed: usize,
    pub distributed_details: Vec<DistributedDetail>,
}

type SqliteLeadImporter = LeadImporterImpl<AssignmentRepository, AgentRepository, ConfigManager>;

/// 上传API
pub struct UploadApi {
    importer: SqliteLeadImporter,
}

impl UploadApi {
    /// 基于共享连接创建
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        let importer = LeadImporterImpl::new(
            AssignmentRepository::from_connection(conn.clone()),
            AgentRepository::from_connection(conn.clone()),
            ConfigManager::from_connection(conn),
            Box::new(LeadValidator::new()),
        );
        Self { importer }
    }

    /// 上传名单并分配
    ///
    /// # 参数
    /// - file_name: 原始文件名（仅用于日志）
    /// - mime_type: 声明的 MIME 类型，决定解析格式
    /// - bytes: 文件内容
    /// - uploaded_by: 上传人标识
    pub async fn upload_list(
        &self,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
        uploaded_by: &str,
    ) -> ApiResult<UploadListResponse> {
        if uploaded_by.trim().is_empty() {
            return Err(ApiError::InvalidInput("上传人不能为空".to_string()));
        }

        let file = UploadedFile::new(file_name, mime_type, bytes);
        let summary = self
            .importer
            .upload_and_distribute(file, uploaded_by.trim())
            .await?;

        Ok(UploadListResponse {
            message: "文件已上传、校验、分配并保存成功".to_string(),
            batch_id: summary.batch_id,
            total_items_processed: summary.total_items_processed,
            distributed_details: summary.distributed_details,
        })
    }

    /// 从本地文件上传（按扩展名确定 MIME 类型）
    pub async fn upload_list_from_path(
        &self,
        file_path: &str,
        uploaded_by: &str,
    ) -> ApiResult<UploadListResponse> {
        let path = Path::new(file_path);
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        let mime_type = mime_type_for_extension(&ext)
            .ok_or_else(|| ApiError::UnsupportedFileType(ext.clone()))?;

        let bytes = std::fs::read(path)
            .map_err(|e| ApiError::InvalidInput(format!("读取文件失败 {}: {}", file_path, e)))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        info!(file = %file_path, mime_type = mime_type, "从本地文件上传名单");
        self.upload_list(&file_name, mime_type, bytes, uploaded_by).await
    }

    /// 查询按坐席分组的分配结果
    pub async fn get_distributed_lists(&self) -> ApiResult<Vec<AssignmentGroup>> {
        Ok(self.importer.distributed_lists().await?)
    }
}

fn mime_type_for_extension(ext: &str) -> Option<&'static str> {
    match (FileFormat::from_extension(ext)?, ext) {
        (FileFormat::DelimitedText, _) => Some(MIME_CSV),
        (FileFormat::Workbook, "xls") => Some(MIME_XLS),
        (FileFormat::Workbook, _) => Some(MIME_XLSX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_type_for_extension() {
        assert_eq!(mime_type_for_extension("csv"), Some(MIME_CSV));
        assert_eq!(mime_type_for_extension("xls"), Some(MIME_XLS));
        assert_eq!(mime_type_for_extension("xlsx"), Some(MIME_XLSX));
        assert_eq!(mime_type_for_extension("pdf"), None);
    }
}
