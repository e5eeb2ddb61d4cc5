// ==========================================
// 线索分配系统 - 分配配置读取 Trait
// ==========================================
// 职责: 定义上传/分配所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// DistributionConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait DistributionConfigReader: Send + Sync {
    /// 分配坐席数
    ///
    /// # 默认值
    /// - 5
    async fn get_target_count(&self) -> RepositoryResult<usize>;

    /// 上传文件大小上限（字节）
    ///
    /// # 默认值
    /// - 10 MiB
    async fn get_max_upload_bytes(&self) -> RepositoryResult<usize>;
}
