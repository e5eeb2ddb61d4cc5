// ==========================================
// 线索分配系统 - 名单上传分配实现
// ==========================================
// 流程: 类型/大小检查 → 解析 → 校验 → 读取名册 → 分配 → 逐组落库
// 约束: 校验与分配全部成功后才开始落库；
//       落库按坐席顺序每组一次 append_batch，中途失败不回滚已写入分组
// 并发: 不同上传之间不做串行化，各自独立写入
// ==========================================

use crate::config::DistributionConfigReader;
use crate::domain::assignment::{AssignmentGroup, DistributedDetail, UploadSummary};
use crate::engine::distribution::distribute;
use crate::engine::grouping::group_assignments;
use crate::importer::error::{ImportResult, PipelineError};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::lead_importer_trait::{LeadImporter, RowValidator, UploadedFile};
use crate::repository::{AgentRoster, AssignmentStore};
use async_trait::async_trait;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// LeadImporterImpl
// ==========================================
pub struct LeadImporterImpl<S, R, C>
where
    S: AssignmentStore,
    R: AgentRoster,
    C: DistributionConfigReader,
{
    // 数据访问层
    store: S,
    roster: R,

    // 配置读取器
    config: C,

    // 导入组件
    validator: Box<dyn RowValidator>,
}

impl<S, R, C> LeadImporterImpl<S, R, C>
where
    S: AssignmentStore,
    R: AgentRoster,
    C: DistributionConfigReader,
{
    pub fn new(store: S, roster: R, config: C, validator: Box<dyn RowValidator>) -> Self {
        Self {
            store,
            roster,
            config,
            validator,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[async_trait]
impl<S, R, C> LeadImporter for LeadImporterImpl<S, R, C>
where
    S: AssignmentStore,
    R: AgentRoster,
    C: DistributionConfigReader,
{
    #[instrument(skip(self, file), fields(file_name = %file.file_name, size = file.bytes.len()))]
    async fn upload_and_distribute(
        &self,
        file: UploadedFile,
        uploaded_by: &str,
    ) -> ImportResult<UploadSummary> {
        let start_time = Instant::now();

        // === 步骤 1: 文件类型与大小 ===
        let format = file
            .declared_format()
            .ok_or_else(|| PipelineError::UnsupportedFileType(file.mime_type.clone()))?;

        let limit = self
            .config
            .get_max_upload_bytes()
            .await
            .map_err(PipelineError::Config)?;
        if file.bytes.len() > limit {
            warn!(size = file.bytes.len(), limit = limit, "上传文件过大");
            return Err(PipelineError::FileTooLarge {
                size: file.bytes.len(),
                limit,
            });
        }

        // === 步骤 2: 解析 ===
        debug!(?format, "步骤 2: 解析文件");
        let rows = UniversalFileParser.parse(&file.bytes, format).map_err(|e| {
            warn!(error = %e, "文件解析失败");
            e
        })?;
        info!(rows = rows.len(), "文件解析完成");

        // === 步骤 3: 校验 ===
        debug!("步骤 3: 表头与字段校验");
        let items = self.validator.validate(&rows).map_err(|e| {
            warn!(error = %e, row_index = ?e.row_index(), "名单校验失败");
            e
        })?;
        drop(rows);
        let total_items = items.len();
        info!(items = total_items, "名单校验完成");

        // === 步骤 4: 读取名册并分配 ===
        let target_count = self
            .config
            .get_target_count()
            .await
            .map_err(PipelineError::Config)?;
        let targets = self
            .roster
            .list_agents(target_count)
            .await
            .map_err(PipelineError::Roster)?;
        debug!(available = targets.len(), required = target_count, "坐席名册读取完成");

        let batch = distribute(items, &targets, target_count)?;

        // === 步骤 5: 逐组落库 ===
        let batch_id = Uuid::new_v4().to_string();
        let groups: Vec<_> = batch
            .into_groups()
            .into_iter()
            .filter(|g| !g.items.is_empty())
            .collect();
        let total_groups = groups.len();

        let mut details = Vec::with_capacity(total_groups);
        for group in groups {
            match self
                .store
                .append_batch(&batch_id, &group.target, &group.items, uploaded_by)
                .await
            {
                Ok(count) => {
                    debug!(agent_id = %group.target.id, count = count, "分组落库完成");
                    details.push(DistributedDetail {
                        target_id: group.target.id,
                        target_name: group.target.name,
                        count,
                    });
                }
                Err(e) => {
                    error!(
                        batch_id = %batch_id,
                        agent_id = %group.target.id,
                        saved_groups = details.len(),
                        total_groups = total_groups,
                        error = %e,
                        "分组落库失败，已写入的分组不会回滚"
                    );
                    return Err(PipelineError::PartialDistribution {
                        saved_groups: details.len(),
                        total_groups,
                        batch_id,
                        source: e,
                    });
                }
            }
        }

        info!(
            batch_id = %batch_id,
            total = total_items,
            groups = details.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "名单上传分配完成"
        );

        Ok(UploadSummary {
            batch_id,
            total_items_processed: total_items,
            distributed_details: details,
        })
    }

    async fn distributed_lists(&self) -> ImportResult<Vec<AssignmentGroup>> {
        let assignments = self.store.list_all().await.map_err(PipelineError::Store)?;
        let groups = group_assignments(assignments);
        debug!(groups = groups.len(), "分配记录分组完成");
        Ok(groups)
    }
}
