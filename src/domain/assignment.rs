// ==========================================
// 线索分配系统 - 分配结果领域模型
// ==========================================
// 职责: 分配批次（内存）、分配记录（落库）、按坐席分组视图、上传结果
// ==========================================

use crate::domain::agent::TargetIdentity;
use crate::domain::lead::WorkItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// DistributionBatch - 单次上传的分配结果（内存态）
// ==========================================
// 约束: 每个坐席一组，按坐席顺序排列，覆盖全部线索且无重叠
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionBatch {
    groups: Vec<DistributionGroup>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistributionGroup {
    pub target: TargetIdentity,
    pub items: Vec<WorkItem>,
}

impl DistributionBatch {
    pub(crate) fn new(groups: Vec<DistributionGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[DistributionGroup] {
        &self.groups
    }

    pub fn into_groups(self) -> Vec<DistributionGroup> {
        self.groups
    }

    /// 全部线索数
    pub fn total_items(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }
}

// ==========================================
// Assignment - 落库的分配记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub assignment_id: String,
    pub batch_id: String,
    pub item: WorkItem,
    pub target: TargetIdentity,
    pub uploaded_by: String,
    pub assigned_at: DateTime<Utc>,
}

// ==========================================
// AssignmentGroup - 按坐席分组的查询视图
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentGroup {
    pub agent: TargetIdentity,
    pub items: Vec<Assignment>,
}

// ==========================================
// UploadSummary - 单次上传对调用方的返回
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    pub batch_id: String,
    pub total_items_processed: usize,
    pub distributed_details: Vec<DistributedDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributedDetail {
    pub target_id: String,
    pub target_name: String,
    pub count: usize,
}
