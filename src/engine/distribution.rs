// ==========================================
// 线索分配系统 - 分配引擎
// ==========================================
// 算法: 两阶段分配（不是逐条轮转）
//   1. base = n / k，按输入顺序给每个坐席连续分配 base 条
//   2. 余数按坐席 0,1,2,… 依次补一条（取模续接）
// 结果: 每个坐席拿到的是输入中的连续区段（余数条目追加在末尾）
// 红线: 纯函数，不落库
// ==========================================

use crate::domain::agent::TargetIdentity;
use crate::domain::assignment::{DistributionBatch, DistributionGroup};
use crate::domain::lead::WorkItem;
use thiserror::Error;

/// 系统固定的坐席分配数
pub const DEFAULT_TARGET_COUNT: usize = 5;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DistributionError {
    #[error("坐席数量不足: 可用 {available} 个，需要 {required} 个")]
    InsufficientTargets { available: usize, required: usize },

    #[error("分配坐席数必须大于 0")]
    ZeroTargetCount,
}

pub struct DistributionEngine {
    target_count: usize,
}

impl DistributionEngine {
    pub fn new(target_count: usize) -> Self {
        Self { target_count }
    }

    pub fn target_count(&self) -> usize {
        self.target_count
    }

    /// 将线索分配给前 target_count 个坐席
    ///
    /// # 返回
    /// - Ok(DistributionBatch): 恰好 target_count 组，按坐席顺序
    /// - Err(InsufficientTargets): targets 少于 target_count
    pub fn distribute(
        &self,
        items: Vec<WorkItem>,
        targets: &[TargetIdentity],
    ) -> Result<DistributionBatch, DistributionError> {
        let k = self.target_count;
        if k == 0 {
            return Err(DistributionError::ZeroTargetCount);
        }
        if targets.len() < k {
            return Err(DistributionError::InsufficientTargets {
                available: targets.len(),
                required: k,
            });
        }

        let slots = plan_slots(items.len(), k);
        let mut buckets: Vec<Vec<WorkItem>> = slots.iter().map(|s| Vec::with_capacity(*s)).collect();

        let n = items.len();
        let base = n / k;
        let mut iter = items.into_iter();

        // 阶段 1: 连续基础份额
        for bucket in buckets.iter_mut() {
            bucket.extend(iter.by_ref().take(base));
        }

        // 阶段 2: 余数依次补给 0,1,2,…
        for (offset, item) in iter.enumerate() {
            buckets[offset % k].push(item);
        }

        let groups = targets
            .iter()
            .take(k)
            .cloned()
            .zip(buckets)
            .map(|(target, items)| DistributionGroup { target, items })
            .collect();

        Ok(DistributionBatch::new(groups))
    }
}

impl Default for DistributionEngine {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_COUNT)
    }
}

/// 便捷入口: 按给定坐席数分配
pub fn distribute(
    items: Vec<WorkItem>,
    targets: &[TargetIdentity],
    target_count: usize,
) -> Result<DistributionBatch, DistributionError> {
    DistributionEngine::new(target_count).distribute(items, targets)
}

/// 各坐席应得条数（不依赖具体线索）
pub fn plan_slots(n: usize, k: usize) -> Vec<usize> {
    if k == 0 {
        return Vec::new();
    }
    let base = n / k;
    let remainder = n - base * k;
    (0..k)
        .map(|i| base + usize::from(i < remainder))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::lead_importer_trait::RowValidator;
    use crate::importer::lead_validator::LeadValidator;
    use crate::domain::lead::{CellValue, HeaderIndex, RawRow};
    use std::sync::Arc;

    fn items(n: usize) -> Vec<WorkItem> {
        let headers = Arc::new(HeaderIndex::from_cells(
            ["firstname", "phone", "notes"].into_iter().enumerate(),
        ));
        let rows: Vec<RawRow> = (0..n)
            .map(|i| {
                RawRow::new(
                    headers.clone(),
                    vec![
                        CellValue::from_text(&format!("row{}", i)),
                        CellValue::from_text(&format!("+1415555{:04}", i)),
                        CellValue::from_text("note"),
                    ],
                )
            })
            .collect();
        LeadValidator::new().validate(&rows).unwrap()
    }

    fn targets(n: usize) -> Vec<TargetIdentity> {
        (0..n)
            .map(|i| TargetIdentity::new(format!("agent-{}", i), format!("Agent {}", i)))
            .collect()
    }

    fn names(group: &DistributionGroup) -> Vec<&str> {
        group.items.iter().map(|i| i.first_name()).collect()
    }

    #[test]
    fn test_twelve_items_five_targets() {
        let batch = DistributionEngine::new(5)
            .distribute(items(12), &targets(5))
            .unwrap();
        let groups = batch.groups();

        assert_eq!(groups.len(), 5);
        assert_eq!(names(&groups[0]), vec!["row0", "row1", "row10"]);
        assert_eq!(names(&groups[1]), vec!["row2", "row3", "row11"]);
        assert_eq!(names(&groups[2]), vec!["row4", "row5"]);
        assert_eq!(names(&groups[3]), vec!["row6", "row7"]);
        assert_eq!(names(&groups[4]), vec!["row8", "row9"]);
        assert_eq!(batch.total_items(), 12);
        assert_eq!(groups[3].target.id, "agent-3");
    }

    #[test]
    fn test_fewer_items_than_targets() {
        let batch = DistributionEngine::new(5)
            .distribute(items(3), &targets(5))
            .unwrap();
        let sizes: Vec<usize> = batch.groups().iter().map(|g| g.items.len()).collect();
        assert_eq!(sizes, vec![1, 1, 1, 0, 0]);
        assert_eq!(names(&batch.groups()[2]), vec!["row2"]);
    }

    #[test]
    fn test_conservation_and_contiguity() {
        let engine = DistributionEngine::new(5);
        for n in 0..40 {
            let input = items(n);
            let batch = engine.distribute(input.clone(), &targets(7)).unwrap();
            assert_eq!(batch.total_items(), n);

            let base = n / 5;
            for (t, group) in batch.groups().iter().enumerate() {
                // 前 base 条是输入中的连续区段
                assert_eq!(&group.items[..base], &input[t * base..(t + 1) * base]);
            }

            let mut seen: Vec<&WorkItem> = batch.groups().iter().flat_map(|g| g.items.iter()).collect();
            seen.sort_by_key(|i| i.phone().to_string());
            seen.dedup();
            assert_eq!(seen.len(), n);
        }
    }

    #[test]
    fn test_only_first_k_targets_used() {
        let batch = DistributionEngine::new(2)
            .distribute(items(4), &targets(4))
            .unwrap();
        let ids: Vec<&str> = batch.groups().iter().map(|g| g.target.id.as_str()).collect();
        assert_eq!(ids, vec!["agent-0", "agent-1"]);
    }

    #[test]
    fn test_insufficient_targets() {
        let err = DistributionEngine::new(5)
            .distribute(items(10), &targets(3))
            .unwrap_err();
        assert_eq!(
            err,
            DistributionError::InsufficientTargets {
                available: 3,
                required: 5
            }
        );
    }

    #[test]
    fn test_zero_target_count() {
        let err = DistributionEngine::new(0)
            .distribute(items(1), &targets(1))
            .unwrap_err();
        assert_eq!(err, DistributionError::ZeroTargetCount);
    }

    #[test]
    fn test_free_function_matches_engine() {
        let via_fn = distribute(items(7), &targets(3), 3).unwrap();
        let via_engine = DistributionEngine::new(3)
            .distribute(items(7), &targets(3))
            .unwrap();
        assert_eq!(via_fn, via_engine);
        assert_eq!(names(&via_fn.groups()[0]), vec!["row0", "row1", "row6"]);

        let err = distribute(items(2), &targets(2), 3).unwrap_err();
        assert_eq!(
            err,
            DistributionError::InsufficientTargets {
                available: 2,
                required: 3
            }
        );
    }

    #[test]
    fn test_plan_slots() {
        assert_eq!(plan_slots(12, 5), vec![3, 3, 2, 2, 2]);
        assert_eq!(plan_slots(0, 3), vec![0, 0, 0]);
        assert_eq!(plan_slots(5, 0), Vec::<usize>::new());
    }
}
