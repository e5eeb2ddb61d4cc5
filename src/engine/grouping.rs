// ==========================================
// 线索分配系统 - 分配记录分组
// ==========================================
// 规则: 按坐席 id 分组；分组顺序 = 坐席在记录序列中首次出现的顺序
//       没有记录的坐席不出现（不补空组）
// ==========================================

use crate::domain::assignment::{Assignment, AssignmentGroup};
use std::collections::HashMap;

pub fn group_assignments(assignments: Vec<Assignment>) -> Vec<AssignmentGroup> {
    let mut groups: Vec<AssignmentGroup> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for assignment in assignments {
        let pos = match positions.get(&assignment.target.id) {
            Some(pos) => *pos,
            None => {
                positions.insert(assignment.target.id.clone(), groups.len());
                groups.push(AssignmentGroup {
                    agent: assignment.target.clone(),
                    items: Vec::new(),
                });
                groups.len() - 1
            }
        };
        groups[pos].items.push(assignment);
    }

    groups
}
