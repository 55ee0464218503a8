// ==========================================
// 院系排课系统 - 教师工作量计数
// ==========================================
// 红线: 计数器只属于一次生成, 不跨生成共享
// ==========================================

use crate::domain::subject::{StaffId, StaffMember};
use std::collections::HashMap;

/// 本次生成中每位教师已排课次
#[derive(Debug, Clone, Default)]
pub struct WorkloadTracker {
    counts: HashMap<StaffId, u32>,
}

impl WorkloadTracker {
    /// 为输入中的每位教师初始化为 0 (含无授课资格者)
    pub fn new(staff: &[StaffMember]) -> Self {
        let counts = staff.iter().map(|s| (s.id.clone(), 0)).collect();
        Self { counts }
    }

    /// 当前已排课次, 未登记的教师视为 0
    pub fn count(&self, staff_id: &str) -> u32 {
        self.counts.get(staff_id).copied().unwrap_or(0)
    }

    /// 选出工作量最小的教师
    ///
    /// 并列时取输入顺序中的第一个; 候选为空时返回 None
    pub fn least_loaded<'a>(&self, eligible: &[&'a StaffMember]) -> Option<&'a StaffMember> {
        let mut best: Option<(&'a StaffMember, u32)> = None;
        for member in eligible {
            let load = self.count(&member.id);
            match best {
                Some((_, best_load)) if load >= best_load => {}
                _ => best = Some((member, load)),
            }
        }
        best.map(|(member, _)| member)
    }

    /// 提交一次课次后调用, 每次提交恰好一次
    pub fn increment(&mut self, staff_id: &str) {
        *self.counts.entry(staff_id.to_string()).or_insert(0) += 1;
    }

    /// 全部教师的已排课次总和
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff(id: &str) -> StaffMember {
        StaffMember {
            id: id.to_string(),
            name: id.to_uppercase(),
            department_id: Some(1),
            role: None,
            selected_subject_ids: Default::default(),
            subjects_locked: true,
        }
    }

    #[test]
    fn test_initialized_to_zero_for_all_staff() {
        let members = vec![staff("a"), staff("b")];
        let tracker = WorkloadTracker::new(&members);
        assert_eq!(tracker.count("a"), 0);
        assert_eq!(tracker.count("b"), 0);
        assert_eq!(tracker.count("unknown"), 0);
        assert_eq!(tracker.total(), 0);
    }

    #[test]
    fn test_least_loaded_tie_breaks_on_input_order() {
        let members = vec![staff("a"), staff("b"), staff("c")];
        let mut tracker = WorkloadTracker::new(&members);
        let eligible: Vec<&StaffMember> = members.iter().collect();

        assert_eq!(tracker.least_loaded(&eligible).map(|s| s.id.as_str()), Some("a"));

        tracker.increment("a");
        assert_eq!(tracker.least_loaded(&eligible).map(|s| s.id.as_str()), Some("b"));

        tracker.increment("b");
        tracker.increment("c");
        // 全部为 1, 回到第一个
        assert_eq!(tracker.least_loaded(&eligible).map(|s| s.id.as_str()), Some("a"));
        assert_eq!(tracker.total(), 3);
    }

    #[test]
    fn test_least_loaded_empty() {
        let tracker = WorkloadTracker::default();
        assert!(tracker.least_loaded(&[]).is_none());
    }
}
