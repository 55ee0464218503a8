// ==========================================
// 院系排课系统 - 课程 / 教师 领域模型
// ==========================================

use crate::domain::department::DepartmentId;
use crate::domain::types::{StaffRole, SubjectType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type SubjectId = i64;
pub type StaffId = String;

// ==========================================
// Subject - 课程
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub code: String,
    pub credits: i32, // 学分 = 每周所需课次
    pub department_id: DepartmentId,
    pub subject_type: SubjectType,
}

impl Subject {
    /// 每周所需课次, 学分不足 1 时按 1 计
    pub fn sessions_needed(&self) -> usize {
        self.credits.max(1) as usize
    }
}

// ==========================================
// StaffMember - 教师
// ==========================================
// 红线: 工作量由 WorkloadTracker 外部记录, 不回写到教师记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: StaffId,
    pub name: String,
    pub department_id: Option<DepartmentId>,
    pub role: Option<StaffRole>,
    pub selected_subject_ids: BTreeSet<SubjectId>, // 已选课程 (可能为空)
    pub subjects_locked: bool,                     // 选课是否已锁定确认
}

impl StaffMember {
    /// 是否已锁定选择了该课程
    pub fn has_locked_subject(&self, subject_id: SubjectId) -> bool {
        self.subjects_locked && self.selected_subject_ids.contains(&subject_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject_with_credits(credits: i32) -> Subject {
        Subject {
            id: 1,
            name: "数据结构".to_string(),
            code: "CS201".to_string(),
            credits,
            department_id: 1,
            subject_type: SubjectType::Theory,
        }
    }

    #[test]
    fn test_sessions_needed_floor_is_one() {
        assert_eq!(subject_with_credits(3).sessions_needed(), 3);
        assert_eq!(subject_with_credits(1).sessions_needed(), 1);
        assert_eq!(subject_with_credits(0).sessions_needed(), 1);
        assert_eq!(subject_with_credits(-2).sessions_needed(), 1);
    }

    #[test]
    fn test_has_locked_subject_requires_lock() {
        let mut staff = StaffMember {
            id: "u1".to_string(),
            name: "张老师".to_string(),
            department_id: Some(1),
            role: Some(StaffRole::Professor),
            selected_subject_ids: [1, 2].into_iter().collect(),
            subjects_locked: false,
        };
        assert!(!staff.has_locked_subject(1));

        staff.subjects_locked = true;
        assert!(staff.has_locked_subject(1));
        assert!(!staff.has_locked_subject(3));
    }
}
