// ==========================================
// 院系排课系统 - 院系/教室/约束 领域模型
// ==========================================
// 红线: 输入快照只读, 引擎不得修改
// ==========================================

use crate::domain::types::{ConstraintSubjectType, RoomType, StaffRole};
use serde::{Deserialize, Serialize};

pub type DepartmentId = i64;
pub type ClassroomId = i64;
pub type ConstraintId = i64;

// ==========================================
// Department - 院系
// ==========================================
// 用途: 生成前的院系存在性校验 (找不到即快速失败)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub code: String,
}

// ==========================================
// Classroom - 教室
// ==========================================
// 注: capacity / room_type 默认不参与筛选
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classroom {
    pub id: ClassroomId,
    pub name: String,
    pub capacity: i32,
    pub department_id: DepartmentId,
    pub room_type: RoomType,
}

// ==========================================
// Constraint - 工作量约束
// ==========================================
// 注: 仅作为数据承载, 排课算法不读取
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    pub id: ConstraintId,
    pub department_id: Option<DepartmentId>, // None = 全局约束
    pub role: StaffRole,
    pub subject_type: ConstraintSubjectType,
    pub max_subjects: i32,
    pub max_hours: i32,
    pub created_by: String,
}

impl Constraint {
    /// 是否为全局约束
    pub fn is_global(&self) -> bool {
        self.department_id.is_none()
    }
}
