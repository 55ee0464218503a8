// ==========================================
// 院系排课系统 - 课表领域模型
// ==========================================
// 红线: TimetableEntry 创建后不可变
// 红线: 同一院系版本号严格递增, 永不复用 (零课次版本同样占号)
// ==========================================

use crate::domain::department::{Classroom, ClassroomId, DepartmentId};
use crate::domain::subject::{StaffId, StaffMember, Subject, SubjectId};
use crate::domain::types::{Day, TimeSlot};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// TimetableEntry - 课表条目 (一次课)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntry {
    pub day: Day,
    pub time_slot: TimeSlot,
    pub subject_id: SubjectId,
    pub staff_id: StaffId,
    pub classroom_id: ClassroomId,
    pub department_id: DepartmentId,
    pub version: i64,
}

// ==========================================
// TimetableVersion - 课表版本头
// ==========================================
// 用途: 每次生成一行, 保证零条目版本也占用版本号
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableVersion {
    pub version_id: String,                   // UUID
    pub department_id: DepartmentId,          // 所属院系
    pub version_no: i64,                      // 版本号 (院系内从 1 开始)
    pub entry_count: i64,                     // 已排课次
    pub requested_sessions: i64,              // 需求课次
    pub config_snapshot_json: Option<String>, // 生成时的配置快照
    pub created_by: String,                   // 生成人
    pub created_at: NaiveDateTime,            // 生成时间
}

impl TimetableVersion {
    /// 是否存在欠排 (已排课次少于需求课次)
    pub fn is_under_scheduled(&self) -> bool {
        self.entry_count < self.requested_sessions
    }
}

// ==========================================
// 欠排原因
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShortfallReason {
    NoEligibleStaff, // 无已锁定选课的教师, 整门课跳过
    GridExhausted,   // 网格扫描耗尽, 部分课次丢弃
}

impl fmt::Display for ShortfallReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShortfallReason::NoEligibleStaff => write!(f, "NO_ELIGIBLE_STAFF"),
            ShortfallReason::GridExhausted => write!(f, "GRID_EXHAUSTED"),
        }
    }
}

// ==========================================
// SubjectCoverage - 单门课程排课覆盖情况
// ==========================================
// 欠排不是错误, 以显式结果返回给调用方
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectCoverage {
    pub subject_id: SubjectId,
    pub requested: usize,
    pub scheduled: usize,
    pub shortfall_reason: Option<ShortfallReason>,
}

impl SubjectCoverage {
    pub fn is_complete(&self) -> bool {
        self.scheduled >= self.requested
    }

    pub fn missing(&self) -> usize {
        self.requested.saturating_sub(self.scheduled)
    }
}

// ==========================================
// GenerationOutcome - 单次生成结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutcome {
    pub department_id: DepartmentId,
    pub version: i64,
    pub entries: Vec<TimetableEntry>,
    pub coverage: Vec<SubjectCoverage>,
}

impl GenerationOutcome {
    /// 需求课次合计
    pub fn requested_sessions(&self) -> usize {
        self.coverage.iter().map(|c| c.requested).sum()
    }

    /// 已排课次合计
    pub fn scheduled_sessions(&self) -> usize {
        self.entries.len()
    }

    /// 欠排课程
    pub fn shortfalls(&self) -> impl Iterator<Item = &SubjectCoverage> {
        self.coverage.iter().filter(|c| !c.is_complete())
    }
}

// ==========================================
// TimetableSessionView - 对外展示的课次
// ==========================================
// 附带课程/教师/教室名称, 可直接序列化
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableSessionView {
    pub day: Day,
    pub time_slot: TimeSlot,
    pub subject_id: SubjectId,
    pub subject_name: String,
    pub subject_code: String,
    pub staff_id: StaffId,
    pub staff_name: String,
    pub classroom_id: ClassroomId,
    pub classroom_name: String,
}

impl TimetableSessionView {
    /// 由条目和输入记录组装展示视图
    pub fn from_entry(
        entry: &TimetableEntry,
        subject: &Subject,
        staff: &StaffMember,
        classroom: &Classroom,
    ) -> Self {
        Self {
            day: entry.day,
            time_slot: entry.time_slot,
            subject_id: entry.subject_id,
            subject_name: subject.name.clone(),
            subject_code: subject.code.clone(),
            staff_id: entry.staff_id.clone(),
            staff_name: staff.name.clone(),
            classroom_id: entry.classroom_id,
            classroom_name: classroom.name.clone(),
        }
    }
}
