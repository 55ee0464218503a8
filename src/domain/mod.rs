// ==========================================
// 院系排课系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod department;
pub mod subject;
pub mod time_grid;
pub mod timetable;
pub mod types;

// 重导出核心类型
pub use department::{Classroom, ClassroomId, Constraint, ConstraintId, Department, DepartmentId};
pub use subject::{StaffId, StaffMember, Subject, SubjectId};
pub use time_grid::TimeGrid;
pub use timetable::{
    GenerationOutcome, ShortfallReason, SubjectCoverage, TimetableEntry, TimetableSessionView,
    TimetableVersion,
};
pub use types::{ConstraintSubjectType, Day, RoomType, StaffRole, SubjectType, TimeSlot};
