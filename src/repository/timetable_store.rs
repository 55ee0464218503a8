// ==========================================
// 院系排课系统 - 课表版本存储 Trait
// ==========================================
// 职责: 定义排课核心所需的版本分配/持久化接口（不包含实现）
// 红线: 同一院系两次并发生成不得落成相同版本号
// 红线: 一次生成的条目全部写入或全部不写
// ==========================================

use crate::domain::department::DepartmentId;
use crate::domain::timetable::{TimetableEntry, TimetableVersion};
use crate::repository::error::RepositoryResult;

// ==========================================
// TimetableVersionStore Trait
// ==========================================
// 实现者: TimetableVersionRepository（SQLite）
pub trait TimetableVersionStore: Send + Sync {
    /// 下一个版本号 = 该院系已有最大版本号 + 1（无版本时为 1）
    fn next_version(&self, department_id: DepartmentId) -> RepositoryResult<i64>;

    /// 写入版本头及全部条目
    ///
    /// # 错误
    /// - `RepositoryError::VersionConflict`: 版本号已被其他生成占用（可重试）
    /// - `RepositoryError::ValidationError`: 条目与版本头的院系/版本号不一致
    fn persist(&self, header: &TimetableVersion, entries: &[TimetableEntry]) -> RepositoryResult<()>;
}
