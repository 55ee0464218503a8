// ==========================================
// 院系排课系统 - 授课资格判定
// ==========================================
// 红线: 只有"已锁定且已选择该课程"的教师可被排课
// ==========================================
// 职责: 按课程筛选可授课教师
// 输入: 课程 + 教师列表 (院系内, role = staff)
// 输出: 可授课教师 (保持输入顺序)
// ==========================================

use crate::domain::subject::{StaffMember, Subject};

// ==========================================
// EligibilityResolver - 授课资格判定器
// ==========================================
// 无状态, 不修改教师记录
pub struct EligibilityResolver {}

impl EligibilityResolver {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算课程的可授课教师
    ///
    /// # 参数
    /// - subject: 课程
    /// - staff: 教师列表
    ///
    /// # 返回
    /// - 按输入顺序排列的可授课教师; 无人可授课时返回空列表 (不是错误)
    pub fn eligible_staff<'a>(
        &self,
        subject: &Subject,
        staff: &'a [StaffMember],
    ) -> Vec<&'a StaffMember> {
        staff
            .iter()
            .filter(|member| member.has_locked_subject(subject.id))
            .collect()
    }

    /// 判断单个教师是否可授该课程
    pub fn is_eligible(&self, subject: &Subject, member: &StaffMember) -> bool {
        member.has_locked_subject(subject.id)
    }
}

impl Default for EligibilityResolver {
    fn default() -> Self {
        Self::new()
    }
}
