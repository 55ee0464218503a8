// ==========================================
// 院系排课系统 - 落位策略
// ==========================================
// 用途:
// - 单次课的落位搜索 (找哪个 星期/节次/教师/教室)
// - 提交 (登记占用/计数/生成条目) 由 SlotAssigner 统一完成, 策略只读
// ==========================================

use crate::domain::department::Classroom;
use crate::domain::subject::{StaffMember, Subject};
use crate::domain::time_grid::TimeGrid;
use crate::domain::types::{Day, TimeSlot};
use crate::engine::conflict_index::ConflictIndex;
use crate::engine::workload::WorkloadTracker;

/// 一次课的落位结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement<'a> {
    pub day: Day,
    pub time_slot: TimeSlot,
    pub staff: &'a StaffMember,
    pub classroom: &'a Classroom,
}

/// 落位策略
pub trait PlacementStrategy {
    /// 策略名 (写入日志)
    fn name(&self) -> &'static str;

    /// 为一次课寻找落位, 找不到返回 None (该课次丢弃)
    ///
    /// # 参数
    /// - eligible: 可授课教师 (非空, 输入顺序)
    /// - classrooms: 已按院系 (及可选的教室类型) 过滤的教室 (输入顺序)
    fn place<'a>(
        &self,
        subject: &Subject,
        eligible: &[&'a StaffMember],
        classrooms: &[&'a Classroom],
        grid: &TimeGrid,
        tracker: &WorkloadTracker,
        index: &ConflictIndex,
    ) -> Option<Placement<'a>>;
}

// ==========================================
// FirstFitStrategy - 首个可行落位 (贪心)
// ==========================================
// 规则:
// 1) 按 星期(外) × 节次(内) 顺序扫描
// 2) 每个格子重新取工作量最小的教师; 该教师忙则直接看下一个格子,
//    不在本格子内尝试其他教师
// 3) 教师空闲时取第一间空闲教室; 无空闲教室则看下一个格子
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFitStrategy;

impl PlacementStrategy for FirstFitStrategy {
    fn name(&self) -> &'static str {
        "first_fit"
    }

    fn place<'a>(
        &self,
        _subject: &Subject,
        eligible: &[&'a StaffMember],
        classrooms: &[&'a Classroom],
        grid: &TimeGrid,
        tracker: &WorkloadTracker,
        index: &ConflictIndex,
    ) -> Option<Placement<'a>> {
        for (day, time_slot) in grid.iter() {
            let staff = tracker.least_loaded(eligible)?;
            if !index.is_staff_free(&staff.id, day, time_slot) {
                continue;
            }

            let free_room = classrooms
                .iter()
                .copied()
                .find(|room| index.is_classroom_free(room.id, day, time_slot));

            if let Some(classroom) = free_room {
                return Some(Placement {
                    day,
                    time_slot,
                    staff,
                    classroom,
                });
            }
        }
        None
    }
}
