// ==========================================
// 院系排课系统 - 课次落位引擎
// ==========================================
// 红线: 教师/教室同一格子不得重复占用
// 红线: 只允许有授课资格的教师授课
// 红线: 欠排不是错误 (无教师整门跳过, 网格耗尽丢弃课次)
// ==========================================
// 职责: 贪心落位 (按课程输入顺序, 逐课次扫描周网格)
// 输入: 课程 + 教师 + 教室 + 约束 (约束只接收不读取)
// 输出: TimetableEntry 列表 + 每门课覆盖情况
// ==========================================

use crate::domain::department::{Classroom, Constraint, DepartmentId};
use crate::domain::subject::{StaffMember, Subject};
use crate::domain::time_grid::TimeGrid;
use crate::domain::timetable::{
    GenerationOutcome, ShortfallReason, SubjectCoverage, TimetableEntry,
};
use crate::domain::types::{RoomType, SubjectType};
use crate::engine::conflict_index::ConflictIndex;
use crate::engine::eligibility::EligibilityResolver;
use crate::engine::strategy::{FirstFitStrategy, PlacementStrategy};
use crate::engine::workload::WorkloadTracker;
use tracing::{debug, instrument};

// ==========================================
// GenerationInput - 单次生成的输入快照
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct GenerationInput {
    pub subjects: Vec<Subject>,
    pub staff: Vec<StaffMember>,
    pub classrooms: Vec<Classroom>,
    pub constraints: Vec<Constraint>,
}

// ==========================================
// RoomPolicy - 教室准入规则
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoomPolicy {
    /// true: 实验课只进实验室, 理论课不进实验室
    pub match_room_type: bool,
}

impl RoomPolicy {
    /// 教室是否可用于该课程 (必须同院系)
    pub fn admits(&self, subject: &Subject, classroom: &Classroom) -> bool {
        if classroom.department_id != subject.department_id {
            return false;
        }
        if !self.match_room_type {
            return true;
        }
        match subject.subject_type {
            SubjectType::Lab => classroom.room_type == RoomType::Lab,
            SubjectType::Theory => classroom.room_type != RoomType::Lab,
        }
    }
}

// ==========================================
// SlotAssigner - 课次落位引擎
// ==========================================
pub struct SlotAssigner<S = FirstFitStrategy>
where
    S: PlacementStrategy,
{
    grid: TimeGrid,
    resolver: EligibilityResolver,
    room_policy: RoomPolicy,
    strategy: S,
}

impl SlotAssigner<FirstFitStrategy> {
    /// 标准网格 + 首个可行落位
    pub fn new() -> Self {
        Self {
            grid: TimeGrid::standard(),
            resolver: EligibilityResolver::new(),
            room_policy: RoomPolicy::default(),
            strategy: FirstFitStrategy,
        }
    }
}

impl Default for SlotAssigner<FirstFitStrategy> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> SlotAssigner<S>
where
    S: PlacementStrategy,
{
    /// 替换落位策略
    pub fn with_strategy<T: PlacementStrategy>(self, strategy: T) -> SlotAssigner<T> {
        SlotAssigner {
            grid: self.grid,
            resolver: self.resolver,
            room_policy: self.room_policy,
            strategy,
        }
    }

    pub fn with_room_policy(mut self, room_policy: RoomPolicy) -> Self {
        self.room_policy = room_policy;
        self
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn room_policy(&self) -> RoomPolicy {
        self.room_policy
    }

    /// 执行一次完整生成
    ///
    /// 工作量计数与冲突索引在此创建, 生成结束后丢弃
    ///
    /// # 参数
    /// - department_id: 院系
    /// - version: 本次生成对应的版本号 (写入每个条目)
    /// - input: 输入快照
    #[instrument(skip(self, input), fields(
        strategy = self.strategy.name(),
        subjects_count = input.subjects.len(),
        staff_count = input.staff.len(),
        classrooms_count = input.classrooms.len(),
        constraints_count = input.constraints.len()
    ))]
    pub fn generate(
        &self,
        department_id: DepartmentId,
        version: i64,
        input: &GenerationInput,
    ) -> GenerationOutcome {
        let mut tracker = WorkloadTracker::new(&input.staff);
        let mut index = ConflictIndex::new();
        let mut entries = Vec::new();
        let mut coverage = Vec::with_capacity(input.subjects.len());

        for subject in &input.subjects {
            let requested = subject.sessions_needed();

            // 1. 授课资格
            let eligible = self.resolver.eligible_staff(subject, &input.staff);
            if eligible.is_empty() {
                debug!(subject_id = subject.id, "无可授课教师, 跳过课程");
                coverage.push(SubjectCoverage {
                    subject_id: subject.id,
                    requested,
                    scheduled: 0,
                    shortfall_reason: Some(ShortfallReason::NoEligibleStaff),
                });
                continue;
            }

            // 2. 教室候选 (院系过滤, 保持输入顺序)
            let rooms: Vec<&Classroom> = input
                .classrooms
                .iter()
                .filter(|room| self.room_policy.admits(subject, room))
                .collect();

            // 3. 逐课次落位, 每次独立扫描
            let mut scheduled = 0;
            for _ in 0..requested {
                let placement = self.strategy.place(
                    subject,
                    &eligible,
                    &rooms,
                    &self.grid,
                    &tracker,
                    &index,
                );

                let Some(placement) = placement else {
                    continue;
                };

                index.occupy(
                    &placement.staff.id,
                    placement.classroom.id,
                    placement.day,
                    placement.time_slot,
                );
                tracker.increment(&placement.staff.id);
                entries.push(TimetableEntry {
                    day: placement.day,
                    time_slot: placement.time_slot,
                    subject_id: subject.id,
                    staff_id: placement.staff.id.clone(),
                    classroom_id: placement.classroom.id,
                    department_id,
                    version,
                });
                scheduled += 1;
            }

            if scheduled < requested {
                debug!(
                    subject_id = subject.id,
                    requested,
                    scheduled,
                    "网格耗尽, 部分课次丢弃"
                );
            }

            coverage.push(SubjectCoverage {
                subject_id: subject.id,
                requested,
                scheduled,
                shortfall_reason: (scheduled < requested).then_some(ShortfallReason::GridExhausted),
            });
        }

        debug!(
            entries_count = entries.len(),
            total_workload = tracker.total(),
            "生成完成"
        );

        GenerationOutcome {
            department_id,
            version,
            entries,
            coverage,
        }
    }
}
