// ==========================================
// 院系排课系统 - 引擎层
// ==========================================
// 职责: 排课规则计算, 纯内存, 不拼 SQL
// 红线: 工作量计数与冲突索引只属于一次生成
// ==========================================

pub mod conflict_index;
pub mod eligibility;
pub mod slot_assigner;
pub mod strategy;
pub mod workload;

// 重导出核心引擎
pub use conflict_index::ConflictIndex;
pub use eligibility::EligibilityResolver;
pub use slot_assigner::{GenerationInput, RoomPolicy, SlotAssigner};
pub use strategy::{FirstFitStrategy, Placement, PlacementStrategy};
pub use workload::WorkloadTracker;
