// ==========================================
// 院系排课系统 - 周课表网格
// ==========================================
// 红线: 网格全局固定, 单次生成内不可变
// 红线: 扫描顺序 = 星期在外层, 节次在内层
// ==========================================

use crate::domain::types::{Day, TimeSlot};

/// 固定周网格（周一至周五 × 7 个节次）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeGrid {
    days: Vec<Day>,
    slots: Vec<TimeSlot>,
}

impl TimeGrid {
    /// 标准网格
    pub fn standard() -> Self {
        Self {
            days: Day::ALL.to_vec(),
            slots: TimeSlot::ALL.to_vec(),
        }
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    /// 网格单元总数
    pub fn len(&self) -> usize {
        self.days.len() * self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 按扫描优先级遍历 (day, slot)
    pub fn iter(&self) -> impl Iterator<Item = (Day, TimeSlot)> + '_ {
        self.days
            .iter()
            .flat_map(move |day| self.slots.iter().map(move |slot| (*day, *slot)))
    }
}

impl Default for TimeGrid {
    fn default() -> Self {
        Self::standard()
    }
}
