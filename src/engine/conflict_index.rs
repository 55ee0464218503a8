// ==========================================
// 院系排课系统 - 占用冲突索引
// ==========================================
// 红线: 同一 (教师, 星期, 节次) 只能有一次课
// 红线: 同一 (教室, 星期, 节次) 只能有一次课
// ==========================================
// 生命周期: 一次生成独占, 结束即丢弃, 无淘汰
// ==========================================

use crate::domain::department::ClassroomId;
use crate::domain::subject::StaffId;
use crate::domain::types::{Day, TimeSlot};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default)]
pub struct ConflictIndex {
    staff_slots: HashMap<StaffId, HashSet<(Day, TimeSlot)>>,
    classroom_slots: HashSet<(ClassroomId, Day, TimeSlot)>,
}

impl ConflictIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_staff_free(&self, staff_id: &str, day: Day, slot: TimeSlot) -> bool {
        self.staff_slots
            .get(staff_id)
            .map_or(true, |slots| !slots.contains(&(day, slot)))
    }

    pub fn is_classroom_free(&self, classroom_id: ClassroomId, day: Day, slot: TimeSlot) -> bool {
        !self.classroom_slots.contains(&(classroom_id, day, slot))
    }

    /// 同时登记教师与教室占用
    pub fn occupy(&mut self, staff_id: &str, classroom_id: ClassroomId, day: Day, slot: TimeSlot) {
        self.staff_slots
            .entry(staff_id.to_string())
            .or_default()
            .insert((day, slot));
        self.classroom_slots.insert((classroom_id, day, slot));
    }

    /// 已登记的教室占用数 (= 已提交课次数)
    pub fn occupied_count(&self) -> usize {
        self.classroom_slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occupy_marks_both_keys() {
        let mut index = ConflictIndex::new();
        assert!(index.is_staff_free("s1", Day::Monday, TimeSlot::Slot0900));
        assert!(index.is_classroom_free(10, Day::Monday, TimeSlot::Slot0900));

        index.occupy("s1", 10, Day::Monday, TimeSlot::Slot0900);

        assert!(!index.is_staff_free("s1", Day::Monday, TimeSlot::Slot0900));
        assert!(!index.is_classroom_free(10, Day::Monday, TimeSlot::Slot0900));
        assert_eq!(index.occupied_count(), 1);
    }

    #[test]
    fn test_keys_are_independent() {
        let mut index = ConflictIndex::new();
        index.occupy("s1", 10, Day::Monday, TimeSlot::Slot0900);

        // 其他节次 / 其他星期 / 其他实体不受影响
        assert!(index.is_staff_free("s1", Day::Monday, TimeSlot::Slot1000));
        assert!(index.is_staff_free("s1", Day::Tuesday, TimeSlot::Slot0900));
        assert!(index.is_staff_free("s2", Day::Monday, TimeSlot::Slot0900));
        assert!(index.is_classroom_free(11, Day::Monday, TimeSlot::Slot0900));
    }
}
