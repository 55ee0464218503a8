// ==========================================
// 院系排课系统 - 领域类型定义
// ==========================================
// 职责: 星期/节次/课程类型/教室类型/职称等枚举
// 约定: to_db_str 与数据库存储值一致, FromStr 用于反向解析
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 星期 (Day)
// ==========================================
// 红线: 变体顺序即扫描顺序 (周一优先)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    /// 固定周网格中的全部工作日（按扫描顺序）
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    pub fn to_db_str(&self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl FromStr for Day {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Monday" => Ok(Day::Monday),
            "Tuesday" => Ok(Day::Tuesday),
            "Wednesday" => Ok(Day::Wednesday),
            "Thursday" => Ok(Day::Thursday),
            "Friday" => Ok(Day::Friday),
            other => Err(format!("未知星期: {}", other)),
        }
    }
}

// ==========================================
// 节次 (Time Slot)
// ==========================================
// 7 个固定节次, 12:00-13:00 之后跳过午休
// 序列化格式: 节次标签 (与 timetables.time_slot 列一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeSlot {
    #[serde(rename = "09:00-10:00")]
    Slot0900,
    #[serde(rename = "10:00-11:00")]
    Slot1000,
    #[serde(rename = "11:00-12:00")]
    Slot1100,
    #[serde(rename = "12:00-13:00")]
    Slot1200,
    #[serde(rename = "14:00-15:00")]
    Slot1400,
    #[serde(rename = "15:00-16:00")]
    Slot1500,
    #[serde(rename = "16:00-17:00")]
    Slot1600,
}

impl TimeSlot {
    /// 固定周网格中的全部节次（按扫描顺序）
    pub const ALL: [TimeSlot; 7] = [
        TimeSlot::Slot0900,
        TimeSlot::Slot1000,
        TimeSlot::Slot1100,
        TimeSlot::Slot1200,
        TimeSlot::Slot1400,
        TimeSlot::Slot1500,
        TimeSlot::Slot1600,
    ];

    /// 节次标签, 如 "09:00-10:00"
    pub fn label(&self) -> &'static str {
        match self {
            TimeSlot::Slot0900 => "09:00-10:00",
            TimeSlot::Slot1000 => "10:00-11:00",
            TimeSlot::Slot1100 => "11:00-12:00",
            TimeSlot::Slot1200 => "12:00-13:00",
            TimeSlot::Slot1400 => "14:00-15:00",
            TimeSlot::Slot1500 => "15:00-16:00",
            TimeSlot::Slot1600 => "16:00-17:00",
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        self.label()
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for TimeSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        TimeSlot::ALL
            .iter()
            .copied()
            .find(|slot| slot.label() == trimmed)
            .ok_or_else(|| format!("未知节次: {}", trimmed))
    }
}

// ==========================================
// 课程类型 (Subject Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectType {
    Theory, // 理论课
    Lab,    // 实验课
}

impl SubjectType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            SubjectType::Theory => "theory",
            SubjectType::Lab => "lab",
        }
    }
}

impl fmt::Display for SubjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl FromStr for SubjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "theory" => Ok(SubjectType::Theory),
            "lab" => Ok(SubjectType::Lab),
            other => Err(format!("未知课程类型: {}", other)),
        }
    }
}

// ==========================================
// 教室类型 (Room Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Lecture, // 讲堂
    Lab,     // 实验室
    Seminar, // 研讨室
}

impl RoomType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            RoomType::Lecture => "lecture",
            RoomType::Lab => "lab",
            RoomType::Seminar => "seminar",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl FromStr for RoomType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lecture" => Ok(RoomType::Lecture),
            "lab" => Ok(RoomType::Lab),
            "seminar" => Ok(RoomType::Seminar),
            other => Err(format!("未知教室类型: {}", other)),
        }
    }
}

// ==========================================
// 教师职称 (Staff Role)
// ==========================================
// 与 users.staff_role / constraints.role 一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    AssistantProfessor, // 助理教授
    Professor,          // 教授
    Hod,                // 系主任
}

impl StaffRole {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            StaffRole::AssistantProfessor => "assistant_professor",
            StaffRole::Professor => "professor",
            StaffRole::Hod => "hod",
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl FromStr for StaffRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "assistant_professor" => Ok(StaffRole::AssistantProfessor),
            "professor" => Ok(StaffRole::Professor),
            "hod" => Ok(StaffRole::Hod),
            other => Err(format!("未知职称: {}", other)),
        }
    }
}

// ==========================================
// 约束适用课程类型 (Constraint Subject Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintSubjectType {
    Theory,
    Lab,
    Both,
}

impl ConstraintSubjectType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ConstraintSubjectType::Theory => "theory",
            ConstraintSubjectType::Lab => "lab",
            ConstraintSubjectType::Both => "both",
        }
    }
}

impl FromStr for ConstraintSubjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "theory" => Ok(ConstraintSubjectType::Theory),
            "lab" => Ok(ConstraintSubjectType::Lab),
            "both" => Ok(ConstraintSubjectType::Both),
            other => Err(format!("未知约束课程类型: {}", other)),
        }
    }
}
