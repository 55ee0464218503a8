// ==========================================
// 院系排课系统 - 生成配置读取 Trait
// ==========================================
// 职责: 定义排课生成所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use std::error::Error;

// ==========================================
// GenerationConfigReader Trait
// ==========================================
// 用途: TimetableApi 在生成前读取开关
// 实现者: ConfigManager（从 config_kv 表读取）
pub trait GenerationConfigReader: Send + Sync {
    /// 输入不全时是否拒绝生成（课程/教师/教室任一为空）
    ///
    /// # 默认值
    /// - false（照常生成零条目版本）
    fn get_reject_insufficient_data(&self) -> Result<bool, Box<dyn Error>>;

    /// 是否按课程类型匹配教室类型（lab 课只排 lab 教室）
    ///
    /// # 默认值
    /// - false（院系内任意教室）
    fn get_match_room_type(&self) -> Result<bool, Box<dyn Error>>;

    /// 未指定生成人时的默认值
    ///
    /// # 默认值
    /// - "system"
    fn get_default_created_by(&self) -> Result<String, Box<dyn Error>>;

    /// 全部配置的快照（JSON, 写入版本头）
    fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>>;
}
