// ==========================================
// 院系排课系统 - 配置层
// ==========================================
// 职责: 系统配置读取, 生成时记录快照
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod generation_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use generation_config_trait::GenerationConfigReader;
