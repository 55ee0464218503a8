// ==========================================
// 院系排课系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 按院系生成周课表, 每次生成落为新版本
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 排课算法
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装共享状态
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Day, RoomType, StaffRole, SubjectType, TimeSlot};

// 领域实体
pub use domain::{
    Classroom, Constraint, Department, GenerationOutcome, StaffMember, Subject,
    SubjectCoverage, TimetableEntry, TimetableSessionView, TimetableVersion,
};

// 引擎
pub use engine::{GenerationInput, SlotAssigner};

// API
pub use api::{ApiError, ApiResult, TimetableApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "院系排课系统";
