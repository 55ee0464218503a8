// ==========================================
// 院系排课系统 - 课表 API
// ==========================================
// 职责: 课表生成、版本查询、明细查询
// 流程: 院系校验 → 加载输入 → 分配版本号 → 生成 → 持久化 → 视图
// 红线: 院系不存在时不得分配版本号
// 红线: 一次生成只分配一次版本号、只写一次
// ==========================================

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::config::GenerationConfigReader;
use crate::domain::department::{Classroom, ClassroomId, DepartmentId};
use crate::domain::subject::{StaffMember, Subject, SubjectId};
use crate::domain::timetable::{SubjectCoverage, TimetableSessionView, TimetableVersion};
use crate::engine::{GenerationInput, RoomPolicy, SlotAssigner};
use crate::repository::{DepartmentDataRepository, TimetableVersionRepository, TimetableVersionStore};

// ==========================================
// 响应结构
// ==========================================

/// 生成课表响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTimetableResponse {
    pub department_id: DepartmentId,
    pub department_name: String,
    pub version: i64,
    pub generated_at: NaiveDateTime,
    pub sessions: Vec<TimetableSessionView>,
    pub coverage: Vec<SubjectCoverage>,
    pub requested_sessions: usize,
    pub scheduled_sessions: usize,
}

/// 课表明细（版本头 + 展示视图）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableDetail {
    pub version: TimetableVersion,
    pub sessions: Vec<TimetableSessionView>,
}

// ==========================================
// TimetableApi - 课表 API
// ==========================================

/// 课表API
///
/// 职责：
/// 1. 按院系生成新版本课表
/// 2. 版本列表查询
/// 3. 指定版本/最新版本明细查询
pub struct TimetableApi {
    department_repo: Arc<DepartmentDataRepository>,
    version_repo: Arc<TimetableVersionRepository>,
    // 版本号分配与写入（默认即 version_repo）
    version_store: Arc<dyn TimetableVersionStore>,
    config: Arc<dyn GenerationConfigReader>,
}

impl TimetableApi {
    /// 创建新的TimetableApi实例
    pub fn new(
        department_repo: Arc<DepartmentDataRepository>,
        version_repo: Arc<TimetableVersionRepository>,
        config: Arc<dyn GenerationConfigReader>,
    ) -> Self {
        let version_store: Arc<dyn TimetableVersionStore> = version_repo.clone();
        Self {
            department_repo,
            version_repo,
            version_store,
            config,
        }
    }

    /// 替换版本存储（版本号分配与写入）; 查询仍走 version_repo, 仅供测试注入
    #[cfg(test)]
    pub(crate) fn with_version_store(mut self, version_store: Arc<dyn TimetableVersionStore>) -> Self {
        self.version_store = version_store;
        self
    }

    // ==========================================
    // 生成接口
    // ==========================================

    /// 为院系生成新版本课表
    ///
    /// # 参数
    /// - department_id: 院系ID
    /// - created_by: 生成人（None/空串 => generation.default_created_by）
    ///
    /// # 返回
    /// - Ok(GenerateTimetableResponse): 新版本及展示视图（可能欠排, 见 coverage）
    /// - Err(ApiError::NotFound): 院系不存在
    /// - Err(ApiError::InsufficientData): 输入不全且开启了拒绝开关
    /// - Err(ApiError::VersionConflict): 版本号被并发生成占用（可重试）
    #[instrument(skip(self, created_by))]
    pub fn generate_timetable(
        &self,
        department_id: DepartmentId,
        created_by: Option<&str>,
    ) -> ApiResult<GenerateTimetableResponse> {
        // 1. 院系校验
        let department = self
            .department_repo
            .find_department(department_id)?
            .ok_or_else(|| ApiError::NotFound(format!("院系(id={})不存在", department_id)))?;

        // 2. 读取配置
        let reject_insufficient = self
            .config
            .get_reject_insufficient_data()
            .map_err(config_error)?;
        let match_room_type = self.config.get_match_room_type().map_err(config_error)?;
        let created_by = match created_by.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.config.get_default_created_by().map_err(config_error)?,
        };

        // 3. 加载输入快照
        let input = self.department_repo.load_generation_input(department_id)?;
        info!(
            department_id,
            subjects = input.subjects.len(),
            staff = input.staff.len(),
            classrooms = input.classrooms.len(),
            "开始生成课表"
        );

        if reject_insufficient {
            let missing = missing_inputs(&input);
            if !missing.is_empty() {
                return Err(ApiError::InsufficientData {
                    department_id,
                    missing: missing.join(","),
                });
            }
        }

        // 4. 分配版本号（每次生成仅一次）
        let version = self.version_store.next_version(department_id)?;

        // 5. 生成
        let assigner = SlotAssigner::new().with_room_policy(RoomPolicy { match_room_type });
        let outcome = assigner.generate(department_id, version, &input);

        for shortfall in outcome.shortfalls() {
            debug!(
                subject_id = shortfall.subject_id,
                requested = shortfall.requested,
                scheduled = shortfall.scheduled,
                reason = ?shortfall.shortfall_reason,
                "课程欠排"
            );
        }

        // 6. 持久化（版本头 + 全部条目, 单事务）
        let generated_at = chrono::Local::now().naive_local();
        let header = TimetableVersion {
            version_id: uuid::Uuid::new_v4().to_string(),
            department_id,
            version_no: version,
            entry_count: outcome.scheduled_sessions() as i64,
            requested_sessions: outcome.requested_sessions() as i64,
            config_snapshot_json: Some(self.config.get_config_snapshot().map_err(config_error)?),
            created_by,
            created_at: generated_at,
        };
        self.version_store.persist(&header, &outcome.entries)?;

        // 7. 展示视图
        let lookup = ViewLookup::new(&input);
        let sessions = outcome
            .entries
            .iter()
            .map(|entry| lookup.view(entry))
            .collect::<ApiResult<Vec<_>>>()?;

        info!(
            department_id,
            version,
            requested = outcome.requested_sessions(),
            scheduled = outcome.scheduled_sessions(),
            "课表生成完成"
        );

        Ok(GenerateTimetableResponse {
            department_id,
            department_name: department.name,
            version,
            generated_at,
            requested_sessions: outcome.requested_sessions(),
            scheduled_sessions: outcome.scheduled_sessions(),
            sessions,
            coverage: outcome.coverage,
        })
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 查询院系的所有版本（新版本在前）
    pub fn list_versions(&self, department_id: DepartmentId) -> ApiResult<Vec<TimetableVersion>> {
        self.ensure_department(department_id)?;
        Ok(self.version_repo.list_versions(department_id)?)
    }

    /// 查询指定版本的课表明细
    pub fn get_timetable(&self, department_id: DepartmentId, version: i64) -> ApiResult<TimetableDetail> {
        self.ensure_department(department_id)?;

        let header = self
            .version_repo
            .find_version(department_id, version)?
            .ok_or_else(|| {
                ApiError::NotFound(format!(
                    "课表版本(department_id={}, version={})不存在",
                    department_id, version
                ))
            })?;
        let sessions = self.version_repo.find_session_views(department_id, version)?;

        Ok(TimetableDetail {
            version: header,
            sessions,
        })
    }

    /// 查询最新版本的课表明细（无版本时返回 None）
    pub fn get_latest_timetable(&self, department_id: DepartmentId) -> ApiResult<Option<TimetableDetail>> {
        self.ensure_department(department_id)?;

        // 只看有版本头的版本; 旧库中仅有条目的版本号不在此列
        match self.version_repo.list_versions(department_id)?.into_iter().next() {
            Some(header) => {
                let sessions = self
                    .version_repo
                    .find_session_views(department_id, header.version_no)?;
                Ok(Some(TimetableDetail {
                    version: header,
                    sessions,
                }))
            }
            None => Ok(None),
        }
    }

    fn ensure_department(&self, department_id: DepartmentId) -> ApiResult<()> {
        match self.department_repo.find_department(department_id)? {
            Some(_) => Ok(()),
            None => Err(ApiError::NotFound(format!("院系(id={})不存在", department_id))),
        }
    }
}

fn config_error(e: Box<dyn std::error::Error>) -> ApiError {
    ApiError::InternalError(format!("配置读取失败: {}", e))
}

/// 输入缺项（课程/已锁定选课的教师/教室）
fn missing_inputs(input: &GenerationInput) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if input.subjects.is_empty() {
        missing.push("subjects");
    }
    if !input.staff.iter().any(|s| s.subjects_locked) {
        missing.push("staff");
    }
    if input.classrooms.is_empty() {
        missing.push("classrooms");
    }
    missing
}

// 按 id 查找生成输入, 拼装展示视图
struct ViewLookup<'a> {
    subjects: HashMap<SubjectId, &'a Subject>,
    staff: HashMap<&'a str, &'a StaffMember>,
    classrooms: HashMap<ClassroomId, &'a Classroom>,
}

impl<'a> ViewLookup<'a> {
    fn new(input: &'a GenerationInput) -> Self {
        Self {
            subjects: input.subjects.iter().map(|s| (s.id, s)).collect(),
            staff: input.staff.iter().map(|s| (s.id.as_str(), s)).collect(),
            classrooms: input.classrooms.iter().map(|c| (c.id, c)).collect(),
        }
    }

    fn view(&self, entry: &crate::domain::timetable::TimetableEntry) -> ApiResult<TimetableSessionView> {
        let subject = self.subjects.get(&entry.subject_id).ok_or_else(|| {
            ApiError::InternalError(format!("条目引用了未知课程: subject_id={}", entry.subject_id))
        })?;
        let staff = self.staff.get(entry.staff_id.as_str()).ok_or_else(|| {
            ApiError::InternalError(format!("条目引用了未知教师: staff_id={}", entry.staff_id))
        })?;
        let classroom = self.classrooms.get(&entry.classroom_id).ok_or_else(|| {
            ApiError::InternalError(format!("条目引用了未知教室: classroom_id={}", entry.classroom_id))
        })?;

        Ok(TimetableSessionView::from_entry(entry, subject, staff, classroom))
    }
}
