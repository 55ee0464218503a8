// ==========================================
// 院系排课系统 - 院系输入数据仓储 (只读)
// ==========================================
// 红线: Repository 不含业务逻辑
// 红线: 输入表由外部系统维护, 本仓储只读不写
// ==========================================
// 查询口径:
// - 课程/教室: department_id = ?
// - 教师: department_id = ? AND role = 'staff' (不按锁定过滤, 由资格判定处理)
// - 约束: department_id = ? OR department_id IS NULL (全局)
// ==========================================

use crate::domain::department::{Classroom, Constraint, Department, DepartmentId};
use crate::domain::subject::{StaffMember, Subject, SubjectId};
use crate::domain::types::StaffRole;
use crate::engine::GenerationInput;
use crate::repository::error::{parse_text_column, RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

// ==========================================
// DepartmentDataRepository - 院系输入数据仓储
// ==========================================
pub struct DepartmentDataRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DepartmentDataRepository {
    /// 创建新的DepartmentDataRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 按id查询院系
    pub fn find_department(&self, department_id: DepartmentId) -> RepositoryResult<Option<Department>> {
        let conn = self.get_conn()?;

        let department = conn
            .query_row(
                "SELECT id, name, code FROM departments WHERE id = ?",
                params![department_id],
                |row| {
                    Ok(Department {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        code: row.get(2)?,
                    })
                },
            )
            .optional()?;

        Ok(department)
    }

    /// 查询院系课程（按id排序）
    pub fn list_subjects(&self, department_id: DepartmentId) -> RepositoryResult<Vec<Subject>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT id, name, code, credits, department_id, subject_type
               FROM subjects
               WHERE department_id = ?
               ORDER BY id"#,
        )?;

        let subjects = stmt
            .query_map(params![department_id], |row| {
                Ok(Subject {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    code: row.get(2)?,
                    credits: row.get(3)?,
                    department_id: row.get(4)?,
                    subject_type: parse_text_column(row, 5)?,
                })
            })?
            .collect::<Result<Vec<Subject>, _>>()?;

        Ok(subjects)
    }

    /// 查询院系教师（role = 'staff', 按写入顺序）
    pub fn list_staff(&self, department_id: DepartmentId) -> RepositoryResult<Vec<StaffMember>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT id, name, department_id, staff_role, subjects_selected, subjects_locked
               FROM users
               WHERE department_id = ? AND role = 'staff'
               ORDER BY rowid"#,
        )?;

        let rows = stmt
            .query_map(params![department_id], |row| {
                let staff_role: Option<String> = row.get(3)?;
                let role = match staff_role {
                    Some(raw) => Some(raw.parse::<StaffRole>().map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            3,
                            rusqlite::types::Type::Text,
                            e.into(),
                        )
                    })?),
                    None => None,
                };
                Ok((
                    StaffMember {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        department_id: row.get(2)?,
                        role,
                        selected_subject_ids: BTreeSet::new(),
                        subjects_locked: row.get(5)?,
                    },
                    row.get::<_, Option<String>>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(mut member, selected_raw)| {
                member.selected_subject_ids =
                    parse_selected_subjects(&member.id, selected_raw.as_deref())?;
                Ok(member)
            })
            .collect()
    }

    /// 查询院系教室（按id排序）
    pub fn list_classrooms(&self, department_id: DepartmentId) -> RepositoryResult<Vec<Classroom>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT id, name, capacity, department_id, room_type
               FROM classrooms
               WHERE department_id = ?
               ORDER BY id"#,
        )?;

        let classrooms = stmt
            .query_map(params![department_id], |row| {
                Ok(Classroom {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    capacity: row.get(2)?,
                    department_id: row.get(3)?,
                    room_type: parse_text_column(row, 4)?,
                })
            })?
            .collect::<Result<Vec<Classroom>, _>>()?;

        Ok(classrooms)
    }

    /// 查询院系约束（含全局约束）
    pub fn list_constraints(&self, department_id: DepartmentId) -> RepositoryResult<Vec<Constraint>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT id, department_id, role, subject_type, max_subjects, max_hours, created_by
               FROM constraints
               WHERE department_id = ? OR department_id IS NULL
               ORDER BY id"#,
        )?;

        let constraints = stmt
            .query_map(params![department_id], |row| {
                Ok(Constraint {
                    id: row.get(0)?,
                    department_id: row.get(1)?,
                    role: parse_text_column(row, 2)?,
                    subject_type: parse_text_column(row, 3)?,
                    max_subjects: row.get(4)?,
                    max_hours: row.get(5)?,
                    created_by: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<Constraint>, _>>()?;

        Ok(constraints)
    }

    /// 一次性加载生成所需的全部输入
    pub fn load_generation_input(&self, department_id: DepartmentId) -> RepositoryResult<GenerationInput> {
        Ok(GenerationInput {
            subjects: self.list_subjects(department_id)?,
            staff: self.list_staff(department_id)?,
            classrooms: self.list_classrooms(department_id)?,
            constraints: self.list_constraints(department_id)?,
        })
    }
}

/// 解析 users.subjects_selected (JSON 数组)
///
/// NULL / 空串 => 空集合; 无法解析 => FieldValueError
fn parse_selected_subjects(
    staff_id: &str,
    raw: Option<&str>,
) -> RepositoryResult<BTreeSet<SubjectId>> {
    let raw = match raw.map(str::trim) {
        Some(s) if !s.is_empty() && s != "null" => s,
        _ => return Ok(BTreeSet::new()),
    };

    let ids: Vec<SubjectId> =
        serde_json::from_str(raw).map_err(|e| RepositoryError::FieldValueError {
            field: format!("users.subjects_selected (id={})", staff_id),
            message: e.to_string(),
        })?;

    Ok(ids.into_iter().collect())
}
