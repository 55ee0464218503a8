// ==========================================
// 院系排课系统 - 课表版本数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 红线: 版本号分配与写入在同一 IMMEDIATE 事务内完成
// ==========================================
// 表: timetable_version (版本头, UNIQUE(department_id, version_no))
//     timetables        (课表条目)
// ==========================================

use crate::domain::department::DepartmentId;
use crate::domain::timetable::{TimetableEntry, TimetableSessionView, TimetableVersion};
use crate::repository::error::{parse_text_column, RepositoryError, RepositoryResult};
use crate::repository::timetable_store::TimetableVersionStore;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ==========================================
// TimetableVersionRepository - 课表版本仓储
// ==========================================
pub struct TimetableVersionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TimetableVersionRepository {
    /// 创建新的TimetableVersionRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询院系已占用的最大版本号（无版本时返回 None）
    ///
    /// 同时统计版本头与 timetables 条目, 旧库中只有条目、没有版本头的版本也算已占用
    pub fn latest_version(&self, department_id: DepartmentId) -> RepositoryResult<Option<i64>> {
        let conn = self.get_conn()?;
        Ok(max_version_no(&conn, department_id)?)
    }

    /// 查询院系的所有版本（新版本在前）
    pub fn list_versions(&self, department_id: DepartmentId) -> RepositoryResult<Vec<TimetableVersion>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT version_id, department_id, version_no, entry_count, requested_sessions,
                      config_snapshot_json, created_by, created_at
               FROM timetable_version
               WHERE department_id = ?
               ORDER BY version_no DESC"#,
        )?;

        let versions = stmt
            .query_map(params![department_id], |row| self.map_version_row(row))?
            .collect::<Result<Vec<TimetableVersion>, _>>()?;

        Ok(versions)
    }

    /// 按 (院系, 版本号) 查询版本头
    pub fn find_version(
        &self,
        department_id: DepartmentId,
        version_no: i64,
    ) -> RepositoryResult<Option<TimetableVersion>> {
        let conn = self.get_conn()?;

        let version = conn
            .query_row(
                r#"SELECT version_id, department_id, version_no, entry_count, requested_sessions,
                          config_snapshot_json, created_by, created_at
                   FROM timetable_version
                   WHERE department_id = ? AND version_no = ?"#,
                params![department_id, version_no],
                |row| self.map_version_row(row),
            )
            .optional()?;

        Ok(version)
    }

    /// 查询版本的全部条目（按生成顺序）
    pub fn find_entries(
        &self,
        department_id: DepartmentId,
        version_no: i64,
    ) -> RepositoryResult<Vec<TimetableEntry>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT day, time_slot, subject_id, staff_id, classroom_id, department_id, version
               FROM timetables
               WHERE department_id = ? AND version = ?
               ORDER BY id"#,
        )?;

        let entries = stmt
            .query_map(params![department_id, version_no], |row| {
                Ok(TimetableEntry {
                    day: parse_text_column(row, 0)?,
                    time_slot: parse_text_column(row, 1)?,
                    subject_id: row.get(2)?,
                    staff_id: row.get(3)?,
                    classroom_id: row.get(4)?,
                    department_id: row.get(5)?,
                    version: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<TimetableEntry>, _>>()?;

        Ok(entries)
    }

    /// 查询版本的展示视图（关联课程/教师/教室名称, 按生成顺序）
    pub fn find_session_views(
        &self,
        department_id: DepartmentId,
        version_no: i64,
    ) -> RepositoryResult<Vec<TimetableSessionView>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT t.day, t.time_slot,
                      t.subject_id, COALESCE(s.name, ''), COALESCE(s.code, ''),
                      t.staff_id, COALESCE(u.name, ''),
                      t.classroom_id, COALESCE(c.name, '')
               FROM timetables t
               LEFT JOIN subjects s ON s.id = t.subject_id
               LEFT JOIN users u ON u.id = t.staff_id
               LEFT JOIN classrooms c ON c.id = t.classroom_id
               WHERE t.department_id = ? AND t.version = ?
               ORDER BY t.id"#,
        )?;

        let views = stmt
            .query_map(params![department_id, version_no], |row| {
                Ok(TimetableSessionView {
                    day: parse_text_column(row, 0)?,
                    time_slot: parse_text_column(row, 1)?,
                    subject_id: row.get(2)?,
                    subject_name: row.get(3)?,
                    subject_code: row.get(4)?,
                    staff_id: row.get(5)?,
                    staff_name: row.get(6)?,
                    classroom_id: row.get(7)?,
                    classroom_name: row.get(8)?,
                })
            })?
            .collect::<Result<Vec<TimetableSessionView>, _>>()?;

        Ok(views)
    }

    /// 映射数据库行到TimetableVersion对象
    fn map_version_row(&self, row: &rusqlite::Row) -> rusqlite::Result<TimetableVersion> {
        Ok(TimetableVersion {
            version_id: row.get(0)?,
            department_id: row.get(1)?,
            version_no: row.get(2)?,
            entry_count: row.get(3)?,
            requested_sessions: row.get(4)?,
            config_snapshot_json: row.get(5)?,
            created_by: row.get(6)?,
            created_at: NaiveDateTime::parse_from_str(&row.get::<_, String>(7)?, DATETIME_FORMAT)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e)))?,
        })
    }
}

// 版本头与条目两张表取最大值
fn max_version_no(conn: &Connection, department_id: DepartmentId) -> rusqlite::Result<Option<i64>> {
    conn.query_row(
        r#"SELECT MAX(v) FROM (
               SELECT MAX(version_no) AS v FROM timetable_version WHERE department_id = ?1
               UNION ALL
               SELECT MAX(version) AS v FROM timetables WHERE department_id = ?1
           )"#,
        params![department_id],
        |row| row.get(0),
    )
}

impl TimetableVersionStore for TimetableVersionRepository {
    fn next_version(&self, department_id: DepartmentId) -> RepositoryResult<i64> {
        Ok(self.latest_version(department_id)?.unwrap_or(0) + 1)
    }

    /// 写入版本头及全部条目
    ///
    /// 说明：
    /// - IMMEDIATE 事务先取写锁, 再复核已占用的最大版本号, 保证同一院系的"读-写"原子性。
    /// - 版本号必须恰好等于当前最大值 + 1; 已被占用 => VersionConflict, 不覆盖。
    /// - 任一条目写入失败则整体回滚。
    #[instrument(skip(self, header, entries), fields(
        department_id = header.department_id,
        version_no = header.version_no,
        entries_count = entries.len()
    ))]
    fn persist(&self, header: &TimetableVersion, entries: &[TimetableEntry]) -> RepositoryResult<()> {
        if let Some(bad) = entries
            .iter()
            .find(|e| e.department_id != header.department_id || e.version != header.version_no)
        {
            return Err(RepositoryError::ValidationError(format!(
                "条目与版本头不一致: entry(department_id={}, version={}) header(department_id={}, version={})",
                bad.department_id, bad.version, header.department_id, header.version_no
            )));
        }

        let mut conn = self.get_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current = max_version_no(&tx, header.department_id)?.unwrap_or(0);

        if header.version_no <= current {
            return Err(RepositoryError::VersionConflict {
                message: format!(
                    "department_id={} 的版本 {} 已被占用 (当前最大版本 {})",
                    header.department_id, header.version_no, current
                ),
            });
        }
        if header.version_no != current + 1 {
            return Err(RepositoryError::ValidationError(format!(
                "版本号不连续: department_id={}, version={}, 期望 {}",
                header.department_id,
                header.version_no,
                current + 1
            )));
        }

        let inserted = tx.execute(
            r#"INSERT INTO timetable_version (
                version_id, department_id, version_no, entry_count, requested_sessions,
                config_snapshot_json, created_by, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
            params![
                &header.version_id,
                &header.department_id,
                &header.version_no,
                &header.entry_count,
                &header.requested_sessions,
                &header.config_snapshot_json,
                &header.created_by,
                &header.created_at.format(DATETIME_FORMAT).to_string(),
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(e) => {
                return Err(match RepositoryError::from(e) {
                    RepositoryError::UniqueConstraintViolation(msg) => {
                        RepositoryError::VersionConflict { message: msg }
                    }
                    other => other,
                });
            }
        }

        {
            let mut stmt = tx.prepare(
                r#"INSERT INTO timetables (
                    department_id, day, time_slot, subject_id, staff_id, classroom_id, version
                ) VALUES (?, ?, ?, ?, ?, ?, ?)"#,
            )?;

            for entry in entries {
                stmt.execute(params![
                    &entry.department_id,
                    entry.day.to_db_str(),
                    entry.time_slot.to_db_str(),
                    &entry.subject_id,
                    &entry.staff_id,
                    &entry.classroom_id,
                    &entry.version,
                ])?;
            }
        }

        tx.commit()?;
        debug!("课表版本已写入");
        Ok(())
    }
}
