// ==========================================
// 课表 API 端到端测试
// ==========================================
// 职责: 临时 SQLite 库上验证 生成 → 持久化 → 查询 全流程
// ==========================================


#[cfg(test)]
mod timetable_api_e2e_test {
    use timetable_scheduler::api::ApiError;
    use timetable_scheduler::config::config_keys;
    use timetable_scheduler::db::{ensure_schema, open_sqlite_connection};
    use timetable_scheduler::domain::types::{ConstraintSubjectType, RoomType, StaffRole, SubjectType};
    use timetable_scheduler::logging;
    use timetable_scheduler::repository::DepartmentDataRepository;

    use crate::test_helpers::*;

    /// 标准院系: 2 门理论课 + 1 门实验课, 2 名教师, 1 间讲堂 + 1 间实验室
    fn seed_standard(conn: &rusqlite::Connection) {
        insert_department(conn, 1, "计算机系", "CSE");
        insert_subject(conn, 1, 1, "CS101", 3, SubjectType::Theory);
        insert_subject(conn, 2, 1, "CS102", 2, SubjectType::Theory);
        insert_subject(conn, 3, 1, "CS103L", 2, SubjectType::Lab);
        insert_staff(conn, "t1", 1, &[1, 3], true);
        insert_staff(conn, "t2", 1, &[2, 3], true);
        insert_classroom(conn, 1, 1, "A101", RoomType::Lecture);
        insert_classroom(conn, 2, 1, "LAB1", RoomType::Lab);
    }

    #[test]
    fn test_生成并读回() {
        logging::init_test();
        let (_temp, db_path) = create_test_db().unwrap();
        let conn = open_shared(&db_path);
        seed_standard(&conn.lock().unwrap());
        let api = build_api(conn.clone());

        let resp = api.generate_timetable(1, Some("admin")).unwrap();
        assert_eq!(resp.version, 1);
        assert_eq!(resp.requested_sessions, 7);
        assert_eq!(resp.scheduled_sessions, 7);
        assert!(resp.coverage.iter().all(|c| c.is_complete()));

        let detail = api.get_timetable(1, 1).unwrap();
        assert_eq!(detail.sessions, resp.sessions);
        assert_eq!(detail.version.entry_count, 7);
        assert_eq!(detail.version.requested_sessions, 7);
        assert!(!detail.version.is_under_scheduled());

        let guard = conn.lock().unwrap();
        assert_eq!(count_rows(&guard, "timetables"), 7);
        assert_eq!(count_rows(&guard, "timetable_version"), 1);
    }

    #[test]
    fn test_版本号连续递增_含零条目版本() {
        let (_temp, db_path) = create_test_db().unwrap();
        let conn = open_shared(&db_path);
        {
            let guard = conn.lock().unwrap();
            insert_department(&guard, 1, "计算机系", "CSE");
            // 未锁定教师 => 每次生成零条目
            insert_subject(&guard, 1, 1, "CS101", 3, SubjectType::Theory);
            insert_staff(&guard, "t1", 1, &[1], false);
            insert_classroom(&guard, 1, 1, "A101", RoomType::Lecture);
        }
        let api = build_api(conn.clone());

        for expected in 1..=4 {
            let resp = api.generate_timetable(1, None).unwrap();
            assert_eq!(resp.version, expected);
            assert!(resp.sessions.is_empty());
        }

        let versions: Vec<i64> = api
            .list_versions(1)
            .unwrap()
            .iter()
            .map(|v| v.version_no)
            .collect();
        assert_eq!(versions, vec![4, 3, 2, 1]);
        assert_eq!(count_rows(&conn.lock().unwrap(), "timetables"), 0);
    }

    #[test]
    fn test_院系之间版本号独立() {
        let (_temp, db_path) = create_test_db().unwrap();
        let conn = open_shared(&db_path);
        {
            let guard = conn.lock().unwrap();
            seed_standard(&guard);
            insert_department(&guard, 2, "数学系", "MATH");
        }
        let api = build_api(conn);

        assert_eq!(api.generate_timetable(1, None).unwrap().version, 1);
        assert_eq!(api.generate_timetable(1, None).unwrap().version, 2);
        assert_eq!(api.generate_timetable(2, None).unwrap().version, 1);
    }

    #[test]
    fn test_院系不存在() {
        let (_temp, db_path) = create_test_db().unwrap();
        let conn = open_shared(&db_path);
        let api = build_api(conn.clone());

        let err = api.generate_timetable(42, None).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert!(!err.is_retryable());
        assert_eq!(count_rows(&conn.lock().unwrap(), "timetable_version"), 0);
    }

    #[test]
    fn test_选课字段损坏_整体失败不落库() {
        let (_temp, db_path) = create_test_db().unwrap();
        let conn = open_shared(&db_path);
        {
            let guard = conn.lock().unwrap();
            seed_standard(&guard);
            insert_staff_raw(&guard, "broken", 1, Some("[1, 2"), true);
        }
        let api = build_api(conn.clone());

        let err = api.generate_timetable(1, None).unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)), "实际: {:?}", err);

        let guard = conn.lock().unwrap();
        assert_eq!(count_rows(&guard, "timetable_version"), 0);
        assert_eq!(count_rows(&guard, "timetables"), 0);
    }

    #[test]
    fn test_选课字段为空视为未选() {
        let (_temp, db_path) = create_test_db().unwrap();
        let conn = open_shared(&db_path);
        {
            let guard = conn.lock().unwrap();
            insert_department(&guard, 1, "计算机系", "CSE");
            insert_subject(&guard, 1, 1, "CS101", 2, SubjectType::Theory);
            insert_staff_raw(&guard, "t1", 1, None, true);
            insert_staff(&guard, "t2", 1, &[1], true);
            insert_classroom(&guard, 1, 1, "A101", RoomType::Lecture);
        }
        let api = build_api(conn);

        let resp = api.generate_timetable(1, None).unwrap();
        assert_eq!(resp.scheduled_sessions, 2);
        assert!(resp.sessions.iter().all(|s| s.staff_id == "t2"));
    }

    #[test]
    fn test_按类型匹配教室() {
        let (_temp, db_path) = create_test_db().unwrap();
        let conn = open_shared(&db_path);
        {
            let guard = conn.lock().unwrap();
            seed_standard(&guard);
            set_config(&guard, config_keys::MATCH_ROOM_TYPE, "true");
        }
        let api = build_api(conn);

        let resp = api.generate_timetable(1, None).unwrap();
        for s in &resp.sessions {
            if s.subject_id == 3 {
                assert_eq!(s.classroom_name, "LAB1", "实验课只排实验室");
            } else {
                assert_eq!(s.classroom_name, "A101", "理论课不排实验室");
            }
        }

        let detail = api.get_timetable(1, resp.version).unwrap();
        let snapshot = detail.version.config_snapshot_json.expect("应记录配置快照");
        assert!(snapshot.contains(config_keys::MATCH_ROOM_TYPE));
    }

    #[test]
    fn test_默认不区分教室类型() {
        let (_temp, db_path) = create_test_db().unwrap();
        let conn = open_shared(&db_path);
        {
            let guard = conn.lock().unwrap();
            insert_department(&guard, 1, "计算机系", "CSE");
            insert_subject(&guard, 1, 1, "CS103L", 1, SubjectType::Lab);
            insert_staff(&guard, "t1", 1, &[1], true);
            insert_classroom(&guard, 1, 1, "A101", RoomType::Lecture);
            insert_classroom(&guard, 2, 1, "LAB1", RoomType::Lab);
        }
        let api = build_api(conn);

        let resp = api.generate_timetable(1, None).unwrap();
        // 实验课取第一间空闲教室, 即讲堂
        assert_eq!(resp.sessions.len(), 1);
        assert_eq!(resp.sessions[0].classroom_name, "A101");
    }

    #[test]
    fn test_数据不足开关() {
        let (_temp, db_path) = create_test_db().unwrap();
        let conn = open_shared(&db_path);
        {
            let guard = conn.lock().unwrap();
            insert_department(&guard, 1, "计算机系", "CSE");
            insert_subject(&guard, 1, 1, "CS101", 2, SubjectType::Theory);
            set_config(&guard, config_keys::REJECT_INSUFFICIENT_DATA, "true");
        }
        let api = build_api(conn.clone());

        let err = api.generate_timetable(1, None).unwrap_err();
        match err {
            ApiError::InsufficientData { department_id, missing } => {
                assert_eq!(department_id, 1);
                assert_eq!(missing, "staff,classrooms");
            }
            other => panic!("期望 InsufficientData, 实际 {:?}", other),
        }
        assert_eq!(count_rows(&conn.lock().unwrap(), "timetable_version"), 0);

        set_config(&conn.lock().unwrap(), config_keys::REJECT_INSUFFICIENT_DATA, "false");
        assert_eq!(api.generate_timetable(1, None).unwrap().version, 1);
    }

    #[test]
    fn test_数据不足开关_只有未锁定教师() {
        let (_temp, db_path) = create_test_db().unwrap();
        let conn = open_shared(&db_path);
        {
            let guard = conn.lock().unwrap();
            insert_department(&guard, 1, "计算机系", "CSE");
            insert_subject(&guard, 1, 1, "CS101", 2, SubjectType::Theory);
            insert_staff(&guard, "t1", 1, &[1], false);
            insert_classroom(&guard, 1, 1, "A101", RoomType::Lecture);
            set_config(&guard, config_keys::REJECT_INSUFFICIENT_DATA, "true");
        }
        let api = build_api(conn.clone());

        let err = api.generate_timetable(1, None).unwrap_err();
        match err {
            ApiError::InsufficientData { missing, .. } => assert_eq!(missing, "staff"),
            other => panic!("期望 InsufficientData, 实际 {:?}", other),
        }
        assert_eq!(count_rows(&conn.lock().unwrap(), "timetable_version"), 0);

        // 锁定后即可生成
        conn.lock()
            .unwrap()
            .execute("UPDATE users SET subjects_locked = 1 WHERE id = 't1'", [])
            .unwrap();
        let resp = api.generate_timetable(1, None).unwrap();
        assert_eq!(resp.version, 1);
        assert_eq!(resp.scheduled_sessions, 2);
    }

    #[test]
    fn test_约束_加载院系与全局约束且不影响结果() {
        let (_temp_a, path_a) = create_test_db().unwrap();
        let plain = open_shared(&path_a);
        seed_standard(&plain.lock().unwrap());

        let (_temp_b, path_b) = create_test_db().unwrap();
        let constrained = open_shared(&path_b);
        {
            let guard = constrained.lock().unwrap();
            seed_standard(&guard);
            insert_department(&guard, 2, "数学系", "MATH");
            insert_constraint(&guard, None, StaffRole::Professor, ConstraintSubjectType::Both, 2, 6);
            insert_constraint(&guard, Some(1), StaffRole::AssistantProfessor, ConstraintSubjectType::Theory, 1, 4);
            insert_constraint(&guard, Some(2), StaffRole::Hod, ConstraintSubjectType::Lab, 1, 2);
        }

        let input = DepartmentDataRepository::new(constrained.clone())
            .load_generation_input(1)
            .unwrap();
        assert_eq!(input.constraints.len(), 2, "本院系 + 全局, 不含其他院系");
        assert!(input.constraints[0].is_global());
        assert_eq!(input.constraints[0].role, StaffRole::Professor);
        assert_eq!(input.constraints[1].department_id, Some(1));
        assert_eq!(input.constraints[1].subject_type, ConstraintSubjectType::Theory);

        let expected = build_api(plain).generate_timetable(1, None).unwrap();
        let actual = build_api(constrained).generate_timetable(1, None).unwrap();
        assert_eq!(actual.version, expected.version);
        assert_eq!(actual.scheduled_sessions, expected.scheduled_sessions);
        assert_eq!(actual.sessions, expected.sessions);
    }

    #[test]
    fn test_旧库已有课表_版本号接续() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let db_path = temp.path().to_str().unwrap().to_string();
        {
            // 旧库只有 timetables, 没有版本头表
            let raw = open_sqlite_connection(&db_path).unwrap();
            raw.execute_batch(
                r#"
                CREATE TABLE timetables (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    department_id INTEGER NOT NULL,
                    day TEXT NOT NULL,
                    time_slot TEXT NOT NULL,
                    subject_id INTEGER NOT NULL,
                    staff_id TEXT NOT NULL,
                    classroom_id INTEGER NOT NULL,
                    version INTEGER DEFAULT 1,
                    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
                );
                "#,
            )
            .unwrap();
            ensure_schema(&raw).unwrap();
            seed_standard(&raw);
            for version in [1, 2] {
                raw.execute(
                    "INSERT INTO timetables (department_id, day, time_slot, subject_id, staff_id, classroom_id, version)
                     VALUES (1, 'Monday', '09:00-10:00', 1, 't1', 1, ?1)",
                    [version],
                )
                .unwrap();
            }
        }

        let conn = open_shared(&db_path);
        let api = build_api(conn.clone());

        let resp = api.generate_timetable(1, None).unwrap();
        assert_eq!(resp.version, 3, "旧库版本 1、2 已被占用");
        assert_eq!(api.generate_timetable(1, None).unwrap().version, 4);

        let guard = conn.lock().unwrap();
        let old_rows: i64 = guard
            .query_row(
                "SELECT COUNT(*) FROM timetables WHERE department_id = 1 AND version IN (1, 2)",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(old_rows, 2, "旧版本条目不得混入新条目");
        drop(guard);

        let latest = api.get_latest_timetable(1).unwrap().unwrap();
        assert_eq!(latest.version.version_no, 4);
    }

    #[test]
    fn test_最新版本() {
        let (_temp, db_path) = create_test_db().unwrap();
        let conn = open_shared(&db_path);
        seed_standard(&conn.lock().unwrap());
        let api = build_api(conn);

        assert!(api.get_latest_timetable(1).unwrap().is_none());
        api.generate_timetable(1, None).unwrap();
        let second = api.generate_timetable(1, Some("审核人")).unwrap();

        let latest = api.get_latest_timetable(1).unwrap().unwrap();
        assert_eq!(latest.version.version_no, 2);
        assert_eq!(latest.version.created_by, "审核人");
        assert_eq!(latest.sessions, second.sessions);
    }
}
