// ==========================================
// 院系排课系统 - 命令行入口
// ==========================================
// 用法:
//   timetable-scheduler generate <department_id> [created_by]
//   timetable-scheduler versions <department_id>
//   timetable-scheduler show <department_id> [version]
// 结果以 JSON 输出到 stdout, 日志输出到 stderr
// ==========================================

use std::process::ExitCode;

use serde::Serialize;
use timetable_scheduler::app::{get_default_db_path, AppState};
use timetable_scheduler::logging;

const USAGE: &str = "用法:
  timetable-scheduler generate <department_id> [created_by]
  timetable-scheduler versions <department_id>
  timetable-scheduler show <department_id> [version]

环境变量:
  TIMETABLE_DB_PATH     数据库文件路径
  RUST_LOG              日志级别 (默认 info)
  TIMETABLE_LOG_FORMAT  text | json";

fn main() -> ExitCode {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("错误: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> anyhow::Result<()> {
    let command = match args.first() {
        Some(c) => c.as_str(),
        None => {
            eprintln!("{}", USAGE);
            anyhow::bail!("缺少命令");
        }
    };

    if matches!(command, "-h" | "--help" | "help") {
        println!("{}", USAGE);
        return Ok(());
    }

    let department_id = parse_i64(args.get(1), "department_id")?;

    let db_path = get_default_db_path();
    let state = AppState::new(db_path).map_err(anyhow::Error::msg)?;
    let api = &state.timetable_api;

    match command {
        "generate" => {
            let created_by = args.get(2).map(String::as_str);
            let resp = api.generate_timetable(department_id, created_by)?;
            if resp.scheduled_sessions < resp.requested_sessions {
                tracing::warn!(
                    version = resp.version,
                    requested = resp.requested_sessions,
                    scheduled = resp.scheduled_sessions,
                    "部分课次未能排入"
                );
            }
            print_json(&resp)
        }
        "versions" => print_json(&api.list_versions(department_id)?),
        "show" => match args.get(2) {
            Some(_) => {
                let version = parse_i64(args.get(2), "version")?;
                print_json(&api.get_timetable(department_id, version)?)
            }
            None => print_json(&api.get_latest_timetable(department_id)?),
        },
        other => {
            eprintln!("{}", USAGE);
            anyhow::bail!("未知命令: {}", other)
        }
    }
}

fn parse_i64(raw: Option<&String>, name: &str) -> anyhow::Result<i64> {
    let raw = raw.ok_or_else(|| anyhow::anyhow!("缺少参数 <{}>", name))?;
    raw.trim()
        .parse::<i64>()
        .map_err(|e| anyhow::anyhow!("参数 <{}> 无效: {} ({})", name, raw, e))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
