// ==========================================
// 院系排课系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、写入
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::generation_config_trait::GenerationConfigReader;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;

        Ok(())
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 读取布尔配置; 无法识别的值按默认值处理
    fn get_bool_or_default(&self, key: &str, default: bool) -> Result<bool, Box<dyn Error>> {
        let value = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };

        match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %value,
                    "布尔配置格式错误，使用默认值"
                );
                Ok(default)
            }
        }
    }
}

// ==========================================
// GenerationConfigReader Trait 实现
// ==========================================
impl GenerationConfigReader for ConfigManager {
    fn get_reject_insufficient_data(&self) -> Result<bool, Box<dyn Error>> {
        self.get_bool_or_default(config_keys::REJECT_INSUFFICIENT_DATA, false)
    }

    fn get_match_room_type(&self) -> Result<bool, Box<dyn Error>> {
        self.get_bool_or_default(config_keys::MATCH_ROOM_TYPE, false)
    }

    fn get_default_created_by(&self) -> Result<String, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::DEFAULT_CREATED_BY, "system")?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Ok("system".to_string())
        } else {
            Ok(trimmed.to_string())
        }
    }

    /// 获取所有配置的快照（JSON格式, 键有序）
    ///
    /// # 用途
    /// - 生成版本时记录配置快照, 便于事后复盘
    fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        // 查询所有global scope的配置
        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key"
        )?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
            ))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        let json_value = json!(config_map);
        Ok(serde_json::to_string(&json_value)?)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 生成前校验
    pub const REJECT_INSUFFICIENT_DATA: &str = "generation.reject_insufficient_data";

    // 教室匹配
    pub const MATCH_ROOM_TYPE: &str = "generation.match_room_type";

    // 审计
    pub const DEFAULT_CREATED_BY: &str = "generation.default_created_by";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_schema;

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_默认值() {
        let config = manager();
        assert!(!config.get_reject_insufficient_data().unwrap());
        assert!(!config.get_match_room_type().unwrap());
        assert_eq!(config.get_default_created_by().unwrap(), "system");
        assert_eq!(config.get_config_snapshot().unwrap(), "{}");
    }

    #[test]
    fn test_写入后读取() {
        let config = manager();
        config.set_global_config_value(config_keys::MATCH_ROOM_TYPE, "TRUE").unwrap();
        config.set_global_config_value(config_keys::DEFAULT_CREATED_BY, "admin").unwrap();

        assert!(config.get_match_room_type().unwrap());
        assert_eq!(config.get_default_created_by().unwrap(), "admin");

        config.set_global_config_value(config_keys::MATCH_ROOM_TYPE, "0").unwrap();
        assert!(!config.get_match_room_type().unwrap(), "覆盖写入应生效");
    }

    #[test]
    fn test_非法布尔值回退默认() {
        let config = manager();
        config.set_global_config_value(config_keys::REJECT_INSUFFICIENT_DATA, "maybe").unwrap();
        assert!(!config.get_reject_insufficient_data().unwrap());
    }

    #[test]
    fn test_配置快照() {
        let config = manager();
        config.set_global_config_value(config_keys::MATCH_ROOM_TYPE, "true").unwrap();
        config.set_global_config_value(config_keys::DEFAULT_CREATED_BY, "admin").unwrap();

        let snapshot: BTreeMap<String, String> =
            serde_json::from_str(&config.get_config_snapshot().unwrap()).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[config_keys::MATCH_ROOM_TYPE], "true");
    }
}
