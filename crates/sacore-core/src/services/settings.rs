//! 数据库设置文件
//!
//! 连接默认值保存在 JSON 文件中，文件或字段缺失时使用 [`DatabaseSettings::default`]

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::models::DatabaseSettings;
use crate::paths::PathProvider;
use crate::utils::error::{AppError, AppResult};

/// 数据库设置文件的读写
#[derive(Debug, Clone)]
pub struct SettingsManager {
    settings_path: PathBuf,
}

impl SettingsManager {
    /// 使用 PathProvider 的设置文件路径
    pub fn new(provider: &dyn PathProvider) -> Self {
        Self::from_path(provider.settings_path())
    }

    pub fn from_path(settings_path: PathBuf) -> Self {
        Self { settings_path }
    }

    /// 读取设置，文件不存在时返回默认值
    pub fn load(&self) -> AppResult<DatabaseSettings> {
        let content = match fs::read_to_string(&self.settings_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("{:?} 不存在，使用默认数据库设置", self.settings_path);
                return Ok(DatabaseSettings::default());
            }
            Err(e) => {
                return Err(AppError::Config(format!(
                    "无法读取 {}: {}",
                    self.settings_path.display(),
                    e
                )))
            }
        };

        let settings: DatabaseSettings = serde_json::from_str(&content).map_err(|e| {
            AppError::Config(format!("{} 格式错误: {}", self.settings_path.display(), e))
        })?;

        tracing::info!(
            "数据库设置: {}://{}/{} (来自 {:?})",
            settings.scheme,
            settings.host,
            settings.database,
            self.settings_path
        );
        Ok(settings)
    }

    /// 写入设置，按需创建配置目录
    pub fn save(&self, settings: &DatabaseSettings) -> AppResult<()> {
        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::Config(format!("无法创建配置目录: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(settings)
            .map_err(|e| AppError::Config(format!("无法序列化数据库设置: {}", e)))?;
        fs::write(&self.settings_path, content)
            .map_err(|e| AppError::Config(format!("无法写入 {}: {}", self.settings_path.display(), e)))?;

        tracing::info!("已写入数据库设置: {:?}", self.settings_path);
        Ok(())
    }

    /// 设置文件不存在时写入默认值，返回是否写入
    pub fn init_default(&self) -> AppResult<bool> {
        if self.settings_path.exists() {
            return Ok(false);
        }
        self.save(&DatabaseSettings::default())?;
        Ok(true)
    }

    pub fn path(&self) -> &Path {
        &self.settings_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::DefaultPathProvider;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults_without_creating_dirs() {
        let tmp = TempDir::new().unwrap();
        let provider = DefaultPathProvider::with_base_dir(tmp.path().join("app"));

        let manager = SettingsManager::new(&provider);
        assert_eq!(manager.load().unwrap(), DatabaseSettings::default());
        assert!(!tmp.path().join("app").exists());
    }

    #[test]
    fn test_save_creates_dirs_and_reloads() {
        let tmp = TempDir::new().unwrap();
        let manager = SettingsManager::from_path(tmp.path().join("config").join("database.json"));

        let settings = DatabaseSettings {
            host: "db.example.org".to_string(),
            database: "nics".to_string(),
            ..Default::default()
        };
        manager.save(&settings).unwrap();
        assert_eq!(manager.load().unwrap(), settings);
    }

    #[test]
    fn test_init_default_keeps_existing_file() {
        let tmp = TempDir::new().unwrap();
        let manager = SettingsManager::from_path(tmp.path().join("database.json"));

        assert!(manager.init_default().unwrap());
        assert_eq!(manager.load().unwrap(), DatabaseSettings::default());

        fs::write(manager.path(), r#"{"host": "pg.internal"}"#).unwrap();
        assert!(!manager.init_default().unwrap());
        assert_eq!(manager.load().unwrap().host, "pg.internal");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("database.json");
        fs::write(&path, "{ not json").unwrap();

        let manager = SettingsManager::from_path(path);
        assert!(matches!(manager.load(), Err(AppError::Config(_))));
    }
}
