//! 数据库连接助手
//!
//! 为可选的连接参数补齐默认值，并建立单个 PostgreSQL 连接。
//! 不重试、不使用连接池，调用方负责连接的生命周期（drop 即关闭）。

use postgres::{Client, Config, NoTls};

use crate::models::{ConnectionParameters, DatabaseSettings, ResolvedConnection};
use crate::paths::PathProvider;
use crate::services::SettingsManager;
use crate::utils::error::{AppError, AppResult};

/// 可用的连接协议
pub const SUPPORTED_SCHEMES: &[&str] = &["postgresql", "postgres"];

/// 使用内置默认设置建立连接
pub fn get_connection(params: &ConnectionParameters) -> AppResult<Client> {
    get_connection_with_settings(params, &DatabaseSettings::default())
}

/// 使用 PathProvider 指定的设置文件建立连接
///
/// 设置文件不存在时使用默认设置。
pub fn get_connection_with_provider(
    provider: &dyn PathProvider,
    params: &ConnectionParameters,
) -> AppResult<Client> {
    let settings = SettingsManager::new(provider).load()?;
    get_connection_with_settings(params, &settings)
}

/// 使用给定设置建立连接
pub fn get_connection_with_settings(
    params: &ConnectionParameters,
    settings: &DatabaseSettings,
) -> AppResult<Client> {
    let resolved = params.resolve(settings);
    let config = connection_config(&resolved)?;

    tracing::debug!("连接数据库: {} (用户: {})", resolved.url, resolved.username);

    match config.connect(NoTls) {
        Ok(client) => {
            tracing::info!("数据库连接成功: {}", resolved.url);
            Ok(client)
        }
        Err(e) => {
            tracing::error!("数据库连接失败: {}: {}", resolved.url, e);
            Err(AppError::Connection(e))
        }
    }
}

/// 构建驱动配置：解析 URL，用户名和密码作为连接属性附加
pub fn connection_config(resolved: &ResolvedConnection) -> AppResult<Config> {
    let scheme = resolved.scheme();
    if !SUPPORTED_SCHEMES.contains(&scheme) {
        return Err(AppError::DriverUnavailable(format!(
            "不支持的连接协议 '{}'",
            scheme
        )));
    }

    let mut config: Config = resolved.url.parse()?;
    config
        .user(&resolved.username)
        .password(&resolved.password);

    Ok(config)
}
