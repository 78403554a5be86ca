//! 数据库连接参数数据模型

use serde::{Deserialize, Serialize};

/// 默认连接协议
pub const DEFAULT_SCHEME: &str = "postgresql";
/// 默认用户名
pub const DEFAULT_USERNAME: &str = "postgres";
/// 默认密码
pub const DEFAULT_PASSWORD: &str = "postgrespassword";
/// 默认主机
pub const DEFAULT_HOST: &str = "localhost";
/// 默认数据库名
pub const DEFAULT_DATABASE: &str = "sacore";

/// 数据库连接设置
///
/// 所有未在调用时提供的连接参数都从这里取默认值。
/// 可由设置文件覆盖，文件中缺失的字段使用内置默认值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseSettings {
    /// 连接协议 (postgresql)
    pub scheme: String,
    pub username: String,
    pub password: String,
    /// 主机，可带端口 (host:port)
    pub host: String,
    pub database: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            host: DEFAULT_HOST.to_string(),
            database: DEFAULT_DATABASE.to_string(),
        }
    }
}

/// 单次连接调用的参数，任何字段都可省略
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionParameters {
    pub username: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub database: Option<String>,
}

impl ConnectionParameters {
    /// 应用默认值，得到实际使用的连接信息
    pub fn resolve(&self, settings: &DatabaseSettings) -> ResolvedConnection {
        let host = self.host.as_deref().unwrap_or(&settings.host);
        let database = self.database.as_deref().unwrap_or(&settings.database);

        ResolvedConnection {
            url: format!("{}://{}/{}", settings.scheme, host, database),
            username: self
                .username
                .clone()
                .unwrap_or_else(|| settings.username.clone()),
            password: self
                .password
                .clone()
                .unwrap_or_else(|| settings.password.clone()),
        }
    }
}

/// 应用默认值后的连接信息
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedConnection {
    /// `<scheme>://<host>/<database>`
    pub url: String,
    pub username: String,
    pub password: String,
}

impl ResolvedConnection {
    /// URL 中的协议部分
    pub fn scheme(&self) -> &str {
        self.url.split("://").next().unwrap_or_default()
    }
}

// 不输出密码
impl std::fmt::Debug for ResolvedConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedConnection")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_all_defaults() {
        let resolved = ConnectionParameters::default().resolve(&DatabaseSettings::default());
        assert_eq!(resolved.url, "postgresql://localhost/sacore");
        assert_eq!(resolved.username, "postgres");
        assert_eq!(resolved.password, "postgrespassword");
        assert_eq!(resolved.scheme(), "postgresql");
    }

    #[test]
    fn test_resolve_keeps_supplied_fields() {
        let params = ConnectionParameters {
            username: Some("admin".to_string()),
            host: Some("db.internal:5433".to_string()),
            ..Default::default()
        };
        let resolved = params.resolve(&DatabaseSettings::default());
        assert_eq!(resolved.url, "postgresql://db.internal:5433/sacore");
        assert_eq!(resolved.username, "admin");
        assert_eq!(resolved.password, "postgrespassword");
    }

    #[test]
    fn test_partial_settings_json_uses_defaults() {
        let settings: DatabaseSettings =
            serde_json::from_str(r#"{"host": "pg.example.org"}"#).unwrap();
        assert_eq!(settings.host, "pg.example.org");
        assert_eq!(settings.database, "sacore");
        assert_eq!(settings.scheme, "postgresql");
    }

    #[test]
    fn test_debug_hides_password() {
        let resolved = ConnectionParameters::default().resolve(&DatabaseSettings::default());
        let debug = format!("{:?}", resolved);
        assert!(!debug.contains("postgrespassword"));
    }
}
