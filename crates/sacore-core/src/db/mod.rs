//! sacore 数据库模块
//!
//! 包含数据库连接管理

pub mod connection;

// 重新导出常用类型
pub use connection::{
    connection_config, get_connection, get_connection_with_provider,
    get_connection_with_settings, SUPPORTED_SCHEMES,
};
