//! sacore 错误处理模块
//!
//! 定义连接助手与元数据读取器的错误类型

use std::path::PathBuf;

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 数据库驱动不可用（不支持的连接协议）
    #[error("数据库驱动不可用: {0}")]
    DriverUnavailable(String),

    /// 数据库连接错误
    #[error("数据库连接错误: {0}")]
    Connection(#[from] postgres::Error),

    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 元数据读取错误
    #[error(transparent)]
    Metadata(#[from] MetadataReadError),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),
}

impl AppError {
    /// 错误代码，用于日志
    pub fn code(&self) -> &'static str {
        match self {
            AppError::DriverUnavailable(_) => "E_DRIVER_UNAVAILABLE",
            AppError::Connection(_) => "E_DB_CONNECTION",
            AppError::Io(_) => "E_IO_ERROR",
            AppError::Metadata(MetadataReadError::Io { .. }) => "E_METADATA_IO",
            AppError::Metadata(MetadataReadError::Processing { .. }) => "E_METADATA_PROCESSING",
            AppError::Config(_) => "E_CONFIG",
        }
    }
}

/// 单个文件的元数据读取错误
///
/// 两种错误都以出错的文件路径作为消息前缀，并保留原始错误文本。
#[derive(Debug, Error)]
pub enum MetadataReadError {
    /// 读取文件失败
    #[error("处理 {} 时出错: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 文件格式无法识别或 EXIF 解析失败
    #[error("处理 {} 时出错: {message}", .path.display())]
    Processing { path: PathBuf, message: String },
}

impl MetadataReadError {
    /// 出错的文件路径
    pub fn path(&self) -> &PathBuf {
        match self {
            MetadataReadError::Io { path, .. } => path,
            MetadataReadError::Processing { path, .. } => path,
        }
    }
}

/// 应用程序结果类型别名
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::DriverUnavailable("mysql".to_string());
        assert_eq!(err.to_string(), "数据库驱动不可用: mysql");
        assert_eq!(err.code(), "E_DRIVER_UNAVAILABLE");
    }

    #[test]
    fn test_metadata_error_keeps_path_and_message() {
        let err = MetadataReadError::Processing {
            path: PathBuf::from("/photos/a.jpg"),
            message: "文件格式无法识别".to_string(),
        };
        assert_eq!(err.to_string(), "处理 /photos/a.jpg 时出错: 文件格式无法识别");

        let app_err: AppError = err.into();
        assert_eq!(app_err.code(), "E_METADATA_PROCESSING");
        assert!(app_err.to_string().starts_with("处理 /photos/a.jpg"));
    }

    #[test]
    fn test_io_metadata_error_path() {
        let err = MetadataReadError::Io {
            path: PathBuf::from("missing.png"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(err.path(), &PathBuf::from("missing.png"));
        assert!(err.to_string().ends_with("no such file"));
    }
}
