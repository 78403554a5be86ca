//! sacore-tools - PostgreSQL 连接助手与图片元数据读取工具
//!
//! 业务逻辑位于 `sacore-core`，这里负责日志初始化和命令行辅助函数

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use walkdir::WalkDir;

pub use sacore_core::*;

/// 获取日志目录
pub fn get_log_dir() -> PathBuf {
    DefaultPathProvider::new().logs_dir()
}

/// 初始化日志系统
///
/// 控制台输出受 `RUST_LOG` 控制（默认 info），同时按天滚动写入日志目录。
/// 返回的 guard 必须在程序退出前保持存活，否则缓冲的日志会丢失。
pub fn init_logging(log_dir: &Path) -> anyhow::Result<WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    std::fs::create_dir_all(log_dir)?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "sacore-tools.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init()?;

    Ok(guard)
}

/// 展开命令行参数中的路径：文件原样保留，目录递归展开为其中的文件
///
/// 不存在的路径原样保留，由元数据读取阶段报告错误。
pub fn collect_image_paths<P: AsRef<Path>>(inputs: &[P]) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    for input in inputs {
        let input = input.as_ref();
        if !input.is_dir() {
            paths.push(input.to_path_buf());
            continue;
        }

        for entry in WalkDir::new(input).sort_by_file_name() {
            match entry {
                Ok(entry) if entry.file_type().is_file() => paths.push(entry.into_path()),
                Ok(_) => {}
                Err(e) => tracing::warn!("无法访问 {:?}: {}", input, e),
            }
        }
    }

    paths
}
