//! 打印图片元数据：sacore-tools <文件或目录>...
//!
//! `sacore-tools --init-settings` 写入默认的数据库设置文件

use sacore_tools_lib::services::metadata;
use sacore_tools_lib::{DefaultPathProvider, SettingsManager};

fn main() -> anyhow::Result<()> {
    let _guard = sacore_tools_lib::init_logging(&sacore_tools_lib::get_log_dir())?;

    let inputs: Vec<String> = std::env::args().skip(1).collect();
    if inputs.iter().any(|arg| arg == "--init-settings") {
        let manager = SettingsManager::new(&DefaultPathProvider::new());
        if manager.init_default()? {
            println!("已写入 {}", manager.path().display());
        } else {
            println!("{} 已存在", manager.path().display());
        }
        return Ok(());
    }

    if inputs.is_empty() {
        eprintln!("用法: sacore-tools [--init-settings] <文件或目录>...");
        std::process::exit(2);
    }

    let paths = sacore_tools_lib::collect_image_paths(&inputs);
    let Some(batch) = metadata::read_metadata_batch(&paths) else {
        tracing::warn!("没有找到文件");
        return Ok(());
    };

    for path in &paths {
        let Some(meta) = batch.get(path).and_then(Option::as_ref) else {
            continue;
        };

        println!("== {}", path.display());
        metadata::print_all_tags(Some(meta));
        if let Some(loc) = metadata::location(Some(meta)) {
            println!("Location: {}", loc);
        }
        if let Some(date) = metadata::date(Some(meta)) {
            println!("Modified: {}", date.to_rfc3339());
        }
    }

    let failed = metadata::failed_paths(&batch);
    if !failed.is_empty() {
        tracing::warn!("{} 个文件读取失败", failed.len());
    }

    Ok(())
}
