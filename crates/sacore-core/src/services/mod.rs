//! sacore 服务模块
//!
//! 包含元数据读取和设置管理服务

pub mod metadata;
pub mod settings;

// 重新导出常用类型
pub use metadata::{
    date, location, location_for_path, print_all_tags, print_all_tags_for_path, read_metadata,
    read_metadata_batch, write_all_tags, write_all_tags_for_path,
};
pub use settings::SettingsManager;
