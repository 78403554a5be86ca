//! sacore 数据模型模块
//!
//! 包含所有数据结构定义

pub mod connection;
pub mod metadata;

// 重新导出常用类型
pub use connection::{ConnectionParameters, DatabaseSettings, ResolvedConnection};
pub use metadata::{
    Directory, DirectoryKind, GeoLocation, ImageMetadata, MetadataBatch, MetadataTag, TagValue,
};
