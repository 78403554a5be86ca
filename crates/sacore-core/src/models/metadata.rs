//! 图片元数据数据模型
//!
//! 元数据按"目录"组织，每个目录包含若干有序的标签

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// 文件系统目录标签 ID
pub const TAG_FILE_NAME: u16 = 1;
pub const TAG_FILE_SIZE: u16 = 2;
pub const TAG_FILE_MODIFIED_DATE: u16 = 3;

/// 文件类型目录标签 ID
pub const TAG_DETECTED_FILE_TYPE_NAME: u16 = 1;
pub const TAG_DETECTED_FILE_MIME_TYPE: u16 = 3;
pub const TAG_EXPECTED_FILE_NAME_EXTENSION: u16 = 4;

/// GPS 目录标签 ID (与 EXIF 标准一致)
pub const TAG_GPS_LATITUDE_REF: u16 = 0x0001;
pub const TAG_GPS_LATITUDE: u16 = 0x0002;
pub const TAG_GPS_LONGITUDE_REF: u16 = 0x0003;
pub const TAG_GPS_LONGITUDE: u16 = 0x0004;

/// 批量读取结果：输入路径 -> 元数据（读取失败为 None）
pub type MetadataBatch = HashMap<PathBuf, Option<ImageMetadata>>;

/// 目录类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DirectoryKind {
    ExifIfd0,
    ExifSubIfd,
    Gps,
    Interoperability,
    ExifThumbnail,
    FileType,
    FileSystem,
}

impl DirectoryKind {
    /// 目录显示名称
    pub fn name(&self) -> &'static str {
        match self {
            DirectoryKind::ExifIfd0 => "Exif IFD0",
            DirectoryKind::ExifSubIfd => "Exif SubIFD",
            DirectoryKind::Gps => "GPS",
            DirectoryKind::Interoperability => "Interoperability",
            DirectoryKind::ExifThumbnail => "Exif Thumbnail",
            DirectoryKind::FileType => "File Type",
            DirectoryKind::FileSystem => "File System",
        }
    }
}

impl fmt::Display for DirectoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 标签值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum TagValue {
    Text(String),
    Integers(Vec<i64>),
    Reals(Vec<f64>),
    Timestamp(DateTime<Local>),
    /// 未解析的原始字节
    Bytes(Vec<u8>),
}

/// 单个元数据标签
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataTag {
    pub id: u16,
    /// 标签名称
    pub name: String,
    /// 人类可读的描述
    pub description: String,
    pub value: TagValue,
}

/// 地理坐标（十进制度，南纬和西经为负）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoLocation {
    /// 由 度/分/秒 和方向参考 (N/S/E/W) 计算十进制度
    pub fn degrees_from_dms(dms: &[f64], reference: &str) -> Option<f64> {
        if dms.len() < 3 {
            return None;
        }

        let degrees = dms[0] + dms[1] / 60.0 + dms[2] / 3600.0;
        if !degrees.is_finite() {
            return None;
        }

        match reference.trim().trim_matches('"') {
            "N" | "E" => Some(degrees),
            "S" | "W" => Some(-degrees),
            _ => None,
        }
    }
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// 元数据目录：一组相关的标签
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Directory {
    pub kind: DirectoryKind,
    pub tags: Vec<MetadataTag>,
}

impl Directory {
    pub fn new(kind: DirectoryKind) -> Self {
        Self {
            kind,
            tags: Vec::new(),
        }
    }

    /// 目录名称
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// 添加标签
    pub fn push(&mut self, tag: MetadataTag) {
        self.tags.push(tag);
    }

    /// 按 ID 查找标签（第一个匹配）
    pub fn tag(&self, id: u16) -> Option<&MetadataTag> {
        self.tags.iter().find(|t| t.id == id)
    }

    /// 读取时间戳类型的标签值
    pub fn timestamp(&self, id: u16) -> Option<DateTime<Local>> {
        match &self.tag(id)?.value {
            TagValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    fn reals(&self, id: u16) -> Option<&[f64]> {
        match &self.tag(id)?.value {
            TagValue::Reals(v) => Some(v),
            _ => None,
        }
    }

    fn text(&self, id: u16) -> Option<&str> {
        match &self.tag(id)?.value {
            TagValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// 解析 GPS 坐标
    ///
    /// 仅对 GPS 目录有意义；纬度或经度任一缺失时返回 None。
    pub fn geo_location(&self) -> Option<GeoLocation> {
        if self.kind != DirectoryKind::Gps {
            return None;
        }

        let latitude = GeoLocation::degrees_from_dms(
            self.reals(TAG_GPS_LATITUDE)?,
            self.text(TAG_GPS_LATITUDE_REF)?,
        )?;
        let longitude = GeoLocation::degrees_from_dms(
            self.reals(TAG_GPS_LONGITUDE)?,
            self.text(TAG_GPS_LONGITUDE_REF)?,
        )?;

        Some(GeoLocation {
            latitude,
            longitude,
        })
    }
}

/// 图片元数据
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    /// 按读取顺序排列的目录
    pub directories: Vec<Directory>,
}

impl ImageMetadata {
    /// 第一个指定类型的目录，同类型的后续目录被忽略
    pub fn first_directory(&self, kind: DirectoryKind) -> Option<&Directory> {
        self.directories.iter().find(|d| d.kind == kind)
    }

    /// 所有指定类型的目录
    pub fn directories_of(&self, kind: DirectoryKind) -> impl Iterator<Item = &Directory> {
        self.directories.iter().filter(move |d| d.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }
}
