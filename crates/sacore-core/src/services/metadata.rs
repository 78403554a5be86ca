//! 元数据读取服务
//!
//! 从图片文件中读取 EXIF / GPS / 文件系统元数据，支持批量读取。
//! 所有函数都是无状态的，每次调用相互独立。

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Seek, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use exif::{Context, Field, In, Reader, Value};
use image::ImageFormat;

use crate::models::metadata::{
    Directory, DirectoryKind, GeoLocation, ImageMetadata, MetadataBatch, MetadataTag, TagValue,
    TAG_DETECTED_FILE_MIME_TYPE, TAG_DETECTED_FILE_TYPE_NAME, TAG_EXPECTED_FILE_NAME_EXTENSION,
    TAG_FILE_MODIFIED_DATE, TAG_FILE_NAME, TAG_FILE_SIZE,
};
use crate::utils::error::MetadataReadError;

/// 元数据为空时 print_all_tags 输出的提示
pub const NULL_METADATA_NOTICE: &str = "Metadata was null. Nothing to print.";

/// HEIF 的 ftyp 品牌 (image crate 无法识别)
const HEIF_BRANDS: [&[u8]; 8] = [
    b"heic", b"heix", b"hevc", b"hevx", b"heim", b"heis", b"mif1", b"msf1",
];

/// 文件容器格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerFormat {
    Image(ImageFormat),
    Heif,
}

impl ContainerFormat {
    /// 根据文件头识别格式
    fn detect(header: &[u8]) -> Option<Self> {
        match image::guess_format(header) {
            Ok(format) => Some(Self::Image(format)),
            Err(_) if is_heif(header) => Some(Self::Heif),
            Err(_) => None,
        }
    }

    /// kamadak-exif 能读取 EXIF 的容器格式
    fn supports_exif(self) -> bool {
        match self {
            Self::Image(format) => matches!(
                format,
                ImageFormat::Jpeg
                    | ImageFormat::Tiff
                    | ImageFormat::Png
                    | ImageFormat::WebP
                    | ImageFormat::Avif
            ),
            Self::Heif => true,
        }
    }

    fn name(self) -> String {
        match self {
            Self::Image(format) => format!("{:?}", format).to_uppercase(),
            Self::Heif => "HEIF".to_string(),
        }
    }

    fn mime_type(self) -> &'static str {
        match self {
            Self::Image(format) => format.to_mime_type(),
            Self::Heif => "image/heic",
        }
    }

    fn extension(self) -> Option<&'static str> {
        match self {
            Self::Image(format) => format.extensions_str().first().copied(),
            Self::Heif => Some("heic"),
        }
    }
}

/// 检查 ISOBMFF ftyp 盒的主品牌和兼容品牌
fn is_heif(header: &[u8]) -> bool {
    if header.len() < 12 || &header[4..8] != b"ftyp" {
        return false;
    }

    let box_size = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;
    let end = box_size.min(header.len());

    HEIF_BRANDS.contains(&&header[8..12])
        || header
            .get(16..end)
            .is_some_and(|brands| brands.chunks_exact(4).any(|b| HEIF_BRANDS.contains(&b)))
}

/// 读取单个文件的元数据
///
/// 文件读取失败返回 [`MetadataReadError::Io`]；格式无法识别返回
/// [`MetadataReadError::Processing`]。没有 EXIF 或 EXIF 损坏都不算错误：
/// 损坏时保留能解析的字段，文件类型和文件系统目录总是存在。
pub fn read_metadata(path: impl AsRef<Path>) -> Result<ImageMetadata, MetadataReadError> {
    let path = path.as_ref();
    let io_error = |source: io::Error| MetadataReadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_error)?;
    let file_info = file.metadata().map_err(io_error)?;
    let mut reader = BufReader::new(file);

    // fill_buf 不消费数据，EXIF 解析仍从文件开头开始
    let format = {
        let header = reader.fill_buf().map_err(io_error)?;
        ContainerFormat::detect(header).ok_or_else(|| MetadataReadError::Processing {
            path: path.to_path_buf(),
            message: "文件格式无法识别".to_string(),
        })?
    };

    let mut directories = if format.supports_exif() {
        read_exif_directories(path, &mut reader).map_err(io_error)?
    } else {
        Vec::new()
    };

    directories.push(file_type_directory(format));
    directories.push(file_system_directory(path, &file_info));

    Ok(ImageMetadata { directories })
}

/// 解析 EXIF 并按 IFD 分组
///
/// 只有读取文件本身的 IO 错误会返回；数据被截断或格式错误只记录日志。
fn read_exif_directories<R: BufRead + Seek>(
    path: &Path,
    reader: &mut R,
) -> io::Result<Vec<Directory>> {
    let mut exif_reader = Reader::new();
    exif_reader.continue_on_error(true);

    let result = exif_reader.read_from_container(reader).or_else(|e| {
        e.distill_partial_result(|errors| {
            for err in errors {
                tracing::warn!("{:?} 的 EXIF 字段已跳过: {}", path, err);
            }
        })
    });

    match result {
        Ok(exif) => Ok(exif_directories(&exif)),
        Err(exif::Error::NotFound(_)) => {
            tracing::debug!("{:?} 不包含 EXIF 数据", path);
            Ok(Vec::new())
        }
        Err(exif::Error::Io(e)) if e.kind() != io::ErrorKind::UnexpectedEof => Err(e),
        Err(e) => {
            tracing::warn!("无法解析 {:?} 的 EXIF 数据: {}", path, e);
            Ok(Vec::new())
        }
    }
}

/// 批量读取元数据
///
/// 输入为空时返回 None，而不是空的映射。单个文件失败会记录日志并以 None
/// 记录在结果中，不影响其余文件；重复路径以最后一次为准。
pub fn read_metadata_batch<P: AsRef<Path>>(paths: &[P]) -> Option<MetadataBatch> {
    read_batch_with(paths, |path| read_metadata(path))
}

fn read_batch_with<P, F>(paths: &[P], mut read: F) -> Option<MetadataBatch>
where
    P: AsRef<Path>,
    F: FnMut(&Path) -> Result<ImageMetadata, MetadataReadError>,
{
    if paths.is_empty() {
        return None;
    }

    let mut batch = MetadataBatch::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let metadata = match read(path) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                tracing::error!("读取元数据失败: {}", e);
                None
            }
        };
        batch.insert(path.to_path_buf(), metadata);
    }

    tracing::debug!("批量读取完成: {} 个文件", batch.len());
    Some(batch)
}

/// 获取 GPS 坐标
///
/// 只使用第一个 GPS 目录。
pub fn location(metadata: Option<&ImageMetadata>) -> Option<GeoLocation> {
    metadata?
        .first_directory(DirectoryKind::Gps)?
        .geo_location()
}

/// 读取文件并获取 GPS 坐标，读取失败时记录日志并返回 None
pub fn location_for_path(path: impl AsRef<Path>) -> Option<GeoLocation> {
    match read_metadata(path) {
        Ok(metadata) => location(Some(&metadata)),
        Err(e) => {
            tracing::error!("无法获取位置: {}", e);
            None
        }
    }
}

/// 获取文件最后修改时间
///
/// 只使用第一个文件系统目录。
// TODO: 回退到 EXIF DateTimeOriginal / DateTime
pub fn date(metadata: Option<&ImageMetadata>) -> Option<DateTime<Local>> {
    metadata?
        .first_directory(DirectoryKind::FileSystem)?
        .timestamp(TAG_FILE_MODIFIED_DATE)
}

/// 将所有目录和标签写入 `out`
pub fn write_all_tags<W: Write>(metadata: Option<&ImageMetadata>, out: &mut W) -> io::Result<()> {
    let Some(metadata) = metadata else {
        writeln!(out, "{}", NULL_METADATA_NOTICE)?;
        return Ok(());
    };

    for dir in &metadata.directories {
        writeln!(out, "Directory: {}", dir.name())?;
        for tag in &dir.tags {
            writeln!(out, "\tTag: {}, Value: {}", tag.name, tag.description)?;
        }
    }

    Ok(())
}

/// 将所有标签打印到标准输出
pub fn print_all_tags(metadata: Option<&ImageMetadata>) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = write_all_tags(metadata, &mut out) {
        tracing::warn!("打印标签失败: {}", e);
    }
}

/// 读取文件并打印所有标签，读取失败时记录日志
pub fn print_all_tags_for_path(path: impl AsRef<Path>) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = write_all_tags_for_path(path, &mut out) {
        tracing::warn!("打印标签失败: {}", e);
    }
}

/// 读取文件并写入所有标签；读取失败只记录日志，不写入任何内容
pub fn write_all_tags_for_path<W: Write>(path: impl AsRef<Path>, out: &mut W) -> io::Result<()> {
    match read_metadata(path) {
        Ok(metadata) => write_all_tags(Some(&metadata), out),
        Err(e) => {
            tracing::error!("无法打印标签: {}", e);
            Ok(())
        }
    }
}

/// 按 IFD 分组 EXIF 字段，目录顺序为首次出现的顺序
fn exif_directories(exif: &exif::Exif) -> Vec<Directory> {
    let mut directories: Vec<Directory> = Vec::new();

    for field in exif.fields() {
        let kind = directory_kind(field);
        let tag = MetadataTag {
            id: field.tag.number(),
            name: field.tag.to_string(),
            description: field.display_value().with_unit(exif).to_string(),
            value: tag_value(&field.value),
        };

        match directories.iter_mut().find(|d| d.kind == kind) {
            Some(dir) => dir.push(tag),
            None => {
                let mut dir = Directory::new(kind);
                dir.push(tag);
                directories.push(dir);
            }
        }
    }

    directories
}

fn directory_kind(field: &Field) -> DirectoryKind {
    match field.tag.context() {
        Context::Exif => DirectoryKind::ExifSubIfd,
        Context::Gps => DirectoryKind::Gps,
        Context::Interop => DirectoryKind::Interoperability,
        _ if field.ifd_num == In::PRIMARY => DirectoryKind::ExifIfd0,
        _ => DirectoryKind::ExifThumbnail,
    }
}

/// EXIF 值转换为标签值
fn tag_value(value: &Value) -> TagValue {
    fn ints<T: Copy + Into<i64>>(v: &[T]) -> TagValue {
        TagValue::Integers(v.iter().map(|&x| x.into()).collect())
    }

    match value {
        Value::Ascii(v) => TagValue::Text(
            v.iter()
                .map(|s| String::from_utf8_lossy(s).into_owned())
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Value::Byte(v) => ints(v),
        Value::Short(v) => ints(v),
        Value::Long(v) => ints(v),
        Value::SByte(v) => ints(v),
        Value::SShort(v) => ints(v),
        Value::SLong(v) => ints(v),
        Value::Rational(v) => TagValue::Reals(v.iter().map(|r| r.to_f64()).collect()),
        Value::SRational(v) => TagValue::Reals(v.iter().map(|r| r.to_f64()).collect()),
        Value::Float(v) => TagValue::Reals(v.iter().map(|&x| x as f64).collect()),
        Value::Double(v) => TagValue::Reals(v.clone()),
        Value::Undefined(bytes, _) => TagValue::Bytes(bytes.clone()),
        _ => TagValue::Bytes(Vec::new()),
    }
}

fn text_tag(id: u16, name: &str, text: impl Into<String>) -> MetadataTag {
    let text = text.into();
    MetadataTag {
        id,
        name: name.to_string(),
        description: text.clone(),
        value: TagValue::Text(text),
    }
}

/// 文件类型目录
fn file_type_directory(format: ContainerFormat) -> Directory {
    let mut dir = Directory::new(DirectoryKind::FileType);

    dir.push(text_tag(
        TAG_DETECTED_FILE_TYPE_NAME,
        "Detected File Type Name",
        format.name(),
    ));
    dir.push(text_tag(
        TAG_DETECTED_FILE_MIME_TYPE,
        "Detected MIME Type",
        format.mime_type(),
    ));
    if let Some(ext) = format.extension() {
        dir.push(text_tag(
            TAG_EXPECTED_FILE_NAME_EXTENSION,
            "Expected File Name Extension",
            ext,
        ));
    }

    dir
}

/// 文件系统目录：文件名、大小、修改时间
fn file_system_directory(path: &Path, file_info: &fs::Metadata) -> Directory {
    let mut dir = Directory::new(DirectoryKind::FileSystem);

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dir.push(text_tag(TAG_FILE_NAME, "File Name", file_name));

    let size = file_info.len();
    dir.push(MetadataTag {
        id: TAG_FILE_SIZE,
        name: "File Size".to_string(),
        description: format!("{} bytes", size),
        value: TagValue::Integers(vec![size as i64]),
    });

    match file_info.modified() {
        Ok(modified) => {
            let modified: DateTime<Local> = modified.into();
            dir.push(MetadataTag {
                id: TAG_FILE_MODIFIED_DATE,
                name: "File Modified Date".to_string(),
                description: modified.format("%a %b %d %H:%M:%S %:z %Y").to_string(),
                value: TagValue::Timestamp(modified),
            });
        }
        Err(e) => tracing::warn!("无法获取修改时间 {:?}: {}", path, e),
    }

    dir
}

/// 输入路径列表中被记录为失败的路径
pub fn failed_paths(batch: &MetadataBatch) -> Vec<PathBuf> {
    batch
        .iter()
        .filter(|(_, metadata)| metadata.is_none())
        .map(|(path, _)| path.clone())
        .collect()
}
