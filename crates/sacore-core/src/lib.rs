//! sacore Core Library
//!
//! Two independent, stateless utilities:
//!
//! - a PostgreSQL connection helper that fills in missing credentials from
//!   [`DatabaseSettings`] and opens a single connection per call;
//! - an image metadata reader built on `kamadak-exif` that returns EXIF, GPS,
//!   file type and file system directories for one file or a batch of files.
//!
//! # Architecture
//!
//! - `models`: Data structures (connection parameters, metadata directories)
//! - `db`: PostgreSQL connection helper
//! - `services`: Metadata reader and settings manager
//! - `paths`: Path provider abstraction (PathProvider trait)
//! - `utils`: Error handling
//!
//! # Example
//!
//! ```no_run
//! use sacore_core::{db, services::metadata, ConnectionParameters};
//!
//! let client = db::get_connection(&ConnectionParameters::default()).unwrap();
//! drop(client);
//!
//! let meta = metadata::read_metadata("photo.jpg").unwrap();
//! if let Some(loc) = metadata::location(Some(&meta)) {
//!     println!("{}", loc);
//! }
//! ```

pub mod db;
pub mod models;
pub mod paths;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use models::{
    ConnectionParameters, DatabaseSettings, Directory, DirectoryKind, GeoLocation, ImageMetadata,
    MetadataBatch, MetadataTag, TagValue,
};
pub use paths::{DefaultPathProvider, PathProvider, SharedPathProvider};
pub use services::SettingsManager;
pub use utils::{AppError, AppResult, MetadataReadError};
