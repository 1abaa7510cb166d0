//! metadata - Salesforce 元数据读取
//!
//! 定位对象/字段描述文件，解压归档，并从 XML 中提取标签、类型和引用目标。

mod archive;
mod extractor;
mod locator;
mod resolver;
mod sanitize;
mod types;
mod xml;

pub use archive::{extract_zip, is_archive};
pub use extractor::{FieldExtractor, ObjectExtractor};
pub use locator::{SourceLocator, Sources};
pub use resolver::{GrandparentDirResolver, OwnerResolver};
pub use sanitize::{SanitizePipeline, Sanitizer};
pub use types::{strip_custom_suffix, FieldRecord, ObjectLabel, ObjectName, CUSTOM_SUFFIX};
pub use xml::METADATA_NS;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed XML in {path}: {message}")]
    Xml { path: PathBuf, message: String },
    #[error("Invalid archive {path}: {message}")]
    Archive { path: PathBuf, message: String },
    #[error("Unsafe path in archive: {0}")]
    UnsafeEntry(String),
}

pub type Result<T> = std::result::Result<T, MetadataError>;

impl MetadataError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
