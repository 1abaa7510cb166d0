use crate::resolver::{GrandparentDirResolver, OwnerResolver};
use crate::sanitize::SanitizePipeline;
use crate::types::{FieldRecord, ObjectLabel, ObjectName};
use crate::xml::ElementIndex;
use crate::{MetadataError, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

fn read_index(path: &Path) -> Result<ElementIndex> {
    let content = std::fs::read_to_string(path).map_err(|e| MetadataError::io(path, e))?;
    ElementIndex::scan(&content).map_err(|message| MetadataError::Xml {
        path: path.to_path_buf(),
        message,
    })
}

/// 从对象描述文件读取 `label`
pub struct ObjectExtractor {
    sanitize: SanitizePipeline,
}

impl ObjectExtractor {
    pub fn new() -> Self {
        Self {
            sanitize: SanitizePipeline::parse_time(),
        }
    }

    /// 去掉空白的标签，文档没有标签时为 `None`
    pub fn extract_label(&self, xml: &str, path: &Path) -> Result<Option<String>> {
        let index = ElementIndex::scan(xml).map_err(|message| MetadataError::Xml {
            path: path.to_path_buf(),
            message,
        })?;
        Ok(self.label_from(&index))
    }

    pub fn extract_file(&self, path: &Path) -> Result<ObjectLabel> {
        let index = read_index(path)?;
        let label = self.label_from(&index);
        tracing::debug!("object {} -> {:?}", path.display(), label);
        Ok(ObjectLabel {
            file_path: path.to_path_buf(),
            label,
        })
    }

    /// 解析全部对象描述文件，结果保持输入顺序
    pub fn extract_all(&self, paths: &[PathBuf]) -> Result<Vec<ObjectLabel>> {
        paths.par_iter().map(|p| self.extract_file(p)).collect()
    }

    fn label_from(&self, index: &ElementIndex) -> Option<String> {
        index.first_text("label").map(|t| self.sanitize.apply(t))
    }
}

impl Default for ObjectExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// 从字段描述文件读取 `label`、`type` 和 `referenceTo`
pub struct FieldExtractor {
    resolver: Box<dyn OwnerResolver>,
    sanitize: SanitizePipeline,
}

impl FieldExtractor {
    pub fn new() -> Self {
        Self {
            resolver: Box::new(GrandparentDirResolver),
            sanitize: SanitizePipeline::parse_time(),
        }
    }

    pub fn with_resolver(mut self, resolver: impl OwnerResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    pub fn with_sanitize(mut self, sanitize: SanitizePipeline) -> Self {
        self.sanitize = sanitize;
        self
    }

    /// 从描述文本提取记录。`path` 只用于推断所属对象和错误信息。
    pub fn extract(&self, xml: &str, path: &Path) -> Result<FieldRecord> {
        let index = ElementIndex::scan(xml).map_err(|message| MetadataError::Xml {
            path: path.to_path_buf(),
            message,
        })?;
        Ok(self.record_from(&index, path))
    }

    pub fn extract_file(&self, path: &Path) -> Result<FieldRecord> {
        let index = read_index(path)?;
        let record = self.record_from(&index, path);
        tracing::debug!(
            "field {} -> {}.{:?} ({:?})",
            path.display(),
            record.object_name,
            record.label,
            record.field_type
        );
        Ok(record)
    }

    /// 解析全部字段描述文件，结果保持输入顺序
    pub fn extract_all(&self, paths: &[PathBuf]) -> Result<Vec<FieldRecord>> {
        paths.par_iter().map(|p| self.extract_file(p)).collect()
    }

    fn record_from(&self, index: &ElementIndex, path: &Path) -> FieldRecord {
        // 空的 referenceTo 忽略
        let reference_to = index
            .all("referenceTo")
            .filter_map(|e| e.text.as_deref())
            .map(ObjectName::from_raw)
            .collect();

        FieldRecord {
            label: index.first_text("label").map(|t| self.sanitize.apply(t)),
            field_type: index.first_text("type").map(str::to_string),
            reference_to,
            object_name: self.resolver.resolve(path),
        }
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}
