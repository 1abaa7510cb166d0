use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// 自定义对象 API 名称的后缀
pub const CUSTOM_SUFFIX: &str = "__c";

/// 去掉所有自定义对象后缀。
///
/// `"Invoice__c"` 变为 `"Invoice"`，标准对象名保持不变。
pub fn strip_custom_suffix(raw: &str) -> String {
    raw.replace(CUSTOM_SUFFIX, "")
}

/// 对象标识，用作实体名和关系两端
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ObjectName(String);

impl ObjectName {
    /// 包装已规范化的名称
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// 从原始 API 名或目录名构造，去掉自定义后缀
    pub fn from_raw(raw: &str) -> Self {
        Self(strip_custom_suffix(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectName {
    fn from(raw: &str) -> Self {
        Self::from_raw(raw)
    }
}

/// 对象描述文件中的标签
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectLabel {
    pub file_path: PathBuf,
    pub label: Option<String>,
}

/// 提取后的单个字段描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRecord {
    /// 显示标签（已去空白），元素缺失时为 `None`
    pub label: Option<String>,
    /// `<type>` 原文，如 "Lookup"、"MasterDetail"、"Text"
    #[serde(rename = "type")]
    pub field_type: Option<String>,
    /// 引用的对象 (文档顺序)
    pub reference_to: Vec<ObjectName>,
    /// 所属对象，由文件位置推出
    pub object_name: ObjectName,
}

impl FieldRecord {
    pub fn is_reference(&self) -> bool {
        !self.reference_to.is_empty()
    }

    pub fn label_contains(&self, needle: &str) -> bool {
        self.label.as_deref().is_some_and(|l| l.contains(needle))
    }
}
