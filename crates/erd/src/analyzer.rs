use indexmap::IndexMap;
use metadata::{FieldExtractor, FieldRecord, MetadataError, ObjectExtractor, ObjectLabel, ObjectName, Sources};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ErdError {
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),
}

pub type Result<T> = std::result::Result<T, ErdError>;

/// 必填父子引用的字段类型
pub const MASTER_DETAIL: &str = "MasterDetail";
/// 可选引用的字段类型
pub const LOOKUP: &str = "Lookup";

/// 关系的基数记法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Notation {
    /// 恰好一个父对象，一个或多个子对象
    Strong,
    /// 零或一个父对象，零或多个子对象
    Weak,
}

impl Notation {
    /// 字段类型对应的记法，其它类型不画关系
    pub fn for_field_type(field_type: &str) -> Option<Self> {
        match field_type {
            MASTER_DETAIL => Some(Notation::Strong),
            LOOKUP => Some(Notation::Weak),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Notation::Strong => "||--}|",
            Notation::Weak => "o|--o{",
        }
    }
}

/// 被引用对象 -> 所属对象
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipEdge {
    pub from: ObjectName,
    pub to: ObjectName,
    pub notation: Notation,
}

/// 一次运行提取结果的可序列化快照
#[derive(Debug, Serialize)]
pub struct ErdModel<'a> {
    pub object_labels: &'a [ObjectLabel],
    pub objects: &'a IndexMap<ObjectName, Vec<FieldRecord>>,
    pub relationships: Vec<RelationshipEdge>,
}

/// 按所属对象分组字段记录
pub struct ErdAnalyzer {
    /// 所属对象 -> 字段，按首次出现顺序
    objects: IndexMap<ObjectName, Vec<FieldRecord>>,
    /// 对象描述文件的标签。实体按所属对象命名，不用这些标签
    object_labels: Vec<ObjectLabel>,
}

impl ErdAnalyzer {
    pub fn new() -> Self {
        Self {
            objects: IndexMap::new(),
            object_labels: Vec::new(),
        }
    }

    /// 解析定位到的全部描述文件
    pub fn from_sources(
        sources: &Sources,
        objects: &ObjectExtractor,
        fields: &FieldExtractor,
    ) -> Result<Self> {
        let mut analyzer = Self::new();

        // 对象标签只记录，不参与命名
        analyzer.object_labels = objects.extract_all(&sources.object_files)?;
        tracing::debug!(
            "Object labels (not used for entity names): {:?}",
            analyzer
                .object_labels
                .iter()
                .map(|o| o.label.as_deref())
                .collect::<Vec<_>>()
        );

        // 按所属对象分组
        analyzer.add_fields(fields.extract_all(&sources.field_files)?);
        tracing::info!(
            "Grouped {} field(s) into {} object(s)",
            analyzer.field_count(),
            analyzer.objects.len()
        );

        Ok(analyzer)
    }

    pub fn add_field(&mut self, record: FieldRecord) {
        self.objects
            .entry(record.object_name.clone())
            .or_default()
            .push(record);
    }

    pub fn add_fields(&mut self, records: impl IntoIterator<Item = FieldRecord>) {
        for record in records {
            self.add_field(record);
        }
    }

    pub fn add_object_label(&mut self, label: ObjectLabel) {
        self.object_labels.push(label);
    }

    pub fn objects(&self) -> &IndexMap<ObjectName, Vec<FieldRecord>> {
        &self.objects
    }

    pub fn object_labels(&self) -> &[ObjectLabel] {
        &self.object_labels
    }

    pub fn field_count(&self) -> usize {
        self.objects.values().map(Vec::len).sum()
    }

    /// 每个 Lookup / MasterDetail 字段的每个引用目标生成一条边。
    ///
    /// 顺序: 对象、字段、目标。重复的边保留。
    pub fn relationships(&self) -> Vec<RelationshipEdge> {
        let mut edges = Vec::new();

        for record in self.objects.values().flatten() {
            let Some(notation) = record.field_type.as_deref().and_then(Notation::for_field_type) else {
                continue;
            };
            // 边从被引用对象指向所属对象
            for target in &record.reference_to {
                edges.push(RelationshipEdge {
                    from: target.clone(),
                    to: record.object_name.clone(),
                    notation,
                });
            }
        }

        edges
    }

    pub fn model(&self) -> ErdModel<'_> {
        ErdModel {
            object_labels: &self.object_labels,
            objects: &self.objects,
            relationships: self.relationships(),
        }
    }
}

impl Default for ErdAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
