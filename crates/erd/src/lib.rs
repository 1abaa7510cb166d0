//! erd - 由对象元数据生成实体关系图
//!
//! 按对象分组字段记录，推断关系，并生成 Mermaid `erDiagram`。

mod analyzer;
mod config;
mod mermaid;

pub use analyzer::{ErdAnalyzer, ErdError, ErdModel, Notation, RelationshipEdge};
pub use config::{parse_flag, ErdConfig, MissingValue, DEFAULT_OUTPUT};
pub use mermaid::{EntityBlock, MermaidGenerator, OBSOLETE_MARKER};
