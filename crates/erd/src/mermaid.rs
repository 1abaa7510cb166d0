use crate::analyzer::{ErdAnalyzer, RelationshipEdge};
use crate::config::{ErdConfig, MissingValue};
use metadata::{FieldRecord, ObjectName, SanitizePipeline};

/// 标签带此标记的字段不绘制
pub const OBSOLETE_MARKER: &str = "(Obsolete)";

/// 渲染后的实体: 头部、每个保留字段一行属性、结束括号
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityBlock {
    pub name: ObjectName,
    /// `<type> <label>`，已清洗
    pub attributes: Vec<String>,
}

impl EntityBlock {
    pub fn render(&self) -> String {
        let mut block = format!("  {} {{", self.name);
        for attribute in &self.attributes {
            block.push_str("\n    ");
            block.push_str(attribute);
        }
        block.push_str("\n  }");
        block
    }
}

/// Mermaid erDiagram 生成器
pub struct MermaidGenerator {
    keep_all_fields: bool,
    missing: MissingValue,
    sanitize: SanitizePipeline,
}

impl MermaidGenerator {
    pub fn new() -> Self {
        Self {
            keep_all_fields: false,
            missing: MissingValue::Placeholder,
            sanitize: SanitizePipeline::render_time(),
        }
    }

    pub fn from_config(config: &ErdConfig) -> Self {
        Self::new()
            .with_keep_all_fields(config.keep_all_fields)
            .with_missing(config.missing)
    }

    pub fn with_keep_all_fields(mut self, keep: bool) -> Self {
        self.keep_all_fields = keep;
        self
    }

    pub fn with_missing(mut self, missing: MissingValue) -> Self {
        self.missing = missing;
        self
    }

    /// 生成 erDiagram: 头部、实体块、关系行
    pub fn generate(&self, analyzer: &ErdAnalyzer) -> String {
        // 生成实体块
        let mut parts: Vec<String> = self
            .entity_blocks(analyzer)
            .iter()
            .map(EntityBlock::render)
            .collect();
        // 生成边
        parts.extend(analyzer.relationships().iter().map(Self::relationship_line));

        format!("erDiagram\n{}", parts.join("\n"))
    }

    /// 每个对象一个实体块，按分组顺序
    pub fn entity_blocks(&self, analyzer: &ErdAnalyzer) -> Vec<EntityBlock> {
        analyzer
            .objects()
            .iter()
            .map(|(name, fields)| EntityBlock {
                name: name.clone(),
                attributes: fields.iter().filter_map(|f| self.attribute_line(f)).collect(),
            })
            .collect()
    }

    /// 字段不进入实体块时返回 `None`
    pub fn attribute_line(&self, field: &FieldRecord) -> Option<String> {
        // 废弃字段永远跳过，其次才看是否为引用字段
        if field.label_contains(OBSOLETE_MARKER) {
            return None;
        }
        if !self.keep_all_fields && !field.is_reference() {
            return None;
        }

        // 缺失值按 MissingValue 处理
        let label = field.label.as_deref().map(|l| self.sanitize.apply(l));
        match (field.field_type.as_deref(), label) {
            (Some(field_type), Some(label)) => Some(format!("{} {}", field_type, label)),
            (field_type, label) => match self.missing {
                MissingValue::Skip => None,
                MissingValue::Placeholder => Some(format!(
                    "{} {}",
                    field_type.unwrap_or(MissingValue::PLACEHOLDER),
                    label.as_deref().unwrap_or(MissingValue::PLACEHOLDER)
                )),
            },
        }
    }

    pub fn relationship_line(edge: &RelationshipEdge) -> String {
        format!(
            "  {} {} {} : contains",
            edge.from,
            edge.notation.symbol(),
            edge.to
        )
    }

    /// 嵌入 Markdown 用的代码块
    pub fn fenced(diagram: &str) -> String {
        format!("```mermaid\n{}\n```\n", diagram)
    }
}

impl Default for MermaidGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Notation;

    fn make_field(owner: &str, label: Option<&str>, field_type: Option<&str>, refs: &[&str]) -> FieldRecord {
        FieldRecord {
            label: label.map(str::to_string),
            field_type: field_type.map(str::to_string),
            reference_to: refs.iter().map(|r| ObjectName::new(*r)).collect(),
            object_name: ObjectName::new(owner),
        }
    }

    #[test]
    fn test_empty_diagram() {
        let out = MermaidGenerator::new().generate(&ErdAnalyzer::new());
        assert_eq!(out, "erDiagram\n");
    }

    #[test]
    fn test_relationship_line() {
        let edge = RelationshipEdge {
            from: ObjectName::new("User"),
            to: ObjectName::new("Account"),
            notation: Notation::Weak,
        };
        assert_eq!(
            MermaidGenerator::relationship_line(&edge),
            "  User o|--o{ Account : contains"
        );
    }

    #[test]
    fn test_entity_block_render() {
        let block = EntityBlock {
            name: ObjectName::new("Account"),
            attributes: vec!["Lookup Owner".to_string(), "Text Name".to_string()],
        };
        assert_eq!(block.render(), "  Account {\n    Lookup Owner\n    Text Name\n  }");
    }

    #[test]
    fn test_empty_entity_block_render() {
        let block = EntityBlock {
            name: ObjectName::new("Account"),
            attributes: vec![],
        };
        assert_eq!(block.render(), "  Account {\n  }");
    }

    #[test]
    fn test_non_reference_fields_dropped_by_default() {
        let generator = MermaidGenerator::new();
        let field = make_field("Account", Some("Name"), Some("Text"), &[]);
        assert_eq!(generator.attribute_line(&field), None);

        let kept = MermaidGenerator::new().with_keep_all_fields(true);
        assert_eq!(kept.attribute_line(&field).as_deref(), Some("Text Name"));
    }

    #[test]
    fn test_obsolete_fields_always_dropped() {
        let field = make_field("Account", Some("Status(Obsolete)"), Some("Lookup"), &["User"]);
        assert_eq!(MermaidGenerator::new().attribute_line(&field), None);
        assert_eq!(
            MermaidGenerator::new().with_keep_all_fields(true).attribute_line(&field),
            None
        );
    }

    #[test]
    fn test_label_sanitized_to_alphanumerics() {
        let field = make_field("Account", Some("Billing_Address#2"), Some("Lookup"), &["Address"]);
        assert_eq!(
            MermaidGenerator::new().attribute_line(&field).as_deref(),
            Some("Lookup BillingAddress2")
        );
    }

    #[test]
    fn test_missing_values_placeholder() {
        let generator = MermaidGenerator::new().with_keep_all_fields(true);
        let no_type = make_field("Account", Some("Name"), None, &[]);
        let no_label = make_field("Account", None, Some("Text"), &[]);

        assert_eq!(generator.attribute_line(&no_type).as_deref(), Some("null Name"));
        assert_eq!(generator.attribute_line(&no_label).as_deref(), Some("Text null"));
    }

    #[test]
    fn test_missing_values_skip() {
        let generator = MermaidGenerator::new()
            .with_keep_all_fields(true)
            .with_missing(MissingValue::Skip);
        let no_type = make_field("Account", Some("Name"), None, &[]);
        assert_eq!(generator.attribute_line(&no_type), None);
    }

    #[test]
    fn test_every_field_lands_in_its_owner_block() {
        let mut analyzer = ErdAnalyzer::new();
        analyzer.add_field(make_field("Account", Some("Owner"), Some("Lookup"), &["User"]));
        analyzer.add_field(make_field("Contact", Some("Account"), Some("Lookup"), &["Account"]));
        analyzer.add_field(make_field("Account", Some("Parent"), Some("Lookup"), &["Account"]));

        let blocks = MermaidGenerator::new().entity_blocks(&analyzer);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].name.as_str(), "Account");
        assert_eq!(blocks[0].attributes, vec!["Lookup Owner", "Lookup Parent"]);
        assert_eq!(blocks[1].attributes, vec!["Lookup Account"]);
    }

    #[test]
    fn test_generate_layout() {
        let mut analyzer = ErdAnalyzer::new();
        analyzer.add_field(make_field("Account", Some("Owner"), Some("Lookup"), &["User"]));
        analyzer.add_field(make_field("Account", Some("Name"), Some("Text"), &[]));

        let out = MermaidGenerator::new().with_keep_all_fields(true).generate(&analyzer);
        assert_eq!(
            out,
            "erDiagram\n  Account {\n    Lookup Owner\n    Text Name\n  }\n  User o|--o{ Account : contains"
        );
    }

    #[test]
    fn test_from_config() {
        let config = ErdConfig {
            keep_all_fields: true,
            missing: MissingValue::Skip,
            ..Default::default()
        };
        let generator = MermaidGenerator::from_config(&config);
        assert!(generator.keep_all_fields);
        assert_eq!(generator.missing, MissingValue::Skip);
    }

    #[test]
    fn test_fenced() {
        assert_eq!(MermaidGenerator::fenced("erDiagram\n"), "```mermaid\nerDiagram\n\n```\n");
    }
}
