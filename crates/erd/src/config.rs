//! 图配置

use clap::ValueEnum;
use std::path::PathBuf;

/// 默认输出路径
pub const DEFAULT_OUTPUT: &str = "output/sf_object_erd_mermaid_code.txt";

/// 缺少标签或类型的字段如何渲染
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MissingValue {
    /// Write the literal `null` in place of the value
    #[default]
    Placeholder,
    /// Leave the field out of the entity block
    Skip,
}

impl MissingValue {
    pub const PLACEHOLDER: &'static str = "null";
}

/// 图配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErdConfig {
    /// 实体块中保留没有引用目标的字段
    pub keep_all_fields: bool,
    pub missing: MissingValue,
    pub output_path: PathBuf,
    /// 输出用 ```mermaid 代码块包裹 (文件和 --print)
    pub fenced: bool,
}

impl Default for ErdConfig {
    fn default() -> Self {
        Self {
            keep_all_fields: false,
            missing: MissingValue::Placeholder,
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            fenced: false,
        }
    }
}

impl ErdConfig {
    /// 从 `ERD_*` 环境变量加载覆盖值
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    #[doc(hidden)]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("ERD_KEEP_ALL_FIELDS") {
            config.keep_all_fields = parse_flag(&v);
        }

        if let Some(v) = lookup("ERD_MISSING") {
            // 无法识别的值忽略
            if let Ok(m) = MissingValue::from_str(&v, true) {
                config.missing = m;
            }
        }

        if let Some(v) = lookup("ERD_OUTPUT") {
            if !v.is_empty() {
                config.output_path = PathBuf::from(v);
            }
        }

        if let Some(v) = lookup("ERD_FENCED") {
            config.fenced = parse_flag(&v);
        }

        config
    }
}

/// 只有 `true` (不区分大小写) 才打开开关
pub fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}
