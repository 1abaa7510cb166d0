//! 标签清洗
//!
//! 标签清洗两次: 读取描述文件时去掉空白，写入实体块时只保留字母和数字。
//! 两步按此顺序叠加。

/// 单个纯文本变换
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sanitizer {
    /// 去掉所有空白字符
    StripWhitespace,
    /// 只保留字母和数字 (支持 Unicode)
    AlphanumericOnly,
}

impl Sanitizer {
    pub fn apply(&self, text: &str) -> String {
        match self {
            Sanitizer::StripWhitespace => text.chars().filter(|c| !c.is_whitespace()).collect(),
            Sanitizer::AlphanumericOnly => text.chars().filter(|c| c.is_alphanumeric()).collect(),
        }
    }
}

/// 从左到右依次应用的清洗步骤
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SanitizePipeline {
    stages: Vec<Sanitizer>,
}

impl SanitizePipeline {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    pub fn then(mut self, stage: Sanitizer) -> Self {
        self.stages.push(stage);
        self
    }

    /// 读取描述文件时使用
    pub fn parse_time() -> Self {
        Self::new().then(Sanitizer::StripWhitespace)
    }

    /// 渲染实体块时使用
    pub fn render_time() -> Self {
        Self::new().then(Sanitizer::AlphanumericOnly)
    }

    pub fn stages(&self) -> &[Sanitizer] {
        &self.stages
    }

    pub fn apply(&self, text: &str) -> String {
        self.stages
            .iter()
            .fold(text.to_string(), |acc, stage| stage.apply(&acc))
    }
}
