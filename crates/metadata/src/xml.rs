//! 元数据文档的命名空间元素扫描

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

/// 所有 Salesforce 元数据文档共用的命名空间
pub const METADATA_NS: &str = "http://soap.sforce.com/2006/04/metadata";

/// 元数据命名空间中的元素及其前导文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Element {
    pub name: String,
    /// 第一个子元素之前的文本，为空时是 `None`
    pub text: Option<String>,
}

struct Open {
    slot: Option<usize>,
    child_seen: bool,
}

/// 按文档顺序展开的全部元数据命名空间元素
#[derive(Debug, Default)]
pub(crate) struct ElementIndex {
    elements: Vec<Element>,
}

impl ElementIndex {
    /// 扫描整个文档。
    ///
    /// 格式错误时返回解析器的错误信息。
    pub fn scan(xml: &str) -> std::result::Result<Self, String> {
        // BOM 不算根元素之外的内容
        let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
        let mut reader = NsReader::from_str(xml);
        let mut elements: Vec<Element> = Vec::new();
        let mut stack: Vec<Open> = Vec::new();
        let mut saw_root = false;
        let mut root_closed = false;

        loop {
            let (resolved, event) = reader.read_resolved_event().map_err(|e| e.to_string())?;
            let in_ns = matches!(
                resolved,
                ResolveResult::Bound(Namespace(ns)) if ns == METADATA_NS.as_bytes()
            );

            match event {
                // 开始标签: 入栈，命名空间内的元素记入索引
                Event::Start(e) => {
                    if root_closed {
                        return Err("junk after document element".to_string());
                    }
                    saw_root = true;
                    if let Some(parent) = stack.last_mut() {
                        parent.child_seen = true;
                    }
                    let slot = in_ns.then(|| {
                        elements.push(Element {
                            name: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
                            text: None,
                        });
                        elements.len() - 1
                    });
                    stack.push(Open {
                        slot,
                        child_seen: false,
                    });
                }
                // 自闭合标签: 不入栈，没有文本
                Event::Empty(e) => {
                    if root_closed {
                        return Err("junk after document element".to_string());
                    }
                    saw_root = true;
                    if stack.is_empty() {
                        root_closed = true;
                    }
                    if let Some(parent) = stack.last_mut() {
                        parent.child_seen = true;
                    }
                    if in_ns {
                        elements.push(Element {
                            name: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
                            text: None,
                        });
                    }
                }
                Event::End(_) => {
                    stack.pop();
                    if stack.is_empty() {
                        root_closed = true;
                    }
                }
                Event::Text(t) => {
                    let text = t.unescape().map_err(|e| e.to_string())?;
                    // 根元素之外只允许空白
                    if stack.is_empty() && !text.trim().is_empty() {
                        return Err("text outside document element".to_string());
                    }
                    Self::append_text(&mut elements, &stack, &text);
                }
                Event::CData(c) => {
                    if stack.is_empty() {
                        return Err("CDATA outside document element".to_string());
                    }
                    let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                    Self::append_text(&mut elements, &stack, &text);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        // 文档级检查
        if !saw_root {
            return Err("no element found".to_string());
        }
        if !stack.is_empty() {
            return Err(format!("{} unclosed element(s) at end of document", stack.len()));
        }

        Ok(Self { elements })
    }

    fn append_text(elements: &mut [Element], stack: &[Open], text: &str) {
        if text.is_empty() {
            return;
        }
        // 只收集栈顶元素在第一个子元素之前的文本
        if let Some(Open {
            slot: Some(idx),
            child_seen: false,
        }) = stack.last()
        {
            elements[*idx]
                .text
                .get_or_insert_with(String::new)
                .push_str(text);
        }
    }

    /// 文档中第一个名为 `name` 的元素
    pub fn first(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name == name)
    }

    /// 第一个名为 `name` 的元素的前导文本
    pub fn first_text(&self, name: &str) -> Option<&str> {
        self.first(name).and_then(|e| e.text.as_deref())
    }

    pub fn all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements.iter().filter(move |e| e.name == name)
    }
}
