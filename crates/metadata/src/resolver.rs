use crate::types::ObjectName;
use std::path::Path;

/// 字段描述文件 -> 所属对象
pub trait OwnerResolver: Send + Sync {
    fn resolve(&self, field_file: &Path) -> ObjectName;
}

/// 默认布局: `<Object>/fields/<Field>.field-meta.xml`
///
/// 所属对象取字段文件的祖父目录名。层级不同的文件也一样取上两级目录，
/// 不校验布局。
#[derive(Debug, Clone, Copy, Default)]
pub struct GrandparentDirResolver;

impl OwnerResolver for GrandparentDirResolver {
    fn resolve(&self, field_file: &Path) -> ObjectName {
        let folder = field_file
            .parent()
            .and_then(Path::parent)
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        ObjectName::from_raw(&folder)
    }
}

impl<F> OwnerResolver for F
where
    F: Fn(&Path) -> ObjectName + Send + Sync,
{
    fn resolve(&self, field_file: &Path) -> ObjectName {
        self(field_file)
    }
}
