use crate::archive::{extract_zip, is_archive};
use crate::{MetadataError, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

pub const OBJECT_SUFFIX: &str = "object-meta.xml";
pub const FIELD_SUFFIX: &str = "field-meta.xml";

/// macOS 压缩工具生成的目录
pub const ARTIFACT_MARKERS: &[&str] = &["__MACOSX"];

/// 源根目录下找到的描述文件
#[derive(Debug, Default)]
pub struct Sources {
    pub object_files: Vec<PathBuf>,
    pub field_files: Vec<PathBuf>,
    /// 实际遍历的根目录 (归档时为解压目录)
    pub root: PathBuf,
    /// 持有临时解压目录，运行结束前不删除
    _workdir: Option<TempDir>,
}

impl Sources {
    pub fn is_empty(&self) -> bool {
        self.object_files.is_empty() && self.field_files.is_empty()
    }
}

/// 在目录或归档中查找对象和字段描述文件
pub struct SourceLocator {
    extract_to: Option<PathBuf>,
    markers: Vec<String>,
}

impl SourceLocator {
    pub fn new() -> Self {
        Self {
            extract_to: None,
            markers: ARTIFACT_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// 归档解压到 `dir`，而不是临时目录
    pub fn with_extract_to(mut self, dir: Option<PathBuf>) -> Self {
        self.extract_to = dir;
        self
    }

    pub fn locate(&self, root: &Path) -> Result<Sources> {
        // 归档先解压再遍历
        if is_archive(root) {
            let (walk_root, workdir) = match &self.extract_to {
                Some(dir) => (dir.clone(), None),
                None => {
                    let tmp = TempDir::new().map_err(|e| MetadataError::io(root, e))?;
                    (tmp.path().to_path_buf(), Some(tmp))
                }
            };
            extract_zip(root, &walk_root)?;
            let mut sources = self.walk(&walk_root);
            sources._workdir = workdir;
            return Ok(sources);
        }

        Ok(self.walk(root))
    }

    /// 按文件名顺序遍历 `root`，跳过压缩工具产物目录
    pub fn walk(&self, root: &Path) -> Sources {
        let mut sources = Sources {
            root: root.to_path_buf(),
            ..Default::default()
        };

        let entries = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !(entry.file_type().is_dir() && self.is_artifact(entry.path())))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file());

        // 按后缀分类
        for entry in entries {
            let file_name = entry.file_name().to_string_lossy();
            if file_name.ends_with(OBJECT_SUFFIX) {
                sources.object_files.push(entry.path().to_path_buf());
            } else if file_name.ends_with(FIELD_SUFFIX) {
                sources.field_files.push(entry.path().to_path_buf());
            }
        }

        tracing::info!(
            "Found {} object and {} field descriptor(s) under {}",
            sources.object_files.len(),
            sources.field_files.len(),
            root.display()
        );
        sources
    }

    fn is_artifact(&self, dir: &Path) -> bool {
        let path = dir.to_string_lossy();
        self.markers.iter().any(|m| path.contains(m.as_str()))
    }
}

impl Default for SourceLocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<x/>").unwrap();
    }

    #[test]
    fn test_walk_classifies_by_suffix() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "objects/Account/Account.object-meta.xml");
        touch(dir.path(), "objects/Account/fields/Owner.field-meta.xml");
        touch(dir.path(), "objects/Account/listViews/All.listView-meta.xml");
        touch(dir.path(), "README.md");

        let sources = SourceLocator::new().walk(dir.path());

        assert_eq!(sources.object_files.len(), 1);
        assert_eq!(sources.field_files.len(), 1);
        assert!(sources.field_files[0].ends_with("objects/Account/fields/Owner.field-meta.xml"));
    }

    #[test]
    fn test_walk_skips_macosx_folders() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "objects/Case/fields/Status.field-meta.xml");
        touch(dir.path(), "__MACOSX/objects/Case/fields/._Status.field-meta.xml");
        touch(dir.path(), "__MACOSX/objects/Case/._Case.object-meta.xml");

        let sources = SourceLocator::new().walk(dir.path());

        assert_eq!(sources.field_files.len(), 1);
        assert!(sources.object_files.is_empty());
    }

    #[test]
    fn test_walk_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "objects/Zeta/fields/A.field-meta.xml");
        touch(dir.path(), "objects/Alpha/fields/B.field-meta.xml");
        touch(dir.path(), "objects/Alpha/fields/A.field-meta.xml");

        let sources = SourceLocator::new().walk(dir.path());
        let rel: Vec<_> = sources
            .field_files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();

        assert_eq!(
            rel,
            vec![
                "objects/Alpha/fields/A.field-meta.xml",
                "objects/Alpha/fields/B.field-meta.xml",
                "objects/Zeta/fields/A.field-meta.xml",
            ]
        );
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let sources = SourceLocator::new().locate(dir.path()).unwrap();
        assert!(sources.is_empty());
    }

    #[test]
    fn test_missing_root_is_empty() {
        let sources = SourceLocator::new().walk(Path::new("/no/such/metadata/root"));
        assert!(sources.is_empty());
    }

    #[test]
    fn test_locate_archive_into_directory() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("metadata.zip");
        let mut zip = zip::ZipWriter::new(fs::File::create(&archive).unwrap());
        zip.start_file("objects/Account/fields/Owner.field-meta.xml", zip::write::FileOptions::default())
            .unwrap();
        zip.write_all(b"<x/>").unwrap();
        zip.finish().unwrap();

        let target = dir.path().join("extracted");
        let sources = SourceLocator::new()
            .with_extract_to(Some(target.clone()))
            .locate(&archive)
            .unwrap();

        assert_eq!(sources.root, target);
        assert_eq!(sources.field_files.len(), 1);
        assert!(sources.field_files[0].starts_with(&target));
    }

    #[test]
    fn test_locate_archive_into_tempdir() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("metadata.zip");
        let mut zip = zip::ZipWriter::new(fs::File::create(&archive).unwrap());
        zip.start_file("Account/Account.object-meta.xml", zip::write::FileOptions::default())
            .unwrap();
        zip.write_all(b"<x/>").unwrap();
        zip.finish().unwrap();

        let sources = SourceLocator::new().locate(&archive).unwrap();
        assert_eq!(sources.object_files.len(), 1);
        assert!(sources.object_files[0].exists());
    }
}
