use crate::{MetadataError, Result};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// 只按扩展名识别归档
pub fn is_archive(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("zip"))
}

/// 把 zip 归档的全部条目解压到 `target_dir` 下。
///
/// 绝对路径或会逃出 `target_dir` 的条目直接报错。
pub fn extract_zip(archive_path: &Path, target_dir: &Path) -> Result<usize> {
    let file = File::open(archive_path).map_err(|e| MetadataError::io(archive_path, e))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| MetadataError::Archive {
        path: archive_path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| MetadataError::Archive {
            path: archive_path.to_path_buf(),
            message: e.to_string(),
        })?;

        // enclosed_name 拒绝绝对路径和越出根目录的 `..`
        let relative: PathBuf = match entry.enclosed_name() {
            Some(path) => path.to_path_buf(),
            None => return Err(MetadataError::UnsafeEntry(entry.name().to_string())),
        };

        let target_path = target_dir.join(&relative);
        if entry.is_dir() {
            std::fs::create_dir_all(&target_path).map_err(|e| MetadataError::io(&target_path, e))?;
            continue;
        }

        // 文件条目: 先建父目录再写入
        if let Some(parent) = target_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| MetadataError::io(parent, e))?;
        }
        let mut buf = Vec::new();
        entry
            .read_to_end(&mut buf)
            .map_err(|e| MetadataError::io(archive_path, e))?;
        std::fs::write(&target_path, &buf).map_err(|e| MetadataError::io(&target_path, e))?;
        written += 1;
    }

    tracing::info!(
        "Extracted {} file(s) from {} into {}",
        written,
        archive_path.display(),
        target_dir.display()
    );
    Ok(written)
}
