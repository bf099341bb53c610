// ==========================================
// 价格账本 ETL - 上传文件落盘
// ==========================================
// 职责: 将上传内容写入存储目录，避免同名覆盖
// 命名: 路径分隔符替换为 '_'；重名时追加 _1, _2 ...（保留扩展名）
// ==========================================

use crate::importer::error::ImportResult;
use std::fs;
use std::path::{Path, PathBuf};

/// 文件名安全化（去掉路径分隔符）
pub fn sanitize_file_name(file_name: &str) -> String {
    file_name.replace(['/', '\\'], "_")
}

/// 在存储目录下为文件名挑选一个未占用的路径
pub fn unique_path(storage_dir: &Path, file_name: &str) -> PathBuf {
    let safe = sanitize_file_name(file_name);
    let candidate = storage_dir.join(&safe);
    if !candidate.exists() {
        return candidate;
    }

    let as_path = Path::new(&safe);
    let stem = as_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| safe.clone());
    let suffix = as_path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut i = 1usize;
    loop {
        let candidate = storage_dir.join(format!("{}_{}{}", stem, i, suffix));
        if !candidate.exists() {
            return candidate;
        }
        i += 1;
    }
}

/// 写入上传内容，返回落盘路径
pub fn save_upload_bytes(storage_dir: &Path, file_name: &str, data: &[u8]) -> ImportResult<PathBuf> {
    fs::create_dir_all(storage_dir)?;
    let path = unique_path(storage_dir, file_name);
    fs::write(&path, data)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("a/b\\c.csv"), "a_b_c.csv");
    }

    #[test]
    fn test_save_upload_avoids_collisions() {
        let dir = tempfile::tempdir().unwrap();

        let p1 = save_upload_bytes(dir.path(), "feed.csv", b"one").unwrap();
        let p2 = save_upload_bytes(dir.path(), "feed.csv", b"two").unwrap();
        let p3 = save_upload_bytes(dir.path(), "feed.csv", b"three").unwrap();

        assert_eq!(p1.file_name().unwrap(), "feed.csv");
        assert_eq!(p2.file_name().unwrap(), "feed_1.csv");
        assert_eq!(p3.file_name().unwrap(), "feed_2.csv");
        assert_eq!(fs::read(&p2).unwrap(), b"two");
    }

    #[test]
    fn test_save_upload_without_extension() {
        let dir = tempfile::tempdir().unwrap();

        save_upload_bytes(dir.path(), "upload", b"x").unwrap();
        let p2 = save_upload_bytes(dir.path(), "upload", b"y").unwrap();
        assert_eq!(p2.file_name().unwrap(), "upload_1");
    }
}
