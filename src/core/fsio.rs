//! core::fsio
//!
//! Small filesystem helpers shared by the persistence modules.

use std::fs;
use std::io::Write;
use std::path::Path;

/// Write a file atomically.
///
/// Creates parent directories if needed, writes to a sibling `.lock` file,
/// syncs it, and renames it over the destination. Readers never observe a
/// partially written file. Branch names cannot end in `.lock`, so the
/// sibling never shadows a real ref.
pub fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut temp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    temp_name.push(".lock");
    let temp_path = path.with_file_name(temp_name);

    let mut file = fs::File::create(&temp_path)?;
    file.write_all(contents)?;
    file.sync_all()?;

    fs::rename(&temp_path, path)
}

/// Read a file as UTF-8 text, returning `None` if it does not exist.
pub fn read_optional_string(path: &Path) -> std::io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_atomic_creates_parents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a/b/file");
        write_atomic(&path, b"data").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"data");
        assert!(!temp.path().join("a/b/file.lock").exists());
    }

    #[test]
    fn write_atomic_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("file");
        write_atomic(&path, b"one").unwrap();
        write_atomic(&path, b"two").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"two");
    }

    #[test]
    fn write_atomic_leaves_tmp_suffixed_sibling_alone() {
        let temp = TempDir::new().unwrap();
        let sibling = temp.path().join("main.tmp");
        fs::write(&sibling, b"other").unwrap();
        write_atomic(&temp.path().join("main"), b"mine").unwrap();
        assert_eq!(fs::read(&sibling).unwrap(), b"other");
        assert_eq!(fs::read(temp.path().join("main")).unwrap(), b"mine");
    }

    #[test]
    fn read_optional_missing() {
        let temp = TempDir::new().unwrap();
        assert_eq!(read_optional_string(&temp.path().join("nope")).unwrap(), None);
    }
}
