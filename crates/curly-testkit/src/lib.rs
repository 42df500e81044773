//! Test utilities for curly
//!
//! Shared helpers for tests across the workspace: temporary directories
//! under `.tmp/` and writers for configuration and context fixtures.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// File name of the configuration fixture written by [`write_config`]
pub const CONFIG_FILE_NAME: &str = "curly.toml";

/// Creates a temporary directory within `.tmp/` at the current directory
///
/// All test temporary files end up in a single gitignored location.
///
/// # Panics
///
/// Panics if:
/// - Unable to determine current directory
/// - Unable to create `.tmp/` directory
/// - Unable to create temporary subdirectory
///
/// # Examples
///
/// ```rust
/// use curly_testkit::temp_dir_in_workspace;
///
/// let temp = temp_dir_in_workspace();
/// let file_path = temp.path().join("test.txt");
/// std::fs::write(&file_path, "test data").unwrap();
/// ```
pub fn temp_dir_in_workspace() -> TempDir {
    try_temp_dir_in_workspace().expect("Failed to create temporary directory in .tmp/")
}

/// Alternative with Result for non-test code
pub fn try_temp_dir_in_workspace() -> std::io::Result<TempDir> {
    let tmp_base = std::env::current_dir()?.join(".tmp");
    std::fs::create_dir_all(&tmp_base)?;
    TempDir::new_in(&tmp_base)
}

/// Write `content` to `dir/name`, creating parent directories
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    std::fs::write(&path, content)
        .unwrap_or_else(|e| panic!("Failed to write fixture {}: {}", path.display(), e));
    path
}

/// Write a `curly.toml` into `dir`
pub fn write_config(dir: &Path, toml: &str) -> PathBuf {
    write_fixture(dir, CONFIG_FILE_NAME, toml)
}

/// Write a JSON context file into `dir`
pub fn write_json_context(dir: &Path, name: &str, json: &str) -> PathBuf {
    write_fixture(dir, name, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_in_workspace_creates_in_tmp() {
        let temp = temp_dir_in_workspace();
        let path = temp.path();

        assert!(
            path.to_string_lossy().contains(".tmp"),
            "Path should contain .tmp, got: {}",
            path.display()
        );
        assert!(path.is_dir(), "Path should be a directory");
    }

    #[test]
    fn test_temp_dir_auto_cleanup() {
        let path = {
            let temp = temp_dir_in_workspace();
            let p = temp.path().to_path_buf();
            assert!(p.exists(), "Directory should exist before drop");
            p
        };

        assert!(
            !path.exists(),
            "Directory should not exist after drop: {}",
            path.display()
        );
    }

    #[test]
    fn test_multiple_temp_dirs_unique() {
        let temp1 = temp_dir_in_workspace();
        let temp2 = temp_dir_in_workspace();
        assert_ne!(temp1.path(), temp2.path());
    }

    #[test]
    fn test_write_fixture_creates_parents() {
        let temp = temp_dir_in_workspace();
        let path = write_fixture(temp.path(), "nested/dir/ctx.json", "{}");
        assert!(path.is_file());
        assert_eq!(std::fs::read_to_string(path).unwrap(), "{}");
    }

    #[test]
    fn test_write_config_uses_config_file_name() {
        let temp = temp_dir_in_workspace();
        let path = write_config(temp.path(), "[markers]\n");
        assert_eq!(path.file_name().unwrap(), CONFIG_FILE_NAME);

        let ctx = write_json_context(temp.path(), "ctx.json", r#"{"a": 1}"#);
        assert!(ctx.is_file());
    }
}
