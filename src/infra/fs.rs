//! # File System Operations Module / 文件系统操作模块
//!
//! Path expansion for configured fixture locations and report/scaffold
//! writing.
//!
//! 为配置的夹具位置提供路径展开，以及报告和模板文件的写入。

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Expands `~` and environment variables in `path`, then resolves a relative
/// result against `base_dir`.
///
/// # Arguments
/// * `path` - Path as written in the configuration
/// * `base_dir` - Directory relative paths are resolved against
///
/// # Returns
/// The expanded path. It is not required to exist.
pub fn expand_path(path: &Path, base_dir: &Path) -> Result<PathBuf> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw)
        .with_context(|| format!("Failed to expand path: {raw}"))?;
    let expanded = PathBuf::from(expanded.as_ref());

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(base_dir.join(expanded))
    }
}

/// Writes `contents` to `path`, creating missing parent directories.
///
/// # Arguments
/// * `path` - Destination file
/// * `contents` - Bytes to write
pub fn write_creating_parents(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create directory: {}", parent.display())
            })?;
        }
    }
    fs::write(path, contents).with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Gets the absolute path from a potentially relative path.
///
/// # Arguments
/// * `path` - Path to canonicalize
///
/// # Returns
/// Canonicalized absolute path, or an error if the path doesn't exist
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).with_context(|| format!("Failed to resolve path: {}", path.display()))
}
