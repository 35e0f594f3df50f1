use crate::shared::error::FlowError;
use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Upper bound for any snapshot, manifest or config file we load (32 MB).
pub const MAX_INPUT_FILE_SIZE: u64 = 32 * 1024 * 1024;

/// Reads a UTF-8 input file after checking that it is a regular file
/// (not a symlink or directory) no larger than [`MAX_INPUT_FILE_SIZE`].
///
/// # Arguments
/// * `path` - File to read
/// * `description` - Human readable name used in error messages (e.g. "snapshot")
///
/// # Errors
/// Returns [`FlowError::SecurityError`] for symlinks, directories and oversized
/// files, and [`FlowError::FileReadError`] when the file cannot be read.
pub fn read_bounded_file(path: &Path, description: &str) -> Result<String> {
    let metadata = fs::symlink_metadata(path).map_err(|e| FlowError::FileReadError {
        path: path.to_path_buf(),
        details: format!("cannot stat {}: {}", description, e),
    })?;

    if metadata.is_symlink() {
        return Err(FlowError::SecurityError {
            path: path.to_path_buf(),
            reason: format!("{} is a symbolic link", description),
            hint: "Point at the real file instead of a link to it".to_string(),
        }
        .into());
    }

    if !metadata.is_file() {
        return Err(FlowError::SecurityError {
            path: path.to_path_buf(),
            reason: format!("{} is not a regular file", description),
            hint: "Pass the path of a file, not a directory".to_string(),
        }
        .into());
    }

    if metadata.len() > MAX_INPUT_FILE_SIZE {
        return Err(FlowError::SecurityError {
            path: path.to_path_buf(),
            reason: format!(
                "{} is too large ({} bytes, limit {} bytes)",
                description,
                metadata.len(),
                MAX_INPUT_FILE_SIZE
            ),
            hint: "Split the input or trim unused records".to_string(),
        }
        .into());
    }

    fs::read_to_string(path).map_err(|e| {
        FlowError::FileReadError {
            path: path.to_path_buf(),
            details: e.to_string(),
        }
        .into()
    })
}

/// Refuses to write through an existing symbolic link.
///
/// A missing target is fine; it will be created by the writer.
pub fn ensure_not_symlink_target(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_symlink() => Err(FlowError::SecurityError {
            path: path.to_path_buf(),
            reason: "output target is a symbolic link".to_string(),
            hint: "Choose an output path that is not a link".to_string(),
        }
        .into()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_bounded_file_success() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("snapshot.json");
        fs::write(&file_path, "{}").unwrap();

        let content = read_bounded_file(&file_path, "snapshot").unwrap();
        assert_eq!(content, "{}");
    }

    #[test]
    fn test_read_bounded_file_missing() {
        let err = read_bounded_file(Path::new("/nonexistent/snapshot.json"), "snapshot")
            .unwrap_err()
            .to_string();
        assert!(err.contains("Failed to read file"));
        assert!(err.contains("snapshot"));
    }

    #[test]
    fn test_read_bounded_file_rejects_directory() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_bounded_file(temp_dir.path(), "snapshot")
            .unwrap_err()
            .to_string();
        assert!(err.contains("not a regular file"));
    }

    #[cfg(unix)]
    #[test]
    fn test_read_bounded_file_rejects_symlink() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("real.json");
        let link = temp_dir.path().join("link.json");
        fs::write(&target, "{}").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let err = read_bounded_file(&link, "snapshot").unwrap_err().to_string();
        assert!(err.contains("symbolic link"));
    }

    #[test]
    fn test_ensure_not_symlink_target_missing_file_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        assert!(ensure_not_symlink_target(&temp_dir.path().join("out.json")).is_ok());
    }
}
