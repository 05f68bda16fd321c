//! Virtual-path helpers for the hierarchical file store.

use super::error::FsError;

/// Path of the root folder.
pub const ROOT_PATH: &str = "/";

/// Returns the parent directory of `path`: the path with its last segment removed, or `/`.
pub fn parent_path(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => ROOT_PATH,
        Some(idx) => &path[..idx],
    }
}

/// Checks that `path` is absolute with no empty segments and no trailing slash.
///
/// # Errors
///
/// Returns [`FsError::InvalidPath`] describing the first violation found.
pub fn validate_path(path: &str) -> Result<(), FsError> {
    if path == ROOT_PATH {
        return Ok(());
    }
    if !path.starts_with('/') {
        return Err(FsError::invalid_path(path, "path must be absolute"));
    }
    if path[1..].split('/').any(str::is_empty) {
        return Err(FsError::invalid_path(path, "path contains an empty segment"));
    }
    Ok(())
}

/// Like [`validate_path`], additionally rejecting the root.
///
/// # Errors
///
/// Returns [`FsError::InvalidPath`] for the root or a malformed path.
pub fn validate_child_path(path: &str) -> Result<(), FsError> {
    if path == ROOT_PATH {
        return Err(FsError::invalid_path(path, "root cannot be used here"));
    }
    validate_path(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_path_strips_last_segment() {
        let cases = [
            ("/", "/"),
            ("/a", "/"),
            ("/a/b", "/a"),
            ("/a/b/c.txt", "/a/b"),
        ];

        for (input, expected) in cases {
            assert_eq!(parent_path(input), expected, "input={input:?}");
        }
    }

    #[test]
    fn validate_path_rejects_relative_and_empty_segments() {
        assert!(validate_path("/").is_ok());
        assert!(validate_path("/a/b").is_ok());

        for bad in ["", "a/b", "/a//b", "/a/"] {
            assert!(
                matches!(validate_path(bad), Err(FsError::InvalidPath { .. })),
                "input={bad:?}"
            );
        }
        assert!(matches!(
            validate_child_path("/"),
            Err(FsError::InvalidPath { .. })
        ));
    }
}
