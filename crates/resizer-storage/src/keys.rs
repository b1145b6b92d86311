//! Shared key validation for storage backends and the variant planner.

use crate::traits::{StorageError, StorageResult};

/// Reject keys that are empty, absolute or contain a `..` path segment.
/// Dots inside a segment (`summer..2024.webp`) are allowed.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if key.starts_with('/') {
        return Err(StorageError::InvalidKey(format!(
            "Storage key must be relative: {}",
            key
        )));
    }
    if key.split('/').any(|segment| segment == "..") {
        return Err(StorageError::InvalidKey(format!(
            "Storage key contains a parent-directory segment: {}",
            key
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("images/a_640x480.webp").is_ok());
        assert!(validate_key("a.webp").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("/etc/passwd").is_err());
        assert!(validate_key("images/../secret").is_err());
        assert!(validate_key("../secret.webp").is_err());
        assert!(validate_key("images/..").is_err());
    }

    #[test]
    fn test_dots_inside_a_segment_are_allowed() {
        assert!(validate_key("summer..2024.webp").is_ok());
        assert!(validate_key("images/summer..2024_50x50.webp").is_ok());
        assert!(validate_key("images/.../a.webp").is_ok());
    }
}
