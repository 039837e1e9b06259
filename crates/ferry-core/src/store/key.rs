use std::path::{Component, Path};

use super::StoreError;

/// Checks that an object key maps to a relative path inside its bucket.
///
/// Rejects empty keys, absolute keys, `..` components and Windows prefixes.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey("empty key".into()));
    }

    for component in Path::new(key).components() {
        match component {
            Component::ParentDir => {
                return Err(StoreError::InvalidKey(format!(
                    "parent directory traversal not allowed: {key}"
                )));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(StoreError::InvalidKey(format!(
                    "absolute key not allowed: {key}"
                )));
            }
            Component::CurDir | Component::Normal(_) => {}
        }
    }

    Ok(())
}

/// Checks that a bucket name is a single path component that does not start
/// with a dot. Dot-prefixed names are reserved for staging directories.
pub fn validate_bucket(bucket: &str) -> Result<(), StoreError> {
    if bucket.is_empty() || bucket.starts_with('.') || bucket.contains(['/', '\\']) {
        return Err(StoreError::InvalidBucket(bucket.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_nested_keys() {
        assert!(validate_key("photos/2020/a.jpg").is_ok());
        assert!(validate_key("a.txt").is_ok());
    }

    #[test]
    fn rejects_traversal_and_absolute() {
        assert!(validate_key("").is_err());
        assert!(validate_key("../escape").is_err());
        assert!(validate_key("a/../../escape").is_err());
        assert!(validate_key("/etc/passwd").is_err());
    }

    #[test]
    fn bucket_names_are_single_undotted_components() {
        assert!(validate_bucket("photos-2020").is_ok());
        for bad in ["", ".", "..", ".ferry-tmp", "a/b", "a\\b"] {
            assert!(
                matches!(validate_bucket(bad), Err(StoreError::InvalidBucket(_))),
                "{bad}"
            );
        }
    }
}
