//! Key validation.
//!
//! Keys are relative paths under the storage root. Separators are allowed
//! and act as namespaces (`"users/ann.json"` lives in `users/`), but a key
//! must never leave the root or fail to name a file.

use crate::error::{StorageError, StorageResult};
use std::path::{Component, Path};

/// Checks that `key` names a file strictly below the storage root.
///
/// # Errors
///
/// Returns `InvalidKey` if the key is empty, absolute, contains a `..`
/// component, has no normal component at all (e.g. `"."` or `"./"`), or
/// ends in a separator or a `.` segment (e.g. `"dir/"` or `"dir/."`).
pub fn validate_key(key: &str) -> StorageResult<&Path> {
    let invalid = |reason| StorageError::InvalidKey {
        key: key.to_owned(),
        reason,
    };

    if key.is_empty() {
        return Err(invalid("key is empty"));
    }

    let path = Path::new(key);
    let mut has_name = false;
    for component in path.components() {
        match component {
            Component::Normal(_) => has_name = true,
            Component::CurDir => {}
            Component::ParentDir => return Err(invalid("key must not contain `..`")),
            Component::RootDir | Component::Prefix(_) => {
                return Err(invalid("key must be a relative path"))
            }
        }
    }

    if !has_name {
        return Err(invalid("key does not name a file"));
    }
    let last_segment = key.rsplit(is_separator).next();
    if matches!(last_segment, Some("" | ".")) {
        return Err(invalid("key does not name a file"));
    }

    Ok(path)
}

/// Returns the canonical spelling of `key`: its normal components joined
/// with `/`.
///
/// Two keys with the same canonical spelling address the same file, so
/// `"./a"` and `"a"`, or `"a//b"` and `"a/b"`, name one entry.
///
/// # Errors
///
/// Returns `InvalidKey` under the same rules as [`validate_key`].
pub fn normalize_key(key: &str) -> StorageResult<String> {
    let path = validate_key(key)?;
    let segments: Vec<_> = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy()),
            _ => None,
        })
        .collect();
    Ok(segments.join("/"))
}

fn is_separator(c: char) -> bool {
    c == '/' || c == std::path::MAIN_SEPARATOR
}
