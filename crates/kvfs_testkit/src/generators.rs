//! Property-based test generators using proptest.
//!
//! Provides strategies for generating keys and payloads that satisfy the
//! storage key rules.

use proptest::prelude::*;
use serde::{Deserialize, Serialize};

/// Strategy for a single-segment key such as `"item_01.bin"`.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9_][a-zA-Z0-9_.-]{0,31}")
        .expect("Invalid regex")
}

/// Strategy for a namespaced key such as `"users/2024/ann.json"`.
pub fn nested_key_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::string::string_regex("[a-z0-9_]{1,12}").expect("Invalid regex"),
        1..4,
    )
    .prop_map(|segments| segments.join("/"))
}

/// Strategy for arbitrary stored bytes, including empty values.
pub fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..1024)
}

/// A small record used for typed round-trip tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Display name.
    pub name: String,
    /// Age in years.
    pub age: u8,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Optional contact address.
    pub email: Option<String>,
}

/// Strategy for [`Profile`] values.
pub fn profile_strategy() -> impl Strategy<Value = Profile> {
    (
        ".{0,24}",
        any::<u8>(),
        prop::collection::vec("[a-z]{1,8}", 0..5),
        prop::option::of("[a-z]{1,8}@[a-z]{1,8}\\.com"),
    )
        .prop_map(|(name, age, tags, email)| Profile {
            name,
            age,
            tags,
            email,
        })
}
