//! Cross-crate integration test helpers.
//!
//! Provides utilities for checking storages against a model of what
//! should be stored.

use kvfs_storage::{DataStorage, ReadableStorage, StorageError, WritableStorage};
use std::collections::HashMap;

/// Tracks every successful save and checks the storage agrees.
pub struct StorageHarness<S: DataStorage> {
    /// The storage under test.
    pub storage: S,
    /// Expected bytes per key.
    expected: HashMap<String, Vec<u8>>,
}

impl<S: DataStorage> StorageHarness<S> {
    /// Wraps a storage.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            expected: HashMap::new(),
        }
    }

    /// Saves a value and records it.
    pub fn save(&mut self, key: &str, value: &[u8]) {
        self.storage.save(value, key).expect("Failed to save value");
        self.expected.insert(key.to_owned(), value.to_vec());
    }

    /// Fetches a value and checks it against the recorded one.
    ///
    /// Keys that were never saved must fail with `NotFound`.
    pub fn fetch_and_verify(&self, key: &str) -> Option<Vec<u8>> {
        match (self.storage.fetch_value(key), self.expected.get(key)) {
            (Ok(actual), Some(expected)) => {
                assert_eq!(&actual, expected, "Value mismatch for {:?}", key);
                Some(actual)
            }
            (Err(StorageError::NotFound { .. }), None) => None,
            (actual, expected) => panic!(
                "Unexpected result for {:?}: got {:?}, expected {:?}",
                key, actual, expected
            ),
        }
    }

    /// Verifies all recorded keys.
    pub fn verify_all(&self) {
        for key in self.expected.keys() {
            self.fetch_and_verify(key);
        }
    }

    /// Returns the number of recorded keys.
    pub fn tracked_count(&self) -> usize {
        self.expected.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::TempStorage;
    use crate::generators::{nested_key_strategy, payload_strategy, profile_strategy, Profile};
    use kvfs_codec::CborCodec;
    use kvfs_storage::{FileStorage, InMemoryStorage};
    use kvfs_typed::{TypedError, TypedStorage};
    use proptest::prelude::*;
    use serde::{Deserialize, Serialize};
    use std::sync::{mpsc, Arc};
    use std::time::Duration;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct User {
        name: String,
    }

    #[test]
    fn example_scenario() {
        let fixture = TempStorage::new();
        let root = fixture.path().to_path_buf();

        fixture.save(b"hello", "greeting.txt").unwrap();
        assert_eq!(fixture.fetch_value("greeting.txt").unwrap(), b"hello");

        let (typed, _dir) = fixture.into_typed();
        typed
            .save(&User { name: "Ann".into() }, "user.json")
            .unwrap();
        let user: User = typed.fetch("user.json").unwrap();
        assert_eq!(user, User { name: "Ann".into() });

        assert!(typed.storage().fetch_value("missing").unwrap_err().is_not_found());

        typed.storage().save(b"not json", "bad.json").unwrap();
        assert!(matches!(
            typed.fetch::<User>("bad.json"),
            Err(TypedError::Decode { .. })
        ));

        assert!(root.join("greeting.txt").is_file());
        assert!(root.join("user.json").is_file());
    }

    #[test]
    fn harness_tracks_overwrites_and_misses() {
        let mut harness = StorageHarness::new(InMemoryStorage::new().unwrap());
        harness.save("a", b"1");
        harness.save("a", b"2");
        harness.save("b/c", b"3");

        assert_eq!(harness.tracked_count(), 2);
        assert_eq!(harness.fetch_and_verify("a"), Some(b"2".to_vec()));
        assert_eq!(harness.fetch_and_verify("never"), None);
        harness.verify_all();
    }

    #[test]
    fn values_survive_reopen() {
        let fixture = TempStorage::new();
        let root = fixture.path().to_path_buf();
        let (typed, dir) = fixture.into_typed();

        typed.save(&vec![1, 2, 3], "numbers.json").unwrap();
        drop(typed);

        let reopened = TypedStorage::new(FileStorage::open(&root).unwrap());
        assert_eq!(reopened.fetch::<Vec<i32>>("numbers.json").unwrap(), [1, 2, 3]);
        drop(dir);
    }

    #[test]
    fn file_and_memory_storages_agree() {
        let file = TempStorage::new();
        let memory = InMemoryStorage::new().unwrap();
        let storages: [&dyn DataStorage; 2] = [&*file, &memory];

        for storage in storages {
            storage.save(b"v1", "ns/key").unwrap();
            storage.save(b"v2", "ns/key").unwrap();
            assert_eq!(storage.fetch_value("ns/key").unwrap(), b"v2");
            assert!(storage.fetch_value("ns/other").unwrap_err().is_not_found());
            assert!(matches!(
                storage.save(b"x", "../escape"),
                Err(StorageError::InvalidKey { .. })
            ));
            assert!(matches!(
                storage.fetch_value("ns/."),
                Err(StorageError::InvalidKey { .. })
            ));

            storage.save(b"dot", "./a").unwrap();
            assert_eq!(storage.fetch_value("a").unwrap(), b"dot");
            storage.save(b"slashes", "ns//key").unwrap();
            assert_eq!(storage.fetch_value("ns/key").unwrap(), b"slashes");
        }
    }

    #[test]
    fn typed_storage_shares_one_file_storage() {
        let fixture = TempStorage::new();
        let shared: Arc<dyn DataStorage> = Arc::new(FileStorage::open(fixture.path()).unwrap());
        let json = TypedStorage::from_shared(Arc::clone(&shared), kvfs_codec::JsonCodec::new());
        let cbor = TypedStorage::from_shared(Arc::clone(&shared), CborCodec::new());

        json.save(&User { name: "Ann".into() }, "a.json").unwrap();
        cbor.save(&User { name: "Bo".into() }, "b.cbor").unwrap();

        assert_eq!(json.fetch::<User>("a.json").unwrap().name, "Ann");
        assert_eq!(cbor.fetch::<User>("b.cbor").unwrap().name, "Bo");
        assert!(json.fetch::<User>("b.cbor").unwrap_err().is_decode());
    }

    #[test]
    fn async_typed_round_trip_on_disk() {
        let (typed, _dir) = TempStorage::new().into_typed();
        let (tx, rx) = mpsc::channel();

        typed
            .async_save(User { name: "Ann".into() }, "user.json", |_| {})
            .unwrap();
        typed.async_fetch("user.json", move |result: Result<User, TypedError>| {
            tx.send(result).unwrap();
        });

        assert_eq!(rx.recv_timeout(TIMEOUT).unwrap().unwrap().name, "Ann");
    }

    #[tokio::test]
    async fn publisher_reads_from_disk() {
        let (typed, _dir) = TempStorage::new().into_typed();
        typed.save(&User { name: "Ann".into() }, "user.json").unwrap();

        let user: User = typed.fetch_publisher("user.json").await.unwrap();
        assert_eq!(user.name, "Ann");

        let missing = typed.fetch_publisher::<User>("nobody.json").await;
        assert!(missing.unwrap_err().is_not_found());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_file_round_trip(
            key in nested_key_strategy(),
            first in payload_strategy(),
            second in payload_strategy(),
        ) {
            let fixture = TempStorage::with_config(|c| c.sync_writes(false));

            fixture.save(&first, &key).unwrap();
            prop_assert_eq!(fixture.fetch_value(&key).unwrap(), first);

            fixture.save(&second, &key).unwrap();
            prop_assert_eq!(fixture.fetch_value(&key).unwrap(), second);
        }

        #[test]
        fn prop_typed_profile_round_trip(profile in profile_strategy()) {
            let (typed, _dir) = TempStorage::with_config(|c| c.sync_writes(false)).into_typed();

            typed.save(&profile, "profile.json").unwrap();
            let fetched: Profile = typed.fetch("profile.json").unwrap();
            prop_assert_eq!(fetched, profile);
        }
    }
}
