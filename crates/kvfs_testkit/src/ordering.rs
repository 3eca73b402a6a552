//! Ordering and concurrency checks for the handler-based operations.
//!
//! These helpers submit many non-blocking operations to one storage and
//! record the order their handlers ran in.

use kvfs_storage::{DataStorage, ReadableStorage, StorageResult, WritableStorage};
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// One completed operation, in handler order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// A save finished.
    Saved {
        /// Submission index.
        index: usize,
        /// Whether the save succeeded.
        ok: bool,
    },
    /// A fetch finished.
    Fetched {
        /// Submission index.
        index: usize,
        /// The fetched bytes, or `None` on failure.
        value: Option<Vec<u8>>,
    },
}

impl Completion {
    /// Returns the submission index.
    pub fn index(&self) -> usize {
        match self {
            Self::Saved { index, .. } | Self::Fetched { index, .. } => *index,
        }
    }
}

/// Result of an ordering run.
#[derive(Debug, Clone)]
pub struct OrderingReport {
    /// Completions in the order handlers ran.
    pub completions: Vec<Completion>,
    /// Time from first submission to last completion.
    pub duration: Duration,
}

impl OrderingReport {
    /// Returns true if handlers ran in submission order.
    pub fn in_submission_order(&self) -> bool {
        self.completions
            .iter()
            .enumerate()
            .all(|(i, c)| c.index() == i)
    }
}

/// Alternates `save(i)` and `fetch` on one key, all through the
/// non-blocking forms, and waits for every handler.
///
/// Each fetch must observe the save submitted just before it.
pub fn run_interleaved<S: DataStorage + ?Sized>(
    storage: &S,
    key: &str,
    rounds: usize,
    timeout: Duration,
) -> OrderingReport {
    let (tx, rx) = mpsc::channel();
    let start = Instant::now();

    for round in 0..rounds {
        let save_index = round * 2;
        let save_tx = tx.clone();
        storage.save_async(
            round.to_be_bytes().to_vec(),
            key,
            Box::new(move |r: StorageResult<Vec<u8>>| {
                let _ = save_tx.send(Completion::Saved {
                    index: save_index,
                    ok: r.is_ok(),
                });
            }),
        );

        let fetch_tx = tx.clone();
        storage.fetch_value_async(
            key,
            Box::new(move |r| {
                let _ = fetch_tx.send(Completion::Fetched {
                    index: save_index + 1,
                    value: r.ok(),
                });
            }),
        );
    }
    drop(tx);

    let mut completions = Vec::with_capacity(rounds * 2);
    while completions.len() < rounds * 2 {
        match rx.recv_timeout(timeout) {
            Ok(c) => completions.push(c),
            Err(_) => break,
        }
    }

    OrderingReport {
        completions,
        duration: start.elapsed(),
    }
}
