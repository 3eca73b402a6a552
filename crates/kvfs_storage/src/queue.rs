//! Serial background worker.

use crate::error::StorageResult;
use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle, ThreadId};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A single named worker thread that runs jobs one at a time.
///
/// Jobs run in submission order and never in parallel with each other.
/// A job that panics is logged and the worker moves on to the next job.
///
/// Dropping the queue lets already submitted jobs finish, then joins the
/// worker thread.
///
/// # Example
///
/// ```rust
/// use kvfs_storage::SerialQueue;
/// use std::sync::mpsc;
///
/// let queue = SerialQueue::new("example-queue").unwrap();
/// let (tx, rx) = mpsc::channel();
/// queue.dispatch(move || tx.send(42).unwrap());
/// assert_eq!(rx.recv().unwrap(), 42);
/// ```
#[derive(Debug)]
pub struct SerialQueue {
    name: String,
    sender: Mutex<Option<Sender<Job>>>,
    worker: Option<JoinHandle<()>>,
    worker_id: ThreadId,
}

impl SerialQueue {
    /// Spawns the worker thread.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the OS refuses to spawn the thread.
    pub fn new(name: impl Into<String>) -> StorageResult<Self> {
        let name = name.into();
        let (tx, rx) = mpsc::channel::<Job>();

        let thread_name = name.clone();
        let worker = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                while let Ok(job) = rx.recv() {
                    if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                        tracing::error!(queue = %thread_name, "queued job panicked");
                    }
                }
                tracing::trace!(queue = %thread_name, "serial queue drained");
            })?;

        let worker_id = worker.thread().id();

        Ok(Self {
            name,
            sender: Mutex::new(Some(tx)),
            worker: Some(worker),
            worker_id,
        })
    }

    /// Returns the name of the worker thread.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true when called from this queue's worker thread.
    #[must_use]
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.worker_id
    }

    /// Submits `job` to run after every previously submitted job.
    ///
    /// Returns immediately. Returns `false` if the worker has stopped and
    /// the job was dropped without running.
    pub fn dispatch<F>(&self, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self.sender.lock();
        match sender.as_ref() {
            Some(tx) => tx.send(Box::new(job)).is_ok(),
            None => false,
        }
    }
}

impl Drop for SerialQueue {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop once the backlog is done.
        self.sender.lock().take();

        if let Some(worker) = self.worker.take() {
            if self.is_current() {
                return;
            }
            if worker.join().is_err() {
                tracing::error!(queue = %self.name, "serial queue worker panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex as StdMutex};
    use std::time::Duration;

    #[test]
    fn runs_jobs_in_submission_order() {
        let queue = SerialQueue::new("order-test").unwrap();
        let seen = Arc::new(StdMutex::new(Vec::new()));

        for i in 0..100 {
            let seen = Arc::clone(&seen);
            assert!(queue.dispatch(move || seen.lock().unwrap().push(i)));
        }
        drop(queue);

        let seen = seen.lock().unwrap();
        assert_eq!(*seen, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn jobs_run_off_the_caller_thread() {
        let queue = SerialQueue::new("thread-test").unwrap();
        let caller = thread::current().id();
        let (tx, rx) = mpsc::channel();

        queue.dispatch(move || {
            tx.send(thread::current().id()).unwrap();
        });

        let worker = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_ne!(worker, caller);
    }

    #[test]
    fn worker_thread_is_named() {
        let queue = SerialQueue::new("named-queue").unwrap();
        let (tx, rx) = mpsc::channel();

        queue.dispatch(move || {
            tx.send(thread::current().name().map(str::to_owned)).unwrap();
        });

        let name = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(name.as_deref(), Some("named-queue"));
        assert_eq!(queue.name(), "named-queue");
    }

    #[test]
    fn panicking_job_does_not_stop_queue() {
        let queue = SerialQueue::new("panic-test").unwrap();
        let count = Arc::new(AtomicUsize::new(0));

        queue.dispatch(|| panic!("boom"));
        let c = Arc::clone(&count);
        queue.dispatch(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        drop(queue);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_from_worker_thread_does_not_deadlock() {
        let queue = Arc::new(SerialQueue::new("self-drop").unwrap());
        let (tx, rx) = mpsc::channel();

        let q = Arc::clone(&queue);
        queue.dispatch(move || {
            assert!(q.is_current());
            // Hold the last reference so the drop happens here.
            thread::sleep(Duration::from_millis(20));
            drop(q);
            tx.send(()).unwrap();
        });
        drop(queue);

        rx.recv_timeout(Duration::from_secs(5)).unwrap();
    }
}
