use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Sender};

use crate::dataloader::error::DataLoaderError;

use super::worker::{WorkFuture, WorkFutureBatch, WorkItem, WorkType, Worker};

/// Fixed-size pool of decode threads.
///
/// Dropping the pool cancels whatever is still queued and joins every worker.
pub struct ThreadPool {
    work_queue: Option<Sender<WorkItem>>,
    cancelled: Arc<AtomicBool>,
    workers: Vec<Worker>,
}

impl ThreadPool {
    pub fn new(size: usize) -> Result<ThreadPool, DataLoaderError> {
        if size == 0 {
            return Err(DataLoaderError::InvalidConfig("thread pool size must be greater than zero".into()));
        }

        let (sender, receiver) = unbounded();
        let cancelled = Arc::new(AtomicBool::new(false));

        let mut pool = ThreadPool {
            work_queue: Some(sender),
            cancelled: Arc::clone(&cancelled),
            workers: Vec::with_capacity(size),
        };

        // On a spawn failure the partially built pool is dropped and joined
        for id in 0..size {
            pool.workers.push(Worker::new(id, receiver.clone(), Arc::clone(&cancelled))?);
        }

        tracing::debug!(threads = size, "started decode pool");
        Ok(pool)
    }

    pub fn submit_work(&self, work: WorkType) -> WorkFuture {
        let (future, sender) = WorkFuture::new();
        self.enqueue(WorkItem { work, future: sender });
        future
    }

    pub fn submit_batch(&self, work_items: Vec<WorkType>) -> WorkFutureBatch {
        let futures = work_items
            .into_iter()
            .map(|work| self.submit_work(work))
            .collect();

        WorkFutureBatch { futures }
    }

    /// Queued items are dropped unprocessed from now on. Their futures resolve
    /// to `None`.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    fn enqueue(&self, item: WorkItem) {
        // Dropping a rejected item closes its future, which the waiter sees as
        // a disconnected worker
        if let Some(queue) = &self.work_queue {
            let _ = queue.send(item);
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.cancel();
        self.work_queue.take();

        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                if thread.join().is_err() {
                    tracing::warn!(worker = worker.id, "decode worker panicked");
                }
            }
        }
        tracing::debug!(threads = self.workers.len(), "stopped decode pool");
    }
}
