use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::dataloader::error::DataLoaderError;
use crate::dataloader::image_loader::{load_sample, DecodeSpec};
use crate::dataloader::sample::{DecodedImage, Sample};

pub enum WorkType {
    LoadSingleImage { sample: Sample, spec: DecodeSpec },
}

pub enum WorkResult {
    LoadSingleImage(Result<DecodedImage, DataLoaderError>),
}

/// Receiving end of a single work item's result.
pub struct WorkFuture {
    receiver: Receiver<WorkResult>,
}

impl WorkFuture {
    pub fn new() -> (Self, Sender<WorkResult>) {
        let (sender, receiver) = bounded(1);
        (WorkFuture { receiver }, sender)
    }

    /// Blocks until the result arrives. `None` means the item was discarded
    /// by a cancelled or stopped pool.
    pub fn wait(self) -> Option<WorkResult> {
        self.receiver.recv().ok()
    }
}

pub struct WorkItem {
    pub work: WorkType,
    pub future: Sender<WorkResult>,
}

/// Futures in the order their work was submitted.
pub struct WorkFutureBatch {
    pub futures: Vec<WorkFuture>,
}

impl WorkFutureBatch {
    pub fn len(&self) -> usize {
        self.futures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.futures.is_empty()
    }

    pub fn wait(self) -> Vec<Option<WorkResult>> {
        self.futures
            .into_iter()
            .map(|future| future.wait())
            .collect()
    }
}

pub struct Worker {
    pub id: usize,
    pub thread: Option<thread::JoinHandle<()>>,
}

impl Worker {
    pub fn new(id: usize, work_queue: Receiver<WorkItem>, cancelled: Arc<AtomicBool>) -> Result<Worker, DataLoaderError> {
        let thread = thread::Builder::new()
            .name(format!("decode-worker-{}", id))
            .spawn(move || {
                // Ends once every sender is dropped and the queue is drained
                for work_item in work_queue.iter() {
                    if cancelled.load(Ordering::Acquire) {
                        continue;
                    }
                    let result = Self::process_work(work_item.work);
                    // Receiver gone means the consumer stopped waiting
                    let _ = work_item.future.send(result);
                }
                tracing::trace!(worker = id, "decode worker exiting");
            })?;

        Ok(Worker {
            id,
            thread: Some(thread),
        })
    }

    fn process_work(work: WorkType) -> WorkResult {
        match work {
            WorkType::LoadSingleImage { sample, spec } => {
                WorkResult::LoadSingleImage(load_sample(&sample, spec))
            }
        }
    }
}
