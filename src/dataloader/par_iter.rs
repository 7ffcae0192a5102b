use std::collections::VecDeque;

use crate::thread_pool::thread_pool::ThreadPool;
use crate::thread_pool::worker::WorkFutureBatch;

use super::data_batch::DataBatch;
use super::dataloader::{DataLoader, DatasetSplit};
use super::error::DataLoaderError;

struct PendingBatch {
    batch_number: usize,
    futures: WorkFutureBatch,
}

/// One epoch over a split, decoding up to `prefetch_count` batches ahead of
/// the consumer on a pool owned by the iterator.
///
/// The first error is yielded once and ends the epoch. Dropping the iterator
/// early discards queued decode work and joins the pool.
pub struct MultithreadedIterator<'a, T: DataLoader> {
    dataloader: &'a T,
    split: DatasetSplit,
    order: Vec<usize>,
    next_batch: usize,
    num_batches: usize,
    pending_batches: VecDeque<PendingBatch>,
    max_pending: usize,
    finished: bool,
    thread_pool: ThreadPool,
}

impl<'a, T: DataLoader> MultithreadedIterator<'a, T> {
    fn new(dl: &'a T, split: DatasetSplit) -> Result<Self, DataLoaderError> {
        if !dl.is_indexed(split) {
            return Err(DataLoaderError::SplitNotIndexed(split));
        }

        let config = dl.get_config();
        let order = dl.epoch_order(split)?;
        let thread_pool = ThreadPool::new(config.threads)?;
        let max_pending = config.prefetch_count;
        let num_batches = dl.num_batches(split);

        tracing::info!(%split, batches = num_batches, samples = order.len(), "starting epoch");

        let mut iterator = MultithreadedIterator {
            dataloader: dl,
            split,
            order,
            next_batch: 0,
            num_batches,
            pending_batches: VecDeque::with_capacity(max_pending),
            max_pending,
            finished: false,
            thread_pool,
        };

        iterator.request_next_batches();

        Ok(iterator)
    }

    pub fn remaining_batches(&self) -> usize {
        if self.finished {
            0
        } else {
            self.num_batches - self.next_batch
        }
    }

    fn request_next_batches(&mut self) {
        while self.pending_batches.len() < self.max_pending {
            let batch_number = self.next_batch + self.pending_batches.len();

            if let Some(samples) = self.dataloader.get_batch_reference(self.split, &self.order, batch_number) {
                let work = samples
                    .into_iter()
                    .map(|sample| self.dataloader.create_sample_work(sample))
                    .collect();
                let futures = self.thread_pool.submit_batch(work);
                tracing::trace!(split = %self.split, batch_number, samples = futures.len(), "submitted batch");
                self.pending_batches.push_back(PendingBatch { batch_number, futures });
            } else {
                break;
            }
        }
    }

    fn wait_for_next_batch(&mut self) -> Option<Result<DataBatch, DataLoaderError>> {
        let pending = self.pending_batches.pop_front()?;
        let batch_number = pending.batch_number;

        let mut images = Vec::with_capacity(pending.futures.len());
        // Submission order is batch order, whichever worker finishes first
        for future in pending.futures.futures {
            let result = match future.wait() {
                Some(result) => result,
                None => return Some(Err(DataLoaderError::WorkerDisconnected(batch_number))),
            };
            match self.dataloader.process_work_result(result) {
                Ok(image) => images.push(image),
                Err(e) => return Some(Err(e)),
            }
        }

        Some(Ok(DataBatch::from_images(batch_number, images)))
    }

    fn finish(&mut self) {
        self.finished = true;
        self.thread_pool.cancel();
        self.pending_batches.clear();
    }
}

impl<'a, T: DataLoader> Iterator for MultithreadedIterator<'a, T> {
    type Item = Result<DataBatch, DataLoaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.wait_for_next_batch() {
            Some(Ok(batch)) => {
                self.next_batch += 1;
                self.request_next_batches();
                Some(Ok(batch))
            }
            Some(Err(e)) => {
                tracing::debug!(split = %self.split, batch_number = self.next_batch, error = %e, "epoch aborted");
                self.finish();
                Some(Err(e))
            }
            None => {
                self.finished = true;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // An error replaces the rest of the epoch with a single item
        let remaining = self.remaining_batches();
        (remaining.min(1), Some(remaining))
    }
}

impl<'a, T: DataLoader> Drop for MultithreadedIterator<'a, T> {
    fn drop(&mut self) {
        if !self.finished && self.next_batch < self.num_batches {
            tracing::warn!(
                split = %self.split,
                consumed = self.next_batch,
                batches = self.num_batches,
                "epoch dropped before completion, cancelling pending decode work"
            );
            self.finish();
        }
    }
}

pub trait MultithreadedDataLoaderIterator: DataLoader {
    fn par_iter(&self, split: DatasetSplit) -> Result<MultithreadedIterator<'_, Self>, DataLoaderError>
    where
        Self: Sized;
}

impl<T: DataLoader> MultithreadedDataLoaderIterator for T {
    fn par_iter(&self, split: DatasetSplit) -> Result<MultithreadedIterator<'_, T>, DataLoaderError> {
        MultithreadedIterator::new(self, split)
    }
}
