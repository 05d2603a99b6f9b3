//! Arena-indexed pool of compute workers.
//!
//! Slots live in a growable vector with an explicit active-count boundary.
//! Workers are only ever added at the boundary and removed from the tail, so
//! every index below `active_count` always refers to a live worker.

use mandelanim_core::{FrameRequest, MainToWorker, PoolError};

/// Sending side of one compute worker.
pub trait WorkerHandle {
    /// Deliver a message. Delivery failures are logged, not reported: a
    /// worker that went away simply stops contributing frames.
    fn post(&self, message: MainToWorker);
}

/// Creates compute workers wired to the scheduler's shared result channel.
pub trait WorkerSpawner {
    type Worker: WorkerHandle;

    fn spawn(&mut self, slot_index: usize, worker_id: u64) -> Result<Self::Worker, PoolError>;
}

struct WorkerSlot<W> {
    worker: W,
    worker_id: u64,
    /// Present while the slot is idle, `None` while its worker computes.
    buffer: Option<Vec<u8>>,
}

pub struct WorkerPool<S: WorkerSpawner> {
    spawner: S,
    slots: Vec<WorkerSlot<S::Worker>>,
    active_count: usize,
    max_workers: usize,
    buffer_size: usize,
    next_worker_id: u64,
}

impl<S: WorkerSpawner> WorkerPool<S> {
    pub fn new(spawner: S, max_workers: usize, buffer_size: usize) -> Self {
        Self {
            spawner,
            slots: Vec::new(),
            active_count: 0,
            max_workers,
            buffer_size,
            next_worker_id: 0,
        }
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    pub fn worker_is_active(&self, slot_index: usize) -> bool {
        slot_index < self.active_count
    }

    /// True if `slot_index` is active and still occupied by `worker_id`.
    pub fn is_current(&self, slot_index: usize, worker_id: u64) -> bool {
        self.worker_is_active(slot_index) && self.slots[slot_index].worker_id == worker_id
    }

    pub fn buffer_of(&self, slot_index: usize) -> Option<&[u8]> {
        self.slots.get(slot_index)?.buffer.as_deref()
    }

    /// Buffer size handed to workers added from now on.
    pub fn set_buffer_size(&mut self, buffer_size: usize) {
        self.buffer_size = buffer_size;
    }

    /// Spawn a worker in the next slot and return its index.
    pub fn add_worker(&mut self) -> Result<usize, PoolError> {
        if self.active_count >= self.max_workers {
            return Err(PoolError::WorkerPoolExhausted {
                requested: self.active_count + 1,
                max: self.max_workers,
            });
        }

        let slot_index = self.active_count;
        let worker_id = self.next_worker_id;
        let worker = self.spawner.spawn(slot_index, worker_id)?;
        self.next_worker_id += 1;

        let slot = WorkerSlot {
            worker,
            worker_id,
            buffer: Some(vec![0; self.buffer_size]),
        };
        if slot_index < self.slots.len() {
            self.slots[slot_index] = slot;
        } else {
            self.slots.push(slot);
        }
        self.active_count += 1;

        log::debug!("Worker {} added in slot {}", worker_id, slot_index);
        Ok(slot_index)
    }

    /// Hand the slot's buffer to its worker together with `request`.
    pub fn send_request(&mut self, slot_index: usize, request: FrameRequest) -> Result<(), PoolError> {
        self.check_active(slot_index)?;
        let slot = &mut self.slots[slot_index];
        let buffer = slot
            .buffer
            .take()
            .ok_or(PoolError::SlotBusy { slot: slot_index })?;

        slot.worker.post(MainToWorker::RenderFrame {
            slot_index,
            worker_id: slot.worker_id,
            request,
            buffer,
        });
        Ok(())
    }

    /// Take back a buffer returned by the slot's worker.
    pub fn restore_buffer(&mut self, slot_index: usize, buffer: Vec<u8>) -> Result<(), PoolError> {
        self.check_active(slot_index)?;
        self.slots[slot_index].buffer = Some(buffer);
        Ok(())
    }

    /// Retire the highest-index active worker. Returns the retired slot.
    ///
    /// The worker finishes whatever it is computing and replies before it
    /// shuts down.
    pub fn terminate_last_worker(&mut self) -> Option<usize> {
        if self.active_count == 0 {
            return None;
        }
        self.active_count -= 1;
        let slot_index = self.active_count;
        let slot = &mut self.slots[slot_index];
        slot.worker.post(MainToWorker::Terminate);
        slot.buffer = None;

        log::debug!("Worker {} in slot {} terminated", slot.worker_id, slot_index);
        Some(slot_index)
    }

    pub fn terminate_all_workers(&mut self) {
        while self.terminate_last_worker().is_some() {}
    }

    fn check_active(&self, slot_index: usize) -> Result<(), PoolError> {
        if self.worker_is_active(slot_index) {
            return Ok(());
        }
        debug_assert!(
            false,
            "stale slot access: slot {} with {} active workers",
            slot_index, self.active_count
        );
        Err(PoolError::StaleSlotAccess {
            slot: slot_index,
            active: self.active_count,
        })
    }
}

impl<S: WorkerSpawner> Drop for WorkerPool<S> {
    fn drop(&mut self) {
        self.terminate_all_workers();
    }
}
