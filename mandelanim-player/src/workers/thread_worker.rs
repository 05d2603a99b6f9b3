use super::{WorkerHandle, WorkerSpawner};
use mandelanim_compute::run_worker;
use mandelanim_core::{MainToWorker, PoolError, WorkerToMain};
use std::sync::mpsc::{self, Sender};
use std::thread;

/// Compute worker running on its own OS thread.
pub struct ThreadWorker {
    inbox: Sender<MainToWorker>,
}

impl WorkerHandle for ThreadWorker {
    fn post(&self, message: MainToWorker) {
        if self.inbox.send(message).is_err() {
            log::warn!("Worker thread has exited; message dropped");
        }
    }
}

/// Spawns thread workers that all reply on one shared result channel.
pub struct ThreadSpawner {
    results: Sender<WorkerToMain>,
}

impl ThreadSpawner {
    pub fn new(results: Sender<WorkerToMain>) -> Self {
        Self { results }
    }
}

impl WorkerSpawner for ThreadSpawner {
    type Worker = ThreadWorker;

    fn spawn(&mut self, slot_index: usize, worker_id: u64) -> Result<ThreadWorker, PoolError> {
        let (inbox, requests) = mpsc::channel();
        let outbox = self.results.clone();

        thread::Builder::new()
            .name(format!("mandel-worker-{}", worker_id))
            .spawn(move || run_worker(requests, outbox))
            .map_err(|e| PoolError::Spawn(e.to_string()))?;

        log::debug!("Spawned thread for worker {} (slot {})", worker_id, slot_index);
        Ok(ThreadWorker { inbox })
    }
}
