#[cfg(test)]
pub(crate) mod scripted;
pub mod thread_worker;
pub mod worker_pool;

pub use thread_worker::{ThreadSpawner, ThreadWorker};
pub use worker_pool::{WorkerHandle, WorkerPool, WorkerSpawner};
