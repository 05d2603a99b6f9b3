//! Test double for [`WorkerSpawner`]: workers that only record what they are
//! sent. Tests play the worker side by completing recorded requests in any
//! order they like.

use super::{WorkerHandle, WorkerSpawner};
use mandelanim_core::{MainToWorker, PoolError};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct Posted {
    pub slot_index: usize,
    pub worker_id: u64,
    pub message: MainToWorker,
}

/// Shared record of every posted message, in posting order.
#[derive(Clone, Default)]
pub struct PostLog(Rc<RefCell<Vec<Posted>>>);

impl PostLog {
    /// Remove and return everything posted since the last call.
    pub fn take(&self) -> Vec<Posted> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

pub struct ScriptedWorker {
    slot_index: usize,
    worker_id: u64,
    log: PostLog,
}

impl WorkerHandle for ScriptedWorker {
    fn post(&self, message: MainToWorker) {
        self.log.0.borrow_mut().push(Posted {
            slot_index: self.slot_index,
            worker_id: self.worker_id,
            message,
        });
    }
}

pub struct ScriptedSpawner {
    log: PostLog,
}

impl ScriptedSpawner {
    pub fn new(log: PostLog) -> Self {
        Self { log }
    }
}

impl WorkerSpawner for ScriptedSpawner {
    type Worker = ScriptedWorker;

    fn spawn(&mut self, slot_index: usize, worker_id: u64) -> Result<ScriptedWorker, PoolError> {
        Ok(ScriptedWorker {
            slot_index,
            worker_id,
            log: self.log.clone(),
        })
    }
}
