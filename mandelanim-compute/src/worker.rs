use crate::render_frame;
use mandelanim_core::{MainToWorker, WorkerToMain};
use std::sync::mpsc::{Receiver, Sender};

/// What a worker does after handling one message.
#[derive(Debug)]
pub enum WorkerStep {
    /// Send this reply to the scheduler and wait for the next message.
    Reply(WorkerToMain),
    /// Stop without replying.
    Terminate,
}

/// Handle one message from the scheduler.
///
/// A `RenderFrame` is computed into the buffer it carries and the buffer is
/// handed back with the request echoed unchanged.
pub fn handle_message(message: MainToWorker) -> WorkerStep {
    match message {
        MainToWorker::RenderFrame {
            slot_index,
            worker_id,
            request,
            mut buffer,
        } => {
            render_frame(&request, &mut buffer);
            WorkerStep::Reply(WorkerToMain::FrameComplete {
                slot_index,
                worker_id,
                request,
                buffer,
            })
        }
        MainToWorker::Terminate => WorkerStep::Terminate,
    }
}

/// Worker message loop for a native thread.
///
/// Runs until a `Terminate` message arrives or either channel is closed.
pub fn run_worker(inbox: Receiver<MainToWorker>, outbox: Sender<WorkerToMain>) {
    while let Ok(message) = inbox.recv() {
        match handle_message(message) {
            WorkerStep::Reply(reply) => {
                if outbox.send(reply).is_err() {
                    log::debug!("result channel closed, worker exiting");
                    return;
                }
            }
            WorkerStep::Terminate => {
                log::debug!("worker terminated");
                return;
            }
        }
    }
}
