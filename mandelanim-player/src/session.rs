//! Threaded animation session: a scheduler wired to OS-thread workers and
//! the channel they reply on.

use crate::animation::{FpsStats, FrameScheduler};
use crate::surface::RenderSurface;
use crate::workers::ThreadSpawner;
use mandelanim_core::{AnimationConfig, ConfigError, PoolError, RenderOptions, WorkerToMain};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error("no frame arrived within {0:?}")]
    Stalled(Duration),

    #[error("result channel closed; no worker can reply")]
    Disconnected,
}

/// Wait up to `timeout` for the next worker reply. `Ok(None)` on timeout.
fn next_result(
    results: &Receiver<WorkerToMain>,
    timeout: Duration,
) -> Result<Option<WorkerToMain>, SessionError> {
    match results.recv_timeout(timeout) {
        Ok(result) => Ok(Some(result)),
        Err(RecvTimeoutError::Timeout) => Ok(None),
        Err(RecvTimeoutError::Disconnected) => Err(SessionError::Disconnected),
    }
}

pub struct AnimationSession<D: RenderSurface> {
    scheduler: FrameScheduler<ThreadSpawner, D>,
    results: Receiver<WorkerToMain>,
    fps_stats: Rc<RefCell<FpsStats>>,
}

impl<D: RenderSurface> AnimationSession<D> {
    pub fn new(config: &AnimationConfig, surface: D) -> Result<Self, SessionError> {
        config.validate()?;

        let (results_tx, results) = mpsc::channel();
        let mut scheduler = FrameScheduler::new(config, ThreadSpawner::new(results_tx), surface)?;

        let fps_stats = Rc::new(RefCell::new(FpsStats::default()));
        let stats = Rc::clone(&fps_stats);
        scheduler.set_fps_listener(move |fps| {
            // Zero marks a stop, not a measurement.
            if fps > 0.0 {
                let mut stats = stats.borrow_mut();
                stats.record(fps);
                log::info!("{:.1} fps (average {:.1})", fps, stats.average());
            }
        });

        Ok(Self {
            scheduler,
            results,
            fps_stats,
        })
    }

    pub fn scheduler(&self) -> &FrameScheduler<ThreadSpawner, D> {
        &self.scheduler
    }

    pub fn fps_stats(&self) -> FpsStats {
        *self.fps_stats.borrow()
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        self.fps_stats.borrow_mut().reset();
        self.scheduler.on_start()?;
        Ok(())
    }

    pub fn stop(&mut self) {
        self.scheduler.on_stop();
    }

    pub fn set_desired_worker_count(&mut self, count: usize) -> Result<(), SessionError> {
        self.scheduler.set_desired_worker_count(count)?;
        self.fps_stats.borrow_mut().reset();
        Ok(())
    }

    pub fn set_render_options(&mut self, options: RenderOptions) {
        self.scheduler.set_render_options(options);
        self.fps_stats.borrow_mut().reset();
    }

    /// Wait up to `timeout` for one worker reply and process it.
    /// Returns `false` if nothing arrived.
    pub fn pump(&mut self, timeout: Duration) -> Result<bool, SessionError> {
        match next_result(&self.results, timeout)? {
            Some(result) => {
                self.scheduler.handle_result(result);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Run until `count` frames of the current run are on screen, starting
    /// the animation first if it is idle.
    pub fn run_frames(&mut self, count: u64, timeout: Duration) -> Result<u64, SessionError> {
        if !self.scheduler.is_running() {
            self.start()?;
        }
        while self.scheduler.animation().next_displayable() < count {
            if !self.pump(timeout)? {
                return Err(SessionError::Stalled(timeout));
            }
        }
        Ok(self.scheduler.animation().next_displayable())
    }

    /// Stop, wait for the final frame and hand back the surface.
    pub fn shutdown(mut self, timeout: Duration) -> Result<D, SessionError> {
        self.stop();
        while self.scheduler.active_workers() > 0 {
            if !self.pump(timeout)? {
                log::warn!(
                    "{} workers did not deliver a final frame",
                    self.scheduler.active_workers()
                );
                break;
            }
        }
        Ok(self.scheduler.into_surface())
    }
}
