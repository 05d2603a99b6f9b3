//! Frame scheduler: feeds animation frames to the worker pool and turns
//! out-of-order completions into a strictly sequential display stream.

use super::fps::FpsMeter;
use super::reorder_buffer::{PendingFrame, ReorderBuffer};
use crate::surface::RenderSurface;
use crate::workers::{WorkerPool, WorkerSpawner};
use mandelanim_core::{
    AnimationConfig, FrameRequest, PoolError, RenderOptions, Trajectory, Viewport, WorkerToMain,
};
use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
}

/// Mutable per-run animation state.
#[derive(Clone, Debug)]
pub struct AnimationState {
    pub next_sequence_number: u64,
    /// `None` until the first frame of the run is displayed.
    pub last_displayed: Option<u64>,
    pub trajectory: Trajectory,
    pub desired_worker_count: usize,
}

impl AnimationState {
    /// Sequence number that may be displayed next.
    pub fn next_displayable(&self) -> u64 {
        self.last_displayed.map_or(0, |seq| seq + 1)
    }
}

type FpsListener = Box<dyn FnMut(f64)>;

pub struct FrameScheduler<S: WorkerSpawner, D: RenderSurface> {
    pool: WorkerPool<S>,
    surface: D,
    reorder: ReorderBuffer,
    animation: AnimationState,
    render_options: RenderOptions,
    state: SchedulerState,
    run_id: u32,
    fps: FpsMeter,
    on_fps: Option<FpsListener>,
}

impl<S: WorkerSpawner, D: RenderSurface> FrameScheduler<S, D> {
    pub fn new(config: &AnimationConfig, spawner: S, surface: D) -> Result<Self, PoolError> {
        let max_workers = config.resolved_max_workers();
        if config.desired_worker_count > max_workers {
            return Err(PoolError::WorkerPoolExhausted {
                requested: config.desired_worker_count,
                max: max_workers,
            });
        }

        let (width, height) = surface.dimensions();
        let buffer_size = width as usize * height as usize * 4;

        Ok(Self {
            pool: WorkerPool::new(spawner, max_workers, buffer_size),
            surface,
            reorder: ReorderBuffer::new(),
            animation: AnimationState {
                next_sequence_number: 0,
                last_displayed: None,
                trajectory: Trajectory::new(&config.trajectory),
                desired_worker_count: config.desired_worker_count,
            },
            render_options: config.render_options,
            state: SchedulerState::Idle,
            run_id: 0,
            fps: FpsMeter::new(config.fps_report_interval, Instant::now()),
            on_fps: None,
        })
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    pub fn run_id(&self) -> u32 {
        self.run_id
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    pub fn viewport(&self) -> Viewport {
        self.animation.trajectory.viewport()
    }

    pub fn pool(&self) -> &WorkerPool<S> {
        &self.pool
    }

    pub fn active_workers(&self) -> usize {
        self.pool.active_count()
    }

    pub fn pending_frames(&self) -> usize {
        self.reorder.len()
    }

    pub fn surface(&self) -> &D {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut D {
        &mut self.surface
    }

    pub fn into_surface(self) -> D {
        self.surface
    }

    pub fn render_options(&self) -> RenderOptions {
        self.render_options
    }

    /// Register the callback that receives FPS reports.
    pub fn set_fps_listener(&mut self, listener: impl FnMut(f64) + 'static) {
        self.on_fps = Some(Box::new(listener));
    }

    /// Target pool size. The pool converges one worker per result event.
    pub fn set_desired_worker_count(&mut self, count: usize) -> Result<(), PoolError> {
        let max = self.pool.max_workers();
        if count > max {
            return Err(PoolError::WorkerPoolExhausted {
                requested: count,
                max,
            });
        }
        log::info!("Desired worker count set to {}", count);
        self.animation.desired_worker_count = count;
        Ok(())
    }

    /// Options for requests issued from now on.
    pub fn set_render_options(&mut self, options: RenderOptions) {
        self.render_options = options;
    }

    /// Begin a new run with one worker computing frame 0.
    pub fn on_start(&mut self) -> Result<(), PoolError> {
        if self.pool.active_count() > 0 {
            log::info!(
                "Tearing down {} workers left over from run {}",
                self.pool.active_count(),
                self.run_id
            );
            self.pool.terminate_all_workers();
        }

        self.run_id = self.run_id.wrapping_add(1);
        self.animation.next_sequence_number = 0;
        self.animation.last_displayed = None;
        self.reorder.clear();
        self.fps.reset(Instant::now());

        let (width, height) = self.surface.dimensions();
        self.pool.set_buffer_size(width as usize * height as usize * 4);

        let slot = self.pool.add_worker()?;
        self.state = SchedulerState::Running;
        log::info!(
            "Animation run {} started, target {} workers",
            self.run_id,
            self.animation.desired_worker_count
        );
        self.request_frame(slot)
    }

    /// Stop issuing frames. The next result is shown and then every worker
    /// is torn down.
    pub fn on_stop(&mut self) {
        if self.state == SchedulerState::Idle {
            return;
        }
        self.state = SchedulerState::Idle;
        self.emit_fps(0.0);
        log::info!("Animation run {} stopping", self.run_id);
    }

    /// Process one worker reply.
    pub fn handle_result(&mut self, result: WorkerToMain) {
        let WorkerToMain::FrameComplete {
            slot_index,
            worker_id,
            request,
            buffer,
        } = result;

        if request.run_id != self.run_id {
            log::debug!(
                "Discarding frame {} from run {} (current run {})",
                request.sequence_number,
                request.run_id,
                self.run_id
            );
            return;
        }

        if self.state == SchedulerState::Idle {
            self.flush(request.sequence_number, buffer);
            return;
        }

        if self.pool.active_count() < self.animation.desired_worker_count {
            match self.pool.add_worker() {
                Ok(slot) => self.issue_frame(slot),
                Err(err) => log::warn!("Could not grow worker pool: {}", err),
            }
        }

        if self.pool.active_count() > self.animation.desired_worker_count {
            self.pool.terminate_last_worker();
        }

        let sequence_number = request.sequence_number;
        if sequence_number != self.animation.next_displayable() {
            log::debug!(
                "Frame {} arrived early from slot {}, holding it",
                sequence_number,
                slot_index
            );
            self.reorder.insert(PendingFrame {
                slot_index,
                worker_id,
                sequence_number,
                buffer,
            });
            return;
        }

        self.paint(&buffer);
        while let Some(pending) = self.reorder.take_if_next(self.animation.next_displayable()) {
            self.paint(&pending.buffer);
            self.release(pending.slot_index, pending.worker_id, pending.buffer);
        }
        self.release(slot_index, worker_id, buffer);
    }

    /// Final frame after a stop: show it and shut the pool down.
    fn flush(&mut self, sequence_number: u64, buffer: Vec<u8>) {
        if self.pool.active_count() == 0 {
            log::debug!("Discarding frame {} after final flush", sequence_number);
            return;
        }
        self.surface.display(&buffer);
        self.pool.terminate_all_workers();
        self.reorder.clear();
        log::info!(
            "Animation run {} stopped after frame {}",
            self.run_id,
            sequence_number
        );
    }

    fn paint(&mut self, buffer: &[u8]) {
        self.surface.display(buffer);
        self.animation.last_displayed = Some(self.animation.next_displayable());
        if let Some(fps) = self.fps.frame_painted(Instant::now()) {
            self.emit_fps(fps);
        }
    }

    /// Give a displayed frame's buffer back to its slot and keep that slot
    /// busy, unless the worker that computed it has been retired.
    fn release(&mut self, slot_index: usize, worker_id: u64, buffer: Vec<u8>) {
        if !self.pool.is_current(slot_index, worker_id) {
            log::debug!("Worker {} retired, dropping its buffer", worker_id);
            return;
        }
        match self.pool.restore_buffer(slot_index, buffer) {
            Ok(()) => self.issue_frame(slot_index),
            Err(err) => log::warn!("Could not restore buffer: {}", err),
        }
    }

    fn issue_frame(&mut self, slot_index: usize) {
        if let Err(err) = self.request_frame(slot_index) {
            log::warn!("Skipping frame request for slot {}: {}", slot_index, err);
        }
    }

    fn request_frame(&mut self, slot_index: usize) -> Result<(), PoolError> {
        let (width, height) = self.surface.dimensions();
        let request = FrameRequest {
            run_id: self.run_id,
            sequence_number: self.animation.next_sequence_number,
            width,
            height,
            viewport: self.animation.trajectory.viewport(),
            render_options: self.render_options,
        };
        self.pool.send_request(slot_index, request)?;
        self.animation.next_sequence_number += 1;
        self.animation.trajectory.advance();
        Ok(())
    }

    fn emit_fps(&mut self, fps: f64) {
        log::debug!("fps: {:.1}", fps);
        if let Some(listener) = self.on_fps.as_mut() {
            listener(fps);
        }
    }
}
