//! Host side of the animation: worker pool, frame scheduler and the
//! surfaces finished frames are shown on.

pub mod animation;
pub mod session;
pub mod surface;
pub mod workers;

pub use animation::{AnimationState, FpsMeter, FpsStats, FrameScheduler, SchedulerState};
pub use session::{AnimationSession, SessionError};
pub use surface::{write_ppm, FrameRecorder, RenderSurface};
pub use workers::{ThreadSpawner, ThreadWorker, WorkerHandle, WorkerPool, WorkerSpawner};
