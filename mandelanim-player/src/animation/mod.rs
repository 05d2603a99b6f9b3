pub mod fps;
pub mod reorder_buffer;
pub mod scheduler;


pub use fps::{FpsMeter, FpsStats};
pub use reorder_buffer::{PendingFrame, ReorderBuffer};
pub use scheduler::{AnimationState, FrameScheduler, SchedulerState};
