pub mod config;
pub mod error;
pub mod messages;
pub mod trajectory;
pub mod viewport;

pub use config::{AnimationConfig, DEFAULT_FPS_REPORT_INTERVAL};
pub use error::{ConfigError, PoolError};
pub use messages::{FrameRequest, MainToWorker, RenderOptions, WorkerToMain};
pub use trajectory::{Axis, AxisBounds, Trajectory, TrajectoryConfig};
pub use viewport::Viewport;
