pub mod colorize;
pub mod envelope;
pub mod mandelbrot;
pub mod worker;

#[cfg(target_arch = "wasm32")]
pub mod wasm_worker;

pub use colorize::map_color;
pub use envelope::{decode_message, encode_reply, process_posted, ReplyEnvelope};
pub use mandelbrot::{escape_count, escape_count_x4, render_frame, LANES};
pub use worker::{handle_message, run_worker, WorkerStep};

// Re-export core types for convenience
pub use mandelanim_core::*;
