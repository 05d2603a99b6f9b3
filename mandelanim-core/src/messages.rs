use crate::Viewport;
use serde::{Deserialize, Serialize};

/// Per-request rendering options. Changes apply to the next issued request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub max_iterations: u32,
    /// Use the 4-lane kernel instead of the scalar one.
    pub use_vectorized_kernel: bool,
    /// Compute at half resolution and replicate into 2x2 blocks.
    #[serde(default)]
    pub downscale: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            use_vectorized_kernel: false,
            downscale: false,
        }
    }
}

/// One animation frame to compute. Immutable once sent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameRequest {
    /// Animation run that issued this request.
    pub run_id: u32,
    /// Position of this frame in display order.
    pub sequence_number: u64,
    pub width: u32,
    pub height: u32,
    pub viewport: Viewport,
    pub render_options: RenderOptions,
}

impl FrameRequest {
    /// Size in bytes of an RGBA buffer for this request.
    pub fn buffer_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Messages sent from the scheduler to a compute worker.
///
/// The pixel buffer moves with the message; it is not part of the JSON form
/// (in the browser it travels as a transferable `ArrayBuffer`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum MainToWorker {
    /// Compute a frame into `buffer`.
    RenderFrame {
        slot_index: usize,
        worker_id: u64,
        request: FrameRequest,
        #[serde(skip)]
        buffer: Vec<u8>,
    },

    /// Shut down. No reply is sent.
    Terminate,
}

/// Messages sent from a compute worker back to the scheduler.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum WorkerToMain {
    /// A frame is finished; `request` is echoed unchanged and `buffer`
    /// ownership returns to the scheduler.
    FrameComplete {
        slot_index: usize,
        worker_id: u64,
        request: FrameRequest,
        #[serde(skip)]
        buffer: Vec<u8>,
    },
}

impl WorkerToMain {
    pub fn slot_index(&self) -> usize {
        match self {
            WorkerToMain::FrameComplete { slot_index, .. } => *slot_index,
        }
    }

    pub fn sequence_number(&self) -> u64 {
        match self {
            WorkerToMain::FrameComplete { request, .. } => request.sequence_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(sequence_number: u64) -> FrameRequest {
        FrameRequest {
            run_id: 1,
            sequence_number,
            width: 4,
            height: 2,
            viewport: Viewport::new(-0.5, 0.0, 1.0),
            render_options: RenderOptions::default(),
        }
    }

    #[test]
    fn buffer_len_is_rgba() {
        assert_eq!(request(0).buffer_len(), 4 * 2 * 4);
    }

    #[test]
    fn render_frame_json_is_tagged_and_omits_buffer() {
        let msg = MainToWorker::RenderFrame {
            slot_index: 3,
            worker_id: 7,
            request: request(12),
            buffer: vec![0xAB; 32],
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"RenderFrame""#));
        assert!(json.contains(r#""sequence_number":12"#));
        assert!(!json.contains("buffer"));

        let parsed: MainToWorker = serde_json::from_str(&json).unwrap();
        match parsed {
            MainToWorker::RenderFrame {
                slot_index,
                request,
                buffer,
                ..
            } => {
                assert_eq!(slot_index, 3);
                assert_eq!(request.sequence_number, 12);
                assert!(buffer.is_empty());
            }
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn terminate_json() {
        let json = serde_json::to_string(&MainToWorker::Terminate).unwrap();
        assert_eq!(json, r#"{"type":"Terminate"}"#);
    }

    #[test]
    fn render_options_downscale_defaults_to_false() {
        let json = r#"{"max_iterations":80,"use_vectorized_kernel":true}"#;
        let options: RenderOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.max_iterations, 80);
        assert!(options.use_vectorized_kernel);
        assert!(!options.downscale);
    }

    #[test]
    fn frame_complete_accessors() {
        let msg = WorkerToMain::FrameComplete {
            slot_index: 2,
            worker_id: 9,
            request: request(41),
            buffer: Vec::new(),
        };
        assert_eq!(msg.slot_index(), 2);
        assert_eq!(msg.sequence_number(), 41);
    }
}
