//! JSON side of the browser worker protocol.
//!
//! A message arrives as the JSON form of [`MainToWorker`] plus the bytes of
//! the transferred `ArrayBuffer`; the reply leaves as JSON plus the buffer to
//! transfer back. Kept free of `js_sys` so it runs on every target.

use crate::worker::{handle_message, WorkerStep};
use mandelanim_core::{MainToWorker, WorkerToMain};

/// Reply ready to post: `reply` is JSON without the pixels, `buffer` goes in
/// the transfer list.
#[derive(Debug)]
pub struct ReplyEnvelope {
    pub reply: String,
    pub buffer: Vec<u8>,
}

/// Parse a posted message and attach the transferred pixels to it.
pub fn decode_message(json: &str, transferred: Vec<u8>) -> Result<MainToWorker, serde_json::Error> {
    let mut message: MainToWorker = serde_json::from_str(json)?;
    if let MainToWorker::RenderFrame { buffer, .. } = &mut message {
        *buffer = transferred;
    }
    Ok(message)
}

/// Split a reply into its JSON form and the buffer that travels with it.
pub fn encode_reply(mut reply: WorkerToMain) -> Result<ReplyEnvelope, serde_json::Error> {
    let WorkerToMain::FrameComplete { buffer, .. } = &mut reply;
    let buffer = std::mem::take(buffer);
    Ok(ReplyEnvelope {
        reply: serde_json::to_string(&reply)?,
        buffer,
    })
}

/// Handle one posted message end to end. `None` means the worker should
/// close.
pub fn process_posted(
    json: &str,
    transferred: Vec<u8>,
) -> Result<Option<ReplyEnvelope>, serde_json::Error> {
    match handle_message(decode_message(json, transferred)?) {
        WorkerStep::Reply(reply) => encode_reply(reply).map(Some),
        WorkerStep::Terminate => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_frame;
    use mandelanim_core::{FrameRequest, RenderOptions, Viewport};

    fn request() -> FrameRequest {
        FrameRequest {
            run_id: 2,
            sequence_number: 9,
            width: 6,
            height: 4,
            viewport: Viewport::default(),
            render_options: RenderOptions::default(),
        }
    }

    fn render_json(request: FrameRequest) -> String {
        serde_json::to_string(&MainToWorker::RenderFrame {
            slot_index: 1,
            worker_id: 5,
            request,
            buffer: Vec::new(),
        })
        .unwrap()
    }

    #[test]
    fn render_frame_round_trips_through_envelope() {
        let request = request();
        let envelope = process_posted(&render_json(request), vec![0; request.buffer_len()])
            .unwrap()
            .expect("render should reply");

        let mut expected = Vec::new();
        render_frame(&request, &mut expected);
        assert_eq!(envelope.buffer, expected);

        let reply: WorkerToMain = serde_json::from_str(&envelope.reply).unwrap();
        assert_eq!(
            reply,
            WorkerToMain::FrameComplete {
                slot_index: 1,
                worker_id: 5,
                request,
                buffer: Vec::new(),
            }
        );
    }

    #[test]
    fn reply_json_is_tagged_and_carries_no_pixels() {
        let request = request();
        let envelope = process_posted(&render_json(request), vec![0; request.buffer_len()])
            .unwrap()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&envelope.reply).unwrap();
        assert_eq!(value["type"], "FrameComplete");
        assert!(value.get("buffer").is_none());
    }

    #[test]
    fn transferred_buffer_is_attached_to_request() {
        let message = decode_message(&render_json(request()), vec![7; 3]).unwrap();
        match message {
            MainToWorker::RenderFrame { buffer, .. } => assert_eq!(buffer, vec![7; 3]),
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn wrong_sized_transfer_is_resized() {
        let request = request();
        let envelope = process_posted(&render_json(request), vec![0; 5])
            .unwrap()
            .unwrap();
        assert_eq!(envelope.buffer.len(), request.buffer_len());
    }

    #[test]
    fn terminate_produces_no_reply() {
        let json = serde_json::to_string(&MainToWorker::Terminate).unwrap();
        assert!(process_posted(&json, Vec::new()).unwrap().is_none());
    }

    #[test]
    fn malformed_message_is_an_error() {
        assert!(process_posted("{\"type\":\"Paint\"}", Vec::new()).is_err());
        assert!(process_posted("not json", Vec::new()).is_err());
    }
}
