use mandelanim_compute::{
    render_frame, run_worker, FrameRequest, MainToWorker, RenderOptions, Viewport, WorkerToMain,
};
use std::sync::mpsc;
use std::thread;

fn request(sequence_number: u64, use_vectorized_kernel: bool) -> FrameRequest {
    FrameRequest {
        run_id: 1,
        sequence_number,
        width: 48,
        height: 32,
        viewport: Viewport::new(-0.5, 0.0, 1.0),
        render_options: RenderOptions {
            max_iterations: 40,
            use_vectorized_kernel,
            downscale: false,
        },
    }
}

#[test]
fn workers_share_one_result_channel() {
    let (results_tx, results_rx) = mpsc::channel();
    let mut inboxes = Vec::new();
    let mut handles = Vec::new();

    for _ in 0..3 {
        let (tx, rx) = mpsc::channel();
        let outbox = results_tx.clone();
        handles.push(thread::spawn(move || run_worker(rx, outbox)));
        inboxes.push(tx);
    }
    drop(results_tx);

    for (slot_index, inbox) in inboxes.iter().enumerate() {
        inbox
            .send(MainToWorker::RenderFrame {
                slot_index,
                worker_id: slot_index as u64,
                request: request(slot_index as u64, slot_index % 2 == 1),
                buffer: vec![0; 48 * 32 * 4],
            })
            .unwrap();
        inbox.send(MainToWorker::Terminate).unwrap();
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let mut replies: Vec<WorkerToMain> = results_rx.iter().collect();
    replies.sort_by_key(|r| r.sequence_number());
    assert_eq!(replies.len(), 3);

    for (i, reply) in replies.iter().enumerate() {
        let WorkerToMain::FrameComplete {
            slot_index,
            request: echoed,
            buffer,
            ..
        } = reply;
        assert_eq!(*slot_index, i);
        assert_eq!(echoed.sequence_number, i as u64);
        assert_eq!(buffer.len(), 48 * 32 * 4);
    }
}

#[test]
fn worker_output_matches_direct_render() {
    let (to_worker, inbox) = mpsc::channel();
    let (outbox, from_worker) = mpsc::channel();
    let handle = thread::spawn(move || run_worker(inbox, outbox));

    let req = request(0, false);
    to_worker
        .send(MainToWorker::RenderFrame {
            slot_index: 0,
            worker_id: 0,
            request: req,
            buffer: Vec::new(),
        })
        .unwrap();
    drop(to_worker);
    handle.join().unwrap();

    let mut expected = Vec::new();
    render_frame(&req, &mut expected);

    let WorkerToMain::FrameComplete { buffer, .. } = from_worker.recv().unwrap();
    assert_eq!(buffer, expected);
}
