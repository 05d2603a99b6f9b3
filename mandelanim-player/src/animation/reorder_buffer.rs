/// A computed frame that arrived before its predecessor was displayed.
///
/// The frame keeps custody of its pixel buffer until it is displayed.
#[derive(Debug)]
pub struct PendingFrame {
    pub slot_index: usize,
    pub worker_id: u64,
    pub sequence_number: u64,
    pub buffer: Vec<u8>,
}

/// Holding area for out-of-order frames.
///
/// At most one frame per worker is ever in flight, so this stays small and a
/// linear scan beats anything keyed.
#[derive(Debug, Default)]
pub struct ReorderBuffer {
    frames: Vec<PendingFrame>,
}

impl ReorderBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, frame: PendingFrame) {
        debug_assert!(
            !self
                .frames
                .iter()
                .any(|f| f.sequence_number == frame.sequence_number),
            "duplicate pending frame {}",
            frame.sequence_number
        );
        self.frames.push(frame);
    }

    /// Remove and return the frame with `expected` sequence number, if held.
    pub fn take_if_next(&mut self, expected: u64) -> Option<PendingFrame> {
        let index = self
            .frames
            .iter()
            .position(|f| f.sequence_number == expected)?;
        Some(self.frames.swap_remove(index))
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}
