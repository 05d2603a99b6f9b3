//! Rendering surface abstraction and an in-memory implementation.

use std::io::{self, Write};

/// Where finished frames are shown.
pub trait RenderSurface {
    /// Pixel dimensions `(width, height)`.
    fn dimensions(&self) -> (u32, u32);

    /// Replace the shown image with an RGBA buffer of `width * height * 4`
    /// bytes.
    fn display(&mut self, pixels: &[u8]);
}

/// Surface that keeps the most recent frame in memory.
#[derive(Clone, Debug, Default)]
pub struct FrameRecorder {
    width: u32,
    height: u32,
    last_frame: Vec<u8>,
    frames_displayed: u64,
}

impl FrameRecorder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            last_frame: vec![0; width as usize * height as usize * 4],
            frames_displayed: 0,
        }
    }

    pub fn last_frame(&self) -> &[u8] {
        &self.last_frame
    }

    pub fn frames_displayed(&self) -> u64 {
        self.frames_displayed
    }

    /// Write the most recent frame as a binary PPM image.
    pub fn write_ppm<W: Write>(&self, writer: W) -> io::Result<()> {
        write_ppm(writer, self.width, self.height, &self.last_frame)
    }
}

impl RenderSurface for FrameRecorder {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn display(&mut self, pixels: &[u8]) {
        if pixels.len() != self.last_frame.len() {
            log::warn!(
                "Frame of {} bytes does not fit a {}x{} surface",
                pixels.len(),
                self.width,
                self.height
            );
        }
        let n = pixels.len().min(self.last_frame.len());
        self.last_frame[..n].copy_from_slice(&pixels[..n]);
        self.frames_displayed += 1;
    }
}

/// Encode an RGBA buffer as binary PPM (`P6`), dropping alpha.
pub fn write_ppm<W: Write>(mut writer: W, width: u32, height: u32, rgba: &[u8]) -> io::Result<()> {
    write!(writer, "P6\n{} {}\n255\n", width, height)?;
    let rgb: Vec<u8> = rgba
        .chunks_exact(4)
        .take(width as usize * height as usize)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();
    writer.write_all(&rgb)?;
    writer.flush()
}
