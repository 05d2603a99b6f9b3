use std::time::Instant;

/// Measures paint rate over a fixed number of frames.
#[derive(Clone, Copy, Debug)]
pub struct FpsMeter {
    interval: u32,
    frames_painted: u64,
    last_report: Instant,
}

impl FpsMeter {
    pub fn new(interval: u32, now: Instant) -> Self {
        Self {
            interval: interval.max(1),
            frames_painted: 0,
            last_report: now,
        }
    }

    pub fn reset(&mut self, now: Instant) {
        self.frames_painted = 0;
        self.last_report = now;
    }

    pub fn frames_painted(&self) -> u64 {
        self.frames_painted
    }

    /// Record a painted frame. Every `interval` frames (not counting the
    /// first) returns the frames per second since the previous report.
    pub fn frame_painted(&mut self, now: Instant) -> Option<f64> {
        let interval = self.interval as u64;
        let report = if self.frames_painted > 0 && self.frames_painted % interval == 0 {
            let elapsed = now.duration_since(self.last_report).as_secs_f64();
            self.last_report = now;
            Some(if elapsed > 0.0 {
                interval as f64 / elapsed
            } else {
                f64::INFINITY
            })
        } else {
            None
        };
        self.frames_painted += 1;
        report
    }
}

/// Running average of reported FPS values.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FpsStats {
    pub latest: f64,
    total: f64,
    measurements: u32,
}

impl FpsStats {
    pub fn record(&mut self, fps: f64) {
        self.latest = fps;
        self.total += fps;
        self.measurements += 1;
    }

    /// Average of all values recorded since the last reset (0 if none).
    pub fn average(&self) -> f64 {
        if self.measurements == 0 {
            0.0
        } else {
            self.total / self.measurements as f64
        }
    }

    pub fn measurements(&self) -> u32 {
        self.measurements
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
