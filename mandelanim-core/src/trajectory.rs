//! Deterministic ping-pong path of the viewport driving the zoom animation.

use crate::Viewport;
use serde::{Deserialize, Serialize};

/// Start and end bound of one animated parameter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisBounds {
    pub start: f64,
    pub end: f64,
}

impl AxisBounds {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

/// Bounds for the three animated parameters plus the number of frames it
/// takes to travel from start to end.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryConfig {
    pub x: AxisBounds,
    pub y: AxisBounds,
    pub zoom: AxisBounds,
    pub steps: u32,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            x: AxisBounds::new(-0.5, 0.0),
            y: AxisBounds::new(0.0, 0.75),
            zoom: AxisBounds::new(1.0, 0.0005),
            steps: 200,
        }
    }
}

/// One parameter moving between its bounds by a fixed step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Axis {
    bounds: AxisBounds,
    step: f64,
    value: f64,
}

impl Axis {
    pub fn new(bounds: AxisBounds, steps: u32) -> Self {
        Self {
            bounds,
            step: (bounds.end - bounds.start) / steps.max(1) as f64,
            value: bounds.start,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// True once the value has reached or passed the bound it is currently
    /// travelling towards.
    fn reached_bound(&self) -> bool {
        if self.step == 0.0 {
            return false;
        }
        let towards_end = (self.bounds.end - self.bounds.start).signum() == self.step.signum();
        let target = if towards_end {
            self.bounds.end
        } else {
            self.bounds.start
        };
        if self.step > 0.0 {
            self.value >= target
        } else {
            self.value <= target
        }
    }
}

/// The x, y and zoom axes, inverted together whenever any of them hits a
/// bound.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trajectory {
    x: Axis,
    y: Axis,
    zoom: Axis,
}

impl Trajectory {
    pub fn new(config: &TrajectoryConfig) -> Self {
        Self {
            x: Axis::new(config.x, config.steps),
            y: Axis::new(config.y, config.steps),
            zoom: Axis::new(config.zoom, config.steps),
        }
    }

    /// Current position as a viewport.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.x.value, self.y.value, self.zoom.value)
    }

    pub fn x(&self) -> &Axis {
        &self.x
    }

    pub fn y(&self) -> &Axis {
        &self.y
    }

    pub fn zoom(&self) -> &Axis {
        &self.zoom
    }

    /// Move one frame along the path.
    ///
    /// The direction flips before stepping, so a value sitting exactly on its
    /// bound turns around on this call instead of overshooting.
    pub fn advance(&mut self) {
        if self.x.reached_bound() || self.y.reached_bound() || self.zoom.reached_bound() {
            self.x.step = -self.x.step;
            self.y.step = -self.y.step;
            self.zoom.step = -self.zoom.step;
        }
        self.x.value += self.x.step;
        self.y.value += self.y.step;
        self.zoom.value += self.zoom.step;
    }
}
