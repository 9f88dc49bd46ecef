//! Tilt quantization.
//!
//! Each axis is bucketed on its own against a deadzone band, then the pair is matched
//! against the four unit axes. Anything diagonal or flat resolves to `None`.

/// One raw reading per axis, on the 10-bit analog scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawSample {
    pub x: i32,
    pub y: i32,
}

impl RawSample {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Cardinal direction "down" currently points to, in the canonical frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gravity {
    Right,
    Up,
    Left,
    Down,
}

impl Gravity {
    pub const fn degrees(self) -> u16 {
        match self {
            Gravity::Right => 0,
            Gravity::Up => 90,
            Gravity::Left => 180,
            Gravity::Down => 270,
        }
    }

    /// Whether grains can cross the neck in this orientation.
    pub const fn is_coupling_axis(self) -> bool {
        matches!(self, Gravity::Right | Gravity::Left)
    }
}

/// Per-axis bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisTilt {
    Negative,
    Level,
    Positive,
}

/// Deadzone band. Samples in `low..=high` read as level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Thresholds {
    pub low: i32,
    pub high: i32,
}

impl Thresholds {
    pub const fn new(low: i32, high: i32) -> Self {
        Self { low, high }
    }

    pub fn classify(&self, raw: i32) -> AxisTilt {
        if raw < self.low {
            AxisTilt::Negative
        } else if raw <= self.high {
            AxisTilt::Level
        } else {
            AxisTilt::Positive
        }
    }

    pub fn resolve(&self, sample: RawSample) -> Option<Gravity> {
        match (self.classify(sample.x), self.classify(sample.y)) {
            (AxisTilt::Positive, AxisTilt::Level) => Some(Gravity::Right),
            (AxisTilt::Level, AxisTilt::Positive) => Some(Gravity::Up),
            (AxisTilt::Negative, AxisTilt::Level) => Some(Gravity::Left),
            (AxisTilt::Level, AxisTilt::Negative) => Some(Gravity::Down),
            _ => None,
        }
    }
}
