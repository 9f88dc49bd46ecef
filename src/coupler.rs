//! Grain transfer through the neck of the glass.
//!
//! The neck joins raw cell `(0, 0)` of matrix A with raw cell `(7, 7)` of matrix B. At
//! most one grain crosses per timer period, and only while the glass stands on the
//! coupling axis.

use embassy_time::{Duration, Instant};
use log::debug;

use crate::config::GRAIN_COUNT;
use crate::gravity::Gravity;
use crate::grid::{Coord, MatrixId, Matrices};

pub const NECK_A: Coord = Coord::new(0, 0);
pub const NECK_B: Coord = Coord::new(7, 7);

/// Time between drops so that a full run of grains takes `run_seconds`.
pub fn drop_interval(run_seconds: u32) -> Duration {
    Duration::from_millis(1000 * u64::from(run_seconds) / GRAIN_COUNT as u64)
}

/// Non-blocking deadline, polled once per frame.
#[derive(Clone, Copy, Debug)]
pub struct DropTimer {
    deadline: Instant,
}

impl DropTimer {
    pub const fn new(now: Instant) -> Self {
        Self { deadline: now }
    }

    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.deadline = now + delay;
    }

    pub fn has_expired(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

/// A grain that crossed the neck.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub from: MatrixId,
    pub to: MatrixId,
}

#[derive(Debug)]
pub struct DropCoupler {
    timer: DropTimer,
    interval: Duration,
}

impl DropCoupler {
    pub const fn new(now: Instant, interval: Duration) -> Self {
        Self {
            timer: DropTimer::new(now),
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Takes effect from the next rearm.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Postpones the next drop opportunity.
    pub fn hold(&mut self, now: Instant, delay: Duration) {
        self.timer.arm(now, delay);
    }

    pub fn timer(&self) -> &DropTimer {
        &self.timer
    }

    /// Rearms on every expiry, then lets one grain through if exactly one side of the
    /// neck is occupied.
    pub fn poll(
        &mut self,
        now: Instant,
        gravity: Option<Gravity>,
        m: &mut Matrices,
    ) -> Option<Transfer> {
        if !self.timer.has_expired(now) {
            return None;
        }
        self.timer.arm(now, self.interval);

        if !gravity.is_some_and(Gravity::is_coupling_axis) {
            return None;
        }
        transfer(m)
    }
}

/// Swaps the neck cells when exactly one of them holds a grain.
pub fn transfer(m: &mut Matrices) -> Option<Transfer> {
    let a = m.get_raw(MatrixId::A, NECK_A);
    let b = m.get_raw(MatrixId::B, NECK_B);
    if a == b {
        return None;
    }
    m.toggle_raw(MatrixId::A, NECK_A);
    m.toggle_raw(MatrixId::B, NECK_B);
    let t = if a {
        Transfer {
            from: MatrixId::A,
            to: MatrixId::B,
        }
    } else {
        Transfer {
            from: MatrixId::B,
            to: MatrixId::A,
        }
    };
    debug!("grain {:?} -> {:?}", t.from, t.to);
    Some(t)
}
