//! Audible feedback: startup chirp, drop tick, and the end-of-run alarm.

use embassy_time::Duration;
use log::info;

use crate::config::GRAIN_COUNT;
use crate::gravity::Gravity;
use crate::grid::Matrices;
use crate::hal::Buzzer;
use crate::orientation::downstream_matrix;

/// Evenly stepped run of tones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sweep {
    pub start_hz: u32,
    pub step_hz: i32,
    pub notes: u32,
    pub tone: Duration,
    /// Time from one note's start to the next. A note still sounding when the next one
    /// is due gets cut short; the last note always plays in full.
    pub spacing: Duration,
}

impl Sweep {
    pub fn frequencies(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.notes as i32).map(move |i| (self.start_hz as i32 + self.step_hz * i) as u32)
    }

    pub fn play<Z: Buzzer + ?Sized>(&self, buzzer: &mut Z) {
        let sounding = self.tone.min(self.spacing);
        let mut notes = self.frequencies().peekable();
        while let Some(hz) = notes.next() {
            if notes.peek().is_none() {
                buzzer.tone(hz, self.tone);
                break;
            }
            buzzer.tone(hz, sounding);
            buzzer.pause(self.spacing - sounding);
        }
    }

    /// Wall time of [`play`](Self::play) on a blocking buzzer.
    pub fn length(&self) -> Duration {
        match self.notes {
            0 => Duration::from_ticks(0),
            n => self.spacing * (n - 1) + self.tone,
        }
    }
}

pub const STARTUP: Sweep = Sweep {
    start_hz: 440,
    step_hz: 20,
    notes: 10,
    tone: Duration::from_millis(110),
    spacing: Duration::from_millis(20),
};

pub const ALARM: Sweep = Sweep {
    start_hz: 600,
    step_hz: -20,
    notes: 10,
    tone: Duration::from_millis(110),
    spacing: Duration::from_millis(180),
};

pub const TICK_HZ: u32 = 440;
pub const TICK: Duration = Duration::from_millis(10);

/// What the frame loop saw this frame, for the alarm decision.
#[derive(Clone, Copy, Debug)]
pub struct FrameState<'a> {
    pub moved: bool,
    pub dropped: bool,
    pub gravity: Option<Gravity>,
    pub matrices: &'a Matrices,
}

impl FrameState<'_> {
    /// Settled, nothing crossed, and every grain sits in the downstream matrix.
    pub fn is_terminal(&self) -> bool {
        if self.moved || self.dropped {
            return false;
        }
        downstream_matrix(self.gravity)
            .is_some_and(|id| self.matrices.count(id) == GRAIN_COUNT)
    }
}

#[derive(Debug, Default)]
pub struct AlarmController {
    sounded: bool,
    started: bool,
}

impl AlarmController {
    pub const fn new() -> Self {
        Self {
            sounded: false,
            started: false,
        }
    }

    pub fn has_sounded(&self) -> bool {
        self.sounded
    }

    /// Plays the startup chirp the first time only.
    pub fn startup<Z: Buzzer + ?Sized>(&mut self, buzzer: &mut Z) {
        if self.started {
            return;
        }
        self.started = true;
        info!("Starting sound!");
        STARTUP.play(buzzer);
    }

    pub fn tick<Z: Buzzer + ?Sized>(&mut self, buzzer: &mut Z) {
        buzzer.tone(TICK_HZ, TICK);
    }

    /// A grain crossed: the next terminal state may sound again.
    pub fn rearm(&mut self) {
        self.sounded = false;
    }

    /// Sounds the alarm once per terminal state. Returns whether it sounded now.
    pub fn evaluate<Z: Buzzer + ?Sized>(
        &mut self,
        frame: &FrameState<'_>,
        buzzer: &mut Z,
    ) -> bool {
        if self.sounded || !frame.is_terminal() {
            return false;
        }
        self.sounded = true;
        info!("Alarm!");
        ALARM.play(buzzer);
        true
    }
}
