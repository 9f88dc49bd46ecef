//! The simulation context and its frame loop.
//!
//! [`Hourglass`] owns both matrices, the preset list, the drop timer and the alarm
//! flag, plus the hardware it talks to. The caller waits [`Hourglass::period`] and
//! calls [`Hourglass::tick`]; nothing in here blocks except the buzzer sweeps.

use embassy_time::{Duration, Instant};
use log::{debug, info, warn};
use rand::Rng;

use crate::alarm::{AlarmController, FrameState};
use crate::automaton;
use crate::config::{Config, GRAIN_COUNT};
use crate::coupler::{drop_interval, DropCoupler, Transfer};
use crate::error::ConfigError;
use crate::glyph;
use crate::gravity::Gravity;
use crate::grid::{MatrixId, Matrices};
use crate::hal::{Button, Buzzer, MatrixDisplay, TiltSensor};
use crate::mode::{ModeConfigurator, ModeEvent, Presets};
use crate::orientation::{rotation_for, source_matrix};

/// What happened during one running frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameReport {
    pub gravity: Option<Gravity>,
    pub moved: bool,
    pub transfer: Option<Transfer>,
    /// Grains in A and B after the frame.
    pub counts: [usize; 2],
    pub alarm: bool,
    /// The button opened the duration selector at the end of this frame.
    pub selector_opened: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    Frame(FrameReport),
    Selector(ModeEvent),
}

pub struct Hourglass<S, D, B, Z, R> {
    config: Config,
    matrices: Matrices,
    presets: Presets,
    coupler: DropCoupler,
    alarm: AlarmController,
    mode: ModeConfigurator,
    gravity: Option<Gravity>,
    rng: R,
    sensor: S,
    display: D,
    button: B,
    buzzer: Z,
}

impl<S, D, B, Z, R> Hourglass<S, D, B, Z, R>
where
    S: TiltSensor,
    D: MatrixDisplay,
    B: Button,
    Z: Buzzer,
    R: Rng,
{
    pub fn new(
        config: Config,
        sensor: S,
        display: D,
        button: B,
        buzzer: Z,
        rng: R,
        now: Instant,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let presets = Presets::new(config.presets, config.default_preset);
        let coupler = DropCoupler::new(now, drop_interval(presets.seconds()));
        let mode = ModeConfigurator::new(&config, now);
        Ok(Self {
            config,
            matrices: Matrices::new(),
            presets,
            coupler,
            alarm: AlarmController::new(),
            mode,
            gravity: None,
            rng,
            sensor,
            display,
            button,
            buzzer,
        })
    }

    /// Startup chirp, run brightness, then a fresh glass for the current orientation.
    pub fn start(&mut self, now: Instant) {
        self.alarm.startup(&mut self.buzzer);
        self.set_intensity(self.config.run_intensity);
        self.gravity = self.read_gravity();
        self.orient();
        self.reset(now);
        self.display.show(&self.matrices);
        info!("Initialized!");
    }

    /// How long to wait before the next [`tick`](Self::tick).
    pub fn period(&self) -> Duration {
        if self.mode.is_active() {
            self.config.config_poll_period
        } else {
            self.config.frame_period
        }
    }

    pub fn tick(&mut self, now: Instant) -> Tick {
        if self.mode.is_active() {
            Tick::Selector(self.poll_selector(now))
        } else {
            Tick::Frame(self.run_frame(now))
        }
    }

    /// Clears both matrices and refills the source side. The first drop waits for
    /// `first_drop_delay`.
    pub fn reset(&mut self, now: Instant) {
        let source = source_matrix(self.gravity);
        self.matrices.clear();
        self.matrices.fill(source, GRAIN_COUNT);
        self.coupler.hold(now, self.config.first_drop_delay);
        info!(
            "reset: {} grains in {:?}, {}s run",
            GRAIN_COUNT,
            source,
            self.presets.seconds()
        );
    }

    fn run_frame(&mut self, now: Instant) -> FrameReport {
        let gravity = self.read_gravity();
        self.gravity = gravity;
        self.orient();

        let moved = automaton::step(&mut self.matrices, &mut self.rng);

        let transfer = self.coupler.poll(now, gravity, &mut self.matrices);
        if transfer.is_some() {
            self.alarm.tick(&mut self.buzzer);
            self.alarm.rearm();
        }

        let counts = [
            self.matrices.count(MatrixId::A),
            self.matrices.count(MatrixId::B),
        ];
        let frame = FrameState {
            moved,
            dropped: transfer.is_some(),
            gravity,
            matrices: &self.matrices,
        };
        let alarm = self.alarm.evaluate(&frame, &mut self.buzzer);

        if self.config.debug_dump {
            self.dump();
        }
        self.display.show(&self.matrices);

        let pressed = self.button.is_pressed();
        let event = self.mode.poll(now, pressed, &mut self.presets);
        let selector_opened = event == ModeEvent::Entered;
        if selector_opened {
            self.show_selector(now);
        }

        FrameReport {
            gravity,
            moved,
            transfer,
            counts,
            alarm,
            selector_opened,
        }
    }

    fn poll_selector(&mut self, now: Instant) -> ModeEvent {
        let pressed = self.button.is_pressed();
        let event = self.mode.poll(now, pressed, &mut self.presets);
        if let ModeEvent::Committed(_) = event {
            self.commit(now);
        } else {
            self.show_selector(now);
        }
        event
    }

    fn commit(&mut self, now: Instant) {
        self.coupler.set_interval(drop_interval(self.presets.seconds()));
        self.reset(now);
        if self.config.rearm_alarm_on_reset {
            self.alarm.rearm();
        }
        self.set_intensity(self.config.run_intensity);
        self.display.show(&self.matrices);
    }

    fn show_selector(&mut self, now: Instant) {
        let label = glyph::duration_label(self.presets.seconds());
        glyph::paint(&mut self.matrices, &label);
        self.set_intensity(self.mode.blink_intensity(now));
        self.display.show(&self.matrices);
    }

    fn read_gravity(&mut self) -> Option<Gravity> {
        match self.sensor.read() {
            Ok(sample) => self.config.thresholds.resolve(sample),
            Err(e) => {
                warn!("tilt sensor read failed: {:?}", e);
                None
            }
        }
    }

    // Leaves the rotation alone while the glass is flat or diagonal.
    fn orient(&mut self) {
        if let Some(rotation) = rotation_for(self.config.rotation_offset, self.gravity) {
            self.matrices.set_rotation(rotation);
        }
    }

    fn set_intensity(&mut self, level: u8) {
        for id in MatrixId::ALL {
            self.display.set_intensity(id, level);
        }
    }

    fn dump(&self) {
        for id in MatrixId::ALL {
            debug!(
                "{:?} at {} deg\n{}",
                id,
                self.matrices.rotation().degrees(),
                self.matrices.grid(id)
            );
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn matrices(&self) -> &Matrices {
        &self.matrices
    }

    pub fn gravity(&self) -> Option<Gravity> {
        self.gravity
    }

    pub fn presets(&self) -> &Presets {
        &self.presets
    }

    pub fn drop_interval(&self) -> Duration {
        self.coupler.interval()
    }

    pub fn is_configuring(&self) -> bool {
        self.mode.is_active()
    }

    pub fn alarm_sounded(&self) -> bool {
        self.alarm.has_sounded()
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn button_mut(&mut self) -> &mut B {
        &mut self.button
    }

    pub fn buzzer(&self) -> &Z {
        &self.buzzer
    }
}
