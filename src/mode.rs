//! Run duration selector.
//!
//! A press while the glass is running opens the selector. Inside it, every release
//! reports how long the button was held: a short press steps to the next preset and a
//! long hold commits the choice. The selector never blocks; it is polled with the
//! current time and the raw button level, so synthetic timings drive it in tests.

use embassy_time::{Duration, Instant};
use log::info;

use crate::config::Config;

/// Preset run durations and the one currently selected.
#[derive(Clone, Debug)]
pub struct Presets {
    seconds: &'static [u32],
    index: usize,
}

impl Presets {
    /// `seconds` must be non-empty and `index` in range; [`Config::validate`] checks both.
    pub fn new(seconds: &'static [u32], index: usize) -> Self {
        Self { seconds, index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.seconds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seconds.is_empty()
    }

    pub fn seconds(&self) -> u32 {
        self.seconds[self.index]
    }

    /// Steps to the next preset, wrapping after the last.
    pub fn advance(&mut self) -> usize {
        self.index = (self.index + 1) % self.seconds.len();
        self.index
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Press {
    Short,
    Commit,
    Ignored,
}

/// `short_min..=short_max` advances, anything strictly longer than `commit` commits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PressThresholds {
    pub short_min: Duration,
    pub short_max: Duration,
    pub commit: Duration,
}

impl PressThresholds {
    pub fn classify(&self, held: Duration) -> Press {
        if held > self.commit {
            Press::Commit
        } else if held >= self.short_min && held <= self.short_max {
            Press::Short
        } else {
            Press::Ignored
        }
    }
}

/// Accepts a level change only after it has been stable for the debounce window.
#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    window: Duration,
    stable: bool,
    candidate: bool,
    since: Instant,
}

impl Debouncer {
    pub fn new(window: Duration, now: Instant) -> Self {
        Self {
            window,
            stable: false,
            candidate: false,
            since: now,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.stable
    }

    /// Returns the new level and the instant the bounce started on a settled change.
    pub fn update(&mut self, now: Instant, pressed: bool) -> Option<(bool, Instant)> {
        if pressed != self.candidate {
            self.candidate = pressed;
            self.since = now;
        }
        if self.candidate != self.stable && now - self.since >= self.window {
            self.stable = self.candidate;
            return Some((self.stable, self.since));
        }
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// The press that opened the selector is still down.
    AwaitRelease,
    AwaitPress,
    Held { since: Instant },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Idle,
    Active { entered: Instant, phase: Phase },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeEvent {
    None,
    Entered,
    /// Selected preset index after a short press.
    Advanced(usize),
    /// Selector closed with this preset index.
    Committed(usize),
}

#[derive(Debug)]
pub struct ModeConfigurator {
    state: State,
    button: Debouncer,
    press: PressThresholds,
    blink_period: Duration,
}

impl ModeConfigurator {
    pub fn new(config: &Config, now: Instant) -> Self {
        Self {
            state: State::Idle,
            button: Debouncer::new(config.debounce, now),
            press: config.press,
            blink_period: config.blink_period,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, State::Active { .. })
    }

    pub fn poll(&mut self, now: Instant, pressed: bool, presets: &mut Presets) -> ModeEvent {
        let Some((level, at)) = self.button.update(now, pressed) else {
            return ModeEvent::None;
        };

        match (self.state, level) {
            (State::Idle, true) => {
                info!("duration selector opened at {}s", presets.seconds());
                self.state = State::Active {
                    entered: at,
                    phase: Phase::AwaitRelease,
                };
                ModeEvent::Entered
            }
            (State::Idle, false) => ModeEvent::None,
            (State::Active { entered, phase }, level) => {
                let (phase, event) = match (phase, level) {
                    (Phase::AwaitRelease, false) => (Phase::AwaitPress, ModeEvent::None),
                    (Phase::AwaitPress, true) => (Phase::Held { since: at }, ModeEvent::None),
                    (Phase::Held { since }, false) => {
                        let held = at - since;
                        match self.press.classify(held) {
                            Press::Short => {
                                let index = presets.advance();
                                info!("duration preset {} ({}s)", index, presets.seconds());
                                (Phase::AwaitPress, ModeEvent::Advanced(index))
                            }
                            Press::Commit => {
                                self.state = State::Idle;
                                info!("duration selector closed at {}s", presets.seconds());
                                return ModeEvent::Committed(presets.index());
                            }
                            Press::Ignored => (Phase::AwaitPress, ModeEvent::None),
                        }
                    }
                    (phase, _) => (phase, ModeEvent::None),
                };
                self.state = State::Active { entered, phase };
                event
            }
        }
    }

    /// Blink brightness 0..=15, a triangle wave over time spent in the selector.
    pub fn blink_intensity(&self, now: Instant) -> u8 {
        let State::Active { entered, .. } = self.state else {
            return 0;
        };
        triangle(now.saturating_duration_since(entered), self.blink_period)
    }
}

fn triangle(elapsed: Duration, period: Duration) -> u8 {
    let period = period.as_millis().max(2);
    let half = period / 2;
    let phase = elapsed.as_millis() % period;
    let rising = if phase < half { phase } else { period - phase };
    (rising * 15 / half).min(15) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PRESET_SECONDS;

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    fn thresholds() -> PressThresholds {
        Config::default().press
    }

    /// Feeds a debounced press of `held_ms` starting at `start`, returning the event
    /// seen on release and the time after it.
    fn press(
        mode: &mut ModeConfigurator,
        presets: &mut Presets,
        start: u64,
        held_ms: u64,
    ) -> (ModeEvent, u64) {
        let mut events = Vec::new();
        for t in (start..start + held_ms).step_by(10) {
            events.push(mode.poll(at(t), true, presets));
        }
        let release = start + held_ms;
        for t in (release..release + 100).step_by(10) {
            events.push(mode.poll(at(t), false, presets));
        }
        let event = events
            .into_iter()
            .rev()
            .find(|e| *e != ModeEvent::None)
            .unwrap_or(ModeEvent::None);
        (event, release + 100)
    }

    #[test]
    fn short_band_is_inclusive() {
        let t = thresholds();
        assert_eq!(t.classify(t.short_min), Press::Short);
        assert_eq!(t.classify(t.short_max), Press::Short);
        assert_eq!(t.classify(t.short_min - ms(1)), Press::Ignored);
        assert_eq!(t.classify(t.short_max + ms(1)), Press::Ignored);
    }

    #[test]
    fn commit_is_strictly_longer_than_the_threshold() {
        let t = thresholds();
        assert_eq!(t.classify(t.commit), Press::Ignored);
        assert_eq!(t.classify(t.commit + ms(1)), Press::Commit);
    }

    #[test]
    fn presets_wrap_around() {
        let mut presets = Presets::new(&PRESET_SECONDS, 0);
        for _ in 0..presets.len() {
            presets.advance();
        }
        assert_eq!(presets.index(), 0);
        assert_eq!(presets.seconds(), 30);
    }

    #[test]
    fn debouncer_ignores_glitches() {
        let mut b = Debouncer::new(ms(30), at(0));
        assert_eq!(b.update(at(0), true), None);
        assert_eq!(b.update(at(10), false), None);
        assert_eq!(b.update(at(50), false), None);
        assert_eq!(b.update(at(60), true), None);
        assert_eq!(b.update(at(90), true), Some((true, at(60))));
        assert!(b.is_pressed());
    }

    #[test]
    fn selector_round_trip() {
        let config = Config::default();
        let mut presets = Presets::new(&PRESET_SECONDS, 1);
        let mut mode = ModeConfigurator::new(&config, at(0));

        // Opening press: its length does not count.
        let (event, t) = press(&mut mode, &mut presets, 0, 200);
        assert!(mode.is_active());
        assert_eq!(event, ModeEvent::Entered);
        assert_eq!(presets.index(), 1);

        let (event, t) = press(&mut mode, &mut presets, t, 200);
        assert_eq!(event, ModeEvent::Advanced(2));

        // Between the short band and the commit threshold nothing happens.
        let (event, t) = press(&mut mode, &mut presets, t, 1000);
        assert_eq!(event, ModeEvent::None);
        assert!(mode.is_active());

        let (event, _) = press(&mut mode, &mut presets, t, 2000);
        assert_eq!(event, ModeEvent::Committed(2));
        assert!(!mode.is_active());
        assert_eq!(presets.seconds(), 120);
    }

    #[test]
    fn hold_at_commit_threshold_keeps_selector_open() {
        let config = Config::default();
        let mut presets = Presets::new(&PRESET_SECONDS, 0);
        let mut mode = ModeConfigurator::new(&config, at(0));
        let (_, t) = press(&mut mode, &mut presets, 0, 100);
        let (event, _) = press(&mut mode, &mut presets, t, 1500);
        assert_eq!(event, ModeEvent::None);
        assert!(mode.is_active());
    }

    #[test]
    fn blink_is_a_triangle() {
        let period = ms(1000);
        assert_eq!(triangle(ms(0), period), 0);
        assert_eq!(triangle(ms(250), period), 7);
        assert_eq!(triangle(ms(500), period), 15);
        assert_eq!(triangle(ms(750), period), 7);
        assert_eq!(triangle(ms(1000), period), 0);
    }

    #[test]
    fn idle_selector_is_dark() {
        let mode = ModeConfigurator::new(&Config::default(), at(0));
        assert_eq!(mode.blink_intensity(at(500)), 0);
    }
}
