//! Hardware the hourglass talks to.
//!
//! The matrices themselves live in memory as [`Matrices`]; a [`MatrixDisplay`] only has
//! to present them. Everything else is a thin polling interface.

use core::fmt::Debug;

use embassy_time::Duration;
use embedded_hal::digital::InputPin;
use log::warn;

use crate::gravity::RawSample;
use crate::grid::{MatrixId, Matrices};

/// Two-axis tilt source producing samples on the 10-bit analog scale.
pub trait TiltSensor {
    type Error: Debug;

    fn read(&mut self) -> Result<RawSample, Self::Error>;
}

pub trait MatrixDisplay {
    /// Pushes the framebuffer out, in raw coordinates.
    fn show(&mut self, matrices: &Matrices);

    /// Brightness 0..=15.
    fn set_intensity(&mut self, id: MatrixId, level: u8);
}

pub trait Button {
    fn is_pressed(&mut self) -> bool;
}

/// Fire-and-forget tone output.
pub trait Buzzer {
    fn tone(&mut self, frequency_hz: u32, duration: Duration);

    /// Wait between notes of a sweep.
    fn pause(&mut self, duration: Duration);
}

/// Push button wired to ground with a pull-up: LOW means pressed.
pub struct ActiveLowButton<P> {
    pin: P,
}

impl<P: InputPin> ActiveLowButton<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: InputPin> Button for ActiveLowButton<P> {
    fn is_pressed(&mut self) -> bool {
        match self.pin.is_low() {
            Ok(low) => low,
            Err(e) => {
                warn!("button read failed: {:?}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::{ErrorKind, ErrorType};

    struct FakePin {
        low: bool,
    }

    impl ErrorType for FakePin {
        type Error = Infallible;
    }

    impl InputPin for FakePin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.low)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(self.low)
        }
    }

    struct BrokenPin;

    impl ErrorType for BrokenPin {
        type Error = ErrorKind;
    }

    impl InputPin for BrokenPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Err(ErrorKind::Other)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Err(ErrorKind::Other)
        }
    }

    #[test]
    fn low_level_reads_as_pressed() {
        let mut button = ActiveLowButton::new(FakePin { low: true });
        assert!(button.is_pressed());
        let mut pin = button.release();
        pin.low = false;
        assert!(!ActiveLowButton::new(pin).is_pressed());
    }

    #[test]
    fn read_error_reads_as_released() {
        assert!(!ActiveLowButton::new(BrokenPin).is_pressed());
    }
}
