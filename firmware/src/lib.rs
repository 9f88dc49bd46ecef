//! Board glue for the Waveshare ESP32-S3 Matrix with a second 8x8 panel chained on.

#![no_std]

use embassy_time::{Duration, Instant};
use esp_hal::delay::Delay;
use esp_hal::gpio::Output;
use sand_hourglass::hal::Buzzer;
use sand_hourglass::panels::LED_COUNT;

// Buffer Size: 128 LEDs * 24 bits (R,G,B) + 1 Stop Code
pub const BUFFER_SIZE: usize = LED_COUNT * 24 + 1;

/// Passive piezo on a plain GPIO, driven with a busy-wait square wave.
pub struct PinBuzzer<'d> {
    pin: Output<'d>,
    delay: Delay,
}

impl<'d> PinBuzzer<'d> {
    pub fn new(pin: Output<'d>) -> Self {
        Self {
            pin,
            delay: Delay::new(),
        }
    }
}

impl Buzzer for PinBuzzer<'_> {
    fn tone(&mut self, frequency_hz: u32, duration: Duration) {
        if frequency_hz == 0 {
            self.pause(duration);
            return;
        }
        let half_period_us = 500_000 / frequency_hz;
        let cycles = duration.as_micros() * u64::from(frequency_hz) / 1_000_000;
        for _ in 0..cycles {
            self.pin.set_high();
            self.delay.delay_micros(half_period_us);
            self.pin.set_low();
            self.delay.delay_micros(half_period_us);
        }
    }

    fn pause(&mut self, duration: Duration) {
        self.delay.delay_millis(duration.as_millis() as u32);
    }
}

/// Mixes accelerometer noise with the boot time into an RNG seed.
pub fn seed_from_noise(samples: impl IntoIterator<Item = (i16, i16)>, now: Instant) -> u64 {
    samples
        .into_iter()
        .fold(now.as_ticks() ^ 0x9E37_79B9_7F4A_7C15, |seed, (x, y)| {
            let word = (u64::from(x as u16) << 16) | u64::from(y as u16);
            (seed ^ word).rotate_left(23).wrapping_mul(0xBF58_476D_1CE4_E5B9)
        })
}
