use embedded_hal::i2c::I2c;

use crate::gravity::RawSample;
use crate::hal::TiltSensor;

pub const QMI8658_ADDRESS_LOW: u8 = 0x6A;
pub const QMI8658_ADDRESS_HIGH: u8 = 0x6B;

const REG_WHO_AM_I: u8 = 0x00;
const REG_CTRL1: u8 = 0x02;
const REG_CTRL2: u8 = 0x03;
const REG_CTRL7: u8 = 0x08;

const REG_ACC_X_L: u8 = 0x35;

const WHO_AM_I_EXPECTED: u8 = 0x05;

// Tilt only needs +-1g, so use the finest range.
const ACCEL_RANGE_2G: u8 = 0x00;
// Low-power 21Hz, comfortably above the 10Hz frame rate.
const ACCEL_ODR_LOWPOWER_21HZ: u8 = 0x0D;
const ACCEL_LSB_PER_G_2G: i32 = 16384;

// The hourglass thresholds are tuned for an analog ADXL335 on a 10-bit ADC:
// 330 counts at 0g and 70 counts per g.
const ANALOG_ZERO_G: i32 = 330;
const ANALOG_COUNTS_PER_G: i32 = 70;
const ANALOG_MAX: i32 = 1023;

#[derive(Debug)]
pub enum Error<E> {
    I2c(E),
    InvalidWhoAmI(u8),
}

impl<E> From<E> for Error<E> {
    fn from(value: E) -> Self {
        Self::I2c(value)
    }
}

/// How the sensor's axes sit relative to the matrices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AxisMapping {
    pub swap_xy: bool,
    pub invert_x: bool,
    pub invert_y: bool,
}

pub struct Qmi8658<I> {
    i2c: I,
    addr: u8,
    axes: AxisMapping,
}

impl<I, E> Qmi8658<I>
where
    I: I2c<Error = E>,
{
    // ESP32 S3 Matrix board from waveshare uses the high address 0x6B
    pub fn new(i2c: I) -> Self {
        Self::new_with_addr(i2c, QMI8658_ADDRESS_HIGH)
    }

    // Just in case if needed for another board.
    pub fn new_with_addr(i2c: I, addr: u8) -> Self {
        Self {
            i2c,
            addr,
            axes: AxisMapping::default(),
        }
    }

    pub fn with_axes(mut self, axes: AxisMapping) -> Self {
        self.axes = axes;
        self
    }

    pub fn release(self) -> I {
        self.i2c
    }

    pub fn init(&mut self) -> Result<(), Error<E>> {
        // Sanity-check the sensor is responding at this address.
        let who = self.read_who_am_i()?;
        if who != WHO_AM_I_EXPECTED {
            return Err(Error::InvalidWhoAmI(who));
        }

        // Address auto-increment, required for the burst read below.
        self.i2c.write(self.addr, &[REG_CTRL1, 0x60])?;

        let ctrl2 = (ACCEL_RANGE_2G << 4) | ACCEL_ODR_LOWPOWER_21HZ;
        self.i2c.write(self.addr, &[REG_CTRL2, ctrl2])?;

        // Enable accel only (CTRL7 bit0).
        self.i2c.write(self.addr, &[REG_CTRL7, 0x01])?;

        Ok(())
    }

    pub fn read_who_am_i(&mut self) -> Result<u8, Error<E>> {
        let mut data = [0u8; 1];
        self.i2c.write_read(self.addr, &[REG_WHO_AM_I], &mut data)?;
        Ok(data[0])
    }

    /// Raw X and Y readings, little-endian register pairs.
    pub fn read_accel_xy(&mut self) -> Result<(i16, i16), Error<E>> {
        let mut data = [0u8; 4];
        self.i2c.write_read(self.addr, &[REG_ACC_X_L], &mut data)?;
        Ok((
            i16::from_le_bytes([data[0], data[1]]),
            i16::from_le_bytes([data[2], data[3]]),
        ))
    }

    /// Reading on the analog accelerometer's scale, after axis mapping.
    pub fn read_sample(&mut self) -> Result<RawSample, Error<E>> {
        let (raw_x, raw_y) = self.read_accel_xy()?;
        let (mut x, mut y) = if self.axes.swap_xy {
            (raw_y, raw_x)
        } else {
            (raw_x, raw_y)
        };
        if self.axes.invert_x {
            x = x.saturating_neg();
        }
        if self.axes.invert_y {
            y = y.saturating_neg();
        }
        Ok(RawSample::new(to_analog(x), to_analog(y)))
    }
}

fn to_analog(raw: i16) -> i32 {
    let counts = ANALOG_ZERO_G + i32::from(raw) * ANALOG_COUNTS_PER_G / ACCEL_LSB_PER_G_2G;
    counts.clamp(0, ANALOG_MAX)
}

impl<I, E> TiltSensor for Qmi8658<I>
where
    I: I2c<Error = E>,
    E: core::fmt::Debug,
{
    type Error = Error<E>;

    fn read(&mut self) -> Result<RawSample, Self::Error> {
        self.read_sample()
    }
}
