//! Falling sand hourglass for two 8x8 LED matrices.
//!
//! The hourglass is a single [`Hourglass`] context driven once per frame. Each frame
//! resolves gravity from the tilt sensor, rotates the view, relaxes the sand on both
//! matrices, lets at most one grain through the neck and decides whether the alarm
//! should sound. A short button press opens the duration selector.
//!
//! Hardware sits behind the traits in [`hal`], so the same core runs on the firmware
//! and in host tests.

#![cfg_attr(not(test), no_std)]

pub mod alarm;
pub mod automaton;
pub mod config;
pub mod coupler;
pub mod error;
pub mod glyph;
pub mod gravity;
pub mod grid;
pub mod hal;
pub mod hourglass;
pub mod mode;
pub mod orientation;
pub mod panels;
pub mod qmi8658;

pub use config::{Config, GRAIN_COUNT, GRID_SIZE};
pub use error::ConfigError;
pub use gravity::{Gravity, RawSample, Thresholds};
pub use grid::{Coord, Grid, MatrixId, Matrices, Rotation};
pub use hourglass::{FrameReport, Hourglass, Tick};
pub use mode::{ModeEvent, Press, Presets};
