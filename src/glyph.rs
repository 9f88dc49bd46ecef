//! Digits for the duration selector.
//!
//! 5x7 glyphs centred on an 8x8 matrix, one character per matrix.

use crate::config::GRID_SIZE;
use crate::grid::{Coord, MatrixId, Matrices};

pub type Bitmap = [u8; GRID_SIZE];

const DIGITS_5X7: [[u8; 7]; 10] = [
    [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
    [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
    [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110],
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
    [0b11111, 0b10000, 0b10000, 0b11110, 0b00001, 0b00001, 0b11110],
    [0b01110, 0b10000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00001, 0b01110],
];

/// Prime mark shown next to a single-digit minute count.
pub const MINUTE_MARK: Bitmap = [
    0b0001_1000,
    0b0001_1000,
    0b0000_1000,
    0b0000_0100,
    0,
    0,
    0,
    0,
];

/// Glyph rows are MSB-left; bitmaps are bit `x` = column `x`.
fn place(glyph: &[u8; 7]) -> Bitmap {
    let mut out = [0; GRID_SIZE];
    for (y, row) in glyph.iter().enumerate() {
        for col in 0..5 {
            if row & (1 << (4 - col)) != 0 {
                out[y] |= 1 << (col + 1);
            }
        }
    }
    out
}

pub fn digit(d: u32) -> Bitmap {
    place(&DIGITS_5X7[(d % 10) as usize])
}

/// Sets the bottom-right pixel, marking a two-digit minute count.
pub fn with_minute_dot(mut bitmap: Bitmap) -> Bitmap {
    bitmap[GRID_SIZE - 1] |= 1 << (GRID_SIZE - 1);
    bitmap
}

/// Bitmaps for matrices A and B showing a run duration.
///
/// Under 100 s the seconds are spelled out. Longer runs show whole minutes: one digit
/// plus the minute mark, or two digits with a dot in the corner of the second.
pub fn duration_label(seconds: u32) -> [Bitmap; 2] {
    if seconds < 100 {
        return [digit(seconds / 10), digit(seconds % 10)];
    }
    let minutes = (seconds / 60).min(99);
    if minutes < 10 {
        [digit(minutes), MINUTE_MARK]
    } else {
        [digit(minutes / 10), with_minute_dot(digit(minutes % 10))]
    }
}

/// Draws the label in canonical coordinates, replacing whatever was shown.
pub fn paint(m: &mut Matrices, label: &[Bitmap; 2]) {
    for id in MatrixId::ALL {
        let bitmap = &label[id.index()];
        for y in 0..GRID_SIZE as u8 {
            for x in 0..GRID_SIZE as u8 {
                let on = bitmap[y as usize] & (1 << x) != 0;
                m.set(id, Coord::new(x, y), on);
            }
        }
    }
}
