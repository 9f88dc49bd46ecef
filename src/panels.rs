//! Two WS2812 panels chained on one data line.

use core::fmt::Debug;

use log::warn;
use smart_leds::{SmartLedsWrite, RGB8};

use crate::config::GRID_SIZE;
use crate::grid::{MatrixId, Matrices};
use crate::hal::MatrixDisplay;

pub const PANEL_LEDS: usize = GRID_SIZE * GRID_SIZE;
pub const LED_COUNT: usize = 2 * PANEL_LEDS;

const COLOR_BG: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

/// Matrix A first, then B, each row-major in raw coordinates.
pub struct LedPanels<S> {
    strip: S,
    color: RGB8,
    intensity: [u8; 2],
}

impl<S> LedPanels<S>
where
    S: SmartLedsWrite,
    S::Color: From<RGB8>,
{
    /// `color` is the grain colour at full intensity.
    pub fn new(strip: S, color: RGB8) -> Self {
        Self {
            strip,
            color,
            intensity: [15; 2],
        }
    }

    pub fn strip(&self) -> &S {
        &self.strip
    }
}

// The panels have no dimming register, so 0..=15 scales the colour. Level 0 stays
// faintly lit.
fn scale(color: RGB8, level: u8) -> RGB8 {
    let level = u16::from(level.min(15)) + 1;
    let channel = |c: u8| (u16::from(c) * level / 16) as u8;
    RGB8 {
        r: channel(color.r),
        g: channel(color.g),
        b: channel(color.b),
    }
}

impl<S> MatrixDisplay for LedPanels<S>
where
    S: SmartLedsWrite,
    S::Color: From<RGB8>,
    S::Error: Debug,
{
    fn show(&mut self, matrices: &Matrices) {
        let mut pixels = [COLOR_BG; LED_COUNT];
        for id in MatrixId::ALL {
            let lit = scale(self.color, self.intensity[id.index()]);
            let panel = &mut pixels[id.index() * PANEL_LEDS..][..PANEL_LEDS];
            for (y, row) in matrices.grid(id).rows().iter().enumerate() {
                for x in 0..GRID_SIZE {
                    if row & (1 << x) != 0 {
                        panel[y * GRID_SIZE + x] = lit;
                    }
                }
            }
        }
        // A dropped frame is redrawn by the next one.
        if let Err(e) = self.strip.write(pixels.iter().copied()) {
            warn!("LED write failed: {:?}", e);
        }
    }

    fn set_intensity(&mut self, id: MatrixId, level: u8) {
        self.intensity[id.index()] = level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Coord;

    #[derive(Debug)]
    struct Busy;

    /// Keeps every frame it accepts and refuses the first `fail` writes.
    #[derive(Default)]
    struct Strip {
        fail: usize,
        attempts: usize,
        frames: Vec<Vec<RGB8>>,
    }

    impl SmartLedsWrite for Strip {
        type Error = Busy;
        type Color = RGB8;

        fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
        where
            T: IntoIterator<Item = I>,
            I: Into<Self::Color>,
        {
            self.attempts += 1;
            if self.attempts <= self.fail {
                return Err(Busy);
            }
            self.frames.push(iterator.into_iter().map(Into::into).collect());
            Ok(())
        }
    }

    const SAND: RGB8 = RGB8 { r: 160, g: 96, b: 0 };

    #[test]
    fn lit_cells_land_on_their_panel() {
        let mut m = Matrices::new();
        m.grid_mut(MatrixId::A).set(Coord::new(2, 1), true);
        m.grid_mut(MatrixId::B).set(Coord::new(7, 7), true);
        let mut panels = LedPanels::new(Strip::default(), SAND);
        panels.show(&m);

        let frame = &panels.strip().frames[0];
        assert_eq!(frame.len(), LED_COUNT);
        assert_eq!(frame[GRID_SIZE + 2], SAND);
        assert_eq!(frame[PANEL_LEDS + PANEL_LEDS - 1], SAND);
        assert_eq!(frame.iter().filter(|&&p| p != COLOR_BG).count(), 2);
    }

    #[test]
    fn intensity_scales_each_panel() {
        let mut m = Matrices::new();
        m.grid_mut(MatrixId::A).set(Coord::new(0, 0), true);
        m.grid_mut(MatrixId::B).set(Coord::new(0, 0), true);
        let mut panels = LedPanels::new(Strip::default(), SAND);
        panels.set_intensity(MatrixId::A, 7);
        panels.set_intensity(MatrixId::B, 0);
        panels.show(&m);

        let frame = &panels.strip().frames[0];
        assert_eq!(frame[0], RGB8 { r: 80, g: 48, b: 0 });
        assert_eq!(frame[PANEL_LEDS], RGB8 { r: 10, g: 6, b: 0 });
    }

    #[test]
    fn failed_write_is_skipped_and_the_next_frame_goes_out() {
        let mut m = Matrices::new();
        m.grid_mut(MatrixId::A).set(Coord::new(3, 3), true);
        let strip = Strip {
            fail: 1,
            ..Strip::default()
        };
        let mut panels = LedPanels::new(strip, SAND);
        panels.show(&m);
        assert!(panels.strip().frames.is_empty());

        panels.show(&m);
        assert_eq!(panels.strip().attempts, 2);
        assert_eq!(panels.strip().frames.len(), 1);
        assert_eq!(panels.strip().frames[0][3 * GRID_SIZE + 3], SAND);
    }
}
