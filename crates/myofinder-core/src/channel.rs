use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::render::PixelRect;

/// Per-surface suppression of the red, green and blue channels of the base image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelMask {
    red_removed: bool,
    green_removed: bool,
    blue_removed: bool,
}

impl ChannelMask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable each channel.
    pub fn set_channels(&mut self, red: bool, green: bool, blue: bool) {
        self.red_removed = !red;
        self.green_removed = !green;
        self.blue_removed = !blue;
    }

    /// `(red, green, blue)` enabled flags.
    pub fn enabled(&self) -> (bool, bool, bool) {
        (!self.red_removed, !self.green_removed, !self.blue_removed)
    }

    /// True when every channel is enabled and [`apply`](Self::apply) is a no-op.
    pub fn is_passthrough(&self) -> bool {
        !(self.red_removed || self.green_removed || self.blue_removed)
    }

    /// Zero the disabled channels of every RGBA8 pixel in `pixels`. Alpha is left alone.
    pub fn apply(&self, pixels: &mut [u8]) {
        if self.is_passthrough() {
            return;
        }
        if pixels.len() / 4 >= PARALLEL_PIXEL_THRESHOLD {
            pixels
                .par_chunks_mut(4 * 1024)
                .for_each(|chunk| self.apply_sequential(chunk));
        } else {
            self.apply_sequential(pixels);
        }
    }

    /// Apply the mask inside `region` of an RGBA8 buffer that is `row_width`
    /// pixels wide. Works on straight and premultiplied pixels alike.
    pub fn apply_region(&self, pixels: &mut [u8], row_width: u32, region: PixelRect) {
        if self.is_passthrough() || region.is_empty() {
            return;
        }
        let stride = row_width as usize * 4;
        let x0 = region.x as usize * 4;
        let x1 = x0 + region.width as usize * 4;
        let y0 = region.y as usize * stride;
        let y1 = (y0 + region.height as usize * stride).min(pixels.len());
        if x1 > stride || y0 >= y1 {
            return;
        }

        let rows = &mut pixels[y0..y1];

        if region.area() >= PARALLEL_PIXEL_THRESHOLD {
            rows.par_chunks_mut(stride)
                .for_each(|row| self.apply_sequential(&mut row[x0..x1]));
        } else {
            for row in rows.chunks_mut(stride) {
                self.apply_sequential(&mut row[x0..x1]);
            }
        }
    }

    fn apply_sequential(&self, pixels: &mut [u8]) {
        for px in pixels.chunks_exact_mut(4) {
            if self.red_removed {
                px[0] = 0;
            }
            if self.green_removed {
                px[1] = 0;
            }
            if self.blue_removed {
                px[2] = 0;
            }
        }
    }
}
