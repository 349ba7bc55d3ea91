//! Conversions between `image` buffers, kurbo geometry and vello_cpu types.

use std::sync::Arc;

use image::{Rgba, RgbaImage};
use kurbo::{Affine, Point};

use crate::error::{MyofinderError, Result};

/// A decoded raster prepared once as a premultiplied vello_cpu image paint.
#[derive(Clone)]
pub struct RasterPaint {
    paint: vello_cpu::Image,
    width: u16,
    height: u16,
}

impl RasterPaint {
    /// Fails for empty rasters and rasters wider or taller than `u16::MAX`.
    pub fn from_rgba(raster: &RgbaImage) -> Result<Self> {
        let (width, height) = raster.dimensions();
        let (w, h) = pixmap_size(width, height)?;

        let pixels = raster
            .pixels()
            .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array(premul_rgba8(px.0)))
            .collect::<Vec<_>>();
        let opaque = raster.pixels().all(|px| px[3] == 255);
        let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, !opaque);

        Ok(Self {
            paint: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
            width: w,
            height: h,
        })
    }

    pub fn paint(&self) -> vello_cpu::Image {
        self.paint.clone()
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }
}

impl std::fmt::Debug for RasterPaint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterPaint")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Validate a buffer size for vello_cpu, which addresses pixels with `u16`.
pub fn pixmap_size(width: u32, height: u32) -> Result<(u16, u16)> {
    let invalid = || MyofinderError::InvalidDimensions { width, height };
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    let w = u16::try_from(width).map_err(|_| invalid())?;
    let h = u16::try_from(height).map_err(|_| invalid())?;
    Ok((w, h))
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

pub(crate) fn color_to_cpu(c: Rgba<u8>) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = c.0;
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

/// Closed polygon through `points`, or `None` when there is no area to draw.
pub(crate) fn polygon_to_cpu(points: &[Point]) -> Option<vello_cpu::kurbo::BezPath> {
    if points.len() < 3 {
        return None;
    }
    let mut path = vello_cpu::kurbo::BezPath::new();
    path.move_to(point_to_cpu(points[0]));
    for &p in &points[1..] {
        path.line_to(point_to_cpu(p));
    }
    path.close_path();
    Some(path)
}

pub(crate) fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

/// Copy a premultiplied pixmap into a straight-alpha frame of the same size.
pub(crate) fn unpremultiply_into(pixmap: &vello_cpu::Pixmap, frame: &mut RgbaImage) {
    let dst: &mut [u8] = &mut *frame;
    for (d, s) in dst
        .chunks_exact_mut(4)
        .zip(pixmap.data_as_u8_slice().chunks_exact(4))
    {
        let a = u16::from(s[3]);
        if a == 0 {
            d.fill(0);
            continue;
        }
        for c in 0..3 {
            d[c] = ((u16::from(s[c]) * 255 + a / 2) / a).min(255) as u8;
        }
        d[3] = s[3];
    }
}

/// Source-over of premultiplied `src` onto premultiplied `dst`.
pub(crate) fn premul_over_in_place(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = u16::from(s[3]);
        if sa == 0 {
            continue;
        }
        let inv = 255 - sa;
        d[3] = add_sat_u8(s[3], mul_div255_u8(u16::from(d[3]), inv));
        for c in 0..3 {
            d[c] = add_sat_u8(s[c], mul_div255_u8(u16::from(d[c]), inv));
        }
    }
}

fn premul_rgba8(rgba: [u8; 4]) -> [u8; 4] {
    let [r, g, b, a] = rgba;
    let a16 = u16::from(a);
    let premul = |c: u8| -> u8 { ((u16::from(c) * a16 + 127) / 255) as u8 };
    [premul(r), premul(g), premul(b), a]
}

fn mul_div255_u8(v: u16, f: u16) -> u8 {
    ((v * f + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}
