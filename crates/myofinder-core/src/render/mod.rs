pub mod pixmap;

use image::{Rgba, RgbaImage};
use kurbo::{Affine, Rect};
use tracing::trace;
use vello_cpu::kurbo::Shape;

use crate::channel::ChannelMask;
use crate::consts::{
    FIBER_FILL_COLOR, FIBER_STROKE_COLOR, FIBER_STROKE_WIDTH, NUCLEUS_INSIDE_COLOR,
    NUCLEUS_OUTSIDE_COLOR, NUCLEUS_RADIUS,
};
use crate::error::Result;
use crate::markers::{Classification, MarkerStore};
use crate::transform::ViewTransform;

use pixmap::{
    affine_to_cpu, clear_pixmap, color_to_cpu, pixmap_size, point_to_cpu, polygon_to_cpu,
    premul_over_in_place, unpremultiply_into,
};

pub use pixmap::RasterPaint;

/// Axis-aligned rectangle of whole device pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Every pixel `rect` touches, clipped to a `width` x `height` buffer.
    pub fn touched_by(rect: Rect, width: u32, height: u32) -> Self {
        let x0 = clamp_edge(rect.x0.floor(), width);
        let y0 = clamp_edge(rect.y0.floor(), height);
        let x1 = clamp_edge(rect.x1.ceil(), width);
        let y1 = clamp_edge(rect.y1.ceil(), height);
        Self {
            x: x0,
            y: y0,
            width: x1.saturating_sub(x0),
            height: y1.saturating_sub(y0),
        }
    }
}

fn clamp_edge(v: f64, limit: u32) -> u32 {
    if v.is_nan() || v <= 0.0 {
        0
    } else if v >= f64::from(limit) {
        limit
    } else {
        v as u32
    }
}

/// Which marker layers are drawn on top of the base image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerVisibility {
    pub nuclei: bool,
    pub fibers: bool,
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self {
            nuclei: true,
            fibers: true,
        }
    }
}

impl LayerVisibility {
    fn any(&self) -> bool {
        self.nuclei || self.fibers
    }
}

/// Fill color of a nucleus marker.
pub fn nucleus_color(classification: Classification) -> Rgba<u8> {
    match classification {
        Classification::Inside => NUCLEUS_INSIDE_COLOR,
        Classification::Outside => NUCLEUS_OUTSIDE_COLOR,
    }
}

/// Everything one frame is drawn from.
pub struct FrameInputs<'a> {
    pub raster: &'a RasterPaint,
    pub view: &'a ViewTransform,
    pub mask: &'a ChannelMask,
    pub markers: &'a MarkerStore,
}

/// Draws one surface: base image, channel mask, nuclei, fibers.
///
/// The base image and the marker layers are rasterized into separate
/// pixmaps so the channel mask only ever sees image pixels.
pub struct ViewportRenderer {
    ctx: vello_cpu::RenderContext,
    base: vello_cpu::Pixmap,
    overlay: vello_cpu::Pixmap,
    frame: RgbaImage,
    visibility: LayerVisibility,
    frames_rendered: u64,
}

impl ViewportRenderer {
    /// A blank `width` x `height` renderer. Sizes must be non-zero and fit in `u16`.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let (w, h) = pixmap_size(width, height)?;
        Ok(Self {
            ctx: vello_cpu::RenderContext::new(w, h),
            base: vello_cpu::Pixmap::new(w, h),
            overlay: vello_cpu::Pixmap::new(w, h),
            frame: RgbaImage::new(width, height),
            visibility: LayerVisibility::default(),
            frames_rendered: 0,
        })
    }

    pub fn visibility(&self) -> LayerVisibility {
        self.visibility
    }

    pub fn show_nuclei(&mut self, show: bool) {
        self.visibility.nuclei = show;
    }

    pub fn show_fibers(&mut self, show: bool) {
        self.visibility.fibers = show;
    }

    /// The last rendered frame.
    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Blank the surface.
    pub fn clear(&mut self) {
        let buf: &mut [u8] = &mut self.frame;
        buf.fill(0);
    }

    /// Render one frame. The draw order is fixed; marker layers can only be
    /// skipped through the visibility flags.
    pub fn render(&mut self, inputs: FrameInputs<'_>) {
        let forward = inputs.view.forward();

        let drawn = self.draw_base(inputs.raster, forward);
        let width = self.frame.width();
        inputs
            .mask
            .apply_region(self.base.data_as_u8_slice_mut(), width, drawn);

        if self.visibility.any() {
            self.draw_markers(inputs.markers, forward);
            premul_over_in_place(
                self.base.data_as_u8_slice_mut(),
                self.overlay.data_as_u8_slice(),
            );
        }

        unpremultiply_into(&self.base, &mut self.frame);
        self.frames_rendered += 1;
        trace!(frame = self.frames_rendered, ?drawn, "Frame rendered");
    }

    /// Draw the raster under `forward` into the base pixmap and return the
    /// device pixels it can have touched.
    fn draw_base(&mut self, raster: &RasterPaint, forward: Affine) -> PixelRect {
        let (w, h) = (f64::from(raster.width()), f64::from(raster.height()));
        let ctx = &mut self.ctx;
        ctx.reset();
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(forward));
        ctx.set_paint(raster.paint());
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
        ctx.flush();

        clear_pixmap(&mut self.base);
        ctx.render_to_pixmap(&mut self.base);

        let bounds = forward.transform_rect_bbox(Rect::new(0.0, 0.0, w, h));
        PixelRect::touched_by(bounds, self.frame.width(), self.frame.height())
    }

    /// Nuclei first, then fibers, into the overlay pixmap.
    fn draw_markers(&mut self, markers: &MarkerStore, forward: Affine) {
        let ctx = &mut self.ctx;
        ctx.reset();
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        if self.visibility.nuclei {
            ctx.set_transform(affine_to_cpu(forward));
            for nucleus in &markers.nuclei {
                let circle =
                    vello_cpu::kurbo::Circle::new(point_to_cpu(nucleus.position()), NUCLEUS_RADIUS);
                ctx.set_paint(color_to_cpu(nucleus_color(nucleus.classification())));
                ctx.fill_path(&circle.to_path(0.1));
            }
        }

        if self.visibility.fibers {
            let device = affine_to_cpu(forward);
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(FIBER_STROKE_WIDTH));
            for fiber in &markers.fibers {
                let Some(path) = polygon_to_cpu(fiber.path()) else {
                    continue;
                };
                ctx.set_transform(device);
                ctx.set_paint(color_to_cpu(FIBER_FILL_COLOR));
                ctx.fill_path(&path);

                // Outline width is in screen pixels, so stroke the mapped path.
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(color_to_cpu(FIBER_STROKE_COLOR));
                ctx.stroke_path(&(device * path));
            }
        }

        ctx.flush();
        clear_pixmap(&mut self.overlay);
        ctx.render_to_pixmap(&mut self.overlay);
    }
}
