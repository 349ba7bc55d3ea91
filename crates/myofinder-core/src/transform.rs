//! Pan/zoom state and world <-> screen mapping for one surface.
//!
//! The transform is a uniform scale followed by a translation. It never
//! rotates or shears, which keeps the inverse exact and cheap.

use kurbo::{Affine, Point, Size, Vec2};
use tracing::debug;

use crate::consts::{MAX_SCALE, MIN_SCALE, WHEEL_DELTA_FACTOR, ZOOM_EXPONENT};

/// Forward and inverse matrices of a scale + translate transform.
///
/// Both are rebuilt together, so the inverse is always the algebraic inverse
/// of the forward matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    forward: Affine,
    inverse: Affine,
}

impl ViewTransform {
    pub fn new(scale: f64, pan: Vec2) -> Self {
        let inv = 1.0 / scale;
        Self {
            forward: Affine::new([scale, 0.0, 0.0, scale, pan.x, pan.y]),
            inverse: Affine::new([inv, 0.0, 0.0, inv, -pan.x * inv, -pan.y * inv]),
        }
    }

    pub fn identity() -> Self {
        Self {
            forward: Affine::IDENTITY,
            inverse: Affine::IDENTITY,
        }
    }

    pub fn forward(&self) -> Affine {
        self.forward
    }

    pub fn inverse(&self) -> Affine {
        self.inverse
    }

    /// `[a, b, c, d, e, f]` coefficients of the forward matrix.
    pub fn forward_coeffs(&self) -> [f64; 6] {
        self.forward.as_coeffs()
    }

    pub fn inverse_coeffs(&self) -> [f64; 6] {
        self.inverse.as_coeffs()
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        self.forward * world
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        self.inverse * screen
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Snapshot of the viewport: pan offset, scale, matrices and drag tracking.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewportState {
    pub pan: Vec2,
    pub scale: f64,
    pub transform: ViewTransform,
    pub is_dragging: bool,
    /// Cursor position of the last drag event, in client coordinates.
    pub last_cursor: Point,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            scale: 1.0,
            transform: ViewTransform::identity(),
            is_dragging: false,
            last_cursor: Point::ZERO,
        }
    }
}

/// Owns the viewport state of one surface and keeps it clamped to the content.
///
/// No input is validated: NaN or infinite coordinates propagate into the
/// state unchanged.
#[derive(Clone, Debug)]
pub struct TransformEngine {
    state: ViewportState,
    surface: Size,
    content: Size,
}

impl TransformEngine {
    /// Create an engine for `content` shown on `surface`, fitted to view.
    pub fn new(surface: Size, content: Size) -> Self {
        let mut engine = Self {
            state: ViewportState::default(),
            surface,
            content,
        };
        engine.fit_to_view(surface, content);
        engine
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.state.transform
    }

    pub fn scale(&self) -> f64 {
        self.state.scale
    }

    pub fn pan_offset(&self) -> Vec2 {
        self.state.pan
    }

    pub fn surface_size(&self) -> Size {
        self.surface
    }

    pub fn content_size(&self) -> Size {
        self.content
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging
    }

    /// Scale so the whole content fits the surface, then clamp.
    ///
    /// The fit factor is not bounded by the wheel zoom limits.
    pub fn fit_to_view(&mut self, surface: Size, content: Size) {
        self.surface = surface;
        self.content = content;
        let fit_x = surface.width / content.width;
        let fit_y = surface.height / content.height;
        self.state.scale = fit_x.min(fit_y);
        self.update_matrices();
        self.clamp_pan(surface, content);
    }

    /// Shift the view by a screen-space delta.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.state.pan += Vec2::new(dx, dy);
        self.update_matrices();
        self.clamp();
    }

    /// Zoom around `cursor` (surface coordinates) by a wheel delta.
    ///
    /// Negative deltas zoom in. The world point under the cursor stays put
    /// unless clamping has to move the view afterwards.
    pub fn zoom_at(&mut self, cursor: Point, wheel_delta: f64) {
        let zoom_delta = -wheel_delta * WHEEL_DELTA_FACTOR;
        let multiplier = (zoom_delta * ZOOM_EXPONENT).exp();
        let new_scale = (self.state.scale * multiplier).clamp(MIN_SCALE, MAX_SCALE);

        let factor = new_scale / self.state.scale;
        let pan = self.state.pan;
        self.state.pan = Vec2::new(
            cursor.x - (cursor.x - pan.x) * factor,
            cursor.y - (cursor.y - pan.y) * factor,
        );
        self.state.scale = new_scale;

        self.update_matrices();
        self.clamp();
        debug!(scale = self.state.scale, pan = ?self.state.pan, "Zoomed");
    }

    /// Set scale and pan directly (e.g. when restoring a view), then clamp.
    pub fn set_view(&mut self, scale: f64, pan: Vec2) {
        self.state.scale = scale;
        self.state.pan = pan;
        self.update_matrices();
        self.clamp();
    }

    /// Keep the scaled content on the surface.
    ///
    /// On each axis the pan is clamped to `[min(0, s - scaled), max(0, s - scaled)]`;
    /// if the scaled content is smaller than the surface on that axis it is
    /// centered instead.
    pub fn clamp_pan(&mut self, surface: Size, content: Size) {
        let scaled = content * self.state.scale;
        let pan = &mut self.state.pan;

        pan.x = clamp_axis(pan.x, surface.width, scaled.width);
        pan.y = clamp_axis(pan.y, surface.height, scaled.height);

        self.update_matrices();
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        self.state.transform.world_to_screen(world)
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        self.state.transform.screen_to_world(screen)
    }

    /// Start a drag-pan at `cursor` (client coordinates).
    pub fn begin_drag(&mut self, cursor: Point) {
        self.state.is_dragging = true;
        self.state.last_cursor = cursor;
    }

    /// Pan by the cursor movement since the last drag event.
    ///
    /// Returns `false` without touching the view when no drag is in progress.
    pub fn drag_to(&mut self, cursor: Point) -> bool {
        if !self.state.is_dragging {
            return false;
        }
        let delta = cursor - self.state.last_cursor;
        self.state.last_cursor = cursor;
        self.pan(delta.x, delta.y);
        true
    }

    pub fn end_drag(&mut self) {
        self.state.is_dragging = false;
    }

    fn clamp(&mut self) {
        let (surface, content) = (self.surface, self.content);
        self.clamp_pan(surface, content);
    }

    fn update_matrices(&mut self) {
        self.state.transform = ViewTransform::new(self.state.scale, self.state.pan);
    }
}

fn clamp_axis(pan: f64, surface_extent: f64, scaled_extent: f64) -> f64 {
    if scaled_extent < surface_extent {
        return (surface_extent - scaled_extent) / 2.0;
    }
    let slack = surface_extent - scaled_extent;
    let max_pan = slack.max(0.0);
    let min_pan = slack.min(0.0);
    pan.min(max_pan).max(min_pan)
}
