use image::Rgba;

/// Smallest zoom factor reachable with the mouse wheel.
pub const MIN_SCALE: f64 = 0.1;

/// Largest zoom factor reachable with the mouse wheel.
pub const MAX_SCALE: f64 = 5.0;

/// Wheel delta to zoom-delta conversion (zoom_delta = -wheel_delta * factor).
pub const WHEEL_DELTA_FACTOR: f64 = 0.01;

/// Exponent applied to the zoom delta for smooth, multiplicative zooming.
pub const ZOOM_EXPONENT: f64 = 0.05;

/// Radius of a nucleus marker in world (image pixel) units.
pub const NUCLEUS_RADIUS: f64 = 5.0;

/// Fill color of nuclei classified as inside a fiber.
pub const NUCLEUS_INSIDE_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Fill color of nuclei classified as outside a fiber.
pub const NUCLEUS_OUTSIDE_COLOR: Rgba<u8> = Rgba([250, 218, 94, 255]);

/// Translucent pink fill of fiber polygons (alpha 0.5).
pub const FIBER_FILL_COLOR: Rgba<u8> = Rgba([255, 182, 193, 128]);

/// Magenta outline of fiber polygons.
pub const FIBER_STROKE_COLOR: Rgba<u8> = Rgba([255, 0, 255, 255]);

/// Fiber outline width in screen pixels.
pub const FIBER_STROKE_WIDTH: f64 = 1.0;

/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Default surface width when no config is given.
pub const DEFAULT_SURFACE_WIDTH: u32 = 1280;

/// Default surface height when no config is given.
pub const DEFAULT_SURFACE_HEIGHT: u32 = 800;

/// Label shown instead of a ratio that is zero or undefined.
pub const RATIO_UNAVAILABLE_LABEL: &str = "NA";
