#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use image::{Rgba, RgbaImage};
use myofinder_core::config::SurfaceConfig;
use myofinder_core::ids::SurfaceId;
use myofinder_core::notify::MarkerSnapshot;
use myofinder_core::surface::Surface;

/// Base color used by the synthetic images.
pub const BASE: Rgba<u8> = Rgba([10, 20, 30, 255]);

pub fn solid_image(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width, height, color)
}

/// Image whose red channel encodes x and green channel encodes y.
pub fn coordinate_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 100, 255]))
}

pub fn viewport(width: u32, height: u32) -> SurfaceConfig {
    SurfaceConfig { width, height }
}

/// A surface over a solid `BASE` image of the given size.
pub fn solid_surface(image: (u32, u32), frame: (u32, u32)) -> Surface {
    Surface::new(
        SurfaceId(0),
        "test.png",
        solid_image(image.0, image.1, BASE),
        viewport(frame.0, frame.1),
    )
    .unwrap()
}

/// Save `image` as a PNG named `name` inside `dir`.
pub fn write_png(dir: &Path, name: &str, image: &RgbaImage) -> PathBuf {
    let path = dir.join(name);
    image.save(&path).expect("write test png");
    path
}

/// Collect every snapshot delivered to a closure observer.
pub fn recorder() -> (
    Rc<RefCell<Vec<MarkerSnapshot>>>,
    impl FnMut(&MarkerSnapshot) + 'static,
) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    (seen, move |s: &MarkerSnapshot| sink.borrow_mut().push(*s))
}
