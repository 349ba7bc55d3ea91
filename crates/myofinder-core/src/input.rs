use kurbo::{Point, Size};

/// Mouse button, numbered as pointer events number them (0 primary, 1 middle, 2 secondary).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    Primary,
    Middle,
    Secondary,
    Other(u8),
}

impl From<u8> for MouseButton {
    fn from(code: u8) -> Self {
        match code {
            0 => MouseButton::Primary,
            1 => MouseButton::Middle,
            2 => MouseButton::Secondary,
            other => MouseButton::Other(other),
        }
    }
}

/// On-screen rectangle of a surface, in client (CSS-pixel) coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClientRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ClientRect {
    /// A rect at the client origin whose size matches the surface's backing size.
    pub fn unscaled(size: Size) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: size.width,
            height: size.height,
        }
    }

    /// Cursor relative to the rect's top-left corner.
    pub fn relative(&self, client: Point) -> Point {
        Point::new(client.x - self.left, client.y - self.top)
    }

    /// Cursor in backing-store pixels, correcting for a displayed size that
    /// differs from the backing size (device pixel ratio, CSS scaling).
    pub fn to_backing(&self, client: Point, backing: Size) -> Point {
        let rel = self.relative(client);
        Point::new(
            rel.x * (backing.width / self.width),
            rel.y * (backing.height / self.height),
        )
    }
}

/// Raw input routed to the active surface. Positions are client coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown { button: MouseButton, client: Point },
    PointerMove { client: Point },
    PointerUp,
    PointerLeave,
    Wheel { client: Point, delta_y: f64 },
    /// A click or context-menu event.
    Click { button: MouseButton, client: Point },
}
