use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a nucleus or fiber, unique within its collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerId(pub u64);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a loaded image surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(pub u64);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic counter handing out marker ids for one collection.
#[derive(Clone, Debug, Default)]
pub struct IdCounter {
    next: u64,
}

impl IdCounter {
    pub fn next_id(&mut self) -> MarkerId {
        let id = MarkerId(self.next);
        self.next += 1;
        id
    }
}

/// Hands out surface ids. Owned by whatever creates surfaces (usually a
/// [`Workspace`](crate::workspace::Workspace)).
#[derive(Clone, Debug, Default)]
pub struct IdGenerator {
    surfaces: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_surface(&mut self) -> SurfaceId {
        let id = SurfaceId(self.surfaces);
        self.surfaces += 1;
        id
    }

    /// Make sure ids handed out from now on never collide with `used`.
    pub fn reserve(&mut self, used: SurfaceId) {
        self.surfaces = self.surfaces.max(used.0 + 1);
    }
}
