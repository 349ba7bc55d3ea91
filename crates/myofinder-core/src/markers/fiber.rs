use kurbo::Point;

use crate::error::{MyofinderError, Result};
use crate::ids::{IdCounter, MarkerId, SurfaceId};

/// A closed polygon marker with a precomputed area.
#[derive(Clone, Debug, PartialEq)]
pub struct Fiber {
    id: MarkerId,
    image_id: SurfaceId,
    path: Vec<Point>,
    area: f64,
    ratio: f64,
}

impl Fiber {
    pub fn id(&self) -> MarkerId {
        self.id
    }

    pub fn image_id(&self) -> SurfaceId {
        self.image_id
    }

    /// Polygon vertices in world coordinates; the last vertex connects back to the first.
    pub fn path(&self) -> &[Point] {
        &self.path
    }

    /// Area in image pixels.
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Area as a fraction of the whole image.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }
}

/// Fraction of an `image_width` x `image_height` image covered by `area`.
pub fn area_ratio(area: f64, image_width: u32, image_height: u32) -> f64 {
    area / (f64::from(image_width) * f64::from(image_height))
}

/// Append-ordered fibers of one image.
#[derive(Clone, Debug, Default)]
pub struct FiberCollection {
    fibers: Vec<Fiber>,
    ids: IdCounter,
}

impl FiberCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fiber with the next id and append it.
    pub fn append(
        &mut self,
        image_id: SurfaceId,
        path: Vec<Point>,
        area: f64,
        ratio: f64,
    ) -> &Fiber {
        let fiber = Fiber {
            id: self.ids.next_id(),
            image_id,
            path,
            area,
            ratio,
        };
        self.fibers.push(fiber);
        &self.fibers[self.fibers.len() - 1]
    }

    pub fn remove(&mut self, fiber: &Fiber) -> Result<()> {
        let index = self
            .fibers
            .iter()
            .position(|f| f.id == fiber.id && f.image_id == fiber.image_id)
            .ok_or(MyofinderError::FiberNotFound(fiber.id))?;
        self.fibers.remove(index);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.fibers.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fiber> {
        self.fibers.iter()
    }

    pub fn get(&self, id: MarkerId) -> Option<&Fiber> {
        self.fibers.iter().find(|f| f.id == id)
    }

    pub fn len(&self) -> usize {
        self.fibers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fibers.is_empty()
    }

    /// Sum of the per-fiber area ratios; 0 when empty.
    pub fn area_ratio(&self) -> f64 {
        self.fibers.iter().map(|f| f.ratio).sum()
    }
}

impl<'a> IntoIterator for &'a FiberCollection {
    type Item = &'a Fiber;
    type IntoIter = std::slice::Iter<'a, Fiber>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
