use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::error::{MyofinderError, Result};
use crate::ids::{IdCounter, MarkerId, SurfaceId};

/// Whether a nucleus lies inside or outside a muscle fiber.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    Inside,
    Outside,
}

impl Classification {
    /// Numeric `type` code used by the persisted record format.
    pub fn code(self) -> u8 {
        match self {
            Classification::Inside => 0,
            Classification::Outside => 1,
        }
    }
}

impl TryFrom<u8> for Classification {
    type Error = MyofinderError;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Classification::Inside),
            1 => Ok(Classification::Outside),
            other => Err(MyofinderError::InvalidClassification(other)),
        }
    }
}

/// A single point marker in world coordinates. Never mutated once created.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nucleus {
    id: MarkerId,
    image_id: SurfaceId,
    x: f64,
    y: f64,
    classification: Classification,
}

impl Nucleus {
    pub fn id(&self) -> MarkerId {
        self.id
    }

    pub fn image_id(&self) -> SurfaceId {
        self.image_id
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }
}

/// Append-ordered nuclei of one image.
#[derive(Clone, Debug, Default)]
pub struct NucleusCollection {
    nuclei: Vec<Nucleus>,
    ids: IdCounter,
}

impl NucleusCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a nucleus with the next id and append it.
    pub fn append(
        &mut self,
        image_id: SurfaceId,
        x: f64,
        y: f64,
        classification: Classification,
    ) -> Nucleus {
        let nucleus = Nucleus {
            id: self.ids.next_id(),
            image_id,
            x,
            y,
            classification,
        };
        self.nuclei.push(nucleus);
        nucleus
    }

    /// Remove a nucleus that is currently a member of this collection.
    ///
    /// Ids are only unique per surface, so the image id must match as well.
    pub fn remove(&mut self, nucleus: &Nucleus) -> Result<()> {
        let index = self
            .nuclei
            .iter()
            .position(|n| n.id == nucleus.id && n.image_id == nucleus.image_id)
            .ok_or(MyofinderError::NucleusNotFound(nucleus.id))?;
        self.nuclei.remove(index);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.nuclei.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Nucleus> {
        self.nuclei.iter()
    }

    pub fn get(&self, id: MarkerId) -> Option<&Nucleus> {
        self.nuclei.iter().find(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.nuclei.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nuclei.is_empty()
    }

    pub fn inside_count(&self) -> usize {
        self.count(Classification::Inside)
    }

    pub fn outside_count(&self) -> usize {
        self.count(Classification::Outside)
    }

    fn count(&self, classification: Classification) -> usize {
        self.nuclei
            .iter()
            .filter(|n| n.classification == classification)
            .count()
    }
}

impl<'a> IntoIterator for &'a NucleusCollection {
    type Item = &'a Nucleus;
    type IntoIter = std::slice::Iter<'a, Nucleus>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_across_removals() {
        let mut nuclei = NucleusCollection::new();
        let a = nuclei.append(SurfaceId(0), 1.0, 1.0, Classification::Inside);
        nuclei.remove(&a).unwrap();
        let b = nuclei.append(SurfaceId(0), 2.0, 2.0, Classification::Outside);
        assert!(b.id() > a.id());
    }

    #[test]
    fn classification_codes() {
        assert_eq!(Classification::Inside.code(), 0);
        assert_eq!(Classification::Outside.code(), 1);
        assert_eq!(Classification::try_from(1u8).unwrap(), Classification::Outside);
        assert!(Classification::try_from(7u8).is_err());
    }
}
