//! Plain positional records handed to and read from the project file.

use kurbo::Point;
use serde::{Deserialize, Serialize};

use super::fiber::Fiber;
use super::nucleus::Nucleus;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NucleusRecord {
    pub id: u64,
    #[serde(rename = "Xpos")]
    pub x_pos: f64,
    #[serde(rename = "Ypos")]
    pub y_pos: f64,
    /// 0 = inside a fiber, 1 = outside.
    #[serde(rename = "type")]
    pub kind: u8,
}

impl From<&Nucleus> for NucleusRecord {
    fn from(n: &Nucleus) -> Self {
        Self {
            id: n.id().0,
            x_pos: n.x(),
            y_pos: n.y(),
            kind: n.classification().code(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FiberRecord {
    pub id: u64,
    pub area: f64,
    #[serde(rename = "fiberPath")]
    pub fiber_path: Vec<[f64; 2]>,
}

impl FiberRecord {
    pub fn points(&self) -> Vec<Point> {
        to_points(&self.fiber_path)
    }
}

impl From<&Fiber> for FiberRecord {
    fn from(f: &Fiber) -> Self {
        Self {
            id: f.id().0,
            area: f.area(),
            fiber_path: f.path().iter().map(|p| [p.x, p.y]).collect(),
        }
    }
}

pub(crate) fn to_points(path: &[[f64; 2]]) -> Vec<Point> {
    path.iter().map(|&[x, y]| Point::new(x, y)).collect()
}
