use serde::Serialize;

use crate::format::Coordinates;
use crate::mapper::Point;

/// Exact centre of two committed points. Can land on half pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Midpoint {
    pub x: f64,
    pub y: f64,
}

impl Midpoint {
    pub fn between(a: Point, b: Point) -> Self {
        Self {
            x: (f64::from(a.x) + f64::from(b.x)) / 2.0,
            y: (f64::from(a.y) + f64::from(b.y)) / 2.0,
        }
    }
}

impl From<Midpoint> for Coordinates {
    fn from(mid: Midpoint) -> Self {
        Coordinates { x: mid.x, y: mid.y }
    }
}

/// One rendered row of the ledger.
///
/// Points at odd indices close a (start, end) segment and carry its midpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerEntry {
    pub index: usize,
    pub point: Point,
    pub midpoint: Option<Midpoint>,
}

/// Ordered, append-only list of committed clicks in image pixel space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointLedger {
    points: Vec<Point>,
}

impl PointLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn clear_points(&mut self) {
        self.points.clear();
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of completed segments, i.e. midpoint lines to render.
    pub fn segment_count(&self) -> usize {
        self.points.len() / 2
    }

    pub fn entries(&self) -> impl Iterator<Item = LedgerEntry> + '_ {
        self.points.iter().enumerate().map(|(index, &point)| LedgerEntry {
            index,
            point,
            midpoint: (index % 2 == 1).then(|| Midpoint::between(self.points[index - 1], point)),
        })
    }
}

impl Extend<Point> for PointLedger {
    fn extend<I: IntoIterator<Item = Point>>(&mut self, iter: I) {
        self.points.extend(iter);
    }
}
