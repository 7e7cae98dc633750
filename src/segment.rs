use std::cmp::Ordering;

use geo::{Coordinate, Line};

use crate::events::{tolerance, Event, EventKind, SweepPoint};

/// An input line segment.
///
/// The end points are ordered (see [`SweepPoint`]): `start` is the
/// lexicographically smaller one, so `start.x <= end.x` always holds.
/// `index` is the position of the segment in the input and is what
/// gets reported in the intersection membership.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    start: SweepPoint,
    end: SweepPoint,
    index: usize,
}

/// Convert from a [`Line`] ensuring end point ordering. The index is
/// left as `0`; see [`Segment::with_index`].
impl From<Line<f64>> for Segment {
    fn from(l: Line<f64>) -> Self {
        Segment::new(l.start, l.end, 0)
    }
}

impl Segment {
    pub fn new(a: Coordinate<f64>, b: Coordinate<f64>, index: usize) -> Self {
        let a: SweepPoint = a.into();
        let b: SweepPoint = b.into();
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        Segment { start, end, index }
    }

    #[must_use]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    #[inline]
    pub fn start(&self) -> SweepPoint {
        self.start
    }

    #[inline]
    pub fn end(&self) -> SweepPoint {
        self.end
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn line(&self) -> Line<f64> {
        Line::new(self.start.coord(), self.end.coord())
    }

    /// Checks if the end points share `x` up to `eps`.
    #[inline]
    pub fn is_vertical(&self, eps: f64) -> bool {
        self.end.x() - self.start.x() <= eps
    }

    /// Slope of the supporting line; `0` for a vertical segment.
    #[inline]
    pub fn slope(&self) -> f64 {
        let dx = self.end.x() - self.start.x();
        if dx == 0. {
            0.
        } else {
            (self.end.y() - self.start.y()) / dx
        }
    }

    /// The `y` of the supporting line at `x`.
    ///
    /// Extrapolates outside the segment's `x` range. For a vertical
    /// segment this is the `y` of the start point.
    pub fn y_at(&self, x: f64) -> f64 {
        let dx = self.end.x() - self.start.x();
        if dx == 0. {
            return self.start.y();
        }
        if x == self.end.x() {
            return self.end.y();
        }
        let t = (x - self.start.x()) / dx;
        self.start.y() + t * (self.end.y() - self.start.y())
    }

    /// Order two segments top to bottom just right of `x`.
    ///
    /// Compares `y` at `x` (within `eps`, widened for large values),
    /// then the slope, then the index. Two segments meeting at `x` are
    /// ordered as they continue to the right, where the one with the
    /// larger slope is higher. Probing `y` a fixed distance right of
    /// `x` instead breaks down when a segment ends or another crossing
    /// lies within that distance. The index only decides between
    /// collinear segments.
    pub fn cmp_at(&self, other: &Self, x: f64, eps: f64) -> Ordering {
        let (ya, yb) = (self.y_at(x), other.y_at(x));
        if (ya - yb).abs() > tolerance(eps, ya.abs().max(yb.abs())) {
            return yb.total_cmp(&ya);
        }
        other
            .slope()
            .total_cmp(&self.slope())
            .then_with(|| self.index.cmp(&other.index))
    }

    /// Events for both end points; a single event for a vertical
    /// segment.
    pub(crate) fn events(&self, key: usize, eps: f64) -> Vec<Event> {
        if self.is_vertical(eps) {
            vec![Event::new(self.start, EventKind::Vertical, key)]
        } else {
            vec![
                Event::new(self.start, EventKind::Start, key),
                Event::new(self.end, EventKind::End, key),
            ]
        }
    }
}
