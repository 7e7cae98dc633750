use std::{cmp::Ordering, collections::BinaryHeap};

use geo::Coordinate;
use smallvec::SmallVec;

/// Rounding error allowed per unit of magnitude, on top of absolute
/// tolerances.
const ROUNDING: f64 = 64. * f64::EPSILON;

/// `eps`, widened to cover the rounding of values of size `magnitude`.
///
/// Far from the origin a single ulp exceeds any useful absolute
/// tolerance.
#[inline]
pub(crate) fn tolerance(eps: f64, magnitude: f64) -> f64 {
    eps.max(ROUNDING * magnitude.abs())
}

/// Wraps a [`Coordinate`] to support lexicographic ordering.
///
/// The ordering is by `x` and then by `y`. Implements `Ord` and `Eq`
/// even though `Coordinate` doesn't implement these. This is
/// necessary to support insertion to ordered collections, especially
/// `BinaryHeap` as required by sweep algorithms.
///
/// The ordering is exact; use [`SweepPoint::approx_eq`] for the
/// tolerance based equality the sweep works with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint(Coordinate<f64>);

impl SweepPoint {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Coordinate { x, y }.into()
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.0.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.0.y
    }

    /// Get the underlying coordinate.
    #[inline]
    pub fn coord(&self) -> Coordinate<f64> {
        self.0
    }

    /// Equality within `eps` in both components, widened by the
    /// rounding error of large coordinates.
    #[inline]
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        (self.0.x - other.0.x).abs() <= tolerance(eps, self.0.x)
            && (self.0.y - other.0.y).abs() <= tolerance(eps, self.0.y)
    }
}

/// Implement lexicographic ordering by `x` and then by `y`
/// coordinate.
impl PartialOrd for SweepPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SweepPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .x
            .total_cmp(&other.0.x)
            .then_with(|| self.0.y.total_cmp(&other.0.y))
    }
}

/// We derive `Eq` manually as `f64` is not `Eq`. Components are
/// finite, so the `total_cmp` based ordering agrees with `==`.
impl Eq for SweepPoint {}

/// Create from `Coordinate` while checking the components are finite.
impl From<Coordinate<f64>> for SweepPoint {
    fn from(pt: Coordinate<f64>) -> Self {
        assert!(
            pt.x.is_finite(),
            "sweep point requires a finite x-coordinate"
        );
        assert!(
            pt.y.is_finite(),
            "sweep point requires a finite y-coordinate"
        );
        SweepPoint(pt)
    }
}

impl From<(f64, f64)> for SweepPoint {
    fn from((x, y): (f64, f64)) -> Self {
        SweepPoint::new(x, y)
    }
}

/// Event kind to associate with an event.
///
/// The ordering of the variants is the processing order of events
/// that share an `x` coordinate. Vertical segments are intersected
/// while the active set still holds everything crossing their `x`;
/// segments starting at a point are seen before intersections and
/// ends at the same sweep position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    Vertical,
    Start,
    Intersect,
    End,
}

/// A sweep event: a point plus the segment keys that caused it.
#[derive(Debug, Clone)]
pub struct Event {
    pub point: SweepPoint,
    pub kind: EventKind,
    pub segments: SmallVec<[usize; 2]>,
}

impl Event {
    pub fn new(point: SweepPoint, kind: EventKind, segment: usize) -> Self {
        Event {
            point,
            kind,
            segments: smallvec::smallvec![segment],
        }
    }

    pub fn intersection(point: SweepPoint, a: usize, b: usize) -> Self {
        Event {
            point,
            kind: EventKind::Intersect,
            segments: smallvec::smallvec![a, b],
        }
    }

    /// The sort key: `x`, then kind, then `y`.
    fn sort_cmp(&self, other: &Self) -> Ordering {
        self.point
            .x()
            .total_cmp(&other.point.x())
            .then_with(|| self.kind.cmp(&other.kind))
            .then_with(|| self.point.y().total_cmp(&other.point.y()))
    }
}

/// Equality for usage in ordered sets. Note that it ignores the
/// segments.
impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.sort_cmp(other) == Ordering::Equal
    }
}

impl Eq for Event {}

/// Ordering for use with a max-heap (`BinaryHeap`). Note that it
/// ignores the segments. This suffices for heap usage, where
/// repeated items are allowed.
impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_cmp(other).reverse()
    }
}

/// Min-priority queue of sweep events.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Event>,
}

impl EventQueue {
    pub fn with_capacity(size: usize) -> Self {
        EventQueue {
            heap: BinaryHeap::with_capacity(size),
        }
    }

    #[inline]
    pub fn push(&mut self, event: Event) {
        self.heap.push(event);
    }

    #[inline]
    pub fn peek_x(&self) -> Option<f64> {
        self.heap.peek().map(|e| e.point.x())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Pop every event whose `x` is within `eps` of the smallest
    /// queued `x`.
    ///
    /// The batch is sorted by kind and then by `y`.
    pub fn pop_batch(&mut self, eps: f64) -> Option<Vec<Event>> {
        let first = self.heap.pop()?;
        let x = first.point.x();
        let mut batch = vec![first];
        while matches!(self.peek_x(), Some(nx) if nx - x <= eps) {
            batch.extend(self.heap.pop());
        }
        batch.sort_by(|a, b| {
            a.kind
                .cmp(&b.kind)
                .then_with(|| a.point.y().total_cmp(&b.point.y()))
        });
        Some(batch)
    }
}
