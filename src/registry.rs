use std::collections::{BTreeMap, BTreeSet};

use crate::events::{tolerance, SweepPoint};

/// Largest scaled coordinate that is snapped to the grid. Beyond it the
/// grid is finer than the float spacing, and cell indices would no
/// longer fit an `i64` with room for the neighbour lookup.
const GRID_LIMIT: f64 = 9_007_199_254_740_992.; // 2^53

/// Where a point is filed in the registry.
///
/// Points are snapped to a `10^-precision` grid; points too far from
/// the origin for the grid keep their exact position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum GridKey {
    Cell { x: i64, y: i64 },
    Exact(SweepPoint),
}

/// Intersection points found so far, each with the indices of the
/// segments that meet there.
///
/// A lookup also probes the eight cells around the point's own, so two
/// slightly different computations of the same point collapse into one
/// entry. Off-grid points are matched within the rounding error of
/// their magnitude.
#[derive(Debug)]
pub struct Registry {
    scale: f64,
    points: BTreeMap<GridKey, (SweepPoint, BTreeSet<usize>)>,
}

impl Registry {
    pub fn new(precision: u32) -> Self {
        Registry {
            scale: 10f64.powi(precision as i32),
            points: BTreeMap::new(),
        }
    }

    fn key(&self, p: SweepPoint) -> GridKey {
        let (x, y) = ((p.x() * self.scale).round(), (p.y() * self.scale).round());
        if x.abs() < GRID_LIMIT && y.abs() < GRID_LIMIT {
            GridKey::Cell {
                x: x as i64,
                y: y as i64,
            }
        } else {
            GridKey::Exact(p)
        }
    }

    /// The key of an existing entry near `p`.
    fn find(&self, p: SweepPoint) -> Option<GridKey> {
        let (x, y) = match self.key(p) {
            GridKey::Cell { x, y } => (x, y),
            GridKey::Exact(_) => return self.find_exact(p),
        };
        (-1..=1)
            .flat_map(|dx| (-1..=1).map(move |dy| (dx, dy)))
            .map(|(dx, dy)| GridKey::Cell {
                x: x + dx,
                y: y + dy,
            })
            .find(|k| self.points.contains_key(k))
    }

    /// Scan the off-grid entries whose `x` is close to that of `p`.
    fn find_exact(&self, p: SweepPoint) -> Option<GridKey> {
        let eps = 1. / self.scale;
        let tol = tolerance(eps, p.x());
        let lo = GridKey::Exact(SweepPoint::new((p.x() - tol).max(f64::MIN), f64::MIN));
        let hi = GridKey::Exact(SweepPoint::new((p.x() + tol).min(f64::MAX), f64::MAX));
        self.points
            .range(lo..=hi)
            .find(|(_, (q, _))| q.approx_eq(&p, eps))
            .map(|(k, _)| *k)
    }

    /// The registered point near `p`, if any.
    #[cfg(test)]
    pub fn get(&self, p: SweepPoint) -> Option<SweepPoint> {
        self.find(p).map(|k| self.points[&k].0)
    }

    /// Record `indices` at `p`.
    ///
    /// Returns `true` if no point near `p` was registered before.
    pub fn record<I: IntoIterator<Item = usize>>(&mut self, p: SweepPoint, indices: I) -> bool {
        let (key, fresh) = match self.find(p) {
            Some(k) => (k, false),
            None => (self.key(p), true),
        };
        self.points
            .entry(key)
            .or_insert_with(|| (p, BTreeSet::new()))
            .1
            .extend(indices);
        fresh
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Consume into the points (as first recorded) and their index
    /// sets.
    pub(crate) fn into_entries(self) -> impl Iterator<Item = (SweepPoint, BTreeSet<usize>)> {
        self.points.into_values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_merges_nearby() {
        let mut reg = Registry::new(6);
        assert!(reg.record(SweepPoint::new(1., 1.), [0, 1]));
        // Straddles a cell border of the first one.
        assert!(!reg.record(SweepPoint::new(1. + 6e-7, 1. - 4e-7), [2]));
        assert!(reg.record(SweepPoint::new(1.001, 1.), [3]));

        assert_eq!(reg.len(), 2);
        assert_eq!(reg.get(SweepPoint::new(1., 1. + 1e-7)), Some(SweepPoint::new(1., 1.)));
        assert_eq!(reg.get(SweepPoint::new(2., 2.)), None);

        let entries: Vec<_> = reg.into_entries().collect();
        assert_eq!(entries[0].1.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(entries[1].1.len(), 1);
    }

    #[test]
    fn test_record_far_from_origin() {
        let mut reg = Registry::new(6);
        assert!(reg.record(SweepPoint::new(2e13, 1e13), [0, 1]));
        assert!(reg.record(SweepPoint::new(5e13, 1e13), [2, 3]));
        // A few ulps off the first point.
        assert!(!reg.record(SweepPoint::new(2e13 + 0.01, 1e13 - 0.01), [4]));
        assert!(reg.record(SweepPoint::new(-1e300, 1e300), [5]));
        assert!(reg.record(SweepPoint::new(f64::MAX, f64::MIN), [6]));

        assert_eq!(reg.len(), 4);
        assert_eq!(
            reg.get(SweepPoint::new(5e13, 1e13)),
            Some(SweepPoint::new(5e13, 1e13))
        );
        let mut entries: Vec<_> = reg.into_entries().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(entries[1].1.iter().copied().collect::<Vec<_>>(), vec![0, 1, 4]);
    }
}
