//! Largest common subset of the intersection membership.
//!
//! Under the point/line duality `(a, b) <-> y = a x - b`, the segments
//! meeting at one intersection point correspond to input points lying
//! on a common line. The largest such set answers "which input points
//! are collinear" for the points the segments were built from.
use std::collections::BTreeSet;

use geo::Coordinate;
use log::warn;

use crate::{crossings::Crossings, events::SweepPoint};

/// An intersection point with the indices of all segments through it.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonSet {
    pub point: SweepPoint,
    pub indices: BTreeSet<usize>,
}

/// The intersection point shared by the most segments.
///
/// Ties go to the smallest point in `(x, y)` order. Returns `None` if
/// there are no intersections.
pub fn largest_common_set(crossings: &Crossings) -> Option<CommonSet> {
    let mut best: Option<(SweepPoint, &BTreeSet<usize>)> = None;
    // Points are ascending, so keeping the first maximum breaks ties.
    for (p, indices) in crossings.membership() {
        match best {
            Some((_, b)) if b.len() >= indices.len() => {}
            _ => best = Some((p, indices)),
        }
    }
    best.map(|(point, indices)| CommonSet {
        point,
        indices: indices.clone(),
    })
}

/// Resolve the indices of `set` to `points`, in ascending index order.
///
/// Indices past the end of `points` are skipped with a warning.
pub fn collinear_points(set: &CommonSet, points: &[Coordinate<f64>]) -> Vec<Coordinate<f64>> {
    set.indices
        .iter()
        .filter_map(|&i| {
            let p = points.get(i).copied();
            if p.is_none() {
                warn!("no point with index {} ({} points given)", i, points.len());
            }
            p
        })
        .collect()
}
