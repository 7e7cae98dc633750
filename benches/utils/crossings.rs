#![allow(dead_code)]

use std::collections::BTreeSet;

use geo::{line_intersection::line_intersection, Line};
use line_crossings::{find_crossings, geometry::intersect, Segment, SweepConfig};
use rstar::{RTree, RTreeObject};

struct GeomWithData<R: RTreeObject, T>(R, T);

impl<R: RTreeObject, T> RTreeObject for GeomWithData<R, T> {
    type Envelope = R::Envelope;

    fn envelope(&self) -> Self::Envelope {
        self.0.envelope()
    }
}

fn config() -> SweepConfig {
    SweepConfig::default().with_validation(false)
}

/// Distinct intersection points found by the sweep.
pub fn count_sweep(lines: &[Line<f64>]) -> usize {
    find_crossings(lines.iter().copied(), &config()).len()
}

/// Distinct intersection points over all pairs, rounded to the output
/// precision.
pub fn count_brute(lines: &[Line<f64>]) -> usize {
    let eps = config().eps;
    let segments: Vec<_> = lines
        .iter()
        .enumerate()
        .map(|(i, l)| Segment::from(*l).with_index(i))
        .collect();
    let mut points = BTreeSet::new();
    for (i, a) in segments.iter().enumerate() {
        for b in &segments[i + 1..] {
            for p in intersect(a, b, eps).points() {
                points.insert(((p.x() * 1e3).round() as i64, (p.y() * 1e3).round() as i64));
            }
        }
    }
    points.len()
}

/// Intersecting pairs, using an R-tree to prune candidates.
pub fn count_rtree(lines: &[Line<f64>]) -> usize {
    let lines: Vec<_> = lines
        .iter()
        .enumerate()
        .map(|(i, l)| GeomWithData(*l, i))
        .collect();

    let tree = RTree::bulk_load(lines);
    tree.intersection_candidates_with_other_tree(&tree)
        .filter_map(|(l1, l2)| {
            if l1.1 >= l2.1 {
                None
            } else {
                line_intersection(l1.0, l2.0)
            }
        })
        .count()
}
