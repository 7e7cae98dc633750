use std::{collections::BTreeSet, iter::FromIterator};

use geo::Line;

use crate::{config::SweepConfig, events::SweepPoint, registry::Registry, segment::Segment};

mod sweep;
pub use sweep::Sweep;

/// Result of a sweep: the distinct intersection points, ascending by
/// `(x, y)`, each with the input indices of the segments meeting
/// there.
#[derive(Debug, Clone, Default)]
pub struct Crossings {
    entries: Vec<(SweepPoint, BTreeSet<usize>)>,
}

impl Crossings {
    pub(crate) fn from_registry(registry: Registry) -> Self {
        let mut entries: Vec<_> = registry.into_entries().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Crossings { entries }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The intersection points, ascending.
    pub fn points(&self) -> impl Iterator<Item = SweepPoint> + '_ {
        self.entries.iter().map(|(p, _)| *p)
    }

    /// Each intersection point with the indices of the segments
    /// through it.
    pub fn membership(&self) -> impl Iterator<Item = (SweepPoint, &BTreeSet<usize>)> + '_ {
        self.entries.iter().map(|(p, s)| (*p, s))
    }

    /// The indices of the segments through the intersection point
    /// within `eps` of `p`.
    pub fn segments_at(&self, p: SweepPoint, eps: f64) -> Option<&BTreeSet<usize>> {
        self.entries
            .iter()
            .find(|(q, _)| q.approx_eq(&p, eps))
            .map(|(_, s)| s)
    }

    /// The points rounded to `digits` decimals, ascending and without
    /// the duplicates rounding creates.
    pub fn rounded_points(&self, digits: usize) -> Vec<(f64, f64)> {
        let scale = 10f64.powi(digits as i32);
        // Adding `0.` turns `-0.` into `0.`.
        let round = |v: f64| (v * scale).round() / scale + 0.;
        let mut points: Vec<_> = self.points().map(|p| (round(p.x()), round(p.y()))).collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.total_cmp(&b.1)));
        points.dedup();
        points
    }
}

/// Compute all intersections of `lines`, indexed by their position
/// in the iterator.
pub fn find_crossings<I>(lines: I, config: &SweepConfig) -> Crossings
where
    I: IntoIterator<Item = Line<f64>>,
{
    let segments = lines
        .into_iter()
        .enumerate()
        .map(|(i, l)| Segment::from(l).with_index(i));
    Sweep::new(segments, config.clone()).run()
}

/// Collect with the default [`SweepConfig`].
impl FromIterator<Line<f64>> for Crossings {
    fn from_iter<T: IntoIterator<Item = Line<f64>>>(iter: T) -> Self {
        find_crossings(iter, &SweepConfig::default())
    }
}

impl<'a> FromIterator<&'a Line<f64>> for Crossings {
    fn from_iter<T: IntoIterator<Item = &'a Line<f64>>>(iter: T) -> Self {
        iter.into_iter().copied().collect()
    }
}
