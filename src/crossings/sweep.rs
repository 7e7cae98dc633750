use itertools::Itertools;
use log::{debug, trace};
use smallvec::SmallVec;

use crate::{
    active::{ActiveSegments, SweepContext},
    config::{SweepConfig, VerticalPolicy},
    events::{Event, EventKind, EventQueue, SweepPoint},
    geometry::{incident, intersect},
    registry::Registry,
    segment::Segment,
};

use super::Crossings;

type Keys = SmallVec<[usize; 4]>;

/// Events of one sweep batch that share a point.
#[derive(Debug)]
struct PointEvents {
    point: SweepPoint,
    /// Position of the first event of this point in the batch.
    rank: usize,
    starts: Keys,
    ends: Keys,
    crossings: Keys,
}

impl PointEvents {
    fn new(point: SweepPoint, rank: usize) -> Self {
        PointEvents {
            point,
            rank,
            starts: Keys::new(),
            ends: Keys::new(),
            crossings: Keys::new(),
        }
    }

    fn add(&mut self, event: &Event) {
        let target = match event.kind {
            EventKind::Start => &mut self.starts,
            EventKind::End => &mut self.ends,
            EventKind::Intersect => &mut self.crossings,
            EventKind::Vertical => unreachable!("vertical events are not grouped by point"),
        };
        for key in &event.segments {
            if !target.contains(key) {
                target.push(*key);
            }
        }
    }
}

/// Sweep algorithm for detecting all intersection points.
///
/// This is an internal data-structure that implements a
/// [Bentley-Ottman] sweep. Maintains a heap of events, the currently
/// active segments and the registry of points found so far.
/// End-users should use [`find_crossings`](super::find_crossings) or
/// collect into a [`Crossings`].
///
/// [Bentley-Ottman]: //en.wikipedia.org/wiki/Bentley%E2%80%93Ottmann_algorithm
pub struct Sweep {
    segments: Vec<Segment>,
    events: EventQueue,
    active: ActiveSegments,
    registry: Registry,
    config: SweepConfig,
    ctx: SweepContext,
}

impl Sweep {
    pub fn new<I: IntoIterator<Item = Segment>>(iter: I, config: SweepConfig) -> Self {
        let eps = config.eps;
        let segments: Vec<_> = iter
            .into_iter()
            .filter(|s| {
                let keep = config.vertical == VerticalPolicy::Include || !s.is_vertical(eps);
                if !keep {
                    debug!("excluding vertical segment {}: {:?}", s.index(), s);
                }
                keep
            })
            .collect();

        let mut events = EventQueue::with_capacity(2 * segments.len());
        for (key, segment) in segments.iter().enumerate() {
            for e in segment.events(key, eps) {
                events.push(e);
            }
        }

        Sweep {
            active: ActiveSegments::with_capacity(segments.len()),
            registry: Registry::new(config.precision),
            ctx: SweepContext::new(f64::NEG_INFINITY, &config),
            segments,
            events,
            config,
        }
    }

    /// Run the sweep to completion.
    pub fn run(mut self) -> Crossings {
        debug!(
            "sweeping {} segments ({} events)",
            self.segments.len(),
            self.events.len()
        );
        while let Some(batch) = self.events.pop_batch(self.config.eps) {
            self.handle_batch(batch);
        }
        debug!("found {} intersection points", self.registry.len());
        Crossings::from_registry(self.registry)
    }

    /// Process every event at one sweep position.
    fn handle_batch(&mut self, batch: Vec<Event>) {
        let eps = self.config.eps;
        self.ctx.x = batch
            .iter()
            .map(|e| e.point.x())
            .fold(f64::INFINITY, f64::min);
        trace!("batch of {} events at x = {}", batch.len(), self.ctx.x);

        let verticals: Keys = batch
            .iter()
            .filter(|e| e.kind == EventKind::Vertical)
            .map(|e| e.segments[0])
            .collect();
        if !verticals.is_empty() {
            self.handle_verticals(&verticals, &batch);
        }

        for group in group_by_point(&batch, eps) {
            self.handle_point(group);
        }

        if self.config.validate {
            if let Err(err) = self.active.check_order(&self.segments, self.ctx) {
                panic!(
                    "active segments out of order after x = {}: {}",
                    self.ctx.x, err
                );
            }
        }
    }

    /// Intersect the vertical segments at the current `x` with
    /// everything crossing it.
    ///
    /// Vertical segments never enter the active set, so nothing is
    /// scheduled; the points are only registered.
    fn handle_verticals(&mut self, verticals: &[usize], batch: &[Event]) {
        let eps = self.config.eps;
        for (i, &v) in verticals.iter().enumerate() {
            let vertical = self.segments[v];
            let x = vertical.start().x();
            let (lo, hi) = {
                let (a, b) = (vertical.start().y(), vertical.end().y());
                (a.min(b), a.max(b))
            };

            for key in self.active.range_y(x, lo, hi, &self.segments, self.ctx) {
                let p = SweepPoint::new(x, self.segments[key].y_at(x));
                self.record(p, &[v, key]);
            }

            let starting = batch
                .iter()
                .filter(|e| e.kind == EventKind::Start)
                .filter(|e| incident(&vertical, e.point, eps));
            for e in starting {
                let p = e.point;
                self.record(p, &[v, e.segments[0]]);
            }

            for &w in &verticals[i + 1..] {
                let isec = intersect(&vertical, &self.segments[w], eps);
                for p in isec.points() {
                    self.record(p, &[v, w]);
                }
            }
        }
    }

    /// Handle all events at one point.
    fn handle_point(&mut self, group: PointEvents) {
        let eps = self.config.eps;
        let p = group.point;
        self.ctx.x = p.x();

        let upper = group.starts;
        let mut lower: Keys = group
            .ends
            .into_iter()
            .filter(|k| self.active.contains(*k))
            .collect();
        let mut cross = Keys::new();

        let through = self.active.segments_at(p, &self.segments, self.ctx);
        let named = group
            .crossings
            .into_iter()
            .filter(|k| self.active.contains(*k));
        for key in through.into_iter().chain(named) {
            if upper.contains(&key) || lower.contains(&key) || cross.contains(&key) {
                continue;
            }
            if self.segments[key].end().approx_eq(&p, eps) {
                lower.push(key);
            } else {
                cross.push(key);
            }
        }
        trace!(
            "point {:?}: U = {:?}, L = {:?}, C = {:?}",
            p,
            upper,
            lower,
            cross
        );

        if upper.len() + lower.len() + cross.len() >= 2 {
            let keys: Keys = upper.iter().chain(&lower).chain(&cross).copied().collect();
            self.record(p, &keys);
        }

        for &key in lower.iter().chain(&cross) {
            self.active.remove(key);
        }
        // Segments through `p` swap their order across it; re-insert
        // them in reverse.
        let inserted: Keys = upper.iter().chain(cross.iter().rev()).copied().collect();
        for &key in &inserted {
            self.active.insert(key, &self.segments, self.ctx);
        }

        let ctx = self.ctx;
        let segments = &self.segments;
        let bounds = inserted
            .iter()
            .copied()
            .minmax_by(|a, b| ctx.cmp(&segments[*a], &segments[*b]))
            .into_option();
        match bounds {
            Some((top, bottom)) => {
                // Everything re-inserted meets at `p`; only collinear
                // overlaps among them carry new points.
                let mut cur = top;
                while cur != bottom {
                    let next = match self.active.next_key(cur) {
                        Some(n) => n,
                        None => break,
                    };
                    self.check(cur, next, p);
                    cur = next;
                }

                let mut cur = self.active.prev_key(top);
                while let Some(key) = cur {
                    if !self.check(key, top, p) {
                        break;
                    }
                    cur = self.active.prev_key(key);
                }
                let mut cur = self.active.next_key(bottom);
                while let Some(key) = cur {
                    if !self.check(bottom, key, p) {
                        break;
                    }
                    cur = self.active.next_key(key);
                }
            }
            None => {
                if let (Some(above), Some(below)) =
                    self.active.neighbours_of(p, &self.segments, self.ctx)
                {
                    self.check(above, below, p);
                }
            }
        }
    }

    /// Intersect the segments at keys `a` and `b`; register the
    /// points found, scheduling those not seen before.
    ///
    /// Returns `true` if the segments intersect.
    fn check(&mut self, a: usize, b: usize, at: SweepPoint) -> bool {
        let eps = self.config.eps;
        let isec = intersect(&self.segments[a], &self.segments[b], eps);
        if isec.is_none() {
            return false;
        }
        for p in isec.points() {
            let fresh = self.record(p, &[a, b]);
            if fresh && p.x() >= self.ctx.x - eps {
                debug!(
                    "intersection {:?} of segments {} and {} (sweep at {:?})",
                    p,
                    self.segments[a].index(),
                    self.segments[b].index(),
                    at
                );
                self.events.push(Event::intersection(p, a, b));
            }
        }
        true
    }

    /// Register `p` with the input indices of the segments at `keys`.
    fn record(&mut self, p: SweepPoint, keys: &[usize]) -> bool {
        let segments = &self.segments;
        self.registry
            .record(p, keys.iter().map(|k| segments[*k].index()))
    }
}

/// Merge the non-vertical events of a batch into groups at a common
/// point, in the order the points first appear in the batch.
fn group_by_point(batch: &[Event], eps: f64) -> Vec<PointEvents> {
    let by_y = batch
        .iter()
        .enumerate()
        .filter(|(_, e)| e.kind != EventKind::Vertical)
        .sorted_by(|(_, a), (_, b)| a.point.y().total_cmp(&b.point.y()));

    let mut groups: Vec<PointEvents> = vec![];
    for (rank, event) in by_y {
        match groups.last_mut() {
            Some(g) if g.point.approx_eq(&event.point, eps) => {
                g.rank = g.rank.min(rank);
                g.add(event);
            }
            _ => {
                let mut g = PointEvents::new(event.point, rank);
                g.add(event);
                groups.push(g);
            }
        }
    }
    groups.sort_by_key(|g| g.rank);
    groups
}
