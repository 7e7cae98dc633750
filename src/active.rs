use std::{cmp::Ordering, collections::HashMap};

use log::trace;

use crate::{
    config::SweepConfig,
    events::{tolerance, SweepPoint},
    geometry::incident,
    segment::Segment,
    splay::{NodeId, SplayList},
};

/// Position of the sweep line, passed to every ordering call on
/// [`ActiveSegments`].
///
/// Active segments are ordered just right of `x`; see
/// [`Segment::cmp_at`]. `eps` is the incidence tolerance, `order_eps`
/// the (tighter) one below which two segments meet at the sweep line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepContext {
    pub x: f64,
    pub eps: f64,
    pub order_eps: f64,
}

impl SweepContext {
    pub fn new(x: f64, config: &SweepConfig) -> Self {
        SweepContext {
            x,
            eps: config.eps,
            order_eps: config.order_eps,
        }
    }

    #[inline]
    pub fn cmp(&self, a: &Segment, b: &Segment) -> Ordering {
        a.cmp_at(b, self.x, self.order_eps)
    }

    /// Where `seg` lies relative to `p`: `Less` if above it, `Greater`
    /// if below, `Equal` if it passes through it.
    #[inline]
    fn cmp_point(&self, seg: &Segment, p: SweepPoint) -> Ordering {
        let y = seg.y_at(p.x());
        if (y - p.y()).abs() <= tolerance(self.eps, p.y()) {
            Ordering::Equal
        } else {
            p.y().total_cmp(&y)
        }
    }
}

/// The segments crossing the sweep line, top to bottom.
///
/// Stores segment keys (positions in the sweep's segment storage) in
/// a [`SplayList`], and remembers the node of every active key.
#[derive(Debug, Default)]
pub struct ActiveSegments {
    list: SplayList<usize>,
    handles: HashMap<usize, NodeId>,
}

impl ActiveSegments {
    pub fn with_capacity(size: usize) -> Self {
        ActiveSegments {
            list: SplayList::with_capacity(size),
            handles: HashMap::with_capacity(size),
        }
    }

    #[inline]
    pub fn contains(&self, key: usize) -> bool {
        self.handles.contains_key(&key)
    }

    /// Add the segment at `key`, ordered at `ctx`.
    pub fn insert(&mut self, key: usize, segments: &[Segment], ctx: SweepContext) {
        assert!(!self.contains(key), "segment {} is already active", key);
        let id = self
            .list
            .insert_by(key, |a, b| ctx.cmp(&segments[*a], &segments[*b]));
        trace!("activate segment {} at x = {}", key, ctx.x);
        self.handles.insert(key, id);
    }

    /// Remove the segment at `key`; returns `false` if it wasn't
    /// active.
    pub fn remove(&mut self, key: usize) -> bool {
        match self.handles.remove(&key) {
            Some(id) => {
                self.list.remove(id);
                trace!("deactivate segment {}", key);
                true
            }
            None => false,
        }
    }

    /// The segment directly above `key`.
    pub fn prev_key(&self, key: usize) -> Option<usize> {
        let id = *self.handles.get(&key)?;
        self.list.prev(id).map(|p| *self.list.get(p))
    }

    /// The segment directly below `key`.
    pub fn next_key(&self, key: usize) -> Option<usize> {
        let id = *self.handles.get(&key)?;
        self.list.next(id).map(|n| *self.list.get(n))
    }

    /// The segments directly above and below `p`, ignoring those
    /// passing through it.
    pub fn neighbours_of(
        &mut self,
        p: SweepPoint,
        segments: &[Segment],
        ctx: SweepContext,
    ) -> (Option<usize>, Option<usize>) {
        let (above, _) = self
            .list
            .partition_by(|k| match ctx.cmp_point(&segments[*k], p) {
                Ordering::Less => Ordering::Less,
                _ => Ordering::Greater,
            });
        let (_, below) = self
            .list
            .partition_by(|k| match ctx.cmp_point(&segments[*k], p) {
                Ordering::Greater => Ordering::Greater,
                _ => Ordering::Less,
            });
        (
            above.map(|id| *self.list.get(id)),
            below.map(|id| *self.list.get(id)),
        )
    }

    /// All active segments passing through `p`, top to bottom.
    pub fn segments_at(
        &mut self,
        p: SweepPoint,
        segments: &[Segment],
        ctx: SweepContext,
    ) -> Vec<usize> {
        let (_, first) = self
            .list
            .partition_by(|k| ctx.cmp_point(&segments[*k], p));
        let mut found = vec![];
        let mut cur = first;
        while let Some(id) = cur {
            let key = *self.list.get(id);
            if !incident(&segments[key], p, ctx.eps) {
                break;
            }
            found.push(key);
            cur = self.list.next(id);
        }
        found
    }

    /// Active segments whose `y` at `x` lies in `[lo, hi]` (extended
    /// by `eps`), top to bottom.
    pub fn range_y(
        &mut self,
        x: f64,
        lo: f64,
        hi: f64,
        segments: &[Segment],
        ctx: SweepContext,
    ) -> Vec<usize> {
        let (_, first) = self
            .list
            .partition_by(|k| hi.total_cmp(&(segments[*k].y_at(x) - ctx.eps)));
        let mut found = vec![];
        let mut cur = first;
        while let Some(id) = cur {
            let key = *self.list.get(id);
            if segments[key].y_at(x) < lo - ctx.eps {
                break;
            }
            found.push(key);
            cur = self.list.next(id);
        }
        found
    }

    /// Snapshot of the active keys, top to bottom.
    #[cfg(test)]
    pub fn order(&self) -> Vec<usize> {
        self.list.iter().map(|(_, k)| *k).collect()
    }

    /// Check that the active keys are strictly ordered at `ctx`.
    pub fn check_order(&self, segments: &[Segment], ctx: SweepContext) -> Result<(), String> {
        self.list
            .check_invariants(|a, b| ctx.cmp(&segments[*a], &segments[*b]))
    }
}
