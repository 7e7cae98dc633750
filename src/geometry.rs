//! Tolerance aware segment predicates used by the sweep.
//!
//! Exact intersection is delegated to [`line_intersection`]; the
//! tolerance only kicks in for configurations the exact test rejects
//! but which are within `eps` of touching.
//!
//! [`line_intersection`]: geo::algorithm::line_intersection::line_intersection
use geo::line_intersection::{line_intersection, LineIntersection};

use crate::{
    events::{tolerance, SweepPoint},
    segment::Segment,
};

/// Result of intersecting two segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intersection {
    None,
    Point(SweepPoint),
    /// Collinear overlap; the two end points are ordered.
    Overlap(SweepPoint, SweepPoint),
}

impl Intersection {
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Intersection::None)
    }

    /// The points to register for this intersection: the point itself,
    /// or both ends of an overlap.
    pub fn points(&self) -> impl Iterator<Item = SweepPoint> {
        let (a, b) = match *self {
            Intersection::None => (None, None),
            Intersection::Point(p) => (Some(p), None),
            Intersection::Overlap(p, q) => (Some(p), Some(q)),
        };
        a.into_iter().chain(b)
    }
}

/// Checks if `p` lies on `segment`, up to `eps`.
///
/// The distance is measured along `y` for non-vertical segments, the
/// same measure the active-segment ordering uses.
pub fn incident(segment: &Segment, p: SweepPoint, eps: f64) -> bool {
    let (s, e) = (segment.start(), segment.end());
    let x_tol = tolerance(eps, p.x());
    if p.x() < s.x() - x_tol || p.x() > e.x() + x_tol {
        return false;
    }
    let y_tol = tolerance(eps, p.y());
    if segment.is_vertical(eps) {
        let (lo, hi) = y_range(segment);
        return p.y() >= lo - y_tol && p.y() <= hi + y_tol;
    }
    (segment.y_at(p.x()) - p.y()).abs() <= y_tol
}

/// Intersect two segments.
pub fn intersect(a: &Segment, b: &Segment, eps: f64) -> Intersection {
    if a.is_vertical(eps) && b.is_vertical(eps) {
        return vertical_overlap(a, b, eps);
    }
    match line_intersection(a.line(), b.line()) {
        Some(LineIntersection::SinglePoint { intersection, .. }) => {
            Intersection::Point(intersection.into())
        }
        Some(LineIntersection::Collinear { intersection }) => {
            let p: SweepPoint = intersection.start.into();
            let q: SweepPoint = intersection.end.into();
            let (p, q) = if p <= q { (p, q) } else { (q, p) };
            if p.approx_eq(&q, eps) {
                Intersection::Point(p)
            } else {
                Intersection::Overlap(p, q)
            }
        }
        None => touching(a, b, eps),
    }
}

/// The `y` range covered by a vertical segment.
fn y_range(segment: &Segment) -> (f64, f64) {
    let (s, e) = (segment.start().y(), segment.end().y());
    if s <= e {
        (s, e)
    } else {
        (e, s)
    }
}

/// Intersect two vertical (possibly zero length) segments.
fn vertical_overlap(a: &Segment, b: &Segment, eps: f64) -> Intersection {
    let x = a.start().x();
    if (x - b.start().x()).abs() > eps {
        return Intersection::None;
    }
    let (alo, ahi) = y_range(a);
    let (blo, bhi) = y_range(b);
    let (lo, hi) = (alo.max(blo), ahi.min(bhi));
    if lo > hi + eps {
        Intersection::None
    } else if hi - lo <= eps {
        Intersection::Point(SweepPoint::new(x, lo))
    } else {
        Intersection::Overlap(SweepPoint::new(x, lo), SweepPoint::new(x, hi))
    }
}

/// Fallback for segments that miss each other by at most `eps`: an
/// end point of one lying on the other counts as an intersection.
fn touching(a: &Segment, b: &Segment, eps: f64) -> Intersection {
    let candidates = [
        (a.start(), b),
        (a.end(), b),
        (b.start(), a),
        (b.end(), a),
    ];
    let mut found: Option<SweepPoint> = None;
    for (p, other) in candidates {
        if !incident(other, p, eps) {
            continue;
        }
        match found {
            None => found = Some(p),
            Some(q) if !q.approx_eq(&p, eps) => {
                let (p, q) = if q <= p { (q, p) } else { (p, q) };
                return Intersection::Overlap(p, q);
            }
            _ => {}
        }
    }
    found.map_or(Intersection::None, Intersection::Point)
}

#[cfg(test)]
mod tests {
    use geo::Line;

    use super::*;

    const EPS: f64 = 1e-6;

    fn seg(i: usize, l: [(f64, f64); 2]) -> Segment {
        Segment::from(Line::from(l)).with_index(i)
    }

    #[test]
    fn test_intersect() {
        let a = seg(0, [(0., 0.), (2., 2.)]);
        let b = seg(1, [(0., 2.), (2., 0.)]);
        match intersect(&a, &b, EPS) {
            Intersection::Point(p) => assert!(p.approx_eq(&SweepPoint::new(1., 1.), 1e-12)),
            other => panic!("expected a point, got {:?}", other),
        }

        let c = seg(2, [(0., 0.), (4., 0.)]);
        let d = seg(3, [(0., 1.), (4., 1.)]);
        assert!(intersect(&c, &d, EPS).is_none());

        let e = seg(4, [(1., 1.), (3., 3.)]);
        assert_eq!(
            intersect(&a, &e, EPS),
            Intersection::Overlap(SweepPoint::new(1., 1.), SweepPoint::new(2., 2.))
        );
        assert_eq!(intersect(&a, &e, EPS).points().count(), 2);
    }

    #[test]
    fn test_touching() {
        // End point of `b` on the interior of `a`.
        let a = seg(0, [(0., 0.), (2., 2.)]);
        let b = seg(1, [(1., 1.), (3., 0.)]);
        assert_eq!(
            intersect(&a, &b, EPS),
            Intersection::Point(SweepPoint::new(1., 1.))
        );

        // Misses by less than `eps`.
        let c = seg(2, [(1., 1. + 1e-9), (3., 5.)]);
        assert_eq!(
            intersect(&a, &c, EPS),
            Intersection::Point(SweepPoint::new(1., 1. + 1e-9))
        );
    }

    #[test]
    fn test_incident() {
        let a = seg(0, [(0., 0.), (2., 2.)]);
        assert!(incident(&a, SweepPoint::new(1., 1.), EPS));
        assert!(incident(&a, SweepPoint::new(2., 2.), EPS));
        assert!(!incident(&a, SweepPoint::new(3., 3.), EPS));
        assert!(!incident(&a, SweepPoint::new(1., 1.1), EPS));

        let v = seg(1, [(1., 0.), (1., 2.)]);
        assert!(incident(&v, SweepPoint::new(1., 1.), EPS));
        assert!(!incident(&v, SweepPoint::new(1., 2.5), EPS));
    }

    #[test]
    fn test_vertical_pairs() {
        let v = seg(0, [(1., 0.), (1., 2.)]);
        let w = seg(1, [(1., 1.), (1., 5.)]);
        let u = seg(2, [(1., 2.), (1., 3.)]);
        let far = seg(3, [(2., 0.), (2., 2.)]);
        let dot = seg(4, [(1., 0.5), (1., 0.5)]);

        assert_eq!(
            intersect(&v, &w, EPS),
            Intersection::Overlap(SweepPoint::new(1., 1.), SweepPoint::new(1., 2.))
        );
        assert_eq!(
            intersect(&v, &u, EPS),
            Intersection::Point(SweepPoint::new(1., 2.))
        );
        assert!(intersect(&v, &far, EPS).is_none());
        assert_eq!(
            intersect(&v, &dot, EPS),
            Intersection::Point(SweepPoint::new(1., 0.5))
        );
    }
}
