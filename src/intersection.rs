//! Exact intersection of two line segments.
//!
//! "Exact" is a bit of a stretch: the crossing point of two general segments
//! usually isn't representable, and we round it like anyone else. What we do
//! guarantee is that we never round when we don't need to. If the crossing is
//! at an endpoint of either segment, that endpoint is returned as-is. If either
//! segment is horizontal or vertical, the crossing point lies exactly on it. The
//! sweep compares points with `==`, so these guarantees are what keeps it from
//! seeing two nearly-identical points where there should be one.

use crate::geom::{Point, Vector};

/// How two segments intersect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Intersection {
    /// They don't.
    None,
    /// They meet at a single point.
    Point(Point),
    /// They're collinear and share the part between these two points.
    ///
    /// The two points are distinct, and ordered along the first segment.
    Overlap(Point, Point),
}

/// Intersects the segment `a1 -> a2` with the segment `b1 -> b2`.
///
/// If `no_endpoint_touch` is true, intersections that consist only of
/// endpoints touching are reported as [`Intersection::None`].
///
/// A segment with both endpoints equal is treated as a point: it intersects
/// the other segment if it lies on it, and it never overlaps anything.
pub fn intersection(
    a1: Point,
    a2: Point,
    b1: Point,
    b2: Point,
    no_endpoint_touch: bool,
) -> Intersection {
    let va = a1.to(&a2);
    let vb = b1.to(&b2);

    if va.is_zero() || vb.is_zero() {
        return degenerate_intersection(a1, a2, b1, b2, no_endpoint_touch);
    }

    let e = a1.to(&b1);
    let kross = va.cross(&vb);

    if kross != 0.0 {
        // Non-parallel segments sharing an endpoint meet only there.
        if a1 == b1 || a1 == b2 {
            return touch(a1, no_endpoint_touch);
        }
        if a2 == b1 || a2 == b2 {
            return touch(a2, no_endpoint_touch);
        }

        // The lines cross; find where along each segment.
        let s = e.cross(&vb) / kross;
        if !(0.0..=1.0).contains(&s) {
            return Intersection::None;
        }
        let t = e.cross(&va) / kross;
        if !(0.0..=1.0).contains(&t) {
            return Intersection::None;
        }

        if s == 0.0 || s == 1.0 {
            return touch(if s == 0.0 { a1 } else { a2 }, no_endpoint_touch);
        }
        if t == 0.0 || t == 1.0 {
            return touch(if t == 0.0 { b1 } else { b2 }, no_endpoint_touch);
        }
        return Intersection::Point(snap(a1.offset(s, va), a1, va, b1, vb));
    }

    if e.cross(&va) != 0.0 {
        // Parallel, but not on the same line.
        return Intersection::None;
    }

    // Collinear: project b onto a, so that a runs from 0 to 1.
    let sqr_len_a = va.dot(&va);
    let sa = va.dot(&e) / sqr_len_a;
    let sb = sa + va.dot(&vb) / sqr_len_a;
    let ((smin, pmin), (smax, pmax)) = if sa <= sb {
        ((sa, b1), (sb, b2))
    } else {
        ((sb, b2), (sa, b1))
    };

    if smin > 1.0 || smax < 0.0 {
        return Intersection::None;
    }

    let start = if smin > 0.0 { pmin } else { a1 };
    let end = if smax < 1.0 { pmax } else { a2 };
    if smin == 1.0 {
        return touch(a2, no_endpoint_touch);
    }
    if smax == 0.0 {
        return touch(a1, no_endpoint_touch);
    }
    if no_endpoint_touch && smin == 0.0 && smax == 1.0 {
        return Intersection::None;
    }
    Intersection::Overlap(start, end)
}

fn touch(p: Point, no_endpoint_touch: bool) -> Intersection {
    if no_endpoint_touch {
        Intersection::None
    } else {
        Intersection::Point(p)
    }
}

// Puts a computed crossing point exactly on any axis-aligned input segment.
fn snap(mut p: Point, a1: Point, va: Vector, b1: Point, vb: Vector) -> Point {
    for (q, v) in [(a1, va), (b1, vb)] {
        if v.x == 0.0 {
            p.x = q.x;
        }
        if v.y == 0.0 {
            p.y = q.y;
        }
    }
    p
}

fn degenerate_intersection(
    a1: Point,
    a2: Point,
    b1: Point,
    b2: Point,
    no_endpoint_touch: bool,
) -> Intersection {
    // Every point of a degenerate segment is one of its endpoints.
    if no_endpoint_touch {
        return Intersection::None;
    }
    let (p, q1, q2) = if a1 == a2 { (a1, b1, b2) } else { (b1, a1, a2) };
    if on_segment(p, q1, q2) {
        Intersection::Point(p)
    } else {
        Intersection::None
    }
}

fn on_segment(p: Point, q1: Point, q2: Point) -> bool {
    let v = q1.to(&q2);
    let w = q1.to(&p);
    if v.is_zero() {
        return p == q1;
    }
    v.cross(&w) == 0.0 && (0.0..=v.dot(&v)).contains(&v.dot(&w))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn crossing() {
        assert_eq!(
            intersection(p(0.0, 0.0), p(2.0, 2.0), p(0.0, 2.0), p(2.0, 0.0), false),
            Intersection::Point(p(1.0, 1.0))
        );
    }

    #[test]
    fn disjoint() {
        assert_eq!(
            intersection(p(0.0, 0.0), p(1.0, 1.0), p(3.0, 0.0), p(2.0, 1.0), false),
            Intersection::None
        );
        // Parallel.
        assert_eq!(
            intersection(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0), p(1.0, 1.0), false),
            Intersection::None
        );
        // Collinear but separate.
        assert_eq!(
            intersection(p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(3.0, 0.0), false),
            Intersection::None
        );
    }

    #[test]
    fn endpoint_touch() {
        let a1 = p(0.0, 0.0);
        let a2 = p(1.0, 1.0);
        let b2 = p(2.0, 0.0);
        assert_eq!(
            intersection(a1, a2, a2, b2, false),
            Intersection::Point(a2)
        );
        assert_eq!(intersection(a1, a2, a2, b2, true), Intersection::None);

        // T-junction: b ends in the middle of a.
        let t = intersection(p(0.0, 0.0), p(4.0, 0.0), p(2.0, 3.0), p(2.0, 0.0), false);
        assert_eq!(t, Intersection::Point(p(2.0, 0.0)));
    }

    #[test]
    fn endpoints_are_not_recomputed() {
        // Recomputing a shared endpoint from the parametrization of either
        // segment would round it.
        let a1 = p(0.1, 0.1);
        let a2 = p(0.7, 0.3);
        let b1 = p(0.3, 0.1);
        assert_eq!(
            intersection(a1, a2, b1, a2, false),
            Intersection::Point(a2)
        );
        assert_eq!(
            intersection(b1, a2, a1, a2, false),
            Intersection::Point(a2)
        );

        // A T-junction at a point that isn't a multiple of anything nice.
        let b2 = p(0.3, 0.1 + 0.2 / 3.0);
        let b3 = p(0.9, 0.1 + 0.2 / 3.0);
        assert_eq!(
            intersection(p(0.3, 0.0), b2, p(0.1, 0.1 + 0.2 / 3.0), b3, false),
            Intersection::Point(b2)
        );
    }

    #[test]
    fn axis_aligned_crossing_is_exact() {
        let i = intersection(p(0.1, 0.3), p(0.9, 0.7), p(0.3, 0.0), p(0.3, 1.0), false);
        assert_matches!(i, Intersection::Point(q) if q.x == 0.3);

        let i = intersection(p(0.1, 0.3), p(0.9, 0.7), p(0.0, 0.6), p(1.0, 0.6), false);
        assert_matches!(i, Intersection::Point(q) if q.y == 0.6);
    }

    #[test]
    fn overlap() {
        assert_eq!(
            intersection(p(0.0, 0.0), p(4.0, 0.0), p(2.0, 0.0), p(6.0, 0.0), false),
            Intersection::Overlap(p(2.0, 0.0), p(4.0, 0.0))
        );
        // The overlap is ordered along the first segment, even if the second
        // one runs backwards.
        assert_eq!(
            intersection(p(0.0, 0.0), p(4.0, 4.0), p(3.0, 3.0), p(1.0, 1.0), false),
            Intersection::Overlap(p(1.0, 1.0), p(3.0, 3.0))
        );
        // Containment.
        assert_eq!(
            intersection(p(0.0, 0.0), p(4.0, 0.0), p(-1.0, 0.0), p(5.0, 0.0), false),
            Intersection::Overlap(p(0.0, 0.0), p(4.0, 0.0))
        );
        // Identical segments are an endpoint touch on both ends.
        assert_eq!(
            intersection(p(0.0, 0.0), p(4.0, 0.0), p(0.0, 0.0), p(4.0, 0.0), true),
            Intersection::None
        );
    }

    #[test]
    fn collinear_touch() {
        assert_eq!(
            intersection(p(0.0, 0.0), p(1.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), false),
            Intersection::Point(p(1.0, 0.0))
        );
        assert_eq!(
            intersection(p(1.0, 0.0), p(2.0, 0.0), p(0.0, 0.0), p(1.0, 0.0), false),
            Intersection::Point(p(1.0, 0.0))
        );
    }

    #[test]
    fn zero_length() {
        let on = p(1.0, 1.0);
        let off = p(1.0, 2.0);
        assert_eq!(
            intersection(on, on, p(0.0, 0.0), p(2.0, 2.0), false),
            Intersection::Point(on)
        );
        assert_eq!(
            intersection(p(0.0, 0.0), p(2.0, 2.0), on, on, false),
            Intersection::Point(on)
        );
        assert_eq!(
            intersection(off, off, p(0.0, 0.0), p(2.0, 2.0), false),
            Intersection::None
        );
        assert_eq!(intersection(on, on, on, on, false), Intersection::Point(on));
        assert_eq!(intersection(on, on, off, off, false), Intersection::None);
    }

    fn small_int_point() -> impl Strategy<Value = Point> {
        (-50i32..50, -50i32..50).prop_map(|(x, y)| Point::new(x.into(), y.into()))
    }

    proptest! {
        #[test]
        fn symmetric_existence(
            a1 in small_int_point(),
            a2 in small_int_point(),
            b1 in small_int_point(),
            b2 in small_int_point(),
        ) {
            let ab = intersection(a1, a2, b1, b2, false);
            let ba = intersection(b1, b2, a1, a2, false);
            prop_assert_eq!(ab == Intersection::None, ba == Intersection::None);
            prop_assert_eq!(
                matches!(ab, Intersection::Overlap(..)),
                matches!(ba, Intersection::Overlap(..))
            );
        }

        #[test]
        fn overlap_endpoints_are_input_points(
            a1 in small_int_point(),
            a2 in small_int_point(),
            b1 in small_int_point(),
            b2 in small_int_point(),
        ) {
            if let Intersection::Overlap(p, q) = intersection(a1, a2, b1, b2, false) {
                let inputs = [a1, a2, b1, b2];
                prop_assert!(inputs.contains(&p));
                prop_assert!(inputs.contains(&q));
                prop_assert_ne!(p, q);
            }
        }
    }
}
