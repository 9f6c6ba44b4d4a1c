//! Geometric primitives, like points and their orientation predicates.

use std::cmp::Ordering;

use crate::num::CheapOrderedFloat;

/// A two-dimensional point.
///
/// Points are sorted by `x` and then by `y`, for the convenience of our sweep-line
/// algorithm (which moves in increasing `x`).
///
/// Equality is exact: two points are the same only if both coordinates are
/// bit-for-bit equal (up to the sign of zero). The clipping algorithm is
/// designed around this, so there is deliberately no epsilon anywhere.
#[derive(Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// Horizontal coordinate; the sweep line moves in increasing `x`.
    pub x: f64,
    /// Vertical coordinate.
    ///
    /// Although it isn't important for functionality, the documentation assumes
    /// that larger values are up (so that counter-clockwise has positive area).
    pub y: f64,
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (
            CheapOrderedFloat::from(self.x),
            CheapOrderedFloat::from(self.y),
        )
            .cmp(&(
                CheapOrderedFloat::from(other.x),
                CheapOrderedFloat::from(other.y),
            ))
    }
}

impl PartialOrd for Point {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for Point {}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Is each coordinate finite?
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Returns `self + t * dir`.
    pub fn offset(&self, t: f64, dir: Vector) -> Self {
        Point {
            x: self.x + t * dir.x,
            y: self.y + t * dir.y,
        }
    }

    /// The vector pointing from `self` to `other`.
    pub fn to(&self, other: &Point) -> Vector {
        Vector {
            x: other.x - self.x,
            y: other.y - self.y,
        }
    }

    /// Converts to a `kurbo` point.
    pub fn to_kurbo(self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<kurbo::Point> for Point {
    fn from(p: kurbo::Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

/// A displacement between two points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Vector {
    /// The z-component of the three-dimensional cross product.
    pub fn cross(&self, other: &Vector) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// The dot product.
    pub fn dot(&self, other: &Vector) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Is this exactly the zero vector?
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Twice the signed area of the triangle `p0, p1, p2`.
///
/// This is positive if the triangle winds counter-clockwise (with `y` pointing up),
/// negative if it winds clockwise and exactly zero if the points are collinear.
pub fn signed_area(p0: &Point, p1: &Point, p2: &Point) -> f64 {
    (p0.x - p2.x) * (p1.y - p2.y) - (p1.x - p2.x) * (p0.y - p2.y)
}

/// The signed area enclosed by a closed ring of points.
///
/// The ring may or may not repeat its first point at the end; either way the
/// closing edge is accounted for. Counter-clockwise rings have positive area.
pub fn ring_area(points: &[Point]) -> f64 {
    let Some(first) = points.first() else {
        return 0.0;
    };
    let mut twice_area = 0.0;
    for (p, q) in points.iter().zip(points.iter().skip(1).chain(Some(first))) {
        twice_area += p.x * q.y - q.x * p.y;
    }
    twice_area / 2.0
}

/// Orders `a` and `b` by the clockwise angle that takes `start` to them.
///
/// Angles are measured in `(0, 2π]`, so a vector pointing the same way as
/// `start` comes after everything else.
pub fn cmp_clockwise_from(start: &Vector, a: &Vector, b: &Vector) -> Ordering {
    // Is the clockwise angle from `start` to `v` at most π?
    let first_half = |v: &Vector| {
        let c = start.cross(v);
        c < 0.0 || (c == 0.0 && start.dot(v) < 0.0)
    };
    match (first_half(a), first_half(b)) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.cross(b).partial_cmp(&0.0).unwrap_or(Ordering::Equal),
    }
}

/// The smallest rectangle containing all of the points.
///
/// Returns `None` if there are no points.
pub fn bounding_box<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<kurbo::Rect> {
    let mut points = points.into_iter();
    let first = points.next()?.to_kurbo();
    Some(points.fold(kurbo::Rect::from_points(first, first), |rect, p| {
        rect.union_pt(p.to_kurbo())
    }))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::num::tests::Reasonable;
    use proptest::prelude::*;

    impl Reasonable for Point {
        type Strategy = BoxedStrategy<Point>;

        fn reasonable() -> Self::Strategy {
            (f64::reasonable(), f64::reasonable())
                .prop_map(|(x, y)| Point::new(x, y))
                .boxed()
        }
    }

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn sweep_order() {
        assert!(p(0.0, 5.0) < p(1.0, 0.0));
        assert!(p(1.0, 0.0) < p(1.0, 2.0));
        assert_eq!(p(1.0, 2.0).cmp(&p(1.0, 2.0)), std::cmp::Ordering::Equal);
    }

    #[test]
    fn orientation() {
        assert!(signed_area(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, 1.0)) > 0.0);
        assert!(signed_area(&p(0.0, 0.0), &p(0.0, 1.0), &p(1.0, 0.0)) < 0.0);
        assert_eq!(signed_area(&p(0.0, 0.0), &p(1.0, 1.0), &p(3.0, 3.0)), 0.0);
    }

    #[test]
    fn ring_areas() {
        let ccw = [p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0), p(0.0, 0.0)];
        assert_eq!(ring_area(&ccw), 16.0);
        // The closing point is optional.
        assert_eq!(ring_area(&ccw[..4]), 16.0);

        let mut cw = ccw;
        cw.reverse();
        assert_eq!(ring_area(&cw), -16.0);
        assert_eq!(ring_area(&[]), 0.0);
    }

    #[test]
    fn clockwise_order() {
        let v = |x: f64, y: f64| Vector { x, y };
        let west = v(-1.0, 0.0);
        let mut dirs = vec![v(0.0, -1.0), v(-2.0, 0.0), v(1.0, 0.0), v(1.0, 1.0), v(0.0, 1.0)];
        dirs.sort_by(|a, b| cmp_clockwise_from(&west, a, b));
        assert_eq!(
            dirs,
            vec![v(0.0, 1.0), v(1.0, 1.0), v(1.0, 0.0), v(0.0, -1.0), v(-2.0, 0.0)]
        );
    }

    #[test]
    fn bbox() {
        let pts = [p(1.0, 5.0), p(-2.0, 3.0), p(4.0, -1.0)];
        assert_eq!(
            bounding_box(&pts),
            Some(kurbo::Rect::new(-2.0, -1.0, 4.0, 5.0))
        );
        assert_eq!(bounding_box(&[] as &[Point]), None);
    }

    fn small_int_point() -> impl Strategy<Value = Point> {
        (-1000i32..1000, -1000i32..1000).prop_map(|(x, y)| Point::new(x.into(), y.into()))
    }

    proptest! {
        #[test]
        fn signed_area_is_antisymmetric(a in small_int_point(), b in small_int_point(), c in small_int_point()) {
            // Integer coordinates this small make every product exact.
            prop_assert_eq!(signed_area(&a, &b, &c), -signed_area(&b, &a, &c));
            prop_assert_eq!(signed_area(&a, &b, &c), signed_area(&b, &c, &a));
        }

        #[test]
        fn bounding_box_contains_points(pts in prop::collection::vec(Point::reasonable(), 1..20)) {
            let rect = bounding_box(&pts).unwrap();
            for p in &pts {
                prop_assert!(rect.x0 <= p.x && p.x <= rect.x1);
                prop_assert!(rect.y0 <= p.y && p.y <= rect.y1);
            }
        }
    }
}
