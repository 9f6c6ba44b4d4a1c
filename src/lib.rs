#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

#[macro_use]
mod typed_vec;

#[cfg(any(test, feature = "arbitrary"))]
pub mod arbitrary;
pub mod contour;
pub mod event;
mod geom;
pub mod intersection;
mod num;
mod queue;
pub mod sweep;

#[cfg(feature = "generators")]
pub mod generators;

// pub so that we can use it in fuzz tests, but it's really private
#[doc(hidden)]
pub mod status;

pub use contour::{Contour, ContourIdx, Contours, Polygon};
pub use geom::{Point, Vector};
pub use num::CheapOrderedFloat;

/// Binary operations between sets.
///
/// The discriminants match the integer selectors used by the drawing tools
/// (0 for intersection through 3 for exclusive-or).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum BinaryOp {
    /// A point is in the intersection of two sets if it is in both.
    Intersection = 0,
    /// A point is in the union of two sets if it is in either one.
    Union = 1,
    /// A point is in the difference of two sets if it is in the first but not the second.
    Difference = 2,
    /// A point is in the exclusive-or of two sets if it is in one or the other, but not both.
    Xor = 3,
}

/// Which of the two inputs of a boolean operation we're talking about.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Operand {
    /// The first input.
    Subject,
    /// The second input.
    Clipping,
}

/// Identifies one ring of the input.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RingLocation {
    /// The input that the ring belongs to.
    pub operand: Operand,
    /// The index of the ring within that input.
    pub ring: usize,
}

impl std::fmt::Display for RingLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operand = match self.operand {
            Operand::Subject => "subject",
            Operand::Clipping => "clipping",
        };
        write!(f, "ring {} of the {operand} polygon", self.ring)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// The input points were faulty, or the output couldn't be assembled.
pub enum Error {
    /// At least one of the inputs was infinite.
    Infinity,
    /// At least one of the inputs was not a number.
    NaN,
    /// A ring's last point wasn't the same as its first point.
    NonClosedRing(RingLocation),
    /// A ring had fewer than three vertices.
    TooFewPoints(RingLocation),
    /// The result edges didn't join up into closed contours.
    ///
    /// This shouldn't happen for valid inputs, but it can if the input has
    /// points that are supposed to be the same but differ by rounding errors.
    UnclosedContour,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Infinity => write!(f, "one of the inputs was infinite"),
            Error::NaN => write!(f, "one of the inputs had a NaN"),
            Error::NonClosedRing(loc) => write!(f, "{loc} isn't closed"),
            Error::TooFewPoints(loc) => write!(f, "{loc} has fewer than three vertices"),
            Error::UnclosedContour => write!(f, "failed to close an output contour"),
        }
    }
}

impl std::error::Error for Error {}

fn collect_rings<P: Into<Point>>(
    rings: impl IntoIterator<Item = impl IntoIterator<Item = P>>,
    operand: Operand,
) -> Result<Vec<Vec<Point>>, Error> {
    let mut ret = Vec::new();
    for (idx, ring) in rings.into_iter().enumerate() {
        let ring: Vec<Point> = ring.into_iter().map(Into::into).collect();
        if ring.iter().any(|p| p.x.is_nan() || p.y.is_nan()) {
            return Err(Error::NaN);
        }
        if !ring.iter().all(Point::is_finite) {
            return Err(Error::Infinity);
        }

        let Some((first, last)) = ring.first().zip(ring.last()) else {
            // Empty rings are fine, they just don't do anything.
            continue;
        };
        let loc = RingLocation { operand, ring: idx };
        if first != last {
            return Err(Error::NonClosedRing(loc));
        }
        if ring.len() < 4 {
            return Err(Error::TooFewPoints(loc));
        }
        ret.push(ring);
    }
    Ok(ret)
}

/// Computes a boolean operation between two polygons.
///
/// Each polygon is given as a collection of closed rings (the last point of
/// each ring must be equal to the first), and anything that can be converted
/// to a [`Point`] can be used as a point. A polygon's rings are combined with
/// the even-odd rule: holes are just rings inside other rings, and their
/// orientation doesn't matter.
///
/// Points are compared exactly, with no tolerance: two vertices that are meant
/// to coincide need to be bit-for-bit equal. Rings must not intersect themselves.
///
/// ```
/// use sweepclip::{binary_op, BinaryOp, Point};
///
/// let a = [[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]];
/// let b = [[(2.0, 2.0), (6.0, 2.0), (6.0, 6.0), (2.0, 6.0), (2.0, 2.0)]];
/// let out = binary_op(a, b, BinaryOp::Intersection).unwrap();
/// assert_eq!(out.area(), 4.0);
/// assert_eq!(out.rings()[0][0], Point::new(2.0, 2.0));
/// ```
pub fn binary_op<P: Into<Point>>(
    subject: impl IntoIterator<Item = impl IntoIterator<Item = P>>,
    clipping: impl IntoIterator<Item = impl IntoIterator<Item = P>>,
    op: BinaryOp,
) -> Result<Contours, Error> {
    let subject = collect_rings(subject, Operand::Subject)?;
    let clipping = collect_rings(clipping, Operand::Clipping)?;
    log::debug!(
        "{op:?} of {} subject rings and {} clipping rings",
        subject.len(),
        clipping.len()
    );

    let trivially_empty = match op {
        BinaryOp::Intersection => subject.is_empty() || clipping.is_empty(),
        BinaryOp::Difference => subject.is_empty(),
        BinaryOp::Union | BinaryOp::Xor => false,
    };
    if trivially_empty {
        return Ok(Contours::default());
    }

    let mut sweep = sweep::Sweep::new(&subject, &clipping, op);
    let sorted_events = sweep.subdivide();
    log::debug!(
        "swept {} of {} events",
        sorted_events.len(),
        sweep.events().len()
    );
    let mut events = sweep.into_events();
    let contours = contour::connect_edges(&mut events, &sorted_events)?;

    #[cfg(feature = "debug-svg")]
    {
        if let Err(e) = svg::save("out.svg", &contours.dump_svg()) {
            log::warn!("failed to write out.svg: {e}");
        }
    }

    Ok(contours)
}

fn path_to_rings(path: &kurbo::BezPath, tolerance: f64) -> Vec<Vec<Point>> {
    fn finish(ring: &mut Vec<Point>, rings: &mut Vec<Vec<Point>>) {
        if let Some(&first) = ring.first() {
            if ring.last() != Some(&first) {
                ring.push(first);
            }
        }
        let ring = std::mem::take(ring);
        // Subpaths with fewer than three vertices don't enclose anything.
        if ring.len() >= 4 {
            rings.push(ring);
        }
    }

    let mut rings = Vec::new();
    let mut ring = Vec::new();
    kurbo::flatten(path.iter(), tolerance, |el| match el {
        kurbo::PathEl::MoveTo(p) => {
            finish(&mut ring, &mut rings);
            ring.push(p.into());
        }
        kurbo::PathEl::LineTo(p) => ring.push(p.into()),
        kurbo::PathEl::ClosePath => finish(&mut ring, &mut rings),
        // Flattening only produces the three elements above.
        _ => {}
    });
    finish(&mut ring, &mut rings);
    rings
}

/// Computes a boolean operation between two sets described by Bézier paths.
///
/// Curves are approximated by line segments, with the accuracy given by
/// `tolerance`. Every subpath is treated as closed, whether or not it ends
/// with a `ClosePath`.
pub fn binary_op_paths(
    set_a: &kurbo::BezPath,
    set_b: &kurbo::BezPath,
    op: BinaryOp,
    tolerance: f64,
) -> Result<Contours, Error> {
    binary_op(
        path_to_rings(set_a, tolerance),
        path_to_rings(set_b, tolerance),
        op,
    )
}
