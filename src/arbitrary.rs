//! Utilities for fuzz and/or property testing using `arbitrary`.

use arbitrary::Unstructured;

use crate::Point;

/// Generate an arbitrary float in some range.
pub fn float_in_range(
    start: f64,
    end: f64,
    u: &mut Unstructured<'_>,
) -> Result<f64, arbitrary::Error> {
    let num: u32 = u.arbitrary()?;
    let t = num as f64 / u32::MAX as f64;
    Ok((1.0 - t) * start + t * end)
}

/// Generate an arbitrary point with both coordinates in `[-size, size]`.
///
/// With `grid` set, the coordinates are small integers instead. Integer
/// inputs produce lots of shared vertices and collinear overlaps, which are
/// the interesting cases for the sweep.
pub fn point(size: f64, grid: bool, u: &mut Unstructured<'_>) -> Result<Point, arbitrary::Error> {
    if grid {
        let size = size as i32;
        Ok(Point::new(
            u.int_in_range(-size..=size)?.into(),
            u.int_in_range(-size..=size)?.into(),
        ))
    } else {
        Ok(Point::new(
            float_in_range(-size, size, u)?,
            float_in_range(-size, size, u)?,
        ))
    }
}

/// Generate an arbitrary closed, axis-aligned rectangle.
///
/// The rectangle is never degenerate, and its orientation is random.
pub fn rectangle(
    size: f64,
    grid: bool,
    u: &mut Unstructured<'_>,
) -> Result<Vec<Point>, arbitrary::Error> {
    let p = point(size, grid, u)?;
    let mut q = point(size, grid, u)?;
    if q.x == p.x {
        q.x += 1.0;
    }
    if q.y == p.y {
        q.y += 1.0;
    }

    let mut ring = vec![
        p,
        Point::new(q.x, p.y),
        q,
        Point::new(p.x, q.y),
        p,
    ];
    if u.arbitrary()? {
        ring.reverse();
    }
    Ok(ring)
}

/// Generate an arbitrary closed star-shaped ring.
///
/// The vertices are at increasing angles around `center`, so the ring never
/// intersects itself.
pub fn star(
    center: Point,
    size: f64,
    u: &mut Unstructured<'_>,
) -> Result<Vec<Point>, arbitrary::Error> {
    let n = u.int_in_range(3..=12)?;
    let mut ring = Vec::with_capacity(n + 1);
    for i in 0..n {
        let angle = std::f64::consts::TAU * i as f64 / n as f64;
        let r = float_in_range(size / 10.0, size, u)?;
        ring.push(Point::new(
            center.x + r * angle.cos(),
            center.y + r * angle.sin(),
        ));
    }
    ring.dedup();
    if let Some(&first) = ring.first() {
        ring.push(first);
    }
    Ok(ring)
}

/// Generate an arbitrary polygon made of up to `max_rings` rectangles.
///
/// The rectangles may overlap one another, which makes them useful for
/// exercising the even-odd handling of a polygon's own rings.
pub fn rectangles(
    max_rings: usize,
    size: f64,
    grid: bool,
    u: &mut Unstructured<'_>,
) -> Result<Vec<Vec<Point>>, arbitrary::Error> {
    let n = u.int_in_range(0..=max_rings)?;
    (0..n).map(|_| rectangle(size, grid, u)).collect()
}

/// Generate an arbitrary polygon made of up to `max_rings` stars.
pub fn stars(
    max_rings: usize,
    size: f64,
    u: &mut Unstructured<'_>,
) -> Result<Vec<Vec<Point>>, arbitrary::Error> {
    let n = u.int_in_range(0..=max_rings)?;
    (0..n)
        .map(|_| {
            let center = point(size, false, u)?;
            star(center, size / 2.0, u)
        })
        .collect()
}

/// Generate an arbitrary boolean operation.
pub fn binary_op(u: &mut Unstructured<'_>) -> Result<crate::BinaryOp, arbitrary::Error> {
    use crate::BinaryOp::*;
    Ok(*u.choose(&[Intersection, Union, Difference, Xor])?)
}
