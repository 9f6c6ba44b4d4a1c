//! Assembling the result of a sweep into closed contours.
//!
//! After the sweep, every edge knows whether it bounds the result, and which
//! side of it the result is on. Here we sort the result edges, and then walk
//! them into closed rings: starting at the leftmost unvisited edge, we
//! repeatedly jump to the other end of the current edge and continue with an
//! unvisited edge leaving from that point, until we come back to where we
//! started. The walk always keeps the result on its left, so outer rings come
//! out counter-clockwise and holes clockwise.

use kurbo::BezPath;

use crate::{
    event::{EventIdx, Events, ResultTransition},
    geom::{cmp_clockwise_from, ring_area, Point},
    Error,
};

/// An index for a [`Contour`] within [`Contours`].
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, serde::Serialize)]
pub struct ContourIdx(pub usize);

/// A closed polyline in the output of a boolean operation.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Contour {
    /// The points making up this contour.
    ///
    /// The contour is closed: the last point is the same as the first one.
    /// Outer contours wind counter-clockwise and holes wind clockwise (with the
    /// y axis pointing up), so the area of the set is the sum of the signed
    /// areas of its contours.
    pub points: Vec<Point>,

    /// The holes of this contour, if it's an outer contour.
    pub hole_ids: Vec<ContourIdx>,

    /// If this contour is a hole, the outer contour that it's a hole of.
    pub hole_of: Option<ContourIdx>,

    /// How deeply nested this contour is.
    ///
    /// Outer contours that aren't inside anything have depth zero, and their
    /// holes have depth one. An outer contour sitting inside a hole has the
    /// same depth as that hole.
    pub depth: u32,
}

impl Contour {
    fn new(hole_of: Option<ContourIdx>, depth: u32) -> Self {
        Contour {
            points: Vec::new(),
            hole_ids: Vec::new(),
            hole_of,
            depth,
        }
    }

    /// Is this contour a hole in some other contour?
    pub fn is_hole(&self) -> bool {
        self.hole_of.is_some()
    }

    /// The signed area enclosed by this contour (negative for holes).
    pub fn area(&self) -> f64 {
        ring_area(&self.points)
    }

    /// Converts this contour to a closed Bézier path made of line segments.
    pub fn to_bez_path(&self) -> BezPath {
        let mut ret = BezPath::new();
        self.append_to(&mut ret);
        ret
    }

    fn append_to(&self, path: &mut BezPath) {
        let Some((first, rest)) = self.points.split_first() else {
            return;
        };
        path.move_to(first.to_kurbo());
        // The closing point is implied by `close_path`.
        let rest = rest.strip_suffix(&[*first]).unwrap_or(rest);
        for p in rest {
            path.line_to(p.to_kurbo());
        }
        path.close_path();
    }
}

/// A polygon with holes: one outer ring and any number of hole rings.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Polygon {
    /// The outer ring, counter-clockwise.
    pub outer: Vec<Point>,
    /// The holes, each one clockwise.
    pub holes: Vec<Vec<Point>>,
}

/// The output of a boolean operation: a collection of [`Contour`]s.
///
/// Can be indexed with a [`ContourIdx`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Contours {
    contours: Vec<Contour>,
}

impl Contours {
    /// Iterates over all of the contours.
    pub fn contours(&self) -> impl Iterator<Item = &Contour> + '_ {
        self.contours.iter()
    }

    /// The number of contours.
    pub fn len(&self) -> usize {
        self.contours.len()
    }

    /// Is the result empty?
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Groups the contours into polygons with holes.
    ///
    /// Every contour that isn't a hole becomes the outer ring of one polygon.
    pub fn polygons(&self) -> Vec<Polygon> {
        self.contours
            .iter()
            .filter(|c| !c.is_hole())
            .map(|c| Polygon {
                outer: c.points.clone(),
                holes: c
                    .hole_ids
                    .iter()
                    .map(|&h| self[h].points.clone())
                    .collect(),
            })
            .collect()
    }

    /// All the rings, as a flat list: each outer ring is followed by its holes.
    pub fn rings(&self) -> Vec<Vec<Point>> {
        self.polygons()
            .into_iter()
            .flat_map(|poly| std::iter::once(poly.outer).chain(poly.holes))
            .collect()
    }

    /// The total area enclosed by the contours.
    pub fn area(&self) -> f64 {
        self.contours.iter().map(Contour::area).sum()
    }

    /// Converts all the contours to a single path.
    ///
    /// Because of the contours' orientations, the path can be filled with either
    /// the even-odd or the non-zero fill rule.
    pub fn to_bez_path(&self) -> BezPath {
        let mut ret = BezPath::new();
        for c in &self.contours {
            c.append_to(&mut ret);
        }
        ret
    }

    /// Draws the contours as an SVG document, for debugging.
    #[cfg(feature = "debug-svg")]
    pub fn dump_svg(&self) -> svg::Document {
        let bbox = crate::geom::bounding_box(self.contours.iter().flat_map(|c| &c.points))
            .unwrap_or_default();
        let pad = 1.0 + bbox.width().max(bbox.height()) / 32.0;
        let stroke_width = pad / 8.0;
        let mut document = svg::Document::new().set(
            "viewBox",
            (
                bbox.x0 - pad,
                bbox.y0 - pad,
                bbox.width() + 2.0 * pad,
                bbox.height() + 2.0 * pad,
            ),
        );

        let colors = [
            "#005F73", "#0A9396", "#94D2BD", "#E9D8A6", "#EE9B00", "#CA6702", "#BB3E03",
            "#AE2012", "#9B2226",
        ];
        for (poly, color) in self.polygons().iter().zip(colors.iter().cycle()) {
            let mut data = svg::node::element::path::Data::new();
            for ring in std::iter::once(&poly.outer).chain(&poly.holes) {
                let Some((first, rest)) = ring.split_first() else {
                    continue;
                };
                data = data.move_to((first.x, first.y));
                for p in rest {
                    data = data.line_to((p.x, p.y));
                }
                data = data.close();
            }
            let path = svg::node::element::Path::new()
                .set("d", data)
                .set("stroke", "black")
                .set("stroke-width", stroke_width)
                .set("fill-rule", "evenodd")
                .set("fill", *color);
            document = document.add(path);
        }
        document
    }
}

impl std::ops::Index<ContourIdx> for Contours {
    type Output = Contour;

    fn index(&self, index: ContourIdx) -> &Self::Output {
        &self.contours[index.0]
    }
}

impl FromIterator<Contour> for Contours {
    fn from_iter<I: IntoIterator<Item = Contour>>(iter: I) -> Self {
        Contours {
            contours: iter.into_iter().collect(),
        }
    }
}

/// Picks out the events that bound the result, and sorts them.
///
/// On return, each of the returned events has `other_pos` set to the position
/// of its partner in the returned list.
pub fn order_events(events: &mut Events, sorted_events: &[EventIdx]) -> Vec<EventIdx> {
    let mut result: Vec<EventIdx> = sorted_events
        .iter()
        .copied()
        .filter(|&ev| {
            let e = &events[ev];
            let left = if e.left { e } else { &events[e.other] };
            left.result_transition != ResultTransition::None
        })
        .collect();

    // Splitting edges changes the order of events that were already popped
    // from the queue, so the order they came out in isn't good enough.
    result.sort_by(|a, b| events.compare_events(*a, *b));

    for (pos, &ev) in result.iter().enumerate() {
        events[ev].other_pos = pos;
    }
    for &ev in &result {
        if !events[ev].left {
            let other = events[ev].other;
            let tmp = events[ev].other_pos;
            events[ev].other_pos = events[other].other_pos;
            events[other].other_pos = tmp;
        }
    }

    result
}

/// Can a contour leave along the edge of `ev`, starting from `ev`'s point?
///
/// Contours keep the result on their left, so a non-vertical edge is walked
/// from left to right when the result is above it, and from right to left
/// otherwise. The sweep doesn't reliably know which side of a vertical edge
/// the result is on, so those can be walked either way.
fn leaves_from(events: &Events, ev: EventIdx) -> bool {
    let e = &events[ev];
    let left = if e.left { ev } else { e.other };
    events.is_vertical(left)
        || (events[left].result_transition == ResultTransition::OutIn) == e.left
}

/// Finds where to continue a contour after arriving at position `pos`,
/// coming from the point `from`.
///
/// The candidates are the unprocessed edges that can leave from `pos`'s
/// point, along with the edge at `orig_pos` that started the contour. Of
/// these we take the one making the sharpest left turn. That keeps the result
/// on our left, and when several contours touch at a point it stops us from
/// running from one of them into another.
///
/// Returns `None` if there's nowhere to go, which only happens if the events
/// are inconsistent.
pub fn next_pos(
    pos: usize,
    from: Point,
    result: &[EventIdx],
    events: &Events,
    processed: &[bool],
    orig_pos: usize,
) -> Option<usize> {
    let p = events[result[pos]].point;
    let mut first = pos;
    while first > 0 && events[result[first - 1]].point == p {
        first -= 1;
    }
    let mut last = pos + 1;
    while last < result.len() && events[result[last]].point == p {
        last += 1;
    }

    let back = p.to(&from);
    (first..last)
        .filter(|&q| q != pos)
        .filter(|&q| q == orig_pos || (!processed[q] && leaves_from(events, result[q])))
        .min_by(|&a, &b| {
            let a = p.to(&events.other_point(result[a]));
            let b = p.to(&events.other_point(result[b]));
            cmp_clockwise_from(&back, &a, &b)
        })
}

/// Creates a new contour, figuring out whether it's a hole from the closest
/// result edge below its first event.
///
/// If the new contour is a hole, its parent's `hole_ids` is updated to include
/// `contour_id`.
pub fn initialize_contour_from_context(
    events: &Events,
    ev: EventIdx,
    contours: &mut [Contour],
    contour_id: ContourIdx,
) -> Contour {
    let Some(prev) = events[ev].prev_in_result else {
        return Contour::new(None, 0);
    };
    let lower = events[prev]
        .output_contour
        .filter(|lower| lower.0 < contours.len());
    let Some(lower) = lower else {
        log::warn!("edge {prev:?} below {ev:?} isn't part of any contour yet");
        return Contour::new(None, 0);
    };

    let lower_depth = contours[lower.0].depth;
    if events[prev].result_transition == ResultTransition::OutIn {
        // We're inside the result just above `prev`, so we're a hole.
        if let Some(parent) = contours[lower.0].hole_of {
            // The lower contour is a hole too, so we're its sibling.
            contours[parent.0].hole_ids.push(contour_id);
            Contour::new(Some(parent), lower_depth)
        } else {
            contours[lower.0].hole_ids.push(contour_id);
            Contour::new(Some(lower), lower_depth + 1)
        }
    } else {
        Contour::new(None, lower_depth)
    }
}

/// Walks the result edges of a sweep into closed contours.
pub fn connect_edges(events: &mut Events, sorted_events: &[EventIdx]) -> Result<Contours, Error> {
    let result = order_events(events, sorted_events);
    let mut processed = vec![false; result.len()];
    let mut contours: Vec<Contour> = Vec::new();

    for i in 0..result.len() {
        let ev = result[i];
        // The lowest edge at a contour's leftmost point isn't vertical, and
        // it's the first event of that contour in sweep order.
        if processed[i] || !events[ev].left || events.is_vertical(ev) {
            continue;
        }
        let contour_id = ContourIdx(contours.len());
        let mut contour = initialize_contour_from_context(events, ev, &mut contours, contour_id);

        let orig_pos = if leaves_from(events, ev) {
            i
        } else {
            events[ev].other_pos
        };
        let mut pos = orig_pos;
        contour.points.push(events[result[pos]].point);
        // Every step visits two new events, so this is plenty.
        let mut steps_left = result.len();
        loop {
            let to = events[result[pos]].other_pos;
            for visit in [pos, to] {
                processed[visit] = true;
                events[result[visit]].output_contour = Some(contour_id);
            }
            let from = events[result[pos]].point;
            contour.points.push(events[result[to]].point);

            pos = next_pos(to, from, &result, events, &processed, orig_pos)
                .ok_or(Error::UnclosedContour)?;
            if pos == orig_pos {
                break;
            }
            steps_left = steps_left.checked_sub(1).ok_or(Error::UnclosedContour)?;
        }
        if contour.points.last() != contour.points.first() {
            return Err(Error::UnclosedContour);
        }
        contours.push(contour);
    }

    if let Some(pos) = processed.iter().position(|done| !done) {
        log::warn!(
            "result edge at {:?} didn't make it into a contour",
            events[result[pos]].point
        );
        return Err(Error::UnclosedContour);
    }

    for (idx, c) in contours.iter_mut().enumerate() {
        let area = c.area();
        let wants_positive = !c.is_hole();
        if area != 0.0 && (area > 0.0) != wants_positive {
            log::warn!("contour {idx} winds the wrong way for its nesting, reversing it");
            c.points.reverse();
        }
    }

    log::debug!(
        "assembled {} contours from {} result events",
        contours.len(),
        result.len()
    );
    Ok(Contours { contours })
}
