//! The sweep-line pass.
//!
//! The sweep visits every event in order, maintaining the set of edges that
//! cross the sweep line. Whenever two edges become neighbors on the sweep line
//! we check whether they intersect, and if they do we split them at the
//! intersection point. By the time the sweep is done, no two edges cross, and
//! every left event knows whether its edge bounds the result of the boolean
//! operation.

use crate::{
    event::{EdgeType, EventIdx, Events, ResultTransition, SweepEvent},
    geom::{bounding_box, Point},
    intersection::{intersection, Intersection},
    queue::EventQueue,
    status::StatusLine,
    BinaryOp,
};

/// What [`Sweep::possible_intersection`] found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to do: the edges are disjoint, or only share an endpoint.
    None,
    /// The edges crossed, and we split them at the crossing.
    Split,
    /// The edges overlap, starting at the same point. One of them is now
    /// non-contributing, and the other one carries both.
    Coincident,
    /// The edges overlap, starting at different points. We split them so that
    /// the overlapping parts start at the same point.
    Overlap,
}

/// State for one sweep over the edges of both polygons.
#[derive(Debug)]
pub struct Sweep {
    events: Events,
    queue: EventQueue<EventIdx>,
    status: StatusLine<EventIdx>,
    op: BinaryOp,
    // Events to the right of this can't affect the result.
    right_bound: Option<f64>,
}

/// Creates the events for all of the edges of both polygons, and queues them up.
///
/// Each ring gets its own contour id, starting from 1 for each call. Edges of
/// zero length are skipped.
pub fn fill_queue(subject: &[Vec<Point>], clipping: &[Vec<Point>]) -> (Events, EventQueue<EventIdx>) {
    let edge_count: usize = subject
        .iter()
        .chain(clipping)
        .map(|ring| ring.len().saturating_sub(1))
        .sum();
    let mut events = Events::with_capacity(2 * edge_count);
    let mut queue = EventQueue::with_capacity(2 * edge_count);

    let mut contour_id = 0;
    for (rings, is_subject) in [(subject, true), (clipping, false)] {
        for ring in rings {
            contour_id += 1;
            for w in ring.windows(2) {
                let (p, q) = (w[0], w[1]);
                if p == q {
                    continue;
                }
                let (p, q) = if p < q { (p, q) } else { (q, p) };
                let l = events.next_idx();
                let r = EventIdx(l.0 + 1);
                events.push(SweepEvent::new(p, r, true, is_subject, contour_id));
                events.push(SweepEvent::new(q, l, false, is_subject, contour_id));
                queue.push(l, |a, b| events.compare_events(*a, *b));
                queue.push(r, |a, b| events.compare_events(*a, *b));
            }
        }
    }

    (events, queue)
}

impl Sweep {
    /// Prepares a sweep for computing `op` on `subject` and `clipping`.
    pub fn new(subject: &[Vec<Point>], clipping: &[Vec<Point>], op: BinaryOp) -> Self {
        let (events, queue) = fill_queue(subject, clipping);
        let sbbox = bounding_box(subject.iter().flatten());
        let cbbox = bounding_box(clipping.iter().flatten());
        let right_bound = match op {
            BinaryOp::Intersection => sbbox.zip(cbbox).map(|(s, c)| s.x1.min(c.x1)),
            BinaryOp::Difference => sbbox.map(|s| s.x1),
            BinaryOp::Union | BinaryOp::Xor => None,
        };

        Sweep {
            events,
            queue,
            status: StatusLine::default(),
            op,
            right_bound,
        }
    }

    /// The events, including any that were created by splitting edges.
    pub fn events(&self) -> &Events {
        &self.events
    }

    /// Consumes the sweep, returning its events.
    pub fn into_events(self) -> Events {
        self.events
    }

    /// Runs the sweep, returning the processed events in the order they were processed.
    pub fn subdivide(&mut self) -> Vec<EventIdx> {
        let mut sorted_events = Vec::with_capacity(self.queue.len());

        while let Some(ev) = self.queue.pop(|a, b| self.events.compare_events(*a, *b)) {
            sorted_events.push(ev);
            log::trace!("event {ev:?}: {:?}", self.events[ev]);

            let x = self.events[ev].point.x;
            if self.right_bound.is_some_and(|bound| x > bound) {
                log::debug!("stopping early at x = {x}");
                break;
            }

            if self.events[ev].left {
                self.process_left(ev);
            } else {
                self.process_right(ev);
            }

            #[cfg(feature = "slow-asserts")]
            self.status
                .check_invariants(|a, b| self.events.compare_segments(*a, *b));
        }

        sorted_events
    }

    fn process_left(&mut self, ev: EventIdx) {
        let cursor = self
            .status
            .insert(ev, |a, b| self.events.compare_segments(*a, *b));
        let prev_cursor = self.status.prev(cursor);
        let prev = prev_cursor.map(|c| *self.status.get(c));
        let next = self.status.next(cursor).map(|c| *self.status.get(c));

        self.compute_fields(ev, prev);

        if let Some(next) = next {
            if self.possible_intersection(ev, next) == Outcome::Coincident {
                self.compute_fields(ev, prev);
                self.compute_fields(next, Some(ev));
            }
        }

        if let Some(prev) = prev {
            if self.possible_intersection(prev, ev) == Outcome::Coincident {
                let prev_prev = prev_cursor
                    .and_then(|c| self.status.prev(c))
                    .map(|c| *self.status.get(c));
                self.compute_fields(prev, prev_prev);
                self.compute_fields(ev, Some(prev));
            }
        }
    }

    fn process_right(&mut self, ev: EventIdx) {
        let left = self.events[ev].other;
        let Some(cursor) = self
            .status
            .find(&left, |a, b| self.events.compare_segments(*a, *b))
        else {
            log::warn!("right event {ev:?} has no segment on the sweep line");
            return;
        };

        let prev = self.status.prev(cursor).map(|c| *self.status.get(c));
        let next = self.status.next(cursor).map(|c| *self.status.get(c));
        self.status.remove(cursor);

        if let (Some(prev), Some(next)) = (prev, next) {
            self.possible_intersection(prev, next);
        }
    }

    /// Computes the in/out flags of a left event, given the edge just below it.
    pub fn compute_fields(&mut self, ev: EventIdx, prev: Option<EventIdx>) {
        let op = self.op;
        match prev {
            None => {
                let e = &mut self.events[ev];
                e.in_out = false;
                e.other_in_out = true;
                e.prev_in_result = None;
            }
            Some(prev) => {
                let vertical = self.events.is_vertical(prev);
                let p = &self.events[prev];
                let (in_out, other_in_out) = if self.events[ev].is_subject == p.is_subject {
                    (!p.in_out, p.other_in_out)
                } else {
                    (
                        !p.other_in_out,
                        if vertical { !p.in_out } else { p.in_out },
                    )
                };
                let prev_in_result = if !p.in_result(op) || vertical {
                    p.prev_in_result
                } else {
                    Some(prev)
                };

                let e = &mut self.events[ev];
                e.in_out = in_out;
                e.other_in_out = other_in_out;
                e.prev_in_result = prev_in_result;
            }
        }

        let e = &mut self.events[ev];
        e.result_transition = if e.in_result(op) {
            e.determine_result_transition(op)
        } else {
            ResultTransition::None
        };
    }

    /// Checks whether two edges that are neighbors on the sweep line intersect,
    /// and splits them if so.
    ///
    /// `se1` and `se2` are left events, with `se1` below `se2`.
    pub fn possible_intersection(&mut self, se1: EventIdx, se2: EventIdx) -> Outcome {
        let (p1, q1) = (self.events[se1].point, self.events.other_point(se1));
        let (p2, q2) = (self.events[se2].point, self.events.other_point(se2));

        match intersection(p1, q1, p2, q2, false) {
            Intersection::None => Outcome::None,
            Intersection::Point(p) => {
                if p1 == p2 || q1 == q2 {
                    return Outcome::None;
                }
                log::trace!("{se1:?} and {se2:?} meet at {p:?}");
                if p != p1 && p != q1 {
                    self.events.divide_segment(se1, p, &mut self.queue);
                }
                if p != p2 && p != q2 {
                    self.events.divide_segment(se2, p, &mut self.queue);
                }
                Outcome::Split
            }
            Intersection::Overlap(..) => {
                if self.events[se1].is_subject == self.events[se2].is_subject {
                    return Outcome::None;
                }
                self.split_overlap(se1, se2, p1 == p2, q1 == q2)
            }
        }
    }

    fn split_overlap(
        &mut self,
        se1: EventIdx,
        se2: EventIdx,
        left_coincide: bool,
        right_coincide: bool,
    ) -> Outcome {
        let ordered = |events: &Events, a: EventIdx, b: EventIdx| {
            if events.compare_events(a, b) == std::cmp::Ordering::Greater {
                [b, a]
            } else {
                [a, b]
            }
        };

        // The endpoints that aren't shared, in sweep order.
        let mut ends = Vec::with_capacity(4);
        if !left_coincide {
            ends.extend(ordered(&self.events, se1, se2));
        }
        if !right_coincide {
            let (o1, o2) = (self.events[se1].other, self.events[se2].other);
            ends.extend(ordered(&self.events, o1, o2));
        }

        if left_coincide {
            let same = self.events[se1].in_out == self.events[se2].in_out;
            self.events[se2].edge_type = EdgeType::NonContributing;
            self.events[se1].edge_type = if same {
                EdgeType::SameTransition
            } else {
                EdgeType::DifferentTransition
            };

            if !right_coincide {
                // Split the longer one where the shorter one ends.
                let longer = self.events[ends[1]].other;
                let p = self.events[ends[0]].point;
                self.events.divide_segment(longer, p, &mut self.queue);
            }
            return Outcome::Coincident;
        }

        let p = self.events[ends[1]].point;
        if right_coincide {
            self.events.divide_segment(ends[0], p, &mut self.queue);
            return Outcome::Overlap;
        }

        let contains = ends[0] == self.events[ends[3]].other;
        self.events.divide_segment(ends[0], p, &mut self.queue);
        let p = self.events[ends[2]].point;
        if contains {
            // One edge contains the other: split the container at both ends
            // of the contained one.
            let tail = self.events[ends[3]].other;
            self.events.divide_segment(tail, p, &mut self.queue);
        } else {
            self.events.divide_segment(ends[1], p, &mut self.queue);
        }
        Outcome::Overlap
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use proptest::prelude::*;

    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn ring(pts: &[(f64, f64)]) -> Vec<Point> {
        let mut ret: Vec<Point> = pts.iter().map(|&q| q.into()).collect();
        ret.push(ret[0]);
        ret
    }

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point> {
        ring(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
    }

    // A sweep over single edges, one per (start, end, is_subject). Returns the left events.
    fn edges(edges: &[(Point, Point, bool)], op: BinaryOp) -> (Sweep, Vec<EventIdx>) {
        let subject: Vec<_> = edges.iter().filter(|e| e.2).map(|e| vec![e.0, e.1]).collect();
        let clipping: Vec<_> = edges.iter().filter(|e| !e.2).map(|e| vec![e.0, e.1]).collect();
        let sweep = Sweep::new(&subject, &clipping, op);
        let lefts = sweep
            .events()
            .iter()
            .filter(|(_, e)| e.left)
            .map(|(idx, _)| idx)
            .collect();
        (sweep, lefts)
    }

    #[test]
    fn fill() {
        let subject = [
            ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (0.0, 1.0)]),
            Vec::new(),
        ];
        let clipping = [square(2.0, 2.0, 3.0, 3.0)];
        let (events, queue) = fill_queue(&subject, &clipping);

        // The zero-length edge is dropped.
        assert_eq!(events.len(), 2 * 3 + 2 * 4);
        assert_eq!(queue.len(), events.len());

        for (idx, e) in events.iter() {
            let other = &events[e.other];
            assert_eq!(other.other, idx);
            assert_ne!(e.left, other.left);
            assert_eq!(e.left, e.point < other.point);
            assert_eq!(e.is_subject, e.contour_id == 1);
        }
        assert!(events.iter().any(|(_, e)| e.contour_id == 3));
    }

    #[test]
    fn crossing_edges_split() {
        let (mut sweep, lefts) = edges(
            &[
                (p(0.0, 0.0), p(2.0, 2.0), true),
                (p(0.0, 2.0), p(2.0, 0.0), false),
            ],
            BinaryOp::Union,
        );
        let (a, b) = (lefts[0], lefts[1]);
        assert_eq!(sweep.possible_intersection(a, b), Outcome::Split);
        assert_eq!(sweep.events().other_point(a), p(1.0, 1.0));
        assert_eq!(sweep.events().other_point(b), p(1.0, 1.0));
        assert_eq!(sweep.events().len(), 8);
        assert_eq!(sweep.queue.len(), 8);
    }

    #[test]
    fn shared_endpoint_is_not_split() {
        let (mut sweep, lefts) = edges(
            &[
                (p(0.0, 0.0), p(2.0, 2.0), true),
                (p(0.0, 0.0), p(2.0, 0.0), false),
            ],
            BinaryOp::Union,
        );
        assert_eq!(sweep.possible_intersection(lefts[1], lefts[0]), Outcome::None);
        assert_eq!(sweep.events().len(), 4);
    }

    #[test]
    fn coincident_left_ends() {
        let (mut sweep, lefts) = edges(
            &[
                (p(0.0, 0.0), p(2.0, 0.0), true),
                (p(0.0, 0.0), p(1.0, 0.0), false),
            ],
            BinaryOp::Union,
        );
        let (a, b) = (lefts[0], lefts[1]);
        assert_eq!(sweep.possible_intersection(a, b), Outcome::Coincident);
        assert_eq!(sweep.events()[a].edge_type, EdgeType::SameTransition);
        assert_eq!(sweep.events()[b].edge_type, EdgeType::NonContributing);
        // The longer edge got cut where the shorter one ends.
        assert_eq!(sweep.events().other_point(a), p(1.0, 0.0));
        assert_eq!(sweep.events().other_point(b), p(1.0, 0.0));
    }

    #[test]
    fn partial_overlap() {
        let (mut sweep, lefts) = edges(
            &[
                (p(0.0, 0.0), p(2.0, 0.0), true),
                (p(1.0, 0.0), p(3.0, 0.0), false),
            ],
            BinaryOp::Union,
        );
        let (a, b) = (lefts[0], lefts[1]);
        assert_eq!(sweep.possible_intersection(a, b), Outcome::Overlap);
        assert_eq!(sweep.events().other_point(a), p(1.0, 0.0));
        assert_eq!(sweep.events().other_point(b), p(2.0, 0.0));
    }

    #[test]
    fn contained_overlap() {
        let (mut sweep, lefts) = edges(
            &[
                (p(0.0, 0.0), p(3.0, 0.0), true),
                (p(1.0, 0.0), p(2.0, 0.0), false),
            ],
            BinaryOp::Union,
        );
        let (a, b) = (lefts[0], lefts[1]);
        assert_eq!(sweep.possible_intersection(a, b), Outcome::Overlap);
        assert_eq!(sweep.events().other_point(a), p(1.0, 0.0));
        assert_eq!(sweep.events().other_point(b), p(2.0, 0.0));
        // The container is now in three pieces: 0-1, 1-2 and 2-3.
        assert_eq!(sweep.events().len(), 8);
    }

    #[test]
    fn same_polygon_overlap_is_ignored() {
        let (mut sweep, lefts) = edges(
            &[
                (p(0.0, 0.0), p(2.0, 0.0), true),
                (p(1.0, 0.0), p(3.0, 0.0), true),
            ],
            BinaryOp::Union,
        );
        assert_eq!(sweep.possible_intersection(lefts[0], lefts[1]), Outcome::None);
        assert_eq!(sweep.events().len(), 4);
    }

    #[test]
    fn fields_for_lowest_edge() {
        let (mut sweep, lefts) = edges(&[(p(0.0, 0.0), p(2.0, 0.0), true)], BinaryOp::Union);
        sweep.compute_fields(lefts[0], None);
        let e = &sweep.events()[lefts[0]];
        assert!(!e.in_out);
        assert!(e.other_in_out);
        assert_eq!(e.result_transition, ResultTransition::OutIn);
        assert_eq!(e.prev_in_result, None);
    }

    #[test]
    fn fields_above_other_polygon() {
        // A subject edge above a clipping edge: the subject edge is inside the
        // clipping polygon.
        let (mut sweep, lefts) = edges(
            &[
                (p(0.0, 1.0), p(2.0, 1.0), true),
                (p(0.0, 0.0), p(2.0, 0.0), false),
            ],
            BinaryOp::Intersection,
        );
        let (subj, clip) = (lefts[0], lefts[1]);
        sweep.compute_fields(clip, None);
        sweep.compute_fields(subj, Some(clip));

        let e = &sweep.events()[subj];
        assert!(!e.in_out);
        assert!(!e.other_in_out);
        assert_eq!(e.result_transition, ResultTransition::OutIn);
        // The clipping edge is outside the subject, so not in the intersection.
        assert_eq!(sweep.events()[clip].result_transition, ResultTransition::None);
        assert_eq!(e.prev_in_result, None);
    }

    #[test]
    fn subdivide_overlapping_squares() {
        let subject = [square(0.0, 0.0, 4.0, 4.0)];
        let clipping = [square(2.0, 2.0, 6.0, 6.0)];
        let mut sweep = Sweep::new(&subject, &clipping, BinaryOp::Union);
        let sorted = sweep.subdivide();

        // Two crossings, each splitting two edges.
        assert_eq!(sweep.events().len(), 16 + 8);
        assert_eq!(sorted.len(), sweep.events().len());
        assert!(sweep.status.is_empty());

        for w in sorted.windows(2) {
            assert_eq!(
                sweep.events().compare_events(w[0], w[1]),
                std::cmp::Ordering::Less
            );
        }
    }

    #[test]
    fn subdivide_stops_early() {
        let subject = [square(0.0, 0.0, 1.0, 1.0)];
        let clipping = [square(0.5, 0.5, 3.0, 3.0)];
        let mut sweep = Sweep::new(&subject, &clipping, BinaryOp::Intersection);
        let sorted = sweep.subdivide();
        assert!(sorted.len() < sweep.events().len());
        let last = *sorted.last().unwrap();
        assert!(sweep.events()[last].point.x > 1.0);
    }

    fn small_triangle() -> impl Strategy<Value = Vec<Point>> {
        prop::array::uniform3((0i32..16, 0i32..16)).prop_map(|pts| {
            let mut ring: Vec<Point> = pts
                .iter()
                .map(|&(x, y)| Point::new(x.into(), y.into()))
                .collect();
            ring.push(ring[0]);
            ring
        })
    }

    proptest! {
        // Includes the events created by splitting edges, whose points have
        // been rounded.
        #[test]
        fn event_order_is_strict(
            a in small_triangle(),
            b in small_triangle(),
            c in small_triangle(),
        ) {
            let mut sweep = Sweep::new(&[a, b], &[c], BinaryOp::Xor);
            sweep.subdivide();
            let events = sweep.events();
            for i in events.indices() {
                for j in events.indices() {
                    let ord = events.compare_events(i, j);
                    prop_assert_eq!(ord, events.compare_events(j, i).reverse());
                    prop_assert_eq!(ord == Ordering::Equal, i == j);
                }
            }
        }
    }
}
