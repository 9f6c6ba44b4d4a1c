//! Sweep events, and the orders on them.
//!
//! Every edge of the input becomes two events, one at each endpoint. The events
//! live in an arena ([`Events`]) and refer to each other by index, because they
//! form a cycle (each event knows its partner) and get mutated while other
//! events still refer to them.

use std::cmp::Ordering;

use crate::{
    contour::ContourIdx,
    geom::{signed_area, Point},
    queue::EventQueue,
    BinaryOp,
};

typed_vec!(
    /// A vector of sweep events, indexed by [`EventIdx`].
    EventVec,
    /// An index into [`Events`].
    EventIdx,
    "ev"
);

/// The arena holding all the events of one boolean operation.
pub type Events = EventVec<SweepEvent>;

/// How an edge relates to an edge of the other polygon that lies on top of it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
pub enum EdgeType {
    /// No other edge lies on top of this one.
    #[default]
    Normal,
    /// Another edge lies on top of this one, and that one is in charge.
    NonContributing,
    /// Another edge lies on top of this one, and both polygons are inside on the
    /// same side of it.
    SameTransition,
    /// Another edge lies on top of this one, and the polygons are inside on
    /// opposite sides of it.
    DifferentTransition,
}

/// What crossing an edge upwards does to membership in the result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
pub enum ResultTransition {
    /// The edge isn't part of the result's boundary.
    #[default]
    None,
    /// Going up across the edge enters the result.
    OutIn,
    /// Going up across the edge leaves the result.
    InOut,
}

/// One endpoint of one edge.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SweepEvent {
    /// Where this endpoint is.
    pub point: Point,
    /// The event at the other end of this edge.
    pub other: EventIdx,
    /// Is this the left endpoint (the smaller one in sweep order)?
    pub left: bool,
    /// Does this edge come from the subject polygon (as opposed to the clipping one)?
    pub is_subject: bool,
    /// How this edge relates to overlapping edges of the other polygon.
    pub edge_type: EdgeType,
    /// Does crossing this edge upwards leave its own polygon?
    ///
    /// In other words, is the area just below this edge inside the polygon
    /// this edge belongs to.
    pub in_out: bool,
    /// Is this edge outside the other polygon?
    ///
    /// This is the `in_out` of the closest edge of the other polygon below us.
    pub other_in_out: bool,
    /// The closest edge below this one that is part of the result.
    pub prev_in_result: Option<EventIdx>,
    /// What this edge does to membership in the result.
    pub result_transition: ResultTransition,
    /// During assembly, the position of the partner event in the sorted result events.
    pub other_pos: usize,
    /// During assembly, the output contour that this edge ended up in.
    pub output_contour: Option<ContourIdx>,
    /// The input ring this edge came from.
    pub contour_id: u32,
}

impl SweepEvent {
    /// A fresh event, with all the sweep-computed fields at their defaults.
    pub fn new(point: Point, other: EventIdx, left: bool, is_subject: bool, contour_id: u32) -> Self {
        SweepEvent {
            point,
            other,
            left,
            is_subject,
            edge_type: EdgeType::Normal,
            in_out: false,
            other_in_out: false,
            prev_in_result: None,
            result_transition: ResultTransition::None,
            other_pos: 0,
            output_contour: None,
            contour_id,
        }
    }

    /// Does this edge contribute to the result for the operation `op`?
    ///
    /// Only meaningful for left events, once their `in_out` fields are computed.
    pub fn in_result(&self, op: BinaryOp) -> bool {
        match self.edge_type {
            EdgeType::Normal => match op {
                BinaryOp::Intersection => !self.other_in_out,
                BinaryOp::Union => self.other_in_out,
                BinaryOp::Difference => self.is_subject == self.other_in_out,
                BinaryOp::Xor => true,
            },
            EdgeType::SameTransition => {
                matches!(op, BinaryOp::Intersection | BinaryOp::Union)
            }
            EdgeType::DifferentTransition => op == BinaryOp::Difference,
            EdgeType::NonContributing => false,
        }
    }

    /// Assuming this edge is in the result, which way does it go?
    pub fn determine_result_transition(&self, op: BinaryOp) -> ResultTransition {
        let this_in = !self.in_out;
        // When the other polygon has an edge on top of this one, `other_in_out`
        // describes the empty sliver between them. The edge type tells us
        // where the other polygon really is.
        let that_in = match self.edge_type {
            EdgeType::SameTransition => this_in,
            EdgeType::DifferentTransition => !this_in,
            EdgeType::Normal | EdgeType::NonContributing => !self.other_in_out,
        };
        let is_in = match op {
            BinaryOp::Intersection => this_in && that_in,
            BinaryOp::Union => this_in || that_in,
            BinaryOp::Xor => this_in != that_in,
            BinaryOp::Difference => {
                if self.is_subject {
                    this_in && !that_in
                } else {
                    that_in && !this_in
                }
            }
        };
        if is_in {
            ResultTransition::OutIn
        } else {
            ResultTransition::InOut
        }
    }
}

impl Events {
    /// The point at the other end of `ev`'s edge.
    pub fn other_point(&self, ev: EventIdx) -> Point {
        self[self[ev].other].point
    }

    /// Is `ev`'s edge vertical?
    pub fn is_vertical(&self, ev: EventIdx) -> bool {
        self[ev].point.x == self.other_point(ev).x
    }

    /// Is `ev`'s edge strictly below `p`?
    ///
    /// The edge is extended to a line, so this is really asking whether `p`
    /// is strictly to the left of the edge when walking from its left endpoint
    /// to its right endpoint.
    pub fn is_below(&self, ev: EventIdx, p: &Point) -> bool {
        let p0 = self[ev].point;
        let p1 = self.other_point(ev);
        if self[ev].left {
            signed_area(&p0, &p1, p) > 0.0
        } else {
            signed_area(&p1, &p0, p) > 0.0
        }
    }

    /// Is `ev`'s edge strictly above `p`? (Or on it.)
    pub fn is_above(&self, ev: EventIdx, p: &Point) -> bool {
        !self.is_below(ev, p)
    }

    /// The order in which events are processed.
    ///
    /// Events are sorted by their points. At the same point, edges ending there
    /// come before edges starting there, lower edges come before higher ones, and
    /// subject edges come before clipping edges. Remaining ties (collinear edges
    /// from the same polygon) are broken by input ring and then by index, so that
    /// two different events never compare equal.
    pub fn compare_events(&self, a: EventIdx, b: EventIdx) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        let (e1, e2) = (&self[a], &self[b]);
        let by_point = e1.point.cmp(&e2.point);
        if by_point != Ordering::Equal {
            return by_point;
        }

        if e1.left != e2.left {
            return if e1.left {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }

        // Both vectors start at the shared point, so swapping `a` and `b`
        // exactly negates the cross product.
        let to_other1 = e1.point.to(&self.other_point(a));
        let to_other2 = e1.point.to(&self.other_point(b));
        let turn = to_other1.cross(&to_other2);
        if turn != 0.0 {
            // For left events a left turn means that `a` is the lower edge;
            // for right events it's the other way around.
            return if (turn > 0.0) == e1.left {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }

        if e1.is_subject != e2.is_subject {
            return if e1.is_subject {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }

        e1.contour_id.cmp(&e2.contour_id).then(a.cmp(&b))
    }

    /// The order of segments on the sweep line, from bottom to top.
    ///
    /// Both `a` and `b` must be left events.
    pub fn compare_segments(&self, a: EventIdx, b: EventIdx) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        let (le1, le2) = (&self[a], &self[b]);
        let other1 = self.other_point(a);
        let other2 = self.other_point(b);

        if signed_area(&le1.point, &other1, &le2.point) != 0.0
            || signed_area(&le1.point, &other1, &other2) != 0.0
        {
            // Not collinear.
            if le1.point == le2.point {
                // Same left endpoint: the right endpoints decide.
                return if self.is_below(a, &other2) {
                    Ordering::Less
                } else {
                    Ordering::Greater
                };
            }

            if le1.point.x == le2.point.x {
                return if le1.point.y < le2.point.y {
                    Ordering::Less
                } else {
                    Ordering::Greater
                };
            }

            // Compare at whichever left endpoint came later. If that endpoint
            // lies on the other edge, compare the far endpoint instead.
            return if self.compare_events(a, b) == Ordering::Greater {
                let p = if signed_area(&le2.point, &other2, &le1.point) == 0.0 {
                    other1
                } else {
                    le1.point
                };
                if self.is_above(b, &p) {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            } else {
                let p = if signed_area(&le1.point, &other1, &le2.point) == 0.0 {
                    other2
                } else {
                    le2.point
                };
                if self.is_below(a, &p) {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            };
        }

        if le1.is_subject != le2.is_subject {
            return if le1.is_subject {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }

        if le1.point == le2.point {
            if other1 == other2 {
                return Ordering::Equal;
            }
            return le1.contour_id.cmp(&le2.contour_id).then(a.cmp(&b));
        }

        self.compare_events(a, b)
    }

    /// Splits the edge starting at `ev` in two at `p`.
    ///
    /// `ev` keeps the first half, and a new pair of events is created at `p`: a
    /// right event ending the first half, and a left event starting the second
    /// half. Both are pushed onto the queue.
    pub fn divide_segment(&mut self, ev: EventIdx, p: Point, queue: &mut EventQueue<EventIdx>) {
        let SweepEvent {
            other,
            is_subject,
            contour_id,
            ..
        } = self[ev];

        let r = self.push(SweepEvent::new(p, ev, false, is_subject, contour_id));
        let l = self.push(SweepEvent::new(p, other, true, is_subject, contour_id));

        // Rounding can put `p` past the old right endpoint, in which case the
        // second half runs backwards.
        if self.compare_events(l, other) == Ordering::Greater {
            log::trace!("split point {p:?} overshoots {:?}", self[other].point);
            self[other].left = true;
            self[l].left = false;
        }

        self[other].other = l;
        self[ev].other = r;

        queue.push(l, |a, b| self.compare_events(*a, *b));
        queue.push(r, |a, b| self.compare_events(*a, *b));
    }
}
