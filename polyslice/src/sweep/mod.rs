//! Bentley–Ottmann style sweep over one or two segment sets.
//!
//! The scan line moves left to right. Every edge enters the status at its
//! Left event, gets split wherever it crosses a neighbor and is handed to the
//! [`SweepOperation`] at its Right event, together with the winding depth of
//! both sources on either side. Collinear duplicates are merged so every
//! stretch of boundary is reported once.

use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

use tracing::{debug, trace, warn};

use crate::{
    context::Context,
    geometry::{Point, SegmentSet},
};

pub mod event;
pub mod infill;
pub mod intersect;
pub mod operation;
pub mod status;

use event::{EventFactory, EventId, EventKind, QueuedEvent, Source};
use intersect::Crossing;
pub use operation::{
    BooleanOperation, BooleanRule, EdgeFlags, FullDifference, FullDifferenceOperation,
    SweepOperation,
};
use status::Status;
pub use status::StatusView;

/// All state of one sweep. Nothing is shared between sessions, so separate
/// sessions can run on separate threads.
pub struct SweepSession<'a, O: SweepOperation> {
    context: Context,
    operation: &'a O,

    factory: EventFactory,
    queue: BinaryHeap<Reverse<QueuedEvent>>,
    status: Status,
    front: Option<Point>,
    /// Edges inserted at the front point that still need their depth.
    pending: Vec<EventId>,
}

/// Sweeps `a` and `b` with `operation` and returns what it collected.
pub fn run<O: SweepOperation>(
    operation: &O,
    context: &Context,
    a: &SegmentSet,
    b: &SegmentSet,
) -> O::Store {
    let mut session = SweepSession::new(*context, operation);
    session.add(a, Source::A);
    session.add(b, Source::B);
    session.run()
}

impl<'a, O: SweepOperation> SweepSession<'a, O> {
    pub fn new(context: Context, operation: &'a O) -> Self {
        Self {
            context,
            operation,

            factory: EventFactory::default(),
            queue: BinaryHeap::new(),
            status: Status::default(),
            front: None,
            pending: Vec::new(),
        }
    }

    /// Queues every segment of `segments` as part of `source`.
    pub fn add(&mut self, segments: &SegmentSet, source: Source) {
        for segment in segments {
            if let Some(id) = self.factory.input(segment, source) {
                self.push(id, EventKind::Left);
                self.push(id, EventKind::Right);
            }
        }
    }

    pub fn run(mut self) -> O::Store {
        let mut store = self.operation.init(&self.context);
        trace!("Sweeping {} edges", self.factory.len());

        while let Some(Reverse(event)) = self.queue.pop() {
            if let Some(front) = self.front {
                if event.point != front {
                    self.seed_depths(front);
                }

                if event.point.h > front.h {
                    let status = self.status.view(self.factory.events());
                    self.operation
                        .advance(front.h, event.point.h, &status, &mut store);
                }
            }

            self.front = Some(match self.front {
                Some(front) => front.max(event.point),
                None => event.point,
            });

            match event.kind {
                EventKind::Left => self.process_left(event.id, event.point),
                EventKind::Right => self.process_right(event.id, event.point, &mut store),
            }
        }

        if !self.status.is_empty() {
            warn!("Sweep ended with {} edges left in status", self.status.len());
        }

        store
    }

    fn push(&mut self, id: EventId, kind: EventKind) {
        let event = self.factory.queued(id, kind);
        self.queue.push(Reverse(event));
    }

    fn process_left(&mut self, id: EventId, point: Point) {
        let event = self.factory.get(id);
        if !event.contributing || event.in_status || event.left() != point {
            return;
        }

        let idx = self.status.insert(id, self.factory.events());
        self.factory.get_mut(id).in_status = true;

        if let Some(below) = idx.checked_sub(1).and_then(|x| self.status.get(x)) {
            self.intersect(below, id);
        }

        // The checks above may have merged this edge away or moved it.
        let Some(idx) = self.status.position(id) else {
            return;
        };
        if let Some(above) = self.status.get(idx + 1) {
            self.intersect(id, above);
        }

        // Splits at this point queue more edges starting here. Depths are
        // seeded once all of them are in the status.
        if self.factory.get(id).contributing {
            self.pending.push(id);
        }
    }

    fn process_right(&mut self, id: EventId, point: Point, store: &mut O::Store) {
        let event = self.factory.get(id);
        if !event.contributing || !event.in_status || event.right() != point {
            return;
        }

        let status = self.status.view(self.factory.events());
        self.operation.handle_event(event, &status, store);

        self.factory.get_mut(id).in_status = false;
        match self.status.remove(id) {
            Some(idx) => self.intersect_around(idx),
            None => warn!("Edge {id} ending at {point} is missing from the status"),
        }
    }

    /// Seeds the depth of every edge that entered the status at `front`.
    fn seed_depths(&mut self, front: Point) {
        for id in std::mem::take(&mut self.pending) {
            let event = self.factory.get(id);
            if event.contributing && event.in_status {
                self.set_depth(id, front);
            }
        }
    }

    /// The depth below an edge starting at `front` is the summed weight of
    /// every edge passing under it. Vertical edges are not crossed by the
    /// scan line and are skipped.
    fn set_depth(&mut self, id: EventId, front: Point) {
        let events = self.factory.events();
        let edge = &events[id];

        let mut depth = [0; 2];
        for other in self.status.iter().map(|x| &events[x]) {
            if other.id() != id
                && other.contributing
                && !other.is_vertical()
                && other.right() > front
                && status::compare(other, edge) == Ordering::Less
            {
                depth[0] += other.weight[0];
                depth[1] += other.weight[1];
            }
        }

        self.factory.get_mut(id).depth_below = depth;
    }

    /// Tests the pair of edges meeting at status position `idx` after an edge
    /// between them was removed.
    fn intersect_around(&mut self, idx: usize) {
        let below = idx.checked_sub(1).and_then(|x| self.status.get(x));
        if let (Some(below), Some(above)) = (below, self.status.get(idx)) {
            self.intersect(below, above);
        }
    }

    /// Handles any contact between two status neighbors, `lower` being the
    /// one underneath.
    fn intersect(&mut self, lower: EventId, upper: EventId) {
        let (a, b) = (self.factory.get(lower), self.factory.get(upper));
        match intersect::crossing((a.left(), a.right()), (b.left(), b.right())) {
            Crossing::None => {}
            Crossing::Touch(point) => {
                if self.front.is_some_and(|front| point < front) {
                    debug!("Ignoring contact at {point} behind the sweep front");
                    return;
                }
                self.split_inside(lower, point);
                self.split_inside(upper, point);
            }
            Crossing::Cross(point) => {
                let point = self.clamp(point);
                self.split_inside(lower, point);
                self.split_inside(upper, point);
                self.intersect_outside(lower, upper);
            }
            Crossing::Overlap(lo, hi) => self.overlap(lower, upper, lo, hi),
        }
    }

    /// Snapping a crossing turns both edges a little, which can make them
    /// meet the neighbors on their far sides.
    fn intersect_outside(&mut self, lower: EventId, upper: EventId) {
        let below = self
            .status
            .position(lower)
            .and_then(|x| x.checked_sub(1))
            .and_then(|x| self.status.get(x));
        if let Some(below) = below {
            self.intersect(below, lower);
        }

        let above = self
            .status
            .position(upper)
            .and_then(|x| self.status.get(x + 1));
        if let Some(above) = above {
            self.intersect(upper, above);
        }
    }

    /// Rounding can put a crossing slightly behind the front. Those are moved
    /// onto the front column, one unit further if still behind, so the sweep
    /// always makes progress.
    fn clamp(&self, mut point: Point) -> Point {
        let Some(front) = self.front else {
            return point;
        };

        if point < front {
            debug!("Clamping crossing at {point} behind the sweep front {front}");
            point.h = front.h;
            if point < front {
                point.h += 1;
            }
        }

        point
    }

    fn split_inside(&mut self, id: EventId, point: Point) {
        let event = self.factory.get(id);
        if event.left() < point && point < event.right() {
            self.split(id, point);
        } else if !event.is_vertical() && point.h == event.right().h && point > event.right() {
            self.reroute(id, point);
        }
    }

    /// Shortens the edge to end at `point` and queues the rest as a new edge.
    fn split(&mut self, id: EventId, point: Point) {
        let event = self.factory.get_mut(id);
        let (right, weight) = (event.right(), event.weight);
        event.set_right(point);
        self.push(id, EventKind::Right);

        let rest = self.factory.create(point, right, weight);
        self.push(rest, EventKind::Left);
        self.push(rest, EventKind::Right);
        trace!("Split edge {id} at {point} into {rest}");
    }

    /// A steep edge falling to its right end can have a crossing rounded onto
    /// its last column but above that end. The edge is bent through `point`
    /// and drops back down to its end along the column.
    fn reroute(&mut self, id: EventId, point: Point) {
        let event = self.factory.get_mut(id);
        let (right, weight) = (event.right(), event.weight);
        event.set_right(point);
        self.push(id, EventKind::Right);

        let rest = self.factory.create(right, point, [-weight[0], -weight[1]]);
        self.push(rest, EventKind::Left);
        self.push(rest, EventKind::Right);
        debug!("Rerouted edge {id} through {point} above its end {right}");
    }

    /// Collinear neighbors sharing `lo..hi`. Edges starting at different
    /// points are first cut so they start together, edges starting together
    /// are cut to the same length and merged.
    fn overlap(&mut self, lower: EventId, upper: EventId, lo: Point, hi: Point) {
        let (a, b) = (self.factory.get(lower), self.factory.get(upper));

        if a.left() != b.left() {
            let first = if a.left() < b.left() { lower } else { upper };
            self.split(first, lo);
            return;
        }

        if a.right() != b.right() {
            let longer = if a.right() > b.right() { lower } else { upper };
            self.split(longer, hi);
        }

        self.merge(lower, upper);
    }

    /// Folds `upper` into `lower`. Edges whose weights cancel out bound
    /// nothing and are dropped entirely.
    fn merge(&mut self, lower: EventId, upper: EventId) {
        let weight = self.factory.get(upper).weight;
        let upper_event = self.factory.get_mut(upper);
        upper_event.contributing = false;
        upper_event.in_status = false;

        let kept = self.factory.get_mut(lower);
        kept.weight[0] += weight[0];
        kept.weight[1] += weight[1];
        let cancelled = kept.weight == [0, 0];

        let mut gap = self.status.remove(upper);
        if cancelled {
            let kept = self.factory.get_mut(lower);
            kept.contributing = false;
            kept.in_status = false;
            gap = self.status.remove(lower);
        }

        match gap {
            Some(idx) => self.intersect_around(idx),
            None => warn!("Merged edges {lower} and {upper} are missing from the status"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Polygon, PolygonSet, Segment};

    /// Keeps every retired edge with its depth above.
    struct Recorder;

    impl SweepOperation for Recorder {
        type Store = Vec<(Point, Point, [i32; 2])>;

        fn init(&self, _context: &Context) -> Self::Store {
            Vec::new()
        }

        fn handle_event(
            &self,
            event: &event::SweepEvent,
            _status: &StatusView,
            store: &mut Self::Store,
        ) {
            store.push((event.left(), event.right(), event.depth_above()));
        }
    }

    fn polygon(points: &[(i64, i64)]) -> Polygon {
        let points = points.iter().map(|&(h, v)| Point::new(h, v)).collect();
        Polygon::new(points, true)
    }

    /// Winding number of a set of loops around a float position.
    fn winding(polygons: &PolygonSet, x: f64, y: f64) -> i32 {
        let mut winding = 0;
        for edge in polygons.iter().flat_map(|x| x.edges()) {
            let (a, b) = (edge.p1().to_vector(), edge.p2().to_vector());
            let side = (b.x - a.x) * (y - a.y) - (x - a.x) * (b.y - a.y);
            if a.y <= y {
                if b.y > y && side > 0.0 {
                    winding += 1;
                }
            } else if b.y <= y && side < 0.0 {
                winding -= 1;
            }
        }
        winding
    }

    /// Every retired edge long enough to sample next to must carry the
    /// winding numbers found just above it.
    fn assert_depths(a: &PolygonSet, b: &PolygonSet) -> usize {
        let context = *a.context();
        let edges = run(&Recorder, &context, &a.to_segments(), &b.to_segments());

        for &(left, right, depth) in &edges {
            if left.distance_squared(right) < 400 {
                continue;
            }

            let (mid_h, mid_v) = Segment::new(left, right).unwrap().midpoint();
            let (x, y) = match left.h == right.h {
                true => (mid_h - 2.0, mid_v),
                false => (mid_h, mid_v + 2.0),
            };

            let expected = [winding(a, x, y), winding(b, x, y)];
            assert_eq!(depth, expected, "edge {left} -> {right}");
        }

        edges.len()
    }

    #[test]
    fn depth_matches_winding() {
        let context = Context::default();
        let a = PolygonSet::from_elements(
            context,
            [
                polygon(&[(0, 0), (1000, 0), (1000, 1000), (0, 1000)]),
                polygon(&[(200, 200), (1800, 400), (600, 1600)]),
            ],
        );
        let b = PolygonSet::from_elements(
            context,
            [polygon(&[(1000, -300), (1700, 500), (1000, 1300), (300, 500)])],
        );

        assert!(assert_depths(&a, &b) >= 11);
    }

    #[test]
    fn vertex_on_edge_below() {
        // B starts on the bottom edge of A, splitting it where B's edges
        // enter the status.
        let context = Context::default();
        let a = PolygonSet::from_elements(
            context,
            [polygon(&[(100, 100), (400, 100), (800, 900)])],
        );
        let b = PolygonSet::from_elements(
            context,
            [polygon(&[(200, 100), (600, 400), (200, 1000)])],
        );

        assert!(assert_depths(&a, &b) >= 9);
    }

    #[test]
    fn vertex_near_crossing() {
        let context = Context::default();
        let a = PolygonSet::from_elements(
            context,
            [polygon(&[(823, 225), (464, 584), (93, 265)])],
        );
        let b = PolygonSet::from_elements(
            context,
            [polygon(&[(1, 918), (18, 267), (472, 257)])],
        );

        assert!(assert_depths(&a, &b) >= 6);
    }

    #[test]
    fn steep_edge_bends_through_crossing() {
        // The crossing rounds to (1, 401), above the low end of the steep edge.
        let context = Context::default();
        let segment = |a: (i64, i64), b: (i64, i64)| {
            Segment::new(Point::new(a.0, a.1), Point::new(b.0, b.1)).unwrap()
        };
        let a = SegmentSet::from_elements(context, [segment((0, 1000), (1, 0))]);
        let b = SegmentSet::from_elements(context, [segment((-10, 400), (10, 401))]);

        let mut edges = run(&Recorder, &context, &a, &b)
            .into_iter()
            .map(|(left, right, _)| (left, right))
            .collect::<Vec<_>>();
        edges.sort();

        let bend = Point::new(1, 401);
        assert_eq!(
            edges,
            [
                (Point::new(-10, 400), bend),
                (Point::new(0, 1000), bend),
                (Point::new(1, 0), bend),
                (bend, Point::new(10, 401)),
            ]
        );
    }

    #[test]
    fn duplicate_edges_cancel() {
        let context = Context::default();
        let square = polygon(&[(0, 0), (100, 0), (100, 100), (0, 100)]);
        let mut reversed = square.clone();
        reversed.reverse();

        let a = PolygonSet::from_elements(context, [square]).to_segments();
        let b = PolygonSet::from_elements(context, [reversed]).to_segments();
        let mut both = a.clone();
        both.extend(b.clone());

        let edges = run(&Recorder, &context, &both, &SegmentSet::new(context));
        assert!(edges.is_empty());
    }

    #[test]
    fn crossing_edges_get_split() {
        let context = Context::default();
        let segment = |a: (i64, i64), b: (i64, i64)| {
            Segment::new(Point::new(a.0, a.1), Point::new(b.0, b.1)).unwrap()
        };
        let a = SegmentSet::from_elements(context, [segment((0, 0), (100, 100))]);
        let b = SegmentSet::from_elements(context, [segment((0, 100), (100, 0))]);

        let mut edges = run(&Recorder, &context, &a, &b)
            .into_iter()
            .map(|(left, right, _)| (left, right))
            .collect::<Vec<_>>();
        edges.sort();

        let center = Point::new(50, 50);
        assert_eq!(
            edges,
            [
                (Point::new(0, 0), center),
                (Point::new(0, 100), center),
                (center, Point::new(100, 0)),
                (center, Point::new(100, 100)),
            ]
        );
    }
}
