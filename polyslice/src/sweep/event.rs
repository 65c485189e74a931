use std::{cmp::Ordering, collections::HashMap};

use crate::geometry::{orient, Point, Segment};

pub type EventId = usize;

/// Which input of a two operand operation a segment came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    A,
    B,
}

/// One input edge, stored with its lexicographically smaller end point on
/// the left. Its Left event inserts it into the status and its Right event
/// retires it.
///
/// `depth_below` is the winding number of each source just under the edge
/// (for vertical edges: just to its right) and is fixed when the edge enters
/// the status. Crossing the edge upward changes the depth by `weight`.
#[derive(Clone, Debug)]
pub struct SweepEvent {
    id: EventId,
    left: Point,
    right: Point,

    pub(super) weight: [i32; 2],
    pub(super) depth_below: [i32; 2],
    pub(super) contributing: bool,
    pub(super) in_status: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventKind {
    Right,
    Left,
}

/// Entry in the event queue. It copies the positions it is ordered by, so
/// splitting an edge leaves its old entries behind as stale and they get
/// skipped when popped.
#[derive(Clone, Copy, Debug)]
pub struct QueuedEvent {
    pub point: Point,
    pub other: Point,
    pub kind: EventKind,
    pub id: EventId,
    seq: u64,
}

/// Owns every edge of a sweep and hands out ids and queue entries.
#[derive(Default)]
pub struct EventFactory {
    events: Vec<SweepEvent>,
    inputs: HashMap<(Point, Point), EventId>,
    seq: u64,
}

impl Source {
    pub fn index(self) -> usize {
        match self {
            Source::A => 0,
            Source::B => 1,
        }
    }
}

impl SweepEvent {
    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn left(&self) -> Point {
        self.left
    }

    pub fn right(&self) -> Point {
        self.right
    }

    pub fn weight(&self) -> [i32; 2] {
        self.weight
    }

    pub fn depth_below(&self) -> [i32; 2] {
        self.depth_below
    }

    pub fn depth_above(&self) -> [i32; 2] {
        [
            self.depth_below[0] + self.weight[0],
            self.depth_below[1] + self.weight[1],
        ]
    }

    pub fn contributing(&self) -> bool {
        self.contributing
    }

    pub fn is_vertical(&self) -> bool {
        self.left.h == self.right.h
    }

    /// Left to right segment along the edge.
    pub fn segment(&self) -> Option<Segment> {
        Segment::new(self.left, self.right)
    }

    /// Vertical position of the edge at horizontal position `h`.
    pub fn v_at(&self, h: f64) -> f64 {
        if self.is_vertical() {
            return self.left.v as f64;
        }

        let (l, r) = (self.left.to_vector(), self.right.to_vector());
        let t = (h - l.x) / (r.x - l.x);
        l.y + (r.y - l.y) * t
    }

    pub(super) fn set_right(&mut self, right: Point) {
        self.right = right;
    }
}

impl EventFactory {
    /// Registers a segment with a ±1 weight in its source, depending on
    /// whether it runs left to right.
    pub fn segment(&mut self, segment: &Segment, source: Source) -> EventId {
        let (left, right, weight) = oriented(segment, source);
        self.create(left, right, weight)
    }

    /// Registers an input segment. A segment repeating an earlier input edge
    /// is folded into it instead, and `None` is returned. Edges whose weights
    /// cancel stop contributing.
    pub fn input(&mut self, segment: &Segment, source: Source) -> Option<EventId> {
        let (left, right, weight) = oriented(segment, source);
        if let Some(&id) = self.inputs.get(&(left, right)) {
            let event = &mut self.events[id];
            event.weight[0] += weight[0];
            event.weight[1] += weight[1];
            event.contributing = event.weight != [0, 0];
            return None;
        }

        let id = self.create(left, right, weight);
        self.inputs.insert((left, right), id);
        Some(id)
    }

    pub fn create(&mut self, left: Point, right: Point, weight: [i32; 2]) -> EventId {
        let id = self.events.len();
        self.events.push(SweepEvent {
            id,
            left,
            right,
            weight,
            depth_below: [0; 2],
            contributing: true,
            in_status: false,
        });
        id
    }

    pub fn queued(&mut self, id: EventId, kind: EventKind) -> QueuedEvent {
        let event = &self.events[id];
        let (point, other) = match kind {
            EventKind::Left => (event.left, event.right),
            EventKind::Right => (event.right, event.left),
        };

        self.seq += 1;
        QueuedEvent {
            point,
            other,
            kind,
            id,
            seq: self.seq,
        }
    }

    pub fn get(&self, id: EventId) -> &SweepEvent {
        &self.events[id]
    }

    pub fn get_mut(&mut self, id: EventId) -> &mut SweepEvent {
        &mut self.events[id]
    }

    pub fn events(&self) -> &[SweepEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

fn oriented(segment: &Segment, source: Source) -> (Point, Point, [i32; 2]) {
    let (left, right, sign) = match segment.p1() < segment.p2() {
        true => (segment.p1(), segment.p2(), 1),
        false => (segment.p2(), segment.p1(), -1),
    };

    let mut weight = [0; 2];
    weight[source.index()] = sign;
    (left, right, weight)
}

impl Ord for QueuedEvent {
    /// Left to right, bottom to top. At a shared point Right events come
    /// first, then edges are taken in clockwise order of their far end.
    fn cmp(&self, other: &Self) -> Ordering {
        self.point
            .cmp(&other.point)
            .then_with(|| self.kind.cmp(&other.kind))
            .then_with(|| {
                let turn = orient(self.point, self.other, other.other);
                match self.kind {
                    EventKind::Left => 0.cmp(&turn),
                    EventKind::Right => turn.cmp(&0),
                }
            })
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for QueuedEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueuedEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedEvent {}
