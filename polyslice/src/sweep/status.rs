use std::cmp::Ordering;

use super::event::{EventId, SweepEvent};
use crate::geometry::orient;

/// Edges currently crossing the scan line, bottom to top.
#[derive(Default)]
pub struct Status {
    edges: Vec<EventId>,
}

/// Read only view of the status handed to operations.
#[derive(Clone, Copy)]
pub struct StatusView<'a> {
    edges: &'a [EventId],
    events: &'a [SweepEvent],
}

impl Status {
    /// Inserts an edge at its sorted position, returning that position.
    pub fn insert(&mut self, id: EventId, events: &[SweepEvent]) -> usize {
        let event = &events[id];
        let idx = self
            .edges
            .partition_point(|&x| compare(&events[x], event) == Ordering::Less);
        self.edges.insert(idx, id);
        idx
    }

    pub fn remove(&mut self, id: EventId) -> Option<usize> {
        let idx = self.position(id)?;
        self.edges.remove(idx);
        Some(idx)
    }

    pub fn position(&self, id: EventId) -> Option<usize> {
        self.edges.iter().position(|&x| x == id)
    }

    pub fn get(&self, idx: usize) -> Option<EventId> {
        self.edges.get(idx).copied()
    }

    /// Bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = EventId> + '_ {
        self.edges.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn view<'a>(&'a self, events: &'a [SweepEvent]) -> StatusView<'a> {
        StatusView {
            edges: &self.edges,
            events,
        }
    }
}

impl<'a> StatusView<'a> {
    /// Bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &'a SweepEvent> + 'a {
        let events = self.events;
        self.edges.iter().map(move |&x| &events[x])
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Vertical order of two edges that both cross the scan line. `Less` means
/// `a` is below `b`.
///
/// Collinear edges are ordered by their left point and then by id, so the
/// older of two duplicates always sits underneath. Edges sharing a left point
/// are ordered by direction, a vertical edge going above everything it shares
/// a point with.
pub fn compare(a: &SweepEvent, b: &SweepEvent) -> Ordering {
    if a.id() == b.id() {
        return Ordering::Equal;
    }

    let (l, r) = (a.left(), a.right());
    if orient(l, r, b.left()) == 0 && orient(l, r, b.right()) == 0 {
        return a
            .left()
            .cmp(&b.left())
            .then_with(|| a.id().cmp(&b.id()));
    }

    if a.left() == b.left() {
        return match orient(l, r, b.right()) > 0 {
            true => Ordering::Less,
            false => Ordering::Greater,
        };
    }

    match a.left() < b.left() {
        true => side(a, b),
        false => side(b, a).reverse(),
    }
}

/// `Less` if `other` lies above the line through `edge`.
fn side(edge: &SweepEvent, other: &SweepEvent) -> Ordering {
    let (l, r) = (edge.left(), edge.right());
    let turn = match orient(l, r, other.left()) {
        0 => orient(l, r, other.right()),
        x => x,
    };

    match turn > 0 {
        true => Ordering::Less,
        false => Ordering::Greater,
    }
}
