use bitflags::bitflags;
use common::config::BooleanConfig;

use super::{event::SweepEvent, status::StatusView};
use crate::{
    context::Context,
    geometry::{Segment, SegmentSet},
};

/// Policy plugged into the sweep. The engine owns the queue and the status,
/// the operation only decides what every retired edge contributes.
pub trait SweepOperation {
    type Store;

    fn init(&self, context: &Context) -> Self::Store;

    /// Called when the sweep moves from column `from` to column `to`. The
    /// status is exact for every horizontal position in `from..to`.
    fn advance(&self, _from: i64, _to: i64, _status: &StatusView, _store: &mut Self::Store) {}

    /// Called with every contributing edge right before it leaves the status.
    fn handle_event(&self, event: &SweepEvent, status: &StatusView, store: &mut Self::Store);
}

/// What an edge separates.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct EdgeFlags(u8);

bitflags! {
    impl EdgeFlags: u8 {
        /// The region above the edge is inside A.
        const INSIDE_A    = 0b0000_0001;
        const INSIDE_B    = 0b0000_0010;
        /// Crossing the edge enters or leaves A.
        const BOUNDARY_A  = 0b0000_0100;
        const BOUNDARY_B  = 0b0000_1000;
        /// Crossing the edge swaps A for B.
        const FROM_A_TO_B = 0b0001_0000;
    }
}

/// Region combination rules, evaluated on whether a point is inside A and B.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BooleanRule {
    Union,
    Intersection,
    Difference,
    ReverseDifference,
}

/// Emits the boundary of the region a [`BooleanRule`] selects.
pub struct BooleanOperation {
    pub rule: BooleanRule,
    pub config: BooleanConfig,
}

/// Splits two inputs into the parts only in A, only in B and in both.
pub struct FullDifferenceOperation {
    pub config: BooleanConfig,
}

#[derive(Clone, Debug)]
pub struct FullDifference {
    pub a_only: SegmentSet,
    pub b_only: SegmentSet,
    pub both: SegmentSet,
}

impl EdgeFlags {
    pub fn of(event: &SweepEvent, config: &BooleanConfig) -> Self {
        let above = event.depth_above();
        let below = event.depth_below();
        let inside_a = (above[0] >= config.min_depth_a, below[0] >= config.min_depth_a);
        let inside_b = (above[1] >= config.min_depth_b, below[1] >= config.min_depth_b);

        let mut flags = EdgeFlags::empty();
        flags.set(EdgeFlags::INSIDE_A, inside_a.0);
        flags.set(EdgeFlags::INSIDE_B, inside_b.0);
        flags.set(EdgeFlags::BOUNDARY_A, inside_a.0 != inside_a.1);
        flags.set(EdgeFlags::BOUNDARY_B, inside_b.0 != inside_b.1);
        flags.set(
            EdgeFlags::FROM_A_TO_B,
            inside_a.0 != inside_a.1 && inside_b.0 != inside_b.1 && inside_a.0 != inside_b.0,
        );
        flags
    }

    pub fn above(self) -> (bool, bool) {
        (
            self.contains(EdgeFlags::INSIDE_A),
            self.contains(EdgeFlags::INSIDE_B),
        )
    }

    pub fn below(self) -> (bool, bool) {
        (
            self.contains(EdgeFlags::INSIDE_A) ^ self.contains(EdgeFlags::BOUNDARY_A),
            self.contains(EdgeFlags::INSIDE_B) ^ self.contains(EdgeFlags::BOUNDARY_B),
        )
    }
}

impl BooleanRule {
    pub fn inside(self, a: bool, b: bool) -> bool {
        match self {
            BooleanRule::Union => a || b,
            BooleanRule::Intersection => a && b,
            BooleanRule::Difference => a && !b,
            BooleanRule::ReverseDifference => b && !a,
        }
    }

    /// The edge oriented with the selected region on its left, or `None`
    /// when the region is the same on both sides.
    pub fn boundary(self, event: &SweepEvent, flags: EdgeFlags) -> Option<Segment> {
        let (above, below) = (flags.above(), flags.below());
        let (above, below) = (self.inside(above.0, above.1), self.inside(below.0, below.1));

        match (above, below) {
            (true, false) => Segment::new(event.left(), event.right()),
            (false, true) => Segment::new(event.right(), event.left()),
            _ => None,
        }
    }
}

impl SweepOperation for BooleanOperation {
    type Store = SegmentSet;

    fn init(&self, context: &Context) -> Self::Store {
        SegmentSet::new(*context)
    }

    fn handle_event(&self, event: &SweepEvent, _status: &StatusView, store: &mut Self::Store) {
        let flags = EdgeFlags::of(event, &self.config);
        store.extend(self.rule.boundary(event, flags));
    }
}

impl SweepOperation for FullDifferenceOperation {
    type Store = FullDifference;

    fn init(&self, context: &Context) -> Self::Store {
        FullDifference {
            a_only: SegmentSet::new(*context),
            b_only: SegmentSet::new(*context),
            both: SegmentSet::new(*context),
        }
    }

    fn handle_event(&self, event: &SweepEvent, _status: &StatusView, store: &mut Self::Store) {
        let flags = EdgeFlags::of(event, &self.config);
        store
            .a_only
            .extend(BooleanRule::Difference.boundary(event, flags));
        store
            .b_only
            .extend(BooleanRule::ReverseDifference.boundary(event, flags));
        store
            .both
            .extend(BooleanRule::Intersection.boundary(event, flags));
    }
}
