//! Polygon Boolean operations on segment sets.
//!
//! Inputs are the boundary edges of each operand with the interior on their
//! left, as produced by [`PolygonSet::to_segments`]. Results come back in the
//! same form and can be chained back into loops with
//! [`SegmentSet::to_polygons`].

use common::config::BooleanConfig;
use tracing::error;

use crate::{
    geometry::{PolygonSet, SegmentSet},
    sweep::{self, BooleanOperation, BooleanRule, FullDifference, FullDifferenceOperation},
};

pub fn union(a: &SegmentSet, b: &SegmentSet, config: &BooleanConfig) -> SegmentSet {
    match (a.is_empty(), b.is_empty()) {
        (true, _) => b.clone(),
        (_, true) => a.clone(),
        _ => boolean(a, b, BooleanRule::Union, config),
    }
}

pub fn intersection(a: &SegmentSet, b: &SegmentSet, config: &BooleanConfig) -> SegmentSet {
    if a.is_empty() || b.is_empty() {
        return SegmentSet::new(*a.context());
    }

    boolean(a, b, BooleanRule::Intersection, config)
}

/// Everything in `a` that is not in `b`.
pub fn difference(a: &SegmentSet, b: &SegmentSet, config: &BooleanConfig) -> SegmentSet {
    match (a.is_empty(), b.is_empty()) {
        (true, _) => SegmentSet::new(*a.context()),
        (_, true) => a.clone(),
        _ => boolean(a, b, BooleanRule::Difference, config),
    }
}

/// Splits `a` and `b` into the parts covered by only one of them and the
/// part covered by both, in a single sweep.
pub fn full_difference(a: &SegmentSet, b: &SegmentSet, config: &BooleanConfig) -> FullDifference {
    let context = *a.context();
    if a.is_empty() || b.is_empty() {
        return FullDifference {
            a_only: a.clone(),
            b_only: b.clone(),
            both: SegmentSet::new(context),
        };
    }

    if !same_context(a, b) {
        return FullDifference {
            a_only: SegmentSet::new(context),
            b_only: SegmentSet::new(context),
            both: SegmentSet::new(context),
        };
    }

    let operation = FullDifferenceOperation { config: *config };
    sweep::run(&operation, &context, a, b)
}

/// Resolves self overlaps and crossings of a single set. Regions with a
/// winding depth of at least `config.min_depth_a` are kept.
pub fn normalize(a: &SegmentSet, config: &BooleanConfig) -> SegmentSet {
    let operation = BooleanOperation {
        rule: BooleanRule::Union,
        config: *config,
    };
    sweep::run(&operation, a.context(), a, &SegmentSet::new(*a.context()))
}

fn boolean(a: &SegmentSet, b: &SegmentSet, rule: BooleanRule, config: &BooleanConfig) -> SegmentSet {
    if !same_context(a, b) {
        return SegmentSet::new(*a.context());
    }

    let operation = BooleanOperation {
        rule,
        config: *config,
    };
    sweep::run(&operation, a.context(), a, b)
}

fn same_context(a: &SegmentSet, b: &SegmentSet) -> bool {
    let same = a.context() == b.context();
    if !same {
        error!(
            "Refusing to combine sets with different contexts ({:?} and {:?})",
            a.context(),
            b.context()
        );
    }
    same
}

/// Loop level conveniences over the segment based operations.
impl PolygonSet {
    pub fn union(&self, other: &PolygonSet, config: &BooleanConfig) -> PolygonSet {
        union(&self.to_segments(), &other.to_segments(), config).to_polygons(false)
    }

    pub fn intersection(&self, other: &PolygonSet, config: &BooleanConfig) -> PolygonSet {
        intersection(&self.to_segments(), &other.to_segments(), config).to_polygons(false)
    }

    pub fn difference(&self, other: &PolygonSet, config: &BooleanConfig) -> PolygonSet {
        difference(&self.to_segments(), &other.to_segments(), config).to_polygons(false)
    }

    /// Merges overlapping loops into clean outlines and holes.
    pub fn normalize(&self, config: &BooleanConfig) -> PolygonSet {
        normalize(&self.to_segments(), config).to_polygons(false)
    }
}
