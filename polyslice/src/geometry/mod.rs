use crate::adjacency::AdjacencyMap;

mod offset;
mod point;
mod polygon;
mod segment;
mod set;

pub use point::{orient, Point};
pub use polygon::Polygon;
pub use segment::Segment;
pub use set::{Element, GeometrySet, PolygonSet, SegmentSet};

/// Axis aligned bounding box on the lattice, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

/// Every kind of value the kernel produces, for consumers that handle them
/// uniformly (debug output, display).
#[derive(Clone, Debug)]
pub enum Geometry {
    Vector(Point),
    Segment(Segment),
    Polygon(Polygon),
    PolygonSet(PolygonSet),
    SegmentSet(SegmentSet),
    AdjacencyMap(AdjacencyMap),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Vector,
    Segment,
    Polygon,
    PolygonSet,
    SegmentSet,
    AdjacencyMap,
}

impl Bounds {
    pub fn from_point(point: Point) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    pub fn include(self, point: Point) -> Self {
        Self {
            min: Point::new(self.min.h.min(point.h), self.min.v.min(point.v)),
            max: Point::new(self.max.h.max(point.h), self.max.v.max(point.v)),
        }
    }

    pub fn union(self, other: Self) -> Self {
        self.include(other.min).include(other.max)
    }

    pub fn width(&self) -> i64 {
        self.max.h - self.min.h
    }

    pub fn height(&self) -> i64 {
        self.max.v - self.min.v
    }

    pub fn contains(&self, point: Point) -> bool {
        (self.min.h..=self.max.h).contains(&point.h) && (self.min.v..=self.max.v).contains(&point.v)
    }

    /// Bounds of a list of points, `None` when empty.
    pub fn of(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        points.into_iter().fold(None, |bounds, point| {
            Some(match bounds {
                Some(bounds) => Bounds::include(bounds, point),
                None => Bounds::from_point(point),
            })
        })
    }
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Vector(_) => GeometryKind::Vector,
            Geometry::Segment(_) => GeometryKind::Segment,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::PolygonSet(_) => GeometryKind::PolygonSet,
            Geometry::SegmentSet(_) => GeometryKind::SegmentSet,
            Geometry::AdjacencyMap(_) => GeometryKind::AdjacencyMap,
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Geometry::Vector(point) => Some(Bounds::from_point(*point)),
            Geometry::Segment(segment) => Some(segment.bounds()),
            Geometry::Polygon(polygon) => polygon.bounds(),
            Geometry::PolygonSet(set) => set.bounds(),
            Geometry::SegmentSet(set) => set.bounds(),
            Geometry::AdjacencyMap(map) => Bounds::of(map.segments().flat_map(|x| [x.p1(), x.p2()])),
        }
    }
}

impl From<Point> for Geometry {
    fn from(value: Point) -> Self {
        Geometry::Vector(value)
    }
}

impl From<Segment> for Geometry {
    fn from(value: Segment) -> Self {
        Geometry::Segment(value)
    }
}

impl From<Polygon> for Geometry {
    fn from(value: Polygon) -> Self {
        Geometry::Polygon(value)
    }
}

impl From<PolygonSet> for Geometry {
    fn from(value: PolygonSet) -> Self {
        Geometry::PolygonSet(value)
    }
}

impl From<SegmentSet> for Geometry {
    fn from(value: SegmentSet) -> Self {
        Geometry::SegmentSet(value)
    }
}

impl From<AdjacencyMap> for Geometry {
    fn from(value: AdjacencyMap) -> Self {
        Geometry::AdjacencyMap(value)
    }
}
