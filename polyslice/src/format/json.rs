//! Plain coordinate lists in real units, for reading and writing geometry
//! with serde.

use serde::{Deserialize, Serialize};

use crate::{
    context::Context,
    geometry::{Geometry, Point, Polygon, PolygonSet, Segment, SegmentSet},
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PolygonData {
    pub points: Vec<(f64, f64)>,
    #[serde(default = "closed")]
    pub closed: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Shapes {
    #[serde(default)]
    pub polygons: Vec<PolygonData>,
    #[serde(default)]
    pub segments: Vec<[(f64, f64); 2]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<(f64, f64)>,
}

/// Operands of a command line operation. `b` is only used by the Boolean
/// operations.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Input {
    #[serde(default)]
    pub context: Context,
    pub a: Shapes,
    #[serde(default)]
    pub b: Shapes,
}

fn closed() -> bool {
    true
}

impl Shapes {
    pub fn from_geometry<'a>(context: &Context, geometry: impl IntoIterator<Item = &'a Geometry>) -> Self {
        let mut out = Self::default();
        for geometry in geometry {
            out.push(context, geometry);
        }
        out
    }

    fn push(&mut self, context: &Context, geometry: &Geometry) {
        let polygon = |x: &Polygon| PolygonData {
            points: x.points().iter().map(|&p| context.coords(p)).collect(),
            closed: x.closed(),
        };
        let segment = |x: Segment| [context.coords(x.p1()), context.coords(x.p2())];

        match geometry {
            Geometry::Vector(point) => self.points.push(context.coords(*point)),
            Geometry::Segment(x) => self.segments.push(segment(*x)),
            Geometry::Polygon(x) => self.polygons.push(polygon(x)),
            Geometry::PolygonSet(set) => self.polygons.extend(set.iter().map(polygon)),
            Geometry::SegmentSet(set) => self.segments.extend(set.iter().copied().map(segment)),
            Geometry::AdjacencyMap(map) => self.segments.extend(map.segments().map(segment)),
        }
    }

    pub fn polygon_set(&self, context: &Context) -> PolygonSet {
        let polygons = self
            .polygons
            .iter()
            .map(|x| Polygon::from_coords(context, x.points.iter().copied(), x.closed));
        PolygonSet::from_elements(*context, polygons)
    }

    /// Loose segments together with the edges of every closed polygon.
    pub fn segment_set(&self, context: &Context) -> SegmentSet {
        let mut out = self.polygon_set(context).to_segments();
        out.extend(
            self.segments
                .iter()
                .filter_map(|[a, b]| Segment::new(context.point(a.0, a.1), context.point(b.0, b.1))),
        );
        out
    }

    pub fn vectors(&self, context: &Context) -> Vec<Point> {
        self.points.iter().map(|&(h, v)| context.point(h, v)).collect()
    }
}
