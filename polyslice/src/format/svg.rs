use std::io::{self, Write};

use svg::{
    node::element::{Circle, Group, Line, Polygon as SvgPolygon, Polyline, Rectangle},
    Document,
};

use crate::{
    context::Context,
    geometry::{Bounds, Geometry, Point, Polygon, Segment},
};

const COLORS: [&str; 6] = ["black", "crimson", "royalblue", "seagreen", "darkorange", "purple"];

/// Renders geometry for inspection. Every value gets its own group and
/// color, the vertical axis points up like in the lattice plane.
pub struct SvgFile {
    context: Context,
    geometry: Vec<Geometry>,
}

impl SvgFile {
    pub fn new(context: Context) -> Self {
        Self {
            context,
            geometry: Vec::new(),
        }
    }

    pub fn add(&mut self, geometry: impl Into<Geometry>) {
        self.geometry.push(geometry.into());
    }

    pub fn len(&self) -> usize {
        self.geometry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }

    pub fn document(&self) -> Document {
        let bounds = self
            .geometry
            .iter()
            .filter_map(Geometry::bounds)
            .reduce(Bounds::union)
            .unwrap_or(Bounds::from_point(Point::default()));

        let (min_h, min_v) = self.context.coords(bounds.min);
        let (max_h, max_v) = self.context.coords(bounds.max);
        let size = ((max_h - min_h).max(max_v - min_v)).max(self.context.epsilon());
        let margin = size * 0.05;
        let stroke = size / 500.0;

        let mut svg = Document::new()
            .set(
                "viewBox",
                (
                    min_h - margin,
                    -max_v - margin,
                    max_h - min_h + 2.0 * margin,
                    max_v - min_v + 2.0 * margin,
                ),
            )
            .add(
                Rectangle::new()
                    .set("x", min_h)
                    .set("y", -max_v)
                    .set("width", max_h - min_h)
                    .set("height", max_v - min_v)
                    .set("fill", "none")
                    .set("stroke", "gray")
                    .set("stroke-width", stroke / 2.0),
            );

        for (idx, geometry) in self.geometry.iter().enumerate() {
            let group = Group::new()
                .set("fill", "none")
                .set("stroke", COLORS[idx % COLORS.len()])
                .set("stroke-width", stroke);
            svg = svg.add(self.render(group, geometry, stroke));
        }

        svg
    }

    pub fn write(&self, writer: impl Write) -> io::Result<()> {
        svg::write(writer, &self.document())
    }

    fn render(&self, group: Group, geometry: &Geometry, stroke: f64) -> Group {
        match geometry {
            Geometry::Vector(point) => group.add(self.circle(*point, stroke * 2.0)),
            Geometry::Segment(segment) => group.add(self.line(segment)),
            Geometry::Polygon(polygon) => group.add(self.polygon(polygon)),
            Geometry::PolygonSet(set) => set.iter().fold(group, |g, x| g.add(self.polygon(x))),
            Geometry::SegmentSet(set) => set.iter().fold(group, |g, x| g.add(self.line(x))),
            Geometry::AdjacencyMap(map) => map.segments().fold(group, |g, x| g.add(self.line(&x))),
        }
    }

    fn coords(&self, point: Point) -> (f64, f64) {
        let (h, v) = self.context.coords(point);
        (h, -v)
    }

    fn circle(&self, point: Point, radius: f64) -> Circle {
        let (x, y) = self.coords(point);
        Circle::new()
            .set("cx", x)
            .set("cy", y)
            .set("r", radius)
            .set("fill", "currentColor")
    }

    fn line(&self, segment: &Segment) -> Line {
        let (x1, y1) = self.coords(segment.p1());
        let (x2, y2) = self.coords(segment.p2());
        Line::new()
            .set("x1", x1)
            .set("y1", y1)
            .set("x2", x2)
            .set("y2", y2)
    }

    fn polygon(&self, polygon: &Polygon) -> svg::node::element::Element {
        let points = polygon
            .points()
            .iter()
            .map(|&x| self.coords(x))
            .collect::<Vec<_>>();

        match polygon.closed() {
            true => SvgPolygon::new().set("points", points).into(),
            false => Polyline::new().set("points", points).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PolygonSet;

    #[test]
    fn renders_each_kind() {
        let context = Context::default();
        let square = Polygon::from_coords(
            &context,
            [(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (0.0, 1.0)],
            true,
        );

        let mut file = SvgFile::new(context);
        file.add(PolygonSet::from_elements(context, [square.clone()]));
        file.add(square.edges().next().unwrap());
        file.add(Point::new(1000, 500));
        assert_eq!(file.len(), 3);

        let out = file.document().to_string();
        assert!(out.contains("<polygon"));
        assert!(out.contains("<line"));
        assert!(out.contains("<circle"));
        // Up is negative y in the document.
        assert!(out.contains("0,-1"));
    }

    #[test]
    fn empty_document() {
        let file = SvgFile::new(Context::default());
        assert!(file.is_empty());

        let mut out = Vec::new();
        file.write(&mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("<svg"));
    }
}
