use itertools::Itertools;

use super::{orient, Bounds, Point, Segment};
use crate::context::Context;

/// Ordered list of lattice points, either a closed loop or an open chain.
///
/// Closed loops wind counter clockwise around material (positive area) and
/// clockwise around holes (negative area), so the interior is always on the
/// left. No three consecutive points are ever collinear.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    points: Vec<Point>,
    closed: bool,

    area: f64,
    bounds: Option<Bounds>,
}

impl Polygon {
    pub fn new(points: Vec<Point>, closed: bool) -> Self {
        let mut out = Self {
            points,
            closed,
            area: 0.0,
            bounds: None,
        };
        out.update();
        out
    }

    /// Builds a polygon from real coordinates, rounding onto the context's
    /// lattice.
    pub fn from_coords(
        context: &Context,
        coords: impl IntoIterator<Item = (f64, f64)>,
        closed: bool,
    ) -> Self {
        let points = coords
            .into_iter()
            .map(|(h, v)| context.point(h, v))
            .collect();
        Self::new(points, closed)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn closed(&self) -> bool {
        self.closed
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Signed area in square lattice units.
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Signed area in square real units.
    pub fn real_area(&self, context: &Context) -> f64 {
        self.area / (context.scale() * context.scale())
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn is_valid(&self) -> bool {
        match self.closed {
            true => self.points.len() >= 3 && self.area != 0.0,
            false => self.points.len() >= 2,
        }
    }

    pub fn is_hole(&self) -> bool {
        self.closed && self.area < 0.0
    }

    /// Edges in order, including the closing edge of a loop.
    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        let closing = (self.closed && self.points.len() > 2)
            .then(|| Segment::new(self.points[self.points.len() - 1], self.points[0]))
            .flatten();

        self.points
            .iter()
            .tuple_windows()
            .filter_map(|(&a, &b)| Segment::new(a, b))
            .chain(closing)
    }

    pub fn perimeter(&self) -> f64 {
        self.edges().map(|x| x.length()).sum()
    }

    /// Winding number of the loop around `point`. Zero for open chains.
    pub fn winding(&self, point: Point) -> i32 {
        if !self.closed {
            return 0;
        }

        let mut winding = 0;
        for edge in self.edges() {
            let (a, b) = (edge.p1(), edge.p2());
            if a.v <= point.v {
                if b.v > point.v && orient(a, b, point) > 0 {
                    winding += 1;
                }
            } else if b.v <= point.v && orient(a, b, point) < 0 {
                winding -= 1;
            }
        }

        winding
    }

    pub fn contains(&self, point: Point) -> bool {
        self.winding(point) != 0
    }

    pub fn reverse(&mut self) {
        self.points.reverse();
        self.area = -self.area;
    }

    /// Rotates every point about the lattice origin by `angle` radians.
    pub fn rotate(&mut self, angle: f64) {
        self.points.iter_mut().for_each(|x| *x = x.rotate(angle));
        self.update();
    }

    pub(crate) fn set_points(&mut self, points: Vec<Point>) {
        self.points = points;
        self.update();
    }

    /// Marks the polygon as degenerate. Sets drop it on insertion.
    pub(crate) fn invalidate(&mut self) {
        self.points.clear();
        self.update();
    }

    fn update(&mut self) {
        remove_collinear(&mut self.points, self.closed);
        self.area = match self.closed {
            true => signed_area(&self.points),
            false => 0.0,
        };
        self.bounds = Bounds::of(self.points.iter().copied());
    }
}

/// Shoelace formula, in square lattice units.
pub(crate) fn signed_area(points: &[Point]) -> f64 {
    let twice = points
        .iter()
        .circular_tuple_windows()
        .map(|(&a, &b)| a.cross(b))
        .sum::<i128>();
    twice as f64 / 2.0
}

/// Drops repeated points and any point in line with its neighbors. Spikes that
/// double back on themselves count as collinear and are removed too. The end
/// points of open chains are kept.
fn remove_collinear(points: &mut Vec<Point>, closed: bool) {
    points.dedup();
    if closed {
        while points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
    }

    let mut i = 0;
    let mut unchanged = 0;
    while points.len() >= 3 && unchanged < points.len() {
        let n = points.len();
        let idx = i % n;

        if closed || (idx != 0 && idx != n - 1) {
            let (a, b, c) = (points[(idx + n - 1) % n], points[idx], points[(idx + 1) % n]);
            if orient(a, b, c) == 0 {
                points.remove(idx);
                unchanged = 0;
                // Step back so the previous point gets checked against its new neighbor.
                i = idx + n - 2;
                continue;
            }
        }

        unchanged += 1;
        i = idx + 1;
    }

    if closed && points.len() < 3 {
        points.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: i64) -> Polygon {
        Polygon::new(
            vec![
                Point::new(0, 0),
                Point::new(size, 0),
                Point::new(size, size),
                Point::new(0, size),
            ],
            true,
        )
    }

    #[test]
    fn signed_area_orientation() {
        let mut polygon = square(10);
        assert_eq!(polygon.area(), 100.0);
        assert!(!polygon.is_hole());

        polygon.reverse();
        assert_eq!(polygon.area(), -100.0);
        assert!(polygon.is_hole());
    }

    #[test]
    fn collinear_points_removed() {
        let polygon = Polygon::new(
            vec![
                Point::new(0, 0),
                Point::new(5, 0),
                Point::new(10, 0),
                Point::new(10, 10),
                Point::new(10, 10),
                Point::new(0, 10),
                Point::new(0, 5),
            ],
            true,
        );
        assert_eq!(polygon.len(), 4);
        assert_eq!(polygon.area(), 100.0);
    }

    #[test]
    fn spike_removed() {
        let polygon = Polygon::new(
            vec![
                Point::new(0, 0),
                Point::new(10, 0),
                Point::new(20, 0),
                Point::new(10, 0),
                Point::new(10, 10),
            ],
            true,
        );
        assert_eq!(
            polygon.points(),
            [Point::new(0, 0), Point::new(10, 0), Point::new(10, 10)]
        );
    }

    #[test]
    fn degenerate_is_invalid() {
        let line = Polygon::new(vec![Point::new(0, 0), Point::new(4, 4), Point::new(8, 8)], true);
        assert!(!line.is_valid());

        let chain = Polygon::new(vec![Point::new(0, 0), Point::new(4, 4), Point::new(8, 8)], false);
        assert!(chain.is_valid());
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn winding_number() {
        let polygon = square(10);
        assert_eq!(polygon.winding(Point::new(5, 5)), 1);
        assert_eq!(polygon.winding(Point::new(15, 5)), 0);

        let mut hole = square(10);
        hole.reverse();
        assert_eq!(hole.winding(Point::new(5, 5)), -1);
    }

    #[test]
    fn edges_close_the_loop() {
        let polygon = square(4);
        let edges = polygon.edges().collect::<Vec<_>>();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3].p2(), Point::new(0, 0));
        assert_eq!(polygon.perimeter(), 16.0);
    }
}
