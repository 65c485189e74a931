use super::{orient, Bounds, Point};

/// Directed line segment between two distinct lattice points. The interior of
/// whatever region it bounds lies to its left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Segment {
    p1: Point,
    p2: Point,
}

impl Segment {
    /// Returns `None` for zero length segments.
    pub fn new(p1: Point, p2: Point) -> Option<Self> {
        (p1 != p2).then_some(Self { p1, p2 })
    }

    pub fn p1(&self) -> Point {
        self.p1
    }

    pub fn p2(&self) -> Point {
        self.p2
    }

    pub fn reversed(self) -> Self {
        Self {
            p1: self.p2,
            p2: self.p1,
        }
    }

    pub fn direction(&self) -> Point {
        self.p2 - self.p1
    }

    pub fn length(&self) -> f64 {
        self.direction().length()
    }

    pub fn midpoint(&self) -> (f64, f64) {
        (
            (self.p1.h as f64 + self.p2.h as f64) / 2.0,
            (self.p1.v as f64 + self.p2.v as f64) / 2.0,
        )
    }

    /// Strictly left of the supporting line.
    pub fn is_left(&self, point: Point) -> bool {
        orient(self.p1, self.p2, point) > 0
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_point(self.p1).include(self.p2)
    }

    pub fn rotate(&self, angle: f64) -> Option<Self> {
        Self::new(self.p1.rotate(angle), self.p2.rotate(angle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_length() {
        let p = Point::new(4, 2);
        assert!(Segment::new(p, p).is_none());
        assert!(Segment::new(p, Point::new(4, 3)).is_some());
    }

    #[test]
    fn left_side() {
        let segment = Segment::new(Point::new(0, 0), Point::new(0, 10)).unwrap();
        assert!(segment.is_left(Point::new(-1, 5)));
        assert!(!segment.reversed().is_left(Point::new(-1, 5)));
    }
}
