use crate::geometry::{orient, Point};

/// How two edges, each given as `(left, right)`, meet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Crossing {
    None,
    /// An end point of one edge lies on the other. Exact.
    Touch(Point),
    /// The interiors cross. Rounded to the nearest lattice point.
    Cross(Point),
    /// Collinear edges sharing the stretch from the first to the second point.
    Overlap(Point, Point),
}

pub fn crossing(a: (Point, Point), b: (Point, Point)) -> Crossing {
    let (o1, o2) = (orient(a.0, a.1, b.0), orient(a.0, a.1, b.1));

    if o1 == 0 && o2 == 0 {
        let lo = a.0.max(b.0);
        let hi = a.1.min(b.1);
        return match lo.cmp(&hi) {
            std::cmp::Ordering::Less => Crossing::Overlap(lo, hi),
            std::cmp::Ordering::Equal => Crossing::Touch(lo),
            std::cmp::Ordering::Greater => Crossing::None,
        };
    }

    let (o3, o4) = (orient(b.0, b.1, a.0), orient(b.0, b.1, a.1));
    let same_side = |x: i128, y: i128| (x > 0 && y > 0) || (x < 0 && y < 0);
    if same_side(o1, o2) || same_side(o3, o4) {
        return Crossing::None;
    }

    if o1 == 0 {
        return Crossing::Touch(b.0);
    } else if o2 == 0 {
        return Crossing::Touch(b.1);
    } else if o3 == 0 {
        return Crossing::Touch(a.0);
    } else if o4 == 0 {
        return Crossing::Touch(a.1);
    }

    // Distance of a's end points from b's line gives the position along a.
    let t = o3 as f64 / (o3 - o4) as f64;
    let (from, to) = (a.0.to_vector(), a.1.to_vector());
    Crossing::Cross(Point::from_vector(from + (to - from) * t))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(a: (i64, i64), b: (i64, i64)) -> (Point, Point) {
        (Point::new(a.0, a.1), Point::new(b.0, b.1))
    }

    #[test]
    fn proper_crossing() {
        let hit = crossing(edge((0, 0), (10, 10)), edge((0, 10), (10, 0)));
        assert_eq!(hit, Crossing::Cross(Point::new(5, 5)));
    }

    #[test]
    fn touching_end_point() {
        let hit = crossing(edge((0, 0), (10, 0)), edge((5, 0), (8, 6)));
        assert_eq!(hit, Crossing::Touch(Point::new(5, 0)));

        let shared = crossing(edge((0, 0), (10, 0)), edge((10, 0), (12, 6)));
        assert_eq!(shared, Crossing::Touch(Point::new(10, 0)));
    }

    #[test]
    fn collinear_cases() {
        let overlap = crossing(edge((0, 0), (10, 0)), edge((4, 0), (20, 0)));
        assert_eq!(overlap, Crossing::Overlap(Point::new(4, 0), Point::new(10, 0)));

        let apart = crossing(edge((0, 0), (4, 0)), edge((6, 0), (9, 0)));
        assert_eq!(apart, Crossing::None);
    }

    #[test]
    fn parallel_misses() {
        let hit = crossing(edge((0, 0), (10, 0)), edge((0, 1), (10, 1)));
        assert_eq!(hit, Crossing::None);
    }
}
