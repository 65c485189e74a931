use serde::{Deserialize, Serialize};

use crate::{geometry::Point, Pos};

/// Axis perpendicular to the slicing plane.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Fixes how 3D float coordinates map onto the integer lattice used by every
/// kernel operation: the plane (`axis` at `depth`) and the number of decimal
/// digits kept (`precision`).
///
/// Everything taking part in one operation must share an equal context.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Context {
    axis: Axis,
    depth: f64,
    precision: u32,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The (horizontal, vertical) axes of the plane perpendicular to this one.
    /// Together with `self` they form a right handed frame.
    pub fn plane(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::Z, Axis::X),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }
}

impl Context {
    pub fn new(axis: Axis, depth: f64, precision: u32) -> Self {
        Self {
            axis,
            depth,
            precision,
        }
    }

    /// Same lattice on a different plane along the same axis.
    pub fn with_depth(&self, depth: f64) -> Self {
        Self { depth, ..*self }
    }

    pub fn with_axis(&self, axis: Axis) -> Self {
        Self { axis, ..*self }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn horizontal(&self) -> Axis {
        self.axis.plane().0
    }

    pub fn vertical(&self) -> Axis {
        self.axis.plane().1
    }

    /// Lattice units per real unit, `10^precision`.
    pub fn scale(&self) -> f64 {
        10_f64.powi(self.precision as i32)
    }

    /// Real size of one lattice unit, `10^-precision`.
    pub fn epsilon(&self) -> f64 {
        self.scale().recip()
    }

    /// Converts a real length into (unrounded) lattice units.
    pub fn to_lattice(&self, value: f64) -> f64 {
        value * self.scale()
    }

    pub fn from_lattice(&self, value: f64) -> f64 {
        value / self.scale()
    }

    /// Rounds a real in-plane coordinate pair onto the lattice.
    pub fn point(&self, h: f64, v: f64) -> Point {
        Point::round(self.to_lattice(h), self.to_lattice(v))
    }

    /// Real in-plane coordinates of a lattice point.
    pub fn coords(&self, point: Point) -> (f64, f64) {
        (
            self.from_lattice(point.h as f64),
            self.from_lattice(point.v as f64),
        )
    }

    /// Projects a 3D position onto the plane, dropping the axis component.
    pub fn from_vector3(&self, pos: &Pos) -> Point {
        self.point(
            pos[self.horizontal().index()],
            pos[self.vertical().index()],
        )
    }

    /// Lifts a lattice point back into 3D at this context's depth.
    pub fn to_vector3(&self, point: Point) -> Pos {
        let (h, v) = self.coords(point);
        let mut out = Pos::zeros();
        out[self.horizontal().index()] = h;
        out[self.vertical().index()] = v;
        out[self.axis.index()] = self.depth;
        out
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Axis::Z, 0.0, 3)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    prop_compose! {
        fn arb_context()(axis in 0_usize..3, depth in -100.0..100.0, precision in 0_u32..6) -> Context {
            let axis = [Axis::X, Axis::Y, Axis::Z][axis];
            Context::new(axis, depth, precision)
        }
    }

    proptest! {
        #[test]
        fn vector_round_trip(
            context in arb_context(),
            x in -1.0e4..1.0e4,
            y in -1.0e4..1.0e4,
            z in -1.0e4..1.0e4,
        ) {
            let point = context.from_vector3(&Pos::new(x, y, z));
            let again = context.from_vector3(&context.to_vector3(point));
            prop_assert_eq!(point, again);
        }
    }

    #[test]
    fn plane_axes() {
        let context = Context::new(Axis::X, 2.0, 1);
        assert_eq!(context.horizontal(), Axis::Y);
        assert_eq!(context.vertical(), Axis::Z);

        let point = context.from_vector3(&Pos::new(9.0, 1.26, -0.34));
        assert_eq!(point, Point::new(13, -3));
        assert_eq!(context.to_vector3(point), Pos::new(2.0, 1.3, -0.3));
    }

    #[test]
    fn equal_input_equal_point() {
        let context = Context::default();
        let a = context.point(0.1 + 0.2, 1.0);
        let b = context.point(0.3, 1.0);
        assert_eq!(a, b);
        assert_eq!(context.with_depth(4.0).point(0.3, 1.0), a);
    }
}
