use crate::{
    context::Context,
    geometry::Segment,
    mesh::Mesh,
    Pos,
};

pub mod segments_1d;
pub use segments_1d::Segments1D;

/// Intersects the plane of `context` with one face of `mesh`. The segment
/// runs along `axis × normal`, which keeps the solid on its left in the
/// lattice plane. Faces touching the plane at a single point, degenerate
/// faces and crossings shorter than one lattice unit give `None`.
pub fn intersect_triangle(mesh: &Mesh, face: usize, context: &Context) -> Option<Segment> {
    let [v0, v1, v2] = mesh.face(face);
    let axis = context.axis().index();

    // Signed distances from the plane. An edge crosses it when its ends are
    // on different sides.
    let depth = context.depth();
    let (a, b, c) = (v0[axis] - depth, v1[axis] - depth, v2[axis] - depth);
    let (a_pos, b_pos, c_pos) = (a > 0.0, b > 0.0, c > 0.0);

    let mut out = [Pos::zeros(); 2];
    let mut n = 0;

    let mut push_intersection = |a: f64, b: f64, v0: Pos, v1: Pos| {
        let t = a / (a - b);
        out[n] = v0 + t * (v1 - v0);
        n += 1;
    };

    (a_pos ^ b_pos).then(|| push_intersection(a, b, v0, v1));
    (b_pos ^ c_pos).then(|| push_intersection(b, c, v1, v2));
    (c_pos ^ a_pos).then(|| push_intersection(c, a, v2, v0));

    if n != 2 {
        return None;
    }

    let normal = mesh.normal(face)?;
    let mut unit = Pos::zeros();
    unit[axis] = 1.0;
    let direction = unit.cross(&normal);
    let (dh, dv) = (
        direction[context.horizontal().index()],
        direction[context.vertical().index()],
    );

    let (p1, p2) = (context.from_vector3(&out[0]), context.from_vector3(&out[1]));
    let delta = p2 - p1;
    match delta.h as f64 * dh + delta.v as f64 * dv >= 0.0 {
        true => Segment::new(p1, p2),
        false => Segment::new(p2, p1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    #[test]
    fn segment_keeps_solid_on_left() {
        // Single face of a wall at x = 1 facing +x.
        let mesh = Mesh::new(
            vec![
                Pos::new(1.0, 0.0, 0.0),
                Pos::new(1.0, 2.0, 0.0),
                Pos::new(1.0, 0.0, 2.0),
            ],
            vec![[0, 1, 2]],
        );
        let context = Context::default().with_depth(0.5);

        let segment = intersect_triangle(&mesh, 0, &context).unwrap();
        assert_eq!(segment.p1(), Point::new(1000, 0));
        assert_eq!(segment.p2(), Point::new(1000, 1500));
        assert!(segment.is_left(Point::new(0, 750)));
    }

    #[test]
    fn touching_vertex_is_ignored() {
        let mesh = Mesh::new(
            vec![
                Pos::new(0.0, 0.0, 0.0),
                Pos::new(1.0, 0.0, 1.0),
                Pos::new(0.0, 1.0, 1.0),
            ],
            vec![[0, 1, 2]],
        );
        let context = Context::default().with_depth(1.0);
        assert_eq!(intersect_triangle(&mesh, 0, &context), None);
    }
}
