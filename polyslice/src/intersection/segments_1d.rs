use crate::{context::Context, geometry::SegmentSet, mesh::Mesh};

use super::intersect_triangle;

/// Buckets the faces of a mesh into equal slabs along one axis, so a plane
/// only has to be tested against the faces whose extent reaches its slab.
pub struct Segments1D {
    axis: usize,
    start: f64,
    slab: f64,
    buckets: Vec<Vec<usize>>,
}

impl Segments1D {
    /// Splits the extent of `mesh` along `context.axis()` into `slabs` slabs.
    pub fn from_mesh(mesh: &Mesh, context: &Context, slabs: usize) -> Self {
        let axis = context.axis().index();
        let (min, max) = mesh.bounds();
        let slabs = slabs.max(1);

        // Flat meshes get a single slab of nonzero height.
        let slab = match (max[axis] - min[axis]) / slabs as f64 {
            x if x > 0.0 && x.is_finite() => x,
            _ => 1.0,
        };
        let mut buckets = vec![Vec::new(); slabs + 1];

        for face in 0..mesh.face_count() {
            let heights = mesh.face(face).map(|x| x[axis]);
            let low = heights.iter().copied().fold(f64::MAX, f64::min);
            let high = heights.iter().copied().fold(f64::MIN, f64::max);

            let first = ((low - min[axis]) / slab).floor().max(0.0) as usize;
            let last = (((high - min[axis]) / slab).ceil() as usize).min(slabs);
            for bucket in buckets.iter_mut().take(last + 1).skip(first) {
                bucket.push(face);
            }
        }

        Self {
            axis,
            start: min[axis],
            slab,
            buckets,
        }
    }

    /// Intersects the plane of `context` with the faces in its slab. The
    /// context must use the axis this structure was built for.
    pub fn intersect_plane(&self, mesh: &Mesh, context: &Context) -> SegmentSet {
        let mut out = SegmentSet::new(*context);
        if context.axis().index() != self.axis {
            return mesh.intersect_plane(context);
        }

        let slab = (context.depth() - self.start) / self.slab;
        if slab < 0.0 || slab >= self.buckets.len() as f64 {
            return out;
        }

        out.extend(
            self.buckets[slab as usize]
                .iter()
                .filter_map(|&face| intersect_triangle(mesh, face, context)),
        );
        out
    }

    pub fn slabs(&self) -> usize {
        self.buckets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{context::Axis, Pos};

    #[test]
    fn matches_full_scan() {
        let mesh = Mesh::cuboid(Pos::new(-1.0, -1.0, 0.5), Pos::new(2.0, 3.0, 4.5));
        let context = Context::default();
        let segments = Segments1D::from_mesh(&mesh, &context, 7);

        for depth in [0.0, 0.5, 0.75, 1.3, 2.9, 4.4, 4.5, 6.0] {
            let context = context.with_depth(depth);
            let mut fast = segments.intersect_plane(&mesh, &context).into_elements();
            let mut slow = mesh.intersect_plane(&context).into_elements();
            fast.sort_by_key(|x| (x.p1(), x.p2()));
            slow.sort_by_key(|x| (x.p1(), x.p2()));
            assert_eq!(fast, slow, "depth {depth}");
        }
    }

    #[test]
    fn other_axis_falls_back() {
        let mesh = Mesh::cuboid(Pos::zeros(), Pos::repeat(2.0));
        let segments = Segments1D::from_mesh(&mesh, &Context::default(), 4);

        let context = Context::new(Axis::X, 1.0, 3);
        assert_eq!(segments.intersect_plane(&mesh, &context).len(), 8);
    }

    #[test]
    fn flat_mesh() {
        let mesh = Mesh::new(
            vec![Pos::zeros(), Pos::x(), Pos::y()],
            vec![[0, 1, 2]],
        );
        let segments = Segments1D::from_mesh(&mesh, &Context::default(), 0);
        assert_eq!(segments.slabs(), 2);
        assert!(segments
            .intersect_plane(&mesh, &Context::default())
            .is_empty());
    }
}
