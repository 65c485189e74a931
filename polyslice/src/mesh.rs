use std::{collections::HashMap, sync::Arc};

use crate::{context::Context, geometry::SegmentSet, intersection, Pos};

/// A mesh made of vertices and triangular faces. Faces wind counter
/// clockwise when seen from outside. Cloning is cheap, the buffers are
/// shared.
#[derive(Debug, Clone)]
pub struct Mesh {
    inner: Arc<MeshInner>,
}

#[derive(Debug)]
struct MeshInner {
    vertices: Box<[Pos]>,
    faces: Box<[[u32; 3]]>,
}

impl Mesh {
    pub fn new(vertices: Vec<Pos>, faces: Vec<[u32; 3]>) -> Self {
        Self {
            inner: Arc::new(MeshInner {
                vertices: vertices.into_boxed_slice(),
                faces: faces.into_boxed_slice(),
            }),
        }
    }

    /// Axis aligned box between `min` and `max`, mostly useful for testing.
    pub fn cuboid(min: Pos, max: Pos) -> Self {
        let vertices = (0..8)
            .map(|i| {
                Pos::new(
                    if i & 1 == 0 { min.x } else { max.x },
                    if i & 2 == 0 { min.y } else { max.y },
                    if i & 4 == 0 { min.z } else { max.z },
                )
            })
            .collect();

        let faces = vec![
            [0, 2, 1],
            [1, 2, 3],
            [4, 5, 6],
            [5, 7, 6],
            [0, 1, 4],
            [1, 5, 4],
            [2, 6, 3],
            [3, 6, 7],
            [0, 4, 2],
            [2, 4, 6],
            [1, 3, 5],
            [3, 7, 5],
        ];

        Self::new(vertices, faces)
    }

    pub fn vertices(&self) -> &[Pos] {
        self.inner.vertices.as_ref()
    }

    pub fn faces(&self) -> &[[u32; 3]] {
        self.inner.faces.as_ref()
    }

    pub fn face(&self, index: usize) -> [Pos; 3] {
        let face = self.faces()[index];
        face.map(|x| self.vertices()[x as usize])
    }

    /// Unit normal of a face, `None` for degenerate triangles.
    pub fn normal(&self, index: usize) -> Option<Pos> {
        let [v0, v1, v2] = self.face(index);
        let edge1 = v2 - v1;
        let edge2 = v0 - v1;
        edge1.cross(&edge2).try_normalize(f64::EPSILON)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    pub fn face_count(&self) -> usize {
        self.faces().len()
    }

    /// Intersects every face with the plane of `context` in linear time.
    /// [`intersection::Segments1D`] avoids visiting faces far from the plane
    /// when slicing many layers.
    ///
    /// Each crossing face gives one segment, oriented so the solid lies on
    /// its left.
    pub fn intersect_plane(&self, context: &Context) -> SegmentSet {
        let segments =
            (0..self.face_count()).filter_map(|face| intersection::intersect_triangle(self, face, context));
        SegmentSet::from_elements(*context, segments)
    }

    /// Every edge is shared by exactly two faces.
    pub fn is_manifold(&self) -> bool {
        let mut edges = HashMap::<_, u8>::new();

        for [a, b, c] in self.faces() {
            for (a, b) in [(a, b), (b, c), (c, a)] {
                *edges.entry((a.min(b), a.max(b))).or_default() += 1;
            }
        }

        edges.values().all(|&count| count == 2)
    }

    /// Get the minimum and maximum of each component of every vertex in the
    /// model. These points define the bounding box of the model.
    pub fn bounds(&self) -> (Pos, Pos) {
        self.vertices().iter().fold(
            (Pos::repeat(f64::MAX), Pos::repeat(f64::MIN)),
            |(min, max), v| (min.inf(v), max.sup(v)),
        )
    }
}
