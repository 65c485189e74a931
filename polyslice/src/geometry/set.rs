use anyhow::{ensure, Result};

use super::{Bounds, Point, Polygon, Segment};
use crate::{adjacency::AdjacencyMap, context::Context};

/// Something a [`GeometrySet`] can hold.
pub trait Element: Clone {
    fn is_valid(&self) -> bool;
    fn element_bounds(&self) -> Option<Bounds>;
}

/// Unordered collection of elements sharing one [`Context`]. Invalid elements
/// are dropped when added and the bounds grow with every insertion.
#[derive(Clone, Debug)]
pub struct GeometrySet<T> {
    context: Context,
    elements: Vec<T>,
    bounds: Option<Bounds>,
}

pub type SegmentSet = GeometrySet<Segment>;
pub type PolygonSet = GeometrySet<Polygon>;

impl<T: Element> GeometrySet<T> {
    pub fn new(context: Context) -> Self {
        Self {
            context,
            elements: Vec::new(),
            bounds: None,
        }
    }

    pub fn from_elements(context: Context, elements: impl IntoIterator<Item = T>) -> Self {
        let mut out = Self::new(context);
        out.extend(elements);
        out
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Adds an element, returning false if it was invalid and got dropped.
    pub fn add(&mut self, element: T) -> bool {
        if !element.is_valid() {
            return false;
        }

        if let Some(bounds) = element.element_bounds() {
            self.bounds = Some(match self.bounds {
                Some(current) => current.union(bounds),
                None => bounds,
            });
        }

        self.elements.push(element);
        true
    }

    pub fn extend(&mut self, elements: impl IntoIterator<Item = T>) {
        for element in elements {
            self.add(element);
        }
    }

    /// Moves every element of `other` into this set. Sets built on different
    /// contexts are never combined.
    pub fn merge(&mut self, other: Self) -> Result<()> {
        ensure!(
            self.context == other.context,
            "can not merge sets with different contexts ({:?} and {:?})",
            self.context,
            other.context
        );

        self.extend(other.elements);
        Ok(())
    }

    pub fn filter(&self, predicate: impl Fn(&T) -> bool) -> Self {
        Self::from_elements(self.context, self.elements.iter().filter(|x| predicate(x)).cloned())
    }

    pub fn retain(&mut self, predicate: impl FnMut(&T) -> bool) {
        self.elements.retain(predicate);
        self.update_bounds();
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.bounds = None;
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    pub fn elements(&self) -> &[T] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<T> {
        self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    fn update_bounds(&mut self) {
        self.bounds = self
            .elements
            .iter()
            .filter_map(|x| x.element_bounds())
            .reduce(Bounds::union);
    }
}

impl GeometrySet<Segment> {
    /// Rotates every segment about the lattice origin.
    pub fn rotate(&mut self, angle: f64) {
        let elements = std::mem::take(&mut self.elements);
        self.bounds = None;
        self.extend(elements.iter().filter_map(|x| x.rotate(angle)));
    }

    pub fn reversed(&self) -> Self {
        Self::from_elements(self.context, self.elements.iter().map(|x| x.reversed()))
    }

    /// Total length in lattice units.
    pub fn length(&self) -> f64 {
        self.elements.iter().map(|x| x.length()).sum()
    }

    /// Chains the segments back into loops, see [`AdjacencyMap::get_loops`].
    pub fn to_polygons(&self, allow_open: bool) -> PolygonSet {
        AdjacencyMap::from_segments(self).get_loops(allow_open)
    }
}

impl GeometrySet<Polygon> {
    /// Sum of the signed areas in square lattice units. Holes subtract.
    pub fn area(&self) -> f64 {
        self.elements.iter().map(|x| x.area()).sum()
    }

    pub fn real_area(&self) -> f64 {
        let scale = self.context.scale();
        self.area() / (scale * scale)
    }

    /// Edges of every closed loop. Open chains bound nothing and are skipped.
    pub fn to_segments(&self) -> SegmentSet {
        let edges = self
            .elements
            .iter()
            .filter(|x| x.closed())
            .flat_map(|x| x.edges());
        SegmentSet::from_elements(self.context, edges)
    }

    /// Offsets a copy of every polygon, dropping the ones that collapse. The
    /// result may self overlap, run it through
    /// [`crate::boolean::normalize`] to resolve that.
    pub fn offset(&self, distance: f64, tolerance: f64) -> Self {
        let offset = self.elements.iter().cloned().map(|mut x| {
            x.offset(&self.context, distance, tolerance);
            x
        });
        Self::from_elements(self.context, offset)
    }

    pub fn decimate(&self, tolerance: f64) -> Self {
        let decimated = self.elements.iter().cloned().map(|mut x| {
            x.decimate(&self.context, tolerance);
            x
        });
        Self::from_elements(self.context, decimated)
    }

    pub fn rotate(&mut self, angle: f64) {
        let elements = std::mem::take(&mut self.elements);
        self.bounds = None;
        self.extend(elements.into_iter().map(|mut x| {
            x.rotate(angle);
            x
        }));
    }

    /// Summed winding number of all loops around `point`.
    pub fn winding(&self, point: Point) -> i32 {
        self.elements.iter().map(|x| x.winding(point)).sum()
    }
}

impl Element for Segment {
    fn is_valid(&self) -> bool {
        self.p1() != self.p2()
    }

    fn element_bounds(&self) -> Option<Bounds> {
        Some(self.bounds())
    }
}

impl Element for Polygon {
    fn is_valid(&self) -> bool {
        Polygon::is_valid(self)
    }

    fn element_bounds(&self) -> Option<Bounds> {
        self.bounds()
    }
}

impl<'a, T> IntoIterator for &'a GeometrySet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl<T> IntoIterator for GeometrySet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}
