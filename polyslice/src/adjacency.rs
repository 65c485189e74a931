//! Reassembles an unordered bag of directed segments into loops.

use std::{collections::HashMap, f64::consts::PI};

use nalgebra::Vector2;
use ordered_float::OrderedFloat;

use crate::{
    context::Context,
    geometry::{Point, Polygon, PolygonSet, Segment, SegmentSet},
};

/// Directed graph over the distinct end points of a set of segments. Nodes
/// live in an arena and refer to each other by index.
///
/// Extracting loops consumes edges, so a map can only be drained once.
#[derive(Clone, Debug)]
pub struct AdjacencyMap {
    context: Context,
    nodes: Vec<Node>,
    index: HashMap<Point, usize>,
    edges: usize,
}

#[derive(Clone, Debug)]
struct Node {
    point: Point,
    next: Vec<usize>,
    predecessors: usize,
}

impl AdjacencyMap {
    pub fn new(context: Context) -> Self {
        Self {
            context,
            nodes: Vec::new(),
            index: HashMap::new(),
            edges: 0,
        }
    }

    pub fn from_segments(segments: &SegmentSet) -> Self {
        let mut map = Self::new(*segments.context());
        for segment in segments {
            map.add_segment(segment);
        }
        map
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn add_segment(&mut self, segment: &Segment) {
        let from = self.node(segment.p1());
        let to = self.node(segment.p2());

        self.nodes[from].next.push(to);
        self.nodes[to].predecessors += 1;
        self.edges += 1;
    }

    /// Number of edges not yet consumed.
    pub fn edge_count(&self) -> usize {
        self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The edges still in the map.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.nodes.iter().flat_map(move |node| {
            node.next
                .iter()
                .filter_map(move |&next| Segment::new(node.point, self.nodes[next].point))
        })
    }

    /// Walks one chain of edges, consuming them. The walk stops when it gets
    /// back to its start (a closed loop) or runs out of edges (an open chain).
    ///
    /// With `allow_open` the walk prefers starting at a node nothing points
    /// into, so open chains come out whole instead of in pieces.
    pub fn get_loop(&mut self, allow_open: bool) -> Option<Polygon> {
        let start = self.start_node(allow_open)?;

        let mut points = vec![self.nodes[start].point];
        let mut current = start;
        let mut incoming = None;
        let mut closed = false;

        while let Some(next) = self.take_edge(current, incoming) {
            if next == start {
                closed = true;
                break;
            }

            let point = self.nodes[next].point;
            incoming = Some(point - self.nodes[current].point);
            points.push(point);
            current = next;
        }

        Some(Polygon::new(points, closed))
    }

    /// Drains the whole map. Open chains are only kept with `allow_open`,
    /// degenerate loops are always dropped.
    pub fn get_loops(mut self, allow_open: bool) -> PolygonSet {
        let mut out = PolygonSet::new(self.context);
        while let Some(polygon) = self.get_loop(allow_open) {
            if polygon.closed() || allow_open {
                out.add(polygon);
            }
        }
        out
    }

    fn node(&mut self, point: Point) -> usize {
        *self.index.entry(point).or_insert_with(|| {
            self.nodes.push(Node {
                point,
                next: Vec::new(),
                predecessors: 0,
            });
            self.nodes.len() - 1
        })
    }

    fn start_node(&self, allow_open: bool) -> Option<usize> {
        let open_start = allow_open
            .then(|| {
                self.nodes
                    .iter()
                    .position(|x| x.predecessors == 0 && !x.next.is_empty())
            })
            .flatten();

        open_start.or_else(|| self.nodes.iter().position(|x| !x.next.is_empty()))
    }

    /// Removes and returns the edge leaving `node` that turns furthest
    /// clockwise relative to the `incoming` direction.
    fn take_edge(&mut self, node: usize, incoming: Option<Point>) -> Option<usize> {
        let next = &self.nodes[node].next;
        let choice = match (next.len(), incoming) {
            (0, _) => return None,
            (1, _) | (_, None) => 0,
            (_, Some(incoming)) => {
                let from = self.nodes[node].point;
                let incoming = incoming.to_vector();
                next.iter()
                    .enumerate()
                    .min_by_key(|(_, &x)| {
                        let out = (self.nodes[x].point - from).to_vector();
                        OrderedFloat(turn(incoming, out))
                    })
                    .map(|(idx, _)| idx)
                    .unwrap_or(0)
            }
        };

        let target = self.nodes[node].next.swap_remove(choice);
        self.nodes[target].predecessors -= 1;
        self.edges -= 1;
        Some(target)
    }
}

/// Signed angle from `incoming` to `out`, negative when turning clockwise.
/// Doubling back is always the widest counter clockwise turn, whatever the
/// sign of the zero cross product.
fn turn(incoming: Vector2<f64>, out: Vector2<f64>) -> f64 {
    let (perp, dot) = (incoming.perp(&out), incoming.dot(&out));
    match perp == 0.0 && dot < 0.0 {
        true => PI,
        false => perp.atan2(dot),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn ngon(sides: usize, radius: f64) -> Vec<Point> {
        (0..sides)
            .map(|i| {
                let angle = i as f64 / sides as f64 * std::f64::consts::TAU;
                Point::round(angle.cos() * radius, angle.sin() * radius)
            })
            .collect()
    }

    fn edges(points: &[Point]) -> Vec<Segment> {
        (0..points.len())
            .filter_map(|i| Segment::new(points[i], points[(i + 1) % points.len()]))
            .collect()
    }

    proptest! {
        #[test]
        fn ngon_reassembles(sides in 3_usize..64, order in any::<u64>()) {
            let points = ngon(sides, 10_000.0);
            let mut edges = edges(&points);

            // Deterministic shuffle driven by the generated seed.
            let mut state = order | 1;
            for i in (1..edges.len()).rev() {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                edges.swap(i, (state % (i as u64 + 1)) as usize);
            }

            let segments = SegmentSet::from_elements(Context::default(), edges);
            let loops = segments.to_polygons(false);
            prop_assert_eq!(loops.len(), 1);

            let polygon = &loops.elements()[0];
            prop_assert!(polygon.closed());
            prop_assert_eq!(polygon.len(), sides);
            prop_assert!(polygon.area() > 0.0);
        }
    }

    #[test]
    fn pinched_loops_consume_every_edge() {
        // Two squares sharing the corner (10, 10).
        let a = [(0, 0), (10, 0), (10, 10), (0, 10)].map(|(h, v)| Point::new(h, v));
        let b = [(10, 10), (20, 10), (20, 20), (10, 20)].map(|(h, v)| Point::new(h, v));
        let segments = SegmentSet::from_elements(
            Context::default(),
            edges(&a).into_iter().chain(edges(&b)),
        );

        // The clockwise-most rule hops across the shared corner, so the two
        // squares come out as one loop touching itself there.
        let loops = segments.to_polygons(false);
        assert_eq!(loops.area(), 200.0);
        assert_eq!(loops.iter().map(|x| x.len()).sum::<usize>(), 8);
    }

    #[test]
    fn reversal_ranks_last() {
        let west = Vector2::new(-1.0, 0.0);
        assert_eq!(turn(west, Vector2::new(1.0, 0.0)), PI);
        assert!(turn(west, Vector2::new(0.0, 1.0)) < turn(west, Vector2::new(0.0, -1.0)));
        assert!(turn(west, Vector2::new(0.0, -1.0)) < PI);
    }

    #[test]
    fn walk_does_not_double_back() {
        // Arriving at the origin heading west, the edge back east must lose
        // to the clockwise turn north.
        let segments = [
            ((10, 0), (0, 0)),
            ((0, 0), (10, 0)),
            ((0, 0), (0, 10)),
            ((0, 10), (10, 0)),
        ]
        .map(|(a, b)| Segment::new(Point::new(a.0, a.1), Point::new(b.0, b.1)).unwrap());
        let segments = SegmentSet::from_elements(Context::default(), segments);
        let mut map = AdjacencyMap::from_segments(&segments);

        let first = map.get_loop(false).unwrap();
        assert!(first.closed());
        assert_eq!(
            first.points(),
            [Point::new(10, 0), Point::new(0, 0), Point::new(0, 10)]
        );
        assert_eq!(map.edge_count(), 1);
    }

    #[test]
    fn open_chain_kept_whole() {
        let points = [(0, 0), (5, 0), (5, 5), (9, 7)].map(|(h, v)| Point::new(h, v));
        let chain = points.windows(2).filter_map(|x| Segment::new(x[0], x[1]));

        // Insert back to front so the first node seen is not the chain start.
        let segments = SegmentSet::from_elements(Context::default(), chain.rev());
        let map = AdjacencyMap::from_segments(&segments);
        assert_eq!(map.edge_count(), 3);

        let loops = map.get_loops(true);
        assert_eq!(loops.len(), 1);
        assert!(!loops.elements()[0].closed());
        assert_eq!(loops.elements()[0].points(), points);

        assert!(segments.to_polygons(false).is_empty());
    }
}
