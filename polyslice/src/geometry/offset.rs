use std::f64::consts::PI;

use nalgebra::Vector2;

use super::{Point, Polygon};
use crate::context::Context;

/// Turns sharper than this get a two point cap instead of a single miter
/// point when offsetting away from the inside of the turn.
const CAP_ANGLE: f64 = 5.0 * PI / 6.0;

impl Polygon {
    /// Moves every edge of a closed loop `distance` real units to its right,
    /// outward for material and inward for holes, so a positive distance grows
    /// the solid and a negative one shrinks it.
    ///
    /// Each vertex moves along the bisector of its edge normals by
    /// `distance / cos(turn / 2)`. Offset points whose incoming edge ends up
    /// running against the original edge are dropped. Results with an area
    /// under `tolerance²` are invalidated.
    pub fn offset(&mut self, context: &Context, distance: f64, tolerance: f64) {
        if !self.closed() || !self.is_valid() {
            return;
        }

        let distance = context.to_lattice(distance);
        let tolerance = context.to_lattice(tolerance);
        if distance == 0.0 {
            return;
        }

        let original_area = self.area();
        let shrinking = (distance < 0.0) == (original_area > 0.0);
        if let Some(bounds) = self.bounds() {
            let minor = bounds.width().min(bounds.height()) as f64;
            if shrinking && distance.abs() * 2.0 >= minor {
                self.invalidate();
                return;
            }
        }

        let points = self.points().iter().map(|x| x.to_vector()).collect::<Vec<_>>();
        let candidates = offset_points(&points, distance);
        let Some(kept) = validate(&points, &candidates) else {
            self.invalidate();
            return;
        };

        self.set_points(kept);
        if self.area().abs() < tolerance * tolerance || self.area() * original_area <= 0.0 {
            self.invalidate();
        }
    }

    /// Vertex reduction. A point is kept only when it is more than
    /// `tolerance` real units away from the last kept point.
    pub fn decimate(&mut self, context: &Context, tolerance: f64) {
        let tolerance = context.to_lattice(tolerance);
        let limit = tolerance * tolerance;
        let Some(&end) = self.points().last() else {
            return;
        };

        let mut kept = Vec::<Point>::with_capacity(self.len());
        for &point in self.points() {
            match kept.last() {
                Some(last) if last.distance_squared(point) as f64 <= limit => {}
                _ => kept.push(point),
            }
        }

        if self.closed() {
            while kept.len() > 1 && kept[0].distance_squared(kept[kept.len() - 1]) as f64 <= limit {
                kept.pop();
            }
        } else if kept.last() != Some(&end) {
            if kept.len() > 1 {
                kept.pop();
            }
            kept.push(end);
        }

        self.set_points(kept);
        if self.closed() && self.area().abs() < limit {
            self.invalidate();
        }
    }
}

fn right_normal(direction: Vector2<f64>) -> Vector2<f64> {
    Vector2::new(direction.y, -direction.x)
}

/// Offset candidates tagged with the index of the vertex they came from.
fn offset_points(points: &[Vector2<f64>], distance: f64) -> Vec<(Vector2<f64>, usize)> {
    let n = points.len();
    let mut out = Vec::with_capacity(n + 8);

    for i in 0..n {
        let (a, b, c) = (points[(i + n - 1) % n], points[i], points[(i + 1) % n]);
        let (in_dir, out_dir) = ((b - a).normalize(), (c - b).normalize());
        let (n1, n2) = (right_normal(in_dir), right_normal(out_dir));

        // Signed turn, positive to the left.
        let turn = in_dir.perp(&out_dir).atan2(in_dir.dot(&out_dir));
        if turn.abs() > CAP_ANGLE && turn * distance > 0.0 {
            out.push((b + n1 * distance, i));
            out.push((b + n2 * distance, i));
        } else {
            let bisector = (n1 + n2).normalize();
            out.push((b + bisector * (distance / (turn / 2.0).cos()), i));
        }
    }

    out
}

/// Repeatedly drops candidates whose incoming edge points against the
/// original edge between their source vertices. `None` when fewer than three
/// survive.
fn validate(points: &[Vector2<f64>], candidates: &[(Vector2<f64>, usize)]) -> Option<Vec<Point>> {
    let mut alive = (0..candidates.len()).collect::<Vec<_>>();

    'outer: loop {
        if alive.len() < 3 {
            return None;
        }

        for j in 0..alive.len() {
            let next = (j + 1) % alive.len();
            let (p, p_src) = candidates[alive[j]];
            let (q, q_src) = candidates[alive[next]];
            if p_src == q_src {
                continue;
            }

            let original = points[q_src] - points[p_src];
            if (q - p).dot(&original) <= 0.0 {
                alive.remove(next);
                continue 'outer;
            }
        }

        break;
    }

    Some(
        alive
            .into_iter()
            .map(|x| Point::from_vector(candidates[x].0))
            .collect(),
    )
}
