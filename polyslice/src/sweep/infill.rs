use common::config::InfillConfig;

use super::{event::SweepEvent, status::StatusView, SweepOperation};
use crate::{
    context::Context,
    geometry::{Point, Segment, SegmentSet},
};

/// Samples the status along vertical scan lines and emits the chords that
/// run inside source A. Lines are spaced evenly in lattice units and every
/// other line is traversed top to bottom.
pub struct LinearInfill {
    spacing: f64,
    offset: f64,
    min_depth: i32,
    connect: bool,
}

pub struct InfillStore {
    pub lines: SegmentSet,
    /// Index of the last emitted line with the point its last chord ended at.
    last: Option<(i64, Point)>,
    /// Spans of a line sitting exactly on an event column, sampled just left
    /// of the column.
    pending: Option<(i64, Vec<(f64, f64)>)>,
}

impl LinearInfill {
    pub fn new(context: &Context, config: &InfillConfig) -> Self {
        let spacing = context.to_lattice(config.effective_spacing()).max(1.0);
        Self {
            spacing,
            offset: if config.parity { 0.0 } else { spacing / 2.0 },
            min_depth: config.min_depth,
            connect: config.connect_lines,
        }
    }

    /// Horizontal position of scan line `k`.
    pub fn line(&self, k: i64) -> f64 {
        k as f64 * self.spacing + self.offset
    }

    /// Vertical spans inside source A along the line at `h`, bottom to top.
    fn spans(&self, h: f64, status: &StatusView) -> Vec<(f64, f64)> {
        let mut spans = Vec::new();
        let mut start = None;

        let crossed = |x: &&SweepEvent| x.contributing() && !x.is_vertical();
        for edge in status.iter().filter(crossed) {
            let below = edge.depth_below()[0] >= self.min_depth;
            let above = edge.depth_above()[0] >= self.min_depth;

            match (below, above) {
                (false, true) => start = Some(edge.v_at(h)),
                (true, false) => {
                    if let Some(start) = start.take() {
                        spans.push((start, edge.v_at(h)));
                    }
                }
                _ => {}
            }
        }

        spans
    }

    fn emit(&self, k: i64, h: f64, spans: &[(f64, f64)], store: &mut InfillStore) {
        let mut chords = spans
            .iter()
            .map(|&(lo, hi)| (Point::round(h, lo), Point::round(h, hi)))
            .collect::<Vec<_>>();

        if k.rem_euclid(2) == 1 {
            chords.reverse();
            chords.iter_mut().for_each(|x| *x = (x.1, x.0));
        }

        let (Some(first), Some(last)) = (chords.first(), chords.last()) else {
            return;
        };

        if self.connect {
            if let Some((prev_k, end)) = store.last {
                let close = (end.distance_squared(first.0) as f64).sqrt() <= 2.0 * self.spacing;
                if prev_k + 1 == k && close {
                    store.lines.extend(Segment::new(end, first.0));
                }
            }
        }

        store.last = Some((k, last.1));
        store
            .lines
            .extend(chords.iter().filter_map(|&(a, b)| Segment::new(a, b)));
    }
}

impl SweepOperation for LinearInfill {
    type Store = InfillStore;

    fn init(&self, context: &Context) -> Self::Store {
        InfillStore {
            lines: SegmentSet::new(*context),
            last: None,
            pending: None,
        }
    }

    /// A line on an event column only keeps what is inside on both sides of
    /// the column, so lines never run along a vertical wall.
    fn advance(&self, from: i64, to: i64, status: &StatusView, store: &mut Self::Store) {
        let mut k = ((from as f64 - self.offset) / self.spacing).ceil() as i64;
        while self.line(k) <= to as f64 {
            let h = self.line(k);
            if h == from as f64 {
                let left = match store.pending.take() {
                    Some((pending, spans)) if pending == k => spans,
                    _ => Vec::new(),
                };
                let spans = common_spans(&left, &self.spans(h, status));
                self.emit(k, h, &spans, store);
            } else if h == to as f64 {
                store.pending = Some((k, self.spans(h, status)));
            } else {
                let spans = self.spans(h, status);
                self.emit(k, h, &spans, store);
            }
            k += 1;
        }
    }

    fn handle_event(&self, _event: &SweepEvent, _status: &StatusView, _store: &mut Self::Store) {}
}

/// Intersection of two sorted lists of disjoint spans.
fn common_spans(a: &[(f64, f64)], b: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        let (lo, hi) = (a[i].0.max(b[j].0), a[i].1.min(b[j].1));
        if lo < hi {
            out.push((lo, hi));
        }

        match a[i].1 < b[j].1 {
            true => i += 1,
            false => j += 1,
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geometry::{Polygon, PolygonSet},
        sweep,
    };

    fn fill(polygons: &[Polygon], config: &InfillConfig) -> Vec<Segment> {
        let context = Context::default();
        let contour = PolygonSet::from_elements(context, polygons.iter().cloned());
        let operation = LinearInfill::new(&context, config);
        let store = sweep::run(
            &operation,
            &context,
            &contour.to_segments(),
            &SegmentSet::new(context),
        );
        store.lines.into_elements()
    }

    fn square(context: &Context, from: f64, to: f64) -> Polygon {
        Polygon::from_coords(context, [(from, from), (to, from), (to, to), (from, to)], true)
    }

    fn config(spacing: f64) -> InfillConfig {
        InfillConfig {
            spacing,
            density: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn hole_splits_chords() {
        let context = Context::default();
        let mut hole = square(&context, 4.0, 6.0);
        hole.reverse();

        let lines = fill(&[square(&context, 0.0, 10.0), hole], &config(2.0));
        assert_eq!(lines.len(), 6);

        // The line at x = 5 runs bottom to top around the hole.
        let middle = lines
            .iter()
            .filter(|x| x.p1().h == 5000)
            .map(|x| (x.p1().v, x.p2().v))
            .collect::<Vec<_>>();
        assert_eq!(middle, [(0, 4000), (6000, 10_000)]);
    }

    #[test]
    fn spans_intersect() {
        let a = [(0.0, 4.0), (6.0, 10.0)];
        let b = [(2.0, 8.0)];
        assert_eq!(common_spans(&a, &b), [(2.0, 4.0), (6.0, 8.0)]);
        assert!(common_spans(&a, &[]).is_empty());
    }

    #[test]
    fn parity_moves_lines() {
        let context = Context::default();
        let config = InfillConfig {
            parity: true,
            ..config(2.0)
        };

        let lines = fill(&[square(&context, 0.0, 10.0)], &config);
        let mut columns = lines.iter().map(|x| x.p1().h).collect::<Vec<_>>();
        columns.sort();
        assert_eq!(columns, [2000, 4000, 6000, 8000]);
    }

    #[test]
    fn connected_lines_form_a_path() {
        let context = Context::default();
        let config = InfillConfig {
            connect_lines: true,
            ..config(2.0)
        };

        let lines = fill(&[square(&context, 0.0, 10.0)], &config);
        assert_eq!(lines.len(), 9);
        assert!(lines.windows(2).all(|x| x[0].p2() == x[1].p1()));
    }
}
