//! Infill line generation.

use std::f64::consts::FRAC_PI_2;

use common::config::{InfillConfig, InfillPattern};
use tracing::trace;

use crate::{
    geometry::{PolygonSet, SegmentSet},
    sweep::{self, infill::LinearInfill},
};

/// Fills the inside of `contour` with parallel lines at `config.angle`
/// degrees, or with two perpendicular sets of lines for a grid.
pub fn generate(contour: &PolygonSet, config: &InfillConfig) -> SegmentSet {
    let angle = config.angle.to_radians();
    let mut out = linear(contour, angle, config);

    if config.pattern == InfillPattern::Grid {
        out.extend(linear(contour, angle + FRAC_PI_2, config));
    }

    trace!(
        "Generated {} infill lines over {} loops",
        out.len(),
        contour.len()
    );
    out
}

/// Rotates the contour so the lines run vertically, sweeps it and rotates
/// the lines back.
fn linear(contour: &PolygonSet, angle: f64, config: &InfillConfig) -> SegmentSet {
    let context = *contour.context();
    if contour.is_empty() {
        return SegmentSet::new(context);
    }

    let mut rotated = contour.clone();
    rotated.rotate(-angle);

    let operation = LinearInfill::new(&context, config);
    let store = sweep::run(
        &operation,
        &context,
        &rotated.to_segments(),
        &SegmentSet::new(context),
    );

    let mut lines = store.lines;
    lines.rotate(angle);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        context::Context,
        geometry::{Point, Polygon},
    };

    fn square(context: &Context, size: f64) -> PolygonSet {
        let polygon = Polygon::from_coords(
            context,
            [(0.0, 0.0), (size, 0.0), (size, size), (0.0, size)],
            true,
        );
        PolygonSet::from_elements(*context, [polygon])
    }

    fn config(pattern: InfillPattern, angle: f64) -> InfillConfig {
        InfillConfig {
            pattern,
            angle,
            spacing: 2.0,
            density: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn square_gets_alternating_chords() {
        let context = Context::default();
        let lines = generate(&square(&context, 10.0), &config(InfillPattern::Linear, 0.0));
        assert_eq!(lines.len(), 5);

        for (i, line) in lines.iter().enumerate() {
            let h = 1000 + 2000 * i as i64;
            assert_eq!(line.p1().h, h);
            assert_eq!(line.p2().h, h);
            assert_eq!(line.length(), 10_000.0);

            let upward = line.p2().v > line.p1().v;
            assert_eq!(upward, i % 2 == 0);
        }
    }

    #[test]
    fn grid_adds_crossing_lines() {
        let context = Context::default();
        let lines = generate(&square(&context, 10.0), &config(InfillPattern::Grid, 0.0));
        assert_eq!(lines.len(), 10);

        let vertical = lines.iter().filter(|x| x.p1().h == x.p2().h).count();
        let horizontal = lines.iter().filter(|x| x.p1().v == x.p2().v).count();
        assert_eq!((vertical, horizontal), (5, 5));
    }

    #[test]
    fn rotated_lines_stay_inside() {
        let context = Context::default();
        let contour = square(&context, 10.0);
        let lines = generate(&contour, &config(InfillPattern::Linear, 45.0));
        assert!(!lines.is_empty());

        let polygon = &contour.elements()[0];
        for line in &lines {
            let (h, v) = line.midpoint();
            assert!(polygon.contains(Point::round(h, v)));

            // Chords run along (-1, 1) once rotated back.
            let direction = line.direction();
            assert!((direction.h + direction.v).abs() <= 2);
        }
    }

    #[test]
    fn empty_contour() {
        let context = Context::default();
        let lines = generate(&PolygonSet::new(context), &InfillConfig::default());
        assert!(lines.is_empty());
    }
}
