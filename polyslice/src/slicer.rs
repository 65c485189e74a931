//! Turns a mesh into per layer contours, walls and infill.

use std::{
    ops::Deref,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc, Condvar, Mutex, PoisonError,
    },
};

use common::config::{BooleanConfig, InfillConfig, LayerConfig};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, info};

use crate::{
    boolean,
    context::{Axis, Context},
    geometry::{Geometry, PolygonSet, SegmentSet},
    infill,
    intersection::Segments1D,
    mesh::Mesh,
};

const SEGMENT_LAYERS: usize = 100;

/// Slices a mesh along the Z axis.
pub struct Slicer {
    mesh: Mesh,
    config: LayerConfig,
    start: f64,
    layers: u32,
    progress: Progress,
}

/// Allows checking the progress of a slicing operation.
#[derive(Clone)]
pub struct Progress {
    inner: Arc<ProgressInner>,
}

pub struct ProgressInner {
    completed: AtomicU32,
    total: u32,

    notify: Condvar,
    last_completed: Mutex<u32>,
}

/// Everything produced for one slicing plane. Walls are ordered from the
/// outside in.
#[derive(Debug, Clone)]
pub struct Layer {
    pub index: u32,
    pub context: Context,
    pub contour: PolygonSet,
    pub walls: Vec<PolygonSet>,
    pub infill: SegmentSet,
}

impl Slicer {
    pub fn new(mesh: Mesh, config: LayerConfig) -> Self {
        let (min, max) = mesh.bounds();
        let height = max.z - min.z;
        let layers = match config.layer_height > 0.0 && height.is_finite() {
            true => (height / config.layer_height).ceil() as u32,
            false => 0,
        };

        Self {
            mesh,
            config,
            start: min.z,
            layers,
            progress: Progress {
                inner: Arc::new(ProgressInner {
                    completed: AtomicU32::new(0),
                    total: layers,

                    notify: Condvar::new(),
                    last_completed: Mutex::new(0),
                }),
            },
        }
    }

    /// Gets an instance of the slicing [`Progress`] struct.
    pub fn progress(&self) -> Progress {
        self.progress.clone()
    }

    pub fn layer_count(&self) -> u32 {
        self.layers
    }

    /// Planes sit halfway through each layer so they never graze the top or
    /// bottom faces of the mesh.
    pub fn layer_depth(&self, layer: u32) -> f64 {
        self.start + (layer as f64 + 0.5) * self.config.layer_height
    }

    pub fn slice(&self) -> Vec<Layer> {
        let context = Context::new(Axis::Z, self.start, self.config.precision);
        let segments = Segments1D::from_mesh(&self.mesh, &context, SEGMENT_LAYERS);

        let layers = (0..self.layers)
            .into_par_iter()
            .map(|layer| {
                let context = context.with_depth(self.layer_depth(layer));
                let out = self.slice_layer(layer, &context, &segments);
                self.progress.add_complete(1);
                out
            })
            .collect::<Vec<_>>();

        info!("Sliced {} layers", layers.len());
        layers
    }

    fn slice_layer(&self, index: u32, context: &Context, segments: &Segments1D) -> Layer {
        let boolean_config = BooleanConfig::default();
        let spacing = self.config.wall_spacing;

        let section = segments.intersect_plane(&self.mesh, context);
        let contour = boolean::normalize(&section, &boolean_config)
            .to_polygons(false)
            .decimate(self.config.decimate);

        let walls = (0..self.config.walls)
            .map(|i| {
                let distance = -(i as f64 + 0.5) * spacing;
                contour.offset(distance, spacing / 2.0).normalize(&boolean_config)
            })
            .take_while(|x| !x.is_empty())
            .collect::<Vec<_>>();

        let inside = match self.config.walls {
            0 => contour.clone(),
            walls => contour
                .offset(-(walls as f64) * spacing, spacing / 2.0)
                .normalize(&boolean_config),
        };

        // Alternate the line phase every layer so the infill is staggered.
        let config = InfillConfig {
            parity: self.config.infill.parity ^ (index % 2 == 1),
            ..self.config.infill
        };
        let infill = infill::generate(&inside, &config);

        debug!(
            "Layer {index}: {} contour loops, {} walls, {} infill lines",
            contour.len(),
            walls.len(),
            infill.len()
        );

        Layer {
            index,
            context: *context,
            contour,
            walls,
            infill,
        }
    }
}

impl Layer {
    pub fn geometry(&self) -> Vec<Geometry> {
        let mut out = vec![Geometry::from(self.contour.clone())];
        out.extend(self.walls.iter().cloned().map(Geometry::from));
        out.push(Geometry::from(self.infill.clone()));
        out
    }
}

impl Deref for Progress {
    type Target = ProgressInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Progress {
    /// Waits until the next layer is complete, returning the current count of
    /// sliced layers.
    pub fn wait(&self) -> u32 {
        let guard = self
            .last_completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut last_completed = self
            .notify
            .wait_while(guard, |last| {
                *last >= self.completed() && self.completed() < self.total
            })
            .unwrap_or_else(PoisonError::into_inner);

        let current = self.completed();
        *last_completed = (*last_completed).max(current);
        current
    }

    /// Returns the count of sliced layers.
    pub fn completed(&self) -> u32 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Returns the count of layers in the current slicing operation.
    pub fn total(&self) -> u32 {
        self.total
    }

    fn add_complete(&self, count: u32) {
        self.completed.fetch_add(count, Ordering::Relaxed);
        let _guard = self.last_completed.lock();
        self.notify.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pos;

    fn config() -> LayerConfig {
        LayerConfig {
            layer_height: 0.5,
            ..Default::default()
        }
    }

    #[test]
    fn box_layers() {
        let mesh = Mesh::cuboid(Pos::zeros(), Pos::new(10.0, 10.0, 2.0));
        let slicer = Slicer::new(mesh, config());
        assert_eq!(slicer.layer_count(), 4);
        assert_eq!(slicer.layer_depth(0), 0.25);

        let layers = slicer.slice();
        assert_eq!(layers.len(), 4);
        assert_eq!(slicer.progress().completed(), 4);

        for (i, layer) in layers.iter().enumerate() {
            assert_eq!(layer.index, i as u32);
            assert_eq!(layer.context.depth(), slicer.layer_depth(i as u32));
            assert!((layer.contour.real_area() - 100.0).abs() < 1e-3);

            assert_eq!(layer.walls.len(), 2);
            assert!((layer.walls[0].real_area() - 92.16).abs() < 1e-3);
            assert!((layer.walls[1].real_area() - 77.44).abs() < 1e-3);
            assert!(!layer.infill.is_empty());
        }
    }

    #[test]
    fn infill_is_staggered() {
        let mesh = Mesh::cuboid(Pos::zeros(), Pos::new(10.0, 10.0, 1.0));
        let config = LayerConfig {
            infill: InfillConfig {
                angle: 0.0,
                density: 1.0,
                spacing: 1.0,
                ..Default::default()
            },
            ..config()
        };

        let layers = Slicer::new(mesh, config).slice();
        let columns = |layer: &Layer| {
            let mut out = layer.infill.iter().map(|x| x.p1().h).collect::<Vec<_>>();
            out.sort();
            out
        };
        assert_ne!(columns(&layers[0]), columns(&layers[1]));
    }

    #[test]
    fn thin_part_loses_walls() {
        let mesh = Mesh::cuboid(Pos::zeros(), Pos::new(10.0, 1.0, 1.0));
        let config = LayerConfig {
            walls: 3,
            ..config()
        };

        let layers = Slicer::new(mesh, config).slice();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].walls.len(), 1);
        assert!(layers[0].infill.is_empty());
    }

    #[test]
    fn empty_mesh() {
        let slicer = Slicer::new(Mesh::new(Vec::new(), Vec::new()), config());
        assert_eq!(slicer.layer_count(), 0);
        assert!(slicer.slice().is_empty());
    }
}
