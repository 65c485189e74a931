//! Fixed point 2D geometry kernel for layer slicing.
//!
//! Cross sections of a mesh come in as a [`geometry::SegmentSet`] on an integer
//! lattice defined by a [`context::Context`]. Everything else, polygon Boolean
//! operations ([`boolean`]), offsetting, decimation and infill line generation
//! ([`infill`]), runs through the single sweep line engine in [`sweep`] and is
//! turned back into closed loops by the [`adjacency::AdjacencyMap`].

use nalgebra::Vector3;

pub mod adjacency;
pub mod boolean;
pub mod context;
pub mod format;
pub mod geometry;
pub mod infill;
pub mod intersection;
pub mod mesh;
pub mod slicer;
pub mod sweep;

pub type Pos = Vector3<f64>;
