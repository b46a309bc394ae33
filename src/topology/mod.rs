//! Combinatorial ideal triangulations.
//!
//! This module provides:
//! - oriented edge labels and canonical triangles,
//! - the gluing table a triangulation is built from,
//! - [`Triangulation`](triangulation::Triangulation) itself with flips and
//!   Pachner moves,
//! - label correspondences and the isometry search between triangulations.

pub mod edge;
pub mod gluing;
pub mod isometry;
pub mod label_map;
pub mod triangle;
pub mod triangulation;

pub use edge::Edge;
pub use label_map::LabelMap;
pub use triangle::Triangle;
pub use triangulation::Triangulation;
