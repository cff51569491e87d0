//! Graph container APIs used by the `orca` scheduling passes.
//!
//! The container is a directed weighted multigraph whose edges carry the
//! `cutable`/`cut` state the loop-breaking passes operate on. Vertex and edge
//! ids stay stable across deletions, so passes can hold ids in side tables
//! while they rewrite the graph underneath.

pub mod alg;
mod dot;
mod error;
mod graph;

pub use error::{Error, Result};
pub use graph::{EdgeId, EdgeInfo, Graph, VertexId, follow_always, follow_not_cutable};
