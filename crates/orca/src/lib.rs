//! Loop breaking for scheduling graphs.
//!
//! [`acyclic`] takes a directed weighted multigraph whose edges are marked
//! cutable or uncutable and cuts a low-weight subset of the cutable edges so
//! that what remains is a DAG. It is the feedback-arc heuristic run before
//! code ordering. Strongly-connected components are projected onto a small
//! work graph and rewritten down to their essential structure; the surviving
//! cutable edges are then greedily promoted to uncutable in weight order,
//! cutting only those whose promotion would close a cycle.
//!
//! The algorithm is a polynomial heuristic, not an exact minimum feedback
//! arc set, and it is strictly single-threaded. Parallel input edges may be
//! coalesced into one work edge; cutting that work edge cuts every input
//! edge it stands for.

use std::path::PathBuf;

pub use orca_graph as graph;

mod acyclic;

pub use acyclic::{acyclic, acyclic_with};

#[derive(Debug, Clone)]
pub struct AcyclicOptions {
    /// Enables the self-loop and backward-edge cutters during the second
    /// simplification pass. The algorithm is correct without them, only
    /// slower; disabling them is useful when bisecting a bad cut choice.
    pub cut_simplify: bool,
    /// Staged Graphviz dumps of the work graph are written when this exceeds
    /// the per-stage threshold (5 for the post-simplification dump, 6 for
    /// the rest).
    pub dump_level: u32,
    /// Directory the staged dumps are written into.
    pub dump_dir: PathBuf,
}

impl Default for AcyclicOptions {
    fn default() -> Self {
        Self {
            cut_simplify: true,
            dump_level: 0,
            dump_dir: PathBuf::from("."),
        }
    }
}
