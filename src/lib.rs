//! DOGS implementation of the Maximum Clique problem (branch and bound with recursive preprocessing)

// #![warn(clippy::all, clippy::pedantic)]
// useful additional warnings if docs are missing, or crates imported but unused, etc.
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(unsafe_code)]
#![warn(unused_extern_crates)]
#![warn(variant_size_differences)]

// not sure if already by default in clippy
#![warn(clippy::similar_names)]
#![warn(clippy::shadow_unrelated)]
#![warn(clippy::shadow_same)]
#![warn(clippy::shadow_reuse)]


/// error type of the crate
pub mod error;

/// graph stored as a bit matrix, with a traversal order
pub mod graph;

/// vertex sets (selections of vertices of a graph) and their packed form
pub mod vertex_set;

/// greedy coloring (upper bound on the clique number)
pub mod coloring;

/// greedy anti-matching (upper bound on the clique number)
pub mod matching;

/// read/write edge list files
pub mod edge_list;

/// read DIMACS files
pub mod dimacs;

/// search parameters (JSON)
pub mod config;

/// branch and bound, preprocessing and distributed search
pub mod search;

/// maximum clique pipeline
pub mod finder;

/// random graphs and brute force (for tests and benchmarks)
pub mod generators;

/// logging setup
pub mod logging;

/// helper and utility methods for executables
pub mod util;

pub use error::{CliqueError, Result};
pub use finder::{find_maximum_clique, find_maximum_clique_with};
pub use graph::{Graph, VertexId};
pub use vertex_set::VertexSet;
