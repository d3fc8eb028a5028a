//! Search components of the maximum clique solver.

/// candidate selection strategies
pub mod candidates;


/// eliminations recorded by the preprocessor
pub mod elimination_tree;

/// recursive graph preprocessing (RGPA)
pub mod preprocessor;

/// forced decisions on nearly complete vertices
pub mod degree;

/// greedy clique heuristic
pub mod heuristic;

/// branch and bound
pub mod brancher;

/// coordinator / workers distribution of the branch and bound
pub mod distributed;
