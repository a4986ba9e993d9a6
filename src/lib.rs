//! # polycube-graph
//!
//! Turns polycube puzzle descriptions into the graphs a placement solver walks.
//!
//! Pieces are authored as nested branch/fork trees of unit steps
//! ([`BranchTree`]). Each base tree is expanded into its rotations and mirror
//! images ([`enumerate`]) and every variant is linearized into a
//! [`JunctionGraph`] ([`linearize`]). Independently, [`Lattice::build`] lays out
//! the grid of legal positions with bidirectional neighbour links. Both end up
//! in a [`PuzzleDocument`] for the solver.

pub mod direction;
pub mod error;
pub mod export;
pub mod interpreter;
pub mod junction;
pub mod lattice;
pub mod piece;
pub mod symmetry;
pub mod tree;

pub use direction::*;
pub use error::*;
pub use export::*;
pub use interpreter::*;
pub use junction::*;
pub use lattice::*;
pub use piece::*;
pub use symmetry::*;
pub use tree::*;
