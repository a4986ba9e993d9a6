//! Error taxonomy for graph generation.
//!
//! Every error is local to one unit of generation (a configuration, a piece
//! or the lattice). The failing unit is abandoned and the error is handed back
//! to the caller; units that already completed are plain values and stay valid.

use crate::lattice::SiteId;
use glam::IVec3;
use thiserror::Error;

/// Errors raised while building trees, junction graphs or lattices.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// The branch tree is structurally unusable (empty fork, empty tree, ...).
    #[error("malformed branch tree: {0}")]
    MalformedTree(String),

    /// A step uses a vector outside the puzzle's declared alphabet.
    #[error("direction {direction} is not part of the {alphabet} alphabet")]
    ForeignDirection {
        direction: IVec3,
        alphabet: &'static str,
    },

    /// The linearizer tried to take an element from an empty branch.
    #[error("traversal exhausted: branch below junction {parent} has no elements")]
    ExhaustedTraversal { parent: usize },

    /// An adjacency was recorded on one endpoint only.
    #[error("one-sided lattice edge {from:?} -> {to:?} along {direction}")]
    AdjacencyAsymmetry {
        from: SiteId,
        to: SiteId,
        direction: IVec3,
    },

    /// `[` and `]` in a symbol stream do not pair up.
    #[error("unbalanced brackets at symbol {index}")]
    UnbalancedBrackets { index: usize },

    /// The text notation of a branch tree could not be parsed.
    #[error("parse error at offset {offset}: {message}")]
    Parse { offset: usize, message: String },

    /// A lattice extent with a zero dimension.
    #[error("invalid lattice extent: {0}")]
    InvalidExtent(String),

    /// The catalog itself is inconsistent (e.g. duplicate piece ids).
    #[error("malformed catalog: {0}")]
    MalformedCatalog(String),

    /// Generation of a single piece failed.
    #[error("piece '{id}': {source}")]
    InPiece {
        id: char,
        #[source]
        source: Box<GenerateError>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GenerateError>;
