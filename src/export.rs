//! The document handed to the solver.
//!
//! ```json
//! {
//!   "pieces": [ { "id": "A", "configurations": [
//!       { "seed": 0, "junctions": [ { "id": 0, "edges": [ { "to": 1, "direction": [1, 0, 0] } ] }, ... ] }
//!   ] } ],
//!   "lattice": { "layers": [ { "rows": [ { "sites": [
//!       { "x": 0, "y": 0, "z": 0, "neighbors": [ { "to": { "x": 0, "y": 1, "z": 0 }, "direction": [0, 1, 0] } ] }
//!   ] } ] } ] }
//! }
//! ```
//!
//! Piece, configuration, junction and neighbour order is preserved exactly as
//! generated.

use crate::error::Result;
use crate::lattice::{Extent, Lattice};
use crate::piece::{Catalog, Piece};
use serde::Serialize;
use tracing::info;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PuzzleDocument {
    pub pieces: Vec<Piece>,
    pub lattice: Lattice,
}

impl PuzzleDocument {
    /// Builds every piece of `catalog` and the lattice for `extent`.
    pub fn generate(catalog: &Catalog, extent: Extent) -> Result<Self> {
        let pieces = catalog.build()?;
        let lattice = Lattice::build(extent)?;
        info!(
            pieces = pieces.len(),
            sites = lattice.site_count(),
            "puzzle document generated"
        );
        Ok(Self { pieces, lattice })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
