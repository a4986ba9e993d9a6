use crate::direction::{Alphabet, Mirror};
use crate::error::{GenerateError, Result};
use crate::junction::{linearize, JunctionGraph, JunctionId};
use crate::symmetry::{enumerate, Strategy};
use crate::tree::BranchTree;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// One spatial orientation of a piece.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Configuration {
    /// Entry junction of the graph; always 0.
    pub seed: JunctionId,
    #[serde(flatten)]
    pub graph: JunctionGraph,
}

impl Configuration {
    pub fn from_tree(tree: &BranchTree) -> Result<Self> {
        Ok(Self {
            seed: 0,
            graph: linearize(tree)?,
        })
    }
}

/// A puzzle piece and every orientation the solver may try.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Piece {
    pub id: char,
    pub configurations: Vec<Configuration>,
}

/// A base configuration and the symmetry strategy to expand it with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSpec {
    pub tree: BranchTree,
    #[serde(default)]
    pub strategy: Strategy,
    /// Overrides the catalog mirror, e.g. flat and elevated orientations of
    /// one pyramid piece reflect through different planes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror: Option<Mirror>,
}

impl ConfigSpec {
    pub fn new(tree: BranchTree, strategy: Strategy) -> Self {
        Self {
            tree,
            strategy,
            mirror: None,
        }
    }

    pub fn with_mirror(mut self, mirror: Mirror) -> Self {
        self.mirror = Some(mirror);
        self
    }
}

/// Catalog entry for one piece.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceSpec {
    pub id: char,
    /// Human readable label, e.g. the piece colour.
    #[serde(default)]
    pub name: String,
    pub configs: Vec<ConfigSpec>,
}

/// The pieces of one puzzle together with its vector conventions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub alphabet: Alphabet,
    #[serde(default)]
    pub mirror: Mirror,
    pub pieces: Vec<PieceSpec>,
}

/// Builds every configuration of one piece.
///
/// Base trees are validated against `alphabet` before anything is generated.
/// Configurations appear in catalog order, each followed by its orbit. `mirror`
/// applies to every config that does not name its own.
pub fn build_piece(spec: &PieceSpec, alphabet: Alphabet, mirror: Mirror) -> Result<Piece> {
    let mut configurations = Vec::new();
    for config in &spec.configs {
        config.tree.validate(alphabet)?;
        let mirror = config.mirror.unwrap_or(mirror);
        for variant in enumerate(&config.tree, config.strategy, mirror) {
            configurations.push(Configuration::from_tree(&variant)?);
        }
    }
    debug!(
        piece = %spec.id,
        name = %spec.name,
        configurations = configurations.len(),
        "built piece"
    );
    Ok(Piece {
        id: spec.id,
        configurations,
    })
}

impl Catalog {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Builds all pieces, stopping at the first piece that fails.
    pub fn build(&self) -> Result<Vec<Piece>> {
        let mut seen = HashSet::new();
        for spec in &self.pieces {
            if !seen.insert(spec.id) {
                return Err(GenerateError::MalformedCatalog(format!(
                    "piece id '{}' used twice",
                    spec.id
                )));
            }
        }

        let pieces = self
            .pieces
            .iter()
            .map(|spec| {
                build_piece(spec, self.alphabet, self.mirror).map_err(|e| {
                    GenerateError::InPiece {
                        id: spec.id,
                        source: Box::new(e),
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            pieces = pieces.len(),
            configurations = pieces.iter().map(|p| p.configurations.len()).sum::<usize>(),
            "catalog built"
        );
        Ok(pieces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(id: char, trees: &[(&str, Strategy)]) -> PieceSpec {
        PieceSpec {
            id,
            name: String::new(),
            configs: trees
                .iter()
                .map(|(text, strategy)| ConfigSpec::new(text.parse().unwrap(), *strategy))
                .collect(),
        }
    }

    #[test]
    fn configurations_follow_catalog_then_orbit_order() {
        let piece = build_piece(
            &spec(
                'A',
                &[
                    ("[ (1,0,0), (0,1,0) ]", Strategy::RotateAllAndMirror),
                    ("[ [[ (1,0,0) ], [ (0,1,0) ]] ]", Strategy::Identity),
                ],
            ),
            Alphabet::Axial,
            Mirror::YAxis,
        )
        .unwrap();

        assert_eq!(piece.configurations.len(), 9);
        let last = &piece.configurations[8].graph;
        assert_eq!(last.seed().edges.len(), 2);
        assert!(piece.configurations.iter().all(|c| c.seed == 0 && c.graph.len() == 3));
    }

    #[test]
    fn foreign_direction_fails_the_piece() {
        let err = build_piece(
            &spec('B', &[("[ (1,1,0) ]", Strategy::Identity)]),
            Alphabet::Axial,
            Mirror::YAxis,
        )
        .unwrap_err();
        assert!(matches!(err, GenerateError::ForeignDirection { .. }));
    }

    #[test]
    fn catalog_reports_failing_piece() {
        let catalog = Catalog {
            alphabet: Alphabet::Diagonal,
            mirror: Mirror::DiagonalAxis,
            pieces: vec![
                spec('A', &[("[ (1,1,0), (-1,1,0) ]", Strategy::RotateOnceAndMirror)]),
                spec('B', &[("[ (1,0,0) ]", Strategy::Identity)]),
            ],
        };
        match catalog.build() {
            Err(GenerateError::InPiece { id, .. }) => assert_eq!(id, 'B'),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let catalog = Catalog {
            pieces: vec![
                spec('A', &[("[ (1,0,0) ]", Strategy::Identity)]),
                spec('A', &[("[ (0,1,0) ]", Strategy::Identity)]),
            ],
            ..Default::default()
        };
        assert!(matches!(catalog.build(), Err(GenerateError::MalformedCatalog(_))));
    }

    #[test]
    fn catalog_parses_from_json() {
        let catalog = Catalog::from_json(
            r#"{
                "alphabet": "diagonal",
                "mirror": "diagonal-axis",
                "pieces": [
                    { "id": "F", "name": "white", "configs": [
                        { "tree": "[ (1,1,0), (-1,1,0) ]", "strategy": "rotate-once-and-mirror" },
                        { "tree": "[ [[ (-1,1,0) ], [ (1,1,0) ]] ]" }
                    ]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(catalog.pieces[0].configs[1].strategy, Strategy::Identity);

        let pieces = catalog.build().unwrap();
        assert_eq!(pieces[0].configurations.len(), 5);
    }

    #[test]
    fn config_mirror_overrides_catalog_mirror() {
        let flat = "[ (0,1,0), (1,0,0), (1,0,0) ]";
        let elevated = "[ (-1,1,1), (-1,1,1), (-1,1,-1) ]";
        let mut piece = spec(
            'O',
            &[
                (flat, Strategy::RotateAllAndMirror),
                (elevated, Strategy::RotateAllAndMirror),
            ],
        );
        piece.configs[0].mirror = Some(Mirror::YAxis);

        let built = build_piece(&piece, Alphabet::Pyramid, Mirror::ElevatedPlane).unwrap();
        let trees: Vec<BranchTree> = built.configurations.iter().map(|c| c.graph.to_tree()).collect();
        assert_eq!(trees.len(), 16);
        for orbit in trees.chunks(8) {
            let (rotated, mirrored) = orbit.split_at(4);
            assert!(mirrored.iter().all(|m| !rotated.contains(m)));
        }
    }

    #[test]
    fn config_mirror_is_read_from_json() {
        let catalog = Catalog::from_json(
            r#"{
                "alphabet": "pyramid",
                "mirror": "elevated-plane",
                "pieces": [
                    { "id": "A", "configs": [
                        { "tree": "[ (0,1,0), (1,0,0) ]", "mirror": "y-axis" },
                        { "tree": "[ (-1,1,1) ]" }
                    ]}
                ]
            }"#,
        )
        .unwrap();
        let configs = &catalog.pieces[0].configs;
        assert_eq!(configs[0].mirror, Some(Mirror::YAxis));
        assert_eq!(configs[1].mirror, None);
    }
}
