//! Junction graphs and the tree linearizer.

use crate::error::{GenerateError, Result};
use crate::tree::{BranchTree, Element};
use glam::IVec3;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Index of a junction inside its [`JunctionGraph`]. The seed is always 0.
pub type JunctionId = usize;

/// A point of a piece where it continues, turns or branches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Junction {
    pub id: JunctionId,
    /// Outgoing edges in creation order.
    pub edges: Vec<Edge>,
}

/// A move from one junction to a child junction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub to: JunctionId,
    pub direction: IVec3,
}

/// The junctions of one configuration, stored in id order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct JunctionGraph {
    junctions: Vec<Junction>,
}

impl Default for JunctionGraph {
    fn default() -> Self {
        Self::seeded()
    }
}

impl JunctionGraph {
    /// A graph holding only the seed junction.
    pub fn seeded() -> Self {
        Self {
            junctions: vec![Junction::default()],
        }
    }

    /// Creates a junction reached from `parent` along `direction` and returns its id.
    fn add_junction(&mut self, parent: JunctionId, direction: IVec3) -> JunctionId {
        let id = self.junctions.len();
        self.junctions.push(Junction {
            id,
            edges: Vec::new(),
        });
        if let Some(p) = self.junctions.get_mut(parent) {
            p.edges.push(Edge { to: id, direction });
        }
        id
    }

    pub fn seed(&self) -> &Junction {
        &self.junctions[0]
    }

    pub fn junction(&self, id: JunctionId) -> Option<&Junction> {
        self.junctions.get(id)
    }

    pub fn junctions(&self) -> &[Junction] {
        &self.junctions
    }

    /// Number of junctions including the seed.
    pub fn len(&self) -> usize {
        self.junctions.len()
    }

    /// Always false; a graph owns at least its seed.
    pub fn is_empty(&self) -> bool {
        self.junctions.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.junctions.iter().map(|j| j.edges.len()).sum()
    }

    /// Rebuilds the branch tree the graph describes.
    ///
    /// A junction with a single edge continues the branch; two or more edges
    /// become a fork. Single-branch forks therefore come back as plain steps.
    pub fn to_tree(&self) -> BranchTree {
        self.branch_from(0)
    }

    fn branch_from(&self, mut id: JunctionId) -> BranchTree {
        let mut elements = Vec::new();
        while let Some(junction) = self.junctions.get(id) {
            match junction.edges.as_slice() {
                [] => break,
                [edge] => {
                    elements.push(Element::Step(edge.direction));
                    id = edge.to;
                }
                edges => {
                    let branches = edges.iter().map(|edge| {
                        let mut branch = vec![Element::Step(edge.direction)];
                        branch.extend(self.branch_from(edge.to).into_elements());
                        BranchTree::new(branch)
                    });
                    elements.push(Element::fork(branches));
                    break;
                }
            }
        }
        BranchTree::new(elements)
    }
}

/// Turns a branch tree into a junction graph by depth-first traversal.
///
/// Junction 0 is the seed. Every step creates the next junction in pre-order and
/// links it from the junction the branch has reached; all branches of a fork hang
/// off the junction reached right before the fork. The id counter lives in the
/// graph being built, so separate calls never share numbering.
pub fn linearize(tree: &BranchTree) -> Result<JunctionGraph> {
    let mut graph = JunctionGraph::seeded();
    visit(&mut graph, tree, 0)?;
    trace!(junctions = graph.len(), "linearized configuration");
    Ok(graph)
}

fn visit(graph: &mut JunctionGraph, branch: &BranchTree, mut parent: JunctionId) -> Result<()> {
    if branch.is_empty() {
        return Err(GenerateError::ExhaustedTraversal { parent });
    }
    let last = branch.len() - 1;
    for (i, element) in branch.elements().iter().enumerate() {
        match element {
            Element::Step(v) => parent = graph.add_junction(parent, *v),
            Element::Fork(branches) => {
                if branches.is_empty() {
                    return Err(GenerateError::MalformedTree(format!(
                        "fork without branches at junction {parent}"
                    )));
                }
                if i != last {
                    return Err(GenerateError::MalformedTree(format!(
                        "elements after the fork at junction {parent} would be unreachable"
                    )));
                }
                for sub in branches {
                    visit(graph, sub, parent)?;
                }
            }
        }
    }
    Ok(())
}
