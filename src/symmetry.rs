//! Orbit enumeration for a base configuration.

use crate::direction::{Mirror, Transform};
use crate::error::GenerateError;
use crate::tree::BranchTree;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How many rotated/mirrored variants of a base configuration to generate.
///
/// Chosen per configuration by whoever authors the catalog; pieces with
/// rotational symmetry use the shorter strategies to avoid redundant variants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// The base only.
    #[default]
    Identity,
    /// Base and one quarter turn.
    RotateOnce,
    /// All four quarter turns.
    RotateAll,
    /// Two quarter turns of the base, then two of the mirrored base.
    RotateOnceAndMirror,
    /// Four quarter turns of the base, then four of the mirrored base.
    RotateAllAndMirror,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Self::Identity,
        Self::RotateOnce,
        Self::RotateAll,
        Self::RotateOnceAndMirror,
        Self::RotateAllAndMirror,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::RotateOnce => "rotate-once",
            Self::RotateAll => "rotate-all",
            Self::RotateOnceAndMirror => "rotate-once-and-mirror",
            Self::RotateAllAndMirror => "rotate-all-and-mirror",
        }
    }

    /// Number of configurations the strategy yields.
    pub fn orbit_len(self) -> usize {
        match self {
            Self::Identity => 1,
            Self::RotateOnce => 2,
            Self::RotateAll | Self::RotateOnceAndMirror => 4,
            Self::RotateAllAndMirror => 8,
        }
    }

    fn rotations(self) -> usize {
        match self {
            Self::Identity => 1,
            Self::RotateOnce | Self::RotateOnceAndMirror => 2,
            Self::RotateAll | Self::RotateAllAndMirror => 4,
        }
    }

    fn mirrored(self) -> bool {
        matches!(self, Self::RotateOnceAndMirror | Self::RotateAllAndMirror)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| GenerateError::MalformedCatalog(format!("unknown strategy '{s}'")))
    }
}

/// Collects `count` trees, applying `transform` to the previous result each time.
///
/// The tree is recorded before each application, so the first entry is `start`.
pub fn orbit(start: &BranchTree, transform: Transform, count: usize) -> Vec<BranchTree> {
    let mut out = Vec::with_capacity(count);
    if count == 0 {
        return out;
    }
    let mut current = start.clone();
    for _ in 1..count {
        let next = current.apply(transform);
        out.push(std::mem::replace(&mut current, next));
    }
    out.push(current);
    out
}

/// Produces the configurations `strategy` asks for, in orbit order.
///
/// Geometrically identical variants are kept.
pub fn enumerate(base: &BranchTree, strategy: Strategy, mirror: Mirror) -> Vec<BranchTree> {
    let rotations = strategy.rotations();
    let mut configs = orbit(base, Transform::Rotate90, rotations);
    if strategy.mirrored() {
        let mirrored = base.apply(Transform::Mirror(mirror));
        configs.extend(orbit(&mirrored, Transform::Rotate90, rotations));
    }
    configs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::{DOWN, LEFT, RIGHT, UP};
    use crate::tree::Element;

    fn first_step(tree: &BranchTree) -> glam::IVec3 {
        match tree.elements()[0] {
            Element::Step(v) => v,
            Element::Fork(_) => panic!("expected a step"),
        }
    }

    #[test]
    fn rotate_all_walks_the_quarter_turns() {
        let base = BranchTree::path([RIGHT]);
        let configs = enumerate(&base, Strategy::RotateAll, Mirror::YAxis);
        let firsts: Vec<_> = configs.iter().map(first_step).collect();
        assert_eq!(firsts, vec![RIGHT, DOWN, LEFT, UP]);
    }

    #[test]
    fn orbit_lengths_match_strategy() {
        let base: BranchTree = "[ (1,0,0), [[ (1,0,0) ], [ (0,1,0) ]] ]".parse().unwrap();
        for strategy in Strategy::ALL {
            let configs = enumerate(&base, strategy, Mirror::YAxis);
            assert_eq!(configs.len(), strategy.orbit_len(), "{strategy}");
            assert_eq!(configs[0], base);
            assert!(configs.iter().all(|c| c.same_shape(&base)));
        }
    }

    #[test]
    fn mirrored_half_starts_from_mirrored_base() {
        let base = BranchTree::path([RIGHT, DOWN]);
        let configs = enumerate(&base, Strategy::RotateOnceAndMirror, Mirror::YAxis);
        assert_eq!(configs[2], BranchTree::path([LEFT, DOWN]));
        assert_eq!(configs[3], BranchTree::path([UP, LEFT]));
    }

    #[test]
    fn symmetric_pieces_keep_duplicates() {
        // A straight bar looks the same after a half turn; both copies stay.
        let bar: BranchTree = "[ [[ (1,0,0) ], [ (-1,0,0) ]] ]".parse().unwrap();
        let configs = enumerate(&bar, Strategy::RotateAll, Mirror::YAxis);
        assert_eq!(configs.len(), 4);
        assert_ne!(configs[0], configs[2]);
        assert!(configs[0].same_shape(&configs[2]));
    }

    #[test]
    fn strategy_names_round_trip() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.name().parse::<Strategy>().unwrap(), strategy);
        }
        assert!("rotate-twice".parse::<Strategy>().is_err());
    }
}
