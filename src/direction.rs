//! Direction vectors and the vector-level symmetry operations.
//!
//! A step of a piece is one of a small, puzzle-specific set of integer unit
//! vectors. Screen coordinates are used for the flat directions: `y` grows
//! downward, so [`UP`] is `(0, -1, 0)`. For pyramid puzzles `z` grows from the
//! apex towards the base.

use glam::IVec3;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const RIGHT: IVec3 = IVec3::new(1, 0, 0);
pub const LEFT: IVec3 = IVec3::new(-1, 0, 0);
pub const UP: IVec3 = IVec3::new(0, -1, 0);
pub const DOWN: IVec3 = IVec3::new(0, 1, 0);
pub const ABOVE: IVec3 = IVec3::new(0, 0, -1);
pub const BELOW: IVec3 = IVec3::new(0, 0, 1);

// Flat diagonals.
pub const NE: IVec3 = IVec3::new(1, -1, 0);
pub const SE: IVec3 = IVec3::new(1, 1, 0);
pub const SW: IVec3 = IVec3::new(-1, 1, 0);
pub const NW: IVec3 = IVec3::new(-1, -1, 0);

// Elevated diagonals, `u*` pointing to the layer above, `d*` below.
pub const UNE: IVec3 = IVec3::new(1, -1, -1);
pub const USE: IVec3 = IVec3::new(1, 1, -1);
pub const UNW: IVec3 = IVec3::new(-1, -1, -1);
pub const USW: IVec3 = IVec3::new(-1, 1, -1);
pub const DNE: IVec3 = IVec3::new(1, -1, 1);
pub const DSE: IVec3 = IVec3::new(1, 1, 1);
pub const DNW: IVec3 = IVec3::new(-1, -1, 1);
pub const DSW: IVec3 = IVec3::new(-1, 1, 1);

const AXIAL: [IVec3; 6] = [RIGHT, LEFT, UP, DOWN, ABOVE, BELOW];
const DIAGONAL: [IVec3; 4] = [NE, SE, SW, NW];
const PYRAMID: [IVec3; 12] = [
    RIGHT, LEFT, UP, DOWN, UNE, USE, UNW, USW, DNE, DSE, DNW, DSW,
];

/// Rotates `v` by +90° about the z axis: `(x, y, z) -> (-y, x, z)`.
///
/// Four applications return the original vector.
pub fn rotate90(v: IVec3) -> IVec3 {
    IVec3::new(-v.y, v.x, v.z)
}

/// The set of step vectors a puzzle allows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alphabet {
    /// The six axis-aligned unit steps.
    #[default]
    Axial,
    /// The four in-plane diagonal steps of a flat diagonal board.
    Diagonal,
    /// In-plane axis steps plus the eight elevated diagonals of a pyramid.
    Pyramid,
}

impl Alphabet {
    pub fn vectors(self) -> &'static [IVec3] {
        match self {
            Self::Axial => &AXIAL,
            Self::Diagonal => &DIAGONAL,
            Self::Pyramid => &PYRAMID,
        }
    }

    pub fn contains(self, v: IVec3) -> bool {
        self.vectors().contains(&v)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Axial => "axial",
            Self::Diagonal => "diagonal",
            Self::Pyramid => "pyramid",
        }
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A puzzle-specific reflection. Every mirror is an involution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mirror {
    /// Mirror on the y axis: `(x, y, z) -> (-x, y, z)`.
    #[default]
    YAxis,
    /// Mirror on the line through `(1, 1, 0)`.
    DiagonalAxis,
    /// Mirror on the plane spanned by `(1, 1, 1)` and `(1, -1, 1)`.
    ElevatedPlane,
}

impl Mirror {
    /// Vectors perpendicular to the mirror; these are the only ones that flip
    /// for the normal-based mirrors. Empty for [`Mirror::YAxis`].
    pub fn normals(self) -> &'static [IVec3] {
        match self {
            Self::YAxis => &[],
            Self::DiagonalAxis => &[SW, NE],
            Self::ElevatedPlane => &[UNE, DSW],
        }
    }

    pub fn apply(self, v: IVec3) -> IVec3 {
        match self {
            Self::YAxis => IVec3::new(-v.x, v.y, v.z),
            Self::DiagonalAxis | Self::ElevatedPlane => {
                if self.normals().contains(&v) {
                    -v
                } else {
                    v
                }
            }
        }
    }
}

/// A vector-level operation the tree transformer can apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transform {
    Rotate90,
    Mirror(Mirror),
}

impl Transform {
    pub fn apply(self, v: IVec3) -> IVec3 {
        match self {
            Self::Rotate90 => rotate90(v),
            Self::Mirror(m) => m.apply(v),
        }
    }
}
