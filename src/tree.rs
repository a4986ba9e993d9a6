//! Nested branch/fork descriptions of a piece and the tree transformer.
//!
//! A [`BranchTree`] is written in the catalog notation
//!
//! ```text
//! [ (1,0,0), [[ (1,0,0) ], [ (0,1,0) ]] ]
//! ```
//!
//! which reads: step right, then fork into a branch stepping right and a
//! branch stepping down. Tuples are steps; a bracket group of bracket groups
//! is a fork. A fork always ends its branch.

use crate::direction::{Alphabet, Transform};
use crate::error::{GenerateError, Result};
use glam::IVec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One element of a branch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Element {
    /// Continue the current branch by one move.
    Step(IVec3),
    /// The current junction splits into independent continuations.
    Fork(Vec<BranchTree>),
}

impl Element {
    pub fn fork(branches: impl IntoIterator<Item = BranchTree>) -> Self {
        Self::Fork(branches.into_iter().collect())
    }
}

/// An ordered sequence of steps and forks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchTree {
    elements: Vec<Element>,
}

impl BranchTree {
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// A branch made only of steps.
    pub fn path(steps: impl IntoIterator<Item = IVec3>) -> Self {
        Self::new(steps.into_iter().map(Element::Step).collect())
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns a structurally identical tree with every step replaced by `op(step)`.
    ///
    /// Fork positions, branch lengths and nesting are preserved; `self` is untouched.
    pub fn transform<F>(&self, op: &F) -> BranchTree
    where
        F: Fn(IVec3) -> IVec3,
    {
        let elements = self
            .elements
            .iter()
            .map(|element| match element {
                Element::Step(v) => Element::Step(op(*v)),
                Element::Fork(branches) => {
                    Element::Fork(branches.iter().map(|b| b.transform(op)).collect())
                }
            })
            .collect();
        BranchTree { elements }
    }

    pub fn apply(&self, transform: Transform) -> BranchTree {
        self.transform(&|v| transform.apply(v))
    }

    /// Number of steps at all nesting levels.
    pub fn step_count(&self) -> usize {
        self.elements
            .iter()
            .map(|element| match element {
                Element::Step(_) => 1,
                Element::Fork(branches) => branches.iter().map(BranchTree::step_count).sum(),
            })
            .sum()
    }

    /// Maximum fork nesting; a plain path has depth 0.
    pub fn fork_depth(&self) -> usize {
        self.elements
            .iter()
            .map(|element| match element {
                Element::Step(_) => 0,
                Element::Fork(branches) => {
                    1 + branches.iter().map(BranchTree::fork_depth).max().unwrap_or(0)
                }
            })
            .max()
            .unwrap_or(0)
    }

    /// True if both trees have forks at the same positions and branches of the
    /// same lengths, whatever their directions.
    pub fn same_shape(&self, other: &BranchTree) -> bool {
        self.elements.len() == other.elements.len()
            && self
                .elements
                .iter()
                .zip(&other.elements)
                .all(|pair| match pair {
                    (Element::Step(_), Element::Step(_)) => true,
                    (Element::Fork(a), Element::Fork(b)) => {
                        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_shape(y))
                    }
                    _ => false,
                })
    }

    /// Checks the tree can be linearized and uses only `alphabet` vectors.
    pub fn validate(&self, alphabet: Alphabet) -> Result<()> {
        if self.elements.is_empty() {
            return Err(GenerateError::MalformedTree("tree has no elements".into()));
        }
        self.validate_branch(alphabet)
    }

    fn validate_branch(&self, alphabet: Alphabet) -> Result<()> {
        let last = self.elements.len().saturating_sub(1);
        for (i, element) in self.elements.iter().enumerate() {
            match element {
                Element::Step(v) => {
                    if !alphabet.contains(*v) {
                        return Err(GenerateError::ForeignDirection {
                            direction: *v,
                            alphabet: alphabet.name(),
                        });
                    }
                }
                Element::Fork(branches) => {
                    if branches.is_empty() {
                        return Err(GenerateError::MalformedTree(
                            "fork without branches".into(),
                        ));
                    }
                    if i != last {
                        return Err(GenerateError::MalformedTree(format!(
                            "{} element(s) follow the fork at position {i}",
                            last - i
                        )));
                    }
                    for branch in branches {
                        if branch.is_empty() {
                            return Err(GenerateError::MalformedTree(
                                "empty branch inside a fork".into(),
                            ));
                        }
                        branch.validate_branch(alphabet)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl From<Vec<Element>> for BranchTree {
    fn from(elements: Vec<Element>) -> Self {
        Self::new(elements)
    }
}

impl fmt::Display for BranchTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[ ")?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match element {
                Element::Step(v) => write!(f, "({},{},{})", v.x, v.y, v.z)?,
                Element::Fork(branches) => {
                    f.write_str("[")?;
                    for (j, branch) in branches.iter().enumerate() {
                        if j > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{branch}")?;
                    }
                    f.write_str("]")?;
                }
            }
        }
        f.write_str(" ]")
    }
}

impl From<BranchTree> for String {
    fn from(tree: BranchTree) -> Self {
        tree.to_string()
    }
}

impl TryFrom<String> for BranchTree {
    type Error = GenerateError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl FromStr for BranchTree {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parser = Parser {
            src: s.as_bytes(),
            pos: 0,
            depth: 0,
        };
        let tree = parser.branch()?;
        parser.skip_ws();
        if parser.pos != parser.src.len() {
            return Err(parser.error("trailing input after tree"));
        }
        Ok(tree)
    }
}

/// Deepest fork nesting accepted in catalog notation.
pub const MAX_NOTATION_DEPTH: usize = 64;

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
    /// Forks currently open.
    depth: usize,
}

impl Parser<'_> {
    fn error(&self, message: &str) -> GenerateError {
        GenerateError::Parse {
            offset: self.pos,
            message: message.to_string(),
        }
    }

    fn skip_ws(&mut self) {
        while self.pos < self.src.len() && self.src[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_ws();
        self.src.get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", byte as char)))
        }
    }

    /// `[ element, ... ]`
    fn branch(&mut self) -> Result<BranchTree> {
        self.expect(b'[')?;
        let mut elements = Vec::new();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(BranchTree::new(elements));
        }
        loop {
            elements.push(self.element()?);
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b']') => {
                    self.pos += 1;
                    return Ok(BranchTree::new(elements));
                }
                _ => return Err(self.error("expected ',' or ']'")),
            }
        }
    }

    fn element(&mut self) -> Result<Element> {
        match self.peek() {
            Some(b'(') => self.step(),
            Some(b'[') => self.fork(),
            _ => Err(self.error("expected a step '(' or a fork '['")),
        }
    }

    /// `[ branch, ... ]`
    fn fork(&mut self) -> Result<Element> {
        if self.depth == MAX_NOTATION_DEPTH {
            return Err(self.error(&format!(
                "forks nested deeper than {MAX_NOTATION_DEPTH}"
            )));
        }
        self.depth += 1;
        let fork = self.fork_body();
        self.depth -= 1;
        fork
    }

    fn fork_body(&mut self) -> Result<Element> {
        self.expect(b'[')?;
        let mut branches = Vec::new();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(Element::Fork(branches));
        }
        loop {
            if self.peek() != Some(b'[') {
                return Err(self.error("expected '[' opening a fork branch"));
            }
            branches.push(self.branch()?);
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b']') => {
                    self.pos += 1;
                    return Ok(Element::Fork(branches));
                }
                _ => return Err(self.error("expected ',' or ']' in fork")),
            }
        }
    }

    /// `(dx, dy, dz)`
    fn step(&mut self) -> Result<Element> {
        self.expect(b'(')?;
        let x = self.integer()?;
        self.expect(b',')?;
        let y = self.integer()?;
        self.expect(b',')?;
        let z = self.integer()?;
        self.expect(b')')?;
        Ok(Element::Step(IVec3::new(x, y, z)))
    }

    fn integer(&mut self) -> Result<i32> {
        self.skip_ws();
        let start = self.pos;
        if matches!(self.src.get(self.pos).copied(), Some(b'-' | b'+')) {
            self.pos += 1;
        }
        while self.src.get(self.pos).is_some_and(u8::is_ascii_digit) {
            self.pos += 1;
        }
        std::str::from_utf8(&self.src[start..self.pos])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| GenerateError::Parse {
                offset: start,
                message: "expected an integer".into(),
            })
    }
}
