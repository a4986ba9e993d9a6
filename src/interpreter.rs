//! Interpreter that converts a bracketed L-System symbol sequence into a [`BranchTree`].
//!
//! The entry point is [`TreeInterpreter`]. Configure it with an [`InterpreterConfig`],
//! register symbol-to-operation mappings via [`TreeInterpreter::set_op`] or
//! [`TreeInterpreter::populate_standard_symbols`], then call
//! [`TreeInterpreter::build_tree`] with a [`symbios::SymbiosState`].

use crate::direction::{self, Alphabet};
use crate::error::{GenerateError, Result};
use crate::tree::{BranchTree, Element};
use glam::IVec3;
use symbios::{SymbiosState, SymbolTable};
use tracing::debug;

/// Operations a symbol can stand for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TreeOp {
    /// Step along a fixed direction.
    Step(IVec3),
    /// Step along `(dx, dy, dz)` read from the symbol parameters (`S(1,0,0)`).
    StepFromParams,
    /// Open a side branch (`[`).
    Push,
    /// Close the innermost side branch (`]`).
    Pop,
    /// No-op: the symbol has no registered meaning.
    Ignore,
}

/// Configuration for tree interpretation.
#[derive(Clone, Debug)]
pub struct InterpreterConfig {
    /// Alphabet every produced step must belong to.
    pub alphabet: Alphabet,
    /// Maximum bracket nesting.
    pub max_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            alphabet: Alphabet::Axial,
            max_depth: 64,
        }
    }
}

/// Interprets L-System output to build a [`BranchTree`].
pub struct TreeInterpreter {
    op_map: Vec<TreeOp>,
    config: InterpreterConfig,
}

enum Token {
    Step(IVec3),
    Group(Vec<Token>),
}

impl TreeInterpreter {
    /// Creates a new interpreter with the given configuration and an empty symbol map.
    pub fn new(config: InterpreterConfig) -> Self {
        Self {
            op_map: Vec::new(),
            config,
        }
    }

    /// Replaces the entire symbol-to-operation map in one step (builder pattern).
    ///
    /// Any ID that falls outside `map` is treated as [`TreeOp::Ignore`].
    pub fn with_map(mut self, map: Vec<TreeOp>) -> Self {
        self.op_map = map;
        self
    }

    /// Assigns a single [`TreeOp`] to a symbol ID, growing the map as needed.
    pub fn set_op(&mut self, sym_id: u16, op: TreeOp) {
        let idx = sym_id as usize;
        if idx >= self.op_map.len() {
            self.op_map.resize(idx + 1, TreeOp::Ignore);
        }
        self.op_map[idx] = op;
    }

    /// Registers the conventional direction symbols.
    ///
    /// Flat moves are `r l u d`, vertical moves `a` (above) and `b` (below),
    /// diagonals `ne se sw nw` and `une use unw usw dne dse dnw dsw`. `S` takes
    /// explicit `(dx, dy, dz)` parameters. Symbols missing from `interner` are
    /// skipped.
    pub fn populate_standard_symbols(&mut self, interner: &SymbolTable) {
        let mappings = [
            ("r", TreeOp::Step(direction::RIGHT)),
            ("l", TreeOp::Step(direction::LEFT)),
            ("u", TreeOp::Step(direction::UP)),
            ("d", TreeOp::Step(direction::DOWN)),
            ("a", TreeOp::Step(direction::ABOVE)),
            ("b", TreeOp::Step(direction::BELOW)),
            ("ne", TreeOp::Step(direction::NE)),
            ("se", TreeOp::Step(direction::SE)),
            ("sw", TreeOp::Step(direction::SW)),
            ("nw", TreeOp::Step(direction::NW)),
            ("une", TreeOp::Step(direction::UNE)),
            ("use", TreeOp::Step(direction::USE)),
            ("unw", TreeOp::Step(direction::UNW)),
            ("usw", TreeOp::Step(direction::USW)),
            ("dne", TreeOp::Step(direction::DNE)),
            ("dse", TreeOp::Step(direction::DSE)),
            ("dnw", TreeOp::Step(direction::DNW)),
            ("dsw", TreeOp::Step(direction::DSW)),
            ("S", TreeOp::StepFromParams),
            ("[", TreeOp::Push),
            ("]", TreeOp::Pop),
        ];

        for (sym, op) in mappings {
            if let Some(id) = interner.resolve_id(sym) {
                self.set_op(id, op);
            }
        }
    }

    /// Interprets the full symbol sequence in `state` and returns the resulting tree.
    ///
    /// # Branching
    ///
    /// Brackets follow turtle semantics: `r [d] [u] r` steps right, then the
    /// junction forks into `d`, `u` and the continuation `r`. In tree terms the
    /// continuation becomes the last branch of the fork, so the produced tree is
    /// `[ (1,0,0), [[ (0,1,0) ], [ (0,-1,0) ], [ (1,0,0) ]] ]`.
    ///
    /// Unbalanced brackets and nesting deeper than `max_depth` are errors, and the
    /// finished tree is validated against the configured alphabet.
    pub fn build_tree(&self, state: &SymbiosState) -> Result<BranchTree> {
        let mut stack: Vec<Vec<Token>> = vec![Vec::new()];

        for i in 0..state.len() {
            let view = match state.get_view(i) {
                Some(v) => v,
                None => break,
            };

            let op = self
                .op_map
                .get(view.sym as usize)
                .unwrap_or(&TreeOp::Ignore);

            let p = |idx: usize| -> i32 {
                view.params
                    .get(idx)
                    .map(|&x| (x as f32).round() as i32)
                    .unwrap_or(0)
            };

            match op {
                TreeOp::Step(v) => push_token(&mut stack, Token::Step(*v)),
                TreeOp::StepFromParams => {
                    push_token(&mut stack, Token::Step(IVec3::new(p(0), p(1), p(2))))
                }
                TreeOp::Push => {
                    if stack.len() > self.config.max_depth {
                        return Err(GenerateError::MalformedTree(format!(
                            "bracket nesting exceeds {} at symbol {i}",
                            self.config.max_depth
                        )));
                    }
                    stack.push(Vec::new());
                }
                TreeOp::Pop => {
                    if stack.len() < 2 {
                        return Err(GenerateError::UnbalancedBrackets { index: i });
                    }
                    if let Some(group) = stack.pop() {
                        push_token(&mut stack, Token::Group(group));
                    }
                }
                TreeOp::Ignore => {}
            }
        }

        if stack.len() != 1 {
            return Err(GenerateError::UnbalancedBrackets { index: state.len() });
        }
        let tree = assemble(stack.pop().unwrap_or_default());
        tree.validate(self.config.alphabet)?;
        debug!(steps = tree.step_count(), depth = tree.fork_depth(), "interpreted branch tree");
        Ok(tree)
    }
}

fn push_token(stack: &mut [Vec<Token>], token: Token) {
    if let Some(frame) = stack.last_mut() {
        frame.push(token);
    }
}

/// Folds a token run into a branch; consecutive groups and the remainder after
/// them form one fork.
fn assemble(tokens: Vec<Token>) -> BranchTree {
    let mut elements = Vec::new();
    let mut iter = tokens.into_iter().peekable();
    while let Some(token) = iter.next() {
        match token {
            Token::Step(v) => elements.push(Element::Step(v)),
            Token::Group(group) => {
                let mut branches = vec![assemble(group)];
                while matches!(iter.peek(), Some(Token::Group(_))) {
                    if let Some(Token::Group(next)) = iter.next() {
                        branches.push(assemble(next));
                    }
                }
                let rest: Vec<Token> = iter.by_ref().collect();
                if !rest.is_empty() {
                    branches.push(assemble(rest));
                }
                elements.push(Element::Fork(branches));
                break;
            }
        }
    }
    BranchTree::new(elements)
}
