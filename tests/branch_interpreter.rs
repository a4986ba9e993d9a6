// tests/branch_interpreter.rs
use polycube_graph::{
    linearize, Alphabet, BranchTree, GenerateError, InterpreterConfig, TreeInterpreter, TreeOp,
    DOWN, RIGHT,
};
use symbios::{SymbiosState, SymbolTable};

fn setup() -> (TreeInterpreter, SymbolTable) {
    let mut interner = SymbolTable::new();
    let mut interpreter = TreeInterpreter::new(InterpreterConfig::default());

    for sym in ["r", "d", "u", "S", "[", "]", "x"] {
        interner.intern(sym).unwrap();
    }
    interpreter.populate_standard_symbols(&interner);

    (interpreter, interner)
}

fn push(state: &mut SymbiosState, interner: &SymbolTable, sym: &str) {
    let id = interner.resolve_id(sym).unwrap();
    state.push(id, 0.0, &[]).unwrap();
}

#[test]
fn test_plain_path() {
    let (interpreter, interner) = setup();
    let mut state = SymbiosState::new();
    for sym in ["r", "r", "d"] {
        push(&mut state, &interner, sym);
    }

    let tree = interpreter.build_tree(&state).unwrap();
    assert_eq!(tree, BranchTree::path([RIGHT, RIGHT, DOWN]));
}

#[test]
fn test_brackets_become_fork_with_continuation() {
    let (interpreter, interner) = setup();

    // Grammar: r [ d ] r
    // After the first step the junction forks into `d` and the continuation `r`.
    let mut state = SymbiosState::new();
    for sym in ["r", "[", "d", "]", "r"] {
        push(&mut state, &interner, sym);
    }

    let tree = interpreter.build_tree(&state).unwrap();
    assert_eq!(tree.to_string(), "[ (1,0,0), [[ (0,1,0) ], [ (1,0,0) ]] ]");

    let graph = linearize(&tree).unwrap();
    assert_eq!(graph.len(), 4);
    let fork: Vec<_> = graph.junction(1).unwrap().edges.iter().map(|e| e.to).collect();
    assert_eq!(fork, vec![2, 3]);
}

#[test]
fn test_consecutive_groups_share_one_fork() {
    let (interpreter, interner) = setup();

    // Grammar: [ r r ] [ d ] u x
    // `x` has no mapping and is ignored.
    let mut state = SymbiosState::new();
    for sym in ["[", "r", "r", "]", "[", "d", "]", "u", "x"] {
        push(&mut state, &interner, sym);
    }

    let tree = interpreter.build_tree(&state).unwrap();
    assert_eq!(
        tree.to_string(),
        "[ [[ (1,0,0), (1,0,0) ], [ (0,1,0) ], [ (0,-1,0) ]] ]"
    );
}

#[test]
fn test_parametric_step() {
    let (interpreter, interner) = setup();
    let mut state = SymbiosState::new();
    let s_id = interner.resolve_id("S").unwrap();
    state.push(s_id, 0.0, &[0.0, 0.0, 1.0]).unwrap();

    let tree = interpreter.build_tree(&state).unwrap();
    assert_eq!(tree.to_string(), "[ (0,0,1) ]");
}

#[test]
fn test_unbalanced_brackets_fail() {
    let (interpreter, interner) = setup();

    let mut open = SymbiosState::new();
    for sym in ["r", "[", "d"] {
        push(&mut open, &interner, sym);
    }
    assert!(matches!(
        interpreter.build_tree(&open),
        Err(GenerateError::UnbalancedBrackets { index: 3 })
    ));

    let mut close = SymbiosState::new();
    for sym in ["r", "]"] {
        push(&mut close, &interner, sym);
    }
    assert!(matches!(
        interpreter.build_tree(&close),
        Err(GenerateError::UnbalancedBrackets { index: 1 })
    ));
}

#[test]
fn test_alphabet_is_enforced() {
    let (_, interner) = setup();
    let mut interpreter = TreeInterpreter::new(InterpreterConfig {
        alphabet: Alphabet::Diagonal,
        ..Default::default()
    });
    interpreter.set_op(interner.resolve_id("r").unwrap(), TreeOp::Step(RIGHT));

    let mut state = SymbiosState::new();
    push(&mut state, &interner, "r");
    assert!(matches!(
        interpreter.build_tree(&state),
        Err(GenerateError::ForeignDirection { .. })
    ));
}

#[test]
fn test_nesting_limit() {
    let (_, interner) = setup();
    let mut interpreter = TreeInterpreter::new(InterpreterConfig {
        max_depth: 1,
        ..Default::default()
    });
    interpreter.populate_standard_symbols(&interner);

    let mut state = SymbiosState::new();
    for sym in ["r", "[", "[", "d", "]", "]"] {
        push(&mut state, &interner, sym);
    }
    assert!(matches!(
        interpreter.build_tree(&state),
        Err(GenerateError::MalformedTree(_))
    ));
}
