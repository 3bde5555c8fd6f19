use assert_approx_eq::assert_approx_eq;
use efg_core::basis::{Basis, LpSolver, LpStatus};
use efg_core::game::{Game, NodeId};
use efg_core::support::Support;
use optimizers::SimplexSolver;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The first player picks one of A, B and C. The second player moves after
/// B or C without learning which.
fn three_way_game() -> (Game<f64>, [NodeId; 2]) {
    let mut game = Game::new();
    let first = game.new_player("First");
    let second = game.new_player("Second");
    let root = game.root();
    let choice = game.new_infoset(first, 3).unwrap();
    game.append_move(root, choice).unwrap();
    let reply = game.new_infoset(second, 2).unwrap();
    let children = game.children(root).unwrap();
    game.append_move(children[1], reply).unwrap();
    game.append_move(children[2], reply).unwrap();
    (game, [children[1], children[2]])
}

#[test]
fn full_basis_is_consistent() {
    init();
    let (game, _) = three_way_game();
    let basis = Basis::full(&game);
    assert!(basis.is_consistent(&SimplexSolver::default()));
}

#[test]
fn separating_members_needs_positive_orders() {
    init();
    let (game, [after_b, after_c]) = three_way_game();
    let choice = game.infoset_by_number(1, 0).unwrap();

    // Only A is played; B must vanish strictly slower than C.
    let mut actions = Support::new(&game);
    actions.remove_action(game.action(choice, 1).unwrap()).unwrap();
    actions.remove_action(game.action(choice, 2).unwrap()).unwrap();
    let mut basis = Basis::new(actions);
    basis.remove_node(after_c).unwrap();

    let solver = SimplexSolver::default();
    let program = basis.consistency_program();
    assert_eq!(program.num_variables(), 2);
    let solution = solver.solve(&program);
    assert_eq!(solution.status, LpStatus::Optimal);
    assert_approx_eq!(solution.objective, -1.0);
    assert!(basis.is_consistent(&solver));

    // Both members tied is consistent as well.
    basis.add_node(after_c).unwrap();
    assert!(basis.is_consistent(&solver));

    // A member reached only through a vanishing action cannot be tied with
    // one reached with positive probability.
    let mut actions = Support::new(&game);
    actions.remove_action(game.action(choice, 2).unwrap()).unwrap();
    let mut basis = Basis::new(actions);
    assert!(!basis.is_consistent(&solver));
    basis.remove_node(after_c).unwrap();
    assert!(basis.is_consistent(&solver));
    basis.add_node(after_c).unwrap();
    basis.remove_node(after_b).unwrap();
    assert!(!basis.is_consistent(&solver));
}
