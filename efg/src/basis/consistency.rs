use crate::basis::{Basis, LinearProgram, LpSolver, LpStatus};
use crate::game::Key;
use crate::numeric::Number;

use log::{debug, warn};

/// Order of vanishing of the probability of reaching a node: `constant`
/// plus the sum of the variables in `coefficients`.
struct NodeOrder<T: Number> {
    constant: T,
    coefficients: Vec<T>,
}

impl<T: Number> NodeOrder<T> {
    /// Coefficients of `self - other`, and `other.constant - self.constant`.
    fn difference(&self, other: &NodeOrder<T>) -> (Vec<T>, T) {
        let row = self
            .coefficients
            .iter()
            .zip(other.coefficients.iter())
            .map(|(&mine, &theirs)| mine - theirs)
            .collect();
        (row, other.constant - self.constant)
    }
}

impl<'g, T: Number> Basis<'g, T> {
    /// Column of the order variable of every personal action outside the
    /// basis support, by player, infoset number and action position.
    fn columns(&self) -> (Vec<Vec<Vec<Option<usize>>>>, usize) {
        let support = self.actions();
        let num_players = self.game().num_players();
        let mut num_variables = 0;
        let mut columns = vec![vec![]];
        for player in 1..=num_players {
            let mut by_infoset = vec![];
            for infoset in 0..support.num_infosets_of(player) {
                let mut by_action = vec![];
                for action in 0..support.num_actions_at(player, infoset) {
                    match support.is_active(player, infoset, action) {
                        true => by_action.push(None),
                        false => {
                            by_action.push(Some(num_variables));
                            num_variables += 1;
                        }
                    }
                }
                by_infoset.push(by_action);
            }
            columns.push(by_infoset);
        }
        (columns, num_variables)
    }

    /// Each action outside the basis on the root path of `node` contributes
    /// one plus its variable.
    fn node_order(
        &self,
        node: Key,
        columns: &[Vec<Vec<Option<usize>>>],
        num_variables: usize,
    ) -> NodeOrder<T> {
        let game = self.game();
        let mut order = NodeOrder {
            constant: T::zero(),
            coefficients: vec![T::zero(); num_variables],
        };
        let mut current = node;
        while let Some((infoset, position)) = game.prior_action_position(current) {
            let data = &game.infosets[infoset];
            if !data.is_chance() {
                if let Some(column) = columns[data.player][data.number][position] {
                    order.constant += T::one();
                    order.coefficients[column] += T::one();
                }
            }
            current = match game.nodes[current].parent {
                Some(parent) => parent,
                None => break,
            };
        }
        order
    }

    /// The linear program whose feasibility decides consistency.
    ///
    /// There is one variable `w_a >= 0` per personal action outside the basis
    /// support; the action vanishes with order `1 + w_a`. At every infoset
    /// with basis nodes, equality rows give all basis nodes the order of the
    /// first one, and inequality rows make every other member vanish at
    /// least one order faster. The objective maximises `-sum(w_a)`.
    pub fn consistency_program(&self) -> LinearProgram<T> {
        let (columns, num_variables) = self.columns();
        let mut equalities = vec![];
        let mut inequalities = vec![];

        for player in 1..=self.game().num_players() {
            for infoset in 0..self.actions().num_infosets_of(player) {
                let members = self.member_keys(player, infoset);
                let first = match members.iter().find(|&&(_, basis)| basis) {
                    Some(&(node, _)) => self.node_order(node, &columns, num_variables),
                    None => continue,
                };
                let mut seen_first = false;
                for &(node, basis) in members.iter() {
                    let order = self.node_order(node, &columns, num_variables);
                    if basis {
                        if seen_first {
                            equalities.push(order.difference(&first));
                        }
                        seen_first = true;
                    } else {
                        let (row, bound) = first.difference(&order);
                        inequalities.push((row, bound - T::one()));
                    }
                }
            }
        }

        let num_equalities = equalities.len();
        let (a, b): (Vec<Vec<T>>, Vec<T>) = equalities.into_iter().chain(inequalities).unzip();
        LinearProgram {
            a,
            b,
            c: vec![-T::one(); num_variables],
            num_equalities,
        }
    }

    /// True if the consistency program is feasible. A basis imposing no
    /// constraints is consistent without consulting `solver`.
    pub fn is_consistent(&self, solver: &dyn LpSolver<T>) -> bool {
        let program = self.consistency_program();
        debug!(
            "Consistency program: {} variables, {} equalities, {} inequalities",
            program.num_variables(),
            program.num_equalities,
            program.num_constraints() - program.num_equalities
        );
        if program.num_constraints() == 0 {
            return true;
        }

        let solution = solver.solve(&program);
        match solution.status {
            LpStatus::Optimal => match program.is_feasible_point(&solution.x) {
                true => true,
                false => {
                    warn!("Solver reported an optimum violating the constraints");
                    false
                }
            },
            LpStatus::Unbounded => {
                warn!("Consistency program reported unbounded");
                true
            }
            LpStatus::IterationLimit => {
                warn!("Solver hit its iteration limit; treating basis as inconsistent");
                false
            }
            LpStatus::Infeasible => false,
        }
    }
}
