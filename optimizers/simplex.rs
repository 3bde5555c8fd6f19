use efg_core::basis::{LinearProgram, LpSolution, LpSolver, LpStatus};
use efg_core::Number;

use log::{debug, trace};

#[derive(Debug, Clone)]
pub struct SolverConfig<T: Number> {
    /// Pivots allowed over both phases.
    pub max_iterations: usize,

    /// Reduced costs and pivot elements below this are treated as zero.
    pub tolerance: T,
}

impl<T: Number> Default for SolverConfig<T> {
    fn default() -> SolverConfig<T> {
        SolverConfig {
            max_iterations: 10_000,
            tolerance: T::tolerance(),
        }
    }
}

/// Dense two-phase simplex method with Bland's rule.
///
/// Columns of the tableau are ordered as
///
/// |x| = num_variables of the program: [0, |x|)
/// one slack per inequality row: [|x|, |x|+|S|)
/// one artificial per equality row and per inequality row with a negative
/// right hand side: [|x|+|S|, |x|+|S|+|A|)
///
#[derive(Debug, Clone)]
pub struct SimplexSolver<T: Number> {
    config: SolverConfig<T>,
}

impl<T: Number> SimplexSolver<T> {
    pub fn new(config: SolverConfig<T>) -> SimplexSolver<T> {
        SimplexSolver { config }
    }

    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }
}

impl<T: Number> Default for SimplexSolver<T> {
    fn default() -> SimplexSolver<T> {
        SimplexSolver::new(SolverConfig::default())
    }
}

enum Phase {
    Optimal,
    Unbounded,
    IterationLimit,
}

struct Tableau<T: Number> {
    rows: Vec<Vec<T>>,
    rhs: Vec<T>,
    basis: Vec<usize>,
    num_columns: usize,
    tolerance: T,
    iterations: usize,
    max_iterations: usize,
}

impl<T: Number> Tableau<T> {
    /// Returns the tableau and the first artificial column.
    fn build(program: &LinearProgram<T>, config: &SolverConfig<T>) -> (Tableau<T>, usize) {
        let num_variables = program.num_variables();
        let num_rows = program.num_constraints();
        let num_slacks = num_rows - program.num_equalities;
        let needs_artificial: Vec<bool> = (0..num_rows)
            .map(|i| i < program.num_equalities || program.b[i] < T::zero())
            .collect();
        let num_artificials = needs_artificial.iter().filter(|&&a| a).count();
        let artificial_start = num_variables + num_slacks;
        let num_columns = artificial_start + num_artificials;

        let mut rows = vec![];
        let mut rhs = vec![];
        let mut basis = vec![];
        let mut next_artificial = artificial_start;
        for i in 0..num_rows {
            assert_eq!(program.a[i].len(), num_variables);
            let mut row = vec![T::zero(); num_columns];
            row[..num_variables].copy_from_slice(&program.a[i]);
            let slack = match i >= program.num_equalities {
                true => Some(num_variables + i - program.num_equalities),
                false => None,
            };
            if let Some(slack) = slack {
                row[slack] = T::one();
            }
            let mut bound = program.b[i];
            if bound < T::zero() {
                for value in row.iter_mut() {
                    *value = -*value;
                }
                bound = -bound;
            }
            if needs_artificial[i] {
                row[next_artificial] = T::one();
                basis.push(next_artificial);
                next_artificial += 1;
            } else if let Some(slack) = slack {
                basis.push(slack);
            }
            rows.push(row);
            rhs.push(bound);
        }

        let tableau = Tableau {
            rows,
            rhs,
            basis,
            num_columns,
            tolerance: config.tolerance,
            iterations: 0,
            max_iterations: config.max_iterations,
        };
        (tableau, artificial_start)
    }

    fn reduced_cost(&self, costs: &[T], column: usize) -> T {
        self.rows
            .iter()
            .zip(self.basis.iter())
            .fold(costs[column], |acc, (row, &b)| acc - costs[b] * row[column])
    }

    fn objective(&self, costs: &[T]) -> T {
        self.rhs
            .iter()
            .zip(self.basis.iter())
            .fold(T::zero(), |acc, (&value, &b)| acc + costs[b] * value)
    }

    fn pivot(&mut self, row: usize, column: usize) {
        let element = self.rows[row][column];
        for value in self.rows[row].iter_mut() {
            *value = *value / element;
        }
        self.rhs[row] = self.rhs[row] / element;

        let pivot_row = self.rows[row].clone();
        let pivot_rhs = self.rhs[row];
        for i in 0..self.rows.len() {
            if i == row {
                continue;
            }
            let factor = self.rows[i][column];
            if factor.is_zero() {
                continue;
            }
            for (value, &p) in self.rows[i].iter_mut().zip(pivot_row.iter()) {
                *value -= factor * p;
            }
            self.rhs[i] -= factor * pivot_rhs;
        }
        self.basis[row] = column;
        self.iterations += 1;
    }

    /// Maximises `costs` over the current basis. Only columns below
    /// `entering_limit` may enter the basis.
    fn optimize(&mut self, costs: &[T], entering_limit: usize) -> Phase {
        loop {
            // Bland: lowest index with a positive reduced cost enters.
            let entering = (0..entering_limit)
                .find(|&j| !self.basis.contains(&j) && self.reduced_cost(costs, j) > self.tolerance);
            let column = match entering {
                Some(column) => column,
                None => return Phase::Optimal,
            };
            if self.iterations >= self.max_iterations {
                return Phase::IterationLimit;
            }

            // Ratio test, ties broken by lowest basic index.
            let mut leaving: Option<(usize, T)> = None;
            for (i, row) in self.rows.iter().enumerate() {
                if row[column] <= self.tolerance {
                    continue;
                }
                let ratio = self.rhs[i] / row[column];
                leaving = match leaving {
                    Some((best, best_ratio))
                        if best_ratio < ratio
                            || (best_ratio <= ratio && self.basis[best] < self.basis[i]) =>
                    {
                        Some((best, best_ratio))
                    }
                    _ => Some((i, ratio)),
                };
            }
            match leaving {
                Some((row, _)) => {
                    trace!("Pivot on row {} column {}", row, column);
                    self.pivot(row, column);
                }
                None => return Phase::Unbounded,
            }
        }
    }

    /// Pivots basic artificials out wherever a nonzero entry allows it. Rows
    /// where none exists are redundant and keep their artificial at zero.
    fn drive_out_artificials(&mut self, artificial_start: usize) {
        for row in 0..self.rows.len() {
            if self.basis[row] < artificial_start {
                continue;
            }
            let replacement =
                (0..artificial_start).find(|&j| self.rows[row][j].abs() > self.tolerance);
            if let Some(column) = replacement {
                self.pivot(row, column);
            }
        }
    }

    fn solution(&self, num_variables: usize) -> Vec<T> {
        let mut x = vec![T::zero(); num_variables];
        for (&b, &value) in self.basis.iter().zip(self.rhs.iter()) {
            if b < num_variables {
                x[b] = value;
            }
        }
        x
    }
}

impl<T: Number> LpSolver<T> for SimplexSolver<T> {
    fn solve(&self, program: &LinearProgram<T>) -> LpSolution<T> {
        let num_variables = program.num_variables();
        let (mut tableau, artificial_start) = Tableau::build(program, &self.config);
        debug!(
            "Simplex: {} rows, {} columns, {} artificials",
            tableau.rows.len(),
            tableau.num_columns,
            tableau.num_columns - artificial_start
        );

        if artificial_start < tableau.num_columns {
            let mut phase_one = vec![T::zero(); tableau.num_columns];
            for cost in phase_one[artificial_start..].iter_mut() {
                *cost = -T::one();
            }
            match tableau.optimize(&phase_one, tableau.num_columns) {
                Phase::Optimal => (),
                Phase::IterationLimit => {
                    return LpSolution {
                        status: LpStatus::IterationLimit,
                        x: tableau.solution(num_variables),
                        objective: T::zero(),
                    }
                }
                // Phase one is bounded by zero.
                Phase::Unbounded => unreachable!(),
            }
            if tableau.objective(&phase_one) < -self.config.tolerance {
                debug!("Simplex: infeasible after {} pivots", tableau.iterations);
                return LpSolution::infeasible(num_variables);
            }
            tableau.drive_out_artificials(artificial_start);
        }

        let mut phase_two = vec![T::zero(); tableau.num_columns];
        phase_two[..num_variables].copy_from_slice(&program.c);
        let status = match tableau.optimize(&phase_two, artificial_start) {
            Phase::Optimal => LpStatus::Optimal,
            Phase::Unbounded => LpStatus::Unbounded,
            Phase::IterationLimit => LpStatus::IterationLimit,
        };
        let x = tableau.solution(num_variables);
        let objective = program.objective_value(&x);
        debug!(
            "Simplex: {:?} after {} pivots, objective {}",
            status, tableau.iterations, objective
        );
        LpSolution {
            status,
            x,
            objective,
        }
    }
}
