use crate::numeric::Number;

/// A dense linear program in the form
///
/// ```text
/// maximise    c . x
/// subject to  a[i] . x  = b[i]   for i <  num_equalities
///             a[i] . x <= b[i]   for i >= num_equalities
///             x >= 0
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearProgram<T: Number> {
    pub a: Vec<Vec<T>>,
    pub b: Vec<T>,
    pub c: Vec<T>,
    pub num_equalities: usize,
}

impl<T: Number> LinearProgram<T> {
    pub fn num_variables(&self) -> usize {
        self.c.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.b.len()
    }

    /// True if `x` satisfies every constraint up to `T::tolerance()`.
    pub fn is_feasible_point(&self, x: &[T]) -> bool {
        if x.len() != self.num_variables() || x.iter().any(|&v| v < -T::tolerance()) {
            return false;
        }
        self.a.iter().zip(self.b.iter()).enumerate().all(|(row, (coefficients, &bound))| {
            let lhs = coefficients
                .iter()
                .zip(x.iter())
                .fold(T::zero(), |acc, (&a, &v)| acc + a * v);
            match row < self.num_equalities {
                true => lhs.approx_eq(bound),
                false => lhs <= bound + T::tolerance(),
            }
        })
    }

    pub fn objective_value(&self, x: &[T]) -> T {
        self.c
            .iter()
            .zip(x.iter())
            .fold(T::zero(), |acc, (&c, &v)| acc + c * v)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LpStatus {
    Optimal,
    Infeasible,
    Unbounded,
    IterationLimit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LpSolution<T: Number> {
    pub status: LpStatus,

    // Meaningful only when `status` is `Optimal`.
    pub x: Vec<T>,
    pub objective: T,
}

impl<T: Number> LpSolution<T> {
    pub fn infeasible(num_variables: usize) -> LpSolution<T> {
        LpSolution {
            status: LpStatus::Infeasible,
            x: vec![T::zero(); num_variables],
            objective: T::zero(),
        }
    }
}

/// An external linear programming routine.
pub trait LpSolver<T: Number> {
    fn solve(&self, program: &LinearProgram<T>) -> LpSolution<T>;
}
