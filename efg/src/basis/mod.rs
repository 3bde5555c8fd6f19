//! Consistency of a basis, decided by a linear program handed to an
//! external solver.

mod basis;
mod consistency;
mod linear_program;

pub use self::basis::Basis;
pub use self::linear_program::{LinearProgram, LpSolution, LpSolver, LpStatus};
