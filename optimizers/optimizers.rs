// Linear programming routines plugged into `efg_core` through its
// `LpSolver` interface.

mod simplex;

pub use simplex::{SimplexSolver, SolverConfig};
