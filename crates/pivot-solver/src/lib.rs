mod problem;
mod simplex;
mod solution;
mod tableau;

pub use problem::{Constraint, LpProblem, ProblemError};
pub use simplex::Solver;
pub use solution::{Solution, SolutionStatus};
pub use tableau::{SolveState, Tableau};
