use log::{info, warn};

use crate::problem::{LpProblem, ProblemError};
use crate::solution::{Solution, SolutionStatus};
use crate::tableau::{SolveState, Tableau};

/// Tableau simplex solver for `max c·x` subject to `A·x <= b`, `x >= 0`
#[derive(Debug, Clone, Default)]
pub struct Solver {
    /// Maximum pivots before giving up, unlimited when `None`
    max_iterations: Option<usize>,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = Some(max);
        self
    }

    pub fn solve(&self, problem: &LpProblem) -> Result<Solution, ProblemError> {
        self.solve_with(problem, |_| {})
    }

    /// Solve the problem, handing the tableau to `observe` before every iteration
    pub fn solve_with<F>(&self, problem: &LpProblem, observe: F) -> Result<Solution, ProblemError>
    where
        F: FnMut(&Tableau),
    {
        for (i, c) in problem.constraints.iter().enumerate() {
            if c.rhs < 0.0 {
                warn!(
                    "constraint {} has negative right-hand side {}; the origin is not a feasible start",
                    i + 1,
                    c.rhs
                );
            }
        }

        let mut tableau = Tableau::from_problem(problem)?;
        Ok(self.run(&mut tableau, observe))
    }

    /// Iterate an already populated tableau until it is optimal or unbounded
    pub fn run<F>(&self, tableau: &mut Tableau, mut observe: F) -> Solution
    where
        F: FnMut(&Tableau),
    {
        let mut iterations = 0;

        loop {
            observe(tableau);

            // An unbounded or optimal tableau is reported as such even at the limit
            let can_pivot = tableau
                .pivot_column()
                .is_some_and(|col| tableau.pivot_row(col).is_some());
            if can_pivot && self.max_iterations.is_some_and(|max| iterations >= max) {
                warn!("stopped after {iterations} iterations without reaching an optimum");
                return Solution::from_tableau(SolutionStatus::IterationLimit, tableau, iterations);
            }

            match tableau.step() {
                SolveState::Iterating => iterations += 1,
                SolveState::Optimal => {
                    info!(
                        "optimal solution found after {iterations} iterations, objective {}",
                        tableau.objective_value()
                    );
                    return Solution::from_tableau(SolutionStatus::Optimal, tableau, iterations);
                }
                SolveState::Unbounded => {
                    info!("problem is unbounded, stopped after {iterations} iterations");
                    return Solution::unbounded(iterations);
                }
            }
        }
    }
}
