use std::io::{self, Write};

use pivot_solver::{LpProblem, Solution, SolutionStatus, Tableau};

/// Relative slack allowed when checking a reported solution against its constraints
const FEASIBILITY_TOLERANCE: f64 = 1e-9;

pub fn write_tableau(out: &mut impl Write, tableau: &Tableau) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Current Tableau:")?;
    write!(out, "{tableau}")
}

pub fn write_status(out: &mut impl Write, solution: &Solution) -> io::Result<()> {
    match solution.status {
        SolutionStatus::Optimal => writeln!(out, "Optimal solution found."),
        SolutionStatus::Unbounded => writeln!(out, "The problem is unbounded."),
        SolutionStatus::IterationLimit => writeln!(
            out,
            "Stopped after {} iterations without reaching an optimal solution.",
            solution.iterations
        ),
    }
}

/// Variable values and objective. Nothing is written for an unbounded problem.
pub fn write_solution(out: &mut impl Write, solution: &Solution) -> io::Result<()> {
    let (heading, objective) = match solution.status {
        SolutionStatus::Optimal => ("Optimal Solution:", "Maximum Value of Objective Function"),
        SolutionStatus::IterationLimit => ("Current Solution:", "Current Value of Objective Function"),
        SolutionStatus::Unbounded => return Ok(()),
    };

    writeln!(out)?;
    writeln!(out, "{heading}")?;
    for (i, value) in solution.values.iter().enumerate() {
        writeln!(out, "x{} = {:.2}", i + 1, value)?;
    }
    writeln!(out, "{}: {:.2}", objective, solution.objective_value)
}

pub fn write_json(out: &mut impl Write, solution: &Solution) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, solution)?;
    writeln!(out)
}

/// Indices of the constraints `values` violates by more than rounding noise.
/// Negative right-hand sides are the usual cause, since the origin is then no
/// feasible starting point.
pub fn violated_constraints(problem: &LpProblem, values: &[f64]) -> Vec<usize> {
    problem
        .constraint_activity(values)
        .iter()
        .zip(&problem.constraints)
        .enumerate()
        .filter(|(_, (lhs, c))| **lhs > c.rhs + FEASIBILITY_TOLERANCE * c.rhs.abs().max(1.0))
        .map(|(i, _)| i)
        .collect()
}
