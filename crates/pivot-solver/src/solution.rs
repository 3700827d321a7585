use crate::tableau::Tableau;

/// The result of solving an LP problem
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Solution status
    pub status: SolutionStatus,
    /// Value of each decision variable, empty when unbounded
    pub values: Vec<f64>,
    /// Objective value of `values`, infinite when unbounded
    pub objective_value: f64,
    /// Dual value of each constraint, empty when unbounded
    pub shadow_prices: Vec<f64>,
    /// Number of pivots performed
    pub iterations: usize,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// An optimal solution was found
    Optimal,
    /// The objective can increase without bound
    Unbounded,
    /// The configured iteration limit was reached before optimality
    IterationLimit,
}

impl Solution {
    /// Read the basic solution off a tableau
    pub fn from_tableau(status: SolutionStatus, tableau: &Tableau, iterations: usize) -> Self {
        Self {
            status,
            values: tableau.variable_values(),
            objective_value: tableau.objective_value(),
            shadow_prices: tableau.shadow_prices(),
            iterations,
        }
    }

    pub fn unbounded(iterations: usize) -> Self {
        Self {
            status: SolutionStatus::Unbounded,
            values: Vec::new(),
            objective_value: f64::INFINITY,
            shadow_prices: Vec::new(),
            iterations,
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }
}
