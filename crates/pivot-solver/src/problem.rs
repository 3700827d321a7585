use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    #[error("Problem has no decision variables")]
    Empty,
    #[error("Problem has no constraints")]
    NoConstraints,
    #[error("Constraint {constraint} has {found} coefficients, expected {expected}")]
    DimensionMismatch {
        constraint: usize,
        expected: usize,
        found: usize,
    },
}

/// A linear program of the form: maximize `c·x` subject to `A·x <= b`, `x >= 0`
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LpProblem {
    /// Objective coefficients to maximize, one per decision variable
    pub objective: Vec<f64>,
    /// `<=` constraints
    pub constraints: Vec<Constraint>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Right-hand side value, expected to be non-negative
    pub rhs: f64,
}

impl LpProblem {
    pub fn new(objective: Vec<f64>) -> Self {
        Self {
            objective,
            constraints: Vec::new(),
        }
    }

    pub fn add_constraint(&mut self, coefficients: Vec<f64>, rhs: f64) {
        self.constraints.push(Constraint { coefficients, rhs });
    }

    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Check that the problem has a shape the tableau can be built from.
    ///
    /// Signs are not checked: a negative right-hand side makes the origin an
    /// infeasible starting basis, which the solver does not handle.
    pub fn validate(&self) -> Result<(), ProblemError> {
        let n = self.num_variables();
        if n == 0 {
            return Err(ProblemError::Empty);
        }
        if self.constraints.is_empty() {
            return Err(ProblemError::NoConstraints);
        }
        for (i, c) in self.constraints.iter().enumerate() {
            if c.coefficients.len() != n {
                return Err(ProblemError::DimensionMismatch {
                    constraint: i + 1,
                    expected: n,
                    found: c.coefficients.len(),
                });
            }
        }
        Ok(())
    }

    /// Left-hand side `Σ a_ij x_j` of every constraint for the given values
    pub fn constraint_activity(&self, values: &[f64]) -> Vec<f64> {
        self.constraints
            .iter()
            .map(|c| c.coefficients.iter().zip(values).map(|(a, x)| a * x).sum())
            .collect()
    }

    /// Whether `values` satisfies every constraint and the non-negativity bounds
    pub fn is_satisfied_by(&self, values: &[f64]) -> bool {
        values.iter().all(|&x| x >= 0.0)
            && self
                .constraint_activity(values)
                .iter()
                .zip(&self.constraints)
                .all(|(lhs, c)| *lhs <= c.rhs)
    }
}
