use std::fmt;

use log::{debug, trace};

use crate::problem::{LpProblem, ProblemError};

/// Where the simplex iteration stands after a call to [`Tableau::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveState {
    /// A pivot was performed and the objective may still improve
    Iterating,
    /// No objective-row entry is negative
    Optimal,
    /// The entering column has no positive entry to bound it
    Unbounded,
}

/// Dense simplex tableau with `m + 1` rows and `n + m + 1` columns.
///
/// Row 0 is the objective row holding the negated objective coefficients,
/// rows `1..=m` are the constraint rows. Columns `0..n` belong to the decision
/// variables, `n..n + m` to the slack variables and the last column is the
/// right-hand side.
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau {
    data: Vec<Vec<f64>>,
    n_vars: usize,
    n_constraints: usize,
}

impl Tableau {
    /// Allocate a zeroed tableau for `n_vars` variables and `n_constraints` constraints
    pub fn new(n_vars: usize, n_constraints: usize) -> Self {
        let total_cols = n_vars + n_constraints + 1; // +1 for RHS
        let total_rows = n_constraints + 1; // +1 for objective
        Self {
            data: vec![vec![0.0; total_cols]; total_rows],
            n_vars,
            n_constraints,
        }
    }

    pub fn from_problem(problem: &LpProblem) -> Result<Self, ProblemError> {
        problem.validate()?;

        let mut tableau = Self::new(problem.num_variables(), problem.num_constraints());
        tableau.set_objective(&problem.objective);
        for (i, c) in problem.constraints.iter().enumerate() {
            tableau.set_constraint(i, &c.coefficients, c.rhs);
        }
        Ok(tableau)
    }

    /// Write the objective row. Coefficients are negated so that negative
    /// entries mark the columns that improve the objective.
    pub fn set_objective(&mut self, coefficients: &[f64]) {
        for (j, &coef) in coefficients.iter().take(self.n_vars).enumerate() {
            self.data[0][j] = -coef;
        }
    }

    /// Write constraint `index` (zero based) into tableau row `index + 1`
    /// together with its slack column.
    pub fn set_constraint(&mut self, index: usize, coefficients: &[f64], rhs: f64) {
        let rhs_col = self.rhs_col();
        let row = &mut self.data[index + 1];
        for (j, &coef) in coefficients.iter().take(self.n_vars).enumerate() {
            row[j] = coef;
        }
        row[rhs_col] = rhs;
        row[self.n_vars + index] = 1.0;
    }

    pub fn num_variables(&self) -> usize {
        self.n_vars
    }

    pub fn num_constraints(&self) -> usize {
        self.n_constraints
    }

    pub fn rhs_col(&self) -> usize {
        self.n_vars + self.n_constraints
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.data
    }

    /// Current objective value, read from the right-hand side of the objective row
    pub fn objective_value(&self) -> f64 {
        self.data[0][self.rhs_col()]
    }

    /// Entering column: the most negative objective-row entry, first one on ties.
    /// `None` means the tableau is optimal.
    pub fn pivot_column(&self) -> Option<usize> {
        let mut min_val = 0.0;
        let mut min_col = None;

        for (j, &value) in self.data[0][..self.rhs_col()].iter().enumerate() {
            if value < min_val {
                min_val = value;
                min_col = Some(j);
            }
        }

        min_col
    }

    /// Leaving row for `col` by the minimum ratio test, first one on ties.
    /// `None` means the objective is unbounded along `col`.
    pub fn pivot_row(&self, col: usize) -> Option<usize> {
        let rhs_col = self.rhs_col();

        let mut min_ratio = f64::INFINITY;
        let mut min_row = None;

        for i in 1..=self.n_constraints {
            let val = self.data[i][col];
            if val > 0.0 {
                let ratio = self.data[i][rhs_col] / val;
                if ratio < min_ratio {
                    min_ratio = ratio;
                    min_row = Some(i);
                }
            }
        }

        min_row
    }

    /// Gauss-Jordan step making `col` a unit column with its 1 in `row`
    pub fn pivot(&mut self, row: usize, col: usize) {
        let pivot_val = self.data[row][col];
        for value in self.data[row].iter_mut() {
            *value /= pivot_val;
        }

        let pivot_row = self.data[row].clone();
        for (i, other) in self.data.iter_mut().enumerate() {
            if i == row {
                continue;
            }
            let factor = other[col];
            for (value, &p) in other.iter_mut().zip(&pivot_row) {
                *value -= factor * p;
            }
        }
    }

    /// Run one transition of the simplex state machine
    pub fn step(&mut self) -> SolveState {
        let Some(col) = self.pivot_column() else {
            return SolveState::Optimal;
        };
        let Some(row) = self.pivot_row(col) else {
            debug!("column {col} has no positive entry, objective is unbounded");
            return SolveState::Unbounded;
        };

        debug!(
            "pivot on row {row}, column {col} (entry {:.4}, ratio {:.4})",
            self.data[row][col],
            self.data[row][self.rhs_col()] / self.data[row][col]
        );
        self.pivot(row, col);
        trace!("objective value now {:.4}", self.objective_value());
        SolveState::Iterating
    }

    pub fn is_optimal(&self) -> bool {
        self.pivot_column().is_none()
    }

    /// Constraint row holding the 1 of a unit column, or `None` if `col` is non-basic.
    ///
    /// The comparison is exact, so a value like `0.9999999999` left behind by
    /// earlier divisions makes the column non-basic. The objective row takes
    /// part in the check and must hold exactly 0.
    #[allow(clippy::float_cmp)]
    pub fn basic_row(&self, col: usize) -> Option<usize> {
        let mut unit_row = None;

        for (i, row) in self.data.iter().enumerate() {
            let value = row[col];
            if i > 0 && value == 1.0 && unit_row.is_none() {
                unit_row = Some(i);
            } else if value != 0.0 {
                return None;
            }
        }

        unit_row
    }

    /// Values of the decision variables in the current basic solution.
    ///
    /// Each constraint row supplies at most one variable: when several columns
    /// look like unit columns on the same row, the leftmost one takes it and
    /// the others are 0.
    pub fn variable_values(&self) -> Vec<f64> {
        let rhs_col = self.rhs_col();
        let mut claimed = vec![false; self.data.len()];
        (0..self.n_vars)
            .map(|j| match self.basic_row(j) {
                Some(row) if !claimed[row] => {
                    claimed[row] = true;
                    self.data[row][rhs_col]
                }
                _ => 0.0,
            })
            .collect()
    }

    /// Objective-row entries of the slack columns. At an optimum these are the
    /// dual values: the objective gain per unit increase of each right-hand side.
    pub fn shadow_prices(&self) -> Vec<f64> {
        self.data[0][self.n_vars..self.rhs_col()].to_vec()
    }
}

impl fmt::Display for Tableau {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.data {
            for value in row {
                write!(f, "{value:>10.2} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn problem_b() -> LpProblem {
        // Maximize: 2x + 3y
        // Subject to:
        //   x + y <= 4
        //   x + 2y <= 5
        let mut problem = LpProblem::new(vec![2.0, 3.0]);
        problem.add_constraint(vec![1.0, 1.0], 4.0);
        problem.add_constraint(vec![1.0, 2.0], 5.0);
        problem
    }

    #[test]
    fn test_construction_layout() {
        let tableau = Tableau::from_problem(&problem_b()).unwrap();

        assert_eq!(tableau.rows().len(), 3);
        assert_eq!(tableau.rhs_col(), 4);
        assert_eq!(
            tableau.rows(),
            &[
                vec![-2.0, -3.0, 0.0, 0.0, 0.0],
                vec![1.0, 1.0, 1.0, 0.0, 4.0],
                vec![1.0, 2.0, 0.0, 1.0, 5.0],
            ]
        );
    }

    #[test]
    fn test_build_by_hand_matches_problem() {
        let mut tableau = Tableau::new(2, 2);
        assert!(tableau.rows().iter().flatten().all(|&v| v == 0.0));

        tableau.set_objective(&[2.0, 3.0]);
        tableau.set_constraint(0, &[1.0, 1.0], 4.0);
        tableau.set_constraint(1, &[1.0, 2.0], 5.0);

        assert_eq!(tableau, Tableau::from_problem(&problem_b()).unwrap());
    }

    #[test]
    fn test_from_problem_rejects_bad_shape() {
        let mut problem = LpProblem::new(vec![1.0, 1.0]);
        problem.add_constraint(vec![1.0, 1.0, 1.0], 3.0);
        assert!(matches!(
            Tableau::from_problem(&problem),
            Err(ProblemError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_pivot_column_most_negative() {
        let tableau = Tableau::from_problem(&problem_b()).unwrap();
        assert_eq!(tableau.pivot_column(), Some(1));
    }

    #[test]
    fn test_pivot_column_tie_takes_first() {
        let mut problem = LpProblem::new(vec![4.0, 1.0, 4.0]);
        problem.add_constraint(vec![1.0, 1.0, 1.0], 1.0);
        let tableau = Tableau::from_problem(&problem).unwrap();
        assert_eq!(tableau.pivot_column(), Some(0));
    }

    #[test]
    fn test_pivot_column_none_when_nothing_negative() {
        let mut problem = LpProblem::new(vec![0.0, -1.0]);
        problem.add_constraint(vec![1.0, 1.0], 1.0);
        let tableau = Tableau::from_problem(&problem).unwrap();
        assert_eq!(tableau.pivot_column(), None);
        assert!(tableau.is_optimal());
    }

    #[test]
    fn test_pivot_row_minimum_ratio() {
        let tableau = Tableau::from_problem(&problem_b()).unwrap();
        // 4 / 1 = 4 against 5 / 2 = 2.5
        assert_eq!(tableau.pivot_row(1), Some(2));
        // 4 / 1 = 4 against 5 / 1 = 5
        assert_eq!(tableau.pivot_row(0), Some(1));
    }

    #[test]
    fn test_pivot_row_skips_non_positive_and_ties_take_first() {
        let mut problem = LpProblem::new(vec![1.0]);
        problem.add_constraint(vec![-1.0], 1.0);
        problem.add_constraint(vec![0.0], 0.0);
        problem.add_constraint(vec![1.0], 2.0);
        problem.add_constraint(vec![2.0], 4.0);
        let tableau = Tableau::from_problem(&problem).unwrap();
        assert_eq!(tableau.pivot_row(0), Some(3));
    }

    #[test]
    fn test_pivot_row_none_without_positive_entry() {
        let mut problem = LpProblem::new(vec![1.0]);
        problem.add_constraint(vec![-1.0], 1.0);
        problem.add_constraint(vec![0.0], 3.0);
        let tableau = Tableau::from_problem(&problem).unwrap();
        assert_eq!(tableau.pivot_row(0), None);
    }

    #[test]
    fn test_pivot_makes_unit_column() {
        let mut tableau = Tableau::from_problem(&problem_b()).unwrap();
        tableau.pivot(2, 1);

        for (i, row) in tableau.rows().iter().enumerate() {
            let expected = if i == 2 { 1.0 } else { 0.0 };
            assert_eq!(row[1], expected, "row {i}");
        }
        assert_eq!(
            tableau.rows(),
            &[
                vec![-0.5, 0.0, 0.0, 1.5, 7.5],
                vec![0.5, 0.0, 1.0, -0.5, 1.5],
                vec![0.5, 1.0, 0.0, 0.5, 2.5],
            ]
        );
        assert_eq!(tableau.basic_row(1), Some(2));
    }

    #[test]
    fn test_step_reaches_optimum() {
        init();
        let mut tableau = Tableau::from_problem(&problem_b()).unwrap();

        assert_eq!(tableau.step(), SolveState::Iterating);
        assert_eq!(tableau.step(), SolveState::Iterating);
        assert_eq!(tableau.step(), SolveState::Optimal);

        // Stays optimal when asked again
        assert_eq!(tableau.pivot_column(), None);
        assert_eq!(tableau.step(), SolveState::Optimal);

        for (j, &value) in tableau.rows()[0][..tableau.rhs_col()].iter().enumerate() {
            assert!(value >= 0.0, "objective row column {j} = {value}");
        }
        assert_eq!(tableau.variable_values(), vec![3.0, 1.0]);
        assert_eq!(tableau.objective_value(), 9.0);
        assert_eq!(tableau.shadow_prices(), vec![1.0, 1.0]);
    }

    #[test]
    fn test_step_detects_unbounded() {
        init();
        // Maximize x + y subject to x <= 1: y can grow without limit
        let mut problem = LpProblem::new(vec![1.0, 1.0]);
        problem.add_constraint(vec![1.0, 0.0], 1.0);
        let mut tableau = Tableau::from_problem(&problem).unwrap();

        assert_eq!(tableau.step(), SolveState::Iterating);
        assert_eq!(tableau.pivot_column(), Some(1));
        assert_eq!(tableau.step(), SolveState::Unbounded);
    }

    #[test]
    fn test_basic_row_checks_objective_row() {
        // Maximize 3x + 5y subject to x + y <= 4. After one pivot x still has a
        // single 1 among the constraint rows but a nonzero objective entry.
        let mut problem = LpProblem::new(vec![3.0, 5.0]);
        problem.add_constraint(vec![1.0, 1.0], 4.0);
        let mut tableau = Tableau::from_problem(&problem).unwrap();
        assert_eq!(tableau.step(), SolveState::Iterating);
        assert_eq!(tableau.step(), SolveState::Optimal);

        assert_eq!(tableau.basic_row(0), None);
        assert_eq!(tableau.basic_row(1), Some(1));
        assert_eq!(tableau.variable_values(), vec![0.0, 4.0]);
        assert_eq!(tableau.objective_value(), 20.0);
    }

    #[test]
    fn test_unit_row_goes_to_one_column() {
        // Maximize x + y subject to x + y <= 4. Both columns end up identical
        // unit columns on row 1 after the pivot.
        let mut problem = LpProblem::new(vec![1.0, 1.0]);
        problem.add_constraint(vec![1.0, 1.0], 4.0);
        let mut tableau = Tableau::from_problem(&problem).unwrap();
        assert_eq!(tableau.step(), SolveState::Iterating);
        assert_eq!(tableau.step(), SolveState::Optimal);

        assert_eq!(tableau.basic_row(0), Some(1));
        assert_eq!(tableau.basic_row(1), Some(1));
        assert_eq!(tableau.variable_values(), vec![4.0, 0.0]);
        assert!(problem.is_satisfied_by(&tableau.variable_values()));
        assert_eq!(tableau.objective_value(), 4.0);
    }

    #[test]
    fn test_unit_row_at_origin_with_negative_zero_objective() {
        // The objective row holds -0.0, which compares equal to 0.0
        let mut problem = LpProblem::new(vec![0.0, 0.0]);
        problem.add_constraint(vec![1.0, 1.0], 4.0);
        let tableau = Tableau::from_problem(&problem).unwrap();

        assert!(tableau.is_optimal());
        assert_eq!(tableau.variable_values(), vec![4.0, 0.0]);
        assert!(problem.is_satisfied_by(&tableau.variable_values()));
    }

    #[test]
    fn test_basic_row_is_exact() {
        let mut tableau = Tableau::new(1, 2);
        tableau.set_constraint(0, &[1.0], 2.0);
        tableau.set_constraint(1, &[0.0], 3.0);
        assert_eq!(tableau.basic_row(0), Some(1));

        tableau.data[1][0] = 1.0 - 1e-12;
        assert_eq!(tableau.basic_row(0), None);

        tableau.data[1][0] = 1.0;
        tableau.data[2][0] = 1.0;
        assert_eq!(tableau.basic_row(0), None);
    }

    #[test]
    fn test_display_grid() {
        let mut problem = LpProblem::new(vec![3.0, 5.0]);
        problem.add_constraint(vec![1.0, 1.0], 4.0);
        let tableau = Tableau::from_problem(&problem).unwrap();

        assert_eq!(
            tableau.to_string(),
            "     -3.00      -5.00       0.00       0.00 \n      1.00       1.00       1.00       4.00 \n"
        );
    }
}
