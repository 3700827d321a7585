use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use pivot_solver::LpProblem;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Unexpected end of input: expected {expected}")]
    UnexpectedEof { expected: String },
    #[error("Invalid number '{token}' for {expected}")]
    InvalidNumber { token: String, expected: String },
    #[error("Invalid {what} '{token}': expected a positive integer")]
    InvalidCount { what: &'static str, token: String },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Reads a problem as a stream of whitespace separated numbers:
/// the variable count `n`, the constraint count `m`, `n` objective
/// coefficients, then for every constraint `n` coefficients and its
/// right-hand side. Line breaks carry no meaning.
pub struct InputReader<R, W> {
    reader: R,
    /// Where prompts go, `None` when reading non-interactively
    prompt: Option<W>,
    pending: VecDeque<String>,
}

impl<R: BufRead, W: Write> InputReader<R, W> {
    pub fn new(reader: R, prompt: Option<W>) -> Self {
        Self {
            reader,
            prompt,
            pending: VecDeque::new(),
        }
    }

    pub fn read_problem(&mut self) -> Result<LpProblem, InputError> {
        self.say("Enter number of variables: ")?;
        let n = self.read_count("number of variables")?;
        self.say("Enter number of constraints: ")?;
        let m = self.read_count("number of constraints")?;

        self.say("Enter the coefficients of the objective function (c1, c2, ..., cn): ")?;
        let objective = (1..=n)
            .map(|j| self.read_number(|| format!("objective coefficient c{j}")))
            .collect::<Result<Vec<_>, _>>()?;
        let mut problem = LpProblem::new(objective);

        self.say("Enter the coefficients of the constraint equations:\n")?;
        for i in 1..=m {
            self.say(&format!("For constraint {i}:\n"))?;
            let coefficients = (1..=n)
                .map(|j| self.read_number(|| format!("coefficient a{i}{j}")))
                .collect::<Result<Vec<_>, _>>()?;
            self.say(&format!("Enter the right-hand side (b{i}): "))?;
            let rhs = self.read_number(|| format!("right-hand side b{i}"))?;
            problem.add_constraint(coefficients, rhs);
        }

        log::info!("read problem with {n} variables and {m} constraints");
        Ok(problem)
    }

    fn say(&mut self, text: &str) -> Result<(), InputError> {
        if let Some(out) = self.prompt.as_mut() {
            out.write_all(text.as_bytes())?;
            out.flush()?;
        }
        Ok(())
    }

    fn next_token(&mut self, expected: impl FnOnce() -> String) -> Result<String, InputError> {
        let mut line = String::new();
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(InputError::UnexpectedEof { expected: expected() });
            }
            self.pending.extend(line.split_whitespace().map(str::to_string));
        }
    }

    fn read_number(&mut self, expected: impl Fn() -> String) -> Result<f64, InputError> {
        let token = self.next_token(&expected)?;
        token.parse().map_err(|_| InputError::InvalidNumber {
            token,
            expected: expected(),
        })
    }

    fn read_count(&mut self, what: &'static str) -> Result<usize, InputError> {
        let token = self.next_token(|| what.to_string())?;
        match token.parse::<usize>() {
            Ok(count) if count > 0 => Ok(count),
            _ => Err(InputError::InvalidCount { what, token }),
        }
    }
}
