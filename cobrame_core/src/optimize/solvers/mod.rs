//! Solvers for the exported linear problem
pub mod clarabel;

use crate::optimize::problem::{LinearProblem, ProblemError};
use crate::optimize::ProblemSolution;

/// A solver for linear problems
pub trait LinearSolver {
    /// Maximize the objective of `problem`
    ///
    /// A problem which is infeasible or unbounded is not an error, it is reported
    /// through the status of the solution.
    fn solve(&self, problem: &LinearProblem) -> Result<ProblemSolution, ProblemError>;
}
