//! Implements a solver interface for Clarabel
//!
//! Clarabel solves min ½xᵀPx + qᵀx subject to Ax + s = b, s ∈ K. The linear problem
//! is written with P = 0, q = -objective and A stacking the mass balances (zero cone)
//! over the upper and lower flux bounds (non-negative cone).
use clarabel::algebra::CscMatrix as ClarabelMatrix;
use clarabel::solver::{DefaultSettingsBuilder, DefaultSolver, IPSolver, SolverStatus, SupportedConeT};
use indexmap::IndexMap;
use nalgebra_sparse::{CooMatrix, CscMatrix};

use crate::optimize::problem::{LinearProblem, ProblemError};
use crate::optimize::solvers::LinearSolver;
use crate::optimize::{OptimizationStatus, ProblemSolution};

/// Interior point solver from the clarabel crate
#[derive(Clone, Debug)]
pub struct ClarabelSolver {
    /// Print solver progress
    pub verbose: bool,
    /// Maximum number of interior point iterations
    pub max_iter: u32,
}

impl Default for ClarabelSolver {
    fn default() -> Self {
        ClarabelSolver {
            verbose: false,
            max_iter: 200,
        }
    }
}

impl ClarabelSolver {
    /// Constraint matrix [S; I; -I] in Clarabel's format
    fn constraint_matrix(problem: &LinearProblem) -> ClarabelMatrix<f64> {
        let m = problem.num_metabolites();
        let n = problem.num_reactions();
        let mut coo = CooMatrix::new(m + 2 * n, n);
        for (row, column, value) in problem.stoichiometry.triplet_iter() {
            coo.push(row, column, *value);
        }
        for column in 0..n {
            coo.push(m + column, column, 1.);
            coo.push(m + n + column, column, -1.);
        }
        let csc = CscMatrix::from(&coo);
        ClarabelMatrix::new(
            csc.nrows(),
            csc.ncols(),
            csc.col_offsets().to_vec(),
            csc.row_indices().to_vec(),
            csc.values().to_vec(),
        )
    }
}

impl LinearSolver for ClarabelSolver {
    fn solve(&self, problem: &LinearProblem) -> Result<ProblemSolution, ProblemError> {
        let m = problem.num_metabolites();
        let n = problem.num_reactions();

        let p = ClarabelMatrix::<f64>::zeros((n, n));
        let q: Vec<f64> = problem.objective.iter().map(|c| -c).collect();
        let a = Self::constraint_matrix(problem);
        let b: Vec<f64> = std::iter::repeat(0.)
            .take(m)
            .chain(problem.upper_bounds.iter().copied())
            .chain(problem.lower_bounds.iter().map(|lb| -lb))
            .collect();
        let cones = [
            SupportedConeT::ZeroConeT(m),
            SupportedConeT::NonnegativeConeT(2 * n),
        ];
        let settings = DefaultSettingsBuilder::default()
            .verbose(self.verbose)
            .max_iter(self.max_iter)
            .build()
            .map_err(|e| ProblemError::SolverSetup(e.to_string()))?;

        let mut solver = DefaultSolver::new(&p, &q, &a, &b, &cones, settings);
        solver.solve();

        let status = match solver.solution.status {
            SolverStatus::Solved => OptimizationStatus::Optimal,
            SolverStatus::AlmostSolved => OptimizationStatus::AlmostOptimal,
            SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => {
                OptimizationStatus::Infeasible
            }
            SolverStatus::DualInfeasible | SolverStatus::AlmostDualInfeasible => {
                OptimizationStatus::Unbounded
            }
            SolverStatus::NumericalError => OptimizationStatus::NumericalError,
            SolverStatus::Unsolved => OptimizationStatus::Unoptimized,
            _ => OptimizationStatus::SolverHalted,
        };
        log::debug!("Clarabel finished at mu={} with status {:?}", problem.mu, status);
        if !status.has_values() {
            return Ok(ProblemSolution::without_values(status));
        }

        let fluxes: IndexMap<String, f64> = problem
            .reaction_ids
            .iter()
            .cloned()
            .zip(solver.solution.x.iter().copied())
            .collect();
        let duals: IndexMap<String, f64> = problem
            .metabolite_ids
            .iter()
            .cloned()
            .zip(solver.solution.z.iter().copied())
            .collect();
        let objective_value: f64 = problem
            .objective
            .iter()
            .zip(solver.solution.x.iter())
            .map(|(c, x)| c * x)
            .sum();
        Ok(ProblemSolution {
            status,
            objective_value: Some(objective_value),
            variable_values: Some(fluxes),
            dual_values: Some(duals),
        })
    }
}
