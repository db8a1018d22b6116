//! Provides the linear problem exported from a compiled ME-model
//!
//! Rows are metabolites (mass balances, always equal to zero) and columns are
//! reactions, in the order they appear in the model.
use indexmap::IndexMap;
use nalgebra::DVector;
use nalgebra_sparse::{CooMatrix, CscMatrix};
use thiserror::Error;

use crate::configuration::read_configuration;
use crate::me_model::model::Model;
use crate::symbolic::Expression;

/// Linear problem with the growth rate substituted
///
/// maximize objective·v subject to S·v = 0 and lower_bounds ≤ v ≤ upper_bounds
#[derive(Debug, Clone)]
pub struct LinearProblem {
    /// Growth rate substituted into the coefficients
    pub mu: f64,
    /// Metabolite ids, one per row
    pub metabolite_ids: Vec<String>,
    /// Reaction ids, one per column
    pub reaction_ids: Vec<String>,
    /// Stoichiometric matrix
    pub stoichiometry: CscMatrix<f64>,
    /// Lower flux bound of each reaction
    pub lower_bounds: DVector<f64>,
    /// Upper flux bound of each reaction
    pub upper_bounds: DVector<f64>,
    /// Objective coefficient of each reaction, the objective is maximized
    pub objective: DVector<f64>,
}

impl LinearProblem {
    /// Build the problem from the compiled reactions of `model` at growth rate `mu`
    ///
    /// Coefficients smaller in magnitude than the configured tolerance are dropped.
    ///
    /// # Parameters
    /// - model: Model whose reactions have been compiled
    /// - mu: Growth rate (per hour)
    /// - objective: Map of reaction id to objective coefficient
    ///
    /// # Errors
    /// `InvalidMu` for a negative or non finite growth rate, `UnknownReaction` if the
    /// objective references a reaction not in the model
    pub fn from_model(
        model: &Model,
        mu: f64,
        objective: &IndexMap<String, f64>,
    ) -> Result<LinearProblem, ProblemError> {
        if !(mu >= 0. && mu.is_finite()) {
            return Err(ProblemError::InvalidMu(mu));
        }
        let tolerance = read_configuration(|c| c.tolerance);
        let parametric = ParametricMatrix::from_model(model);

        let mut coo = CooMatrix::new(parametric.metabolite_ids.len(), parametric.reaction_ids.len());
        for (row, column, coefficient) in &parametric.entries {
            let value = coefficient.substitute(mu);
            if value.abs() >= tolerance {
                coo.push(*row, *column, value);
            }
        }

        let reactions = model.reactions();
        let mut objective_vector: DVector<f64> = DVector::zeros(reactions.len());
        for (reaction_id, coefficient) in objective {
            let index = reactions
                .get_index_of(reaction_id)
                .ok_or_else(|| ProblemError::UnknownReaction(reaction_id.clone()))?;
            objective_vector[index] = *coefficient;
        }

        Ok(LinearProblem {
            mu,
            stoichiometry: CscMatrix::from(&coo),
            lower_bounds: DVector::from_iterator(
                reactions.len(),
                reactions.values().map(|r| r.lower_bound()),
            ),
            upper_bounds: DVector::from_iterator(
                reactions.len(),
                reactions.values().map(|r| r.upper_bound()),
            ),
            objective: objective_vector,
            metabolite_ids: parametric.metabolite_ids,
            reaction_ids: parametric.reaction_ids,
        })
    }

    pub fn num_metabolites(&self) -> usize {
        self.metabolite_ids.len()
    }

    pub fn num_reactions(&self) -> usize {
        self.reaction_ids.len()
    }
}

/// The stoichiometric matrix with coefficients left as expressions in μ, for consumers
/// which handle parametric coefficients themselves
#[derive(Debug, Clone, PartialEq)]
pub struct ParametricMatrix {
    /// Metabolite ids, one per row
    pub metabolite_ids: Vec<String>,
    /// Reaction ids, one per column
    pub reaction_ids: Vec<String>,
    /// Non zero entries as (row, column, coefficient)
    pub entries: Vec<(usize, usize, Expression)>,
}

impl ParametricMatrix {
    pub fn from_model(model: &Model) -> ParametricMatrix {
        let metabolites = model.metabolites();
        let mut entries = Vec::new();
        for (column, reaction) in model.reactions().values().enumerate() {
            for (metabolite_id, coefficient) in reaction.metabolites() {
                // compiled reactions only reference metabolites of the model
                if let Some(row) = metabolites.get_index_of(metabolite_id) {
                    entries.push((row, column, coefficient.clone()));
                }
            }
        }
        ParametricMatrix {
            metabolite_ids: metabolites.keys().cloned().collect(),
            reaction_ids: model.reactions().keys().cloned().collect(),
            entries,
        }
    }

    /// Entries whose coefficient depends on μ
    pub fn growth_dependent_entries(&self) -> impl Iterator<Item = &(usize, usize, Expression)> {
        self.entries.iter().filter(|(_, _, coefficient)| coefficient.depends_on_mu())
    }
}

/// Errors associated with exporting or solving a problem
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    /// Error when the objective references a reaction not in the model
    #[error("Objective references {0}, which is not a reaction in the model")]
    UnknownReaction(String),
    /// Error when the growth rate is negative or not finite
    #[error("Growth rate must be a non-negative number, got {0}")]
    InvalidMu(f64),
    /// Error when the solver can't be set up for the problem
    #[error("Unable to set up the solver: {0}")]
    SolverSetup(String),
}
