//! This module provides the reaction types of an ME-model
//!
//! Every reaction is linked to the [`crate::me_model::process_data::ProcessData`]
//! records it is compiled from. The compiled participants and bounds are only ever
//! written by [`crate::me_model::model::Model::update_reaction`].
use derive_builder::Builder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::configuration::read_configuration;
use crate::me_model::compiler::{Compile, CompiledReaction};
use crate::me_model::MeModelError;
use crate::symbolic::{validate_keff, Expression};

/// Represents a reaction in the ME-model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeReaction {
    /// Used to identify the reaction
    id: String,
    /// Compiled participants, map of metabolite id to coefficient
    metabolites: IndexMap<String, Expression>,
    /// Compiled lower flux bound
    lower_bound: f64,
    /// Compiled upper flux bound
    upper_bound: f64,
    /// Variant specific attributes, including the links to process data
    kind: ReactionKind,
}

impl MeReaction {
    /// Create a new reaction, it has no participants until it is added to a model and updated
    pub fn new(id: &str, kind: impl Into<ReactionKind>) -> MeReaction {
        MeReaction {
            id: id.to_string(),
            metabolites: IndexMap::new(),
            lower_bound: 0.,
            upper_bound: 0.,
            kind: kind.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Compiled participants, map of metabolite id to coefficient
    pub fn metabolites(&self) -> &IndexMap<String, Expression> {
        &self.metabolites
    }

    /// Compiled coefficient of a metabolite
    pub fn coefficient(&self, metabolite: &str) -> Option<&Expression> {
        self.metabolites.get(metabolite)
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    pub fn kind(&self) -> &ReactionKind {
        &self.kind
    }

    /// Mutable access to the attributes of a metabolic reaction (such as its keff)
    pub fn as_metabolic_mut(&mut self) -> Option<&mut MetabolicReaction> {
        match &mut self.kind {
            ReactionKind::Metabolic(reaction) => Some(reaction),
            _ => None,
        }
    }

    /// Replace the compiled state in one step
    pub(crate) fn apply(&mut self, compiled: CompiledReaction) {
        let CompiledReaction {
            metabolites,
            lower_bound,
            upper_bound,
        } = compiled;
        self.metabolites = metabolites;
        self.lower_bound = lower_bound;
        self.upper_bound = upper_bound;
    }

    /// Participants with μ substituted
    pub fn metabolites_at(&self, mu: f64) -> IndexMap<String, f64> {
        self.metabolites
            .iter()
            .map(|(id, coefficient)| (id.clone(), coefficient.substitute(mu)))
            .collect()
    }

    /// Reaction string with μ substituted, e.g. `1 A --> 1 B`
    pub fn reaction_string_at(&self, mu: f64) -> String {
        let mut reactants = Vec::new();
        let mut products = Vec::new();
        for (id, coefficient) in self.metabolites_at(mu) {
            if coefficient < 0. {
                reactants.push(format!("{} {}", -coefficient, id));
            } else {
                products.push(format!("{} {}", coefficient, id));
            }
        }
        let arrow = if self.lower_bound < 0. { "<=>" } else { "-->" };
        format!("{} {} {}", reactants.join(" + "), arrow, products.join(" + "))
    }
}

/// The variants of [`MeReaction`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReactionKind {
    Metabolic(MetabolicReaction),
    Transcription(TranscriptionReaction),
    Translation(TranslationReaction),
    ComplexFormation(ComplexFormation),
    RnaDemand(RnaDemand),
    TRnaCharging(TRnaCharging),
    GenericFormation(GenericFormation),
}

impl ReactionKind {
    /// The compiler for this variant
    pub(crate) fn compiler(&self) -> &dyn Compile {
        match self {
            ReactionKind::Metabolic(r) => r as &dyn Compile,
            ReactionKind::Transcription(r) => r as &dyn Compile,
            ReactionKind::Translation(r) => r as &dyn Compile,
            ReactionKind::ComplexFormation(r) => r as &dyn Compile,
            ReactionKind::RnaDemand(r) => r as &dyn Compile,
            ReactionKind::TRnaCharging(r) => r as &dyn Compile,
            ReactionKind::GenericFormation(r) => r as &dyn Compile,
        }
    }

    /// Ids of the process data this reaction is linked to
    pub fn linked_data(&self) -> Vec<&str> {
        self.compiler().linked_data()
    }

    /// Does compiling this reaction read the records referenced by `data_id`
    /// (its modifications and subreactions), not just `data_id` itself
    pub fn reads_references_of(&self, data_id: &str) -> bool {
        match self {
            ReactionKind::Metabolic(r) => r.stoichiometric_data_id == data_id,
            ReactionKind::Transcription(_)
            | ReactionKind::Translation(_)
            | ReactionKind::ComplexFormation(_)
            | ReactionKind::TRnaCharging(_) => true,
            ReactionKind::RnaDemand(_) | ReactionKind::GenericFormation(_) => false,
        }
    }
}

/// Lumped metabolic reaction with the dilution of its catalyzing complex
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[builder(build_fn(error = "MeModelError", validate = "Self::validate"))]
pub struct MetabolicReaction {
    /// Id of the StoichiometricData the reaction is built from
    #[builder(setter(into))]
    pub(crate) stoichiometric_data_id: String,
    /// Id of the ComplexData of the catalyzing complex, None for spontaneous reactions
    #[builder(default = "None", setter(into, strip_option))]
    pub(crate) complex_data_id: Option<String>,
    /// Effective turnover rate of the complex for this reaction (per second)
    #[builder(default = "read_configuration(|c| c.default_keff)")]
    pub keff: f64,
    /// Is this the reverse instance
    #[builder(default = "false")]
    pub(crate) reverse: bool,
}

impl MetabolicReactionBuilder {
    fn validate(&self) -> Result<(), MeModelError> {
        match self.keff {
            Some(keff) => validate_keff(keff),
            None => Ok(()),
        }
    }
}

impl MetabolicReaction {
    pub fn stoichiometric_data_id(&self) -> &str {
        &self.stoichiometric_data_id
    }

    pub fn complex_data_id(&self) -> Option<&str> {
        self.complex_data_id.as_deref()
    }

    pub fn is_reverse(&self) -> bool {
        self.reverse
    }
}

/// Transcription of a transcription unit into its RNA products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionReaction {
    pub(crate) transcription_data_id: String,
}

impl TranscriptionReaction {
    pub fn new(transcription_data_id: &str) -> Self {
        TranscriptionReaction {
            transcription_data_id: transcription_data_id.to_string(),
        }
    }

    pub fn transcription_data_id(&self) -> &str {
        &self.transcription_data_id
    }
}

/// Translation of an mRNA into a protein
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationReaction {
    pub(crate) translation_data_id: String,
}

impl TranslationReaction {
    pub fn new(translation_data_id: &str) -> Self {
        TranslationReaction {
            translation_data_id: translation_data_id.to_string(),
        }
    }

    pub fn translation_data_id(&self) -> &str {
        &self.translation_data_id
    }
}

/// Formation of a complex from its subunits and modifications
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexFormation {
    pub(crate) complex_data_id: String,
}

impl ComplexFormation {
    pub fn new(complex_data_id: &str) -> Self {
        ComplexFormation {
            complex_data_id: complex_data_id.to_string(),
        }
    }

    pub fn complex_data_id(&self) -> &str {
        &self.complex_data_id
    }
}

/// Demand for one RNA product of a transcription unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RnaDemand {
    pub(crate) transcription_data_id: String,
    pub(crate) rna_id: String,
}

impl RnaDemand {
    pub fn new(transcription_data_id: &str, rna_id: &str) -> Self {
        RnaDemand {
            transcription_data_id: transcription_data_id.to_string(),
            rna_id: rna_id.to_string(),
        }
    }

    pub fn rna_id(&self) -> &str {
        &self.rna_id
    }
}

/// Charging of a tRNA, producing the generic tRNA of its amino acid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TRnaCharging {
    pub(crate) trna_data_id: String,
}

impl TRnaCharging {
    pub fn new(trna_data_id: &str) -> Self {
        TRnaCharging {
            trna_data_id: trna_data_id.to_string(),
        }
    }

    pub fn trna_data_id(&self) -> &str {
        &self.trna_data_id
    }
}

/// Formation of a generic component, either from one of its alternatives or from all
/// of its lumped components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericFormation {
    pub(crate) generic_data_id: String,
    /// The alternative converted, None for a lumped formation
    pub(crate) component: Option<String>,
}

impl GenericFormation {
    /// Conversion of the alternative `component` into the generic
    pub fn from_alternative(generic_data_id: &str, component: &str) -> Self {
        GenericFormation {
            generic_data_id: generic_data_id.to_string(),
            component: Some(component.to_string()),
        }
    }

    /// Formation of the generic from all of its lumped components
    pub fn lumped(generic_data_id: &str) -> Self {
        GenericFormation {
            generic_data_id: generic_data_id.to_string(),
            component: None,
        }
    }

    pub fn generic_data_id(&self) -> &str {
        &self.generic_data_id
    }

    pub fn component(&self) -> Option<&str> {
        self.component.as_deref()
    }
}

impl From<MetabolicReaction> for ReactionKind {
    fn from(reaction: MetabolicReaction) -> Self {
        ReactionKind::Metabolic(reaction)
    }
}

impl From<TranscriptionReaction> for ReactionKind {
    fn from(reaction: TranscriptionReaction) -> Self {
        ReactionKind::Transcription(reaction)
    }
}

impl From<TranslationReaction> for ReactionKind {
    fn from(reaction: TranslationReaction) -> Self {
        ReactionKind::Translation(reaction)
    }
}

impl From<ComplexFormation> for ReactionKind {
    fn from(reaction: ComplexFormation) -> Self {
        ReactionKind::ComplexFormation(reaction)
    }
}

impl From<RnaDemand> for ReactionKind {
    fn from(reaction: RnaDemand) -> Self {
        ReactionKind::RnaDemand(reaction)
    }
}

impl From<TRnaCharging> for ReactionKind {
    fn from(reaction: TRnaCharging) -> Self {
        ReactionKind::TRnaCharging(reaction)
    }
}

impl From<GenericFormation> for ReactionKind {
    fn from(reaction: GenericFormation) -> Self {
        ReactionKind::GenericFormation(reaction)
    }
}
