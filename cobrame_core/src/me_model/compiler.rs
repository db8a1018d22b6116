//! Compilation of reactions from their process data
//!
//! Each reaction variant implements [`Compile`], which reads the current state of
//! the model and builds the complete participant map from scratch. Nothing is
//! patched incrementally, so compiling an unchanged model twice gives the same result.
use indexmap::IndexMap;

use crate::me_model::metabolite::TranscribedGene;
use crate::me_model::model::Model;
use crate::me_model::process_data::{
    check_count, generic_trna_id, ComplexData, GenericComponents, GenericData, ModificationData,
    StoichiometricData, SubreactionData, TRnaData, TranscriptionData, TranslationData,
};
use crate::me_model::reaction::{
    ComplexFormation, GenericFormation, MetabolicReaction, RnaDemand, TRnaCharging,
    TranscriptionReaction, TranslationReaction,
};
use crate::me_model::MeModelError;
use crate::sequence;
use crate::sequence::dogma::Codon;
use crate::sequence::mass::{protein_mass, rna_mass};
use crate::symbolic::Expression;

/// Compiled participants and bounds of a reaction
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledReaction {
    /// Map of metabolite id to coefficient
    pub metabolites: IndexMap<String, Expression>,
    /// Lower flux bound
    pub lower_bound: f64,
    /// Upper flux bound
    pub upper_bound: f64,
}

impl CompiledReaction {
    fn new(lower_bound: f64, upper_bound: f64) -> Self {
        CompiledReaction {
            metabolites: IndexMap::new(),
            lower_bound,
            upper_bound,
        }
    }

    /// Add a term to the coefficient of a metabolite
    fn add(&mut self, metabolite: &str, coefficient: impl Into<Expression>) {
        let coefficient = coefficient.into();
        match self.metabolites.get_mut(metabolite) {
            Some(existing) => {
                let current = std::mem::replace(existing, Expression::zero());
                *existing = current + coefficient;
            }
            None => {
                self.metabolites.insert(metabolite.to_string(), coefficient);
            }
        }
    }

    /// Add `count` occurrences of a subreaction: its stoichiometry, and the dilution
    /// of its enzyme if it has one
    fn add_subreaction(
        &mut self,
        model: &Model,
        subreaction_id: &str,
        count: f64,
        referenced_by: &str,
    ) -> Result<(), MeModelError> {
        let subreaction = model.referenced::<SubreactionData>(subreaction_id, referenced_by)?;
        for (metabolite, coefficient) in &subreaction.stoichiometry {
            self.add(metabolite, coefficient * count);
        }
        if let Some(enzyme) = &subreaction.enzyme {
            let keff = subreaction.keff.ok_or_else(|| {
                MeModelError::InvalidParameter(format!("{} has an enzyme but no keff", subreaction_id))
            })?;
            self.add(enzyme, -Expression::dilution(keff)?.scale(count));
        }
        Ok(())
    }

    /// Drop zero coefficients and check every participant is in the model
    fn finish(mut self, model: &Model, reaction_id: &str) -> Result<CompiledReaction, MeModelError> {
        self.metabolites.retain(|_, coefficient| !coefficient.is_zero());
        if let Some(missing) = self
            .metabolites
            .keys()
            .find(|id| !model.has_metabolite(id))
        {
            return Err(MeModelError::DanglingReference {
                id: missing.clone(),
                referenced_by: reaction_id.to_string(),
            });
        }
        Ok(self)
    }
}

/// A reaction variant which can be compiled from the model's process data
pub trait Compile {
    /// Ids of the process data records the reaction is built from
    fn linked_data(&self) -> Vec<&str>;

    /// Build the participants and bounds of reaction `reaction_id` from the current model
    fn compile(&self, reaction_id: &str, model: &Model) -> Result<CompiledReaction, MeModelError>;
}

/// Clamp a bound to the non-negative half line
fn non_negative(bound: f64) -> f64 {
    if bound > 0. {
        bound
    } else {
        0.
    }
}

impl Compile for MetabolicReaction {
    fn linked_data(&self) -> Vec<&str> {
        let mut linked = vec![self.stoichiometric_data_id.as_str()];
        if let Some(complex) = &self.complex_data_id {
            linked.push(complex.as_str());
        }
        linked
    }

    fn compile(&self, reaction_id: &str, model: &Model) -> Result<CompiledReaction, MeModelError> {
        let data = model.referenced::<StoichiometricData>(&self.stoichiometric_data_id, reaction_id)?;
        let (lower_bound, upper_bound) = if self.reverse {
            (non_negative(-data.upper_bound()), non_negative(-data.lower_bound()))
        } else {
            (non_negative(data.lower_bound()), non_negative(data.upper_bound()))
        };
        let mut compiled = CompiledReaction::new(lower_bound, upper_bound);

        let sign = if self.reverse { -1. } else { 1. };
        for (metabolite, coefficient) in data.stoichiometry() {
            compiled.add(metabolite, coefficient * sign);
        }
        if let Some(complex_data_id) = &self.complex_data_id {
            let complex = model.referenced::<ComplexData>(complex_data_id, reaction_id)?;
            compiled.add(complex.complex_id(complex_data_id), -Expression::dilution(self.keff)?);
        }
        for (subreaction_id, count) in &data.subreactions {
            compiled.add_subreaction(model, subreaction_id, *count as f64, &self.stoichiometric_data_id)?;
        }
        compiled.finish(model, reaction_id)
    }
}

impl Compile for TranscriptionReaction {
    fn linked_data(&self) -> Vec<&str> {
        vec![self.transcription_data_id.as_str()]
    }

    fn compile(&self, reaction_id: &str, model: &Model) -> Result<CompiledReaction, MeModelError> {
        let data_id = &self.transcription_data_id;
        let data = model.referenced::<TranscriptionData>(data_id, reaction_id)?;
        let info = &model.global_info;
        let mut compiled = CompiledReaction::new(0., info.max_flux);

        let counts = sequence::nucleotide_counts(&data.nucleotide_sequence)?;
        let length = data.nucleotide_sequence.len();
        if let Some(rnap) = &data.rna_polymerase {
            compiled.add(rnap, info.rna_polymerase_coupling(length)?);
        }
        for (subreaction_id, count) in &data.subreactions {
            compiled.add_subreaction(model, subreaction_id, *count as f64, data_id)?;
        }
        for (nucleotide, count) in &counts {
            compiled.add(nucleotide.triphosphate_id(), -(*count as f64));
        }

        let mut products: Vec<(&str, &TranscribedGene)> = Vec::with_capacity(data.rna_products.len());
        for rna_id in &data.rna_products {
            products.push((rna_id.as_str(), model.referenced_transcribed_gene(rna_id, data_id)?));
        }
        for (rna_id, gene) in &products {
            compiled.add(rna_id, 1.);
            let mass = rna_mass(&sequence::nucleotide_counts(&gene.nucleotide_sequence)?);
            compiled.add(&info.rna_biomass_id(gene.rna_type), mass);
        }

        let excised = sequence::excised_bases(
            products
                .iter()
                .map(|(_, gene)| (gene.rna_type, gene.nucleotide_sequence.as_str())),
        )?;
        let total_excised: u32 = excised.values().sum();
        for (nucleotide, count) in &excised {
            compiled.add(nucleotide.monophosphate_id(), *count as f64);
        }
        if total_excised > 0 {
            compiled.add(&info.water_id, -(total_excised as f64));
            compiled.add(&info.proton_id, total_excised as f64);
        }
        compiled.finish(model, reaction_id)
    }
}

impl Compile for TranslationReaction {
    fn linked_data(&self) -> Vec<&str> {
        vec![self.translation_data_id.as_str()]
    }

    fn compile(&self, reaction_id: &str, model: &Model) -> Result<CompiledReaction, MeModelError> {
        let data_id = &self.translation_data_id;
        let data = model.referenced::<TranslationData>(data_id, reaction_id)?;
        let info = &model.global_info;
        let mut compiled = CompiledReaction::new(0., info.max_flux);

        let composition = sequence::amino_acid_composition(&data.nucleotide_sequence)?;
        let length: u32 = composition.values().sum();
        if let Some(first) = data.nucleotide_sequence.get(..3).and_then(Codon::parse) {
            if !info.met_start_codons.contains(&first.to_string()) {
                log::warn!("{} starts with '{}' which is not a start codon", data.mrna, first);
            }
        }

        compiled.add(&info.ribosome_id, info.ribosome_coupling(length as usize)?);
        if !(data.protein_per_mrna > 0. && data.protein_per_mrna.is_finite()) {
            return Err(MeModelError::InvalidParameter(format!(
                "protein_per_mrna of {} must be positive, got {}",
                data_id, data.protein_per_mrna
            )));
        }
        compiled.add(&data.mrna, -1. / data.protein_per_mrna);
        compiled.add(&data.protein, 1.);
        for (amino_acid, count) in &composition {
            let amino_acid = amino_acid.metabolite_id();
            compiled.add(&amino_acid, -(*count as f64));
            // charged tRNAs are only used once the model has a generic tRNA for the residue
            let generic_trna = generic_trna_id(&amino_acid);
            if model.has_metabolite(&generic_trna) {
                compiled.add(&generic_trna, -(*count as f64));
            }
        }

        for (subreaction_id, count) in translation_subreactions(model, data_id, data)? {
            compiled.add_subreaction(model, &subreaction_id, count as f64, data_id)?;
        }
        compiled.add(&info.protein_biomass_id, protein_mass(&composition));
        compiled.finish(model, reaction_id)
    }
}

/// All subreactions used by a translation: start, elongation, termination and any
/// extra subreactions of the record
pub(crate) fn translation_subreactions(
    model: &Model,
    data_id: &str,
    data: &TranslationData,
) -> Result<IndexMap<String, u32>, MeModelError> {
    let info = &model.global_info;
    let sequence = &data.nucleotide_sequence;
    let termination = sequence::termination_subreactions(
        sequence,
        &info.translation_terminators,
        data.term_enzyme.as_deref(),
    )?;
    if termination.is_empty() && !sequence.is_empty() {
        log::warn!("{} does not end in a known stop codon", data_id);
    }
    let mut subreactions = sequence::start_subreactions(sequence, &info.translation_start_subreactions)?;
    let parts = [
        sequence::elongation_subreactions(sequence, &info.translation_elongation_subreactions)?,
        termination,
        data.subreactions.clone(),
    ];
    for part in parts {
        for (id, count) in part {
            *subreactions.entry(id).or_insert(0) += count;
        }
    }
    Ok(subreactions)
}

impl Compile for ComplexFormation {
    fn linked_data(&self) -> Vec<&str> {
        vec![self.complex_data_id.as_str()]
    }

    fn compile(&self, reaction_id: &str, model: &Model) -> Result<CompiledReaction, MeModelError> {
        let data_id = &self.complex_data_id;
        let data = model.referenced::<ComplexData>(data_id, reaction_id)?;
        let info = &model.global_info;
        let mut compiled = CompiledReaction::new(0., info.max_flux);

        for (subunit, coefficient) in &data.stoichiometry {
            compiled.add(subunit, -coefficient);
        }
        compiled.add(data.complex_id(data_id), 1.);

        let mut prosthetic_group_mass = 0.;
        for (modification_id, count) in &data.modifications {
            check_count(modification_id, *count)?;
            let modification = model.referenced::<ModificationData>(modification_id, data_id)?;
            for (metabolite, coefficient) in &modification.stoichiometry {
                compiled.add(metabolite, coefficient * count);
            }
            if let (Some(enzyme), Some(keff)) = (&modification.enzyme, modification.keff) {
                compiled.add(enzyme, -Expression::dilution(keff)?.scale(*count));
            }
            if let Some(mass) = modification.prosthetic_group_mass {
                prosthetic_group_mass += mass * count;
            }
        }
        if prosthetic_group_mass != 0. {
            compiled.add(&info.prosthetic_group_biomass_id, prosthetic_group_mass);
        }
        compiled.finish(model, reaction_id)
    }
}

impl Compile for RnaDemand {
    fn linked_data(&self) -> Vec<&str> {
        vec![self.transcription_data_id.as_str()]
    }

    fn compile(&self, reaction_id: &str, model: &Model) -> Result<CompiledReaction, MeModelError> {
        let data = model.referenced::<TranscriptionData>(&self.transcription_data_id, reaction_id)?;
        if !data.rna_products.contains(&self.rna_id) {
            return Err(MeModelError::DanglingReference {
                id: self.rna_id.clone(),
                referenced_by: reaction_id.to_string(),
            });
        }
        let mut compiled = CompiledReaction::new(0., model.global_info.max_flux);
        compiled.add(&self.rna_id, -1.);
        compiled.finish(model, reaction_id)
    }
}

impl Compile for TRnaCharging {
    fn linked_data(&self) -> Vec<&str> {
        vec![self.trna_data_id.as_str()]
    }

    /// One generic tRNA is made per charging. The tRNA and amino acid are diluted at
    /// μ/(trna_keff·3600), each synthetase subunit at μ/(synthetase_keff·3600) times
    /// (1 + that tRNA amount).
    fn compile(&self, reaction_id: &str, model: &Model) -> Result<CompiledReaction, MeModelError> {
        let data_id = &self.trna_data_id;
        let data = model.referenced::<TRnaData>(data_id, reaction_id)?;
        let mut compiled = CompiledReaction::new(0., model.global_info.max_flux);

        compiled.add(&data.generic_trna_id(), 1.);
        let trna_amount = Expression::dilution(data.trna_keff)?;
        compiled.add(&data.rna, -trna_amount.clone());
        compiled.add(&data.amino_acid, -trna_amount.clone());
        if let Some(synthetase) = &data.synthetase {
            let complex = model.referenced::<ComplexData>(synthetase, data_id)?;
            let synthetase_amount = Expression::dilution(data.synthetase_keff)? * (trna_amount + 1.);
            for (subunit, coefficient) in &complex.stoichiometry {
                compiled.add(subunit, -synthetase_amount.clone().scale(*coefficient));
            }
        }
        compiled.finish(model, reaction_id)
    }
}

impl Compile for GenericFormation {
    fn linked_data(&self) -> Vec<&str> {
        vec![self.generic_data_id.as_str()]
    }

    fn compile(&self, reaction_id: &str, model: &Model) -> Result<CompiledReaction, MeModelError> {
        let data_id = &self.generic_data_id;
        let data = model.referenced::<GenericData>(data_id, reaction_id)?;
        let mut compiled = CompiledReaction::new(0., model.global_info.max_flux);

        match (&data.components, &self.component) {
            (GenericComponents::Alternatives(components), Some(component)) => {
                if !components.contains(component) {
                    return Err(MeModelError::DanglingReference {
                        id: component.clone(),
                        referenced_by: reaction_id.to_string(),
                    });
                }
                compiled.add(component, -1.);
            }
            (GenericComponents::Lumped(components), None) => {
                for (component, count) in components {
                    compiled.add(component, -count);
                }
            }
            _ => {
                return Err(MeModelError::InvalidParameter(format!(
                    "{} doesn't match the components of {}",
                    reaction_id, data_id
                )))
            }
        }
        compiled.add(data_id, 1.);
        compiled.finish(model, reaction_id)
    }
}
