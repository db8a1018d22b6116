//! Biological parameter records from which ME-model reactions are compiled
//!
//! A [`ProcessData`] record is shared by every reaction built from it. The record
//! keeps the ids of those reactions (its parent reactions) so that edits can be
//! propagated, see [`crate::me_model::dependency`].
use derive_builder::Builder;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::configuration::read_configuration;
use crate::me_model::MeModelError;
use crate::sequence::dogma::{parse_nucleotides, Codon};
use crate::symbolic::validate_keff;

/// A biological parameter record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessData {
    /// Used to identify the record (must be unique)
    id: String,
    /// Ids of the reactions built directly from this record, rebuilt when the
    /// reactions are added to a model
    #[serde(skip)]
    parent_reactions: IndexSet<String>,
    /// Variant specific attributes
    pub kind: ProcessDataKind,
}

impl ProcessData {
    /// Create a new record
    ///
    /// # Examples
    /// ```rust
    /// use cobrame_core::me_model::process_data::{ProcessData, StoichiometricData};
    /// let mut stoichiometry = StoichiometricData::new(0., 1000.).unwrap();
    /// stoichiometry.set_coefficient("A", -1.);
    /// stoichiometry.set_coefficient("B", 1.);
    /// let data = ProcessData::new("A_to_B", stoichiometry);
    /// assert_eq!(data.id(), "A_to_B");
    /// ```
    pub fn new(id: &str, kind: impl Into<ProcessDataKind>) -> ProcessData {
        ProcessData {
            id: id.to_string(),
            parent_reactions: IndexSet::new(),
            kind: kind.into(),
        }
    }

    /// Id of the record
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Ids of the reactions built directly from this record
    ///
    /// The set is unordered as far as callers are concerned. See
    /// [`crate::me_model::model::Model::parent_reactions`] for the full set of
    /// reactions affected by an edit to this record.
    pub fn direct_parent_reactions(&self) -> &IndexSet<String> {
        &self.parent_reactions
    }

    pub(crate) fn link(&mut self, reaction_id: &str) {
        self.parent_reactions.insert(reaction_id.to_string());
    }

    pub(crate) fn unlink(&mut self, reaction_id: &str) {
        self.parent_reactions.shift_remove(reaction_id);
    }

    pub(crate) fn clear_links(&mut self) {
        self.parent_reactions.clear();
    }

    /// Check parameters which must hold for the record to be compiled
    pub fn validate(&self) -> Result<(), MeModelError> {
        match &self.kind {
            ProcessDataKind::Stoichiometric(data) => check_bounds(data.lower_bound, data.upper_bound),
            ProcessDataKind::Complex(data) => {
                for (modification, count) in &data.modifications {
                    check_count(modification, *count)?;
                }
                Ok(())
            }
            ProcessDataKind::Modification(data) => {
                check_enzyme_keff(&self.id, data.enzyme.as_deref(), data.keff)
            }
            ProcessDataKind::Subreaction(data) => {
                check_enzyme_keff(&self.id, data.enzyme.as_deref(), data.keff)
            }
            ProcessDataKind::Transcription(data) => {
                parse_nucleotides(&data.nucleotide_sequence).map(|_| ())
            }
            ProcessDataKind::Translation(data) => {
                crate::sequence::codons(&data.nucleotide_sequence)?;
                if data.protein_per_mrna > 0. && data.protein_per_mrna.is_finite() {
                    Ok(())
                } else {
                    Err(MeModelError::InvalidParameter(format!(
                        "protein_per_mrna of {} must be positive, got {}",
                        self.id, data.protein_per_mrna
                    )))
                }
            }
            ProcessDataKind::TRna(data) => {
                if Codon::parse(&data.codon).is_none() {
                    return Err(MeModelError::InvalidSequence(format!(
                        "{} is not a codon",
                        data.codon
                    )));
                }
                validate_keff(data.trna_keff)?;
                validate_keff(data.synthetase_keff)
            }
            ProcessDataKind::Generic(data) => {
                if !self.id.starts_with(GENERIC_PREFIX) {
                    log::warn!("Generic {} should have an id starting with {}", self.id, GENERIC_PREFIX);
                }
                if let GenericComponents::Lumped(components) = &data.components {
                    for (component, count) in components {
                        check_count(component, *count)?;
                    }
                }
                Ok(())
            }
        }
    }

    /// Non-empty attributes of the record, as (name, value) pairs
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attributes = vec![("id", self.id.clone()), ("kind", self.kind.name().to_string())];
        if !self.parent_reactions.is_empty() {
            attributes.push(("parent_reactions", format!("{:?}", self.parent_reactions)));
        }
        attributes.extend(self.kind.attributes());
        attributes
    }
}

fn check_bounds(lower: f64, upper: f64) -> Result<(), MeModelError> {
    if lower <= upper {
        Ok(())
    } else {
        Err(MeModelError::InvalidParameter(format!(
            "lower bound {} is greater than upper bound {}",
            lower, upper
        )))
    }
}

pub(crate) fn check_count(id: &str, count: f64) -> Result<(), MeModelError> {
    if count >= 0. && count.is_finite() {
        Ok(())
    } else {
        Err(MeModelError::InvalidParameter(format!(
            "count of {} must be non-negative, got {}",
            id, count
        )))
    }
}

fn check_enzyme_keff(id: &str, enzyme: Option<&str>, keff: Option<f64>) -> Result<(), MeModelError> {
    match (enzyme, keff) {
        (Some(_), None) => Err(MeModelError::InvalidParameter(format!(
            "{} has an enzyme but no keff",
            id
        ))),
        (_, Some(keff)) => validate_keff(keff),
        (None, None) => Ok(()),
    }
}

/// The variants of [`ProcessData`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProcessDataKind {
    Stoichiometric(StoichiometricData),
    Complex(ComplexData),
    Modification(ModificationData),
    Transcription(TranscriptionData),
    Translation(TranslationData),
    Subreaction(SubreactionData),
    TRna(TRnaData),
    Generic(GenericData),
}

impl ProcessDataKind {
    /// Name of the variant
    pub fn name(&self) -> &'static str {
        match self {
            ProcessDataKind::Stoichiometric(_) => StoichiometricData::KIND,
            ProcessDataKind::Complex(_) => ComplexData::KIND,
            ProcessDataKind::Modification(_) => ModificationData::KIND,
            ProcessDataKind::Transcription(_) => TranscriptionData::KIND,
            ProcessDataKind::Translation(_) => TranslationData::KIND,
            ProcessDataKind::Subreaction(_) => SubreactionData::KIND,
            ProcessDataKind::TRna(_) => TRnaData::KIND,
            ProcessDataKind::Generic(_) => GenericData::KIND,
        }
    }

    /// Variant specific, non-empty attributes
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attributes = Vec::new();
        let mut push_map = |name: &'static str, map: String, empty: bool| {
            if !empty {
                attributes.push((name, map));
            }
        };
        match self {
            ProcessDataKind::Stoichiometric(data) => {
                push_map("stoichiometry", format!("{:?}", data.stoichiometry), data.stoichiometry.is_empty());
                push_map("lower_bound", data.lower_bound.to_string(), false);
                push_map("upper_bound", data.upper_bound.to_string(), false);
                push_map("subreactions", format!("{:?}", data.subreactions), data.subreactions.is_empty());
            }
            ProcessDataKind::Complex(data) => {
                push_map("stoichiometry", format!("{:?}", data.stoichiometry), data.stoichiometry.is_empty());
                push_map("modifications", format!("{:?}", data.modifications), data.modifications.is_empty());
                if let Some(complex_id) = &data.complex_id {
                    push_map("complex_id", complex_id.clone(), false);
                }
            }
            ProcessDataKind::Modification(data) => {
                push_map("stoichiometry", format!("{:?}", data.stoichiometry), data.stoichiometry.is_empty());
                if let Some(enzyme) = &data.enzyme {
                    push_map("enzyme", enzyme.clone(), false);
                }
                if let Some(keff) = data.keff {
                    push_map("keff", keff.to_string(), false);
                }
                if let Some(mass) = data.prosthetic_group_mass {
                    push_map("prosthetic_group_mass", mass.to_string(), false);
                }
            }
            ProcessDataKind::Subreaction(data) => {
                push_map("stoichiometry", format!("{:?}", data.stoichiometry), data.stoichiometry.is_empty());
                if let Some(enzyme) = &data.enzyme {
                    push_map("enzyme", enzyme.clone(), false);
                }
                if let Some(keff) = data.keff {
                    push_map("keff", keff.to_string(), false);
                }
            }
            ProcessDataKind::Transcription(data) => {
                push_map("nucleotide_sequence", data.nucleotide_sequence.clone(), data.nucleotide_sequence.is_empty());
                push_map("RNA_products", format!("{:?}", data.rna_products), data.rna_products.is_empty());
                if let Some(rnap) = &data.rna_polymerase {
                    push_map("RNA_polymerase", rnap.clone(), false);
                }
                push_map("rho_dependent", data.rho_dependent.to_string(), !data.rho_dependent);
                push_map("subreactions", format!("{:?}", data.subreactions), data.subreactions.is_empty());
            }
            ProcessDataKind::Translation(data) => {
                push_map("nucleotide_sequence", data.nucleotide_sequence.clone(), data.nucleotide_sequence.is_empty());
                push_map("mRNA", data.mrna.clone(), false);
                push_map("protein", data.protein.clone(), false);
                if let Some(term_enzyme) = &data.term_enzyme {
                    push_map("term_enzyme", term_enzyme.clone(), false);
                }
                push_map("protein_per_mRNA", data.protein_per_mrna.to_string(), false);
                push_map("subreactions", format!("{:?}", data.subreactions), data.subreactions.is_empty());
            }
            ProcessDataKind::TRna(data) => {
                push_map("amino_acid", data.amino_acid.clone(), false);
                push_map("RNA", data.rna.clone(), false);
                push_map("codon", data.codon.clone(), false);
                if let Some(synthetase) = &data.synthetase {
                    push_map("synthetase", synthetase.clone(), false);
                }
                push_map("synthetase_keff", data.synthetase_keff.to_string(), false);
                push_map("tRNA_keff", data.trna_keff.to_string(), false);
            }
            ProcessDataKind::Generic(data) => match &data.components {
                GenericComponents::Alternatives(components) => {
                    push_map("component_list", format!("{:?}", components), components.is_empty());
                }
                GenericComponents::Lumped(components) => {
                    push_map("component_list", format!("{:?}", components), components.is_empty());
                }
            },
        }
        attributes
    }
}

/// Typed access to one variant of [`ProcessDataKind`]
pub trait ProcessDataVariant: Sized {
    /// Name of the variant, used in error messages
    const KIND: &'static str;

    fn from_kind(kind: &ProcessDataKind) -> Option<&Self>;

    fn from_kind_mut(kind: &mut ProcessDataKind) -> Option<&mut Self>;
}

macro_rules! process_data_variant {
    ($variant:ident, $data:ty, $name:literal) => {
        impl ProcessDataVariant for $data {
            const KIND: &'static str = $name;

            fn from_kind(kind: &ProcessDataKind) -> Option<&Self> {
                match kind {
                    ProcessDataKind::$variant(data) => Some(data),
                    _ => None,
                }
            }

            fn from_kind_mut(kind: &mut ProcessDataKind) -> Option<&mut Self> {
                match kind {
                    ProcessDataKind::$variant(data) => Some(data),
                    _ => None,
                }
            }
        }

        impl From<$data> for ProcessDataKind {
            fn from(data: $data) -> Self {
                ProcessDataKind::$variant(data)
            }
        }
    };
}

process_data_variant!(Stoichiometric, StoichiometricData, "StoichiometricData");
process_data_variant!(Complex, ComplexData, "ComplexData");
process_data_variant!(Modification, ModificationData, "ModificationData");
process_data_variant!(Transcription, TranscriptionData, "TranscriptionData");
process_data_variant!(Translation, TranslationData, "TranslationData");
process_data_variant!(Subreaction, SubreactionData, "SubreactionData");
process_data_variant!(TRna, TRnaData, "tRNAData");
process_data_variant!(Generic, GenericData, "GenericData");

/// Stoichiometry and flux bounds of a metabolic reaction
///
/// A coefficient of exactly zero is never stored, absence means the metabolite
/// doesn't participate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoichiometricData {
    /// Map of metabolite id to stoichiometric coefficient
    stoichiometry: IndexMap<String, f64>,
    /// Lower flux bound
    lower_bound: f64,
    /// Upper flux bound
    upper_bound: f64,
    /// Map of subreaction data id to count, rarely used (for example when a second
    /// enzyme has to be diluted by the reaction)
    #[serde(default)]
    pub subreactions: IndexMap<String, u32>,
}

impl StoichiometricData {
    /// Create empty stoichiometric data with the given bounds
    pub fn new(lower_bound: f64, upper_bound: f64) -> Result<StoichiometricData, MeModelError> {
        check_bounds(lower_bound, upper_bound)?;
        Ok(StoichiometricData {
            stoichiometry: IndexMap::new(),
            lower_bound,
            upper_bound,
            subreactions: IndexMap::new(),
        })
    }

    /// Create empty stoichiometric data with the default bounds from the configuration
    pub fn with_default_bounds() -> StoichiometricData {
        let (lower_bound, upper_bound) = read_configuration(|c| (c.lower_bound, c.upper_bound));
        StoichiometricData {
            stoichiometry: IndexMap::new(),
            lower_bound,
            upper_bound,
            subreactions: IndexMap::new(),
        }
    }

    /// Map of metabolite id to stoichiometric coefficient
    pub fn stoichiometry(&self) -> &IndexMap<String, f64> {
        &self.stoichiometry
    }

    /// Set the coefficient of a metabolite, a coefficient of 0 removes it
    pub fn set_coefficient(&mut self, metabolite: &str, coefficient: f64) {
        if coefficient == 0. {
            self.stoichiometry.shift_remove(metabolite);
        } else {
            self.stoichiometry.insert(metabolite.to_string(), coefficient);
        }
    }

    /// Remove every coefficient
    pub fn clear_stoichiometry(&mut self) {
        self.stoichiometry.clear();
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    /// Update both flux bounds
    ///
    /// # Errors
    /// `InvalidParameter` if `lower_bound > upper_bound`, the bounds are left unchanged
    pub fn set_bounds(&mut self, lower_bound: f64, upper_bound: f64) -> Result<(), MeModelError> {
        check_bounds(lower_bound, upper_bound)?;
        self.lower_bound = lower_bound;
        self.upper_bound = upper_bound;
        Ok(())
    }

    /// Can the reaction carry flux in the reverse direction
    pub fn is_reversible(&self) -> bool {
        self.lower_bound < 0.
    }
}

/// Composition of an enzyme complex
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[builder(build_fn(error = "MeModelError"))]
pub struct ComplexData {
    /// Map of protein subunit id to its count in the complex
    #[builder(default = "IndexMap::new()")]
    pub stoichiometry: IndexMap<String, f64>,
    /// Map of modification data id to the number of times it is applied
    #[builder(default = "IndexMap::new()")]
    pub modifications: IndexMap<String, f64>,
    /// Id of the complex metabolite formed, when it differs from the data id
    /// (several routes can form the same complex)
    #[builder(default = "None")]
    pub complex_id: Option<String>,
}

impl ComplexData {
    /// Id of the complex formed by the record with id `data_id`
    pub fn complex_id<'a>(&'a self, data_id: &'a str) -> &'a str {
        self.complex_id.as_deref().unwrap_or(data_id)
    }
}

/// A modification of a complex, such as a bound cofactor or prosthetic group
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[builder(build_fn(error = "MeModelError"))]
pub struct ModificationData {
    /// Net change in metabolites from a single application of the modification
    #[builder(default = "IndexMap::new()")]
    pub stoichiometry: IndexMap<String, f64>,
    /// Enzyme catalyzing the modification
    #[builder(default = "None", setter(into, strip_option))]
    pub enzyme: Option<String>,
    /// Effective turnover rate of the enzyme (per second)
    #[builder(default = "None", setter(strip_option))]
    pub keff: Option<f64>,
    /// Mass (kDa) added to the complex per application
    #[builder(default = "None", setter(strip_option))]
    pub prosthetic_group_mass: Option<f64>,
}

/// A step shared by many transcription or translation reactions
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[builder(build_fn(error = "MeModelError"))]
pub struct SubreactionData {
    /// Net change in metabolites from a single occurrence of the subreaction
    #[builder(default = "IndexMap::new()")]
    pub stoichiometry: IndexMap<String, f64>,
    /// Enzyme catalyzing the subreaction
    #[builder(default = "None", setter(into, strip_option))]
    pub enzyme: Option<String>,
    /// Effective turnover rate of the enzyme (per second)
    #[builder(default = "None", setter(strip_option))]
    pub keff: Option<f64>,
}

/// A transcription unit
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[builder(build_fn(error = "MeModelError"))]
pub struct TranscriptionData {
    /// Sequence of the full transcription unit
    #[builder(setter(into))]
    pub nucleotide_sequence: String,
    /// Ids of the RNAs (TranscribedGene metabolites) made from the unit
    #[builder(default = "IndexSet::new()")]
    pub rna_products: IndexSet<String>,
    /// RNA polymerase complex transcribing the unit
    #[builder(default = "None", setter(into, strip_option))]
    pub rna_polymerase: Option<String>,
    /// Is termination rho dependent
    #[builder(default = "false")]
    pub rho_dependent: bool,
    /// Map of subreaction data id to count
    #[builder(default = "IndexMap::new()")]
    pub subreactions: IndexMap<String, u32>,
}

/// Translation of an mRNA into a protein
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[builder(build_fn(error = "MeModelError"))]
pub struct TranslationData {
    /// Coding sequence, from the start codon through the stop codon
    #[builder(setter(into))]
    pub nucleotide_sequence: String,
    /// Id of the mRNA translated
    #[builder(setter(into))]
    pub mrna: String,
    /// Id of the protein made
    #[builder(setter(into))]
    pub protein: String,
    /// Release factor to use instead of the one given by the organism's stop codon table
    #[builder(default = "None", setter(into, strip_option))]
    pub term_enzyme: Option<String>,
    /// Number of proteins made from one mRNA
    #[builder(default = "read_configuration(|c| c.protein_per_mrna)")]
    pub protein_per_mrna: f64,
    /// Extra subreactions, added on top of the ones derived from the sequence
    #[builder(default = "IndexMap::new()")]
    pub subreactions: IndexMap<String, u32>,
}

/// Prefix of generic component ids
pub const GENERIC_PREFIX: &str = "generic_";

/// Id of the generic tRNA charged with the amino acid metabolite `amino_acid`
///
/// A generic tRNA stands for enough of any tRNA of that amino acid to add a single
/// residue to a growing peptide.
pub fn generic_trna_id(amino_acid: &str) -> String {
    format!("{}tRNA_{}", GENERIC_PREFIX, amino_acid)
}

/// Charging of a tRNA with its amino acid
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[builder(build_fn(error = "MeModelError"))]
pub struct TRnaData {
    /// Id of the amino acid metabolite
    #[builder(setter(into))]
    pub amino_acid: String,
    /// Id of the tRNA (TranscribedGene metabolite)
    #[builder(setter(into))]
    pub rna: String,
    /// Codon read by the tRNA
    #[builder(setter(into))]
    pub codon: String,
    /// ComplexData id of the synthetase charging the tRNA
    #[builder(default = "None", setter(into, strip_option))]
    pub synthetase: Option<String>,
    /// Effective turnover rate of the synthetase (per second)
    #[builder(default = "read_configuration(|c| c.default_keff)")]
    pub synthetase_keff: f64,
    /// Effective turnover rate of the tRNA, charged residues delivered per second
    #[builder(default = "read_configuration(|c| c.default_keff)")]
    pub trna_keff: f64,
}

impl TRnaData {
    /// Id of the generic tRNA produced by charging
    pub fn generic_trna_id(&self) -> String {
        generic_trna_id(&self.amino_acid)
    }
}

/// Components which can stand in for a generic component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GenericComponents {
    /// Any single component can be used, each is converted by its own reaction
    /// `<component>_to_<generic>`
    Alternatives(IndexSet<String>),
    /// The generic is formed from every component at once, with the given counts, by
    /// the reaction `formation_<generic>`
    Lumped(IndexMap<String, f64>),
}

/// A generic component, the record id is the id of the generic metabolite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericData {
    pub components: GenericComponents,
}

impl GenericData {
    pub fn alternatives<I: IntoIterator<Item = S>, S: Into<String>>(components: I) -> GenericData {
        GenericData {
            components: GenericComponents::Alternatives(components.into_iter().map(Into::into).collect()),
        }
    }

    pub fn lumped<I: IntoIterator<Item = (S, f64)>, S: Into<String>>(components: I) -> GenericData {
        GenericData {
            components: GenericComponents::Lumped(
                components
                    .into_iter()
                    .map(|(id, count)| (id.into(), count))
                    .collect(),
            ),
        }
    }
}
