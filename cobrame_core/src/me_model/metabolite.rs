//! This module provides the metabolite struct and its ME-model variants
use std::fmt::{Display, Formatter};
use std::hash::Hash;
use std::str::FromStr;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::me_model::MeModelError;

/// Represents a metabolite, or any other species which appears in a reaction
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[builder(build_fn(error = "MeModelError"))]
pub struct Metabolite {
    /// Used to identify the metabolite (must be unique, fixed once created)
    #[builder(setter(into))]
    id: String,
    /// Human Readable name of the metabolite
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Which compartment the metabolite is in
    #[builder(default = "None")]
    pub compartment: Option<String>,
    /// Chemical Formula of the metabolite
    #[builder(default = "None")]
    pub formula: Option<String>,
    /// What kind of species this is, see [`MetaboliteKind`]
    #[builder(default = "MetaboliteKind::Generic")]
    pub kind: MetaboliteKind,
}

impl Hash for Metabolite {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state); // Hash by id
        if let Some(ref compartment) = self.compartment {
            compartment.hash(state)
        };
    }
}

impl Metabolite {
    /// Create a small molecule metabolite with only an id
    pub fn new_generic(id: &str) -> Metabolite {
        Metabolite {
            id: id.to_string(),
            name: None,
            compartment: None,
            formula: None,
            kind: MetaboliteKind::Generic,
        }
    }

    /// Create an RNA transcribed from a gene
    pub fn new_transcribed_gene(id: &str, rna_type: RnaType, nucleotide_sequence: &str) -> Metabolite {
        Metabolite {
            kind: MetaboliteKind::TranscribedGene(TranscribedGene {
                left_pos: None,
                right_pos: None,
                strand: None,
                rna_type,
                nucleotide_sequence: nucleotide_sequence.to_string(),
            }),
            ..Metabolite::new_generic(id)
        }
    }

    /// Create a protein translated from a gene
    pub fn new_translated_gene(id: &str) -> Metabolite {
        Metabolite {
            kind: MetaboliteKind::TranslatedGene,
            ..Metabolite::new_generic(id)
        }
    }

    /// Create a generic component, which stands for any of several interchangeable species
    pub fn new_generic_component(id: &str) -> Metabolite {
        Metabolite {
            kind: MetaboliteKind::GenericComponent,
            ..Metabolite::new_generic(id)
        }
    }

    /// Create a macromolecular complex
    pub fn new_complex(id: &str) -> Metabolite {
        Metabolite {
            kind: MetaboliteKind::Complex,
            ..Metabolite::new_generic(id)
        }
    }

    /// Id of the metabolite
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The transcribed gene data, if this metabolite is an RNA
    pub fn transcribed_gene(&self) -> Option<&TranscribedGene> {
        match &self.kind {
            MetaboliteKind::TranscribedGene(gene) => Some(gene),
            _ => None,
        }
    }

    /// Mutable access to the transcribed gene data, if this metabolite is an RNA
    pub fn transcribed_gene_mut(&mut self) -> Option<&mut TranscribedGene> {
        match &mut self.kind {
            MetaboliteKind::TranscribedGene(gene) => Some(gene),
            _ => None,
        }
    }

    /// Non-empty attributes of the metabolite, as (name, value) pairs
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attributes = vec![("id", self.id.clone()), ("kind", self.kind.to_string())];
        if let Some(name) = &self.name {
            attributes.push(("name", name.clone()));
        }
        if let Some(compartment) = &self.compartment {
            attributes.push(("compartment", compartment.clone()));
        }
        if let Some(formula) = &self.formula {
            attributes.push(("formula", formula.clone()));
        }
        if let MetaboliteKind::TranscribedGene(gene) = &self.kind {
            attributes.push(("RNA_type", gene.rna_type.to_string()));
            if let Some(left) = gene.left_pos {
                attributes.push(("left_pos", left.to_string()));
            }
            if let Some(right) = gene.right_pos {
                attributes.push(("right_pos", right.to_string()));
            }
            if let Some(strand) = gene.strand {
                attributes.push(("strand", strand.to_string()));
            }
            if !gene.nucleotide_sequence.is_empty() {
                attributes.push(("nucleotide_sequence", gene.nucleotide_sequence.clone()));
            }
        }
        attributes
    }
}

/// The kinds of species found in an ME-model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetaboliteKind {
    /// A small molecule
    Generic,
    /// An RNA transcribed from a gene
    TranscribedGene(TranscribedGene),
    /// A protein translated from a gene
    TranslatedGene,
    /// A macromolecular complex
    Complex,
    /// Any of several interchangeable species, such as the tRNAs of one amino acid
    GenericComponent,
}

impl Display for MetaboliteKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MetaboliteKind::Generic => write!(f, "Metabolite"),
            MetaboliteKind::TranscribedGene(_) => write!(f, "TranscribedGene"),
            MetaboliteKind::TranslatedGene => write!(f, "TranslatedGene"),
            MetaboliteKind::Complex => write!(f, "Complex"),
            MetaboliteKind::GenericComponent => write!(f, "GenericComponent"),
        }
    }
}

/// Genome location, type and sequence of a transcribed gene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscribedGene {
    /// Left most position on the genome
    pub left_pos: Option<u64>,
    /// Right most position on the genome
    pub right_pos: Option<u64>,
    /// Strand the gene is found on
    pub strand: Option<Strand>,
    /// Which kind of RNA this is
    pub rna_type: RnaType,
    /// Sequence of the gene
    pub nucleotide_sequence: String,
}

/// Genome strand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Forward,
    #[serde(rename = "-")]
    Reverse,
}

impl Display for Strand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
        }
    }
}

/// The type of an RNA, everything other than mRNA is a stable RNA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RnaType {
    #[serde(rename = "mRNA")]
    MRna,
    #[serde(rename = "tRNA")]
    TRna,
    #[serde(rename = "rRNA")]
    RRna,
    #[serde(rename = "ncRNA")]
    NcRna,
}

impl RnaType {
    /// tRNA, rRNA and ncRNA are stable, mRNA isn't
    pub fn is_stable(&self) -> bool {
        !matches!(self, RnaType::MRna)
    }
}

impl Display for RnaType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RnaType::MRna => write!(f, "mRNA"),
            RnaType::TRna => write!(f, "tRNA"),
            RnaType::RRna => write!(f, "rRNA"),
            RnaType::NcRna => write!(f, "ncRNA"),
        }
    }
}

impl FromStr for RnaType {
    type Err = MeModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mRNA" => Ok(RnaType::MRna),
            "tRNA" => Ok(RnaType::TRna),
            "rRNA" => Ok(RnaType::RRna),
            "ncRNA" => Ok(RnaType::NcRna),
            other => Err(MeModelError::InvalidParameter(format!(
                "unknown RNA type {}",
                other
            ))),
        }
    }
}
