//! Organism specific constants shared by every reaction of a model
use std::fs;
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::configuration::read_configuration;
use crate::me_model::metabolite::RnaType;
use crate::me_model::MeModelError;
use crate::symbolic::{validate_keff, Expression, SECONDS_PER_HOUR};

/// Constants used when compiling expression reactions
///
/// Defaults are those of *E. coli* K-12 MG1655.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalInfo {
    /// Id of the ribosome complex
    pub ribosome_id: String,
    /// Maximal ribosome elongation rate (amino acids per second)
    pub elongation_kcat: f64,
    /// Growth rate (per hour) at which the ribosome runs at half its maximal rate
    pub elongation_half_saturation: f64,
    /// RNA polymerase elongation rate relative to the ribosome (nucleotides per amino acid)
    pub rnap_rate_multiplier: f64,
    /// Codons which can initiate translation with a formylated methionine
    pub met_start_codons: IndexSet<String>,
    /// Subreactions used once to initiate every translation
    pub translation_start_subreactions: Vec<String>,
    /// Subreactions used once per elongated residue
    pub translation_elongation_subreactions: Vec<String>,
    /// Map of stop codon (RNA alphabet) to the release factor which terminates at it
    pub translation_terminators: IndexMap<String, String>,
    /// Biomass constraint credited with the mass of translated proteins
    pub protein_biomass_id: String,
    /// Biomass constraint credited with the mass of prosthetic groups added to complexes
    pub prosthetic_group_biomass_id: String,
    /// Water, consumed when excised bases are hydrolysed
    pub water_id: String,
    /// Proton, released when excised bases are hydrolysed
    pub proton_id: String,
    /// Upper flux bound of expression reactions
    pub max_flux: f64,
}

impl Default for GlobalInfo {
    fn default() -> Self {
        let strings = |ids: &[&str]| ids.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        GlobalInfo {
            ribosome_id: "ribosome".to_string(),
            elongation_kcat: 22.7,
            elongation_half_saturation: 0.391,
            rnap_rate_multiplier: 3.,
            met_start_codons: strings(&["AUG", "GUG", "UUG", "AUU", "CUG"])
                .into_iter()
                .collect(),
            translation_start_subreactions: strings(&[
                "Translation_initiation_factor_InfA",
                "Translation_initiation_factor_InfC",
                "Translation_gtp_initiation_factor_InfB",
                "fmet_addition_at_START",
            ]),
            translation_elongation_subreactions: strings(&[
                "FusA_mono_elongation",
                "Tuf_gtp_regeneration",
            ]),
            translation_terminators: [
                ("UAA", "generic_RF"),
                ("UAG", "PrfA_mono"),
                ("UGA", "PrfB_mono"),
            ]
            .iter()
            .map(|(codon, factor)| (codon.to_string(), factor.to_string()))
            .collect(),
            protein_biomass_id: "protein_biomass".to_string(),
            prosthetic_group_biomass_id: "prosthetic_group_biomass".to_string(),
            water_id: "h2o_c".to_string(),
            proton_id: "h_c".to_string(),
            max_flux: read_configuration(|c| c.upper_bound),
        }
    }
}

impl GlobalInfo {
    /// Read global info from a JSON file, missing fields take their default values
    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<GlobalInfo, MeModelError> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| {
            MeModelError::InvalidParameter(format!("unable to read {:?}: {}", path.as_ref(), e))
        })?;
        let info = serde_json::from_str(&contents)
            .map_err(|e| MeModelError::InvalidParameter(format!("unable to parse global info: {}", e)))?;
        log::info!("Loaded global info from {:?}", path.as_ref());
        Ok(info)
    }

    /// Biomass constraint credited with the mass of an RNA of the given type
    pub fn rna_biomass_id(&self, rna_type: RnaType) -> String {
        format!("{}_biomass", rna_type)
    }

    /// Ribosome coupling for a protein of `length` residues
    ///
    /// With the growth dependent ribosome rate k_ribo = kcat·μ / (μ + r0) the
    /// ribosome is diluted by length·μ / (k_ribo·3600) = length·(μ + r0) / (kcat·3600),
    /// the coefficient is the negative of that.
    pub fn ribosome_coupling(&self, length: usize) -> Result<Expression, MeModelError> {
        self.elongation_coupling(length, self.elongation_kcat)
    }

    /// RNA polymerase coupling for a transcription unit of `length` nucleotides
    pub fn rna_polymerase_coupling(&self, length: usize) -> Result<Expression, MeModelError> {
        self.elongation_coupling(length, self.elongation_kcat * self.rnap_rate_multiplier)
    }

    fn elongation_coupling(&self, length: usize, kcat: f64) -> Result<Expression, MeModelError> {
        validate_keff(kcat)?;
        Ok((Expression::mu() + self.elongation_half_saturation)
            .div_const(kcat * SECONDS_PER_HOUR)?
            .scale(-(length as f64)))
    }
}
