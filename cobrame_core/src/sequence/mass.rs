//! Molecular weights of macromolecules, computed from residue composition
//!
//! All weights are returned in kDa, which is the unit of the biomass constraints.
use indexmap::IndexMap;

use crate::sequence::dogma::{AminoAcid, Nucleotide};

/// Average mass of water (g/mol), one is added back for the chain termini
const WATER_MASS: f64 = 18.01528;

/// Average residue mass (g/mol) of an amino acid within a peptide chain
pub fn amino_acid_residue_mass(amino_acid: AminoAcid) -> f64 {
    match amino_acid {
        AminoAcid::Ala => 71.0788,
        AminoAcid::Arg => 156.1875,
        AminoAcid::Asn => 114.1038,
        AminoAcid::Asp => 115.0886,
        AminoAcid::Cys => 103.1388,
        AminoAcid::Gln => 128.1307,
        AminoAcid::Glu => 129.1155,
        AminoAcid::Gly => 57.0519,
        AminoAcid::His => 137.1411,
        AminoAcid::Ile => 113.1594,
        AminoAcid::Leu => 113.1594,
        AminoAcid::Lys => 128.1741,
        AminoAcid::Met => 131.1926,
        AminoAcid::Phe => 147.1766,
        AminoAcid::Pro => 97.1167,
        AminoAcid::Ser => 87.0782,
        AminoAcid::Thr => 101.1051,
        AminoAcid::Trp => 186.2132,
        AminoAcid::Tyr => 163.1760,
        AminoAcid::Val => 99.1326,
        AminoAcid::Sec => 150.0388,
    }
}

/// Average residue mass (g/mol) of a nucleoside monophosphate within an RNA chain
pub fn nucleotide_residue_mass(nucleotide: Nucleotide) -> f64 {
    match nucleotide {
        Nucleotide::A => 329.2059,
        Nucleotide::C => 305.1812,
        Nucleotide::G => 345.2053,
        Nucleotide::U => 306.1660,
    }
}

/// Mass of a protein in kDa from its amino acid counts
pub fn protein_mass(composition: &IndexMap<AminoAcid, u32>) -> f64 {
    if composition.is_empty() {
        return 0.;
    }
    let residues: f64 = composition
        .iter()
        .map(|(aa, count)| amino_acid_residue_mass(*aa) * *count as f64)
        .sum();
    (residues + WATER_MASS) / 1000.
}

/// Mass of an RNA in kDa from its nucleotide counts
pub fn rna_mass(counts: &IndexMap<Nucleotide, u32>) -> f64 {
    if counts.values().all(|c| *c == 0) {
        return 0.;
    }
    let residues: f64 = counts
        .iter()
        .map(|(nt, count)| nucleotide_residue_mass(*nt) * *count as f64)
        .sum();
    (residues + WATER_MASS) / 1000.
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_chains_weigh_nothing() {
        assert_eq!(protein_mass(&IndexMap::new()), 0.);
        assert_eq!(rna_mass(&IndexMap::new()), 0.);
    }

    #[test]
    fn dipeptide_mass() {
        let mut composition = IndexMap::new();
        composition.insert(AminoAcid::Gly, 2);
        // glycylglycine is 132.12 g/mol
        assert!((protein_mass(&composition) - 0.13212).abs() < 1e-4);
    }

    #[test]
    fn rna_mass_scales_with_length() {
        let mut short = IndexMap::new();
        short.insert(Nucleotide::A, 10);
        let mut long = IndexMap::new();
        long.insert(Nucleotide::A, 20);
        assert!(rna_mass(&long) > rna_mass(&short));
    }
}
