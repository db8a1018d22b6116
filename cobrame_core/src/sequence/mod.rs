//! Quantities derived from nucleotide sequences
//!
//! Every function here is a pure function of its arguments, so the results can
//! be recomputed at any time after a sequence or product type is edited.
pub mod dogma;
pub mod mass;

use indexmap::IndexMap;

use crate::me_model::metabolite::RnaType;
use crate::me_model::MeModelError;
use crate::sequence::dogma::{parse_nucleotides, AminoAcid, Codon, Nucleotide};

/// Split a coding sequence into codons
///
/// # Errors
/// `InvalidSequence` if the length isn't a multiple of three, or if the sequence
/// contains a character outside of {A,C,G,U,T}
pub fn codons(sequence: &str) -> Result<Vec<Codon>, MeModelError> {
    let bases = parse_nucleotides(sequence)?;
    if bases.len() % 3 != 0 {
        return Err(MeModelError::InvalidSequence(format!(
            "length {} is not a multiple of 3",
            bases.len()
        )));
    }
    Ok(bases
        .chunks_exact(3)
        .map(|c| Codon([c[0], c[1], c[2]]))
        .collect())
}

/// The codons which are read into residues: everything except a trailing stop codon
fn residue_codons(codons: &[Codon]) -> &[Codon] {
    match codons.split_last() {
        Some((last, rest)) if last.is_stop() => rest,
        _ => codons,
    }
}

/// Residue added for a codon within the chain
///
/// Internal UGA is read as selenocysteine, the other internal stop codons are
/// read as lysine.
fn residue(codon: &Codon) -> AminoAcid {
    match codon.translate() {
        Some(aa) => aa,
        None if codon.0 == [Nucleotide::U, Nucleotide::G, Nucleotide::A] => AminoAcid::Sec,
        None => AminoAcid::Lys,
    }
}

/// Amino acid sequence of the protein, the first residue is always methionine
pub fn amino_acid_sequence(sequence: &str) -> Result<Vec<AminoAcid>, MeModelError> {
    let codons = codons(sequence)?;
    Ok(residue_codons(&codons)
        .iter()
        .enumerate()
        .map(|(i, codon)| if i == 0 { AminoAcid::Met } else { residue(codon) })
        .collect())
}

/// Count of each amino acid in the translated protein
///
/// The counts sum to the number of codons, less one if the sequence ends in a
/// stop codon.
///
/// # Examples
/// ```rust
/// use cobrame_core::sequence::amino_acid_composition;
/// use cobrame_core::sequence::dogma::AminoAcid;
/// let composition = amino_acid_composition("ATGAGCTTTTAA").unwrap();
/// assert_eq!(composition[&AminoAcid::Met], 1);
/// assert_eq!(composition[&AminoAcid::Ser], 1);
/// assert_eq!(composition[&AminoAcid::Phe], 1);
/// assert_eq!(composition.values().sum::<u32>(), 3);
/// ```
pub fn amino_acid_composition(sequence: &str) -> Result<IndexMap<AminoAcid, u32>, MeModelError> {
    let mut composition = IndexMap::new();
    for aa in amino_acid_sequence(sequence)? {
        *composition.entry(aa).or_insert(0) += 1;
    }
    Ok(composition)
}

/// Elongation subreaction counts for translating a sequence
///
/// Every codon after the start codon (and before a trailing stop codon) adds one
/// `<aa>_addition_at_<codon>` count. Each of the `per_residue` subreactions (elongation
/// factor and GTP regeneration) is counted once per elongated residue.
pub fn elongation_subreactions(
    sequence: &str,
    per_residue: &[String],
) -> Result<IndexMap<String, u32>, MeModelError> {
    let codons = codons(sequence)?;
    let read = residue_codons(&codons);
    let mut subreactions = IndexMap::new();
    if read.len() < 2 {
        return Ok(subreactions);
    }
    for codon in &read[1..] {
        let id = format!("{}_addition_at_{}", residue(codon).short_name(), codon);
        *subreactions.entry(id).or_insert(0) += 1;
    }
    let elongated = (read.len() - 1) as u32;
    for id in per_residue {
        *subreactions.entry(id.clone()).or_insert(0) += elongated;
    }
    Ok(subreactions)
}

/// Initiation subreaction counts, one of each regardless of the first codon
pub fn start_subreactions(
    sequence: &str,
    initiation: &[String],
) -> Result<IndexMap<String, u32>, MeModelError> {
    let codons = codons(sequence)?;
    if residue_codons(&codons).is_empty() {
        return Ok(IndexMap::new());
    }
    Ok(initiation.iter().map(|id| (id.clone(), 1)).collect())
}

/// The termination subreaction for the last codon, keyed `<codon>_<factor>_mediated_termination`
///
/// `terminators` maps stop codons (RNA alphabet) to release factor ids. A last
/// codon which isn't in the table gives an empty result rather than an error, as
/// happens with truncated genes.
///
/// # Examples
/// ```rust
/// use indexmap::IndexMap;
/// use cobrame_core::sequence::termination_subreactions;
/// let mut terminators = IndexMap::new();
/// terminators.insert("UAA".to_string(), "generic_RF".to_string());
/// let stop = termination_subreactions("ATGAGCTTTTAA", &terminators, None).unwrap();
/// assert_eq!(stop["UAA_generic_RF_mediated_termination"], 1);
/// assert!(termination_subreactions("ATGAGCTTTAAC", &terminators, None).unwrap().is_empty());
/// ```
pub fn termination_subreactions(
    sequence: &str,
    terminators: &IndexMap<String, String>,
    release_factor: Option<&str>,
) -> Result<IndexMap<String, u32>, MeModelError> {
    let codons = codons(sequence)?;
    let mut subreactions = IndexMap::new();
    let Some(last) = codons.last() else {
        return Ok(subreactions);
    };
    let last = last.to_string();
    if let Some(table_factor) = terminators.get(&last) {
        let factor = release_factor.unwrap_or(table_factor);
        subreactions.insert(format!("{}_{}_mediated_termination", last, factor), 1);
    }
    Ok(subreactions)
}

/// Count of each nucleotide in a sequence, zero counts included
pub fn nucleotide_counts(sequence: &str) -> Result<IndexMap<Nucleotide, u32>, MeModelError> {
    let mut counts: IndexMap<Nucleotide, u32> = Nucleotide::ALL.iter().map(|n| (*n, 0)).collect();
    for nt in parse_nucleotides(sequence)? {
        *counts.entry(nt).or_insert(0) += 1;
    }
    Ok(counts)
}

/// Bases excised from a transcription unit while processing its RNA products
///
/// Each product not of type mRNA has its span counted into the excised tally, as
/// monophosphates. A unit with only mRNA products excises nothing. Only non zero
/// counts are returned.
pub fn excised_bases<'a, I>(products: I) -> Result<IndexMap<Nucleotide, u32>, MeModelError>
where
    I: IntoIterator<Item = (RnaType, &'a str)>,
{
    let mut excised: IndexMap<Nucleotide, u32> = IndexMap::new();
    for (rna_type, sequence) in products {
        if rna_type == RnaType::MRna {
            continue;
        }
        for (nt, count) in nucleotide_counts(sequence)? {
            if count > 0 {
                *excised.entry(nt).or_insert(0) += count;
            }
        }
    }
    excised.sort_keys();
    Ok(excised)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminators() -> IndexMap<String, String> {
        let mut table = IndexMap::new();
        table.insert("UAA".to_string(), "generic_RF".to_string());
        table.insert("UAG".to_string(), "PrfA_mono".to_string());
        table.insert("UGA".to_string(), "PrfB_mono".to_string());
        table
    }

    #[test]
    fn composition_sums_to_residues() {
        for (seq, expected) in [
            ("ATGAGCTTTTAA", 3),
            ("ATGAGCTTTAAC", 4),
            ("ATG", 1),
            ("TAA", 0),
            ("", 0),
        ] {
            let composition = amino_acid_composition(seq).unwrap();
            assert_eq!(composition.values().sum::<u32>(), expected, "{}", seq);
        }
    }

    #[test]
    fn first_residue_is_methionine() {
        let composition = amino_acid_composition("GTGGTGTAG").unwrap();
        assert_eq!(composition[&AminoAcid::Met], 1);
        assert_eq!(composition[&AminoAcid::Val], 1);
    }

    #[test]
    fn internal_stop_codons() {
        let aas = amino_acid_sequence("ATGTGATAAGGCTAA").unwrap();
        assert_eq!(
            aas,
            vec![AminoAcid::Met, AminoAcid::Sec, AminoAcid::Lys, AminoAcid::Gly]
        );
    }

    #[test]
    fn bad_sequences_are_rejected() {
        assert!(matches!(
            amino_acid_composition("ATGA"),
            Err(MeModelError::InvalidSequence(_))
        ));
        assert!(matches!(
            amino_acid_composition("ATGXXX"),
            Err(MeModelError::InvalidSequence(_))
        ));
        assert!(elongation_subreactions("AT", &[]).is_err());
    }

    #[test]
    fn elongation_counts() {
        let per_residue = vec!["FusA_mono_elongation".to_string(), "Tuf_gtp_regeneration".to_string()];
        let elongation = elongation_subreactions("ATGAGCTTTTTTTAA", &per_residue).unwrap();
        assert_eq!(elongation["ser_addition_at_AGC"], 1);
        assert_eq!(elongation["phe_addition_at_UUU"], 2);
        assert_eq!(elongation["FusA_mono_elongation"], 3);
        assert_eq!(elongation["Tuf_gtp_regeneration"], 3);
        assert!(!elongation.contains_key("met_addition_at_AUG"));
        assert_eq!(elongation.len(), 4);
    }

    #[test]
    fn single_codon_has_no_elongation() {
        let per_residue = vec!["FusA_mono_elongation".to_string()];
        assert!(elongation_subreactions("ATGTAA", &per_residue).unwrap().is_empty());
    }

    #[test]
    fn start_ignores_first_codon() {
        let initiation = vec!["Translation_initiation_factor_InfA".to_string(), "fmet_addition_at_START".to_string()];
        let from_aug = start_subreactions("ATGAAA", &initiation).unwrap();
        let from_ctg = start_subreactions("CTGAAA", &initiation).unwrap();
        assert_eq!(from_aug, from_ctg);
        assert_eq!(from_aug["fmet_addition_at_START"], 1);
        assert_eq!(from_aug.len(), 2);
    }

    #[test]
    fn termination() {
        let stop = termination_subreactions("ATGAGCTTTTAA", &terminators(), None).unwrap();
        assert_eq!(stop.len(), 1);
        assert_eq!(stop["UAA_generic_RF_mediated_termination"], 1);

        let no_stop = termination_subreactions("ATGAGCTTTAAC", &terminators(), None).unwrap();
        assert!(no_stop.is_empty());

        let overridden = termination_subreactions("ATGTGA", &terminators(), Some("generic_RF")).unwrap();
        assert!(overridden.contains_key("UGA_generic_RF_mediated_termination"));
    }

    #[test]
    fn mrna_only_excises_nothing() {
        let excised = excised_bases(vec![(RnaType::MRna, "ACGU"), (RnaType::MRna, "AAAA")]).unwrap();
        assert!(excised.is_empty());
    }

    #[test]
    fn stable_rna_is_excised() {
        let excised = excised_bases(vec![(RnaType::MRna, "ACGU"), (RnaType::TRna, "AAGT")]).unwrap();
        assert_eq!(excised[&Nucleotide::A], 2);
        assert_eq!(excised[&Nucleotide::G], 1);
        assert_eq!(excised[&Nucleotide::U], 1);
        assert!(!excised.contains_key(&Nucleotide::C));
        assert_eq!(excised.values().sum::<u32>(), 4);
    }
}
