//! Nucleotide, codon and amino acid tables of the standard genetic code
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::me_model::MeModelError;

/// An RNA nucleotide, DNA thymine is read as uracil
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Nucleotide {
    A,
    C,
    G,
    U,
}

impl Nucleotide {
    /// All nucleotides, in a fixed order
    pub const ALL: [Nucleotide; 4] = [Nucleotide::A, Nucleotide::C, Nucleotide::G, Nucleotide::U];

    /// Parse a single base, accepting both T and U
    pub fn from_char(base: char) -> Option<Nucleotide> {
        match base {
            'A' => Some(Nucleotide::A),
            'C' => Some(Nucleotide::C),
            'G' => Some(Nucleotide::G),
            'U' | 'T' => Some(Nucleotide::U),
            _ => None,
        }
    }

    /// The RNA letter
    pub fn as_char(&self) -> char {
        match self {
            Nucleotide::A => 'A',
            Nucleotide::C => 'C',
            Nucleotide::G => 'G',
            Nucleotide::U => 'U',
        }
    }

    /// Metabolite id of the nucleoside triphosphate consumed during transcription
    pub fn triphosphate_id(&self) -> &'static str {
        match self {
            Nucleotide::A => "atp_c",
            Nucleotide::C => "ctp_c",
            Nucleotide::G => "gtp_c",
            Nucleotide::U => "utp_c",
        }
    }

    /// Metabolite id of the nucleoside monophosphate released by excision
    pub fn monophosphate_id(&self) -> &'static str {
        match self {
            Nucleotide::A => "amp_c",
            Nucleotide::C => "cmp_c",
            Nucleotide::G => "gmp_c",
            Nucleotide::U => "ump_c",
        }
    }
}

impl Display for Nucleotide {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Parse a nucleotide string, rejecting anything outside of {A,C,G,U,T}
pub fn parse_nucleotides(sequence: &str) -> Result<Vec<Nucleotide>, MeModelError> {
    sequence
        .chars()
        .enumerate()
        .map(|(position, base)| {
            Nucleotide::from_char(base).ok_or_else(|| {
                MeModelError::InvalidSequence(format!(
                    "invalid base '{}' at position {}",
                    base, position
                ))
            })
        })
        .collect()
}

/// Three nucleotides read together
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Codon(pub [Nucleotide; 3]);

impl Codon {
    /// Parse a three letter codon string
    pub fn parse(codon: &str) -> Option<Codon> {
        let bases = parse_nucleotides(codon).ok()?;
        match bases.as_slice() {
            [a, b, c] => Some(Codon([*a, *b, *c])),
            _ => None,
        }
    }

    /// Is this one of the three stop codons of the standard code
    pub fn is_stop(&self) -> bool {
        self.translate().is_none()
    }

    /// Amino acid encoded by the codon in the standard genetic code, None for stop codons
    pub fn translate(&self) -> Option<AminoAcid> {
        use AminoAcid::*;
        use Nucleotide::{A, C, G, U};
        let aa = match self.0 {
            [U, U, U] | [U, U, C] => Phe,
            [U, U, A] | [U, U, G] | [C, U, _] => Leu,
            [A, U, U] | [A, U, C] | [A, U, A] => Ile,
            [A, U, G] => Met,
            [G, U, _] => Val,
            [U, C, _] | [A, G, U] | [A, G, C] => Ser,
            [C, C, _] => Pro,
            [A, C, _] => Thr,
            [G, C, _] => Ala,
            [U, A, U] | [U, A, C] => Tyr,
            [U, A, A] | [U, A, G] | [U, G, A] => return None,
            [C, A, U] | [C, A, C] => His,
            [C, A, A] | [C, A, G] => Gln,
            [A, A, U] | [A, A, C] => Asn,
            [A, A, A] | [A, A, G] => Lys,
            [G, A, U] | [G, A, C] => Asp,
            [G, A, A] | [G, A, G] => Glu,
            [U, G, U] | [U, G, C] => Cys,
            [U, G, G] => Trp,
            [C, G, _] | [A, G, A] | [A, G, G] => Arg,
            [G, G, _] => Gly,
        };
        Some(aa)
    }
}

impl Display for Codon {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.0[0], self.0[1], self.0[2])
    }
}

/// Proteinogenic amino acids, including selenocysteine
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AminoAcid {
    Ala,
    Arg,
    Asn,
    Asp,
    Cys,
    Gln,
    Glu,
    Gly,
    His,
    Ile,
    Leu,
    Lys,
    Met,
    Phe,
    Pro,
    Ser,
    Thr,
    Trp,
    Tyr,
    Val,
    Sec,
}

impl AminoAcid {
    /// One letter code
    pub fn one_letter(&self) -> char {
        match self {
            AminoAcid::Ala => 'A',
            AminoAcid::Arg => 'R',
            AminoAcid::Asn => 'N',
            AminoAcid::Asp => 'D',
            AminoAcid::Cys => 'C',
            AminoAcid::Gln => 'Q',
            AminoAcid::Glu => 'E',
            AminoAcid::Gly => 'G',
            AminoAcid::His => 'H',
            AminoAcid::Ile => 'I',
            AminoAcid::Leu => 'L',
            AminoAcid::Lys => 'K',
            AminoAcid::Met => 'M',
            AminoAcid::Phe => 'F',
            AminoAcid::Pro => 'P',
            AminoAcid::Ser => 'S',
            AminoAcid::Thr => 'T',
            AminoAcid::Trp => 'W',
            AminoAcid::Tyr => 'Y',
            AminoAcid::Val => 'V',
            AminoAcid::Sec => 'U',
        }
    }

    /// Lower case three letter abbreviation, used to build subreaction ids
    pub fn short_name(&self) -> &'static str {
        match self {
            AminoAcid::Ala => "ala",
            AminoAcid::Arg => "arg",
            AminoAcid::Asn => "asn",
            AminoAcid::Asp => "asp",
            AminoAcid::Cys => "cys",
            AminoAcid::Gln => "gln",
            AminoAcid::Glu => "glu",
            AminoAcid::Gly => "gly",
            AminoAcid::His => "his",
            AminoAcid::Ile => "ile",
            AminoAcid::Leu => "leu",
            AminoAcid::Lys => "lys",
            AminoAcid::Met => "met",
            AminoAcid::Phe => "phe",
            AminoAcid::Pro => "pro",
            AminoAcid::Ser => "ser",
            AminoAcid::Thr => "thr",
            AminoAcid::Trp => "trp",
            AminoAcid::Tyr => "tyr",
            AminoAcid::Val => "val",
            AminoAcid::Sec => "sec",
        }
    }

    /// Metabolite id of the free amino acid
    pub fn metabolite_id(&self) -> String {
        match self {
            AminoAcid::Gly => "gly_c".to_string(),
            AminoAcid::Sec => "sec_c".to_string(),
            other => format!("{}__L_c", other.short_name()),
        }
    }
}

impl Display for AminoAcid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short_name())
    }
}
