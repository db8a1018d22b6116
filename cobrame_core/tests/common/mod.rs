//! Shared fixture: a small expression model with one polycistronic transcription unit
//! (an mRNA and a tRNA), one mRNA only transcription unit and two translations
use indexmap::IndexMap;

use cobrame_core::me_model::metabolite::{Metabolite, RnaType};
use cobrame_core::me_model::model::Model;
use cobrame_core::me_model::process_data::{
    ProcessData, SubreactionDataBuilder, TranscriptionDataBuilder, TranslationDataBuilder,
};

pub const B0001: &str = "ATGAGCTTTTAA";
pub const TRNA: &str = "GGCA";
pub const TU_1: &str = "ATGAGCTTTTAACCGGCA";
pub const B0002: &str = "ATGTTTTAG";
pub const B0003: &str = "ATGAGCTTTAAC";

fn stoichiometry(entries: &[(&str, f64)]) -> IndexMap<String, f64> {
    entries
        .iter()
        .map(|(id, coefficient)| (id.to_string(), *coefficient))
        .collect()
}

fn add_subreaction(model: &mut Model, id: &str, entries: &[(&str, f64)], enzyme: Option<(&str, f64)>) {
    let mut builder = SubreactionDataBuilder::default();
    builder.stoichiometry(stoichiometry(entries));
    if let Some((enzyme, keff)) = enzyme {
        builder.enzyme(enzyme).keff(keff);
    }
    model
        .register(ProcessData::new(id, builder.build().unwrap()))
        .unwrap();
}

/// Model with every record registered and no reactions
pub fn records_model() -> Model {
    let mut model = Model::new_empty();
    let generic = [
        "atp_c", "ctp_c", "gtp_c", "utp_c", "amp_c", "cmp_c", "gmp_c", "ump_c", "gdp_c",
        "h2o_c", "h_c", "met__L_c", "ser__L_c", "phe__L_c", "asn__L_c", "A", "B",
        "protein_biomass", "mRNA_biomass", "tRNA_biomass", "prosthetic_group_biomass",
    ];
    model
        .add_metabolites(generic.iter().map(|id| Metabolite::new_generic(id)))
        .unwrap();
    model
        .add_metabolites(
            ["ribosome", "RNAP", "FusA_mono", "generic_RF", "CPLX"]
                .iter()
                .map(|id| Metabolite::new_complex(id)),
        )
        .unwrap();
    model
        .add_metabolites(
            ["protein_b0001", "protein_b0002", "protein_b0003"]
                .iter()
                .map(|id| Metabolite::new_translated_gene(id)),
        )
        .unwrap();
    model
        .add_metabolites([
            Metabolite::new_transcribed_gene("RNA_b0001", RnaType::MRna, B0001),
            Metabolite::new_transcribed_gene("RNA_tRNA", RnaType::TRna, TRNA),
            Metabolite::new_transcribed_gene("RNA_b0002", RnaType::MRna, B0002),
            Metabolite::new_transcribed_gene("RNA_b0003", RnaType::MRna, B0003),
        ])
        .unwrap();

    add_subreaction(&mut model, "Translation_initiation_factor_InfA", &[], None);
    add_subreaction(&mut model, "Translation_initiation_factor_InfC", &[], None);
    add_subreaction(
        &mut model,
        "Translation_gtp_initiation_factor_InfB",
        &[("gtp_c", -1.), ("gdp_c", 1.)],
        None,
    );
    add_subreaction(&mut model, "fmet_addition_at_START", &[], None);
    add_subreaction(
        &mut model,
        "FusA_mono_elongation",
        &[("gtp_c", -1.), ("gdp_c", 1.)],
        Some(("FusA_mono", 65.)),
    );
    add_subreaction(&mut model, "Tuf_gtp_regeneration", &[], None);
    for id in ["ser_addition_at_AGC", "phe_addition_at_UUU", "asn_addition_at_AAC"] {
        add_subreaction(&mut model, id, &[], None);
    }
    for id in ["UAA_generic_RF_mediated_termination", "UAG_PrfA_mono_mediated_termination"] {
        add_subreaction(&mut model, id, &[], Some(("generic_RF", 100.)));
    }
    add_subreaction(
        &mut model,
        "Transcription_normal_rho_independent",
        &[("atp_c", -1.)],
        None,
    );

    let subreactions: IndexMap<String, u32> = [("Transcription_normal_rho_independent".to_string(), 1)]
        .into_iter()
        .collect();
    for (id, sequence, products) in [
        ("TU_1", TU_1, vec!["RNA_b0001", "RNA_tRNA"]),
        ("TU_2", B0002, vec!["RNA_b0002"]),
    ] {
        let transcription = TranscriptionDataBuilder::default()
            .nucleotide_sequence(sequence)
            .rna_products(products.iter().map(|p| p.to_string()).collect())
            .rna_polymerase("RNAP")
            .subreactions(subreactions.clone())
            .build()
            .unwrap();
        model.register(ProcessData::new(id, transcription)).unwrap();
    }

    for (id, sequence) in [("b0001", B0001), ("b0002", B0002), ("b0003", B0003)] {
        let translation = TranslationDataBuilder::default()
            .nucleotide_sequence(sequence)
            .mrna(format!("RNA_{}", id))
            .protein(format!("protein_{}", id))
            .build()
            .unwrap();
        model.register(ProcessData::new(id, translation)).unwrap();
    }
    model
}

/// Model with every expression reaction created and compiled
pub fn expression_model() -> Model {
    let mut model = records_model();
    for tu in ["TU_1", "TU_2"] {
        model.create_transcription_reaction(tu).unwrap();
        model.create_rna_demands(tu).unwrap();
    }
    for gene in ["b0001", "b0002", "b0003"] {
        model.create_translation_reaction(gene).unwrap();
    }
    model
}

pub fn close(left: f64, right: f64) -> bool {
    (left - right).abs() < 1e-12
}
