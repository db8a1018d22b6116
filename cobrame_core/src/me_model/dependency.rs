//! Queries over the dependencies between process data records and reactions
//!
//! Records reference each other by id (a complex references its modifications, a
//! transcription unit its subreactions, a translation the subreactions derived from its
//! codons). The dependency walk is computed from the current records on every query,
//! so it can't go stale after an edit.
use indexmap::IndexSet;

use crate::me_model::compiler::translation_subreactions;
use crate::me_model::model::Model;
use crate::me_model::process_data::{generic_trna_id, ProcessData, ProcessDataKind, TranslationData};
use crate::me_model::reaction::ReactionKind;
use crate::sequence::amino_acid_composition;
use crate::me_model::MeModelError;

impl Model {
    /// Ids of the records directly referenced by `data`
    fn direct_references(&self, data: &ProcessData) -> Result<Vec<String>, MeModelError> {
        Ok(match &data.kind {
            ProcessDataKind::Stoichiometric(stoichiometric) => {
                stoichiometric.subreactions.keys().cloned().collect()
            }
            ProcessDataKind::Complex(complex) => complex.modifications.keys().cloned().collect(),
            ProcessDataKind::Transcription(transcription) => {
                transcription.subreactions.keys().cloned().collect()
            }
            ProcessDataKind::Translation(translation) => {
                translation_subreactions(self, data.id(), translation)?
                    .into_keys()
                    .collect()
            }
            ProcessDataKind::TRna(trna) => trna.synthetase.iter().cloned().collect(),
            ProcessDataKind::Modification(_)
            | ProcessDataKind::Subreaction(_)
            | ProcessDataKind::Generic(_) => Vec::new(),
        })
    }

    /// Ids of every record which references `data_id`, directly or through other records
    ///
    /// A record whose references can't be derived (a translation with an unreadable
    /// sequence) is skipped with a warning, its own reactions fail on update instead.
    ///
    /// # Errors
    /// `NotFound` if the record isn't registered
    pub fn dependent_data(&self, data_id: &str) -> Result<IndexSet<String>, MeModelError> {
        // translations only reference subreactions, so their sequences are read only
        // when a subreaction is queried
        let reaches_translations = matches!(self.get(data_id)?.kind, ProcessDataKind::Subreaction(_));
        let mut references = Vec::with_capacity(self.process_data().len());
        for data in self.process_data().values() {
            let skip = data.id() == data_id
                || (!reaches_translations && matches!(data.kind, ProcessDataKind::Translation(_)));
            if skip {
                continue;
            }
            match self.direct_references(data) {
                Ok(referenced) => references.push((data.id(), referenced)),
                Err(err) => log::warn!("Skipping the references of {}: {}", data.id(), err),
            }
        }

        let mut dependents = IndexSet::new();
        let mut frontier = vec![data_id.to_string()];
        while let Some(current) = frontier.pop() {
            for (id, referenced) in &references {
                if referenced.contains(&current) && dependents.insert(id.to_string()) {
                    frontier.push(id.to_string());
                }
            }
        }
        Ok(dependents)
    }

    /// Ids of every reaction whose compiled form depends on `data_id`
    ///
    /// These are the reactions built directly from the record, plus the reactions built
    /// from a dependent record which read that record's references (so an edited
    /// modification exposes the formation of every complex using it, but not the
    /// metabolic reactions those complexes catalyze). The set is unordered.
    ///
    /// # Examples
    /// ```rust
    /// use cobrame_core::me_model::model::Model;
    /// use cobrame_core::me_model::metabolite::Metabolite;
    /// use cobrame_core::me_model::process_data::{ProcessData, StoichiometricData};
    /// let mut model = Model::new_empty();
    /// model.add_metabolite(Metabolite::new_generic("A")).unwrap();
    /// let mut data = StoichiometricData::new(-10., 10.).unwrap();
    /// data.set_coefficient("A", -1.);
    /// model.register(ProcessData::new("EX_A", data)).unwrap();
    /// model.create_metabolic_reactions("EX_A", None, 65.).unwrap();
    /// assert_eq!(model.parent_reactions("EX_A").unwrap().len(), 2);
    /// ```
    pub fn parent_reactions(&self, data_id: &str) -> Result<IndexSet<String>, MeModelError> {
        let mut parents: IndexSet<String> = self.get(data_id)?.direct_parent_reactions().clone();
        for dependent in self.dependent_data(data_id)? {
            for reaction_id in self.get(&dependent)?.direct_parent_reactions() {
                let reaction = self.reaction(reaction_id)?;
                if reaction.kind().reads_references_of(&dependent) {
                    parents.insert(reaction_id.clone());
                }
            }
        }
        Ok(parents)
    }

    /// Ids of the reactions whose compiled form depends on a metabolite's attributes or
    /// on its presence in the model
    ///
    /// For a transcribed gene these are the transcription of every unit making it and
    /// its demand. For a generic tRNA these are the translations reading its amino acid,
    /// which consume the generic tRNA only once it is in the model.
    pub fn metabolite_dependents(&self, metabolite_id: &str) -> Result<IndexSet<String>, MeModelError> {
        self.metabolite(metabolite_id)?;
        let mut dependents = IndexSet::new();
        for (reaction_id, reaction) in self.reactions() {
            let depends = match reaction.kind() {
                ReactionKind::Transcription(transcription) => self
                    .get(transcription.transcription_data_id())
                    .ok()
                    .and_then(|data| match &data.kind {
                        ProcessDataKind::Transcription(data) => Some(data),
                        _ => None,
                    })
                    .is_some_and(|data| data.rna_products.contains(metabolite_id)),
                ReactionKind::RnaDemand(demand) => demand.rna_id() == metabolite_id,
                ReactionKind::Translation(translation) => self
                    .data::<TranslationData>(translation.translation_data_id())
                    .is_ok_and(|data| reads_generic_trna(data, metabolite_id)),
                _ => false,
            };
            if depends {
                dependents.insert(reaction_id.clone());
            }
        }
        Ok(dependents)
    }

    /// Recompile every reaction returned by [`Model::parent_reactions`]
    ///
    /// # Returns
    /// The ids of the updated reactions
    pub fn update_parent_reactions(&mut self, data_id: &str) -> Result<IndexSet<String>, MeModelError> {
        let parents = self.parent_reactions(data_id)?;
        log::info!("Updating {} reactions depending on {}", parents.len(), data_id);
        for reaction_id in &parents {
            self.update_reaction(reaction_id)?;
        }
        Ok(parents)
    }
}

/// Does the translation use the generic tRNA `metabolite_id`, unreadable sequences
/// use nothing
fn reads_generic_trna(data: &TranslationData, metabolite_id: &str) -> bool {
    amino_acid_composition(&data.nucleotide_sequence).is_ok_and(|composition| {
        composition
            .keys()
            .any(|amino_acid| generic_trna_id(&amino_acid.metabolite_id()) == metabolite_id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::me_model::model::tests::setup_model;
    use crate::me_model::process_data::{
        ModificationData, StoichiometricData, SubreactionDataBuilder, TranslationDataBuilder,
    };
    use crate::me_model::reaction::{MeReaction, TranslationReaction};

    fn set(ids: &[&str]) -> IndexSet<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn modification_edit_reaches_formation_only() {
        let mut model = setup_model();
        model.create_metabolic_reactions("A_to_B", Some("CPLX"), 100.).unwrap();
        model.create_complex_formation("CPLX").unwrap();

        assert_eq!(model.dependent_data("mod_fe2_c").unwrap(), set(&["CPLX"]));
        assert_eq!(
            model.parent_reactions("mod_fe2_c").unwrap(),
            set(&["formation_CPLX"])
        );

        let mut complex_parents = model.parent_reactions("CPLX").unwrap();
        complex_parents.sort();
        assert_eq!(
            complex_parents,
            set(&["A_to_B_FWD_CPLX", "A_to_B_REV_CPLX", "formation_CPLX"])
        );
    }

    #[test]
    fn modification_edit_is_propagated_on_update() {
        let mut model = setup_model();
        model.create_complex_formation("CPLX").unwrap();
        model
            .data_mut::<ModificationData>("mod_fe2_c")
            .unwrap()
            .stoichiometry
            .insert("fe2_c".to_string(), -3.);

        // stale until updated
        let before = model.reaction("formation_CPLX").unwrap().metabolites_at(0.1);
        assert_eq!(before["fe2_c"], -2.);

        let updated = model.update_parent_reactions("mod_fe2_c").unwrap();
        assert_eq!(updated, set(&["formation_CPLX"]));
        let after = model.reaction("formation_CPLX").unwrap().metabolites_at(0.1);
        assert_eq!(after["fe2_c"], -6.);
    }

    #[test]
    fn shared_bound_edit() {
        let mut model = setup_model();
        model.create_metabolic_reactions("A_to_B", Some("CPLX"), 100.).unwrap();
        model
            .data_mut::<StoichiometricData>("A_to_B")
            .unwrap()
            .set_bounds(0., 1000.)
            .unwrap();
        let updated = model.update_parent_reactions("A_to_B").unwrap();
        assert_eq!(updated.len(), 2);

        let forward = model.reaction("A_to_B_FWD_CPLX").unwrap();
        assert_eq!((forward.lower_bound(), forward.upper_bound()), (0., 1000.));
        let reverse = model.reaction("A_to_B_REV_CPLX").unwrap();
        assert_eq!((reverse.lower_bound(), reverse.upper_bound()), (0., 0.));
    }

    #[test]
    fn stoichiometric_subreaction_exposes_metabolic_reactions() {
        let mut model = setup_model();
        let subreaction = SubreactionDataBuilder::default()
            .enzyme("IscS")
            .keff(20.)
            .build()
            .unwrap();
        model
            .register(ProcessData::new("IscS_assist", subreaction))
            .unwrap();
        model
            .data_mut::<StoichiometricData>("B_to_C")
            .unwrap()
            .subreactions
            .insert("IscS_assist".to_string(), 1);
        model.create_metabolic_reactions("B_to_C", None, 65.).unwrap();

        assert_eq!(
            model.parent_reactions("IscS_assist").unwrap(),
            set(&["B_to_C_FWD_SPONT"])
        );
        let coupling = model
            .reaction("B_to_C_FWD_SPONT")
            .unwrap()
            .metabolites_at(1.)["IscS"];
        assert!((coupling + 1. / (20. * 3600.)).abs() < 1e-15);
    }

    #[test]
    fn codon_subreactions_are_derived() {
        let mut model = setup_model();
        let subreaction = SubreactionDataBuilder::default().build().unwrap();
        model
            .register(ProcessData::new("ser_addition_at_AGC", subreaction))
            .unwrap();
        let translation = TranslationDataBuilder::default()
            .nucleotide_sequence("ATGAGCTTTTAA")
            .mrna("RNA_b0001")
            .protein("protein_b0001")
            .build()
            .unwrap();
        model.register(ProcessData::new("b0001", translation)).unwrap();
        model
            .add_reaction(MeReaction::new(
                "translation_b0001",
                TranslationReaction::new("b0001"),
            ))
            .unwrap();

        assert_eq!(
            model.dependent_data("ser_addition_at_AGC").unwrap(),
            set(&["b0001"])
        );
        assert_eq!(
            model.parent_reactions("ser_addition_at_AGC").unwrap(),
            set(&["translation_b0001"])
        );
    }

    #[test]
    fn unreadable_translation_does_not_block_queries() {
        let mut model = setup_model();
        model.create_metabolic_reactions("A_to_B", Some("CPLX"), 100.).unwrap();
        let subreaction = SubreactionDataBuilder::default().build().unwrap();
        model
            .register(ProcessData::new("ser_addition_at_AGC", subreaction))
            .unwrap();
        for (id, sequence) in [("b0001", "ATGAGCTTTTAA"), ("b0003", "ATGAGCTTTAAC")] {
            let translation = TranslationDataBuilder::default()
                .nucleotide_sequence(sequence)
                .mrna("RNA_b0001")
                .protein("protein_b0001")
                .build()
                .unwrap();
            model.register(ProcessData::new(id, translation)).unwrap();
        }
        model
            .data_mut::<TranslationData>("b0003")
            .unwrap()
            .nucleotide_sequence = "ATGA".to_string();

        assert_eq!(model.parent_reactions("A_to_B").unwrap().len(), 2);
        assert_eq!(model.update_parent_reactions("A_to_B").unwrap().len(), 2);
        assert_eq!(
            model.dependent_data("ser_addition_at_AGC").unwrap(),
            set(&["b0001"])
        );
    }

    #[test]
    fn unknown_record() {
        let model = setup_model();
        assert_eq!(
            model.parent_reactions("missing"),
            Err(MeModelError::NotFound("missing".to_string()))
        );
        assert!(model.metabolite_dependents("missing").is_err());
    }
}
