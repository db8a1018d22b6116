//! This module provides the Model struct, which owns every metabolite, process data
//! record and reaction of an ME-model
use indexmap::IndexMap;

use crate::me_model::global_info::GlobalInfo;
use crate::me_model::metabolite::{Metabolite, TranscribedGene};
use crate::me_model::process_data::{
    ComplexData, GenericComponents, GenericData, ProcessData, ProcessDataVariant,
    StoichiometricData, TRnaData, TranscriptionData, TranslationData,
};
use crate::me_model::reaction::{
    ComplexFormation, GenericFormation, MeReaction, MetabolicReactionBuilder, RnaDemand,
    TRnaCharging, TranscriptionReaction, TranslationReaction,
};
use crate::me_model::MeModelError;

/// Represents a model of Metabolism and Expression
#[derive(Clone, Debug, Default)]
pub struct Model {
    /// Id associated with the Model
    pub id: Option<String>,
    /// Map of metabolite ids to Metabolites
    metabolites: IndexMap<String, Metabolite>,
    /// Map of process data ids to ProcessData records
    process_data: IndexMap<String, ProcessData>,
    /// Map of reaction ids to Reactions
    reactions: IndexMap<String, MeReaction>,
    /// Organism specific constants used when compiling reactions
    pub global_info: GlobalInfo,
}

impl Model {
    pub fn new_empty() -> Self {
        Model::default()
    }

    /// Create an empty model for an organism described by `global_info`
    pub fn with_global_info(global_info: GlobalInfo) -> Self {
        Model {
            global_info,
            ..Model::default()
        }
    }

    // region Metabolites
    /// Add a metabolite to the model
    ///
    /// # Examples
    /// ```rust
    /// use cobrame_core::me_model::model::Model;
    /// use cobrame_core::me_model::metabolite::Metabolite;
    /// let mut model = Model::new_empty();
    /// model.add_metabolite(Metabolite::new_generic("atp_c")).unwrap();
    /// assert!(model.add_metabolite(Metabolite::new_generic("atp_c")).is_err());
    /// ```
    pub fn add_metabolite(&mut self, metabolite: Metabolite) -> Result<(), MeModelError> {
        if self.metabolites.contains_key(metabolite.id()) {
            return Err(MeModelError::DuplicateId(metabolite.id().to_string()));
        }
        self.metabolites.insert(metabolite.id().to_string(), metabolite);
        Ok(())
    }

    /// Add several metabolites, stopping at the first duplicate
    pub fn add_metabolites<I: IntoIterator<Item = Metabolite>>(
        &mut self,
        metabolites: I,
    ) -> Result<(), MeModelError> {
        for metabolite in metabolites {
            self.add_metabolite(metabolite)?;
        }
        Ok(())
    }

    pub fn has_metabolite(&self, id: &str) -> bool {
        self.metabolites.contains_key(id)
    }

    pub fn metabolite(&self, id: &str) -> Result<&Metabolite, MeModelError> {
        self.metabolites
            .get(id)
            .ok_or_else(|| MeModelError::NotFound(id.to_string()))
    }

    /// Mutable access to a metabolite
    ///
    /// Changing the type or sequence of a transcribed gene changes the compiled form of
    /// the reactions listed by [`Model::metabolite_dependents`], which have to be updated.
    pub fn metabolite_mut(&mut self, id: &str) -> Result<&mut Metabolite, MeModelError> {
        self.metabolites
            .get_mut(id)
            .ok_or_else(|| MeModelError::NotFound(id.to_string()))
    }

    pub fn metabolites(&self) -> &IndexMap<String, Metabolite> {
        &self.metabolites
    }

    /// A transcribed gene referenced by `referenced_by`
    pub(crate) fn referenced_transcribed_gene(
        &self,
        id: &str,
        referenced_by: &str,
    ) -> Result<&TranscribedGene, MeModelError> {
        let metabolite = self
            .metabolites
            .get(id)
            .ok_or_else(|| MeModelError::DanglingReference {
                id: id.to_string(),
                referenced_by: referenced_by.to_string(),
            })?;
        metabolite
            .transcribed_gene()
            .ok_or_else(|| MeModelError::WrongKind {
                id: id.to_string(),
                expected: "TranscribedGene",
            })
    }
    // endregion Metabolites

    // region Process Data
    /// Register a process data record
    ///
    /// Registering does not create any reaction, see the `create_*` methods.
    ///
    /// # Errors
    /// `DuplicateId` if a record with the same id exists, or the error from
    /// [`ProcessData::validate`]
    pub fn register(&mut self, mut data: ProcessData) -> Result<(), MeModelError> {
        if self.process_data.contains_key(data.id()) {
            return Err(MeModelError::DuplicateId(data.id().to_string()));
        }
        data.validate()?;
        // links only come from reactions added to this model
        data.clear_links();
        self.process_data.insert(data.id().to_string(), data);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&ProcessData, MeModelError> {
        self.process_data
            .get(id)
            .ok_or_else(|| MeModelError::NotFound(id.to_string()))
    }

    /// Mutable access to a record
    ///
    /// Edits are not propagated, call [`Model::update_parent_reactions`] afterwards.
    pub fn get_mut(&mut self, id: &str) -> Result<&mut ProcessData, MeModelError> {
        self.process_data
            .get_mut(id)
            .ok_or_else(|| MeModelError::NotFound(id.to_string()))
    }

    /// Typed access to a record
    ///
    /// # Examples
    /// ```rust
    /// use cobrame_core::me_model::model::Model;
    /// use cobrame_core::me_model::process_data::{ComplexDataBuilder, ProcessData, StoichiometricData};
    /// let mut model = Model::new_empty();
    /// let complex = ComplexDataBuilder::default().build().unwrap();
    /// model.register(ProcessData::new("CPLX", complex)).unwrap();
    /// assert!(model.data::<StoichiometricData>("CPLX").is_err());
    /// assert!(model.data::<cobrame_core::me_model::process_data::ComplexData>("CPLX").is_ok());
    /// ```
    pub fn data<T: ProcessDataVariant>(&self, id: &str) -> Result<&T, MeModelError> {
        let data = self.get(id)?;
        T::from_kind(&data.kind).ok_or_else(|| MeModelError::WrongKind {
            id: id.to_string(),
            expected: T::KIND,
        })
    }

    /// Typed mutable access to a record, see [`Model::get_mut`]
    pub fn data_mut<T: ProcessDataVariant>(&mut self, id: &str) -> Result<&mut T, MeModelError> {
        let data = self.get_mut(id)?;
        T::from_kind_mut(&mut data.kind).ok_or_else(|| MeModelError::WrongKind {
            id: id.to_string(),
            expected: T::KIND,
        })
    }

    /// A record referenced by `referenced_by`, a missing record is a dangling reference
    pub(crate) fn referenced<T: ProcessDataVariant>(
        &self,
        id: &str,
        referenced_by: &str,
    ) -> Result<&T, MeModelError> {
        match self.data::<T>(id) {
            Err(MeModelError::NotFound(_)) => Err(MeModelError::DanglingReference {
                id: id.to_string(),
                referenced_by: referenced_by.to_string(),
            }),
            other => other,
        }
    }

    pub fn process_data(&self) -> &IndexMap<String, ProcessData> {
        &self.process_data
    }

    /// Remove a record which no reaction is built from
    ///
    /// # Errors
    /// `InUse` with the parent reactions if there are any, those have to be removed first
    pub fn remove_process_data(&mut self, id: &str) -> Result<ProcessData, MeModelError> {
        let parents = self.get(id)?.direct_parent_reactions();
        if !parents.is_empty() {
            return Err(MeModelError::InUse {
                id: id.to_string(),
                reactions: parents.iter().cloned().collect(),
            });
        }
        self.process_data
            .shift_remove(id)
            .ok_or_else(|| MeModelError::NotFound(id.to_string()))
    }
    // endregion Process Data

    // region Reactions
    /// Add a reaction and link it to its process data
    ///
    /// The reaction has no participants until [`Model::update_reaction`] is called.
    ///
    /// # Errors
    /// `DuplicateId` if the id is taken, `DanglingReference` if a linked record isn't
    /// registered
    pub fn add_reaction(&mut self, reaction: MeReaction) -> Result<(), MeModelError> {
        if self.reactions.contains_key(reaction.id()) {
            return Err(MeModelError::DuplicateId(reaction.id().to_string()));
        }
        let linked: Vec<String> = reaction
            .kind()
            .linked_data()
            .into_iter()
            .map(|id| id.to_string())
            .collect();
        if let Some(missing) = linked.iter().find(|id| !self.process_data.contains_key(*id)) {
            return Err(MeModelError::DanglingReference {
                id: missing.clone(),
                referenced_by: reaction.id().to_string(),
            });
        }
        for data_id in &linked {
            if let Some(data) = self.process_data.get_mut(data_id) {
                data.link(reaction.id());
            }
        }
        self.reactions.insert(reaction.id().to_string(), reaction);
        Ok(())
    }

    pub fn reaction(&self, id: &str) -> Result<&MeReaction, MeModelError> {
        self.reactions
            .get(id)
            .ok_or_else(|| MeModelError::NotFound(id.to_string()))
    }

    /// Mutable access to a reaction (for example to change the keff of a metabolic
    /// reaction), the change takes effect on the next update
    pub fn reaction_mut(&mut self, id: &str) -> Result<&mut MeReaction, MeModelError> {
        self.reactions
            .get_mut(id)
            .ok_or_else(|| MeModelError::NotFound(id.to_string()))
    }

    pub fn reactions(&self) -> &IndexMap<String, MeReaction> {
        &self.reactions
    }

    /// Remove a reaction and unlink it from every record it was built from
    pub fn remove_reaction(&mut self, id: &str) -> Result<MeReaction, MeModelError> {
        let reaction = self
            .reactions
            .shift_remove(id)
            .ok_or_else(|| MeModelError::NotFound(id.to_string()))?;
        for data_id in reaction.kind().linked_data() {
            if let Some(data) = self.process_data.get_mut(data_id) {
                data.unlink(id);
            }
        }
        Ok(reaction)
    }

    /// Recompile a reaction from its process data
    ///
    /// The participant map is rebuilt from scratch and replaced in one step. On error
    /// the reaction keeps its previous compiled state.
    pub fn update_reaction(&mut self, id: &str) -> Result<(), MeModelError> {
        let compiled = self.reaction(id)?.kind().compiler().compile(id, self)?;
        log::debug!("Compiled {} with {} participants", id, compiled.metabolites.len());
        if let Some(reaction) = self.reactions.get_mut(id) {
            reaction.apply(compiled);
        }
        Ok(())
    }

    /// Recompile every reaction in the model
    pub fn update_all(&mut self) -> Result<(), MeModelError> {
        let ids: Vec<String> = self.reactions.keys().cloned().collect();
        log::info!("Updating all {} reactions", ids.len());
        for id in &ids {
            self.update_reaction(id)?;
        }
        Ok(())
    }

    /// Add a freshly constructed reaction and compile it, it is removed again if
    /// compilation fails
    fn add_and_compile(&mut self, reaction: MeReaction) -> Result<String, MeModelError> {
        let id = reaction.id().to_string();
        self.add_reaction(reaction)?;
        if let Err(err) = self.update_reaction(&id) {
            self.remove_reaction(&id)?;
            return Err(err);
        }
        Ok(id)
    }
    // endregion Reactions

    // region Reaction Construction
    /// Create and compile the formation reaction `formation_<id>` of a complex
    pub fn create_complex_formation(&mut self, complex_data_id: &str) -> Result<String, MeModelError> {
        self.data::<ComplexData>(complex_data_id)?;
        let reaction = MeReaction::new(
            &format!("formation_{}", complex_data_id),
            ComplexFormation::new(complex_data_id),
        );
        self.add_and_compile(reaction)
    }

    /// Create and compile the metabolic reactions built from a stoichiometric data record
    ///
    /// The forward instance `<stoich>_FWD_<complex>` is always created, the reverse
    /// instance `<stoich>_REV_<complex>` only when the lower bound is negative. Without a
    /// complex the reactions are spontaneous and named with `SPONT`.
    ///
    /// # Returns
    /// Ids of the created reactions, forward first
    pub fn create_metabolic_reactions(
        &mut self,
        stoichiometric_data_id: &str,
        complex_data_id: Option<&str>,
        keff: f64,
    ) -> Result<Vec<String>, MeModelError> {
        let reversible = self
            .data::<StoichiometricData>(stoichiometric_data_id)?
            .is_reversible();
        if let Some(complex) = complex_data_id {
            self.data::<ComplexData>(complex)?;
        }
        let suffix = complex_data_id.unwrap_or("SPONT");
        let mut directions = vec![("FWD", false)];
        if reversible {
            directions.push(("REV", true));
        }

        let mut created = Vec::new();
        for (direction, reverse) in directions {
            let mut builder = MetabolicReactionBuilder::default();
            builder
                .stoichiometric_data_id(stoichiometric_data_id)
                .keff(keff)
                .reverse(reverse);
            if let Some(complex) = complex_data_id {
                builder.complex_data_id(complex);
            }
            let id = format!("{}_{}_{}", stoichiometric_data_id, direction, suffix);
            let reaction = MeReaction::new(&id, builder.build()?);
            match self.add_and_compile(reaction) {
                Ok(id) => created.push(id),
                Err(err) => {
                    self.remove_created(&created)?;
                    return Err(err);
                }
            }
        }
        Ok(created)
    }

    /// Create and compile the reaction `transcription_<id>` of a transcription unit
    pub fn create_transcription_reaction(&mut self, transcription_data_id: &str) -> Result<String, MeModelError> {
        self.data::<TranscriptionData>(transcription_data_id)?;
        let reaction = MeReaction::new(
            &format!("transcription_{}", transcription_data_id),
            TranscriptionReaction::new(transcription_data_id),
        );
        self.add_and_compile(reaction)
    }

    /// Create and compile the reaction `translation_<id>` of a translation data record
    pub fn create_translation_reaction(&mut self, translation_data_id: &str) -> Result<String, MeModelError> {
        self.data::<TranslationData>(translation_data_id)?;
        let reaction = MeReaction::new(
            &format!("translation_{}", translation_data_id),
            TranslationReaction::new(translation_data_id),
        );
        self.add_and_compile(reaction)
    }

    /// Create and compile one demand reaction `DM_<rna>` per RNA product of a
    /// transcription unit, skipping products which already have one
    pub fn create_rna_demands(&mut self, transcription_data_id: &str) -> Result<Vec<String>, MeModelError> {
        let products: Vec<String> = self
            .data::<TranscriptionData>(transcription_data_id)?
            .rna_products
            .iter()
            .cloned()
            .collect();
        let mut created = Vec::new();
        for rna_id in products {
            let id = format!("DM_{}", rna_id);
            if self.reactions.contains_key(&id) {
                continue;
            }
            let reaction = MeReaction::new(&id, RnaDemand::new(transcription_data_id, &rna_id));
            match self.add_and_compile(reaction) {
                Ok(id) => created.push(id),
                Err(err) => {
                    self.remove_created(&created)?;
                    return Err(err);
                }
            }
        }
        Ok(created)
    }

    /// Remove reactions created by a construction helper which failed partway
    fn remove_created(&mut self, created: &[String]) -> Result<(), MeModelError> {
        for id in created {
            self.remove_reaction(id)?;
        }
        Ok(())
    }
    /// Create and compile the reaction `charging_<id>` of a tRNA data record
    ///
    /// The generic tRNA of the amino acid is added to the model if it is missing. The
    /// translations reading that amino acid consume it once they are updated, see
    /// [`Model::metabolite_dependents`].
    pub fn create_trna_charging(&mut self, trna_data_id: &str) -> Result<String, MeModelError> {
        let generic_trna = self.data::<TRnaData>(trna_data_id)?.generic_trna_id();
        let added = self.add_generic_component(&generic_trna);
        let reaction = MeReaction::new(
            &format!("charging_{}", trna_data_id),
            TRnaCharging::new(trna_data_id),
        );
        match self.add_and_compile(reaction) {
            Ok(id) => Ok(id),
            Err(err) => {
                if added {
                    self.metabolites.shift_remove(&generic_trna);
                }
                Err(err)
            }
        }
    }

    /// Create and compile the reactions forming a generic component
    ///
    /// Alternatives each get a reaction `<component>_to_<generic>`, lumped components
    /// share the single reaction `formation_<generic>`. The generic metabolite is added
    /// to the model if it is missing.
    ///
    /// # Returns
    /// Ids of the created reactions
    pub fn create_generic_formation(&mut self, generic_data_id: &str) -> Result<Vec<String>, MeModelError> {
        let reactions: Vec<MeReaction> = match &self.data::<GenericData>(generic_data_id)?.components {
            GenericComponents::Alternatives(components) => components
                .iter()
                .map(|component| {
                    MeReaction::new(
                        &format!("{}_to_{}", component, generic_data_id),
                        GenericFormation::from_alternative(generic_data_id, component),
                    )
                })
                .collect(),
            GenericComponents::Lumped(_) => vec![MeReaction::new(
                &format!("formation_{}", generic_data_id),
                GenericFormation::lumped(generic_data_id),
            )],
        };
        let added = self.add_generic_component(generic_data_id);

        let mut created = Vec::new();
        for reaction in reactions {
            match self.add_and_compile(reaction) {
                Ok(id) => created.push(id),
                Err(err) => {
                    self.remove_created(&created)?;
                    if added {
                        self.metabolites.shift_remove(generic_data_id);
                    }
                    return Err(err);
                }
            }
        }
        Ok(created)
    }

    /// Add a generic component metabolite unless the id is taken, returns whether it was added
    fn add_generic_component(&mut self, id: &str) -> bool {
        if self.metabolites.contains_key(id) {
            return false;
        }
        log::debug!("Adding generic component {}", id);
        self.metabolites
            .insert(id.to_string(), Metabolite::new_generic_component(id));
        true
    }
    // endregion Reaction Construction

    /// Does a transcription unit make at least one stable (non mRNA) RNA
    pub fn codes_stable_rna(&self, transcription_data_id: &str) -> Result<bool, MeModelError> {
        let data = self.data::<TranscriptionData>(transcription_data_id)?;
        for rna_id in &data.rna_products {
            let gene = self.referenced_transcribed_gene(rna_id, transcription_data_id)?;
            if gene.rna_type.is_stable() {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::me_model::metabolite::RnaType;
    use crate::me_model::metabolite::MetaboliteKind;
    use crate::me_model::process_data::{
        ComplexDataBuilder, ModificationDataBuilder, TRnaDataBuilder, TranscriptionDataBuilder,
    };
    use crate::symbolic::Expression;

    /// Small model with one enzyme catalyzed reversible reaction, one
    /// irreversible spontaneous reaction and a modified complex
    pub(crate) fn setup_model() -> Model {
        let mut model = Model::new_empty();
        model
            .add_metabolites(
                ["A", "B", "C", "fe2_c", "protein_a", "protein_b", "h2o_c", "h_c"]
                    .iter()
                    .map(|id| Metabolite::new_generic(id)),
            )
            .unwrap();
        model.add_metabolite(Metabolite::new_complex("CPLX")).unwrap();
        model.add_metabolite(Metabolite::new_complex("IscS")).unwrap();
        model
            .add_metabolite(Metabolite::new_generic("prosthetic_group_biomass"))
            .unwrap();

        let mut a_to_b = StoichiometricData::new(-1000., 1000.).unwrap();
        a_to_b.set_coefficient("A", -1.);
        a_to_b.set_coefficient("B", 1.);
        model.register(ProcessData::new("A_to_B", a_to_b)).unwrap();

        let mut b_to_c = StoichiometricData::new(0., 500.).unwrap();
        b_to_c.set_coefficient("B", -2.);
        b_to_c.set_coefficient("C", 1.);
        model.register(ProcessData::new("B_to_C", b_to_c)).unwrap();

        let modification = ModificationDataBuilder::default()
            .stoichiometry([("fe2_c".to_string(), -1.)].into_iter().collect())
            .enzyme("IscS")
            .keff(10.)
            .prosthetic_group_mass(0.056)
            .build()
            .unwrap();
        model.register(ProcessData::new("mod_fe2_c", modification)).unwrap();

        let complex = ComplexDataBuilder::default()
            .stoichiometry(
                [("protein_a".to_string(), 2.), ("protein_b".to_string(), 1.)]
                    .into_iter()
                    .collect(),
            )
            .modifications([("mod_fe2_c".to_string(), 2.)].into_iter().collect())
            .build()
            .unwrap();
        model.register(ProcessData::new("CPLX", complex)).unwrap();
        model
    }

    #[test]
    fn register_and_get() {
        let mut model = setup_model();
        assert!(model.get("A_to_B").is_ok());
        assert_eq!(
            model.get("missing"),
            Err(MeModelError::NotFound("missing".to_string()))
        );
        let duplicate = ProcessData::new("A_to_B", StoichiometricData::with_default_bounds());
        assert_eq!(
            model.register(duplicate),
            Err(MeModelError::DuplicateId("A_to_B".to_string()))
        );
        assert!(matches!(
            model.data::<ComplexData>("A_to_B"),
            Err(MeModelError::WrongKind { .. })
        ));
    }

    #[test]
    fn registering_creates_no_reactions() {
        let model = setup_model();
        assert!(model.reactions().is_empty());
        assert!(model.get("A_to_B").unwrap().direct_parent_reactions().is_empty());
    }

    #[test]
    fn metabolic_reactions() {
        let mut model = setup_model();
        let created = model
            .create_metabolic_reactions("A_to_B", Some("CPLX"), 100.)
            .unwrap();
        assert_eq!(created, vec!["A_to_B_FWD_CPLX", "A_to_B_REV_CPLX"]);

        let forward = model.reaction("A_to_B_FWD_CPLX").unwrap();
        assert_eq!(forward.coefficient("A"), Some(&Expression::constant(-1.)));
        assert_eq!(forward.coefficient("B"), Some(&Expression::constant(1.)));
        let coupling = forward.coefficient("CPLX").unwrap().substitute(0.5);
        assert!((coupling + 0.5 / (100. * 3600.)).abs() < 1e-15);
        assert_eq!((forward.lower_bound(), forward.upper_bound()), (0., 1000.));

        let reverse = model.reaction("A_to_B_REV_CPLX").unwrap();
        assert_eq!(reverse.coefficient("A"), Some(&Expression::constant(1.)));
        assert_eq!(reverse.coefficient("B"), Some(&Expression::constant(-1.)));
        assert_eq!((reverse.lower_bound(), reverse.upper_bound()), (0., 1000.));

        let parents = model.get("A_to_B").unwrap().direct_parent_reactions();
        assert_eq!(parents.len(), 2);
        assert!(model
            .get("CPLX")
            .unwrap()
            .direct_parent_reactions()
            .contains("A_to_B_FWD_CPLX"));
    }

    #[test]
    fn spontaneous_irreversible() {
        let mut model = setup_model();
        let created = model.create_metabolic_reactions("B_to_C", None, 65.).unwrap();
        assert_eq!(created, vec!["B_to_C_FWD_SPONT"]);
        let reaction = model.reaction("B_to_C_FWD_SPONT").unwrap();
        assert_eq!(reaction.metabolites().len(), 2);
        assert_eq!(reaction.reaction_string_at(0.1), "2 B --> 1 C");
    }

    #[test]
    fn complex_formation() {
        let mut model = setup_model();
        let id = model.create_complex_formation("CPLX").unwrap();
        assert_eq!(id, "formation_CPLX");
        let mu = 0.2;
        let metabolites = model.reaction(&id).unwrap().metabolites_at(mu);
        assert_eq!(metabolites["protein_a"], -2.);
        assert_eq!(metabolites["protein_b"], -1.);
        assert_eq!(metabolites["CPLX"], 1.);
        assert_eq!(metabolites["fe2_c"], -2.);
        assert!((metabolites["IscS"] + 2. * mu / (10. * 3600.)).abs() < 1e-15);
        assert!((metabolites["prosthetic_group_biomass"] - 0.112).abs() < 1e-12);
    }

    #[test]
    fn missing_metabolite_is_dangling() {
        let mut model = setup_model();
        let mut data = StoichiometricData::new(0., 10.).unwrap();
        data.set_coefficient("A", -1.);
        data.set_coefficient("not_a_metabolite", 1.);
        model.register(ProcessData::new("A_to_X", data)).unwrap();
        let result = model.create_metabolic_reactions("A_to_X", None, 65.);
        assert_eq!(
            result,
            Err(MeModelError::DanglingReference {
                id: "not_a_metabolite".to_string(),
                referenced_by: "A_to_X_FWD_SPONT".to_string(),
            })
        );
        assert!(model.reactions().is_empty());
        assert!(model.get("A_to_X").unwrap().direct_parent_reactions().is_empty());
    }

    #[test]
    fn missing_modification_is_dangling() {
        let mut model = setup_model();
        model
            .data_mut::<ComplexData>("CPLX")
            .unwrap()
            .modifications
            .insert("mod_missing".to_string(), 1.);
        assert!(matches!(
            model.create_complex_formation("CPLX"),
            Err(MeModelError::DanglingReference { id, .. }) if id == "mod_missing"
        ));
    }

    #[test]
    fn remove_process_data_in_use() {
        let mut model = setup_model();
        model.create_metabolic_reactions("B_to_C", None, 65.).unwrap();
        assert!(matches!(
            model.remove_process_data("B_to_C"),
            Err(MeModelError::InUse { .. })
        ));
        model.remove_reaction("B_to_C_FWD_SPONT").unwrap();
        assert!(model.remove_process_data("B_to_C").is_ok());
        assert!(model.get("B_to_C").is_err());
    }

    #[test]
    fn failed_update_keeps_previous_state() {
        let mut model = setup_model();
        model.create_metabolic_reactions("B_to_C", None, 65.).unwrap();
        let before = model.reaction("B_to_C_FWD_SPONT").unwrap().clone();
        model
            .data_mut::<StoichiometricData>("B_to_C")
            .unwrap()
            .set_coefficient("missing", 1.);
        assert!(model.update_reaction("B_to_C_FWD_SPONT").is_err());
        assert_eq!(model.reaction("B_to_C_FWD_SPONT").unwrap(), &before);
    }

    #[test]
    fn stable_rna() {
        let mut model = setup_model();
        model
            .add_metabolite(Metabolite::new_transcribed_gene("RNA_a", RnaType::MRna, "ATG"))
            .unwrap();
        model
            .add_metabolite(Metabolite::new_transcribed_gene("RNA_t", RnaType::TRna, "GGC"))
            .unwrap();
        let transcription = TranscriptionDataBuilder::default()
            .nucleotide_sequence("ATGGGC")
            .rna_products(["RNA_a".to_string(), "RNA_t".to_string()].into_iter().collect())
            .build()
            .unwrap();
        model.register(ProcessData::new("TU_1", transcription)).unwrap();
        assert!(model.codes_stable_rna("TU_1").unwrap());
        model.data_mut::<TranscriptionData>("TU_1").unwrap().rna_products.shift_remove("RNA_t");
        assert!(!model.codes_stable_rna("TU_1").unwrap());
    }

    #[test]
    fn registered_records_start_unlinked() {
        let mut model = setup_model();
        let json = r#"{"id": "CPLX_2", "parent_reactions": ["ghost_rxn"],
            "kind": {"Complex": {"stoichiometry": {}, "modifications": {}, "complex_id": null}}}"#;
        let data: ProcessData = serde_json::from_str(json).unwrap();
        model.register(data).unwrap();
        assert!(model.get("CPLX_2").unwrap().direct_parent_reactions().is_empty());
        assert!(model.update_parent_reactions("CPLX_2").unwrap().is_empty());

        // a record copied from another model leaves that model's links behind
        let mut other = setup_model();
        other.create_metabolic_reactions("B_to_C", None, 65.).unwrap();
        let copied = other.get("B_to_C").unwrap().clone();
        assert_eq!(copied.direct_parent_reactions().len(), 1);
        model.remove_process_data("B_to_C").unwrap();
        model.register(copied).unwrap();
        assert!(model.get("B_to_C").unwrap().direct_parent_reactions().is_empty());
        assert!(model.remove_process_data("B_to_C").is_ok());
    }

    #[test]
    fn failed_demands_are_removed() {
        let mut model = setup_model();
        model
            .add_metabolite(Metabolite::new_transcribed_gene("RNA_a", RnaType::MRna, "ATG"))
            .unwrap();
        let transcription = TranscriptionDataBuilder::default()
            .nucleotide_sequence("ATGGGC")
            .rna_products(["RNA_a".to_string(), "RNA_missing".to_string()].into_iter().collect())
            .build()
            .unwrap();
        model.register(ProcessData::new("TU_1", transcription)).unwrap();

        assert!(matches!(
            model.create_rna_demands("TU_1"),
            Err(MeModelError::DanglingReference { id, .. }) if id == "RNA_missing"
        ));
        assert!(model.reaction("DM_RNA_a").is_err());
        assert!(model.get("TU_1").unwrap().direct_parent_reactions().is_empty());
    }

    #[test]
    fn metabolite_id_matches_key() {
        let mut model = setup_model();
        model.metabolite_mut("A").unwrap().name = Some("alpha".to_string());
        for (key, metabolite) in model.metabolites() {
            assert_eq!(key, metabolite.id());
        }
    }

    /// setup_model with a tRNA, its amino acid and a synthetase made of two protein_a
    fn trna_model() -> Model {
        let mut model = setup_model();
        model
            .add_metabolite(Metabolite::new_transcribed_gene("RNA_t", RnaType::TRna, "GGC"))
            .unwrap();
        model.add_metabolite(Metabolite::new_generic("ser__L_c")).unwrap();
        let synthetase = ComplexDataBuilder::default()
            .stoichiometry([("protein_a".to_string(), 2.)].into_iter().collect())
            .build()
            .unwrap();
        model.register(ProcessData::new("SerS", synthetase)).unwrap();
        let trna = TRnaDataBuilder::default()
            .amino_acid("ser__L_c")
            .rna("RNA_t")
            .codon("AGC")
            .synthetase("SerS")
            .trna_keff(10.)
            .synthetase_keff(20.)
            .build()
            .unwrap();
        model.register(ProcessData::new("RNA_t_AGC", trna)).unwrap();
        model
    }

    #[test]
    fn trna_charging() {
        let mut model = trna_model();
        let id = model.create_trna_charging("RNA_t_AGC").unwrap();
        assert_eq!(id, "charging_RNA_t_AGC");
        assert_eq!(
            model.metabolite("generic_tRNA_ser__L_c").unwrap().kind,
            MetaboliteKind::GenericComponent
        );

        let mu = 0.6;
        let metabolites = model.reaction(&id).unwrap().metabolites_at(mu);
        let trna_amount = mu / (10. * 3600.);
        assert_eq!(metabolites["generic_tRNA_ser__L_c"], 1.);
        assert!((metabolites["RNA_t"] + trna_amount).abs() < 1e-15);
        assert!((metabolites["ser__L_c"] + trna_amount).abs() < 1e-15);
        let synthetase_amount = mu / (20. * 3600.) * (1. + trna_amount);
        assert!((metabolites["protein_a"] + 2. * synthetase_amount).abs() < 1e-15);
        assert_eq!(metabolites.len(), 4);
    }

    #[test]
    fn synthetase_edit_reaches_charging() {
        let mut model = trna_model();
        model.create_trna_charging("RNA_t_AGC").unwrap();
        assert!(model.parent_reactions("SerS").unwrap().contains("charging_RNA_t_AGC"));

        model
            .data_mut::<ComplexData>("SerS")
            .unwrap()
            .stoichiometry
            .insert("protein_b".to_string(), 1.);
        model.update_parent_reactions("SerS").unwrap();
        let metabolites = model.reaction("charging_RNA_t_AGC").unwrap().metabolites_at(1.);
        assert!(metabolites["protein_b"] < 0.);
    }

    #[test]
    fn failed_charging_leaves_no_generic_trna() {
        let mut model = trna_model();
        model.data_mut::<TRnaData>("RNA_t_AGC").unwrap().rna = "RNA_missing".to_string();
        assert!(model.create_trna_charging("RNA_t_AGC").is_err());
        assert!(!model.has_metabolite("generic_tRNA_ser__L_c"));
        assert!(model.reactions().is_empty());
    }

    #[test]
    fn generic_alternatives() {
        let mut model = setup_model();
        let generic = GenericData::alternatives(["protein_a", "protein_b"]);
        model.register(ProcessData::new("generic_prot", generic)).unwrap();
        let created = model.create_generic_formation("generic_prot").unwrap();
        assert_eq!(created, vec!["protein_a_to_generic_prot", "protein_b_to_generic_prot"]);

        let metabolites = model.reaction("protein_b_to_generic_prot").unwrap().metabolites_at(0.1);
        assert_eq!(metabolites["protein_b"], -1.);
        assert_eq!(metabolites["generic_prot"], 1.);
        assert_eq!(metabolites.len(), 2);
        assert_eq!(model.get("generic_prot").unwrap().direct_parent_reactions().len(), 2);
    }

    #[test]
    fn generic_lumped() {
        let mut model = setup_model();
        let generic = GenericData::lumped([("protein_a", 1.), ("protein_b", 2.)]);
        model.register(ProcessData::new("generic_Dus", generic)).unwrap();
        let created = model.create_generic_formation("generic_Dus").unwrap();
        assert_eq!(created, vec!["formation_generic_Dus"]);

        let metabolites = model.reaction("formation_generic_Dus").unwrap().metabolites_at(0.1);
        assert_eq!(metabolites["protein_a"], -1.);
        assert_eq!(metabolites["protein_b"], -2.);
        assert_eq!(metabolites["generic_Dus"], 1.);
    }

    #[test]
    fn generic_with_missing_component_is_rolled_back() {
        let mut model = setup_model();
        let generic = GenericData::alternatives(["protein_a", "protein_missing"]);
        model.register(ProcessData::new("generic_prot", generic)).unwrap();
        assert!(matches!(
            model.create_generic_formation("generic_prot"),
            Err(MeModelError::DanglingReference { id, .. }) if id == "protein_missing"
        ));
        assert!(model.reactions().is_empty());
        assert!(!model.has_metabolite("generic_prot"));
    }
}
