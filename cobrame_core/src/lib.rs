//! Core rust implementation of cobrame, a crate for building models of metabolism and
//! expression (ME-models).
//!
//! Reactions of an ME-model are compiled from biological parameter records
//! ([`me_model::process_data::ProcessData`]). Coupling coefficients are expressions
//! in the growth rate μ ([`symbolic::Expression`]), and much of the stoichiometry of
//! transcription and translation is derived from nucleotide sequences ([`sequence`]).

pub mod configuration;
pub mod me_model;
pub mod optimize;
pub mod sequence;
pub mod symbolic;
