//! Process wide defaults used when building records and reactions
use std::fs;
use std::path::Path;
use std::sync::{LazyLock, RwLock};

use serde::{Deserialize, Serialize};

pub static CONFIGURATION: LazyLock<RwLock<Configuration>> =
    LazyLock::new(|| RwLock::new(Configuration::default()));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Default lower flux bound for new stoichiometric data
    pub lower_bound: f64,
    /// Default upper flux bound for new stoichiometric data
    pub upper_bound: f64,
    /// Values smaller than this (in magnitude) are dropped from exported matrices
    pub tolerance: f64,
    /// Default effective turnover rate in per second
    pub default_keff: f64,
    /// Default number of proteins translated from a single mRNA
    pub protein_per_mrna: f64,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            lower_bound: -1000.,
            upper_bound: 1000.,
            tolerance: 1e-07,
            default_keff: 65.,
            protein_per_mrna: 1.,
        }
    }
}

impl Configuration {
    /// Load a configuration from a JSON file, falling back to the defaults
    /// if the file is missing or can't be parsed
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(path.as_ref()) {
            Ok(contents) => match serde_json::from_str::<Configuration>(&contents) {
                Ok(config) => {
                    log::info!("Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(e) => {
                    log::warn!("Failed to parse configuration: {}, using defaults", e);
                    Configuration::default()
                }
            },
            Err(_) => {
                log::info!("Configuration file not found, using defaults");
                Configuration::default()
            }
        }
    }

    /// Replace the process wide configuration
    pub fn install(self) {
        match CONFIGURATION.write() {
            Ok(mut guard) => *guard = self,
            Err(poisoned) => *poisoned.into_inner() = self,
        }
    }
}

/// Read a value out of the process wide configuration, tolerating a poisoned lock
pub(crate) fn read_configuration<T>(f: impl FnOnce(&Configuration) -> T) -> T {
    match CONFIGURATION.read() {
        Ok(guard) => f(&guard),
        Err(poisoned) => f(&poisoned.into_inner()),
    }
}
