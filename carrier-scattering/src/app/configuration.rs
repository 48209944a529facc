// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::{
    constants::UnitSystem,
    material::MaterialProperties,
    scattering::{MechanismBuilder, MechanismKind, ScatteringMechanism, TracingProgress},
    screening::ScreeningCalculator,
    ScatteringError,
};
use carrier_bands::ElectronicStructure;
use config::{Config, File};
use serde::Deserialize;
use std::{env, path::Path};

/// A scattering calculation as described by a TOML file
///
/// ```toml
/// mechanisms = ["CRT", "IMP"]
///
/// [material]
/// constant_relaxation_time = 1e-14
/// acceptor_charge = 1.0
/// donor_charge = 1.0
/// static_dielectric = 12.9
/// ```
///
/// An optional `[units]` table overrides `length_per_nanometre` and `time_per_second`.
#[derive(Debug, Deserialize)]
pub struct Configuration {
    /// The `[material]` table
    pub material: MaterialProperties,
    /// Short names of the mechanisms to build
    pub mechanisms: Vec<MechanismKind>,
    /// The `[units]` table, atomic units when absent
    #[serde(default)]
    pub units: UnitSystem,
}

impl Configuration {
    /// Reads the configuration at `path`
    ///
    /// Values can be overridden from a file named after the `RUN_MODE` environment variable
    /// (`development` when unset) in the same directory, `development.toml` for example.
    pub fn build(path: impl AsRef<Path>) -> Result<Self, ScatteringError> {
        let path = path.as_ref();
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(File::from(path))
            // The override is optional
            .add_source(File::from(path.with_file_name(format!("{run_mode}.toml"))).required(false))
            .build()?;

        let configuration: Self = s.try_deserialize()?;
        tracing::debug!(
            "Read {} mechanism(s) and {} material properties from {}",
            configuration.mechanisms.len(),
            configuration.material.len(),
            path.display()
        );
        Ok(configuration)
    }

    /// Builds every configured mechanism, in the order they are listed
    ///
    /// Impurity screening is computed from the density of states unless `screening` is given.
    pub fn build_mechanisms(
        &self,
        structure: &ElectronicStructure,
        screening: Option<&dyn ScreeningCalculator>,
    ) -> Result<Vec<Box<dyn ScatteringMechanism>>, ScatteringError> {
        let mut builder = MechanismBuilder::new()
            .with_material_properties(&self.material)
            .with_electronic_structure(structure)
            .with_units(self.units)
            .with_observer(&TracingProgress);
        if let Some(screening) = screening {
            builder = builder.with_screening(screening);
        }
        self.mechanisms
            .iter()
            .map(|&kind| builder.build_kind(kind))
            .collect()
    }
}
