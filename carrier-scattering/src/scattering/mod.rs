// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # Scattering
//!
//! Scattering mechanisms turn the tensors of an `ElectronicStructure` into relaxation rates, one
//! per (doping, temperature, band, k-point) for each spin channel. Every mechanism computes its
//! rates once, when it is built, and exposes them read-only afterwards.
//!
//! Mechanisms are constructed through a `MechanismBuilder`
//!
//! ```ignore
//! let mechanism = MechanismBuilder::new()
//!     .with_material_properties(&properties)
//!     .with_electronic_structure(&structure)
//!     .build::<BrooksHerringScattering>()?;
//! ```
//!
//! or from a short name through `MechanismKind`.

mod brooks_herring;
mod constant;
mod mean_free_path;
mod observer;
mod velocity;

pub use brooks_herring::BrooksHerringScattering;
pub use constant::ConstantRelaxationTime;
pub use mean_free_path::MeanFreePathScattering;
pub use observer::{NoProgress, ProgressObserver, TracingProgress};

use crate::{
    constants::UnitSystem,
    material::{MaterialProperties, PropertySet},
    screening::{DosScreening, ScreeningCalculator},
    ScatteringError,
};
use carrier_bands::{ElectronicStructure, Spin, SpinChannel, SpinMap};
use ndarray::{Array1, Array2, Array4, ArrayView4};
use rayon::prelude::*;
use serde::Deserialize;
use std::{fmt, str::FromStr};

/// Rates for each spin channel, each of shape (ndoping, ntemperatures, nbands, nkpoints)
pub type Rates = SpinMap<Array4<f64>>;

/// Read access to a built scattering mechanism
///
/// The trait is object safe, so heterogeneous mechanisms can be held as
/// `Box<dyn ScatteringMechanism>`.
pub trait ScatteringMechanism: Send + Sync {
    /// The state common to all mechanisms
    fn base(&self) -> &MechanismBase;

    /// The rates in inverse seconds
    fn rates(&self) -> &Rates;

    /// The short name of the mechanism, as used in configuration files
    fn name(&self) -> &'static str {
        self.base().name
    }

    /// The material properties the mechanism needs
    fn required_properties(&self) -> &'static [&'static str] {
        self.base().required_properties
    }

    /// The values of the required properties, as supplied
    fn properties(&self) -> &PropertySet {
        &self.base().properties
    }

    /// Signed doping concentrations per cubic bohr
    fn doping(&self) -> &Array1<f64> {
        &self.base().doping
    }

    /// Temperatures in kelvin
    fn temperatures(&self) -> &Array1<f64> {
        &self.base().temperatures
    }

    /// The number of bands in the channel of `spin`, if the channel exists
    fn nbands(&self, spin: Spin) -> Option<usize> {
        self.base().nbands.get(&spin).copied()
    }

    /// The spin channels with rates, in ascending order
    fn spins(&self) -> &[Spin] {
        &self.base().spins
    }
}

/// Construction of a mechanism from its extracted properties and the electronic structure
pub trait BuildMechanism: ScatteringMechanism + Sized {
    /// The short name of the mechanism
    const NAME: &'static str;
    /// The keys the mechanism extracts from the material properties
    const REQUIRED_PROPERTIES: &'static [&'static str];

    /// Computes the rates for every spin channel in `context.structure`
    fn build(base: MechanismBase, context: &MechanismContext<'_>) -> Result<Self, ScatteringError>;
}

/// State shared by every mechanism, captured from the inputs at construction
#[derive(Clone, Debug)]
pub struct MechanismBase {
    name: &'static str,
    required_properties: &'static [&'static str],
    properties: PropertySet,
    doping: Array1<f64>,
    temperatures: Array1<f64>,
    nbands: SpinMap<usize>,
    spins: Vec<Spin>,
}

impl MechanismBase {
    /// Extracts the `required_properties` and copies the grids out of `structure`
    pub fn new(
        name: &'static str,
        required_properties: &'static [&'static str],
        material: &MaterialProperties,
        structure: &ElectronicStructure,
    ) -> Result<Self, ScatteringError> {
        let properties = material.extract(name, required_properties)?;
        Ok(Self {
            name,
            required_properties,
            properties,
            doping: structure.doping().clone(),
            temperatures: structure.temperatures().clone(),
            nbands: structure
                .channels()
                .map(|(spin, channel)| (spin, channel.number_of_bands()))
                .collect(),
            spins: structure.spins(),
        })
    }

    /// The extracted material properties
    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }
}

/// Everything a mechanism may read while it computes its rates
pub struct MechanismContext<'a> {
    /// The dataset the rates are computed on
    pub structure: &'a ElectronicStructure,
    /// Conversion of material properties to internal units
    pub units: UnitSystem,
    /// Source of β² for impurity scattering
    pub screening: &'a dyn ScreeningCalculator,
    /// Receives progress for each spin channel
    pub observer: &'a dyn ProgressObserver,
}

impl<'a> MechanismContext<'a> {
    /// Runs `compute` for each spin channel in parallel
    ///
    /// The observer hears about every spin as it completes. Results are gathered into an ordered
    /// map so the output does not depend on scheduling.
    pub(crate) fn compute_per_spin<F>(
        &self,
        name: &'static str,
        compute: F,
    ) -> Result<Rates, ScatteringError>
    where
        F: Fn(Spin, &SpinChannel) -> Result<Array4<f64>, ScatteringError> + Sync,
    {
        let channels = self.structure.channels().collect::<Vec<_>>();
        self.observer.mechanism_started(name, channels.len());
        let rates = channels
            .par_iter()
            .map(|&(spin, channel)| -> Result<_, ScatteringError> {
                let rates = compute(spin, channel)?;
                self.observer.spin_completed(name, spin);
                Ok((spin, rates))
            })
            .collect::<Result<Rates, ScatteringError>>()?;
        self.observer.mechanism_finished(name);
        Ok(rates)
    }
}

/// Repeats a (band, k-point) tensor over every (doping, temperature) pair
pub(crate) fn broadcast_over_grid(
    tensor: &Array2<f64>,
    (ndoping, ntemperatures): (usize, usize),
) -> Result<ArrayView4<'_, f64>, ScatteringError> {
    let (nbands, nkpoints) = tensor.dim();
    let shape = (ndoping, ntemperatures, nbands, nkpoints);
    tensor
        .broadcast(shape)
        .ok_or_else(|| ScatteringError::InconsistentShape {
            quantity: "doping and temperature broadcast".into(),
            expected: vec![ndoping, ntemperatures, nbands, nkpoints],
            found: tensor.shape().to_vec(),
        })
}

/// Typestate builder for scattering mechanisms
///
/// The material properties and the electronic structure must both be supplied before `build` is
/// available. Screening, units and the progress observer are optional.
pub struct MechanismBuilder<'a, RefProperties, RefStructure> {
    properties: RefProperties,
    structure: RefStructure,
    units: UnitSystem,
    screening: Option<&'a dyn ScreeningCalculator>,
    observer: Option<&'a dyn ProgressObserver>,
}

impl<'a> MechanismBuilder<'a, (), ()> {
    /// An empty builder
    pub fn new() -> Self {
        Self {
            properties: (),
            structure: (),
            units: UnitSystem::default(),
            screening: None,
            observer: None,
        }
    }
}

impl<'a> Default for MechanismBuilder<'a, (), ()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, RefProperties, RefStructure> MechanismBuilder<'a, RefProperties, RefStructure> {
    /// Attaches the material properties the mechanism reads its parameters from
    pub fn with_material_properties<Properties>(
        self,
        properties: &Properties,
    ) -> MechanismBuilder<'a, &Properties, RefStructure> {
        MechanismBuilder {
            properties,
            structure: self.structure,
            units: self.units,
            screening: self.screening,
            observer: self.observer,
        }
    }

    /// Attaches the electronic structure the rates are computed on
    pub fn with_electronic_structure<Structure>(
        self,
        structure: &Structure,
    ) -> MechanismBuilder<'a, RefProperties, &Structure> {
        MechanismBuilder {
            properties: self.properties,
            structure,
            units: self.units,
            screening: self.screening,
            observer: self.observer,
        }
    }

    /// Overrides the conversion from user-facing to internal units, atomic units by default
    pub fn with_units(mut self, units: UnitSystem) -> Self {
        self.units = units;
        self
    }

    /// Overrides the screening used by impurity scattering, `DosScreening` by default
    pub fn with_screening(mut self, screening: &'a dyn ScreeningCalculator) -> Self {
        self.screening = Some(screening);
        self
    }

    /// Attaches an observer notified as each spin channel completes
    pub fn with_observer(mut self, observer: &'a dyn ProgressObserver) -> Self {
        self.observer = Some(observer);
        self
    }
}

impl<'a> MechanismBuilder<'a, &MaterialProperties, &ElectronicStructure> {
    /// Builds a mechanism of type `M`
    pub fn build<M: BuildMechanism>(&self) -> Result<M, ScatteringError> {
        tracing::info!("Building {} scattering", M::NAME);
        let base = MechanismBase::new(
            M::NAME,
            M::REQUIRED_PROPERTIES,
            self.properties,
            self.structure,
        )?;
        let context = MechanismContext {
            structure: self.structure,
            units: self.units,
            screening: self.screening.unwrap_or(&DosScreening),
            observer: self.observer.unwrap_or(&NoProgress),
        };
        M::build(base, &context)
    }

    /// Builds the mechanism named by `kind`
    pub fn build_kind(
        &self,
        kind: MechanismKind,
    ) -> Result<Box<dyn ScatteringMechanism>, ScatteringError> {
        Ok(match kind {
            MechanismKind::Crt => Box::new(self.build::<ConstantRelaxationTime>()?),
            MechanismKind::Mfp => Box::new(self.build::<MeanFreePathScattering>()?),
            MechanismKind::Imp => Box::new(self.build::<BrooksHerringScattering>()?),
        })
    }
}

/// The implemented mechanisms, addressed by their short names
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub enum MechanismKind {
    /// Constant relaxation time, "CRT"
    Crt,
    /// Mean free path, "MFP"
    Mfp,
    /// Brooks-Herring ionized impurity scattering, "IMP"
    Imp,
}

impl MechanismKind {
    /// Every implemented mechanism
    pub const ALL: [MechanismKind; 3] = [Self::Crt, Self::Mfp, Self::Imp];

    /// The short name, "CRT", "MFP" or "IMP"
    pub fn name(&self) -> &'static str {
        match self {
            Self::Crt => ConstantRelaxationTime::NAME,
            Self::Mfp => MeanFreePathScattering::NAME,
            Self::Imp => BrooksHerringScattering::NAME,
        }
    }

    /// The material properties the mechanism needs
    pub fn required_properties(&self) -> &'static [&'static str] {
        match self {
            Self::Crt => ConstantRelaxationTime::REQUIRED_PROPERTIES,
            Self::Mfp => MeanFreePathScattering::REQUIRED_PROPERTIES,
            Self::Imp => BrooksHerringScattering::REQUIRED_PROPERTIES,
        }
    }
}

impl fmt::Display for MechanismKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for MechanismKind {
    type Err = ScatteringError;

    /// Names are matched case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ScatteringError::UnknownMechanism(s.to_string()))
    }
}

impl TryFrom<String> for MechanismKind {
    type Error = ScatteringError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
