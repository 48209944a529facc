// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Carrier scattering rates from a precomputed electronic structure
//!
//! # Overview
//! Transport calculations in the relaxation time approximation need a scattering rate for every
//! carrier state. This crate computes those rates for interchangeable physical mechanisms, each
//! turning the band energies, group velocities and effective masses of an
//! [`ElectronicStructure`](carrier_bands::ElectronicStructure) into a tensor of rates over
//! (doping, temperature, band, k-point) for every spin channel. Mechanisms evaluate their physics
//! on the symmetry-irreducible k-points and expand the result onto the full mesh.
//!
//! The implemented mechanisms are
//! - a constant relaxation time (`CRT`),
//! - a constant mean free path (`MFP`),
//! - Brooks-Herring ionized impurity scattering (`IMP`).
//!
//! # Usage
//! Mechanisms are built from a dataset and a set of material properties
//!
//! ```ignore
//! let properties = MaterialProperties::new()
//!     .with("acceptor_charge", 1.)
//!     .with("donor_charge", 1.)
//!     .with("static_dielectric", 12.9);
//! let impurity = MechanismBuilder::new()
//!     .with_material_properties(&properties)
//!     .with_electronic_structure(&structure)
//!     .build::<BrooksHerringScattering>()?;
//! let rates = &impurity.rates()[&Spin::Up];
//! ```
//!
//! or listed by name in a `.toml` file read through [`app::Configuration`].

#![warn(missing_docs)]

/// Configuration files and tracing set-up
pub mod app;

/// Physical constants and unit conversion
pub mod constants;

/// Normalised energies and density-of-states effective masses
pub mod energetics;

/// Error handling
mod error;

/// Fermi-Dirac statistics
pub mod fermi;

/// Material properties
mod material;

/// The scattering mechanisms
pub mod scattering;

/// Screening of ionized impurities
pub mod screening;

pub use error::*;
pub use material::{MaterialProperties, PropertySet};
pub use scattering::{
    BrooksHerringScattering, BuildMechanism, ConstantRelaxationTime, MeanFreePathScattering,
    MechanismBuilder, MechanismKind, ScatteringMechanism,
};
pub use screening::{DosScreening, FixedScreening, ScreeningCalculator};
