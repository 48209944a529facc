// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # Constants
//!
//! Defines physical constants and unit conversions used in the rate calculations. The electronic
//! structure is held in Hartree atomic units, rates are reported per second.

use serde::Deserialize;

/// The Bohr radius in cm
pub const BOHR_RADIUS_IN_CM: f64 = 5.29177210903e-9;
/// hbar / Hartree in s
pub const ATOMIC_TIME_IN_SECONDS: f64 = 2.4188843265857e-17;
/// The Boltzmann constant in Hartree / K
pub const BOLTZMANN_HARTREE: f64 = 3.166811563455e-6;
/// One nanometre in bohr
pub const NANOMETRE_IN_BOHR: f64 = 1e-7 / BOHR_RADIUS_IN_CM;

/// Group velocities below this magnitude (bohr per atomic time unit) are raised to it
pub const VELOCITY_FLOOR: f64 = 0.005;
/// Normalised energies below this (Hartree) are treated as lying on the band edge
pub const BAND_EDGE_TOLERANCE: f64 = 1e-8;

/// Conversion factors from the user-facing units of material properties to the internal units
/// of the electronic structure
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct UnitSystem {
    /// Internal length units in one nanometre
    pub length_per_nanometre: f64,
    /// Internal time units in one second
    pub time_per_second: f64,
}

impl UnitSystem {
    /// Hartree atomic units: lengths in bohr and times in hbar / Hartree
    pub const ATOMIC: UnitSystem = UnitSystem {
        length_per_nanometre: NANOMETRE_IN_BOHR,
        time_per_second: 1. / ATOMIC_TIME_IN_SECONDS,
    };
}

impl Default for UnitSystem {
    fn default() -> Self {
        Self::ATOMIC
    }
}

/// Converts a concentration per cubic bohr to one per cubic centimetre
pub(crate) fn per_bohr_cubed_to_per_cm_cubed(concentration: f64) -> f64 {
    concentration / BOHR_RADIUS_IN_CM.powi(3)
}
