// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Fermi-Dirac statistics

/// Occupation of a state at `energy` for the given Fermi level and thermal energy `kt`
pub fn fermi_dirac(energy: f64, fermi_level: f64, kt: f64) -> f64 {
    let x = (energy - fermi_level) / kt;
    // Written in terms of exp(-|x|) so neither tail overflows
    if x > 0. {
        let e = (-x).exp();
        e / (1. + e)
    } else {
        1. / (1. + x.exp())
    }
}

/// The product `f (1 - f)`, equal to `-kT df/dE`
///
/// Peaks at 1/4 on the Fermi level and vanishes smoothly in both tails. The hole occupation
/// `1 - f` is taken as the occupation of the state mirrored through the Fermi level, so no
/// precision is lost by cancellation far above it.
pub fn fermi_dirac_spread(energy: f64, fermi_level: f64, kt: f64) -> f64 {
    fermi_dirac(energy, fermi_level, kt) * fermi_dirac(2. * fermi_level - energy, fermi_level, kt)
}
