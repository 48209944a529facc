// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # Energetics
//!
//! Band energies measured from the relevant reference level, and density-of-states effective
//! masses. Both are evaluated on the irreducible k-points only.

use crate::{scattering::broadcast_over_grid, ScatteringError};
use carrier_bands::{ElectronicStructure, KpointMapping, Regime, Spin, SpinChannel, SpinMap};
use ndarray::{s, Array2, Array4, Axis};
use ndarray_stats::QuantileExt;

/// The level energies are measured from
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum EnergyReference {
    /// Metals measure every band from the intrinsic Fermi level
    Intrinsic(f64),
    /// Semiconductors measure valence bands down from the valence band maximum and conduction
    /// bands up from the conduction band minimum, both taken across all spins
    BandEdges {
        /// Highest valence band energy in Hartree
        valence_band_maximum: f64,
        /// Lowest conduction band energy in Hartree
        conduction_band_minimum: f64,
    },
}

impl EnergyReference {
    /// The reference appropriate to the regime of `structure`
    ///
    /// Fails for a semiconductor without a valence band index or without any conduction band.
    pub fn from_structure(structure: &ElectronicStructure) -> Result<Self, ScatteringError> {
        match structure.regime() {
            Regime::Metal {
                intrinsic_fermi_level,
            } => Ok(Self::Intrinsic(*intrinsic_fermi_level)),
            Regime::Semiconductor { .. } => {
                let mut valence_band_maximum = f64::NEG_INFINITY;
                let mut conduction_band_minimum = f64::INFINITY;
                for (spin, channel) in structure.channels() {
                    let vb_idx = valence_band_index(structure, spin)?;
                    let valence = channel.energies.slice(s![..=vb_idx, ..]);
                    let maximum = valence.max().map_err(|e| {
                        ScatteringError::BandEdges(format!("valence bands of spin {spin}: {e}"))
                    })?;
                    valence_band_maximum = valence_band_maximum.max(*maximum);

                    let conduction = channel.energies.slice(s![vb_idx + 1.., ..]);
                    if !conduction.is_empty() {
                        let minimum = conduction.min().map_err(|e| {
                            ScatteringError::BandEdges(format!(
                                "conduction bands of spin {spin}: {e}"
                            ))
                        })?;
                        conduction_band_minimum = conduction_band_minimum.min(*minimum);
                    }
                }
                if !conduction_band_minimum.is_finite() {
                    return Err(ScatteringError::BandEdges(
                        "no spin channel has a conduction band".into(),
                    ));
                }
                tracing::debug!(
                    "Band edges: VBM = {:.6} Ha, CBM = {:.6} Ha",
                    valence_band_maximum,
                    conduction_band_minimum
                );
                Ok(Self::BandEdges {
                    valence_band_maximum,
                    conduction_band_minimum,
                })
            }
        }
    }
}

fn valence_band_index(structure: &ElectronicStructure, spin: Spin) -> Result<usize, ScatteringError> {
    structure
        .vb_idx(spin)
        .ok_or_else(|| ScatteringError::BandEdges(format!("no valence band index for spin {spin}")))
}

/// Normalised energies for every spin, each of shape (ndoping, ntemperatures, nbands, n_ir_kpoints)
///
/// The doping and temperature axes only repeat the same values, the reference level does not
/// depend on them.
pub fn normalised_energies(
    structure: &ElectronicStructure,
) -> Result<SpinMap<Array4<f64>>, ScatteringError> {
    let reference = EnergyReference::from_structure(structure)?;
    structure
        .channels()
        .map(|(spin, channel)| -> Result<_, ScatteringError> {
            Ok((
                spin,
                normalise_channel(structure, &reference, spin, channel)?,
            ))
        })
        .collect()
}

pub(crate) fn normalise_channel(
    structure: &ElectronicStructure,
    reference: &EnergyReference,
    spin: Spin,
    channel: &SpinChannel,
) -> Result<Array4<f64>, ScatteringError> {
    let mut energies = structure.kpoint_mapping().restrict(&channel.energies)?;
    match *reference {
        EnergyReference::Intrinsic(fermi_level) => {
            energies.mapv_inplace(|energy| (energy - fermi_level).abs())
        }
        EnergyReference::BandEdges {
            valence_band_maximum,
            conduction_band_minimum,
        } => {
            let vb_idx = valence_band_index(structure, spin)?;
            let (mut valence, mut conduction) = energies.view_mut().split_at(Axis(0), vb_idx + 1);
            valence.mapv_inplace(|energy| valence_band_maximum - energy);
            conduction.mapv_inplace(|energy| energy - conduction_band_minimum);
        }
    }
    Ok(broadcast_over_grid(&energies, structure.grid_shape())?.to_owned())
}

/// DOS effective masses for every spin, each of shape (nbands, n_ir_kpoints)
pub fn dos_effective_masses(
    structure: &ElectronicStructure,
) -> Result<SpinMap<Array2<f64>>, ScatteringError> {
    structure
        .channels()
        .map(|(spin, channel)| -> Result<_, ScatteringError> {
            Ok((
                spin,
                channel_dos_effective_masses(structure.kpoint_mapping(), channel)?,
            ))
        })
        .collect()
}

/// The geometric mean of the absolute principal masses, `(|m_xx| |m_yy| |m_zz|)^(1/3)`
pub(crate) fn channel_dos_effective_masses(
    mapping: &KpointMapping,
    channel: &SpinChannel,
) -> Result<Array2<f64>, ScatteringError> {
    let masses = mapping.restrict(&channel.effective_mass)?;
    let (nbands, _, _, nkpoints) = masses.dim();
    Ok(Array2::from_shape_fn((nbands, nkpoints), |(band, k)| {
        (0..3)
            .map(|i| masses[[band, i, i, k]].abs())
            .product::<f64>()
            .cbrt()
    }))
}
