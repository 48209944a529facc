//! The electronic structure consumed by the scattering mechanisms
//!
//! An [`ElectronicStructure`] is assembled once through the [`ElectronicStructureBuilder`], which
//! checks that every tensor agrees on the number of bands, k-points, doping levels and
//! temperatures. After construction it is only ever handed out by shared reference.

use crate::{error::check_shape, BandsError, DensityOfStates, KpointMapping, Spin, SpinMap};
use ndarray::{Array1, Array2, Array4};

/// The band-resolved quantities of a single spin channel, all defined on the full k-point mesh
#[derive(Clone, Debug)]
pub struct SpinChannel {
    /// Band energies in Hartree, shape (nbands, nkpoints)
    pub energies: Array2<f64>,
    /// Outer product of the group velocity with itself, shape (nbands, 3, 3, nkpoints)
    pub velocities_product: Array4<f64>,
    /// Effective mass tensors in units of the electron mass, shape (nbands, 3, 3, nkpoints)
    pub effective_mass: Array4<f64>,
    /// Overlap factor entering ionised impurity scattering, shape (nbands, nkpoints)
    pub c_factor: Array2<f64>,
}

impl SpinChannel {
    pub fn number_of_bands(&self) -> usize {
        self.energies.nrows()
    }
}

/// Whether the carriers are referenced to band edges or to the intrinsic Fermi level
#[derive(Clone, Debug, PartialEq)]
pub enum Regime {
    Metal {
        intrinsic_fermi_level: f64,
    },
    /// `vb_idx` holds the index of the highest valence band in each spin channel
    Semiconductor { vb_idx: SpinMap<usize> },
}

/// An immutable, shape-checked electronic structure
#[derive(Clone, Debug)]
pub struct ElectronicStructure {
    channels: SpinMap<SpinChannel>,
    fermi_levels: Array2<f64>,
    doping: Array1<f64>,
    temperatures: Array1<f64>,
    electron_conc: Array2<f64>,
    hole_conc: Array2<f64>,
    kpoint_mapping: KpointMapping,
    regime: Regime,
    density_of_states: Option<DensityOfStates>,
}

impl ElectronicStructure {
    pub fn spins(&self) -> Vec<Spin> {
        self.channels.keys().copied().collect()
    }

    pub fn channels(&self) -> impl Iterator<Item = (Spin, &SpinChannel)> + '_ {
        self.channels.iter().map(|(spin, channel)| (*spin, channel))
    }

    pub fn channel(&self, spin: Spin) -> Option<&SpinChannel> {
        self.channels.get(&spin)
    }

    pub fn number_of_bands(&self, spin: Spin) -> Option<usize> {
        self.channels.get(&spin).map(SpinChannel::number_of_bands)
    }

    pub fn energies(&self, spin: Spin) -> Option<&Array2<f64>> {
        self.channel(spin).map(|channel| &channel.energies)
    }

    pub fn velocities_product(&self, spin: Spin) -> Option<&Array4<f64>> {
        self.channel(spin).map(|channel| &channel.velocities_product)
    }

    pub fn effective_mass(&self, spin: Spin) -> Option<&Array4<f64>> {
        self.channel(spin).map(|channel| &channel.effective_mass)
    }

    pub fn c_factor(&self, spin: Spin) -> Option<&Array2<f64>> {
        self.channel(spin).map(|channel| &channel.c_factor)
    }

    /// Fermi levels in Hartree, shape (ndoping, ntemperatures)
    pub fn fermi_levels(&self) -> &Array2<f64> {
        &self.fermi_levels
    }

    /// Signed doping concentrations per cubic bohr, negative for electron doping
    pub fn doping(&self) -> &Array1<f64> {
        &self.doping
    }

    /// Temperatures in Kelvin
    pub fn temperatures(&self) -> &Array1<f64> {
        &self.temperatures
    }

    pub fn electron_conc(&self) -> &Array2<f64> {
        &self.electron_conc
    }

    pub fn hole_conc(&self) -> &Array2<f64> {
        &self.hole_conc
    }

    /// The (ndoping, ntemperatures) shape shared by the carrier statistics
    pub fn grid_shape(&self) -> (usize, usize) {
        (self.doping.len(), self.temperatures.len())
    }

    pub fn kpoint_mapping(&self) -> &KpointMapping {
        &self.kpoint_mapping
    }

    pub fn regime(&self) -> &Regime {
        &self.regime
    }

    pub fn is_metal(&self) -> bool {
        matches!(self.regime, Regime::Metal { .. })
    }

    /// The highest valence band of `spin`, `None` for metals
    pub fn vb_idx(&self, spin: Spin) -> Option<usize> {
        match &self.regime {
            Regime::Semiconductor { vb_idx } => vb_idx.get(&spin).copied(),
            Regime::Metal { .. } => None,
        }
    }

    /// The intrinsic Fermi level, `None` unless the system is metallic
    pub fn intrinsic_fermi_level(&self) -> Option<f64> {
        match self.regime {
            Regime::Metal {
                intrinsic_fermi_level,
            } => Some(intrinsic_fermi_level),
            Regime::Semiconductor { .. } => None,
        }
    }

    pub fn density_of_states(&self) -> Option<&DensityOfStates> {
        self.density_of_states.as_ref()
    }
}

/// Collects the pieces of an `ElectronicStructure` and validates them on `build`
#[derive(Default)]
pub struct ElectronicStructureBuilder {
    channels: SpinMap<SpinChannel>,
    fermi_levels: Option<Array2<f64>>,
    doping: Option<Array1<f64>>,
    temperatures: Option<Array1<f64>>,
    electron_conc: Option<Array2<f64>>,
    hole_conc: Option<Array2<f64>>,
    kpoint_mapping: Option<KpointMapping>,
    regime: Option<Regime>,
    density_of_states: Option<DensityOfStates>,
}

impl ElectronicStructureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spin_channel(mut self, spin: Spin, channel: SpinChannel) -> Self {
        self.channels.insert(spin, channel);
        self
    }

    pub fn with_doping_and_temperatures(
        mut self,
        doping: Array1<f64>,
        temperatures: Array1<f64>,
    ) -> Self {
        self.doping = Some(doping);
        self.temperatures = Some(temperatures);
        self
    }

    pub fn with_fermi_levels(mut self, fermi_levels: Array2<f64>) -> Self {
        self.fermi_levels = Some(fermi_levels);
        self
    }

    pub fn with_carrier_concentrations(
        mut self,
        electron_conc: Array2<f64>,
        hole_conc: Array2<f64>,
    ) -> Self {
        self.electron_conc = Some(electron_conc);
        self.hole_conc = Some(hole_conc);
        self
    }

    pub fn with_kpoint_mapping(mut self, kpoint_mapping: KpointMapping) -> Self {
        self.kpoint_mapping = Some(kpoint_mapping);
        self
    }

    pub fn with_regime(mut self, regime: Regime) -> Self {
        self.regime = Some(regime);
        self
    }

    pub fn with_density_of_states(mut self, density_of_states: DensityOfStates) -> Self {
        self.density_of_states = Some(density_of_states);
        self
    }

    pub fn build(self) -> Result<ElectronicStructure, BandsError> {
        if self.channels.is_empty() {
            return Err(BandsError::MissingField("a spin channel"));
        }
        let doping = self.doping.ok_or(BandsError::MissingField("doping"))?;
        let temperatures = self
            .temperatures
            .ok_or(BandsError::MissingField("temperatures"))?;
        let fermi_levels = self
            .fermi_levels
            .ok_or(BandsError::MissingField("fermi levels"))?;
        let electron_conc = self
            .electron_conc
            .ok_or(BandsError::MissingField("electron concentrations"))?;
        let hole_conc = self
            .hole_conc
            .ok_or(BandsError::MissingField("hole concentrations"))?;
        let kpoint_mapping = self
            .kpoint_mapping
            .ok_or(BandsError::MissingField("a k-point mapping"))?;
        let regime = self.regime.ok_or(BandsError::MissingField("a regime"))?;

        if let Some(&temperature) = temperatures
            .iter()
            .find(|&&temperature| !(temperature.is_finite() && temperature > 0.))
        {
            return Err(BandsError::InvalidTemperature(temperature));
        }

        let grid = [doping.len(), temperatures.len()];
        check_shape("fermi levels", &grid, fermi_levels.shape())?;
        check_shape("electron concentrations", &grid, electron_conc.shape())?;
        check_shape("hole concentrations", &grid, hole_conc.shape())?;

        let nkpoints = kpoint_mapping.number_of_kpoints();
        for (spin, channel) in self.channels.iter() {
            let nbands = channel.number_of_bands();
            check_shape(
                &format!("energies[{spin}]"),
                &[nbands, nkpoints],
                channel.energies.shape(),
            )?;
            check_shape(
                &format!("velocities_product[{spin}]"),
                &[nbands, 3, 3, nkpoints],
                channel.velocities_product.shape(),
            )?;
            check_shape(
                &format!("effective_mass[{spin}]"),
                &[nbands, 3, 3, nkpoints],
                channel.effective_mass.shape(),
            )?;
            check_shape(
                &format!("c_factor[{spin}]"),
                &[nbands, nkpoints],
                channel.c_factor.shape(),
            )?;
        }

        if let Regime::Semiconductor { vb_idx } = &regime {
            let mut has_conduction_band = false;
            for (spin, channel) in self.channels.iter() {
                let nbands = channel.number_of_bands();
                let index = *vb_idx
                    .get(spin)
                    .ok_or(BandsError::MissingField("a valence band index for every spin"))?;
                if index >= nbands {
                    return Err(BandsError::InvalidBandIndex {
                        spin: *spin,
                        vb_idx: index,
                        nbands,
                    });
                }
                has_conduction_band |= index + 1 < nbands;
            }
            if !has_conduction_band {
                return Err(BandsError::MissingField("a conduction band"));
            }
        }

        tracing::debug!(
            "Built electronic structure with {} spin channels, {} k-points ({} irreducible), {} doping levels and {} temperatures",
            self.channels.len(),
            nkpoints,
            kpoint_mapping.number_of_irreducible_kpoints(),
            doping.len(),
            temperatures.len()
        );

        Ok(ElectronicStructure {
            channels: self.channels,
            fermi_levels,
            doping,
            temperatures,
            electron_conc,
            hole_conc,
            kpoint_mapping,
            regime,
            density_of_states: self.density_of_states,
        })
    }
}
