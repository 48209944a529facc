// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use super::{
    broadcast_over_grid, velocity::group_velocity_magnitudes, BuildMechanism, MechanismBase,
    MechanismContext, Rates, ScatteringMechanism,
};
use crate::{constants::VELOCITY_FLOOR, ScatteringError};

/// Rates set by the time a carrier takes to cover a fixed mean free path at its group velocity
pub struct MeanFreePathScattering {
    base: MechanismBase,
    rates: Rates,
}

impl BuildMechanism for MeanFreePathScattering {
    const NAME: &'static str = "MFP";
    const REQUIRED_PROPERTIES: &'static [&'static str] = &["mean_free_path"];

    fn build(base: MechanismBase, context: &MechanismContext<'_>) -> Result<Self, ScatteringError> {
        let mean_free_path =
            base.properties().positive("mean_free_path")? * context.units.length_per_nanometre;
        let time_per_second = context.units.time_per_second;
        let structure = context.structure;
        let mapping = structure.kpoint_mapping();

        let rates = context.compute_per_spin(Self::NAME, |spin, channel| {
            let velocities_product = mapping.restrict(&channel.velocities_product)?;
            let (speeds, clamped) = group_velocity_magnitudes(&velocities_product, 1.);
            if clamped > 0 {
                tracing::warn!(
                    "{} group velocities of spin {} raised to {}",
                    clamped,
                    spin,
                    VELOCITY_FLOOR
                );
            }
            let rates = speeds.mapv(|speed| speed * time_per_second / mean_free_path);
            let rates = broadcast_over_grid(&rates, structure.grid_shape())?;
            Ok(mapping.expand(&rates)?)
        })?;
        Ok(Self { base, rates })
    }
}

impl ScatteringMechanism for MeanFreePathScattering {
    fn base(&self) -> &MechanismBase {
        &self.base
    }

    fn rates(&self) -> &Rates {
        &self.rates
    }
}

#[cfg(test)]
mod test {
    use super::MeanFreePathScattering;
    use crate::{
        constants::{UnitSystem, VELOCITY_FLOOR},
        material::MaterialProperties,
        scattering::{test::gaas, MechanismBuilder, ScatteringMechanism},
        ScatteringError,
    };
    use approx::assert_relative_eq;
    use carrier_bands::Spin;
    use ndarray::Axis;
    use proptest::prelude::*;
    use utilities::ParabolicStructure;

    fn build(parabolic: &ParabolicStructure, units: UnitSystem) -> MeanFreePathScattering {
        let structure = parabolic.build();
        let properties = gaas();
        MechanismBuilder::new()
            .with_material_properties(&properties)
            .with_electronic_structure(&structure)
            .with_units(units)
            .build::<MeanFreePathScattering>()
            .unwrap()
    }

    #[test]
    fn rates_at_gamma_use_the_velocity_floor() {
        let parabolic = ParabolicStructure::default();
        let units = UnitSystem::default();
        let mechanism = build(&parabolic, units);
        let gamma = (parabolic.number_of_kpoints - 1) / 2;
        let expected = VELOCITY_FLOOR * units.time_per_second / (20. * units.length_per_nanometre);
        let rates = &mechanism.rates()[&Spin::Up];
        for band in 0..2 {
            assert_relative_eq!(rates[[0, 0, band, gamma]], expected, max_relative = 1e-12);
        }
    }

    #[test]
    fn rates_follow_the_unit_system() {
        let parabolic = ParabolicStructure::default();
        let units = UnitSystem {
            length_per_nanometre: 1.,
            time_per_second: 1.,
        };
        let mechanism = build(&parabolic, units);
        let k = parabolic.number_of_kpoints - 1;
        let speed = parabolic.maximum_wavevector / parabolic.electron_mass;
        assert_relative_eq!(
            mechanism.rates()[&Spin::Up][[1, 1, 1, k]],
            speed / 20.,
            max_relative = 1e-12
        );
    }

    #[test]
    fn rates_do_not_depend_on_doping_or_temperature() {
        let mechanism = build(&ParabolicStructure::default(), UnitSystem::default());
        let rates = &mechanism.rates()[&Spin::Up];
        let reference = rates.index_axis(Axis(0), 0).index_axis(Axis(0), 0).to_owned();
        for per_doping in rates.axis_iter(Axis(0)) {
            for slice in per_doping.axis_iter(Axis(0)) {
                assert_eq!(slice, reference);
            }
        }
    }

    #[test]
    fn non_positive_mean_free_paths_are_rejected() {
        let structure = ParabolicStructure::default().build();
        let properties = MaterialProperties::new().with("mean_free_path", -3.);
        let result = MechanismBuilder::new()
            .with_material_properties(&properties)
            .with_electronic_structure(&structure)
            .build::<MeanFreePathScattering>();
        assert!(matches!(
            result,
            Err(ScatteringError::InvalidProperty { key: "mean_free_path", .. })
        ));
    }

    #[test]
    fn restricting_and_expanding_reproduces_the_rates() {
        let parabolic = ParabolicStructure::default();
        let mechanism = build(&parabolic, UnitSystem::default());
        let mapping = parabolic.kpoint_mapping();
        let rates = &mechanism.rates()[&Spin::Up];
        let roundtrip = mapping.expand(&mapping.restrict(rates).unwrap()).unwrap();
        assert_eq!(&roundtrip, rates);
    }

    proptest! {
        #[test]
        fn rates_are_positive_for_any_band_parameters(seed in any::<u64>()) {
            use rand::SeedableRng;
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            let mechanism = build(&ParabolicStructure::random(&mut rng), UnitSystem::default());
            prop_assert!(mechanism.rates()[&Spin::Up].iter().all(|&rate| rate > 0. && rate.is_finite()));
        }
    }
}
