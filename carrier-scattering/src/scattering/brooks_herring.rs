// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # Brooks-Herring
//!
//! Ionized impurity scattering in the Brooks-Herring approximation, a screened Coulomb potential
//! with the overlap correction carried by the c-factor of each state.
//!
//! For a state with wavevector k (from k² = 2 m_DOS E), group velocity v and c-factor c, with
//! inverse screening length β,
//!
//! ```text
//! b   = 4k² / β²
//! d   = 1 + 2β²c² / k² + 3β⁴c⁴ / (4k⁴)
//! b_f = b / (1 + b) + 8c²(β² + 2k²) / (β² + 4k²) + c⁴(3β⁴ + 6β²k² - 8k⁴) / ((β² + 4k²) k²)
//! τ⁻¹ = 8π N_ii (d ln(1 + b) - b_f) / (ε² v k²)
//! ```
//!
//! where N_ii = |n| Z_d² + |p| Z_a² is the ionized impurity concentration and ε the static
//! dielectric constant. The group velocity entering the rate is the angular average |v| / √3.

use super::{
    velocity::group_velocity_magnitudes, BuildMechanism, MechanismBase, MechanismContext, Rates,
    ScatteringMechanism,
};
use crate::{
    constants::{per_bohr_cubed_to_per_cm_cubed, BAND_EDGE_TOLERANCE, VELOCITY_FLOOR},
    energetics::{channel_dos_effective_masses, normalise_channel, EnergyReference},
    ScatteringError,
};
use carrier_bands::Spin;
use itertools::iproduct;
use ndarray::{Array4, Zip};
use std::f64::consts::PI;

/// Ionized impurity scattering, "IMP"
pub struct BrooksHerringScattering {
    base: MechanismBase,
    rates: Rates,
}

impl BuildMechanism for BrooksHerringScattering {
    const NAME: &'static str = "IMP";
    const REQUIRED_PROPERTIES: &'static [&'static str] =
        &["acceptor_charge", "donor_charge", "static_dielectric"];

    fn build(base: MechanismBase, context: &MechanismContext<'_>) -> Result<Self, ScatteringError> {
        let properties = base.properties();
        let acceptor_charge = properties.get("acceptor_charge")?;
        let donor_charge = properties.get("donor_charge")?;
        let static_dielectric = properties.positive("static_dielectric")?;
        let structure = context.structure;
        let mapping = structure.kpoint_mapping();
        let (ndoping, ntemperatures) = structure.grid_shape();

        let inverse_screening_length_sq = context
            .screening
            .inverse_screening_length_sq(structure, static_dielectric)?;
        if inverse_screening_length_sq.dim() != (ndoping, ntemperatures) {
            return Err(ScatteringError::InconsistentShape {
                quantity: "inverse screening length squared".into(),
                expected: vec![ndoping, ntemperatures],
                found: inverse_screening_length_sq.shape().to_vec(),
            });
        }

        let impurity_concentration = Zip::from(structure.electron_conc())
            .and(structure.hole_conc())
            .map_collect(|n, p| {
                n.abs() * donor_charge.powi(2) + p.abs() * acceptor_charge.powi(2)
            });

        tracing::debug!("Screening and ionized impurity concentration");
        for (n, t) in iproduct!(0..ndoping, 0..ntemperatures) {
            tracing::debug!(
                "doping {:.2e} cm⁻³, T = {} K: β² = {:.3e} a₀⁻², N_ii = {:.3e} cm⁻³",
                per_bohr_cubed_to_per_cm_cubed(structure.doping()[n]),
                structure.temperatures()[t],
                inverse_screening_length_sq[[n, t]],
                per_bohr_cubed_to_per_cm_cubed(impurity_concentration[[n, t]])
            );
        }

        let prefactor = impurity_concentration.mapv(|concentration| {
            8. * PI * concentration * context.units.time_per_second / static_dielectric.powi(2)
        });
        let reference = EnergyReference::from_structure(structure)?;

        let rates = context.compute_per_spin(Self::NAME, |spin, channel| {
            let energies = normalise_channel(structure, &reference, spin, channel)?;
            let masses = channel_dos_effective_masses(mapping, channel)?;
            let c_factor = mapping.restrict(&channel.c_factor)?;
            let velocities_product = mapping.restrict(&channel.velocities_product)?;
            let (speeds, clamped) =
                group_velocity_magnitudes(&velocities_product, 1. / 3f64.sqrt());

            let mut rates = Array4::zeros(energies.raw_dim());
            let (mut undefined, mut at_band_edge) = (0, 0);
            Zip::indexed(&mut rates).and(&energies).for_each(
                |(n, t, band, k), rate, &energy| {
                    let value = rate_at(
                        prefactor[[n, t]],
                        inverse_screening_length_sq[[n, t]],
                        2. * masses[[band, k]] * energy,
                        c_factor[[band, k]],
                        speeds[[band, k]],
                    );
                    *rate = if energy < BAND_EDGE_TOLERANCE {
                        at_band_edge += 1;
                        0.
                    } else if value.is_nan() {
                        undefined += 1;
                        0.
                    } else {
                        value
                    };
                },
            );
            report_degeneracies(spin, clamped, undefined, at_band_edge);
            Ok(mapping.expand(&rates)?)
        })?;
        Ok(Self { base, rates })
    }
}

impl ScatteringMechanism for BrooksHerringScattering {
    fn base(&self) -> &MechanismBase {
        &self.base
    }

    fn rates(&self) -> &Rates {
        &self.rates
    }
}

/// The rate for one state, NaN where the expression is undefined (k² = 0)
fn rate_at(
    prefactor: f64,
    inverse_screening_length_sq: f64,
    k_sq: f64,
    c_factor: f64,
    speed: f64,
) -> f64 {
    let beta_sq = inverse_screening_length_sq;
    let c_sq = c_factor.powi(2);
    let b = 4. * k_sq / beta_sq;
    let d = 1.
        + 2. * beta_sq * c_sq / k_sq
        + 3. * beta_sq.powi(2) * c_sq.powi(2) / (4. * k_sq.powi(2));
    let b_f = b / (1. + b)
        + 8. * c_sq * (beta_sq + 2. * k_sq) / (beta_sq + 4. * k_sq)
        + c_sq.powi(2) * (3. * beta_sq.powi(2) + 6. * beta_sq * k_sq - 8. * k_sq.powi(2))
            / ((beta_sq + 4. * k_sq) * k_sq);
    prefactor * (d * b.ln_1p() - b_f) / (speed * k_sq)
}

fn report_degeneracies(
    spin: Spin,
    clamped: usize,
    undefined: usize,
    at_band_edge: usize,
) {
    if clamped > 0 {
        tracing::warn!(
            "{} group velocities of spin {} raised to {}",
            clamped,
            spin,
            VELOCITY_FLOOR
        );
    }
    if undefined > 0 {
        tracing::warn!(
            "{} undefined impurity rates of spin {} set to zero",
            undefined,
            spin
        );
    }
    if at_band_edge > 0 {
        tracing::debug!(
            "{} impurity rates of spin {} on the band edge set to zero",
            at_band_edge,
            spin
        );
    }
}

#[cfg(test)]
mod test {
    use super::{rate_at, BrooksHerringScattering};
    use crate::{
        constants::{UnitSystem, VELOCITY_FLOOR},
        energetics::{dos_effective_masses, normalised_energies},
        material::MaterialProperties,
        scattering::{test::gaas, MechanismBuilder, ScatteringMechanism},
        screening::FixedScreening,
        ScatteringError,
    };
    use approx::assert_relative_eq;
    use carrier_bands::Spin;
    use ndarray::Array2;
    use proptest::prelude::*;
    use std::f64::consts::PI;
    use utilities::ParabolicStructure;

    fn build(parabolic: &ParabolicStructure) -> BrooksHerringScattering {
        let structure = parabolic.build();
        let properties = gaas();
        MechanismBuilder::new()
            .with_material_properties(&properties)
            .with_electronic_structure(&structure)
            .build::<BrooksHerringScattering>()
            .unwrap()
    }

    #[test]
    fn without_overlap_the_rate_reduces_to_the_screened_coulomb_form() {
        let (beta_sq, k_sq, speed) = (1e-3, 4e-3, 0.1);
        let b: f64 = 4. * k_sq / beta_sq;
        let expected = ((1. + b).ln() - b / (1. + b)) / (speed * k_sq);
        assert_relative_eq!(
            rate_at(1., beta_sq, k_sq, 0., speed),
            expected,
            max_relative = 1e-12
        );
    }

    #[test]
    fn absolute_rate_includes_the_overlap_terms_and_prefactor() {
        let parabolic = ParabolicStructure::default();
        let structure = parabolic.build();
        let properties = gaas();
        let beta_sq = 1e-4;
        let screening = FixedScreening::uniform(beta_sq, structure.grid_shape());
        let mechanism = MechanismBuilder::new()
            .with_material_properties(&properties)
            .with_electronic_structure(&structure)
            .with_screening(&screening)
            .build::<BrooksHerringScattering>()
            .unwrap();

        // Conduction band, fifth irreducible point away from Γ
        let (n, t, band, ir_k) = (1, 1, 1, 5);
        let k = structure.kpoint_mapping().ir_kpoints_idx()[ir_k];

        let energy = normalised_energies(&structure).unwrap()[&Spin::Up][[n, t, band, ir_k]];
        let mass = dos_effective_masses(&structure).unwrap()[&Spin::Up][[band, ir_k]];
        let velocities_product = structure.velocities_product(Spin::Up).unwrap();
        let speed = ((0..3)
            .map(|i| velocities_product[[band, i, i, k]])
            .sum::<f64>()
            .sqrt()
            / 3f64.sqrt())
        .max(VELOCITY_FLOOR);
        let c = structure.c_factor(Spin::Up).unwrap()[[band, k]];
        assert_eq!(c, 0.3);

        let concentration = structure.electron_conc()[[n, t]] + structure.hole_conc()[[n, t]];
        let dielectric: f64 = 12.9;
        let prefactor =
            8. * PI * concentration * UnitSystem::ATOMIC.time_per_second / dielectric.powi(2);

        let k_sq = 2. * mass * energy;
        let b = 4. * k_sq / beta_sq;
        let d = 1.
            + 2. * beta_sq * c * c / k_sq
            + 3. * beta_sq.powi(2) * c.powi(4) / (4. * k_sq * k_sq);
        let b_f = (4. * k_sq / beta_sq) / (1. + 4. * k_sq / beta_sq)
            + 8. * c * c * (beta_sq + 2. * k_sq) / (beta_sq + 4. * k_sq)
            + c.powi(4) * (3. * beta_sq.powi(2) + 6. * beta_sq * k_sq - 8. * k_sq.powi(2))
                / ((beta_sq + 4. * k_sq) * k_sq);
        let expected = prefactor * (d * (1. + b).ln() - b_f) / (speed * k_sq);

        assert!(expected > 0.);
        assert_relative_eq!(
            mechanism.rates()[&Spin::Up][[n, t, band, k]],
            expected,
            max_relative = 1e-10
        );
    }

    #[test]
    fn the_rate_is_undefined_at_zero_wavevector() {
        assert!(rate_at(1., 1e-3, 0., 0.3, 0.1).is_nan());
    }

    #[test]
    fn rates_vanish_on_the_band_edges() {
        let parabolic = ParabolicStructure::default();
        let structure = parabolic.build();
        let mechanism = build(&parabolic);
        let energies = normalised_energies(&structure).unwrap();
        let energies = structure
            .kpoint_mapping()
            .expand(&energies[&Spin::Up])
            .unwrap();
        let rates = &mechanism.rates()[&Spin::Up];
        let mut on_edge = 0;
        for (rate, energy) in rates.iter().zip(energies.iter()) {
            if *energy < 1e-8 {
                on_edge += 1;
                assert_eq!(*rate, 0.);
            }
        }
        // Γ in both bands for every doping and temperature
        assert_eq!(on_edge, 2 * 2 * 2);
    }

    #[test]
    fn rates_are_positive_away_from_the_band_edges() {
        let parabolic = ParabolicStructure::default();
        let mechanism = build(&parabolic);
        let gamma = (parabolic.number_of_kpoints - 1) / 2;
        let rates = &mechanism.rates()[&Spin::Up];
        for ((_, _, _, k), &rate) in rates.indexed_iter() {
            if k != gamma {
                assert!(rate > 0. && rate.is_finite());
            }
        }
    }

    #[test]
    fn states_related_by_symmetry_share_a_rate() {
        let parabolic = ParabolicStructure::default();
        let mechanism = build(&parabolic);
        let rates = &mechanism.rates()[&Spin::Up];
        let n = parabolic.number_of_kpoints;
        for k in 0..n / 2 {
            for band in 0..2 {
                assert_eq!(rates[[1, 0, band, k]], rates[[1, 0, band, n - 1 - k]]);
            }
        }
    }

    #[test]
    fn restricting_and_expanding_reproduces_the_rates() {
        let parabolic = ParabolicStructure::default();
        let mechanism = build(&parabolic);
        let mapping = parabolic.kpoint_mapping();
        let rates = &mechanism.rates()[&Spin::Up];
        let roundtrip = mapping.expand(&mapping.restrict(rates).unwrap()).unwrap();
        assert_eq!(&roundtrip, rates);
    }

    #[test]
    fn rates_grow_with_impurity_charge() {
        let structure = ParabolicStructure::default().build();
        let screening = FixedScreening::uniform(1e-4, structure.grid_shape());
        let build = |charge: f64| {
            let properties = gaas()
                .with("acceptor_charge", charge)
                .with("donor_charge", charge);
            MechanismBuilder::new()
                .with_material_properties(&properties)
                .with_electronic_structure(&structure)
                .with_screening(&screening)
                .build::<BrooksHerringScattering>()
                .unwrap()
        };
        let single = build(1.);
        let double = build(2.);
        for (s, d) in single.rates()[&Spin::Up]
            .iter()
            .zip(double.rates()[&Spin::Up].iter())
        {
            assert_relative_eq!(4. * s, *d, max_relative = 1e-12);
        }
    }

    #[test]
    fn screening_of_the_wrong_shape_is_rejected() {
        let structure = ParabolicStructure::default().build();
        let properties = gaas();
        let screening = FixedScreening::new(Array2::ones((1, 1)));
        let result = MechanismBuilder::new()
            .with_material_properties(&properties)
            .with_electronic_structure(&structure)
            .with_screening(&screening)
            .build::<BrooksHerringScattering>();
        assert!(matches!(
            result,
            Err(ScatteringError::InconsistentShape { .. })
        ));
    }

    #[test]
    fn non_positive_dielectric_constants_are_rejected() {
        let structure = ParabolicStructure::default().build();
        let properties: MaterialProperties = [
            ("acceptor_charge", 1.),
            ("donor_charge", 1.),
            ("static_dielectric", 0.),
        ]
        .into_iter()
        .collect();
        let result = MechanismBuilder::new()
            .with_material_properties(&properties)
            .with_electronic_structure(&structure)
            .build::<BrooksHerringScattering>();
        assert!(matches!(
            result,
            Err(ScatteringError::InvalidProperty { key: "static_dielectric", .. })
        ));
    }

    #[test]
    fn metals_have_no_nan_rates() {
        let structure = utilities::metallic_structure(15, 0.3);
        let properties = gaas();
        let screening = FixedScreening::uniform(1e-2, structure.grid_shape());
        let mechanism = MechanismBuilder::new()
            .with_material_properties(&properties)
            .with_electronic_structure(&structure)
            .with_screening(&screening)
            .build::<BrooksHerringScattering>()
            .unwrap();
        assert!(mechanism.rates()[&Spin::Up]
            .iter()
            .all(|rate| rate.is_finite() && *rate >= 0.));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]
        #[test]
        fn rates_are_never_nan(seed in any::<u64>()) {
            use rand::SeedableRng;
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            let parabolic = ParabolicStructure {
                spins: vec![Spin::Up, Spin::Down],
                ..ParabolicStructure::random(&mut rng)
            };
            let mechanism = build(&parabolic);
            for rates in mechanism.rates().values() {
                prop_assert!(rates.iter().all(|rate| !rate.is_nan() && *rate >= 0.));
            }
        }
    }
}
