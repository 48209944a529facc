// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # Screening
//!
//! The squared inverse screening length β² felt by ionized impurities, tabulated on the doping and
//! temperature grid of an electronic structure.

use crate::{constants::BOLTZMANN_HARTREE, fermi::fermi_dirac_spread, ScatteringError};
use carrier_bands::ElectronicStructure;
use ndarray::{Array2, ArrayView1, Zip};
use std::f64::consts::PI;

/// Computes β² in inverse square bohr on the (ndoping, ntemperatures) grid
pub trait ScreeningCalculator: Send + Sync {
    /// β² for each (doping, temperature) pair of `structure`
    fn inverse_screening_length_sq(
        &self,
        structure: &ElectronicStructure,
        static_dielectric: f64,
    ) -> Result<Array2<f64>, ScatteringError>;
}

/// Screening from the total density of states carried by the electronic structure
///
/// β² = 4π / (ε kT V) ∫ g(E) f(1 - f) dE, with the integral evaluated on the tabulated energy grid
/// by the trapezoid rule.
#[derive(Copy, Clone, Debug, Default)]
pub struct DosScreening;

impl ScreeningCalculator for DosScreening {
    fn inverse_screening_length_sq(
        &self,
        structure: &ElectronicStructure,
        static_dielectric: f64,
    ) -> Result<Array2<f64>, ScatteringError> {
        let dos = structure
            .density_of_states()
            .ok_or(ScatteringError::MissingDensityOfStates)?;
        let energies = dos.energies();
        let densities = dos.densities();
        let temperatures = structure.temperatures();

        let mut beta_sq = Array2::zeros(structure.grid_shape());
        Zip::indexed(&mut beta_sq)
            .and(structure.fermi_levels())
            .for_each(|(_, t), value, &fermi_level| {
                let kt = temperatures[t] * BOLTZMANN_HARTREE;
                let integrand = Zip::from(&energies)
                    .and(&densities)
                    .map_collect(|&energy, &density| {
                        density * fermi_dirac_spread(energy, fermi_level, kt)
                    });
                let integral = trapezoid(integrand.view(), energies);
                *value = 4. * PI * integral / (static_dielectric * kt * dos.volume());
            });
        Ok(beta_sq)
    }
}

fn trapezoid(values: ArrayView1<f64>, grid: ArrayView1<f64>) -> f64 {
    values
        .windows(2)
        .into_iter()
        .zip(grid.windows(2))
        .map(|(y, x)| 0.5 * (y[0] + y[1]) * (x[1] - x[0]))
        .sum()
}

/// Precomputed β², independent of the dielectric constant
#[derive(Clone, Debug)]
pub struct FixedScreening {
    values: Array2<f64>,
}

impl FixedScreening {
    /// Screening from β² of shape (ndoping, ntemperatures), checked against the structure on use
    pub fn new(values: Array2<f64>) -> Self {
        Self { values }
    }

    /// The same β² at every doping and temperature
    pub fn uniform(value: f64, grid_shape: (usize, usize)) -> Self {
        Self::new(Array2::from_elem(grid_shape, value))
    }
}

impl ScreeningCalculator for FixedScreening {
    fn inverse_screening_length_sq(
        &self,
        structure: &ElectronicStructure,
        _static_dielectric: f64,
    ) -> Result<Array2<f64>, ScatteringError> {
        let (ndoping, ntemperatures) = structure.grid_shape();
        if self.values.dim() != (ndoping, ntemperatures) {
            return Err(ScatteringError::InconsistentShape {
                quantity: "inverse screening length squared".into(),
                expected: vec![ndoping, ntemperatures],
                found: self.values.shape().to_vec(),
            });
        }
        Ok(self.values.clone())
    }
}

#[cfg(test)]
mod test {
    use super::{trapezoid, DosScreening, FixedScreening, ScreeningCalculator};
    use crate::ScatteringError;
    use approx::assert_relative_eq;
    use ndarray::Array1;
    use utilities::{metallic_structure, ParabolicStructure};

    #[test]
    fn trapezoid_integrates_a_line_exactly() {
        let grid = Array1::linspace(0., 2., 11);
        let values = grid.mapv(|x| 3. * x + 1.);
        assert_relative_eq!(trapezoid(values.view(), grid.view()), 8., epsilon = 1e-12);
    }

    #[test]
    fn dos_screening_is_positive_on_the_whole_grid() {
        let structure = ParabolicStructure::default().build();
        let beta_sq = DosScreening
            .inverse_screening_length_sq(&structure, 12.9)
            .unwrap();
        assert_eq!(beta_sq.dim(), structure.grid_shape());
        assert!(beta_sq.iter().all(|&value| value.is_finite() && value > 0.));
    }

    #[test]
    fn dos_screening_scales_inversely_with_the_dielectric_constant() {
        let structure = ParabolicStructure::default().build();
        let weak = DosScreening
            .inverse_screening_length_sq(&structure, 20.)
            .unwrap();
        let strong = DosScreening
            .inverse_screening_length_sq(&structure, 10.)
            .unwrap();
        for (w, s) in weak.iter().zip(strong.iter()) {
            assert_relative_eq!(2. * w, *s, max_relative = 1e-12);
        }
    }

    #[test]
    fn heavier_bands_screen_more_strongly() {
        let light = ParabolicStructure::default();
        let heavy = ParabolicStructure {
            electron_mass: 4. * light.electron_mass,
            hole_mass: 4. * light.hole_mass,
            ..light.clone()
        };
        let light = DosScreening
            .inverse_screening_length_sq(&light.build(), 12.9)
            .unwrap();
        let heavy = DosScreening
            .inverse_screening_length_sq(&heavy.build(), 12.9)
            .unwrap();
        for (l, h) in light.iter().zip(heavy.iter()) {
            assert!(h > l);
        }
    }

    #[test]
    fn dos_screening_needs_a_density_of_states() {
        let structure = metallic_structure(11, 0.3);
        assert!(matches!(
            DosScreening.inverse_screening_length_sq(&structure, 10.),
            Err(ScatteringError::MissingDensityOfStates)
        ));
    }

    #[test]
    fn fixed_screening_is_returned_unchanged() {
        let structure = ParabolicStructure::default().build();
        let fixed = FixedScreening::uniform(1e-3, structure.grid_shape());
        let beta_sq = fixed.inverse_screening_length_sq(&structure, 12.9).unwrap();
        assert!(beta_sq.iter().all(|&value| value == 1e-3));
    }

    #[test]
    fn fixed_screening_of_the_wrong_shape_is_rejected() {
        let structure = ParabolicStructure::default().build();
        let fixed = FixedScreening::uniform(1e-3, (3, 3));
        assert!(matches!(
            fixed.inverse_screening_length_sq(&structure, 12.9),
            Err(ScatteringError::InconsistentShape { .. })
        ));
    }
}
