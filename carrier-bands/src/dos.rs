use crate::BandsError;
use ndarray::{Array1, ArrayView1};

/// Total density of states of the cell
///
/// `densities` are in states per Hartree per cell on the `energies` grid (Hartree), `volume`
/// is the cell volume in cubic bohr.
#[derive(Clone, Debug, PartialEq)]
pub struct DensityOfStates {
    energies: Array1<f64>,
    densities: Array1<f64>,
    volume: f64,
}

impl DensityOfStates {
    pub fn new(
        energies: Array1<f64>,
        densities: Array1<f64>,
        volume: f64,
    ) -> Result<Self, BandsError> {
        if energies.len() != densities.len() {
            return Err(BandsError::InconsistentShape {
                quantity: "density of states".into(),
                expected: vec![energies.len()],
                found: vec![densities.len()],
            });
        }
        if energies.len() < 2 {
            return Err(BandsError::InvalidDensityOfStates(format!(
                "at least two energy points are needed, found {}",
                energies.len()
            )));
        }
        if energies.windows(2).into_iter().any(|pair| pair[1] <= pair[0]) {
            return Err(BandsError::InvalidDensityOfStates(
                "energies must be strictly increasing".into(),
            ));
        }
        if !(volume.is_finite() && volume > 0.) {
            return Err(BandsError::InvalidDensityOfStates(format!(
                "the cell volume must be positive, found {volume}"
            )));
        }
        Ok(Self {
            energies,
            densities,
            volume,
        })
    }

    pub fn energies(&self) -> ArrayView1<'_, f64> {
        self.energies.view()
    }

    pub fn densities(&self) -> ArrayView1<'_, f64> {
        self.densities.view()
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }
}

#[cfg(test)]
mod test {
    use super::DensityOfStates;
    use ndarray::Array1;

    #[test]
    fn mismatched_grids_are_rejected() {
        let result = DensityOfStates::new(Array1::linspace(0., 1., 4), Array1::zeros(3), 1.);
        assert!(result.is_err());
    }

    #[test]
    fn unordered_energies_are_rejected() {
        let energies = Array1::from(vec![0., 0.2, 0.1]);
        assert!(DensityOfStates::new(energies, Array1::ones(3), 1.).is_err());
    }

    #[test]
    fn non_positive_volume_is_rejected() {
        let result = DensityOfStates::new(Array1::linspace(0., 1., 4), Array1::ones(4), 0.);
        assert!(result.is_err());
    }

    #[test]
    fn valid_density_of_states_is_accepted() {
        let dos = DensityOfStates::new(Array1::linspace(0., 1., 4), Array1::ones(4), 2.).unwrap();
        assert_eq!(dos.energies().len(), 4);
        assert_eq!(dos.volume(), 2.);
    }
}
