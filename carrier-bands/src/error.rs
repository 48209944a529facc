use crate::Spin;
use miette::Diagnostic;

#[derive(thiserror::Error, Debug, Diagnostic)]
/// Errors raised while assembling an electronic structure
pub enum BandsError {
    #[error("inconsistent shape for {quantity}: expected {expected:?}, found {found:?}")]
    #[diagnostic(code(carrier_bands::inconsistent_shape))]
    InconsistentShape {
        quantity: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },
    #[error("invalid k-point mapping: {0}")]
    #[diagnostic(code(carrier_bands::invalid_mapping))]
    InvalidMapping(String),
    #[error("valence band index {vb_idx} for spin {spin} is invalid with {nbands} bands")]
    #[diagnostic(code(carrier_bands::invalid_band_index))]
    InvalidBandIndex {
        spin: Spin,
        vb_idx: usize,
        nbands: usize,
    },
    #[error("the electronic structure is missing {0}")]
    #[diagnostic(code(carrier_bands::missing_field))]
    MissingField(&'static str),
    #[error("temperatures must be positive and finite, found {0} K")]
    #[diagnostic(code(carrier_bands::invalid_temperature))]
    InvalidTemperature(f64),
    #[error("invalid density of states: {0}")]
    #[diagnostic(code(carrier_bands::invalid_density_of_states))]
    InvalidDensityOfStates(String),
}

/// Fails with `BandsError::InconsistentShape` unless `found` matches `expected` exactly
pub(crate) fn check_shape(
    quantity: &str,
    expected: &[usize],
    found: &[usize],
) -> Result<(), BandsError> {
    if expected == found {
        Ok(())
    } else {
        Err(BandsError::InconsistentShape {
            quantity: quantity.to_string(),
            expected: expected.to_vec(),
            found: found.to_vec(),
        })
    }
}
