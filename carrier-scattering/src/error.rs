// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # Error
//! The error type for mechanism construction

use carrier_bands::BandsError;
use miette::Diagnostic;

#[derive(thiserror::Error, Debug, Diagnostic)]
/// Unrecoverable failures while building a scattering mechanism
///
/// Numerical degeneracies at band edges are never reported here, they are resolved in place.
pub enum ScatteringError {
    /// A property declared by the mechanism is absent from the material properties
    #[error("{mechanism} scattering requires the material property `{key}`")]
    #[diagnostic(code(carrier_scattering::missing_property))]
    MissingProperty {
        /// Short name of the mechanism
        mechanism: &'static str,
        /// The absent key
        key: &'static str,
    },
    /// A property lies outside its physical range
    #[error("material property `{key}` must be positive and finite, found {value}")]
    #[diagnostic(code(carrier_scattering::invalid_property))]
    InvalidProperty {
        /// The offending key
        key: &'static str,
        /// The supplied value
        value: f64,
    },
    /// A collaborator returned a tensor of the wrong shape
    #[error("inconsistent shape for {quantity}: expected {expected:?}, found {found:?}")]
    #[diagnostic(code(carrier_scattering::inconsistent_shape))]
    InconsistentShape {
        /// The quantity whose shape is wrong
        quantity: String,
        /// The required shape
        expected: Vec<usize>,
        /// The shape received
        found: Vec<usize>,
    },
    /// Screening from the density of states was requested without one
    #[error("the electronic structure carries no density of states to compute screening from")]
    #[diagnostic(code(carrier_scattering::missing_density_of_states))]
    MissingDensityOfStates,
    /// A mechanism name which does not correspond to an implemented mechanism
    #[error("unknown scattering mechanism `{0}`, expected one of CRT, MFP or IMP")]
    #[diagnostic(code(carrier_scattering::unknown_mechanism))]
    UnknownMechanism(String),
    /// Band edges could not be located
    #[error("could not locate the band edges: {0}")]
    #[diagnostic(code(carrier_scattering::band_edges))]
    BandEdges(String),
    /// The electronic structure itself is inconsistent
    #[error(transparent)]
    #[diagnostic(code(carrier_scattering::bands))]
    Bands(#[from] BandsError),
    /// Reading or deserializing a configuration file failed
    #[error(transparent)]
    #[diagnostic(code(carrier_scattering::config))]
    Config(#[from] config::ConfigError),
}

#[derive(thiserror::Error, Debug, Diagnostic)]
/// Failures while installing the global tracing subscriber
pub enum TelemetryError {
    /// A `log` logger was already installed
    #[error(transparent)]
    #[diagnostic(code(carrier_scattering::logger))]
    Logger(#[from] log::SetLoggerError),
    /// A global `tracing` subscriber was already installed
    #[error(transparent)]
    #[diagnostic(code(carrier_scattering::subscriber))]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}
