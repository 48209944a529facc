// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Material properties supplied by the user
//!
//! Mechanisms consume scalar material constants looked up by name. `MaterialProperties` is the
//! caller-facing mapping, each mechanism extracts the subset it declares into a `PropertySet`
//! when it is constructed.

use crate::ScatteringError;
use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path};

/// A mapping from property names to values
///
/// Relaxation times are in seconds, mean free paths in nanometres, charges in units of the
/// elementary charge and dielectric constants relative to the vacuum permittivity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialProperties(BTreeMap<String, f64>);

impl MaterialProperties {
    /// An empty set of properties
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the properties from the top-level table of a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScatteringError> {
        let s = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?;
        Ok(s.try_deserialize()?)
    }

    /// Adds or overwrites a property, returning the updated set
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds or overwrites a property, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: f64) -> Option<f64> {
        self.0.insert(key.into(), value)
    }

    /// The value stored under `key`
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    /// The number of properties
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no property is set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Extracts the `required` keys on behalf of `mechanism`
    ///
    /// Fails on the first key that is not present.
    pub fn extract(
        &self,
        mechanism: &'static str,
        required: &'static [&'static str],
    ) -> Result<PropertySet, ScatteringError> {
        let values = required
            .iter()
            .map(|&key| {
                self.get(key)
                    .map(|value| (key, value))
                    .ok_or(ScatteringError::MissingProperty { mechanism, key })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PropertySet { mechanism, values })
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for MaterialProperties {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// The properties a single mechanism declared, in declaration order
#[derive(Clone, Debug, PartialEq)]
pub struct PropertySet {
    mechanism: &'static str,
    values: Vec<(&'static str, f64)>,
}

impl PropertySet {
    /// The value of a declared property
    pub fn get(&self, key: &'static str) -> Result<f64, ScatteringError> {
        self.values
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| *value)
            .ok_or(ScatteringError::MissingProperty {
                mechanism: self.mechanism,
                key,
            })
    }

    /// The value of a declared property which must be strictly positive
    pub fn positive(&self, key: &'static str) -> Result<f64, ScatteringError> {
        match self.get(key)? {
            value if value.is_finite() && value > 0. => Ok(value),
            value => Err(ScatteringError::InvalidProperty { key, value }),
        }
    }

    /// Iterates over the declared properties and their values
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.values.iter().copied()
    }

    /// The number of declared properties
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the mechanism declared no properties
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
