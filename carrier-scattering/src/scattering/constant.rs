// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use super::{BuildMechanism, MechanismBase, MechanismContext, Rates, ScatteringMechanism};
use crate::ScatteringError;
use ndarray::Array4;

/// The same rate, `1 / τ`, for every carrier state
pub struct ConstantRelaxationTime {
    base: MechanismBase,
    rates: Rates,
}

impl BuildMechanism for ConstantRelaxationTime {
    const NAME: &'static str = "CRT";
    const REQUIRED_PROPERTIES: &'static [&'static str] = &["constant_relaxation_time"];

    fn build(base: MechanismBase, context: &MechanismContext<'_>) -> Result<Self, ScatteringError> {
        let rate = 1. / base.properties().positive("constant_relaxation_time")?;
        let (ndoping, ntemperatures) = context.structure.grid_shape();
        let nkpoints = context.structure.kpoint_mapping().number_of_kpoints();
        let rates = context.compute_per_spin(Self::NAME, |_, channel| {
            Ok(Array4::from_elem(
                (ndoping, ntemperatures, channel.number_of_bands(), nkpoints),
                rate,
            ))
        })?;
        Ok(Self { base, rates })
    }
}

impl ScatteringMechanism for ConstantRelaxationTime {
    fn base(&self) -> &MechanismBase {
        &self.base
    }

    fn rates(&self) -> &Rates {
        &self.rates
    }
}

#[cfg(test)]
mod test {
    use super::ConstantRelaxationTime;
    use crate::{
        material::MaterialProperties,
        scattering::{test::gaas, MechanismBuilder, ScatteringMechanism},
        ScatteringError,
    };
    use utilities::ParabolicStructure;

    #[test]
    fn every_rate_is_the_inverse_relaxation_time() {
        let structure = ParabolicStructure::default().build();
        let properties = gaas();
        let mechanism = MechanismBuilder::new()
            .with_material_properties(&properties)
            .with_electronic_structure(&structure)
            .build::<ConstantRelaxationTime>()
            .unwrap();
        let expected = 1. / 1e-14;
        for rates in mechanism.rates().values() {
            assert!(rates.iter().all(|&rate| rate == expected));
        }
    }

    #[test]
    fn non_positive_relaxation_times_are_rejected() {
        let structure = ParabolicStructure::default().build();
        let properties = MaterialProperties::new().with("constant_relaxation_time", 0.);
        let result = MechanismBuilder::new()
            .with_material_properties(&properties)
            .with_electronic_structure(&structure)
            .build::<ConstantRelaxationTime>();
        assert!(matches!(
            result,
            Err(ScatteringError::InvalidProperty {
                key: "constant_relaxation_time",
                ..
            })
        ));
    }
}
