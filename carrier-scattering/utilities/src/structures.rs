use carrier_bands::{
    DensityOfStates, ElectronicStructure, ElectronicStructureBuilder, KpointMapping, Regime, Spin,
    SpinChannel, SpinMap,
};
use ndarray::{Array1, Array2, Array4};
use rand::Rng;
use std::f64::consts::PI;

/// A two band semiconductor with isotropic parabolic valence and conduction bands
///
/// The k-points lie on a line through Γ, symmetric under inversion, so the irreducible set is
/// the half line `k >= 0`. All quantities are in atomic units.
#[derive(Clone, Debug)]
pub struct ParabolicStructure {
    /// Odd, so that Γ is on the mesh
    pub number_of_kpoints: usize,
    pub maximum_wavevector: f64,
    pub spins: Vec<Spin>,
    pub band_gap: f64,
    pub electron_mass: f64,
    pub hole_mass: f64,
    pub c_factor: f64,
    pub doping: Vec<f64>,
    pub temperatures: Vec<f64>,
    pub volume: f64,
}

impl Default for ParabolicStructure {
    fn default() -> Self {
        Self {
            number_of_kpoints: 21,
            maximum_wavevector: 0.2,
            spins: vec![Spin::Up],
            band_gap: 0.05,
            electron_mass: 0.067,
            hole_mass: 0.5,
            c_factor: 0.3,
            // 1e18 cm^-3 of electrons and 1e19 cm^-3 of holes
            doping: vec![-1.48e-7, 1.48e-6],
            temperatures: vec![100., 300.],
            volume: 306.,
        }
    }
}

impl ParabolicStructure {
    /// Draws band parameters uniformly from a physically sensible range
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            band_gap: rng.gen_range(0.01..0.1),
            electron_mass: rng.gen_range(0.05..1.0),
            hole_mass: rng.gen_range(0.1..2.0),
            c_factor: rng.gen_range(0.0..1.0),
            ..Self::default()
        }
    }

    pub fn wavevectors(&self) -> Array1<f64> {
        Array1::linspace(
            -self.maximum_wavevector,
            self.maximum_wavevector,
            self.number_of_kpoints,
        )
    }

    pub fn kpoint_mapping(&self) -> KpointMapping {
        let centre = (self.number_of_kpoints - 1) / 2;
        let ir_kpoints_idx = (centre..self.number_of_kpoints).collect();
        let ir_to_full = (0..self.number_of_kpoints)
            .map(|index| (index as isize - centre as isize).unsigned_abs())
            .collect();
        KpointMapping::new(ir_kpoints_idx, ir_to_full).expect("The inversion mapping is valid")
    }

    fn channel(&self) -> SpinChannel {
        let wavevectors = self.wavevectors();
        let nkpoints = self.number_of_kpoints;
        // band 0 is the valence band, band 1 the conduction band
        let masses = [-self.hole_mass, self.electron_mass];
        let offsets = [0., self.band_gap];

        let energies = Array2::from_shape_fn((2, nkpoints), |(band, k)| {
            offsets[band] + wavevectors[k].powi(2) / (2. * masses[band])
        });
        // The group velocity points along (1, 1, 1) so every component carries a third of |v|^2
        let velocities_product = Array4::from_shape_fn((2, 3, 3, nkpoints), |(band, _, _, k)| {
            (wavevectors[k] / masses[band]).powi(2) / 3.
        });
        let effective_mass = Array4::from_shape_fn((2, 3, 3, nkpoints), |(band, i, j, _)| {
            if i == j {
                masses[band]
            } else {
                0.
            }
        });
        let c_factor = Array2::from_elem((2, nkpoints), self.c_factor);

        SpinChannel {
            energies,
            velocities_product,
            effective_mass,
            c_factor,
        }
    }

    fn density_of_states(&self) -> DensityOfStates {
        let energies = Array1::linspace(-0.5, self.band_gap + 0.5, 2001);
        let density = |mass: f64, depth: f64| {
            if depth > 0. {
                self.volume * (2. * mass).powf(1.5) * depth.sqrt() / (2. * PI.powi(2))
            } else {
                0.
            }
        };
        let densities = energies.mapv(|energy| {
            density(self.electron_mass, energy - self.band_gap) + density(self.hole_mass, -energy)
        });
        DensityOfStates::new(energies, densities, self.volume)
            .expect("The parabolic density of states is valid")
    }

    pub fn build(&self) -> ElectronicStructure {
        let grid = (self.doping.len(), self.temperatures.len());
        let electron_conc =
            Array2::from_shape_fn(grid, |(n, _)| (-self.doping[n]).max(0.) + 1e-12);
        let hole_conc = Array2::from_shape_fn(grid, |(n, _)| self.doping[n].max(0.) + 1e-12);

        let builder = self.spins.iter().fold(
            ElectronicStructureBuilder::new(),
            |builder, &spin| builder.with_spin_channel(spin, self.channel()),
        );
        builder
            .with_doping_and_temperatures(
                Array1::from(self.doping.clone()),
                Array1::from(self.temperatures.clone()),
            )
            .with_fermi_levels(Array2::from_elem(grid, self.band_gap / 2.))
            .with_carrier_concentrations(electron_conc, hole_conc)
            .with_kpoint_mapping(self.kpoint_mapping())
            .with_regime(Regime::Semiconductor {
                vb_idx: self.spins.iter().map(|&spin| (spin, 0)).collect::<SpinMap<_>>(),
            })
            .with_density_of_states(self.density_of_states())
            .build()
            .expect("The parabolic structure is consistent")
    }
}

/// A single free-electron band crossing the intrinsic Fermi level at `fermi_wavevector`
pub fn metallic_structure(number_of_kpoints: usize, fermi_wavevector: f64) -> ElectronicStructure {
    let wavevectors = Array1::linspace(0., 2. * fermi_wavevector, number_of_kpoints);
    let fermi_level = fermi_wavevector.powi(2) / 2.;
    let channel = SpinChannel {
        energies: Array2::from_shape_fn((1, number_of_kpoints), |(_, k)| {
            wavevectors[k].powi(2) / 2.
        }),
        velocities_product: Array4::from_shape_fn((1, 3, 3, number_of_kpoints), |(_, _, _, k)| {
            wavevectors[k].powi(2) / 3.
        }),
        effective_mass: Array4::from_shape_fn((1, 3, 3, number_of_kpoints), |(_, i, j, _)| {
            if i == j {
                1.
            } else {
                0.
            }
        }),
        c_factor: Array2::zeros((1, number_of_kpoints)),
    };
    ElectronicStructureBuilder::new()
        .with_spin_channel(Spin::Up, channel)
        .with_doping_and_temperatures(Array1::from(vec![0.]), Array1::from(vec![300.]))
        .with_fermi_levels(Array2::from_elem((1, 1), fermi_level))
        .with_carrier_concentrations(Array2::from_elem((1, 1), 1e-3), Array2::zeros((1, 1)))
        .with_kpoint_mapping(KpointMapping::identity(number_of_kpoints))
        .with_regime(Regime::Metal {
            intrinsic_fermi_level: fermi_level,
        })
        .build()
        .expect("The metallic structure is consistent")
}
