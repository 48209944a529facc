//! Containers for a precomputed electronic structure
//!
//! The band energies, group velocities, effective masses and carrier statistics consumed by the
//! scattering engine all live in an [`ElectronicStructure`]. Every tensor indexed by k-point is
//! defined over the full mesh, the [`KpointMapping`] restricts them to the symmetry-irreducible
//! set and expands irreducible quantities back onto the full mesh.

mod dos;
mod error;
mod kpoints;
mod spin;
mod structure;

pub use dos::*;
pub use error::*;
pub use kpoints::*;
pub use spin::*;
pub use structure::*;
