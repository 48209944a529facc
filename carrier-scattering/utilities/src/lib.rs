pub mod structures;

pub use structures::{metallic_structure, ParabolicStructure};
