use std::collections::BTreeMap;

/// A spin channel of the electronic structure
///
/// Unpolarised calculations carry only `Up`
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Spin {
    Up,
    Down,
}

impl std::fmt::Display for Spin {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Spin::Up => {
                write!(f, "up")
            }
            Spin::Down => {
                write!(f, "down")
            }
        }
    }
}

/// Per-spin storage, ordered so iteration is always `Up` then `Down`
pub type SpinMap<V> = BTreeMap<Spin, V>;
