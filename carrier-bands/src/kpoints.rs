use crate::{error::check_shape, BandsError};
use ndarray::{Array, ArrayBase, Axis, Data, RemoveAxis};

/// Maps between the full k-point mesh and its symmetry-irreducible representatives
///
/// `ir_kpoints_idx[i]` is the index in the full mesh of the `i`th irreducible point, and
/// `ir_to_full_kpoint_mapping[k]` is the position in `ir_kpoints_idx` of the representative of
/// full-mesh point `k`. All tensors carry the k-point on their last axis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KpointMapping {
    ir_kpoints_idx: Vec<usize>,
    ir_to_full_kpoint_mapping: Vec<usize>,
}

impl KpointMapping {
    /// Validates and builds a mapping
    ///
    /// Every irreducible index must lie on the full mesh, every full point must map to an
    /// existing representative and each representative must map to itself.
    pub fn new(
        ir_kpoints_idx: Vec<usize>,
        ir_to_full_kpoint_mapping: Vec<usize>,
    ) -> Result<Self, BandsError> {
        let number_of_kpoints = ir_to_full_kpoint_mapping.len();
        let number_of_irreducible = ir_kpoints_idx.len();
        if number_of_irreducible == 0 {
            return Err(BandsError::InvalidMapping(
                "no irreducible k-points were provided".into(),
            ));
        }
        if let Some(index) = ir_kpoints_idx
            .iter()
            .find(|&&index| index >= number_of_kpoints)
        {
            return Err(BandsError::InvalidMapping(format!(
                "irreducible k-point {index} lies outside the full mesh of {number_of_kpoints} points"
            )));
        }
        if let Some((full_index, position)) = ir_to_full_kpoint_mapping
            .iter()
            .enumerate()
            .find(|(_, &position)| position >= number_of_irreducible)
        {
            return Err(BandsError::InvalidMapping(format!(
                "k-point {full_index} maps to representative {position} but only {number_of_irreducible} exist"
            )));
        }
        for (position, &full_index) in ir_kpoints_idx.iter().enumerate() {
            if ir_to_full_kpoint_mapping[full_index] != position {
                return Err(BandsError::InvalidMapping(format!(
                    "irreducible k-point {full_index} maps to representative {} rather than itself",
                    ir_to_full_kpoint_mapping[full_index]
                )));
            }
        }
        Ok(Self {
            ir_kpoints_idx,
            ir_to_full_kpoint_mapping,
        })
    }

    /// A mapping for a mesh with no symmetry reduction
    pub fn identity(number_of_kpoints: usize) -> Self {
        Self {
            ir_kpoints_idx: (0..number_of_kpoints).collect(),
            ir_to_full_kpoint_mapping: (0..number_of_kpoints).collect(),
        }
    }

    pub fn ir_kpoints_idx(&self) -> &[usize] {
        &self.ir_kpoints_idx
    }

    pub fn ir_to_full_kpoint_mapping(&self) -> &[usize] {
        &self.ir_to_full_kpoint_mapping
    }

    pub fn number_of_kpoints(&self) -> usize {
        self.ir_to_full_kpoint_mapping.len()
    }

    pub fn number_of_irreducible_kpoints(&self) -> usize {
        self.ir_kpoints_idx.len()
    }

    /// Selects the irreducible points from a tensor defined on the full mesh
    pub fn restrict<A, S, D>(&self, tensor: &ArrayBase<S, D>) -> Result<Array<A, D>, BandsError>
    where
        A: Copy,
        S: Data<Elem = A>,
        D: RemoveAxis,
    {
        let axis = Self::kpoint_axis(tensor, "tensor restricted to the irreducible mesh")?;
        let mut expected = tensor.shape().to_vec();
        expected[axis.index()] = self.number_of_kpoints();
        check_shape(
            "tensor restricted to the irreducible mesh",
            &expected,
            tensor.shape(),
        )?;
        Ok(tensor.select(axis, &self.ir_kpoints_idx))
    }

    /// Expands a tensor defined on the irreducible points back onto the full mesh
    ///
    /// Every full point takes the value of its irreducible representative.
    pub fn expand<A, S, D>(&self, tensor: &ArrayBase<S, D>) -> Result<Array<A, D>, BandsError>
    where
        A: Copy,
        S: Data<Elem = A>,
        D: RemoveAxis,
    {
        let axis = Self::kpoint_axis(tensor, "tensor expanded to the full mesh")?;
        let mut expected = tensor.shape().to_vec();
        expected[axis.index()] = self.number_of_irreducible_kpoints();
        check_shape(
            "tensor expanded to the full mesh",
            &expected,
            tensor.shape(),
        )?;
        Ok(tensor.select(axis, &self.ir_to_full_kpoint_mapping))
    }

    fn kpoint_axis<S: Data, D: RemoveAxis>(
        tensor: &ArrayBase<S, D>,
        quantity: &str,
    ) -> Result<Axis, BandsError> {
        match tensor.ndim() {
            0 => Err(BandsError::InconsistentShape {
                quantity: quantity.to_string(),
                expected: vec![0],
                found: vec![],
            }),
            ndim => Ok(Axis(ndim - 1)),
        }
    }
}
