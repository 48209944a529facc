// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::constants::VELOCITY_FLOOR;
use ndarray::{Array2, Array4};

/// Group velocity magnitudes of shape (nbands, nkpoints) from a (nbands, 3, 3, nkpoints) tensor of
/// velocity outer products
///
/// The magnitude is the norm of the square roots of the diagonal, multiplied by `scale` and then
/// raised to `VELOCITY_FLOOR`. Negative (or undefined) diagonal entries count as zero. Also
/// returns the number of raised entries.
pub(crate) fn group_velocity_magnitudes(
    velocities_product: &Array4<f64>,
    scale: f64,
) -> (Array2<f64>, usize) {
    let (nbands, _, _, nkpoints) = velocities_product.dim();
    let mut clamped = 0;
    let magnitudes = Array2::from_shape_fn((nbands, nkpoints), |(band, k)| {
        let speed = (0..3)
            .map(|i| velocities_product[[band, i, i, k]].max(0.))
            .sum::<f64>()
            .sqrt()
            * scale;
        if speed < VELOCITY_FLOOR {
            clamped += 1;
            VELOCITY_FLOOR
        } else {
            speed
        }
    });
    (magnitudes, clamped)
}
