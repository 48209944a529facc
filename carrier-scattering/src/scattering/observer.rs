// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use carrier_bands::Spin;

/// Callbacks fired while a mechanism computes its rates
///
/// Spins are processed in parallel, so `spin_completed` may be called from any thread and in any
/// order. Every method defaults to doing nothing.
pub trait ProgressObserver: Send + Sync {
    /// Called once before any spin channel is computed
    fn mechanism_started(&self, _name: &'static str, _number_of_spins: usize) {}

    /// Called as the rates of each spin channel are finished
    fn spin_completed(&self, _name: &'static str, _spin: Spin) {}

    /// Called once after every spin channel succeeded
    fn mechanism_finished(&self, _name: &'static str) {}
}

/// Ignores all progress
#[derive(Copy, Clone, Debug, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// Reports progress through `tracing`
#[derive(Copy, Clone, Debug, Default)]
pub struct TracingProgress;

impl ProgressObserver for TracingProgress {
    fn mechanism_started(&self, name: &'static str, number_of_spins: usize) {
        tracing::info!(
            "Calculating {} rates for {} spin channel(s)",
            name,
            number_of_spins
        );
    }

    fn spin_completed(&self, name: &'static str, spin: Spin) {
        tracing::debug!("{} rates for spin {} complete", name, spin);
    }

    fn mechanism_finished(&self, name: &'static str) {
        tracing::info!("{} rates complete", name);
    }
}
