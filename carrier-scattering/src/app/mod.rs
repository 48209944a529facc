// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Configuration and telemetry for programs driving the scattering calculations
mod configuration;
/// Subscriber set-up for console and file logging
pub mod telemetry;

pub use configuration::Configuration;
