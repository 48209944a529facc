// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::TelemetryError;
use std::path::Path;
use tracing::{subscriber::set_global_default, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_log::LogTracer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

/// Creates a subscriber which writes to `console::Term::stderr` and, when `log_directory` is
/// given, as JSON to `scattering.log` in that directory.
///
/// `RUST_LOG` takes precedence over `default_level`. The returned guard flushes the log file
/// when dropped, so it must be held for as long as the subscriber is in use.
pub fn get_subscriber(
    default_level: &str,
    log_directory: Option<&Path>,
) -> (impl Subscriber + Send + Sync, Option<WorkerGuard>) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = tracing_subscriber::fmt::Layer::new()
        .with_writer(console::Term::stderr)
        .without_time();

    let (file_layer, guard) = match log_directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::never(directory, "scattering.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::Layer::new()
                .with_writer(non_blocking)
                .json();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    (
        Registry::default()
            .with(env_filter)
            .with(fmt_layer)
            .with(file_layer),
        guard,
    )
}

/// Routes `log` records into `tracing` and installs `subscriber` as the global default
pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) -> Result<(), TelemetryError> {
    LogTracer::init()?;
    set_global_default(subscriber)?;
    Ok(())
}
