use std::sync::Once;

use env_logger::Builder;
use log::LevelFilter;

static INIT: Once = Once::new();

/// Installs an `env_logger` backend for the table's `log` events.
///
/// Other crates log at `warn`, this crate at `info`; `RUST_LOG` overrides both, e.g.
/// `RUST_LOG=chaintable=debug` to see resize events. Safe to call more than once.
pub fn initialize_logger() {
    INIT.call_once_force(|_| {
        let mut builder = Builder::new();
        builder
            .filter_level(LevelFilter::Warn)
            .filter_module("chaintable", LevelFilter::Info)
            .format_timestamp_millis()
            .parse_default_env();

        // another logger may already be installed by the host application
        let _ = builder.try_init();
    });
}
