use std::sync::Once;

use chaintable::common::logger::initialize_logger;

static INIT: Once = Once::new();

/// Routes table logs to the test output, at `info` for this crate unless `RUST_LOG` is
/// already set.
pub fn init_test_logger() {
    INIT.call_once(|| {
        if std::env::var_os("RUST_LOG").is_none() {
            // runs once, before any test thread reads the environment
            unsafe {
                std::env::set_var("RUST_LOG", "warn,chaintable=info");
            }
        }
        initialize_logger();
    });
}
