//! Logger setup.

use env_logger::Env;

/// Initialise `env_logger`. `RUST_LOG` wins over `--verbose`.
pub fn init(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };

    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_target(false)
        .init();
}
