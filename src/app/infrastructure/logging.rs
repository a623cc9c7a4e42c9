use env_logger::Env;

/// Default filter when `RUST_LOG` is unset. Reconciliation noise lives at debug.
const DEFAULT_FILTER: &str = "warn";

/// Install the global logger. Safe to call more than once; later calls are ignored.
pub fn init_logging(verbose: bool) {
    let filter = if verbose { "debug" } else { DEFAULT_FILTER };
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .try_init();
}
