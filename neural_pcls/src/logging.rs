//! Process logger wired to the run log.
//!
//! Every `log::info!` line of a run is written verbatim (no level or
//! timestamp prefix) to `run.log` and echoed to stdout. `RUST_LOG` overrides
//! the default filter.

use std::io::Write;

use env_logger::{Builder, Env, Target};
use log::SetLoggerError;

use pcls_io::RunLog;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "warn,neural_pcls=info,pcls_io=info,pcls_core=info";

/// Install the global logger with `run_log` as its only sink.
///
/// Fails if a logger is already installed.
pub fn init_logging(run_log: RunLog) -> Result<(), SetLoggerError> {
    Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER))
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .target(Target::Pipe(Box::new(run_log)))
        .try_init()
}
