//! Logging setup using `tracing-subscriber`.
//!
//! Logs go to stderr so that `--json` output on stdout stays parseable.
//!
//! - no flag: `RUST_LOG` if set, otherwise `warn`
//! - `-v`: `debug` (stage counts, one line per dropped row)
//! - `-vv`: `trace`

use tracing_subscriber::EnvFilter;

pub fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // A second init (tests, embedding) is harmless; keep the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
