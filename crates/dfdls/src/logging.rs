use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::Registry;

use crate::args::GlobalArgs;

/// Install a stderr subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the level follows the command line:
/// `-q` turns logging off, each `-v` raises it, and `debug = true` in the
/// settings starts from `debug` instead of `warn`.
pub fn init_tracing(global: &GlobalArgs, debug: bool) {
    let level = if global.quiet {
        "off"
    } else {
        match (global.verbose, debug) {
            (0, false) => "warn",
            (0, true) | (1, _) => "debug",
            _ => "trace",
        }
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_filter(env_filter);

    Registry::default().with(stderr_layer).init();
}
