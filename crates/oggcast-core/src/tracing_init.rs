//! Diagnostics setup for the `oggcast` binary.
//!
//! Stdout is left alone so the relay can sit in a shell pipeline; every log
//! line goes to stderr. Byte-count reports use their own target, which stays
//! enabled whatever level the user picks.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::relay::REPORT_TARGET;

/// Build the filter from a directive string such as `"warn"` or
/// `"oggcast_core=debug,info"`, with byte-count reports always on.
pub fn env_filter(directives: &str) -> EnvFilter {
    let filter = EnvFilter::new(directives);
    match format!("{REPORT_TARGET}=info").parse() {
        Ok(report) => filter.add_directive(report),
        Err(_) => filter,
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `log_level` (the `--log-level` value). With
/// `log_json` each event is written as one JSON object per line.
pub fn init_tracing(log_level: &str, log_json: bool) {
    let directives = std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string());
    let registry = tracing_subscriber::registry().with(env_filter(&directives));
    let fmt = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    if log_json {
        registry.with(fmt.json()).init();
    } else {
        registry.with(fmt).init();
    }
}
