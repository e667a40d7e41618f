use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt, prelude::*};

/// Crates whose events follow the default level; everything else, notably
/// the http stack underneath the fetcher, is held at `warn`.
const OWN_CRATES: &[&str] = &["loadcache", "common", "storage", "fetcher"];

/// Installs the global subscriber writing to stdout.
///
/// The returned guard flushes the non-blocking writer on drop, keep it alive
/// for the whole program. A set `RUST_LOG` replaces the default directives.
pub fn logging_stdout() -> impl Drop {
    let (nonblocking, guard) = tracing_appender::non_blocking(std::io::stdout());

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(nonblocking)
                .with_target(cfg!(debug_assertions))
                .with_file(cfg!(debug_assertions))
                .with_line_number(cfg!(debug_assertions)),
        )
        .with(env_filter())
        .init();

    guard
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::builder().parse_lossy(default_directives(default_level())))
}

fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    }
}

fn default_directives(level: LevelFilter) -> String {
    let mut directives = String::from("warn");
    for name in OWN_CRATES {
        directives.push_str(&format!(",{name}={level}"));
    }
    directives
}
