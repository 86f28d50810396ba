use tracing_subscriber::{
    EnvFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

pub fn init_logging(verbose: bool) {
    let env_directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time().with_writer(std::io::stderr))
        .with(log_filter(verbose, env_directives.as_deref()))
        .init();
}

/// `RUST_LOG` wins when set. Otherwise `--verbose` turns on debug output for
/// this crate only and everything stays silent without it.
fn log_filter(verbose: bool, env_directives: Option<&str>) -> EnvFilter {
    match env_directives {
        Some(directives) if !directives.trim().is_empty() => EnvFilter::new(directives),
        _ if verbose => EnvFilter::new("fxconv=debug"),
        _ => EnvFilter::new("off"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    fn crate_debug_enabled(filter: EnvFilter) -> bool {
        let subscriber = tracing_subscriber::registry().with(filter);
        tracing::subscriber::with_default(subscriber, || {
            tracing::event_enabled!(target: "fxconv::core::orchestrator", Level::DEBUG)
        })
    }

    #[test]
    fn test_rust_log_enables_crate_logs_without_verbose() {
        assert!(crate_debug_enabled(log_filter(false, Some("fxconv=debug"))));
        assert!(crate_debug_enabled(log_filter(false, Some("debug"))));
    }

    #[test]
    fn test_verbose_enables_crate_debug() {
        assert!(crate_debug_enabled(log_filter(true, None)));
        assert!(crate_debug_enabled(log_filter(true, Some("  "))));
    }

    #[test]
    fn test_silent_by_default() {
        assert!(!crate_debug_enabled(log_filter(false, None)));
        assert!(!crate_debug_enabled(log_filter(false, Some(""))));
    }

    #[test]
    fn test_rust_log_overrides_verbose() {
        assert!(!crate_debug_enabled(log_filter(true, Some("fxconv=warn"))));
    }
}
