use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `-d` wins over `-v`; without either only warnings (skipped tools, failed
/// steps) reach stderr.
pub fn level_from_flags(verbose: bool, debug: bool) -> Level {
    match (debug, verbose) {
        (true, _) => Level::DEBUG,
        (false, true) => Level::INFO,
        (false, false) => Level::WARN,
    }
}

/// Logs go to stderr so stdout stays clean for the status lines and summary.
/// `RUST_LOG`, when set, replaces the flag-derived filter entirely.
pub fn init(level: Level) -> Result<()> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives)?,
        _ => EnvFilter::new(format!("warn,surfacerecon={}", level)),
    };

    let layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(level == Level::DEBUG);

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if level == Level::DEBUG {
        registry.with(layer).try_init()
    } else {
        registry.with(layer.without_time()).try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_overrides_verbose() {
        assert_eq!(level_from_flags(false, false), Level::WARN);
        assert_eq!(level_from_flags(true, false), Level::INFO);
        assert_eq!(level_from_flags(true, true), Level::DEBUG);
        assert_eq!(level_from_flags(false, true), Level::DEBUG);
    }
}
