use std::sync::Once;

/// Where log records are written.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum LogTarget {
    #[default]
    Stderr,
    /// Demos report failures on standard output.
    Stdout,
}

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "glint_engine=debug,wgpu=warn"). When unset, `RUST_LOG` is consulted.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    pub target: LogTarget,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            target: LogTarget::Stderr,
        }
    }
}

impl LoggingConfig {
    /// Default configuration writing to stdout.
    pub fn stdout() -> Self {
        Self {
            target: LogTarget::Stdout,
            ..Self::default()
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Subsequent calls are ignored. Call early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            // wgpu is chatty at info; keep it to warnings unless asked.
            builder
                .filter_level(log::LevelFilter::Info)
                .filter_module("wgpu_core", log::LevelFilter::Warn)
                .filter_module("wgpu_hal", log::LevelFilter::Warn)
                .filter_module("naga", log::LevelFilter::Warn);
        }

        builder.write_style(config.write_style);
        builder.target(match config.target {
            LogTarget::Stderr => env_logger::Target::Stderr,
            LogTarget::Stdout => env_logger::Target::Stdout,
        });

        // A logger installed by a test harness or host wins; keep going.
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized");
    });
}
