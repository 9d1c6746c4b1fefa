use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

use crate::config::{ApplicationConfig, LogFormat};

pub(super) struct LoggerConfig {
    pub format: LogFormat,
    pub level: String,
}

impl From<&ApplicationConfig> for LoggerConfig {
    fn from(config: &ApplicationConfig) -> Self {
        LoggerConfig { format: config.log.format, level: config.log.level.clone() }
    }
}

/// `RUST_LOG` takes precedence over the configured level.
pub(super) fn init_logger(config: LoggerConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = SubscriberBuilder::default().with_env_filter(filter).with_writer(std::io::stderr);

    match config.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}
