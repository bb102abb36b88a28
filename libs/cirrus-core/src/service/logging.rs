use std::env;

use tracing::metadata::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{filter, fmt, Layer};

use crate::model::config::Config;
use crate::model::errors::{core_err_unexpected, CoreResult};

pub static LOG_FILE: &str = "cirrus.log";

pub fn init(config: &Config) -> CoreResult<()> {
    if config.logs {
        let log_level = env::var("LOG_LEVEL")
            .ok()
            .and_then(|s| s.as_str().parse().ok())
            .unwrap_or(LevelFilter::DEBUG);

        let mut layers = Vec::with_capacity(2);

        layers.push(
            fmt::Layer::new()
                .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
                .with_ansi(false)
                .with_target(true)
                .with_writer(tracing_appender::rolling::never(&config.writeable_path, LOG_FILE))
                .with_filter(log_level)
                .with_filter(filter::filter_fn(|metadata| {
                    metadata.target().starts_with("cirrus")
                }))
                .boxed(),
        );

        layers.push(
            fmt::Layer::new()
                .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
                .with_ansi(config.colored_logs)
                .with_target(true)
                .with_filter(log_level)
                .with_filter(filter::filter_fn(|metadata| {
                    metadata.target().starts_with("cirrus")
                }))
                .boxed(),
        );

        tracing::subscriber::set_global_default(
            tracing_subscriber::Registry::default().with(layers),
        )
        .map_err(core_err_unexpected)?;
    }
    Ok(())
}
