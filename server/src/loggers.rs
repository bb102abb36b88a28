use tracing::metadata::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{filter, fmt, Layer};

use crate::config::Config;

static LOG_FILE: &str = "cirrus_server.log";

pub fn init(config: &Config) {
    std::fs::create_dir_all(&config.server.log_path)
        .expect("unable to create directory for logger");

    let log_level = std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|s| s.as_str().parse().ok())
        .unwrap_or(LevelFilter::INFO);

    let mut layers = Vec::with_capacity(2);

    layers.push(
        fmt::Layer::new()
            .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
            .with_ansi(false)
            .with_target(true)
            .with_writer(tracing_appender::rolling::never(&config.server.log_path, LOG_FILE))
            .with_filter(log_level)
            .with_filter(filter::filter_fn(|metadata| {
                metadata.target().starts_with("cirrus")
            }))
            .boxed(),
    );

    layers.push(
        fmt::Layer::new()
            .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
            .with_ansi(true)
            .with_target(true)
            .with_filter(log_level)
            .with_filter(filter::filter_fn(|metadata| {
                metadata.target().starts_with("cirrus")
            }))
            .boxed(),
    );

    tracing::subscriber::set_global_default(tracing_subscriber::Registry::default().with(layers))
        .expect("Failed setting logger!");
}
