use tracing::subscriber::{set_global_default, SetGlobalDefaultError};
use tracing::Subscriber;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::{log::SetLoggerError, LogTracer};
use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt, EnvFilter, Registry};

/// HTTP client internals are very chatty at `debug`/`info`: they are kept at `warn`
/// unless `RUST_LOG` explicitly asks for more.
const QUIET_DEPENDENCIES: [&str; 4] = ["hyper=warn", "h2=warn", "reqwest=warn", "rustls=warn"];

/// Builds the filter directives used when `RUST_LOG` is not set
///
/// For ex: `info` gives `info,hyper=warn,h2=warn,reqwest=warn,rustls=warn`
pub fn fallback_filter_directives(level: &str) -> String {
    std::iter::once(level)
        .chain(QUIET_DEPENDENCIES)
        .collect::<Vec<_>>()
        .join(",")
}

/// Composes the layers processing our spans and events into a single `tracing` Subscriber.
///
/// - an `EnvFilter` reading `RUST_LOG`, or `fallback_level` (see `fallback_filter_directives`)
/// - a `JsonStorageLayer` keeping span fields so they are attached to every nested event
/// - a bunyan formatter writing one JSON object per line to `sink`
///
/// # Arguments
/// - `name`: name of the service, written in every record
/// - `fallback_level`: level used if the RUST_LOG env variable has not been set
/// - `sink`: where the records are written (stdout for the service, `std::io::sink` for silent tests)
pub fn get_tracing_subscriber<Sink>(
    name: String,
    fallback_level: String,
    sink: Sink,
) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback_filter_directives(&fallback_level)));

    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(BunyanFormattingLayer::new(name, sink))
}

/// Registers `subscriber` as the process-wide default and redirects `log` records to it.
///
/// Only the first call can succeed: a second one returns an error instead of panicking.
pub fn init_tracing_subscriber(
    subscriber: impl Subscriber + Send + Sync,
) -> Result<(), TelemetryError> {
    LogTracer::init()?;
    set_global_default(subscriber)?;
    Ok(())
}

#[derive(thiserror::Error)]
pub enum TelemetryError {
    #[error("Failed to redirect `log` records to tracing: {0}")]
    LogTracer(#[from] SetLoggerError),
    #[error("Failed to set the global tracing subscriber: {0}")]
    GlobalDefault(#[from] SetGlobalDefaultError),
}

impl std::fmt::Debug for TelemetryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::helper::error_chain_fmt(self, f)
    }
}
