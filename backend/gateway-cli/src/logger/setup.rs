//! Setup logging subsystem.
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use super::config;
use crate::{consts, error::ConfigurationError};

/// Contains guards necessary for logging
#[derive(Debug)]
pub struct TelemetryGuard {
    _log_guards: Vec<WorkerGuard>,
}

/// Setup logging sub-system specifying the logging configuration, service (binary) name, and a
/// list of external crates for which a more verbose logging must be enabled. All crates within the
/// current cargo workspace are automatically considered for verbose logging.
///
/// Logs go to stderr, stdout is reserved for the command output.
pub fn setup(
    config: &config::Log,
    service_name: &str,
    crates_to_filter: impl AsRef<[&'static str]>,
) -> Result<TelemetryGuard, ConfigurationError> {
    let mut guards = Vec::new();

    let console_layer = if config.console.enabled {
        let console_filter_directive =
            config
                .console
                .filtering_directive
                .clone()
                .unwrap_or_else(|| {
                    get_envfilter_directive(
                        tracing::Level::WARN,
                        config.console.level.into_level(),
                        crates_to_filter.as_ref(),
                    )
                });
        let console_filter = EnvFilter::builder()
            .with_default_directive(config.console.level.into_level().into())
            .parse_lossy(console_filter_directive);

        let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
        guards.push(guard);

        let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.console.log_format {
            config::LogFormat::Default => fmt::layer().with_writer(writer).boxed(),
            config::LogFormat::Json => {
                // Disable color or emphasis related ANSI escape codes for JSON formats
                error_stack::Report::set_color_mode(error_stack::fmt::ColorMode::None);

                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(writer)
                    .boxed()
            }
        };
        Some(layer.with_filter(console_filter))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .try_init()?;

    tracing::info!(
        service_name,
        build_version = crate::version!(),
        "Logging subsystem initialized"
    );

    // Returning the TelemetryGuard for logs to be printed until it is dropped
    Ok(TelemetryGuard {
        _log_guards: guards,
    })
}

fn get_envfilter_directive(
    default_log_level: tracing::Level,
    filter_log_level: tracing::Level,
    crates_to_filter: &[&'static str],
) -> String {
    let explicitly_handled_targets = consts::WORKSPACE_CRATES
        .iter()
        .chain(crates_to_filter.iter());

    std::iter::once(default_log_level.to_string())
        .chain(
            explicitly_handled_targets
                .map(|crate_name| format!("{}={filter_log_level}", crate_name.replace('-', "_"))),
        )
        .collect::<Vec<_>>()
        .join(",")
}
