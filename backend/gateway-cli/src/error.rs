#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Failed while loading configuration: {0}")]
    ConfigError(#[from] config::ConfigError),
    #[error("Failed while initializing the logger: {0}")]
    LoggerError(#[from] tracing_subscriber::util::TryInitError),
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Invalid gateway options: {0}")]
    InvalidOptions(String),
    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),
    #[error("Failed while building the PayDock gateway")]
    GatewaySetupFailed,
    #[error("Gateway operation failed")]
    OperationFailed,
}
