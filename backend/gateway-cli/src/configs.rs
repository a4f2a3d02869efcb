use std::path::PathBuf;

use common_utils::consts;
use connector_integration::utils::ErrorCodeMapping;
use domain_types::{
    router_data::ConnectorAuthType,
    types::{Connectors, Proxy},
};
use hyperswitch_masking::Secret;

use crate::{consts as cli_consts, logger::config::Log};

#[derive(Clone, serde::Deserialize, Debug)]
pub struct Config {
    pub common: Common,
    pub log: Log,
    #[serde(default)]
    pub proxy: Proxy,
    pub connectors: Connectors,
    pub paydock: PaydockSettings,
}

#[derive(Clone, serde::Deserialize, Debug)]
pub struct Common {
    pub environment: String,
}

impl Common {
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        match self.environment.as_str() {
            "development" | "production" => Ok(()),
            _ => Err(config::ConfigError::Message(format!(
                "Invalid environment '{}'. Must be 'development' or 'production'",
                self.environment
            ))),
        }
    }
}

/// Merchant credentials and behaviour of the PayDock gateway.
#[derive(Clone, serde::Deserialize, Debug)]
pub struct PaydockSettings {
    pub gateway_id: String,
    pub secret_key: Secret<String>,
    /// Send calls to the sandbox and flag every response as a test.
    #[serde(default)]
    pub test_mode: bool,
    /// Provider error code to standard error code.
    #[serde(default)]
    pub error_codes: ErrorCodeMapping,
}

impl PaydockSettings {
    pub fn auth_type(&self) -> ConnectorAuthType {
        ConnectorAuthType::BodyKey {
            api_key: self.secret_key.clone(),
            key1: Secret::new(self.gateway_id.clone()),
        }
    }
}

impl Config {
    /// Function to build the configuration by picking it from default locations
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::new_with_config_path(None)
    }

    /// Function to build the configuration by picking it from default locations
    pub fn new_with_config_path(
        explicit_config_path: Option<PathBuf>,
    ) -> Result<Self, config::ConfigError> {
        let env = consts::Env::current_env();
        let config_path = Self::config_path(&env, explicit_config_path);

        let config = Self::builder(&env)?
            .add_source(config::File::from(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(cli_consts::ENV_PREFIX)
                    .try_parsing(true)
                    .separator(cli_consts::ENV_SEPARATOR)
                    .list_separator(",")
                    .with_list_parse_key("proxy.bypass_proxy_urls"),
            )
            .build()?;

        #[allow(clippy::print_stderr)]
        let config: Self = serde_path_to_error::deserialize(config).map_err(|error| {
            eprintln!("Unable to deserialize application configuration: {error}");
            error.into_inner()
        })?;

        config.common.validate()?;

        Ok(config)
    }

    pub fn builder(
        environment: &consts::Env,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        config::Config::builder()
            // Here, it should be `set_override()` not `set_default()`.
            // "env" can't be altered by config field.
            .set_override("env", environment.to_string())
    }

    /// Config path.
    pub fn config_path(
        environment: &consts::Env,
        explicit_config_path: Option<PathBuf>,
    ) -> PathBuf {
        let mut config_path = PathBuf::new();
        if let Some(explicit_config_path_val) = explicit_config_path {
            config_path.push(explicit_config_path_val);
        } else {
            let config_directory: String = "config".into();
            let config_file_name = environment.config_path();

            config_path.push(workspace_path());
            config_path.push(config_directory);
            config_path.push(config_file_name);
        }
        config_path
    }
}

pub fn workspace_path() -> PathBuf {
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let mut path = PathBuf::from(manifest_dir);
        path.pop();
        path.pop();
        path
    } else {
        PathBuf::from(".")
    }
}
