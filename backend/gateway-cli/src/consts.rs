/// Connector name attached to outgoing request spans and metrics.
pub const CONNECTOR_NAME: &str = "paydock";

/// Prefix of the environment variables overriding file configuration, e.g.
/// `CS__PAYDOCK__SECRET_KEY`.
pub const ENV_PREFIX: &str = "CS";
pub const ENV_SEPARATOR: &str = "__";

/// Crates of this workspace, logged at the configured level instead of the default one.
pub const WORKSPACE_CRATES: [&str; 7] = [
    "gateway_cli",
    "connector_integration",
    "external_services",
    "domain_types",
    "interfaces",
    "ucs_common_utils",
    "ucs_common_enums",
];
