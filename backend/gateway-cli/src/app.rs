use std::sync::Arc;

use common_utils::{types::MinorUnit, CustomResult};
use connector_integration::types::{ConnectorData, ConnectorEnum};
use domain_types::{router_request_types::GatewayOptions, router_response_types::GatewayResponse};
use error_stack::ResultExt;
use external_services::HttpTransport;
use interfaces::connector_types::BoxedConnectorTransport;

use crate::{
    cli::{Cli, Command},
    configs, consts,
    error::CliError,
    logger,
};

/// Builds the PayDock gateway described by the configuration, sending through `transport`.
pub fn gateway_with_transport(
    config: &configs::Config,
    transport: BoxedConnectorTransport,
) -> CustomResult<ConnectorData, CliError> {
    ConnectorData::get_connector_by_name(
        ConnectorEnum::Paydock,
        config.paydock.auth_type(),
        config.connectors.clone(),
        transport,
        config.paydock.test_mode,
        config.paydock.error_codes.clone(),
    )
    .change_context(CliError::GatewaySetupFailed)
}

pub fn gateway(config: &configs::Config) -> CustomResult<ConnectorData, CliError> {
    let transport = Arc::new(HttpTransport::new(
        config.proxy.clone(),
        consts::CONNECTOR_NAME,
    ));
    gateway_with_transport(config, transport)
}

/// Runs one command. `Ok(None)` only for an unstore with nothing to delete.
pub async fn run(
    gateway: &ConnectorData,
    command: Command,
    options: &GatewayOptions,
) -> CustomResult<Option<GatewayResponse>, CliError> {
    let connector = &gateway.connector;
    logger::debug!(
        connector = %gateway.connector_name,
        command = command.name(),
        "running gateway command"
    );

    let response = match command {
        Command::Store { card } => connector.store(card.into(), options).await.map(Some),
        Command::Unstore { authorization } => connector.unstore(&authorization, options).await,
        Command::Purchase { amount, source } => connector
            .purchase(MinorUnit::new(amount), source.into_authorization()?, options)
            .await
            .map(Some),
        Command::Authorize { amount, source } => connector
            .authorize(MinorUnit::new(amount), source.into_authorization()?, options)
            .await
            .map(Some),
        Command::Capture {
            amount,
            authorization,
        } => connector
            .capture(MinorUnit::new(amount), &authorization, options)
            .await
            .map(Some),
        Command::Refund {
            amount,
            authorization,
        } => connector
            .refund(MinorUnit::new(amount), &authorization, options)
            .await
            .map(Some),
    }
    .change_context(CliError::OperationFailed)?;

    if let Some(response) = &response {
        logger::info!(
            success = response.success,
            message = %response.message,
            error_code = ?response.error_code,
            "gateway command finished"
        );
    }
    Ok(response)
}

/// Parses the options of `cli` and runs its command against the configured gateway.
pub async fn execute(
    cli: Cli,
    config: &configs::Config,
) -> CustomResult<Option<GatewayResponse>, CliError> {
    let options = cli.gateway_options()?;
    let gateway = gateway(config)?;
    run(&gateway, cli.command, &options).await
}
