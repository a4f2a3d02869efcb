use async_trait::async_trait;
use common_utils::{request::Request, types::MinorUnit, CustomResult};
use domain_types::{
    errors::{ApiClientError, ConnectorError},
    payment_method_data::Card,
    router_request_types::{GatewayOptions, PaymentAuthorization},
    router_response_types::{GatewayResponse, Response},
};

use crate::api::ConnectorCommon;

/// Sends a prepared request to the connector.
///
/// `Ok(Ok(_))` is a 2xx reply, `Ok(Err(_))` a reply with an error status whose body may
/// still describe the failure, and `Err(_)` means no usable reply was received.
#[async_trait]
pub trait ConnectorTransport: Send + Sync {
    async fn send(
        &self,
        request: Request,
    ) -> CustomResult<Result<Response, Response>, ApiClientError>;
}

pub type BoxedConnectorTransport = std::sync::Arc<dyn ConnectorTransport>;

/// The payment operations a caller can run without knowing the provider's API.
///
/// Contract violations (an undecodable authorization, a missing charge id) are returned as
/// `Err`; anything the provider or the network reports is an unsuccessful `GatewayResponse`.
#[async_trait]
pub trait PaymentGateway: ConnectorCommon + Send + Sync {
    /// Tokenize a card, optionally under a new or existing customer.
    async fn store(
        &self,
        card: Card,
        options: &GatewayOptions,
    ) -> CustomResult<GatewayResponse, ConnectorError>;

    /// Delete what an authorization refers to. `None` when there is nothing to delete.
    async fn unstore(
        &self,
        authorization: &str,
        options: &GatewayOptions,
    ) -> CustomResult<Option<GatewayResponse>, ConnectorError>;

    async fn purchase(
        &self,
        amount: MinorUnit,
        authorization: PaymentAuthorization,
        options: &GatewayOptions,
    ) -> CustomResult<GatewayResponse, ConnectorError>;

    /// Same as `purchase` without capturing the funds.
    async fn authorize(
        &self,
        amount: MinorUnit,
        authorization: PaymentAuthorization,
        options: &GatewayOptions,
    ) -> CustomResult<GatewayResponse, ConnectorError>;

    async fn capture(
        &self,
        amount: MinorUnit,
        authorization: &str,
        options: &GatewayOptions,
    ) -> CustomResult<GatewayResponse, ConnectorError>;

    async fn refund(
        &self,
        amount: MinorUnit,
        authorization: &str,
        options: &GatewayOptions,
    ) -> CustomResult<GatewayResponse, ConnectorError>;
}
