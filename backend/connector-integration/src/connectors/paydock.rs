pub mod authorization;
pub mod test;
pub mod transformers;

use async_trait::async_trait;
use common_enums::Currency;
use common_utils::{
    consts,
    errors::CustomResult,
    ext_traits::{BytesExt, ValueExt},
    request::{Method, Request, RequestContent},
    types::{AmountConvertor, MinorUnit, StringMajorUnit, StringMajorUnitForConnector},
};
use domain_types::{
    errors::ConnectorError,
    payment_method_data::Card,
    router_data::ConnectorAuthType,
    router_request_types::{GatewayOptions, PaymentAuthorization},
    router_response_types::{ConnectorInfo, GatewayResponse, Response},
    types::Connectors,
};
use error_stack::{report, ResultExt};
use hyperswitch_masking::{Mask, Maskable, PeekInterface};
use interfaces::{
    api::ConnectorCommon,
    connector_types::{BoxedConnectorTransport, PaymentGateway},
};
use tracing::Instrument;

use self::{
    authorization::IdentifierSet,
    transformers::{
        self as paydock, PaydockAmount, PaydockAuthType, PaydockOperation, PaydockRequest,
        PaydockResponse, PaydockRouterData, PaydockStoreRequest,
    },
};
use crate::utils::ErrorCodeMapping;

pub(crate) mod headers {
    pub(crate) const X_ACCEPTS: &str = "X-Accepts";
    pub(crate) const USER_AGENT: &str = "User-Agent";
    pub(crate) const X_CLIENT_IP: &str = "X-Client-IP";
    pub(crate) const X_USER_SECRET_KEY: &str = "X-User-Secret-Key";
}

pub const DEFAULT_CURRENCY: Currency = Currency::AUD;

static PAYDOCK_CONNECTOR_INFO: ConnectorInfo = ConnectorInfo {
    display_name: "PayDock",
    homepage: "https://paydock.com/",
    supported_countries: &["AU", "NZ", "GB", "US", "CA"],
    supported_card_types: &["visa", "master", "american_express"],
};

const USER_AGENT: &str = concat!("connector-service/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct Paydock {
    auth_type: ConnectorAuthType,
    connectors: Connectors,
    test_mode: bool,
    transport: BoxedConnectorTransport,
    error_codes: ErrorCodeMapping,
    amount_converter: &'static (dyn AmountConvertor<Output = StringMajorUnit> + Sync),
}

impl Paydock {
    /// `auth_type` must be a body key: the secret key as `api_key` and the default gateway id
    /// as `key1`.
    pub fn new(
        auth_type: ConnectorAuthType,
        connectors: Connectors,
        transport: BoxedConnectorTransport,
        test_mode: bool,
    ) -> CustomResult<Self, ConnectorError> {
        PaydockAuthType::try_from(&auth_type)?;
        Ok(Self {
            auth_type,
            connectors,
            test_mode,
            transport,
            error_codes: ErrorCodeMapping::default(),
            amount_converter: &StringMajorUnitForConnector,
        })
    }

    pub fn with_error_codes(mut self, error_codes: ErrorCodeMapping) -> Self {
        self.error_codes = error_codes;
        self
    }

    pub fn is_test(&self) -> bool {
        self.test_mode
    }

    fn get_headers(
        &self,
        options: &GatewayOptions,
        has_body: bool,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, ConnectorError> {
        let mut header = vec![
            (
                headers::X_ACCEPTS.to_string(),
                consts::APPLICATION_JSON.to_string().into(),
            ),
            (headers::USER_AGENT.to_string(), USER_AGENT.to_string().into()),
            (
                headers::X_CLIENT_IP.to_string(),
                options.ip.clone().unwrap_or_default().into(),
            ),
        ];
        match options.secret_key.as_ref() {
            Some(secret_key) => header.push((
                headers::X_USER_SECRET_KEY.to_string(),
                secret_key.peek().to_owned().into_masked(),
            )),
            None => header.extend(self.get_auth_header(&self.auth_type)?),
        }
        if has_body {
            header.push((
                consts::CONTENT_TYPE.to_string(),
                self.common_get_content_type().to_string().into(),
            ));
        }
        Ok(header)
    }

    /// Base url followed by `segments`, each percent-encoded as a single path segment.
    fn get_url(&self, segments: &[String]) -> CustomResult<String, ConnectorError> {
        let mut url = url::Url::parse(self.base_url(&self.connectors))
            .change_context(ConnectorError::FailedToObtainIntegrationUrl)?;
        url.path_segments_mut()
            .map_err(|()| report!(ConnectorError::FailedToObtainIntegrationUrl))?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    fn convert_amount(
        &self,
        amount: MinorUnit,
        options: &GatewayOptions,
    ) -> CustomResult<PaydockAmount, ConnectorError> {
        let currency = options.currency.unwrap_or(DEFAULT_CURRENCY);
        let amount = self
            .amount_converter
            .convert(amount, currency)
            .change_context(ConnectorError::RequestEncodingFailed)?;
        Ok(PaydockAmount { amount, currency })
    }

    fn compose(
        &self,
        operation: PaydockOperation,
        amount: Option<PaydockAmount>,
        identifiers: &IdentifierSet,
        options: &GatewayOptions,
    ) -> CustomResult<PaydockRequest, ConnectorError> {
        let auth = PaydockAuthType::try_from(&self.auth_type)?;
        paydock::compose(
            operation,
            &PaydockRouterData {
                amount,
                identifiers,
                options,
                default_gateway_id: auth.gateway_id.peek(),
            },
        )
    }

    fn build_request(
        &self,
        method: Method,
        endpoint: &[String],
        body: Option<PaydockRequest>,
        options: &GatewayOptions,
    ) -> CustomResult<Request, ConnectorError> {
        let request = Request::new(method, &self.get_url(endpoint)?)
            .set_headers(self.get_headers(options, body.is_some())?);
        Ok(match body {
            Some(body) => request.set_body(RequestContent::Json(Box::new(body))),
            None => request,
        })
    }

    /// Sends the call and turns whatever comes back into a [`GatewayResponse`].
    async fn commit(
        &self,
        flow: &'static str,
        method: Method,
        endpoint: Vec<String>,
        body: Option<PaydockRequest>,
        options: &GatewayOptions,
        card: Option<&Card>,
    ) -> CustomResult<GatewayResponse, ConnectorError> {
        let request = self.build_request(method, &endpoint, body, options)?;
        let span = tracing::info_span!("paydock", flow, test_mode = self.test_mode);

        let response = async move {
            let response = match self.transport.send(request).await {
                // error statuses usually still carry a JSON error body
                Ok(Ok(response)) | Ok(Err(response)) => response,
                Err(err) => {
                    tracing::error!(error = ?err, "no usable reply from paydock");
                    return GatewayResponse {
                        success: false,
                        message: format!(
                            "Failed to reach the PayDock API: {}",
                            err.current_context()
                        ),
                        raw_response: serde_json::Value::Null,
                        authorization: None,
                        error_code: None,
                        test: self.test_mode,
                    };
                }
            };

            let (raw_response, parsed) = parse_response(&response);
            let success = parsed.is_success();
            tracing::info!(
                status_code = response.status_code,
                success,
                "paydock response received"
            );

            GatewayResponse {
                success,
                message: parsed.message(),
                authorization: parsed.authorization(card),
                error_code: if success {
                    None
                } else {
                    parsed.error_code(&self.error_codes)
                },
                raw_response,
                test: self.test_mode,
            }
        }
        .instrument(span)
        .await;
        Ok(response)
    }

    async fn charge(
        &self,
        flow: &'static str,
        amount: MinorUnit,
        authorization: PaymentAuthorization,
        options: &GatewayOptions,
    ) -> CustomResult<GatewayResponse, ConnectorError> {
        let identifiers = IdentifierSet::decode(&authorization)?;
        let amount = self.convert_amount(amount, options)?;
        let request = self.compose(PaydockOperation::Charge, Some(amount), &identifiers, options)?;
        let endpoint = get_endpoint(&request);
        self.commit(
            flow,
            Method::Post,
            endpoint,
            Some(request),
            options,
            identifiers.card.as_ref(),
        )
        .await
    }
}

/// Path segments below the base url. Identifiers stay single segments whatever they contain.
fn get_endpoint(request: &PaydockRequest) -> Vec<String> {
    let segments: Vec<&str> = match request {
        PaydockRequest::Store(PaydockStoreRequest::Customer(customer)) => match &customer.id {
            Some(customer_id) => vec!["customers", customer_id],
            None => vec!["customers"],
        },
        PaydockRequest::Store(PaydockStoreRequest::PaymentSource(_)) => {
            vec!["vault", "payment_sources"]
        }
        PaydockRequest::Charge(_) => vec!["charges"],
        PaydockRequest::Capture(capture) => vec!["charges", &capture.charge_id, "capture"],
        PaydockRequest::Refund(refund) => vec!["charges", &refund.charge_id, "refunds"],
    };
    segments.into_iter().map(str::to_string).collect()
}

/// Raw JSON for the caller plus the typed view the outcome is decided on. Bodies that are not
/// JSON, or not shaped like a PayDock reply, become failures quoting the raw text.
fn parse_response(response: &Response) -> (serde_json::Value, PaydockResponse) {
    let raw = match response.response.parse_struct::<serde_json::Value>("PaydockResponse") {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!(error = ?err, "paydock response is not JSON");
            let message = paydock::invalid_response_message(&response.response);
            return (
                paydock::invalid_response_body(&response.response),
                PaydockResponse::failure(message),
            );
        }
    };
    match raw.clone().parse_value::<PaydockResponse>("PaydockResponse") {
        Ok(parsed) => (raw, parsed),
        Err(err) => {
            tracing::warn!(error = ?err, "unexpected paydock response shape");
            let message = paydock::invalid_response_message(&response.response);
            (raw, PaydockResponse::failure(message))
        }
    }
}

impl ConnectorCommon for Paydock {
    fn id(&self) -> &'static str {
        "paydock"
    }

    fn get_connector_about(&self) -> Option<&'static ConnectorInfo> {
        Some(&PAYDOCK_CONNECTOR_INFO)
    }

    fn get_auth_header(
        &self,
        auth_type: &ConnectorAuthType,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, ConnectorError> {
        let auth = PaydockAuthType::try_from(auth_type)
            .change_context(ConnectorError::FailedToObtainAuthType)?;
        Ok(vec![(
            headers::X_USER_SECRET_KEY.to_string(),
            auth.secret_key.peek().to_owned().into_masked(),
        )])
    }

    fn base_url<'a>(&self, connectors: &'a Connectors) -> &'a str {
        connectors.paydock.get_base_url(self.test_mode)
    }
}

#[async_trait]
impl PaymentGateway for Paydock {
    async fn store(
        &self,
        card: Card,
        options: &GatewayOptions,
    ) -> CustomResult<GatewayResponse, ConnectorError> {
        let identifiers = IdentifierSet::decode(&PaymentAuthorization::Card(card))?;
        let request = self.compose(PaydockOperation::Tokenize, None, &identifiers, options)?;
        let endpoint = get_endpoint(&request);
        self.commit(
            "store",
            Method::Post,
            endpoint,
            Some(request),
            options,
            identifiers.card.as_ref(),
        )
        .await
    }

    async fn unstore(
        &self,
        authorization: &str,
        options: &GatewayOptions,
    ) -> CustomResult<Option<GatewayResponse>, ConnectorError> {
        let identifiers = IdentifierSet::from_token(authorization)?;
        let Some(vault_token) = identifiers.vault_token.as_deref() else {
            tracing::debug!("authorization carries no vault token, nothing to delete");
            return Ok(None);
        };
        let endpoint = vec!["vault-tokens".to_string(), vault_token.to_string()];
        self.commit("unstore", Method::Delete, endpoint, None, options, None)
            .await
            .map(Some)
    }

    async fn purchase(
        &self,
        amount: MinorUnit,
        authorization: PaymentAuthorization,
        options: &GatewayOptions,
    ) -> CustomResult<GatewayResponse, ConnectorError> {
        self.charge("purchase", amount, authorization, options).await
    }

    async fn authorize(
        &self,
        amount: MinorUnit,
        authorization: PaymentAuthorization,
        options: &GatewayOptions,
    ) -> CustomResult<GatewayResponse, ConnectorError> {
        let options = GatewayOptions {
            capture: Some(false),
            ..options.clone()
        };
        self.charge("authorize", amount, authorization, &options)
            .await
    }

    async fn capture(
        &self,
        amount: MinorUnit,
        authorization: &str,
        options: &GatewayOptions,
    ) -> CustomResult<GatewayResponse, ConnectorError> {
        let identifiers = IdentifierSet::from_token(authorization)?;
        let amount = self.convert_amount(amount, options)?;
        let request =
            self.compose(PaydockOperation::Capture, Some(amount), &identifiers, options)?;
        let endpoint = get_endpoint(&request);
        self.commit("capture", Method::Post, endpoint, Some(request), options, None)
            .await
    }

    async fn refund(
        &self,
        amount: MinorUnit,
        authorization: &str,
        options: &GatewayOptions,
    ) -> CustomResult<GatewayResponse, ConnectorError> {
        let identifiers = IdentifierSet::from_token(authorization)?;
        let amount = self.convert_amount(amount, options)?;
        let request =
            self.compose(PaydockOperation::Refund, Some(amount), &identifiers, options)?;
        let endpoint = get_endpoint(&request);
        self.commit("refund", Method::Post, endpoint, Some(request), options, None)
            .await
    }
}
