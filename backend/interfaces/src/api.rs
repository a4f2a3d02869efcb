use common_utils::{consts, CustomResult};
use domain_types::{
    router_data::ConnectorAuthType, router_response_types::ConnectorInfo, types::Connectors,
};

pub trait ConnectorCommon {
    /// Name of the connector (in lowercase).
    fn id(&self) -> &'static str;

    /// Display name, homepage and what the connector accepts.
    fn get_connector_about(&self) -> Option<&'static ConnectorInfo> {
        None
    }

    /// HTTP header used for authorization.
    fn get_auth_header(
        &self,
        _auth_type: &ConnectorAuthType,
    ) -> CustomResult<
        Vec<(String, hyperswitch_masking::Maskable<String>)>,
        domain_types::errors::ConnectorError,
    > {
        Ok(Vec::new())
    }

    /// HTTP `Content-Type` to be used for requests carrying a body.
    /// Defaults to `application/json`.
    fn common_get_content_type(&self) -> &'static str {
        consts::APPLICATION_JSON
    }

    /// The base URL for interacting with the connector's API.
    fn base_url<'a>(&self, connectors: &'a Connectors) -> &'a str;
}
