use common_utils::errors::CustomResult;
use domain_types::{errors::ConnectorError, router_data::ConnectorAuthType, types::Connectors};
use interfaces::connector_types::{BoxedConnectorTransport, PaymentGateway};

use crate::{connectors::Paydock, utils::ErrorCodeMapping};

#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ConnectorEnum {
    Paydock,
}

pub type BoxedConnector = Box<dyn PaymentGateway>;

pub struct ConnectorData {
    pub connector: BoxedConnector,
    pub connector_name: ConnectorEnum,
}

impl ConnectorData {
    pub fn get_connector_by_name(
        connector_name: ConnectorEnum,
        auth_type: ConnectorAuthType,
        connectors: Connectors,
        transport: BoxedConnectorTransport,
        test_mode: bool,
        error_codes: ErrorCodeMapping,
    ) -> CustomResult<Self, ConnectorError> {
        let connector: BoxedConnector = match connector_name {
            ConnectorEnum::Paydock => Box::new(
                Paydock::new(auth_type, connectors, transport, test_mode)?
                    .with_error_codes(error_codes),
            ),
        };
        Ok(Self {
            connector,
            connector_name,
        })
    }
}
