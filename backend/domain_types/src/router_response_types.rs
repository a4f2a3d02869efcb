use common_enums::StandardErrorCode;
use serde::Serialize;

#[derive(Clone, Debug)]
pub struct Response {
    /// headers
    pub headers: Option<http::HeaderMap>,
    /// response
    pub response: bytes::Bytes,
    /// status code
    pub status_code: u16,
}

/// Outcome of a gateway operation. Every provider or transport failure ends up here with
/// `success == false`, so callers always receive the same shape.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct GatewayResponse {
    pub success: bool,
    pub message: String,
    pub raw_response: serde_json::Value,
    /// Reusable authorization token, absent when nothing reusable came back.
    pub authorization: Option<String>,
    pub error_code: Option<StandardErrorCode>,
    pub test: bool,
}

/// Static description of a connector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConnectorInfo {
    pub display_name: &'static str,
    pub homepage: &'static str,
    /// ISO 3166 alpha-2 codes.
    pub supported_countries: &'static [&'static str],
    pub supported_card_types: &'static [&'static str],
}
