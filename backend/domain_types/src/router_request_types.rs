use common_enums::Currency;
use common_utils::pii::Email;
use hyperswitch_masking::Secret;
use serde::Deserialize;

use crate::payment_method_data::Card;

/// What the caller hands over to identify the payer on a charge.
#[derive(Debug, Clone, Default)]
pub enum PaymentAuthorization {
    /// Opaque token returned by an earlier call.
    Token(String),
    /// Raw card details.
    Card(Card),
    /// No prior authorization.
    #[default]
    None,
}

impl From<String> for PaymentAuthorization {
    fn from(token: String) -> Self {
        Self::Token(token)
    }
}

impl From<&str> for PaymentAuthorization {
    fn from(token: &str) -> Self {
        Self::Token(token.to_string())
    }
}

impl From<Card> for PaymentAuthorization {
    fn from(card: Card) -> Self {
        Self::Card(card)
    }
}

/// Customer details supplied explicitly by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerDetails {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<Email>,
    #[serde(default)]
    pub phone: Option<Secret<String>>,
    #[serde(default)]
    pub reference: Option<String>,
}

/// Per call options accepted by every gateway operation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayOptions {
    /// Overrides the gateway's default currency.
    #[serde(default)]
    pub currency: Option<Currency>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// `Some(false)` authorizes without capturing.
    #[serde(default)]
    pub capture: Option<bool>,
    #[serde(default)]
    pub customer: Option<CustomerDetails>,
    #[serde(default)]
    pub customer_id: Option<String>,
    /// Authorization token of another call whose customer should be reused.
    #[serde(default)]
    pub customer_from: Option<String>,
    /// Overrides the configured gateway id.
    #[serde(default)]
    pub gateway_id: Option<String>,
    /// Overrides the configured secret key for this call only.
    #[serde(default)]
    pub secret_key: Option<Secret<String>>,
    /// Client IP forwarded to the provider.
    #[serde(default)]
    pub ip: Option<String>,
}

impl GatewayOptions {
    /// Whether the caller asked for the card to be stored under a customer.
    pub fn has_customer_context(&self) -> bool {
        self.customer.is_some() || self.customer_id.is_some() || self.customer_from.is_some()
    }
}
