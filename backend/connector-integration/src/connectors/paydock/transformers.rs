use common_enums::{Currency, StandardErrorCode};
use common_utils::{
    errors::{CustomResult, ParsingError},
    ext_traits::ValueExt,
    pii::EmailStrategy,
    types::StringMajorUnit,
};
use domain_types::{
    errors::ConnectorError,
    payment_method_data::Card,
    router_data::ConnectorAuthType,
    router_request_types::{CustomerDetails, GatewayOptions},
};
use error_stack::report;
use hyperswitch_masking::{ExposeInterface, PeekInterface, Secret};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

use super::authorization::IdentifierSet;
use crate::utils::{missing_field_err, ErrorCodeMapping};

pub const NO_ERROR_DETAILS: &str = "No error details";
/// Looked up in the error code table when a failed response carries no `error` object.
pub const PROCESSING_ERROR: &str = "processing_error";
const CARD_DECLINED: &str = "card_declined";

#[derive(Clone, Debug)]
pub struct PaydockAuthType {
    pub(super) secret_key: Secret<String>,
    pub(super) gateway_id: Secret<String>,
}

impl TryFrom<&ConnectorAuthType> for PaydockAuthType {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            ConnectorAuthType::BodyKey { api_key, key1 } => Ok(Self {
                secret_key: api_key.to_owned(),
                gateway_id: key1.to_owned(),
            }),
            _ => Err(report!(ConnectorError::FailedToObtainAuthType)),
        }
    }
}

/// Amount already converted to the string major unit PayDock expects.
#[derive(Clone, Debug, PartialEq)]
pub struct PaydockAmount {
    pub amount: StringMajorUnit,
    pub currency: Currency,
}

/// Everything a request body is built from.
pub struct PaydockRouterData<'a> {
    pub amount: Option<PaydockAmount>,
    pub identifiers: &'a IdentifierSet,
    pub options: &'a GatewayOptions,
    /// Gateway used when the options do not name one.
    pub default_gateway_id: &'a str,
}

impl PaydockRouterData<'_> {
    fn get_amount(&self) -> Result<&PaydockAmount, error_stack::Report<ConnectorError>> {
        self.amount.as_ref().ok_or_else(missing_field_err("amount"))
    }

    fn gateway_id(&self) -> String {
        self.options
            .gateway_id
            .clone()
            .unwrap_or_else(|| self.default_gateway_id.to_string())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum PaydockOperation {
    Tokenize,
    Charge,
    Capture,
    Refund,
}

// Request structures

#[derive(Debug, Default, Serialize)]
pub struct PaydockPaymentSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_name: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_number: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_ccv: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire_month: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire_year: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_id: Option<String>,
}

impl From<&Card> for PaydockPaymentSource {
    fn from(card: &Card) -> Self {
        Self {
            card_name: card.get_card_holder_name(),
            card_number: Some(card.card_number.clone()),
            card_ccv: card.card_cvc.clone(),
            expire_month: Some(card.card_exp_month.clone()),
            expire_year: Some(card.card_exp_year.clone()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct PaydockCustomer {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Secret<String, EmailStrategy>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_source: Option<PaydockPaymentSource>,
}

impl From<ContactFields> for PaydockCustomer {
    fn from(contact: ContactFields) -> Self {
        Self {
            id: contact.customer_id,
            first_name: contact.first_name,
            last_name: contact.last_name,
            email: contact.email,
            phone: contact.phone,
            reference: contact.reference,
            payment_source: None,
        }
    }
}

/// Body of a store call: a customer carrying the card, or the bare card.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PaydockStoreRequest {
    Customer(PaydockCustomer),
    PaymentSource(PaydockPaymentSource),
}

#[derive(Debug, Serialize)]
pub struct PaydockChargeRequest {
    pub amount: StringMajorUnit,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_source_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<PaydockCustomer>,
}

/// Capture and refund body. The charge id only goes into the path.
#[derive(Debug, Serialize)]
pub struct PaydockAmountRequest {
    #[serde(skip)]
    pub charge_id: String,
    pub amount: StringMajorUnit,
    pub currency: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PaydockRequest {
    Store(PaydockStoreRequest),
    Charge(PaydockChargeRequest),
    Capture(PaydockAmountRequest),
    Refund(PaydockAmountRequest),
}

/// Builds the body for `operation`. Fails before anything is sent when a required identifier
/// is missing.
pub fn compose(
    operation: PaydockOperation,
    item: &PaydockRouterData<'_>,
) -> CustomResult<PaydockRequest, ConnectorError> {
    Ok(match operation {
        PaydockOperation::Tokenize => PaydockRequest::Store(PaydockStoreRequest::try_from(item)?),
        PaydockOperation::Charge => PaydockRequest::Charge(PaydockChargeRequest::try_from(item)?),
        PaydockOperation::Capture => {
            let charge_id = item
                .identifiers
                .charge_id
                .clone()
                .ok_or_else(missing_field_err("charge_id"))?;
            PaydockRequest::Capture(PaydockAmountRequest::new(charge_id, item.get_amount()?))
        }
        PaydockOperation::Refund => {
            // forwarded even without a charge id, the provider rejects it
            let charge_id = item.identifiers.charge_id.clone().unwrap_or_default();
            PaydockRequest::Refund(PaydockAmountRequest::new(charge_id, item.get_amount()?))
        }
    })
}

fn currency_code(currency: Currency) -> String {
    currency.to_string().to_uppercase()
}

impl PaydockAmountRequest {
    fn new(charge_id: String, amount: &PaydockAmount) -> Self {
        Self {
            charge_id,
            amount: amount.amount.clone(),
            currency: currency_code(amount.currency),
        }
    }
}

impl TryFrom<&PaydockRouterData<'_>> for PaydockStoreRequest {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(item: &PaydockRouterData<'_>) -> Result<Self, Self::Error> {
        let card = item
            .identifiers
            .card
            .as_ref()
            .ok_or_else(missing_field_err("card"))?;

        if !item.options.has_customer_context() {
            return Ok(Self::PaymentSource(PaydockPaymentSource::from(card)));
        }

        let mut payment_source = PaydockPaymentSource::from(card);
        payment_source.gateway_id = Some(item.gateway_id());

        let mut customer = PaydockCustomer::from(resolve_contact(item.identifiers, item.options)?);
        customer.payment_source = Some(payment_source);
        Ok(Self::Customer(customer))
    }
}

impl TryFrom<&PaydockRouterData<'_>> for PaydockChargeRequest {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(item: &PaydockRouterData<'_>) -> Result<Self, Self::Error> {
        let amount = item.get_amount()?;
        let contact = resolve_contact(item.identifiers, item.options)?;

        let mut request = Self {
            amount: amount.amount.clone(),
            currency: currency_code(amount.currency),
            reference: item.options.reference.clone(),
            description: item.options.description.clone(),
            capture: item.options.capture,
            customer_id: None,
            payment_source_id: None,
            customer: None,
        };

        // A known payment source beats a known customer, which beats inline details. Sending
        // more than one of them is rejected by the provider.
        if let Some(payment_source_id) = item.identifiers.payment_source_id.clone() {
            request.payment_source_id = Some(payment_source_id);
        } else if let Some(customer_id) = contact.customer_id.clone() {
            request.customer_id = Some(customer_id);
        } else {
            let mut payment_source = item
                .identifiers
                .card
                .as_ref()
                .map(PaydockPaymentSource::from)
                .unwrap_or_default();
            payment_source.vault_token = item.identifiers.vault_token.clone();
            payment_source.gateway_id = Some(item.gateway_id());

            let mut customer = PaydockCustomer::from(contact);
            customer.payment_source = Some(payment_source);
            request.customer = Some(customer);
        }
        Ok(request)
    }
}

/// Customer contact details, resolved from several sources.
#[derive(Clone, Debug, Default)]
pub struct ContactFields {
    pub customer_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<Secret<String, EmailStrategy>>,
    pub phone: Option<Secret<String>>,
    pub reference: Option<String>,
}

impl ContactFields {
    fn from_card(card: &Card) -> Self {
        Self {
            first_name: card.first_name.as_ref().map(|name| name.peek().clone()),
            last_name: card.last_name.as_ref().map(|name| name.peek().clone()),
            ..Self::default()
        }
    }

    fn from_identifiers(identifiers: &IdentifierSet) -> Self {
        Self {
            customer_id: identifiers.customer_id.clone(),
            first_name: identifiers.first_name.clone(),
            last_name: identifiers.last_name.clone(),
            email: identifiers.email.clone().map(Secret::new),
            phone: None,
            reference: identifiers.customer_reference.clone(),
        }
    }

    fn from_customer_details(details: &CustomerDetails) -> Self {
        Self {
            customer_id: details.id.clone(),
            first_name: details.first_name.clone(),
            last_name: details.last_name.clone(),
            email: details.email.clone().map(|email| email.expose()),
            phone: details.phone.clone(),
            reference: details.reference.clone(),
        }
    }

    /// Fields set in `higher` replace the ones in `self`, empty strings count as unset.
    fn overlay(self, higher: Self) -> Self {
        fn pick<T>(
            lower: Option<T>,
            higher: Option<T>,
            is_blank: impl Fn(&T) -> bool,
        ) -> Option<T> {
            higher.filter(|value| !is_blank(value)).or(lower)
        }
        let blank = |value: &String| value.is_empty();
        Self {
            customer_id: pick(self.customer_id, higher.customer_id, blank),
            first_name: pick(self.first_name, higher.first_name, blank),
            last_name: pick(self.last_name, higher.last_name, blank),
            email: pick(self.email, higher.email, |email| email.peek().is_empty()),
            phone: pick(self.phone, higher.phone, |phone| phone.peek().is_empty()),
            reference: pick(self.reference, higher.reference, blank),
        }
    }
}

/// Resolves the customer for a call, lowest priority first: names on the card, the
/// `customer_from` token (or the call's own identifiers when there is none), the customer
/// object in the options, and finally the top level `customer_id` option.
pub fn resolve_contact(
    identifiers: &IdentifierSet,
    options: &GatewayOptions,
) -> CustomResult<ContactFields, ConnectorError> {
    let customer_from = options
        .customer_from
        .as_deref()
        .map(IdentifierSet::from_token)
        .transpose()?;

    let sources = [
        identifiers
            .card
            .as_ref()
            .map(ContactFields::from_card)
            .unwrap_or_default(),
        ContactFields::from_identifiers(customer_from.as_ref().unwrap_or(identifiers)),
        options
            .customer
            .as_ref()
            .map(ContactFields::from_customer_details)
            .unwrap_or_default(),
        ContactFields {
            customer_id: options.customer_id.clone(),
            ..ContactFields::default()
        },
    ];

    Ok(sources
        .into_iter()
        .fold(ContactFields::default(), ContactFields::overlay))
}

// Response structures

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PaydockResponse {
    #[serde(default, deserialize_with = "lenient_number")]
    pub status: Option<Number>,
    #[serde(default)]
    pub error: Option<PaydockErrorDetails>,
    #[serde(default)]
    pub resource: Option<PaydockResource>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PaydockErrorDetails {
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub decline_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PaydockResource {
    #[serde(rename = "type")]
    pub resource_type: PaydockResourceType,
    #[serde(default)]
    pub data: Option<Value>,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum PaydockResourceType {
    Charge,
    Customer,
    PaymentSource,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PaydockChargeData {
    #[serde(rename = "_id", deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub external_id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub reference: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub customer_id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub customer: Option<PaydockCustomerData>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PaydockCustomerData {
    #[serde(rename = "_id", deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub customer_id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub reference: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub first_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub last_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub payment_source: Option<PaydockPaymentSourceData>,
    #[serde(deserialize_with = "lenient_list")]
    pub payment_sources: Option<Vec<PaydockPaymentSourceData>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PaydockPaymentSourceData {
    #[serde(rename = "_id", deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub vault_token: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub gateway_id: Option<String>,
}

// Fields of response data are read one by one. A field with an unexpected shape is dropped
// without affecting its siblings.

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Strings as they are, numbers in their decimal form.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => Some(value),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    })
}

/// Entries that do not parse are skipped.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(entries) => Some(
            entries
                .into_iter()
                .filter_map(|entry| serde_json::from_value(entry).ok())
                .collect(),
        ),
        _ => None,
    })
}

/// JSON numbers and numeric strings.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<Number>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(value) => Some(value),
        Value::String(value) => {
            let value = value.trim();
            value
                .parse::<i64>()
                .map(Number::from)
                .ok()
                .or_else(|| value.parse::<f64>().ok().and_then(Number::from_f64))
        }
        _ => None,
    })
}

/// The objects a response describes, after following embedded objects.
#[derive(Debug, Default)]
struct ResourceObjects {
    charge: Option<PaydockChargeData>,
    customer: Option<PaydockCustomerData>,
    source: Option<PaydockPaymentSourceData>,
}

impl PaydockResource {
    fn objects(&self) -> CustomResult<ResourceObjects, ParsingError> {
        let mut objects = ResourceObjects::default();
        let Some(data) = self.data.clone().filter(|data| !data.is_null()) else {
            return Ok(objects);
        };
        match self.resource_type {
            PaydockResourceType::Charge => {
                objects.charge = Some(data.parse_value("PaydockChargeData")?)
            }
            PaydockResourceType::Customer => {
                objects.customer = Some(data.parse_value("PaydockCustomerData")?)
            }
            PaydockResourceType::PaymentSource => {
                objects.source = Some(data.parse_value("PaydockPaymentSourceData")?)
            }
            PaydockResourceType::Unknown => {}
        }

        if objects.customer.is_none() {
            objects.customer = objects
                .charge
                .as_ref()
                .and_then(|charge| charge.customer.clone());
        }
        if objects.source.is_none() {
            // the last entry of `payment_sources` is the most recently added one
            objects.source = objects.customer.as_ref().and_then(|customer| {
                customer.payment_source.clone().or_else(|| {
                    customer
                        .payment_sources
                        .as_ref()
                        .and_then(|sources| sources.last().cloned())
                })
            });
        }
        Ok(objects)
    }
}

impl PaydockResponse {
    /// A failed response carrying only `message`.
    pub fn failure(message: String) -> Self {
        Self {
            status: None,
            error: Some(PaydockErrorDetails {
                message: Some(message),
                ..PaydockErrorDetails::default()
            }),
            resource: None,
        }
    }

    /// No `error` object and a `status` between 200 and 300, both ends included.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
            && self
                .status
                .as_ref()
                .and_then(Number::as_f64)
                .is_some_and(|status| (200.0..=300.0).contains(&status))
    }

    pub fn message(&self) -> String {
        if self.is_success() {
            return self
                .status
                .as_ref()
                .map(Number::to_string)
                .unwrap_or_default();
        }
        self.error
            .as_ref()
            .and_then(|error| error.message.clone())
            .unwrap_or_else(|| NO_ERROR_DETAILS.to_string())
    }

    /// Standard code of a failed response. Card declines are looked up by their decline code
    /// first.
    pub fn error_code(&self, mapping: &ErrorCodeMapping) -> Option<StandardErrorCode> {
        let Some(error) = self.error.as_ref() else {
            return mapping.lookup(PROCESSING_ERROR);
        };
        let decline_code = error
            .decline_code
            .as_deref()
            .filter(|_| error.code.as_deref() == Some(CARD_DECLINED));

        decline_code
            .and_then(|code| mapping.lookup(code))
            .or_else(|| error.code.as_deref().and_then(|code| mapping.lookup(code)))
    }

    /// Authorization token for what a successful response describes. `card` contributes the
    /// card holder's names when the call was made with raw card details.
    pub fn authorization(&self, card: Option<&Card>) -> Option<String> {
        if !self.is_success() {
            return None;
        }
        let objects = match self.resource.as_ref()?.objects() {
            Ok(objects) => objects,
            Err(err) => {
                tracing::warn!(error = ?err, "unexpected resource data in paydock response");
                return None;
            }
        };

        let layers = [
            card.map(card_holder_layer).unwrap_or_default(),
            objects.charge.as_ref().map(charge_layer).unwrap_or_default(),
            objects.customer.as_ref().map(customer_layer).unwrap_or_default(),
            objects.source.as_ref().map(source_layer).unwrap_or_default(),
        ];
        layers
            .into_iter()
            .fold(IdentifierSet::default(), IdentifierSet::overlay)
            .encode()
    }
}

fn card_holder_layer(card: &Card) -> IdentifierSet {
    IdentifierSet {
        first_name: card.first_name.as_ref().map(|name| name.peek().clone()),
        last_name: card.last_name.as_ref().map(|name| name.peek().clone()),
        ..IdentifierSet::default()
    }
}

fn charge_layer(charge: &PaydockChargeData) -> IdentifierSet {
    IdentifierSet {
        charge_id: charge.id.clone(),
        external_id: charge.external_id.clone(),
        charge_reference: charge.reference.clone(),
        customer_id: charge.customer_id.clone(),
        ..IdentifierSet::default()
    }
}

fn customer_layer(customer: &PaydockCustomerData) -> IdentifierSet {
    IdentifierSet {
        customer_id: customer
            .id
            .clone()
            .filter(|id| !id.is_empty())
            .or_else(|| customer.customer_id.clone()),
        customer_reference: customer.reference.clone(),
        first_name: customer.first_name.clone(),
        last_name: customer.last_name.clone(),
        email: customer.email.clone(),
        ..IdentifierSet::default()
    }
}

fn source_layer(source: &PaydockPaymentSourceData) -> IdentifierSet {
    IdentifierSet {
        vault_token: source.vault_token.clone(),
        payment_source_id: source.id.clone(),
        gateway_id: source.gateway_id.clone(),
        ..IdentifierSet::default()
    }
}

/// Message reported for a body that is not the JSON PayDock documents, quoting the raw text.
pub fn invalid_response_message(raw: &[u8]) -> String {
    format!(
        "Invalid response received from the PayDock API.  Please contact support@paydock.com \
         if you continue to receive this message.  (The raw response returned by the API was {:?})",
        String::from_utf8_lossy(raw)
    )
}

/// Stand-in for a body that is not JSON.
pub fn invalid_response_body(raw: &[u8]) -> serde_json::Value {
    serde_json::json!({ "error": { "message": invalid_response_message(raw) } })
}
