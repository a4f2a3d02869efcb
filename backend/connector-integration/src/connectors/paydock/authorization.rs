//! Opaque authorization tokens handed back to the caller.
//!
//! A token is a query string over a closed one-letter key alphabet, e.g.
//! `g=gw_1&u=cus_1&v=vt_9`. Keys the decoder does not know are skipped so tokens minted by a
//! newer version still decode.

use domain_types::{
    errors::ConnectorError, payment_method_data::Card, router_request_types::PaymentAuthorization,
};
use error_stack::report;
use strum::IntoEnumIterator;
use url::form_urlencoded;

/// One-letter wire keys of an authorization token.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    Hash,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumString,
)]
pub enum AuthorizationKey {
    #[strum(serialize = "h")]
    ChargeId,
    #[strum(serialize = "u")]
    CustomerId,
    #[strum(serialize = "g")]
    GatewayId,
    #[strum(serialize = "s")]
    PaymentSourceId,
    #[strum(serialize = "v")]
    VaultToken,
    #[strum(serialize = "f")]
    FirstName,
    #[strum(serialize = "l")]
    LastName,
    #[strum(serialize = "e")]
    Email,
    #[strum(serialize = "r")]
    CustomerReference,
    #[strum(serialize = "t")]
    ChargeReference,
    #[strum(serialize = "x")]
    ExternalId,
}

/// Decoded form of an authorization token.
///
/// `card` is only set when the caller passed raw card details instead of a token. It is never
/// written into a token.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IdentifierSet {
    pub charge_id: Option<String>,
    pub customer_id: Option<String>,
    pub gateway_id: Option<String>,
    pub payment_source_id: Option<String>,
    pub vault_token: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub customer_reference: Option<String>,
    pub charge_reference: Option<String>,
    pub external_id: Option<String>,
    pub card: Option<Card>,
}

impl IdentifierSet {
    /// Value of a field. Empty strings read as unset.
    pub fn get(&self, key: AuthorizationKey) -> Option<&str> {
        self.slot(key).as_deref().filter(|value| !value.is_empty())
    }

    /// Sets a field. Empty values clear it, since an empty field and a missing one mean the same.
    pub fn set(&mut self, key: AuthorizationKey, value: Option<String>) {
        *self.slot_mut(key) = value.filter(|value| !value.is_empty());
    }

    fn slot(&self, key: AuthorizationKey) -> &Option<String> {
        match key {
            AuthorizationKey::ChargeId => &self.charge_id,
            AuthorizationKey::CustomerId => &self.customer_id,
            AuthorizationKey::GatewayId => &self.gateway_id,
            AuthorizationKey::PaymentSourceId => &self.payment_source_id,
            AuthorizationKey::VaultToken => &self.vault_token,
            AuthorizationKey::FirstName => &self.first_name,
            AuthorizationKey::LastName => &self.last_name,
            AuthorizationKey::Email => &self.email,
            AuthorizationKey::CustomerReference => &self.customer_reference,
            AuthorizationKey::ChargeReference => &self.charge_reference,
            AuthorizationKey::ExternalId => &self.external_id,
        }
    }

    fn slot_mut(&mut self, key: AuthorizationKey) -> &mut Option<String> {
        match key {
            AuthorizationKey::ChargeId => &mut self.charge_id,
            AuthorizationKey::CustomerId => &mut self.customer_id,
            AuthorizationKey::GatewayId => &mut self.gateway_id,
            AuthorizationKey::PaymentSourceId => &mut self.payment_source_id,
            AuthorizationKey::VaultToken => &mut self.vault_token,
            AuthorizationKey::FirstName => &mut self.first_name,
            AuthorizationKey::LastName => &mut self.last_name,
            AuthorizationKey::Email => &mut self.email,
            AuthorizationKey::CustomerReference => &mut self.customer_reference,
            AuthorizationKey::ChargeReference => &mut self.charge_reference,
            AuthorizationKey::ExternalId => &mut self.external_id,
        }
    }

    /// True when no token field is set. The raw card is not considered.
    pub fn is_empty(&self) -> bool {
        AuthorizationKey::iter().all(|key| self.get(key).is_none())
    }

    /// Copies every token field `higher` carries over the fields of `self`.
    pub fn overlay(mut self, higher: Self) -> Self {
        for key in AuthorizationKey::iter() {
            if let Some(value) = higher.get(key) {
                self.set(key, Some(value.to_string()));
            }
        }
        if higher.card.is_some() {
            self.card = higher.card;
        }
        self
    }

    /// Token form of the set, keys in alphabetical order. `None` when no field is set.
    pub fn encode(&self) -> Option<String> {
        let mut pairs = AuthorizationKey::iter()
            .filter_map(|key| self.get(key).map(|value| (key.as_ref(), value)))
            .collect::<Vec<_>>();
        if pairs.is_empty() {
            return None;
        }
        pairs.sort_unstable_by_key(|(key, _)| *key);

        Some(
            form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs)
                .finish(),
        )
    }

    pub fn decode(
        authorization: &PaymentAuthorization,
    ) -> Result<Self, error_stack::Report<ConnectorError>> {
        match authorization {
            PaymentAuthorization::Token(token) => Self::from_token(token),
            PaymentAuthorization::Card(card) => Ok(Self {
                card: Some(card.clone()),
                ..Self::default()
            }),
            PaymentAuthorization::None => Ok(Self::default()),
        }
    }

    /// Parses a token string. The first occurrence of a repeated key wins.
    pub fn from_token(token: &str) -> Result<Self, error_stack::Report<ConnectorError>> {
        ensure_well_formed(token).map_err(|reason| {
            report!(ConnectorError::InvalidAuthorizationToken { reason })
        })?;

        let mut identifiers = Self::default();
        let mut seen = Vec::new();
        for (key, value) in form_urlencoded::parse(token.as_bytes()) {
            let Ok(key) = key.parse::<AuthorizationKey>() else {
                continue;
            };
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            identifiers.set(key, Some(value.into_owned()));
        }
        Ok(identifiers)
    }
}

/// Rejects broken percent escapes and escapes that do not decode to UTF-8, both of which the
/// lenient form parser would silently pass through or replace.
fn ensure_well_formed(token: &str) -> Result<(), String> {
    for (position, component) in token.split(['&', '=']).enumerate() {
        let mut decoded = Vec::with_capacity(component.len());
        let mut bytes = component.bytes();
        while let Some(byte) = bytes.next() {
            match byte {
                b'%' => {
                    let high = bytes.next().and_then(hex_value);
                    let low = bytes.next().and_then(hex_value);
                    match (high, low) {
                        (Some(high), Some(low)) => decoded.push((high << 4) | low),
                        _ => {
                            return Err(format!("malformed percent escape in component {position}"))
                        }
                    }
                }
                b'+' => decoded.push(b' '),
                other => decoded.push(other),
            }
        }
        if String::from_utf8(decoded).is_err() {
            return Err(format!("component {position} does not decode to UTF-8"));
        }
    }
    Ok(())
}

fn hex_value(byte: u8) -> Option<u8> {
    char::from(byte)
        .to_digit(16)
        .and_then(|digit| u8::try_from(digit).ok())
}
