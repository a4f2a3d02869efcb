use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CurrencyError {
    #[error("Currency {currency} is not supported by the amount conversion tables")]
    UnsupportedCurrency { currency: String },
}

/// ISO 4217 currencies understood by the amount converters.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
#[allow(clippy::upper_case_acronyms)]
pub enum Currency {
    #[default]
    AUD,
    BHD,
    BRL,
    CAD,
    CHF,
    CLF,
    CLP,
    CNY,
    EUR,
    GBP,
    HKD,
    IDR,
    INR,
    JOD,
    JPY,
    KRW,
    KWD,
    MXN,
    MYR,
    NZD,
    OMR,
    PHP,
    SGD,
    THB,
    TND,
    USD,
    VND,
    ZAR,
}

impl Currency {
    pub fn iso_4217(self) -> String {
        self.to_string()
    }

    pub fn is_zero_decimal_currency(self) -> bool {
        matches!(self, Self::CLP | Self::JPY | Self::KRW | Self::VND)
    }

    pub fn is_three_decimal_currency(self) -> bool {
        matches!(
            self,
            Self::BHD | Self::JOD | Self::KWD | Self::OMR | Self::TND
        )
    }

    pub fn is_four_decimal_currency(self) -> bool {
        matches!(self, Self::CLF)
    }

    /// Number of digits after the decimal point of the currency's major unit.
    pub fn number_of_digits_after_decimal_point(self) -> Result<u8, CurrencyError> {
        if self.is_zero_decimal_currency() {
            Ok(0)
        } else if self.is_three_decimal_currency() {
            Ok(3)
        } else if self.is_four_decimal_currency() {
            Ok(4)
        } else {
            Ok(2)
        }
    }
}

/// Gateway-neutral error codes a caller can branch on without knowing the provider.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StandardErrorCode {
    IncorrectNumber,
    InvalidNumber,
    InvalidExpiryDate,
    InvalidCvc,
    ExpiredCard,
    IncorrectCvc,
    IncorrectZip,
    IncorrectAddress,
    IncorrectPin,
    CardDeclined,
    ProcessingError,
    CallIssuer,
    PickupCard,
    ConfigError,
    TestModeLiveCard,
    UnsupportedFeature,
}
