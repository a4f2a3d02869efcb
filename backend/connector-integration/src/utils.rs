use std::collections::HashMap;

use common_enums::StandardErrorCode;
use domain_types::errors;
use serde::Deserialize;

pub fn missing_field_err(
    message: &'static str,
) -> Box<dyn Fn() -> error_stack::Report<errors::ConnectorError> + 'static> {
    Box::new(move || {
        errors::ConnectorError::MissingRequiredField {
            field_name: message,
        }
        .into()
    })
}

/// Maps provider error codes to [`StandardErrorCode`]s.
///
/// Empty by default: unknown codes simply yield no standard code.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ErrorCodeMapping(HashMap<String, StandardErrorCode>);

impl ErrorCodeMapping {
    pub fn insert(&mut self, provider_code: impl Into<String>, code: StandardErrorCode) {
        self.0.insert(provider_code.into(), code);
    }

    pub fn lookup(&self, provider_code: &str) -> Option<StandardErrorCode> {
        self.0.get(provider_code).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, StandardErrorCode)> for ErrorCodeMapping {
    fn from_iter<I: IntoIterator<Item = (K, StandardErrorCode)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(provider_code, code)| (provider_code.into(), code))
                .collect(),
        )
    }
}
