//! Utilities shared by the connector crates: amounts, errors, PII wrappers and the
//! outgoing request model.

pub mod consts;
pub mod errors;
pub mod ext_traits;
pub mod pii;
pub mod request;
pub mod types;

pub use errors::CustomResult;
pub use types::AmountConvertor;
