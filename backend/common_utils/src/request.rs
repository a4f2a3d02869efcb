//! Connector agnostic description of an outgoing HTTP call.

use std::collections::HashSet;

use hyperswitch_masking::{ErasedMaskSerialize, Maskable};
use serde::{Deserialize, Serialize};

pub type Headers = HashSet<(String, Maskable<String>)>;

#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    Deserialize,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

pub enum RequestContent {
    Json(Box<dyn ErasedMaskSerialize + Send>),
}

impl std::fmt::Debug for RequestContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Json(_) => "JsonRequestBody",
        })
    }
}

impl RequestContent {
    /// Request body with every secret replaced by its masked form, suitable for logs.
    pub fn masked_json(&self) -> serde_json::Value {
        match self {
            Self::Json(body) => body.masked_serialize().unwrap_or_else(
                |_| serde_json::json!({ "error": "failed to mask serialize connector request" }),
            ),
        }
    }
}

#[derive(Debug)]
pub struct Request {
    pub url: String,
    pub headers: Headers,
    pub method: Method,
    pub body: Option<RequestContent>,
}

impl Request {
    pub fn new(method: Method, url: &str) -> Self {
        Self {
            method,
            url: String::from(url),
            headers: HashSet::new(),
            body: None,
        }
    }

    pub fn set_body(mut self, body: RequestContent) -> Self {
        self.body = Some(body);
        self
    }

    pub fn set_headers(mut self, headers: Vec<(String, Maskable<String>)>) -> Self {
        self.headers.extend(headers);
        self
    }
}
