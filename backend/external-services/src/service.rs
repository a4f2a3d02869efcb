use std::{str::FromStr, time::Duration};

use async_trait::async_trait;
use common_utils::{
    request::{Headers, Method, Request, RequestContent},
    CustomResult,
};
use domain_types::{errors::ApiClientError, router_response_types::Response, types::Proxy};
use error_stack::{report, ResultExt};
use hyperswitch_masking::Maskable;
use interfaces::connector_types::ConnectorTransport;
use once_cell::sync::OnceCell;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{field::Empty, Instrument};

use crate::shared_metrics;

/// reqwest backed transport shared by every call of a connector.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    proxy: Proxy,
    connector: &'static str,
}

impl HttpTransport {
    pub fn new(proxy: Proxy, connector: &'static str) -> Self {
        Self { proxy, connector }
    }
}

#[async_trait]
impl ConnectorTransport for HttpTransport {
    async fn send(
        &self,
        request: Request,
    ) -> CustomResult<Result<Response, Response>, ApiClientError> {
        let span = tracing::info_span!(
            "ucs_outgoing_app_data",
            connector = self.connector,
            request_headers = Empty,
            request_body = Empty,
            status_code = Empty,
            latency = Empty,
            url = Empty,
            method = Empty,
        );
        let start = std::time::Instant::now();
        let method = request.method.to_string();

        span.record("url", tracing::field::display(&request.url));
        span.record("method", tracing::field::display(&method));
        span.record(
            "request_headers",
            tracing::field::display(masked_headers(&request.headers)),
        );
        if let Some(body) = request.body.as_ref() {
            span.record("request_body", tracing::field::display(body.masked_json()));
        }

        let result = call_connector_api(&self.proxy, request)
            .instrument(span.clone())
            .await;
        let elapsed = start.elapsed();
        span.record("latency", elapsed.as_millis());
        shared_metrics::record_api_call(&method, self.connector, elapsed.as_secs_f64());

        span.in_scope(|| {
            match &result {
                Ok(Ok(response)) | Ok(Err(response)) => {
                    tracing::Span::current().record("status_code", response.status_code);
                }
                Err(err) => {
                    shared_metrics::record_api_call_error(
                        &method,
                        self.connector,
                        &format!("{:?}", err.current_context()),
                    );
                    info_log(
                        "NETWORK_ERROR",
                        &json!(format!(
                            "Failed getting response from connector. Error: {:?}",
                            err
                        )),
                    );
                }
            }
            tracing::info!(tag = ?Tag::OutgoingApi, log_type = "api", "Outgoing Request completed");
        });
        result
    }
}

fn masked_headers(headers: &Headers) -> Value {
    let masked = headers
        .iter()
        .fold(serde_json::Map::new(), |mut acc, (k, v)| {
            let value = match v {
                Maskable::Masked(_) => Value::String("*** alloc::string::String ***".to_string()),
                Maskable::Normal(iv) => Value::String(iv.to_owned()),
            };
            acc.insert(k.clone(), value);
            acc
        });
    Value::Object(masked)
}

pub async fn call_connector_api(
    proxy: &Proxy,
    request: Request,
) -> CustomResult<Result<Response, Response>, ApiClientError> {
    let url =
        reqwest::Url::parse(&request.url).change_context(ApiClientError::UrlEncodingFailed)?;

    let should_bypass_proxy = proxy.bypass_proxy_urls.contains(&url.to_string());

    let client = get_base_client(proxy, should_bypass_proxy)?;

    let headers = request.headers.construct_header_map()?;

    let builder = match request.method {
        Method::Get => client.get(url),
        Method::Post => client.post(url),
        Method::Put => client.put(url),
        Method::Delete => client.delete(url),
        Method::Patch => client.patch(url),
    };
    let builder = match request.body {
        Some(RequestContent::Json(payload)) => builder.json(&payload),
        None => builder,
    }
    .add_headers(headers);

    let response = builder.send().await.map_err(|error| {
        let api_error = match error {
            error if error.is_timeout() => ApiClientError::RequestTimeoutReceived,
            _ => ApiClientError::RequestNotSent(error.to_string()),
        };
        info_log(
            "REQUEST_FAILURE",
            &json!(format!("Unable to send request to connector.",)),
        );
        report!(api_error)
    })?;

    handle_response(response).await
}

static NON_PROXIED_CLIENT: OnceCell<Client> = OnceCell::new();
static PROXIED_CLIENT: OnceCell<Client> = OnceCell::new();

fn get_base_client(
    proxy_config: &Proxy,
    should_bypass_proxy: bool,
) -> CustomResult<Client, ApiClientError> {
    Ok(if should_bypass_proxy
        || (proxy_config.http_url.is_none() && proxy_config.https_url.is_none())
    {
        &NON_PROXIED_CLIENT
    } else {
        &PROXIED_CLIENT
    }
    .get_or_try_init(|| {
        get_client_builder(proxy_config, should_bypass_proxy)?
            .build()
            .change_context(ApiClientError::ClientConstructionFailed)
            .inspect_err(|err| {
                info_log(
                    "ERROR",
                    &json!(format!("Failed to construct base client. Error: {:?}", err)),
                );
            })
    })?
    .clone())
}

fn get_client_builder(
    proxy_config: &Proxy,
    should_bypass_proxy: bool,
) -> CustomResult<reqwest::ClientBuilder, ApiClientError> {
    let mut client_builder = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_idle_timeout(Duration::from_secs(
            proxy_config
                .idle_pool_connection_timeout
                .unwrap_or_default(),
        ));

    if should_bypass_proxy {
        return Ok(client_builder);
    }

    // Proxy all HTTPS traffic through the configured HTTPS proxy
    if let Some(url) = proxy_config.https_url.as_ref() {
        client_builder = client_builder.proxy(
            reqwest::Proxy::https(url)
                .change_context(ApiClientError::InvalidProxyConfiguration)
                .inspect_err(|err| {
                    info_log(
                        "PROXY_ERROR",
                        &json!(format!("HTTPS proxy configuration error. Error: {:?}", err)),
                    );
                })?,
        );
    }

    // Proxy all HTTP traffic through the configured HTTP proxy
    if let Some(url) = proxy_config.http_url.as_ref() {
        client_builder = client_builder.proxy(
            reqwest::Proxy::http(url)
                .change_context(ApiClientError::InvalidProxyConfiguration)
                .inspect_err(|err| {
                    info_log(
                        "PROXY_ERROR",
                        &json!(format!("HTTP proxy configuration error. Error: {:?}", err)),
                    );
                })?,
        );
    }

    Ok(client_builder)
}

async fn handle_response(
    resp: reqwest::Response,
) -> CustomResult<Result<Response, Response>, ApiClientError> {
    let status_code = resp.status().as_u16();
    let headers = Some(resp.headers().to_owned());
    match status_code {
        200..=299 => {
            let response = resp
                .bytes()
                .await
                .change_context(ApiClientError::ResponseDecodingFailed)?;
            Ok(Ok(Response {
                headers,
                response,
                status_code,
            }))
        }
        400..=599 => {
            let bytes = resp
                .bytes()
                .await
                .change_context(ApiClientError::ResponseDecodingFailed)?;

            Ok(Err(Response {
                headers,
                response: bytes,
                status_code,
            }))
        }
        _ => {
            info_log(
                "UNEXPECTED_RESPONSE",
                &json!("Unexpected response from server."),
            );
            Err(report!(ApiClientError::UnexpectedServerResponse))
        }
    }
}

pub(super) trait HeaderExt {
    fn construct_header_map(self) -> CustomResult<reqwest::header::HeaderMap, ApiClientError>;
}

impl HeaderExt for Headers {
    fn construct_header_map(self) -> CustomResult<reqwest::header::HeaderMap, ApiClientError> {
        use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

        self.into_iter().try_fold(
            HeaderMap::new(),
            |mut header_map, (header_name, header_value)| {
                let header_name = HeaderName::from_str(&header_name)
                    .change_context(ApiClientError::HeaderMapConstructionFailed)?;
                let header_value = header_value.into_inner();
                let header_value = HeaderValue::from_str(&header_value)
                    .change_context(ApiClientError::HeaderMapConstructionFailed)?;
                header_map.append(header_name, header_value);
                Ok(header_map)
            },
        )
    }
}

pub(super) trait RequestBuilderExt {
    fn add_headers(self, headers: reqwest::header::HeaderMap) -> Self;
}

impl RequestBuilderExt for reqwest::RequestBuilder {
    fn add_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self = self.headers(headers);
        self
    }
}

#[derive(Debug, Default, Clone)]
pub enum Tag {
    /// General.
    #[default]
    General,
    /// Api Outgoing Request
    OutgoingApi,
}

#[inline]
pub fn info_log(action: &str, message: &Value) {
    tracing::info!(tags = %action, json_value= %message);
}
