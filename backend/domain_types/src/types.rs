#[derive(Clone, serde::Deserialize, Debug)]
pub struct Connectors {
    pub paydock: ConnectorParams,
}

#[derive(Clone, serde::Deserialize, Debug)]
pub struct ConnectorParams {
    /// base url
    pub base_url: String,
    /// sandbox url, used when the connector runs in test mode
    #[serde(default)]
    pub secondary_base_url: Option<String>,
}

impl ConnectorParams {
    pub fn get_base_url(&self, test_mode: bool) -> &str {
        match &self.secondary_base_url {
            Some(sandbox_url) if test_mode => sandbox_url,
            _ => &self.base_url,
        }
    }
}

#[derive(Debug, serde::Deserialize, Clone, Default)]
pub struct Proxy {
    pub http_url: Option<String>,
    pub https_url: Option<String>,
    pub idle_pool_connection_timeout: Option<u64>,
    #[serde(default)]
    pub bypass_proxy_urls: Vec<String>,
}
