use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::Result;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) qs_rankings/0.1";

/// Local forwarding proxy for outbound lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
}

impl ProxyConfig {
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: Duration,
    pub proxy: Option<ProxyConfig>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            timeout: Duration::from_secs(20),
            proxy: None,
        }
    }
}

/// Blocking client routed through the configured proxy (HTTP and HTTPS alike).
pub fn build_client(config: &HttpConfig) -> Result<Client> {
    let mut builder = Client::builder()
        .timeout(config.timeout)
        .user_agent(USER_AGENT);
    if let Some(proxy) = &config.proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy.url())?);
    }
    Ok(builder.build()?)
}
