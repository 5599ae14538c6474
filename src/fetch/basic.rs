use super::client::HttpClient;
use crate::config::ClientConfig;
use async_trait::async_trait;

pub struct BasicClient(reqwest::Client);

impl BasicClient {
    /// A client with reqwest's defaults and no timeouts.
    pub fn new() -> Self {
        Self(reqwest::Client::new())
    }

    /// A client honouring the request and connect timeouts in `config`.
    pub fn with_config(config: &ClientConfig) -> reqwest::Result<Self> {
        let mut builder = reqwest::Client::builder().connect_timeout(config.connect_timeout);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self(builder.build()?))
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}
