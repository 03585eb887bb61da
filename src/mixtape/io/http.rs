use super::ByteSource;
use crate::config::HttpTimeouts;
use crate::error::{MixtapeError, Result};
use reqwest::blocking::Client;
use tracing::debug;

/// Remote catalog fetched with a single blocking GET.
pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeouts: &HttpTimeouts) -> Result<Self> {
        // The request deadline also bounds the TLS handshake.
        let client = Client::builder()
            .connect_timeout(timeouts.connect)
            .timeout(timeouts.request)
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ByteSource for HttpSource {
    fn read(&self) -> Result<Vec<u8>> {
        debug!(url = %self.url, "fetching input catalog");
        let response = self.client.get(&self.url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(MixtapeError::InputFetch(format!(
                "GET {} returned {}",
                self.url, status
            )));
        }

        let body = response.bytes()?;
        Ok(body.to_vec())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
