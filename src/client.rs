use crate::config::ServerConfig;
use crate::picture::SelectedImage;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

/// Escapes everything except ASCII alphanumerics and `-_.!~*'()`, which is
/// the set `encodeURIComponent` leaves alone. Spaces become `%20`, never `+`.
const PROMPT_QUERY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("prompt is empty")]
    EmptyPrompt,
    #[error("invalid server address: {0}")]
    Address(#[from] url::ParseError),
    #[error("invalid tunnel bypass header: {0}")]
    TunnelHeader(String),
    #[error("frame answered with {0}")]
    Status(StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// HTTP client for a Pi Frame display. All requests go to routes under the
/// configured base address.
#[derive(Debug, Clone)]
pub struct FrameClient {
    client: reqwest::Client,
    base: Url,
}

impl FrameClient {
    pub fn new(config: &ServerConfig) -> Result<Self, ClientError> {
        let mut address = config.address.clone();
        if !address.ends_with('/') {
            address.push('/');
        }
        let base = Url::parse(&address)?;
        let mut headers = HeaderMap::new();
        if let Some(bypass) = &config.tunnel_bypass {
            let name = HeaderName::from_bytes(bypass.header.as_bytes())
                .map_err(|_| ClientError::TunnelHeader(bypass.header.clone()))?;
            let value = bypass
                .value
                .parse::<HeaderValue>()
                .map_err(|_| ClientError::TunnelHeader(bypass.value.clone()))?;
            headers.insert(name, value);
        }
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        Ok(Self { client, base })
    }
    pub fn base(&self) -> &Url {
        &self.base
    }
    /// Submits the prompt as `GET /prompt?prompt=<encoded>`. The prompt is
    /// trimmed first; a prompt with nothing left is rejected locally.
    pub async fn submit_prompt(&self, prompt: &str) -> Result<(), ClientError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ClientError::EmptyPrompt);
        }
        let mut url = self.base.join("prompt")?;
        url.set_query(Some(&format!(
            "prompt={}",
            utf8_percent_encode(prompt, PROMPT_QUERY)
        )));
        let response = self.client.get(url).send().await?;
        Self::check(response.status())
    }
    /// Sends the selected image as `POST /image` with a JSON body.
    pub async fn send_image(&self, image: &SelectedImage) -> Result<(), ClientError> {
        let url = self.base.join("image")?;
        let response = self.client.post(url).json(image).send().await?;
        Self::check(response.status())
    }
    /// Probes the frame's root route. True when it answers with a success
    /// status, false on any error.
    pub async fn ping(&self) -> bool {
        match self.client.get(self.base.clone()).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                log::debug!("health check failed: {e}");
                false
            }
        }
    }
    fn check(status: StatusCode) -> Result<(), ClientError> {
        if status.is_success() {
            Ok(())
        } else {
            Err(ClientError::Status(status))
        }
    }
}
