use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT_LANGUAGE, USER_AGENT};

pub fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .context("failed to build http client")
}

/// Anything that can turn a URL into an HTML body.
///
/// The pipeline only talks to the network through this trait, so tests can
/// swap in a canned source and count requests.
pub trait PageSource {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Blocking GET against the live site with a browser-like user agent.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    user_agent: String,
}

impl HttpSource {
    pub fn new(user_agent: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            user_agent: user_agent.into(),
        })
    }
}

impl PageSource for HttpSource {
    fn fetch(&self, url: &str) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .header(USER_AGENT, self.user_agent.as_str())
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .with_context(|| format!("request failed: {url}"))?;
        let status = resp.status();
        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow!("http {status} for {url}"));
        }
        Ok(body)
    }
}
