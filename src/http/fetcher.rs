//! Fetch wrapper
//!
//! Sends a request and, when a spinner is supplied, shows it only if the
//! response takes longer than the configured delay. The spinner is always
//! hidden once the request settles.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};

use super::{HttpError, HttpResult, Spinner};
use crate::config::HttpConfig;

/// Delay before the spinner appears
pub const DEFAULT_SPINNER_DELAY_MS: u64 = 1000;

/// HTTP client wrapper with delayed spinner support
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    spinner_delay: Duration,
}

impl Fetcher {
    /// Build a fetcher from configuration
    pub fn new(config: &HttpConfig) -> HttpResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            spinner_delay: Duration::from_millis(config.spinner_delay_ms),
        })
    }

    /// Wrap an existing client
    pub fn with_client(client: Client, spinner_delay: Duration) -> Self {
        Self {
            client,
            spinner_delay,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn spinner_delay(&self) -> Duration {
        self.spinner_delay
    }

    /// Send `request` using the configured spinner delay
    pub async fn fetch(
        &self,
        request: RequestBuilder,
        spinner: Option<&dyn Spinner>,
    ) -> HttpResult<Response> {
        self.fetch_with_delay(request, spinner, self.spinner_delay)
            .await
    }

    /// Send `request`, showing `spinner` if it is still pending after `delay`
    pub async fn fetch_with_delay(
        &self,
        request: RequestBuilder,
        spinner: Option<&dyn Spinner>,
        delay: Duration,
    ) -> HttpResult<Response> {
        let send = request.send();

        let result = match spinner {
            None => send.await,
            Some(spinner) => {
                tokio::pin!(send);
                let result = tokio::select! {
                    result = &mut send => result,
                    _ = tokio::time::sleep(delay) => {
                        tracing::debug!(delay_ms = delay.as_millis() as u64, "Request slow, showing spinner");
                        spinner.show();
                        send.await
                    }
                };
                spinner.hide();
                result
            }
        };

        match result {
            Ok(response) => {
                tracing::debug!(url = %response.url(), status = response.status().as_u16(), "Fetched");
                Ok(response)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Fetch failed");
                Err(HttpError::from_request(e))
            }
        }
    }
}
