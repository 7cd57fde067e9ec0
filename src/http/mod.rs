//! HTTP Helpers
//!
//! Thin collaborators used by views to talk to a backend:
//! - [`Fetcher`]: request wrapper that shows a loading spinner for slow calls
//! - [`GraphQlClient`]: query/mutation client with bearer tokens and a
//!   token-expiry callback

mod fetcher;
mod graphql;
mod spinner;

pub use fetcher::{Fetcher, DEFAULT_SPINNER_DELAY_MS};
pub use graphql::{ExpiredTokenCallback, GraphQlClient, GraphQlError, GraphQlResult, TokenGetter};
pub use spinner::{FlagSpinner, Spinner};

use thiserror::Error;

/// Errors from the HTTP layer
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Request timeout")]
    Timeout,

    #[error("Service unavailable")]
    Unavailable,
}

impl HttpError {
    /// Classify a transport error the way callers care about it
    pub fn from_request(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HttpError::Timeout
        } else if err.is_connect() {
            HttpError::Unavailable
        } else {
            HttpError::Request(err)
        }
    }
}

/// Result type alias for HTTP operations
pub type HttpResult<T> = Result<T, HttpError>;

#[cfg(test)]
pub(crate) mod test_server {
    //! One-shot HTTP server for exercising the client side

    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve a single canned response; the handle yields the raw request
    pub async fn serve_once(
        status: u16,
        body: &'static str,
        delay: Duration,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/graphql", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;

            tokio::time::sleep(delay).await;
            let response = format!(
                "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });

        (url, handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);

            let text = String::from_utf8_lossy(&data).to_string();
            if let Some(head_end) = text.find("\r\n\r\n") {
                let length = text[..head_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if data.len() >= head_end + 4 + length {
                    return text;
                }
            }
        }
        String::from_utf8_lossy(&data).to_string()
    }

    /// Client that ignores proxy settings from the environment
    pub fn client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }
}
