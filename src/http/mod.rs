//! Shared HTTP plumbing for the remote clients.

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{auth::Credentials, config::ApiConfig};

mod errors;

pub use errors::ClientError;

/// Thin wrapper around [`reqwest::Client`] bound to the storefront API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: Client,
    credentials: Credentials,
}

impl ApiClient {
    /// Create a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute URL that can carry
    /// a path, or the HTTP client cannot be built.
    pub fn new(config: &ApiConfig, credentials: Credentials) -> Result<Self, ClientError> {
        let base_url = Url::parse(config.api_url.trim())
            .map_err(|error| ClientError::InvalidConfig(format!("invalid api url: {error}")))?;

        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidConfig(format!(
                "api url {base_url} cannot carry a path"
            )));
        }

        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            base_url,
            http,
            credentials,
        })
    }

    /// Credentials attached to outgoing requests.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Absolute URL for an API path given as raw segments, e.g.
    /// `["carts", "me"]`. Each segment is percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry a path.
    pub fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|()| {
                ClientError::InvalidConfig(format!("api url {} cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    /// Start a request, attaching the bearer token when signed in.
    pub(crate) fn request(
        &self,
        method: Method,
        segments: &[&str],
    ) -> Result<RequestBuilder, ClientError> {
        let url = self.url(segments)?;

        debug!(%method, %url, "sending request");

        let builder = self.http.request(method, url);

        Ok(match self.credentials.token() {
            Some(token) => builder.bearer_auth(token.expose()),
            None => builder,
        })
    }

    /// Send a request and decode a JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = Self::check(request.send().await?).await?;

        Ok(response.json().await?)
    }

    /// Send a request, discarding any success body.
    pub(crate) async fn send_unit(request: RequestBuilder) -> Result<(), ClientError> {
        Self::check(request.send().await?).await?;

        Ok(())
    }

    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();

        debug!(%status, "request rejected");

        Err(ClientError::from_status(status, &body))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::auth::AccessToken;

    use super::*;

    #[test]
    fn url_joins_base_and_path_without_double_slash() -> TestResult {
        let client = ApiClient::new(&ApiConfig::new("http://shop.test/api/"), Credentials::guest())?;
        let bare = ApiClient::new(&ApiConfig::new("http://shop.test"), Credentials::guest())?;

        assert_eq!(
            client.url(&["carts", "me"])?.as_str(),
            "http://shop.test/api/carts/me"
        );
        assert_eq!(bare.url(&["carts", "me"])?.as_str(), "http://shop.test/carts/me");

        Ok(())
    }

    #[test]
    fn unusable_base_urls_are_rejected() {
        for url in ["  ", "/api", "mailto:shop@example.test"] {
            let result = ApiClient::new(&ApiConfig::new(url), Credentials::guest());

            assert!(
                matches!(result, Err(ClientError::InvalidConfig(_))),
                "expected InvalidConfig for {url:?}, got {result:?}"
            );
        }
    }

    #[test]
    fn bearer_header_follows_credentials() -> TestResult {
        let credentials = Credentials::guest();
        let client = ApiClient::new(&ApiConfig::new("http://shop.test/api"), credentials.clone())?;

        let anonymous = client.request(Method::GET, &["carts", "me"])?.build()?;

        assert!(anonymous.headers().get("authorization").is_none());

        credentials.sign_in(AccessToken::new("abc"));

        let signed = client.request(Method::GET, &["carts", "me"])?.build()?;

        assert_eq!(
            signed
                .headers()
                .get("authorization")
                .and_then(|v| v.to_str().ok()),
            Some("Bearer abc")
        );

        Ok(())
    }

    #[test]
    fn url_segments_are_percent_encoded() -> TestResult {
        let client = ApiClient::new(&ApiConfig::new("http://shop.test/api"), Credentials::guest())?;

        assert_eq!(
            client.url(&["promotions", "validate", "50% OFF"])?.as_str(),
            "http://shop.test/api/promotions/validate/50%25%20OFF"
        );
        assert_eq!(
            client.url(&["carts", "a/b?c"])?.as_str(),
            "http://shop.test/api/carts/a%2Fb%3Fc"
        );

        Ok(())
    }
}
