//! Promotions remote client.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;

use crate::{
    http::{ApiClient, ClientError},
    promotions::models::Promotion,
};

/// Promotions client backed by the storefront REST API.
#[derive(Debug, Clone)]
pub struct HttpPromotionsClient {
    api: ApiClient,
}

impl HttpPromotionsClient {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

pub(crate) fn validate_path(code: &str) -> [&str; 3] {
    ["promotions", "validate", code]
}

#[async_trait]
impl PromotionsClient for HttpPromotionsClient {
    async fn validate(&self, code: String) -> Result<Promotion, ClientError> {
        let request = self.api.request(Method::GET, &validate_path(&code))?;

        ApiClient::send_json(request).await
    }
}

/// Remote promotion code validation.
#[automock]
#[async_trait]
pub trait PromotionsClient: Send + Sync {
    /// Ask the backend whether `code` is redeemable and return its terms.
    async fn validate(&self, code: String) -> Result<Promotion, ClientError>;
}
