//! Carts remote client.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;
use serde::Serialize;
use tracing::debug;

use crate::{
    carts::{
        models::{Cart, CartId, CartItemId, NewCartItem},
        records::CartRecord,
    },
    http::{ApiClient, ClientError},
    session::SessionId,
};

#[derive(Debug, Serialize)]
struct QuantityUpdate {
    quantity: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MergeRequest {
    session_id: SessionId,
}

/// Carts client backed by the storefront REST API.
#[derive(Debug, Clone)]
pub struct HttpCartsClient {
    api: ApiClient,
}

impl HttpCartsClient {
    /// Create a client sharing `api`'s connection pool and credentials.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

pub(crate) fn my_cart_path() -> Vec<&'static str> {
    vec!["carts", "me"]
}

pub(crate) fn guest_cart_path(session: &SessionId) -> Vec<&str> {
    vec!["carts", "guest", session.as_str()]
}

pub(crate) fn items_path(cart: Option<&CartId>) -> Vec<&str> {
    match cart {
        Some(cart) => vec!["carts", cart.as_str(), "items"],
        None => vec!["carts", "items"],
    }
}

pub(crate) fn item_path<'a>(cart: &'a CartId, item: &'a CartItemId) -> Vec<&'a str> {
    vec!["carts", cart.as_str(), "items", item.as_str()]
}

pub(crate) fn cart_path(cart: &CartId) -> Vec<&str> {
    vec!["carts", cart.as_str()]
}

pub(crate) fn merge_path() -> Vec<&'static str> {
    vec!["carts", "merge"]
}

#[async_trait]
impl CartsClient for HttpCartsClient {
    async fn fetch_my_cart(&self) -> Result<Cart, ClientError> {
        let request = self.api.request(Method::GET, &my_cart_path())?;
        let record: CartRecord = ApiClient::send_json(request).await?;

        Ok(record.into())
    }

    async fn fetch_guest_cart(&self, session: SessionId) -> Result<Cart, ClientError> {
        let request = self.api.request(Method::GET, &guest_cart_path(&session))?;
        let record: CartRecord = ApiClient::send_json(request).await?;

        Ok(record.into())
    }

    async fn add_item(&self, cart: Option<CartId>, item: NewCartItem) -> Result<Cart, ClientError> {
        debug!(cart_id = ?cart, bootstrap = item.is_bootstrap(), "adding cart item");

        let request = self
            .api
            .request(Method::POST, &items_path(cart.as_ref()))?
            .json(&item);
        let record: CartRecord = ApiClient::send_json(request).await?;

        Ok(record.into())
    }

    async fn update_item_quantity(
        &self,
        cart: CartId,
        item: CartItemId,
        quantity: u32,
    ) -> Result<Cart, ClientError> {
        let request = self
            .api
            .request(Method::PUT, &item_path(&cart, &item))?
            .json(&QuantityUpdate { quantity });
        let record: CartRecord = ApiClient::send_json(request).await?;

        Ok(record.into())
    }

    async fn remove_item(&self, cart: CartId, item: CartItemId) -> Result<Cart, ClientError> {
        let request = self.api.request(Method::DELETE, &item_path(&cart, &item))?;
        let record: CartRecord = ApiClient::send_json(request).await?;

        Ok(record.into())
    }

    async fn clear_cart(&self, cart: CartId) -> Result<(), ClientError> {
        let request = self.api.request(Method::DELETE, &cart_path(&cart))?;

        ApiClient::send_unit(request).await
    }

    async fn merge_guest_cart(&self, session: SessionId) -> Result<Cart, ClientError> {
        let request = self
            .api
            .request(Method::POST, &merge_path())?
            .json(&MergeRequest {
                session_id: session,
            });
        let record: CartRecord = ApiClient::send_json(request).await?;

        Ok(record.into())
    }
}

/// Remote cart operations. Mutations other than clearing answer with the
/// updated cart.
#[automock]
#[async_trait]
pub trait CartsClient: Send + Sync {
    /// Retrieve the signed-in user's cart.
    async fn fetch_my_cart(&self) -> Result<Cart, ClientError>;

    /// Retrieve the cart associated with a guest session.
    async fn fetch_guest_cart(&self, session: SessionId) -> Result<Cart, ClientError>;

    /// Add an item. With no cart id the backend creates a cart first.
    async fn add_item(&self, cart: Option<CartId>, item: NewCartItem) -> Result<Cart, ClientError>;

    /// Set the quantity of an existing item.
    async fn update_item_quantity(
        &self,
        cart: CartId,
        item: CartItemId,
        quantity: u32,
    ) -> Result<Cart, ClientError>;

    /// Remove an item from the cart.
    async fn remove_item(&self, cart: CartId, item: CartItemId) -> Result<Cart, ClientError>;

    /// Remove every item from the cart.
    async fn clear_cart(&self, cart: CartId) -> Result<(), ClientError>;

    /// Fold a guest session's cart into the signed-in user's cart.
    async fn merge_guest_cart(&self, session: SessionId) -> Result<Cart, ClientError>;
}
