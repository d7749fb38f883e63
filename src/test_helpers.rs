//! Test helpers.

use std::sync::Arc;

use reqwest::StatusCode;
use rust_decimal::Decimal;

use crate::{
    auth::{AccessToken, Credentials},
    carts::{
        MockCartsClient,
        models::{Cart, ProductId},
        records::{CartItemRecord, CartRecord},
    },
    http::ClientError,
    promotions::{
        MockPromotionsClient,
        models::{DiscountType, Promotion},
    },
    session::SessionIdentity,
    storage::MemoryStorage,
    store::CartStore,
};

/// Build a normalised cart from `(item, product, price, quantity)` rows.
pub(crate) fn make_cart(id: &str, items: &[(&str, &str, i64, u32)]) -> Cart {
    CartRecord {
        id: id.into(),
        items: items
            .iter()
            .map(|(item, product, price, quantity)| CartItemRecord {
                id: (*item).into(),
                product_id: Some(ProductId::from(*product)),
                variant_id: None,
                color: None,
                size: None,
                price: Decimal::from(*price),
                quantity: *quantity,
                name: Some(format!("Product {product}")),
                image: None,
            })
            .collect(),
        total_quantity: None,
        total_amount: None,
    }
    .into()
}

pub(crate) fn promotion(
    code: &str,
    discount_type: DiscountType,
    value: i64,
    minimum: Option<i64>,
) -> Promotion {
    Promotion {
        code: code.to_string(),
        discount_type,
        discount_value: Decimal::from(value),
        minimum_order: minimum.map(Decimal::from),
        name: Some(format!("{code} promotion")),
        description: None,
    }
}

pub(crate) fn not_found() -> ClientError {
    ClientError::Status {
        status: StatusCode::NOT_FOUND,
        message: Some("Cart not found".to_string()),
    }
}

pub(crate) fn server_error(message: Option<&str>) -> ClientError {
    ClientError::Status {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: message.map(ToString::to_string),
    }
}

pub(crate) fn rejected(message: &str) -> ClientError {
    ClientError::Status {
        status: StatusCode::BAD_REQUEST,
        message: Some(message.to_string()),
    }
}

/// A carts mock that fails the test on any call not explicitly expected.
pub(crate) fn strict_carts_mock() -> MockCartsClient {
    let mut carts = MockCartsClient::new();

    carts.expect_fetch_my_cart().never();
    carts.expect_fetch_guest_cart().never();
    carts.expect_add_item().never();
    carts.expect_update_item_quantity().never();
    carts.expect_remove_item().never();
    carts.expect_clear_cart().never();
    carts.expect_merge_guest_cart().never();

    carts
}

pub(crate) fn strict_promotions_mock() -> MockPromotionsClient {
    let mut promotions = MockPromotionsClient::new();

    promotions.expect_validate().never();

    promotions
}

pub(crate) fn member() -> Credentials {
    Credentials::signed_in(AccessToken::new("test-token"))
}

pub(crate) struct TestStore {
    pub store: CartStore,
    pub storage: Arc<MemoryStorage>,
    pub session: SessionIdentity,
}

pub(crate) fn make_store(
    carts: MockCartsClient,
    promotions: MockPromotionsClient,
    credentials: Credentials,
) -> TestStore {
    let storage = Arc::new(MemoryStorage::new());
    let session = SessionIdentity::new(storage.clone());

    TestStore {
        store: CartStore::new(
            Arc::new(carts),
            Arc::new(promotions),
            session.clone(),
            credentials,
        ),
        storage,
        session,
    }
}
