//! Cart Models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    carts::records::{CartItemRecord, CartRecord},
    ids::TypedId,
    session::SessionId,
};

/// Marker for product identifiers.
#[derive(Debug)]
pub enum ProductTag {}

/// Marker for product variant (colour/size) identifiers.
#[derive(Debug)]
pub enum VariantTag {}

/// Cart ID
pub type CartId = TypedId<Cart>;

/// Cart Item ID
pub type CartItemId = TypedId<CartItem>;

/// Product ID
pub type ProductId = TypedId<ProductTag>;

/// Variant ID
pub type VariantId = TypedId<VariantTag>;

/// Cart Model
///
/// Normalised from a [`CartRecord`]: every item has a product and a
/// quantity of at least one, and `total_quantity` is the sum of item
/// quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    pub items: Vec<CartItem>,
    pub total_quantity: u64,
    pub total_amount: Decimal,
}

/// CartItem Model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub price: Decimal,
    pub quantity: u32,
    pub name: Option<String>,
    pub image: Option<String>,
}

impl CartItem {
    /// Unit price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    fn from_record(record: CartItemRecord) -> Option<Self> {
        if record.quantity == 0 {
            return None;
        }

        Some(Self {
            id: record.id,
            product_id: record.product_id?,
            variant_id: record.variant_id,
            color: record.color,
            size: record.size,
            price: record.price,
            quantity: record.quantity,
            name: record.name,
            image: record.image,
        })
    }
}

/// Sum of item quantities.
#[must_use]
pub fn total_quantity(items: &[CartItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity)).sum()
}

/// Sum of item line totals.
#[must_use]
pub fn total_amount(items: &[CartItem]) -> Decimal {
    items.iter().map(CartItem::line_total).sum()
}

impl From<CartRecord> for Cart {
    fn from(record: CartRecord) -> Self {
        let received = record.items.len();

        let items: Vec<CartItem> = record
            .items
            .into_iter()
            .filter_map(CartItem::from_record)
            .collect();

        if items.len() != received {
            warn!(
                cart_id = %record.id,
                dropped = received - items.len(),
                "dropped cart items without a product or quantity"
            );
        }

        let total_quantity = total_quantity(&items);

        if let Some(reported) = record.total_quantity.filter(|q| *q != total_quantity) {
            warn!(
                cart_id = %record.id,
                reported,
                computed = total_quantity,
                "server total quantity disagrees with items"
            );
        }

        let total_amount = record
            .total_amount
            .unwrap_or_else(|| self::total_amount(&items));

        Self {
            id: record.id,
            items,
            total_quantity,
            total_amount,
        }
    }
}

/// An item a shopper wants to put in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddCartItem {
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
    pub quantity: u32,
}

/// New Cart Item request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub product_id: Option<ProductId>,
    pub variant_id: Option<VariantId>,
    pub quantity: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
}

impl NewCartItem {
    /// Build a request body for `item`, tagged with the guest session when
    /// one is given.
    #[must_use]
    pub fn new(item: AddCartItem, session_id: Option<SessionId>) -> Self {
        Self {
            product_id: Some(item.product_id),
            variant_id: item.variant_id,
            quantity: item.quantity,
            session_id,
        }
    }

    /// The null-product, zero-quantity item the backend accepts as a request
    /// to create an empty cart.
    #[must_use]
    pub fn bootstrap() -> Self {
        Self {
            product_id: None,
            variant_id: None,
            quantity: 0,
            session_id: None,
        }
    }

    /// Whether this is the cart-creating placeholder item.
    #[must_use]
    pub fn is_bootstrap(&self) -> bool {
        self.product_id.is_none() && self.quantity == 0
    }
}
